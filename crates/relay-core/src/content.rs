//! Content adapter: turns an inbound payload into the send operations that
//! deliver it to one destination with a provenance prefix.

use crate::{domain::ChatId, formatting::escape_html};

/// Opaque platform media reference (Telegram `file_id`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRef(pub String);

/// Rich-text mode applied to outbound text and captions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Html,
}

/// Media kinds that accept a caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
        }
    }
}

/// Content of an inbound message. Exactly one kind is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentPayload {
    Text(String),
    Photo {
        media: MediaRef,
        caption: Option<String>,
    },
    Video {
        media: MediaRef,
        caption: Option<String>,
    },
    Document {
        media: MediaRef,
        caption: Option<String>,
    },
    Audio {
        media: MediaRef,
        caption: Option<String>,
    },
    Voice {
        media: MediaRef,
    },
    Unsupported,
}

impl ContentPayload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentPayload::Text(_) => "text",
            ContentPayload::Photo { .. } => "photo",
            ContentPayload::Video { .. } => "video",
            ContentPayload::Document { .. } => "document",
            ContentPayload::Audio { .. } => "audio",
            ContentPayload::Voice { .. } => "voice",
            ContentPayload::Unsupported => "unsupported",
        }
    }

    /// Text or caption carried by the payload, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentPayload::Text(t) => Some(t),
            ContentPayload::Photo { caption, .. }
            | ContentPayload::Video { caption, .. }
            | ContentPayload::Document { caption, .. }
            | ContentPayload::Audio { caption, .. } => caption.as_deref(),
            ContentPayload::Voice { .. } | ContentPayload::Unsupported => None,
        }
    }

    fn captioned(&self) -> Option<(MediaKind, &MediaRef, Option<&str>)> {
        match self {
            ContentPayload::Photo { media, caption } => {
                Some((MediaKind::Photo, media, caption.as_deref()))
            }
            ContentPayload::Video { media, caption } => {
                Some((MediaKind::Video, media, caption.as_deref()))
            }
            ContentPayload::Document { media, caption } => {
                Some((MediaKind::Document, media, caption.as_deref()))
            }
            ContentPayload::Audio { media, caption } => {
                Some((MediaKind::Audio, media, caption.as_deref()))
            }
            _ => None,
        }
    }
}

/// One atomic call against the messaging transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOperation {
    Text {
        dest: ChatId,
        text: String,
        format: Option<TextFormat>,
    },
    Media {
        dest: ChatId,
        kind: MediaKind,
        media: MediaRef,
        caption: String,
        format: Option<TextFormat>,
    },
    Voice {
        dest: ChatId,
        media: MediaRef,
    },
}

impl SendOperation {
    pub fn dest(&self) -> ChatId {
        match self {
            SendOperation::Text { dest, .. }
            | SendOperation::Media { dest, .. }
            | SendOperation::Voice { dest, .. } => *dest,
        }
    }
}

/// Outbound unit for a single destination.
#[derive(Clone, Debug)]
pub struct RelayEnvelope<'a> {
    pub destination: ChatId,
    pub payload: &'a ContentPayload,
    pub prefix: String,
    pub format: Option<TextFormat>,
}

impl RelayEnvelope<'_> {
    pub fn operations(&self) -> Vec<SendOperation> {
        build_send(self.payload, self.destination, &self.prefix, self.format)
    }
}

/// Build the send operations that deliver `payload` to `destination`.
///
/// `prefix` is inserted verbatim; user-provided text is HTML-escaped when `format`
/// is [`TextFormat::Html`]. An empty result means the payload cannot be forwarded.
pub fn build_send(
    payload: &ContentPayload,
    destination: ChatId,
    prefix: &str,
    format: Option<TextFormat>,
) -> Vec<SendOperation> {
    let body = |s: &str| match format {
        Some(TextFormat::Html) => escape_html(s),
        None => s.to_string(),
    };

    if let Some((kind, media, caption)) = payload.captioned() {
        return vec![SendOperation::Media {
            dest: destination,
            kind,
            media: media.clone(),
            caption: format!("{prefix} {}", body(caption.unwrap_or_default())),
            format,
        }];
    }

    match payload {
        ContentPayload::Text(text) => vec![SendOperation::Text {
            dest: destination,
            text: format!("{prefix} {}", body(text)),
            format,
        }],
        // Voice messages cannot carry a caption; the prefix follows as its own message.
        ContentPayload::Voice { media } => vec![
            SendOperation::Voice {
                dest: destination,
                media: media.clone(),
            },
            SendOperation::Text {
                dest: destination,
                text: prefix.to_string(),
                format,
            },
        ],
        _ => Vec::new(),
    }
}
