//! Per-broadcast delivery accounting.

use std::sync::Arc;

use crate::{domain::ChatId, pacing::Pacer};

/// Why a destination did not receive a relayed message.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("content type cannot be forwarded")]
    Unsupported,

    #[error("{0}")]
    Transport(String),
}

/// Outcome of one broadcast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastResult {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_destinations: Vec<ChatId>,
}

/// Records per-destination outcomes and paces successive sends of one broadcast.
pub struct DeliveryReporter {
    pacer: Arc<dyn Pacer>,
    result: BroadcastResult,
}

impl DeliveryReporter {
    pub fn new(pacer: Arc<dyn Pacer>) -> Self {
        Self {
            pacer,
            result: BroadcastResult::default(),
        }
    }

    /// Wait for the next send slot. Every destination reserves one, the first included.
    pub async fn pace(&self) {
        self.pacer.pace().await;
    }

    pub fn record(&mut self, dest: ChatId, outcome: &Result<(), DeliveryError>) {
        match outcome {
            Ok(()) => self.result.succeeded += 1,
            Err(_) => {
                self.result.failed += 1;
                self.result.failed_destinations.push(dest);
            }
        }
    }

    pub fn finish(self) -> BroadcastResult {
        self.result
    }
}
