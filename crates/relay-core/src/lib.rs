//! Core domain + relay logic for the message-relay bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the
//! [`messaging::port::MessagingPort`] trait implemented in the adapter crate.

pub mod audit;
pub mod ban;
pub mod commands;
pub mod config;
pub mod content;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod pacing;
pub mod provenance;
pub mod relay;
pub mod store;

pub use errors::{Error, Result};
