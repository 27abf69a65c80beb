//! Core logic for the homework review notification bot.
//!
//! Framework-agnostic: the homework API and Telegram live behind ports
//! (traits) implemented in adapter crates.

pub mod config;
pub mod dates;
pub mod domain;
pub mod errors;
pub mod homework;
pub mod logging;
pub mod messaging;
pub mod notifier;
pub mod ports;
pub mod tracker;

pub use errors::{Error, Result};
