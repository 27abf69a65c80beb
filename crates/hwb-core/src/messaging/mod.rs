//! Outbound messaging abstractions (Telegram today).

pub mod port;
