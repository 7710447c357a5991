//! Telegram side of the bot: webhook payloads, command parsing and the
//! handlers that act on them.

pub mod commands;
pub mod handlers;
pub mod update;
