//! # Cozy Gym Bot
//!
//! Backend for a Telegram bot that keeps gym trainers' Google Calendars in
//! sync and reminds their clients about upcoming trainings.
//!
//! ## Features
//! - Trainer and client registration through Telegram commands
//! - Google Calendar connection via OAuth
//! - Calendar events matched to clients by name and stored as sessions
//! - Reminders for trainings starting within the next 24 hours
//! - Optional per-trainer auto-sync on a background scheduler
//! - Persistent storage with SQLite

/// HTTP routes and shared request state
pub mod api;
/// Telegram webhook payloads, command parsing and handlers
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error type returned by HTTP handlers
pub mod error;
/// Google client, calendar sync, notifications and the sync scheduler
pub mod services;
/// Utility functions for datetime, validation, logging and chat feedback
pub mod utils;
