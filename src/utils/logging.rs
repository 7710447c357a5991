use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_START: {} in chat {} - {}", command, chat_id, d),
        None => info!("CMD_START: {} in chat {}", command, chat_id),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_SUCCESS: {} in chat {} - {}", command, chat_id, d),
        None => info!("CMD_SUCCESS: {} in chat {}", command, chat_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, chat_id: i64, error: &str) {
    error!("CMD_ERROR: {} in chat {} - {}", command, chat_id, error);
}

/// Logs rejected command input
pub fn log_validation_error(command: &str, value: &str, error: &str, chat_id: i64) {
    warn!(
        "VALIDATION_ERROR: {} - '{}' invalid: {} - chat {}",
        command, value, error, chat_id
    );
}

/// Logs calendar sync progress for a trainer
pub fn log_sync_event(trainer_id: i64, event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYNC: trainer {} {} - {}", trainer_id, event, d),
        None => info!("SYNC: trainer {} {}", trainer_id, event),
    }
}

/// Logs a failed sync for a trainer
pub fn log_sync_error(trainer_id: i64, error: &str) {
    error!("SYNC_ERROR: trainer {} - {}", trainer_id, error);
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
