use anyhow::{anyhow, Result};

const MAX_CLIENT_NAME_LENGTH: usize = 255;

pub fn parse_trainer_id(input: &str) -> Result<i64> {
    let id: i64 = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Trainer ID must be a number"))?;

    if id <= 0 {
        return Err(anyhow!("Trainer ID must be positive"));
    }

    Ok(id)
}

/// Trims and checks a client's display name.
pub fn validate_client_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Client name cannot be empty"));
    }

    if name.chars().count() > MAX_CLIENT_NAME_LENGTH {
        return Err(anyhow!(
            "Client name is too long (max {} characters)",
            MAX_CLIENT_NAME_LENGTH
        ));
    }

    Ok(name.to_string())
}

/// Parses the `/sync <minutes>` argument. Clamping to a minimum happens on save.
pub fn parse_sync_interval(input: &str) -> Result<i64> {
    input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Sync interval must be a whole number of minutes"))
}
