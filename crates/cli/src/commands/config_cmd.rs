//! `calagent config`: Show the resolved configuration.

use calagent_config::AppConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>, default: bool) -> Result<(), Box<dyn std::error::Error>> {
    if default {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));
    let config = super::load_config(config_path)?;

    println!("🔍 Configuration ({})", path.display());
    println!();
    for line in summary(&config) {
        println!("   {line}");
    }

    Ok(())
}

/// Human-readable overview; never prints secrets.
fn summary(config: &AppConfig) -> Vec<String> {
    let credentials = if config.credentials.access_token.is_some() {
        "static access token"
    } else if config.credentials.has_client_credentials() {
        "client credentials"
    } else {
        "not configured"
    };

    vec![
        format!("Provider:     {}", config.default_provider),
        format!("Model:        {}", config.default_model),
        format!(
            "API key:      {}",
            if config.has_api_key() { "set" } else { "missing" }
        ),
        format!(
            "Agent:        max_steps={}, model_timeout={}s",
            config.agent.max_steps, config.agent.model_timeout_secs
        ),
        format!(
            "Gateway:      {}:{}",
            config.gateway.host, config.gateway.port
        ),
        format!("Calendar:     {}", config.calendar.graph_url),
        format!(
            "Mailbox:      {} ({})",
            config.calendar.mailbox, config.calendar.timezone
        ),
        format!("Credentials:  {credentials}"),
    ]
}
