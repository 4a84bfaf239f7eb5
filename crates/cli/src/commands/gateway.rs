//! `calagent gateway`: Start the HTTP API server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📅 calagent gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {} ({})", config.default_model, config.default_provider);
    println!("   Max steps: {}", config.agent.max_steps);

    calagent_gateway::start(config).await?;

    Ok(())
}
