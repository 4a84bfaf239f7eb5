//! `calagent agent`: Interactive or single-message chat mode.

use calagent_config::AppConfig;
use calagent_core::message::SessionId;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
    session: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    // Check for API key early: give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in .env):");
        eprintln!("    OPENAI_API_KEY=sk-...            (OpenAI)");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...  (OpenRouter)");
        eprintln!("    CALAGENT_API_KEY=...             (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let orchestrator = calagent_gateway::orchestrator_from_config(&config)?;
    let session_id = SessionId::from(session.as_str());

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let response = orchestrator.handle_turn(&session_id, &msg).await;
        eprint!("\r              \r");
        println!("{response}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  calagent: interactive mode");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!("  Tools:     {}", orchestrator.agent().tools().names().join(", "));
    println!("  Mailbox:   {} ({})", config.calendar.mailbox, config.calendar.timezone);
    println!("  Session:   {session_id}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        eprint!("  ...");
        let response = orchestrator.handle_turn(&session_id, line).await;
        eprint!("\r     \r");
        println!("  Agent > {response}");
        println!();
    }

    Ok(())
}
