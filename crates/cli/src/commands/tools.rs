//! `calagent tools`: List the tools the agent can call.

use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let registry = calagent_tools::registry_from_config(&config);

    println!("🔧 {} tools available", registry.len());
    for tool in registry.descriptors() {
        println!();
        println!("   {}", tool.name);
        println!("     {}", tool.description);
        for field in tool.input_schema.fields() {
            let required = if field.required { "required" } else { "optional" };
            println!(
                "     - {} ({}, {required}): {}",
                field.name,
                field.kind.expected(),
                field.description
            );
        }
    }

    Ok(())
}
