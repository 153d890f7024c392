//! Command dispatch and the interactive chat loops.

pub mod game;
pub mod interview;

use crate::api::{AgentConfig, HttpClient};
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::prompt::load_prompt;
use crate::ui::style;
use anyhow::Result;
use dialoguer::{Input, Select};
use std::sync::Arc;

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    config.apply_env_overrides();
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let client = Arc::new(HttpClient::new(&config.server_url)?);

    match cli.command {
        Commands::Interview { max_turns } => interview::run(client, &config, max_turns).await,
        Commands::Game { game, params } => game::run(client, &config, game, params).await,
        Commands::Games => game::list(client).await,
    }
}

/// Shown while a session-mutating call is in flight; input is not read
/// until the call resolves.
pub(crate) fn show_busy() {
    println!("{}", style::dim("…"));
}

/// Interactive single-field config edit. Returns the replacement config, or
/// `None` if the edit was canceled or the value failed validation.
pub(crate) fn edit_config(label: &str, current: &AgentConfig) -> Result<Option<AgentConfig>> {
    let fields = ["system_prompt", "model", "temperature", "max_tokens"];
    let picked = Select::new()
        .with_prompt(format!("{label}: field to edit"))
        .items(&fields)
        .default(0)
        .interact()?;

    let mut updated = current.clone();
    match fields[picked] {
        "system_prompt" => {
            let value: String = Input::new()
                .with_prompt("system prompt (text, or a path to a .md/.txt file)")
                .with_initial_text(current.system_prompt.clone())
                .interact_text()?;
            updated.system_prompt = load_prompt(value.trim());
        }
        "model" => {
            let value: String = Input::new()
                .with_prompt("model")
                .with_initial_text(current.model.clone())
                .interact_text()?;
            updated.model = value.trim().to_string();
        }
        "temperature" => {
            let value: String = Input::new()
                .with_prompt("temperature (0.0–2.0)")
                .with_initial_text(current.temperature.to_string())
                .interact_text()?;
            match value.trim().parse::<f64>() {
                Ok(temperature) if (0.0..=2.0).contains(&temperature) => {
                    updated.temperature = temperature;
                }
                _ => {
                    println!("{}", style::yellow("temperature must be a number in 0.0–2.0"));
                    return Ok(None);
                }
            }
        }
        "max_tokens" => {
            let value: String = Input::new()
                .with_prompt("max tokens")
                .with_initial_text(current.max_tokens.to_string())
                .interact_text()?;
            match value.trim().parse::<u32>() {
                Ok(max_tokens) if max_tokens > 0 => updated.max_tokens = max_tokens,
                _ => {
                    println!("{}", style::yellow("max tokens must be a positive integer"));
                    return Ok(None);
                }
            }
        }
        _ => unreachable!(),
    }

    Ok(Some(updated))
}
