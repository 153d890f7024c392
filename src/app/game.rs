//! Interactive game chat loop and game-definition listing.

use super::{edit_config, show_busy};
use crate::api::{ExportFormat, GameApi, GameMessage, SessionStatus};
use crate::config::Config;
use crate::session::{GameAgent, GameController};
use crate::ui::style;
use anyhow::{Context, Result};
use dialoguer::{FuzzySelect, Input, Select};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

const HELP: &str =
    "/new  /pick  /start  /save [json|csv]  /config  /info  /quit — anything else is sent as your move";

pub async fn run(
    api: Arc<dyn GameApi>,
    config: &Config,
    game_path: Option<String>,
    params: Option<String>,
) -> Result<()> {
    let param_overrides = params
        .as_deref()
        .map(|raw| serde_json::from_str::<Value>(raw).context("--params must be a JSON object"))
        .transpose()?;

    let mut controller = GameController::new(api);
    println!("{}", style::dim("loading defaults…"));
    controller.initialize().await;
    if !controller.is_ready() {
        println!(
            "{}",
            style::yellow("Could not load game defaults from the backend; is the server running?")
        );
        return Ok(());
    }

    let export_dir = config.export_dir();

    println!("{}", style::header("Parley — game mode"));
    println!("{}", style::dim(HELP));

    if let Some(path) = game_path {
        show_busy();
        match controller
            .create_from_game(&path, param_overrides.as_ref())
            .await
        {
            Ok(()) => announce_session(&controller),
            Err(err) => error!("create game session failed: {err}"),
        }
    }

    loop {
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()?;
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let rendered = controller.messages().len();
        let mut words = line.split_whitespace();
        match words.next().unwrap_or_default() {
            "/quit" => break,
            "/help" => println!("{}", style::dim(HELP)),
            "/new" => {
                show_busy();
                match controller.create_session().await {
                    Ok(()) => announce_session(&controller),
                    Err(err) => error!("create game session failed: {err}"),
                }
            }
            "/pick" => {
                if let Err(err) = pick_game(&mut controller, param_overrides.as_ref()).await {
                    error!("game selection failed: {err}");
                }
            }
            "/start" => {
                show_busy();
                if let Err(err) = controller.start().await {
                    error!("start failed: {err}");
                }
            }
            "/save" => {
                let format = words
                    .next()
                    .and_then(|raw| raw.parse::<ExportFormat>().ok())
                    .unwrap_or(config.export.format);
                match controller.download_transcript(format, &export_dir).await {
                    Ok(Some(path)) => {
                        println!("{} {}", style::success("saved"), style::value(path.display()));
                    }
                    Ok(None) => println!("{}", style::yellow("no session to export")),
                    Err(err) => warn!("transcript download failed: {err}"),
                }
            }
            "/config" => edit_agent_config(&mut controller)?,
            "/info" => show_info(&controller).await,
            _ => {
                if controller.session_id().is_none()
                    || controller.status() != SessionStatus::Active
                {
                    println!("{}", style::yellow("no active game — /new then /start first"));
                    continue;
                }
                show_busy();
                if let Err(err) = controller.send_move(&line).await {
                    error!("move failed: {err}");
                }
            }
        }

        render_from(controller.messages(), rendered);
    }

    Ok(())
}

/// Print the available game definitions.
pub async fn list(api: Arc<dyn GameApi>) -> Result<()> {
    let controller = GameController::new(api);
    let games = controller.list_games().await?;

    if games.is_empty() {
        println!("{}", style::yellow("no game definitions available"));
        return Ok(());
    }

    println!("{}", style::header("Available games"));
    for game in games {
        let description = game.description.unwrap_or_default();
        println!(
            "{} {} {}",
            style::value(&game.name),
            style::dim(&game.path),
            description
        );
    }
    Ok(())
}

fn announce_session(controller: &GameController) {
    match controller.session_id() {
        Some(id) => {
            println!("{} {}", style::success("session"), style::value(id));
            if let Some(name) = controller.game_name() {
                println!("{} {}", style::accent("game:"), style::value(name));
            }
            if controller.realized_params().is_object() {
                println!(
                    "{} {}",
                    style::accent("params:"),
                    style::dim(controller.realized_params())
                );
            }
        }
        None => println!("{}", style::yellow("defaults not loaded; nothing created")),
    }
}

async fn pick_game(controller: &mut GameController, overrides: Option<&Value>) -> Result<()> {
    let games = controller.list_games().await?;
    if games.is_empty() {
        println!("{}", style::yellow("no game definitions available"));
        return Ok(());
    }

    let labels: Vec<String> = games
        .iter()
        .map(|game| format!("{} — {}", game.name, game.path))
        .collect();
    let picked = FuzzySelect::new()
        .with_prompt("game definition")
        .items(&labels)
        .default(0)
        .interact()?;

    show_busy();
    controller
        .create_from_game(&games[picked].path, overrides)
        .await?;
    announce_session(controller);
    Ok(())
}

fn render_from(messages: &[GameMessage], from: usize) {
    let from = from.min(messages.len());
    for message in &messages[from..] {
        println!("{}: {}", style::game_role_label(message.role), message.text);
    }
}

fn edit_agent_config(controller: &mut GameController) -> Result<()> {
    let agents = [GameAgent::Manager, GameAgent::Player];
    let labels = ["manager", "player"];
    let picked = Select::new()
        .with_prompt("agent to configure")
        .items(&labels)
        .default(0)
        .interact()?;
    let agent = agents[picked];

    let Some(current) = controller.config(agent).cloned() else {
        return Ok(());
    };
    if let Some(updated) = edit_config(labels[picked], &current)? {
        controller.update_config(agent, updated);
        println!("{}", style::dim("updated locally; syncing to the session shortly"));
    }
    Ok(())
}

async fn show_info(controller: &GameController) {
    match controller.session_id() {
        Some(id) => {
            println!("{} {}", style::accent("session:"), style::value(id));
            if let Some(name) = controller.game_name() {
                println!("{} {}", style::accent("game:"), style::value(name));
            }
            println!(
                "{} {} ({} messages locally)",
                style::accent("status:"),
                controller.status(),
                controller.messages().len()
            );
            match controller.server_session().await {
                Ok(Some(snapshot)) => println!(
                    "{} {} messages, status {}",
                    style::accent("server:"),
                    snapshot.messages.len(),
                    snapshot.status
                ),
                Ok(None) => {}
                Err(err) => warn!("session snapshot fetch failed: {err}"),
            }
        }
        None => println!("{}", style::yellow("no session yet — /new or /pick creates one")),
    }
}
