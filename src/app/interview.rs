//! Interactive interview chat loop.

use super::{edit_config, show_busy};
use crate::api::{ExportFormat, InterviewApi, Message, Role, SessionStatus};
use crate::config::Config;
use crate::session::InterviewController;
use crate::ui::style;
use anyhow::Result;
use dialoguer::{Input, Select};
use std::sync::Arc;
use tracing::{error, warn};

const HELP: &str =
    "/new  /start  /sim  /simall [n]  /save [json|csv]  /config  /info  /quit — anything else is sent as your reply";

pub async fn run(
    api: Arc<dyn InterviewApi>,
    config: &Config,
    max_turns_override: Option<u32>,
) -> Result<()> {
    let mut controller = InterviewController::new(api);
    println!("{}", style::dim("loading defaults…"));
    controller.initialize().await;
    if !controller.is_ready() {
        println!(
            "{}",
            style::yellow("Could not load defaults from the backend; is the server running?")
        );
        return Ok(());
    }

    let default_max_turns = max_turns_override.unwrap_or(config.simulate.max_turns);
    let export_dir = config.export_dir();

    println!("{}", style::header("Parley — interview mode"));
    println!("{}", style::dim(HELP));

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
                    Ok(()) => match controller.session_id() {
                        Some(id) => println!("{} {}", style::success("session"), style::value(id)),
                        None => println!("{}", style::yellow("defaults not loaded; nothing created")),
                    },
                    Err(err) => error!("create session failed: {err}"),
                }
            }
            "/start" => {
                show_busy();
                if let Err(err) = controller.start().await {
                    error!("start failed: {err}");
                }
            }
            "/sim" => {
                show_busy();
                if let Err(err) = controller.simulate_turn().await {
                    error!("simulate turn failed: {err}");
                }
            }
            "/simall" => {
                let max_turns = words
                    .next()
                    .and_then(|raw| raw.parse::<u32>().ok())
                    .unwrap_or(default_max_turns);
                show_busy();
                if let Err(err) = controller.simulate_all(max_turns).await {
                    error!("simulate all failed: {err}");
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
            "/config" => edit_role_config(&mut controller)?,
            "/info" => show_info(&controller).await,
            _ => {
                if controller.session_id().is_none()
                    || controller.status() != SessionStatus::Active
                {
                    println!("{}", style::yellow("no active session — /new then /start first"));
                    continue;
                }
                show_busy();
                if let Err(err) = controller.send_turn(&line).await {
                    error!("send failed: {err}");
                }
            }
        }

        render_from(controller.messages(), rendered);
        if controller.status() == SessionStatus::Ended {
            println!("{}", style::dim("interview ended — /new starts a fresh session"));
        }
    }

    Ok(())
}

fn render_from(messages: &[Message], from: usize) {
    let from = from.min(messages.len());
    for message in &messages[from..] {
        println!("{}: {}", style::role_label(message.role), message.text);
    }
}

fn edit_role_config(controller: &mut InterviewController) -> Result<()> {
    let roles = [Role::Interviewer, Role::Respondent];
    let labels = ["interviewer", "respondent"];
    let picked = Select::new()
        .with_prompt("role to configure")
        .items(&labels)
        .default(0)
        .interact()?;
    let role = roles[picked];

    let Some(current) = controller.config(role).cloned() else {
        return Ok(());
    };
    if let Some(updated) = edit_config(labels[picked], &current)? {
        controller.update_config(role, updated);
        println!("{}", style::dim("updated locally; syncing to the session shortly"));
    }
    Ok(())
}

async fn show_info(controller: &InterviewController) {
    match controller.session_id() {
        Some(id) => {
            println!("{} {}", style::accent("session:"), style::value(id));
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
        None => println!("{}", style::yellow("no session yet — /new creates one")),
    }
}
