use crate::api::{GameRole, Role};
use console::style;
use std::fmt::Display;

/// Green bold — success checkmarks, confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold — section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim — subtitles, secondary text, busy indicator
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow — warnings, skipped actions
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green — confirmed values, paths, names
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan bold — prompts, field labels
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Colored speaker label for interview transcript lines.
pub fn role_label(role: Role) -> String {
    match role {
        Role::Interviewer => style(role).cyan().bold().to_string(),
        Role::Respondent => style(role).green().bold().to_string(),
    }
}

/// Colored speaker label for game transcript lines.
pub fn game_role_label(role: GameRole) -> String {
    match role {
        GameRole::Manager => style(role).yellow().bold().to_string(),
        GameRole::Human => style(role).white().bold().to_string(),
        GameRole::Player => style(role).magenta().bold().to_string(),
    }
}
