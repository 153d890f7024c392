//! Wire types for the simulation backend.
//!
//! Success responses are decoded into exactly the fields the client
//! consumes; anything else the server sends (`llm_call_info`, `llm_calls`)
//! is ignored rather than validated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

// ── Agent configuration ──────────────────────────────────────────

/// Per-role model settings. A value object: edits replace it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub system_prompt: String,
    pub model: String,
    /// Sampling temperature, 0.0–2.0.
    pub temperature: f64,
    /// Response budget, always positive.
    pub max_tokens: u32,
}

// ── Interview messages ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Interviewer,
    Respondent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

// ── Game messages ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameRole {
    Manager,
    Human,
    Player,
}

/// A game turn. Messages without a visibility flag on the wire are treated
/// as hidden orchestration turns and never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMessage {
    pub role: GameRole,
    pub text: String,
    #[serde(default)]
    pub visible: bool,
}

// ── Session lifecycle ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Created,
    Active,
    Ended,
}

/// Server-authoritative snapshot of an interview session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub interviewer_config: AgentConfig,
    pub respondent_config: AgentConfig,
    pub messages: Vec<Message>,
    pub status: SessionStatus,
}

/// Server-authoritative snapshot of a game session.
#[derive(Debug, Clone, Deserialize)]
pub struct GameSessionSnapshot {
    pub id: String,
    pub manager_config: AgentConfig,
    pub player_config: AgentConfig,
    pub messages: Vec<GameMessage>,
    pub status: SessionStatus,
    #[serde(default)]
    pub realized_params: Value,
    #[serde(default)]
    pub game_name: Option<String>,
}

// ── Defaults bundles ─────────────────────────────────────────────

/// Seed values for new interview sessions (`GET /config/defaults`).
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    pub interviewer_system_prompt: String,
    pub respondent_system_prompt: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Defaults {
    pub fn interviewer_config(&self) -> AgentConfig {
        AgentConfig {
            system_prompt: self.interviewer_system_prompt.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn respondent_config(&self) -> AgentConfig {
        AgentConfig {
            system_prompt: self.respondent_system_prompt.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Seed values for new game sessions (`GET /games/config/defaults`).
#[derive(Debug, Clone, Deserialize)]
pub struct GameDefaults {
    pub manager_system_prompt: String,
    pub player_system_prompt: String,
    pub model: String,
    pub temperature: f64,
    pub manager_max_tokens: u32,
    pub player_max_tokens: u32,
}

impl GameDefaults {
    pub fn manager_config(&self) -> AgentConfig {
        AgentConfig {
            system_prompt: self.manager_system_prompt.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.manager_max_tokens,
        }
    }

    pub fn player_config(&self) -> AgentConfig {
        AgentConfig {
            system_prompt: self.player_system_prompt.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.player_max_tokens,
        }
    }
}

// ── Game definitions ─────────────────────────────────────────────

/// One available game definition (`GET /games`).
#[derive(Debug, Clone, Deserialize)]
pub struct GameInfo {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ── Response envelopes ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    pub message: Message,
}

/// One full exchange: the respondent's turn followed by the interviewer's.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeResponse {
    pub respondent_message: Message,
    pub interviewer_message: Message,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateAllResponse {
    pub new_messages: Vec<Message>,
    pub total_messages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameTurnResponse {
    pub messages: Vec<GameMessage>,
}

// ── Transcript export ────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// Query-string value and file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Opaque export payload, passed through untransformed.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptExport {
    Json(Value),
    Csv(String),
}
