use super::types::{
    AgentConfig, Defaults, ExchangeResponse, ExportFormat, GameDefaults, GameInfo,
    GameSessionSnapshot, GameTurnResponse, SessionSnapshot, SimulateAllResponse, StartResponse,
    TranscriptExport,
};
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// Interview surface of the backend (`/api/sessions`, `/api/config`).
///
/// One HTTP exchange per call, no retries. Object-safe so controllers take
/// an `Arc<dyn InterviewApi>` and tests substitute a recording fake.
#[async_trait]
pub trait InterviewApi: Send + Sync {
    async fn defaults(&self) -> Result<Defaults, ApiError>;

    async fn create_session(
        &self,
        interviewer: &AgentConfig,
        respondent: &AgentConfig,
    ) -> Result<SessionSnapshot, ApiError>;

    async fn session(&self, id: &str) -> Result<SessionSnapshot, ApiError>;

    /// Exposed for completeness; the chat loop never discards sessions.
    async fn delete_session(&self, id: &str) -> Result<(), ApiError>;

    /// Push updated config for one or both roles. A role passed as `None`
    /// is absent from the request body and left untouched server-side.
    async fn update_config(
        &self,
        id: &str,
        interviewer: Option<&AgentConfig>,
        respondent: Option<&AgentConfig>,
    ) -> Result<SessionSnapshot, ApiError>;

    async fn start_session(&self, id: &str) -> Result<StartResponse, ApiError>;

    async fn send_message(&self, id: &str, text: &str) -> Result<ExchangeResponse, ApiError>;

    async fn simulate_turn(&self, id: &str) -> Result<ExchangeResponse, ApiError>;

    async fn simulate_all(&self, id: &str, max_turns: u32)
    -> Result<SimulateAllResponse, ApiError>;

    async fn transcript(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> Result<TranscriptExport, ApiError>;
}

/// Game surface of the backend (`/api/games/...`).
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn defaults(&self) -> Result<GameDefaults, ApiError>;

    async fn list_games(&self) -> Result<Vec<GameInfo>, ApiError>;

    /// Create a game session. With a `game_path` the server realizes the
    /// named definition (applying `param_overrides`) and the explicit
    /// configs are ignored; without one the configs seed the session.
    async fn create_session(
        &self,
        game_path: Option<&str>,
        param_overrides: Option<&Value>,
        manager: Option<&AgentConfig>,
        player: Option<&AgentConfig>,
    ) -> Result<GameSessionSnapshot, ApiError>;

    async fn session(&self, id: &str) -> Result<GameSessionSnapshot, ApiError>;

    async fn delete_session(&self, id: &str) -> Result<(), ApiError>;

    async fn update_config(
        &self,
        id: &str,
        manager: Option<&AgentConfig>,
        player: Option<&AgentConfig>,
    ) -> Result<GameSessionSnapshot, ApiError>;

    async fn start(&self, id: &str) -> Result<GameTurnResponse, ApiError>;

    async fn send_move(&self, id: &str, text: &str) -> Result<GameTurnResponse, ApiError>;

    async fn transcript(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> Result<TranscriptExport, ApiError>;
}
