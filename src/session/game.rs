//! Game session controller.
//!
//! Same shape as the interview controller, with two behavioral differences:
//! the human's move is appended optimistically before the server confirms
//! it (and never rolled back), and response batches are filtered to
//! `visible` messages — hidden orchestration turns are dropped.

use super::debounce::Debouncer;
use super::interview::CONFIG_PUSH_DEBOUNCE;
use crate::api::{
    AgentConfig, ExportFormat, GameApi, GameInfo, GameMessage, GameRole, GameSessionSnapshot,
    SessionStatus,
};
use crate::error::Result;
use crate::transcript;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::Display;
use tracing::{debug, warn};

/// The two configurable game agents. The human is a participant, not a
/// configured agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameAgent {
    Manager,
    Player,
}

pub struct GameController {
    api: Arc<dyn GameApi>,
    session_id: Option<String>,
    messages: Vec<GameMessage>,
    status: SessionStatus,
    manager_config: Option<AgentConfig>,
    player_config: Option<AgentConfig>,
    game_name: Option<String>,
    realized_params: Value,
    loading: bool,
    debounce: Debouncer<GameAgent>,
}

impl GameController {
    pub fn new(api: Arc<dyn GameApi>) -> Self {
        Self {
            api,
            session_id: None,
            messages: Vec::new(),
            status: SessionStatus::Created,
            manager_config: None,
            player_config: None,
            game_name: None,
            realized_params: Value::Null,
            loading: false,
            debounce: Debouncer::new(CONFIG_PUSH_DEBOUNCE),
        }
    }

    /// Seed both agent configs from the game defaults bundle. Fails open.
    pub async fn initialize(&mut self) {
        match self.api.defaults().await {
            Ok(defaults) => {
                self.manager_config = Some(defaults.manager_config());
                self.player_config = Some(defaults.player_config());
            }
            Err(err) => warn!("failed to load game defaults: {err}"),
        }
    }

    pub async fn list_games(&self) -> Result<Vec<GameInfo>> {
        Ok(self.api.list_games().await?)
    }

    /// Create a fresh session from the current configs.
    pub async fn create_session(&mut self) -> Result<()> {
        let (Some(manager), Some(player)) =
            (self.manager_config.clone(), self.player_config.clone())
        else {
            debug!("create_session skipped: configs not initialized");
            return Ok(());
        };

        self.loading = true;
        let result = self
            .api
            .create_session(None, None, Some(&manager), Some(&player))
            .await;
        self.loading = false;

        self.adopt(result?, false);
        Ok(())
    }

    /// Create a session from a named game definition. The server realizes
    /// the definition (drawing parameters, applying overrides) and returns
    /// the effective configs, which replace the local ones.
    pub async fn create_from_game(
        &mut self,
        game_path: &str,
        param_overrides: Option<&Value>,
    ) -> Result<()> {
        self.loading = true;
        let result = self
            .api
            .create_session(Some(game_path), param_overrides, None, None)
            .await;
        self.loading = false;

        self.adopt(result?, true);
        Ok(())
    }

    /// One atomic state update: id, messages, and status change together.
    fn adopt(&mut self, session: GameSessionSnapshot, take_configs: bool) {
        self.session_id = Some(session.id);
        self.messages.clear();
        self.status = SessionStatus::Created;
        self.game_name = session.game_name;
        self.realized_params = session.realized_params;
        if take_configs {
            self.manager_config = Some(session.manager_config);
            self.player_config = Some(session.player_config);
        }
    }

    /// Ask the manager to open the game. The opening may already include a
    /// player turn; all visible messages from it are appended.
    pub async fn start(&mut self) -> Result<()> {
        let Some(id) = self.session_id.clone() else {
            debug!("start skipped: no session");
            return Ok(());
        };

        self.loading = true;
        let result = self.api.start(&id).await;
        self.loading = false;

        let turn = result?;
        self.messages.extend(turn.messages.into_iter().filter(|m| m.visible));
        self.status = SessionStatus::Active;
        Ok(())
    }

    /// Submit the human's move. The move is appended to local history
    /// before the server call resolves and is never rolled back, even on
    /// failure — there is no reconciliation path for a failed human turn.
    pub async fn send_move(&mut self, text: &str) -> Result<()> {
        let Some(id) = self.session_id.clone() else {
            debug!("send_move skipped: no session");
            return Ok(());
        };
        if self.status != SessionStatus::Active {
            debug!("send_move skipped: session not active");
            return Ok(());
        }

        self.messages.push(GameMessage {
            role: GameRole::Human,
            text: text.to_string(),
            visible: true,
        });

        self.loading = true;
        let result = self.api.send_move(&id, text).await;
        self.loading = false;

        let turn = result?;
        self.messages.extend(turn.messages.into_iter().filter(|m| m.visible));
        Ok(())
    }

    /// Replace the local config for `agent` immediately; debounce-push to
    /// the server when a session exists. Mirrors the interview controller.
    pub fn update_config(&mut self, agent: GameAgent, config: AgentConfig) {
        match agent {
            GameAgent::Manager => self.manager_config = Some(config.clone()),
            GameAgent::Player => self.player_config = Some(config.clone()),
        }

        let Some(id) = self.session_id.clone() else {
            return;
        };

        let api = Arc::clone(&self.api);
        self.debounce.schedule(agent, async move {
            let (manager, player) = match agent {
                GameAgent::Manager => (Some(&config), None),
                GameAgent::Player => (None, Some(&config)),
            };
            if let Err(err) = api.update_config(&id, manager, player).await {
                warn!("config push for {agent} failed: {err}");
            }
        });
    }

    pub async fn download_transcript(
        &self,
        format: ExportFormat,
        dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(id) = self.session_id.as_deref() else {
            debug!("download_transcript skipped: no session");
            return Ok(None);
        };

        let export = self.api.transcript(id, format).await?;
        let path = transcript::save_export(dir, &format!("game-transcript-{id}"), &export)?;
        Ok(Some(path))
    }

    /// Server-side snapshot for display only.
    pub async fn server_session(&self) -> Result<Option<GameSessionSnapshot>> {
        let Some(id) = self.session_id.as_deref() else {
            return Ok(None);
        };
        Ok(Some(self.api.session(id).await?))
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_ready(&self) -> bool {
        self.manager_config.is_some() && self.player_config.is_some()
    }

    pub fn config(&self, agent: GameAgent) -> Option<&AgentConfig> {
        match agent {
            GameAgent::Manager => self.manager_config.as_ref(),
            GameAgent::Player => self.player_config.as_ref(),
        }
    }

    pub fn game_name(&self) -> Option<&str> {
        self.game_name.as_deref()
    }

    pub fn realized_params(&self) -> &Value {
        &self.realized_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{GameDefaults, GameTurnResponse, TranscriptExport};
    use crate::error::ApiError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::result::Result;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn config(prompt: &str) -> AgentConfig {
        AgentConfig {
            system_prompt: prompt.into(),
            model: "gpt-5-mini".into(),
            temperature: 1.0,
            max_tokens: 2048,
        }
    }

    fn visible(role: GameRole, text: &str) -> GameMessage {
        GameMessage {
            role,
            text: text.into(),
            visible: true,
        }
    }

    fn hidden(role: GameRole, text: &str) -> GameMessage {
        GameMessage {
            role,
            text: text.into(),
            visible: false,
        }
    }

    #[derive(Default)]
    struct MockApi {
        fail_moves: AtomicBool,
        turn_batch: Mutex<Vec<GameMessage>>,
        config_pushes: Mutex<Vec<(Option<AgentConfig>, Option<AgentConfig>)>>,
    }

    impl MockApi {
        fn snapshot(id: &str, game_name: Option<&str>) -> GameSessionSnapshot {
            GameSessionSnapshot {
                id: id.into(),
                manager_config: config("realized manager"),
                player_config: config("realized player"),
                messages: Vec::new(),
                status: SessionStatus::Created,
                realized_params: json!({"endowment": 100}),
                game_name: game_name.map(String::from),
            }
        }
    }

    #[async_trait]
    impl GameApi for MockApi {
        async fn defaults(&self) -> Result<GameDefaults, ApiError> {
            Ok(GameDefaults {
                manager_system_prompt: "run the game".into(),
                player_system_prompt: "play".into(),
                model: "gpt-5-mini".into(),
                temperature: 1.0,
                manager_max_tokens: 2048,
                player_max_tokens: 256,
            })
        }

        async fn list_games(&self) -> Result<Vec<GameInfo>, ApiError> {
            Ok(vec![GameInfo {
                path: "prompts/ultimatum".into(),
                name: "Ultimatum".into(),
                description: Some("split the pot".into()),
            }])
        }

        async fn create_session(
            &self,
            game_path: Option<&str>,
            _param_overrides: Option<&Value>,
            _manager: Option<&AgentConfig>,
            _player: Option<&AgentConfig>,
        ) -> Result<GameSessionSnapshot, ApiError> {
            Ok(Self::snapshot("game-1", game_path.map(|_| "Ultimatum")))
        }

        async fn session(&self, id: &str) -> Result<GameSessionSnapshot, ApiError> {
            Ok(Self::snapshot(id, None))
        }

        async fn delete_session(&self, _id: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn update_config(
            &self,
            id: &str,
            manager: Option<&AgentConfig>,
            player: Option<&AgentConfig>,
        ) -> Result<GameSessionSnapshot, ApiError> {
            self.config_pushes
                .lock()
                .unwrap()
                .push((manager.cloned(), player.cloned()));
            Ok(Self::snapshot(id, None))
        }

        async fn start(&self, _id: &str) -> Result<GameTurnResponse, ApiError> {
            Ok(GameTurnResponse {
                messages: vec![
                    hidden(GameRole::Player, "OFFER 40"),
                    visible(GameRole::Manager, "Round 1: the player offers $40."),
                ],
            })
        }

        async fn send_move(&self, _id: &str, _text: &str) -> Result<GameTurnResponse, ApiError> {
            if self.fail_moves.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: "upstream error".into(),
                });
            }
            Ok(GameTurnResponse {
                messages: self.turn_batch.lock().unwrap().clone(),
            })
        }

        async fn transcript(
            &self,
            _id: &str,
            _format: ExportFormat,
        ) -> Result<TranscriptExport, ApiError> {
            Ok(TranscriptExport::Csv("turn,role,text,visible\n".into()))
        }
    }

    async fn active_controller(api: Arc<MockApi>) -> GameController {
        let mut controller = GameController::new(api);
        controller.initialize().await;
        controller.create_session().await.unwrap();
        controller.start().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn start_appends_only_visible_messages() {
        let controller = active_controller(Arc::new(MockApi::default())).await;

        assert_eq!(controller.status(), SessionStatus::Active);
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].role, GameRole::Manager);
    }

    #[tokio::test]
    async fn send_move_appends_human_message_before_response() {
        let api = Arc::new(MockApi::default());
        *api.turn_batch.lock().unwrap() = vec![
            hidden(GameRole::Player, "ACCEPT"),
            visible(GameRole::Manager, "The player accepts. Final score: 60/40."),
        ];
        let mut controller = active_controller(Arc::clone(&api)).await;

        controller.send_move("I offer 60/40").await.unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, GameRole::Human);
        assert_eq!(messages[1].text, "I offer 60/40");
        assert!(messages[1].visible);
        // Hidden player turn was filtered out of the response batch.
        assert_eq!(messages[2].role, GameRole::Manager);
    }

    #[tokio::test]
    async fn failed_move_keeps_optimistic_human_message() {
        let api = Arc::new(MockApi::default());
        let mut controller = active_controller(Arc::clone(&api)).await;
        api.fail_moves.store(true, Ordering::SeqCst);

        let result = controller.send_move("doomed move").await;

        assert!(result.is_err());
        let messages = controller.messages();
        assert_eq!(messages.last().unwrap().text, "doomed move");
        assert_eq!(messages.last().unwrap().role, GameRole::Human);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn send_move_requires_active_status() {
        let mut controller = GameController::new(Arc::new(MockApi::default()));
        controller.initialize().await;
        controller.create_session().await.unwrap();

        controller.send_move("too early").await.unwrap();

        assert!(controller.messages().is_empty());
    }

    #[tokio::test]
    async fn create_from_game_adopts_realized_configs() {
        let mut controller = GameController::new(Arc::new(MockApi::default()));
        controller.initialize().await;

        controller
            .create_from_game("prompts/ultimatum", Some(&json!({"endowment": 100})))
            .await
            .unwrap();

        assert_eq!(controller.game_name(), Some("Ultimatum"));
        assert_eq!(
            controller.config(GameAgent::Manager).unwrap().system_prompt,
            "realized manager"
        );
        assert_eq!(controller.realized_params()["endowment"], 100);
    }

    #[tokio::test]
    async fn create_session_keeps_local_configs() {
        let mut controller = GameController::new(Arc::new(MockApi::default()));
        controller.initialize().await;

        controller.create_session().await.unwrap();

        assert_eq!(
            controller.config(GameAgent::Manager).unwrap().system_prompt,
            "run the game"
        );
    }

    #[tokio::test]
    async fn config_edits_debounce_per_agent() {
        let api = Arc::new(MockApi::default());
        let mut controller = GameController::new(api.clone());
        controller.initialize().await;
        controller.create_session().await.unwrap();

        controller.update_config(GameAgent::Manager, config("stricter rules"));
        controller.update_config(GameAgent::Player, config("bolder play"));
        tokio::time::sleep(CONFIG_PUSH_DEBOUNCE + std::time::Duration::from_millis(200)).await;

        let pushes = api.config_pushes.lock().unwrap();
        assert_eq!(pushes.len(), 2);
        assert!(pushes.iter().any(|(m, p)| m.is_some() && p.is_none()));
        assert!(pushes.iter().any(|(m, p)| p.is_some() && m.is_none()));
    }

    #[tokio::test]
    async fn download_transcript_writes_csv_verbatim() {
        let controller = active_controller(Arc::new(MockApi::default())).await;
        let dir = tempfile::tempdir().unwrap();

        let path = controller
            .download_transcript(ExportFormat::Csv, dir.path())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "game-transcript-game-1.csv");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "turn,role,text,visible\n"
        );
    }
}
