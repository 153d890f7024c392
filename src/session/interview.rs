//! Interview session controller.
//!
//! Single source of truth for one interview session: identity, append-only
//! message history, forward-only lifecycle status, and the two role
//! configs. Every server interaction goes through the injected
//! [`InterviewApi`] handle; mutating operations take `&mut self`, which
//! statically rules out overlapping calls against one controller.

use super::debounce::Debouncer;
use crate::api::{
    AgentConfig, ExportFormat, InterviewApi, Message, Role, SessionSnapshot, SessionStatus,
};
use crate::error::Result;
use crate::transcript;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Quiet period before an edited config is pushed to the server.
pub const CONFIG_PUSH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct InterviewController {
    api: Arc<dyn InterviewApi>,
    session_id: Option<String>,
    messages: Vec<Message>,
    status: SessionStatus,
    interviewer_config: Option<AgentConfig>,
    respondent_config: Option<AgentConfig>,
    loading: bool,
    debounce: Debouncer<Role>,
}

impl InterviewController {
    pub fn new(api: Arc<dyn InterviewApi>) -> Self {
        Self {
            api,
            session_id: None,
            messages: Vec::new(),
            status: SessionStatus::Created,
            interviewer_config: None,
            respondent_config: None,
            loading: false,
            debounce: Debouncer::new(CONFIG_PUSH_DEBOUNCE),
        }
    }

    /// Fetch the defaults bundle and seed both role configs. Called once at
    /// startup. Fails open: on error the controller stays not-ready and the
    /// caller shows a placeholder instead of the chat loop. No retry.
    pub async fn initialize(&mut self) {
        match self.api.defaults().await {
            Ok(defaults) => {
                self.interviewer_config = Some(defaults.interviewer_config());
                self.respondent_config = Some(defaults.respondent_config());
            }
            Err(err) => warn!("failed to load interview defaults: {err}"),
        }
    }

    /// Create a fresh server session from the current configs. No-op until
    /// both configs are seeded. On success the id, messages, and status are
    /// replaced together as one atomic state update.
    pub async fn create_session(&mut self) -> Result<()> {
        let (Some(interviewer), Some(respondent)) = (
            self.interviewer_config.clone(),
            self.respondent_config.clone(),
        ) else {
            debug!("create_session skipped: configs not initialized");
            return Ok(());
        };

        self.loading = true;
        let result = self.api.create_session(&interviewer, &respondent).await;
        self.loading = false;

        let session = result?;
        self.session_id = Some(session.id);
        self.messages.clear();
        self.status = SessionStatus::Created;
        Ok(())
    }

    /// Ask the server for the opening message. Appends it and activates the
    /// session. Not guarded against double-invocation: each call appends
    /// another opening message.
    pub async fn start(&mut self) -> Result<()> {
        let Some(id) = self.session_id.clone() else {
            debug!("start skipped: no session");
            return Ok(());
        };

        self.loading = true;
        let result = self.api.start_session(&id).await;
        self.loading = false;

        let started = result?;
        self.messages.push(started.message);
        self.status = SessionStatus::Active;
        Ok(())
    }

    /// Submit the human's respondent turn; the server echoes it back along
    /// with the interviewer's follow-up, appended in that order.
    pub async fn send_turn(&mut self, text: &str) -> Result<()> {
        let Some(id) = self.session_id.clone() else {
            debug!("send_turn skipped: no session");
            return Ok(());
        };
        if self.status != SessionStatus::Active {
            debug!("send_turn skipped: session not active");
            return Ok(());
        }

        self.loading = true;
        let result = self.api.send_message(&id, text).await;
        self.loading = false;

        let exchange = result?;
        self.messages.push(exchange.respondent_message);
        self.messages.push(exchange.interviewer_message);
        Ok(())
    }

    /// One autonomous exchange: the server supplies both sides.
    pub async fn simulate_turn(&mut self) -> Result<()> {
        let Some(id) = self.session_id.clone() else {
            debug!("simulate_turn skipped: no session");
            return Ok(());
        };
        if self.status != SessionStatus::Active {
            debug!("simulate_turn skipped: session not active");
            return Ok(());
        }

        self.loading = true;
        let result = self.api.simulate_turn(&id).await;
        self.loading = false;

        let exchange = result?;
        self.messages.push(exchange.respondent_message);
        self.messages.push(exchange.interviewer_message);
        Ok(())
    }

    /// Run up to `max_turns` autonomous exchanges. The returned batch is
    /// appended in one update and the session is marked ended regardless of
    /// whether the server reached a natural end condition.
    pub async fn simulate_all(&mut self, max_turns: u32) -> Result<()> {
        let Some(id) = self.session_id.clone() else {
            debug!("simulate_all skipped: no session");
            return Ok(());
        };

        self.loading = true;
        let result = self.api.simulate_all(&id, max_turns).await;
        self.loading = false;

        let response = result?;
        self.messages.extend(response.new_messages);
        self.status = SessionStatus::Ended;
        Ok(())
    }

    /// Replace the local config for `role` immediately; if a session exists,
    /// schedule a debounced push of only that role's config. A newer edit to
    /// the same role re-arms the timer; the other role's timer is untouched.
    /// Push failures are logged, never surfaced.
    pub fn update_config(&mut self, role: Role, config: AgentConfig) {
        match role {
            Role::Interviewer => self.interviewer_config = Some(config.clone()),
            Role::Respondent => self.respondent_config = Some(config.clone()),
        }

        let Some(id) = self.session_id.clone() else {
            return;
        };

        let api = Arc::clone(&self.api);
        self.debounce.schedule(role, async move {
            let (interviewer, respondent) = match role {
                Role::Interviewer => (Some(&config), None),
                Role::Respondent => (None, Some(&config)),
            };
            if let Err(err) = api.update_config(&id, interviewer, respondent).await {
                warn!("config push for {role} failed: {err}");
            }
        });
    }

    /// Fetch the export and write it next to `dir` under a name derived from
    /// the session id. Returns `None` when no session exists.
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
        let path = transcript::save_export(dir, &format!("transcript-{id}"), &export)?;
        Ok(Some(path))
    }

    /// Server-side snapshot of the current session, for display only; local
    /// state is never replaced from it.
    pub async fn server_session(&self) -> Result<Option<SessionSnapshot>> {
        let Some(id) = self.session_id.as_deref() else {
            return Ok(None);
        };
        Ok(Some(self.api.session(id).await?))
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once `initialize` has seeded both configs.
    pub fn is_ready(&self) -> bool {
        self.interviewer_config.is_some() && self.respondent_config.is_some()
    }

    pub fn config(&self, role: Role) -> Option<&AgentConfig> {
        match role {
            Role::Interviewer => self.interviewer_config.as_ref(),
            Role::Respondent => self.respondent_config.as_ref(),
        }
    }
}
