//! `reqwest`-backed implementation of the backend API traits.
//!
//! Every trait method issues exactly one HTTP exchange. Non-success
//! responses surface as [`ApiError::Status`] with the status code and raw
//! body text; success bodies are decoded and returned as-is.

use super::traits::{GameApi, InterviewApi};
use super::types::{
    AgentConfig, Defaults, ExchangeResponse, ExportFormat, GameDefaults, GameInfo,
    GameSessionSnapshot, GameTurnResponse, SessionSnapshot, SimulateAllResponse, StartResponse,
    TranscriptExport,
};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Pooled client shared by every exchange. Timeouts bound a single request;
/// there is no retry or abort layer above this.
pub fn build_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug)]
pub struct HttpClient {
    /// Base URL including the `/api` prefix, no trailing slash.
    base_url: String,
    client: Client,
}

// ── Request bodies ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    interviewer_config: &'a AgentConfig,
    respondent_config: &'a AgentConfig,
}

#[derive(Debug, Serialize)]
struct UpdateConfigRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    interviewer_config: Option<&'a AgentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    respondent_config: Option<&'a AgentConfig>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateGameSessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    game_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    param_overrides: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manager_config: Option<&'a AgentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    player_config: Option<&'a AgentConfig>,
}

#[derive(Debug, Serialize)]
struct UpdateGameConfigRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    manager_config: Option<&'a AgentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    player_config: Option<&'a AgentConfig>,
}

impl HttpClient {
    /// Build a client against a base URL such as `http://127.0.0.1:8000/api`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|err| ApiError::BaseUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            base_url: trimmed.to_string(),
            client: build_http_client(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            method,
            path: path.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|source| ApiError::Transport {
                    method,
                    path: path.to_string(),
                    source,
                })?;
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, request).await?;
        response.json().await.map_err(|source| ApiError::Decode {
            method,
            path: path.to_string(),
            source,
        })
    }

    async fn exchange_text(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<String, ApiError> {
        let response = self.send(method, path, request).await?;
        response.text().await.map_err(|source| ApiError::Decode {
            method,
            path: path.to_string(),
            source,
        })
    }

    async fn fetch_transcript(
        &self,
        path: String,
        format: ExportFormat,
    ) -> Result<TranscriptExport, ApiError> {
        let request = self
            .client
            .get(self.url(&path))
            .query(&[("format", format.as_str())]);
        match format {
            ExportFormat::Json => {
                let value: Value = self.exchange("GET", &path, request).await?;
                Ok(TranscriptExport::Json(value))
            }
            ExportFormat::Csv => {
                let text = self.exchange_text("GET", &path, request).await?;
                Ok(TranscriptExport::Csv(text))
            }
        }
    }
}

#[async_trait]
impl InterviewApi for HttpClient {
    async fn defaults(&self) -> Result<Defaults, ApiError> {
        let path = "/config/defaults";
        self.exchange("GET", path, self.client.get(self.url(path)))
            .await
    }

    async fn create_session(
        &self,
        interviewer: &AgentConfig,
        respondent: &AgentConfig,
    ) -> Result<SessionSnapshot, ApiError> {
        let path = "/sessions";
        let body = CreateSessionRequest {
            interviewer_config: interviewer,
            respondent_config: respondent,
        };
        self.exchange("POST", path, self.client.post(self.url(path)).json(&body))
            .await
    }

    async fn session(&self, id: &str) -> Result<SessionSnapshot, ApiError> {
        let path = format!("/sessions/{id}");
        self.exchange("GET", &path, self.client.get(self.url(&path)))
            .await
    }

    async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/sessions/{id}");
        let _: Value = self
            .exchange("DELETE", &path, self.client.delete(self.url(&path)))
            .await?;
        Ok(())
    }

    async fn update_config(
        &self,
        id: &str,
        interviewer: Option<&AgentConfig>,
        respondent: Option<&AgentConfig>,
    ) -> Result<SessionSnapshot, ApiError> {
        let path = format!("/sessions/{id}/config");
        let body = UpdateConfigRequest {
            interviewer_config: interviewer,
            respondent_config: respondent,
        };
        self.exchange(
            "PATCH",
            &path,
            self.client.patch(self.url(&path)).json(&body),
        )
        .await
    }

    async fn start_session(&self, id: &str) -> Result<StartResponse, ApiError> {
        let path = format!("/sessions/{id}/start");
        self.exchange("POST", &path, self.client.post(self.url(&path)))
            .await
    }

    async fn send_message(&self, id: &str, text: &str) -> Result<ExchangeResponse, ApiError> {
        let path = format!("/sessions/{id}/messages");
        let body = SendMessageRequest { text };
        self.exchange("POST", &path, self.client.post(self.url(&path)).json(&body))
            .await
    }

    async fn simulate_turn(&self, id: &str) -> Result<ExchangeResponse, ApiError> {
        let path = format!("/sessions/{id}/simulate-turn");
        self.exchange("POST", &path, self.client.post(self.url(&path)))
            .await
    }

    async fn simulate_all(
        &self,
        id: &str,
        max_turns: u32,
    ) -> Result<SimulateAllResponse, ApiError> {
        let path = format!("/sessions/{id}/simulate-all");
        let request = self
            .client
            .post(self.url(&path))
            .query(&[("max_turns", max_turns)]);
        self.exchange("POST", &path, request).await
    }

    async fn transcript(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> Result<TranscriptExport, ApiError> {
        self.fetch_transcript(format!("/sessions/{id}/transcript"), format)
            .await
    }
}

#[async_trait]
impl GameApi for HttpClient {
    async fn defaults(&self) -> Result<GameDefaults, ApiError> {
        let path = "/games/config/defaults";
        self.exchange("GET", path, self.client.get(self.url(path)))
            .await
    }

    async fn list_games(&self) -> Result<Vec<GameInfo>, ApiError> {
        let path = "/games";
        self.exchange("GET", path, self.client.get(self.url(path)))
            .await
    }

    async fn create_session(
        &self,
        game_path: Option<&str>,
        param_overrides: Option<&Value>,
        manager: Option<&AgentConfig>,
        player: Option<&AgentConfig>,
    ) -> Result<GameSessionSnapshot, ApiError> {
        let path = "/games/sessions";
        let body = CreateGameSessionRequest {
            game_path,
            param_overrides,
            manager_config: manager,
            player_config: player,
        };
        self.exchange("POST", path, self.client.post(self.url(path)).json(&body))
            .await
    }

    async fn session(&self, id: &str) -> Result<GameSessionSnapshot, ApiError> {
        let path = format!("/games/sessions/{id}");
        self.exchange("GET", &path, self.client.get(self.url(&path)))
            .await
    }

    async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/games/sessions/{id}");
        let _: Value = self
            .exchange("DELETE", &path, self.client.delete(self.url(&path)))
            .await?;
        Ok(())
    }

    async fn update_config(
        &self,
        id: &str,
        manager: Option<&AgentConfig>,
        player: Option<&AgentConfig>,
    ) -> Result<GameSessionSnapshot, ApiError> {
        let path = format!("/games/sessions/{id}/config");
        let body = UpdateGameConfigRequest {
            manager_config: manager,
            player_config: player,
        };
        self.exchange(
            "PATCH",
            &path,
            self.client.patch(self.url(&path)).json(&body),
        )
        .await
    }

    async fn start(&self, id: &str) -> Result<GameTurnResponse, ApiError> {
        let path = format!("/games/sessions/{id}/start");
        self.exchange("POST", &path, self.client.post(self.url(&path)))
            .await
    }

    async fn send_move(&self, id: &str, text: &str) -> Result<GameTurnResponse, ApiError> {
        let path = format!("/games/sessions/{id}/move");
        let body = SendMessageRequest { text };
        self.exchange("POST", &path, self.client.post(self.url(&path)).json(&body))
            .await
    }

    async fn transcript(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> Result<TranscriptExport, ApiError> {
        self.fetch_transcript(format!("/games/sessions/{id}/transcript"), format)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash() {
        let client = HttpClient::new("http://127.0.0.1:8000/api/").unwrap();
        assert_eq!(client.url("/sessions"), "http://127.0.0.1:8000/api/sessions");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::BaseUrl { .. }));
    }

    #[test]
    fn update_config_body_omits_missing_role() {
        let config = AgentConfig {
            system_prompt: "p".into(),
            model: "m".into(),
            temperature: 0.7,
            max_tokens: 200,
        };
        let body = UpdateConfigRequest {
            interviewer_config: Some(&config),
            respondent_config: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("interviewer_config"));
        assert!(!json.contains("respondent_config"));
    }

    #[test]
    fn create_game_session_body_can_be_empty() {
        let body = CreateGameSessionRequest {
            game_path: None,
            param_overrides: None,
            manager_config: None,
            player_config: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), "{}");
    }
}
