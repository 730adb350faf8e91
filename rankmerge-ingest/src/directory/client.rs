//! HTTP player directory client
//!
//! GETs the configured search endpoint with the player name and league
//! scope as query parameters. The response body looks like:
//!
//! ```json
//! {"body": {"players": [{"id": "1657581", "fullname": "Mike Trout", ...}]}}
//! ```

use super::{AuthProvider, DirectoryError, PlayerDirectory};
use crate::model::{ExternalCandidate, PlayerProfile};
use async_trait::async_trait;
use rankmerge_common::config::DirectoryConfig;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const USER_AGENT: &str = concat!("rankmerge/", env!("CARGO_PKG_VERSION"));

/// Search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    body: Option<SearchBody>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    players: Option<Vec<DirectoryPlayer>>,
}

/// One player entry as the directory returns it
///
/// Ids and flags arrive as strings or numbers depending on the endpoint
/// version, so those are kept as raw JSON values.
#[derive(Debug, Deserialize)]
struct DirectoryPlayer {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    fullname: Option<String>,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    eligible_positions_display: Option<String>,
    #[serde(default)]
    eligible_positions: Value,
    #[serde(default)]
    pro_team: Option<String>,
    #[serde(default)]
    owned_by_team_id: Value,
    #[serde(default)]
    free_agent: Value,
}

impl DirectoryPlayer {
    /// Convert to a candidate; entries without an id or a name are dropped
    fn into_candidate(self) -> Option<ExternalCandidate> {
        let external_id = scalar_to_string(&self.id)?;

        let full_name = self.fullname.filter(|n| !n.trim().is_empty()).or_else(|| {
            let joined = format!(
                "{} {}",
                self.firstname.as_deref().unwrap_or(""),
                self.lastname.as_deref().unwrap_or("")
            );
            let joined = joined.trim().to_string();
            (!joined.is_empty()).then_some(joined)
        })?;

        let mut profile = match self.lastname.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(last) => PlayerProfile::new(full_name, last),
            None => PlayerProfile::from_full_name(full_name),
        }
        .ok()?;

        if let Some(first) = self.firstname {
            profile = profile.with_first_name(first);
        }
        profile.position = self.position.as_deref().and_then(|p| p.parse().ok());
        profile.eligible_positions = match self.eligible_positions_display {
            Some(display) => split_positions(&display),
            None => positions_from_value(&self.eligible_positions),
        };
        profile.pro_team = self.pro_team.filter(|t| !t.trim().is_empty());
        profile.owned_by_team_id = scalar_to_string(&self.owned_by_team_id);
        profile.is_free_agent = flag(&self.free_agent);

        Some(ExternalCandidate::new(external_id, profile))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
        _ => false,
    }
}

fn split_positions(display: &str) -> Vec<String> {
    display
        .split([',', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn positions_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_positions(s),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .flat_map(split_positions)
            .collect(),
        _ => Vec::new(),
    }
}

fn as_flag(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        "0"
    }
}

/// Player directory over HTTP
pub struct HttpDirectoryClient {
    http_client: reqwest::Client,
    config: DirectoryConfig,
    auth: Arc<dyn AuthProvider>,
    token: RwLock<Option<String>>,
}

impl HttpDirectoryClient {
    pub fn new(config: DirectoryConfig, auth: Arc<dyn AuthProvider>) -> Result<Self, DirectoryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| DirectoryError::unavailable("", format!("Client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            config,
            auth,
            token: RwLock::new(None),
        })
    }

    async fn current_token(&self) -> Result<String, DirectoryError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut slot = self.token.write().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.auth.auth_token().await?;
        *slot = Some(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl PlayerDirectory for HttpDirectoryClient {
    async fn begin_run(&self) -> Result<(), DirectoryError> {
        let token = self.auth.auth_token().await?;
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>, DirectoryError> {
        let token = self.current_token().await?;

        let mut params: Vec<(&str, &str)> = vec![
            ("response_format", "json"),
            ("access_token", token.as_str()),
            ("name", query),
            ("eligible_only", as_flag(self.config.eligible_only)),
            ("version", self.config.api_version.as_str()),
            ("free_agents_only", as_flag(self.config.free_agents_only)),
        ];
        if let Some(league_id) = self.config.league_id.as_deref() {
            params.push(("league_id", league_id));
        }

        tracing::debug!(query = %query, url = %self.config.search_url, "Querying player directory");

        let response = self
            .http_client
            .get(&self.config.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DirectoryError::unavailable(query, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DirectoryError::unavailable(
                query,
                format!("HTTP {}: {}", status.as_u16(), error_text.trim()),
            ));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::unavailable(query, format!("Parse error: {}", e)))?;

        let candidates: Vec<ExternalCandidate> = parsed
            .body
            .and_then(|body| body.players)
            .unwrap_or_default()
            .into_iter()
            .filter_map(DirectoryPlayer::into_candidate)
            .collect();

        tracing::debug!(query = %query, count = candidates.len(), "Player directory results");
        Ok(candidates)
    }
}
