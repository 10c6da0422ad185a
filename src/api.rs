// Panel API client: a small blocking HTTP client that fetches a node's
// core configuration from `<panel>/remote/configuration/<token>`.

use crate::error::ConfigureError;
use crate::params::ValidationError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Blocking client bound to one panel. Holds the reqwest client and the
/// parsed base URL of the panel.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

/// Body the panel sends alongside a 403.
#[derive(Deserialize, Debug)]
struct PanelErrorBody {
    error: Option<String>,
}

impl ApiClient {
    /// Build a client for `panel_url`. `timeout` of `None` waits for the
    /// panel indefinitely.
    pub fn new(panel_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigureError> {
        let base_url = parse_base_url(panel_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ConfigureError::ClientBuild)?;
        Ok(ApiClient { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `<panel>/remote/configuration/<token>` with the token encoded as a
    /// single path segment.
    pub fn configuration_url(&self, token: &str) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("remote")
                .push("configuration")
                .push(token);
        }
        url
    }

    /// Issue the single GET for the configuration document and dispatch on
    /// the response status. Only a 200 with a JSON body yields a document.
    ///
    /// Transport errors are stripped of their URL so the token never ends
    /// up in an error message.
    pub fn fetch_configuration(&self, token: &str) -> Result<Value, ConfigureError> {
        let url = self.configuration_url(token);
        debug!(panel = %self.base_url, "requesting configuration");

        let res = self
            .client
            .get(url)
            .send()
            .map_err(|e| ConfigureError::Transport(e.without_url()))?;
        let status = res.status();
        let body = res
            .text()
            .map_err(|e| ConfigureError::Transport(e.without_url()))?;
        debug!(%status, bytes = body.len(), "panel responded");

        match status {
            StatusCode::OK => serde_json::from_str(&body).map_err(ConfigureError::Parse),
            StatusCode::FORBIDDEN => Err(classify_forbidden(body)),
            status => Err(ConfigureError::Status { status }),
        }
    }
}

fn parse_base_url(panel_url: &str) -> Result<Url, ConfigureError> {
    let reject = |reason: String| {
        ConfigureError::Validation(ValidationError {
            parameter: "Panel URL",
            reason,
        })
    };
    let url = Url::parse(&normalize_base_url(panel_url))
        .map_err(|e| reject(format!("'{}' is not a usable URL: {}", panel_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(reject(format!("'{}' cannot be used as a base URL", panel_url)));
    }
    Ok(url)
}

/// Map a 403 body onto the token error it reports.
fn classify_forbidden(body: String) -> ConfigureError {
    let code = serde_json::from_str::<PanelErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error);
    match code.as_deref() {
        Some("token_invalid") => ConfigureError::TokenInvalid,
        Some("token_expired") => ConfigureError::TokenExpired,
        _ => ConfigureError::UnknownPanelError { body },
    }
}

/// Trim trailing slashes and default bare addresses to `http://`.
pub fn normalize_base_url(panel_url: &str) -> String {
    let trimmed = panel_url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
