use crate::error::{ApiError, ApiResult};
use crate::models::RawEvent;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Endpoint paths on the backend, relative to the base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub sports: String,
    pub events: String,
    pub follow: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sports: "/sports".to_string(),
            events: "/events".to_string(),
            follow: "/follow".to_string(),
        }
    }
}

/// Backend location and endpoint layout, passed into the client explicitly
/// rather than read from ambient globals
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub endpoints: Endpoints,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ApiConfig {
    /// Read the base URL from `API_BASE_URL`, falling back to localhost
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            endpoints: Endpoints::default(),
        }
    }
}

/// Successful login/signup responses carry an opaque access token
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct EventsApiClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl EventsApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the list of sport identifiers from `GET /sports`
    pub async fn fetch_sports(&self) -> ApiResult<Vec<String>> {
        let url = format!("{}{}", self.config.base_url, self.config.endpoints.sports);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream {
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch raw events for one sport from `GET /events`.
    /// The bearer token is forwarded opaquely when present; the backend uses
    /// it to resolve the per-user followed flags.
    pub async fn fetch_events(
        &self,
        sport: &str,
        followed: bool,
        token: Option<&str>,
    ) -> ApiResult<Vec<RawEvent>> {
        let url = format!("{}{}", self.config.base_url, self.config.endpoints.events);

        let mut request = self.client.get(&url).query(&[
            ("sport", sport),
            ("followed", if followed { "true" } else { "false" }),
        ]);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream {
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }

    /// Tell the backend to follow or unfollow one event via
    /// `POST /events/{id}/follow`. No response body is assumed beyond the
    /// HTTP status.
    pub async fn set_follow(&self, event_id: &str, follow: bool, token: &str) -> ApiResult<()> {
        let url = format!(
            "{}{}/{}{}",
            self.config.base_url, self.config.endpoints.events, event_id, self.config.endpoints.follow
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "follow": follow }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream {
                status: response.status(),
            });
        }

        Ok(())
    }

    /// Exchange credentials for an access token via `POST /login`
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        self.auth_request("/login", email, password).await
    }

    /// Create an account and receive an access token via `POST /signup`
    pub async fn signup(&self, email: &str, password: &str) -> ApiResult<String> {
        self.auth_request("/signup", email, password).await
    }

    async fn auth_request(&self, path: &str, email: &str, password: &str) -> ApiResult<String> {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream {
                status: response.status(),
            });
        }

        let body: TokenResponse = response.json().await?;
        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_localhost() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5001");
        assert_eq!(config.endpoints.sports, "/sports");
        assert_eq!(config.endpoints.events, "/events");
        assert_eq!(config.endpoints.follow, "/follow");
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_sports_live() {
        dotenv::dotenv().ok();
        let client = EventsApiClient::new(ApiConfig::from_env());

        let sports = client.fetch_sports().await.unwrap();
        assert!(!sports.is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_events_live() {
        dotenv::dotenv().ok();
        let client = EventsApiClient::new(ApiConfig::from_env());

        let events = client.fetch_events("all", false, None).await.unwrap();
        assert!(!events.is_empty());
    }
}
