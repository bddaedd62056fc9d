//! services/client/src/adapters/auth.rs
//!
//! Adapter for the account endpoints. Implements the `AuthService` port.

use async_trait::async_trait;
use phishing_quiz_core::ports::{AuthService, PortError, PortResult};
use phishing_quiz_core::session::TokenPair;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::http::HttpBackend;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    user_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokensRecord {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl TokensRecord {
    fn into_pair(self) -> Option<TokenPair> {
        let access_token = self.access_token.filter(|t| !t.is_empty())?;
        Some(TokenPair {
            access_token,
            refresh_token: self.refresh_token,
        })
    }
}

#[derive(Clone)]
pub struct HttpAuthAdapter {
    backend: HttpBackend,
}

impl HttpAuthAdapter {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AuthService for HttpAuthAdapter {
    async fn login(&self, email: &str, password: &str) -> PortResult<TokenPair> {
        let record: TokensRecord = self
            .backend
            .post_json("/auth/login", &LoginRequest { email, password })
            .await?;
        record
            .into_pair()
            .ok_or_else(|| PortError::Rejected("Login response had no access token".into()))
    }

    /// Registers, then logs in when the registration response carries no token.
    async fn register(&self, user_name: &str, email: &str, password: &str) -> PortResult<TokenPair> {
        let request = RegisterRequest {
            user_name,
            email,
            password,
        };
        // Some deployments answer 201 with an empty body.
        let record = self
            .backend
            .post_json_opt::<_, TokensRecord>("/auth/register", &request)
            .await?
            .unwrap_or_default();

        match record.into_pair() {
            Some(pair) => Ok(pair),
            None => {
                info!("Registration returned no token; logging in.");
                self.login(email, password).await
            }
        }
    }

    async fn logout(&self) -> PortResult<()> {
        if let Err(e) = self
            .backend
            .send_unit(Method::POST, "/auth/logout", Some(&json!({})))
            .await
        {
            warn!("Logout request failed, ignoring: {}", e);
        }
        Ok(())
    }
}
