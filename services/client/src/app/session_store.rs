//! services/client/src/app/session_store.rs
//!
//! Persists the token pair between invocations and rebuilds the typed
//! `Session` from it. Claims come from the JWT payload; the signature is
//! never checked here, the backend does that.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use phishing_quiz_core::session::{Claims, Role, Session, TokenPair};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClientError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    name: Option<String>,
    role: Option<OneOrMany>,
    roles: Option<OneOrMany>,
    #[serde(rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role")]
    ws_role: Option<OneOrMany>,
}

/// Decodes the claims in a JWT's payload segment. Returns `None` for
/// anything that is not a well-formed token.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let raw: RawClaims = match serde_json::from_slice(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("token payload is not a claims object: {}", e);
            return None;
        }
    };

    let roles = [raw.role, raw.roles, raw.ws_role]
        .into_iter()
        .flatten()
        .flat_map(OneOrMany::into_vec)
        .map(|r| Role::parse(&r))
        .collect();

    Some(Claims {
        subject: raw.sub,
        name: raw.name,
        roles,
    })
}

pub fn session_from_tokens(tokens: TokenPair) -> Session {
    let claims = decode_claims(&tokens.access_token);
    Session::new(tokens, claims)
}

/// A JSON file holding the current token pair.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an anonymous session. A corrupt one is an error.
    pub fn load(&self) -> Result<Session, ClientError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::anonymous()),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredTokens = serde_json::from_str(&text)?;
        Ok(session_from_tokens(TokenPair {
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
        }))
    }

    pub fn save(&self, tokens: TokenPair) -> Result<Session, ClientError> {
        let stored = StoredTokens {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        info!(path = %self.path.display(), "Session saved.");
        Ok(session_from_tokens(tokens))
    }

    /// Removes the file. Removing a file that is already gone is fine.
    pub fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) fn fake_jwt(payload: serde_json::Value) -> String {
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", body)
}
