//! crates/phishing_quiz_core/src/session.rs
//!
//! The explicit session value handed to every page. It replaces reading
//! tokens out of ambient storage: pages ask the session whether the user is
//! logged in or an admin, and the answer comes from typed claims.

/// The two opaque tokens issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl Role {
    /// Parses a role claim value. Matching is case-insensitive.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else if trimmed.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Other(trimmed.to_string())
        }
    }
}

/// Claims carried by the access token that the client cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Claims {
    pub subject: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<Role>,
}

impl Claims {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub tokens: Option<TokenPair>,
    /// `None` when the token could not be decoded.
    pub claims: Option<Claims>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(tokens: TokenPair, claims: Option<Claims>) -> Self {
        Self {
            tokens: Some(tokens),
            claims,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens
            .as_ref()
            .map(|t| t.access_token.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// Absent or undecodable claims never grant admin.
    pub fn is_admin(&self) -> bool {
        self.is_logged_in()
            && self
                .claims
                .as_ref()
                .is_some_and(|c| c.has_role(&Role::Admin))
    }
}
