//! services/client/src/adapters/profile.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use phishing_quiz_core::domain::Profile;
use phishing_quiz_core::ports::{PortResult, ProfileService};
use serde::Deserialize;
use uuid::Uuid;

use super::http::HttpBackend;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
    user_id: Uuid,
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    total_points: i64,
    #[serde(default)]
    current_streak_days: u32,
    #[serde(default)]
    best_streak_days: u32,
    last_active_date: Option<NaiveDate>,
}

impl ProfileRecord {
    fn to_domain(self) -> Profile {
        Profile {
            user_id: self.user_id,
            email: self.email,
            username: self.username,
            total_points: self.total_points,
            current_streak_days: self.current_streak_days,
            best_streak_days: self.best_streak_days,
            last_active_date: self.last_active_date,
        }
    }
}

#[derive(Clone)]
pub struct HttpProfileAdapter {
    backend: HttpBackend,
}

impl HttpProfileAdapter {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ProfileService for HttpProfileAdapter {
    async fn my_profile(&self) -> PortResult<Profile> {
        let record: ProfileRecord = self.backend.get_json("/profile/me", &[]).await?;
        Ok(record.to_domain())
    }
}
