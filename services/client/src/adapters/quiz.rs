//! services/client/src/adapters/quiz.rs
//!
//! This module contains the adapter for the daily quiz endpoints.
//! It implements the `QuizService` port from the `core` crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use phishing_quiz_core::domain::{AnswerOutcome, Channel, LeaderboardEntry, QuizItem, TodayQuiz};
use phishing_quiz_core::ports::{PortResult, QuizService};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::http::HttpBackend;

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodayQuizRecord {
    date: NaiveDate,
    #[serde(default)]
    items: Vec<QuizItemRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizItemRecord {
    id: Uuid,
    channel: u8,
    #[serde(default)]
    sender: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body_preview: String,
}

impl QuizItemRecord {
    fn to_domain(self) -> QuizItem {
        QuizItem {
            id: self.id,
            channel: Channel::from_code(self.channel),
            sender: self.sender,
            subject: self.subject.filter(|s| !s.trim().is_empty()),
            body_preview: self.body_preview,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    quiz_item_id: Uuid,
    answer_is_phishing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResponse {
    correct: bool,
    #[serde(default)]
    points_awarded: i64,
    #[serde(default)]
    total_points: i64,
    #[serde(default)]
    current_streak_days: u32,
    #[serde(default)]
    best_streak_days: u32,
    #[serde(default)]
    explanation_title: Option<String>,
    #[serde(default)]
    explanation_text: String,
}

impl AnswerResponse {
    fn to_domain(self) -> AnswerOutcome {
        AnswerOutcome {
            correct: self.correct,
            points_awarded: self.points_awarded,
            total_points: self.total_points,
            current_streak_days: self.current_streak_days,
            best_streak_days: self.best_streak_days,
            explanation_title: self.explanation_title.filter(|t| !t.trim().is_empty()),
            explanation_text: self.explanation_text,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardRecord {
    rank: Option<u32>,
    display_name: Option<String>,
    #[serde(default)]
    total_points: i64,
    #[serde(default)]
    current_streak_days: u32,
    #[serde(default)]
    best_streak_days: u32,
}

impl LeaderboardRecord {
    fn to_domain(self, position: usize) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: self.rank.unwrap_or(position as u32 + 1),
            display_name: self
                .display_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "User".to_string()),
            total_points: self.total_points,
            current_streak_days: self.current_streak_days,
            best_streak_days: self.best_streak_days,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct HttpQuizAdapter {
    backend: HttpBackend,
}

impl HttpQuizAdapter {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl QuizService for HttpQuizAdapter {
    async fn today_quiz(&self) -> PortResult<TodayQuiz> {
        let record: TodayQuizRecord = self.backend.get_json("/quiz/today", &[]).await?;
        Ok(TodayQuiz {
            date: record.date,
            items: record.items.into_iter().map(QuizItemRecord::to_domain).collect(),
        })
    }

    async fn submit_answer(
        &self,
        item_id: Uuid,
        answer_is_phishing: bool,
    ) -> PortResult<AnswerOutcome> {
        let request = AnswerRequest {
            quiz_item_id: item_id,
            answer_is_phishing,
        };
        let record: AnswerResponse = self.backend.post_json("/quiz/answer", &request).await?;
        Ok(record.to_domain())
    }

    async fn leaderboard(&self, limit: u32) -> PortResult<Vec<LeaderboardEntry>> {
        let records: Vec<LeaderboardRecord> = self
            .backend
            .get_json("/quiz/leaderboard", &[("limit", limit.to_string())])
            .await?;
        Ok(records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.to_domain(i))
            .collect())
    }
}
