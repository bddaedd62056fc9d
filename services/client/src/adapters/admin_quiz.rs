//! services/client/src/adapters/admin_quiz.rs
//!
//! Adapter for the admin quiz management endpoints. Implements the
//! `AdminQuizService` port.

use async_trait::async_trait;
use chrono::NaiveDate;
use phishing_quiz_core::domain::{AdminQuizDraft, AdminQuizItemDraft, Channel};
use phishing_quiz_core::ports::{AdminQuizService, PortResult};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::HttpBackend;

/// An item draft as stored by the backend. Missing fields default to empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDraftRecord {
    channel: Option<u8>,
    sender: Option<String>,
    subject: Option<String>,
    body_preview: Option<String>,
    #[serde(default)]
    is_phishing: bool,
    explanation_title: Option<String>,
    explanation_text: Option<String>,
}

impl ItemDraftRecord {
    fn to_domain(self) -> AdminQuizItemDraft {
        AdminQuizItemDraft {
            channel: self.channel.map(Channel::from_code).unwrap_or_default(),
            sender: self.sender.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            body_preview: self.body_preview.unwrap_or_default(),
            is_phishing: self.is_phishing,
            explanation_title: self.explanation_title.unwrap_or_default(),
            explanation_text: self.explanation_text.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemDraftPayload<'a> {
    channel: u8,
    sender: &'a str,
    subject: &'a str,
    body_preview: &'a str,
    is_phishing: bool,
    explanation_title: &'a str,
    explanation_text: &'a str,
}

impl<'a> From<&'a AdminQuizItemDraft> for ItemDraftPayload<'a> {
    fn from(draft: &'a AdminQuizItemDraft) -> Self {
        Self {
            channel: draft.channel.code(),
            sender: draft.sender.trim(),
            // SMS items carry no subject.
            subject: match draft.channel {
                Channel::Email => draft.subject.trim(),
                Channel::Sms => "",
            },
            body_preview: draft.body_preview.trim(),
            is_phishing: draft.is_phishing,
            explanation_title: draft.explanation_title.trim(),
            explanation_text: draft.explanation_text.trim(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateQuizPayload<'a> {
    date: NaiveDate,
    items: Vec<ItemDraftPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct UpdateQuizPayload<'a> {
    items: Vec<ItemDraftPayload<'a>>,
}

#[derive(Clone)]
pub struct HttpAdminQuizAdapter {
    backend: HttpBackend,
}

impl HttpAdminQuizAdapter {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AdminQuizService for HttpAdminQuizAdapter {
    async fn quiz_items_for(&self, date: NaiveDate) -> PortResult<Option<Vec<AdminQuizItemDraft>>> {
        let records: Option<Vec<ItemDraftRecord>> = self
            .backend
            .get_json_opt("/admin/quizzes/items", &[("date", date.to_string())])
            .await?;
        Ok(records
            .filter(|items| !items.is_empty())
            .map(|items| items.into_iter().map(ItemDraftRecord::to_domain).collect()))
    }

    async fn create_quiz(&self, draft: &AdminQuizDraft) -> PortResult<()> {
        let payload = CreateQuizPayload {
            date: draft.date,
            items: draft.items.iter().map(ItemDraftPayload::from).collect(),
        };
        self.backend
            .send_unit(Method::POST, "/admin/quizzes", Some(&payload))
            .await
    }

    async fn update_quiz(&self, date: NaiveDate, items: &[AdminQuizItemDraft]) -> PortResult<()> {
        let payload = UpdateQuizPayload {
            items: items.iter().map(ItemDraftPayload::from).collect(),
        };
        self.backend
            .send_unit(Method::PUT, &format!("/admin/quizzes/{}", date), Some(&payload))
            .await
    }

    async fn delete_quiz(&self, date: NaiveDate) -> PortResult<()> {
        self.backend.delete(&format!("/admin/quizzes/{}", date)).await
    }
}
