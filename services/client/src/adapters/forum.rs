//! services/client/src/adapters/forum.rs
//!
//! Adapter for the community forum endpoints. Implements the `ForumService`
//! port. Posts are returned in backend order; pages sort them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use phishing_quiz_core::domain::{ForumPost, NewForumPost};
use phishing_quiz_core::ports::{ForumService, PortResult};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::http::HttpBackend;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForumPostRecord {
    id: Uuid,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    is_anonymous: bool,
    created_at_utc: Option<DateTime<Utc>>,
    author_display_name: Option<String>,
}

impl ForumPostRecord {
    fn to_domain(self) -> ForumPost {
        ForumPost {
            id: self.id,
            title: self.title,
            body: self.body,
            is_anonymous: self.is_anonymous,
            created_at: self.created_at_utc,
            author_display_name: self.author_display_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewPostPayload<'a> {
    title: &'a str,
    body: &'a str,
    is_anonymous: bool,
}

#[derive(Clone)]
pub struct HttpForumAdapter {
    backend: HttpBackend,
}

impl HttpForumAdapter {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ForumService for HttpForumAdapter {
    async fn list_posts(&self, page: u32, page_size: u32) -> PortResult<Vec<ForumPost>> {
        let records: Vec<ForumPostRecord> = self
            .backend
            .get_json(
                "/posts",
                &[("page", page.to_string()), ("pageSize", page_size.to_string())],
            )
            .await?;
        Ok(records.into_iter().map(ForumPostRecord::to_domain).collect())
    }

    async fn create_post(&self, post: &NewForumPost) -> PortResult<()> {
        let payload = NewPostPayload {
            title: post.title.trim(),
            body: post.body.trim(),
            is_anonymous: post.is_anonymous,
        };
        self.backend
            .send_unit(Method::POST, "/posts", Some(&payload))
            .await
    }

    async fn delete_post(&self, id: Uuid) -> PortResult<()> {
        self.backend.delete(&format!("/posts/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn adapter(server: &MockServer) -> HttpForumAdapter {
        let backend =
            HttpBackend::new(server.base_url(), Duration::from_secs(5), Some("t".into())).unwrap();
        HttpForumAdapter::new(backend)
    }

    #[tokio::test]
    async fn list_passes_paging_and_reads_timestamps() {
        let server = MockServer::start_async().await;
        let id = Uuid::new_v4();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/posts")
                    .query_param("page", "1")
                    .query_param("pageSize", "20");
                then.status(200).json_body(json!([
                    {
                        "id": id,
                        "title": "Fake parcel SMS",
                        "body": "Got one today",
                        "isAnonymous": false,
                        "createdAtUtc": "2024-05-01T08:30:00Z",
                        "authorDisplayName": "mari"
                    }
                ]));
            })
            .await;

        let posts = adapter(&server).list_posts(1, 20).await.unwrap();
        mock.assert_async().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, id);
        assert_eq!(posts[0].author_label(), "mari");
        assert_eq!(
            posts[0].created_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T08:30:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn create_and_delete() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/posts").json_body(json!({
                    "title": "Heads up",
                    "body": "New scam going around",
                    "isAnonymous": true
                }));
                then.status(201);
            })
            .await;
        let id = Uuid::new_v4();
        let path = format!("/posts/{}", id);
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path(path);
                then.status(204);
            })
            .await;

        let adapter = adapter(&server);
        adapter
            .create_post(&NewForumPost {
                title: " Heads up ".into(),
                body: "New scam going around\n".into(),
                is_anonymous: true,
            })
            .await
            .unwrap();
        adapter.delete_post(id).await.unwrap();
        create.assert_async().await;
        delete.assert_async().await;
    }
}
