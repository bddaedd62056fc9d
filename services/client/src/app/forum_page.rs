//! services/client/src/app/forum_page.rs

use std::fmt::Write;

use phishing_quiz_core::domain::{sort_newest_first, ForumPost, NewForumPost};
use phishing_quiz_core::preview::{clip, CLIP_LENGTH};
use uuid::Uuid;

use super::console::Console;
use super::state::AppState;
use crate::error::ClientError;

pub const PREVIEW_CARDS: usize = 3;

fn posted_at(post: &ForumPost) -> String {
    post.created_at
        .map(|t| t.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

/// Full posts, newest first.
pub fn render_posts(posts: &[ForumPost]) -> String {
    if posts.is_empty() {
        return "No posts yet.".to_string();
    }
    let mut sorted = posts.to_vec();
    sort_newest_first(&mut sorted);

    let mut out = String::new();
    for post in &sorted {
        let _ = writeln!(out, "# {}", post.title);
        let _ = writeln!(out, "{} · {} · {}", post.author_label(), posted_at(post), post.id);
        let _ = writeln!(out, "{}", post.body);
        let _ = writeln!(out);
    }
    out.trim_end().to_string()
}

/// The newest posts as short cards with clipped bodies.
pub fn render_cards(posts: &[ForumPost]) -> String {
    let mut sorted = posts.to_vec();
    sort_newest_first(&mut sorted);
    sorted
        .iter()
        .take(PREVIEW_CARDS)
        .map(|post| {
            format!(
                "{} ({})\n  {}",
                post.title,
                post.author_label(),
                clip(&post.body, CLIP_LENGTH)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn list(state: &AppState, page_size: u32, cards: bool) -> Result<String, ClientError> {
    state.require_login()?;
    let posts = state.forum.list_posts(1, page_size).await?;
    Ok(if cards {
        render_cards(&posts)
    } else {
        render_posts(&posts)
    })
}

/// Prompts for a new post. Nothing is sent unless title and body are filled.
pub async fn post(state: &AppState, console: &mut dyn Console) -> Result<bool, ClientError> {
    state.require_login()?;
    let draft = NewForumPost {
        title: console.input("Title", "")?,
        body: console.input("Message", "")?,
        is_anonymous: console.confirm("Post anonymously?")?,
    };
    if !draft.is_valid() {
        console.show("Title and message are both required.");
        return Ok(false);
    }
    state.forum.create_post(&draft).await?;
    console.show("Posted.");
    Ok(true)
}

pub async fn delete(state: &AppState, console: &mut dyn Console, id: Uuid) -> Result<bool, ClientError> {
    state.require_login()?;
    if !console.confirm(&format!("Delete post {}?", id))? {
        return Ok(false);
    }
    state.forum.delete_post(id).await?;
    console.show("Deleted.");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::testing::{Reply, ScriptedConsole};
    use crate::app::state::testing::{state_with, user_session, FakeBackend};
    use chrono::{DateTime, Utc};
    use std::sync::Arc;

    fn sample_post(title: &str, body: &str, at: Option<&str>, anonymous: bool) -> ForumPost {
        ForumPost {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            is_anonymous: anonymous,
            created_at: at.map(|s| s.parse::<DateTime<Utc>>().unwrap()),
            author_display_name: Some("mari".into()),
        }
    }

    #[test]
    fn posts_are_listed_newest_first_with_authors() {
        let posts = vec![
            sample_post("old", "a", Some("2024-05-01T08:00:00Z"), false),
            sample_post("undated", "b", None, false),
            sample_post("new", "c", Some("2024-05-03T08:00:00Z"), true),
        ];
        let out = render_posts(&posts);
        let new_at = out.find("# new").unwrap();
        let old_at = out.find("# old").unwrap();
        let undated_at = out.find("# undated").unwrap();
        assert!(new_at < old_at && old_at < undated_at);
        assert!(out.contains("Anonymous · 03.05.2024 08:00"));
        assert!(out.contains("mari · 01.05.2024 08:00"));
    }

    #[test]
    fn cards_take_three_and_clip() {
        let long = "x".repeat(400);
        let posts: Vec<ForumPost> = (1..=5)
            .map(|d| sample_post(&format!("t{}", d), &long, Some(&format!("2024-05-0{}T00:00:00Z", d)), false))
            .collect();
        let out = render_cards(&posts);
        assert!(out.starts_with("t5 (mari)"));
        assert!(out.contains("t3"));
        assert!(!out.contains("t2"));
        let clipped = out.lines().nth(1).unwrap().trim();
        assert_eq!(clipped.chars().count(), CLIP_LENGTH);
    }

    #[test]
    fn empty_forum() {
        assert_eq!(render_posts(&[]), "No posts yet.");
    }

    #[tokio::test]
    async fn blank_post_is_not_sent() {
        let backend = Arc::new(FakeBackend::default());
        let state = state_with(backend.clone(), user_session());
        let mut console = ScriptedConsole::new([Reply::Text("Title"), Reply::Text("   "), Reply::No]);

        assert!(!post(&state, &mut console).await.unwrap());
        assert!(backend.new_posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn post_and_delete() {
        let backend = Arc::new(FakeBackend::default());
        let state = state_with(backend.clone(), user_session());
        let mut console = ScriptedConsole::new([
            Reply::Text("Fake parcel"),
            Reply::Text("Watch out for this one"),
            Reply::Yes,
            Reply::Yes,
        ]);

        assert!(post(&state, &mut console).await.unwrap());
        let id = Uuid::new_v4();
        assert!(delete(&state, &mut console, id).await.unwrap());

        let sent = backend.new_posts.lock().unwrap();
        assert_eq!(sent[0].title, "Fake parcel");
        assert!(sent[0].is_anonymous);
        assert_eq!(*backend.deleted_posts.lock().unwrap(), vec![id]);
    }
}
