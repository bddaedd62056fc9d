//! crates/phishing_quiz_core/src/domain.rs
//!
//! Defines the pure, core data structures for the quiz client.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Number of message previews in one daily quiz.
pub const QUIZ_LENGTH: usize = 3;

/// The channel a message preview imitates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    #[default]
    Email,
    Sms,
}

impl Channel {
    /// Numeric code used by the backend (1 = email, 2 = SMS).
    pub fn code(self) -> u8 {
        match self {
            Channel::Email => 1,
            Channel::Sms => 2,
        }
    }

    /// Maps a backend code back to a channel. Anything that is not email is SMS.
    pub fn from_code(code: u8) -> Self {
        if code == 1 {
            Channel::Email
        } else {
            Channel::Sms
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Email => "E-mail",
            Channel::Sms => "SMS",
        }
    }
}

/// The user's judgment on one preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerChoice {
    Phishing,
    NotPhishing,
}

impl AnswerChoice {
    pub fn is_phishing(self) -> bool {
        matches!(self, AnswerChoice::Phishing)
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerChoice::Phishing => "Phishing",
            AnswerChoice::NotPhishing => "Not phishing",
        }
    }
}

/// One of the day's message previews, as served to an end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub id: Uuid,
    pub channel: Channel,
    pub sender: String,
    pub subject: Option<String>,
    pub body_preview: String,
}

/// The day's quiz as returned by the backend.
#[derive(Debug, Clone)]
pub struct TodayQuiz {
    pub date: NaiveDate,
    pub items: Vec<QuizItem>,
}

/// What the backend says about a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points_awarded: i64,
    pub total_points: i64,
    pub current_streak_days: u32,
    pub best_streak_days: u32,
    pub explanation_title: Option<String>,
    pub explanation_text: String,
}

/// The confirmed outcome of the user's judgment on one item.
/// Created once per item on a successful submission and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub item_id: Uuid,
    pub choice: AnswerChoice,
    pub correct: bool,
    pub points_awarded: i64,
    pub total_points: i64,
    pub current_streak_days: u32,
    pub best_streak_days: u32,
    pub explanation_title: Option<String>,
    pub explanation_text: String,
}

impl AnswerRecord {
    pub fn new(item_id: Uuid, choice: AnswerChoice, outcome: AnswerOutcome) -> Self {
        Self {
            item_id,
            choice,
            correct: outcome.correct,
            points_awarded: outcome.points_awarded,
            total_points: outcome.total_points,
            current_streak_days: outcome.current_streak_days,
            best_streak_days: outcome.best_streak_days,
            explanation_title: outcome.explanation_title,
            explanation_text: outcome.explanation_text,
        }
    }

    /// The feedback line shown under a confirmed answer.
    pub fn explanation(&self) -> String {
        match self.explanation_title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{} — {}", title, self.explanation_text),
            None => self.explanation_text.clone(),
        }
    }
}

/// An admin-side, not yet persisted quiz item under edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdminQuizItemDraft {
    pub channel: Channel,
    pub sender: String,
    pub subject: String,
    pub body_preview: String,
    pub is_phishing: bool,
    pub explanation_title: String,
    pub explanation_text: String,
}

impl AdminQuizItemDraft {
    /// Field-level validity of a draft. The date requirement lives with the wizard.
    pub fn is_complete(&self) -> bool {
        !self.sender.trim().is_empty()
            && (self.channel != Channel::Email || !self.subject.trim().is_empty())
            && !self.body_preview.trim().is_empty()
            && !self.explanation_text.trim().is_empty()
    }
}

/// A full quiz for one calendar day, as sent on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminQuizDraft {
    pub date: NaiveDate,
    pub items: Vec<AdminQuizItemDraft>,
}

/// The logged-in user's statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub total_points: i64,
    pub current_streak_days: u32,
    pub best_streak_days: u32,
    pub last_active_date: Option<NaiveDate>,
}

/// One leaderboard row. `rank` is filled in from the position when the
/// backend leaves it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub display_name: String,
    pub total_points: i64,
    pub current_streak_days: u32,
    pub best_streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumPost {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub is_anonymous: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub author_display_name: Option<String>,
}

impl ForumPost {
    pub fn author_label(&self) -> &str {
        if self.is_anonymous {
            "Anonymous"
        } else {
            self.author_display_name.as_deref().unwrap_or("User")
        }
    }
}

/// A forum post about to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForumPost {
    pub title: String,
    pub body: String,
    pub is_anonymous: bool,
}

impl NewForumPost {
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }
}

/// Sorts posts newest first; posts without a timestamp go last.
pub fn sort_newest_first(posts: &mut [ForumPost]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Human label for a streak length.
pub fn streak_label(days: u32) -> &'static str {
    match days {
        0 => "Not started yet",
        1 => "You started!",
        2..=4 => "Good momentum",
        5..=13 => "Great rhythm",
        _ => "Legendary streak",
    }
}
