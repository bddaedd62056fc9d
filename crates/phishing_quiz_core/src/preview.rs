//! crates/phishing_quiz_core/src/preview.rs
//!
//! Renders a message preview as a plain-text mock of an inbox or an SMS
//! thread. Rendering is a pure function of the preview data.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::domain::{Channel, QuizItem};

/// Body length used by list and card contexts.
pub const CLIP_LENGTH: usize = 170;

const RULE_WIDTH: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub channel: Channel,
    pub sender: String,
    pub subject: Option<String>,
    pub body_preview: String,
    pub date: Option<NaiveDate>,
}

impl Preview {
    pub fn from_item(item: &QuizItem, date: Option<NaiveDate>) -> Self {
        Self {
            channel: item.channel,
            sender: item.sender.clone(),
            subject: item.subject.clone(),
            body_preview: item.body_preview.clone(),
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewTemplate {
    EmailInbox,
    SmsThread,
}

impl PreviewTemplate {
    pub fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Sms => PreviewTemplate::SmsThread,
            Channel::Email => PreviewTemplate::EmailInbox,
        }
    }
}

/// Renders with the template matching the preview's channel.
pub fn render_default(preview: &Preview) -> String {
    render(PreviewTemplate::for_channel(preview.channel), preview)
}

pub fn render(template: PreviewTemplate, preview: &Preview) -> String {
    match template {
        PreviewTemplate::EmailInbox => render_email(preview),
        PreviewTemplate::SmsThread => render_sms(preview),
    }
}

/// Collapses whitespace and cuts `text` to at most `max` characters, the
/// last of which is an ellipsis when anything was cut.
pub fn clip(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn sender_name(preview: &Preview) -> &str {
    let trimmed = preview.sender.trim();
    if trimmed.is_empty() {
        "Sender"
    } else {
        trimmed
    }
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// A plausible mailbox address derived from the display name.
fn sender_address(name: &str) -> String {
    let local = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(".");
    format!("{}@mail.example", local)
}

fn render_email(preview: &Preview) -> String {
    let name = sender_name(preview);
    let when = preview
        .date
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "today".to_string());
    let subject = preview
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("(no subject)");

    let mut out = String::new();
    let _ = writeln!(out, "┌{}", "─".repeat(RULE_WIDTH));
    let _ = writeln!(out, "│ ({}) {} <{}>", initial(name), name, sender_address(name));
    let _ = writeln!(out, "│     to me ▾{:>width$}", when, width = RULE_WIDTH - 12);
    let _ = writeln!(out, "├{}", "─".repeat(RULE_WIDTH));
    let _ = writeln!(out, "│ {}", subject);
    let _ = writeln!(out, "│");
    for line in preview.body_preview.lines() {
        let _ = writeln!(out, "│ {}", line);
    }
    let _ = write!(out, "└{}", "─".repeat(RULE_WIDTH));
    out
}

fn render_sms(preview: &Preview) -> String {
    let name = sender_name(preview);
    let stamp = preview
        .date
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string());

    let mut out = String::new();
    let _ = writeln!(out, "‹ ({}) {} · SMS", initial(name), name);
    let _ = writeln!(out, "{:^width$}", "Today", width = RULE_WIDTH);
    let _ = writeln!(out, "  ╭{}", "─".repeat(RULE_WIDTH - 4));
    for line in preview.body_preview.lines() {
        let _ = writeln!(out, "  │ {}", line);
    }
    let _ = writeln!(out, "  ╰ {}", stamp);
    let _ = write!(out, "[+] Text message");
    out
}
