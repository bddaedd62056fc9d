//! services/client/src/app/profile_page.rs
//!
//! The profile card and the leaderboard table.

use std::fmt::Write;

use phishing_quiz_core::domain::{streak_label, LeaderboardEntry, Profile};

use super::state::AppState;
use crate::error::ClientError;

/// Rows shown at most, whatever the backend returns.
pub const LEADERBOARD_ROWS: usize = 10;

pub fn render_profile(profile: &Profile) -> String {
    let last_active = profile
        .last_active_date
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "Not active yet".to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", profile.username, profile.email);
    let _ = writeln!(out, "Total points:   {}", profile.total_points);
    let _ = writeln!(
        out,
        "Current streak: {} days ({})",
        profile.current_streak_days,
        streak_label(profile.current_streak_days)
    );
    let _ = writeln!(out, "Best streak:    {} days", profile.best_streak_days);
    let _ = write!(out, "Last active:    {}", last_active);
    out
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "Nobody on the leaderboard yet.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<20} {:>8} {:>7} {:>5}", "#", "Name", "Points", "Streak", "Best");
    for entry in entries.iter().take(LEADERBOARD_ROWS) {
        let _ = writeln!(
            out,
            "{:>4}  {:<20} {:>8} {:>7} {:>5}",
            entry.rank,
            entry.display_name,
            entry.total_points,
            entry.current_streak_days,
            entry.best_streak_days
        );
    }
    out.trim_end().to_string()
}

pub async fn show_profile(state: &AppState) -> Result<String, ClientError> {
    state.require_login()?;
    let profile = state.profile.my_profile().await?;
    Ok(render_profile(&profile))
}

pub async fn show_leaderboard(state: &AppState, limit: u32) -> Result<String, ClientError> {
    state.require_login()?;
    let entries = state.quiz.leaderboard(limit).await?;
    Ok(render_leaderboard(&entries))
}
