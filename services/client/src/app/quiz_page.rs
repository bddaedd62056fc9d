//! services/client/src/app/quiz_page.rs
//!
//! The daily quiz: one preview per step, a phishing / not phishing choice,
//! confirmation with feedback, and a result summary.

use std::fmt::Write;

use phishing_quiz_core::domain::AnswerChoice;
use phishing_quiz_core::preview::{render_default, Preview};
use phishing_quiz_core::wizard::{QuizSummary, QuizWizard, Stage};
use tracing::{info, warn};

use super::console::Console;
use super::state::AppState;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Choose(AnswerChoice),
    Confirm,
    Next,
    Back,
    Quit,
}

impl StepAction {
    fn label(self, last_step: bool) -> String {
        match self {
            StepAction::Choose(choice) => choice.label().to_string(),
            StepAction::Confirm => "Confirm answer".to_string(),
            StepAction::Next if last_step => "See result".to_string(),
            StepAction::Next => "Next".to_string(),
            StepAction::Back => "Back".to_string(),
            StepAction::Quit => "Quit".to_string(),
        }
    }
}

/// Actions currently enabled; disabled ones are simply not offered.
fn step_actions(wizard: &QuizWizard) -> Vec<StepAction> {
    let mut actions = Vec::new();
    let answered = wizard.current().is_some_and(|s| s.feedback_shown());
    if !answered {
        actions.push(StepAction::Choose(AnswerChoice::Phishing));
        actions.push(StepAction::Choose(AnswerChoice::NotPhishing));
    }
    if wizard.can_confirm() {
        actions.push(StepAction::Confirm);
    }
    if wizard.can_advance() {
        actions.push(StepAction::Next);
    }
    if wizard.index() > 0 {
        actions.push(StepAction::Back);
    }
    actions.push(StepAction::Quit);
    actions
}

pub fn render_step(wizard: &QuizWizard) -> String {
    let mut out = String::new();
    let Some(step) = wizard.current() else {
        return out;
    };
    let _ = writeln!(out, "{}", wizard.progress_label());
    let _ = writeln!(out, "{}", render_default(&Preview::from_item(step.item(), wizard.date())));

    match (step.record(), step.selected()) {
        (Some(record), _) => {
            let verdict = if record.correct { "Correct!" } else { "Not quite." };
            let _ = writeln!(out, "You answered: {}. {}", record.choice.label(), verdict);
            let _ = writeln!(out, "+{} points (total {})", record.points_awarded, record.total_points);
            let _ = writeln!(
                out,
                "Streak: {} days (best {})",
                record.current_streak_days, record.best_streak_days
            );
            let _ = write!(out, "{}", record.explanation());
        }
        (None, Some(choice)) => {
            let _ = write!(out, "Selected: {}", choice.label());
        }
        (None, None) => {
            let _ = write!(out, "Is this message phishing?");
        }
    }
    out
}

pub fn render_summary(summary: &QuizSummary) -> String {
    format!(
        "Result\nAnswered: {}\nCorrect: {}\nPoints: {}",
        summary.answered, summary.correct, summary.points
    )
}

/// Runs today's quiz until the user quits. Returns the final tally.
pub async fn run(state: &AppState, console: &mut dyn Console) -> Result<QuizSummary, ClientError> {
    state.require_login()?;

    let mut wizard = loop {
        match QuizWizard::load(state.quiz.as_ref()).await {
            Ok(wizard) => break wizard,
            Err(e) => {
                warn!("Failed to load today's quiz: {}", e);
                console.show(&format!("Could not load today's quiz: {}", e));
                let options = vec!["Retry".to_string(), "Quit".to_string()];
                if console.choose("What next?", &options)? == 1 {
                    return Ok(QuizSummary::default());
                }
            }
        }
    };

    if wizard.is_empty() {
        console.show("No previews for today. Come back tomorrow!");
        return Ok(QuizSummary::default());
    }
    info!(items = wizard.len(), "Starting today's quiz.");

    loop {
        match wizard.stage() {
            Stage::Step(index) => {
                console.show(&render_step(&wizard));
                let actions = step_actions(&wizard);
                let last_step = index + 1 == wizard.len();
                let labels: Vec<String> = actions.iter().map(|a| a.label(last_step)).collect();
                let picked = console.choose("Your move", &labels)?;

                let outcome = match actions.get(picked).copied().unwrap_or(StepAction::Quit) {
                    StepAction::Choose(choice) => wizard.select_choice(choice),
                    StepAction::Confirm => wizard.confirm(state.quiz.as_ref()).await.map(|_| ()),
                    StepAction::Next => wizard.advance().map(|_| ()),
                    StepAction::Back => {
                        wizard.back();
                        Ok(())
                    }
                    StepAction::Quit => return Ok(wizard.summary()),
                };
                if let Err(e) = outcome {
                    console.show(&format!("Error: {}", e));
                }
            }
            Stage::Summary => {
                let summary = wizard.summary();
                console.show(&render_summary(&summary));
                let options = vec![
                    "Review answers".to_string(),
                    "Back".to_string(),
                    "Done".to_string(),
                ];
                match console.choose("Your move", &options)? {
                    0 => wizard.restart(),
                    1 => {
                        wizard.back();
                    }
                    _ => return Ok(summary),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::testing::{Reply, ScriptedConsole};
    use crate::app::state::testing::{state_with, user_session, FakeBackend};
    use chrono::NaiveDate;
    use phishing_quiz_core::domain::{Channel, QuizItem, TodayQuiz};
    use phishing_quiz_core::session::Session;
    use std::sync::Arc;
    use uuid::Uuid;

    fn backend_with_quiz(truths: &[bool]) -> Arc<FakeBackend> {
        let backend = FakeBackend::default();
        let items: Vec<QuizItem> = truths
            .iter()
            .enumerate()
            .map(|(i, _)| QuizItem {
                id: Uuid::new_v4(),
                channel: if i % 2 == 0 { Channel::Email } else { Channel::Sms },
                sender: format!("Sender {}", i),
                subject: Some(format!("Subject {}", i)),
                body_preview: format!("Body {}", i),
            })
            .collect();
        for (item, truth) in items.iter().zip(truths) {
            backend.answers.lock().unwrap().insert(item.id, *truth);
        }
        *backend.today.lock().unwrap() = Some(TodayQuiz {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            items,
        });
        Arc::new(backend)
    }

    #[tokio::test]
    async fn full_run_reaches_summary() {
        let backend = backend_with_quiz(&[true, false, true]);
        let state = state_with(backend.clone(), user_session());
        let mut console = ScriptedConsole::new([
            Reply::Choose("Phishing"),
            Reply::Choose("Confirm"),
            Reply::Choose("Next"),
            Reply::Choose("Phishing"),
            Reply::Choose("Confirm"),
            Reply::Choose("Next"),
            Reply::Choose("Not phishing"),
            Reply::Choose("Confirm"),
            Reply::Choose("See result"),
            Reply::Choose("Done"),
        ]);

        let summary = run(&state, &mut console).await.unwrap();
        assert_eq!(
            summary,
            QuizSummary {
                answered: 3,
                correct: 1,
                points: 10
            }
        );
        assert_eq!(backend.submitted.lock().unwrap().len(), 3);
        assert!(console.output().contains("Answered: 3"));
        assert!(console.is_done());
    }

    #[tokio::test]
    async fn next_is_not_offered_before_confirming() {
        let backend = backend_with_quiz(&[true, true, true]);
        let state = state_with(backend, user_session());
        let mut console = ScriptedConsole::new([Reply::Choose("Phishing"), Reply::Choose("Quit")]);

        run(&state, &mut console).await.unwrap();
        let first_menu = &console.menus[0];
        assert!(!first_menu.iter().any(|o| o == "Next" || o == "Confirm answer"));
        assert!(console.menus[1].contains(&"Confirm answer".to_string()));
    }

    #[tokio::test]
    async fn revisiting_an_answered_step_shows_feedback_without_resubmitting() {
        let backend = backend_with_quiz(&[true, true, true]);
        let state = state_with(backend.clone(), user_session());
        let mut console = ScriptedConsole::new([
            Reply::Choose("Phishing"),
            Reply::Choose("Confirm"),
            Reply::Choose("Next"),
            Reply::Choose("Back"),
            Reply::Choose("Quit"),
        ]);

        run(&state, &mut console).await.unwrap();
        let revisit_menu = console.menus.last().unwrap();
        assert!(!revisit_menu.iter().any(|o| o == "Phishing" || o == "Confirm answer"));
        assert!(revisit_menu.contains(&"Next".to_string()));
        assert!(console.shown.last().unwrap().contains("You answered: Phishing. Correct!"));
        assert_eq!(backend.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_quiz_shows_empty_state() {
        let backend = backend_with_quiz(&[]);
        let state = state_with(backend, user_session());
        let mut console = ScriptedConsole::new([]);

        let summary = run(&state, &mut console).await.unwrap();
        assert_eq!(summary, QuizSummary::default());
        assert!(console.output().contains("No previews for today"));
    }

    #[tokio::test]
    async fn load_failure_blocks_until_quit() {
        let state = state_with(Arc::new(FakeBackend::default()), user_session());
        let mut console = ScriptedConsole::new([Reply::Choose("Quit")]);

        run(&state, &mut console).await.unwrap();
        assert!(console.output().contains("Could not load today's quiz"));
    }

    #[tokio::test]
    async fn requires_login() {
        let state = state_with(Arc::new(FakeBackend::default()), Session::anonymous());
        let mut console = ScriptedConsole::new([]);
        assert!(matches!(
            run(&state, &mut console).await,
            Err(ClientError::NotLoggedIn)
        ));
    }
}
