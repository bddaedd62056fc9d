//! services/client/src/app/admin_page.rs
//!
//! Admin tools: the month calendar, the three-step authoring wizard for a
//! day, and quiz deletion. Every entry point requires the admin role.

use std::fmt::Write;

use chrono::NaiveDate;
use phishing_quiz_core::calendar::{CalendarMonth, CalendarView, DayStatus};
use phishing_quiz_core::domain::{AdminQuizItemDraft, Channel};
use phishing_quiz_core::preview::render_default;
use phishing_quiz_core::wizard::{AuthoringWizard, DraftField, Stage};
use tracing::info;

use super::console::Console;
use super::state::AppState;
use crate::error::ClientError;

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

//=========================================================================================
// Calendar
//=========================================================================================

/// Six week rows. `*` marks a day with a quiz, brackets the selected day.
pub fn render_calendar(view: &CalendarView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^35}", view.month().label());
    let _ = writeln!(out, "  Mo   Tu   We   Th   Fr   Sa   Su");
    for week in view.days().chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|(day, status)| {
                let number = day.date.format("%e").to_string();
                let mark = match status {
                    Some(DayStatus::HasQuiz) => '*',
                    Some(DayStatus::NoQuiz) => ' ',
                    None => return "  .  ".to_string(),
                };
                if day.date == view.selected() {
                    format!("[{}{}]", number, mark)
                } else {
                    format!(" {}{} ", number, mark)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", row.join("").trim_end());
    }
    let _ = write!(out, "* = quiz scheduled");
    out
}

pub async fn calendar(
    state: &AppState,
    console: &mut dyn Console,
    month: Option<CalendarMonth>,
    today: NaiveDate,
) -> Result<(), ClientError> {
    state.require_admin()?;
    let mut view = CalendarView::new(today);
    if let Some(month) = month {
        view.show_month(month);
    }

    loop {
        view.load_statuses(state.admin.as_ref()).await;
        console.show(&render_calendar(&view));

        let options: Vec<String> = [
            "Previous month",
            "Next month",
            "Edit a day",
            "Delete a day's quiz",
            "Quit",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        match console.choose("Calendar", &options)? {
            0 => view.show_month(view.month().prev()),
            1 => view.show_month(view.month().next()),
            2 => {
                if let Some(date) = ask_date(console, view.selected())? {
                    view.select(date);
                    author(state, console, date).await?;
                    view.show_month(CalendarMonth::containing(date));
                }
            }
            3 => {
                if let Some(date) = ask_date(console, view.selected())? {
                    view.select(date);
                    if console.confirm(&format!("Delete the quiz for {}?", date))? {
                        match view.delete_quiz(state.admin.as_ref(), date).await {
                            Ok(()) => console.show(&format!("Deleted the quiz for {}.", date)),
                            Err(e) => console.show(&format!("Error: {}", e)),
                        }
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

fn ask_date(console: &mut dyn Console, initial: NaiveDate) -> Result<Option<NaiveDate>, ClientError> {
    let raw = console.input("Date (YYYY-MM-DD)", &initial.to_string())?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        console.show(&format!("'{}' is not a date.", raw.trim()));
    }
    Ok(parsed)
}

/// Deletes the quiz for `date` after confirmation. Returns whether it was deleted.
pub async fn delete(state: &AppState, console: &mut dyn Console, date: NaiveDate) -> Result<bool, ClientError> {
    state.require_admin()?;
    if !console.confirm(&format!("Delete the quiz for {}?", date))? {
        return Ok(false);
    }
    state.admin.delete_quiz(date).await?;
    info!(%date, "Quiz deleted.");
    console.show(&format!("Deleted the quiz for {}.", date));
    Ok(true)
}

//=========================================================================================
// Authoring
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    Channel,
    Sender,
    Subject,
    Body,
    Answer,
    ExplanationTitle,
    ExplanationText,
    Clear,
    Next,
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryAction {
    Save,
    Finish,
    Back,
    Quit,
}

fn edit_actions(wizard: &AuthoringWizard) -> Vec<EditAction> {
    let mut actions = vec![EditAction::Channel, EditAction::Sender];
    if wizard.current().is_some_and(|d| d.channel == Channel::Email) {
        actions.push(EditAction::Subject);
    }
    actions.extend([
        EditAction::Body,
        EditAction::Answer,
        EditAction::ExplanationTitle,
        EditAction::ExplanationText,
        EditAction::Clear,
    ]);
    if wizard.can_advance() {
        actions.push(EditAction::Next);
    }
    if wizard.index() > 0 {
        actions.push(EditAction::Back);
    }
    actions.push(EditAction::Quit);
    actions
}

fn edit_label(action: EditAction, last_step: bool) -> &'static str {
    match action {
        EditAction::Channel => "Edit channel",
        EditAction::Sender => "Edit sender",
        EditAction::Subject => "Edit subject",
        EditAction::Body => "Edit body",
        EditAction::Answer => "Set correct answer",
        EditAction::ExplanationTitle => "Edit explanation title",
        EditAction::ExplanationText => "Edit explanation text",
        EditAction::Clear => "Clear step",
        EditAction::Next if last_step => "Go to summary",
        EditAction::Next => "Next",
        EditAction::Back => "Back",
        EditAction::Quit => "Quit",
    }
}

fn summary_actions(wizard: &AuthoringWizard) -> Vec<SummaryAction> {
    let mut actions = Vec::new();
    if wizard.can_save() {
        actions.push(SummaryAction::Save);
    }
    if wizard.can_finish() {
        actions.push(SummaryAction::Finish);
    }
    actions.extend([SummaryAction::Back, SummaryAction::Quit]);
    actions
}

fn answer_label(is_phishing: bool) -> &'static str {
    if is_phishing {
        "Phishing"
    } else {
        "Not phishing"
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

pub fn render_draft(wizard: &AuthoringWizard) -> String {
    let mut out = String::new();
    let Some(draft) = wizard.current() else {
        return out;
    };
    let _ = writeln!(out, "{}", wizard.progress_label());
    if let Some(preview) = wizard.current_preview() {
        let _ = writeln!(out, "{}", render_default(&preview));
    }
    let _ = writeln!(out, "Channel:           {}", draft.channel.label());
    let _ = writeln!(out, "Sender:            {}", or_dash(&draft.sender));
    if draft.channel == Channel::Email {
        let _ = writeln!(out, "Subject:           {}", or_dash(&draft.subject));
    }
    let _ = writeln!(out, "Correct answer:    {}", answer_label(draft.is_phishing));
    let _ = writeln!(out, "Explanation title: {}", or_dash(&draft.explanation_title));
    let _ = write!(out, "Explanation text:  {}", or_dash(&draft.explanation_text));
    out
}

pub fn render_recap(wizard: &AuthoringWizard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", wizard.progress_label());
    for row in wizard.recap() {
        let _ = writeln!(
            out,
            "{}. {} from {}: {} ({})",
            row.step + 1,
            row.channel.label(),
            or_dash(&row.sender),
            answer_label(row.is_phishing),
            or_dash(&row.explanation_title)
        );
    }
    let status = if wizard.is_saving() {
        "Saving..."
    } else if wizard.is_dirty() {
        "Unsaved changes"
    } else if wizard.saved_ok() {
        "Saved"
    } else {
        "Not saved yet"
    };
    let _ = write!(out, "Status: {}", status);
    out
}

fn prompt_field(
    console: &mut dyn Console,
    action: EditAction,
    draft: &AdminQuizItemDraft,
) -> Result<Option<DraftField>, ClientError> {
    let field = match action {
        EditAction::Channel => {
            let options = vec![Channel::Email.label().to_string(), Channel::Sms.label().to_string()];
            let channel = if console.choose("Channel", &options)? == 0 {
                Channel::Email
            } else {
                Channel::Sms
            };
            DraftField::Channel(channel)
        }
        EditAction::Sender => DraftField::Sender(console.input("Sender", &draft.sender)?),
        EditAction::Subject => DraftField::Subject(console.input("Subject", &draft.subject)?),
        EditAction::Body => DraftField::BodyPreview(console.input("Body", &draft.body_preview)?),
        EditAction::Answer => {
            let options = vec![answer_label(true).to_string(), answer_label(false).to_string()];
            DraftField::IsPhishing(console.choose("Correct answer", &options)? == 0)
        }
        EditAction::ExplanationTitle => DraftField::ExplanationTitle(
            console.input("Explanation title", &draft.explanation_title)?,
        ),
        EditAction::ExplanationText => DraftField::ExplanationText(
            console.input("Explanation text", &draft.explanation_text)?,
        ),
        _ => return Ok(None),
    };
    Ok(Some(field))
}

/// Edits the quiz for `date`. Returns `true` when the user finished after a
/// successful save.
pub async fn author(state: &AppState, console: &mut dyn Console, date: NaiveDate) -> Result<bool, ClientError> {
    state.require_admin()?;
    let mut wizard = AuthoringWizard::new();

    match wizard.load_date(state.admin.as_ref(), date).await {
        Ok(()) if wizard.exists() => console.show(&format!("Editing the quiz for {}.", date)),
        Ok(()) => console.show(&format!("No quiz for {} yet. Starting a new one.", date)),
        Err(e) => console.show(&format!("Could not load the quiz for {}: {}", date, e)),
    }

    loop {
        match wizard.stage() {
            Stage::Step(index) => {
                console.show(&render_draft(&wizard));
                let actions = edit_actions(&wizard);
                let last_step = index + 1 == wizard.drafts().len();
                let labels: Vec<String> = actions
                    .iter()
                    .map(|a| edit_label(*a, last_step).to_string())
                    .collect();
                let action = actions
                    .get(console.choose("Edit", &labels)?)
                    .copied()
                    .unwrap_or(EditAction::Quit);

                let outcome = match action {
                    EditAction::Next => wizard.advance().map(|_| ()),
                    EditAction::Back => {
                        wizard.back();
                        Ok(())
                    }
                    EditAction::Clear => {
                        if console.confirm("Clear every field of this step?")? {
                            wizard.clear_step()
                        } else {
                            Ok(())
                        }
                    }
                    EditAction::Quit => {
                        if confirm_leave(&wizard, console)? {
                            return Ok(false);
                        }
                        Ok(())
                    }
                    field_action => {
                        let current = wizard.current().cloned().unwrap_or_default();
                        match prompt_field(console, field_action, &current)? {
                            Some(field) => wizard.edit(field),
                            None => Ok(()),
                        }
                    }
                };
                if let Err(e) = outcome {
                    console.show(&format!("Error: {}", e));
                }
            }
            Stage::Summary => {
                console.show(&render_recap(&wizard));
                let actions = summary_actions(&wizard);
                let labels: Vec<String> = actions
                    .iter()
                    .map(|a| match a {
                        SummaryAction::Save if wizard.exists() => "Save changes".to_string(),
                        SummaryAction::Save => "Create quiz".to_string(),
                        SummaryAction::Finish => "Finish".to_string(),
                        SummaryAction::Back => "Back".to_string(),
                        SummaryAction::Quit => "Quit".to_string(),
                    })
                    .collect();
                let action = actions
                    .get(console.choose("Summary", &labels)?)
                    .copied()
                    .unwrap_or(SummaryAction::Quit);

                match action {
                    SummaryAction::Save => match wizard.save(state.admin.as_ref()).await {
                        Ok(()) => console.show(&format!("Saved the quiz for {}.", date)),
                        Err(e) => console.show(&format!("Error: {}", e)),
                    },
                    SummaryAction::Finish => return Ok(true),
                    SummaryAction::Back => {
                        wizard.back();
                    }
                    SummaryAction::Quit => {
                        if confirm_leave(&wizard, console)? {
                            return Ok(false);
                        }
                    }
                }
            }
        }
    }
}

fn confirm_leave(wizard: &AuthoringWizard, console: &mut dyn Console) -> Result<bool, ClientError> {
    if wizard.is_dirty() {
        console.confirm("Discard unsaved changes?")
    } else {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::testing::{Reply, ScriptedConsole};
    use crate::app::state::testing::{admin_session, state_with, user_session, FakeBackend};
    use std::sync::Arc;

    fn may_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn fill_sms_step() -> Vec<Reply> {
        vec![
            Reply::Choose("Edit channel"),
            Reply::Choose("SMS"),
            Reply::Choose("Edit sender"),
            Reply::Text("Pank"),
            Reply::Choose("Edit body"),
            Reply::Text("Teie konto on blokeeritud"),
            Reply::Choose("Set correct answer"),
            Reply::Choose("Phishing"),
            Reply::Choose("Edit explanation text"),
            Reply::Text("Banks never ask this by SMS."),
        ]
    }

    #[test]
    fn calendar_marks_quiz_days_and_selection() {
        let mut view = CalendarView::new(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        view.select(may_day());
        let out = render_calendar(&view);
        assert!(out.contains("May 2024"));
        assert!(out.contains("[ 1 ]"));
        assert!(out.lines().nth(2).unwrap().starts_with("  .    .  [ 1 ]"));
    }

    #[test]
    fn dates_parse_strictly() {
        assert_eq!(parse_date(" 2024-05-01 "), Some(may_day()));
        assert_eq!(parse_date("01.05.2024"), None);
    }

    #[tokio::test]
    async fn create_quiz_for_new_date() {
        let backend = Arc::new(FakeBackend::default());
        let state = state_with(backend.clone(), admin_session());

        let mut script = Vec::new();
        for step in 0..3 {
            script.extend(fill_sms_step());
            script.push(Reply::Choose(if step == 2 { "Go to summary" } else { "Next" }));
        }
        script.extend([Reply::Choose("Create quiz"), Reply::Choose("Finish")]);
        let mut console = ScriptedConsole::new(script);

        let finished = author(&state, &mut console, may_day()).await.unwrap();
        assert!(finished);
        let created = backend.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].date, may_day());
        assert_eq!(created[0].items.len(), 3);
        assert_eq!(created[0].items[0].sender, "Pank");
        assert!(created[0].items[2].is_phishing);
        assert!(console.output().contains("No quiz for 2024-05-01 yet"));
    }

    #[tokio::test]
    async fn existing_quiz_is_updated_and_finish_waits_for_save() {
        let backend = Arc::new(FakeBackend::default());
        let complete = AdminQuizItemDraft {
            channel: Channel::Email,
            sender: "HR".into(),
            subject: "Payslip".into(),
            body_preview: "Open the attachment".into(),
            is_phishing: true,
            explanation_title: "Attachment".into(),
            explanation_text: "Unexpected attachments are a red flag.".into(),
        };
        backend
            .quizzes
            .lock()
            .unwrap()
            .insert(may_day(), vec![complete.clone(), complete.clone(), complete]);
        let state = state_with(backend.clone(), admin_session());

        let mut console = ScriptedConsole::new([
            Reply::Choose("Next"),
            Reply::Choose("Next"),
            Reply::Choose("Edit subject"),
            Reply::Text("Your payslip"),
            Reply::Choose("Go to summary"),
            Reply::Choose("Save changes"),
            Reply::Choose("Finish"),
        ]);

        assert!(author(&state, &mut console, may_day()).await.unwrap());
        assert_eq!(*backend.updated.lock().unwrap(), vec![may_day()]);
        assert!(backend.created.lock().unwrap().is_empty());
        let stored = backend.quizzes.lock().unwrap()[&may_day()].clone();
        assert_eq!(stored[2].subject, "Your payslip");

        let first_summary_menu = console
            .menus
            .iter()
            .find(|m| m.contains(&"Save changes".to_string()))
            .unwrap();
        assert!(!first_summary_menu.contains(&"Finish".to_string()));
    }

    #[tokio::test]
    async fn incomplete_step_cannot_advance_and_quit_asks_about_changes() {
        let backend = Arc::new(FakeBackend::default());
        let state = state_with(backend.clone(), admin_session());
        let mut console = ScriptedConsole::new([
            Reply::Choose("Edit sender"),
            Reply::Text("Pank"),
            Reply::Choose("Quit"),
            Reply::Yes,
        ]);

        assert!(!author(&state, &mut console, may_day()).await.unwrap());
        assert!(console.menus.iter().all(|m| !m.contains(&"Next".to_string())));
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_asks_first() {
        let backend = Arc::new(FakeBackend::default());
        let state = state_with(backend.clone(), admin_session());

        let mut console = ScriptedConsole::new([Reply::No, Reply::Yes]);
        assert!(!delete(&state, &mut console, may_day()).await.unwrap());
        assert!(delete(&state, &mut console, may_day()).await.unwrap());
        assert_eq!(*backend.deleted.lock().unwrap(), vec![may_day()]);
    }

    #[tokio::test]
    async fn calendar_navigates_and_deletes() {
        let backend = Arc::new(FakeBackend::default());
        backend
            .quizzes
            .lock()
            .unwrap()
            .insert(may_day(), vec![AdminQuizItemDraft::default(); 3]);
        let state = state_with(backend.clone(), admin_session());
        let mut console = ScriptedConsole::new([
            Reply::Choose("Next month"),
            Reply::Choose("Previous month"),
            Reply::Choose("Delete"),
            Reply::Text("2024-05-01"),
            Reply::Yes,
            Reply::Choose("Quit"),
        ]);

        calendar(&state, &mut console, None, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
            .await
            .unwrap();
        assert!(console.shown[0].contains("May 2024"));
        assert!(console.shown[0].contains(" 1*"));
        assert!(console.shown[1].contains("June 2024"));
        assert_eq!(*backend.deleted.lock().unwrap(), vec![may_day()]);
        assert!(!console.shown.last().unwrap().contains(" 1*"));
    }

    #[tokio::test]
    async fn admin_pages_reject_regular_users() {
        let state = state_with(Arc::new(FakeBackend::default()), user_session());
        let mut console = ScriptedConsole::new([]);
        assert!(matches!(
            author(&state, &mut console, may_day()).await,
            Err(ClientError::Forbidden)
        ));
        assert!(matches!(
            delete(&state, &mut console, may_day()).await,
            Err(ClientError::Forbidden)
        ));
    }
}
