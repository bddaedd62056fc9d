//! crates/phishing_quiz_core/src/wizard/authoring.rs
//!
//! The admin authoring wizard: three editable drafts for one calendar day,
//! a recap, and an explicit save that persists all three at once.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::engine::{Stage, StepPolicy, StepWizard, Submission};
use super::{WizardError, WizardResult};
use crate::domain::{AdminQuizDraft, AdminQuizItemDraft, Channel, QUIZ_LENGTH};
use crate::ports::{AdminQuizService, PortResult};
use crate::preview::Preview;

/// A draft may be left once a date is chosen and its fields are filled in.
#[derive(Debug, Default)]
pub struct DraftGate {
    date: Option<NaiveDate>,
}

impl StepPolicy for DraftGate {
    type Step = AdminQuizItemDraft;

    fn can_advance(&self, step: &AdminQuizItemDraft) -> bool {
        self.date.is_some() && step.is_complete()
    }

    fn is_locked(&self, _step: &AdminQuizItemDraft) -> bool {
        false
    }
}

/// One field edit on a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Channel(Channel),
    Sender(String),
    Subject(String),
    BodyPreview(String),
    IsPhishing(bool),
    ExplanationTitle(String),
    ExplanationText(String),
}

impl DraftField {
    fn apply(self, draft: &mut AdminQuizItemDraft) {
        match self {
            DraftField::Channel(v) => draft.channel = v,
            DraftField::Sender(v) => draft.sender = v,
            DraftField::Subject(v) => draft.subject = v,
            DraftField::BodyPreview(v) => draft.body_preview = v,
            DraftField::IsPhishing(v) => draft.is_phishing = v,
            DraftField::ExplanationTitle(v) => draft.explanation_title = v,
            DraftField::ExplanationText(v) => draft.explanation_text = v,
        }
    }
}

/// One row of the summary recap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecap {
    pub step: usize,
    pub channel: Channel,
    pub sender: String,
    pub is_phishing: bool,
    pub explanation_title: String,
}

/// A date load that has been started but not completed.
#[derive(Debug, Clone, Copy)]
pub struct PendingLoad {
    epoch: u64,
    pub date: NaiveDate,
}

/// A save that has been started but not completed. Carries the payload so
/// the caller can send it while the wizard stays borrowable.
#[derive(Debug, Clone)]
pub struct PendingSave {
    submission: Submission,
    pub date: NaiveDate,
    pub items: Vec<AdminQuizItemDraft>,
    /// `true` when no quiz exists yet for the date.
    pub create: bool,
}

pub struct AuthoringWizard {
    engine: StepWizard<DraftGate>,
    exists: bool,
    dirty: bool,
    saved_ok: bool,
    loading: bool,
}

impl Default for AuthoringWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthoringWizard {
    pub fn new() -> Self {
        Self {
            engine: StepWizard::new(DraftGate::default(), empty_drafts()),
            exists: false,
            dirty: false,
            saved_ok: false,
            loading: false,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.engine.policy().date
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn saved_ok(&self) -> bool {
        self.saved_ok
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.engine.is_submitting()
    }

    pub fn stage(&self) -> Stage {
        self.engine.stage()
    }

    pub fn index(&self) -> usize {
        self.engine.index()
    }

    pub fn current(&self) -> Option<&AdminQuizItemDraft> {
        self.engine.current()
    }

    pub fn drafts(&self) -> &[AdminQuizItemDraft] {
        self.engine.steps()
    }

    /// Switches to `date`: blank drafts, step one, clean flags. Whatever was
    /// in flight for the previous date is discarded when it comes back.
    pub fn select_date(&mut self, date: NaiveDate) -> PendingLoad {
        self.engine.policy_mut().date = Some(date);
        self.engine.reset(empty_drafts());
        self.exists = false;
        self.dirty = false;
        self.saved_ok = false;
        self.loading = true;
        PendingLoad {
            epoch: self.engine.epoch(),
            date,
        }
    }

    /// Applies the backend's answer for a date selected earlier. On failure
    /// the wizard stays on blank drafts with `exists == false`.
    pub fn complete_load(
        &mut self,
        pending: PendingLoad,
        result: PortResult<Option<Vec<AdminQuizItemDraft>>>,
    ) -> WizardResult<()> {
        if pending.epoch != self.engine.epoch() {
            debug!(date = %pending.date, "discarding load for a replaced date");
            return Err(WizardError::Stale);
        }
        self.loading = false;

        match result {
            Ok(Some(items)) if !items.is_empty() => {
                info!(date = %pending.date, "loaded existing quiz");
                self.engine.reset(normalize(items));
                self.exists = true;
                self.dirty = false;
                self.saved_ok = false;
                Ok(())
            }
            Ok(_) => {
                info!(date = %pending.date, "no quiz for date yet");
                Ok(())
            }
            Err(e) => {
                warn!(date = %pending.date, "failed to load quiz: {}", e);
                Err(WizardError::Port(e))
            }
        }
    }

    pub async fn load_date(
        &mut self,
        service: &dyn AdminQuizService,
        date: NaiveDate,
    ) -> WizardResult<()> {
        let pending = self.select_date(date);
        let result = service.quiz_items_for(date).await;
        self.complete_load(pending, result)
    }

    /// Edits the current draft. Any edit invalidates the last save.
    pub fn edit(&mut self, field: DraftField) -> WizardResult<()> {
        if self.engine.is_summary() {
            return Err(WizardError::AtSummary);
        }
        self.edit_at(self.engine.index(), field)
    }

    /// Refused while a load is in flight.
    pub fn edit_at(&mut self, index: usize, field: DraftField) -> WizardResult<()> {
        if self.loading {
            return Err(WizardError::Busy);
        }
        self.engine.edit_step(index, |draft| field.apply(draft))?;
        self.mark_dirty();
        Ok(())
    }

    /// Resets the current draft to blank.
    pub fn clear_step(&mut self) -> WizardResult<()> {
        if self.engine.is_summary() {
            return Err(WizardError::AtSummary);
        }
        if self.loading {
            return Err(WizardError::Busy);
        }
        self.engine
            .edit_step(self.engine.index(), |draft| *draft = AdminQuizItemDraft::default())?;
        self.mark_dirty();
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.saved_ok = false;
    }

    pub fn can_advance(&self) -> bool {
        self.engine.can_advance()
    }

    pub fn advance(&mut self) -> WizardResult<Stage> {
        self.engine.advance()
    }

    pub fn back(&mut self) -> Stage {
        self.engine.back()
    }

    pub fn can_save(&self) -> bool {
        self.date().is_some()
            && self.engine.is_summary()
            && !self.loading
            && !self.engine.is_submitting()
    }

    pub fn begin_save(&mut self) -> WizardResult<PendingSave> {
        let date = self.date().ok_or(WizardError::NoDateSelected)?;
        if !self.engine.is_summary() {
            return Err(WizardError::NotAtSummary);
        }
        if self.loading {
            return Err(WizardError::Busy);
        }
        let submission = self.engine.begin_submission()?;
        Ok(PendingSave {
            submission,
            date,
            items: self.drafts().to_vec(),
            create: !self.exists,
        })
    }

    /// A failed save leaves every flag exactly as it was before the attempt.
    pub fn complete_save(&mut self, pending: PendingSave, result: PortResult<()>) -> WizardResult<()> {
        self.engine.finish_submission(pending.submission)?;
        if let Err(e) = result {
            warn!(date = %pending.date, "failed to save quiz: {}", e);
            return Err(WizardError::Port(e));
        }
        info!(date = %pending.date, created = pending.create, "quiz saved");
        self.exists = true;
        self.dirty = false;
        self.saved_ok = true;
        Ok(())
    }

    /// Creates or updates the quiz for the selected date, all three drafts in
    /// one request.
    pub async fn save(&mut self, service: &dyn AdminQuizService) -> WizardResult<()> {
        let pending = self.begin_save()?;
        let result = if pending.create {
            let draft = AdminQuizDraft {
                date: pending.date,
                items: pending.items.clone(),
            };
            service.create_quiz(&draft).await
        } else {
            service.update_quiz(pending.date, &pending.items).await
        };
        self.complete_save(pending, result)
    }

    pub fn can_finish(&self) -> bool {
        self.date().is_some()
            && !self.dirty
            && self.saved_ok
            && !self.loading
            && !self.engine.is_submitting()
    }

    pub fn recap(&self) -> Vec<StepRecap> {
        self.drafts()
            .iter()
            .enumerate()
            .map(|(step, d)| StepRecap {
                step,
                channel: d.channel,
                sender: d.sender.clone(),
                is_phishing: d.is_phishing,
                explanation_title: d.explanation_title.clone(),
            })
            .collect()
    }

    /// A preview of the current draft with placeholders for empty fields.
    pub fn current_preview(&self) -> Option<Preview> {
        let draft = self.current()?;
        let sender = if draft.sender.trim().is_empty() {
            "Sender".to_string()
        } else {
            draft.sender.clone()
        };
        let subject = if draft.subject.trim().is_empty() {
            None
        } else {
            Some(draft.subject.clone())
        };
        Some(Preview {
            channel: draft.channel,
            sender,
            subject,
            body_preview: draft.body_preview.clone(),
            date: self.date(),
        })
    }

    pub fn progress_label(&self) -> String {
        match self.stage() {
            Stage::Step(i) => format!("Step {} / {}", i + 1, QUIZ_LENGTH),
            Stage::Summary => "Summary".to_string(),
        }
    }
}

fn empty_drafts() -> Vec<AdminQuizItemDraft> {
    vec![AdminQuizItemDraft::default(); QUIZ_LENGTH]
}

/// Exactly three drafts: extras dropped, gaps filled with blanks.
fn normalize(mut items: Vec<AdminQuizItemDraft>) -> Vec<AdminQuizItemDraft> {
    items.truncate(QUIZ_LENGTH);
    items.resize_with(QUIZ_LENGTH, AdminQuizItemDraft::default);
    items
}
