//! crates/phishing_quiz_core/src/wizard/quiz.rs
//!
//! The quiz-taking wizard: one step per preview, each unlocked for advancing
//! by a confirmed answer, followed by a read-only result summary.

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use super::engine::{Stage, StepPolicy, StepWizard, Submission};
use super::{WizardError, WizardResult};
use crate::domain::{AnswerChoice, AnswerOutcome, AnswerRecord, QuizItem, QUIZ_LENGTH};
use crate::ports::{PortResult, QuizService};

#[derive(Debug, Clone)]
pub struct QuizStep {
    item: QuizItem,
    selected: Option<AnswerChoice>,
    record: Option<AnswerRecord>,
}

impl QuizStep {
    fn new(item: QuizItem) -> Self {
        Self {
            item,
            selected: None,
            record: None,
        }
    }

    pub fn item(&self) -> &QuizItem {
        &self.item
    }

    /// The highlighted choice: tentative before confirmation, the recorded
    /// one after.
    pub fn selected(&self) -> Option<AnswerChoice> {
        self.selected
    }

    pub fn record(&self) -> Option<&AnswerRecord> {
        self.record.as_ref()
    }

    /// Feedback is shown exactly when an answer has been recorded.
    pub fn feedback_shown(&self) -> bool {
        self.record.is_some()
    }
}

/// A step is passable, and frozen, once its answer is recorded.
pub struct AnswerGate;

impl StepPolicy for AnswerGate {
    type Step = QuizStep;

    fn can_advance(&self, step: &QuizStep) -> bool {
        step.record.is_some()
    }

    fn is_locked(&self, step: &QuizStep) -> bool {
        step.record.is_some()
    }

    fn on_enter(&self, step: &mut QuizStep) {
        step.selected = step.record.as_ref().map(|r| r.choice);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizSummary {
    pub answered: usize,
    pub correct: usize,
    pub points: i64,
}

impl QuizSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AnswerRecord>) -> Self {
        records
            .into_iter()
            .fold(QuizSummary::default(), |mut acc, record| {
                acc.answered += 1;
                if record.correct {
                    acc.correct += 1;
                }
                acc.points += record.points_awarded;
                acc
            })
    }
}

/// An answer submission that has been started but not completed.
#[derive(Debug, Clone, Copy)]
pub struct PendingAnswer {
    submission: Submission,
    step: usize,
    pub item_id: Uuid,
    pub choice: AnswerChoice,
}

pub struct QuizWizard {
    engine: StepWizard<AnswerGate>,
    date: Option<NaiveDate>,
}

impl QuizWizard {
    /// Builds a wizard over the first three items; extras are dropped.
    pub fn new(date: Option<NaiveDate>, items: Vec<QuizItem>) -> Self {
        Self {
            engine: StepWizard::new(AnswerGate, Self::steps_from(items)),
            date,
        }
    }

    /// Fetches today's quiz and starts a fresh wizard over it.
    pub async fn load(service: &dyn QuizService) -> PortResult<Self> {
        let quiz = service.today_quiz().await?;
        debug!(date = %quiz.date, items = quiz.items.len(), "loaded today's quiz");
        Ok(Self::new(Some(quiz.date), quiz.items))
    }

    /// Swaps in a new set of items. Recorded answers are dropped and any
    /// submission still in flight will be discarded when it completes.
    pub fn replace_items(&mut self, date: Option<NaiveDate>, items: Vec<QuizItem>) {
        self.date = date;
        self.engine.reset(Self::steps_from(items));
    }

    fn steps_from(items: Vec<QuizItem>) -> Vec<QuizStep> {
        items
            .into_iter()
            .take(QUIZ_LENGTH)
            .map(QuizStep::new)
            .collect()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn stage(&self) -> Stage {
        self.engine.stage()
    }

    pub fn index(&self) -> usize {
        self.engine.index()
    }

    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    pub fn current(&self) -> Option<&QuizStep> {
        self.engine.current()
    }

    pub fn steps(&self) -> &[QuizStep] {
        self.engine.steps()
    }

    pub fn is_submitting(&self) -> bool {
        self.engine.is_submitting()
    }

    /// Records a tentative choice for the current item.
    pub fn select_choice(&mut self, choice: AnswerChoice) -> WizardResult<()> {
        self.engine.edit_current(|step| step.selected = Some(choice))
    }

    pub fn can_confirm(&self) -> bool {
        !self.engine.is_submitting()
            && self
                .current()
                .is_some_and(|s| s.selected.is_some() && s.record.is_none())
    }

    pub fn begin_confirm(&mut self) -> WizardResult<PendingAnswer> {
        let Stage::Step(step) = self.engine.stage() else {
            return Err(WizardError::AtSummary);
        };
        let current = self.engine.current().ok_or(WizardError::AtSummary)?;
        if current.record.is_some() {
            return Err(WizardError::AlreadyAnswered);
        }
        let choice = current.selected.ok_or(WizardError::NoChoice)?;
        let item_id = current.item.id;

        let submission = self.engine.begin_submission()?;
        Ok(PendingAnswer {
            submission,
            step,
            item_id,
            choice,
        })
    }

    /// Stores the outcome against the step the submission was issued from.
    /// A failed or stale submission records nothing.
    pub fn complete_confirm(
        &mut self,
        pending: PendingAnswer,
        result: PortResult<AnswerOutcome>,
    ) -> WizardResult<&AnswerRecord> {
        self.engine.finish_submission(pending.submission)?;
        let outcome = result.map_err(|e| {
            warn!(item = %pending.item_id, "answer submission failed: {}", e);
            WizardError::Port(e)
        })?;

        let record = AnswerRecord::new(pending.item_id, pending.choice, outcome);
        debug!(item = %record.item_id, correct = record.correct, "answer recorded");
        self.engine.record_step(pending.step, |step| {
            step.selected = Some(record.choice);
            step.record = Some(record);
        });

        self.engine
            .step(pending.step)
            .and_then(QuizStep::record)
            .ok_or(WizardError::NoSuchStep(pending.step))
    }

    /// Submits the current choice. At most one submission per item: an
    /// answered item is refused before anything is sent.
    pub async fn confirm(&mut self, service: &dyn QuizService) -> WizardResult<&AnswerRecord> {
        let pending = self.begin_confirm()?;
        let result = service
            .submit_answer(pending.item_id, pending.choice.is_phishing())
            .await;
        self.complete_confirm(pending, result)
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

    /// Starts over from the first step. Recorded answers stay recorded.
    pub fn restart(&mut self) {
        self.engine.restart()
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary::from_records(self.steps().iter().filter_map(QuizStep::record))
    }

    pub fn progress_label(&self) -> String {
        match self.stage() {
            Stage::Step(i) => format!("Step {} / {}", i + 1, self.len()),
            Stage::Summary => "Result".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Channel, LeaderboardEntry, TodayQuiz};
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn item(sender: &str) -> QuizItem {
        QuizItem {
            id: Uuid::new_v4(),
            channel: Channel::Sms,
            sender: sender.to_string(),
            subject: None,
            body_preview: "Your parcel is waiting".to_string(),
        }
    }

    fn outcome(correct: bool, points: i64) -> AnswerOutcome {
        AnswerOutcome {
            correct,
            points_awarded: points,
            total_points: points,
            current_streak_days: 1,
            best_streak_days: 2,
            explanation_title: None,
            explanation_text: "Check the link target".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeQuiz {
        calls: Mutex<Vec<(Uuid, bool)>>,
        replies: Mutex<VecDeque<PortResult<AnswerOutcome>>>,
    }

    impl FakeQuiz {
        fn replying(replies: Vec<PortResult<AnswerOutcome>>) -> Self {
            Self {
                calls: Mutex::default(),
                replies: Mutex::new(replies.into()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl QuizService for FakeQuiz {
        async fn today_quiz(&self) -> PortResult<TodayQuiz> {
            Ok(TodayQuiz {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                items: vec![item("a"), item("b"), item("c"), item("d")],
            })
        }

        async fn submit_answer(
            &self,
            item_id: Uuid,
            answer_is_phishing: bool,
        ) -> PortResult<AnswerOutcome> {
            self.calls.lock().unwrap().push((item_id, answer_is_phishing));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PortError::Unexpected("no reply scripted".into())))
        }

        async fn leaderboard(&self, _limit: u32) -> PortResult<Vec<LeaderboardEntry>> {
            Ok(Vec::new())
        }
    }

    fn wizard() -> QuizWizard {
        QuizWizard::new(None, vec![item("a"), item("b"), item("c")])
    }

    #[tokio::test]
    async fn load_keeps_only_the_first_three_items() {
        let service = FakeQuiz::default();
        let wizard = QuizWizard::load(&service).await.unwrap();
        assert_eq!(wizard.len(), 3);
        assert_eq!(wizard.steps()[2].item().sender, "c");
        assert_eq!(wizard.date(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn advance_requires_a_recorded_answer() {
        let mut w = wizard();
        assert!(!w.can_advance());
        w.select_choice(AnswerChoice::Phishing).unwrap();
        assert_eq!(w.advance(), Err(WizardError::StepIncomplete));
        assert_eq!(w.index(), 0);
    }

    #[test]
    fn confirm_without_choice_is_refused() {
        let mut w = wizard();
        assert!(!w.can_confirm());
        assert!(matches!(w.begin_confirm(), Err(WizardError::NoChoice)));
        assert!(!w.is_submitting());
    }

    #[tokio::test]
    async fn wrong_answer_unlocks_advance_and_survives_navigation() {
        let service = FakeQuiz::replying(vec![Ok(outcome(false, 0))]);
        let mut w = wizard();

        w.select_choice(AnswerChoice::Phishing).unwrap();
        let record = w.confirm(&service).await.unwrap();
        assert!(!record.correct);
        assert_eq!(record.points_awarded, 0);

        assert!(w.can_advance());
        assert!(!w.can_confirm());
        assert_eq!(w.select_choice(AnswerChoice::NotPhishing), Err(WizardError::Locked));

        w.advance().unwrap();
        w.back();
        let step = w.current().unwrap();
        assert!(step.feedback_shown());
        assert_eq!(step.selected(), Some(AnswerChoice::Phishing));
        assert!(!step.record().unwrap().correct);
    }

    #[tokio::test]
    async fn confirm_is_at_most_once_per_item() {
        let service = FakeQuiz::replying(vec![Ok(outcome(true, 10)), Ok(outcome(true, 10))]);
        let mut w = wizard();

        w.select_choice(AnswerChoice::NotPhishing).unwrap();
        w.confirm(&service).await.unwrap();
        let again = w.confirm(&service).await;

        assert!(matches!(again, Err(WizardError::AlreadyAnswered)));
        assert_eq!(service.call_count(), 1);
        assert_eq!(w.current().unwrap().record().unwrap().points_awarded, 10);
    }

    #[tokio::test]
    async fn failed_submission_records_nothing() {
        let service = FakeQuiz::replying(vec![Err(PortError::Unexpected("boom".into()))]);
        let mut w = wizard();

        w.select_choice(AnswerChoice::Phishing).unwrap();
        let result = w.confirm(&service).await;

        assert!(matches!(result, Err(WizardError::Port(_))));
        assert!(w.current().unwrap().record().is_none());
        assert!(!w.is_submitting());
        assert!(w.can_confirm());
        assert_eq!(w.index(), 0);
    }

    #[test]
    fn second_confirm_while_in_flight_is_busy() {
        let mut w = wizard();
        w.select_choice(AnswerChoice::Phishing).unwrap();
        let _pending = w.begin_confirm().unwrap();
        assert!(!w.can_confirm());
        assert!(matches!(w.begin_confirm(), Err(WizardError::Busy)));
    }

    #[test]
    fn late_response_lands_on_the_step_it_was_issued_for() {
        let mut w = wizard();
        w.select_choice(AnswerChoice::Phishing).unwrap();
        let first = w.begin_confirm().unwrap();
        w.complete_confirm(first, Ok(outcome(true, 5))).unwrap();
        w.advance().unwrap();

        w.select_choice(AnswerChoice::NotPhishing).unwrap();
        let pending = w.begin_confirm().unwrap();
        w.back();
        w.complete_confirm(pending, Ok(outcome(false, 0))).unwrap();

        assert_eq!(w.index(), 0);
        assert!(w.steps()[0].record().unwrap().correct);
        assert_eq!(
            w.steps()[1].record().unwrap().choice,
            AnswerChoice::NotPhishing
        );
    }

    #[test]
    fn responses_for_replaced_items_are_discarded() {
        let mut w = wizard();
        w.select_choice(AnswerChoice::Phishing).unwrap();
        let pending = w.begin_confirm().unwrap();

        w.replace_items(None, vec![item("x"), item("y"), item("z")]);
        let result = w.complete_confirm(pending, Ok(outcome(true, 10)));

        assert!(matches!(result, Err(WizardError::Stale)));
        assert!(w.steps().iter().all(|s| s.record().is_none()));
    }

    #[test]
    fn tentative_choice_is_cleared_when_leaving_the_step() {
        let mut w = wizard();
        w.select_choice(AnswerChoice::Phishing).unwrap();
        let pending = w.begin_confirm().unwrap();
        w.complete_confirm(pending, Ok(outcome(true, 1))).unwrap();
        w.advance().unwrap();

        w.select_choice(AnswerChoice::Phishing).unwrap();
        w.back();
        w.advance().unwrap();
        assert_eq!(w.current().unwrap().selected(), None);
    }

    #[tokio::test]
    async fn back_then_advance_returns_to_the_same_stage() {
        let service = FakeQuiz::replying(vec![
            Ok(outcome(true, 10)),
            Ok(outcome(false, 0)),
            Ok(outcome(true, 5)),
        ]);
        let mut w = wizard();
        for choice in [AnswerChoice::Phishing, AnswerChoice::NotPhishing, AnswerChoice::Phishing] {
            w.select_choice(choice).unwrap();
            w.confirm(&service).await.unwrap();
            w.advance().unwrap();
        }
        assert_eq!(w.stage(), Stage::Summary);
        let before: Vec<_> = w.steps().iter().map(|s| s.record().cloned()).collect();

        for _ in 0..3 {
            let index = w.index();
            w.back();
            w.advance().unwrap();
            assert_eq!(w.index(), index);
            w.back();
        }
        let after: Vec<_> = w.steps().iter().map(|s| s.record().cloned()).collect();
        assert_eq!(before, after);
        assert_eq!(service.call_count(), 3);
    }

    #[tokio::test]
    async fn summary_aggregates_recorded_answers() {
        let service = FakeQuiz::replying(vec![
            Ok(outcome(true, 10)),
            Ok(outcome(false, 0)),
            Ok(outcome(true, 5)),
        ]);
        let mut w = wizard();
        for _ in 0..3 {
            w.select_choice(AnswerChoice::Phishing).unwrap();
            w.confirm(&service).await.unwrap();
            w.advance().unwrap();
        }

        assert_eq!(
            w.summary(),
            QuizSummary {
                answered: 3,
                correct: 2,
                points: 15
            }
        );
        assert_eq!(w.progress_label(), "Result");
    }

    #[tokio::test]
    async fn restart_keeps_answers_locked() {
        let service = FakeQuiz::replying(vec![Ok(outcome(true, 10))]);
        let mut w = wizard();
        w.select_choice(AnswerChoice::Phishing).unwrap();
        w.confirm(&service).await.unwrap();
        w.advance().unwrap();

        w.restart();
        assert_eq!(w.index(), 0);
        assert_eq!(w.progress_label(), "Step 1 / 3");
        assert!(w.current().unwrap().feedback_shown());
        assert_eq!(w.select_choice(AnswerChoice::NotPhishing), Err(WizardError::Locked));
        assert_eq!(w.summary().answered, 1);
    }
}
