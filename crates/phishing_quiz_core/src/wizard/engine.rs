//! crates/phishing_quiz_core/src/wizard/engine.rs
//!
//! A controller over a fixed-length, ordered list of steps. Each step must
//! pass a gate before the user may move forward; moving back is always
//! allowed. Position `len()` is the summary stage.
//!
//! The engine also owns the single-flight bookkeeping for the one network
//! action a wizard may have outstanding: a `Submission` ticket is handed out
//! by `begin_submission` and must be returned to `finish_submission`. Tickets
//! issued before the last `reset` are stale and rejected.

use tracing::debug;

use super::{WizardError, WizardResult};

/// What distinguishes one wizard from another.
pub trait StepPolicy {
    type Step;

    /// Gate for leaving `step` forward.
    fn can_advance(&self, step: &Self::Step) -> bool;

    /// Whether `step` rejects further edits by the user.
    fn is_locked(&self, step: &Self::Step) -> bool;

    /// Rebuilds transient view state when the user (re)enters `step`.
    fn on_enter(&self, _step: &mut Self::Step) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Step(usize),
    Summary,
}

/// Proof that a submission is in flight, tied to the wizard generation
/// and the stage it was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    epoch: u64,
    stage: Stage,
}

impl Submission {
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

pub struct StepWizard<P: StepPolicy> {
    policy: P,
    steps: Vec<P::Step>,
    index: usize,
    submitting: bool,
    epoch: u64,
}

impl<P: StepPolicy> StepWizard<P> {
    pub fn new(policy: P, steps: Vec<P::Step>) -> Self {
        let mut wizard = Self {
            policy,
            steps,
            index: 0,
            submitting: false,
            epoch: 0,
        };
        wizard.enter_current();
        wizard
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current position in `0..=len()`.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stage(&self) -> Stage {
        if self.index >= self.steps.len() {
            Stage::Summary
        } else {
            Stage::Step(self.index)
        }
    }

    pub fn is_summary(&self) -> bool {
        self.stage() == Stage::Summary
    }

    pub fn current(&self) -> Option<&P::Step> {
        self.steps.get(self.index)
    }

    pub fn step(&self, index: usize) -> Option<&P::Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[P::Step] {
        &self.steps
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Gates are re-evaluated on every query, so policy changes take
    /// effect immediately without moving the position.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn can_advance(&self) -> bool {
        self.current().is_some_and(|step| self.policy.can_advance(step))
    }

    pub fn advance(&mut self) -> WizardResult<Stage> {
        let Some(step) = self.current() else {
            return Err(WizardError::AtSummary);
        };
        if !self.policy.can_advance(step) {
            return Err(WizardError::StepIncomplete);
        }
        self.index += 1;
        self.enter_current();
        debug!(index = self.index, "wizard advanced");
        Ok(self.stage())
    }

    /// Never gated. Saturates at the first step.
    pub fn back(&mut self) -> Stage {
        if self.index > 0 {
            self.index = self.index.min(self.steps.len()) - 1;
            self.enter_current();
            debug!(index = self.index, "wizard moved back");
        }
        self.stage()
    }

    /// Returns to the first step, keeping whatever the steps hold.
    pub fn restart(&mut self) {
        self.index = 0;
        self.enter_current();
        debug!("wizard restarted");
    }

    /// Replaces every step and starts a new generation. Outstanding
    /// submissions become stale.
    pub fn reset(&mut self, steps: Vec<P::Step>) {
        self.steps = steps;
        self.index = 0;
        self.submitting = false;
        self.epoch += 1;
        self.enter_current();
        debug!(epoch = self.epoch, len = self.steps.len(), "wizard reset");
    }

    /// Applies a user edit to step `index`, refusing locked steps and
    /// edits while a submission is in flight.
    pub fn edit_step<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut P::Step) -> R,
    ) -> WizardResult<R> {
        if self.submitting {
            return Err(WizardError::Busy);
        }
        let step = self
            .steps
            .get_mut(index)
            .ok_or(WizardError::NoSuchStep(index))?;
        if self.policy.is_locked(step) {
            return Err(WizardError::Locked);
        }
        Ok(edit(step))
    }

    pub fn edit_current<R>(&mut self, edit: impl FnOnce(&mut P::Step) -> R) -> WizardResult<R> {
        if self.is_summary() {
            return Err(WizardError::AtSummary);
        }
        self.edit_step(self.index, edit)
    }

    pub fn begin_submission(&mut self) -> WizardResult<Submission> {
        if self.submitting {
            return Err(WizardError::Busy);
        }
        self.submitting = true;
        Ok(Submission {
            epoch: self.epoch,
            stage: self.stage(),
        })
    }

    /// Releases the in-flight flag. A ticket from an earlier generation is
    /// rejected and leaves the current generation untouched.
    pub fn finish_submission(&mut self, submission: Submission) -> WizardResult<()> {
        if submission.epoch != self.epoch {
            debug!(
                ticket = submission.epoch,
                current = self.epoch,
                "discarding stale submission"
            );
            return Err(WizardError::Stale);
        }
        self.submitting = false;
        Ok(())
    }

    /// Writes the result of a submission into step `index`, bypassing the
    /// user-edit lock.
    pub(crate) fn record_step(&mut self, index: usize, write: impl FnOnce(&mut P::Step)) {
        if let Some(step) = self.steps.get_mut(index) {
            write(step);
        }
    }

    fn enter_current(&mut self) {
        if let Some(step) = self.steps.get_mut(self.index) {
            self.policy.on_enter(step);
        }
    }
}
