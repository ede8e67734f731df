use serde::{Deserialize, Serialize};

use super::domain::{RegistrationStep, StepStatus};

/// Per-render view of one stepper entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    pub step: RegistrationStep,
    pub label: &'static str,
    pub step_number: u8,
    pub status: StepStatus,
}

/// Navigation errors raised by the wizard controller.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("step {0} is outside the wizard range")]
    StepOutOfRange(u8),
    #[error("step {requested} has not been reached yet (currently on step {current})")]
    FutureStep { requested: u8, current: u8 },
}

/// Tracks the wizard position over the four ordered registration steps.
///
/// Navigation clamps at both ends; jumping is only allowed backwards onto
/// steps already visited. "Complete" means "visited": advancing never
/// validates the draft (submission does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationWizard {
    current: u8,
}

impl RegistrationWizard {
    pub const TOTAL_STEPS: u8 = RegistrationStep::ordered().len() as u8;

    pub fn new() -> Self {
        Self { current: 1 }
    }

    pub fn current_number(&self) -> u8 {
        self.current
    }

    pub fn current_step(&self) -> RegistrationStep {
        RegistrationStep::from_number(self.current).expect("current step is always in range")
    }

    pub fn is_final_step(&self) -> bool {
        self.current == Self::TOTAL_STEPS
    }

    /// Advance one step, saturating at the final step.
    pub fn advance(&mut self) -> RegistrationStep {
        self.current = (self.current + 1).min(Self::TOTAL_STEPS);
        self.current_step()
    }

    /// Go back one step, saturating at the first step.
    pub fn retreat(&mut self) -> RegistrationStep {
        self.current = self.current.saturating_sub(1).max(1);
        self.current_step()
    }

    /// Jump directly to a visited step. Future steps are rejected.
    pub fn go_to(&mut self, step_number: u8) -> Result<RegistrationStep, WizardError> {
        if RegistrationStep::from_number(step_number).is_none() {
            return Err(WizardError::StepOutOfRange(step_number));
        }
        if step_number > self.current {
            return Err(WizardError::FutureStep {
                requested: step_number,
                current: self.current,
            });
        }

        self.current = step_number;
        Ok(self.current_step())
    }

    pub fn status_of(&self, step: RegistrationStep) -> StepStatus {
        let number = step.number();
        if number < self.current {
            StepStatus::Complete
        } else if number == self.current {
            StepStatus::Current
        } else {
            StepStatus::Incomplete
        }
    }

    /// Derive the stepper entries for the current position.
    pub fn step_views(&self) -> Vec<StepView> {
        RegistrationStep::ordered()
            .into_iter()
            .map(|step| StepView {
                step,
                label: step.label(),
                step_number: step.number(),
                status: self.status_of(step),
            })
            .collect()
    }
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_assignment_follows_position() {
        let mut wizard = RegistrationWizard::new();
        wizard.advance();
        wizard.advance();

        let views = wizard.step_views();
        assert_eq!(views[0].status, StepStatus::Complete);
        assert_eq!(views[1].status, StepStatus::Complete);
        assert_eq!(views[2].status, StepStatus::Current);
        assert_eq!(views[3].status, StepStatus::Incomplete);
    }

    #[test]
    fn exactly_one_step_is_current_at_every_position() {
        let mut wizard = RegistrationWizard::new();
        for _ in 0..RegistrationWizard::TOTAL_STEPS {
            let current = wizard
                .step_views()
                .iter()
                .filter(|view| view.status == StepStatus::Current)
                .count();
            assert_eq!(current, 1);
            wizard.advance();
        }
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.retreat().number(), 1);

        for _ in 0..10 {
            wizard.advance();
        }
        assert_eq!(wizard.current_number(), RegistrationWizard::TOTAL_STEPS);
        assert_eq!(wizard.advance().number(), RegistrationWizard::TOTAL_STEPS);
    }

    #[test]
    fn jumping_ahead_is_rejected() {
        let mut wizard = RegistrationWizard::new();
        wizard.advance();

        assert!(matches!(
            wizard.go_to(4),
            Err(WizardError::FutureStep {
                requested: 4,
                current: 2
            })
        ));
        assert!(matches!(wizard.go_to(0), Err(WizardError::StepOutOfRange(0))));
        assert_eq!(
            wizard.go_to(1).expect("visited step"),
            RegistrationStep::TaxpayerInfo
        );
    }
}
