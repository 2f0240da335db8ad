//! Wizard step definitions, per-step validation and the form controller.
//!
//! The wizard is a linear sequence of steps indexed from zero. Moving
//! forward validates the current step; moving back never invalidates
//! anything. The furthest step reached is remembered so the customer can
//! jump back to any step already visited.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::deadline::validate_deadline;
use crate::error::CoreError;
use crate::order::{DeliveryFormat, Occasion, OrderForm, MAX_ANIMATION_STYLES, MAX_CHARACTERS};
use crate::palette::ColorPalette;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Details,
    DeliveryFormats,
    Characters,
    Content,
    ColorPalette,
    AnimationStyles,
    Style,
    Deadline,
    Review,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 9;

/// Index of the last step (review).
pub const LAST_STEP: u8 = TOTAL_STEPS - 1;

impl WizardStep {
    pub const ALL: [WizardStep; TOTAL_STEPS as usize] = [
        Self::Details,
        Self::DeliveryFormats,
        Self::Characters,
        Self::Content,
        Self::ColorPalette,
        Self::AnimationStyles,
        Self::Style,
        Self::Deadline,
        Self::Review,
    ];

    /// Convert a 0-based step index to a `WizardStep`.
    pub fn from_index(index: u8) -> Result<Self, CoreError> {
        Self::ALL.get(index as usize).copied().ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid step {index}. Must be between 0 and {LAST_STEP}"
            ))
        })
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Details => "Your details",
            Self::DeliveryFormats => "Delivery formats",
            Self::Characters => "Characters",
            Self::Content => "Invitation content",
            Self::ColorPalette => "Color palette",
            Self::AnimationStyles => "Animation styles",
            Self::Style => "Visual style",
            Self::Deadline => "Deadline",
            Self::Review => "Review",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-step validation
// ---------------------------------------------------------------------------

fn validation(msg: impl Into<String>) -> CoreError {
    CoreError::Validation(msg.into())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate the answers belonging to a single step.
///
/// The review step checks the contact e-mail and every earlier step.
pub fn validate_step(step: WizardStep, form: &OrderForm, today: NaiveDate) -> Result<(), CoreError> {
    match step {
        WizardStep::Details => {
            if is_blank(&form.name) {
                return Err(validation("Please tell us your name"));
            }
            match form.occasion {
                None => return Err(validation("Please choose the occasion")),
                Some(Occasion::Other)
                    if form.occasion_other.as_deref().map_or(true, is_blank) =>
                {
                    return Err(validation("Please describe the occasion"));
                }
                Some(_) => {}
            }
        }
        WizardStep::DeliveryFormats => {
            if form.delivery_formats.is_empty() {
                return Err(validation("Please choose at least one delivery format"));
            }
        }
        WizardStep::Characters => {
            if form.has_characters {
                if form.character_count == 0 || form.character_count > MAX_CHARACTERS {
                    return Err(validation(format!(
                        "Please choose between 1 and {MAX_CHARACTERS} characters"
                    )));
                }
                if form.characters.len() != form.character_count as usize {
                    return Err(validation(format!(
                        "Expected {} character entries, got {}",
                        form.character_count,
                        form.characters.len()
                    )));
                }
                let mut ids = HashSet::new();
                if !form.characters.iter().all(|c| ids.insert(c.id)) {
                    return Err(validation("Character ids must be unique"));
                }
            } else if form.character_count != 0 {
                return Err(validation(
                    "Character count must be zero when no characters are included",
                ));
            }
        }
        WizardStep::Content => {
            if is_blank(&form.message) {
                return Err(validation("Please enter the invitation text"));
            }
        }
        WizardStep::ColorPalette => {
            let encoded = form
                .color_palette
                .as_deref()
                .ok_or_else(|| validation("Please choose a color palette"))?;
            ColorPalette::decode(encoded)?;
        }
        WizardStep::AnimationStyles => {
            let styles = &form.animation_styles;
            if styles.len() > MAX_ANIMATION_STYLES {
                return Err(validation(format!(
                    "Please choose at most {MAX_ANIMATION_STYLES} animation styles"
                )));
            }
            let mut seen = HashSet::new();
            if !styles.iter().all(|s| seen.insert(*s)) {
                return Err(validation("Each animation style can only be chosen once"));
            }
            if styles.is_empty() && form.has_format(DeliveryFormat::Video) {
                return Err(validation(
                    "Please choose at least one animation style for the video",
                ));
            }
        }
        WizardStep::Style => {
            if form.visual_style.is_none() {
                return Err(validation("Please choose a visual style"));
            }
        }
        WizardStep::Deadline => {
            let deadline = form
                .deadline
                .ok_or_else(|| validation("Please choose a deadline"))?;
            validate_deadline(today, deadline)?;
        }
        WizardStep::Review => {
            form.validate()
                .map_err(|e| validation(format!("Please check your contact details: {e}")))?;
            for earlier in &WizardStep::ALL[..LAST_STEP as usize] {
                validate_step(*earlier, form, today)?;
            }
        }
    }
    Ok(())
}

/// Whether the given step's answers are complete.
pub fn can_advance_step(step: WizardStep, form: &OrderForm, today: NaiveDate) -> bool {
    validate_step(step, form, today).is_ok()
}

// ---------------------------------------------------------------------------
// Submission state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Submitted,
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// FormController
// ---------------------------------------------------------------------------

/// Answers plus navigation and submission state for one wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormController {
    pub answers: OrderForm,
    pub current_step: WizardStep,
    pub max_step_reached: WizardStep,
    pub submission: SubmissionState,
}

impl Default for FormController {
    fn default() -> Self {
        Self {
            answers: OrderForm::default(),
            current_step: WizardStep::Details,
            max_step_reached: WizardStep::Details,
            submission: SubmissionState::Idle,
        }
    }
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_editable(&self) -> Result<(), CoreError> {
        match self.submission {
            SubmissionState::Submitted => Err(CoreError::Conflict(
                "This request has already been submitted".to_string(),
            )),
            SubmissionState::Submitting => Err(CoreError::Conflict(
                "A submission is already in progress".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Replace the answers. The `submitted` flag is owned by the controller.
    pub fn update(&mut self, mut answers: OrderForm) -> Result<(), CoreError> {
        self.ensure_editable()?;
        answers.submitted = self.answers.submitted;
        self.answers = answers;
        if matches!(self.submission, SubmissionState::Failed { .. }) {
            self.submission = SubmissionState::Idle;
        }
        Ok(())
    }

    /// Validate the current step and move one step forward.
    pub fn next(&mut self, today: NaiveDate) -> Result<WizardStep, CoreError> {
        self.ensure_editable()?;
        let current = self.current_step;
        if current.index() >= LAST_STEP {
            return Err(validation("Already on the last step"));
        }
        validate_step(current, &self.answers, today)?;
        let next = WizardStep::from_index(current.index() + 1)?;
        self.current_step = next;
        self.max_step_reached = self.max_step_reached.max(next);
        Ok(next)
    }

    /// Move one step back. Answers are left untouched.
    pub fn back(&mut self) -> Result<WizardStep, CoreError> {
        self.ensure_editable()?;
        let current = self.current_step.index();
        if current == 0 {
            return Err(validation("Already on the first step; cannot go back"));
        }
        self.current_step = WizardStep::from_index(current - 1)?;
        Ok(self.current_step)
    }

    /// Jump to any step already reached.
    pub fn go_to(&mut self, step: WizardStep) -> Result<WizardStep, CoreError> {
        self.ensure_editable()?;
        if step > self.max_step_reached {
            return Err(validation(format!(
                "Step '{}' has not been reached yet",
                step.label()
            )));
        }
        self.current_step = step;
        Ok(step)
    }

    /// Mark the form as being submitted.
    ///
    /// Requires the review step and a fully valid form. A previous failure
    /// may be retried.
    pub fn begin_submission(&mut self, today: NaiveDate) -> Result<(), CoreError> {
        self.ensure_editable()?;
        if self.current_step != WizardStep::Review {
            return Err(validation(format!(
                "Cannot submit from step '{}'; finish the form first",
                self.current_step.label()
            )));
        }
        validate_step(WizardStep::Review, &self.answers, today)?;
        self.submission = SubmissionState::Submitting;
        Ok(())
    }

    fn ensure_submitting(&self) -> Result<(), CoreError> {
        if self.submission == SubmissionState::Submitting {
            Ok(())
        } else {
            Err(CoreError::Conflict(
                "No submission is in progress for this request".to_string(),
            ))
        }
    }

    /// Record delivery of the in-flight submission.
    pub fn mark_submitted(&mut self) -> Result<(), CoreError> {
        self.ensure_submitting()?;
        self.submission = SubmissionState::Submitted;
        self.answers.submitted = true;
        Ok(())
    }

    /// Record failure of the in-flight submission.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_submitting()?;
        self.submission = SubmissionState::Failed {
            message: message.into(),
        };
        Ok(())
    }

    /// Start over with an empty form.
    ///
    /// Allowed after a submission completes, but not while one is in flight.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        if self.submission == SubmissionState::Submitting {
            return Err(CoreError::Conflict(
                "Cannot start over while a submission is in progress".to_string(),
            ));
        }
        *self = Self::default();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
