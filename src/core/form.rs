//! Per-family form state
//!
//! Each indicator family owns its own input and publishes a fresh
//! [`FormState`] to subscribers after every change. Recalculation is
//! synchronous on the caller's turn; there is one writer per form.

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::calculator::{CalculationResult, IndicatorInput};
use crate::types::FieldError;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FormState {
    pub result: Option<CalculationResult>,
    pub errors: Vec<FieldError>,
}

impl FormState {
    pub fn evaluate<I: IndicatorInput>(input: &I) -> Self {
        Self {
            result: input.calculate(),
            errors: input.validate(),
        }
    }
}

pub struct IndicatorForm<I: IndicatorInput> {
    input: I,
    state: watch::Sender<FormState>,
}

impl<I: IndicatorInput> Default for IndicatorForm<I> {
    fn default() -> Self {
        Self::new(I::default())
    }
}

impl<I: IndicatorInput> IndicatorForm<I> {
    pub fn new(input: I) -> Self {
        let (state, _) = watch::channel(FormState::evaluate(&input));
        Self { input, state }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Latest published state
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn result(&self) -> Option<CalculationResult> {
        self.state.borrow().result
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Apply an edit and recalculate immediately
    pub fn update(&mut self, edit: impl FnOnce(&mut I)) -> FormState {
        edit(&mut self.input);
        let next = FormState::evaluate(&self.input);
        debug!(
            family = I::FAMILY.code(),
            computed = next.result.is_some(),
            errors = next.errors.len(),
            "recalculated"
        );
        self.state.send_replace(next.clone());
        next
    }

    /// Replace the whole input
    pub fn set(&mut self, input: I) -> FormState {
        self.update(|current| *current = input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::{FsrInput, IfrInput};

    #[test]
    fn test_new_form_has_no_result() {
        let form: IndicatorForm<FsrInput> = IndicatorForm::default();
        assert_eq!(form.result(), None);
        assert_eq!(form.state().errors.len(), 2);
    }

    #[test]
    fn test_each_edit_recalculates() {
        let mut form: IndicatorForm<FsrInput> = IndicatorForm::default();

        form.update(|i| i.total_academic_staff = Some(100.0));
        assert_eq!(form.result(), None);

        let state = form.update(|i| i.total_students = Some(2000.0));
        assert_eq!(state.result.map(|r| r.ratio), Some(20.0));
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_subscribers_see_latest_state() {
        let mut form = IndicatorForm::new(IfrInput::new(10.0, 100.0));
        let mut rx = form.subscribe();
        assert_eq!(rx.borrow().result.map(|r| r.score), Some(20.0));

        form.update(|i| i.international_staff = Some(150.0));
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.result, None);
        assert_eq!(seen.errors.len(), 1);
    }

    #[test]
    fn test_set_replaces_input() {
        let mut form: IndicatorForm<FsrInput> = IndicatorForm::default();
        form.set(FsrInput::new(50.0, 500.0));
        assert_eq!(form.input(), &FsrInput::new(50.0, 500.0));
        assert_eq!(form.result().map(|r| r.score), Some(100.0));
    }
}
