//! Request lifecycle.
//!
//! The phase of a request is decided from that request alone: its action,
//! whether it carries values and, for submissions, the validation outcome.

use serde::Serialize;

use crate::request::Action;
use crate::validation::ValidationReport;

/// Stage of the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Record list
    List,
    /// Empty or prefilled form, nothing submitted
    FormView,
    /// Submitted values passed validation and get persisted
    FormSave,
    /// Submitted values were rejected; the form is shown again with them
    FormError,
    /// Checked records are deleted, then the list is shown
    Delete,
}

/// What a request renders when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Artifact {
    List,
    Form,
}

impl Phase {
    /// Phase entered when a request arrives.
    ///
    /// A submission enters as [`Phase::FormSave`] and is settled by
    /// [`Phase::after_validation`].
    pub fn initial(action: Action, has_values: bool) -> Self {
        match action {
            Action::Find | Action::Show => Phase::List,
            Action::Delete => Phase::Delete,
            Action::View if has_values => Phase::FormSave,
            Action::View => Phase::FormView,
        }
    }

    /// Settles a submission once its report is known.
    pub fn after_validation(self, report: &ValidationReport) -> Self {
        match self {
            Phase::FormSave if !report.is_savable() => Phase::FormError,
            other => other,
        }
    }

    /// Phase following a completed delete.
    pub fn after_delete(self) -> Self {
        match self {
            Phase::Delete => Phase::List,
            other => other,
        }
    }

    /// Form phases take input; list and delete phases produce output.
    pub fn is_input(&self) -> bool {
        matches!(self, Phase::FormView | Phase::FormSave | Phase::FormError)
    }

    pub fn artifact(&self) -> Artifact {
        if self.is_input() {
            Artifact::Form
        } else {
            Artifact::List
        }
    }
}
