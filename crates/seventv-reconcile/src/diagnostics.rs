//! Diagnostics returned to the host instead of raised errors.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ReconcileError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single message for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind: None,
            summary: summary.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&ReconcileError> for Diagnostic {
    fn from(err: &ReconcileError) -> Self {
        let detail = if err.is_partial_apply() {
            Some(
                "Membership changes before this one may already be applied remotely. \
                 Refresh the emote set to bring local state back in line."
                    .to_string(),
            )
        } else if err.kind() == ErrorKind::NotFound {
            Some("The emote set was removed outside of this controller.".to_string())
        } else {
            None
        };
        Self {
            severity: Severity::Error,
            kind: Some(err.kind()),
            summary: err.to_string(),
            detail,
        }
    }
}

impl From<ReconcileError> for Diagnostic {
    fn from(err: ReconcileError) -> Self {
        Diagnostic::from(&err)
    }
}

/// Ordered diagnostics of one lifecycle call. Empty means success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.0.push(diagnostic.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|d| d.kind == Some(kind))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

impl From<ReconcileError> for Diagnostics {
    fn from(err: ReconcileError) -> Self {
        Self(vec![err.into()])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingDirection;
    use seventv_core::Error;

    #[test]
    fn test_empty_is_success() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_warning_is_not_error() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning("heads up").with_detail("more"));
        assert_eq!(diags.len(), 1);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_from_error() {
        let diags: Diagnostics = ReconcileError::Delete {
            id: "abc".into(),
            source: Error::Http("reset".into()),
        }
        .into();
        assert!(diags.has_errors());
        assert!(diags.has_kind(ErrorKind::Delete));
        assert!(!diags.has_kind(ErrorKind::Read));
    }

    #[test]
    fn test_binding_detail_flags_partial_apply() {
        let diag = Diagnostic::from(ReconcileError::Binding {
            set_id: "abc".into(),
            emote_id: "1".into(),
            direction: BindingDirection::Add,
            source: Error::Http("reset".into()),
        });
        assert!(diag.detail.unwrap().contains("already be applied"));
    }

    #[test]
    fn test_serialized_shape() {
        let diags: Diagnostics = ReconcileError::MissingId { operation: "read" }.into();
        let json = serde_json::to_value(&diags).unwrap();
        assert_eq!(json[0]["severity"], "error");
        assert_eq!(json[0]["kind"], "missing_id");
        assert!(json[0].get("detail").is_none());
    }
}
