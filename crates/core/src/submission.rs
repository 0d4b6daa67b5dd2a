//! Classifying failed prescription saves.
//!
//! A save either fails with a structured field-error body (HTTP 400 with a JSON object of
//! `field -> message`) or with something opaque. The first case feeds the same
//! [`ValidationErrors`] surface as the local form checks; everything else becomes a single
//! notification.

use crate::validation::ValidationErrors;
use indexmap::IndexMap;

const DEFAULT_FAILURE_MESSAGE: &str = "Failed to save prescription";
const DEFAULT_VALIDATION_MESSAGE: &str = "Validation failed";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionFailure {
    /// Field-level errors reported by the backend.
    Validation(ValidationErrors),
    /// A single user-facing message.
    Notification(String),
}

impl SubmissionFailure {
    /// Classify a failed save from its HTTP status (absent for network errors) and body.
    pub fn classify(status: Option<u16>, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        if status == Some(400) {
            if let Some(errors) = parsed.as_ref().and_then(field_errors) {
                tracing::debug!(fields = errors.len(), "backend rejected prescription fields");
                return Self::Validation(errors);
            }
        }

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty());

        match message {
            Some(message) => Self::Notification(message.to_owned()),
            None => {
                tracing::warn!(?status, "prescription save failed without a usable body");
                Self::Notification(DEFAULT_FAILURE_MESSAGE.to_owned())
            }
        }
    }

    /// The single message shown to the user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Validation(errors) => errors
                .first_message()
                .unwrap_or(DEFAULT_VALIDATION_MESSAGE),
            Self::Notification(message) => message,
        }
    }

    /// Merge backend field errors into the local ones. Notifications leave `local` untouched.
    pub fn merge_into(self, local: &mut ValidationErrors) {
        if let Self::Validation(remote) = self {
            local.merge(remote);
        }
    }
}

/// A non-empty JSON object whose values are all strings.
fn field_errors(value: &serde_json::Value) -> Option<ValidationErrors> {
    let map: IndexMap<String, String> = serde_json::from_value(value.clone()).ok()?;
    if map.is_empty() {
        return None;
    }
    Some(map.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::field;

    #[test]
    fn bad_request_with_field_map_is_validation() {
        let failure = SubmissionFailure::classify(
            Some(400),
            r#"{"patientName": "Name too long", "patientAge": "Age must be a number"}"#,
        );
        match &failure {
            SubmissionFailure::Validation(errors) => {
                assert_eq!(errors.get(field::PATIENT_NAME), Some("Name too long"));
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(failure.user_message(), "Name too long");
    }

    #[test]
    fn message_body_becomes_notification() {
        let failure = SubmissionFailure::classify(Some(500), r#"{"message": "Database down"}"#);
        assert_eq!(failure, SubmissionFailure::Notification("Database down".into()));

        // A 400 whose object holds non-string values is not a field map.
        let failure = SubmissionFailure::classify(
            Some(400),
            r#"{"message": "Bad payload", "status": 400}"#,
        );
        assert_eq!(failure.user_message(), "Bad payload");
    }

    #[test]
    fn opaque_failures_use_default_message() {
        for (status, body) in [
            (None, ""),
            (Some(502), "<html>Bad gateway</html>"),
            (Some(400), "{}"),
            (Some(500), r#"{"message": "   "}"#),
        ] {
            assert_eq!(
                SubmissionFailure::classify(status, body).user_message(),
                DEFAULT_FAILURE_MESSAGE,
                "status {status:?} body {body:?}"
            );
        }
    }

    #[test]
    fn server_errors_overwrite_local_messages() {
        let mut local = ValidationErrors::new();
        local.insert(field::PATIENT_NAME, "Patient name is required");

        SubmissionFailure::classify(Some(400), r#"{"patientName": "Duplicate patient"}"#)
            .merge_into(&mut local);
        assert_eq!(local.get(field::PATIENT_NAME), Some("Duplicate patient"));

        SubmissionFailure::Notification("ignored".into()).merge_into(&mut local);
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn empty_validation_falls_back_to_generic_message() {
        let failure = SubmissionFailure::Validation(ValidationErrors::new());
        assert_eq!(failure.user_message(), DEFAULT_VALIDATION_MESSAGE);
    }
}
