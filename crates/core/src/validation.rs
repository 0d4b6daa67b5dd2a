//! Prescription form validation.
//!
//! Every failing field is reported at once, as a map from the form's field name to a message.
//! The same map also carries field errors returned by the backend, see
//! [`crate::submission::SubmissionFailure`].

use indexmap::IndexMap;
use rx_types::{CalendarDate, NonEmptyText, PatientAge, TextError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Form field names, shared with the backend's error bodies.
pub mod field {
    pub const PRESCRIPTION_DATE: &str = "prescriptionDate";
    pub const PATIENT_NAME: &str = "patientName";
    pub const PATIENT_AGE: &str = "patientAge";
    pub const PATIENT_GENDER: &str = "patientGender";
    pub const NEXT_VISIT_DATE: &str = "nextVisitDate";
}

const MSG_DATE_REQUIRED: &str = "Prescription date is required";
const MSG_INVALID_DATE: &str = "Please enter a valid date";
const MSG_NAME_REQUIRED: &str = "Patient name is required";
const MSG_AGE_REQUIRED: &str = "Patient age is required";
const MSG_INVALID_AGE: &str = "Please enter a valid age (0-150)";
const MSG_GENDER_REQUIRED: &str = "Gender is required";

/// Field-level validation failures, in the order they were found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Folds `other` in. Messages from `other` win for fields present in both.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.0.insert(field, message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Raw patient fields as typed into the prescription form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientForm {
    pub prescription_date: String,
    pub patient_name: String,
    pub patient_age: String,
    pub patient_gender: String,
    pub next_visit_date: String,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            prescription_date: String::new(),
            patient_name: String::new(),
            patient_age: String::new(),
            patient_gender: "M".into(),
            next_visit_date: String::new(),
        }
    }
}

/// Patient fields that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPatient {
    pub prescription_date: CalendarDate,
    pub patient_name: NonEmptyText,
    pub patient_age: PatientAge,
    pub patient_gender: NonEmptyText,
    pub next_visit_date: Option<CalendarDate>,
}

impl PatientForm {
    /// Checks every field and returns either the typed values or all failures together.
    ///
    /// Rules:
    /// - prescription date: required, must be a real calendar date
    /// - patient name: required (non-blank)
    /// - patient age: required, whole number in `0..=150`
    /// - gender: required
    /// - next visit date: optional, but a real calendar date when given
    pub fn validate(&self) -> Result<ValidatedPatient, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let prescription_date = match CalendarDate::parse(&self.prescription_date) {
            Ok(date) => Some(date),
            Err(TextError::Empty) => {
                errors.insert(field::PRESCRIPTION_DATE, MSG_DATE_REQUIRED);
                None
            }
            Err(_) => {
                errors.insert(field::PRESCRIPTION_DATE, MSG_INVALID_DATE);
                None
            }
        };

        let patient_name = NonEmptyText::new(&self.patient_name)
            .map_err(|_| errors.insert(field::PATIENT_NAME, MSG_NAME_REQUIRED))
            .ok();

        let patient_age = match PatientAge::parse(&self.patient_age) {
            Ok(age) => Some(age),
            Err(TextError::Empty) => {
                errors.insert(field::PATIENT_AGE, MSG_AGE_REQUIRED);
                None
            }
            Err(_) => {
                errors.insert(field::PATIENT_AGE, MSG_INVALID_AGE);
                None
            }
        };

        let patient_gender = NonEmptyText::new(&self.patient_gender)
            .map_err(|_| errors.insert(field::PATIENT_GENDER, MSG_GENDER_REQUIRED))
            .ok();

        let next_visit_date = if self.next_visit_date.trim().is_empty() {
            None
        } else {
            match CalendarDate::parse(&self.next_visit_date) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(field::NEXT_VISIT_DATE, MSG_INVALID_DATE);
                    None
                }
            }
        };

        match (prescription_date, patient_name, patient_age, patient_gender) {
            (Some(prescription_date), Some(patient_name), Some(patient_age), Some(patient_gender))
                if errors.is_empty() =>
            {
                Ok(ValidatedPatient {
                    prescription_date,
                    patient_name,
                    patient_age,
                    patient_gender,
                    next_visit_date,
                })
            }
            _ => {
                tracing::debug!(failures = errors.len(), "prescription form rejected");
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> PatientForm {
        PatientForm {
            prescription_date: "2026-03-05".into(),
            patient_name: "Rahima Begum".into(),
            patient_age: "46".into(),
            patient_gender: "F".into(),
            next_visit_date: String::new(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let patient = valid_form().validate().expect("valid form");
        assert_eq!(patient.patient_name.as_str(), "Rahima Begum");
        assert_eq!(patient.patient_age.years(), 46);
        assert_eq!(patient.next_visit_date, None);
    }

    #[test]
    fn test_age_bounds() {
        for age in ["-1", "151", "abc"] {
            let form = PatientForm {
                patient_age: age.into(),
                ..valid_form()
            };
            let errors = form.validate().expect_err("age should fail");
            assert_eq!(errors.get(field::PATIENT_AGE), Some(MSG_INVALID_AGE), "age {age}");
        }
        for age in ["0", "150"] {
            let form = PatientForm {
                patient_age: age.into(),
                ..valid_form()
            };
            assert!(form.validate().is_ok(), "age {age} should pass");
        }
    }

    #[test]
    fn test_missing_fields_are_required_errors() {
        let form = PatientForm {
            prescription_date: String::new(),
            patient_name: "   ".into(),
            patient_age: String::new(),
            patient_gender: String::new(),
            next_visit_date: String::new(),
        };
        let errors = form.validate().expect_err("empty form should fail");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(field::PRESCRIPTION_DATE), Some(MSG_DATE_REQUIRED));
        assert_eq!(errors.get(field::PATIENT_NAME), Some(MSG_NAME_REQUIRED));
        assert_eq!(errors.get(field::PATIENT_AGE), Some(MSG_AGE_REQUIRED));
        assert_eq!(errors.get(field::PATIENT_GENDER), Some(MSG_GENDER_REQUIRED));
        assert_eq!(errors.get(field::NEXT_VISIT_DATE), None);
    }

    #[test]
    fn test_next_visit_is_optional_but_checked() {
        let bad = PatientForm {
            next_visit_date: "2026-13-40".into(),
            ..valid_form()
        };
        let errors = bad.validate().expect_err("invalid next visit");
        assert_eq!(errors.get(field::NEXT_VISIT_DATE), Some(MSG_INVALID_DATE));
        assert_eq!(errors.len(), 1);

        let good = PatientForm {
            next_visit_date: "2026-03-12".into(),
            ..valid_form()
        };
        let patient = good.validate().expect("valid next visit");
        assert_eq!(
            patient.next_visit_date.map(|d| d.iso()),
            Some("2026-03-12".to_string())
        );
    }

    #[test]
    fn test_invalid_prescription_date_message() {
        let form = PatientForm {
            prescription_date: "yesterday".into(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("bad date");
        assert_eq!(errors.get(field::PRESCRIPTION_DATE), Some(MSG_INVALID_DATE));
    }

    #[test]
    fn test_merge_prefers_incoming_messages_and_keeps_order() {
        let mut errors = ValidationErrors::new();
        errors.insert(field::PATIENT_NAME, "client says");
        errors.insert(field::PATIENT_AGE, MSG_INVALID_AGE);

        let server: ValidationErrors = [
            (field::PATIENT_NAME.to_string(), "server says".to_string()),
            ("diagnosis".to_string(), "too long".to_string()),
        ]
        .into_iter()
        .collect();

        errors.merge(server);
        assert_eq!(errors.get(field::PATIENT_NAME), Some("server says"));
        assert_eq!(errors.first_message(), Some("server says"));
        assert_eq!(
            errors.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec![field::PATIENT_NAME, field::PATIENT_AGE, "diagnosis"]
        );
        assert_eq!(
            errors.to_string(),
            "patientName: server says; patientAge: Please enter a valid age (0-150); diagnosis: too long"
        );
    }
}
