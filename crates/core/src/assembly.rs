//! Prescription assembly.
//!
//! A [`PrescriptionDraft`] collects structured entries while a prescription is being written,
//! and flattens them into the create/update payloads through the `rx-codec` encoders. Nothing
//! here knows about delimiters.

use crate::validation::{PatientForm, ValidatedPatient};
use crate::{RxError, RxResult};
use rx_codec::{
    encode_list_field, encode_medicine_items, encode_plain_list, CreatePrescriptionReq,
    MedicineItem, SectionItem, UpdatePrescriptionReq,
};
use rx_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// An ordered list of entries. Entries are appended at the end and removed by position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T>(Vec<T>);

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> EntryList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item`. Duplicates are kept.
    pub fn add(&mut self, item: T) {
        self.0.push(item);
    }

    /// Removes and returns the entry at `index`, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`RxError::IndexOutOfRange`] if `index >= len()`. The list is left unchanged.
    pub fn remove_at(&mut self, index: usize) -> RxResult<T> {
        let len = self.0.len();
        if index >= len {
            return Err(RxError::IndexOutOfRange { index, len });
        }
        Ok(self.0.remove(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for EntryList<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> FromIterator<T> for EntryList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a EntryList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A requested investigation with an optional remark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationItem {
    pub test: NonEmptyText,
    #[serde(default)]
    pub remark: String,
}

impl InvestigationItem {
    pub fn new(test: impl AsRef<str>, remark: impl Into<String>) -> RxResult<Self> {
        Ok(Self {
            test: NonEmptyText::new(test)?,
            remark: remark.into().trim().to_owned(),
        })
    }

    pub fn to_section_item(&self) -> SectionItem {
        SectionItem::with_note(self.test.as_str(), self.remark.clone())
    }
}

/// Working state of a prescription being written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrescriptionDraft {
    pub patient: PatientForm,
    pub medicines: EntryList<MedicineItem>,
    pub complaints: EntryList<SectionItem>,
    pub histories: EntryList<SectionItem>,
    pub investigations: EntryList<InvestigationItem>,
    pub advices: EntryList<String>,
    pub diagnosis: String,
    pub on_examination: String,
    pub treatment_plan: String,
    pub follow_up: String,
    pub notes: String,
}

impl PrescriptionDraft {
    pub fn new(patient: PatientForm) -> Self {
        Self {
            patient,
            ..Self::default()
        }
    }

    /// Validates the patient fields and builds the create payload.
    ///
    /// # Errors
    ///
    /// Returns [`RxError::Validation`] carrying every failing field.
    pub fn create_request(&self) -> RxResult<CreatePrescriptionReq> {
        let patient = self.patient.validate().map_err(RxError::Validation)?;
        Ok(self.build_create(patient))
    }

    /// Validates the patient fields and builds the full update payload, every list field
    /// flattened.
    pub fn update_request(&self) -> RxResult<UpdatePrescriptionReq> {
        let patient = self.patient.validate().map_err(RxError::Validation)?;
        let investigations: Vec<SectionItem> = self
            .investigations
            .iter()
            .map(InvestigationItem::to_section_item)
            .collect();

        Ok(UpdatePrescriptionReq {
            base: self.build_create(patient),
            chief_complaint: encode_list_field(self.complaints.as_slice()),
            history: encode_list_field(self.histories.as_slice()),
            on_examination: self.on_examination.trim().to_owned(),
            investigation: encode_list_field(&investigations),
            treatment_plan: self.treatment_plan.trim().to_owned(),
            advice: encode_plain_list(self.advices.as_slice()),
            follow_up: self.follow_up.trim().to_owned(),
            special_notes: self.notes.trim().to_owned(),
        })
    }

    fn build_create(&self, patient: ValidatedPatient) -> CreatePrescriptionReq {
        tracing::debug!(
            medicines = self.medicines.len(),
            complaints = self.complaints.len(),
            "assembling prescription payload"
        );

        CreatePrescriptionReq {
            prescription_date: patient.prescription_date,
            patient_name: patient.patient_name,
            patient_age: patient.patient_age,
            patient_gender: patient.patient_gender,
            diagnosis: self.diagnosis.trim().to_owned(),
            medicines: encode_medicine_items(self.medicines.as_slice()),
            next_visit_date: patient.next_visit_date,
        }
    }
}
