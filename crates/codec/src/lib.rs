//! Prescription wire/boundary support.
//!
//! The backend stores a prescription as a flat record of text fields. List-like fields are
//! packed into a single string with ad hoc delimiters, and the medicine field is line-oriented.
//! This crate is the single translation boundary for those encodings:
//! - decoding flat fields into [`SectionItem`]s and [`MedicineLine`]s (never fails)
//! - encoding structured entries back into flat text
//! - the JSON shapes exchanged with the backend ([`PrescriptionRecord`] and the
//!   create/update payloads)
//!
//! Delimiter rules must not leak past this crate. Callers work with the structured types only.

pub mod medicine;
pub mod payload;
pub mod record;
pub mod section;

pub use medicine::{
    decode_medicine_field, encode_medicine_items, encode_medicine_lines, DoseSchedule,
    MealTiming, MedicineDetails, MedicineItem, MedicineLine,
};
pub use payload::{CreatePrescriptionReq, UpdatePrescriptionReq};
pub use record::{DecodedPrescription, PrescriptionRecord};
pub use section::{
    decode_diagnosis_field, decode_list_field, decode_plain_list, encode_diagnosis_field,
    encode_list_field, encode_plain_list, SectionItem,
};

/// Errors returned by the `rx-codec` boundary crate.
///
/// Only JSON parsing can fail. Flat-field decoding is best-effort and infallible.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`CodecError`].
pub type CodecResult<T> = Result<T, CodecError>;
