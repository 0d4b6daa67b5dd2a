//! The flat prescription record exchanged with the backend, and its decoded form.
//!
//! Responsibilities:
//! - Define the JSON wire model returned by `GET /API/v1/prescription[/{id}]`
//! - Parse single records, lists, and the `{ "data": ... }` envelope
//! - Decode every flat field into its structured form for display
//!
//! Notes:
//! - The backend may send `null` for any text field; it is read as empty text
//! - Unknown keys are ignored, the backend adds bookkeeping fields freely

use crate::medicine::{decode_medicine_field, encode_medicine_lines, MedicineLine};
use crate::section::{
    decode_diagnosis_field, decode_list_field, decode_plain_list, encode_diagnosis_field,
    encode_list_field, encode_plain_list, SectionItem,
};
use crate::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Wire types
// ============================================================================

/// Wire representation of a stored prescription.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrescriptionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription_id: Option<i64>,

    /// Patient identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(deserialize_with = "text_or_null")]
    pub visit: String,

    #[serde(deserialize_with = "text_or_null")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_age: Option<i64>,

    #[serde(deserialize_with = "text_or_null")]
    pub gender: String,

    #[serde(deserialize_with = "text_or_null")]
    pub complaint: String,

    #[serde(deserialize_with = "text_or_null")]
    pub history: String,

    #[serde(deserialize_with = "text_or_null")]
    pub on_examination: String,

    #[serde(deserialize_with = "text_or_null")]
    pub investigation: String,

    #[serde(deserialize_with = "text_or_null")]
    pub diagnosis: String,

    #[serde(deserialize_with = "text_or_null")]
    pub treatment_plan: String,

    #[serde(deserialize_with = "text_or_null")]
    pub medicine: String,

    #[serde(deserialize_with = "text_or_null")]
    pub advice: String,

    #[serde(deserialize_with = "text_or_null")]
    pub follow_up: String,

    #[serde(deserialize_with = "text_or_null")]
    pub notes: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_visit: Option<String>,
}

fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl PrescriptionRecord {
    /// Parse a single bare record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Translation`] naming the failing JSON path when a field has the
    /// wrong type, or [`CodecError::InvalidJson`] for malformed JSON.
    pub fn parse(json: &str) -> CodecResult<Self> {
        parse_json(json, "Prescription")
    }

    /// Parse the list returned by `GET /API/v1/prescription`.
    pub fn parse_list(json: &str) -> CodecResult<Vec<Self>> {
        parse_json(json, "Prescription list")
    }

    /// Parse either a bare record or the `{ "data": record }` envelope of the single-record
    /// endpoint.
    pub fn parse_response(json: &str) -> CodecResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let inner = match value {
            serde_json::Value::Object(mut map) if map.contains_key("data") => map
                .remove("data")
                .unwrap_or(serde_json::Value::Null),
            other => other,
        };

        serde_path_to_error::deserialize(inner).map_err(|err| translation("Prescription", err))
    }

    pub fn decode(&self) -> DecodedPrescription {
        DecodedPrescription::decode(self)
    }
}

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> CodecResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let parsed = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| translation(what, err))?;
    deserializer.end()?;
    Ok(parsed)
}

fn translation(what: &str, err: serde_path_to_error::Error<serde_json::Error>) -> CodecError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    CodecError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}

// ============================================================================
// Decoded form
// ============================================================================

/// A prescription with every flat field decoded, ready for layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecodedPrescription {
    pub prescription_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub visit: String,
    pub name: String,
    pub patient_age: Option<i64>,
    pub gender: String,
    pub complaints: Vec<SectionItem>,
    pub histories: Vec<SectionItem>,
    pub examinations: Vec<SectionItem>,
    pub investigations: Vec<SectionItem>,
    pub diagnoses: Vec<SectionItem>,
    pub treatments: Vec<SectionItem>,
    pub medicines: Vec<MedicineLine>,
    pub advices: Vec<String>,
    pub follow_ups: Vec<String>,
    pub notes: Vec<String>,
    pub next_visit: Option<String>,
}

impl DecodedPrescription {
    pub fn decode(record: &PrescriptionRecord) -> Self {
        let decoded = Self {
            prescription_id: record.prescription_id,
            patient_id: record.id,
            visit: record.visit.clone(),
            name: record.name.clone(),
            patient_age: record.patient_age,
            gender: record.gender.clone(),
            complaints: decode_list_field(&record.complaint),
            histories: decode_list_field(&record.history),
            examinations: decode_list_field(&record.on_examination),
            investigations: decode_list_field(&record.investigation),
            diagnoses: decode_diagnosis_field(&record.diagnosis),
            treatments: decode_list_field(&record.treatment_plan),
            medicines: decode_medicine_field(&record.medicine),
            advices: decode_plain_list(&record.advice),
            follow_ups: decode_plain_list(&record.follow_up),
            notes: decode_plain_list(&record.notes),
            next_visit: record
                .next_visit
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        };

        tracing::debug!(
            prescription_id = ?decoded.prescription_id,
            complaints = decoded.complaints.len(),
            medicines = decoded.medicines.len(),
            "decoded prescription record"
        );

        decoded
    }

    /// Re-encode into the flat record form. Decoding the result yields `self` again.
    pub fn encode(&self) -> PrescriptionRecord {
        PrescriptionRecord {
            prescription_id: self.prescription_id,
            id: self.patient_id,
            visit: self.visit.clone(),
            name: self.name.clone(),
            patient_age: self.patient_age,
            gender: self.gender.clone(),
            complaint: encode_list_field(&self.complaints),
            history: encode_list_field(&self.histories),
            on_examination: encode_list_field(&self.examinations),
            investigation: encode_list_field(&self.investigations),
            diagnosis: encode_diagnosis_field(&self.diagnoses),
            treatment_plan: encode_list_field(&self.treatments),
            medicine: encode_medicine_lines(&self.medicines),
            advice: encode_plain_list(&self.advices),
            follow_up: encode_plain_list(&self.follow_ups),
            notes: encode_plain_list(&self.notes),
            next_visit: self.next_visit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "prescriptionId": 17,
        "id": 4,
        "visit": "2026-03-05",
        "name": "Rahima Begum",
        "patientAge": 46,
        "gender": "F",
        "complaint": "Fever - high grade; Cough",
        "history": "DM - 5 years",
        "onExamination": null,
        "investigation": "CBC; RBS - fasting",
        "diagnosis": "Viral fever",
        "medicine": "Napa 500mg (1+0+1)After meal 5 Days\nAce (0+0+1)",
        "advice": "Drink water; Rest",
        "followUp": "",
        "notes": null,
        "nextVisit": "2026-03-12",
        "createdBy": "dr.noyim"
    }"#;

    #[test]
    fn parses_record_with_nulls_and_unknown_keys() {
        let record = PrescriptionRecord::parse(SAMPLE).expect("parse record");
        assert_eq!(record.prescription_id, Some(17));
        assert_eq!(record.name, "Rahima Begum");
        assert_eq!(record.on_examination, "");
        assert_eq!(record.notes, "");
        assert_eq!(record.treatment_plan, "");
        assert_eq!(record.next_visit.as_deref(), Some("2026-03-12"));
    }

    #[test]
    fn parses_envelope_and_bare_record_alike() {
        let wrapped = format!(r#"{{"data": {SAMPLE}}}"#);
        let from_envelope = PrescriptionRecord::parse_response(&wrapped).expect("envelope");
        let bare = PrescriptionRecord::parse_response(SAMPLE).expect("bare");
        assert_eq!(from_envelope, bare);
    }

    #[test]
    fn parses_list() {
        let json = format!("[{SAMPLE}, {{\"name\": \"Karim\"}}]");
        let records = PrescriptionRecord::parse_list(&json).expect("list");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Karim");
        assert_eq!(records[1].prescription_id, None);
    }

    #[test]
    fn schema_mismatch_reports_path() {
        let err = PrescriptionRecord::parse(r#"{"patientAge": "forty"}"#)
            .expect_err("string age should fail");
        match err {
            CodecError::Translation(msg) => assert!(msg.contains("patientAge"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(PrescriptionRecord::parse("{\"name\": ").is_err());
        assert!(PrescriptionRecord::parse("{} trailing").is_err());
    }

    #[test]
    fn decode_runs_each_field_through_its_decoder() {
        let decoded = PrescriptionRecord::parse(SAMPLE).expect("parse").decode();

        assert_eq!(decoded.complaints.len(), 2);
        assert_eq!(decoded.complaints[0].note.as_deref(), Some("high grade"));
        assert_eq!(decoded.histories[0].text, "DM");
        assert!(decoded.examinations.is_empty());
        assert_eq!(decoded.diagnoses, vec![SectionItem::new("Viral fever")]);
        assert_eq!(decoded.medicines.len(), 2);
        assert_eq!(decoded.medicines[0].duration, "5 Days");
        assert_eq!(decoded.advices, vec!["Drink water", "Rest"]);
        assert!(decoded.follow_ups.is_empty());
        assert!(decoded.notes.is_empty());
    }

    #[test]
    fn blank_next_visit_decodes_as_absent() {
        let record = PrescriptionRecord {
            next_visit: Some("  ".into()),
            ..PrescriptionRecord::default()
        };
        assert_eq!(record.decode().next_visit, None);
    }

    #[test]
    fn decoding_a_reencoding_is_stable() {
        let decoded = PrescriptionRecord::parse(SAMPLE).expect("parse").decode();
        assert_eq!(decoded.encode().decode(), decoded);
    }
}
