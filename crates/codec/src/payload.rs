//! Request bodies for the prescription write endpoints.
//!
//! Both payloads are only constructed from validated input, so the typed fields
//! ([`PatientAge`], [`CalendarDate`]) already hold their guarantees. Absent next-visit dates
//! serialise as `null`, which the backend expects.

use rx_types::{CalendarDate, NonEmptyText, PatientAge};
use serde::{Deserialize, Serialize};

/// Body of `POST /API/v1/prescription`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionReq {
    pub prescription_date: CalendarDate,
    pub patient_name: NonEmptyText,
    pub patient_age: PatientAge,
    pub patient_gender: NonEmptyText,
    pub diagnosis: String,
    /// Flattened medicine entries, see [`crate::encode_medicine_items`].
    pub medicines: String,
    pub next_visit_date: Option<CalendarDate>,
}

/// Body of `PUT /API/v1/prescription/{id}`: the create fields plus every list field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrescriptionReq {
    #[serde(flatten)]
    pub base: CreatePrescriptionReq,
    pub chief_complaint: String,
    pub history: String,
    pub on_examination: String,
    pub investigation: String,
    pub treatment_plan: String,
    pub advice: String,
    pub follow_up: String,
    pub special_notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(next_visit: Option<&str>) -> CreatePrescriptionReq {
        CreatePrescriptionReq {
            prescription_date: CalendarDate::parse("2026-03-05").unwrap(),
            patient_name: NonEmptyText::new("Rahima Begum").unwrap(),
            patient_age: PatientAge::parse("46").unwrap(),
            patient_gender: NonEmptyText::new("F").unwrap(),
            diagnosis: "Viral fever".into(),
            medicines: "1) Napa 500mg - 1+0+1 টি".into(),
            next_visit_date: next_visit.map(|d| CalendarDate::parse(d).unwrap()),
        }
    }

    #[test]
    fn create_payload_uses_backend_field_names() {
        let json = serde_json::to_value(create_req(Some("2026-03-12"))).expect("serialise");
        assert_eq!(json["prescriptionDate"], "2026-03-05");
        assert_eq!(json["patientName"], "Rahima Begum");
        assert_eq!(json["patientAge"], 46);
        assert_eq!(json["patientGender"], "F");
        assert_eq!(json["nextVisitDate"], "2026-03-12");
    }

    #[test]
    fn absent_next_visit_serialises_as_null() {
        let json = serde_json::to_value(create_req(None)).expect("serialise");
        assert!(json["nextVisitDate"].is_null());
        assert!(json.as_object().unwrap().contains_key("nextVisitDate"));
    }

    #[test]
    fn update_payload_is_flat() {
        let req = UpdatePrescriptionReq {
            base: create_req(None),
            chief_complaint: "Fever - high grade; Cough".into(),
            history: String::new(),
            on_examination: String::new(),
            investigation: String::new(),
            treatment_plan: String::new(),
            advice: String::new(),
            follow_up: String::new(),
            special_notes: String::new(),
        };
        let json = serde_json::to_value(&req).expect("serialise");
        assert_eq!(json["patientName"], "Rahima Begum");
        assert_eq!(json["chiefComplaint"], "Fever - high grade; Cough");
        assert!(json.get("base").is_none());
    }
}
