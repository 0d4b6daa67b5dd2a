//! Print layout of a single-page prescription.
//!
//! [`PrintLayout::render`] places a decoded prescription onto a fixed A4 page:
//!
//! ```text
//! +---------------------------------------------------+
//! | doctor name / degree          bangla name / degree |
//! | Name | Date | Age | Id                             |
//! +----------------+----------------------------------+
//! | Chief Complaint| Rx                               |
//! | History        | 1. medicine                      |
//! | On Examination |    schedule timing duration      |
//! | Investigation  | Advices                          |
//! | Diagnosis      | Follow Up                        |
//! | Treatment Plan | Special Note                     |
//! +----------------+----------------------------------+
//! | Next Visit: dd Mon yyyy                            |
//! | Registered To <doctor> <phone>                     |
//! +---------------------------------------------------+
//! ```
//!
//! Each column has a line budget ([`PageConfig`]). Blocks are placed in order; the first block
//! that does not fit and everything after it are dropped, and the column records how many
//! were dropped. There is no second page.
//!
//! Rendering is a pure function of its inputs.

use crate::config::PageConfig;
use crate::constants::{
    NO_DIAGNOSIS_PLACEHOLDER, PLACEHOLDER_DOCTOR_DEGREE, PLACEHOLDER_DOCTOR_DEGREE_BANGLA,
    PLACEHOLDER_DOCTOR_NAME, PLACEHOLDER_DOCTOR_NAME_BANGLA,
};
use crate::profile::DoctorProfile;
use crate::RxResult;
use rx_codec::{DecodedPrescription, MedicineLine, PrescriptionRecord, SectionItem};
use rx_types::CalendarDate;
use serde::Serialize;

pub const CHIEF_COMPLAINT: &str = "Chief Complaint";
pub const HISTORY: &str = "History";
pub const ON_EXAMINATION: &str = "On Examination";
pub const INVESTIGATION: &str = "Investigation";
pub const DIAGNOSIS: &str = "Diagnosis";
pub const TREATMENT_PLAN: &str = "Treatment Plan";
pub const RX: &str = "Rx";
pub const ADVICES: &str = "Advices";
pub const FOLLOW_UP: &str = "Follow Up";
pub const SPECIAL_NOTE: &str = "Special Note";

/// The laid-out page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrintLayout {
    pub header: Header,
    pub patient_bar: PatientBar,
    pub left: Column,
    pub right: Column,
    pub footer: Footer,
}

/// Doctor identity, English on the left and Bangla on the right.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub degree: String,
    pub name_bangla: String,
    pub degree_bangla: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatientBar {
    pub name: String,
    /// `dd/mm/yyyy`, or the stored text when it is not a date.
    pub date: String,
    pub age: String,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Footer {
    /// `dd Mon yyyy`, or the stored text when it is not a date.
    pub next_visit: Option<String>,
    pub registered_name: String,
    pub phone: String,
}

impl Footer {
    pub fn registration_line(&self) -> String {
        format!("Registered To {} {}", self.registered_name, self.phone)
            .trim_end()
            .to_owned()
    }
}

/// One placed element of a column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Title {
        text: String,
    },
    Bullet {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Placeholder {
        text: String,
    },
    Medicine {
        number: usize,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<MedicineDetail>,
    },
}

/// Second line of a medicine block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MedicineDetail {
    pub schedule: String,
    pub timing: String,
    pub duration: String,
}

impl Block {
    fn title(text: &str) -> Self {
        Self::Title {
            text: text.to_owned(),
        }
    }

    fn bullet(text: &str) -> Self {
        Self::Bullet {
            text: text.to_owned(),
            note: None,
        }
    }

    fn item(item: &SectionItem) -> Self {
        Self::Bullet {
            text: item.text.clone(),
            note: item.note.clone(),
        }
    }

    fn medicine(index: usize, line: &MedicineLine) -> Self {
        Self::Medicine {
            number: index + 1,
            name: line.name.clone(),
            detail: line.has_details().then(|| MedicineDetail {
                schedule: line.schedule.clone(),
                timing: line.timing.clone(),
                duration: line.duration.clone(),
            }),
        }
    }

    /// Printed lines taken by this block.
    pub fn lines(&self) -> usize {
        match self {
            Self::Medicine {
                detail: Some(_), ..
            } => 2,
            _ => 1,
        }
    }
}

/// A content column after clipping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Column {
    pub blocks: Vec<Block>,
    /// Blocks that did not fit the line budget.
    pub clipped: usize,
}

impl Column {
    fn fill(blocks: Vec<Block>, budget: usize) -> Self {
        let mut used = 0;
        let mut placed = Vec::with_capacity(blocks.len());
        let total = blocks.len();

        for block in blocks {
            if used + block.lines() > budget {
                break;
            }
            used += block.lines();
            placed.push(block);
        }

        let clipped = total - placed.len();
        if clipped > 0 {
            tracing::warn!(clipped, budget, "prescription column overflows the page");
        }

        Self {
            blocks: placed,
            clipped,
        }
    }

    pub fn lines(&self) -> usize {
        self.blocks.iter().map(Block::lines).sum()
    }

    /// Blocks placed under the section titled `title`, up to the next title.
    pub fn section(&self, title: &str) -> Option<&[Block]> {
        let start = self
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Title { text } if text == title))?
            + 1;
        let len = self.blocks[start..]
            .iter()
            .position(|b| matches!(b, Block::Title { .. }))
            .unwrap_or(self.blocks.len() - start);
        Some(&self.blocks[start..start + len])
    }
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
}

fn display_date(raw: &str, format: fn(CalendarDate) -> String) -> String {
    CalendarDate::parse(raw)
        .map(format)
        .unwrap_or_else(|_| raw.trim().to_owned())
}

fn push_items(blocks: &mut Vec<Block>, title: &str, items: &[SectionItem]) {
    if items.is_empty() {
        return;
    }
    blocks.push(Block::title(title));
    blocks.extend(items.iter().map(Block::item));
}

fn push_texts<S: AsRef<str>>(blocks: &mut Vec<Block>, title: &str, texts: &[S]) {
    if texts.is_empty() {
        return;
    }
    blocks.push(Block::title(title));
    blocks.extend(texts.iter().map(|t| Block::bullet(t.as_ref())));
}

impl PrintLayout {
    /// Lays out a prescription read from backend JSON, bare or wrapped in `{"data": ...}`.
    pub fn from_response(
        json: &str,
        profile: Option<&DoctorProfile>,
        page: &PageConfig,
    ) -> RxResult<Self> {
        let record = PrescriptionRecord::parse_response(json)?;
        Ok(Self::render(&record.decode(), profile, page))
    }

    pub fn render(
        prescription: &DecodedPrescription,
        profile: Option<&DoctorProfile>,
        page: &PageConfig,
    ) -> Self {
        let header = Header {
            name: or_placeholder(profile.map(|p| p.doctor_name.as_str()), PLACEHOLDER_DOCTOR_NAME)
                .to_owned(),
            degree: or_placeholder(
                profile.map(|p| p.doctor_degree.as_str()),
                PLACEHOLDER_DOCTOR_DEGREE,
            )
            .to_owned(),
            name_bangla: or_placeholder(
                profile.map(|p| p.doctor_name_bangla.as_str()),
                PLACEHOLDER_DOCTOR_NAME_BANGLA,
            )
            .to_owned(),
            degree_bangla: or_placeholder(
                profile.map(|p| p.doctor_degree_bangla.as_str()),
                PLACEHOLDER_DOCTOR_DEGREE_BANGLA,
            )
            .to_owned(),
        };

        let patient_bar = PatientBar {
            name: prescription.name.trim().to_owned(),
            date: display_date(&prescription.visit, CalendarDate::day_month_year),
            age: prescription
                .patient_age
                .map(|a| a.to_string())
                .unwrap_or_default(),
            id: prescription
                .patient_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        };

        let footer = Footer {
            next_visit: prescription
                .next_visit
                .as_deref()
                .map(|raw| display_date(raw, CalendarDate::day_short_month_year)),
            registered_name: header.name.clone(),
            phone: profile
                .map(|p| p.phone_no.trim().to_owned())
                .unwrap_or_default(),
        };

        let left = Column::fill(left_blocks(prescription), page.left_column_lines());
        let right = Column::fill(right_blocks(prescription), page.right_column_lines());

        tracing::debug!(
            left_lines = left.lines(),
            right_lines = right.lines(),
            "laid out prescription page"
        );

        Self {
            header,
            patient_bar,
            left,
            right,
            footer,
        }
    }

    /// Whether any column dropped content.
    pub fn is_clipped(&self) -> bool {
        self.left.clipped > 0 || self.right.clipped > 0
    }
}

fn left_blocks(p: &DecodedPrescription) -> Vec<Block> {
    let mut blocks = vec![Block::title(CHIEF_COMPLAINT)];
    blocks.extend(p.complaints.iter().map(Block::item));

    push_items(&mut blocks, HISTORY, &p.histories);
    push_items(&mut blocks, ON_EXAMINATION, &p.examinations);

    // Investigation notes are not printed.
    let investigations: Vec<&str> = p.investigations.iter().map(|i| i.text.as_str()).collect();
    push_texts(&mut blocks, INVESTIGATION, &investigations);

    blocks.push(Block::title(DIAGNOSIS));
    if p.diagnoses.is_empty() {
        blocks.push(Block::Placeholder {
            text: NO_DIAGNOSIS_PLACEHOLDER.to_owned(),
        });
    } else {
        blocks.extend(p.diagnoses.iter().map(Block::item));
    }

    push_items(&mut blocks, TREATMENT_PLAN, &p.treatments);
    blocks
}

fn right_blocks(p: &DecodedPrescription) -> Vec<Block> {
    let mut blocks = vec![Block::title(RX)];
    blocks.extend(
        p.medicines
            .iter()
            .enumerate()
            .map(|(idx, line)| Block::medicine(idx, line)),
    );

    push_texts(&mut blocks, ADVICES, &p.advices);
    push_texts(&mut blocks, FOLLOW_UP, &p.follow_ups);
    push_texts(&mut blocks, SPECIAL_NOTE, &p.notes);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RxError;

    fn record() -> PrescriptionRecord {
        PrescriptionRecord {
            id: Some(4),
            visit: "2026-03-05".into(),
            name: "Rahima Begum".into(),
            patient_age: Some(46),
            complaint: "Fever - high grade; Cough".into(),
            investigation: "CBC; RBS - fasting".into(),
            medicine: "Napa 500mg (1+0+1) 5 Days\nOmeprazole 20mg".into(),
            advice: "Drink water; Rest".into(),
            next_visit: Some("2026-03-12".into()),
            ..PrescriptionRecord::default()
        }
    }

    fn profile() -> DoctorProfile {
        DoctorProfile {
            doctor_name: "Dr. Noyim Hasan".into(),
            doctor_degree: "MBBS".into(),
            phone_no: "01700000000".into(),
            ..DoctorProfile::default()
        }
    }

    #[test]
    fn test_header_uses_placeholders_without_profile() {
        let layout = PrintLayout::render(&record().decode(), None, &PageConfig::default());
        assert_eq!(layout.header.name, PLACEHOLDER_DOCTOR_NAME);
        assert_eq!(layout.header.degree, PLACEHOLDER_DOCTOR_DEGREE);
        assert_eq!(layout.header.name_bangla, PLACEHOLDER_DOCTOR_NAME_BANGLA);
        assert_eq!(layout.footer.registration_line(), "Registered To DOCTOR NAME");
    }

    #[test]
    fn test_header_and_footer_from_profile() {
        let layout =
            PrintLayout::render(&record().decode(), Some(&profile()), &PageConfig::default());
        assert_eq!(layout.header.name, "Dr. Noyim Hasan");
        // Missing Bangla name still falls back.
        assert_eq!(layout.header.name_bangla, PLACEHOLDER_DOCTOR_NAME_BANGLA);
        assert_eq!(
            layout.footer.registration_line(),
            "Registered To Dr. Noyim Hasan 01700000000"
        );
        assert_eq!(layout.footer.next_visit.as_deref(), Some("12 Mar 2026"));
    }

    #[test]
    fn test_patient_bar_formats_visit_date() {
        let layout = PrintLayout::render(&record().decode(), None, &PageConfig::default());
        assert_eq!(layout.patient_bar.date, "05/03/2026");
        assert_eq!(layout.patient_bar.age, "46");
        assert_eq!(layout.patient_bar.id, "4");

        let odd = PrescriptionRecord {
            visit: "last week".into(),
            ..record()
        };
        let layout = PrintLayout::render(&odd.decode(), None, &PageConfig::default());
        assert_eq!(layout.patient_bar.date, "last week");
    }

    #[test]
    fn test_left_column_sections() {
        let layout = PrintLayout::render(&record().decode(), None, &PageConfig::default());

        let complaints = layout.left.section(CHIEF_COMPLAINT).expect("always present");
        assert_eq!(complaints.len(), 2);
        assert!(layout.left.section(HISTORY).is_none());

        let investigations = layout.left.section(INVESTIGATION).expect("present");
        assert_eq!(
            investigations[1],
            Block::Bullet {
                text: "RBS".into(),
                note: None
            }
        );

        assert_eq!(
            layout.left.section(DIAGNOSIS),
            Some(
                &[Block::Placeholder {
                    text: NO_DIAGNOSIS_PLACEHOLDER.into()
                }][..]
            )
        );
    }

    #[test]
    fn test_empty_prescription_keeps_fixed_titles() {
        let layout = PrintLayout::render(
            &DecodedPrescription::default(),
            None,
            &PageConfig::default(),
        );
        assert_eq!(layout.left.blocks.len(), 3);
        assert_eq!(layout.right.blocks, vec![Block::title(RX)]);
        assert_eq!(layout.footer.next_visit, None);
    }

    #[test]
    fn test_medicine_blocks_are_numbered_with_optional_detail() {
        let layout = PrintLayout::render(&record().decode(), None, &PageConfig::default());
        let medicines = layout.right.section(RX).expect("always present");
        assert_eq!(medicines.len(), 2);
        match &medicines[0] {
            Block::Medicine {
                number,
                name,
                detail: Some(detail),
            } => {
                assert_eq!(*number, 1);
                assert_eq!(name, "Napa 500mg");
                assert_eq!(detail.schedule, "1+0+1");
                assert_eq!(detail.duration, "5 Days");
            }
            other => panic!("expected detailed medicine block, got {other:?}"),
        }
        assert!(matches!(
            &medicines[1],
            Block::Medicine { number: 2, detail: None, .. }
        ));
        assert_eq!(medicines[0].lines(), 2);
        assert_eq!(medicines[1].lines(), 1);
    }

    #[test]
    fn test_overflow_is_clipped_and_counted() {
        let page = PageConfig::new(4, 3).expect("valid page");
        let layout = PrintLayout::render(&record().decode(), None, &page);

        // Chief Complaint, two bullets, Investigation title.
        assert_eq!(layout.left.blocks.len(), 4);
        assert_eq!(layout.left.lines(), 4);
        // CBC, RBS, Diagnosis, placeholder.
        assert_eq!(layout.left.clipped, 4);

        // Rx title and the two-line Napa block fill the column.
        assert_eq!(layout.right.lines(), 3);
        assert_eq!(layout.right.blocks.len(), 2);
        assert_eq!(layout.right.clipped, 4);
        assert!(layout.is_clipped());

        let roomy = PrintLayout::render(&record().decode(), None, &PageConfig::default());
        assert!(!roomy.is_clipped());
    }

    #[test]
    fn test_layout_serialises_with_block_kinds() {
        let layout = PrintLayout::render(&record().decode(), None, &PageConfig::default());
        let json = serde_json::to_value(&layout).expect("serialise");
        assert_eq!(json["left"]["blocks"][0]["kind"], "title");
        assert_eq!(json["left"]["blocks"][1]["note"], "high grade");
        assert_eq!(json["right"]["blocks"][1]["kind"], "medicine");
        assert_eq!(json["right"]["blocks"][1]["number"], 1);
    }

    #[test]
    fn test_from_response_reads_backend_json() {
        let json = r#"{"data": {"visit": "2026-03-05", "name": "Rahima Begum", "medicine": "Napa (1+0+1) 5 Days"}}"#;
        let layout = PrintLayout::from_response(json, Some(&profile()), &PageConfig::default())
            .expect("layout");
        assert_eq!(layout.patient_bar.name, "Rahima Begum");
        assert_eq!(layout.header.name, "Dr. Noyim Hasan");

        let err = PrintLayout::from_response("{\"name\": 7}", None, &PageConfig::default())
            .expect_err("name must be text");
        assert!(matches!(err, RxError::Codec(_)));
        assert!(matches!(
            PrintLayout::from_response("not json", None, &PageConfig::default()),
            Err(RxError::Codec(_))
        ));
    }
}
