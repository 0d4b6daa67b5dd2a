//! Semicolon-delimited list fields.
//!
//! Stored form: `"Fever - high grade; Cough"`. Items are separated by `;`, and an item may
//! carry a note after the first `" - "`.
//!
//! The encoding is lossy: an item or note containing `;` (or a label containing `" - "`)
//! cannot be represented. Decoding therefore never fails; it returns whatever structure the
//! delimiters describe.

use serde::{Deserialize, Serialize};

const ITEM_SEPARATOR: char = ';';
const NOTE_SEPARATOR: &str = " - ";
const ENCODED_ITEM_SEPARATOR: &str = "; ";

/// One decoded entry of a list field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionItem {
    /// Label, trimmed and never empty.
    pub text: String,

    /// Remark after the first `" - "`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SectionItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            note: None,
        }
    }

    pub fn with_note(text: impl Into<String>, note: impl Into<String>) -> Self {
        let note = note.into();
        Self {
            text: text.into(),
            note: (!note.trim().is_empty()).then_some(note),
        }
    }

    fn encode(&self) -> String {
        match self.note.as_deref() {
            Some(note) if !note.is_empty() => format!("{}{}{}", self.text, NOTE_SEPARATOR, note),
            _ => self.text.clone(),
        }
    }
}

/// Decodes `complaint`, `history`, `onExamination`, `investigation` and `treatmentPlan`.
///
/// Blank segments are dropped and original order is kept.
pub fn decode_list_field(raw: &str) -> Vec<SectionItem> {
    raw.split(ITEM_SEPARATOR)
        .filter_map(decode_segment)
        .collect()
}

fn decode_segment(segment: &str) -> Option<SectionItem> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    let item = match segment.split_once(NOTE_SEPARATOR) {
        Some((text, note)) => SectionItem::with_note(text.trim(), note.trim()),
        None => SectionItem::new(segment),
    };

    // " - note" alone leaves nothing to label.
    (!item.text.is_empty()).then_some(item)
}

/// Decodes the `diagnosis` field.
///
/// Older records hold a single free-text diagnosis. Without any `;` the whole trimmed string is
/// one item, `" - "` included.
pub fn decode_diagnosis_field(raw: &str) -> Vec<SectionItem> {
    if raw.contains(ITEM_SEPARATOR) {
        return decode_list_field(raw);
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![SectionItem::new(trimmed)]
    }
}

/// Decodes `advice`, `followUp` and `notes`: plain `;` split without note extraction.
pub fn decode_plain_list(raw: &str) -> Vec<String> {
    raw.split(ITEM_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Joins items with `"; "`, writing `"<text> - <note>"` for items with a note.
pub fn encode_list_field(items: &[SectionItem]) -> String {
    items
        .iter()
        .map(SectionItem::encode)
        .collect::<Vec<_>>()
        .join(ENCODED_ITEM_SEPARATOR)
}

/// Encodes diagnoses so that [`decode_diagnosis_field`] reads them back as written.
///
/// A lone item with a note gets a trailing `;`, otherwise the legacy plain-text rule would
/// swallow the note into the label.
pub fn encode_diagnosis_field(items: &[SectionItem]) -> String {
    let encoded = encode_list_field(items);
    match items {
        [only] if only.note.is_some() => format!("{encoded}{ITEM_SEPARATOR}"),
        _ => encoded,
    }
}

pub fn encode_plain_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(ENCODED_ITEM_SEPARATOR)
}
