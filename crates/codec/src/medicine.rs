//! The line-oriented `medicine` field.
//!
//! Two shapes live in this field:
//! - the display form read back for printing, one medicine per line:
//!   `"<name> (<schedule>)<timing> <n> Days"`
//! - the assembly form written at creation time: `"<n>) <medicine> - <note>"`
//!
//! Parsing is positional and first-match only. Nested parentheses and repeated `Days` tokens
//! are not interpreted; stored records depend on exactly these split points.

use serde::{Deserialize, Serialize};
use std::fmt;

const DAYS_TOKEN: &str = "Days";

/// Spacing around `(...)` tried when re-encoding, preferred layout first.
const SEPARATORS: [(&str, &str); 4] = [(" ", " "), (" ", ""), ("", ""), ("", " ")];

/// One medicine as decoded from the display form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineLine {
    pub name: String,
    pub schedule: String,
    pub timing: String,
    pub duration: String,
}

impl MedicineLine {
    /// Decodes a single non-blank line.
    ///
    /// - `name`: text before the first `(`, trimmed (the whole line when there is no `(`)
    /// - `schedule`: text between that `(` and the next `)`
    /// - `timing`: text after the `)` up to the first `Days`, trimmed
    /// - `duration`: the whitespace-delimited token right before the first `Days`, plus `" Days"`
    pub fn decode(line: &str) -> Self {
        let (name, schedule, timing) = match line.split_once('(') {
            None => (line.trim(), "", ""),
            Some((name, rest)) => match rest.split_once(')') {
                None => (name.trim(), rest, ""),
                Some((schedule, after)) => {
                    let before_days = after.split(DAYS_TOKEN).next().unwrap_or_default();
                    (name.trim(), schedule, before_days.trim())
                }
            },
        };

        Self {
            name: name.to_owned(),
            schedule: schedule.to_owned(),
            timing: timing.to_owned(),
            duration: duration_of(line),
        }
    }

    /// Writes the display form back so that [`MedicineLine::decode`] yields `self` again.
    ///
    /// The duration count is never written twice: decoding derives it from whatever precedes
    /// `Days`, which is normally the tail of `timing`. When the count token was glued to the
    /// parenthesis or to the name in the source line, the same gluing is reproduced.
    pub fn encode(&self) -> String {
        let needs_parens = self.name.is_empty()
            || !self.schedule.is_empty()
            || !self.timing.is_empty()
            || (!self.duration.is_empty() && !self.name.contains(DAYS_TOKEN));

        let candidates: Vec<String> = SEPARATORS
            .iter()
            .map(|&(before_paren, after_paren)| {
                self.write(needs_parens, before_paren, after_paren)
            })
            .collect();
        candidates
            .iter()
            .find(|line| duration_of(line) == self.duration)
            .or_else(|| candidates.first())
            .cloned()
            .unwrap_or_default()
    }

    fn write(&self, needs_parens: bool, before_paren: &str, after_paren: &str) -> String {
        let mut out = self.name.clone();
        if needs_parens {
            if !self.name.is_empty() {
                out.push_str(before_paren);
            }
            out.push('(');
            out.push_str(&self.schedule);
            out.push(')');
        }

        if !self.timing.is_empty() {
            out.push_str(after_paren);
            out.push_str(&self.timing);
        }

        if !self.duration.is_empty() && !out.contains(DAYS_TOKEN) {
            out.push(' ');
            out.push_str(DAYS_TOKEN);
        }
        out
    }

    pub fn has_details(&self) -> bool {
        !self.schedule.is_empty()
    }
}

fn duration_of(line: &str) -> String {
    match line.split_once(DAYS_TOKEN) {
        Some((before, _)) => {
            let count = before.split_whitespace().last().unwrap_or_default();
            format!("{count} {DAYS_TOKEN}")
        }
        None => String::new(),
    }
}

/// Splits the field on newlines, drops blank lines and decodes each remaining line.
pub fn decode_medicine_field(raw: &str) -> Vec<MedicineLine> {
    raw.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(MedicineLine::decode)
        .collect()
}

pub fn encode_medicine_lines(lines: &[MedicineLine]) -> String {
    lines
        .iter()
        .map(MedicineLine::encode)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a dose is taken before or after food.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTiming {
    Before,
    #[default]
    After,
}

impl MealTiming {
    /// Label printed on the prescription.
    pub fn label(self) -> &'static str {
        match self {
            MealTiming::Before => "খাওয়ার আগে",
            MealTiming::After => "খাওয়ার পরে",
        }
    }
}

/// Morning, afternoon and night dose counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseSchedule {
    pub morning: u8,
    pub afternoon: u8,
    pub night: u8,
}

impl DoseSchedule {
    pub fn new(morning: u8, afternoon: u8, night: u8) -> Self {
        Self {
            morning,
            afternoon,
            night,
        }
    }
}

impl fmt::Display for DoseSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}+{}", self.morning, self.afternoon, self.night)
    }
}

/// Structured dosing details picked in the medicine entry widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineDetails {
    pub schedule: DoseSchedule,
    /// Dose unit, `টি` (pieces) unless chosen otherwise.
    pub unit: String,
    /// Course length; no duration is written when absent.
    pub duration: Option<u32>,
    /// Unit for `duration`, `দিন` (days) unless chosen otherwise.
    pub duration_unit: String,
    pub meal: MealTiming,
    pub note: String,
}

impl Default for MedicineDetails {
    fn default() -> Self {
        Self {
            schedule: DoseSchedule::default(),
            unit: "টি".into(),
            duration: None,
            duration_unit: "দিন".into(),
            meal: MealTiming::default(),
            note: String::new(),
        }
    }
}

/// A medicine entry held during assembly, before it is flattened into the record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineItem {
    pub medicine: String,
    pub schedule: String,
    pub duration: String,
    /// Pre-composed `"<schedule> <unit> <duration> <meal> <free note>"`.
    pub note: String,
}

impl MedicineItem {
    /// Composes an entry from the widget's structured fields. Empty components are skipped.
    pub fn compose(medicine: impl Into<String>, details: &MedicineDetails) -> Self {
        let schedule = details.schedule.to_string();
        let duration = details
            .duration
            .map(|n| format!("{} {}", n, details.duration_unit))
            .unwrap_or_default();

        let note = [
            schedule.as_str(),
            details.unit.as_str(),
            duration.as_str(),
            details.meal.label(),
            details.note.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Self {
            medicine: medicine.into(),
            schedule,
            duration,
            note,
        }
    }
}

/// Flattens assembly entries as `"<index+1>) <medicine> - <note>"`, one per line.
pub fn encode_medicine_items(items: &[MedicineItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("{}) {} - {}", idx + 1, item.medicine, item.note))
        .collect::<Vec<_>>()
        .join("\n")
}
