//! Filtering the prescription list and visit statistics for the report screen.

use chrono::{Datelike, Months, NaiveDate};
use rx_codec::PrescriptionRecord;
use rx_types::CalendarDate;
use serde::Serialize;
use std::collections::HashSet;

/// Search box and date range of the prescription list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring of the patient name. Blank matches everyone.
    pub name_query: String,
    /// Inclusive lower bound on the visit date.
    pub from: Option<CalendarDate>,
    /// Inclusive upper bound on the visit date.
    pub to: Option<CalendarDate>,
}

impl ListingFilter {
    pub fn matches(&self, record: &PrescriptionRecord) -> bool {
        let query = self.name_query.trim().to_lowercase();
        if !query.is_empty() && !record.name.to_lowercase().contains(&query) {
            return false;
        }

        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        // A visit that is not a date cannot be placed in a range.
        let Ok(visit) = CalendarDate::parse(&record.visit) else {
            return false;
        };
        self.from.map_or(true, |from| visit >= from) && self.to.map_or(true, |to| visit <= to)
    }

    /// Matching records, in their original order.
    pub fn apply<'a>(&self, records: &'a [PrescriptionRecord]) -> Vec<&'a PrescriptionRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Visit and patient counts over a few fixed windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    pub total_visits: usize,
    pub total_patients: usize,
    pub today_visits: usize,
    pub today_patients: usize,
    pub month_visits: usize,
    pub month_patients: usize,
    pub last_month_visits: usize,
    pub last_month_patients: usize,
}

#[derive(Default)]
struct Window {
    visits: usize,
    patients: HashSet<i64>,
}

impl Window {
    fn add(&mut self, patient_id: Option<i64>) {
        self.visits += 1;
        if let Some(id) = patient_id {
            self.patients.insert(id);
        }
    }
}

impl VisitStats {
    /// Counts visits relative to `today`.
    ///
    /// "This month" is every visit on or after the first of `today`'s month. Records whose
    /// visit is not a date count only towards the totals.
    pub fn compute(records: &[PrescriptionRecord], today: CalendarDate) -> Self {
        let today = today.naive();
        let month_start = first_of_month(today);
        let last_month_start = month_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(month_start);

        let mut total = Window::default();
        let mut day = Window::default();
        let mut month = Window::default();
        let mut last_month = Window::default();

        for record in records {
            total.add(record.id);

            let Ok(visit) = CalendarDate::parse(&record.visit) else {
                continue;
            };
            let visit = visit.naive();

            if visit == today {
                day.add(record.id);
            }
            if visit >= month_start {
                month.add(record.id);
            } else if visit >= last_month_start {
                last_month.add(record.id);
            }
        }

        Self {
            total_visits: total.visits,
            total_patients: total.patients.len(),
            today_visits: day.visits,
            today_patients: day.patients.len(),
            month_visits: month.visits,
            month_patients: month.patients.len(),
            last_month_visits: last_month.visits,
            last_month_patients: last_month.patients.len(),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
