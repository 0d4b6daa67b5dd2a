//! # Rx Core
//!
//! Core logic of the rxpad prescription pad.
//!
//! This crate contains pure prescription operations and profile storage:
//! - Assembling a prescription from structured entries into the backend's create/update
//!   payloads, with field-level validation
//! - Classifying failed saves into field errors or a single notification
//! - Laying out a decoded prescription onto a single printed page, and rendering that page
//!   as Markdown
//! - Storing doctor profiles per user
//! - Filtering the prescription list and computing visit statistics
//!
//! **No transport concerns**: the backend is reached by callers; only the JSON shapes it
//! exchanges are modelled, in `rx-codec`.

pub mod assembly;
pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod listing;
pub mod markdown;
pub mod profile;
pub mod submission;
pub mod validation;

pub use assembly::{EntryList, InvestigationItem, PrescriptionDraft};
pub use config::{page_config_from_env_value, CoreConfig, PageConfig};
pub use error::{RxError, RxResult};
pub use layout::{Block, Column, PrintLayout};
pub use listing::{ListingFilter, VisitStats};
pub use markdown::render_page;
pub use profile::{DoctorProfile, FileProfileStore, MemoryProfileStore, ProfileStore};
pub use submission::SubmissionFailure;
pub use validation::{PatientForm, ValidatedPatient, ValidationErrors};

pub use rx_types::{CalendarDate, NonEmptyText, PatientAge, TextError};
