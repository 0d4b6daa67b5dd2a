//! Constants used throughout the rxpad core crate.

/// Default directory for stored doctor profiles when none is configured.
pub const DEFAULT_PROFILE_DIR: &str = "profiles";

/// Prefix of per-user doctor profile files.
pub const PROFILE_FILE_PREFIX: &str = "doctor_profile_";

/// Extension of doctor profile files.
pub const PROFILE_FILE_EXTENSION: &str = "yaml";

/// Lines available to each content column of an A4 page (15 mm margins, 11 px type).
pub const DEFAULT_COLUMN_LINES: usize = 48;

/// Header placeholders printed when no doctor profile is stored.
pub const PLACEHOLDER_DOCTOR_NAME: &str = "DOCTOR NAME";
pub const PLACEHOLDER_DOCTOR_DEGREE: &str = "Degrees";
pub const PLACEHOLDER_DOCTOR_NAME_BANGLA: &str = "ডাক্তারের নাম";
pub const PLACEHOLDER_DOCTOR_DEGREE_BANGLA: &str = "ডিগ্রি";

/// Shown under the Diagnosis heading when nothing was recorded.
pub const NO_DIAGNOSIS_PLACEHOLDER: &str = "No diagnosis recorded";
