//! Doctor profiles.
//!
//! A profile holds the identity and contact details printed on every prescription. Profiles
//! are keyed by the signed-in username and are kept across logouts; there is no delete.
//!
//! ## Storage Layout
//!
//! [`FileProfileStore`] writes one YAML file per user:
//!
//! ```text
//! <profile_dir>/
//!   doctor_profile_<username>.yaml
//! ```

use crate::config::CoreConfig;
use crate::constants::{PROFILE_FILE_EXTENSION, PROFILE_FILE_PREFIX};
use crate::{RxError, RxResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Identity, contact and letterhead fields of a doctor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorProfile {
    pub doctor_name: String,
    pub doctor_name_bangla: String,
    pub doctor_degree: String,
    pub doctor_degree_bangla: String,
    pub specialization: String,
    pub specialization_bangla: String,
    pub details: String,
    pub phone_no: String,
    pub chamber: String,
    pub location: String,
    pub visit_date: String,
    pub visit_time: String,
    pub advice: String,
    pub left_grid: String,
    pub right_grid: String,
}

impl DoctorProfile {
    /// Name and degree are the minimum for a usable letterhead.
    pub fn is_complete(&self) -> bool {
        !self.doctor_name.trim().is_empty() && !self.doctor_degree.trim().is_empty()
    }

    pub fn from_yaml(yaml: &str) -> RxResult<Self> {
        serde_yaml::from_str(yaml).map_err(RxError::YamlDeserialization)
    }

    pub fn to_yaml(&self) -> RxResult<String> {
        serde_yaml::to_string(self).map_err(RxError::YamlSerialization)
    }
}

/// Keyed storage for doctor profiles.
pub trait ProfileStore {
    fn get(&self, username: &str) -> RxResult<Option<DoctorProfile>>;

    /// Stores `profile`, replacing any earlier one for `username`.
    fn put(&self, username: &str, profile: &DoctorProfile) -> RxResult<()>;
}

fn check_username(username: &str) -> RxResult<&str> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        && username != "."
        && username != "..";
    if valid {
        Ok(username)
    } else {
        Err(RxError::InvalidUsername(username.to_owned()))
    }
}

/// Profiles stored as YAML files under the configured profile directory.
#[derive(Clone, Debug)]
pub struct FileProfileStore {
    profile_dir: PathBuf,
}

impl FileProfileStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_dir(cfg.profile_dir())
    }

    pub fn with_dir(profile_dir: impl AsRef<Path>) -> Self {
        Self {
            profile_dir: profile_dir.as_ref().to_path_buf(),
        }
    }

    fn profile_path(&self, username: &str) -> RxResult<PathBuf> {
        let username = check_username(username)?;
        Ok(self.profile_dir.join(format!(
            "{PROFILE_FILE_PREFIX}{username}.{PROFILE_FILE_EXTENSION}"
        )))
    }
}

impl ProfileStore for FileProfileStore {
    fn get(&self, username: &str) -> RxResult<Option<DoctorProfile>> {
        let path = self.profile_path(username)?;
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(RxError::FileRead)?;
        match DoctorProfile::from_yaml(&contents) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(
                    "failed to parse doctor profile: {} - {}",
                    path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn put(&self, username: &str, profile: &DoctorProfile) -> RxResult<()> {
        let path = self.profile_path(username)?;
        fs::create_dir_all(&self.profile_dir).map_err(RxError::ProfileDirCreation)?;

        fs::write(&path, profile.to_yaml()?).map_err(RxError::FileWrite)?;

        tracing::info!(username, path = %path.display(), "stored doctor profile");
        Ok(())
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, DoctorProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, username: &str) -> RxResult<Option<DoctorProfile>> {
        let username = check_username(username)?;
        let profiles = self.profiles.read().map_err(|_| RxError::LockPoisoned)?;
        Ok(profiles.get(username).cloned())
    }

    fn put(&self, username: &str, profile: &DoctorProfile) -> RxResult<()> {
        let username = check_username(username)?;
        let mut profiles = self.profiles.write().map_err(|_| RxError::LockPoisoned)?;
        profiles.insert(username.to_owned(), profile.clone());
        Ok(())
    }
}
