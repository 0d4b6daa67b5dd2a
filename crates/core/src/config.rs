//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Environment variables are read by the binary only; the helpers here take the raw
//! `Option<String>` values so they can be exercised without touching the process environment.

use crate::constants::DEFAULT_COLUMN_LINES;
use crate::{RxError, RxResult};
use std::path::{Path, PathBuf};

/// Line budget of the printed page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageConfig {
    left_column_lines: usize,
    right_column_lines: usize,
}

impl PageConfig {
    pub fn new(left_column_lines: usize, right_column_lines: usize) -> RxResult<Self> {
        if left_column_lines == 0 || right_column_lines == 0 {
            return Err(RxError::InvalidInput(
                "page columns must hold at least one line".into(),
            ));
        }

        Ok(Self {
            left_column_lines,
            right_column_lines,
        })
    }

    pub fn left_column_lines(&self) -> usize {
        self.left_column_lines
    }

    pub fn right_column_lines(&self) -> usize {
        self.right_column_lines
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            left_column_lines: DEFAULT_COLUMN_LINES,
            right_column_lines: DEFAULT_COLUMN_LINES,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    profile_dir: PathBuf,
    page: PageConfig,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(profile_dir: PathBuf, page: PageConfig) -> RxResult<Self> {
        if profile_dir.as_os_str().is_empty() {
            return Err(RxError::InvalidInput(
                "profile_dir cannot be empty".into(),
            ));
        }

        Ok(Self { profile_dir, page })
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    pub fn page(&self) -> &PageConfig {
        &self.page
    }
}

/// Parse the per-column line budget from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default A4 budget. A number applies to
/// both columns.
pub fn page_config_from_env_value(value: Option<String>) -> RxResult<PageConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(PageConfig::default()),
        Some(v) => {
            let lines: usize = v.parse().map_err(|_| {
                RxError::InvalidInput(format!("page line count must be a positive integer: {v}"))
            })?;
            PageConfig::new(lines, lines)
        }
    }
}
