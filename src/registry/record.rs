//! Environment metadata records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BurrowError, Result};

/// One managed isolated environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    /// Unique name within the registry. Alphanumeric plus `-`/`_` only.
    pub name: String,

    /// Absolute root directory of the environment.
    pub path: PathBuf,

    /// Interpreter version actually realized inside the environment,
    /// probed after creation (not the version the caller asked for).
    pub runtime_version: String,

    /// Dependency manifest applied at creation time, if any.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    /// Secondary/development manifest, if any.
    #[serde(default)]
    pub dev_manifest_path: Option<PathBuf>,

    /// Free-text annotation, may be empty.
    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    /// Updated on every activation; never moves backwards.
    pub last_used_at: DateTime<Utc>,
}

impl EnvironmentRecord {
    /// Build a fresh record with both timestamps set to now.
    pub fn new(name: &str, path: PathBuf, runtime_version: String) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            path,
            runtime_version,
            manifest_path: None,
            dev_manifest_path: None,
            description: String::new(),
            created_at: now,
            last_used_at: now,
        }
    }

    /// Mark the environment as used, keeping `last_used_at` monotonic even
    /// if the wall clock stepped backwards.
    pub fn touch(&mut self) {
        self.last_used_at = self.last_used_at.max(Utc::now());
    }
}

/// Validate an environment name: non-empty, alphanumeric plus `-`/`_`.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BurrowError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_equal_timestamps() {
        let record = EnvironmentRecord::new("demo", PathBuf::from("/envs/demo"), "3.12.1".into());
        assert_eq!(record.created_at, record.last_used_at);
        assert!(record.manifest_path.is_none());
        assert!(record.description.is_empty());
    }

    #[test]
    fn touch_is_monotonic() {
        let mut record =
            EnvironmentRecord::new("demo", PathBuf::from("/envs/demo"), "3.12.1".into());
        // Simulate a record stamped in the future (clock skew).
        record.last_used_at = Utc::now() + chrono::Duration::hours(1);
        let before = record.last_used_at;
        record.touch();
        assert!(record.last_used_at >= before);
    }

    #[test]
    fn touch_advances_past_creation() {
        let mut record =
            EnvironmentRecord::new("demo", PathBuf::from("/envs/demo"), "3.12.1".into());
        let created = record.created_at;
        record.touch();
        assert!(record.last_used_at >= created);
    }

    #[test]
    fn valid_names_accepted() {
        for name in ["demo", "demo-env", "demo_env", "Env2", "a"] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn invalid_names_rejected() {
        for name in ["", "has space", "slash/y", "dot.ted", "uni-cøde", "a!b"] {
            assert!(
                matches!(validate_name(name), Err(BurrowError::InvalidName { .. })),
                "{name} should be invalid"
            );
        }
    }

    #[test]
    fn record_serializes_round_trip() {
        let mut record =
            EnvironmentRecord::new("demo", PathBuf::from("/envs/demo"), "3.12.1".into());
        record.manifest_path = Some(PathBuf::from("requirements.txt"));
        record.description = "scratch env".into();

        let json = serde_json::to_string(&record).unwrap();
        let parsed: EnvironmentRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.name, "demo");
        assert_eq!(parsed.manifest_path, Some(PathBuf::from("requirements.txt")));
        assert_eq!(parsed.description, "scratch env");
        assert_eq!(parsed.created_at, record.created_at);
    }

    #[test]
    fn record_parses_without_optional_fields() {
        let json = r#"{
            "name": "lean",
            "path": "/envs/lean",
            "runtime_version": "3.11.4",
            "created_at": "2026-01-10T12:00:00Z",
            "last_used_at": "2026-01-10T12:00:00Z"
        }"#;
        let parsed: EnvironmentRecord = serde_json::from_str(json).unwrap();
        assert!(parsed.manifest_path.is_none());
        assert!(parsed.dev_manifest_path.is_none());
        assert!(parsed.description.is_empty());
    }
}
