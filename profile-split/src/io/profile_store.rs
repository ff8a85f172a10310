//! Profile document loading with schema validation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::error::DecomposeError;
use crate::profile::{Profile, ProfileDocument};

const PROFILE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/profile/v1.schema.json"
));

/// Conventional source path for `profile_name`: `<dir>/<name>.profile-meta.json`.
pub fn default_source_path(dir: &Path, profile_name: &str) -> PathBuf {
    dir.join(format!("{profile_name}.profile-meta.json"))
}

/// Load a profile document, validating it against the embedded schema.
///
/// Shape problems (bad JSON, schema violations) surface as
/// [`DecomposeError::InvalidDocument`] so callers can tell them apart from
/// I/O failures.
pub fn load_profile(path: &Path) -> Result<Profile> {
    debug!(path = %path.display(), "loading profile");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read profile {}", path.display()))?;
    let profile = parse_profile(&contents)
        .with_context(|| format!("parse profile {}", path.display()))?;
    debug!(entries = profile.entry_count(), "profile loaded");
    Ok(profile)
}

pub fn parse_profile(contents: &str) -> Result<Profile> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|err| DecomposeError::InvalidDocument(err.to_string()))?;
    validate_schema(&value)?;
    let doc: ProfileDocument = serde_json::from_value(value)
        .map_err(|err| DecomposeError::InvalidDocument(err.to_string()))?;
    Ok(doc.profile)
}

fn validate_schema(document: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(PROFILE_SCHEMA).context("parse profile schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    let messages = compiled
        .iter_errors(document)
        .map(|err| err.to_string())
        .collect::<Vec<_>>();
    if !messages.is_empty() {
        return Err(DecomposeError::InvalidDocument(messages.join("; ")).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ProfileWorkspace, sample_profile};

    #[test]
    fn written_profile_loads_back() {
        let workspace = ProfileWorkspace::new().expect("workspace");
        let path = workspace
            .write_profile("Admin", &sample_profile())
            .expect("write");
        assert_eq!(path, default_source_path(workspace.path(), "Admin"));
        let loaded = load_profile(&path).expect("load");
        assert_eq!(loaded, sample_profile());
    }

    #[test]
    fn schema_violation_is_invalid_document() {
        let err = parse_profile(r#"{"Profile": {"custom": false, "userLicense": "Salesforce"}}"#)
            .expect_err("missing categories");
        let decompose_err = err
            .downcast_ref::<DecomposeError>()
            .expect("typed error");
        assert!(matches!(decompose_err, DecomposeError::InvalidDocument(msg) if msg.contains("fieldPermissions")));
    }

    #[test]
    fn non_object_entry_is_rejected() {
        let workspace = ProfileWorkspace::new().expect("workspace");
        let mut raw = serde_json::to_value(crate::profile::ProfileDocument {
            profile: sample_profile(),
        })
        .expect("to value");
        raw["Profile"]["tabVisibilities"] = serde_json::json!(["standard-Account"]);
        let path = workspace.write_raw("Admin", &raw.to_string()).expect("write");
        let err = load_profile(&path).expect_err("invalid");
        assert!(err.downcast_ref::<DecomposeError>().is_some());
    }

    #[test]
    fn missing_file_is_not_invalid_document() {
        let workspace = ProfileWorkspace::new().expect("workspace");
        let err = load_profile(&workspace.path().join("absent.json")).expect_err("missing");
        assert!(err.downcast_ref::<DecomposeError>().is_none());
    }
}
