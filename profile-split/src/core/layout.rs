//! Output path naming that is configurable rather than hard-coded.

use std::path::{Component, Path, PathBuf};

use minijinja::{Environment, context};

use crate::core::error::{DecomposeError, Result};

/// Historical marker naming: the file carries JSON but keeps the `.xml`
/// suffix of the metadata file it summarises.
pub const DEFAULT_MARKER_TEMPLATE: &str = "{{ profile_name }}.profile-meta.xml";

/// Path templates applied by the decomposer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    /// minijinja template for the marker document; `profile_name` is in scope.
    pub marker_template: String,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            marker_template: DEFAULT_MARKER_TEMPLATE.to_string(),
        }
    }
}

impl PathLayout {
    pub fn new(marker_template: impl Into<String>) -> Self {
        Self {
            marker_template: marker_template.into(),
        }
    }

    /// Render the marker path for `profile_name`, relative to the profile root.
    pub fn marker_path(&self, profile_name: &str) -> Result<PathBuf> {
        validate_profile_name(profile_name)?;
        let env = Environment::new();
        let rendered = env
            .render_str(&self.marker_template, context! { profile_name })
            .map_err(|err| DecomposeError::Template(err.to_string()))?;
        let rendered = rendered.trim();
        if rendered.is_empty() {
            return Err(DecomposeError::Template(format!(
                "'{}' renders to an empty path",
                self.marker_template
            )));
        }
        let path = PathBuf::from(rendered);
        if !is_contained(&path) {
            return Err(DecomposeError::Template(format!(
                "'{}' renders outside the profile folder",
                rendered
            )));
        }
        Ok(path)
    }
}

/// Profile names become a directory name, so they must be one safe segment.
pub fn validate_profile_name(profile_name: &str) -> Result<()> {
    let invalid = profile_name.trim().is_empty()
        || profile_name == "."
        || profile_name == ".."
        || profile_name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(DecomposeError::InvalidProfileName(profile_name.to_string()));
    }
    Ok(())
}

fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}
