//! Human-readable listing of application visibilities and class accesses.

use std::fmt;

use serde_json::Value;

use crate::profile::{Entry, Profile};

const STANDARD_PREFIX: &str = "standard";
const STANDARD_APP_PREFIX: &str = "standard__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVisibility {
    /// Application name with the `standard__` prefix removed.
    pub name: String,
    /// False for applications shipped by the platform (`standard*`).
    pub custom: bool,
    pub default: String,
    pub visible: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAccess {
    pub name: String,
    pub enabled: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub applications: Vec<AppVisibility>,
    pub classes: Vec<ClassAccess>,
}

pub fn summarize(profile: &Profile) -> ProfileSummary {
    let applications = profile
        .application_visibilities
        .iter()
        .map(|entry| {
            let application = text(entry, "application");
            AppVisibility {
                name: application
                    .strip_prefix(STANDARD_APP_PREFIX)
                    .unwrap_or(application.as_str())
                    .to_string(),
                custom: !application.starts_with(STANDARD_PREFIX),
                default: text(entry, "default"),
                visible: text(entry, "visible"),
            }
        })
        .collect();
    let classes = profile
        .class_accesses
        .iter()
        .map(|entry| ClassAccess {
            name: text(entry, "apexClass"),
            enabled: text(entry, "enabled"),
        })
        .collect();
    ProfileSummary {
        applications,
        classes,
    }
}

/// Render a field the way it reads in the source document; absent fields
/// print as `undefined`.
fn text(entry: &Entry, field: &str) -> String {
    match entry.get(field) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Null) | None => "undefined".to_string(),
        Some(other) => other.to_string(),
    }
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for app in &self.applications {
            writeln!(f, "{}", app.name)?;
            writeln!(f, "    custom: {}", app.custom)?;
            writeln!(f, "    default: {}", app.default)?;
            writeln!(f, "    visible: {}", app.visible)?;
            writeln!(f)?;
        }
        for class in &self.classes {
            writeln!(f, "{}", class.name)?;
            writeln!(f, "    enabled: {}", class.enabled)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
