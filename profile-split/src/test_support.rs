//! Test-only helpers: profile fixtures and a recording filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::io::sink::Filesystem;
use crate::profile::{Entry, Profile, ProfileDocument};

/// Convert a `json!` object literal into an entry.
pub fn entry(value: Value) -> Entry {
    match value {
        Value::Object(map) => map,
        other => panic!("entry fixture must be an object, got {other}"),
    }
}

/// A small profile touching every category, with one object permission
/// (`Contact`) that has no field permissions and one field permission
/// (`Invoice__c.Total__c`) whose object has no object permission.
pub fn sample_profile() -> Profile {
    let mut profile = Profile::empty(json!(false), json!("Salesforce"));
    profile.application_visibilities = vec![
        entry(json!({"application": "standard__Sales", "default": true, "visible": true})),
        entry(json!({"application": "Field_Ops", "default": false, "visible": true})),
    ];
    profile.class_accesses = vec![
        entry(json!({"apexClass": "InvoiceService", "enabled": true})),
        entry(json!({"apexClass": "AccountTriggerHandler", "enabled": false})),
    ];
    profile.custom_permissions = vec![entry(json!({"enabled": true, "name": "Approve_Refunds"}))];
    profile.page_accesses = vec![entry(json!({"apexPage": "InvoicePdf", "enabled": true}))];
    profile.tab_visibilities = vec![
        entry(json!({"tab": "standard-Account", "visibility": "DefaultOn"})),
        entry(json!({"tab": "Invoice__c", "visibility": "Hidden"})),
    ];
    profile.user_permissions = vec![
        entry(json!({"enabled": true, "name": "ApiEnabled"})),
        entry(json!({"enabled": true, "name": "ViewSetup"})),
    ];
    profile.object_permissions = vec![
        entry(json!({
            "allowCreate": true,
            "allowDelete": false,
            "allowEdit": true,
            "allowRead": true,
            "object": "Account"
        })),
        entry(json!({"allowRead": true, "object": "Contact"})),
    ];
    profile.field_permissions = vec![
        entry(json!({"editable": true, "field": "Account.Name", "readable": true})),
        entry(json!({"editable": false, "field": "Account.Industry", "readable": true})),
        entry(json!({"editable": false, "field": "Invoice__c.Total__c", "readable": true})),
    ];
    profile.layout_assignments = vec![
        entry(json!({"layout": "Account-Account Layout"})),
        entry(json!({"layout": "Lead-Lead Layout"})),
    ];
    profile.record_type_visibilities = vec![entry(json!({
        "default": true,
        "recordType": "Case.Support",
        "visible": true
    }))];
    profile
}

/// Scratch directory holding a `<name>.profile-meta.json` source document.
pub struct ProfileWorkspace {
    dir: TempDir,
}

impl ProfileWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `profile` as `<name>.profile-meta.json` and return its path.
    pub fn write_profile(&self, name: &str, profile: &Profile) -> Result<PathBuf> {
        let doc = ProfileDocument {
            profile: profile.clone(),
        };
        let path = self.path().join(format!("{name}.profile-meta.json"));
        let contents = serde_json::to_string_pretty(&doc).context("serialize profile")?;
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write raw text as the source document for `name`.
    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(format!("{name}.profile-meta.json"));
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    EnsureDir(PathBuf),
    Write(PathBuf, Vec<u8>),
}

/// In-memory [`Filesystem`] that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingFs {
    ops: Mutex<Vec<FsOp>>,
    fail_on: Option<PathBuf>,
}

impl RecordingFs {
    /// Fail any call whose path equals `path`.
    pub fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            fail_on: Some(path.into()),
        }
    }

    pub fn ops(&self) -> Vec<FsOp> {
        self.ops.lock().expect("ops lock").clone()
    }

    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                FsOp::Write(path, _) => Some(path),
                FsOp::EnsureDir(_) => None,
            })
            .collect()
    }

    /// Body of the last write to `path`.
    pub fn last_write(&self, path: &Path) -> Option<Vec<u8>> {
        self.ops().into_iter().rev().find_map(|op| match op {
            FsOp::Write(written, body) if written == path => Some(body),
            _ => None,
        })
    }

    fn record(&self, path: &Path, op: FsOp) -> io::Result<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "scripted failure",
            ));
        }
        self.ops.lock().expect("ops lock").push(op);
        Ok(())
    }
}

impl Filesystem for RecordingFs {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        self.record(path, FsOp::EnsureDir(path.to_path_buf()))
    }

    fn write_document(&self, path: &Path, body: &[u8]) -> io::Result<()> {
        self.record(path, FsOp::Write(path.to_path_buf(), body.to_vec()))
    }
}
