//! Filesystem sink that realises a decomposition plan.
//!
//! The sink only needs two primitives from its environment, captured by
//! [`Filesystem`]: idempotent directory creation and whole-file replacement.
//!
//! In parallel mode items are split into lanes, one per independent subtree
//! (the profile root, each flat category folder, each
//! `objectPermissions/<object>` folder). Lanes run concurrently; items inside
//! a lane keep plan order. Two units with the same path always share a lane,
//! so last-write-wins still follows source order.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::core::category::Category;
use crate::core::plan::{OutputUnit, Plan, PlanItem};

pub trait Filesystem: Sync {
    /// Create `path` and any missing parents. Existing directories are fine.
    fn ensure_directory(&self, path: &Path) -> io::Result<()>;

    /// Replace the file at `path` with `body`.
    fn write_document(&self, path: &Path, body: &[u8]) -> io::Result<()>;
}

/// The real filesystem. Writes go through a temp file + rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_document(&self, path: &Path, body: &[u8]) -> io::Result<()> {
        let tmp_path = temp_path(path);
        fs::write(&tmp_path, body)?;
        fs::rename(&tmp_path, path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp_path);
        })
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialize {}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkOptions {
    /// Spaces per indentation level in written JSON.
    pub indent: usize,
    pub parallel: bool,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            parallel: true,
        }
    }
}

/// Counts of filesystem calls made by a sink run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    pub directories: usize,
    pub documents: usize,
}

impl SinkReport {
    fn merge(self, other: SinkReport) -> SinkReport {
        SinkReport {
            directories: self.directories + other.directories,
            documents: self.documents + other.documents,
        }
    }
}

pub struct Sink<'a, F: Filesystem> {
    fs: &'a F,
    root: PathBuf,
    options: SinkOptions,
}

impl<'a, F: Filesystem> Sink<'a, F> {
    pub fn new(fs: &'a F, root: impl Into<PathBuf>, options: SinkOptions) -> Self {
        Self {
            fs,
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every plan item under the sink root.
    pub fn write(&self, plan: &Plan) -> Result<SinkReport, SinkError> {
        self.ensure(&self.root)?;
        let root_report = SinkReport {
            directories: 1,
            documents: 0,
        };

        if !self.options.parallel {
            let items: Vec<&PlanItem> = plan.items().iter().collect();
            return Ok(root_report.merge(self.write_lane(&items)?));
        }

        let lanes = lanes(plan);
        debug!(lanes = lanes.len(), items = plan.len(), "writing plan in parallel");
        let reports = lanes
            .par_iter()
            .map(|lane| self.write_lane(lane))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reports.into_iter().fold(root_report, SinkReport::merge))
    }

    fn write_lane(&self, items: &[&PlanItem]) -> Result<SinkReport, SinkError> {
        let mut ensured: HashSet<PathBuf> = HashSet::new();
        ensured.insert(self.root.clone());
        let mut report = SinkReport::default();

        for item in items {
            match item {
                PlanItem::Folder(folder) => {
                    let path = self.root.join(folder);
                    if ensured.insert(path.clone()) {
                        debug!(path = %path.display(), "ensuring folder");
                        self.ensure(&path)?;
                        report.directories += 1;
                    }
                }
                PlanItem::Unit(unit) => {
                    let path = self.root.join(&unit.path);
                    if let Some(parent) = path.parent() {
                        if ensured.insert(parent.to_path_buf()) {
                            self.ensure(parent)?;
                            report.directories += 1;
                        }
                    }
                    self.write_unit(&path, unit)?;
                    report.documents += 1;
                }
            }
        }
        Ok(report)
    }

    fn write_unit(&self, path: &Path, unit: &OutputUnit) -> Result<(), SinkError> {
        debug!(path = %path.display(), source = %unit.source, "writing document");
        let body = render(&unit.body, self.options.indent).map_err(|source| {
            SinkError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.fs
            .write_document(path, &body)
            .map_err(|source| SinkError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    fn ensure(&self, path: &Path) -> Result<(), SinkError> {
        self.fs
            .ensure_directory(path)
            .map_err(|source| SinkError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Pretty JSON with `indent` spaces and a trailing newline.
pub fn render(body: &Value, indent: usize) -> Result<Vec<u8>, serde_json::Error> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    body.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Partition items into independent lanes, keeping plan order in each lane
/// and lanes in order of first appearance.
fn lanes(plan: &Plan) -> Vec<Vec<&PlanItem>> {
    let mut keys: Vec<PathBuf> = Vec::new();
    let mut lanes: Vec<Vec<&PlanItem>> = Vec::new();
    for item in plan.items() {
        let key = lane_key(item.path());
        match keys.iter().position(|existing| *existing == key) {
            Some(index) => lanes[index].push(item),
            None => {
                keys.push(key);
                lanes.push(vec![item]);
            }
        }
    }
    lanes
}

fn lane_key(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path.components().collect();
    let object_scoped = components
        .first()
        .is_some_and(|first| first.as_os_str() == Category::ObjectPermissions.as_str());
    let depth = match components.len() {
        0 | 1 => 0,
        len if object_scoped && len > 2 => 2,
        _ => 1,
    };
    components[..depth].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decompose::decompose;
    use crate::test_support::{FsOp, RecordingFs, sample_profile};
    use serde_json::json;

    fn assert_parents_ensured_before_writes(ops: &[FsOp]) {
        for (index, op) in ops.iter().enumerate() {
            if let FsOp::Write(path, _) = op {
                let parent = path.parent().expect("parent");
                assert!(
                    ops[..index]
                        .iter()
                        .any(|earlier| *earlier == FsOp::EnsureDir(parent.to_path_buf())),
                    "{} written before its folder",
                    path.display()
                );
            }
        }
    }

    #[test]
    fn sequential_write_follows_plan_order() {
        let plan = decompose(&sample_profile(), "Admin").expect("decompose");
        let fs = RecordingFs::default();
        let sink = Sink::new(
            &fs,
            "out",
            SinkOptions {
                parallel: false,
                ..SinkOptions::default()
            },
        );
        let report = sink.write(&plan).expect("write");

        let written = fs.written_paths();
        let expected: Vec<PathBuf> = plan.units().map(|u| Path::new("out").join(&u.path)).collect();
        assert_eq!(written, expected);
        assert_eq!(report.documents, plan.units().count());
        assert_eq!(fs.ops()[0], FsOp::EnsureDir(PathBuf::from("out")));
        assert_eq!(written[0], PathBuf::from("out/Admin.profile-meta.xml"));
        assert_parents_ensured_before_writes(&fs.ops());
    }

    #[test]
    fn parallel_write_orders_parents_and_same_path_writes() {
        let mut profile = sample_profile();
        profile.layout_assignments = vec![
            crate::test_support::entry(json!({"layout": "Account-Account Layout", "recordType": "Account.A"})),
            crate::test_support::entry(json!({"layout": "Account-Account Layout", "recordType": "Account.B"})),
        ];
        let plan = decompose(&profile, "Admin").expect("decompose");
        let fs = RecordingFs::default();
        let report = Sink::new(&fs, "out", SinkOptions::default())
            .write(&plan)
            .expect("write");

        assert_eq!(report.documents, plan.units().count());
        let ops = fs.ops();
        assert_eq!(ops[0], FsOp::EnsureDir(PathBuf::from("out")));
        assert_parents_ensured_before_writes(&ops);

        let layout = PathBuf::from("out/objectPermissions/Account/layoutAssignments/Account-Account Layout.json");
        let last = fs.last_write(&layout).expect("layout written");
        let body: Value = serde_json::from_slice(&last).expect("json");
        assert_eq!(body["recordType"], "Account.B");
    }

    #[test]
    fn empty_field_folder_is_ensured() {
        let plan = decompose(&sample_profile(), "Admin").expect("decompose");
        let fs = RecordingFs::default();
        Sink::new(&fs, "out", SinkOptions::default())
            .write(&plan)
            .expect("write");
        assert!(fs.ops().contains(&FsOp::EnsureDir(PathBuf::from(
            "out/objectPermissions/Contact/fieldPermissions"
        ))));
    }

    #[test]
    fn write_failure_surfaces_path() {
        let plan = decompose(&sample_profile(), "Admin").expect("decompose");
        let fs = RecordingFs::failing_on("out/classAccesses");
        let err = Sink::new(&fs, "out", SinkOptions::default())
            .write(&plan)
            .expect_err("fail");
        assert!(matches!(err, SinkError::CreateDir { ref path, .. } if path == Path::new("out/classAccesses")));
    }

    #[test]
    fn lane_keys_group_by_subtree() {
        assert_eq!(lane_key(Path::new("Admin.profile-meta.xml")), PathBuf::new());
        assert_eq!(lane_key(Path::new("classAccesses/Foo.json")), PathBuf::from("classAccesses"));
        assert_eq!(
            lane_key(Path::new("objectPermissions/Case/recordTypeVisibilities/Case.Support.json")),
            PathBuf::from("objectPermissions/Case")
        );
        assert_eq!(
            lane_key(Path::new("objectPermissions/Case/fieldPermissions")),
            PathBuf::from("objectPermissions/Case")
        );
    }

    #[test]
    fn render_uses_configured_indent_and_trailing_newline() {
        let rendered = render(&json!({"tab": "standard-Account", "visibility": "DefaultOn"}), 2)
            .expect("render");
        assert_eq!(
            String::from_utf8(rendered).expect("utf8"),
            "{\n  \"tab\": \"standard-Account\",\n  \"visibility\": \"DefaultOn\"\n}\n"
        );
    }

    #[test]
    fn local_fs_replaces_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("doc.json");
        LocalFs.write_document(&path, b"old").expect("first");
        LocalFs.write_document(&path, b"new").expect("second");
        assert_eq!(fs::read(&path).expect("read"), b"new");
        assert!(!temp.path().join("doc.json.tmp").exists());
    }
}
