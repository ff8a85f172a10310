//! The ordered output of a decomposition.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::keys::EntryRef;

/// Where an output unit's body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Marker,
    Entry(EntryRef),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Marker => f.write_str("marker"),
            Source::Entry(at) => write!(f, "{}[{}]", at.category, at.index),
        }
    }
}

/// A document to write, relative to the profile root.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputUnit {
    pub path: PathBuf,
    pub body: Value,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanItem {
    /// Directory that must exist even if nothing is written into it.
    Folder(PathBuf),
    Unit(OutputUnit),
}

impl PlanItem {
    pub fn path(&self) -> &Path {
        match self {
            PlanItem::Folder(path) => path,
            PlanItem::Unit(unit) => &unit.path,
        }
    }
}

/// A path written by more than one unit. Writers are in plan order, so the
/// last one determines the final file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub path: PathBuf,
    pub writers: Vec<Source>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    items: Vec<PlanItem>,
}

impl Plan {
    pub fn push_unit(&mut self, path: PathBuf, body: Value, source: Source) {
        self.items.push(PlanItem::Unit(OutputUnit { path, body, source }));
    }

    pub fn push_folder(&mut self, path: PathBuf) {
        self.items.push(PlanItem::Folder(path));
    }

    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn units(&self) -> impl Iterator<Item = &OutputUnit> {
        self.items.iter().filter_map(|item| match item {
            PlanItem::Unit(unit) => Some(unit),
            PlanItem::Folder(_) => None,
        })
    }

    pub fn folders(&self) -> impl Iterator<Item = &Path> {
        self.items.iter().filter_map(|item| match item {
            PlanItem::Folder(path) => Some(path.as_path()),
            PlanItem::Unit(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Paths targeted by more than one unit, in order of first appearance.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut order: Vec<&Path> = Vec::new();
        let mut writers: HashMap<&Path, Vec<Source>> = HashMap::new();
        for unit in self.units() {
            let entry = writers.entry(unit.path.as_path()).or_default();
            if entry.is_empty() {
                order.push(unit.path.as_path());
            }
            entry.push(unit.source);
        }
        order
            .into_iter()
            .filter_map(|path| {
                let sources = writers.remove(path)?;
                (sources.len() > 1).then(|| Collision {
                    path: path.to_path_buf(),
                    writers: sources,
                })
            })
            .collect()
    }
}
