//! Mapping from a profile to its ordered output plan.
//!
//! Emission order is fixed: the marker document, the six flat categories,
//! then `objectPermissions` followed by the categories nested under it.
//! Within a category, entries keep their source order and are never merged,
//! so duplicate keys produce duplicate paths (see [`Plan::collisions`]).

use std::path::PathBuf;

use serde_json::Value;

use crate::core::category::Category;
use crate::core::error::Result;
use crate::core::keys::{
    EntryRef, layout_object, optional_str, path_segment, required_str, split_qualified,
};
use crate::core::layout::PathLayout;
use crate::core::plan::{Plan, Source};
use crate::profile::{Entry, Profile};

/// Decompose with the default layout.
pub fn decompose(profile: &Profile, profile_name: &str) -> Result<Plan> {
    decompose_with(profile, profile_name, &PathLayout::default())
}

pub fn decompose_with(profile: &Profile, profile_name: &str, layout: &PathLayout) -> Result<Plan> {
    let mut plan = Plan::default();
    plan.push_unit(
        layout.marker_path(profile_name)?,
        profile.marker(),
        Source::Marker,
    );

    for category in Category::ALL {
        for (index, entry) in profile.entries(category).iter().enumerate() {
            let at = EntryRef::new(category, index);
            let placement = place(entry, at)?;
            plan.push_unit(
                placement.path,
                Value::Object(entry.clone()),
                Source::Entry(at),
            );
            if let Some(folder) = placement.folder {
                plan.push_folder(folder);
            }
        }
    }

    Ok(plan)
}

struct Placement {
    path: PathBuf,
    folder: Option<PathBuf>,
}

impl Placement {
    fn file(path: PathBuf) -> Self {
        Self { path, folder: None }
    }
}

fn place(entry: &Entry, at: EntryRef) -> Result<Placement> {
    let category = at.category;
    let key = required_str(entry, at, category.key_field())?;

    match category {
        Category::ObjectPermissions => {
            let object = path_segment(key, at)?;
            let folder = object_folder(object);
            Ok(Placement {
                path: folder.join(json_file(object)),
                folder: Some(folder.join(Category::FieldPermissions.as_str())),
            })
        }
        Category::FieldPermissions => {
            let (object, field) = split_qualified(key, at)?;
            Ok(Placement::file(nested_file(
                path_segment(object, at)?,
                category,
                path_segment(field, at)?,
            )))
        }
        Category::LayoutAssignments => {
            // An assigned record type pins the object; the layout prefix is the fallback.
            let object = match optional_str(entry, "recordType") {
                Some(record_type) => split_qualified(record_type, at)?.0,
                None => layout_object(key, at)?,
            };
            Ok(Placement::file(nested_file(
                path_segment(object, at)?,
                category,
                path_segment(key, at)?,
            )))
        }
        Category::RecordTypeVisibilities => {
            let (object, _) = split_qualified(key, at)?;
            Ok(Placement::file(nested_file(
                path_segment(object, at)?,
                category,
                path_segment(key, at)?,
            )))
        }
        _ => {
            let mut path = PathBuf::from(category.as_str());
            path.push(json_file(path_segment(key, at)?));
            Ok(Placement::file(path))
        }
    }
}

fn object_folder(object: &str) -> PathBuf {
    let mut path = PathBuf::from(Category::ObjectPermissions.as_str());
    path.push(object);
    path
}

fn nested_file(object: &str, category: Category, stem: &str) -> PathBuf {
    let mut path = object_folder(object);
    path.push(category.as_str());
    path.push(json_file(stem));
    path
}

fn json_file(stem: &str) -> String {
    format!("{stem}.json")
}
