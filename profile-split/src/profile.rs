use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::category::Category;

/// A single permission entry, kept as the raw JSON object so field order and
/// values survive decomposition untouched.
pub type Entry = Map<String, Value>;

/// On-disk wrapper: the JSON projection of a `.profile-meta.xml` file nests
/// everything under a `Profile` key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfileDocument {
    #[serde(rename = "Profile")]
    pub profile: Profile,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub custom: Value,
    pub user_license: Value,
    pub application_visibilities: Vec<Entry>,
    pub class_accesses: Vec<Entry>,
    pub custom_permissions: Vec<Entry>,
    pub page_accesses: Vec<Entry>,
    pub tab_visibilities: Vec<Entry>,
    pub user_permissions: Vec<Entry>,
    pub object_permissions: Vec<Entry>,
    pub field_permissions: Vec<Entry>,
    pub layout_assignments: Vec<Entry>,
    pub record_type_visibilities: Vec<Entry>,
}

impl Profile {
    /// Profile with the given marker values and no entries.
    pub fn empty(custom: Value, user_license: Value) -> Self {
        Self {
            custom,
            user_license,
            application_visibilities: Vec::new(),
            class_accesses: Vec::new(),
            custom_permissions: Vec::new(),
            page_accesses: Vec::new(),
            tab_visibilities: Vec::new(),
            user_permissions: Vec::new(),
            object_permissions: Vec::new(),
            field_permissions: Vec::new(),
            layout_assignments: Vec::new(),
            record_type_visibilities: Vec::new(),
        }
    }

    pub fn entries(&self, category: Category) -> &[Entry] {
        match category {
            Category::ApplicationVisibilities => &self.application_visibilities,
            Category::ClassAccesses => &self.class_accesses,
            Category::CustomPermissions => &self.custom_permissions,
            Category::PageAccesses => &self.page_accesses,
            Category::TabVisibilities => &self.tab_visibilities,
            Category::UserPermissions => &self.user_permissions,
            Category::ObjectPermissions => &self.object_permissions,
            Category::FieldPermissions => &self.field_permissions,
            Category::LayoutAssignments => &self.layout_assignments,
            Category::RecordTypeVisibilities => &self.record_type_visibilities,
        }
    }

    /// Total number of permission entries across every category.
    pub fn entry_count(&self) -> usize {
        Category::ALL
            .iter()
            .map(|category| self.entries(*category).len())
            .sum()
    }

    /// The synthesized marker document: only `custom` and `userLicense`.
    pub fn marker(&self) -> Value {
        let mut marker = Map::new();
        marker.insert("custom".to_string(), self.custom.clone());
        marker.insert("userLicense".to_string(), self.user_license.clone());
        Value::Object(marker)
    }
}
