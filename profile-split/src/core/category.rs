//! Permission categories and their key fields.

use std::fmt;

/// One of the permission-entry collections of a profile.
///
/// Variant order is emission order: the six flat categories first, then the
/// object-scoped ones with `ObjectPermissions` leading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ApplicationVisibilities,
    ClassAccesses,
    CustomPermissions,
    PageAccesses,
    TabVisibilities,
    UserPermissions,
    ObjectPermissions,
    FieldPermissions,
    LayoutAssignments,
    RecordTypeVisibilities,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::ApplicationVisibilities,
        Category::ClassAccesses,
        Category::CustomPermissions,
        Category::PageAccesses,
        Category::TabVisibilities,
        Category::UserPermissions,
        Category::ObjectPermissions,
        Category::FieldPermissions,
        Category::LayoutAssignments,
        Category::RecordTypeVisibilities,
    ];

    /// Folder name, identical to the profile's collection name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::ApplicationVisibilities => "applicationVisibilities",
            Category::ClassAccesses => "classAccesses",
            Category::CustomPermissions => "customPermissions",
            Category::PageAccesses => "pageAccesses",
            Category::TabVisibilities => "tabVisibilities",
            Category::UserPermissions => "userPermissions",
            Category::ObjectPermissions => "objectPermissions",
            Category::FieldPermissions => "fieldPermissions",
            Category::LayoutAssignments => "layoutAssignments",
            Category::RecordTypeVisibilities => "recordTypeVisibilities",
        }
    }

    /// Entry field that names the file.
    pub fn key_field(self) -> &'static str {
        match self {
            Category::ApplicationVisibilities => "application",
            Category::ClassAccesses => "apexClass",
            Category::CustomPermissions | Category::UserPermissions => "name",
            Category::PageAccesses => "apexPage",
            Category::TabVisibilities => "tab",
            Category::ObjectPermissions => "object",
            Category::FieldPermissions => "field",
            Category::LayoutAssignments => "layout",
            Category::RecordTypeVisibilities => "recordType",
        }
    }

    /// True if entries are grouped under `objectPermissions/<object>/`.
    pub fn is_object_scoped(self) -> bool {
        matches!(
            self,
            Category::ObjectPermissions
                | Category::FieldPermissions
                | Category::LayoutAssignments
                | Category::RecordTypeVisibilities
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
