//! Maps the abstract id/name/image roles onto the columns a CSV actually has.

use std::collections::HashMap;
use std::fmt;

pub const ID_CANDIDATES: &[&str] = &[
    "id", "ID", "Id",
    "caseId", "caseID", "CaseId",
    "url", "URL", "Url",
];

pub const NAME_CANDIDATES: &[&str] = &["name", "名稱", "title", "caseName"];

pub const IMAGE_CANDIDATES: &[&str] = &[
    "imageUrl_s", "image", "thumbnail", "image_url", "imageurl", "img", "thumb", "thumbnail_s",
    "representImage.transform.c",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Id,
    Name,
    Image,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 3] = [ColumnRole::Id, ColumnRole::Name, ColumnRole::Image];

    /// Candidate column names, highest priority first.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Id => ID_CANDIDATES,
            ColumnRole::Name => NAME_CANDIDATES,
            ColumnRole::Image => IMAGE_CANDIDATES,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Id => write!(f, "id"),
            ColumnRole::Name => write!(f, "name"),
            ColumnRole::Image => write!(f, "image"),
        }
    }
}

/// Role → actual column name. A role with no matching column is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    roles: HashMap<ColumnRole, String>,
}

impl ResolvedColumns {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.roles.get(&role).map(|s| s.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.get(ColumnRole::Id)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(ColumnRole::Name)
    }

    pub fn image(&self) -> Option<&str> {
        self.get(ColumnRole::Image)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// First candidate for `role` present in `columns` (case-sensitive).
/// Candidate order decides, not the order of the table's columns.
pub fn resolve_role<S: AsRef<str>>(columns: &[S], role: ColumnRole) -> Option<String> {
    role.candidates()
        .iter()
        .find(|candidate| columns.iter().any(|c| c.as_ref() == **candidate))
        .map(|candidate| candidate.to_string())
}

pub fn resolve_columns<S: AsRef<str>>(columns: &[S]) -> ResolvedColumns {
    let mut roles = HashMap::new();
    for role in ColumnRole::ALL {
        if let Some(column) = resolve_role(columns, role) {
            roles.insert(role, column);
        }
    }
    ResolvedColumns { roles }
}
