use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::path::TreePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One node of a listing. `path` is always `parent/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: TreePath,
    pub kind: EntryKind,
    /// Zero for folders.
    pub size_bytes: u64,
    /// Public URL; files only.
    pub url: Option<String>,
}

impl TreeEntry {
    pub fn folder(parent: &TreePath, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: parent.join(name),
            kind: EntryKind::Folder,
            size_bytes: 0,
            url: None,
        }
    }

    pub fn file(parent: &TreePath, name: &str, size_bytes: u64, url: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            path: parent.join(name),
            kind: EntryKind::File,
            size_bytes,
            url,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Size as shown in listings, e.g. `"1.5 KB"`. Folders have none.
    pub fn size_label(&self) -> Option<String> {
        match self.kind {
            EntryKind::Folder => None,
            EntryKind::File => Some(format!("{:.1} KB", self.size_bytes as f64 / 1024.0)),
        }
    }
}

/// Raw object as reported by an object store for one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    /// Explicit node type, when the store knows it.
    pub kind: Option<EntryKind>,
    /// Size metadata. Stores without an explicit type only attach it to files.
    pub size_bytes: Option<u64>,
}

impl StoredObject {
    /// Explicit kind wins; otherwise the presence of size metadata decides.
    pub fn classify(&self) -> EntryKind {
        match (self.kind, self.size_bytes) {
            (Some(kind), _) => kind,
            (None, Some(_)) => EntryKind::File,
            (None, None) => EntryKind::Folder,
        }
    }
}

/// Drops names that cannot form a child path, keeps the first of any
/// duplicate names and sorts by name.
pub(crate) fn normalize_listing(mut entries: Vec<TreeEntry>) -> Vec<TreeEntry> {
    let mut seen = HashSet::new();
    entries.retain(|entry| {
        let valid = !entry.name.trim().is_empty() && !entry.name.contains('/');
        if !valid {
            tracing::debug!(name = %entry.name, "dropping entry with unusable name");
            return false;
        }
        if !seen.insert(entry.name.clone()) {
            tracing::debug!(name = %entry.name, "dropping duplicate entry");
            return false;
        }
        true
    });
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_label_uses_one_decimal_kilobytes() {
        let root = TreePath::root();
        assert_eq!(TreeEntry::file(&root, "a", 1536, None).size_label().as_deref(), Some("1.5 KB"));
        assert_eq!(TreeEntry::file(&root, "a", 0, None).size_label().as_deref(), Some("0.0 KB"));
        assert_eq!(TreeEntry::folder(&root, "d").size_label(), None);
    }

    #[test]
    fn zero_byte_file_with_explicit_kind_stays_a_file() {
        let object = StoredObject {
            name: "empty.wav".into(),
            kind: Some(EntryKind::File),
            size_bytes: None,
        };
        assert_eq!(object.classify(), EntryKind::File);
        let implied = StoredObject {
            name: "drums".into(),
            kind: None,
            size_bytes: None,
        };
        assert_eq!(implied.classify(), EntryKind::Folder);
    }

    #[test]
    fn normalize_drops_bad_and_duplicate_names() {
        let parent = TreePath::parse("mixes");
        let mut bad = TreeEntry::file(&parent, "x", 1, None);
        bad.name = "a/b".into();
        let entries = vec![
            TreeEntry::file(&parent, "b.wav", 1, None),
            TreeEntry::folder(&parent, "a"),
            bad,
            TreeEntry::file(&parent, "b.wav", 2, None),
            TreeEntry::file(&parent, " ", 2, None),
        ];
        let out = normalize_listing(entries);
        let names: Vec<_> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b.wav"]);
        assert_eq!(out[1].size_bytes, 1);
        assert_eq!(out[0].path.as_str(), "mixes/a");
    }
}
