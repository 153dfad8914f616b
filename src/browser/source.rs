//! Listing collaborators: the [`TreeSource`] seam the browser consumes and an
//! adapter that builds one on top of a prefix-listing object store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::entry::{EntryKind, StoredObject, TreeEntry, normalize_listing};
use super::error::FetchError;
use super::path::TreePath;
use crate::constants::LISTING_LIMIT;

/// Lists one level of a remote tree. Called off the UI thread.
pub trait TreeSource: Send + Sync {
    fn list(&self, path: &TreePath) -> Result<Vec<TreeEntry>, FetchError>;
}

/// Prefix-listing bucket API.
pub trait ObjectStore: Send + Sync {
    /// Direct children of `prefix` (`""` or ending in `/`), at most `limit`.
    fn list(&self, prefix: &str, limit: usize) -> Result<Vec<StoredObject>, FetchError>;

    /// Deterministic public URL of the object at `path`.
    fn public_url(&self, path: &str) -> String;
}

/// Turns raw store objects into [`TreeEntry`] values for one folder.
#[derive(Debug)]
pub struct ObjectStoreSource<S> {
    store: S,
    limit: usize,
}

impl<S: ObjectStore> ObjectStoreSource<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limit: LISTING_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ObjectStore> TreeSource for ObjectStoreSource<S> {
    fn list(&self, path: &TreePath) -> Result<Vec<TreeEntry>, FetchError> {
        let prefix = path.as_prefix();
        let objects = self.store.list(&prefix, self.limit)?;
        let entries = objects
            .into_iter()
            .map(|object| match object.classify() {
                EntryKind::Folder => TreeEntry::folder(path, &object.name),
                EntryKind::File => {
                    let url = self.store.public_url(&format!("{prefix}{}", object.name));
                    TreeEntry::file(path, &object.name, object.size_bytes.unwrap_or(0), Some(url))
                }
            })
            .collect();
        let mut entries = normalize_listing(entries);
        entries.truncate(self.limit);
        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Folder,
    File(u64),
}

/// In-process object store. Folders are implied by file paths and may also
/// be created empty.
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: String,
    nodes: Mutex<BTreeMap<String, Node>>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            nodes: Mutex::new(BTreeMap::new()),
        }
    }

    /// A small sample library so the desk runs without a backend.
    pub fn demo() -> Self {
        let store = Self::new("memory://library");
        for (path, size) in [
            ("drums/kick-808.wav", 182_044),
            ("drums/snare-tight.wav", 96_512),
            ("drums/loops/break-92bpm.wav", 1_544_320),
            ("drums/loops/shuffle-120bpm.wav", 1_210_880),
            ("vocals/takes/take-01.wav", 4_120_576),
            ("vocals/takes/take-02.wav", 3_987_456),
            ("vocals/harmony-bus.wav", 2_310_144),
            ("mixes/final-master.mp3", 8_911_872),
            ("mixes/rough-mix-v3.mp3", 8_650_752),
            ("session-notes.txt", 2_048),
        ] {
            store.insert_file(path, size);
        }
        store.insert_folder("stems");
        store
    }

    pub fn insert_file(&self, path: &str, size_bytes: u64) {
        let path = TreePath::parse(path);
        if let Ok(mut nodes) = self.nodes.lock() {
            nodes.insert(path.as_str().to_string(), Node::File(size_bytes));
        }
    }

    pub fn insert_folder(&self, path: &str) {
        let path = TreePath::parse(path);
        if let Ok(mut nodes) = self.nodes.lock() {
            nodes.insert(path.as_str().to_string(), Node::Folder);
        }
    }

    pub fn remove(&self, path: &str) -> bool {
        let path = TreePath::parse(path);
        self.nodes
            .lock()
            .map(|mut nodes| nodes.remove(path.as_str()).is_some())
            .unwrap_or(false)
    }
}

impl ObjectStore for MemoryObjectStore {
    fn list(&self, prefix: &str, limit: usize) -> Result<Vec<StoredObject>, FetchError> {
        let nodes = self
            .nodes
            .lock()
            .map_err(|_| FetchError::Backend("object store unavailable".into()))?;
        let mut children: BTreeMap<String, StoredObject> = BTreeMap::new();
        for (path, node) in nodes.range(prefix.to_string()..) {
            let Some(rest) = path.strip_prefix(prefix) else {
                break;
            };
            if rest.is_empty() {
                continue;
            }
            let object = match rest.split_once('/') {
                Some((folder, _)) => StoredObject {
                    name: folder.to_string(),
                    kind: None,
                    size_bytes: None,
                },
                None => match node {
                    Node::Folder => StoredObject {
                        name: rest.to_string(),
                        kind: None,
                        size_bytes: None,
                    },
                    Node::File(size) => StoredObject {
                        name: rest.to_string(),
                        kind: Some(EntryKind::File),
                        size_bytes: Some(*size),
                    },
                },
            };
            children.entry(object.name.clone()).or_insert(object);
            if children.len() >= limit {
                break;
            }
        }
        Ok(children.into_values().collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
