//! Remote tree browser: folder-by-folder navigation over a listing source.

pub mod cache;
pub mod entry;
pub mod error;
pub mod executor;
pub mod http;
pub mod path;
pub mod source;
pub mod state;

pub use cache::ListingCache;
pub use entry::{EntryKind, StoredObject, TreeEntry};
pub use error::FetchError;
pub use executor::{InlineExecutor, ListingExecutor, ListingJob, ListingReply, ThreadExecutor};
pub use http::HttpListingSource;
pub use path::TreePath;
pub use source::{MemoryObjectStore, ObjectStore, ObjectStoreSource, TreeSource};
pub use state::{BrowserOptions, BrowserState, BrowserStatus, RemoteTreeBrowser};
