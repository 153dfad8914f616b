use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use super::cache::ListingCache;
use super::entry::{EntryKind, TreeEntry};
use super::error::FetchError;
use super::executor::{ListingExecutor, ListingJob, ListingReply};
use super::path::TreePath;
use super::source::TreeSource;
use crate::constants::DEFAULT_LISTING_TIMEOUT;

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub start_path: TreePath,
    /// How long a listing may stay outstanding before it is failed.
    pub timeout: Duration,
    /// Zero disables the listing cache.
    pub cache_ttl: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            start_path: TreePath::root(),
            timeout: DEFAULT_LISTING_TIMEOUT,
            cache_ttl: Duration::ZERO,
        }
    }
}

/// Everything the browser view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserState {
    pub current_path: TreePath,
    pub entries: Vec<TreeEntry>,
    pub loading: bool,
    /// User-facing message of the last failed listing.
    pub error: Option<String>,
    pub selection: Option<TreeEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserStatus {
    Loading,
    Ready,
    /// A successful listing with no entries. Not an error.
    Empty,
    Failed,
}

impl BrowserState {
    fn new(start: TreePath) -> Self {
        Self {
            current_path: start,
            entries: Vec::new(),
            loading: true,
            error: None,
            selection: None,
        }
    }

    pub fn status(&self) -> BrowserStatus {
        if self.loading {
            BrowserStatus::Loading
        } else if self.error.is_some() {
            BrowserStatus::Failed
        } else if self.entries.is_empty() {
            BrowserStatus::Empty
        } else {
            BrowserStatus::Ready
        }
    }
}

#[derive(Debug)]
struct Pending {
    ticket: u64,
    path: TreePath,
    started: Instant,
}

/// Walks a remote tree one folder at a time.
///
/// Every navigation issues a new listing request tagged with a ticket. Only
/// the reply for the newest ticket, and only while it still matches the
/// current path, is applied; anything older is discarded. Replies arrive
/// through [`RemoteTreeBrowser::poll`], so the caller's thread never blocks.
pub struct RemoteTreeBrowser {
    state: BrowserState,
    source: Arc<dyn TreeSource>,
    executor: Box<dyn ListingExecutor>,
    replies_tx: Sender<ListingReply>,
    replies_rx: Receiver<ListingReply>,
    next_ticket: u64,
    pending: Option<Pending>,
    timeout: Duration,
    cache: ListingCache,
}

impl std::fmt::Debug for RemoteTreeBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTreeBrowser")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RemoteTreeBrowser {
    /// Creates the browser and immediately requests the start folder.
    pub fn new(
        source: Arc<dyn TreeSource>,
        executor: Box<dyn ListingExecutor>,
        options: BrowserOptions,
    ) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        let mut browser = Self {
            state: BrowserState::new(options.start_path),
            source,
            executor,
            replies_tx,
            replies_rx,
            next_ticket: 0,
            pending: None,
            timeout: options.timeout,
            cache: ListingCache::new(options.cache_ttl),
        };
        browser.start_listing(Instant::now());
        browser
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn current_path(&self) -> &TreePath {
        &self.state.current_path
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Folders navigate; files become the selection without navigating.
    /// Returns whether a navigation started.
    pub fn open(&mut self, entry: &TreeEntry) -> bool {
        match entry.kind {
            EntryKind::Folder => {
                self.navigate(entry.path.clone());
                true
            }
            EntryKind::File => {
                tracing::debug!(path = %entry.path, "file selected");
                self.state.selection = Some(entry.clone());
                false
            }
        }
    }

    /// Goes up one level. A no-op at the root.
    pub fn back(&mut self) -> bool {
        match self.state.current_path.parent() {
            Some(parent) => {
                self.navigate(parent);
                true
            }
            None => false,
        }
    }

    /// Re-lists the current folder, bypassing the cache.
    pub fn refresh(&mut self) {
        self.cache.forget(&self.state.current_path);
        self.start_listing(Instant::now());
    }

    /// Reports a write (upload, delete) at `path` made through this session.
    /// Cached listings it affects are dropped, and the current folder is
    /// re-listed when the write landed anywhere beneath it: a deep write can
    /// create a new child folder here.
    pub fn notify_write(&mut self, path: &TreePath) {
        self.cache.invalidate_write(path);
        if path.starts_with(&self.state.current_path) {
            self.start_listing(Instant::now());
        }
    }

    pub fn clear_selection(&mut self) {
        self.state.selection = None;
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Applies finished replies and fails the outstanding request once it
    /// has been pending for the timeout. Returns whether state changed.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.replies_rx.try_recv() {
            changed |= self.apply(reply, now);
        }
        if let Some(pending) = &self.pending
            && now.saturating_duration_since(pending.started) >= self.timeout
        {
            tracing::warn!(path = %pending.path, ticket = pending.ticket, "listing timed out");
            self.pending = None;
            self.fail(FetchError::Timeout(self.timeout));
            changed = true;
        }
        changed
    }

    fn navigate(&mut self, path: TreePath) {
        tracing::debug!(from = %self.state.current_path, to = %path, "navigating");
        self.state.current_path = path;
        self.start_listing(Instant::now());
    }

    fn start_listing(&mut self, now: Instant) {
        let path = self.state.current_path.clone();
        if let Some(entries) = self.cache.get(&path, now) {
            tracing::debug!(%path, "listing served from cache");
            self.pending = None;
            self.state.entries = entries;
            self.state.loading = false;
            self.state.error = None;
            return;
        }
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(previous) = self.pending.take() {
            tracing::debug!(superseded = previous.ticket, by = ticket, "listing superseded");
        }
        self.state.entries.clear();
        self.state.loading = true;
        self.state.error = None;
        self.pending = Some(Pending {
            ticket,
            path: path.clone(),
            started: now,
        });
        let job = ListingJob::new(ticket, path, Arc::clone(&self.source), self.replies_tx.clone());
        self.executor.spawn(job);
    }

    fn apply(&mut self, reply: ListingReply, now: Instant) -> bool {
        let current = match &self.pending {
            Some(pending) => {
                pending.ticket == reply.ticket && reply.path == self.state.current_path
            }
            None => false,
        };
        if !current {
            tracing::debug!(ticket = reply.ticket, path = %reply.path, "discarding stale listing");
            return false;
        }
        self.pending = None;
        match reply.result {
            Ok(mut entries) => {
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                tracing::debug!(path = %reply.path, count = entries.len(), "listing ready");
                self.cache.put(reply.path, entries.clone(), now);
                self.state.entries = entries;
                self.state.loading = false;
                self.state.error = None;
            }
            Err(err) => {
                tracing::warn!(path = %reply.path, "listing failed: {err}");
                self.fail(err);
            }
        }
        true
    }

    fn fail(&mut self, err: FetchError) {
        self.state.entries.clear();
        self.state.loading = false;
        self.state.error = Some(err.user_message());
    }
}
