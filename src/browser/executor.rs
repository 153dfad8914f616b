use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use super::entry::TreeEntry;
use super::error::FetchError;
use super::path::TreePath;
use super::source::TreeSource;

/// Result of one listing request, tagged with the request it answers.
#[derive(Debug)]
pub struct ListingReply {
    pub ticket: u64,
    pub path: TreePath,
    pub result: Result<Vec<TreeEntry>, FetchError>,
}

/// A listing request ready to run somewhere. Running it sends exactly one
/// [`ListingReply`]; a dropped receiver is ignored.
pub struct ListingJob {
    ticket: u64,
    path: TreePath,
    source: Arc<dyn TreeSource>,
    reply: Sender<ListingReply>,
}

impl std::fmt::Debug for ListingJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingJob")
            .field("ticket", &self.ticket)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ListingJob {
    pub fn new(
        ticket: u64,
        path: TreePath,
        source: Arc<dyn TreeSource>,
        reply: Sender<ListingReply>,
    ) -> Self {
        Self {
            ticket,
            path,
            source,
            reply,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    pub fn run(self) {
        let result = self.source.list(&self.path);
        self.finish(result);
    }

    /// Answers without calling the source.
    pub fn fail(self, err: FetchError) {
        self.finish(Err(err));
    }

    fn finish(self, result: Result<Vec<TreeEntry>, FetchError>) {
        let _ = self.reply.send(ListingReply {
            ticket: self.ticket,
            path: self.path,
            result,
        });
    }
}

/// Decides where listing jobs run.
pub trait ListingExecutor {
    fn spawn(&self, job: ListingJob);
}

/// One short-lived background thread per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadExecutor;

impl ListingExecutor for ThreadExecutor {
    fn spawn(&self, job: ListingJob) {
        let ticket = job.ticket();
        // A failed spawn drops the job; answer through a cloned sender.
        let reply = job.reply.clone();
        let path = job.path.clone();
        let spawned = thread::Builder::new()
            .name(format!("listing-{ticket}"))
            .spawn(move || job.run());
        if let Err(err) = spawned {
            tracing::warn!(%path, "failed to spawn listing thread: {err}");
            let _ = reply.send(ListingReply {
                ticket,
                path,
                result: Err(FetchError::Network(err.to_string())),
            });
        }
    }
}

/// Runs the job on the calling thread. The reply is still delivered through
/// the channel and picked up by the next poll.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl ListingExecutor for InlineExecutor {
    fn spawn(&self, job: ListingJob) {
        job.run();
    }
}
