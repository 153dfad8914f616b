use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use studio_desk::browser::{
    BrowserOptions, BrowserStatus, FetchError, ListingExecutor, ListingJob, MemoryObjectStore,
    ObjectStoreSource, RemoteTreeBrowser, TreeEntry, TreePath, TreeSource,
};

/// Holds jobs until the test decides to run them, in any order.
#[derive(Clone, Default)]
struct Manual {
    jobs: Rc<RefCell<Vec<ListingJob>>>,
}

impl Manual {
    fn take(&self, path: &str) -> ListingJob {
        let mut jobs = self.jobs.borrow_mut();
        let index = jobs
            .iter()
            .position(|job| job.path().as_str() == path)
            .unwrap_or_else(|| panic!("no pending job for {path:?}"));
        jobs.remove(index)
    }

    fn pending(&self) -> usize {
        self.jobs.borrow().len()
    }
}

impl ListingExecutor for Manual {
    fn spawn(&self, job: ListingJob) {
        self.jobs.borrow_mut().push(job);
    }
}

fn library() -> Arc<dyn TreeSource> {
    let store = MemoryObjectStore::new("https://cdn.example/audio");
    store.insert_file("A/alpha.wav", 1_536);
    store.insert_file("B/beta.wav", 2_048);
    store.insert_file("B/bravo.wav", 4_096);
    store.insert_folder("empty");
    Arc::new(ObjectStoreSource::new(store))
}

fn browser(options: BrowserOptions) -> (RemoteTreeBrowser, Manual) {
    let manual = Manual::default();
    let browser = RemoteTreeBrowser::new(library(), Box::new(manual.clone()), options);
    (browser, manual)
}

fn names(browser: &RemoteTreeBrowser) -> Vec<String> {
    browser.state().entries.iter().map(|e| e.name.clone()).collect()
}

#[test]
fn navigation_round_trip() {
    let (mut browser, manual) = browser(BrowserOptions::default());
    assert_eq!(browser.state().status(), BrowserStatus::Loading);
    manual.take("").run();
    assert!(browser.poll());
    assert_eq!(names(&browser), ["A", "B", "empty"]);

    let b = browser.state().entries[1].clone();
    assert!(browser.open(&b));
    assert_eq!(browser.current_path().as_str(), "B");
    assert!(browser.state().entries.is_empty());
    manual.take("B").run();
    browser.poll();
    assert_eq!(names(&browser), ["beta.wav", "bravo.wav"]);
    let beta = &browser.state().entries[0];
    assert_eq!(beta.size_label().as_deref(), Some("2.0 KB"));
    assert_eq!(beta.url.as_deref(), Some("https://cdn.example/audio/B/beta.wav"));

    assert!(browser.back());
    manual.take("").run();
    browser.poll();
    assert_eq!(browser.current_path(), &TreePath::root());
    assert_eq!(names(&browser), ["A", "B", "empty"]);
    assert!(!browser.back());
    assert_eq!(manual.pending(), 0);
}

#[test]
fn newer_reply_arriving_first_wins() {
    let (mut browser, manual) = browser(BrowserOptions::default());
    manual.take("").run();
    browser.poll();

    browser.open(&TreeEntry::folder(&TreePath::root(), "A"));
    browser.open(&TreeEntry::folder(&TreePath::root(), "B"));

    // The newer request resolves first; the older one arrives afterwards.
    manual.take("B").run();
    browser.poll();
    manual.take("A").run();
    assert!(!browser.poll());

    assert_eq!(browser.current_path().as_str(), "B");
    assert_eq!(names(&browser), ["beta.wav", "bravo.wav"]);
    assert_eq!(browser.state().status(), BrowserStatus::Ready);
}

#[test]
fn older_reply_arriving_first_is_discarded() {
    let (mut browser, manual) = browser(BrowserOptions::default());
    manual.take("").run();
    browser.poll();

    browser.open(&TreeEntry::folder(&TreePath::root(), "A"));
    browser.open(&TreeEntry::folder(&TreePath::root(), "B"));

    manual.take("A").run();
    assert!(!browser.poll());
    assert_eq!(browser.state().status(), BrowserStatus::Loading);
    assert!(browser.state().entries.is_empty());

    manual.take("B").run();
    assert!(browser.poll());
    assert_eq!(browser.current_path().as_str(), "B");
    assert_eq!(names(&browser), ["beta.wav", "bravo.wav"]);
}

#[test]
fn empty_folder_and_failure_are_distinct_states() {
    let (mut browser, manual) = browser(BrowserOptions::default());
    manual.take("").run();
    browser.poll();

    browser.open(&TreeEntry::folder(&TreePath::root(), "empty"));
    manual.take("empty").run();
    browser.poll();
    assert_eq!(browser.state().status(), BrowserStatus::Empty);
    assert_eq!(browser.state().error, None);

    browser.refresh();
    manual
        .take("empty")
        .fail(FetchError::Status {
            code: 503,
            message: String::new(),
        });
    browser.poll();
    assert_eq!(browser.state().status(), BrowserStatus::Failed);
    assert_eq!(
        browser.state().error.as_deref(),
        Some("Failed to load library (HTTP 503).")
    );
    assert!(browser.state().entries.is_empty());
}

#[test]
fn timeout_fails_the_request_and_late_reply_is_ignored() {
    let timeout = Duration::from_secs(3);
    let (mut browser, manual) = browser(BrowserOptions {
        timeout,
        ..BrowserOptions::default()
    });
    let started = Instant::now();
    assert!(!browser.poll_at(started));
    assert!(browser.poll_at(started + timeout + Duration::from_millis(1)));
    assert_eq!(browser.state().status(), BrowserStatus::Failed);
    assert_eq!(
        browser.state().error.as_deref(),
        Some("The library did not respond in time.")
    );

    manual.take("").run();
    assert!(!browser.poll());
    assert_eq!(browser.state().status(), BrowserStatus::Failed);
}

#[test]
fn selecting_a_file_keeps_the_folder() {
    let (mut browser, manual) = browser(BrowserOptions {
        start_path: TreePath::parse("A"),
        ..BrowserOptions::default()
    });
    manual.take("A").run();
    browser.poll();
    let alpha = browser.state().entries[0].clone();
    assert!(!browser.open(&alpha));
    assert_eq!(browser.state().selection.as_ref(), Some(&alpha));
    assert_eq!(manual.pending(), 0);
    assert_eq!(browser.current_path().as_str(), "A");
}

#[test]
fn cached_folder_is_served_until_a_write_lands_in_it() {
    let (mut browser, manual) = browser(BrowserOptions {
        cache_ttl: Duration::from_secs(60),
        ..BrowserOptions::default()
    });
    manual.take("").run();
    browser.poll();
    browser.open(&TreeEntry::folder(&TreePath::root(), "B"));
    manual.take("B").run();
    browser.poll();

    browser.back();
    assert_eq!(manual.pending(), 0);
    assert_eq!(names(&browser), ["A", "B", "empty"]);

    // Any write re-lists the root, since it lies beneath it.
    browser.notify_write(&TreePath::parse("B/new-take.wav"));
    assert_eq!(manual.pending(), 1);
    manual.take("").run();
    browser.poll();
    assert_eq!(names(&browser), ["A", "B", "empty"]);

    browser.open(&TreeEntry::folder(&TreePath::root(), "B"));
    assert_eq!(manual.pending(), 1);
    assert!(browser.is_loading());
}
