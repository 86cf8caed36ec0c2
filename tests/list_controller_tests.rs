use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use jobfinder::controller::{FetchMode, Intent, ListController, Outcome, Phase};
use jobfinder::error::{ClientError, Result, GENERIC_FAILURE};
use jobfinder::models::Job;
use jobfinder::query::{Bracket, Field, JobType, QueryState, SortOrder};
use jobfinder::sources::{FetchResult, ListSource};
use pretty_assertions::assert_eq;
use tokio::sync::{mpsc, Notify};

/// Pages of ten labelled items; can be switched to fail like a dead server
struct PagedSource {
    pages: u32,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl PagedSource {
    fn new(pages: u32) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ListSource for PagedSource {
    type Item = String;

    async fn fetch_page(&self, query: &QueryState) -> Result<FetchResult<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Http {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        let items = (0..10).map(|i| format!("p{}-{}", query.page(), i)).collect();
        Ok(FetchResult::new(items, u64::from(self.pages) * 10, self.pages))
    }

    fn source_name(&self) -> &'static str {
        "paged"
    }
}

/// Returns one fixed page of jobs
struct FixedJobs(Vec<Job>);

#[async_trait]
impl ListSource for FixedJobs {
    type Item = Job;

    async fn fetch_page(&self, _query: &QueryState) -> Result<FetchResult<Job>> {
        Ok(FetchResult::new(self.0.clone(), self.0.len() as u64, 1))
    }

    fn source_name(&self) -> &'static str {
        "fixed jobs"
    }
}

/// Holds each request until the test releases the gate named by its search text
struct GatedSource {
    gates: HashMap<String, Arc<Notify>>,
    started: mpsc::UnboundedSender<String>,
}

impl GatedSource {
    fn new(names: &[&str]) -> (Self, HashMap<String, Arc<Notify>>, mpsc::UnboundedReceiver<String>) {
        let gates: HashMap<String, Arc<Notify>> = names
            .iter()
            .map(|n| (n.to_string(), Arc::new(Notify::new())))
            .collect();
        let (started, rx) = mpsc::unbounded_channel();
        (
            Self {
                gates: gates.clone(),
                started,
            },
            gates,
            rx,
        )
    }
}

#[async_trait]
impl ListSource for GatedSource {
    type Item = String;

    async fn fetch_page(&self, query: &QueryState) -> Result<FetchResult<String>> {
        let name = query.search().to_string();
        let gate = self.gates.get(&name).cloned().expect("unknown gate");
        let _ = self.started.send(name.clone());
        gate.notified().await;
        Ok(FetchResult::new(vec![name], 20, 2))
    }

    fn source_name(&self) -> &'static str {
        "gated"
    }
}

fn job(id: &str) -> Job {
    Job {
        id: id.to_string(),
        job_title: Some(format!("Job {}", id)),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_append_keeps_order_of_existing_items() {
    let list = ListController::new(PagedSource::new(3));
    list.fetch(FetchMode::Replace).await.unwrap();
    let first_page = list.items();
    assert_eq!(first_page.len(), 10);

    assert_eq!(list.fetch(FetchMode::Append).await.unwrap(), Outcome::Applied);
    let items = list.items();
    assert_eq!(items.len(), 20);
    assert_eq!(&items[..10], &first_page[..]);
    assert_eq!(items[10], "p2-0");
    assert_eq!(items[19], "p2-9");
    assert_eq!(list.query().page(), 2);
}

#[tokio::test]
async fn test_single_page_scenario() {
    let list = ListController::new(FixedJobs(vec![job("j1"), job("j2")]));
    assert_eq!(list.query().sort(), SortOrder::Newest);
    list.fetch(FetchMode::Replace).await.unwrap();

    let ids: Vec<String> = list.items().into_iter().map(|j| j.id).collect();
    assert_eq!(ids, vec!["j1".to_string(), "j2".to_string()]);
    assert_eq!(list.total_count(), 2);
    assert!(!list.can_load_more());
}

#[tokio::test]
async fn test_can_load_more_tracks_page_count() {
    let list = ListController::new(PagedSource::new(2));
    assert!(!list.can_load_more());

    list.fetch(FetchMode::Replace).await.unwrap();
    assert!(list.can_load_more());

    list.load_more().await.unwrap();
    assert_eq!(list.page_count(), list.query().page());
    assert!(!list.can_load_more());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_result() {
    let list = ListController::new(PagedSource::new(3));
    list.fetch(FetchMode::Replace).await.unwrap();
    let before = list.result();

    list.source().failing.store(true, Ordering::SeqCst);
    let err = list.fetch(FetchMode::Replace).await.unwrap_err();
    assert!(err.is_network_or_server());
    assert_eq!(list.result(), before);
    assert_eq!(list.phase(), Phase::Idle);
    assert_eq!(list.last_error().as_deref(), Some(GENERIC_FAILURE));
}

#[tokio::test]
async fn test_failure_after_success_leaves_items_and_page() {
    let list = ListController::new(FlakySource::default());
    list.fetch(FetchMode::Replace).await.unwrap();
    let before = list.result();

    list.source().fail_next.store(true, Ordering::SeqCst);
    assert!(list.load_more().await.is_err());

    assert_eq!(list.result(), before);
    assert_eq!(list.query().page(), 1);
    assert!(!list.is_busy());
    assert!(list.can_load_more());
    assert_eq!(list.last_error().as_deref(), Some(GENERIC_FAILURE));
}

/// Succeeds except when told to fail the next call
#[derive(Default)]
struct FlakySource {
    fail_next: AtomicBool,
}

#[async_trait]
impl ListSource for FlakySource {
    type Item = u32;

    async fn fetch_page(&self, query: &QueryState) -> Result<FetchResult<u32>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ClientError::Http {
                status: reqwest::StatusCode::GATEWAY_TIMEOUT,
            });
        }
        Ok(FetchResult::new(vec![query.page()], 3, 3))
    }

    fn source_name(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn test_filter_change_replaces_from_page_one() {
    let list = ListController::new(PagedSource::new(5));
    list.fetch(FetchMode::Replace).await.unwrap();
    list.load_more().await.unwrap();
    list.load_more().await.unwrap();
    assert_eq!(list.query().page(), 3);
    assert_eq!(list.items().len(), 30);

    let intent = list.edit(|q| q.toggle_job_type(JobType::Contract));
    assert_eq!(intent, Intent::Refetch);
    assert_eq!(list.query().page(), 1);
    list.run(intent).await.unwrap();
    assert_eq!(list.items().len(), 10);
    assert_eq!(list.items()[0], "p1-0");

    let intent = list.edit(|q| q.toggle_experience_bracket(Bracket::new(0, 1)));
    assert_eq!(intent, Intent::Refetch);
    assert_eq!(list.query_string(), "jtype=Contract&exp=0-1");
}

#[tokio::test]
async fn test_text_edits_wait_for_search() {
    let list = ListController::new(PagedSource::new(1));
    let intent = list.edit(|q| q.set_field(Field::Location("Berlin".into())));
    assert_eq!(intent, Intent::Deferred);
    list.run(intent).await.unwrap();
    assert_eq!(list.source().calls.load(Ordering::SeqCst), 0);

    list.search().await.unwrap();
    assert_eq!(list.source().calls.load(Ordering::SeqCst), 1);
    assert_eq!(list.query_string(), "location=Berlin");
}

#[tokio::test]
async fn test_each_live_edit_fetches_once() {
    let list = ListController::new(PagedSource::new(1));
    for sort in [SortOrder::Oldest, SortOrder::AToZ] {
        let intent = list.edit(|q| q.set_field(Field::Sort(sort)));
        list.run(intent).await.unwrap();
    }
    let intent = list.edit(|q| q.clone());
    assert_eq!(intent, Intent::None);
    list.run(intent).await.unwrap();
    assert_eq!(list.source().calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stale_response_is_dropped() {
    let (source, gates, mut started) = GatedSource::new(&["a", "b"]);
    let list = Arc::new(ListController::new(source));

    list.edit(|q| q.set_field(Field::Search("a".into())));
    let first = {
        let list = list.clone();
        tokio::spawn(async move { list.search().await })
    };
    assert_eq!(started.recv().await.as_deref(), Some("a"));
    assert!(list.is_busy());
    assert!(!list.can_load_more());

    list.edit(|q| q.set_field(Field::Search("b".into())));
    let second = {
        let list = list.clone();
        tokio::spawn(async move { list.search().await })
    };
    assert_eq!(started.recv().await.as_deref(), Some("b"));

    gates["b"].notify_one();
    assert_eq!(second.await.unwrap().unwrap(), Outcome::Applied);
    assert_eq!(list.items(), vec!["b".to_string()]);
    assert!(list.is_busy());

    gates["a"].notify_one();
    assert_eq!(first.await.unwrap().unwrap(), Outcome::Stale);
    assert_eq!(list.items(), vec!["b".to_string()]);
    assert!(!list.is_busy());
    assert!(list.can_load_more());
}

#[tokio::test]
async fn test_filter_change_discards_pending_append() {
    let (source, gates, mut started) = GatedSource::new(&["a"]);
    let list = Arc::new(ListController::new(source));

    list.edit(|q| q.set_field(Field::Search("a".into())));
    let first = {
        let list = list.clone();
        tokio::spawn(async move { list.search().await })
    };
    assert_eq!(started.recv().await.as_deref(), Some("a"));
    gates["a"].notify_one();
    assert_eq!(first.await.unwrap().unwrap(), Outcome::Applied);
    assert!(list.can_load_more());

    let append = {
        let list = list.clone();
        tokio::spawn(async move { list.load_more().await })
    };
    assert_eq!(started.recv().await.as_deref(), Some("a"));

    let intent = list.edit(|q| q.toggle_job_type(JobType::Contract));
    assert_eq!(intent, Intent::Refetch);

    gates["a"].notify_one();
    assert_eq!(append.await.unwrap().unwrap(), Outcome::Stale);
    assert_eq!(list.items(), vec!["a".to_string()]);
    assert_eq!(list.query().page(), 1);
    assert_eq!(list.query_string(), "search=a&jtype=Contract");
    assert!(!list.is_busy());
}
