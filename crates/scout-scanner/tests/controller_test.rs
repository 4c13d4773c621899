use async_trait::async_trait;
use scout_core::{EmailConfidence, Lead, ResultsAmount, ScoutConfig, SearchCriteria};
use scout_llm::{LeadRequest, ProviderFailure, RawLead, SearchGateway, SearchProvider};
use scout_scanner::{ControllerError, CycleOutcome, Notification, ScoutController};
use scout_store::{KeyValueStore, LeadRepository, MemoryStore, StoreError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

type Response = Result<Vec<RawLead>, ProviderFailure>;

/// Replays scripted responses; answers with an empty batch once exhausted.
struct StubProvider {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<LeadRequest>>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(responses: Vec<Response>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<LeadRequest> {
        self.requests.lock().expect("lock requests").last().cloned()
    }
}

#[async_trait]
impl SearchProvider for StubProvider {
    async fn search(&self, request: &LeadRequest) -> Result<Vec<RawLead>, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("lock requests")
            .push(request.clone());
        self.responses
            .lock()
            .expect("lock responses")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn provider_id(&self) -> &str {
        "stub"
    }

    fn source_label(&self) -> &str {
        "Gemini Search"
    }
}

/// Stalls on its first call, then answers immediately.
struct StallingProvider {
    stall: Duration,
    calls: AtomicUsize,
}

impl StallingProvider {
    fn new(stall: Duration) -> Arc<Self> {
        Arc::new(Self {
            stall,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SearchProvider for StallingProvider {
    async fn search(&self, _request: &LeadRequest) -> Result<Vec<RawLead>, ProviderFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            tokio::time::sleep(self.stall).await;
        }
        Ok(batch(call * 10..call * 10 + 2))
    }

    fn provider_id(&self) -> &str {
        "stalling"
    }

    fn source_label(&self) -> &str {
        "Gemini Search"
    }
}

/// Store whose writes always fail.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> scout_store::Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> scout_store::Result<()> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn remove(&self, _key: &str) -> scout_store::Result<()> {
        Ok(())
    }
}

fn raw_lead(i: usize) -> RawLead {
    RawLead {
        first_name: Some(format!("First{i}")),
        last_name: Some(format!("Last{i}")),
        email: Some(format!("lead{i}@acme.example")),
        job_title: Some("CTO".to_string()),
        company_name: Some("Acme".to_string()),
        location: Some("Austin".to_string()),
        email_confidence: Some("Verified".to_string()),
        ..RawLead::default()
    }
}

fn batch(range: std::ops::Range<usize>) -> Vec<RawLead> {
    range.map(raw_lead).collect()
}

fn cto_criteria(amount: ResultsAmount) -> SearchCriteria {
    SearchCriteria {
        target_roles: "CTO".to_string(),
        keywords: "SaaS".to_string(),
        industries: "Software".to_string(),
        location: "Austin".to_string(),
        include_contact_info: true,
        results_amount: amount,
    }
}

struct Harness {
    controller: ScoutController,
    provider: Arc<StubProvider>,
    repository: LeadRepository,
}

fn harness(responses: Vec<Response>) -> Harness {
    harness_with_store(responses, Arc::new(MemoryStore::new()))
}

fn harness_with_store(responses: Vec<Response>, store: Arc<dyn KeyValueStore>) -> Harness {
    let provider = StubProvider::new(responses);
    let repository = LeadRepository::with_default_key(store);
    let controller = ScoutController::new(
        SearchGateway::new(provider.clone()),
        repository.clone(),
        &ScoutConfig::default(),
    );
    Harness {
        controller,
        provider,
        repository,
    }
}

fn assert_total_matches_store(h: &Harness) {
    assert_eq!(h.controller.status().total_found, h.repository.load().len());
}

#[tokio::test]
async fn test_submit_adds_batch() {
    let mut h = harness(vec![Ok(batch(0..20))]);

    let outcome = h
        .controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    assert_eq!(outcome, CycleOutcome::Added { count: 20 });
    let status = h.controller.status();
    assert_eq!(status.total_found, 20);
    assert!(status.last_search_time.is_some());
    assert!(!status.is_searching);
    assert_eq!(
        status
            .logs
            .iter()
            .filter(|e| e.message.contains("20"))
            .count(),
        1
    );
    assert_total_matches_store(&h);
}

#[tokio::test]
async fn test_quota_exhaustion_halts_session() {
    let mut h = harness(vec![Err(ProviderFailure::new("429 RESOURCE_EXHAUSTED"))]);

    let outcome = h
        .controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    assert_eq!(outcome, CycleOutcome::Halted);

    let status = h.controller.status();
    assert!(status.is_quota_halted);
    assert!(!status.is_looping);
    assert!(status.last_search_time.is_none());
    assert_eq!(
        status
            .logs
            .iter()
            .filter(|e| e.message.contains("CRITICAL"))
            .count(),
        1
    );
    assert_eq!(
        h.controller.take_notifications(),
        vec![Notification::QuotaExhausted]
    );

    // Halted is terminal for the session.
    assert_eq!(h.controller.toggle_loop(), Err(ControllerError::QuotaHalted));
    assert!(!h.controller.is_looping());
    assert_eq!(
        h.controller.find_more().await,
        Err(ControllerError::QuotaHalted)
    );
    assert_eq!(h.provider.calls(), 1);
    assert!(matches!(
        h.controller.take_notifications().as_slice(),
        [Notification::LoopRefused { .. }]
    ));
}

#[tokio::test]
async fn test_quota_while_looping_disables_loop() {
    let mut h = harness(vec![
        Ok(batch(0..5)),
        Err(ProviderFailure::new("quota exceeded").with_status(429)),
    ]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    assert_eq!(h.controller.toggle_loop(), Ok(true));

    assert_eq!(h.controller.tick().await, CycleOutcome::Halted);
    assert!(!h.controller.is_looping());
    assert_eq!(h.controller.tick().await, CycleOutcome::Skipped);
    assert_eq!(h.provider.calls(), 2);
    assert_total_matches_store(&h);
}

#[tokio::test]
async fn test_provider_error_keeps_loop_running() {
    let mut h = harness(vec![
        Ok(batch(0..3)),
        Err(ProviderFailure::new("upstream timed out").with_status(503)),
        Ok(batch(3..6)),
    ]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    h.controller.toggle_loop().expect("enable loop");

    let failed = h.controller.tick().await;
    assert!(matches!(failed, CycleOutcome::Failed { .. }));
    assert!(h.controller.is_looping());
    assert!(!h.controller.is_quota_halted());
    assert!(h
        .controller
        .status()
        .logs
        .iter()
        .any(|e| e.message.starts_with("Search failed")));

    assert_eq!(h.controller.tick().await, CycleOutcome::Added { count: 3 });
    assert_eq!(h.controller.status().total_found, 6);
    assert_total_matches_store(&h);
}

#[tokio::test]
async fn test_repeated_email_across_cycles_dropped() {
    let mut repeat = raw_lead(99);
    repeat.email = Some("LEAD0@acme.example".to_string());
    let mut h = harness(vec![Ok(batch(0..2)), Ok(vec![repeat, raw_lead(2)])]);

    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    let outcome = h.controller.find_more().await.expect("find more");

    assert_eq!(outcome, CycleOutcome::Added { count: 1 });
    let emails: Vec<_> = h.controller.leads().iter().map(|l| l.email.clone()).collect();
    assert_eq!(
        emails,
        ["lead2@acme.example", "lead0@acme.example", "lead1@acme.example"]
    );
    assert_total_matches_store(&h);
}

#[tokio::test]
async fn test_known_identities_sent_as_exclusions() {
    let mut h = harness(vec![Ok(batch(0..60))]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Hundred))
        .await
        .expect("submit");
    h.controller.find_more().await.expect("find more");

    let request = h.provider.last_request().expect("request recorded");
    assert_eq!(request.exclusions.len(), 50);
    assert_eq!(
        request.exclusions.first().map(String::as_str),
        Some("lead0@acme.example")
    );
    assert!(request.batch_size >= 20);
}

#[tokio::test]
async fn test_goal_reached_skips_gateway() {
    let mut h = harness(vec![Ok(batch(0..50))]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    h.controller.toggle_loop().expect("enable loop");

    assert_eq!(h.controller.tick().await, CycleOutcome::GoalReached);
    assert_eq!(h.provider.calls(), 1);
    assert!(!h.controller.is_looping());
    let newest = h.controller.status().logs.into_iter().next().expect("log entry");
    assert!(newest.message.to_lowercase().contains("goal reached"));
}

#[tokio::test]
async fn test_invalid_keywords_never_reach_gateway() {
    let mut h = harness(vec![Ok(batch(0..5))]);
    let mut criteria = cto_criteria(ResultsAmount::Fifty);
    criteria.keywords = "founder bad@@@x".to_string();

    let err = h.controller.submit(criteria).await.expect_err("rejected");
    match err {
        ControllerError::Validation(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "keywords");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(h.provider.calls(), 0);
    assert!(h.controller.criteria().is_none());
}

#[tokio::test]
async fn test_loop_and_find_more_need_criteria() {
    let mut h = harness(Vec::new());

    assert_eq!(h.controller.toggle_loop(), Err(ControllerError::NoCriteria));
    assert_eq!(
        h.controller.find_more().await,
        Err(ControllerError::NoCriteria)
    );
    assert_eq!(h.controller.tick().await, CycleOutcome::Skipped);
    assert!(matches!(
        h.controller.take_notifications().as_slice(),
        [Notification::LoopRefused { .. }]
    ));
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn test_toggle_twice_disables() {
    let mut h = harness(vec![Ok(batch(0..1))]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    assert_eq!(h.controller.toggle_loop(), Ok(true));
    assert_eq!(h.controller.toggle_loop(), Ok(false));
    assert_eq!(h.controller.tick().await, CycleOutcome::Skipped);
}

#[tokio::test]
async fn test_clear_all_empties_store() {
    let mut h = harness(vec![Ok(batch(0..4))]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    h.controller.clear_all();
    assert!(h.controller.leads().is_empty());
    assert!(h.repository.raw().expect("read store").is_none());
    assert_total_matches_store(&h);
}

#[tokio::test]
async fn test_restores_persisted_leads() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut first = harness_with_store(vec![Ok(batch(0..3))], store.clone());
    first
        .controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    let second = harness_with_store(Vec::new(), store);
    assert_eq!(second.controller.leads(), first.controller.leads());
}

#[tokio::test]
async fn test_write_failure_keeps_memory_state() {
    let mut h = harness_with_store(vec![Ok(batch(0..3))], Arc::new(ReadOnlyStore));

    let outcome = h
        .controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    assert_eq!(outcome, CycleOutcome::Added { count: 3 });
    assert_eq!(h.controller.status().total_found, 3);
}

#[tokio::test]
async fn test_exports_follow_collection_order() {
    let mut anonymous = raw_lead(7);
    anonymous.email = None;
    let mut h = harness(vec![Ok(vec![raw_lead(0)]), Ok(vec![anonymous, raw_lead(1)])]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    h.controller.find_more().await.expect("find more");

    assert_eq!(
        h.controller.copy_emails(),
        "lead1@acme.example\nlead0@acme.example"
    );

    let csv = h.controller.export_csv().expect("export");
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("\"First7\""));
    assert!(lines[3].contains("\"lead0@acme.example\""));
}

#[tokio::test]
async fn test_invalid_provider_email_downgraded() {
    let mut bad = raw_lead(0);
    bad.email = Some("bad@@@x".to_string());
    let mut h = harness(vec![Ok(vec![bad])]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    let lead: &Lead = &h.controller.leads()[0];
    assert_eq!(lead.email, "NULL");
    assert_eq!(lead.email_confidence, EmailConfidence::Low);
    assert_eq!(lead.source.as_deref(), Some("Gemini Search"));
}

#[tokio::test(start_paused = true)]
async fn test_loop_timer_drives_ticks() {
    let mut h = harness(vec![Ok(batch(0..2)), Ok(batch(2..4))]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");

    // Loop off: the timer never fires.
    assert!(timeout(Duration::from_secs(120), h.controller.wait_for_tick())
        .await
        .is_err());

    h.controller.toggle_loop().expect("enable loop");
    timeout(Duration::from_secs(61), h.controller.wait_for_tick())
        .await
        .expect("tick within one interval");
    assert_eq!(h.controller.tick().await, CycleOutcome::Added { count: 2 });
    assert_eq!(h.provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_resubmit_restarts_loop_timer() {
    let mut h = harness(vec![Ok(batch(0..2)), Ok(batch(2..4))]);
    h.controller
        .submit(cto_criteria(ResultsAmount::Fifty))
        .await
        .expect("submit");
    h.controller.toggle_loop().expect("enable loop");

    tokio::time::advance(Duration::from_secs(45)).await;
    h.controller
        .submit(cto_criteria(ResultsAmount::Hundred))
        .await
        .expect("resubmit");

    assert!(timeout(Duration::from_secs(30), h.controller.wait_for_tick())
        .await
        .is_err());
    timeout(Duration::from_secs(31), h.controller.wait_for_tick())
        .await
        .expect("tick a full interval after resubmit");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_cycle_does_not_wedge_controller() {
    let provider = StallingProvider::new(Duration::from_secs(300));
    let mut controller = ScoutController::new(
        SearchGateway::new(provider.clone()),
        LeadRepository::with_default_key(Arc::new(MemoryStore::new())),
        &ScoutConfig::default(),
    );

    let cancelled = timeout(
        Duration::from_secs(10),
        controller.submit(cto_criteria(ResultsAmount::Fifty)),
    )
    .await;
    assert!(cancelled.is_err());
    assert!(!controller.status().is_searching);
    assert!(controller.leads().is_empty());

    assert_eq!(
        controller.find_more().await,
        Ok(CycleOutcome::Added { count: 2 })
    );
    controller.toggle_loop().expect("enable loop");
    assert_eq!(controller.tick().await, CycleOutcome::Added { count: 2 });
    assert!(!controller.status().is_searching);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_activity_visible_while_cycle_in_flight() {
    let provider = StallingProvider::new(Duration::from_secs(5));
    let mut controller = ScoutController::new(
        SearchGateway::new(provider),
        LeadRepository::with_default_key(Arc::new(MemoryStore::new())),
        &ScoutConfig::default(),
    );
    let activity = controller.activity();
    assert!(!activity.is_searching());

    let (outcome, seen) = tokio::join!(
        controller.submit(cto_criteria(ResultsAmount::Fifty)),
        async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            activity.is_searching()
        }
    );

    assert!(seen);
    assert_eq!(outcome, Ok(CycleOutcome::Added { count: 2 }));
    assert!(!controller.activity().is_searching());
}
