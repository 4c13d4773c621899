//! Scout controller: owns the session and runs search cycles.
//!
//! The controller is the single place user intents and timer ticks land. It
//! validates criteria, calls the gateway, post-processes the batch, updates
//! the collection, persists it and records what happened. All state lives in
//! an explicit [`ScoutSession`] so nothing is shared or global.
//!
//! Intents take `&mut self`, so at most one cycle is ever in flight on a
//! given controller. Other tasks observe an in-flight cycle through a
//! cloned [`SearchActivity`] handle.

use crate::error::{ControllerError, Result};
use crate::postprocess::process_batch;
use crate::schedule::LoopTimer;
use crate::status::{LogRing, ScoutStatus};
use scout_core::{
    emails_for_clipboard, leads_to_csv, Lead, LeadIdentity, ScoutConfig, ScoutError,
    SearchCriteria, Timestamp,
};
use scout_llm::{build_lead_request, GatewayError, RequestLimits, SearchGateway};
use scout_store::LeadRepository;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Log line recorded when the provider reports quota exhaustion.
pub const QUOTA_HALT_MESSAGE: &str = "CRITICAL: API quota exhausted. Auto-loop halted.";

/// Result of one search cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The provider answered; `count` new leads were added
    Added {
        /// Number of leads added
        count: usize,
    },
    /// The provider failed for a reason other than quota
    Failed {
        /// Failure description
        message: String,
    },
    /// Quota exhausted; the session is halted
    Halted,
    /// The loop goal was already met; no call was made
    GoalReached,
    /// Nothing to do (loop off, halted or no criteria)
    Skipped,
}

/// Something the user must be told about directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Quota ran out; searching stops for this session
    QuotaExhausted,
    /// Enabling the loop was refused
    LoopRefused {
        /// Why it was refused
        reason: String,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExhausted => write!(
                f,
                "API quota exhausted. Searching is halted until the quota resets; \
                 restart once more quota is available."
            ),
            Self::LoopRefused { reason } => write!(f, "Auto-loop not enabled: {reason}"),
        }
    }
}

/// Shared view of whether a provider call is in flight.
///
/// Clones observe the same flag, so a handle taken before a cycle starts
/// can be read while the controller itself is mutably borrowed.
#[derive(Debug, Clone, Default)]
pub struct SearchActivity(Arc<AtomicBool>);

impl SearchActivity {
    /// Whether a provider call is in flight.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn begin(&self) -> SearchingGuard<'_> {
        self.0.store(true, Ordering::SeqCst);
        SearchingGuard(&self.0)
    }
}

/// Clears the in-flight flag when dropped, including when the cycle future
/// is cancelled mid-call.
struct SearchingGuard<'a>(&'a AtomicBool);

impl Drop for SearchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Mutable state for one controller session.
#[derive(Debug, Default)]
pub struct ScoutSession {
    leads: Vec<Lead>,
    current_criteria: Option<SearchCriteria>,
    activity: SearchActivity,
    is_looping: bool,
    quota_halted: bool,
    quota_notified: bool,
    last_search_time: Option<Timestamp>,
    logs: LogRing,
    notifications: VecDeque<Notification>,
}

impl ScoutSession {
    fn new(leads: Vec<Lead>, log_capacity: usize) -> Self {
        Self {
            leads,
            logs: LogRing::new(log_capacity),
            ..Self::default()
        }
    }

    fn identities(&self) -> Vec<LeadIdentity> {
        self.leads.iter().filter_map(Lead::identity).collect()
    }
}

/// Coordinates searches, the auto-loop and the lead collection.
pub struct ScoutController {
    gateway: SearchGateway,
    repository: LeadRepository,
    limits: RequestLimits,
    timer: LoopTimer,
    session: ScoutSession,
}

impl ScoutController {
    /// Create a controller, restoring any persisted leads.
    #[must_use]
    pub fn new(gateway: SearchGateway, repository: LeadRepository, config: &ScoutConfig) -> Self {
        let leads = repository.load();
        info!(
            provider = gateway.provider_id(),
            leads = leads.len(),
            "Scout controller ready"
        );
        Self {
            gateway,
            repository,
            limits: RequestLimits::from(config),
            timer: LoopTimer::new(Duration::from_secs(config.loop_interval_secs)),
            session: ScoutSession::new(leads, config.log_capacity),
        }
    }

    /// Store new criteria and run a search with them.
    ///
    /// Invalid criteria are rejected before anything is sent. If the loop is
    /// running, its timer restarts from now.
    pub async fn submit(&mut self, criteria: SearchCriteria) -> Result<CycleOutcome> {
        criteria.validate().map_err(|e| match e {
            ScoutError::Validation(fields) => ControllerError::Validation(fields),
            other => ControllerError::Validation(vec![scout_core::FieldError::new(
                "criteria",
                other.to_string(),
            )]),
        })?;
        self.ensure_can_search()?;

        debug!(criteria = %criteria.summary(), "New search criteria");
        self.session.current_criteria = Some(criteria);
        if self.session.is_looping {
            self.timer.start();
        }
        Ok(self.run_cycle().await)
    }

    /// Run another search with the current criteria now.
    pub async fn find_more(&mut self) -> Result<CycleOutcome> {
        if self.session.current_criteria.is_none() {
            return Err(ControllerError::NoCriteria);
        }
        self.ensure_can_search()?;
        Ok(self.run_cycle().await)
    }

    /// Enable or disable the auto-loop. Returns the new looping state.
    ///
    /// Enabling is refused, with a queued notification, when no criteria are
    /// set or the session is halted on quota.
    pub fn toggle_loop(&mut self) -> Result<bool> {
        if self.session.is_looping {
            self.session.is_looping = false;
            self.timer.stop();
            self.session.logs.push("Auto-loop disabled.");
            info!("Auto-loop disabled");
            return Ok(false);
        }

        let refusal = if self.session.quota_halted {
            Some((ControllerError::QuotaHalted, "API quota is exhausted"))
        } else if self.session.current_criteria.is_none() {
            Some((ControllerError::NoCriteria, "no search criteria set"))
        } else {
            None
        };
        if let Some((err, reason)) = refusal {
            warn!("Refusing to enable auto-loop: {}", reason);
            self.session.notifications.push_back(Notification::LoopRefused {
                reason: reason.to_string(),
            });
            return Err(err);
        }

        self.session.is_looping = true;
        self.timer.start();
        let secs = self.timer.period().as_secs();
        self.session
            .logs
            .push(format!("Auto-loop enabled. Next search in {secs}s."));
        info!(interval_secs = secs, "Auto-loop enabled");
        Ok(true)
    }

    /// Wait until the loop timer fires. Never resolves while the loop is off.
    pub async fn wait_for_tick(&mut self) {
        self.timer.tick().await;
    }

    /// Handle one loop tick.
    ///
    /// Stops the loop instead of searching once the collection has reached
    /// the requested number of results.
    pub async fn tick(&mut self) -> CycleOutcome {
        if !self.session.is_looping || self.session.quota_halted {
            return CycleOutcome::Skipped;
        }
        let Some(goal) = self
            .session
            .current_criteria
            .as_ref()
            .map(|c| c.results_amount.count())
        else {
            return CycleOutcome::Skipped;
        };

        let total = self.session.leads.len();
        if total >= goal {
            self.session.is_looping = false;
            self.timer.stop();
            self.session
                .logs
                .push(format!("Goal reached ({total}/{goal}). Auto-loop disabled."));
            info!(total, goal, "Lead goal reached, auto-loop disabled");
            return CycleOutcome::GoalReached;
        }

        debug!(total, goal, "Auto-loop tick");
        self.run_cycle().await
    }

    /// Remove every lead from memory and storage.
    pub fn clear_all(&mut self) {
        let removed = self.session.leads.len();
        self.session.leads.clear();
        if let Err(e) = self.repository.clear() {
            warn!("Failed to clear stored leads: {}", e);
        }
        self.session.logs.push("Cleared all leads.");
        info!(removed, "Lead collection cleared");
    }

    /// Render the collection as CSV, newest first.
    pub fn export_csv(&self) -> Result<String> {
        leads_to_csv(&self.session.leads).map_err(|e| ControllerError::Export(e.to_string()))
    }

    /// Newline-joined valid emails from the collection.
    #[must_use]
    pub fn copy_emails(&self) -> String {
        emails_for_clipboard(&self.session.leads)
    }

    /// Snapshot of the current status.
    #[must_use]
    pub fn status(&self) -> ScoutStatus {
        ScoutStatus {
            is_searching: self.session.activity.is_searching(),
            is_looping: self.session.is_looping,
            is_quota_halted: self.session.quota_halted,
            total_found: self.session.leads.len(),
            last_search_time: self.session.last_search_time,
            logs: self.session.logs.iter().cloned().collect(),
        }
    }

    /// The collection, newest first.
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.session.leads
    }

    /// Criteria of the most recent submission.
    #[must_use]
    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.session.current_criteria.as_ref()
    }

    /// Handle for observing in-flight searches from elsewhere.
    #[must_use]
    pub fn activity(&self) -> SearchActivity {
        self.session.activity.clone()
    }

    /// Whether quota was exhausted this session.
    #[must_use]
    pub fn is_quota_halted(&self) -> bool {
        self.session.quota_halted
    }

    /// Whether the auto-loop is enabled.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.session.is_looping
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.session.notifications.drain(..).collect()
    }

    fn ensure_can_search(&self) -> Result<()> {
        if self.session.quota_halted {
            return Err(ControllerError::QuotaHalted);
        }
        Ok(())
    }

    async fn run_cycle(&mut self) -> CycleOutcome {
        let Some(criteria) = self.session.current_criteria.clone() else {
            return CycleOutcome::Skipped;
        };

        let request = build_lead_request(&criteria, &self.session.identities(), self.limits);
        let result = {
            let _searching = self.session.activity.begin();
            self.gateway.search(&request).await
        };

        match result {
            Ok(raw) => {
                let existing: HashSet<LeadIdentity> =
                    self.session.identities().into_iter().collect();
                let mut fresh = process_batch(&raw, &existing, self.gateway.source_label());
                let count = fresh.len();

                if count > 0 {
                    fresh.append(&mut self.session.leads);
                    self.session.leads = fresh;
                    self.persist();
                }
                self.session.last_search_time = Some(Timestamp::now());
                self.session.logs.push(format!("Found {count} new leads."));
                info!(
                    added = count,
                    total = self.session.leads.len(),
                    "Search cycle complete"
                );
                CycleOutcome::Added { count }
            }
            Err(GatewayError::QuotaExceeded { provider, message }) => {
                self.session.quota_halted = true;
                self.session.is_looping = false;
                self.timer.stop();
                self.session.logs.push(QUOTA_HALT_MESSAGE);
                if !self.session.quota_notified {
                    self.session.quota_notified = true;
                    self.session
                        .notifications
                        .push_back(Notification::QuotaExhausted);
                }
                error!(provider = %provider, "Quota exhausted, halting: {}", message);
                CycleOutcome::Halted
            }
            Err(e) => {
                let message = e.to_string();
                self.session.logs.push(format!("Search failed: {message}"));
                warn!("Search cycle failed: {}", message);
                CycleOutcome::Failed { message }
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.session.leads) {
            warn!(
                leads = self.session.leads.len(),
                "Failed to persist leads: {}", e
            );
        }
    }
}
