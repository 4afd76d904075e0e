//! Background solver service.
//!
//! Solves run on the Tokio blocking pool so request handling never waits on
//! the optimizer. Callers observe a job either through its own state channel
//! ([`SolverService::subscribe`]) or through the service-wide notification
//! stream ([`SolverService::notifications`]). Only terminal results are ever
//! published; intermediate incumbents stay inside the backend.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use roster_config::SolverConfig;
use roster_core::{Result, RosterError};
use roster_solver::{Backend, BranchAndBound};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::pipeline::{self, NoScheduleReport, ScheduleOutcome, ScheduleRequest};

const NOTIFICATION_CAPACITY: usize = 64;

/// State of a solving job.
#[derive(Debug, Clone)]
pub enum JobState {
    Queued,
    Solving,
    Completed(Arc<ScheduleOutcome>),
    Failed(String),
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed(_) | JobState::Failed(_) | JobState::Cancelled
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Solving => "solving",
            JobState::Completed(_) => "completed",
            JobState::Failed(_) => "failed",
            JobState::Cancelled => "cancelled",
        }
    }
}

/// Pushed to every notification subscriber when a job finishes.
#[derive(Debug, Clone)]
pub enum JobNotification {
    ScheduleReady { job_id: String, total_shortage: u32 },
    NoSchedule { job_id: String, report: NoScheduleReport },
    Failed { job_id: String, error: String },
    Cancelled { job_id: String },
}

impl JobNotification {
    pub fn job_id(&self) -> &str {
        match self {
            JobNotification::ScheduleReady { job_id, .. }
            | JobNotification::NoSchedule { job_id, .. }
            | JobNotification::Failed { job_id, .. }
            | JobNotification::Cancelled { job_id } => job_id,
        }
    }
}

/// Returned by [`SolverService::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
    pub fingerprint: String,
    /// True if an identical in-flight job was reused.
    pub deduplicated: bool,
}

#[derive(Debug)]
struct SolveJob {
    id: String,
    fingerprint: String,
    state: watch::Sender<JobState>,
    cancel: Arc<AtomicBool>,
    submitted_at: Instant,
    finished_at: OnceLock<Instant>,
}

impl SolveJob {
    fn is_finished(&self) -> bool {
        self.state.borrow().is_terminal()
    }

    fn finished_before(&self, cutoff: Duration) -> bool {
        self.finished_at
            .get()
            .is_some_and(|at| at.elapsed() >= cutoff)
    }
}

/// Manages background solving jobs.
///
/// Finished jobs stay queryable until [`remove`](Self::remove)d. With a
/// retention set ([`with_retention`](Self::with_retention)) every submit also
/// evicts jobs that finished longer ago than that.
#[derive(Debug)]
pub struct SolverService {
    jobs: RwLock<HashMap<String, Arc<SolveJob>>>,
    in_flight: Arc<RwLock<HashMap<String, String>>>,
    config: SolverConfig,
    backend: Arc<dyn Backend>,
    notifications: broadcast::Sender<JobNotification>,
    next_id: AtomicU64,
    retention: Option<Duration>,
}

impl SolverService {
    /// Creates a service with the default configuration and branch-and-bound backend.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self::with_backend(config, Arc::new(BranchAndBound::new()))
    }

    pub fn with_backend(config: SolverConfig, backend: Arc<dyn Backend>) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            jobs: RwLock::new(HashMap::new()),
            in_flight: Arc::new(RwLock::new(HashMap::new())),
            config,
            backend,
            notifications,
            next_id: AtomicU64::new(1),
            retention: None,
        }
    }

    /// Evicts finished jobs once they are older than `retention`.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Enqueues a solve and returns immediately.
    ///
    /// An identical request that is still queued or solving is not started
    /// twice; its existing handle is returned instead. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self, request: ScheduleRequest) -> Result<JobHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| RosterError::Internal(format!("no Tokio runtime: {e}")))?;
        let fingerprint = request.fingerprint()?;
        if let Some(retention) = self.retention {
            self.prune_finished(retention);
        }

        let mut in_flight = self.in_flight.write();
        if let Some(existing) = in_flight.get(&fingerprint).and_then(|id| self.get_job(id)) {
            if !existing.is_finished() {
                info!(event = "job_deduplicated", job_id = %existing.id);
                return Ok(JobHandle {
                    id: existing.id.clone(),
                    fingerprint,
                    deduplicated: true,
                });
            }
        }

        let id = format!("job-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let (state, _) = watch::channel(JobState::Queued);
        let job = Arc::new(SolveJob {
            id: id.clone(),
            fingerprint: fingerprint.clone(),
            state,
            cancel: Arc::new(AtomicBool::new(false)),
            submitted_at: Instant::now(),
            finished_at: OnceLock::new(),
        });
        in_flight.insert(fingerprint.clone(), id.clone());
        drop(in_flight);
        self.jobs.write().insert(id.clone(), job.clone());

        info!(
            event = "job_submitted",
            job_id = %id,
            employees = request.submissions.len(),
            slots = request.config.slot_count(),
        );

        let config = self.config.clone();
        let backend = self.backend.clone();
        let notifications = self.notifications.clone();
        let in_flight = self.in_flight.clone();
        runtime.spawn_blocking(move || {
            solve_blocking(&job, &request, &config, backend.as_ref(), &notifications);
            let mut in_flight = in_flight.write();
            if in_flight.get(&job.fingerprint) == Some(&job.id) {
                in_flight.remove(&job.fingerprint);
            }
        });

        Ok(JobHandle {
            id,
            fingerprint,
            deduplicated: false,
        })
    }

    fn get_job(&self, id: &str) -> Option<Arc<SolveJob>> {
        self.jobs.read().get(id).cloned()
    }

    /// Current state of a job.
    pub fn status(&self, id: &str) -> Option<JobState> {
        self.get_job(id).map(|job| job.state.borrow().clone())
    }

    /// A receiver that observes every state change of one job.
    pub fn subscribe(&self, id: &str) -> Option<watch::Receiver<JobState>> {
        self.get_job(id).map(|job| job.state.subscribe())
    }

    /// Completion notifications for every job submitted after this call.
    pub fn notifications(&self) -> broadcast::Receiver<JobNotification> {
        self.notifications.subscribe()
    }

    /// Waits until a job reaches a terminal state.
    pub async fn wait(&self, id: &str) -> Option<JobState> {
        let mut rx = self.subscribe(id)?;
        let state = rx.wait_for(JobState::is_terminal).await.ok()?.clone();
        Some(state)
    }

    /// Requests cooperative cancellation.
    ///
    /// Returns false if the job is unknown or already finished. A cancelled
    /// job never publishes a schedule, even if its search had an incumbent.
    pub fn cancel(&self, id: &str) -> bool {
        let Some(job) = self.get_job(id) else {
            return false;
        };
        if job.is_finished() {
            return false;
        }
        job.cancel.store(true, Ordering::SeqCst);
        let mut in_flight = self.in_flight.write();
        if in_flight.get(&job.fingerprint) == Some(&job.id) {
            in_flight.remove(&job.fingerprint);
        }
        info!(event = "job_cancel_requested", job_id = %id);
        true
    }

    /// Cancels (if running) and forgets a job.
    pub fn remove(&self, id: &str) -> bool {
        self.cancel(id);
        self.jobs.write().remove(id).is_some()
    }

    /// Forgets every job that finished at least `older_than` ago.
    ///
    /// Returns the number of jobs evicted. Running jobs are never touched.
    pub fn prune_finished(&self, older_than: Duration) -> usize {
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| !job.finished_before(older_than));
        let evicted = before - jobs.len();
        if evicted > 0 {
            debug!(event = "jobs_pruned", evicted, remaining = jobs.len());
        }
        evicted
    }

    /// All known job ids, sorted.
    pub fn list_jobs(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for SolverService {
    fn default() -> Self {
        Self::new()
    }
}

fn solve_blocking(
    job: &SolveJob,
    request: &ScheduleRequest,
    config: &SolverConfig,
    backend: &dyn Backend,
    notifications: &broadcast::Sender<JobNotification>,
) {
    let job_id = job.id.clone();
    let result = if job.cancel.load(Ordering::SeqCst) {
        Err(RosterError::Cancelled)
    } else {
        job.state.send_replace(JobState::Solving);
        panic::catch_unwind(AssertUnwindSafe(|| {
            pipeline::run(request, config, backend, Some(job.cancel.clone()))
        }))
        .unwrap_or_else(|payload| Err(RosterError::Internal(panic_message(&*payload))))
    };

    let (state, notification) = match result {
        Ok(outcome) => {
            let notification = match &outcome {
                ScheduleOutcome::Scheduled(solved) => JobNotification::ScheduleReady {
                    job_id,
                    total_shortage: solved.schedule.total_shortage(),
                },
                ScheduleOutcome::NoSchedule(report) => JobNotification::NoSchedule {
                    job_id,
                    report: report.clone(),
                },
            };
            (JobState::Completed(Arc::new(outcome)), notification)
        }
        Err(RosterError::Cancelled) => (JobState::Cancelled, JobNotification::Cancelled { job_id }),
        Err(err) => {
            warn!(event = "job_failed", job_id = %job.id, error = %err);
            let error = err.to_string();
            (
                JobState::Failed(error.clone()),
                JobNotification::Failed { job_id, error },
            )
        }
    };

    info!(
        event = "job_finished",
        job_id = %job.id,
        state = state.label(),
        duration_ms = job.submitted_at.elapsed().as_millis() as u64,
    );
    let _ = job.finished_at.set(Instant::now());
    job.state.send_replace(state);
    // No subscribers is fine.
    let _ = notifications.send(notification);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("solve panicked: {detail}")
}
