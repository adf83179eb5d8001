//! Job lifecycle controller
//!
//! Drives one job at a time from submission to a terminal state.
//!
//! The controller runs as a single task. Commands (`start`, `reset`) and the
//! outcomes of remote calls are handled one after another, so every state
//! transition is decided without interleaving. The polling timer and any call
//! still in flight belong to the current [`Phase`]; moving to another phase
//! drops them before the new state is published, which is what keeps a late
//! poll response from ever touching a newer state.

use retouch_client::{ClientError, JobService};
use retouch_core::domain::job::{ApiKey, JobHandle, JobRequest, JobResult, JobStatus, StatusReport};
use retouch_core::domain::lifecycle::{FailureReason, LifecycleEvent, LifecycleState};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, Result};

/// Pending remote call owned by a phase
type Call<T> = Pin<Box<dyn Future<Output = retouch_client::Result<T>> + Send>>;

const COMMAND_BUFFER: usize = 16;
const EVENT_BUFFER: usize = 64;

/// Handle to a running lifecycle controller
///
/// Cloning the handle shares the same controller. The controller task stops
/// once every handle has been dropped, releasing its timer.
#[derive(Clone)]
pub struct LifecycleController {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<LifecycleState>,
    events: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleController {
    /// Spawns a controller on the current tokio runtime
    ///
    /// Fails without spawning anything when the configuration is invalid.
    ///
    /// # Arguments
    /// * `service` - Remote job operations
    /// * `config` - Polling configuration
    pub fn spawn(service: Arc<dyn JobService>, config: LifecycleConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(LifecycleState::Idle);
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let driver = Driver {
            service,
            config,
            phase: Phase::Idle,
            commands: command_rx,
            state: state_tx,
            events: event_tx.clone(),
        };
        tokio::spawn(driver.run());

        Ok(Self {
            commands: command_tx,
            state: state_rx,
            events: event_tx,
        })
    }

    /// Starts a job
    ///
    /// Returns once the job is `Submitting`. Blank input is rejected without
    /// contacting the service, as is any start while a job is in flight.
    pub async fn start(&self, request: JobRequest) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Start { request, reply })
            .await
            .map_err(|_| LifecycleError::Stopped)?;

        response.await.map_err(|_| LifecycleError::Stopped)?
    }

    /// Returns to `Idle`, cancelling polling and any call in flight
    ///
    /// Returns once `Idle` is published. Resetting an idle controller does nothing.
    pub async fn reset(&self) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Reset { reply })
            .await
            .map_err(|_| LifecycleError::Stopped)?;

        response.await.map_err(|_| LifecycleError::Stopped)
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    /// Receiver that always holds the latest state
    pub fn watch(&self) -> watch::Receiver<LifecycleState> {
        self.state.clone()
    }

    /// Receiver of every transition from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Waits until no job is in flight and returns the state reached
    ///
    /// That is a terminal state, or `Idle` after a reset.
    pub async fn wait_until_settled(&self) -> Result<LifecycleState> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !s.is_in_flight())
            .await
            .map_err(|_| LifecycleError::Stopped)?;
        Ok(settled.clone())
    }
}

enum Command {
    Start {
        request: JobRequest,
        reply: oneshot::Sender<Result<()>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
}

/// Internal state, including the resources each state owns
enum Phase {
    Idle,
    Submitting { api_key: ApiKey, call: Call<JobHandle> },
    Polling(PollingJob),
    Succeeded(Option<JobResult>),
    Failed(FailureReason),
}

impl Phase {
    fn snapshot(&self) -> LifecycleState {
        match self {
            Phase::Idle => LifecycleState::Idle,
            Phase::Submitting { .. } => LifecycleState::Submitting,
            Phase::Polling(job) => LifecycleState::Polling {
                task_id: job.handle.task_id.clone(),
            },
            Phase::Succeeded(result) => LifecycleState::Succeeded {
                result: result.clone(),
            },
            Phase::Failed(reason) => LifecycleState::Failed {
                reason: reason.clone(),
            },
        }
    }

    fn is_in_flight(&self) -> bool {
        matches!(self, Phase::Submitting { .. } | Phase::Polling(_))
    }

    /// Resolves with the next thing that happened to the current job
    ///
    /// Never resolves for phases without a job in flight. Cancel-safe: calls
    /// in flight live in the phase, not in this future.
    async fn next_outcome(&mut self, service: &Arc<dyn JobService>) -> Outcome {
        match self {
            Phase::Submitting { call, .. } => Outcome::Submitted(call.await),
            Phase::Polling(job) => job.next_outcome(service).await,
            _ => std::future::pending().await,
        }
    }
}

/// A submitted job being polled
///
/// Owns the polling timer. Dropping the job stops the timer and abandons any
/// status lookup still running.
struct PollingJob {
    handle: JobHandle,
    api_key: ApiKey,
    ticker: Interval,
    in_flight: Option<Call<StatusReport>>,
    limit: Option<(Instant, Duration)>,
}

impl PollingJob {
    fn new(handle: JobHandle, api_key: ApiKey, config: &LifecycleConfig) -> Self {
        let now = Instant::now();
        // First lookup one full interval after submission
        let first_tick = now.checked_add(config.poll_interval).unwrap_or(now);
        let mut ticker = time::interval_at(first_tick, config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // A limit too far out to be represented never expires
        let limit = config
            .max_poll_duration
            .and_then(|max| now.checked_add(max).map(|deadline| (deadline, max)));

        Self {
            handle,
            api_key,
            ticker,
            in_flight: None,
            limit,
        }
    }

    async fn next_outcome(&mut self, service: &Arc<dyn JobService>) -> Outcome {
        let limit = self.limit;

        loop {
            // No tick is awaited while a lookup is running
            if let Some(call) = self.in_flight.as_mut() {
                tokio::select! {
                    result = call => {
                        self.in_flight = None;
                        return Outcome::Polled(result);
                    }
                    max = expired(limit) => return Outcome::TimedOut(max),
                }
            }

            tokio::select! {
                _ = self.ticker.tick() => {}
                max = expired(limit) => return Outcome::TimedOut(max),
            }

            let service = Arc::clone(service);
            let task_id = self.handle.task_id.clone();
            let api_key = self.api_key.clone();
            self.in_flight = Some(Box::pin(async move {
                service.poll(&task_id, &api_key).await
            }));
        }
    }
}

/// Resolves with the limit once the deadline passes; never without one
async fn expired(limit: Option<(Instant, Duration)>) -> Duration {
    match limit {
        Some((deadline, max)) => {
            time::sleep_until(deadline).await;
            max
        }
        None => std::future::pending().await,
    }
}

enum Outcome {
    Submitted(retouch_client::Result<JobHandle>),
    Polled(retouch_client::Result<StatusReport>),
    TimedOut(Duration),
}

/// The controller task
struct Driver {
    service: Arc<dyn JobService>,
    config: LifecycleConfig,
    phase: Phase,
    commands: mpsc::Receiver<Command>,
    state: watch::Sender<LifecycleState>,
    events: broadcast::Sender<LifecycleEvent>,
}

impl Driver {
    async fn run(mut self) {
        debug!("Lifecycle controller started");

        loop {
            tokio::select! {
                // A reset must win over a poll result that is ready at the same time
                biased;

                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                outcome = self.phase.next_outcome(&self.service) => self.apply(outcome),
            }
        }

        debug!("Lifecycle controller stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { request, reply } => {
                let _ = reply.send(self.start(request));
            }
            Command::Reset { reply } => {
                self.reset();
                let _ = reply.send(());
            }
        }
    }

    fn start(&mut self, request: JobRequest) -> Result<()> {
        if self.phase.is_in_flight() {
            warn!("Rejected start: a job is already in progress");
            return Err(LifecycleError::JobInFlight);
        }

        if let Err(e) = request.validate() {
            warn!("Rejected start: {}", e);
            self.enter(Phase::Idle);
            return Err(e.into());
        }

        info!(
            "Submitting {} job for {}",
            request.function, request.image_url
        );

        let api_key = request.api_key.clone();
        let service = Arc::clone(&self.service);
        let call: Call<JobHandle> = Box::pin(async move { service.submit(&request).await });

        self.enter(Phase::Submitting { api_key, call });
        Ok(())
    }

    fn reset(&mut self) {
        if matches!(self.phase, Phase::Idle) {
            return;
        }

        info!("Resetting lifecycle controller");
        self.enter(Phase::Idle);
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Submitted(Ok(handle)) => {
                let Phase::Submitting { api_key, .. } = &self.phase else {
                    return;
                };
                let api_key = api_key.clone();

                info!(
                    "Task {} accepted, polling every {:?}",
                    handle.task_id, self.config.poll_interval
                );
                let job = PollingJob::new(handle, api_key, &self.config);
                self.enter(Phase::Polling(job));
            }
            Outcome::Submitted(Err(e)) => {
                error!("Job submission failed: {}", e);
                self.enter(Phase::Failed(failure_reason(&e)));
            }
            Outcome::Polled(Ok(report)) => self.apply_report(report),
            Outcome::Polled(Err(e)) => {
                error!("Status lookup failed: {}", e);
                self.enter(Phase::Failed(failure_reason(&e)));
            }
            Outcome::TimedOut(max) => {
                warn!("Gave up polling after {:?}", max);
                self.enter(Phase::Failed(FailureReason::TimedOut(max)));
            }
        }
    }

    fn apply_report(&mut self, report: StatusReport) {
        match report.status {
            JobStatus::Succeeded => {
                match &report.result {
                    Some(result) => info!("Job succeeded: {}", result.result_url),
                    None => warn!("Job succeeded without a result"),
                }
                self.enter(Phase::Succeeded(report.result));
            }
            JobStatus::Failed => {
                warn!("Service reported the job as failed");
                self.enter(Phase::Failed(FailureReason::RemoteFailed));
            }
            JobStatus::Canceled => {
                warn!("Service reported the job as canceled");
                self.enter(Phase::Failed(FailureReason::RemoteCanceled));
            }
            JobStatus::Pending | JobStatus::Running | JobStatus::Unknown => {
                debug!(
                    "Job still in progress ({})",
                    report.raw_status.as_deref().unwrap_or("no status")
                );
            }
        }
    }

    /// Replaces the phase, then publishes the new state
    fn enter(&mut self, phase: Phase) {
        // Dropping the old phase stops its timer and abandons its calls
        drop(std::mem::replace(&mut self.phase, phase));

        let state = self.phase.snapshot();
        if *self.state.borrow() == state {
            return;
        }

        self.state.send_replace(state.clone());
        let _ = self.events.send(LifecycleEvent::now(state));
    }
}

fn failure_reason(error: &ClientError) -> FailureReason {
    match error {
        ClientError::Transport { status, .. } => FailureReason::Transport(status.to_string()),
        ClientError::Network(e) => FailureReason::Transport(e.to_string()),
        ClientError::InvalidUrl(detail) => FailureReason::Transport(detail.clone()),
        ClientError::MalformedResponse(detail) => FailureReason::MalformedResponse(detail.clone()),
    }
}
