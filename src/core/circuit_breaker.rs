//! # Circuit Breaker Implementation
//!
//! Per-service circuit breaker guarding all outbound calls to backend
//! services. The breaker follows a three-state machine:
//!
//! - **Closed**: normal operation; success/failure outcomes feed rolling
//!   counters over a fixed counting interval (10 s by default). The counters
//!   reset whenever the interval elapses, so only recent traffic can trip
//!   the breaker.
//! - **Open**: every request fails fast with a circuit-open error, without a
//!   network call, until the cooldown timeout (30 s) elapses.
//! - **HalfOpen**: a bounded number of trial requests (3) pass through. Any
//!   failure reopens the breaker immediately; enough successes close it.
//!
//! The breaker wraps exactly one call attempt and never retries; retry
//! policy, if any, belongs to the caller.
//!
//! Trip condition in Closed: `requests >= request_volume_threshold` AND
//! `failures / requests >= failure_ratio` within the current interval.
//!
//! Admission is permit-based: [`CircuitBreaker::try_acquire`] hands out a
//! [`Permit`] whose holder reports the call outcome. Failure classification
//! is a policy decision of the caller: the proxy executor records transport
//! errors and (by configuration) backend 5xx responses as failures via
//! [`Permit::record_failure`]. The interval reset is evaluated lazily on
//! each state access, which is observationally equivalent to a periodic
//! tick.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::warn;

use crate::core::config::CircuitBreakerSettings;

/// Circuit breaker rejection error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CircuitBreakerError {
    /// The breaker is open (or the half-open probe budget is exhausted);
    /// the request was rejected without a call attempt.
    #[error("circuit breaker is open")]
    Open,
}

/// Observable breaker state, reported to transition hooks and introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerState::Closed => write!(f, "closed"),
            BreakerState::Open => write!(f, "open"),
            BreakerState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Rolling outcome counters for the current interval (Closed) or probe
/// window (HalfOpen)
#[derive(Debug, Clone, Copy, Default)]
pub struct Counts {
    pub requests: u32,
    pub failures: u32,
    pub successes: u32,
}

impl Counts {
    fn reset(&mut self) {
        *self = Counts::default();
    }

    fn failure_ratio(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.failures as f64 / self.requests as f64
    }
}

/// Internal state guarded by the breaker's mutex
#[derive(Debug)]
enum State {
    Closed {
        counts: Counts,
        /// When the current counting interval ends and counters reset
        interval_deadline: Instant,
    },
    Open {
        opened_at: Instant,
    },
    HalfOpen {
        counts: Counts,
    },
}

impl State {
    fn kind(&self) -> BreakerState {
        match self {
            State::Closed { .. } => BreakerState::Closed,
            State::Open { .. } => BreakerState::Open,
            State::HalfOpen { .. } => BreakerState::HalfOpen,
        }
    }
}

/// Hook invoked on every state transition (observability only, not part of
/// the request path's correctness)
pub type TransitionHook = Arc<dyn Fn(&str, BreakerState, BreakerState) + Send + Sync>;

/// Admission for exactly one outbound call, handed out by
/// [`CircuitBreaker::try_acquire`].
///
/// The holder reports the call's outcome with [`record_success`] or
/// [`record_failure`]. A permit dropped without an outcome (the handler
/// future was cancelled, typically by a client disconnect mid-call)
/// releases its request slot, so abandoned calls can never exhaust the
/// half-open probe budget or count toward the trip volume.
///
/// [`record_success`]: Permit::record_success
/// [`record_failure`]: Permit::record_failure
#[must_use = "a permit admits one call and must carry its outcome"]
pub struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    outcome_recorded: bool,
}

impl Permit<'_> {
    /// Report the admitted call as successful
    pub fn record_success(mut self) {
        self.outcome_recorded = true;
        self.breaker.record_success();
    }

    /// Report the admitted call as failed
    pub fn record_failure(mut self) {
        self.outcome_recorded = true;
        self.breaker.record_failure();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.outcome_recorded {
            self.breaker.release_abandoned();
        }
    }
}

/// Per-service circuit breaker
///
/// Shared mutable state accessed by every worker proxying to the same
/// service; all counter and state updates happen under one per-breaker
/// mutex so unrelated services never serialize on each other.
pub struct CircuitBreaker {
    name: String,
    settings: CircuitBreakerSettings,
    state: Mutex<State>,
    transition_hook: Option<TransitionHook>,
}

impl CircuitBreaker {
    /// Create a new breaker in the Closed state
    pub fn new(name: impl Into<String>, settings: CircuitBreakerSettings) -> Self {
        let interval = settings.interval;
        Self {
            name: name.into(),
            settings,
            state: Mutex::new(State::Closed {
                counts: Counts::default(),
                interval_deadline: Instant::now() + interval,
            }),
            transition_hook: None,
        }
    }

    /// Attach a transition hook, invoked on every state change
    pub fn with_transition_hook(mut self, hook: TransitionHook) -> Self {
        self.transition_hook = Some(hook);
        self
    }

    /// The service name this breaker guards
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current observable state
    pub fn state(&self) -> BreakerState {
        self.state.lock().kind()
    }

    /// Snapshot of the current counters
    pub fn counts(&self) -> Counts {
        match &*self.state.lock() {
            State::Closed { counts, .. } | State::HalfOpen { counts } => *counts,
            State::Open { .. } => Counts::default(),
        }
    }

    /// Ask the breaker for permission to issue one outbound call.
    ///
    /// On `Ok` the request is admitted and counted; the returned [`Permit`]
    /// carries the outcome back, or releases the slot if dropped without
    /// one. On `Err` the call must not be attempted.
    pub fn try_acquire(&self) -> Result<Permit<'_>, CircuitBreakerError> {
        let now = Instant::now();
        let mut state = self.state.lock();
        self.roll_interval(&mut state, now);

        let cooldown_elapsed = match &mut *state {
            State::Closed { counts, .. } => {
                counts.requests += 1;
                return Ok(self.permit());
            }
            State::HalfOpen { counts } => {
                if counts.requests >= self.settings.max_requests {
                    return Err(CircuitBreakerError::Open);
                }
                counts.requests += 1;
                return Ok(self.permit());
            }
            State::Open { opened_at } => now.duration_since(*opened_at) >= self.settings.timeout,
        };

        if cooldown_elapsed {
            // Cooldown elapsed: this request becomes the first half-open
            // probe.
            self.transition(
                &mut state,
                State::HalfOpen {
                    counts: Counts {
                        requests: 1,
                        ..Counts::default()
                    },
                },
            );
            Ok(self.permit())
        } else {
            Err(CircuitBreakerError::Open)
        }
    }

    fn permit(&self) -> Permit<'_> {
        Permit {
            breaker: self,
            outcome_recorded: false,
        }
    }

    /// Record a successful outcome for a previously admitted request
    fn record_success(&self) {
        let now = Instant::now();
        let mut state = self.state.lock();
        self.roll_interval(&mut state, now);

        let should_close = match &mut *state {
            State::Closed { counts, .. } => {
                counts.successes += 1;
                false
            }
            // Outcome arrived after the breaker opened for another reason;
            // nothing to account.
            State::Open { .. } => false,
            State::HalfOpen { counts } => {
                counts.successes += 1;
                counts.successes >= self.settings.max_requests
            }
        };

        if should_close {
            // Every probe in the budget succeeded: service recovered.
            self.transition(
                &mut state,
                State::Closed {
                    counts: Counts::default(),
                    interval_deadline: now + self.settings.interval,
                },
            );
        }
    }

    /// Record a failed outcome for a previously admitted request
    fn record_failure(&self) {
        let now = Instant::now();
        let mut state = self.state.lock();
        self.roll_interval(&mut state, now);

        let should_open = match &mut *state {
            State::Closed { counts, .. } => {
                counts.failures += 1;
                counts.requests >= self.settings.request_volume_threshold
                    && counts.failure_ratio() >= self.settings.failure_ratio
            }
            State::Open { .. } => false,
            // Any probe failure reopens immediately and restarts the
            // cooldown timer.
            State::HalfOpen { .. } => true,
        };

        if should_open {
            self.transition(&mut state, State::Open { opened_at: now });
        }
    }

    /// Return an admitted request slot whose outcome never arrived.
    ///
    /// The slot is uncounted rather than treated as either outcome; an
    /// abandoned call says nothing about backend health, and a half-open
    /// budget pinned by cancelled probes would otherwise reject forever.
    fn release_abandoned(&self) {
        let mut state = self.state.lock();
        match &mut *state {
            State::Closed { counts, .. } | State::HalfOpen { counts } => {
                counts.requests = counts.requests.saturating_sub(1);
            }
            // The breaker reopened while the call was in flight; its slot
            // is already gone with the probe window.
            State::Open { .. } => {}
        }
    }

    /// Execute a single operation through the breaker.
    ///
    /// The breaker admits or rejects the call; the operation's `Err` is
    /// recorded as a failure and passed back untouched. This covers callers
    /// that equate failure with `Err` — the proxy executor instead holds a
    /// [`Permit`] directly so it can also classify backend 5xx responses as
    /// failures while still forwarding them.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<Result<T, E>, CircuitBreakerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = self.try_acquire()?;
        match operation().await {
            Ok(value) => {
                permit.record_success();
                Ok(Ok(value))
            }
            Err(err) => {
                permit.record_failure();
                Ok(Err(err))
            }
        }
    }

    /// Reset Closed-state counters when the counting interval has elapsed
    fn roll_interval(&self, state: &mut State, now: Instant) {
        if let State::Closed {
            counts,
            interval_deadline,
        } = state
        {
            if now >= *interval_deadline {
                counts.reset();
                *interval_deadline = now + self.settings.interval;
            }
        }
    }

    fn transition(&self, state: &mut State, next: State) {
        let from = state.kind();
        let to = next.kind();
        *state = next;
        warn!(
            service = %self.name,
            from = %from,
            to = %to,
            "Circuit breaker state change"
        );
        if let Some(hook) = &self.transition_hook {
            hook(&self.name, from, to);
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

/// Registry of per-service circuit breakers
///
/// Explicitly owned (constructed once at startup, handed to the proxy
/// executor) rather than a process-global map, so tests can run with
/// isolated registries. Creation on first use is exactly-once per service
/// name: a read lock serves the common path, and a cache miss escalates to
/// the write lock with a re-check before inserting.
pub struct CircuitBreakerRegistry {
    settings: CircuitBreakerSettings,
    breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
    transition_hook: Option<TransitionHook>,
}

impl CircuitBreakerRegistry {
    /// Create a registry; all breakers share the same settings
    pub fn new(settings: CircuitBreakerSettings) -> Self {
        Self {
            settings,
            breakers: RwLock::new(HashMap::new()),
            transition_hook: None,
        }
    }

    /// Attach a transition hook applied to every breaker created afterwards
    pub fn with_transition_hook(mut self, hook: TransitionHook) -> Self {
        self.transition_hook = Some(hook);
        self
    }

    /// Get the breaker for a service, creating it on first use
    pub fn get_or_create(&self, service: &str) -> Arc<CircuitBreaker> {
        {
            let breakers = self.breakers.read();
            if let Some(breaker) = breakers.get(service) {
                return Arc::clone(breaker);
            }
        }

        let mut breakers = self.breakers.write();
        // Re-check: another worker may have inserted between the locks.
        if let Some(breaker) = breakers.get(service) {
            return Arc::clone(breaker);
        }

        let mut breaker = CircuitBreaker::new(service, self.settings.clone());
        if let Some(hook) = &self.transition_hook {
            breaker = breaker.with_transition_hook(Arc::clone(hook));
        }
        let breaker = Arc::new(breaker);
        breakers.insert(service.to_string(), Arc::clone(&breaker));
        breaker
    }

    /// Snapshot of all breakers (for introspection)
    pub fn all(&self) -> Vec<Arc<CircuitBreaker>> {
        self.breakers.read().values().cloned().collect()
    }
}
