#![forbid(unsafe_code)]

//! Deterministic debounce for resize bursts.
//!
//! The [`Debouncer`] never reads a clock. The host passes monotonic
//! timestamps to [`Debouncer::signal`] and either polls with
//! [`Debouncer::poll`] or, when it owns a real timer armed for
//! [`Debouncer::deadline`], calls [`Debouncer::flush`] from the timer.
//!
//! # Trailing edge (default)
//!
//! Every signal re-arms the deadline to `now + interval`. One evaluation
//! becomes due once a full interval passes without a signal, so a burst of
//! N signals each within `interval` of the previous yields exactly one
//! evaluation at `last + interval`.
//!
//! # Leading edge
//!
//! The first signal of a burst fires immediately; later signals inside the
//! burst only extend it. Nothing fires when the burst ends.
//!
//! ```
//! use core::time::Duration;
//! use domshift_core::debounce::Debouncer;
//!
//! let ms = Duration::from_millis;
//! let mut d = Debouncer::new(ms(200));
//! d.signal(ms(0));
//! d.signal(ms(150));
//! assert!(!d.poll(ms(300)));
//! assert!(d.poll(ms(350)));
//! assert!(!d.poll(ms(400)));
//! ```

use core::time::Duration;

use tracing::trace;

/// Which edge of a burst triggers the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceEdge {
    #[default]
    Trailing,
    Leading,
}

/// What the host should do after a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Arm (or re-arm) a timer for `deadline`.
    Scheduled { deadline: Duration },
    /// Evaluate now; the burst lasts until `deadline`.
    FireNow { deadline: Duration },
}

impl SignalOutcome {
    #[must_use]
    pub const fn deadline(self) -> Duration {
        match self {
            Self::Scheduled { deadline } | Self::FireNow { deadline } => deadline,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    edge: DebounceEdge,
    deadline: Option<Duration>,
    pending: bool,
    signals_in_burst: u32,
}

impl Debouncer {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            edge: DebounceEdge::Trailing,
            deadline: None,
            pending: false,
            signals_in_burst: 0,
        }
    }

    #[must_use]
    pub const fn with_edge(mut self, edge: DebounceEdge) -> Self {
        self.edge = edge;
        self
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub const fn edge(&self) -> DebounceEdge {
        self.edge
    }

    /// Current deadline, if a burst is in progress.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether a trailing evaluation is owed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record a notification at `now`.
    pub fn signal(&mut self, now: Duration) -> SignalOutcome {
        let in_burst = self.deadline.is_some_and(|d| now < d);
        let deadline = now.saturating_add(self.interval);
        self.deadline = Some(deadline);
        self.signals_in_burst = if in_burst {
            self.signals_in_burst.saturating_add(1)
        } else {
            1
        };
        trace!(
            now_ms = now.as_millis() as u64,
            deadline_ms = deadline.as_millis() as u64,
            burst = self.signals_in_burst,
            "debounce signal"
        );
        match self.edge {
            DebounceEdge::Trailing => {
                self.pending = true;
                SignalOutcome::Scheduled { deadline }
            }
            DebounceEdge::Leading if in_burst => SignalOutcome::Scheduled { deadline },
            DebounceEdge::Leading => SignalOutcome::FireNow { deadline },
        }
    }

    /// Returns `true` exactly once per burst when a trailing evaluation is due.
    pub fn poll(&mut self, now: Duration) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.deadline = None;
        let fire = std::mem::take(&mut self.pending);
        if fire {
            trace!(burst = self.signals_in_burst, "debounce fired");
        }
        fire
    }

    /// End the burst regardless of time; returns whether an evaluation was owed.
    pub fn flush(&mut self) -> bool {
        self.deadline = None;
        std::mem::take(&mut self.pending)
    }

    /// Drop any pending evaluation.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = false;
        self.signals_in_burst = 0;
    }
}
