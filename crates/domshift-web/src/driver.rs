#![forbid(unsafe_code)]

//! Event plumbing between host notifications and a [`Relocator`].
//!
//! [`RelocationDriver`] is what the wasm layer calls from its `resize`,
//! `setTimeout` and media `change` callbacks. It owns the debouncer, knows
//! which notifications the activation mode cares about, and stops reacting
//! once disposed. It holds no JS handles, so native tests drive it with the
//! in-memory document.

use core::time::Duration;

use domshift_core::{Activation, Debouncer, DomTree, RelocateError, Relocator, Transition};
use tracing::{debug, trace};

/// Setup facts that never change for the life of a relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupSummary {
    /// `"media-query"`, `"min-width"` or `"unconditional"`.
    pub mode: &'static str,
    pub diagnostics: Vec<String>,
}

pub struct RelocationDriver<D: DomTree> {
    relocator: Relocator<D>,
    debouncer: Debouncer,
    disposed: bool,
}

impl<D: DomTree> core::fmt::Debug for RelocationDriver<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RelocationDriver")
            .field("relocator", &self.relocator)
            .field("debouncer", &self.debouncer)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl<D: DomTree> RelocationDriver<D> {
    #[must_use]
    pub fn new(relocator: Relocator<D>) -> Self {
        let debouncer = Debouncer::new(relocator.debounce_interval());
        Self {
            relocator,
            debouncer,
            disposed: false,
        }
    }

    #[must_use]
    pub const fn relocator(&self) -> &Relocator<D> {
        &self.relocator
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn summary(&self) -> SetupSummary {
        SetupSummary {
            mode: self.relocator.activation().label(),
            diagnostics: self
                .relocator
                .diagnostics()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Whether a `resize` listener is needed.
    #[must_use]
    pub fn wants_resize(&self) -> bool {
        !self.disposed && matches!(self.relocator.activation(), Activation::MinWidth(_))
    }

    /// Query to subscribe to, in media-query mode.
    #[must_use]
    pub fn media_query(&self) -> Option<&str> {
        match self.relocator.activation() {
            Activation::MediaQuery(query) if !self.disposed => Some(query.as_str()),
            _ => None,
        }
    }

    /// A `resize` notification arrived at `now`.
    ///
    /// Returns the delay to (re)arm the host timer with, or `None` when the
    /// notification is not relevant.
    pub fn on_resize(&mut self, now: Duration) -> Option<Duration> {
        if !self.wants_resize() {
            return None;
        }
        let deadline = self.debouncer.signal(now).deadline();
        Some(deadline.saturating_sub(now))
    }

    /// The host timer armed by [`Self::on_resize`] fired.
    pub fn on_timer(&mut self, dom: &mut D, width: f64) -> Result<Transition, RelocateError> {
        if self.disposed || !self.debouncer.flush() {
            trace!("debounce timer fired with nothing owed");
            return Ok(Transition::Unchanged);
        }
        self.relocator.observe_width(dom, width)
    }

    /// The media query's match state changed.
    pub fn on_media_change(
        &mut self,
        dom: &mut D,
        matches: bool,
    ) -> Result<Transition, RelocateError> {
        if self.disposed {
            return Ok(Transition::Unchanged);
        }
        self.relocator.observe_media_match(dom, matches)
    }

    /// Stop reacting to notifications. Returns `false` if already disposed.
    ///
    /// The element stays where it currently is.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.debouncer.cancel();
        self.disposed = true;
        debug!(moved = self.relocator.is_moved(), "relocation disposed");
        true
    }
}
