#![forbid(unsafe_code)]

//! The relocation state machine.
//!
//! A [`Relocator`] owns no DOM and no clock. The host hands it the tree on
//! every call and feeds it observations; it decides whether the element
//! should be in its moved or original position and performs the move.
//!
//! # States
//!
//! ```text
//!   NotMoved ──(condition true)──▶ Moved
//!      ▲                             │
//!      └──────(condition false)──────┘
//! ```
//!
//! Transitions happen only when the condition's truth value differs from
//! the current state, so repeated notifications at the same width (or the
//! same match state) never touch the tree. A failed move or reset leaves
//! the state unchanged and the element where it was.

use core::time::Duration;

use tracing::{debug, info_span, warn};

use crate::activation::{self, Activation, Diagnostic};
use crate::announce::ensure_announcement;
use crate::dom::DomTree;
use crate::error::{ConfigError, RelocateError};
use crate::placement::{OriginalPosition, Placement};
use crate::settings::{RelocateOptions, TransitionCallback};
use crate::viewport::Viewport;

/// Whether the element is at its moved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivationState {
    #[default]
    NotMoved,
    Moved,
}

impl ActivationState {
    #[must_use]
    pub const fn from_condition(active: bool) -> Self {
        if active { Self::Moved } else { Self::NotMoved }
    }

    #[must_use]
    pub const fn is_moved(self) -> bool {
        matches!(self, Self::Moved)
    }
}

/// What an observation did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The element was moved to its placement.
    Moved,
    /// The element was restored to its original position.
    Reset,
    /// Nothing changed.
    Unchanged,
}

pub struct Relocator<D: DomTree> {
    element: D::Node,
    placement: Option<Placement<D::Node>>,
    original: OriginalPosition<D::Node>,
    activation: Activation,
    state: ActivationState,
    debounce_interval: Duration,
    diagnostics: Vec<Diagnostic>,
    on_transition: Option<TransitionCallback>,
}

impl<D: DomTree> core::fmt::Debug for Relocator<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Relocator")
            .field("element", &self.element)
            .field("placement", &self.placement)
            .field("original", &self.original)
            .field("activation", &self.activation)
            .field("state", &self.state)
            .field("debounce_interval", &self.debounce_interval)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl<D: DomTree> Relocator<D> {
    /// Set up a relocation and run its initial evaluation.
    ///
    /// Validates `options`, captures the element's original position,
    /// resolves the activation mode, ensures the accessibility notice and
    /// then either moves unconditionally, evaluates the width threshold, or
    /// moves if the media query already matches.
    ///
    /// Without a placement target a conditional mode still sets up (the
    /// element simply never moves and a [`Diagnostic::MissingPlacement`] is
    /// recorded); an unconditional one is rejected before touching the tree.
    pub fn new<V: Viewport + ?Sized>(
        dom: &mut D,
        viewport: &V,
        options: RelocateOptions<D::Node>,
    ) -> Result<Self, RelocateError> {
        let span = info_span!("relocate");
        let _guard = span.enter();

        let RelocateOptions {
            element,
            placement,
            settings,
            on_transition,
        } = options;
        let element = element.ok_or(ConfigError::MissingElement)?;
        let original = OriginalPosition::capture(dom, &element)?;
        let mut resolution = activation::resolve(&settings, viewport);
        if placement.is_none() {
            if resolution.activation == Activation::Unconditional {
                return Err(ConfigError::MissingPlacement.into());
            }
            let diagnostic = Diagnostic::MissingPlacement;
            warn!(
                mode = resolution.activation.label(),
                "{diagnostic}; element stays in place"
            );
            resolution.diagnostics.push(diagnostic);
        }

        ensure_announcement(dom)?;

        let mut relocator = Self {
            element,
            placement,
            original,
            activation: resolution.activation,
            state: ActivationState::NotMoved,
            debounce_interval: settings.debounce_interval(),
            diagnostics: resolution.diagnostics,
            on_transition,
        };
        debug!(
            mode = relocator.activation.label(),
            placement = relocator.placement.as_ref().map_or("none", Placement::kind),
            "relocation configured"
        );

        match relocator.activation {
            Activation::Unconditional => {
                relocator.move_element(dom)?;
            }
            Activation::MinWidth(_) => {
                relocator.observe_width(dom, viewport.width())?;
            }
            Activation::MediaQuery(_) => {
                if resolution.initial_match == Some(true) {
                    relocator.move_element(dom)?;
                }
            }
        }
        Ok(relocator)
    }

    #[must_use]
    pub const fn activation(&self) -> &Activation {
        &self.activation
    }

    #[must_use]
    pub const fn state(&self) -> ActivationState {
        self.state
    }

    #[must_use]
    pub const fn is_moved(&self) -> bool {
        self.state.is_moved()
    }

    #[must_use]
    pub const fn element(&self) -> &D::Node {
        &self.element
    }

    #[must_use]
    pub const fn placement(&self) -> Option<&Placement<D::Node>> {
        self.placement.as_ref()
    }

    #[must_use]
    pub const fn original_position(&self) -> &OriginalPosition<D::Node> {
        &self.original
    }

    /// Problems found while resolving the activation mode.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Debounce interval for width-mode resize notifications.
    #[must_use]
    pub const fn debounce_interval(&self) -> Duration {
        self.debounce_interval
    }

    /// Width-mode notification: the viewport is now `width` px wide.
    pub fn observe_width(&mut self, dom: &mut D, width: f64) -> Result<Transition, RelocateError> {
        let Activation::MinWidth(threshold) = self.activation else {
            debug!(mode = self.activation.label(), width, "width ignored");
            return Ok(Transition::Unchanged);
        };
        let target =
            ActivationState::from_condition(Activation::width_satisfies(threshold, width));
        self.apply(dom, target)
    }

    /// Media-mode notification: the query now does (or does not) match.
    pub fn observe_media_match(
        &mut self,
        dom: &mut D,
        matches: bool,
    ) -> Result<Transition, RelocateError> {
        if !matches!(self.activation, Activation::MediaQuery(_)) {
            debug!(mode = self.activation.label(), matches, "media change ignored");
            return Ok(Transition::Unchanged);
        }
        self.apply(dom, ActivationState::from_condition(matches))
    }

    /// Transition to `target` if the current state differs.
    pub fn apply(
        &mut self,
        dom: &mut D,
        target: ActivationState,
    ) -> Result<Transition, RelocateError> {
        if target == self.state {
            return Ok(Transition::Unchanged);
        }
        match target {
            ActivationState::Moved => self.move_element(dom),
            ActivationState::NotMoved => self.reset(dom),
        }
    }

    /// Insert the element at its placement.
    ///
    /// Without a placement target this does nothing and the state stays
    /// `NotMoved`.
    pub fn move_element(&mut self, dom: &mut D) -> Result<Transition, RelocateError> {
        let Some(placement) = self.placement.as_ref() else {
            debug!("no placement target; element not moved");
            return Ok(Transition::Unchanged);
        };
        placement.insert(dom, &self.element)?;
        self.state = ActivationState::Moved;
        debug!(placement = placement.kind(), "element moved");
        self.notify(Transition::Moved);
        Ok(Transition::Moved)
    }

    /// Put the element back where it was at setup.
    pub fn reset(&mut self, dom: &mut D) -> Result<Transition, RelocateError> {
        self.original.restore(dom, &self.element)?;
        self.state = ActivationState::NotMoved;
        debug!("element restored");
        self.notify(Transition::Reset);
        Ok(Transition::Reset)
    }

    fn notify(&mut self, transition: Transition) {
        if let Some(callback) = self.on_transition.as_mut() {
            callback(transition);
        }
    }
}
