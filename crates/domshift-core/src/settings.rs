#![forbid(unsafe_code)]

//! Relocation configuration.
//!
//! Configuration is split in two. [`RelocateSettings`] holds the scalar
//! options and can be decoded from JSON; every field falls back to its
//! documented default when absent. [`RelocateOptions`] adds the node
//! references and the optional transition callback, which only exist on
//! the host side.

use core::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::placement::Placement;
use crate::relocator::Transition;

/// Default width-mode debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_INTERVAL_MS: u32 = 200;

/// Scalar relocation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelocateSettings {
    /// Viewport width in CSS px above which the element is moved.
    pub activation_threshold: Option<f64>,
    pub debounce_interval_ms: u32,
    pub use_media_query: bool,
    pub media_query_string: String,
}

impl Default for RelocateSettings {
    fn default() -> Self {
        Self {
            activation_threshold: None,
            debounce_interval_ms: DEFAULT_DEBOUNCE_INTERVAL_MS,
            use_media_query: false,
            media_query_string: String::new(),
        }
    }
}

impl RelocateSettings {
    /// Decode settings from a JSON object. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
    }

    #[must_use]
    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_interval_ms))
    }
}

/// Callback invoked after every transition that mutated the tree.
pub type TransitionCallback = Box<dyn FnMut(Transition)>;

/// Full relocation request.
pub struct RelocateOptions<N> {
    pub element: Option<N>,
    pub placement: Option<Placement<N>>,
    pub settings: RelocateSettings,
    pub on_transition: Option<TransitionCallback>,
}

impl<N> Default for RelocateOptions<N> {
    fn default() -> Self {
        Self {
            element: None,
            placement: None,
            settings: RelocateSettings::default(),
            on_transition: None,
        }
    }
}

impl<N: core::fmt::Debug> core::fmt::Debug for RelocateOptions<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RelocateOptions")
            .field("element", &self.element)
            .field("placement", &self.placement)
            .field("settings", &self.settings)
            .field("on_transition", &self.on_transition.is_some())
            .finish()
    }
}

impl<N> RelocateOptions<N> {
    /// Move `element` to `placement` with default settings.
    #[must_use]
    pub fn new(element: N, placement: Placement<N>) -> Self {
        Self {
            element: Some(element),
            placement: Some(placement),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RelocateSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Activate above `px` viewport width.
    #[must_use]
    pub fn with_threshold(mut self, px: f64) -> Self {
        self.settings.activation_threshold = Some(px);
        self
    }

    /// Activate while `query` matches.
    #[must_use]
    pub fn with_media_query(mut self, query: impl Into<String>) -> Self {
        self.settings.use_media_query = true;
        self.settings.media_query_string = query.into();
        self
    }

    /// Width-mode debounce; saturates at `u32::MAX` milliseconds.
    #[must_use]
    pub fn with_debounce(mut self, interval: Duration) -> Self {
        self.settings.debounce_interval_ms =
            u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
        self
    }

    #[must_use]
    pub fn on_transition(mut self, callback: impl FnMut(Transition) + 'static) -> Self {
        self.on_transition = Some(Box::new(callback));
        self
    }
}
