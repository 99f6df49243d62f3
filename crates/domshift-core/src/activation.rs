#![forbid(unsafe_code)]

//! Choosing the activation mode for a relocation.
//!
//! Resolution order:
//! 1. Media query, when requested, non-empty and supported by the host.
//! 2. Width threshold, when configured and finite.
//! 3. Unconditional move.
//!
//! A requested but unusable media query, or an unusable threshold, falls
//! through to the next mode and leaves a [`Diagnostic`] behind.

use tracing::warn;

use crate::settings::RelocateSettings;
use crate::viewport::Viewport;

/// Resolved activation mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Moved while the query matches.
    MediaQuery(String),
    /// Moved while the viewport is strictly wider than the threshold.
    MinWidth(f64),
    /// Moved once at setup.
    Unconditional,
}

impl Activation {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MediaQuery(_) => "media-query",
            Self::MinWidth(_) => "min-width",
            Self::Unconditional => "unconditional",
        }
    }

    /// Whether a viewport of `width` satisfies a `MinWidth` activation.
    #[must_use]
    pub fn width_satisfies(threshold: f64, width: f64) -> bool {
        width > threshold
    }
}

/// Non-fatal problem found while setting up a relocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Media-query mode was requested with an empty query string.
    EmptyMediaQuery,
    /// The host did not recognise the query.
    InvalidMediaQuery { query: String },
    /// The threshold is NaN or infinite.
    InvalidThreshold { value: f64 },
    /// A conditional mode resolved but no placement target was given; the
    /// element stays where it is.
    MissingPlacement,
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyMediaQuery => {
                f.write_str("useMediaQuery is set but mediaQueryString is empty")
            }
            Self::InvalidMediaQuery { query } => {
                write!(f, "media query {query:?} is not supported by the host")
            }
            Self::InvalidThreshold { value } => {
                write!(f, "activation threshold {value} is not a finite number")
            }
            Self::MissingPlacement => {
                f.write_str("no before/after/prependTo/appendTo target was given")
            }
        }
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub activation: Activation,
    /// Initial match state, present for [`Activation::MediaQuery`].
    pub initial_match: Option<bool>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve the activation mode for `settings` against `viewport`.
pub fn resolve<V: Viewport + ?Sized>(settings: &RelocateSettings, viewport: &V) -> Resolution {
    let mut diagnostics = Vec::new();

    if settings.use_media_query {
        let query = settings.media_query_string.trim();
        if query.is_empty() {
            diagnostics.push(Diagnostic::EmptyMediaQuery);
        } else {
            let state = viewport.match_media(query);
            if state.is_supported() {
                return Resolution {
                    activation: Activation::MediaQuery(query.to_owned()),
                    initial_match: Some(state.matches),
                    diagnostics,
                };
            }
            diagnostics.push(Diagnostic::InvalidMediaQuery {
                query: query.to_owned(),
            });
        }
    }

    let activation = match settings.activation_threshold {
        Some(value) if value.is_finite() => Activation::MinWidth(value),
        Some(value) => {
            diagnostics.push(Diagnostic::InvalidThreshold { value });
            Activation::Unconditional
        }
        None => Activation::Unconditional,
    };

    for diagnostic in &diagnostics {
        warn!(mode = activation.label(), "{diagnostic}; falling back");
    }

    Resolution {
        activation,
        initial_match: None,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::SimulatedViewport;

    fn settings(threshold: Option<f64>, media: Option<&str>) -> RelocateSettings {
        RelocateSettings {
            activation_threshold: threshold,
            use_media_query: media.is_some(),
            media_query_string: media.unwrap_or_default().to_owned(),
            ..RelocateSettings::default()
        }
    }

    #[test]
    fn media_query_wins_when_supported() {
        let vp = SimulatedViewport::new(1024.0);
        let res = resolve(&settings(Some(600.0), Some("(min-width: 800px)")), &vp);
        assert_eq!(
            res.activation,
            Activation::MediaQuery("(min-width: 800px)".into())
        );
        assert_eq!(res.initial_match, Some(true));
        assert!(res.diagnostics.is_empty());
    }

    #[test]
    fn unsupported_query_falls_back_to_width() {
        let vp = SimulatedViewport::new(1024.0);
        let res = resolve(&settings(Some(600.0), Some("(hover: maybe)")), &vp);
        assert_eq!(res.activation, Activation::MinWidth(600.0));
        assert_eq!(
            res.diagnostics,
            vec![Diagnostic::InvalidMediaQuery {
                query: "(hover: maybe)".into()
            }]
        );
    }

    #[test]
    fn empty_query_without_threshold_is_unconditional() {
        let vp = SimulatedViewport::new(1024.0);
        let res = resolve(&settings(None, Some("  ")), &vp);
        assert_eq!(res.activation, Activation::Unconditional);
        assert_eq!(res.diagnostics, vec![Diagnostic::EmptyMediaQuery]);
    }

    #[test]
    fn query_string_is_ignored_unless_requested() {
        let vp = SimulatedViewport::new(1024.0);
        let mut s = settings(Some(900.0), None);
        s.media_query_string = "(min-width: 1px)".into();
        assert_eq!(resolve(&s, &vp).activation, Activation::MinWidth(900.0));
    }

    #[test]
    fn nan_threshold_is_diagnosed() {
        let vp = SimulatedViewport::new(1024.0);
        let res = resolve(&settings(Some(f64::NAN), None), &vp);
        assert_eq!(res.activation, Activation::Unconditional);
        assert!(matches!(
            res.diagnostics.as_slice(),
            [Diagnostic::InvalidThreshold { .. }]
        ));
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!Activation::width_satisfies(800.0, 800.0));
        assert!(Activation::width_satisfies(800.0, 800.5));
    }
}
