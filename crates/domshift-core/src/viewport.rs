#![forbid(unsafe_code)]

//! Host viewport: current width and media-query evaluation.

/// Result of evaluating a media query on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQueryState {
    /// The host's serialization of the parsed query.
    pub media: String,
    pub matches: bool,
}

impl MediaQueryState {
    /// Serialization browsers give a query they could not parse.
    pub const UNSUPPORTED_MEDIA: &'static str = "not all";

    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            media: Self::UNSUPPORTED_MEDIA.to_owned(),
            matches: false,
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.media.trim() != Self::UNSUPPORTED_MEDIA
    }
}

/// Read-only view of the host window.
pub trait Viewport {
    /// Layout viewport width in CSS pixels (`documentElement.clientWidth`).
    fn width(&self) -> f64;

    /// Evaluate `query` now.
    fn match_media(&self, query: &str) -> MediaQueryState;
}

/// Viewport with a settable width and a small media-query evaluator.
///
/// Understands `all`, `screen`, `(min-width: Npx)`, `(max-width: Npx)` and
/// their conjunction with `and`. Anything else evaluates as unsupported,
/// the same way a browser reports a query it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedViewport {
    pub width: f64,
}

impl SimulatedViewport {
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self { width }
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    fn eval_feature(&self, feature: &str) -> Option<bool> {
        let inner = feature.strip_prefix('(')?.strip_suffix(')')?;
        let (name, value) = inner.split_once(':')?;
        let px: f64 = value.trim().strip_suffix("px")?.trim().parse().ok()?;
        match name.trim() {
            "min-width" => Some(self.width >= px),
            "max-width" => Some(self.width <= px),
            _ => None,
        }
    }

    fn eval(&self, query: &str) -> Option<bool> {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return None;
        }
        let mut matches = true;
        for term in query.split(" and ") {
            let term = term.trim();
            matches &= match term {
                "all" | "screen" => true,
                _ => self.eval_feature(term)?,
            };
        }
        Some(matches)
    }
}

impl Viewport for SimulatedViewport {
    fn width(&self) -> f64 {
        self.width
    }

    fn match_media(&self, query: &str) -> MediaQueryState {
        match self.eval(query) {
            Some(matches) => MediaQueryState {
                media: query.trim().to_owned(),
                matches,
            },
            None => MediaQueryState::unsupported(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_width_queries() {
        let vp = SimulatedViewport::new(1024.0);
        assert!(vp.match_media("(min-width: 800px)").matches);
        assert!(!vp.match_media("(max-width: 800px)").matches);
        assert!(vp.match_media("screen and (min-width: 1024px)").matches);
    }

    #[test]
    fn garbage_is_not_all() {
        let vp = SimulatedViewport::new(500.0);
        let state = vp.match_media("(min-width: wide)");
        assert!(!state.is_supported());
        assert_eq!(state.media, "not all");
        assert!(!vp.match_media("").is_supported());
    }
}
