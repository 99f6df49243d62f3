#![forbid(unsafe_code)]

//! Core: breakpoint-driven DOM element relocation.
//!
//! # Role in domshift
//! `domshift-core` is the host-agnostic engine. It decides where an element
//! belongs for the current viewport and moves it there, against any tree
//! that implements [`DomTree`]. The browser binding (`domshift-web`) wires it
//! to `window` resize events, `setTimeout` and `matchMedia`; tests and other
//! hosts drive it directly with [`memory::MemoryDom`] and
//! [`viewport::SimulatedViewport`].
//!
//! # Primary responsibilities
//! - **Relocator**: the `NotMoved`/`Moved` state machine and its move/reset.
//! - **Placement**: `before`/`after`/`prependTo`/`appendTo` insertion and the
//!   captured original position.
//! - **Activation**: media query, width threshold or unconditional.
//! - **Debouncer**: host-clocked trailing-edge coalescing of resize bursts.
//! - **Announcement**: the single off-screen screen-reader notice.
//!
//! # Example
//!
//! ```
//! use domshift_core::memory::MemoryDom;
//! use domshift_core::viewport::SimulatedViewport;
//! use domshift_core::{Placement, RelocateOptions, Relocator, Transition};
//!
//! let mut dom = MemoryDom::new();
//! let body = dom.body_id();
//! let main = dom.append_new(body, "main").unwrap();
//! let nav = dom.append_new(main, "nav").unwrap();
//! let aside = dom.append_new(body, "aside").unwrap();
//!
//! let mut viewport = SimulatedViewport::new(1024.0);
//! let mut relocator = Relocator::new(
//!     &mut dom,
//!     &viewport,
//!     RelocateOptions::new(nav, Placement::AppendTo(aside)).with_threshold(800.0),
//! )
//! .unwrap();
//! assert!(relocator.is_moved());
//!
//! viewport.set_width(600.0);
//! let t = relocator.observe_width(&mut dom, viewport.width).unwrap();
//! assert_eq!(t, Transition::Reset);
//! assert_eq!(dom.children(main), &[nav]);
//! ```

pub mod activation;
pub mod announce;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod memory;
pub mod placement;
pub mod relocator;
pub mod settings;
pub mod viewport;

pub use activation::{Activation, Diagnostic};
pub use debounce::{DebounceEdge, Debouncer, SignalOutcome};
pub use dom::DomTree;
pub use error::{ConfigError, DetachedRole, DomError, RelocateError};
pub use placement::{OriginalPosition, Placement};
pub use relocator::{ActivationState, Relocator, Transition};
pub use settings::{RelocateOptions, RelocateSettings, TransitionCallback};
pub use viewport::{MediaQueryState, Viewport};
