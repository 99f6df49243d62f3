#![forbid(unsafe_code)]

//! Browser front end for `domshift-core`.
//!
//! On `wasm32` this crate exports `relocate(options)` to JavaScript and a
//! [`Relocation`] handle that owns the `resize` / `matchMedia` listeners.
//! The listener-independent plumbing lives in [`driver`] and compiles on
//! every target so it can be tested natively.
//!
//! ```js
//! import init, { relocate } from "./pkg/domshift_web.js";
//! await init();
//! const handle = relocate({
//!   element: document.querySelector("#sidebar"),
//!   prependTo: document.querySelector("main"),
//!   activationThreshold: 768,
//!   onChange: (moved) => console.log("moved:", moved),
//! });
//! // later
//! handle.dispose();
//! ```

pub mod driver;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod options;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::{WebDom, WebViewport};
#[cfg(target_arch = "wasm32")]
pub use wasm::{Relocation, relocate};

pub use driver::RelocationDriver;
