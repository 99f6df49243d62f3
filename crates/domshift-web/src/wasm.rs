#![forbid(unsafe_code)]

//! `wasm-bindgen` exports: `relocate()` and the `Relocation` handle.
//!
//! Only compiled on `wasm32` targets.
//!
//! All state of one relocation lives in a single `Rc<RefCell<Shared>>`
//! captured by the three listener closures (window `resize`, the debounce
//! `setTimeout`, the `MediaQueryList` `change`). Callbacks run to completion
//! on the UI thread, so the cell is never contended; a callback that finds
//! it borrowed drops the notification with a warning.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use core::time::Duration;

use domshift_core::{DomError, RelocateError, RelocateOptions, Relocator, Transition, Viewport};
use js_sys::{Array, Function, Reflect};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{MediaQueryList, MediaQueryListEvent, Node, Window};
use web_time::Instant;

use crate::dom::{WebDom, WebViewport};
use crate::driver::{RelocationDriver, SetupSummary};
use crate::options::parse_options;

fn console_call(method: &str, msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(func) = Reflect::get(&console, &JsValue::from_str(method)) else {
        return;
    };
    let Ok(func) = func.dyn_into::<Function>() else {
        return;
    };
    let _ = func.call1(&console, &JsValue::from_str(msg));
}

/// Report a failure that has no caller to return to.
pub(crate) fn report(context: &str, detail: &str) {
    warn!(context, detail, "domshift callback failed");
    console_call("error", &format!("domshift: {context}: {detail}"));
}

fn delay_ms(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

struct Shared {
    dom: WebDom,
    viewport: WebViewport,
    driver: RelocationDriver<WebDom>,
    origin: Instant,
    timer: Option<i32>,
}

struct MediaSubscription {
    list: MediaQueryList,
    on_change: Closure<dyn FnMut(MediaQueryListEvent)>,
}

/// A live relocation.
///
/// Keeps its listeners registered until [`Relocation::dispose`] is called
/// or the handle is freed.
#[wasm_bindgen]
pub struct Relocation {
    shared: Rc<RefCell<Shared>>,
    moved: Rc<Cell<bool>>,
    summary: SetupSummary,
    window: Window,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_timeout: Option<Closure<dyn FnMut()>>,
    media: Option<MediaSubscription>,
}

/// Move an element according to `options`; see the package README for keys.
#[wasm_bindgen(js_name = relocate)]
pub fn relocate(options: JsValue) -> Result<Relocation, JsValue> {
    let moved = Rc::new(Cell::new(false));
    let hook = Rc::clone(&moved);
    let options = parse_options(&options, move |now_moved| hook.set(now_moved))?;
    Relocation::start_with_flag(options, moved).map_err(|e| JsValue::from_str(&e.to_string()))
}

impl Relocation {
    /// Start a relocation from Rust.
    pub fn start(mut options: RelocateOptions<Node>) -> Result<Self, RelocateError> {
        let moved = Rc::new(Cell::new(false));
        let hook = Rc::clone(&moved);
        let mut user = options.on_transition.take();
        let options = options.on_transition(move |t| {
            hook.set(t == Transition::Moved);
            if let Some(callback) = user.as_mut() {
                callback(t);
            }
        });
        Self::start_with_flag(options, moved)
    }

    fn start_with_flag(
        options: RelocateOptions<Node>,
        moved: Rc<Cell<bool>>,
    ) -> Result<Self, RelocateError> {
        let window = web_sys::window()
            .ok_or_else(|| DomError::Host("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Host("window has no document".to_owned()))?;
        let mut dom = WebDom::new(document.clone());
        let viewport = WebViewport::new(window.clone(), document);

        let relocator = Relocator::new(&mut dom, &viewport, options)?;
        let driver = RelocationDriver::new(relocator);
        let summary = driver.summary();
        for diagnostic in &summary.diagnostics {
            console_call("warn", &format!("domshift: {diagnostic}"));
        }
        let wants_resize = driver.wants_resize();
        let query = driver.media_query().map(str::to_owned);

        let shared = Rc::new(RefCell::new(Shared {
            dom,
            viewport,
            driver,
            origin: Instant::now(),
            timer: None,
        }));

        let mut relocation = Self {
            shared,
            moved,
            summary,
            window,
            on_resize: None,
            on_timeout: None,
            media: None,
        };
        if wants_resize {
            relocation.listen_resize()?;
        }
        if let Some(query) = query {
            relocation.listen_media(&query)?;
        }
        Ok(relocation)
    }

    fn listen_resize(&mut self) -> Result<(), RelocateError> {
        let shared = Rc::clone(&self.shared);
        let on_timeout = Closure::<dyn FnMut()>::new(move || {
            let Ok(mut guard) = shared.try_borrow_mut() else {
                warn!("debounce timer fired re-entrantly; dropped");
                return;
            };
            let Shared {
                dom,
                viewport,
                driver,
                timer,
                ..
            } = &mut *guard;
            *timer = None;
            if let Err(err) = driver.on_timer(dom, viewport.width()) {
                report("resize", &err.to_string());
            }
        });

        let shared = Rc::clone(&self.shared);
        let window = self.window.clone();
        let timeout_fn: Function = on_timeout.as_ref().unchecked_ref::<Function>().clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let Ok(mut guard) = shared.try_borrow_mut() else {
                warn!("resize fired re-entrantly; dropped");
                return;
            };
            let now = guard.origin.elapsed();
            let Some(delay) = guard.driver.on_resize(now) else {
                return;
            };
            if let Some(handle) = guard.timer.take() {
                window.clear_timeout_with_handle(handle);
            }
            match window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&timeout_fn, delay_ms(delay))
            {
                Ok(handle) => guard.timer = Some(handle),
                Err(err) => report("setTimeout", &crate::dom::js_message(&err)),
            }
        });

        self.window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(|e| RelocateError::Dom(crate::dom::dom_error(&e)))?;
        self.on_resize = Some(on_resize);
        self.on_timeout = Some(on_timeout);
        Ok(())
    }

    fn listen_media(&mut self, query: &str) -> Result<(), RelocateError> {
        let list = self
            .window
            .match_media(query)
            .map_err(|e| RelocateError::Dom(crate::dom::dom_error(&e)))?
            .ok_or_else(|| DomError::Host(format!("matchMedia({query}) returned null")))?;

        let shared = Rc::clone(&self.shared);
        let on_change =
            Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
                let Ok(mut guard) = shared.try_borrow_mut() else {
                    warn!("media change fired re-entrantly; dropped");
                    return;
                };
                let Shared { dom, driver, .. } = &mut *guard;
                if let Err(err) = driver.on_media_change(dom, event.matches()) {
                    report("media change", &err.to_string());
                }
            });
        list.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
            .map_err(|e| RelocateError::Dom(crate::dom::dom_error(&e)))?;
        self.media = Some(MediaSubscription { list, on_change });
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(on_resize) = self.on_resize.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        }
        if let Some(media) = self.media.take() {
            let _ = media
                .list
                .remove_event_listener_with_callback("change", media.on_change.as_ref().unchecked_ref());
        }
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            if let Some(handle) = shared.timer.take() {
                self.window.clear_timeout_with_handle(handle);
            }
            shared.driver.dispose();
        }
        self.on_timeout = None;
    }
}

#[wasm_bindgen]
impl Relocation {
    /// Whether the element is currently at its moved position.
    #[wasm_bindgen(js_name = isMoved)]
    pub fn is_moved(&self) -> bool {
        self.moved.get()
    }

    /// `"media-query"`, `"min-width"` or `"unconditional"`.
    #[wasm_bindgen(js_name = activationMode)]
    pub fn activation_mode(&self) -> String {
        self.summary.mode.to_owned()
    }

    /// Fallback notices recorded at setup (e.g. an unsupported media query).
    pub fn diagnostics(&self) -> Array {
        self.summary
            .diagnostics
            .iter()
            .map(|d| JsValue::from_str(d))
            .collect()
    }

    /// Remove all listeners and cancel a pending resize evaluation.
    ///
    /// The element stays where it is. Calling this twice is harmless.
    pub fn dispose(&mut self) {
        self.detach();
    }
}

impl Drop for Relocation {
    fn drop(&mut self) {
        self.detach();
    }
}
