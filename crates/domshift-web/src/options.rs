#![forbid(unsafe_code)]

//! Decoding the JS options bag passed to `relocate()`.
//!
//! Each key is read independently: a present value of the right type wins,
//! an absent (`undefined`/`null`) value falls back to the default, and a
//! present value of the wrong type is an error. The keys used by older
//! releases (`el`, `minWidth`, `refreshRate`) are accepted as aliases.

use domshift_core::settings::DEFAULT_DEBOUNCE_INTERVAL_MS;
use domshift_core::{Placement, RelocateOptions, RelocateSettings, Transition};
use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Node;

fn get_present(obj: &JsValue, key: &str) -> Result<Option<JsValue>, JsValue> {
    let v = Reflect::get(obj, &JsValue::from_str(key))?;
    if v.is_null() || v.is_undefined() {
        return Ok(None);
    }
    Ok(Some(v))
}

fn get_present_any(obj: &JsValue, keys: &[&str]) -> Result<Option<(JsValue, String)>, JsValue> {
    for key in keys {
        if let Some(v) = get_present(obj, key)? {
            return Ok(Some((v, (*key).to_owned())));
        }
    }
    Ok(None)
}

fn get_node_opt(obj: &JsValue, keys: &[&str]) -> Result<Option<Node>, JsValue> {
    let Some((v, key)) = get_present_any(obj, keys)? else {
        return Ok(None);
    };
    v.dyn_into::<Node>()
        .map(Some)
        .map_err(|_| JsValue::from_str(&format!("field {key} must be a DOM node")))
}

fn get_f64_opt(obj: &JsValue, keys: &[&str]) -> Result<Option<f64>, JsValue> {
    let Some((v, key)) = get_present_any(obj, keys)? else {
        return Ok(None);
    };
    v.as_f64()
        .map(Some)
        .ok_or_else(|| JsValue::from_str(&format!("field {key} must be a number")))
}

fn get_u32_opt(obj: &JsValue, keys: &[&str]) -> Result<Option<u32>, JsValue> {
    let Some((v, key)) = get_present_any(obj, keys)? else {
        return Ok(None);
    };
    let n = v
        .as_f64()
        .ok_or_else(|| JsValue::from_str(&format!("field {key} must be a number")))?;
    check_u32(n)
        .map(Some)
        .ok_or_else(|| JsValue::from_str(&format!("field {key} must be a non-negative integer")))
}

fn check_u32(n: f64) -> Option<u32> {
    if !n.is_finite() || n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

fn get_bool_opt(obj: &JsValue, key: &str) -> Result<Option<bool>, JsValue> {
    let Some(v) = get_present(obj, key)? else {
        return Ok(None);
    };
    v.as_bool()
        .map(Some)
        .ok_or_else(|| JsValue::from_str(&format!("field {key} must be a boolean")))
}

fn get_string_opt(obj: &JsValue, key: &str) -> Result<Option<String>, JsValue> {
    let Some(v) = get_present(obj, key)? else {
        return Ok(None);
    };
    v.as_string()
        .map(Some)
        .ok_or_else(|| JsValue::from_str(&format!("field {key} must be a string")))
}

fn get_function_opt(obj: &JsValue, key: &str) -> Result<Option<Function>, JsValue> {
    let Some(v) = get_present(obj, key)? else {
        return Ok(None);
    };
    v.dyn_into::<Function>()
        .map(Some)
        .map_err(|_| JsValue::from_str(&format!("field {key} must be a function")))
}

/// Scalar settings from the options bag.
pub(crate) fn parse_settings(obj: &JsValue) -> Result<RelocateSettings, JsValue> {
    Ok(RelocateSettings {
        activation_threshold: get_f64_opt(obj, &["activationThreshold", "minWidth"])?,
        debounce_interval_ms: get_u32_opt(obj, &["debounceIntervalMs", "refreshRate"])?
            .unwrap_or(DEFAULT_DEBOUNCE_INTERVAL_MS),
        use_media_query: get_bool_opt(obj, "useMediaQuery")?.unwrap_or(false),
        media_query_string: get_string_opt(obj, "mediaQueryString")?.unwrap_or_default(),
    })
}

/// Full options. `moved_hook` runs on every transition, before `onChange`.
pub(crate) fn parse_options(
    obj: &JsValue,
    moved_hook: impl Fn(bool) + 'static,
) -> Result<RelocateOptions<Node>, JsValue> {
    if !obj.is_object() {
        return Err(JsValue::from_str("relocate options must be an object"));
    }

    let element = get_node_opt(obj, &["element", "el"])?;
    let placement = Placement::from_candidates(
        get_node_opt(obj, &["before"])?,
        get_node_opt(obj, &["after"])?,
        get_node_opt(obj, &["prependTo"])?,
        get_node_opt(obj, &["appendTo"])?,
    );
    let settings = parse_settings(obj)?;
    let on_change = get_function_opt(obj, "onChange")?;

    let options = RelocateOptions {
        element,
        placement,
        settings,
        on_transition: None,
    };
    Ok(options.on_transition(move |transition| {
        let moved = match transition {
            Transition::Moved => true,
            Transition::Reset => false,
            Transition::Unchanged => return,
        };
        moved_hook(moved);
        if let Some(callback) = on_change.as_ref() {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_bool(moved)) {
                crate::wasm::report("onChange callback threw", &crate::dom::js_message(&err));
            }
        }
    }))
}
