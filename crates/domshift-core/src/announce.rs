#![forbid(unsafe_code)]

//! Screen-reader notice that the page layout may reorder.
//!
//! The notice is a single off-screen `<div id="move-helper-text">` at the
//! end of `<body>`, referenced from the body's `aria-describedby`. Every
//! relocation ensures it exists; none creates a second one.

use tracing::debug;

use crate::dom::DomTree;
use crate::error::{DomError, RelocateError};

pub const HELPER_ID: &str = "move-helper-text";

pub const HELPER_TEXT: &str = "Some areas of this page may shift around if you resize the browser window. Be sure to check heading and document order.";

const HELPER_STYLE: [(&str, &str); 3] = [
    ("position", "absolute"),
    ("top", "-999em"),
    ("left", "-999em"),
];

const DESCRIBED_BY: &str = "aria-describedby";

/// Whether [`ensure_announcement`] had to create the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    Created,
    Existing,
}

/// Make sure the helper node exists and the body points at it.
pub fn ensure_announcement<D: DomTree>(dom: &mut D) -> Result<Announcement, RelocateError> {
    let body = dom.body().ok_or(DomError::MissingBody)?;

    let outcome = if dom.element_by_id(HELPER_ID).is_some() {
        Announcement::Existing
    } else {
        let helper = dom.create_element("div")?;
        dom.set_attribute(&helper, "id", HELPER_ID)?;
        dom.set_text(&helper, HELPER_TEXT)?;
        for (property, value) in HELPER_STYLE {
            dom.set_style(&helper, property, value)?;
        }
        dom.append_child(&body, &helper)?;
        debug!(id = HELPER_ID, "accessibility notice inserted");
        Announcement::Created
    };

    let current = dom.attribute(&body, DESCRIBED_BY).unwrap_or_default();
    if !current.split_ascii_whitespace().any(|token| token == HELPER_ID) {
        let value = if current.trim().is_empty() {
            HELPER_ID.to_owned()
        } else {
            format!("{} {HELPER_ID}", current.trim())
        };
        dom.set_attribute(&body, DESCRIBED_BY, &value)?;
    }

    Ok(outcome)
}
