#![forbid(unsafe_code)]

//! `web_sys` implementations of the core DOM and viewport traits.

use domshift_core::viewport::MediaQueryState;
use domshift_core::{DomError, DomTree, Viewport};
use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Node, Window};

/// Map a thrown `DOMException` (or anything else) to a [`DomError`].
pub(crate) fn dom_error(err: &JsValue) -> DomError {
    let name = Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string());
    match name.as_deref() {
        Some("HierarchyRequestError") => DomError::HierarchyRequest,
        Some("NotFoundError") => DomError::NotFound,
        _ => DomError::Host(js_message(err)),
    }
}

pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn as_element<'a>(node: &'a Node, what: &str) -> Result<&'a Element, DomError> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| DomError::Host(format!("{what} requires an element")))
}

/// The live document.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }
}

impl DomTree for WebDom {
    type Node = Node;

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn first_child(&self, node: &Node) -> Option<Node> {
        node.first_child()
    }

    fn is_connected(&self, node: &Node) -> bool {
        node.is_connected()
    }

    fn insert_before(
        &mut self,
        parent: &Node,
        node: &Node,
        reference: Option<&Node>,
    ) -> Result<(), DomError> {
        parent
            .insert_before(node, reference)
            .map(drop)
            .map_err(|e| dom_error(&e))
    }

    fn append_child(&mut self, parent: &Node, node: &Node) -> Result<(), DomError> {
        parent
            .append_child(node)
            .map(drop)
            .map_err(|e| dom_error(&e))
    }

    fn body(&self) -> Option<Node> {
        self.document.body().map(Node::from)
    }

    fn element_by_id(&self, id: &str) -> Option<Node> {
        self.document.get_element_by_id(id).map(Node::from)
    }

    fn create_element(&mut self, tag: &str) -> Result<Node, DomError> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(|e| dom_error(&e))
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        as_element(node, "set_attribute")?
            .set_attribute(name, value)
            .map_err(|e| dom_error(&e))
    }

    fn set_text(&mut self, node: &Node, text: &str) -> Result<(), DomError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_style(&mut self, node: &Node, property: &str, value: &str) -> Result<(), DomError> {
        let html = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Host("set_style requires an HTML element".to_owned()))?;
        html.style()
            .set_property(property, value)
            .map_err(|e| dom_error(&e))
    }
}

/// The browser window as a [`Viewport`].
#[derive(Debug, Clone)]
pub struct WebViewport {
    window: Window,
    document: Document,
}

impl WebViewport {
    #[must_use]
    pub const fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }
}

impl Viewport for WebViewport {
    fn width(&self) -> f64 {
        self.document
            .document_element()
            .map_or(0.0, |root| f64::from(root.client_width()))
    }

    fn match_media(&self, query: &str) -> MediaQueryState {
        match self.window.match_media(query) {
            Ok(Some(list)) => MediaQueryState {
                media: list.media(),
                matches: list.matches(),
            },
            Ok(None) | Err(_) => MediaQueryState::unsupported(),
        }
    }
}
