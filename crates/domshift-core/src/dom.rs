#![forbid(unsafe_code)]

//! The DOM surface the relocator needs.
//!
//! [`DomTree`] covers exactly the calls the relocator and the announcement
//! helper make: structural reads (`parent`, `next_sibling`, `first_child`),
//! the two insertion primitives, and a handful of attribute/style writes.
//! Implementations follow the DOM's own rules, in particular the
//! pre-insertion rule that inserting a node before itself is a no-op.
//!
//! Two implementations exist: [`crate::memory::MemoryDom`] for tests and
//! non-browser hosts, and `WebDom` in `domshift-web` over `web_sys`.

use crate::error::DomError;

/// A mutable document tree.
pub trait DomTree {
    /// Cheap, clonable handle to a node. Equality is node identity.
    type Node: Clone + PartialEq + core::fmt::Debug;

    /// Parent of `node`, or `None` when detached or the root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Next sibling of `node`, or `None` when it is the last child.
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is reachable from the document root.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Insert `node` into `parent` before `reference`, or at the end when
    /// `reference` is `None`. `node` is removed from its current parent first.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        node: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), DomError>;

    fn append_child(&mut self, parent: &Self::Node, node: &Self::Node) -> Result<(), DomError> {
        self.insert_before(parent, node, None)
    }

    fn body(&self) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;

    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), DomError>;

    /// Set one inline style property (`kebab-case` name).
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str)
    -> Result<(), DomError>;
}
