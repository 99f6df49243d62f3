#![forbid(unsafe_code)]

//! In-memory document tree.
//!
//! [`MemoryDom`] is an arena of nodes addressed by [`NodeId`]. It models
//! just enough of the DOM for relocation: element/text/document nodes,
//! ordered children, attributes, inline style and text content. It enforces
//! the two insertion rules the browser enforces (no cycles, reference must
//! be a child of the parent) and counts successful insertions so tests can
//! assert that repeated notifications do not touch the tree.
//!
//! A fresh document is `#document > html > (head, body)`.

use std::collections::BTreeMap;

use crate::dom::DomTree;
use crate::error::DomError;

/// Handle to a node inside a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Document,
    Element(String),
    Text,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
        }
    }
}

/// Arena-backed document.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    body: NodeId,
    mutations: u64,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    const ROOT: NodeId = NodeId(0);

    /// Create `#document > html > (head, body)`.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = vec![NodeData::new(NodeKind::Document)];
        let mut push = |parent: NodeId, tag: &str| {
            let id = NodeId(nodes.len());
            let mut data = NodeData::new(NodeKind::Element(tag.to_owned()));
            data.parent = Some(parent);
            nodes.push(data);
            nodes[parent.0].children.push(id);
            id
        };
        let html = push(Self::ROOT, "html");
        let _head = push(html, "head");
        let body = push(html, "body");
        Self {
            nodes,
            body,
            mutations: 0,
        }
    }

    /// The `#document` node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn body_id(&self) -> NodeId {
        self.body
    }

    /// Number of successful insertions since construction.
    #[must_use]
    pub const fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut data = NodeData::new(NodeKind::Text);
        data.text = text.to_owned();
        self.nodes.push(data);
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append_new(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(tag)?;
        self.append_child(&parent, &id)?;
        Ok(id)
    }

    /// Create an element with an `id` attribute and append it to `parent`.
    pub fn append_new_with_id(
        &mut self,
        parent: NodeId,
        tag: &str,
        id_attr: &str,
    ) -> Result<NodeId, DomError> {
        let id = self.append_new(parent, tag)?;
        self.set_attribute(&id, "id", id_attr)?;
        Ok(id)
    }

    /// Detach `node` from its parent. Detaching a detached node is a no-op.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.get(node)?;
        self.detach(node);
        Ok(())
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |data| data.children.as_slice())
    }

    /// Position of `node` among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.nodes.get(node.0)?.parent?;
        self.nodes[parent.0].children.iter().position(|&c| c == node)
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(tag) => Some(tag.as_str()),
            NodeKind::Document | NodeKind::Text => None,
        }
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.text.as_str())
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes.get(node.0)?.style.get(property).map(String::as_str)
    }

    /// Every connected node carrying `id="{id}"`, in tree order.
    #[must_use]
    pub fn all_by_id(&self, id: &str) -> Vec<NodeId> {
        self.tree_order()
            .into_iter()
            .filter(|&node| {
                self.nodes[node.0]
                    .attributes
                    .get("id")
                    .is_some_and(|value| value == id)
            })
            .collect()
    }

    /// Compact rendering of the subtree at `node`, e.g. `body(main#m(p),aside)`.
    ///
    /// Text nodes render as `"…"`; elements as `tag` or `tag#id`.
    #[must_use]
    pub fn outline(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_outline(node, &mut out);
        out
    }

    fn write_outline(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            NodeKind::Document => out.push_str("#document"),
            NodeKind::Text => {
                out.push('"');
                out.push_str(&data.text);
                out.push('"');
                return;
            }
            NodeKind::Element(tag) => {
                out.push_str(tag);
                if let Some(id) = data.attributes.get("id") {
                    out.push('#');
                    out.push_str(id);
                }
            }
        }
        if data.children.is_empty() {
            return;
        }
        out.push('(');
        for (idx, &child) in data.children.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            self.write_outline(child, out);
        }
        out.push(')');
    }

    fn get(&self, node: NodeId) -> Result<&NodeData, DomError> {
        self.nodes
            .get(node.0)
            .ok_or_else(|| DomError::Host(format!("unknown node {}", node.0)))
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| DomError::Host(format!("unknown node {}", node.0)))
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// `candidate` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.nodes[current.0].parent;
        }
        false
    }

    fn tree_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        order
    }
}

impl DomTree for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.nodes[parent.0].children;
        let idx = siblings.iter().position(|c| c == node)?;
        siblings.get(idx + 1).copied()
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.children.first().copied()
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.nodes.get(node.0).is_some() && self.is_inclusive_ancestor(Self::ROOT, *node)
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        node: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), DomError> {
        let parent_data = self.get(*parent)?;
        if parent_data.kind == NodeKind::Text {
            return Err(DomError::HierarchyRequest);
        }
        self.get(*node)?;
        if *node == Self::ROOT || self.is_inclusive_ancestor(*node, *parent) {
            return Err(DomError::HierarchyRequest);
        }

        let mut reference = reference.copied();
        if let Some(r) = reference {
            if self.parent(&r) != Some(*parent) {
                return Err(DomError::NotFound);
            }
        }
        // Inserting a node before itself anchors on its next sibling instead.
        if reference == Some(*node) {
            reference = self.next_sibling(node);
        }

        self.detach(*node);
        let children = &mut self.nodes[parent.0].children;
        let at = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        children.insert(at, *node);
        self.nodes[node.0].parent = Some(*parent);
        self.mutations += 1;
        Ok(())
    }

    fn body(&self) -> Option<NodeId> {
        self.is_connected(&self.body).then_some(self.body)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.all_by_id(id).into_iter().next()
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() {
            return Err(DomError::Host("empty tag name".to_owned()));
        }
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(NodeData::new(NodeKind::Element(tag.to_ascii_lowercase())));
        Ok(id)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.get(node.0)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let data = self.get_mut(*node)?;
        if !matches!(data.kind, NodeKind::Element(_)) {
            return Err(DomError::Host("attributes require an element".to_owned()));
        }
        data.attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        self.get_mut(*node)?.text = text.to_owned();
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let data = self.get_mut(*node)?;
        if !matches!(data.kind, NodeKind::Element(_)) {
            return Err(DomError::Host("style requires an element".to_owned()));
        }
        data.style.insert(property.to_owned(), value.to_owned());
        Ok(())
    }
}
