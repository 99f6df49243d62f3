#![forbid(unsafe_code)]

//! Where an element goes when moved, and where it came from.

use crate::dom::DomTree;
use crate::error::{DetachedRole, RelocateError};

/// Insertion point for the moved element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement<N> {
    /// Immediately before the reference node.
    Before(N),
    /// Immediately after the reference node.
    After(N),
    /// As the first child of the container.
    PrependTo(N),
    /// As the last child of the container.
    AppendTo(N),
}

impl<N> Placement<N> {
    /// Pick a placement from a loose options bag.
    ///
    /// Priority is `before`, then `after`, then `prepend_to`, then `append_to`.
    #[must_use]
    pub fn from_candidates(
        before: Option<N>,
        after: Option<N>,
        prepend_to: Option<N>,
        append_to: Option<N>,
    ) -> Option<Self> {
        before
            .map(Self::Before)
            .or_else(|| after.map(Self::After))
            .or_else(|| prepend_to.map(Self::PrependTo))
            .or_else(|| append_to.map(Self::AppendTo))
    }

    /// The reference node or container.
    #[must_use]
    pub const fn target(&self) -> &N {
        match self {
            Self::Before(n) | Self::After(n) | Self::PrependTo(n) | Self::AppendTo(n) => n,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Before(_) => "before",
            Self::After(_) => "after",
            Self::PrependTo(_) => "prependTo",
            Self::AppendTo(_) => "appendTo",
        }
    }

    /// Insert `element` at this placement.
    pub fn insert<D>(&self, dom: &mut D, element: &N) -> Result<(), RelocateError>
    where
        D: DomTree<Node = N>,
        N: Clone + PartialEq + core::fmt::Debug,
    {
        match self {
            Self::Before(reference) => {
                let parent = dom
                    .parent(reference)
                    .ok_or(RelocateError::DetachedNode(DetachedRole::PlacementReference))?;
                dom.insert_before(&parent, element, Some(reference))?;
            }
            Self::After(reference) => {
                let parent = dom
                    .parent(reference)
                    .ok_or(RelocateError::DetachedNode(DetachedRole::PlacementReference))?;
                let next = dom.next_sibling(reference);
                dom.insert_before(&parent, element, next.as_ref())?;
            }
            Self::PrependTo(container) => {
                let first = dom.first_child(container);
                dom.insert_before(container, element, first.as_ref())?;
            }
            Self::AppendTo(container) => dom.append_child(container, element)?,
        }
        Ok(())
    }
}

/// Parent and next sibling of the element at setup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition<N> {
    pub parent: N,
    /// `None` when the element was the last child.
    pub next_sibling: Option<N>,
}

impl<N: Clone + PartialEq + core::fmt::Debug> OriginalPosition<N> {
    /// Record where `element` currently sits.
    pub fn capture<D: DomTree<Node = N>>(dom: &D, element: &N) -> Result<Self, RelocateError> {
        let parent = dom
            .parent(element)
            .ok_or(RelocateError::DetachedNode(DetachedRole::Element))?;
        Ok(Self {
            parent,
            next_sibling: dom.next_sibling(element),
        })
    }

    /// Put `element` back at the captured position.
    ///
    /// Fails without touching the tree when the original parent left the
    /// document or the original sibling left the original parent.
    pub fn restore<D: DomTree<Node = N>>(&self, dom: &mut D, element: &N) -> Result<(), RelocateError> {
        if !dom.is_connected(&self.parent) {
            return Err(RelocateError::DetachedNode(DetachedRole::OriginalParent));
        }
        match &self.next_sibling {
            Some(sibling) => {
                if dom.parent(sibling).as_ref() != Some(&self.parent) {
                    return Err(RelocateError::DetachedNode(DetachedRole::OriginalSibling));
                }
                dom.insert_before(&self.parent, element, Some(sibling))?;
            }
            None => dom.append_child(&self.parent, element)?,
        }
        Ok(())
    }

    /// Whether `element` is currently at this position.
    pub fn holds<D: DomTree<Node = N>>(&self, dom: &D, element: &N) -> bool {
        dom.parent(element).as_ref() == Some(&self.parent)
            && dom.next_sibling(element) == self.next_sibling
    }
}
