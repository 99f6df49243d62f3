#![forbid(unsafe_code)]

//! Error types for relocation setup and DOM mutation.

/// A host DOM call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The insertion would make a node its own ancestor (`HierarchyRequestError`).
    HierarchyRequest,
    /// The reference node is not a child of the target parent (`NotFoundError`).
    NotFound,
    /// The document has no `<body>`.
    MissingBody,
    /// Any other failure reported by the host, carrying its message.
    Host(String),
}

impl core::fmt::Display for DomError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::HierarchyRequest => f.write_str("node cannot be inserted into its own subtree"),
            Self::NotFound => f.write_str("reference node is not a child of the parent"),
            Self::MissingBody => f.write_str("document has no body"),
            Self::Host(msg) => write!(f, "host DOM error: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Invalid caller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No element to move was supplied.
    MissingElement,
    /// None of `before`, `after`, `prependTo`, `appendTo` was supplied.
    MissingPlacement,
    /// Scalar settings could not be decoded.
    InvalidSettings(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElement => f.write_str("no element to move was supplied"),
            Self::MissingPlacement => {
                f.write_str("no placement target (before, after, prependTo, appendTo) was supplied")
            }
            Self::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which node was found detached from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetachedRole {
    /// The element to move had no parent at setup.
    Element,
    /// The captured original parent is no longer in the document.
    OriginalParent,
    /// The captured original next sibling left the original parent.
    OriginalSibling,
    /// A `before`/`after` reference node has no parent.
    PlacementReference,
}

impl DetachedRole {
    /// Stable label used in logs and JS diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::OriginalParent => "original-parent",
            Self::OriginalSibling => "original-sibling",
            Self::PlacementReference => "placement-reference",
        }
    }
}

/// Errors surfaced by relocation setup and transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocateError {
    Config(ConfigError),
    /// A node required by the operation is detached; nothing was mutated.
    DetachedNode(DetachedRole),
    Dom(DomError),
}

impl core::fmt::Display for RelocateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::DetachedNode(role) => write!(f, "detached node: {}", role.as_str()),
            Self::Dom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RelocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Dom(err) => Some(err),
            Self::DetachedNode(_) => None,
        }
    }
}

impl From<ConfigError> for RelocateError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DomError> for RelocateError {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_detached_role() {
        let err = RelocateError::DetachedNode(DetachedRole::OriginalParent);
        assert_eq!(err.to_string(), "detached node: original-parent");
    }

    #[test]
    fn config_errors_chain_as_source() {
        use std::error::Error;
        let err = RelocateError::from(ConfigError::MissingElement);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no element"));
    }
}
