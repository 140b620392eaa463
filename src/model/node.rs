//! Arena nodes for the loaded model tree.

use indexmap::IndexMap;
use std::sync::Arc;

/// Index of a node in its owning [`ModelDocument`] arena.
///
/// Ids are assigned in document order (pre-order), so sorting ids sorts
/// nodes into document order.
///
/// [`ModelDocument`]: super::ModelDocument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single element node. Read-only after load.
#[derive(Clone, Debug)]
pub struct Node {
    /// Tag as written in the document, possibly `prefix:local`.
    pub tag: Arc<str>,
    /// Attributes in document order.
    pub attributes: IndexMap<Arc<str>, Arc<str>>,
    /// Child element ids in document order.
    pub children: Vec<NodeId>,
    /// Owning element (None for root elements).
    pub parent: Option<NodeId>,
    /// Text content directly inside this element, if any.
    pub text: Option<Arc<str>>,
    /// One past the last arena index of this node's subtree.
    pub(crate) subtree_end: u32,
}

impl Node {
    pub(crate) fn new(tag: Arc<str>, parent: Option<NodeId>) -> Self {
        Self {
            tag,
            attributes: IndexMap::new(),
            children: Vec::new(),
            parent,
            text: None,
            subtree_end: 0,
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_ref())
    }

    /// The `name` attribute, the display name of most model elements.
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// The namespace prefix of the tag, if the tag is qualified.
    pub fn prefix(&self) -> Option<&str> {
        self.tag.split_once(':').map(|(p, _)| p)
    }

    /// The tag without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.tag
            .split_once(':')
            .map(|(_, l)| l)
            .unwrap_or(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_local_name() {
        let node = Node::new(Arc::from("UMLFairness:critical"), None);
        assert_eq!(node.prefix(), Some("UMLFairness"));
        assert_eq!(node.local_name(), "critical");

        let plain = Node::new(Arc::from("packagedElement"), None);
        assert_eq!(plain.prefix(), None);
        assert_eq!(plain.local_name(), "packagedElement");
    }

    #[test]
    fn test_attr_lookup() {
        let mut node = Node::new(Arc::from("ownedAttribute"), None);
        node.attributes
            .insert(Arc::from("name"), Arc::from("age"));
        assert_eq!(node.name(), Some("age"));
        assert_eq!(node.attr("isDerived"), None);
    }
}
