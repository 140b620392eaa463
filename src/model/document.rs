//! XMI document loading.
//!
//! A single streaming pass over the document builds the node arena and
//! collects every `xmlns:` declaration into the namespace map. Nodes are
//! assigned ids in document order and each node records the end of its
//! subtree, so descendant traversal is a contiguous arena range.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::node::{Node, NodeId};
use super::query::PathExpr;
use crate::error::ModelError;

/// Mapping from namespace prefix to URI, discovered once per load.
///
/// The empty-string key holds the default namespace when one is declared.
pub type NamespaceMap = IndexMap<String, String>;

/// A loaded model document: arena tree plus namespace map.
#[derive(Clone, Debug, Default)]
pub struct ModelDocument {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    namespaces: NamespaceMap,
}

impl ModelDocument {
    /// Parse a document from raw bytes.
    pub fn parse(input: &[u8]) -> Result<Self, ModelError> {
        DocumentBuilder::new().build(input)
    }

    /// Parse a document from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// The namespace map discovered during loading.
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Root element ids in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of element nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Access a node by id.
    ///
    /// Ids only ever come from this document's own arena, so the lookup
    /// is infallible.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// All nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Strict descendants of `scope` in document order, or every node
    /// when `scope` is `None`.
    pub fn descendants(&self, scope: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        let range = match scope {
            Some(id) => (id.0 + 1)..self.node(id).subtree_end,
            None => 0..self.nodes.len() as u32,
        };
        range.map(NodeId)
    }

    /// Execute a path expression, returning matches in document order.
    ///
    /// An unparseable expression or an undeclared namespace prefix in the
    /// expression is a structural error, never an empty result.
    pub fn query(&self, path: &str, scope: Option<NodeId>) -> Result<Vec<NodeId>, ModelError> {
        let expr = PathExpr::parse(path)?;
        expr.execute(self, scope)
    }

    /// Execute a path expression, returning the first match if any.
    pub fn query_one(
        &self,
        path: &str,
        scope: Option<NodeId>,
    ) -> Result<Option<NodeId>, ModelError> {
        Ok(self.query(path, scope)?.into_iter().next())
    }

    /// Resolve a namespace prefix to its URI.
    pub(crate) fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(|uri| uri.as_str())
    }
}

/// Streaming builder shared by [`ModelDocument::parse`].
struct DocumentBuilder {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    namespaces: NamespaceMap,
    /// Open-element stack of arena ids.
    stack: Vec<NodeId>,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            namespaces: NamespaceMap::new(),
            stack: Vec::new(),
        }
    }

    fn build(mut self, input: &[u8]) -> Result<ModelDocument, ModelError> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => self.open_element(e)?,
                Ok(Event::Empty(ref e)) => {
                    self.open_element(e)?;
                    self.close_element();
                }
                Ok(Event::End(_)) => self.close_element(),
                Ok(Event::Text(ref t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ModelError::xml(format!("text error: {e}")))?;
                    self.attach_text(&text);
                }
                Ok(Event::CData(ref c)) => {
                    let text = String::from_utf8_lossy(c).into_owned();
                    self.attach_text(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ModelError::xml(format!(
                        "parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(ModelDocument {
            nodes: self.nodes,
            roots: self.roots,
            namespaces: self.namespaces,
        })
    }

    fn open_element(&mut self, e: &BytesStart<'_>) -> Result<(), ModelError> {
        let name = e.name();
        let tag = std::str::from_utf8(name.as_ref())
            .map_err(|e| ModelError::xml(format!("invalid tag name: {e}")))?;

        let parent = self.stack.last().copied();
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node::new(Arc::from(tag), parent);

        for attr_result in e.attributes() {
            let attr =
                attr_result.map_err(|e| ModelError::xml(format!("attribute error: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ModelError::xml(format!("attribute key error: {e}")))?;
            let value = attr
                .unescape_value()
                .map_err(|e| ModelError::xml(format!("attribute value error: {e}")))?;

            // Namespace declarations feed the map (first declaration of a
            // prefix wins); everything else lands on the node.
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.namespaces
                    .entry(prefix.to_string())
                    .or_insert_with(|| value.to_string());
            } else if key == "xmlns" {
                self.namespaces
                    .entry(String::new())
                    .or_insert_with(|| value.to_string());
            } else {
                node.attributes
                    .insert(Arc::from(key), Arc::from(value.as_ref()));
            }
        }

        match parent {
            Some(parent_id) => self.nodes[parent_id.index()].children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(node);
        self.stack.push(id);
        Ok(())
    }

    fn close_element(&mut self) {
        if let Some(id) = self.stack.pop() {
            self.nodes[id.index()].subtree_end = self.nodes.len() as u32;
        }
    }

    fn attach_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&id) = self.stack.last() {
            let node = &mut self.nodes[id.index()];
            if node.text.is_none() {
                node.text = Some(Arc::from(text));
            }
        }
    }
}
