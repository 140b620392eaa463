//! Attribute views over `ownedAttribute` nodes.

use std::sync::Arc;

use tracing::warn;

use crate::error::ModelError;
use crate::model::{embeddable, ModelDocument, NodeId};

/// A borrowed view over one `ownedAttribute` node.
#[derive(Clone, Copy)]
pub struct AttributeView<'d> {
    doc: &'d ModelDocument,
    pub node: NodeId,
}

impl<'d> AttributeView<'d> {
    pub fn new(doc: &'d ModelDocument, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// The attribute's declared name.
    pub fn name(&self) -> Option<&'d str> {
        self.doc.node(self.node).name()
    }

    /// Whether the attribute is derived. Absence of the marker, or any
    /// value other than `"true"`, means direct.
    pub fn is_derived(&self) -> bool {
        self.doc.node(self.node).attr("isDerived") == Some("true")
    }

    /// The id of the attribute's declared type, if any.
    pub fn type_ref(&self) -> Option<&'d str> {
        self.doc.node(self.node).attr("type")
    }

    /// The fixed default value. Only derived attributes may carry one;
    /// for a direct attribute this is always `None`, as is a derived
    /// attribute without a nested `defaultValue` element.
    pub fn default_value(&self) -> Option<&'d str> {
        if !self.is_derived() {
            return None;
        }
        self.doc
            .descendants(Some(self.node))
            .map(|id| self.doc.node(id))
            .find(|node| node.tag.as_ref() == "defaultValue")
            .and_then(|node| node.name())
    }
}

/// Partition the owned attributes of a class into `(direct, derived)`.
pub fn attributes_of(
    doc: &ModelDocument,
    class: NodeId,
) -> Result<(Vec<AttributeView<'_>>, Vec<AttributeView<'_>>), ModelError> {
    let mut direct = Vec::new();
    let mut derived = Vec::new();
    for id in doc.query(".//ownedAttribute", Some(class))? {
        let view = AttributeView::new(doc, id);
        if view.is_derived() {
            derived.push(view);
        } else {
            direct.push(view);
        }
    }
    Ok((direct, derived))
}

/// Resolve a type reference to the display name of its declaration.
///
/// Lookup failures propagate as `None` rather than a guessed type; the
/// reference comes from model data, so a miss is a data defect local to
/// one attribute, never fatal.
pub fn resolve_type(doc: &ModelDocument, type_ref: &str) -> Option<Arc<str>> {
    if !embeddable(type_ref) {
        warn!(type_ref, "type reference not resolvable");
        return None;
    }
    let declaration = match doc.query_one(
        &format!(".//packagedElement[@xmi:id='{type_ref}']"),
        None,
    ) {
        Ok(found) => found,
        Err(err) => {
            warn!(type_ref, %err, "type lookup failed");
            return None;
        }
    };
    declaration
        .and_then(|id| doc.node(id).name())
        .map(Arc::from)
}
