//! Path-expression parsing and execution.
//!
//! Supports the fragment of path syntax the extraction pipeline uses:
//!
//! ```text
//! .//transition[@guard]
//! .//ownedRule[@xmi:id='g1']
//! .//ownedAttribute[@isDerived='true']
//! packagedElement/ownedAttribute
//! ```
//!
//! Steps are separated by `/` (child axis) or `//` (descendant axis);
//! a leading `.//` starts descendant search from the scope. A step is a
//! tag name, a `prefix:name` qualified tag, or `*`, optionally followed
//! by one attribute predicate `[@attr]` or `[@attr='value']`.
//!
//! Qualified steps resolve their prefix through the document's namespace
//! map and match nodes whose own prefix resolves to the same URI with the
//! same local name. Bare steps match raw tags exactly. A malformed
//! expression or an undeclared prefix in the expression is a structural
//! error; it indicates a defect in the caller, not in the data.

use indexmap::IndexSet;

use super::document::ModelDocument;
use super::node::{Node, NodeId};
use crate::error::ModelError;

/// Navigation axis of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

/// Tag test of a step.
#[derive(Clone, Debug, PartialEq, Eq)]
enum NameTest {
    Any,
    /// Unqualified tag, matched against the raw tag text.
    Plain(String),
    /// `prefix:local`, matched through the namespace map.
    Qualified { prefix: String, local: String },
}

/// Attribute predicate of a step.
#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrTest {
    /// `[@attr]` — the attribute exists.
    Present(String),
    /// `[@attr='value']` — the attribute has exactly this value.
    Equals(String, String),
}

#[derive(Clone, Debug)]
struct Step {
    axis: Axis,
    name: NameTest,
    predicate: Option<AttrTest>,
}

/// A parsed path expression.
#[derive(Clone, Debug)]
pub(crate) struct PathExpr {
    steps: Vec<Step>,
}

impl PathExpr {
    /// Parse an expression, rejecting anything outside the supported
    /// grammar.
    pub(crate) fn parse(path: &str) -> Result<Self, ModelError> {
        Parser { path, rest: path }.parse()
    }

    /// Execute against a document, from `scope` or the whole tree.
    ///
    /// Results are in document order without duplicates.
    pub(crate) fn execute(
        &self,
        doc: &ModelDocument,
        scope: Option<NodeId>,
    ) -> Result<Vec<NodeId>, ModelError> {
        // `None` in the context set stands for the virtual root above the
        // document's root elements.
        let mut contexts: Vec<Option<NodeId>> = vec![scope];

        for step in &self.steps {
            let mut matched: IndexSet<NodeId> = IndexSet::new();
            for ctx in &contexts {
                match step.axis {
                    Axis::Child => {
                        let children: &[NodeId] = match ctx {
                            Some(id) => &doc.node(*id).children,
                            None => doc.roots(),
                        };
                        for &child in children {
                            if step_matches(doc, doc.node(child), step)? {
                                matched.insert(child);
                            }
                        }
                    }
                    Axis::Descendant => {
                        for id in doc.descendants(*ctx) {
                            if step_matches(doc, doc.node(id), step)? {
                                matched.insert(id);
                            }
                        }
                    }
                }
            }
            let mut next: Vec<NodeId> = matched.into_iter().collect();
            next.sort();
            contexts = next.into_iter().map(Some).collect();
        }

        // The initial context is the scope itself, which a path never
        // selects; after at least one step every context is a real node.
        Ok(contexts.into_iter().flatten().collect())
    }
}

fn step_matches(doc: &ModelDocument, node: &Node, step: &Step) -> Result<bool, ModelError> {
    let name_ok = match &step.name {
        NameTest::Any => true,
        NameTest::Plain(tag) => node.tag.as_ref() == tag,
        NameTest::Qualified { prefix, local } => {
            let want_uri = doc
                .resolve_prefix(prefix)
                .ok_or_else(|| ModelError::UnknownPrefix(prefix.clone()))?;
            match node.prefix() {
                Some(node_prefix) => {
                    node.local_name() == local && doc.resolve_prefix(node_prefix) == Some(want_uri)
                }
                None => false,
            }
        }
    };
    if !name_ok {
        return Ok(false);
    }
    Ok(match &step.predicate {
        None => true,
        Some(AttrTest::Present(attr)) => node.attr(attr).is_some(),
        Some(AttrTest::Equals(attr, value)) => node.attr(attr) == Some(value.as_str()),
    })
}

/// Hand-rolled scanner over the expression text.
struct Parser<'a> {
    path: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn parse(mut self) -> Result<PathExpr, ModelError> {
        // Optional leading `.` only makes sense before `//`.
        if let Some(stripped) = self.rest.strip_prefix('.') {
            if !stripped.starts_with('/') {
                return self.fail("`.` must be followed by `/`");
            }
            self.rest = stripped;
        }

        let mut steps = Vec::new();
        let mut first = true;
        while !self.rest.is_empty() {
            let axis = if let Some(stripped) = self.rest.strip_prefix("//") {
                self.rest = stripped;
                Axis::Descendant
            } else if let Some(stripped) = self.rest.strip_prefix('/') {
                self.rest = stripped;
                Axis::Child
            } else if first {
                Axis::Child
            } else {
                return self.fail("expected `/` or `//` between steps");
            };
            first = false;

            let name = self.name_test()?;
            let predicate = self.predicate()?;
            steps.push(Step {
                axis,
                name,
                predicate,
            });
        }

        if steps.is_empty() {
            return self.fail("empty expression");
        }
        Ok(PathExpr { steps })
    }

    fn name_test(&mut self) -> Result<NameTest, ModelError> {
        if let Some(stripped) = self.rest.strip_prefix('*') {
            self.rest = stripped;
            return Ok(NameTest::Any);
        }
        let first = self.ident()?;
        if let Some(stripped) = self.rest.strip_prefix(':') {
            self.rest = stripped;
            let local = self.ident()?;
            Ok(NameTest::Qualified {
                prefix: first,
                local,
            })
        } else {
            Ok(NameTest::Plain(first))
        }
    }

    fn predicate(&mut self) -> Result<Option<AttrTest>, ModelError> {
        let Some(stripped) = self.rest.strip_prefix("[@") else {
            return Ok(None);
        };
        self.rest = stripped;
        let attr = self.attr_name()?;
        if let Some(stripped) = self.rest.strip_prefix(']') {
            self.rest = stripped;
            return Ok(Some(AttrTest::Present(attr)));
        }
        let Some(stripped) = self.rest.strip_prefix("='") else {
            return self.fail("expected `]` or `='value']` in predicate");
        };
        self.rest = stripped;
        let Some(end) = self.rest.find('\'') else {
            return self.fail("unterminated predicate value");
        };
        let value = self.rest[..end].to_string();
        self.rest = &self.rest[end + 1..];
        let Some(stripped) = self.rest.strip_prefix(']') else {
            return self.fail("expected `]` after predicate value");
        };
        self.rest = stripped;
        Ok(Some(AttrTest::Equals(attr, value)))
    }

    /// A tag-name segment (no `:`; qualification is handled by the caller).
    fn ident(&mut self) -> Result<String, ModelError> {
        let end = self
            .rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-' || c == '.'))
            .unwrap_or(self.rest.len());
        // `.` is legal mid-name but a bare `.` here is a stray token.
        if end == 0 {
            return self.fail("expected a name");
        }
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(name.to_string())
    }

    /// An attribute name, which may itself be namespace-qualified
    /// (`xmi:id`). Attribute prefixes are matched textually, as written.
    fn attr_name(&mut self) -> Result<String, ModelError> {
        let mut name = self.ident()?;
        if let Some(stripped) = self.rest.strip_prefix(':') {
            self.rest = stripped;
            name.push(':');
            name.push_str(&self.ident()?);
        }
        Ok(name)
    }

    fn fail<T>(&self, message: &str) -> Result<T, ModelError> {
        Err(ModelError::invalid_path(self.path, message))
    }
}

/// True when `value` can be embedded in an `[@attr='…']` predicate.
///
/// Callers that build expressions from model data (ids, attribute names)
/// must check this and treat a failure as a data defect on the item, not
/// as a structural error.
pub(crate) fn embeddable(value: &str) -> bool {
    !value.contains('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> ModelDocument {
        ModelDocument::parse(
            br#"<root xmlns:xmi="http://www.omg.org/XMI"
                      xmlns:UMLFairness="uri:fairness">
  <packagedElement xmi:id="c1" name="Order">
    <ownedAttribute xmi:id="a1" name="urgent"/>
    <ownedAttribute xmi:id="a2" name="age" isDerived="true"/>
    <region>
      <transition xmi:id="t1" guard="g1">
        <ownedRule xmi:id="g1" name="age &gt;= 18"/>
      </transition>
      <transition xmi:id="t2"/>
    </region>
  </packagedElement>
  <UMLFairness:critical base_StructuredClassifier="c1"/>
</root>"#,
        )
        .expect("fixture parse failed")
    }

    #[test]
    fn test_descendant_query_from_root() {
        let doc = doc();
        let hits = doc.query(".//ownedAttribute", None).expect("query failed");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_attribute_presence_predicate() {
        let doc = doc();
        let hits = doc
            .query(".//transition[@guard]", None)
            .expect("query failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(doc.node(hits[0]).attr("xmi:id"), Some("t1"));
    }

    #[test]
    fn test_attribute_equality_predicate() {
        let doc = doc();
        let hits = doc
            .query(".//ownedAttribute[@isDerived='true']", None)
            .expect("query failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(doc.node(hits[0]).name(), Some("age"));
    }

    #[test]
    fn test_qualified_attribute_in_predicate() {
        let doc = doc();
        let rule = doc
            .query_one(".//ownedRule[@xmi:id='g1']", None)
            .expect("query failed")
            .expect("rule not found");
        assert_eq!(doc.node(rule).name(), Some("age >= 18"));
    }

    #[test]
    fn test_namespace_qualified_step() {
        let doc = doc();
        let hits = doc
            .query(".//UMLFairness:critical", None)
            .expect("query failed");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_unknown_prefix_is_structural_error() {
        let doc = doc();
        let result = doc.query(".//NoSuchProfile:critical", None);
        assert!(matches!(result, Err(ModelError::UnknownPrefix(_))));
    }

    #[test]
    fn test_malformed_expression_is_structural_error() {
        let doc = doc();
        assert!(matches!(
            doc.query(".//transition[@guard", None),
            Err(ModelError::InvalidPath { .. })
        ));
        assert!(matches!(
            doc.query("", None),
            Err(ModelError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_scoped_query() {
        let doc = doc();
        let class = doc
            .query_one(".//packagedElement", None)
            .expect("query failed")
            .expect("class not found");
        let transitions = doc
            .query(".//transition", Some(class))
            .expect("query failed");
        assert_eq!(transitions.len(), 2);
    }

    #[test]
    fn test_child_axis_chain() {
        let doc = doc();
        let hits = doc
            .query("packagedElement/ownedAttribute", doc.roots().first().copied())
            .expect("query failed");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_results_in_document_order() {
        let doc = doc();
        let hits = doc.query(".//*", None).expect("query failed");
        let sorted: Vec<_> = {
            let mut s = hits.clone();
            s.sort();
            s
        };
        assert_eq!(hits, sorted);
    }
}
