//! Locating guard text on state-machine transitions.

use tracing::{debug, warn};

use super::expr::{parse, GuardExpr};
use crate::error::ModelError;
use crate::model::{embeddable, ModelDocument, NodeId};

/// A transition together with its resolved guard text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedGuard {
    pub transition: NodeId,
    pub text: String,
}

/// Rewrite the symbolic conjunction into the word form the expression
/// grammar recognizes.
pub fn normalize(text: &str) -> String {
    text.replace("&&", "AND")
}

/// Find every transition under `scope` that carries a `guard` reference
/// and resolve the reference to its rule text.
///
/// Transitions whose rule cannot be found, or whose rule has no name,
/// are skipped; models routinely contain unguarded or partially modeled
/// transitions.
pub fn guards_in(
    doc: &ModelDocument,
    scope: Option<NodeId>,
) -> Result<Vec<ExtractedGuard>, ModelError> {
    let mut guards = Vec::new();
    for transition in doc.query(".//transition[@guard]", scope)? {
        let node = doc.node(transition);
        // The predicate guarantees the attribute is present.
        let guard_ref = node.attr("guard").unwrap_or_default();
        if !embeddable(guard_ref) {
            debug!(%transition, guard_ref, "guard reference not resolvable, skipping");
            continue;
        }
        let rule = doc.query_one(
            &format!(".//ownedRule[@xmi:id='{guard_ref}']"),
            Some(transition),
        )?;
        let Some(rule) = rule else {
            debug!(%transition, guard_ref, "guard reference resolves to nothing, skipping");
            continue;
        };
        let Some(text) = doc.node(rule).name() else {
            debug!(%transition, guard_ref, "guard rule has no text, skipping");
            continue;
        };
        guards.push(ExtractedGuard {
            transition,
            text: normalize(text),
        });
    }
    Ok(guards)
}

/// Extract and parse every guard under `scope`.
///
/// Parse failures are logged and dropped; one malformed guard never
/// aborts extraction for its siblings.
pub fn parsed_guards_in(
    doc: &ModelDocument,
    scope: Option<NodeId>,
) -> Result<Vec<GuardExpr>, ModelError> {
    let mut parsed = Vec::new();
    for guard in guards_in(doc, scope)? {
        match parse(&guard.text) {
            Ok(expr) => parsed.push(expr),
            Err(err) => {
                warn!(text = %guard.text, %err, "unparseable guard, skipping");
            }
        }
    }
    Ok(parsed)
}
