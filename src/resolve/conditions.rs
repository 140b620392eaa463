//! Matching parsed predicates against a class's attributes.

use std::sync::Arc;

use tracing::{debug, warn};

use super::attributes::{resolve_type, AttributeView};
use crate::guard::Predicate;
use crate::model::ModelDocument;

/// A guard predicate enriched with its owning class, resolved type, and
/// fixed default.
///
/// Uniquely keyed by `(class_name, parameter)` after deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedCondition {
    pub parameter: Arc<str>,
    pub operator: Arc<str>,
    pub value: Arc<str>,
    pub class_name: Arc<str>,
    /// Display name of the attribute's declared type; `None` when the
    /// declaration cannot be resolved.
    pub type_name: Option<Arc<str>>,
    /// Fixed default value, present only on derived attributes that
    /// declare one.
    pub default: Option<Arc<str>>,
}

impl ResolvedCondition {
    /// The table column this condition feeds.
    pub fn column_name(&self) -> String {
        format!("{}_{}", self.class_name, self.parameter)
    }
}

/// Resolve predicates against one class scope.
///
/// Each predicate whose `parameter` names one of `attributes` yields a
/// [`ResolvedCondition`]; the rest are discarded — they belong to another
/// class and are re-evaluated when that class is processed. Resolution is
/// best-effort per predicate: a predicate whose attribute data is broken
/// is skipped, never fatal.
pub fn resolve(
    doc: &ModelDocument,
    class_name: &str,
    attributes: &[AttributeView<'_>],
    predicates: &[Predicate],
) -> Vec<ResolvedCondition> {
    let mut conditions = Vec::new();
    for predicate in predicates {
        let Some(attribute) = attributes
            .iter()
            .find(|view| view.name() == Some(predicate.parameter.as_ref()))
        else {
            debug!(
                class_name,
                parameter = predicate.parameter.as_ref(),
                "predicate does not reference this class, discarding"
            );
            continue;
        };

        let type_name = match attribute.type_ref() {
            Some(type_ref) => resolve_type(doc, type_ref),
            None => {
                warn!(
                    class_name,
                    parameter = predicate.parameter.as_ref(),
                    "attribute has no type reference"
                );
                None
            }
        };

        conditions.push(ResolvedCondition {
            parameter: predicate.parameter.clone(),
            operator: predicate.operator.clone(),
            value: predicate.value.clone(),
            class_name: Arc::from(class_name),
            type_name,
            default: attribute.default_value().map(Arc::from),
        });
    }
    conditions
}
