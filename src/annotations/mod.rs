//! Fairness annotation extraction.
//!
//! Two independent extractors read the model directly, beside the guard
//! pipeline: protected characteristics come from `UMLFairness:critical`
//! annotations, decision data attributes from the model-level
//! `sensitiveDecisions` declaration. The first is part of the primary
//! run; the second is best-effort end to end — any failure yields `None`
//! and the run still completes.

use tracing::{debug, warn};

use crate::error::ModelError;
use crate::model::{embeddable, ModelDocument, NodeId};
use crate::resolve::resolve_type;

/// Decision data attributes with their resolved types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecisionAttributes {
    /// `<class>_<attribute>` tokens in discovery order.
    pub columns: Vec<String>,
    /// `(column, type-name)` pairs parallel to `columns`.
    pub types: Vec<(String, String)>,
}

/// Extract `<class>_<characteristic>` tokens from every critical
/// annotation.
///
/// The annotation's `protectedData` text is stripped of parenthesis
/// characters and split on commas; every token is prefixed with the
/// annotated class's name. Annotations missing their class reference,
/// class name, or data text are skipped.
///
/// An undeclared `UMLFairness` prefix is a structural error: the model
/// does not carry the fairness profile this tool exists for.
pub fn protected_characteristics(doc: &ModelDocument) -> Result<Vec<String>, ModelError> {
    let mut results = Vec::new();
    for critical in doc.query(".//UMLFairness:critical", None)? {
        let Some(class_name) = annotated_class_name(doc, critical) else {
            debug!(node = %critical, "critical annotation without a resolvable class, skipping");
            continue;
        };
        let data = doc.query_one(".//protectedData", Some(critical))?;
        let Some(text) = data.and_then(|id| doc.node(id).text.clone()) else {
            debug!(node = %critical, "critical annotation without protectedData text, skipping");
            continue;
        };

        let stripped: String = text.chars().filter(|c| !matches!(c, '(' | ')')).collect();
        results.extend(
            stripped
                .split(',')
                .map(|token| format!("{class_name}_{token}")),
        );
    }
    Ok(results)
}

/// Number of fairness-annotated elements in the model.
///
/// A statistic only; a model without the fairness profile counts zero.
pub fn critical_count(doc: &ModelDocument) -> usize {
    doc.query(".//UMLFairness:critical", None)
        .map(|hits| hits.len())
        .unwrap_or(0)
}

/// Extract the attributes named by the model-level decision declaration.
///
/// Best-effort end to end: a missing declaration, an unnamed class, or
/// an unresolvable attribute type abandons the whole extraction with
/// `None`. The caller reports the gap and finishes the run regardless.
pub fn decision_attributes(doc: &ModelDocument) -> Option<DecisionAttributes> {
    match try_decision_attributes(doc) {
        Some(found) => Some(found),
        None => {
            warn!("decision data attribute extraction failed, continuing without it");
            None
        }
    }
}

fn try_decision_attributes(doc: &ModelDocument) -> Option<DecisionAttributes> {
    let declaration = doc.query_one(".//sensitiveDecisions", None).ok()??;
    let text = doc.node(declaration).text.clone()?;

    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ' '))
        .collect();
    let wanted: Vec<&str> = stripped.split(',').collect();

    let mut found = DecisionAttributes::default();
    for class in doc.query(".//packagedElement", None).ok()? {
        for attribute in doc.query(".//ownedAttribute", Some(class)).ok()? {
            let node = doc.node(attribute);
            let Some(name) = node.name() else { continue };
            if !wanted.contains(&name) {
                continue;
            }
            let class_name = doc.node(class).name()?;
            let type_ref = node.attr("type")?;
            if !embeddable(type_ref) {
                return None;
            }
            let type_name = resolve_type(doc, type_ref)?;
            let column = format!("{class_name}_{name}");
            found.types.push((column.clone(), type_name.to_string()));
            found.columns.push(column);
        }
    }
    Some(found)
}

fn annotated_class_name(doc: &ModelDocument, critical: NodeId) -> Option<String> {
    let base = doc.node(critical).attr("base_StructuredClassifier")?;
    if !embeddable(base) {
        return None;
    }
    let class = doc
        .query_one(&format!(".//packagedElement[@xmi:id='{base}']"), None)
        .ok()??;
    doc.node(class).name().map(str::to_string)
}
