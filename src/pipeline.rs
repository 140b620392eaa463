//! Pipeline orchestration.
//!
//! One pass over the model's classes collects resolved guard conditions
//! for direct and derived attributes, deduplicates them, synthesizes the
//! attribute domains, and combines them into the initialization table:
//!
//! ```text
//! classes ──▶ guards ──▶ predicates ──▶ conditions ──▶ dedup ──▶ domains ──▶ table
//! ```
//!
//! Every stage is a pure function of its input; failures are
//! attribute-local and never abort the pipeline. Only structural defects
//! (broken document, bad query, missing profile namespace) surface as
//! errors.

use indexmap::IndexSet;
use tracing::debug;

use crate::annotations::{self, DecisionAttributes};
use crate::error::ModelError;
use crate::guard;
use crate::model::ModelDocument;
use crate::resolve::{self, attributes_of, ResolvedCondition};
use crate::table::{build_domains, combine, dedup_by_attribute, dedup_structural, InitTable};

/// Everything one run produces.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// The combinatorial initialization table.
    pub table: InitTable,
    /// Surviving conditions on direct attributes, in discovery order.
    pub direct_conditions: Vec<ResolvedCondition>,
    /// Surviving conditions on derived attributes, in discovery order.
    pub derived_conditions: Vec<ResolvedCondition>,
    /// `(column, type-name)` pairs for every surviving condition.
    pub data_types: Vec<(String, String)>,
    /// Distinct class names contributing at least one condition.
    pub class_names: Vec<String>,
    /// `<class>_<characteristic>` tokens from the fairness annotations.
    pub protected_characteristics: Vec<String>,
    /// Decision data attributes; `None` when that extraction failed.
    pub decision_attributes: Option<DecisionAttributes>,
}

/// Run the full extraction pipeline over a loaded document.
pub fn run(doc: &ModelDocument) -> Result<PipelineOutput, ModelError> {
    let mut direct_all: Vec<ResolvedCondition> = Vec::new();
    let mut derived_all: Vec<ResolvedCondition> = Vec::new();

    for class in doc.query(".//packagedElement", None)? {
        let Some(class_name) = doc.node(class).name().map(str::to_string) else {
            debug!(node = %class, "unnamed packagedElement, skipping");
            continue;
        };

        let parsed = guard::parsed_guards_in(doc, Some(class))?;
        if parsed.is_empty() {
            continue;
        }
        let leaves: Vec<_> = parsed
            .iter()
            .flat_map(|expr| expr.leaves())
            .cloned()
            .collect();
        let leaves = dedup_structural(leaves);

        let (direct_attrs, derived_attrs) = attributes_of(doc, class)?;
        direct_all.extend(resolve::resolve(doc, &class_name, &direct_attrs, &leaves));
        derived_all.extend(resolve::resolve(doc, &class_name, &derived_attrs, &leaves));
    }

    let direct = dedup_by_attribute(dedup_structural(direct_all));
    let derived = dedup_by_attribute(dedup_structural(derived_all));

    let table = combine(build_domains(&derived, &direct));

    let data_types = direct
        .iter()
        .chain(&derived)
        .map(|c| {
            (
                c.column_name(),
                c.type_name.as_deref().unwrap_or_default().to_string(),
            )
        })
        .collect();

    let class_names: Vec<String> = direct
        .iter()
        .chain(&derived)
        .map(|c| c.class_name.to_string())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();

    let protected_characteristics = annotations::protected_characteristics(doc)?;
    let decision_attributes = annotations::decision_attributes(doc);

    Ok(PipelineOutput {
        table,
        direct_conditions: direct,
        derived_conditions: derived,
        data_types,
        class_names,
        protected_characteristics,
        decision_attributes,
    })
}
