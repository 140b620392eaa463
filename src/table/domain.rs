//! Per-attribute candidate-value synthesis.

use std::sync::Arc;

use tracing::warn;

use crate::resolve::ResolvedCondition;

/// One candidate value in an attribute's domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainValue {
    Bool(bool),
    Int(i64),
    Text(Arc<str>),
}

impl std::fmt::Display for DomainValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// The candidate values assigned to one initialization-table column.
/// Non-empty by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDomain {
    pub column: String,
    pub values: Vec<DomainValue>,
}

/// Synthesize the value domain for one condition.
///
/// Decision table, evaluated in order:
///
/// 1. a fixed default → the default alone, regardless of the guard;
/// 2. `boolean` → both truth values;
/// 3. `int` → two values straddling the guard's threshold, `value - 1`
///    and `value`, so both branches of the guard are exercised;
/// 4. anything else (non-numeric comparison value, unresolved or
///    unsupported type) → no domain; the attribute is excluded from the
///    table.
pub fn synthesize(condition: &ResolvedCondition) -> Option<AttributeDomain> {
    let column = condition.column_name();

    if let Some(default) = &condition.default {
        return Some(AttributeDomain {
            column,
            values: vec![DomainValue::Text(default.clone())],
        });
    }

    match condition.type_name.as_deref() {
        Some("boolean") => Some(AttributeDomain {
            column,
            values: vec![DomainValue::Bool(true), DomainValue::Bool(false)],
        }),
        Some("int") => {
            let threshold: i64 = match condition.value.parse() {
                Ok(v) => v,
                Err(_) => {
                    warn!(
                        %column,
                        value = condition.value.as_ref(),
                        "comparison value is not numeric, excluding attribute"
                    );
                    return None;
                }
            };
            Some(AttributeDomain {
                column,
                values: vec![
                    DomainValue::Int(threshold - 1),
                    DomainValue::Int(threshold),
                ],
            })
        }
        other => {
            warn!(
                %column,
                type_name = other.unwrap_or("<unresolved>"),
                "no domain synthesis for this type, excluding attribute"
            );
            None
        }
    }
}
