//! Domain ordering, merging, and Cartesian combination.

use indexmap::IndexMap;
use tracing::debug;

use super::domain::{synthesize, AttributeDomain, DomainValue};
use crate::resolve::ResolvedCondition;

/// Name of the identifier column, always first.
pub const INI_ID_COLUMN: &str = "__Ini_ID";

/// One full assignment of synthesized values to every attribute column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitRow {
    /// Zero-based position in product-generation order.
    pub id: usize,
    /// Values aligned to the table's attribute columns.
    pub values: Vec<DomainValue>,
}

/// The initialization table: header plus rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitTable {
    /// `__Ini_ID` followed by one column per attribute domain.
    pub columns: Vec<String>,
    pub rows: Vec<InitRow>,
}

impl InitTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Build the ordered attribute domains from the deduplicated conditions.
///
/// Derived conditions come first, then direct ones, each in discovery
/// order. A direct condition whose column already exists appends its
/// values to that domain instead of adding a column — the attribute is
/// one logical dimension even when both partitions guard it.
pub fn build_domains(
    derived: &[ResolvedCondition],
    direct: &[ResolvedCondition],
) -> Vec<AttributeDomain> {
    let mut by_column: IndexMap<String, AttributeDomain> = IndexMap::new();

    for condition in derived.iter().chain(direct) {
        let Some(domain) = synthesize(condition) else {
            continue;
        };
        match by_column.get_mut(&domain.column) {
            Some(existing) => {
                debug!(column = %domain.column, "merging values into existing domain");
                existing.values.extend(domain.values);
            }
            None => {
                by_column.insert(domain.column.clone(), domain);
            }
        }
    }

    by_column.into_values().collect()
}

/// Compute the full Cartesian product of the domains.
///
/// Product order is lexicographic — the last domain varies fastest — and
/// row ids are the contiguous zero-based generation sequence. With no
/// domains the table is header-only: zero rows, one column. The row
/// count is the product of the domain sizes and is intentionally
/// uncapped; callers with large models must pre-filter attributes.
pub fn combine(domains: Vec<AttributeDomain>) -> InitTable {
    let mut columns = Vec::with_capacity(domains.len() + 1);
    columns.push(INI_ID_COLUMN.to_string());
    columns.extend(domains.iter().map(|d| d.column.clone()));

    if domains.is_empty() {
        return InitTable {
            columns,
            rows: Vec::new(),
        };
    }

    let total: usize = domains.iter().map(|d| d.values.len()).product();
    let mut rows = Vec::with_capacity(total);
    let mut odometer = vec![0usize; domains.len()];

    for id in 0..total {
        rows.push(InitRow {
            id,
            values: odometer
                .iter()
                .zip(&domains)
                .map(|(&i, domain)| domain.values[i].clone())
                .collect(),
        });
        for position in (0..odometer.len()).rev() {
            odometer[position] += 1;
            if odometer[position] < domains[position].values.len() {
                break;
            }
            odometer[position] = 0;
        }
    }

    InitTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn domain(column: &str, values: &[i64]) -> AttributeDomain {
        AttributeDomain {
            column: column.to_string(),
            values: values.iter().map(|&v| DomainValue::Int(v)).collect(),
        }
    }

    fn cond(
        class_name: &str,
        parameter: &str,
        type_name: &str,
        value: &str,
        default: Option<&str>,
    ) -> ResolvedCondition {
        ResolvedCondition {
            parameter: parameter.into(),
            operator: ">=".into(),
            value: value.into(),
            class_name: class_name.into(),
            type_name: Some(Arc::from(type_name)),
            default: default.map(Arc::from),
        }
    }

    #[test]
    fn test_empty_domains_give_header_only_table() {
        let table = combine(Vec::new());
        assert_eq!(table.columns, [INI_ID_COLUMN]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_row_count_is_product_of_domain_sizes() {
        let table = combine(vec![
            domain("a", &[1, 2]),
            domain("b", &[7]),
            domain("c", &[0, 9]),
        ]);
        assert_eq!(table.row_count(), 4);
        assert!(table
            .rows
            .iter()
            .all(|row| row.values.len() == table.column_count() - 1));
    }

    #[test]
    fn test_last_domain_varies_fastest() {
        let table = combine(vec![domain("a", &[1, 2]), domain("b", &[8, 9])]);
        let flattened: Vec<Vec<i64>> = table
            .rows
            .iter()
            .map(|row| {
                row.values
                    .iter()
                    .map(|v| match v {
                        DomainValue::Int(i) => *i,
                        other => panic!("unexpected value {other:?}"),
                    })
                    .collect()
            })
            .collect();
        assert_eq!(
            flattened,
            [vec![1, 8], vec![1, 9], vec![2, 8], vec![2, 9]]
        );
    }

    #[test]
    fn test_ids_are_contiguous_from_zero() {
        let table = combine(vec![domain("a", &[1, 2, 3]), domain("b", &[0, 1])]);
        let ids: Vec<usize> = table.rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_derived_columns_precede_direct() {
        let derived = [cond("Order", "age", "int", "18", None)];
        let direct = [cond("Order", "urgent", "boolean", "true", None)];
        let domains = build_domains(&derived, &direct);
        let columns: Vec<&str> = domains.iter().map(|d| d.column.as_str()).collect();
        assert_eq!(columns, ["Order_age", "Order_urgent"]);
    }

    #[test]
    fn test_direct_collision_merges_into_derived_domain() {
        let derived = [cond("Order", "age", "int", "18", None)];
        let direct = [cond("Order", "age", "int", "30", None)];
        let domains = build_domains(&derived, &direct);
        assert_eq!(domains.len(), 1);
        assert_eq!(
            domains[0].values,
            [
                DomainValue::Int(17),
                DomainValue::Int(18),
                DomainValue::Int(29),
                DomainValue::Int(30),
            ]
        );
    }

    #[test]
    fn test_unsynthesizable_conditions_are_excluded() {
        let derived = [cond("Order", "notes", "String", "x", None)];
        let direct = [cond("Order", "urgent", "boolean", "true", None)];
        let domains = build_domains(&derived, &direct);
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].column, "Order_urgent");
    }

    #[test]
    fn test_default_gives_singleton_domain() {
        let derived = [cond("Order", "priority", "int", "5", Some("3"))];
        let domains = build_domains(&derived, &[]);
        assert_eq!(domains[0].values, [DomainValue::Text("3".into())]);
    }
}
