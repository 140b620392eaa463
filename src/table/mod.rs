//! Deduplication, domain synthesis, and combinatorial table building.
//!
//! ```text
//! ResolvedCondition* ──▶ dedup ──▶ AttributeDomain* ──▶ Cartesian ──▶ InitTable
//!                     (two-phase)   (decision table)     product
//! ```

mod combine;
mod dedup;
mod domain;

pub use combine::{build_domains, combine, InitRow, InitTable, INI_ID_COLUMN};
pub use dedup::{dedup_by_attribute, dedup_structural};
pub use domain::{synthesize, AttributeDomain, DomainValue};
