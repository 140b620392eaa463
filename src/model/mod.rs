//! Model accessor: the loaded XMI document and its query operations.
//!
//! The document is an arena of read-only element nodes built in a single
//! `quick-xml` pass, together with the namespace map discovered from the
//! document's `xmlns:` declarations. Queries execute small descendant-axis
//! path expressions against the whole tree or a scope node:
//!
//! ```text
//! ┌───────────────┐     parse      ┌────────────────────────────┐
//! │  XMI bytes    │ ─────────────▶ │  ModelDocument             │
//! └───────────────┘                │  - nodes: arena (doc order)│
//!                                  │  - namespaces: prefix→URI  │
//!                                  └────────────┬───────────────┘
//!                                               │ query(".//transition[@guard]")
//!                                               ▼
//!                                  ordered sequence of NodeId
//! ```
//!
//! Iteration is always in document order; this is the determinism
//! invariant the downstream pipeline relies on.

mod document;
mod node;
mod query;

pub use document::{ModelDocument, NamespaceMap};
pub use node::{Node, NodeId};
pub(crate) use query::embeddable;
