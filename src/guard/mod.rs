//! Guard extraction and boolean-expression parsing.
//!
//! Transitions carry their guard as a reference attribute pointing at an
//! `ownedRule` element whose `name` holds the condition text. The text is
//! normalized (`&&` → `AND`, the word form the expression grammar
//! recognizes), lexed, and parsed into one comparison or a flat compound
//! of comparisons:
//!
//! ```text
//! <transition guard="g1">          "age >= 18 && urgent == true"
//!   <ownedRule xmi:id="g1"   ──▶        │ normalize
//!              name="..."/>             ▼
//! </transition>                    "age >= 18 AND urgent == true"
//!                                       │ parse
//!                                       ▼
//!                     Compound(And, [age >= 18, urgent == true])
//! ```
//!
//! A guard that fails to parse is logged and skipped; sibling guards are
//! unaffected. Unguarded transitions are normal and skipped silently.

mod expr;
mod extract;
mod lexer;

pub use expr::{parse, Connective, GuardExpr, MalformedGuard, Predicate};
pub use extract::{guards_in, normalize, parsed_guards_in, ExtractedGuard};
