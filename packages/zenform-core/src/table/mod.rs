//! Table metadata: ordered field definitions with exactly one key.

mod field;
#[allow(clippy::module_inception)]
mod table;

pub use field::{Field, NEW_VALUE_SUFFIX};
pub use table::Table;
