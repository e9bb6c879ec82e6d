pub mod ebitda;
pub mod grading;
pub mod multiplier;
pub mod naics;
pub mod value;

use std::sync::Arc;

use bizval_core::naics::{NaicsIndex, NaicsTable};

use crate::input;

/// Build the NAICS index once for this invocation: from `--naics-table`
/// when given, otherwise from the built-in table. Bad reference data stops
/// the command before any valuation runs.
pub fn load_index(table_path: Option<&str>) -> Result<Arc<NaicsIndex>, Box<dyn std::error::Error>> {
    let table = match table_path {
        Some(path) => {
            let resolved = input::file::resolve_path(path)?;
            tracing::info!(path = %resolved.display(), "loading NAICS table");
            NaicsTable::load(&resolved)?
        }
        None => NaicsTable::builtin()?,
    };
    Ok(Arc::new(NaicsIndex::from_table(table)?))
}
