//! Input/output helpers.
//!
//! - CSV responses and cached snapshots (`table`)
//! - options-report JSON read/write (`report_json`)
//! - saved parameter-value lists (`params`)

pub mod params;
pub mod report_json;
pub mod table;

pub use params::*;
pub use report_json::*;
pub use table::*;
