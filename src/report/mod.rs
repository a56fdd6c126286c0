//! Metadata reports: building options reports, collating them, and printing.

pub mod collate;
pub mod format;
pub mod options;

pub use collate::{collate_option_files, flatten_report, write_metadata_csv};
pub use options::{
    ReportRun, build_options_report, build_unit_report, save_options_report, save_unit_options_report,
};
