pub mod export_xlsx;
pub mod report_import;

pub use export_xlsx::export_grid_xlsx;
pub use report_import::{import_report, ImportError, ImportReport, ReportLayout};
