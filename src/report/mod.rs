pub mod export;
pub mod html;
pub mod palette;
pub mod table;

pub use export::{ExportFormat, export};
pub use html::render_dashboard;
pub use table::{TableScales, print_table, render_recommendation, render_table};
