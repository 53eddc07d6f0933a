pub mod html;

pub use html::{ReportContext, write_html_report};
