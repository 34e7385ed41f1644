pub mod console;
pub mod writer;

pub use console::{format_progress, format_result, format_summary, should_use_colors};
pub use writer::JsonlWriter;
