//! Output formatting module

pub mod dump;
pub mod formatter;
pub mod human;
pub mod json;

pub use dump::{ConsoleDumper, Dumper};
pub use formatter::{format_output, OutputFormat};
pub use human::render_tree;
pub use json::{Encoder, JsonEncoder, JsonOptions};
