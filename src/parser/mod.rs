//! Parser module for the pipeline DSL

pub mod ast;
pub mod grammar;

pub use ast::*;
pub use grammar::parse_pipeline;
