//! Kollect - an ordered associative collection with a fluent API
//!
//! [`Collection`] keeps key/value entries in insertion order and offers
//! transformation, aggregation, set algebra, reshaping and ordering
//! operations. Operations taking `&self` return a new collection; operations
//! taking `&mut self` change the receiver and return it for chaining.
//!
//! A small pipeline language drives the same operations from the command
//! line.
//!
//! # Example
//!
//! ```
//! use kollect::{collection, Value};
//!
//! let people = collection![
//!     collection!{"name" => "ada", "age" => 36},
//!     collection!{"name" => "bob", "age" => 17},
//! ];
//!
//! let adults = people.filter(|person, _| {
//!     person.field(&"age".into()).and_then(Value::as_i64).unwrap_or(0) >= 18
//! });
//! assert_eq!(adults.pluck("name"), collection!["ada"]);
//! assert_eq!(people.sum_by("age"), Value::Int(53));
//! ```
//!
//! ```
//! use kollect::{collection, execute_pipeline, parse_pipeline, ExecutionContext, ResultData, Value};
//!
//! let pipeline = parse_pipeline("filter(_ > 1) | sum").unwrap();
//! let result = execute_pipeline(&pipeline, collection![1, 2, 3], &ExecutionContext::default()).unwrap();
//! assert!(matches!(result.data, ResultData::Value(Value::Int(5))));
//! ```

#[macro_use]
mod macros;

pub mod cli;
pub mod collection;
pub mod engine;
pub mod error;
pub mod output;
pub mod parser;

pub use collection::{Collection, Key, Primitive, SortFlags, Value};
pub use engine::{
    execute_pipeline, explain_pipeline, lookup_stage, ExecutionContext, ExecutionResult,
    ResultData, StageInfo, STAGES,
};
pub use error::{KollectError, Result};
pub use output::{
    format_output, ConsoleDumper, Dumper, Encoder, JsonEncoder, JsonOptions, OutputFormat,
};
pub use parser::{parse_pipeline, Pipeline, Stage};
