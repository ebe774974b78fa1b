//! The ordered associative container
//!
//! [`Collection`] maps [`Key`]s to [`Value`]s and remembers insertion order.
//! Operations are split by concern:
//!
//! - `access`: reading, removing and picking entries
//! - `transform`: map, filter, reduce and conditional application
//! - `reshape`: chunking, grouping, flattening, slicing, cross joins
//! - `algebra`: set operations and sequence editing
//! - `aggregate`: numeric aggregates and ordering

mod access;
mod aggregate;
mod algebra;
mod core;
mod index;
mod key;
mod primitive;
mod reshape;
mod transform;
mod value;

pub use aggregate::SortFlags;
pub use self::core::Collection;
pub use key::Key;
pub use primitive::Primitive;
pub use value::Value;

pub(crate) use value::format_float;
