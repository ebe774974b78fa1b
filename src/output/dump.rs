//! Debug dump capability
//!
//! Collections never print on their own. `dump` and `dd` hand themselves to
//! whatever [`Dumper`] the caller supplies.

use std::cell::Cell;

use crate::collection::{Collection, Primitive};
use crate::output::human::render_tree;

/// Receives collections for debugging output
pub trait Dumper {
    /// Show an exported tree
    fn dump_tree(&self, tree: &Primitive);

    /// Show a live collection; defaults to dumping its exported tree
    fn dump_collection(&self, collection: &Collection) {
        self.dump_tree(&collection.to_array());
    }

    /// Called by `dd` after dumping. Does nothing unless overridden.
    fn halt(&self) {}
}

/// Dumper writing rendered trees to stderr.
///
/// A halt is recorded rather than acted on; callers check
/// [`is_halted`](Self::is_halted) and stop their own work.
#[derive(Debug, Default)]
pub struct ConsoleDumper {
    halted: Cell<bool>,
}

impl ConsoleDumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_halted(&self) -> bool {
        self.halted.get()
    }
}

impl Dumper for ConsoleDumper {
    fn dump_tree(&self, tree: &Primitive) {
        eprintln!("{}", render_tree(tree).trim_end());
    }

    fn halt(&self) {
        self.halted.set(true);
    }
}
