//! Sorted inventories and ordered set algebra between them.

mod comparator;
mod inventory;

pub use comparator::{Comparison, MergeIter, Merged, difference, intersection};
pub use inventory::Inventory;
