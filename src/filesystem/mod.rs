//! Recursive enumeration of a directory tree into relative-path entries.

mod entry;
mod enumerator;

pub use entry::{Entry, EntryKind};
pub use enumerator::{EnumerationError, TreeEnumerator, UnreadablePolicy, Walk};
