//! Content digests used to decide whether a file changed between two trees.

mod digest;

pub use digest::{Digest, HashError};
