//! Exact nearest-neighbor retrieval over embedded chunks

mod distance;
mod index;

pub use distance::squared_l2;
pub use index::{SearchHit, VectorIndex};
