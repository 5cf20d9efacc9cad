/*! Batch processing helpers

Contains the splitting of batches into sub-batches for parallel dispatch.
!*/
pub mod split;

pub use split::{split, split_items};
