/*! Filtering utilities

Filters decide which tokens qualify as window centers.

Filters implement [filter::Filter]. See [tag::PosFilter] for part-of-speech filtering.
! */
mod filter;
mod tag;

pub use filter::Filter;
pub use tag::{indices_by_tag, PosFilter};
