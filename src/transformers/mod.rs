/*! Column transformers.

Transforms a batch column into a new one, without changing its length or order.
Used for pre-extraction (text normalization) and post-extraction steps.

!*/

mod text;
mod transform;

pub use text::{Lowercase, NormalizeSpacing, RemovePunctuation, RemoveStopwords, TextStep};
pub use transform::{ColumnTransform, FnTransform};
