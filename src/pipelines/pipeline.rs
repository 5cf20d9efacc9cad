//! Pipeline trait.
use crate::error::Error;

/// This trait must be implemented for each end-to-end job,
/// and is generic over the return type so that
/// any job that needs a return type can use the
/// trait aswell.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
