//! Extraction and saving stages.
use crate::batch::Batch;
use crate::error::Error;

/// Feature extraction, run on each sub-batch by the worker pool.
pub trait Extract: Send + Sync {
    fn name(&self) -> &str;
    fn extract(&self, batch: Batch) -> Result<Batch, Error>;
}

/// Persistence of a processed batch.
///
/// There is no exactly-once guarantee: a restarted run saves its batches again.
pub trait Save {
    fn name(&self) -> &str;
    fn save(&mut self, batch: Batch) -> Result<(), Error>;
}

/// Named closure implementing [Extract].
pub struct FnExtract<F> {
    name: String,
    f: F,
}

impl<F> FnExtract<F>
where
    F: Fn(Batch) -> Result<Batch, Error> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Extract for FnExtract<F>
where
    F: Fn(Batch) -> Result<Batch, Error> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, batch: Batch) -> Result<Batch, Error> {
        (self.f)(batch)
    }
}

/// Named closure implementing [Save].
pub struct FnSave<F> {
    name: String,
    f: F,
}

impl<F> FnSave<F>
where
    F: FnMut(Batch) -> Result<(), Error>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Save for FnSave<F>
where
    F: FnMut(Batch) -> Result<(), Error>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn save(&mut self, batch: Batch) -> Result<(), Error> {
        (self.f)(batch)
    }
}
