//! Error enum
use std::fmt;

use crate::batch::RowId;

/// Pipeline stage in which a named function failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PreExtraction,
    Annotation,
    Extraction,
    PostExtraction,
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::PreExtraction => "pre-extraction",
            Stage::Annotation => "annotation",
            Stage::Extraction => "feature extraction",
            Stage::PostExtraction => "post-extraction",
            Stage::Save => "save",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
    Config {
        option: &'static str,
        reason: String,
    },
    MissingColumn(String),
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },
    ColumnType {
        column: String,
        expected: &'static str,
        got: &'static str,
    },
    PositionOutOfBounds {
        position: usize,
        len: usize,
    },
    DuplicateRowId(RowId),
    DuplicateColumn(String),
    SourceExhausted {
        source: usize,
        step: usize,
    },
    Stage {
        stage: Stage,
        function: String,
        source: Box<Error>,
    },
    Custom(String),
}

impl Error {
    pub(crate) fn config(option: &'static str, reason: impl Into<String>) -> Self {
        Error::Config {
            option,
            reason: reason.into(),
        }
    }

    pub(crate) fn in_stage(self, stage: Stage, function: &str) -> Self {
        Error::Stage {
            stage,
            function: function.to_string(),
            source: Box::new(self),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Serde(e) => write!(f, "serialization error: {}", e),
            Error::Sqlite(e) => write!(f, "sqlite error: {}", e),
            Error::Csv(e) => write!(f, "csv error: {}", e),
            Error::ThreadPool(e) => write!(f, "could not build worker pool: {}", e),
            Error::Config { option, reason } => {
                write!(f, "invalid value for option `{}`: {}", option, reason)
            }
            Error::MissingColumn(c) => write!(f, "column `{}` is not in the batch", c),
            Error::ColumnLength {
                column,
                expected,
                got,
            } => write!(
                f,
                "column `{}` has {} rows, batch has {}",
                column, got, expected
            ),
            Error::ColumnType {
                column,
                expected,
                got,
            } => write!(
                f,
                "column `{}` holds a {} value where a {} was expected",
                column, got, expected
            ),
            Error::PositionOutOfBounds { position, len } => write!(
                f,
                "position {} is out of bounds for a document of {} tokens",
                position, len
            ),
            Error::DuplicateRowId(id) => write!(f, "row identifier {} is not unique", id),
            Error::DuplicateColumn(c) => write!(f, "column `{}` already exists", c),
            Error::SourceExhausted { source, step } => write!(
                f,
                "auxiliary source {} was exhausted at step {} before the primary source",
                source, step
            ),
            Error::Stage {
                stage,
                function,
                source,
            } => write!(f, "{} function {} failed: {}", stage, function, source),
            Error::Custom(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Serde(e) => Some(e),
            Error::Sqlite(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::ThreadPool(e) => Some(e),
            Error::Stage { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Error {
        Error::Sqlite(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Error {
        Error::ThreadPool(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
