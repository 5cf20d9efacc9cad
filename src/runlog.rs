/*! Run log

A JSON object keyed by run name, holding the settings, timing and function names of each run:

```json
{
    "reviews_n=2": {
        "settings": { "batch_size": 500, ... },
        "timing": { "started_at": "...", "finished_at": "...", "elapsed_secs": 12.5, "steps": [...] },
        "functions": { "pre_extraction": ["remove_punctuation"], "feature_extraction": "generate_corpus_ngrams", ... }
    }
}
```

Flushing a run replaces its entry wholesale and leaves other runs untouched.
!*/
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub input_rows: usize,
    pub output_rows: usize,
    pub elapsed_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_secs: f64,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Functions {
    pub annotator: Option<String>,
    pub pre_extraction: Vec<String>,
    pub feature_extraction: String,
    pub post_extraction: Vec<String>,
    pub save: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    pub settings: Map<String, Value>,
    pub timing: Timing,
    pub functions: Functions,
}

/// Log of the current run, written to `path` under `name`.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    name: String,
    entry: RunEntry,
    clock: Instant,
}

impl RunLog {
    /// Start a run log with user-provided settings.
    pub fn new(path: PathBuf, name: String, settings: Map<String, Value>) -> Self {
        Self {
            path,
            name,
            entry: RunEntry {
                settings,
                timing: Timing {
                    started_at: Utc::now(),
                    finished_at: None,
                    elapsed_secs: 0.0,
                    steps: Vec::new(),
                },
                functions: Functions::default(),
            },
            clock: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &RunEntry {
        &self.entry
    }

    /// Add settings, overwriting previous values under the same keys.
    pub fn extend_settings(&mut self, settings: Map<String, Value>) {
        self.entry.settings.extend(settings);
    }

    pub fn set_functions(&mut self, functions: Functions) {
        self.entry.functions = functions;
    }

    /// Mark step `step` as complete.
    pub fn step_complete(
        &mut self,
        step: usize,
        input_rows: usize,
        output_rows: usize,
        elapsed_secs: f64,
    ) {
        self.entry.timing.steps.push(StepRecord {
            step,
            input_rows,
            output_rows,
            elapsed_secs,
        });
    }

    /// Read a run log file.
    ///
    /// Missing, empty or malformed files are read as an empty log.
    pub fn read(path: &Path) -> Result<Map<String, Value>, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(log) => Ok(log),
            Err(e) => {
                warn!("run log {:?} is malformed ({}), starting a new one", path, e);
                Ok(Map::new())
            }
        }
    }

    /// Finish the run and write its entry into the log file.
    pub fn flush(mut self) -> Result<RunEntry, Error> {
        self.entry.timing.finished_at = Some(Utc::now());
        self.entry.timing.elapsed_secs = self.clock.elapsed().as_secs_f64();

        let mut log = Self::read(&self.path)?;
        log.insert(self.name.clone(), serde_json::to_value(&self.entry)?);

        let serialized = serde_json::to_string_pretty(&Value::Object(log))?;
        std::fs::write(&self.path, serialized)?;
        debug!("wrote run {} to {:?}", self.name, self.path);

        Ok(self.entry)
    }
}
