//! Run bookkeeping and the on-disk artifacts of each pass.

pub mod artifacts;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::FailurePolicy;
use crate::error::{AnalysisError, Result};

pub use artifacts::*;

/// A step that failed without stopping the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub step: String,
    pub target: String,
    pub error: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.step, self.target, self.error)
    }
}

/// Partial failures collected during a run, applied through a [`FailurePolicy`].
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    policy: FailurePolicy,
    failures: Vec<StepFailure>,
}

impl RunReport {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            failures: Vec::new(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Best-effort: log and keep going. Fail-fast: hand the error back.
    pub fn record(&mut self, step: &str, target: impl fmt::Display, error: AnalysisError) -> Result<()> {
        match self.policy {
            FailurePolicy::FailFast => Err(error),
            FailurePolicy::BestEffort => {
                tracing::warn!("{} failed for {}: {}", step, target, error);
                self.failures.push(StepFailure {
                    step: step.to_string(),
                    target: target.to_string(),
                    error: error.to_string(),
                });
                Ok(())
            }
        }
    }

    /// Unwrap a step result, recording the failure if there is one.
    pub fn step<T>(&mut self, step: &str, target: impl fmt::Display, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.record(step, target, e)?;
                Ok(None)
            }
        }
    }

    pub fn failures(&self) -> &[StepFailure] {
        &self.failures
    }

    /// Failures recorded since `mark` (a previous `len()`).
    pub fn failures_since(&self, mark: usize) -> Vec<StepFailure> {
        self.failures.get(mark..).map(<[_]>::to_vec).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pretty-printed JSON, creating parent directories. Overwrites.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// A previous pass's artifact, or the empty default when it was never written.
/// A file that exists but does not parse is still an error.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.is_file() {
        tracing::info!("{} not found, starting from an empty result", path.display());
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// At most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_effort_records_and_continues() {
        let mut report = RunReport::new(FailurePolicy::BestEffort);
        let out: Option<u32> = report
            .step("extract", "kawai.py", Err(AnalysisError::FileNotFound("kawai.py".into())))
            .unwrap();
        assert!(out.is_none());
        assert_eq!(report.len(), 1);
        assert_eq!(report.failures()[0].step, "extract");
        assert_eq!(report.failures()[0].target, "kawai.py");
    }

    #[test]
    fn test_fail_fast_propagates() {
        let mut report = RunReport::new(FailurePolicy::FailFast);
        let result: Result<Option<u32>> =
            report.step("extract", "x.py", Err(AnalysisError::Parse("bad".into())));
        assert!(result.is_err());
        assert!(report.is_empty());
    }

    #[test]
    fn test_step_passes_values_through() {
        let mut report = RunReport::default();
        assert_eq!(report.step("s", "t", Ok(5)).unwrap(), Some(5));
        assert!(report.is_empty());
    }

    #[test]
    fn test_failures_since() {
        let mut report = RunReport::default();
        report.record("a", "1", AnalysisError::Parse("x".into())).unwrap();
        let mark = report.len();
        report.record("b", "2", AnalysisError::Parse("y".into())).unwrap();
        let recent = report.failures_since(mark);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].step, "b");
    }

    #[test]
    fn test_load_json_or_default_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded: Vec<String> = load_json_or_default(&dir.path().join("none.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_json_or_default_corrupt_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let result: Result<Vec<String>> = load_json_or_default(&path);
        assert!(matches!(result, Err(AnalysisError::Json(_))));
    }

    #[test]
    fn test_write_json_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".serena/out.json");
        write_json(&path, &vec![1, 2]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
