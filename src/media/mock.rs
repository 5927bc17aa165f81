/*!
 * Mock media tool for testing.
 *
 * `MockMediaTool` never spawns a process. A successful cut writes a small
 * placeholder file at the requested output path so callers can inspect the
 * destination folder afterwards:
 * - `MockMediaTool::working()` - every cut and probe succeeds
 * - `MockMediaTool::failing_on(&[2])` - the listed cut calls (1-based) fail
 * - `MockMediaTool::failing()` - every cut and probe fails
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::ClipError;
use crate::media::{CutRequest, MediaTool};

/// Behavior mode for the mock media tool
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails the cut calls whose 1-based position is listed
    FailOn(HashSet<usize>),
    /// Always fails
    Failing,
}

/// Fake cut/probe capability recording every request
#[derive(Debug)]
pub struct MockMediaTool {
    behavior: MockBehavior,
    duration: f64,
    call_count: AtomicUsize,
    requests: Mutex<Vec<CutRequest>>,
}

impl MockMediaTool {
    /// Create a mock with the given behavior and a 120 second probe duration
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            duration: 120.0,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self::new(MockBehavior::FailOn(calls.iter().copied().collect()))
    }

    /// Duration reported by `probe_duration`
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Number of cut calls made so far
    pub fn cut_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every cut request received, in call order
    pub fn requests(&self) -> Vec<CutRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaTool for MockMediaTool {
    async fn cut(&self, request: &CutRequest) -> Result<(), ClipError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let fails = match &self.behavior {
            MockBehavior::Working => false,
            MockBehavior::FailOn(calls) => calls.contains(&call),
            MockBehavior::Failing => true,
        };

        if fails {
            return Err(ClipError::tool_failure(
                format!("cut of {}", request.output.display()),
                format!("mock failure on call {}", call),
            ));
        }

        std::fs::write(&request.output, b"mock clip")
            .map_err(|e| ClipError::io(format!("Failed to write {}", request.output.display()), e))
    }

    async fn probe_duration(&self, source: &Path) -> Result<f64, ClipError> {
        if self.behavior == MockBehavior::Failing {
            return Err(ClipError::tool_failure(
                format!("probe of {}", source.display()),
                "mock failure",
            ));
        }
        Ok(self.duration)
    }
}
