// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User-facing diagnostics emitted while exporting a scene.
//!
//! Renderer back-ends degrade gracefully on unsupported features: they emit a
//! warning and fall back. The sink those warnings go through is injected, so
//! the export core stays testable without capturing process-wide output.

use std::sync::Mutex;

/// A sink for diagnostics produced during scene export and rendering.
pub trait DiagnosticSink: Send + Sync {
    /// Reports a non-fatal problem; the export continues with a fallback.
    fn warning(&self, msg: &str);

    /// Reports a problem that aborted the current operation.
    fn error(&self, msg: &str);

    /// Reports neutral progress information.
    fn message(&self, msg: &str);
}

/// The default sink: forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warning(&self, msg: &str) {
        log::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        log::error!("{msg}");
    }

    fn message(&self, msg: &str) {
        log::info!("{msg}");
    }
}

/// A sink that records diagnostics in memory, for inspection in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the warnings recorded so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// Returns the errors recorded so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    /// Returns the messages recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn warning(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }

    fn message(&self, msg: &str) {
        self.messages.lock().unwrap().push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_by_severity() {
        let sink = MemorySink::new();
        sink.warning("w1");
        sink.warning("w2");
        sink.error("e1");
        assert_eq!(sink.warnings(), vec!["w1", "w2"]);
        assert_eq!(sink.errors(), vec!["e1"]);
        assert!(sink.messages().is_empty());
    }
}
