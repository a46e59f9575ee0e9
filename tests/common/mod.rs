#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clipring::ports::{ClipboardError, ClipboardPort, ExitOutcome, Notifier, ProcessRunner};

/// Clipboard shared between the code under test and the test body.
#[derive(Clone, Default)]
pub struct FakeClipboard {
    text: Arc<Mutex<Option<String>>>,
    fail_reads: Arc<Mutex<bool>>,
}

impl FakeClipboard {
    pub fn with_text(text: &str) -> Self {
        let cb = Self::default();
        cb.put(text);
        cb
    }

    pub fn put(&self, text: &str) {
        *self.text.lock().expect("lock") = Some(text.to_string());
    }

    pub fn empty(&self) {
        *self.text.lock().expect("lock") = None;
    }

    pub fn current(&self) -> Option<String> {
        self.text.lock().expect("lock").clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().expect("lock") = fail;
    }
}

impl ClipboardPort for FakeClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        if *self.fail_reads.lock().expect("lock") {
            return Err(ClipboardError::Read("busy".to_string()));
        }
        Ok(self.current())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.put(text);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("lock").clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.sent().into_iter().map(|(summary, _)| summary).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, summary: &str, body: &str, _timeout: Duration) {
        self.sent
            .lock()
            .expect("lock")
            .push((summary.to_string(), body.to_string()));
    }
}

/// Records argv and answers with a fixed outcome.
#[derive(Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    outcome: Arc<Mutex<io::Result<ExitOutcome>>>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            outcome: Arc::new(Mutex::new(Ok(ExitOutcome::Success))),
        }
    }
}

impl RecordingRunner {
    pub fn failing(code: i32) -> Self {
        let runner = Self::default();
        *runner.outcome.lock().expect("lock") = Ok(ExitOutcome::Failed(Some(code)));
        runner
    }

    pub fn missing_program() -> Self {
        let runner = Self::default();
        *runner.outcome.lock().expect("lock") =
            Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        runner
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("lock").clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, argv: &[String]) -> io::Result<ExitOutcome> {
        self.calls.lock().expect("lock").push(argv.to_vec());
        match &*self.outcome.lock().expect("lock") {
            Ok(outcome) => Ok(*outcome),
            Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
        }
    }
}
