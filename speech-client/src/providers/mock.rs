//! Mock speech provider for testing
//!
//! Provides a configurable mock provider that can simulate failures on a
//! given call and records every request it receives.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SpeechRequest};

/// A mock provider that echoes its input back as "audio"
pub struct MockProvider {
    /// Zero-based call index that fails (None = never fail)
    fail_on: Option<usize>,
    /// Message carried by the simulated failure
    fail_message: String,
    /// Current call count
    call_count: AtomicUsize,
    /// Every request received, in order
    requests: Mutex<Vec<SpeechRequest>>,
}

impl MockProvider {
    /// Create a provider that always succeeds, returning the input bytes
    pub fn echo() -> Self {
        Self {
            fail_on: None,
            fail_message: String::new(),
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider whose `n`th call (zero-based) fails with an API error
    pub fn fails_on_call(n: usize, message: &str) -> Self {
        Self {
            fail_on: Some(n),
            fail_message: message.to_string(),
            ..Self::echo()
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the inputs received so far, in call order
    pub fn inputs(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.iter().map(|r| r.input.clone()).collect())
            .unwrap_or_default()
    }

    /// Get the full requests received so far
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        let audio = request.input.as_bytes().to_vec();

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if self.fail_on == Some(call_num) {
            return Err(SpeechError::ApiError {
                message: self.fail_message.clone(),
                status_code: Some(500),
            });
        }

        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}
