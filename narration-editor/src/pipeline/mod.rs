//! Narration pipeline: clean, chunk, and synthesize text one chunk at a time.
//!
//! Chunks are submitted serially and in order, so fragment order always
//! matches chunk order. Cancellation is checked only between submissions.

use crate::audio::{AudioFragment, fragment_base_name};
use crate::error::{NarrationError, Result};
use crate::text::{DEFAULT_MAX_CHARS, SourceFormat, split_text};
use log::{debug, info, warn};
use speech_client::provider::{DEFAULT_MODEL, DEFAULT_VOICE};
use speech_client::{SpeechProvider, SpeechRequest};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Options for one narration run.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationOptions {
    /// Whether to clean markdown before chunking
    pub format: SourceFormat,
    /// Maximum characters per chunk
    pub max_chars: usize,
    /// Voice identifier
    pub voice: String,
    /// Delivery instructions for the speech model
    pub instructions: String,
    /// Speech model name
    pub model: String,
}

impl Default for NarrationOptions {
    fn default() -> Self {
        Self {
            format: SourceFormat::Plain,
            max_chars: DEFAULT_MAX_CHARS,
            voice: DEFAULT_VOICE.to_string(),
            instructions: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl NarrationOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source format.
    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the chunk budget.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the delivery instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the speech model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request(&self, input: &str) -> SpeechRequest {
        SpeechRequest::new(input)
            .with_voice(self.voice.as_str())
            .with_instructions(self.instructions.as_str())
            .with_model(self.model.as_str())
    }
}

/// Progress after each completed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationProgress {
    /// Chunks completed so far
    pub current: usize,
    /// Total chunks in this run
    pub total: usize,
}

/// Terminal outcome of a narration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationOutcome {
    /// Every chunk was synthesized; fragments are in chunk order
    Completed(Vec<AudioFragment>),
    /// Cancellation was observed at a chunk boundary; partial output is dropped
    Cancelled,
}

/// Per-document narration state.
///
/// Holds what used to be ambient state in an editor: the open file, the
/// cancellation token armed for the next run, and a running count of
/// submitted characters.
#[derive(Debug, Default)]
pub struct NarrationSession {
    source_path: Option<PathBuf>,
    armed: Option<CancellationToken>,
    chars_submitted: usize,
}

impl NarrationSession {
    /// Create a session for text from `source_path` (None for unsaved text).
    pub fn new(source_path: Option<PathBuf>) -> Self {
        Self {
            source_path,
            ..Self::default()
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Format implied by the source file extension.
    pub fn source_format(&self) -> SourceFormat {
        self.source_path
            .as_deref()
            .map(SourceFormat::from_path)
            .unwrap_or_default()
    }

    /// Base name for fragment files from this session.
    pub fn fragment_base_name(&self) -> String {
        fragment_base_name(self.source_path.as_deref())
    }

    /// Start a run: install a fresh token for the next `narrate` call and
    /// return a handle to it.
    ///
    /// Handles from earlier runs never affect this one. Calling `narrate`
    /// without `begin_run` uses a token nobody else holds.
    pub fn begin_run(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        self.armed = Some(token.clone());
        token
    }

    /// Characters successfully submitted across all runs of this session.
    pub fn chars_submitted(&self) -> usize {
        self.chars_submitted
    }

    /// Narrate `text`, calling `on_progress` after each chunk.
    ///
    /// # Errors
    /// `InvalidChunkSize` before any submission, or `Synthesis` for the
    /// first chunk the provider rejects. No later chunks are submitted after
    /// a failure.
    pub async fn narrate<F>(
        &mut self,
        provider: &dyn SpeechProvider,
        text: &str,
        options: &NarrationOptions,
        mut on_progress: F,
    ) -> Result<NarrationOutcome>
    where
        F: FnMut(NarrationProgress),
    {
        // The token lives for this run only
        let cancel = self.armed.take().unwrap_or_default();

        let prepared = options.format.prepare(text);
        let chunks = split_text(&prepared, options.max_chars)?;
        let total = chunks.len();

        info!(
            "Split text into {} chunk(s) for {} (voice: {})",
            total,
            provider.name(),
            options.voice
        );

        let mut fragments = Vec::with_capacity(total);

        for (index, chunk) in chunks.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Narration cancelled before chunk {}/{}", index + 1, total);
                return Ok(NarrationOutcome::Cancelled);
            }

            debug!("Converting chunk {}/{}", index + 1, total);

            let audio = provider
                .synthesize(options.request(&chunk))
                .await
                .map_err(|source| NarrationError::Synthesis {
                    chunk: index,
                    source,
                })?;

            debug!("Chunk {}/{} done ({} bytes)", index + 1, total, audio.len());

            self.chars_submitted += chunk.chars().count();
            fragments.push(AudioFragment {
                index,
                text: chunk,
                audio,
            });

            on_progress(NarrationProgress {
                current: index + 1,
                total,
            });
        }

        Ok(NarrationOutcome::Completed(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speech_client::MockProvider;

    fn completed(outcome: NarrationOutcome) -> Vec<AudioFragment> {
        match outcome {
            NarrationOutcome::Completed(fragments) => fragments,
            NarrationOutcome::Cancelled => panic!("expected completion"),
        }
    }

    #[tokio::test]
    async fn test_markdown_cleaned_before_chunking() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(Some(PathBuf::from("script.md")));
        let options = NarrationOptions::new().with_format(session.source_format());

        let outcome = session
            .narrate(&provider, "# Title\n**bold** text", &options, |_| {})
            .await
            .unwrap();

        assert_eq!(completed(outcome).len(), 1);
        assert_eq!(provider.inputs(), vec!["Title\nbold text"]);
    }

    #[tokio::test]
    async fn test_plain_text_passed_through() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(Some(PathBuf::from("script.txt")));
        let options = NarrationOptions::new().with_format(session.source_format());

        session
            .narrate(&provider, "**kept**", &options, |_| {})
            .await
            .unwrap();

        assert_eq!(provider.inputs(), vec!["**kept**"]);
    }

    #[tokio::test]
    async fn test_fragments_in_chunk_order() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);
        let options = NarrationOptions::new().with_max_chars(3);
        let mut progress = Vec::new();

        let outcome = session
            .narrate(&provider, "aaa\nbbb\nccc", &options, |p| progress.push(p))
            .await
            .unwrap();

        let fragments = completed(outcome);
        assert_eq!(fragments.len(), 3);
        for (i, (fragment, expected)) in fragments.iter().zip(["aaa", "bbb", "ccc"]).enumerate() {
            assert_eq!(fragment.index, i);
            assert_eq!(fragment.text, expected);
            assert_eq!(fragment.audio, expected.as_bytes());
        }
        assert_eq!(
            progress,
            vec![
                NarrationProgress { current: 1, total: 3 },
                NarrationProgress { current: 2, total: 3 },
                NarrationProgress { current: 3, total: 3 },
            ]
        );
        assert_eq!(session.chars_submitted(), 9);
    }

    #[tokio::test]
    async fn test_request_carries_voice_and_instructions() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);
        let options = NarrationOptions::new()
            .with_voice("coral")
            .with_instructions("Whisper")
            .with_model("tts-1");

        session
            .narrate(&provider, "hello", &options, |_| {})
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].voice, "coral");
        assert_eq!(requests[0].instructions, "Whisper");
        assert_eq!(requests[0].model, "tts-1");
    }

    #[tokio::test]
    async fn test_cancel_after_begin_run() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);
        session.begin_run().cancel();

        let outcome = session
            .narrate(&provider, "one\ntwo", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();

        assert_eq!(outcome, NarrationOutcome::Cancelled);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_observed_at_chunk_boundary() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);
        let token = session.begin_run();
        let options = NarrationOptions::new().with_max_chars(3);

        let outcome = session
            .narrate(&provider, "aaa\nbbb\nccc", &options, |p| {
                if p.current == 1 {
                    token.cancel();
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome, NarrationOutcome::Cancelled);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_idle_cancel_does_not_reach_next_run() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);

        let first_token = session.begin_run();
        let first = session
            .narrate(&provider, "text", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(completed(first).len(), 1);

        // Cancelled while no run is active
        first_token.cancel();

        let second = session
            .narrate(&provider, "text", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(completed(second).len(), 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_begin_run_replaces_stale_token() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);

        let stale = session.begin_run();
        let current = session.begin_run();
        stale.cancel();

        let outcome = session
            .narrate(&provider, "text", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(completed(outcome).len(), 1);
        assert!(!current.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_run_does_not_leak_into_next() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);

        session.begin_run().cancel();
        let first = session
            .narrate(&provider, "text", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(first, NarrationOutcome::Cancelled);

        let second = session
            .narrate(&provider, "text", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(completed(second).len(), 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_stops_submission() {
        let provider = MockProvider::fails_on_call(1, "quota exceeded");
        let mut session = NarrationSession::new(None);
        let options = NarrationOptions::new().with_max_chars(3);

        let err = session
            .narrate(&provider, "aaa\nbbb\nccc", &options, |_| {})
            .await
            .unwrap_err();

        match err {
            NarrationError::Synthesis { chunk, source } => {
                assert_eq!(chunk, 1);
                assert!(source.to_string().contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.inputs(), vec!["aaa", "bbb"]);
    }

    #[tokio::test]
    async fn test_invalid_chunk_size_fails_before_submission() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);
        let options = NarrationOptions::new().with_max_chars(0);

        let result = session.narrate(&provider, "text", &options, |_| {}).await;

        assert!(matches!(result, Err(NarrationError::InvalidChunkSize)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_completes_without_fragments() {
        let provider = MockProvider::echo();
        let mut session = NarrationSession::new(None);

        let outcome = session
            .narrate(&provider, "", &NarrationOptions::new(), |_| {})
            .await
            .unwrap();

        assert!(completed(outcome).is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_session_defaults() {
        let session = NarrationSession::new(None);
        assert_eq!(session.source_format(), SourceFormat::Plain);
        assert_eq!(session.fragment_base_name(), "untitled");
        assert_eq!(session.chars_submitted(), 0);

        let session = NarrationSession::new(Some(PathBuf::from("/a/chapter2.md")));
        assert_eq!(session.source_format(), SourceFormat::Markdown);
        assert_eq!(session.fragment_base_name(), "chapter2");
    }
}
