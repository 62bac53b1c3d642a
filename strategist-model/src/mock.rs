//! Scripted in-process providers for tests.
//!
//! Each mock pops the next scripted outcome per call, counts invocations,
//! and (for completions) records the requests it saw so tests can assert on
//! the exact prompts sent downstream.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use strategist_core::{
    CompletionProvider, CompletionRequest, CompletionResult, EmbeddingProvider, EmbeddingVector,
    ProviderError, Result,
};

/// A [`CompletionProvider`] that replays a scripted sequence of outcomes.
pub struct MockCompletion {
    name: String,
    script: Mutex<VecDeque<Result<CompletionResult>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl MockCompletion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(CompletionResult::new(text)));
        self
    }

    #[must_use]
    pub fn with_error(self, error: ProviderError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of `complete` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request seen, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Malformed("mock completion script exhausted".to_string())))
    }
}

/// An [`EmbeddingProvider`] that replays scripted outcomes, with an optional
/// constant fallback vector once the script is exhausted.
pub struct MockEmbedding {
    name: String,
    dimension: usize,
    script: Mutex<VecDeque<Result<EmbeddingVector>>>,
    fallback: Option<EmbeddingVector>,
    calls: AtomicUsize,
}

impl MockEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            name: "mock-embedding".to_string(),
            dimension,
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_vector(self, vector: EmbeddingVector) -> Self {
        self.script.lock().unwrap().push_back(Ok(vector));
        self
    }

    #[must_use]
    pub fn with_error(self, error: ProviderError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Serve `vector` for every call not covered by the script.
    #[must_use]
    pub fn returning(mut self, vector: EmbeddingVector) -> Self {
        self.fallback = Some(vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedding {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, _text: &str) -> Result<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(outcome) = self.script.lock().unwrap().pop_front() {
            return outcome;
        }
        self.fallback
            .clone()
            .ok_or_else(|| ProviderError::Malformed("mock embedding script exhausted".to_string()))
    }
}
