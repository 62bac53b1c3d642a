//! The tension pipeline: the one retrieval-augmented sequence in the
//! planning workflow.
//!
//! One run walks Drafting → QueryDerivation → Embedding → Retrieving →
//! Refining. Only drafting and refining are load-bearing: a failure in
//! either aborts the run. Everything between them is best-effort enrichment:
//! if deriving a query, embedding it, or searching the store fails, the run
//! continues without external context and the artifact says so.

use std::future::Future;
use std::sync::Arc;

use strategist_core::{
    CancelToken, CompletionProvider, CompletionRequest, EmbeddingProvider, PipelineArtifact,
    PipelineError, PipelineStage, ProviderError, Result, RetrievedDocument, RetryConfig,
    StrategicContext, VectorStore, execute_with_retry,
};
use strategist_prompts::{TemplateId, bindings, render};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Inserted into the refinement prompt when no documents were retrieved, so
/// the model is told explicitly that there is nothing to incorporate.
pub const NO_CONTEXT_MARKER: &str = "No additional reference material was found.";

/// Tuning knobs for [`TensionPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Vector collection searched during the retrieval stage.
    pub collection: String,
    /// Number of documents requested from the store.
    pub top_k: usize,
    /// When false, the retrieval stages are skipped outright and the
    /// artifact is marked as generated without external context. This is an
    /// explicit caller decision, never a silent default.
    pub retrieval: bool,
    /// Retry policy applied to every provider call.
    pub retry: RetryConfig,
    /// Sampling temperature for the drafting and refining calls.
    pub draft_temperature: Option<f32>,
    /// Sampling temperature for query derivation. Low by default: the query
    /// should be focused, not creative.
    pub query_temperature: Option<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: "strategy_research".to_string(),
            top_k: 3,
            retrieval: true,
            retry: RetryConfig::default(),
            draft_temperature: None,
            query_temperature: Some(0.2),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn without_retrieval(mut self) -> Self {
        self.retrieval = false;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

struct RetrievalResult {
    query: Option<String>,
    documents: Vec<RetrievedDocument>,
}

enum RetrievalHalt {
    /// Cancellation is terminal from any stage, never degraded.
    Cancelled(PipelineStage),
    /// Anything else on the retrieval path downgrades to "no context".
    Degraded { stage: PipelineStage, query: Option<String>, cause: String },
}

/// Orchestrates one tension-formulation run against a completion provider,
/// an embedding provider and a vector store.
///
/// Stateless between runs: every invocation owns its own artifact and
/// concurrent runs share nothing mutable.
pub struct TensionPipeline {
    completion: Arc<dyn CompletionProvider>,
    embedding: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    config: PipelineConfig,
}

impl TensionPipeline {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        embedding: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        config: PipelineConfig,
    ) -> Self {
        Self { completion, embedding, store, config }
    }

    /// Run the full pipeline for `context`.
    ///
    /// Returns the artifact on success (including degraded successes, which
    /// carry `retrieval_skipped = true`) or a [`PipelineError`] naming the
    /// stage that aborted the run. A refining failure still exposes the
    /// initial draft through the error.
    pub async fn run(
        &self,
        context: &StrategicContext,
        cancel: &CancelToken,
    ) -> std::result::Result<PipelineArtifact, PipelineError> {
        let run_id = Uuid::new_v4();
        info!(%run_id, model = self.completion.name(), "tension pipeline starting");

        // Drafting: load-bearing, aborts on failure.
        let draft = self.draft(context, cancel).await?;
        debug!(%run_id, chars = draft.len(), "draft complete");

        let mut artifact = PipelineArtifact {
            run_id,
            initial_draft: draft.clone(),
            derived_query: None,
            retrieved: Vec::new(),
            refined: String::new(),
            retrieval_skipped: false,
            skip_cause: None,
        };

        if self.config.retrieval {
            let retrieval = self.retrieve(&draft, cancel).await;
            match retrieval {
                Ok(RetrievalResult { query, documents }) => {
                    artifact.derived_query = query;
                    artifact.retrieved = documents;
                }
                Err(RetrievalHalt::Cancelled(stage)) => {
                    return Err(PipelineError::new(stage, ProviderError::Cancelled)
                        .with_draft(draft));
                }
                Err(RetrievalHalt::Degraded { stage, query, cause }) => {
                    warn!(%run_id, stage = %stage, cause = %cause,
                        "retrieval degraded; continuing without external context");
                    artifact.derived_query = query;
                    artifact.retrieval_skipped = true;
                    artifact.skip_cause = Some(format!("{stage}: {cause}"));
                }
            }
        } else {
            artifact.retrieval_skipped = true;
            artifact.skip_cause = Some("retrieval disabled by caller".to_string());
        }

        // Refining: load-bearing, but the draft survives the failure.
        artifact.refined = self.refine(&draft, &artifact.retrieved, cancel).await?;

        info!(%run_id, retrieval_skipped = artifact.retrieval_skipped,
            retrieved = artifact.retrieved.len(), "tension pipeline complete");
        Ok(artifact)
    }

    async fn draft(
        &self,
        context: &StrategicContext,
        cancel: &CancelToken,
    ) -> std::result::Result<String, PipelineError> {
        let stage = PipelineStage::Drafting;
        let prompt = render(
            TemplateId::FormulateTension,
            &bindings([
                ("business_context", context.business_context()),
                ("challenge", context.challenge()),
            ]),
        )
        .map_err(|e| PipelineError::new(stage, e))?;

        let mut request = CompletionRequest::new(prompt);
        if let Some(temperature) = self.config.draft_temperature {
            request = request.with_temperature(temperature);
        }

        let result = self
            .complete_with_retry(request, cancel)
            .await
            .map_err(|e| PipelineError::new(stage, e))?;

        non_empty_text(result.text).map_err(|e| PipelineError::new(stage, e))
    }

    async fn retrieve(
        &self,
        draft: &str,
        cancel: &CancelToken,
    ) -> std::result::Result<RetrievalResult, RetrievalHalt> {
        // Query derivation.
        let stage = PipelineStage::QueryDerivation;
        let prompt = render(TemplateId::DeriveSearchQuery, &bindings([("draft", draft)]))
            .map_err(|e| RetrievalHalt::Degraded { stage, query: None, cause: e.to_string() })?;
        let mut request = CompletionRequest::new(prompt);
        if let Some(temperature) = self.config.query_temperature {
            request = request.with_temperature(temperature);
        }
        let query = match self.complete_with_retry(request, cancel).await {
            Ok(result) => result.text.trim().to_string(),
            Err(ProviderError::Cancelled) => return Err(RetrievalHalt::Cancelled(stage)),
            Err(e) => {
                return Err(RetrievalHalt::Degraded { stage, query: None, cause: e.to_string() });
            }
        };
        if query.is_empty() {
            return Err(RetrievalHalt::Degraded {
                stage,
                query: None,
                cause: "derived query was empty".to_string(),
            });
        }
        debug!(query = %query, "search query derived");

        // Embedding.
        let stage = PipelineStage::Embedding;
        let embedded = self
            .guarded(cancel, execute_with_retry(&self.config.retry, || self.embedding.embed(&query)))
            .await;
        let vector = match embedded {
            Ok(vector) => vector,
            Err(ProviderError::Cancelled) => return Err(RetrievalHalt::Cancelled(stage)),
            Err(e) => {
                return Err(RetrievalHalt::Degraded {
                    stage,
                    query: Some(query),
                    cause: e.to_string(),
                });
            }
        };

        // Retrieving. An empty result is a valid outcome, not a failure.
        let stage = PipelineStage::Retrieving;
        let searched = self
            .guarded(
                cancel,
                execute_with_retry(&self.config.retry, || {
                    self.store.search(&self.config.collection, &vector, self.config.top_k)
                }),
            )
            .await;
        let documents = match searched {
            Ok(documents) => documents,
            Err(ProviderError::Cancelled) => return Err(RetrievalHalt::Cancelled(stage)),
            Err(e) => {
                return Err(RetrievalHalt::Degraded {
                    stage,
                    query: Some(query),
                    cause: e.to_string(),
                });
            }
        };

        Ok(RetrievalResult { query: Some(query), documents })
    }

    async fn refine(
        &self,
        draft: &str,
        documents: &[RetrievedDocument],
        cancel: &CancelToken,
    ) -> std::result::Result<String, PipelineError> {
        let stage = PipelineStage::Refining;
        let context_block = if documents.is_empty() {
            NO_CONTEXT_MARKER.to_string()
        } else {
            serialize_documents(documents)
        };

        let prompt = render(
            TemplateId::RefineWithContext,
            &bindings([("draft", draft), ("context", context_block.as_str())]),
        )
        .map_err(|e| PipelineError::new(stage, e).with_draft(draft))?;

        let mut request = CompletionRequest::new(prompt);
        if let Some(temperature) = self.config.draft_temperature {
            request = request.with_temperature(temperature);
        }

        let result = self
            .complete_with_retry(request, cancel)
            .await
            .map_err(|e| PipelineError::new(stage, e).with_draft(draft))?;

        non_empty_text(result.text).map_err(|e| PipelineError::new(stage, e).with_draft(draft))
    }

    async fn complete_with_retry(
        &self,
        request: CompletionRequest,
        cancel: &CancelToken,
    ) -> Result<strategist_core::CompletionResult> {
        self.guarded(
            cancel,
            execute_with_retry(&self.config.retry, || self.completion.complete(request.clone())),
        )
        .await
    }

    /// Race `operation` against cancellation. Checked before starting so a
    /// run cancelled between stages never issues the next call.
    async fn guarded<T>(
        &self,
        cancel: &CancelToken,
        operation: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = operation => result,
        }
    }
}

/// A successful run never carries empty text; providers that return blank
/// output are treated as unavailable.
fn non_empty_text(text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(ProviderError::Unavailable("provider returned an empty completion".to_string()));
    }
    Ok(text)
}

/// Numbered, text-first rendering of retrieved documents for the refinement
/// prompt. Extracted text only; raw provider payloads never travel between
/// stages.
fn serialize_documents(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("{}. {}", i + 1, doc.context_text()))
        .collect::<Vec<_>>()
        .join("\n")
}
