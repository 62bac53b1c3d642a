//! End-to-end pipeline behavior against scripted in-process providers:
//! deterministic wiring, degrade policy, retries and cancellation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, json};
use strategist_core::{
    CancelToken, CompletionProvider, EmbeddingProvider, PipelineStage, ProviderError, Result,
    RetrievedDocument, RetryConfig, StrategicContext, VectorStore,
};
use strategist_model::{MockCompletion, MockEmbedding};
use strategist_rag::{InMemoryVectorStore, NO_CONTEXT_MARKER, PipelineConfig, TensionPipeline};

/// A vector store that replays scripted outcomes and counts calls.
struct ScriptedStore {
    outcomes: Mutex<VecDeque<Result<Vec<RetrievedDocument>>>>,
    calls: AtomicUsize,
}

impl ScriptedStore {
    fn new() -> Self {
        Self { outcomes: Mutex::new(VecDeque::new()), calls: AtomicUsize::new(0) }
    }

    fn with_outcome(self, outcome: Result<Vec<RetrievedDocument>>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn search(
        &self,
        _collection: &str,
        _query: &[f32],
        _limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Malformed("store script exhausted".to_string())))
    }
}

/// A store that cancels the run while its search is in flight, then never
/// resolves; the pipeline must notice the cancellation, not hang.
struct CancellingStore {
    token: CancelToken,
    calls: AtomicUsize,
}

#[async_trait]
impl VectorStore for CancellingStore {
    async fn search(
        &self,
        _collection: &str,
        _query: &[f32],
        _limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.cancel();
        std::future::pending::<()>().await;
        unreachable!("pending future resolved")
    }
}

fn context() -> StrategicContext {
    StrategicContext::new("a mid-market retailer", "stores are losing foot traffic").unwrap()
}

fn text_doc(text: &str) -> Map<String, serde_json::Value> {
    let mut fields = Map::new();
    fields.insert("text".to_string(), json!(text));
    fields
}

fn fast_retry() -> RetryConfig {
    RetryConfig::default().with_initial_delay(Duration::ZERO).with_max_delay(Duration::ZERO)
}

fn pipeline(
    completion: &Arc<MockCompletion>,
    embedding: &Arc<MockEmbedding>,
    store: Arc<dyn VectorStore>,
    config: PipelineConfig,
) -> TensionPipeline {
    TensionPipeline::new(
        Arc::clone(completion) as Arc<dyn CompletionProvider>,
        Arc::clone(embedding) as Arc<dyn EmbeddingProvider>,
        store,
        config,
    )
}

#[tokio::test]
async fn round_trip_produces_the_exact_scripted_artifact() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_text("Tension A enriched with fact C"),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let store = InMemoryVectorStore::new(2);
    store.insert("strategy_research", text_doc("fact C"), vec![0.1, 0.2]).unwrap();

    let pipeline =
        pipeline(&completion, &embedding, Arc::new(store), PipelineConfig::default());
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert_eq!(artifact.initial_draft, "Tension A");
    assert_eq!(artifact.derived_query.as_deref(), Some("query B"));
    assert_eq!(artifact.retrieved.len(), 1);
    assert_eq!(artifact.retrieved[0].fields["text"], "fact C");
    assert_eq!(artifact.refined, "Tension A enriched with fact C");
    assert!(!artifact.retrieval_skipped);
    assert!(artifact.skip_cause.is_none());

    // The refinement prompt carried the draft and the retrieved fact.
    let requests = completion.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2].prompt.contains("Tension A"));
    assert!(requests[2].prompt.contains("fact C"));
}

#[tokio::test]
async fn empty_search_result_inserts_the_no_context_marker() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_text("Tension A"),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let store = InMemoryVectorStore::new(2);
    store.create_collection("strategy_research");

    let pipeline =
        pipeline(&completion, &embedding, Arc::new(store), PipelineConfig::default());
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    // Nothing retrieved, but retrieval itself succeeded: not a degraded run.
    assert!(artifact.retrieved.is_empty());
    assert!(!artifact.retrieval_skipped);

    let requests = completion.requests();
    assert!(requests[2].prompt.contains(NO_CONTEXT_MARKER));
}

#[tokio::test]
async fn embedding_failure_degrades_instead_of_aborting() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_text("Tension A"),
    );
    let embedding = Arc::new(
        MockEmbedding::new(2).with_error(ProviderError::Unavailable("embed down".to_string())),
    );
    let store = Arc::new(ScriptedStore::new());

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert!(artifact.retrieval_skipped);
    assert!(artifact.retrieved.is_empty());
    assert_eq!(artifact.derived_query.as_deref(), Some("query B"));
    assert!(artifact.skip_cause.as_deref().unwrap().contains("embedding"));
    assert_eq!(store.calls(), 0, "store must not be called after embedding failed");
    assert_eq!(artifact.refined, "Tension A");
}

#[tokio::test]
async fn drafting_failure_aborts_before_any_retrieval_call() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_error(ProviderError::Unavailable("model down".to_string())),
    );
    let embedding = Arc::new(MockEmbedding::new(2));
    let store = Arc::new(ScriptedStore::new());

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let error = pipeline.run(&context(), &CancelToken::new()).await.unwrap_err();

    assert_eq!(error.stage, PipelineStage::Drafting);
    assert!(error.initial_draft.is_none());
    assert_eq!(completion.calls(), 1);
    assert_eq!(embedding.calls(), 0, "embedding must never run after a drafting failure");
    assert_eq!(store.calls(), 0, "the store must never run after a drafting failure");
}

#[tokio::test]
async fn rate_limited_drafting_succeeds_on_the_third_attempt() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_error(ProviderError::RateLimited("429".to_string()))
            .with_error(ProviderError::RateLimited("429".to_string()))
            .with_text("Tension A")
            .with_text("query B")
            .with_text("refined"),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let store = InMemoryVectorStore::new(2);
    store.create_collection("strategy_research");

    let config = PipelineConfig::default().with_retry(fast_retry().with_max_retries(2));
    let pipeline = pipeline(&completion, &embedding, Arc::new(store), config);
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert_eq!(artifact.initial_draft, "Tension A");
    // Two rate-limited attempts, the successful draft, the query, the refine.
    assert_eq!(completion.calls(), 5);
}

#[tokio::test]
async fn cancellation_during_retrieval_is_terminal() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_text("never used"),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let token = CancelToken::new();
    let store =
        Arc::new(CancellingStore { token: token.clone(), calls: AtomicUsize::new(0) });

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let error = pipeline.run(&context(), &token).await.unwrap_err();

    assert_eq!(error.stage, PipelineStage::Retrieving);
    assert!(matches!(error.source, ProviderError::Cancelled));
    assert_eq!(error.initial_draft.as_deref(), Some("Tension A"));
}

#[tokio::test]
async fn cancellation_before_the_run_fails_in_drafting() {
    let completion = Arc::new(MockCompletion::new("stub").with_text("never used"));
    let embedding = Arc::new(MockEmbedding::new(2));
    let store = Arc::new(ScriptedStore::new());

    let token = CancelToken::new();
    token.cancel();

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let error = pipeline.run(&context(), &token).await.unwrap_err();

    assert_eq!(error.stage, PipelineStage::Drafting);
    assert!(matches!(error.source, ProviderError::Cancelled));
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn refining_failure_still_exposes_the_draft() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_error(ProviderError::ContentFiltered("policy".to_string())),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let store = InMemoryVectorStore::new(2);
    store.create_collection("strategy_research");

    let pipeline =
        pipeline(&completion, &embedding, Arc::new(store), PipelineConfig::default());
    let error = pipeline.run(&context(), &CancelToken::new()).await.unwrap_err();

    assert_eq!(error.stage, PipelineStage::Refining);
    assert_eq!(error.initial_draft.as_deref(), Some("Tension A"));
}

#[tokio::test]
async fn blank_refined_output_is_a_refining_failure() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_text("   "),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let store = InMemoryVectorStore::new(2);
    store.create_collection("strategy_research");

    let pipeline =
        pipeline(&completion, &embedding, Arc::new(store), PipelineConfig::default());
    let error = pipeline.run(&context(), &CancelToken::new()).await.unwrap_err();

    assert_eq!(error.stage, PipelineStage::Refining);
    assert!(matches!(error.source, ProviderError::Unavailable(_)));
}

#[tokio::test]
async fn query_derivation_failure_degrades() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_error(ProviderError::ContentFiltered("policy".to_string()))
            .with_text("Tension A"),
    );
    let embedding = Arc::new(MockEmbedding::new(2));
    let store = Arc::new(ScriptedStore::new());

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert!(artifact.retrieval_skipped);
    assert!(artifact.derived_query.is_none());
    assert_eq!(embedding.calls(), 0);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn blank_derived_query_degrades() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("  \n ")
            .with_text("Tension A"),
    );
    let embedding = Arc::new(MockEmbedding::new(2));
    let store = Arc::new(ScriptedStore::new());

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert!(artifact.retrieval_skipped);
    assert!(artifact.skip_cause.as_deref().unwrap().contains("derived query was empty"));
    assert_eq!(embedding.calls(), 0);
}

#[tokio::test]
async fn store_failure_degrades_with_a_visible_cause() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("Tension A")
            .with_text("query B")
            .with_text("Tension A"),
    );
    let embedding = Arc::new(MockEmbedding::new(2).with_vector(vec![0.1, 0.2]));
    let store = Arc::new(ScriptedStore::new().with_outcome(Err(
        ProviderError::CollectionNotFound("strategy_research".to_string()),
    )));

    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        PipelineConfig::default(),
    );
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert!(artifact.retrieval_skipped);
    assert!(artifact.skip_cause.as_deref().unwrap().contains("retrieving"));
    assert_eq!(artifact.derived_query.as_deref(), Some("query B"));
    // The refinement still happened, with the no-context marker.
    assert!(completion.requests()[2].prompt.contains(NO_CONTEXT_MARKER));
}

#[tokio::test]
async fn disabled_retrieval_is_explicit_and_flagged() {
    let completion = Arc::new(
        MockCompletion::new("stub").with_text("Tension A").with_text("Tension A"),
    );
    let embedding = Arc::new(MockEmbedding::new(2));
    let store = Arc::new(ScriptedStore::new());

    let config = PipelineConfig::default().without_retrieval();
    let pipeline = pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        config,
    );
    let artifact = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert!(artifact.retrieval_skipped);
    assert_eq!(artifact.skip_cause.as_deref(), Some("retrieval disabled by caller"));
    assert_eq!(completion.calls(), 2, "only draft and refine run without retrieval");
    assert_eq!(embedding.calls(), 0);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn concurrent_runs_do_not_share_state() {
    let completion = Arc::new(
        MockCompletion::new("stub")
            .with_text("draft 1")
            .with_text("draft 1")
            .with_text("draft 2")
            .with_text("draft 2"),
    );
    let embedding = Arc::new(MockEmbedding::new(2));
    let store = Arc::new(ScriptedStore::new());

    let config = PipelineConfig::default().without_retrieval();
    let pipeline = Arc::new(pipeline(
        &completion,
        &embedding,
        Arc::clone(&store) as Arc<dyn VectorStore>,
        config,
    ));

    // Sequential here to keep the scripted order deterministic; the point is
    // that the second run starts from a clean artifact.
    let first = pipeline.run(&context(), &CancelToken::new()).await.unwrap();
    let second = pipeline.run(&context(), &CancelToken::new()).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.initial_draft, "draft 1");
    assert_eq!(second.initial_draft, "draft 2");
}
