//! HTTP-level tests for the Astra Data API vector store.

use serde_json::json;
use strategist_core::{ProviderError, VectorStore};
use strategist_rag::{AstraConfig, AstraVectorStore};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> AstraConfig {
    AstraConfig::new(server.uri(), "AstraCS:test-token", 2).with_namespace("research")
}

#[tokio::test]
async fn search_posts_a_vector_find_and_parses_documents() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v1/research/briefs"))
        .and(header("Token", "AstraCS:test-token"))
        .and(body_partial_json(json!({
            "find": {
                "sort": {"$vector": [0.5, 0.25]},
                "options": {"limit": 3, "includeSimilarity": true}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "documents": [
                    {"_id": "1", "text": "fact C", "$similarity": 0.95},
                    {"_id": "2", "text": "fact D", "$similarity": 0.82}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = AstraVectorStore::new(config(&server)).unwrap();
    let results = store.search("briefs", &[0.5, 0.25], 3).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].fields["text"], "fact C");
    assert_eq!(results[0].similarity, Some(0.95));
    assert!(!results[0].fields.contains_key("$similarity"));
    assert!(results[0].similarity >= results[1].similarity);
}

#[tokio::test]
async fn empty_document_list_is_a_valid_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"documents": []}
        })))
        .mount(&server)
        .await;

    let store = AstraVectorStore::new(config(&server)).unwrap();
    let results = store.search("briefs", &[0.5, 0.25], 3).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn api_error_in_200_body_maps_to_collection_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "collection does not exist", "errorCode": "COLLECTION_NOT_EXIST"}]
        })))
        .mount(&server)
        .await;

    let store = AstraVectorStore::new(config(&server)).unwrap();
    let err = store.search("missing", &[0.5, 0.25], 3).await.unwrap_err();
    assert!(matches!(err, ProviderError::CollectionNotFound(_)), "{err}");
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let store = AstraVectorStore::new(config(&server)).unwrap();
    let err = store.search("briefs", &[0.5, 0.25], 3).await.unwrap_err();
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)), "{err}");
}

#[tokio::test]
async fn server_errors_map_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let store = AstraVectorStore::new(config(&server)).unwrap();
    let err = store.search("briefs", &[0.5, 0.25], 3).await.unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable(_)), "{err}");
}

#[tokio::test]
async fn limit_and_dimension_are_validated_before_any_request() {
    let server = MockServer::start().await;
    // No mock mounted: a network call would surface as Unavailable.
    let store = AstraVectorStore::new(config(&server)).unwrap();

    let err = store.search("briefs", &[0.5, 0.25], 0).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));

    let err = store.search("briefs", &[0.5, 0.25], 51).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));

    let err = store.search("briefs", &[0.5, 0.25, 0.1], 3).await.unwrap_err();
    assert!(matches!(err, ProviderError::DimensionMismatch { expected: 2, actual: 3 }));
}
