//! # strategist-rag
//!
//! Retrieval-Augmented Generation for the Strategist planning workflow.
//!
//! The crate provides the vector-store backends and the
//! [`TensionPipeline`] orchestrator that chains draft generation, search-query
//! derivation, embedding, similarity search and context-aware refinement.
//!
//! Retrieval is best-effort enrichment: a transient embedding or store
//! outage degrades a run to "generated without external context" instead of
//! blocking it. Only the drafting and refining stages can abort a run.
//!
//! ## Backends
//!
//! | Type                  | Backend                                  |
//! |-----------------------|------------------------------------------|
//! | [`AstraVectorStore`]  | DataStax Astra Data API over HTTPS       |
//! | [`InMemoryVectorStore`] | In-process cosine scan (tests, demos)  |

pub mod astra;
pub mod inmemory;
pub mod pipeline;

pub use astra::{AstraConfig, AstraVectorStore};
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{NO_CONTEXT_MARKER, PipelineConfig, TensionPipeline};
