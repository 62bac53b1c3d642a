//! Environment-sourced configuration.
//!
//! Every option has a named variable; nothing here silently disables
//! retrieval: a run that needs the vector store and lacks its settings
//! fails with an error naming the missing variable, and skipping retrieval
//! requires the explicit `--no-retrieval` flag.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use strategist_model::GeminiConfig;
use strategist_rag::AstraConfig;

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_COMPLETION_MODEL: &str = "STRATEGIST_COMPLETION_MODEL";
pub const ENV_EMBEDDING_MODEL: &str = "STRATEGIST_EMBEDDING_MODEL";
pub const ENV_EMBEDDING_DIMENSION: &str = "STRATEGIST_EMBEDDING_DIMENSION";
pub const ENV_TIMEOUT_SECS: &str = "STRATEGIST_TIMEOUT_SECS";
pub const ENV_TOP_K: &str = "STRATEGIST_TOP_K";
pub const ENV_ASTRA_ENDPOINT: &str = "ASTRA_API_ENDPOINT";
pub const ENV_ASTRA_TOKEN: &str = "ASTRA_TOKEN";
pub const ENV_ASTRA_NAMESPACE: &str = "ASTRA_NAMESPACE";
pub const ENV_ASTRA_COLLECTION: &str = "ASTRA_COLLECTION";

const DEFAULT_COLLECTION: &str = "strategy_research";

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini: GeminiConfig,
    /// Present when the Astra variables are configured.
    pub astra: Option<AstraConfig>,
    pub collection: String,
    pub top_k: usize,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value for {name}: '{v}'")))
        .transpose()
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_key = var(ENV_GEMINI_API_KEY)
            .with_context(|| format!("{ENV_GEMINI_API_KEY} is not set"))?;

        let mut gemini = GeminiConfig::new(api_key);
        if let Some(model) = var(ENV_COMPLETION_MODEL) {
            gemini = gemini.with_completion_model(model);
        }
        if let Some(model) = var(ENV_EMBEDDING_MODEL) {
            gemini = gemini.with_embedding_model(model);
        }
        if let Some(dimension) = parsed_var::<usize>(ENV_EMBEDDING_DIMENSION)? {
            gemini = gemini.with_embedding_dimension(dimension);
        }
        if let Some(secs) = parsed_var::<u64>(ENV_TIMEOUT_SECS)? {
            gemini = gemini.with_timeout(Duration::from_secs(secs));
        }

        let astra = match (var(ENV_ASTRA_ENDPOINT), var(ENV_ASTRA_TOKEN)) {
            (Some(endpoint), Some(token)) => {
                let mut config = AstraConfig::new(endpoint, token, gemini.embedding_dimension);
                if let Some(namespace) = var(ENV_ASTRA_NAMESPACE) {
                    config = config.with_namespace(namespace);
                }
                if let Some(timeout) = gemini.timeout {
                    config = config.with_timeout(timeout);
                }
                Some(config)
            }
            (None, None) => None,
            (Some(_), None) => bail!("{ENV_ASTRA_ENDPOINT} is set but {ENV_ASTRA_TOKEN} is not"),
            (None, Some(_)) => bail!("{ENV_ASTRA_TOKEN} is set but {ENV_ASTRA_ENDPOINT} is not"),
        };

        let collection = var(ENV_ASTRA_COLLECTION).unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        let top_k = parsed_var::<usize>(ENV_TOP_K)?.unwrap_or(3);

        Ok(Self { gemini, astra, collection, top_k })
    }

    /// The vector-store settings, required unless the caller explicitly
    /// opted out of retrieval.
    pub fn require_astra(&self) -> Result<&AstraConfig> {
        self.astra.as_ref().with_context(|| {
            format!(
                "retrieval requires {ENV_ASTRA_ENDPOINT} and {ENV_ASTRA_TOKEN}; \
                 pass --no-retrieval to generate without external context"
            )
        })
    }
}
