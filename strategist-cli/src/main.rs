mod cli;
mod settings;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Once;

use anyhow::{Context, Result};
use clap::Parser;
use strategist_core::{
    CancelToken, CompletionProvider, CompletionRequest, EmbeddingProvider, PipelineArtifact,
    RetryConfig, StrategicContext, VectorStore, execute_with_retry,
};
use strategist_model::{GeminiCompletionModel, GeminiEmbeddingModel};
use strategist_prompts::{TemplateId, render};
use strategist_rag::{AstraVectorStore, InMemoryVectorStore, PipelineConfig, TensionPipeline};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::settings::Settings;

static INIT: Once = Once::new();

/// Structured logging to stderr; stdout is reserved for the markdown output.
fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Templates => {
            cmd_templates();
            Ok(())
        }
        Commands::Analyze { template, set } => cmd_analyze(&template, set).await,
        Commands::Tension {
            context,
            challenge,
            show_query,
            show_sources,
            no_retrieval,
            limit,
            out,
        } => {
            cmd_tension(context, challenge, show_query, show_sources, no_retrieval, limit, out)
                .await
        }
    }
}

fn cmd_templates() {
    println!("Available templates:\n");
    for id in TemplateId::ALL {
        let template = id.template();
        println!("  {:<28} placeholders: {}", template.name, template.required.join(", "));
    }
    println!("\nBind placeholders with --set, e.g.:");
    println!("  strategist analyze swot --set company_overview=\"A regional grocery chain\"");
}

async fn cmd_analyze(template: &str, set: Vec<(String, String)>) -> Result<()> {
    let id: TemplateId = template.parse()?;
    let values: HashMap<String, String> = set.into_iter().collect();
    // Render before touching the environment so malformed requests fail fast.
    let prompt = render(id, &values)?;

    let settings = Settings::from_env()?;
    let completion = GeminiCompletionModel::new(settings.gemini)?;

    let retry = RetryConfig::default();
    let result = execute_with_retry(&retry, || {
        completion.complete(CompletionRequest::new(prompt.clone()))
    })
    .await
    .with_context(|| format!("analysis '{id}' failed"))?;

    println!("{}", result.text);
    Ok(())
}

async fn cmd_tension(
    context: String,
    challenge: String,
    show_query: bool,
    show_sources: bool,
    no_retrieval: bool,
    limit: Option<usize>,
    out: Option<String>,
) -> Result<()> {
    let settings = Settings::from_env()?;
    let strategic_context = StrategicContext::new(context, challenge)?;

    let completion = Arc::new(GeminiCompletionModel::new(settings.gemini.clone())?);
    let embedding = Arc::new(GeminiEmbeddingModel::new(settings.gemini.clone())?);

    let mut config = PipelineConfig::default()
        .with_collection(settings.collection.clone())
        .with_top_k(limit.unwrap_or(settings.top_k));

    let store: Arc<dyn VectorStore> = if no_retrieval {
        config = config.without_retrieval();
        // Placeholder store; the pipeline never touches it with retrieval off.
        Arc::new(InMemoryVectorStore::new(embedding.dimension()))
    } else {
        Arc::new(AstraVectorStore::new(settings.require_astra()?.clone())?)
    };

    let cancel = CancelToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling the run");
            ctrl_c_token.cancel();
        }
    });

    let pipeline = TensionPipeline::new(
        Arc::clone(&completion) as Arc<dyn CompletionProvider>,
        Arc::clone(&embedding) as Arc<dyn EmbeddingProvider>,
        store,
        config,
    );

    match pipeline.run(&strategic_context, &cancel).await {
        Ok(artifact) => {
            let output = format_artifact(&artifact, show_query, show_sources);
            println!("{output}");
            if let Some(path) = out {
                let path = write_markdown(&path, &output)?;
                eprintln!("saved to {path}");
            }
            Ok(())
        }
        Err(error) => {
            if let Some(draft) = &error.initial_draft {
                eprintln!(
                    "The {} stage failed; falling back to the unrefined draft.\n",
                    error.stage
                );
                println!("{draft}");
            }
            Err(error.into())
        }
    }
}

fn format_artifact(artifact: &PipelineArtifact, show_query: bool, show_sources: bool) -> String {
    let mut output = String::from("# Strategic tension\n\n");
    output.push_str(&artifact.refined);
    output.push('\n');

    if artifact.retrieval_skipped {
        let cause = artifact.skip_cause.as_deref().unwrap_or("unknown");
        output.push_str(&format!("\n> Generated without external context ({cause}).\n"));
    }

    if show_query {
        match &artifact.derived_query {
            Some(query) => output.push_str(&format!("\n**Search query:** {query}\n")),
            None => output.push_str("\n**Search query:** (none derived)\n"),
        }
    }

    if show_sources && !artifact.retrieved.is_empty() {
        output.push_str("\n## Retrieved sources\n\n");
        for (i, doc) in artifact.retrieved.iter().enumerate() {
            match doc.similarity {
                Some(similarity) => output.push_str(&format!(
                    "{}. ({similarity:.2}) {}\n",
                    i + 1,
                    doc.context_text()
                )),
                None => output.push_str(&format!("{}. {}\n", i + 1, doc.context_text())),
            }
        }
    }

    output
}

/// Write `content` to `path`, or to a date-stamped default when the caller
/// passed `--out` with no value.
fn write_markdown(path: &str, content: &str) -> Result<String> {
    let path = if path.is_empty() {
        format!("strategic_tension_{}.md", chrono::Local::now().format("%Y%m%d"))
    } else {
        path.to_string()
    };
    std::fs::write(&path, content).with_context(|| format!("failed to write {path}"))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};
    use strategist_core::RetrievedDocument;
    use uuid::Uuid;

    fn artifact() -> PipelineArtifact {
        let mut fields = Map::new();
        fields.insert("text".to_string(), json!("fact C"));
        PipelineArtifact {
            run_id: Uuid::new_v4(),
            initial_draft: "draft".to_string(),
            derived_query: Some("query B".to_string()),
            retrieved: vec![RetrievedDocument::new(fields).with_similarity(0.9)],
            refined: "refined text".to_string(),
            retrieval_skipped: false,
            skip_cause: None,
        }
    }

    #[test]
    fn test_format_artifact_basic() {
        let output = format_artifact(&artifact(), false, false);
        assert!(output.contains("refined text"));
        assert!(!output.contains("query B"));
        assert!(!output.contains("fact C"));
    }

    #[test]
    fn test_format_artifact_diagnostics() {
        let output = format_artifact(&artifact(), true, true);
        assert!(output.contains("query B"));
        assert!(output.contains("fact C"));
        assert!(output.contains("0.90"));
    }

    #[test]
    fn test_format_artifact_marks_degraded_runs() {
        let mut degraded = artifact();
        degraded.retrieval_skipped = true;
        degraded.skip_cause = Some("embedding: provider unavailable".to_string());
        degraded.retrieved.clear();
        let output = format_artifact(&degraded, false, false);
        assert!(output.contains("Generated without external context"));
        assert!(output.contains("embedding: provider unavailable"));
    }
}
