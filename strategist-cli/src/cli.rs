use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "strategist",
    version,
    about = "AI assistant for strategic planning and complex challenges",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Formulate the strategic tension, enriched with retrieved research
    Tension {
        /// Your organization, market and current situation
        #[arg(long)]
        context: String,
        /// The problem or opportunity you are facing
        #[arg(long)]
        challenge: String,
        /// Print the derived search query
        #[arg(long)]
        show_query: bool,
        /// Print the retrieved reference documents
        #[arg(long)]
        show_sources: bool,
        /// Skip retrieval and generate from the model alone
        #[arg(long)]
        no_retrieval: bool,
        /// Number of documents to retrieve (defaults to STRATEGIST_TOP_K or 3)
        #[arg(long)]
        limit: Option<usize>,
        /// Write the result to a markdown file; use `--out` alone for a
        /// date-stamped name or `--out=PATH` to pick one
        #[arg(
            long,
            value_name = "PATH",
            num_args = 0..=1,
            default_missing_value = "",
            require_equals = true
        )]
        out: Option<String>,
    },
    /// Run a single-shot analysis template
    Analyze {
        /// Template name, e.g. swot or brand-audit (see `templates`)
        template: String,
        /// Bind a placeholder, e.g. --set industry="retail banking"
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },
    /// List analysis templates and the placeholders each one requires
    Templates,
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
