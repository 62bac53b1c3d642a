//! # strategist-prompts
//!
//! Prompt template registry for the Strategist planning workflow.
//!
//! Every prompt the system sends lives here as a static [`Template`]
//! addressed by a [`TemplateId`]: the three tension-pipeline templates plus
//! the single-shot analyses (research, insights, briefs, frameworks, brand,
//! channels, metrics, team, SWOT/PESTLE). Rendering is a pure function
//! of the template and its placeholder bindings: an unbound placeholder is a
//! `Malformed` error, never an empty substitution, so a malformed request
//! fails before any provider is called.

mod catalog;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use strategist_core::{ProviderError, Result};

/// A named prompt template with its required placeholder names.
#[derive(Debug)]
pub struct Template {
    /// Kebab-case identifier, used on the command line and in logs.
    pub name: &'static str,
    /// Placeholder names that must be bound for rendering to succeed.
    pub required: &'static [&'static str],
    pub body: &'static str,
}

/// Matches `{placeholder_name}` in template bodies.
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("invalid placeholder pattern"))
}

macro_rules! template_ids {
    ($($variant:ident => $static_ref:path),+ $(,)?) => {
        /// Identifier for every template the system can render.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TemplateId {
            $($variant),+
        }

        impl TemplateId {
            /// Every template, in catalog order.
            pub const ALL: &'static [TemplateId] = &[$(TemplateId::$variant),+];

            /// The static template this identifier addresses.
            #[must_use]
            pub fn template(self) -> &'static Template {
                match self {
                    $(TemplateId::$variant => &$static_ref),+
                }
            }

            /// Kebab-case name, e.g. `brand-audit`.
            #[must_use]
            pub fn name(self) -> &'static str {
                self.template().name
            }
        }
    };
}

template_ids! {
    FormulateTension => catalog::FORMULATE_TENSION,
    DeriveSearchQuery => catalog::DERIVE_SEARCH_QUERY,
    RefineWithContext => catalog::REFINE_WITH_CONTEXT,
    SecondaryResearch => catalog::SECONDARY_RESEARCH,
    QuantitativeAnalysis => catalog::QUANTITATIVE_ANALYSIS,
    InterviewGuide => catalog::INTERVIEW_GUIDE,
    StrategicInsights => catalog::STRATEGIC_INSIGHTS,
    StrategyOptions => catalog::STRATEGY_OPTIONS,
    ClientBrief => catalog::CLIENT_BRIEF,
    CreativeBrief => catalog::CREATIVE_BRIEF,
    TacticalBrief => catalog::TACTICAL_BRIEF,
    GetToBy => catalog::GET_TO_BY,
    SingleMindedProposition => catalog::SINGLE_MINDED_PROPOSITION,
    TensionInsightIdea => catalog::TENSION_INSIGHT_IDEA,
    BrandAudit => catalog::BRAND_AUDIT,
    BenefitLadder => catalog::BENEFIT_LADDER,
    BrandPrism => catalog::BRAND_PRISM,
    CommunicationPlan => catalog::COMMUNICATION_PLAN,
    KpiRecommendation => catalog::KPI_RECOMMENDATION,
    EsovAnalysis => catalog::ESOV_ANALYSIS,
    EntryPointMap => catalog::ENTRY_POINT_MAP,
    TeamStructure => catalog::TEAM_STRUCTURE,
    Swot => catalog::SWOT,
    Pestle => catalog::PESTLE,
    OpportunityThreat => catalog::OPPORTUNITY_THREAT,
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateId {
    type Err = ProviderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s)
            .ok_or_else(|| ProviderError::Malformed(format!("unknown template '{s}'")))
    }
}

/// Materialize a template with the given placeholder bindings.
///
/// Fails with `Malformed` when a required placeholder is missing or blank,
/// or when the body references a name the caller did not bind.
pub fn render(id: TemplateId, values: &HashMap<String, String>) -> Result<String> {
    let template = id.template();

    for name in template.required {
        match values.get(*name) {
            Some(value) if !value.trim().is_empty() => {}
            _ => {
                return Err(ProviderError::Malformed(format!(
                    "template '{}' requires placeholder '{}'",
                    template.name, name
                )));
            }
        }
    }

    let regex = placeholder_regex();
    let mut result = String::with_capacity(template.body.len());
    let mut last_end = 0;

    for captures in regex.captures_iter(template.body) {
        let whole = captures.get(0).expect("match has a range");
        let name = &captures[1];
        let value = values.get(name).ok_or_else(|| {
            ProviderError::Malformed(format!(
                "template '{}' references unbound placeholder '{}'",
                template.name, name
            ))
        })?;
        result.push_str(&template.body[last_end..whole.start()]);
        result.push_str(value);
        last_end = whole.end();
    }
    result.push_str(&template.body[last_end..]);

    Ok(result)
}

/// Convenience constructor for placeholder bindings.
pub fn bindings<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
