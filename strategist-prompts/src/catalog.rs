//! Template bodies for the pipeline stages and every single-shot analysis.
//!
//! Placeholders use `{snake_case}` names; each template lists the names it
//! requires and rendering rejects unbound ones. Output-format instructions
//! ask for markdown because the presentation layer renders results as
//! formatted text.

use crate::Template;

pub(crate) static FORMULATE_TENSION: Template = Template {
    name: "formulate-tension",
    required: &["business_context", "challenge"],
    body: r#"Based on the following information:

**Context:** {business_context}
**Challenge:** {challenge}

Formulate the problem as a strategic tension (an apparent paradox) using the format:
"[Group] wants [goal], but [barrier]"

Include:
1. The core tension (1-2 sentences)
2. A brief explanation of the conflict (50 words)
3. 3 key questions that need to be answered

Output in markdown with clear formatting."#,
};

pub(crate) static DERIVE_SEARCH_QUERY: Template = Template {
    name: "derive-search-query",
    required: &["draft"],
    body: r#"From the strategic-tension formulation below, produce one short, focused search query (under 15 words) that would surface market research, case studies, or reference material relevant to the tension. Return only the query text, with no quotes and no commentary.

{draft}"#,
};

pub(crate) static REFINE_WITH_CONTEXT: Template = Template {
    name: "refine-with-context",
    required: &["draft", "context"],
    body: r#"Below is a strategic-tension formulation, followed by reference material retrieved from a knowledge base.

## Draft
{draft}

## Reference material
{context}

Revise the draft, keeping its structure and markdown formatting intact. Incorporate only findings from the reference material that are genuinely relevant to the tension. If nothing in the reference material is relevant, return the draft materially unchanged. Do not invent sources or facts that appear in neither the draft nor the reference material."#,
};

pub(crate) static SECONDARY_RESEARCH: Template = Template {
    name: "secondary-research",
    required: &["tension", "research_topics"],
    body: r#"Based on the strategic tension:
{tension}

Carry out a secondary-research analysis covering:
{research_topics}

Include:
1. 3-5 relevant, credible sources
2. Key findings (bullet points)
3. How these findings relate to the problem
4. 2-3 preliminary hypotheses

Format: markdown with clear sections."#,
};

pub(crate) static QUANTITATIVE_ANALYSIS: Template = Template {
    name: "quantitative-analysis",
    required: &["tension", "data_questions"],
    body: r#"Based on the strategic tension:
{tension}

Suggest an approach for analyzing quantitative data that answers:
{data_questions}

Include:
1. Recommended statistical methods
2. Suggested visualizations
3. Possible pitfalls
4. How to interpret the results

Format: markdown with examples."#,
};

pub(crate) static INTERVIEW_GUIDE: Template = Template {
    name: "interview-guide",
    required: &["tension", "interview_goals", "participant_profile"],
    body: r#"Based on the strategic tension:
{tension}

Create a qualitative interview guide for:
**Goal:** {interview_goals}
**Participants:** {participant_profile}

Include:
1. 5-7 main questions (open-ended)
2. Probing techniques (e.g. "Can you tell me more about...")
3. Projective exercises (e.g. "If it were a car, which one would it be?")
4. How to analyze the answers

Format: markdown with logical sections."#,
};

pub(crate) static STRATEGIC_INSIGHTS: Template = Template {
    name: "strategic-insights",
    required: &["tension", "research_data"],
    body: r#"Based on the following information:
**Strategic tension:** {tension}
**Research data:** {research_data}

Generate 3-5 deep strategic insights that:
1. Reveal behavioral or cultural patterns
2. Explain the root of the problem
3. Are surprising or counter-intuitive
4. Lead to strategic opportunities

Format for each insight:
### [Insight title]
**What it is:** [Clear description]
**Why it matters:** [Business impact]
**How to use it:** [Practical application]

Use markdown with rich formatting."#,
};

pub(crate) static STRATEGY_OPTIONS: Template = Template {
    name: "strategy-options",
    required: &["insights"],
    body: r#"Based on these insights:
{insights}

Develop 3 distinct strategic options, each with:
### [Strategy name]
**Core idea:** [1-2 sentences]
**Pros:** [3-5 strengths]
**Cons:** [2-3 limitations]
**Best for:** [When to use this approach]
**Implementation example:** [Concrete case]

The strategies must represent fundamentally different approaches."#,
};

pub(crate) static CLIENT_BRIEF: Template = Template {
    name: "client-brief",
    required: &["tension", "insights"],
    body: r#"Create a professional client brief (business focus) based on:
**Strategic tension:** {tension}
**Insights:** {insights}

Use the structure:
### Context
- Background
- Objective
- Target audience

### Challenge
- Core problem
- Barriers
- Opportunities

### Direction
- Tone
- Key message
- Call to action

### Client specifics
[Business data and metrics]

Format: professional markdown."#,
};

pub(crate) static CREATIVE_BRIEF: Template = Template {
    name: "creative-brief",
    required: &["tension", "insights"],
    body: r#"Create a professional creative brief based on:
**Strategic tension:** {tension}
**Insights:** {insights}

Use the structure:
### Context
- Background
- Objective
- Target audience

### Challenge
- Core problem
- Barriers
- Opportunities

### Direction
- Tone
- Key message
- Call to action

### Creative specifics
[Creative inspiration and references]

Format: professional markdown."#,
};

pub(crate) static TACTICAL_BRIEF: Template = Template {
    name: "tactical-brief",
    required: &["tension", "insights"],
    body: r#"Create a professional tactical brief (execution focus) based on:
**Strategic tension:** {tension}
**Insights:** {insights}

Use the structure:
### Context
- Background
- Objective
- Target audience

### Challenge
- Core problem
- Barriers
- Opportunities

### Direction
- Tone
- Key message
- Call to action

### Tactical specifics
[Channels, timeline and resources]

Format: professional markdown."#,
};

pub(crate) static GET_TO_BY: Template = Template {
    name: "get-to-by",
    required: &["tension", "insights"],
    body: r#"Apply the GET/TO/BY framework to this scenario:
**Tension:** {tension}
**Insights:** {insights}

Fill in:

### GET/TO/BY
**GET** [Audience]:
**TO** [Desired change]:
**BY** [Means/mechanism]:

Format: markdown with concrete examples."#,
};

pub(crate) static SINGLE_MINDED_PROPOSITION: Template = Template {
    name: "single-minded-proposition",
    required: &["tension", "insights"],
    body: r#"Apply the Single Minded Proposition framework to this scenario:
**Tension:** {tension}
**Insights:** {insights}

Define:

### Single Minded Proposition
**Proposition:** [1 impactful sentence]
**Reasons to believe:** [3 points]

Format: markdown with concrete examples."#,
};

pub(crate) static TENSION_INSIGHT_IDEA: Template = Template {
    name: "tension-insight-idea",
    required: &["tension", "insights"],
    body: r#"Develop the narrative for this scenario:
**Tension:** {tension}
**Insights:** {insights}

### Tension, then Insight, then Idea
**Tension:** [Recap]
**Key insight:** [From the research]
**Core idea:** [Creative solution]

Format: markdown with concrete examples."#,
};

pub(crate) static BRAND_AUDIT: Template = Template {
    name: "brand-audit",
    required: &["brand_name", "category"],
    body: r#"Carry out a complete brand audit for {brand_name} ({category}) answering 14 critical questions:

1. **Purpose**: Why does the brand exist beyond making money?
2. **Positioning**: How is it unique in consumers' minds?
3. **Architecture**: Masterbrand, House of Brands, or hybrid?
4. **Values**: Which 3-5 core values?
5. **Personality**: If it were a person, what would it be like?
6. **Visual identity**: Distinctive elements?
7. **Voice and tone**: How does it communicate?
8. **Experience**: Is the promise consistent at every touchpoint?
9. **Culture**: How is it internalized in the organization?
10. **Differentiation**: Real competitive advantages?
11. **Consistency**: Coherence over time?
12. **Relevance**: Importance to the target audience?
13. **Flexibility**: Capacity to evolve?
14. **Resilience**: How does it handle crises?

Format: a list with concise answers for each question."#,
};

pub(crate) static BENEFIT_LADDER: Template = Template {
    name: "benefit-ladder",
    required: &["brand_name", "category"],
    body: r#"Build a benefit ladder for {brand_name} ({category}) with 4 levels:

1. **Attributes**: Physical/functional characteristics
2. **Functional benefits**: What it does for the consumer
3. **Emotional benefits**: How it makes them feel
4. **Purpose**: Larger impact on the world

Example:
| Level | Content |
|-------|---------|
| Attribute | Carbonated drink with cola extract |
| Functional | Refreshes and revitalizes |
| Emotional | Creates moments of happiness |
| Purpose | Inspires optimism and human connection |"#,
};

pub(crate) static BRAND_PRISM: Template = Template {
    name: "brand-prism",
    required: &["brand_name", "category"],
    body: r#"Define the Brand Identity Prism for {brand_name} ({category}) across 6 dimensions:

1. **Physique**: Tangible characteristics
2. **Personality**: Human character
3. **Culture**: Values and origins
4. **Relationship**: Connection with consumers
5. **Self-image**: How users see themselves when using it
6. **Reflection**: How it reflects its consumers

Format: markdown table with examples."#,
};

pub(crate) static COMMUNICATION_PLAN: Template = Template {
    name: "communication-plan",
    required: &["goal", "budget"],
    body: r#"Create a complete communication plan for:
**Objective:** {goal}
**Budget:** {budget}

Include:

### 1. Content strategy
- Central theme
- Priority formats
- Tone of voice

### 2. Recommended channels
- Distribution by funnel phase (awareness, consideration, conversion)
- Ideal mix for the budget
- Emerging channels to consider

### 3. Calendar
- Campaign phases (teaser, launch, sustain)
- Publishing frequency
- Key moments

### 4. Metrics per channel
- Primary KPIs
- Expected benchmarks
- Measurement tools

Format: markdown with tables where applicable."#,
};

pub(crate) static KPI_RECOMMENDATION: Template = Template {
    name: "kpi-recommendation",
    required: &["goal"],
    body: r#"For the business objective of {goal}, recommend:

### Primary metrics
- 3-5 main KPIs
- Industry benchmarks
- How to measure them (tools)

### Secondary metrics
- Complementary indicators
- Early signals
- Quality metrics

### Common pitfalls
- Vanity metrics to avoid
- Attribution problems
- Common biases

Format: markdown with comparison tables."#,
};

pub(crate) static ESOV_ANALYSIS: Template = Template {
    name: "esov-analysis",
    required: &["market_position"],
    body: r#"For a brand in the {market_position} market position, analyze:

### Ideal ESOV situation
- Recommended share of voice percentage
- How to allocate it by channel
- Strategies to grow share of voice

### Current diagnosis
- How to calculate current share of voice
- Data sources
- Industry benchmarks

### Strategies
- Tactics for leaders
- Tactics for challengers
- Tactics for niche players

Format: markdown with examples."#,
};

pub(crate) static ENTRY_POINT_MAP: Template = Template {
    name: "entry-point-map",
    required: &["category"],
    body: r#"For the {category} category, identify:

### 5-7 main category entry points
- Situations
- Needs
- Mental triggers

### Strategies per entry point
- How to be present
- Key messages
- Priority channels

### Mapping example
| Entry point | Strategy | Example |
|-------------|----------|---------|
| [Moment]    | [Tactic] | [Case]  |

Format: complete markdown."#,
};

pub(crate) static TEAM_STRUCTURE: Template = Template {
    name: "team-structure",
    required: &["org_size", "project_scope"],
    body: r#"For a {org_size} organization working on {project_scope}, recommend:

### Essential team
- Critical roles
- Allocation (% of time)
- Key skills

### Operating model
- Structure (centralized vs. decentralized)
- Approval processes
- Collaboration tools

### Workload
- Required FTE
- Expected peaks
- Need for partners

### Recommended culture
- Team values
- Rhythms (sprints, reviews)
- Internal metrics

Format: markdown with a suggested org chart."#,
};

pub(crate) static SWOT: Template = Template {
    name: "swot",
    required: &["company_overview"],
    body: r#"Create a detailed SWOT analysis for:
{company_overview}

**Strengths:**
- 3-5 internal advantages
- How to sustain them

**Weaknesses:**
- 3-5 internal limitations
- How to mitigate them

**Opportunities:**
- 3-5 positive external factors
- How to capitalize on them

**Threats:**
- 3-5 external risks
- How to prepare

**Prioritization matrix:**
| Item | Impact | Likelihood | Priority |
|------|--------|------------|----------|
| [Item] | [High/Medium/Low] | [High/Medium/Low] | [1-5] |

Format: complete markdown."#,
};

pub(crate) static PESTLE: Template = Template {
    name: "pestle",
    required: &["industry"],
    body: r#"Carry out a PESTLE analysis for the {industry} industry:

**Political:**
- 3-5 factors
- Potential impact

**Economic:**
- 3-5 factors
- Potential impact

**Social:**
- 3-5 factors
- Potential impact

**Technological:**
- 3-5 factors
- Potential impact

**Legal:**
- 3-5 factors
- Potential impact

**Environmental:**
- 3-5 factors
- Potential impact

**Recommendations:**
- How to prepare
- Signals of change

Format: markdown with a summary table."#,
};

pub(crate) static OPPORTUNITY_THREAT: Template = Template {
    name: "opportunity-threat",
    required: &["market_trends"],
    body: r#"Based on these market trends:
{market_trends}

Identify:

### 3-5 strategic opportunities
- Description
- Time window
- Required resources
- Analogous cases

### 3-5 potential threats
- Nature of the risk
- Likelihood
- Warning signals
- Contingency plans

**Prioritization matrix:**
| Item | Impact | Readiness | Recommended action |
|------|--------|-----------|--------------------|
| [O/T] | [1-5] | [1-5] | [Guideline] |

Format: complete markdown."#,
};
