//! Configuration schema.
//!
//! Hierarchy: `Config` → `ResearchAgentConfig`, `ContentCreatorConfig`,
//! `SharedConfig`, `ProvidersConfig`.
//!
//! JSON on disk uses **camelCase** keys; every field has a default so a
//! partial file is valid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Platform used when a platform has no spec of its own.
pub const DEFAULT_PLATFORM: &str = "youtube";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.trendscribe/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub research: ResearchAgentConfig,
    pub content: ContentCreatorConfig,
    pub shared: SharedConfig,
    pub providers: ProvidersConfig,
    pub paths: PathsConfig,
}

// ─────────────────────────────────────────────
// Model settings
// ─────────────────────────────────────────────

/// Backend model selection and sampling parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    pub name: String,
    pub temperature: f64,
    /// `None` leaves the backend default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.5-flash".to_string(),
            temperature: 0.4,
            max_tokens: None,
            top_p: None,
        }
    }
}

// ─────────────────────────────────────────────
// Logging toggles
// ─────────────────────────────────────────────

/// Run-log settings for one agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// File name of the run store inside `paths.logsDir`.
    pub log_file: String,
    /// Write pipeline errors to a dedicated store as well.
    pub separate_error_log: bool,
    pub error_log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: "research_agent_logs.jsonl".to_string(),
            separate_error_log: false,
            error_log_file: "errors.jsonl".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Research agent
// ─────────────────────────────────────────────

/// Research Agent settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchAgentConfig {
    pub model: ModelConfig,
    pub system_prompt: String,
    pub search_limits: SearchLimits,
    pub logging: LoggingConfig,
    /// Maximum reasoning/tool rounds per invocation.
    pub max_rounds: usize,
}

impl Default for ResearchAgentConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            system_prompt: RESEARCH_SYSTEM_PROMPT.to_string(),
            search_limits: SearchLimits::default(),
            logging: LoggingConfig::default(),
            max_rounds: 20,
        }
    }
}

/// Default result limits for the discussion-search tools.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchLimits {
    pub subreddit_search_limit: usize,
    pub content_search_limit: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            subreddit_search_limit: 8,
            content_search_limit: 8,
        }
    }
}

// ─────────────────────────────────────────────
// Content creator agent
// ─────────────────────────────────────────────

/// Content Agent settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentCreatorConfig {
    pub model: ModelConfig,
    pub system_prompt: String,
    pub tool_prompts: ToolPrompts,
    /// Formatting parameters per platform name.
    pub platform_specs: BTreeMap<String, PlatformSpec>,
    /// Output folder per platform name. Every platform that can be saved
    /// must have an entry.
    pub output_paths: BTreeMap<String, String>,
    pub content_types: BTreeMap<String, ContentTypeSpec>,
    /// Tone name → tone description.
    pub tone_settings: BTreeMap<String, String>,
    pub logging: LoggingConfig,
    pub max_rounds: usize,
}

impl Default for ContentCreatorConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                temperature: 0.7,
                ..ModelConfig::default()
            },
            system_prompt: CONTENT_SYSTEM_PROMPT.to_string(),
            tool_prompts: ToolPrompts::default(),
            platform_specs: default_platform_specs(),
            output_paths: [
                ("youtube", "youtube_scripts"),
                ("tiktok", "tiktok_scripts"),
                ("article", "articles"),
                ("x", "x_threads"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            content_types: default_content_types(),
            tone_settings: default_tones(),
            logging: LoggingConfig {
                enabled: true,
                log_file: "content_creator_logs.jsonl".to_string(),
                separate_error_log: true,
                error_log_file: "content_creator_errors.jsonl".to_string(),
            },
            max_rounds: 20,
        }
    }
}

impl ContentCreatorConfig {
    /// Spec for `platform`, falling back to the default platform's spec.
    pub fn platform_spec(&self, platform: &str) -> PlatformSpec {
        self.platform_specs
            .get(platform)
            .or_else(|| self.platform_specs.get(DEFAULT_PLATFORM))
            .cloned()
            .unwrap_or_default()
    }

    /// Output folder for `platform`. There is no pluralization fallback.
    pub fn output_folder(&self, platform: &str) -> Result<&str, ConfigError> {
        self.output_paths
            .get(platform)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingOutputFolder(platform.to_string()))
    }

    /// Description for a tone name; unknown tones are used verbatim.
    pub fn tone_description(&self, tone: &str) -> String {
        self.tone_settings
            .get(tone)
            .cloned()
            .unwrap_or_else(|| tone.to_string())
    }

    /// Spec for a content type name, falling back to `educational`.
    pub fn content_type(&self, name: &str) -> ContentTypeSpec {
        self.content_types
            .get(name)
            .or_else(|| self.content_types.get("educational"))
            .cloned()
            .unwrap_or_default()
    }
}

/// Per-platform formatting parameters. Fields that do not apply to a
/// platform are left empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_length: Option<String>,
}

/// Description and outline for a content type.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentTypeSpec {
    pub description: String,
    pub structure: String,
}

/// Prompt templates used by the content tools. Placeholders use `{name}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolPrompts {
    pub research_prompt: String,
    pub trending_research_prompt: String,
    pub content_generation_prompt: String,
    pub article_generation_prompt: String,
    pub x_thread_generation_prompt: String,
    pub content_analysis_prompt: String,
}

impl Default for ToolPrompts {
    fn default() -> Self {
        Self {
            research_prompt: RESEARCH_PROMPT.to_string(),
            trending_research_prompt: TRENDING_RESEARCH_PROMPT.to_string(),
            content_generation_prompt: CONTENT_GENERATION_PROMPT.to_string(),
            article_generation_prompt: ARTICLE_GENERATION_PROMPT.to_string(),
            x_thread_generation_prompt: X_THREAD_GENERATION_PROMPT.to_string(),
            content_analysis_prompt: CONTENT_ANALYSIS_PROMPT.to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Shared settings
// ─────────────────────────────────────────────

/// Settings used by both agents.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharedConfig {
    /// Environment values that must be present before an agent is built.
    pub required_env_vars: Vec<String>,
    /// Documented timeouts in seconds. Not enforced per call.
    pub timeouts: TimeoutsConfig,
    /// Documented upstream rate limits. Not enforced.
    pub rate_limits: RateLimitsConfig,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            required_env_vars: vec![
                "GEMINI_API_KEY".to_string(),
                "REDDIT_CLIENT_ID".to_string(),
                "REDDIT_CLIENT_SECRET".to_string(),
            ],
            timeouts: TimeoutsConfig::default(),
            rate_limits: RateLimitsConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeoutsConfig {
    pub api_timeout: u64,
    pub tool_timeout: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            api_timeout: 30,
            tool_timeout: 45,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitsConfig {
    pub reddit_requests_per_minute: u32,
    pub google_requests_per_minute: u32,
}

impl Default for RateLimitsConfig {
    fn default() -> Self {
        Self {
            reddit_requests_per_minute: 60,
            google_requests_per_minute: 100,
        }
    }
}

// ─────────────────────────────────────────────
// Providers / credentials
// ─────────────────────────────────────────────

/// Upstream service settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub gemini: GeminiConfig,
    pub reddit: RedditConfig,
}

/// Reasoning backend + grounded search (same credential).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    pub api_key: String,
    /// OpenAI-compatible chat-completions base.
    pub api_base: String,
    /// Native API base used for grounded search.
    pub native_api_base: String,
    pub grounding_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            native_api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            grounding_model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Reddit application credentials and endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    /// Token endpoint host.
    pub auth_base: String,
    /// OAuth API host.
    pub api_base: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: "trendscribe/0.1 (research agent)".to_string(),
            auth_base: "https://www.reddit.com".to_string(),
            api_base: "https://oauth.reddit.com".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Paths
// ─────────────────────────────────────────────

/// Where logs and generated content are written.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathsConfig {
    pub logs_dir: String,
    /// Root under which per-platform output folders are created.
    pub output_root: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            logs_dir: "~/.trendscribe/logs".to_string(),
            output_root: ".".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Default tables
// ─────────────────────────────────────────────

fn default_platform_specs() -> BTreeMap<String, PlatformSpec> {
    let mut specs = BTreeMap::new();
    specs.insert(
        "tiktok".to_string(),
        PlatformSpec {
            hook_time: Some("0-3s".into()),
            pace: Some("fast".into()),
            style: "High-energy, trend-aware and informal. Land the core message in the first beat and keep every line punchy.".into(),
            optimal_duration: Some("15-30s".into()),
            ..Default::default()
        },
    );
    specs.insert(
        "youtube".to_string(),
        PlatformSpec {
            hook_time: Some("0-5s".into()),
            pace: Some("moderate".into()),
            style: "Informative narrative with a clear voiceover. Detailed and well sourced, aiming to be the go-to explainer on the topic.".into(),
            optimal_duration: Some("30-90s".into()),
            ..Default::default()
        },
    );
    specs.insert(
        "article".to_string(),
        PlatformSpec {
            style: "Scannable long-form: clear headings, short paragraphs, bullet points and bold key phrases. Authoritative but accessible.".into(),
            optimal_length: Some("500-800 words".into()),
            ..Default::default()
        },
    );
    specs.insert(
        "x".to_string(),
        PlatformSpec {
            style: "Every post stands on its own while the thread reads as one story. Direct, confident, professional.".into(),
            thread_length: Some("3-5".into()),
            ..Default::default()
        },
    );
    specs
}

fn default_content_types() -> BTreeMap<String, ContentTypeSpec> {
    [
        ("educational", "Explain a concept to an audience with little prior knowledge.", "Hook -> Core Concept -> Key Examples -> Summary"),
        ("how-to", "Walk the audience through accomplishing a specific task.", "Hook -> Setup -> Steps -> Result -> Tips"),
        ("storytelling", "Tell a narrative with a clear beginning, middle and end.", "Hook -> Setting -> Conflict -> Climax -> Resolution"),
        ("news", "Report a recent development factually and objectively.", "Headline -> Key Facts -> Context -> Outlook"),
        ("review", "Give a balanced assessment of a product, service or experience.", "Hook -> Overview -> Pros -> Cons -> Verdict"),
        ("comparison", "Compare options head-to-head on the criteria that matter.", "Hook -> Contenders -> Criteria -> Recommendation"),
    ]
    .into_iter()
    .map(|(name, description, structure)| {
        (
            name.to_string(),
            ContentTypeSpec {
                description: description.to_string(),
                structure: structure.to_string(),
            },
        )
    })
    .collect()
}

fn default_tones() -> BTreeMap<String, String> {
    [
        ("conversational", "Warm and informal, as if talking to a friend. Simple words, the occasional question."),
        ("authoritative", "Confident and expert. Direct statements backed by clear reasoning."),
        ("inspirational", "Uplifting and encouraging. Positive language and empowering stories."),
        ("humorous", "Witty and light-hearted while staying on topic."),
        ("intriguing", "Curiosity-driven. Questions and teasers that make the audience want more."),
        ("suspenseful", "Tense and atmospheric. Short sentences, information revealed slowly."),
        ("horror", "Eerie and unsettling. Dark imagery and a slow, chilling pace."),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ─────────────────────────────────────────────
// Default prompts
// ─────────────────────────────────────────────

pub const RESEARCH_SYSTEM_PROMPT: &str = "\
# ROLE
You are a senior research analyst. You produce unbiased, current intelligence by combining authoritative sources with public discussion.

# WORKFLOW
1. Run a grounded web search for an overview and recent authoritative sources.
2. Search Reddit for opinions, open questions and sentiment.
3. Report with these sections: Summary, Key Facts (3-5 bullets), Public Viewpoint (3-5 bullets), Gaps.

# RULES
Always use your tools; do not answer from memory. If a search fails or comes back empty, retry with a different query before concluding.";

pub const CONTENT_SYSTEM_PROMPT: &str = "\
# ROLE
You are a content strategist who turns any topic into platform-native content that earns attention.

# PRINCIPLES
1. The hook decides everything: the opening line or first seconds must grab attention.
2. Prefer plain, direct language; make complex topics easy.
3. Respect each platform's format and audience instead of reusing one draft everywhere.

# WORKFLOW
Read the research you are given, pick one compelling angle, draft to the platform's format, then tighten the draft for clarity and tone.";

pub const RESEARCH_PROMPT: &str = "\
# TASK
Research \"{topic}\" and compile a strategic brief for content on {platform_focus}. The current date is {current_date}.

# CHECKLIST
1. Key facts, figures and recent news from authoritative sources.
2. Reddit sentiment: overall mood, common questions, recurring themes.
3. Two or three specific, engaging content angles.

# OUTPUT
A Markdown report with no conversational filler:

### Key Factual Points
- 3-5 bullets

### Reddit Sentiment Analysis
- **Overall Sentiment**: one word
- **Dominant Themes**: 4-6 bullets

### Proposed Content Angles
- 2-3 bullets, one sentence each on why the angle works";

pub const TRENDING_RESEARCH_PROMPT: &str = "\
# TASK
Find what is trending right now in \"{category}\" only. The current date is {current_date}.

# CHECKLIST
1. Identify 3-5 rising or popular trends with your tools.
2. Describe the public sentiment around each.
3. Propose a content angle for each.

# OUTPUT
### Trending Topics
- **Trend**: name
  - **Sentiment**: short descriptor
  - **Content Angle**: one sentence";

pub const CONTENT_GENERATION_PROMPT: &str = "\
# SCRIPT BRIEF
- **Topic**: {topic}
- **Platform**: {platform}
- **Tone**: {tone_description}
- **Duration**: {duration}
- **Pacing**: {pace}

# CONTENT BRIEF
- **Description**: {content_description}
- **Structure**: {content_structure}

# STYLE
{style}

# RESEARCH SUMMARY
{research_summary}

# REQUIREMENTS
- Base the script on the research summary.
- The hook lands within {hook_time}.
- Structure: HOOK -> MAIN CONTENT -> CONCLUSION.
- Mark vocal emphasis as [EMPHASIS: text], pauses as [PAUSE], and sections with [0:00-0:05] timing cues.
- Short sentences written for a natural voiceover and readable captions.";

pub const ARTICLE_GENERATION_PROMPT: &str = "\
# TASK
Write a complete, publication-ready article.

- **Topic**: {topic}
- **Tone**: {tone_description}
- **Length**: {optimal_length}
- **Style**: {style}
- **Research Summary**: {research_summary}

# REQUIREMENTS
- Ground the article in the research summary.
- Include a compelling title, an engaging introduction, a body organized with headings, and a concise conclusion.
- Do not echo the brief or these instructions in the output.";

pub const X_THREAD_GENERATION_PROMPT: &str = "\
# X THREAD BRIEF
- **Topic**: {topic}
- **Tone**: {tone_description}
- **Length**: {thread_length} posts

# STYLE
{style}

# RESEARCH SUMMARY
{research_summary}

# REQUIREMENTS
- Ground the thread in the research summary.
- Each post stays under 280 characters and is numbered (1/N).
- The first post is the hook; hashtags (1-3) only on the last post.
- Return the whole thread as one string with posts separated by \"---\".";

pub const CONTENT_ANALYSIS_PROMPT: &str = "\
# ROLE
You are the final, brutally honest quality gate for content on {platform}. No flattery.

# OUTPUT
1. Verdict: **POST** or **TRASH**.
2. One paragraph explaining the verdict for {platform}.
3. If TRASH: the single highest-impact fix, or say it cannot be saved.

# CONTENT
- **Current Date**: {current_date}
- **Platform**: {platform}
- **Content**: {content_text}";

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
