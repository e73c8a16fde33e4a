//! Prompt template rendering with `{name}` placeholders.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ConfigError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("static regex"));

/// Substitute every `{name}` in `template` from `vars`.
///
/// `name` identifies the template in the error when a placeholder has no value.
/// Braces that do not wrap a lower-case identifier are left as-is.
pub fn render_template(
    name: &str,
    template: &str,
    vars: &HashMap<&str, String>,
) -> Result<String, ConfigError> {
    if let Some(missing) = PLACEHOLDER
        .captures_iter(template)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .find(|var| !vars.contains_key(var))
    {
        return Err(ConfigError::MissingTemplateVariable {
            template: name.to_string(),
            variable: missing.to_string(),
        });
    }

    Ok(PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ToolPrompts;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_basic() {
        let out = render_template(
            "greeting",
            "Research {topic} for {platform_focus}.",
            &vars(&[("topic", "rust"), ("platform_focus", "x")]),
        )
        .unwrap();
        assert_eq!(out, "Research rust for x.");
    }

    #[test]
    fn test_render_missing_variable() {
        let err = render_template("research_prompt", "{topic} on {current_date}", &vars(&[("topic", "t")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingTemplateVariable { ref template, ref variable }
                if template == "research_prompt" && variable == "current_date"
        ));
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let out = render_template("t", "{a}", &vars(&[("a", "{b}")])).unwrap();
        assert_eq!(out, "{b}");
    }

    #[test]
    fn test_non_placeholder_braces_kept() {
        let out = render_template("t", r#"JSON: {"k": 1} {topic}"#, &vars(&[("topic", "x")])).unwrap();
        assert_eq!(out, r#"JSON: {"k": 1} x"#);
    }

    #[test]
    fn test_default_prompts_render() {
        let prompts = ToolPrompts::default();
        let v = vars(&[
            ("topic", "t"),
            ("platform_focus", "all"),
            ("current_date", "2025-01-01"),
            ("category", "tech"),
            ("platform", "tiktok"),
            ("tone_description", "warm"),
            ("duration", "30s"),
            ("pace", "fast"),
            ("content_description", "d"),
            ("content_structure", "s"),
            ("style", "st"),
            ("research_summary", "r"),
            ("hook_time", "0-3s"),
            ("optimal_length", "500 words"),
            ("thread_length", "3-5"),
            ("content_text", "c"),
        ]);
        for (name, template) in [
            ("research_prompt", &prompts.research_prompt),
            ("trending_research_prompt", &prompts.trending_research_prompt),
            ("content_generation_prompt", &prompts.content_generation_prompt),
            ("article_generation_prompt", &prompts.article_generation_prompt),
            ("x_thread_generation_prompt", &prompts.x_thread_generation_prompt),
            ("content_analysis_prompt", &prompts.content_analysis_prompt),
        ] {
            let out = render_template(name, template, &v).unwrap();
            assert!(!PLACEHOLDER.is_match(&out), "{name} left a placeholder");
        }
    }
}
