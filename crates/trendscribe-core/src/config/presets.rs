//! Named presets: overlays that produce a fresh `Config`.

use std::fmt;
use std::str::FromStr;

use super::schema::Config;
use crate::error::ConfigError;

/// A named bundle of config adjustments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    ViralFocused,
    EducationalFocused,
    Conservative,
    Creative,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::ViralFocused,
        Preset::EducationalFocused,
        Preset::Conservative,
        Preset::Creative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::ViralFocused => "viral_focused",
            Preset::EducationalFocused => "educational_focused",
            Preset::Conservative => "conservative",
            Preset::Creative => "creative",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl Config {
    /// Return a copy of this config with `preset` applied. `self` is untouched.
    pub fn with_preset(&self, preset: Preset) -> Config {
        let mut config = self.clone();
        let content = &mut config.content;

        match preset {
            Preset::ViralFocused => {
                content.model.temperature = 0.8;
                content.system_prompt.push_str(
                    "\n\nFOCUS: Shareability comes first. Lean on trending formats, current references and language people repeat.",
                );
                content.tool_prompts.content_generation_prompt.push_str(
                    "\n\nEXTRA FOCUS: Optimize for shares and rewatches. Use formats that are trending right now.",
                );
            }
            Preset::EducationalFocused => {
                content.model.temperature = 0.5;
                content.system_prompt.push_str(
                    "\n\nFOCUS: Accuracy and teaching value come first. Every claim should be well researched.",
                );
                content.tool_prompts.content_generation_prompt.push_str(
                    "\n\nEXTRA FOCUS: Be precise and make the complex parts easy to follow.",
                );
            }
            Preset::Conservative => {
                config.research.model.temperature = 0.2;
                content.model.temperature = 0.4;
            }
            Preset::Creative => {
                config.research.model.temperature = 0.6;
                content.model.temperature = 0.9;
                content.tool_prompts.content_generation_prompt.push_str(
                    "\n\nEXTRA FOCUS: Take an unexpected angle. Avoid the obvious take on the topic.",
                );
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!(matches!(
            "spicy".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(name)) if name == "spicy"
        ));
    }

    #[test]
    fn test_overlay_leaves_base_untouched() {
        let base = Config::default();
        let viral = base.with_preset(Preset::ViralFocused);

        assert_eq!(viral.content.model.temperature, 0.8);
        assert!(viral.content.system_prompt.ends_with("language people repeat."));
        assert_eq!(base.content.model.temperature, 0.7);
        assert!(!base.content.system_prompt.contains("FOCUS:"));
    }

    #[test]
    fn test_conservative_and_creative_temperatures() {
        let base = Config::default();

        let conservative = base.with_preset(Preset::Conservative);
        assert_eq!(conservative.research.model.temperature, 0.2);
        assert_eq!(conservative.content.model.temperature, 0.4);
        assert_eq!(conservative.content.system_prompt, base.content.system_prompt);

        let creative = base.with_preset(Preset::Creative);
        assert_eq!(creative.research.model.temperature, 0.6);
        assert_eq!(creative.content.model.temperature, 0.9);
        assert!(creative
            .content
            .tool_prompts
            .content_generation_prompt
            .contains("unexpected angle"));
    }

    #[test]
    fn test_presets_do_not_stack_on_base() {
        let base = Config::default();
        let once = base.with_preset(Preset::EducationalFocused);
        let again = base.with_preset(Preset::EducationalFocused);
        assert_eq!(once.content.system_prompt, again.content.system_prompt);
    }
}
