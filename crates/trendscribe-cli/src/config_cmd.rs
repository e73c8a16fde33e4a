//! `trendscribe config` — show the effective configuration.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use trendscribe_core::config::{get_config_path, save_config, Config, Credentials, ModelConfig, Preset};
use trendscribe_core::utils::expand_home;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the full configuration as JSON (credentials redacted)
    #[arg(long, default_value_t = false)]
    json: bool,

    /// List the available presets
    #[arg(long, default_value_t = false)]
    presets: bool,

    /// Write the effective configuration (preset included) to the config file
    #[arg(long, default_value_t = false)]
    save: bool,
}

pub fn run(config: &Config, path: Option<&Path>, args: ConfigArgs) -> Result<()> {
    if args.presets {
        println!();
        println!("{}", "Presets".cyan().bold());
        for preset in Preset::ALL {
            println!("  {}", preset.name());
        }
        println!();
        return Ok(());
    }

    if args.save {
        let target = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);
        save_config(config, Some(&target))
            .with_context(|| format!("failed to write {}", target.display()))?;
        println!("{} {}", "Saved".green(), target.display());
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&redacted(config))?);
        return Ok(());
    }

    print_summary(config, path);
    Ok(())
}

/// Copy of `config` with every credential blanked out.
fn redacted(config: &Config) -> Config {
    let mut copy = config.clone();
    for secret in [
        &mut copy.providers.gemini.api_key,
        &mut copy.providers.reddit.client_id,
        &mut copy.providers.reddit.client_secret,
    ] {
        if !secret.is_empty() {
            *secret = "***".to_string();
        }
    }
    copy
}

fn model_line(model: &ModelConfig) -> String {
    let mut line = format!("{} (temp {})", model.name, model.temperature);
    if let Some(max) = model.max_tokens {
        line.push_str(&format!(", max_tokens {max}"));
    }
    line
}

fn status(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "(not set)".red().to_string()
    }
}

fn print_summary(config: &Config, path: Option<&Path>) {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    println!();
    println!("{}", "Trendscribe configuration".cyan().bold());
    println!();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(defaults)".dimmed().to_string()
        }
    );
    println!("  {:<18} {}", "Research model:".bold(), model_line(&config.research.model));
    println!("  {:<18} {}", "Content model:".bold(), model_line(&config.content.model));
    println!(
        "  {:<18} research {} · content {}",
        "Max rounds:".bold(),
        config.research.max_rounds,
        config.content.max_rounds
    );
    println!("  {:<18} {}", "Logs:".bold(), expand_home(&config.paths.logs_dir).display());
    println!("  {:<18} {}", "Output root:".bold(), expand_home(&config.paths.output_root).display());

    println!();
    println!("  {}", "Output folders:".bold());
    for (platform, folder) in &config.content.output_paths {
        println!("    {:<10} {}", platform, folder);
    }

    println!();
    println!("  {}", "Credentials:".bold());
    println!("    {:<22} {}", "GEMINI_API_KEY", status(!config.providers.gemini.api_key.is_empty()));
    println!("    {:<22} {}", "REDDIT_CLIENT_ID", status(!config.providers.reddit.client_id.is_empty()));
    println!(
        "    {:<22} {}",
        "REDDIT_CLIENT_SECRET",
        status(!config.providers.reddit.client_secret.is_empty())
    );
    if let Err(e) = Credentials::from_config(config) {
        println!();
        println!("  {} {e}", "!".yellow().bold());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_credentials() {
        let mut config = Config::default();
        config.providers.gemini.api_key = "secret-key".into();
        let copy = redacted(&config);
        assert_eq!(copy.providers.gemini.api_key, "***");
        assert!(copy.providers.reddit.client_id.is_empty());
        assert_eq!(config.providers.gemini.api_key, "secret-key");
    }

    #[test]
    fn save_writes_effective_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::default().with_preset(Preset::Conservative);

        let args = ConfigArgs {
            json: false,
            presets: false,
            save: true,
        };
        run(&config, Some(&path), args).unwrap();

        let saved: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.research.model.temperature, 0.2);
    }

    #[test]
    fn model_line_includes_max_tokens() {
        let model = ModelConfig {
            max_tokens: Some(512),
            ..Default::default()
        };
        assert!(model_line(&model).ends_with("max_tokens 512"));
    }
}
