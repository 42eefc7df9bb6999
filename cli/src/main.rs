use clap::Parser;
use colored::*;
use log::LevelFilter;
use mindmirror_core::{Coordinator, GeminiClient, MindMirrorConfig};
use std::sync::Arc;

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::logging::{log_error, log_info};
use crate::output::print_usage_instructions;

fn parse_level(level: Option<&str>) -> LevelFilter {
    level
        .map(|level| match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Warn,
        })
        .unwrap_or(LevelFilter::Warn)
}

/// Main function - Analyzes the given text and optionally chats about the report
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // File and environment first, then command-line flags on top
    let overrides = MindMirrorConfig {
        api_key: args.api_key.clone(),
        model_name: args.model.clone(),
        ..MindMirrorConfig::default()
    };
    let config = MindMirrorConfig::load(args.config.as_deref())?.merge(&overrides);

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        parse_level(config.log_level.as_deref())
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.to_string()),
    )
    .init();

    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            log_error(&format!("Failed to read {}: {}", path.display(), e));
            e
        })?,
        (None, None) if args.interactive => app::read_text_from_stdin()?,
        (None, None) => {
            print_usage_instructions();
            return Ok(());
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("{}", format!("{}", e).red());
        return Err(e.into());
    }

    let client = GeminiClient::new(&config)?;
    log_info(&format!("Using model {}", client.model_name()));
    let mut coordinator = Coordinator::from_config(&config, Arc::new(client))?;

    if !app::run_analysis(&mut coordinator, &text).await? {
        log_error("No report was generated");
        return Ok(());
    }

    if args.interactive {
        if let Err(e) = app::run_interactive_chat(&mut coordinator).await {
            log_error(&format!("Error in interactive chat: {}", e));
            eprintln!("{}", format!("Interactive chat failed: {}", e).red());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(parse_level(Some("error")), LevelFilter::Error);
        assert_eq!(parse_level(Some("bogus")), LevelFilter::Warn);
        assert_eq!(parse_level(None), LevelFilter::Warn);
    }
}
