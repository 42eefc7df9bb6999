use clap::Parser;
use std::path::PathBuf;

/// Discover your Big Five personality profile from your writing, then talk it over with Arjus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Text to analyze
    #[arg(index = 1)] // Positional argument
    pub text: Option<String>,

    /// Read the text to analyze from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Chat with Arjus about the report once it is generated
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Path to the config file (defaults to ~/.config/mindmirror/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_text_and_flags() {
        let args = Args::parse_from(["mindmirror", "I love hiking", "-i", "--model", "gemini-x"]);
        assert_eq!(args.text.as_deref(), Some("I love hiking"));
        assert!(args.interactive);
        assert_eq!(args.model.as_deref(), Some("gemini-x"));
    }

    #[test]
    fn test_text_and_file_conflict() {
        let result = Args::try_parse_from(["mindmirror", "words", "--file", "essay.txt"]);
        assert!(result.is_err());
    }
}
