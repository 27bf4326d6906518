//! CLI argument parsing with clap.

use clap::Parser;

use crate::session::SEED_MAX;

/// Style-preset image studio for Imagen with a session seed lock.
#[derive(Parser, Debug)]
#[command(name = "imagen-studio", version, about)]
pub struct Cli {
    /// Scene description (any language).
    #[arg(conflicts_with_all = ["prompt_file", "interactive"])]
    pub prompt: Option<String>,

    /// Path to a file containing the scene description.
    #[arg(short = 'p', long, conflicts_with_all = ["prompt", "interactive"])]
    pub prompt_file: Option<String>,

    /// Style preset key (see --list-styles). Defaults to the config value.
    #[arg(short = 'S', long)]
    pub style: Option<String>,

    /// Lock the session seed instead of drawing a random one.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(SEED_MAX)))]
    pub seed: Option<u32>,

    /// Model name or short alias. Defaults to the config value.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format: jpeg, png, webp. Defaults to the config value.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (auto-generated if not specified; one-shot only).
    #[arg(short, long, conflicts_with = "interactive")]
    pub output: Option<String>,

    /// Start an interactive session reading commands from stdin.
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the style presets and exit.
    #[arg(long)]
    pub list_styles: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the scene text from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is provided, or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path).map(|s| s.trim().to_string())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a scene description, use -p/--prompt-file, or start --interactive",
            ))
        }
    }
}
