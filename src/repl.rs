//! Interactive session: pick a style, manage the seed, generate repeatedly.

use std::io::{BufRead, Write};

use crate::composer::Composer;
use crate::error::{GenerationError, ImageError};
use crate::output::{resolve_output_path, save_image};
use crate::session::Session;
use crate::style::{find_preset, PRESETS};

const HELP: &str = "\
Commands:
  :styles          list style presets
  :style <key>     select a style preset
  :seed            show the current seed
  :reseed          draw a new seed
  :go [text]       generate (blank text gives a style-only image)
  :help            show this help
  :quit            leave the session
Any other line is used as the scene description and generated right away.";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List presets.
    Styles,
    /// Select a preset.
    Style(String),
    /// Show the seed.
    Seed,
    /// Draw a new seed.
    Reseed,
    /// Generate from the given scene text.
    Generate(String),
    /// Show help.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Empty,
    /// A `:command` that does not exist.
    Unknown(String),
}

/// Parse one input line.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return if line.is_empty() { Command::Empty } else { Command::Generate(line.to_string()) };
    };

    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let arg = arg.trim().to_string();
    match name {
        "styles" => Command::Styles,
        "style" => Command::Style(arg),
        "seed" => Command::Seed,
        "reseed" => Command::Reseed,
        "go" | "generate" => Command::Generate(arg),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    }
}

/// Settings that stay fixed for the whole interactive session.
pub struct ReplSettings {
    /// Output image format.
    pub format: String,
}

/// Run the session until `:quit` or end of input.
///
/// Generation failures are reported and the loop continues.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run<R: BufRead, W: Write>(
    composer: &Composer,
    session: &mut Session,
    mut style: String,
    settings: &ReplSettings,
    input: R,
    out: &mut W,
) -> Result<(), ImageError> {
    writeln!(out, "Style: {style}  Seed: {}  (:help for commands)", session.seed())?;

    for line in input.lines() {
        let line = line?;
        session.acknowledge();
        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Styles => {
                for preset in PRESETS {
                    let marker = if preset.key == style { '*' } else { ' ' };
                    writeln!(out, "{marker} {:<15} {}", preset.key, preset.fragment)?;
                }
            }
            Command::Style(key) => {
                session.edit();
                if let Some(preset) = find_preset(&key) {
                    style = preset.key.to_string();
                    writeln!(out, "Style: {} ({})", preset.key, preset.label)?;
                } else {
                    let err = GenerationError::InvalidStyle {
                        label: key,
                        valid: crate::style::valid_keys(),
                    };
                    writeln!(out, "Error: {err}")?;
                }
            }
            Command::Seed => writeln!(out, "Seed: {}", session.seed())?,
            Command::Reseed => {
                session.edit();
                writeln!(out, "Seed: {}", session.regenerate_seed())?;
            }
            Command::Unknown(name) => writeln!(out, "Unknown command ':{name}'. Try :help")?,
            Command::Generate(scene) => {
                generate_once(composer, session, &style, &scene, settings, out).await?;
            }
        }
    }
    Ok(())
}

async fn generate_once<W: Write>(
    composer: &Composer,
    session: &mut Session,
    style: &str,
    scene: &str,
    settings: &ReplSettings,
    out: &mut W,
) -> Result<(), ImageError> {
    writeln!(out, "Generating with seed {}...", session.seed())?;
    let result = composer.generate_in(session, style, scene).await;
    tracing::debug!(phase = ?session.phase(), "request finished");
    match result {
        Ok(image) => {
            let path = resolve_output_path(None, scene, session.seed(), &settings.format);
            match save_image(&image.data, &image.mime_type, &settings.format, &path) {
                Ok(()) => writeln!(out, "Saved: {}", path.display())?,
                Err(e) => writeln!(out, "Error: {e}")?,
            }
        }
        Err(e) => {
            writeln!(out, "Error: {e}")?;
            if let Some(hint) = e.hint() {
                writeln!(out, "Hint: {hint}")?;
            }
        }
    }
    Ok(())
}
