//! imagen-studio - style-preset image generation with a session seed lock.

mod adapters;
mod cassette;
mod cli;
mod composer;
mod config;
mod context;
mod error;
mod model;
mod output;
mod params;
mod ports;
mod repl;
mod session;
mod style;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::composer::Composer;
use crate::config::Config;
use crate::context::{RecordingSession, ServiceContext};
use crate::error::{GenerationError, ImageError};
use crate::model::{resolve_model, validate_model};
use crate::output::{resolve_output_path, save_image};
use crate::params::validate_format;
use crate::session::Session;
use crate::style::{find_preset, valid_keys, PRESETS};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let ImageError::Generation(ref g) = e {
            if let Some(hint) = g.hint() {
                eprintln!("Hint: {hint}");
            }
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("imagen_studio={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), ImageError> {
    if cli.list_styles {
        for preset in PRESETS {
            println!("{:<15} {:<15} {}", preset.key, preset.label, preset.fragment);
        }
        return Ok(());
    }

    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(ImageError::Config)?;

    // Flags win over config defaults
    let model = resolve_model(cli.model.as_deref().unwrap_or(&config.defaults.model));
    validate_model(&model).map_err(ImageError::InvalidArgument)?;
    let format = cli.format.clone().unwrap_or_else(|| config.defaults.format.clone());
    validate_format(&format).map_err(ImageError::InvalidArgument)?;
    let style = cli.style.clone().unwrap_or_else(|| config.defaults.style.clone());
    if find_preset(&style).is_none() {
        return Err(GenerationError::InvalidStyle { label: style, valid: valid_keys() }.into());
    }

    let scene = if cli.interactive { None } else { Some(cli.resolve_prompt()?) };

    tracing::debug!(%model, %style, %format, config = %config_path.display(), "resolved settings");

    let (ctx, recording) = build_context(&config)?;
    let composer = Composer::new(ctx.generator, model, config.policy());
    if !composer.is_authenticated() {
        tracing::warn!("no Gemini API key configured");
    }
    let mut session = cli.seed.map_or_else(Session::new, Session::with_seed);

    let result = match scene {
        Some(scene) => {
            generate_one(&composer, &mut session, &style, &scene, &format, cli.output.as_deref())
                .await
        }
        None => {
            let settings = repl::ReplSettings { format };
            let stdin = std::io::stdin();
            repl::run(&composer, &mut session, style, &settings, stdin.lock(), &mut std::io::stderr())
                .await
        }
    };

    // The recorder can only be unwrapped once the generator is gone
    drop(composer);
    finish_recording(recording);

    result
}

/// Pick live, recording or replaying mode from the environment.
fn build_context(config: &Config) -> Result<(ServiceContext, Option<RecordingSession>), ImageError> {
    if let Ok(cassette) = std::env::var("IMAGEN_STUDIO_REPLAY") {
        tracing::info!(%cassette, "replaying from cassette");
        return Ok((ServiceContext::replaying(Path::new(&cassette))?, None));
    }
    let recording = std::env::var("IMAGEN_STUDIO_REC").is_ok_and(|v| v == "true" || v == "1");
    if recording {
        tracing::info!("recording mode enabled");
        return Ok(ServiceContext::recording(config));
    }
    Ok((ServiceContext::live(config), None))
}

async fn generate_one(
    composer: &Composer,
    session: &mut Session,
    style: &str,
    scene: &str,
    format: &str,
    output: Option<&str>,
) -> Result<(), ImageError> {
    eprintln!("Seed: {}", session.seed());
    let image = composer.generate_in(session, style, scene).await?;

    let path = resolve_output_path(output, scene, session.seed(), format);
    save_image(&image.data, &image.mime_type, format, &path)?;
    eprintln!("Saved: {}", path.display());
    Ok(())
}

fn finish_recording(recording: Option<RecordingSession>) {
    if let Some(session) = recording {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }
}
