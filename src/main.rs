// SPDX-License-Identifier: MPL-2.0
use pico_args::Arguments;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use testimonial_editor::config::{self, Config};
use testimonial_editor::diagnostics::{DiagnosticsCollector, JournalCapacity};
use testimonial_editor::editor::{Recipe, SessionHandle};
use testimonial_editor::media::{ExportFormat, ImageSource};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Apply an edit recipe to a testimonial image and export the result.

USAGE:
  testimonial-editor <INPUT> --output <FILE> [OPTIONS]

ARGS:
  <INPUT>                 Image file or http(s) URL

OPTIONS:
  -o, --output <FILE>     Where to write the exported image
  -r, --recipe <FILE>     TOML recipe with the edits to apply
  -f, --format <FORMAT>   MIME type or extension (default: from --output)
  -q, --quality <0..1>    Lossy encoder quality
  -c, --config <FILE>     Settings file (default: platform config dir)
      --report <FILE>     Write a diagnostics report as JSON
  -h, --help              Print help
  -V, --version           Print version

Set RUST_LOG (e.g. RUST_LOG=debug) to control log output.
";

#[derive(Debug)]
struct Flags {
    input: String,
    output: PathBuf,
    recipe: Option<PathBuf>,
    format: Option<String>,
    quality: Option<f32>,
    config: Option<PathBuf>,
    report: Option<PathBuf>,
}

enum Command {
    Run(Flags),
    Help,
    Version,
}

fn parse_args(raw: Vec<OsString>) -> Result<Command, String> {
    let mut args = Arguments::from_vec(raw);
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }
    if args.contains(["-V", "--version"]) {
        return Ok(Command::Version);
    }

    let output: PathBuf = args
        .value_from_str(["-o", "--output"])
        .map_err(|e| e.to_string())?;
    let recipe = args
        .opt_value_from_str(["-r", "--recipe"])
        .map_err(|e| e.to_string())?;
    let format = args
        .opt_value_from_str(["-f", "--format"])
        .map_err(|e| e.to_string())?;
    let quality = args
        .opt_value_from_str(["-q", "--quality"])
        .map_err(|e| e.to_string())?;
    let config = args
        .opt_value_from_str(["-c", "--config"])
        .map_err(|e| e.to_string())?;
    let report = args
        .opt_value_from_str("--report")
        .map_err(|e| e.to_string())?;

    let mut rest = args.finish().into_iter();
    let input = rest
        .next()
        .and_then(|s| s.into_string().ok())
        .ok_or("missing <INPUT>")?;
    if let Some(extra) = rest.next() {
        return Err(format!("unexpected argument: {}", extra.to_string_lossy()));
    }

    Ok(Command::Run(Flags {
        input,
        output,
        recipe,
        format,
        quality,
        config,
        report,
    }))
}

fn source_for(input: &str) -> ImageSource {
    if input.starts_with("http://") || input.starts_with("https://") {
        ImageSource::Url(input.to_string())
    } else {
        ImageSource::File(PathBuf::from(input))
    }
}

/// `--format` first (MIME or extension), then the output extension, then the
/// configured default.
fn resolve_mime(format: Option<&str>, output: &Path, config: &Config) -> String {
    if let Some(format) = format {
        return ExportFormat::from_extension(format)
            .map_or_else(|| format.to_string(), |f| f.mime().to_string());
    }
    output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ExportFormat::from_extension)
        .map_or_else(|| config.export.format.clone(), |f| f.mime().to_string())
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => config::load_from_path(path).map_err(|e| e.to_string()),
        None => {
            let (config, warning) = config::load();
            if let Some(key) = warning {
                tracing::warn!(%key, "using default settings");
            }
            Ok(config)
        }
    }
}

async fn run(flags: Flags) -> Result<(), String> {
    let config = load_config(flags.config.as_deref())?;
    let recipe = match &flags.recipe {
        Some(path) => Recipe::load_from_path(path).map_err(|e| e.to_string())?,
        None => Recipe::default(),
    };

    let mut collector = DiagnosticsCollector::new(JournalCapacity::default());
    let handle = SessionHandle::from_config(&config).with_diagnostics(collector.handle());

    let result = edit_and_export(&handle, &flags, &recipe, &config).await;

    for notification in handle.notifications().visible() {
        tracing::info!(severity = ?notification.severity(), "{}", notification.describe());
    }
    if let Some(path) = &flags.report {
        collector.process_pending();
        collector.export_to_file(path).map_err(|e| e.to_string())?;
        tracing::info!(path = %path.display(), "diagnostics report written");
    }
    result
}

async fn edit_and_export(
    handle: &SessionHandle,
    flags: &Flags,
    recipe: &Recipe,
    config: &Config,
) -> Result<(), String> {
    handle
        .load(source_for(&flags.input))
        .await
        .map_err(|e| e.to_string())?;

    {
        let mut session = handle.lock().await;
        recipe.apply(&mut session).map_err(|e| e.to_string())?;
    }

    let mime = resolve_mime(flags.format.as_deref(), &flags.output, config);
    let quality = flags.quality.unwrap_or(config.export.quality);
    let bytes = handle
        .save_image(&mime, quality)
        .await
        .ok_or_else(|| format!("export as {mime} failed"))?;

    tokio::fs::write(&flags.output, &bytes)
        .await
        .map_err(|e| format!("cannot write {}: {e}", flags.output.display()))?;
    tracing::info!(
        output = %flags.output.display(),
        %mime,
        bytes = bytes.len(),
        "image exported"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let flags = match parse_args(std::env::args_os().skip(1).collect()) {
        Ok(Command::Run(flags)) => flags,
        Ok(Command::Help) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("testimonial-editor {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match run(flags).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{message}");
            ExitCode::FAILURE
        }
    }
}
