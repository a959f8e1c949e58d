//! Command-line site broadcast composer.
//!
//! Reads broadcast options from a JSON file, stdin or flags, fits them into
//! the character budget and prints the `/broadcast` command. Exits with code 2
//! when even the smallest composition is over the limit.

mod config;
mod error;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use broadcast_core::{BroadcastGenerator, BroadcastOptions, BroadcastResult, MessageCatalog};
use broadcaster::{ExportError, FileSink, LengthBand, OutputView, Renderer};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{CliError, Result};

/// Exit code when the broadcast does not fit.
const EXIT_OVERFLOW: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "broadcast-cli")]
#[command(about = "Compose a site broadcast that fits the character limit")]
struct Args {
    /// Options JSON file, or `-` for stdin. Flags below are applied on top.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Site status (e.g. "SCP BREACH")
    #[arg(long)]
    status: Option<String>,

    /// Threat level (e.g. HIGH)
    #[arg(long)]
    alarm: Option<String>,

    /// Testing state (e.g. PROHIBITED)
    #[arg(long)]
    testing: Option<String>,

    /// Active event, repeatable (e.g. "076 EVENT")
    #[arg(long)]
    event: Vec<String>,

    /// Breached entity label, repeatable (e.g. SCP-173)
    #[arg(long)]
    breached: Vec<String>,

    /// Require ID checks at checkpoints
    #[arg(long)]
    id_check: bool,

    /// Authorization flag, repeatable (e.g. conX, scp008)
    #[arg(long)]
    auth: Vec<String>,

    /// Free text appended when there is room
    #[arg(long)]
    custom: Option<String>,

    /// Character budget. Falls back to BROADCAST_MAX_CHARS env.
    #[arg(long)]
    max_chars: Option<usize>,

    /// Catalog override JSON. Falls back to BROADCAST_CATALOG env.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Reveal the message with a typewriter animation
    #[arg(long)]
    animate: bool,

    /// Write the message to a file; refused when it overflows
    #[arg(long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(max_chars) = args.max_chars {
        config.generator.max_chars = max_chars;
        config.generator.validate()?;
    }
    if args.catalog.is_some() {
        config.catalog_path = args.catalog.clone();
    }

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog override");
            MessageCatalog::from_path(path)?
        }
        None => MessageCatalog::default(),
    };
    let generator = BroadcastGenerator::new(config.generator, catalog)?;

    let options = collect_options(&args)?;
    let result = generator.generate(&options);
    let overflow = result.overflow;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    let mut renderer = Renderer::new(config.reveal, config.generator.max_chars);
    if args.animate && !args.json {
        animate(&mut renderer, result).await?;
    } else {
        if !args.json {
            println!("{}", result.message);
        }
        renderer.show_instant(result);
    }

    if let Some(view) = renderer.view() {
        report(view);
    }

    if let Some(path) = &args.export {
        match renderer.export(&FileSink::new(path)).await {
            Ok(()) => {}
            // Already reported by the overflow warning.
            Err(ExportError::Overflow { .. }) => {}
            Err(e) => return Err(CliError::from(e).into()),
        }
    }

    if overflow {
        return Ok(ExitCode::from(EXIT_OVERFLOW));
    }
    Ok(ExitCode::SUCCESS)
}

/// Merge the options file (if any) with command-line flags.
fn collect_options(args: &Args) -> Result<BroadcastOptions> {
    let mut options = match &args.options {
        Some(path) => read_options(path)?,
        None => BroadcastOptions::default(),
    };

    if let Some(status) = &args.status {
        options.status = Some(status.clone());
    }
    if let Some(alarm) = &args.alarm {
        options.alarm = Some(alarm.clone());
    }
    if let Some(testing) = &args.testing {
        options.testing = Some(testing.clone());
    }
    options.events.extend(args.event.iter().cloned());
    options.breached_entities.extend(args.breached.iter().cloned());
    if args.id_check {
        options.requirements.id_check = true;
    }
    for flag in &args.auth {
        options.requirements.authorizations.insert(flag.clone(), true);
    }
    if let Some(text) = &args.custom {
        options.custom_text = Some(text.clone());
    }

    Ok(options)
}

fn read_options(path: &Path) -> Result<BroadcastOptions> {
    let read_err = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };

    let json = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(read_err)?
    };

    Ok(serde_json::from_str(&json)?)
}

/// Reveal the message on stdout, redrawing the line on every frame.
async fn animate(renderer: &mut Renderer, result: BroadcastResult) -> io::Result<()> {
    let mut frames = renderer.subscribe();
    renderer.show(result);

    let printer = tokio::spawn(async move {
        let mut stdout = io::stdout();
        while frames.changed().await.is_ok() {
            let text = frames.borrow_and_update().clone();
            let _ = write!(stdout, "\r\x1b[2K{}", text);
            let _ = stdout.flush();
        }
    });

    renderer.finish().await;
    printer.abort();

    let mut stdout = io::stdout();
    writeln!(stdout, "\r\x1b[2K{}", renderer.displayed())?;
    Ok(())
}

/// Length gauge and overflow warning on stderr.
fn report(view: &OutputView) {
    let band = match view.band() {
        LengthBand::Ok => "ok",
        LengthBand::Warning => "near limit",
        LengthBand::Over => "over limit",
    };
    eprintln!("{} ({})", view.counter(), band);
    if let Some(warning) = view.warning() {
        eprintln!("{}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["broadcast-cli"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_flags_build_options() {
        let args = parse(&[
            "--status",
            "SCP BREACH",
            "--alarm",
            "HIGH",
            "--event",
            "076 EVENT",
            "--event",
            "CLASS-D RIOT",
            "--breached",
            "SCP-173",
            "--id-check",
            "--auth",
            "conX",
            "--custom",
            "Gate B sealed",
        ]);
        let options = collect_options(&args).unwrap();

        assert_eq!(options.status.as_deref(), Some("SCP BREACH"));
        assert_eq!(options.alarm.as_deref(), Some("HIGH"));
        assert_eq!(options.testing, None);
        assert_eq!(options.events, vec!["076 EVENT", "CLASS-D RIOT"]);
        assert_eq!(options.breached_entities, vec!["SCP-173"]);
        assert!(options.requirements.id_check);
        assert!(options.requirements.is_set("conX"));
        assert_eq!(options.custom_text(), Some("Gate B sealed"));
    }

    #[test]
    fn test_no_flags_is_empty() {
        let options = collect_options(&parse(&[])).unwrap();
        assert_eq!(options, BroadcastOptions::default());
    }

    #[test]
    fn test_flags_layer_over_file() {
        let path = std::env::temp_dir().join(format!("broadcast-options-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"status": "CLEAR", "alarmLevel": "LOW", "activeEvents": ["610 EVENT"]}"#,
        )
        .unwrap();

        let args = parse(&[
            "--options",
            path.to_str().unwrap(),
            "--status",
            "SITE LOCKDOWN",
            "--event",
            "076 EVENT",
        ]);
        let options = collect_options(&args).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(options.status.as_deref(), Some("SITE LOCKDOWN"));
        assert_eq!(options.alarm.as_deref(), Some("LOW"));
        assert_eq!(options.events, vec!["610 EVENT", "076 EVENT"]);
    }

    #[test]
    fn test_missing_options_file() {
        let args = parse(&["--options", "/nonexistent/options.json"]);
        let err = collect_options(&args).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
