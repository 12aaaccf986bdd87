//! Minimal CLI: model files → (skeleton | schema)
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::catalog::ModelCatalog;
use crate::convert::{Converter, Rendered, Target, FAILURE_MESSAGE};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// turn class definitions into an example JSON payload or a JSON-schema-ish document
#[derive(Parser, Debug)]
#[command(name = "json-skel", version)]
pub struct CommandLineInterface {
    /// more logging on stderr (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print an example payload filled with default values
    Skeleton(ConvertOut),
    /// print a JSON-schema-ish document with constraints and descriptions
    Schema(ConvertOut),
    /// list the classes defined by the model files
    Classes(ListOut),
}

#[derive(Args, Debug, Clone)]
struct ModelSettings {
    /// One or more model files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    model: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ConvertOut {
    #[command(flatten)]
    model_settings: ModelSettings,

    /// class to convert
    #[arg(long, short)]
    class: String,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ListOut {
    #[command(flatten)]
    model_settings: ModelSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ModelSettings {
    fn load_catalog(&self) -> Result<ModelCatalog> {
        let source_paths = resolve_file_path_patterns(&self.model)
            .context("failed to resolve model file paths")?;
        let mut catalog = ModelCatalog::new();
        for source_path in source_paths {
            let source_name = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read model file ({source_name})"))?;
            catalog.load_str(&source_name, &source)?;
        }
        tracing::info!(classes = catalog.len(), "model catalogue ready");
        Ok(catalog)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Logs go to stderr so stdout stays pure JSON.
    pub fn init_tracing(&self) {
        let default_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
        if let Err(error) = result {
            eprintln!("failed to initialize logging: {error}");
        }
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Skeleton(target) => target.convert(Target::Skeleton),
            Command::Schema(target) => target.convert(Target::Schema),
            Command::Classes(target) => {
                let catalog = target.model_settings.load_catalog()?;
                for name in catalog.names() {
                    println!("{name}");
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

impl ConvertOut {
    fn convert(&self, target: Target) -> Result<ExitCode> {
        let catalog = self.model_settings.load_catalog()?;
        let result = Converter::new(&catalog).render(target, &self.class);
        if let Ok(rendered) = &result {
            write_output(self.out.as_deref(), &rendered.json)?;
        }
        let (code, notice) = outcome(&result);
        if result.is_ok() {
            eprintln!("{}", notice.green());
        } else {
            eprintln!("{}", notice.red());
        }
        Ok(code)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Exit status and notice line for a finished conversion. Failures stay
/// generic; the error itself only goes to the debug log.
fn outcome(result: &crate::error::Result<Rendered>) -> (ExitCode, String) {
    match result {
        Ok(rendered) => (ExitCode::SUCCESS, rendered.success_message()),
        Err(error) => {
            tracing::debug!(%error, "conversion failed");
            (ExitCode::FAILURE, FAILURE_MESSAGE.to_string())
        }
    }
}

fn write_output(out: Option<&Path>, json: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{json}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, json).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote output");
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
