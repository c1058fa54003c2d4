//! # Codeword CLI - Barcode Symbology Translator
//!
//! Command-line interface for converting message strings into the ordinal
//! codewords a barcode symbology's encoder consumes.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use codeword::{
    cap_escape, digits, Code128Translation, Codeword, ErrorPolicy, TranslateChars,
};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// Codeword: barcode symbology message translator
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "codeword")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Translate a message into symbology ordinals
    Translate(TranslateArgs),

    /// Render a string in caret-escaped printable notation
    Escape(EscapeArgs),

    /// List the available symbology translations
    List,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct TranslateArgs {
    /// Message to translate (stdin if not specified)
    message: Option<String>,

    /// Read the message from a file instead
    #[arg(short, long, conflicts_with = "message")]
    input: Option<PathBuf>,

    /// Symbology translation to apply
    #[arg(short, long, default_value = "code128")]
    symbology: Symbology,

    /// Error policy for unresolvable input
    #[arg(long = "on-error", default_value = "ignore")]
    on_error: OnError,

    /// Replacement ordinal used with --on-error replace
    #[arg(long, default_value = "0")]
    replacement: u16,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct EscapeArgs {
    /// String to escape (stdin if not specified)
    message: Option<String>,

    /// Read the string from a file instead
    #[arg(short, long, conflicts_with = "message")]
    input: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Symbology {
    /// Decimal digits, one codeword per digit
    Digits,
    /// Code 128 code sets A/B/C with caret escapes
    Code128,
}

#[cfg(feature = "cli")]
impl Symbology {
    fn name(self) -> &'static str {
        match self {
            Symbology::Digits => "digits",
            Symbology::Code128 => "code128",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Symbology::Digits => "Decimal digits, one codeword per digit",
            Symbology::Code128 => "Code 128 code sets A/B/C with caret escapes",
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnError {
    Raise,
    Ignore,
    Replace,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct TranslationRecord {
    symbology: &'static str,
    message_chars: usize,
    codewords: Vec<Codeword>,
    count: usize,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Translate(ref args) => translate_command(args, &cli)?,
        Commands::Escape(ref args) => escape_command(args, &cli)?,
        Commands::List => list_command(&cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_message(message: &Option<String>, input: &Option<PathBuf>) -> Result<String> {
    let mut text = if let Some(message) = message {
        message.clone()
    } else if let Some(path) = input {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    };

    // Strip the trailing line ending a shell pipe usually appends.
    while text.ends_with('\n') || text.ends_with('\r') {
        text.pop();
    }
    Ok(text)
}

#[cfg(feature = "cli")]
fn translate_command(args: &TranslateArgs, cli: &Cli) -> Result<()> {
    let message = read_message(&args.message, &args.input)?;

    let policy = match args.on_error {
        OnError::Raise => ErrorPolicy::Raise,
        OnError::Ignore => ErrorPolicy::Ignore,
        OnError::Replace => ErrorPolicy::Replace(Codeword::Ordinal(args.replacement)),
    };

    if cli.verbose {
        eprintln!(
            "Translating {} character(s) with {}",
            message.chars().count(),
            args.symbology.name()
        );
    }

    let codewords = match args.symbology {
        Symbology::Digits => {
            let mut translation = digits();
            translation
                .translate(&message, policy)
                .collect::<codeword::Result<Vec<_>>>()
        }
        Symbology::Code128 => {
            let mut translation = Code128Translation::new();
            translation
                .translate(&message, policy)
                .collect::<codeword::Result<Vec<_>>>()
        }
    }
    .context("Translation failed")?;

    match cli.format {
        OutputFormat::Json => {
            let record = TranslationRecord {
                symbology: args.symbology.name(),
                message_chars: message.chars().count(),
                count: codewords.len(),
                codewords,
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Text => {
            let rendered: Vec<String> = codewords.iter().map(|c| c.to_string()).collect();
            println!("{}", rendered.join(" "));
            if cli.verbose {
                eprintln!("✓ Emitted {} codeword(s)", codewords.len());
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn escape_command(args: &EscapeArgs, cli: &Cli) -> Result<()> {
    let message = read_message(&args.message, &args.input)?;
    let escaped = cap_escape(&message);

    match cli.format {
        OutputFormat::Json => {
            let record = serde_json::json!({
                "input_chars": message.chars().count(),
                "escaped": escaped,
            });
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Text => {
            println!("{}", escaped);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn list_command(cli: &Cli) -> Result<()> {
    let symbologies = [Symbology::Digits, Symbology::Code128];

    match cli.format {
        OutputFormat::Json => {
            let entries: Vec<_> = symbologies
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name(),
                        "description": s.description(),
                        "stateful": matches!(s, Symbology::Code128),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            println!("Supported symbologies ({} total):", symbologies.len());
            println!();
            for symbology in symbologies {
                println!("{:10} {}", symbology.name(), symbology.description());
            }
        }
    }

    Ok(())
}
