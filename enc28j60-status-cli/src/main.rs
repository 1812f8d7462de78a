//! # ENC28J60 Status Vector Decoder
//!
//! Command line front end of [`enc28j60_status`](https://docs.rs/enc28j60-status/).
//!
//! ## Overview
//!
//! Decodes Receive and Transmit Status Vectors given as arguments, or scans a firmware
//! debug log for the `Receive Status Vector: ...` and `Transmit Status Vector: ...` lines
//! the driver prints, and shows every field with its verdict.
//!
//! ```text
//! svdecode 3c008002
//! svdecode --join 40 00 80 00 40 00 00
//! svdecode --format json decode 0x3c008002 0x00088000
//! svdecode scan serial.log
//! ```
mod render;

use std::error::Error;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use enc28j60_status::{
    decode,
    stream::{DebugLogCodec, LogScanner},
};
use env_logger::Env;

use crate::render::{Entry, write_json, write_text};

const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

#[derive(ValueEnum, Debug, Default, Clone, Copy, Eq, PartialEq)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Eq, PartialEq, Clone, Debug)]
enum Command {
    /// Decode status vectors given as hex dumps
    Decode {
        #[arg(
            short,
            long,
            help = "Treat all arguments as one vector, for unquoted dumps like 3c 00 80 02"
        )]
        join: bool,
        vectors: Vec<String>,
    },
    /// Scan a firmware debug log for dumped status vectors
    Scan {
        #[arg(help = "The log file, stdin when omitted or '-'")]
        path: Option<PathBuf>,
        #[arg(
            short,
            long,
            help = "The longest accepted log line",
            default_value_t = DEFAULT_MAX_LINE_LENGTH
        )]
        max_line_length: usize,
    },
}

#[derive(Parser, Debug)]
#[command(
    about = "Decoder for ENC28J60 Receive and Transmit Status Vectors",
    long_about = None
)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[arg(
        short,
        long,
        help = "Print the description of every field",
        global = true
    )]
    describe: bool,

    #[arg(short, long, help = "Treat all arguments as one vector")]
    join: bool,

    /// Status vectors to decode when no subcommand is given
    vectors: Vec<String>,

    #[clap(subcommand)]
    command: Option<Command>,
}

fn decode_arguments(vectors: Vec<String>, join: bool) -> Vec<Entry> {
    let vectors = if join {
        vec![vectors.join(" ")]
    } else {
        vectors
    };
    vectors
        .into_iter()
        .map(|raw| {
            let outcome = decode(&raw);
            Entry::new(raw, outcome)
        })
        .collect()
}

fn scan_log(path: Option<PathBuf>, max_line_length: usize) -> Result<Vec<Entry>, Box<dyn Error>> {
    let reader: Box<dyn Read> = match path {
        Some(path) if path.as_os_str() != "-" => {
            log::info!("Scanning {}", path.display());
            Box::new(File::open(path)?)
        }
        _ => {
            log::info!("Scanning stdin");
            Box::new(io::stdin().lock())
        }
    };

    let codec = DebugLogCodec::new().max_line_length(max_line_length);
    let mut entries = Vec::new();
    for logged in LogScanner::with_codec(reader, codec) {
        let logged = logged?;
        let source = format!("line {}", logged.line());
        entries.push(Entry::new(source, logged.into_outcome()));
    }
    log::info!("Found {} status vectors", entries.len());
    Ok(entries)
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!(
        "Parsed arguments: format={:?}, describe={}",
        args.format,
        args.describe
    );

    let command = match args.command {
        Some(command) => command,
        None if !args.vectors.is_empty() => Command::Decode {
            join: args.join,
            vectors: args.vectors,
        },
        None => {
            println!(
                "No status vector given. Use svdecode <VECTOR>... to decode dumps or svdecode scan <PATH> to scan a debug log."
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let entries = match command {
        Command::Decode { join, vectors } => decode_arguments(vectors, join),
        Command::Scan {
            path,
            max_line_length,
        } => scan_log(path, max_line_length)?,
    };

    let mut stdout = io::stdout().lock();
    match args.format {
        Format::Text => write_text(&mut stdout, &entries, args.describe)?,
        Format::Json => write_json(&mut stdout, &entries)?,
    }

    let failed = entries.iter().filter(|e| e.outcome.is_err()).count();
    if failed > 0 {
        log::error!("{} of {} inputs could not be decoded", failed, entries.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;
    use enc28j60_status::VectorKind;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn positional_vectors() {
        let args = Args::try_parse_from(["svdecode", "3c008002", "abc"]).unwrap();
        assert_eq!(args.vectors, ["3c008002", "abc"]);
        assert!(args.command.is_none());
        assert_eq!(args.format, Format::Text);
    }

    #[test]
    fn scan_subcommand() {
        let args =
            Args::try_parse_from(["svdecode", "--format", "json", "scan", "serial.log"]).unwrap();
        assert_eq!(args.format, Format::Json);
        assert_eq!(
            args.command,
            Some(Command::Scan {
                path: Some(PathBuf::from("serial.log")),
                max_line_length: DEFAULT_MAX_LINE_LENGTH,
            })
        );
    }

    #[test]
    fn global_flags_before_decode() {
        let args = Args::try_parse_from(["svdecode", "--describe", "decode", "3c008002"]).unwrap();
        assert!(args.describe);
        assert!(args.vectors.is_empty());
        assert_eq!(
            args.command,
            Some(Command::Decode {
                join: false,
                vectors: vec!["3c008002".to_string()],
            })
        );

        let args = Args::try_parse_from(["svdecode", "decode", "-f", "json", "-j", "3c", "00"])
            .unwrap();
        assert_eq!(args.format, Format::Json);
        assert_eq!(
            args.command,
            Some(Command::Decode {
                join: true,
                vectors: vec!["3c".to_string(), "00".to_string()],
            })
        );
    }

    #[test]
    fn flags_before_positional_vectors() {
        let args = Args::try_parse_from(["svdecode", "--format", "json", "3c008002"]).unwrap();
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.vectors, ["3c008002"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn joined_arguments() {
        let args: Vec<String> = ["40", "00", "80", "00", "40", "00", "00"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let entries = decode_arguments(args.clone(), true);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].outcome.as_ref().unwrap().kind(),
            VectorKind::Transmit
        );

        let entries = decode_arguments(args, false);
        assert_eq!(entries.len(), 7);
        assert!(entries.iter().all(|e| e.outcome.is_err()));
    }
}
