use std::{
    fmt::Display,
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use clap::{Parser as ClapParser, Subcommand as ClapSubcommand};
use ethrecover_common::{
    RecoveredKey, RecoveryError,
    recover::{Inspection, inspect_from_hex},
    recover_batch,
};
use eyre::{WrapErr, bail};
use serde::Serialize;
use tracing::{Level, debug, warn};

use crate::initializers::init_tracing;

#[allow(clippy::upper_case_acronyms)]
#[derive(ClapParser)]
#[command(
    name = "ethrecover",
    author = "Lambdaclass",
    version,
    about = "Recover the signer of raw signed Ethereum transactions"
)]
pub struct CLI {
    #[command(flatten)]
    pub opts: Options,
    #[command(subcommand)]
    pub command: Subcommand,
}

#[derive(ClapParser, Debug, Clone)]
pub struct Options {
    #[arg(
        long = "log.level",
        default_value_t = Level::WARN,
        value_name = "LOG_LEVEL",
        env = "ETHRECOVER_LOG_LEVEL",
        help = "The verbosity level used for logs.",
        long_help = "Possible values: info, debug, trace, warn, error",
        help_heading = "Logging options",
        global = true
    )]
    pub log_level: Level,
    #[arg(
        long = "log.color",
        default_value_t = LogColor::Auto,
        help = "Output logs with ANSI color codes.",
        long_help = "Possible values: auto, always, never",
        help_heading = "Logging options",
        env = "ETHRECOVER_LOG_COLOR",
        global = true
    )]
    pub log_color: LogColor,
}

#[derive(ClapSubcommand, Debug)]
pub enum Subcommand {
    #[command(
        name = "recover",
        about = "Recover the public key and address that signed each transaction"
    )]
    Recover {
        #[arg(
            value_name = "TX_HEX",
            help = "Raw signed transactions, hex encoded",
            long_help = "One raw transaction per argument. When neither transactions nor --file are given, transactions are read from stdin, one per line."
        )]
        transactions: Vec<String>,
        #[arg(
            long = "file",
            value_name = "FILE_PATH",
            help = "Read transactions from a file, one per line",
            conflicts_with = "transactions"
        )]
        file: Option<PathBuf>,
        #[arg(
            long = "output",
            default_value_t = OutputFormat::Json,
            value_name = "FORMAT",
            help = "Output format.",
            long_help = "Possible values: json, text"
        )]
        output: OutputFormat,
    },
    #[command(
        name = "inspect",
        about = "Show how a transaction was decoded along with its signer"
    )]
    Inspect {
        #[arg(required = true, value_name = "TX_HEX")]
        transaction: String,
        #[arg(
            long = "output",
            default_value_t = OutputFormat::Text,
            value_name = "FORMAT",
            help = "Output format.",
            long_help = "Possible values: json, text"
        )]
        output: OutputFormat,
    },
}

impl Subcommand {
    pub fn run(self, opts: &Options) -> eyre::Result<()> {
        init_tracing(opts)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self {
            Subcommand::Recover {
                transactions,
                file,
                output,
            } => {
                let inputs = read_inputs(transactions, file)?;
                let failed = write_recoveries(&inputs, output, &mut out)?;
                if failed > 0 {
                    bail!(
                        "{failed} of {} transactions could not be recovered",
                        inputs.len()
                    );
                }
            }
            Subcommand::Inspect {
                transaction,
                output,
            } => {
                let inspection = inspect_from_hex(&transaction)?;
                write_inspection(&inspection, output, &mut out)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogColor {
    #[default]
    Auto,
    Always,
    Never,
}

impl Display for LogColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogColor::Auto => write!(f, "auto"),
            LogColor::Always => write!(f, "always"),
            LogColor::Never => write!(f, "never"),
        }
    }
}

impl FromStr for LogColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(LogColor::Auto),
            "always" => Ok(LogColor::Always),
            "never" => Ok(LogColor::Never),
            _ => Err(format!(
                "Invalid log color '{s}'. Expected: auto, always, or never"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!(
                "Invalid output format '{s}'. Expected: json or text"
            )),
        }
    }
}

/// Collects the transactions to process from the arguments, a file, or stdin.
pub fn read_inputs(
    transactions: Vec<String>,
    file: Option<PathBuf>,
) -> eyre::Result<Vec<String>> {
    let inputs = if !transactions.is_empty() {
        transactions
    } else if let Some(path) = file {
        let contents = fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read transactions from {}", path.display()))?;
        non_empty_lines(contents.lines().map(str::to_owned))
    } else {
        debug!("No transactions given as arguments, reading from stdin");
        let lines = io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Failed to read transactions from stdin")?;
        non_empty_lines(lines)
    };

    if inputs.is_empty() {
        bail!("No transactions to recover");
    }
    Ok(inputs)
}

fn non_empty_lines(lines: impl IntoIterator<Item = String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[derive(Serialize)]
struct FailureRecord<'a> {
    input: &'a str,
    error: ErrorRecord,
}

#[derive(Serialize)]
struct ErrorRecord {
    kind: &'static str,
    message: String,
}

impl<'a> FailureRecord<'a> {
    fn new(input: &'a str, error: &RecoveryError) -> Self {
        Self {
            input: input.trim(),
            error: ErrorRecord {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }
}

/// Writes one record per input, in input order. Returns how many inputs failed.
pub fn write_recoveries(
    inputs: &[String],
    format: OutputFormat,
    out: &mut impl Write,
) -> eyre::Result<usize> {
    let mut failed = 0;
    for (input, result) in inputs.iter().zip(recover_batch(inputs)) {
        match result {
            Ok(key) => match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&key)?)?,
                OutputFormat::Text => write_key_text(&key, out)?,
            },
            Err(err) => {
                failed += 1;
                warn!(kind = err.kind(), "Failed to recover transaction signer: {err}");
                let record = FailureRecord::new(input, &err);
                match format {
                    OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&record)?)?,
                    OutputFormat::Text => {
                        writeln!(out, "input                   {}", record.input)?;
                        writeln!(
                            out,
                            "error                   {}: {}",
                            record.error.kind, record.error.message
                        )?;
                        writeln!(out)?;
                    }
                }
            }
        }
    }
    Ok(failed)
}

pub fn write_inspection(
    inspection: &Inspection,
    format: OutputFormat,
    out: &mut impl Write,
) -> eyre::Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(inspection)?)?;
        return Ok(());
    }

    writeln!(out, "type                    {}", inspection.tx_type)?;
    match inspection.chain_id {
        Some(chain_id) => writeln!(out, "chain id                {chain_id}")?,
        None => writeln!(out, "chain id                none (pre-EIP-155)")?,
    }
    writeln!(out, "nonce                   {}", inspection.nonce)?;
    writeln!(out, "contract creation       {}", inspection.contract_creation)?;
    writeln!(out, "recovery id             {}", inspection.recovery_id)?;
    writeln!(out, "signing hash            {:#x}", inspection.signing_hash)?;
    write_key_text(&inspection.key, out)
}

fn write_key_text(key: &RecoveredKey, out: &mut impl Write) -> eyre::Result<()> {
    writeln!(out, "address                 {}", key.address)?;
    writeln!(out, "uncompressed public key {}", key.uncompressed_public_key)?;
    writeln!(out, "compressed public key   {}", key.compressed_public_key)?;
    writeln!(out, "hashed public key       {}", key.hashed_public_key)?;
    writeln!(out, "v                       {}", key.v)?;
    writeln!(out, "r                       {}", key.r)?;
    writeln!(out, "s                       {}", key.s)?;
    writeln!(out, "signature               {}", key.signature)?;
    writeln!(out)?;
    Ok(())
}
