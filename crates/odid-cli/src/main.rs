use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use odid_core::{Report, ValidationConfig, Warnings};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("ODID_BUILD_COMMIT"),
    ", built ",
    env!("ODID_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "odid")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder and offline analyzer for Open Drone ID broadcast messages.",
    long_about = None,
    after_help = "Examples:\n  odid decode 52004641413132333435000000000000000000000000000000\n  odid check 5200464141\n  odid capture analyse capture.txt -o report.json"
)]
struct Cli {
    /// Enable debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one service-data frame (hex or base64) and print its messages.
    Decode {
        /// Service data, hex (optionally 0x-prefixed) or base64
        data: String,

        /// Sequence counter assigned to the first decoded message
        #[arg(long, default_value_t = 0)]
        counter: u32,

        /// Capture time in seconds since the Unix epoch
        #[arg(long, default_value_t = 0.0)]
        timestamp: f64,

        /// Print messages as JSON instead of CSV lines
        #[arg(long)]
        json: bool,

        /// Validation config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Report whether service data carries a recognizable message header.
    Check {
        /// Service data, hex (optionally 0x-prefixed) or base64
        data: String,
    },
    /// Operations on text capture files (offline-first).
    Capture {
        #[command(subcommand)]
        command: CaptureCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CaptureCommands {
    /// Analyse a capture file and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  odid capture analyse capture.txt -o report.json\n  odid capture analyze 'captures/*.txt' --stdout --pretty"
    )]
    Analyse {
        /// Path to a text capture (`<ts> <device> <service-data>` per line)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if validation warnings are present
        #[arg(long)]
        strict: bool,

        /// List validation warnings after analysis
        #[arg(long)]
        list_warnings: bool,

        /// Validation config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reference latitude for the distance check
        #[arg(long, requires = "reference_lon", allow_negative_numbers = true)]
        reference_lat: Option<f64>,

        /// Reference longitude for the distance check
        #[arg(long, requires = "reference_lat", allow_negative_numbers = true)]
        reference_lon: Option<f64>,
    },
}

#[derive(Debug)]
struct AnalyseOptions {
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_warnings: bool,
    config: Option<PathBuf>,
    reference: Option<(f64, f64)>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            data,
            counter,
            timestamp,
            json,
            config,
        } => cmd_decode(&data, counter, timestamp, json, config.as_deref()),
        Commands::Check { data } => return cmd_check(&data),
        Commands::Capture { command } => match command {
            CaptureCommands::Analyse {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_warnings,
                config,
                reference_lat,
                reference_lon,
            } => cmd_capture_analyse(
                input,
                AnalyseOptions {
                    report,
                    stdout,
                    pretty,
                    compact,
                    quiet,
                    strict,
                    list_warnings,
                    config,
                    reference: reference_lat.zip(reference_lon),
                },
            ),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    messages: &'a [odid_core::Message],
    skipped: &'a [odid_core::SkippedSubMessage],
    warnings: &'a Warnings,
}

fn cmd_decode(
    data: &str,
    counter: u32,
    timestamp: f64,
    json: bool,
    config: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config(config, None)?;
    let bytes = odid_core::decode_service_data(data).map_err(|err| {
        CliError::new(
            format!("invalid service data: {}", err),
            Some("pass hex (e.g. 0x52...) or base64".to_string()),
        )
    })?;
    let payload = odid_core::strip_transport_prefix(&bytes);
    let decoded = odid_core::decode(payload, 0, timestamp, counter).map_err(|err| {
        CliError::new(
            format!("no message decoded: {}", err),
            Some("service data must hold at least one 25-byte message".to_string()),
        )
    })?;

    let mut warnings = Warnings::new();
    for message in decoded.messages() {
        warnings.check(message, &config);
    }
    let skipped: &[odid_core::SkippedSubMessage] = match &decoded {
        odid_core::Decoded::Pack(expansion) => expansion.skipped.as_slice(),
        odid_core::Decoded::Single(_) => &[],
    };

    if json {
        let output = DecodeOutput {
            messages: decoded.messages(),
            skipped,
            warnings: &warnings,
        };
        let text = serde_json::to_string_pretty(&output).context("JSON serialization failed")?;
        println!("{}", text);
        return Ok(());
    }

    for message in decoded.messages() {
        println!(
            "{} {} {}",
            message.sequence_counter,
            message.kind(),
            message.to_csv()
        );
    }
    for entry in skipped {
        eprintln!("skipped sub-message {}: {}", entry.index, entry.reason);
    }
    for (kind, entries) in warnings.iter() {
        for warning in entries {
            eprintln!("warning: {}: {}", kind, warning);
        }
    }
    Ok(())
}

fn cmd_check(data: &str) -> ExitCode {
    if odid_core::is_valid_odid_service_data(data) {
        println!("valid");
        ExitCode::SUCCESS
    } else {
        println!("invalid");
        ExitCode::from(1)
    }
}

fn cmd_capture_analyse(input: PathBuf, opts: AnalyseOptions) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report = match (opts.stdout, opts.report.as_ref()) {
        (true, _) => None,
        (false, Some(path)) => Some(path.clone()),
        (false, None) => {
            return Err(CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            ));
        }
    };

    if let Some(report_path) = report.as_ref() {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    let config = load_config(opts.config.as_deref(), opts.reference)?;
    let rep = odid_core::analyze_capture_file(&resolved_input, &config)
        .context("capture analysis failed")?;
    let json = serialize_report(&rep, opts.pretty, opts.compact)?;

    match report {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !opts.quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    if opts.list_warnings && !opts.quiet {
        print_warnings(&rep);
    }
    if opts.strict && has_warnings(&rep) {
        return Err(CliError::new(
            "validation warnings detected",
            Some("use --list-warnings to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let Some(parent) = report_path.parent() else {
        return Ok(());
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    // A directory that does not exist yet cannot hold the input file.
    let report_dir = match fs::canonicalize(parent) {
        Ok(dir) => dir,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!(
                    "Failed to resolve output path: {}",
                    report_path.display()
                ))
                .into());
        }
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn load_config(path: Option<&Path>, reference: Option<(f64, f64)>) -> Result<ValidationConfig, CliError> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            ValidationConfig::from_json_str(&text).map_err(|err| {
                CliError::new(
                    format!("invalid config {}: {}", path.display(), err),
                    Some("expected a JSON object with reference_lat, reference_lon, max_distance_m, max_horizontal_speed_mps, max_vertical_speed_mps, operator_allow_list".to_string()),
                )
            })?
        }
        None => ValidationConfig::default(),
    };
    match reference {
        Some((lat, lon)) => config.with_reference(lat, lon).map_err(|err| {
            CliError::new(
                format!("invalid reference location: {}", err),
                Some("latitude must be within [-90, 90], longitude within [-180, 180]".to_string()),
            )
        }),
        None => Ok(config),
    }
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn has_warnings(rep: &Report) -> bool {
    rep.warnings.values().any(|entries| !entries.is_empty())
}

fn print_warnings(rep: &Report) {
    eprintln!("Validation warnings:");
    for (kind, entries) in &rep.warnings {
        for warning in entries {
            eprintln!("  {} {}", kind, warning);
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a text capture file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a text capture file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
