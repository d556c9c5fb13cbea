use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use csv_streamy::io::{StopSignal, parse_file, split_file};
use csv_streamy::{CsvOptions, SplitConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "csv-streamy",
    version,
    about = "Command line tool to handle a csv file.",
    disable_help_flag = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print help
    #[arg(long, action = ArgAction::Help, global = true)]
    help: Option<bool>,
}

#[derive(Subcommand)]
enum Command {
    /// Split a csv file into pieces
    #[command(disable_help_flag = true)]
    Split(SplitArgs),
    /// Print every row of a csv file as a JSON object per line
    #[command(disable_help_flag = true)]
    Parse(ParseArgs),
}

#[derive(Args)]
struct CsvArgs {
    /// A csv file path
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: PathBuf,

    /// The input file has a headers row
    #[arg(short = 'h', long = "headers")]
    headers: bool,

    /// Fields are enclosed in double-quotes
    #[arg(short = 'd', long = "double-quotes")]
    double_quotes: bool,
}

impl CsvArgs {
    fn options(&self) -> CsvOptions {
        CsvOptions::new()
            .with_headers(self.headers)
            .with_double_quotes(self.double_quotes)
    }
}

#[derive(Args)]
struct SplitArgs {
    #[command(flatten)]
    csv: CsvArgs,

    /// NUMBER rows per output file
    #[arg(short = 'r', long = "rows", value_name = "NUMBER")]
    rows: Option<u64>,

    /// SIZE bytes per output file (K, M, G, T, P, E, Z, Y suffixes)
    #[arg(short = 'b', long = "bytes", value_name = "SIZE")]
    bytes: Option<String>,

    /// Add the input file's extension to each output file
    #[arg(short = 'x', long = "extension")]
    extension: bool,

    /// An output directory path (defaults to the current directory)
    #[arg(short = 'o', long = "output-dir", value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Print a diagnostic just before each output file is opened
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print a JSON report of the written files
    #[arg(long = "report")]
    report: bool,
}

#[derive(Args)]
struct ParseArgs {
    #[command(flatten)]
    csv: CsvArgs,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "csv_streamy=info" } else { "csv_streamy=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let verbose = matches!(&cli.command, Command::Split(args) if args.verbose);
    init_tracing(verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let stop = StopSignal::new();
    match cli.command {
        Command::Split(args) => split(args, &stop),
        Command::Parse(args) => {
            let stats = parse_file(&args.csv.file, io::stdout().lock(), args.csv.options(), &stop)?;
            tracing::info!(rows = stats.count, bytes = stats.amount, "parsed");
            Ok(())
        }
    }
}

fn split(args: SplitArgs, stop: &StopSignal) -> Result<()> {
    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let config = SplitConfig {
        rows_per_file: args.rows,
        bytes_per_file: args.bytes,
        csv: args.csv.options(),
        ..SplitConfig::default()
    };
    tracing::info!(
        file = %args.csv.file.display(),
        output_dir = %output_dir.display(),
        headers = config.csv.has_headers,
        double_quotes = config.csv.has_double_quotes,
        rows = ?config.rows_per_file,
        bytes = ?config.bytes_per_file,
        extension = args.extension,
        "split options"
    );

    let report = split_file(&args.csv.file, &output_dir, &config, args.extension, stop)?;
    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
