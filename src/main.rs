use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::scanner::Scanner;
use rox::{Diagnostics, Session};

/// sysexits.h: EX_DATAERR
const EXIT_STATIC_ERROR: i32 = 65;
/// sysexits.h: EX_SOFTWARE
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file and prints its AST
    Parse {
        filename: Option<PathBuf>,

        /// Dump the AST as JSON instead of s-expressions
        #[arg(long)]
        json: bool,
    },

    /// Runs input from a file as a Lox program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive prompt
    Repl,
}

/// Reads a whole source file through a read-only memory map.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    let len = file
        .metadata()
        .context(format!("Failed to stat file {:?}", filename))?
        .len();

    // Mapping a zero-length file fails on most platforms.
    if len == 0 {
        return Ok(String::new());
    }

    // SAFETY: the map is read-only and dropped before this function returns;
    // the text is copied out first.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let source = std::str::from_utf8(&map)
        .context(format!("File {:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", len, filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env() // RUST_LOG overrides the default level
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Prints every diagnostic to stderr.
fn report(diagnostics: &Diagnostics) {
    for error in diagnostics.errors() {
        eprintln!("{}", error);
    }
}

fn exit_code(diagnostics: &Diagnostics) -> Option<i32> {
    if diagnostics.had_error() {
        Some(EXIT_STATIC_ERROR)
    } else if diagnostics.had_runtime_error() {
        Some(EXIT_RUNTIME_ERROR)
    } else {
        None
    }
}

fn no_input() {
    info!("No filepath provided");
    println!("No input filepath was provided. Exiting...");
}

fn tokenize(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);
        std::process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn parse(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut session = Session::new(Box::new(io::sink()));
    let mut diagnostics = Diagnostics::new();

    let statements = session.parse(&source, &mut diagnostics);

    if diagnostics.had_error() {
        report(&diagnostics);
        std::process::exit(EXIT_STATIC_ERROR);
    }

    if json {
        let dump = serde_json::to_string_pretty(&statements).context("Failed to serialize AST")?;
        println!("{}", dump);
    } else {
        let printer = AstPrinter;
        for stmt in &statements {
            println!("{}", printer.print_stmt(stmt));
        }
    }

    Ok(())
}

fn run(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut session = Session::new(Box::new(io::stdout()));

    let diagnostics = session.run(&source);
    report(&diagnostics);

    if let Some(code) = exit_code(&diagnostics) {
        debug!("Run failed, exiting with code {}", code);
        std::process::exit(code);
    }

    info!("Program executed successfully");
    Ok(())
}

fn repl() -> Result<()> {
    let mut session = Session::interactive(Box::new(io::stdout()));
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            break;
        }

        // Errors are per line: the next line starts clean.
        report(&session.run(&line));
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => match filename {
            Some(filename) => tokenize(&filename)?,
            None => no_input(),
        },

        Commands::Parse { filename, json } => match filename {
            Some(filename) => parse(&filename, json)?,
            None => no_input(),
        },

        Commands::Run { filename } => match filename {
            Some(filename) => run(&filename)?,
            None => no_input(),
        },

        Commands::Repl => repl()?,
    }

    Ok(())
}
