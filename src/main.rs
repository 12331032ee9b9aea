use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;
use volt::{Error, Interpreter, ast::print_program, parse_expression, parse_source, run_with, tokenize};

/// Exit status for source that does not parse.
const EXIT_PARSE_ERROR: u8 = 65;
/// Exit status for a program stopped by a runtime error.
const EXIT_RUNTIME_ERROR: u8 = 70;
/// Exit status for a script file that cannot be read.
const EXIT_IO_ERROR: u8 = 74;

/// volt runs VoltScript programs. Without a file or `--eval` it starts an
/// interactive session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to run.
    file: Option<PathBuf>,

    /// Runs the given source instead of a file.
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "file")]
    eval: Option<String>,

    /// Prints the token stream instead of running the program.
    #[arg(long)]
    tokens: bool,

    /// Prints the parsed program back as source instead of running it.
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,

    /// Enables debug logging on stderr. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = match (&args.eval, &args.file) {
        (Some(source), _) => source.clone(),
        (None, Some(path)) => match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Failed to read the input file '{}': {e}", path.display());
                return ExitCode::from(EXIT_IO_ERROR);
            },
        },
        (None, None) => return repl(),
    };

    if args.tokens {
        for token in tokenize(&source) {
            println!("{token}");
        }
        return ExitCode::SUCCESS;
    }

    if args.ast {
        return match parse_source(&source) {
            Ok(program) => {
                print!("{}", print_program(&program));
                ExitCode::SUCCESS
            },
            Err(e) => report(&e),
        };
    }

    match run_with(&mut Interpreter::new(), &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder().with_default_directive(default.into())
                                     .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(io::stderr)
                             .with_target(false)
                             .init();
}

fn report(error: &Error) -> ExitCode {
    eprintln!("{error}");
    match error {
        Error::Parse(_) => ExitCode::from(EXIT_PARSE_ERROR),
        Error::Runtime(_) => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

/// Reads lines from stdin until end of input.
///
/// A line that is a single expression has its value echoed. Anything else
/// runs as a program. Errors are reported and the session keeps its state.
fn repl() -> ExitCode {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            },
            None => {
                println!();
                return ExitCode::SUCCESS;
            },
        };
        if line.trim().is_empty() {
            continue;
        }

        let tokens = tokenize(&line);
        if let (Some(expr), errors) = parse_expression(&tokens)
           && errors.is_empty()
        {
            debug!("evaluating line as an expression");
            match interpreter.evaluate(&expr) {
                Ok(value) => println!("{}", value.repr()),
                Err(e) => eprintln!("{e}"),
            }
            continue;
        }

        if let Err(e) = run_with(&mut interpreter, &line) {
            eprintln!("{e}");
        }
    }
}
