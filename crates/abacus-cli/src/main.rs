//! abacus - Command-line calculator
//!
//! Usage:
//!   abacus "2 + 3 * 4"                    # Single expression
//!   echo "sqrt(16)" | abacus              # Pipe mode
//!   abacus -f calculations.txt            # File mode
//!   abacus --convert length mile km 26.2  # Unit conversion
//!   abacus -i                             # Keypad REPL
//!   abacus --server                       # JSON-RPC over stdin/stdout

mod config;
mod server;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use abacus_core::{
    convert, evaluate, format_conversion, format_number, get_categories, Calculator, Category, Key,
};
use anyhow::{Context, Result};
use clap::Parser;

use config::{Config, ModeKind};

#[derive(Parser, Debug)]
#[command(name = "abacus", version)]
#[command(about = "A scientific calculator with unit conversion", long_about = None)]
struct Args {
    /// Expression to evaluate
    expression: Option<String>,

    /// Read expressions from file, one per line
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Convert a value: CATEGORY FROM TO VALUE
    #[arg(
        long,
        num_args = 4,
        value_names = ["CATEGORY", "FROM", "TO", "VALUE"],
        allow_negative_numbers = true
    )]
    convert: Option<Vec<String>>,

    /// List the units of a category
    #[arg(long, value_name = "CATEGORY")]
    units: Option<String>,

    /// List conversion categories
    #[arg(long)]
    categories: bool,

    /// Interactive keypad REPL
    #[arg(short, long)]
    interactive: bool,

    /// Run as JSON-RPC server (stdin/stdout)
    #[arg(long)]
    server: bool,

    /// History mode for keypad sessions
    #[arg(long, value_enum)]
    mode: Option<ModeKind>,

    /// User id for account mode
    #[arg(long)]
    user: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show only the result (no input echo)
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    if args.categories {
        for name in get_categories() {
            println!("{name}");
        }
    } else if let Some(category) = &args.units {
        print_units(category)?;
    } else if let Some(values) = &args.convert {
        run_convert(values, args.quiet)?;
    } else if let Some(expr) = &args.expression {
        eval_and_print(expr, args.quiet);
    } else if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        for line in content.lines() {
            eval_and_print(line, args.quiet);
        }
    } else if args.server || args.interactive {
        let config = Config::load(args.config.as_deref())?;
        let mode = config.session_mode(args.mode, args.user.as_deref())?;
        let mut calc = config.build_calculator(&mode)?;
        tracing::info!(?mode, "session started");

        if args.server {
            server::run_server(&mut calc)?;
        } else {
            run_repl(&mut calc)?;
        }
    } else if !io::stdin().is_terminal() {
        // Pipe mode (stdin is not a tty)
        for line in io::stdin().lock().lines() {
            let line = line?;
            eval_and_print(&line, args.quiet);
        }
    } else {
        eprintln!("Usage: abacus <expression>");
        eprintln!("       abacus -f <file>");
        eprintln!("       abacus --convert <category> <from> <to> <value>");
        eprintln!("       abacus -i");
        eprintln!("       echo \"2 + 2\" | abacus");
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr so server responses on stdout stay clean
fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("abacus_cli=debug,abacus_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn eval_and_print(input: &str, quiet: bool) {
    let input = input.trim();
    if input.is_empty() || input.starts_with('#') {
        if !quiet {
            println!("{input}");
        }
        return;
    }

    let result = match evaluate(input) {
        Ok(value) => format_number(value),
        Err(e) => format!("Error: {e}"),
    };

    if quiet {
        println!("{result}");
    } else {
        // Pad input to align results
        let padding = 40usize.saturating_sub(input.chars().count());
        println!("{input}{:>width$} = {result}", "", width = padding);
    }
}

fn run_convert(values: &[String], quiet: bool) -> Result<()> {
    let [category, from, to, value] = values else {
        anyhow::bail!("--convert takes CATEGORY FROM TO VALUE");
    };
    let amount: f64 = value
        .parse()
        .with_context(|| format!("Invalid value: {value}"))?;

    let result = convert(category, from, to, amount)?;
    if quiet {
        println!("{}", format_conversion(result));
    } else {
        println!(
            "{} {from} = {} {to}",
            format_number(amount),
            format_conversion(result)
        );
    }
    Ok(())
}

fn print_units(category: &str) -> Result<()> {
    let category = Category::parse(category)
        .ok_or_else(|| abacus_core::Error::UnknownCategory(category.to_string()))?;
    for unit in category.def().units {
        println!("{:<8} {}", unit.name, unit.label);
    }
    Ok(())
}

fn run_repl(calc: &mut Calculator) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("abacus - keypad calculator");
    println!("Type keys separated by spaces (e.g. `2 + 3 =`). `help` for keys, Ctrl+D to exit.\n");

    loop {
        print!("[{}] > ", calc.display());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!();
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            "history" => {
                for (i, entry) in calc.history().recent(10).iter().enumerate() {
                    println!("  {i:>2}  {} = {}", entry.expression, entry.result);
                }
                continue;
            }
            "clear-history" => {
                calc.clear_history();
                println!("History cleared.");
                continue;
            }
            _ => {}
        }

        if let Some(index) = line.strip_prefix("recall") {
            match index.trim().parse::<usize>() {
                Ok(index) => match calc.recall_history(index) {
                    Ok(()) => println!("{}", calc.display()),
                    Err(e) => println!("{e}"),
                },
                Err(_) => println!("Usage: recall <index>"),
            }
            continue;
        }

        for token in line.split_whitespace() {
            match token.parse::<Key>() {
                Ok(key) => calc.press(key),
                Err(e) => {
                    println!("{e}");
                    break;
                }
            }
        }

        match calc.pending_expression() {
            Some(pending) => println!("{pending} {}", calc.display()),
            None => println!("{}", calc.display()),
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"
Keys:
  0-9 .          Digits and decimal point
  + - * / pow mod
                 Binary operators
  =              Evaluate
  AC             Clear input and pending operation
  del            Delete last digit
  ± %            Toggle sign, percent
  MC MR M+ M-    Memory
  sin cos tan asin acos atan log ln sqrt fact
                 Apply to the current number
  pi e exp       Constants, exponent entry

Commands:
  history        Show the last 10 calculations
  recall N       Use the result of history entry N
  clear-history  Forget history
  help           Show this help
  quit           Exit the REPL
"#
    );
}
