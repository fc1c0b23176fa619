//! Command-line interface (CLI) for exparse
//!
//! This binary wraps [`interpret`] and the individual pipeline stages. It
//! evaluates an expression with either parsing strategy, prints its tokens or
//! tree, and compares the two strategies side by side. Interpretation errors
//! are printed to stderr as caret diagnostics and exit with status 1.
//!
//! An expression argument of `-` is read from standard input.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use exparse::{
    InterpretError, ParseStrategy, ast_to_string, evaluate, interpret, parse, tokenize,
};
use smartstring::alias::String as SmartString;
use std::io::{self, Write};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates an expression
    Eval {
        /// Expression text, or `-` to read it from stdin
        expression: SmartString,
        /// Parsing strategy: top-down or bottom-up
        #[arg(short, long, default_value_t = ParseStrategy::TopDown)]
        strategy: ParseStrategy,
        /// Print the parse steps
        #[arg(long)]
        steps: bool,
        /// Print the evaluation trace
        #[arg(long)]
        trace: bool,
    },
    /// Prints the tokens of an expression, one per line
    Tokens {
        /// Expression text, or `-` to read it from stdin
        expression: SmartString,
    },
    /// Prints the syntax tree of an expression
    Tree {
        /// Expression text, or `-` to read it from stdin
        expression: SmartString,
        /// Parsing strategy: top-down or bottom-up
        #[arg(short, long, default_value_t = ParseStrategy::TopDown)]
        strategy: ParseStrategy,
    },
    /// Parses an expression with both strategies and compares the results
    Compare {
        /// Expression text, or `-` to read it from stdin
        expression: SmartString,
    },
}

fn read_expression(arg: SmartString) -> Result<SmartString> {
    if arg != "-" {
        return Ok(arg);
    }
    let text = io::read_to_string(io::stdin()).context("can't read expression from stdin")?;
    Ok(text.trim().into())
}

/// Prints the diagnostic for `err` and exits with status 1.
fn fail(err: InterpretError, expression: &str) -> ! {
    log::debug!("interpretation failed: {:?}", err);
    eprintln!("{}", err.render(expression));
    std::process::exit(1)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut out = io::stdout().lock();

    match args.command {
        Commands::Eval {
            expression,
            strategy,
            steps,
            trace,
        } => {
            let expression = read_expression(expression)?;
            let result = interpret(&expression, strategy).unwrap_or_else(|e| fail(e, &expression));
            if steps {
                writeln!(out, "Parse steps ({strategy}):")?;
                for step in &result.parse_steps {
                    writeln!(out, "{step}")?;
                }
                writeln!(out)?;
            }
            if trace {
                writeln!(out, "Evaluation:")?;
                for line in &result.evaluation_steps {
                    writeln!(out, "{line}")?;
                }
                writeln!(out)?;
            }
            writeln!(out, "{}", result.result)?;
        }

        Commands::Tokens { expression } => {
            let expression = read_expression(expression)?;
            let tokens = tokenize(&expression).unwrap_or_else(|e| fail(e.into(), &expression));
            for token in &tokens {
                writeln!(out, "{token}")?;
            }
        }

        Commands::Tree {
            expression,
            strategy,
        } => {
            let expression = read_expression(expression)?;
            let tokens = tokenize(&expression).unwrap_or_else(|e| fail(e.into(), &expression));
            let result = parse(&tokens, strategy).unwrap_or_else(|e| fail(e.into(), &expression));
            writeln!(out, "{}", ast_to_string(&result.ast))?;
        }

        Commands::Compare { expression } => {
            let expression = read_expression(expression)?;
            let tokens = tokenize(&expression).unwrap_or_else(|e| fail(e.into(), &expression));
            let mut trees = Vec::new();
            for strategy in [ParseStrategy::TopDown, ParseStrategy::BottomUp] {
                let result =
                    parse(&tokens, strategy).unwrap_or_else(|e| fail(e.into(), &expression));
                let value = evaluate(&result.ast).unwrap_or_else(|e| fail(e.into(), &expression));
                writeln!(out, "{strategy}: {value} ({} steps)", result.steps.len())?;
                trees.push(result.ast);
            }
            let same = trees.windows(2).all(|w| w[0] == w[1]);
            writeln!(out, "trees equal: {same}")?;
            if !same {
                for tree in &trees {
                    writeln!(out, "{}", ast_to_string(tree))?;
                }
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
