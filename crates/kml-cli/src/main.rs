use std::path::Path;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};

use kml_lexer::Scanner;
use kml_parser::{BuiltinElements, Diagnostics, FileEntry, ParseResult, UIElement};

#[derive(Parser)]
#[command(name = "kml")]
#[command(about = "KML: markup front-end for the UI toolkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Additional built-in element type names (repeatable)
    #[arg(long = "builtin", value_name = "NAME", global = true)]
    builtins: Vec<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Parse .kml files and report errors
    Check {
        /// Input .kml files, parsed as one batch
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the element trees and constants of .kml files
    Tree {
        /// Input .kml files, parsed as one batch
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the tokenized lines of a .kml file
    Lines {
        /// Input .kml file
        path: String,

        /// Collapse parenthesized groups into single tokens
        #[arg(long)]
        groups: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    let catalog = BuiltinElements::with_extra(cli.builtins.iter().cloned());

    match cli.command {
        Command::Check { paths } => cmd_check(&paths, &catalog),
        Command::Tree { paths } => cmd_tree(&paths, &catalog),
        Command::Lines { path, groups } => cmd_lines(&path, groups),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

/// Parse every path as one batch and print diagnostics. Exits on errors.
fn parse_batch(paths: &[String], catalog: &BuiltinElements) -> ParseResult {
    let files: Vec<FileEntry> = paths
        .iter()
        .map(|path| FileEntry::new(path.as_str(), read_source(path)))
        .collect();
    debug!("parsing {} file(s)", files.len());

    let mut diagnostics = Diagnostics::new();
    let result = kml_parser::parse_files(&files, catalog, &mut diagnostics);

    if !diagnostics.is_empty() {
        for diagnostic in diagnostics.iter() {
            eprintln!("{diagnostic}");
        }
        eprintln!("{} error(s)", diagnostics.len());
        std::process::exit(1);
    }

    result
}

fn cmd_check(paths: &[String], catalog: &BuiltinElements) {
    let result = parse_batch(paths, catalog);
    eprintln!(
        "OK: {} element(s), {} constant(s)",
        result.elements.len(),
        result.constants.len()
    );
}

fn cmd_tree(paths: &[String], catalog: &BuiltinElements) {
    let result = parse_batch(paths, catalog);

    for constant in &result.constants {
        println!("const {} = {}", constant.name, constant.value);
    }
    for element in &result.elements {
        println!("{}  ({})", element.root.type_name, element.file);
        for (name, variable) in &element.root.variables {
            if variable.value.is_empty() {
                println!("  var {name}");
            } else {
                println!("  var {name} = {}", variable.value);
            }
        }
        print_body(&element.root, 1);
    }
}

fn print_body(element: &UIElement, depth: usize) {
    let indent = "  ".repeat(depth);

    for property in &element.properties {
        let shape = property
            .shape()
            .map(|s| s.kind_name())
            .unwrap_or("invalid");
        println!("{indent}{} = {}  [{shape}]", property.name, property.value);
    }
    for child in &element.children {
        match &child.element_name {
            Some(name) => println!("{indent}child {} {name}", child.type_name),
            None => println!("{indent}child {}", child.type_name),
        }
        print_body(child, depth + 1);
    }
}

fn cmd_lines(path: &str, groups: bool) {
    let source = read_source(path);

    for (index, line) in Scanner::tokenize(&source).iter().enumerate() {
        let line = if groups {
            line.collapse_groups()
        } else {
            line.clone()
        };
        let tokens: Vec<String> = line.tokens().iter().map(|t| format!("{t:?}")).collect();
        println!("{index:>4} {:>4} | {}", line.number(), tokens.join(" "));
    }
}
