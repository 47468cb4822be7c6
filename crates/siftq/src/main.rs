//! The siftq command line.
//!
//! - `siftq dump "<sql>"` — print tokens, the AST, and the typed tree at
//!   each pipeline stage, against a small demo schema.
//! - `siftq query <fixture.json> "<sql>"` — run one query against a JSON
//!   fixture and print the matching ids.
//! - `siftq run <dir>` — run every `.json` fixture under a directory;
//!   exit 0 iff every query matches its expected id list.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use sift_engine::{apply_type_conversions, find_clause, lower, simplify, Context, DataType};
use siftq::fixture::Fixture;
use siftq::json_rows::JSON_COLUMN;
use siftq::runner::{run_fixture, run_query};

#[derive(Parser)]
#[command(name = "siftq", version, about = "SQL expression engine harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print tokens, AST, and typed-tree stages for a query
    Dump {
        /// The query text, e.g. "SELECT * FROM t WHERE age > 21"
        sql: String,

        /// Print the token stream as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run one query against a JSON fixture and print matching ids
    Query {
        /// Path to a fixture file
        fixture: PathBuf,

        /// The query text
        sql: String,
    },
    /// Run every .json fixture under a directory
    Run {
        /// Directory to scan recursively for fixtures
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Dump { sql, json } => dump(&sql, json),
        Commands::Query { fixture, sql } => query(&fixture, &sql),
        Commands::Run { dir } => run_dir(&dir),
    };
    if let Err(message) = result {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

/// The demo schema the dump command resolves identifiers against.
fn demo_context() -> Context {
    let mut ctx = Context::with_defaults();
    ctx.register_column("id", DataType::Int, &JSON_COLUMN);
    ctx.register_column("name", DataType::String, &JSON_COLUMN);
    ctx.register_column("age", DataType::Int, &JSON_COLUMN);
    ctx.register_column("created", DataType::DateTime, &JSON_COLUMN);
    ctx
}

fn dump(sql: &str, as_json: bool) -> Result<(), String> {
    let ctx = demo_context();

    let tokens = ctx.tokenize(sql);
    println!(">> Tokens:\n");
    if as_json {
        let rendered =
            serde_json::to_string_pretty(&tokens).map_err(|e| format!("token dump: {e}"))?;
        println!("{rendered}");
    } else {
        for token in &tokens {
            // Function-ish tokens get their spec description, like the
            // registry they were classified against.
            match ctx.spec(&token.text) {
                Some(spec) => println!(
                    "{} [{}] {} @{}..{} ({})",
                    token.id,
                    token.kind.name(),
                    token.text,
                    token.span.start,
                    token.span.end,
                    spec.description
                ),
                None => println!(
                    "{} [{}] {} @{}..{}",
                    token.id,
                    token.kind.name(),
                    token.text,
                    token.span.start,
                    token.span.end
                ),
            }
        }
    }

    let Some(ast) = ctx.build_ast(&tokens) else {
        print_messages(&ctx);
        return Err("AST build failed".to_string());
    };
    println!("\n>> AST:\n");
    print!("{}", ast.dump());

    if let Some(where_clause) = find_clause(&ast, "WHERE") {
        if let Some(expr) = where_clause.children.first() {
            let mut node = lower(&ctx, expr);
            println!("\n>> WHERE clause before type conversions:\n");
            print!("{}", node.dump());

            apply_type_conversions(&ctx, &mut node);
            println!("\n>> WHERE clause after type conversions:\n");
            print!("{}", node.dump());

            simplify(&ctx, &mut node);
            println!("\n>> WHERE clause after simplification:\n");
            print!("{}", node.dump());
        }
    }

    print_messages(&ctx);
    Ok(())
}

fn load_fixture(path: &Path) -> Result<Fixture, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Fixture::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn query(fixture_path: &Path, sql: &str) -> Result<(), String> {
    let fixture = load_fixture(fixture_path)?;
    let query = siftq::fixture::Query {
        sql: sql.to_string(),
        expected: Vec::new(),
    };
    let outcome = run_query(&fixture, &query);
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if !outcome.errors.is_empty() {
        for error in &outcome.errors {
            eprintln!("error: {error}");
        }
        return Err("query failed".to_string());
    }
    println!("{}", outcome.matched.join(","));
    Ok(())
}

fn run_dir(dir: &Path) -> Result<(), String> {
    let mut total = 0usize;
    let mut failed = 0usize;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| e.to_string())?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }
        let fixture = load_fixture(entry.path())?;
        println!("== {}", entry.path().display());
        for outcome in run_fixture(&fixture) {
            total += 1;
            if outcome.passed() {
                println!("PASS  {}", outcome.sql);
            } else {
                failed += 1;
                println!(
                    "FAIL  {} (matched [{}], expected [{}])",
                    outcome.sql,
                    outcome.matched.join(","),
                    outcome.expected.join(",")
                );
                for error in &outcome.errors {
                    println!("      error: {error}");
                }
            }
        }
    }

    println!("\n{} queries, {} failed", total, failed);
    if failed > 0 {
        return Err(format!("{failed} of {total} queries failed"));
    }
    Ok(())
}

fn print_messages(ctx: &Context) {
    for error in ctx.get_errors() {
        eprintln!("error: {error}");
    }
    for warning in ctx.get_warnings() {
        eprintln!("warning: {warning}");
    }
}
