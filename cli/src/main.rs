mod error_formatter;
mod formatter;
mod interactive;
mod server;

use anyhow::Result;
use chainer::{parse, parse_item, Answer, KbError, KnowledgeBase, ResourceLimits, Retraction};
use clap::{ArgAction, Parser, Subcommand};
use formatter::Formatter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "chainer")]
#[command(about = "Forward chaining that remembers why.")]
#[command(
    long_about = "Chainer keeps a knowledge base of facts and rules, derives everything that follows from them, and withdraws exactly the derived knowledge that depended on a retracted fact.\nThe CLI loads .kb files, answers queries, and can serve the knowledge base over HTTP."
)]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer queries against the loaded knowledge base
    ///
    /// Loads all .kb files from the workspace, applies the given retractions in
    /// order, then answers each query.
    ///
    /// Examples:
    ///   chainer run "(movable ?x)"
    ///   chainer run "(heavy ?x)" --retract "(size cube big)"
    Run {
        /// Fact-shaped queries, e.g. "(isa ?x block)"
        #[arg(value_name = "QUERY")]
        queries: Vec<String>,
        /// Facts to retract before answering
        #[arg(short = 'r', long = "retract", value_name = "FACT")]
        retractions: Vec<String>,
        /// Workspace root directory containing .kb files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Print answers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every fact and rule with its justifications
    Show {
        /// Workspace root directory containing .kb files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Print the knowledge base as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise the .kb files in a workspace
    List {
        /// Workspace root directory containing .kb files
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Load the workspace and verify the justification graph
    Check {
        /// Workspace root directory containing .kb files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// Line-oriented prompt: assert, ask and retract interactively
    Interactive {
        /// Workspace root directory containing .kb files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// API: GET /health, GET /kb, POST /assert, POST /ask, POST /retract
    /// with {"item": "fact: (isa cube block)"}
    Server {
        /// Workspace root directory containing .kb files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Run {
            queries,
            retractions,
            workdir,
            json,
        } => run_command(workdir, queries, retractions, *json),
        Commands::Show { workdir, json } => show_command(workdir, *json),
        Commands::List { root } => list_command(root),
        Commands::Check { workdir } => check_command(workdir),
        Commands::Interactive { workdir } => interactive_command(workdir),
        Commands::Server {
            workdir,
            host,
            port,
        } => server_command(workdir, host, *port),
    };

    if let Err(e) = result {
        if let Some(kb_err) = e.downcast_ref::<KbError>() {
            eprintln!("{}", error_formatter::format_error(kb_err));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "chainer=warn",
        1 => "chainer=info",
        2 => "chainer=debug,tower_http=debug",
        _ => "chainer=trace,tower_http=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct RunOutput {
    retractions: Vec<RetractionOutput>,
    queries: Vec<QueryOutput>,
}

#[derive(Serialize)]
struct RetractionOutput {
    item: String,
    #[serde(flatten)]
    retraction: Retraction,
}

#[derive(Serialize)]
struct QueryOutput {
    query: String,
    answers: Vec<Answer>,
}

fn run_command(workdir: &Path, queries: &[String], retractions: &[String], json: bool) -> Result<()> {
    if queries.is_empty() && retractions.is_empty() {
        eprintln!("Error: No query specified\n");
        eprintln!("Usage: chainer run [QUERY]... [--retract FACT]... [OPTIONS]\n");
        eprintln!("Examples:");
        eprintln!("  chainer run \"(movable ?x)\"                        - Find everything movable");
        eprintln!("  chainer run \"(heavy ?x)\" --retract \"(size cube big)\" - Ask after retracting");
        eprintln!("\nTo see the loaded knowledge base:");
        eprintln!("  chainer show");
        std::process::exit(1);
    }

    let (mut kb, _) = load_workspace(workdir)?;
    let formatter = Formatter::default();
    let mut output = RunOutput {
        retractions: Vec::new(),
        queries: Vec::new(),
    };

    for text in retractions {
        let item = parse_item(text)?;
        let retraction = kb.retract(item.clone());
        if !json {
            print!("{}", formatter.format_retraction(&item, &retraction));
        }
        output.retractions.push(RetractionOutput {
            item: item.to_string(),
            retraction,
        });
    }

    for text in queries {
        let query = parse_item(text)?;
        let answers = kb.ask(query.clone());
        if !json {
            print!("{}", formatter.format_answers(&query, &answers));
        }
        output.queries.push(QueryOutput {
            query: query.to_string(),
            answers,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn show_command(workdir: &Path, json: bool) -> Result<()> {
    let (kb, _) = load_workspace(workdir)?;
    let snapshot = kb.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", Formatter::default().format_knowledge_base(&snapshot));
    }
    Ok(())
}

fn list_command(root: &Path) -> Result<()> {
    println!("Loading workspace from {}...", root.display());
    let (kb, file_count) = load_workspace(root)?;

    println!();
    print!(
        "{}",
        Formatter::default().format_workspace_summary(file_count, &kb.snapshot())
    );
    Ok(())
}

fn check_command(workdir: &Path) -> Result<()> {
    let (kb, _) = load_workspace(workdir)?;
    let violations = kb.check_invariants();

    print!("{}", Formatter::default().format_violations(&violations));
    if !violations.is_empty() {
        anyhow::bail!("{} invariant violation(s) found", violations.len());
    }
    Ok(())
}

fn interactive_command(workdir: &Path) -> Result<()> {
    let (mut kb, file_count) = load_workspace(workdir)?;
    println!(
        "Loaded {} file(s): {} facts, {} rules",
        file_count,
        kb.fact_count(),
        kb.rule_count()
    );
    interactive::run_interactive(&mut kb)
}

fn server_command(workdir: &Path, host: &str, port: u16) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let rt = Runtime::new()?;
        rt.block_on(async {
            let (kb, _) = load_workspace(workdir)?;

            println!(
                "Starting HTTP server with {} facts and {} rules loaded",
                kb.fact_count(),
                kb.rule_count()
            );
            server::http::start_server(kb, host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (workdir, host, port);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}

/// Load all .kb files from the workspace directory, in file-name order
///
/// Every file is parsed before anything is asserted, so a broken file leaves
/// no partial knowledge base behind. Returns the number of files read.
fn load_workspace(workdir: &Path) -> Result<(KnowledgeBase, usize)> {
    let limits = ResourceLimits::default();
    let mut items = Vec::new();
    let mut errors = Vec::new();
    let mut file_count = 0;

    for entry in WalkDir::new(workdir).sort_by_file_name() {
        let entry = entry?;
        if entry.path().extension().and_then(|s| s.to_str()) != Some("kb") {
            continue;
        }
        file_count += 1;
        let path = entry.path();
        let source_id = path.to_string_lossy().to_string();
        match parse(&fs::read_to_string(path)?, Some(source_id), &limits) {
            Ok(parsed) => items.extend(parsed),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => {}
        1 => return Err(errors.remove(0).into()),
        _ => return Err(KbError::MultipleErrors(errors).into()),
    }

    let mut kb = KnowledgeBase::new();
    for item in items {
        kb.assert(item);
    }
    Ok((kb, file_count))
}
