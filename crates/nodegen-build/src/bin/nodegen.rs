//! `nodegen` — generate node tables from a TOML record file.
//!
//! ```text
//! nodegen nodes.toml --action stmt-nodes -o StmtNodes.inc
//! nodegen nodes.toml --action nodes --node-class TypeNode --macro-tag TYPE
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use nodegen_build::{run, Action, HierarchyConfig, RecordsFile};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate AST node tables from a TOML record file",
    long_about = "Reads node records (name, classes, base, abstract) and emits .inc tables where every \
subtree's concrete nodes are contiguous, plus the declaration-context list."
)]
struct Cli {
    /// TOML record file
    records: PathBuf,
    /// What to generate
    #[arg(long, value_enum, default_value_t = ActionArg::PrintRecords)]
    action: ActionArg,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Node class for `--action nodes`
    #[arg(long, required_if_eq("action", "nodes"))]
    node_class: Option<String>,
    /// Base suffix for `--action nodes`
    #[arg(long, default_value = "")]
    base_suffix: String,
    /// Macro tag for `--action nodes` (defaults to the upper-cased root name)
    #[arg(long)]
    macro_tag: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ActionArg {
    PrintRecords,
    DumpJson,
    CommentNodes,
    DeclNodes,
    StmtNodes,
    DeclContext,
    Nodes,
}

impl Cli {
    fn action(&self) -> Action {
        match self.action {
            ActionArg::PrintRecords => Action::PrintRecords,
            ActionArg::DumpJson => Action::DumpJson,
            ActionArg::CommentNodes => Action::CommentNodes,
            ActionArg::DeclNodes => Action::DeclNodes,
            ActionArg::StmtNodes => Action::StmtNodes,
            ActionArg::DeclContext => Action::DeclContext,
            ActionArg::Nodes => {
                let node_class = self.node_class.clone().unwrap_or_default();
                let mut config = HierarchyConfig::new(node_class, self.base_suffix.clone());
                config.macro_tag = self.macro_tag.clone();
                Action::Nodes(config)
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let records = RecordsFile::from_file(&cli.records)?.into_keeper()?;
    let text = run(&records, &cli.action())?;

    match &cli.output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}
