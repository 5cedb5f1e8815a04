/* src/cli/core/src/main.rs */

mod bundler;
mod config;
mod dev;
mod export;
mod host;
mod init;
mod process;
mod project;
mod shell;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use export::ExportOptions;
use project::Project;

#[derive(Parser)]
#[command(name = "pagewright", about = "Pagewright static site generator", version)]
struct Cli {
  /// Path to pagewright.toml (auto-detected if omitted)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Start the dev server (default)
  Dev,
  /// Pre-render every page into the export directory
  Export {
    /// Skip minification and pretty-print JSON output
    #[arg(long)]
    dev: bool,
    /// Also write page sources and generated entries under view-source/
    #[arg(long)]
    view_source: bool,
  },
  /// Scaffold a new project in the current directory
  Init,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let project = Project::resolve(cli.config)?;

  match cli.command.unwrap_or(Command::Dev) {
    Command::Dev => dev::run_dev(project).await?,
    Command::Export { dev, view_source } => {
      export::run_export(project, ExportOptions { dev, view_source }).await?;
    }
    Command::Init => init::run_init(&project)?,
  }

  Ok(())
}
