use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sagaflow_executor::StepExecutor;
use sagaflow_orchestrator::{
  ConcurrentOrchestrator, DEFAULT_WORKER_CAPACITY, SequentialOrchestrator,
};
use sagaflow_runner::{CommandRunner, SimulatedCommandRunner};
use sagaflow_tracker::TaskStateTracker;

/// Sagaflow - a saga-style task orchestrator with reverse-order compensation
#[derive(Parser)]
#[command(name = "sagaflow")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a workflow file (JSON or YAML) against the simulated command runner
  Run {
    /// Path to the workflow file
    workflow_file: PathBuf,

    /// Dispatch each task's steps concurrently instead of one at a time
    #[arg(long)]
    concurrent: bool,

    /// Worker pool capacity for --concurrent
    #[arg(long, default_value_t = DEFAULT_WORKER_CAPACITY)]
    workers: usize,

    /// Simulated per-command latency in milliseconds
    #[arg(long, default_value_t = 100)]
    latency_ms: u64,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Run {
      workflow_file,
      concurrent,
      workers,
      latency_ms,
    } => run_workflow(workflow_file, concurrent, workers, latency_ms),
  }
}

fn run_workflow(
  workflow_file: PathBuf,
  concurrent: bool,
  workers: usize,
  latency_ms: u64,
) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_workflow_async(workflow_file, concurrent, workers, latency_ms).await })
}

async fn run_workflow_async(
  workflow_file: PathBuf,
  concurrent: bool,
  workers: usize,
  latency_ms: u64,
) -> Result<()> {
  let tasks = sagaflow_loader::load_file(&workflow_file)
    .with_context(|| format!("failed to load workflow file: {}", workflow_file.display()))?;

  eprintln!("Loaded {} tasks from {}", tasks.len(), workflow_file.display());

  let runner = Arc::new(SimulatedCommandRunner::new(Duration::from_millis(
    latency_ms,
  )));
  let executor = Arc::new(StepExecutor::new(runner as Arc<dyn CommandRunner>));
  let tracker = Arc::new(TaskStateTracker::new());

  // Ctrl-C aborts the in-progress step and fails the run.
  let cancel = CancellationToken::new();
  let ctrl_c_cancel = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      ctrl_c_cancel.cancel();
    }
  });

  let outcome = if concurrent {
    let orchestrator = ConcurrentOrchestrator::with_capacity(executor, tracker, workers);
    orchestrator.run(&tasks, cancel).await
  } else {
    let orchestrator = SequentialOrchestrator::new(executor, tracker);
    orchestrator.run(&tasks, cancel).await
  };

  println!("{}", serde_json::to_string_pretty(&outcome)?);

  if !outcome.success {
    bail!("workflow run failed");
  }

  Ok(())
}
