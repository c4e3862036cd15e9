//! Runs a sample program on the chosen backends and reports wall time.

use clap::{Parser, ValueEnum};
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trivium_bench::programs;
use trivium_expr::{evaluate, lower, Expr, Memory};
use trivium_vm::{compile, execute};

type AnyError = Box<dyn std::error::Error>;

#[derive(Parser, Debug)]
#[command(name = "trivium-bench")]
#[command(about = "Benchmark the three trivium execution backends")]
struct Cli {
    /// Program to run
    #[arg(long, value_enum, default_value_t = ProgramKind::Fibonacci)]
    program: ProgramKind,

    /// Backend to run it on
    #[arg(long, value_enum, default_value_t = Backend::All)]
    backend: Backend,

    /// Number of timed runs per backend
    #[arg(long, default_value_t = 10)]
    runs: u32,

    /// Memory cells to allocate
    #[arg(long, default_value_t = Memory::DEFAULT_CELLS)]
    cells: usize,

    /// Print the compiled bytecode before running
    #[arg(long)]
    dump: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProgramKind {
    /// Iterative Fibonacci, 1000 loop iterations
    Fibonacci,
    /// Insertion sort of 100 elements plus the alternating-index sum
    SortAndSum,
}

impl ProgramKind {
    fn tree(self) -> Expr {
        match self {
            ProgramKind::Fibonacci => programs::fibonacci(),
            ProgramKind::SortAndSum => programs::sort_and_sum(),
        }
    }

    fn seed(self, memory: &mut Memory) -> trivium_expr::Result<()> {
        match self {
            ProgramKind::Fibonacci => programs::seed_fibonacci(memory, 1000.0),
            ProgramKind::SortAndSum => programs::seed_sort_and_sum(memory, 100),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    /// Tree-walking evaluator
    Tree,
    /// Pre-lowered execution thunks
    Closure,
    /// Bytecode stack machine
    Bytecode,
    /// All three in sequence
    All,
}

impl Backend {
    fn selects(self, other: Backend) -> bool {
        self == Backend::All || self == other
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trivium_bench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let tree = cli.program.tree();

    if cli.dump {
        print!("{}", compile(&tree));
    }

    if let Err(e) = run(&cli, &tree) {
        error!("run failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, tree: &Expr) -> Result<(), AnyError> {
    let mut memory = Memory::new(cli.cells);

    if cli.backend.selects(Backend::Tree) {
        time_runs(cli, &mut memory, "tree", |memory| {
            Ok(evaluate(tree, memory)?)
        })?;
    }

    if cli.backend.selects(Backend::Closure) {
        let thunk = lower(tree);
        time_runs(cli, &mut memory, "closure", |memory| Ok(thunk(memory)?))?;
    }

    if cli.backend.selects(Backend::Bytecode) {
        let program = compile(tree);
        time_runs(cli, &mut memory, "bytecode", |memory| {
            Ok(execute(&program, memory)?)
        })?;
    }

    Ok(())
}

fn time_runs(
    cli: &Cli,
    memory: &mut Memory,
    backend: &str,
    body: impl Fn(&mut Memory) -> Result<f64, AnyError>,
) -> Result<(), AnyError> {
    for run in 0..cli.runs {
        cli.program.seed(memory)?;
        let start = Instant::now();
        let result = body(memory)?;
        let micros = start.elapsed().as_micros() as u64;
        info!(backend, run, micros, result, "completed");
    }
    Ok(())
}
