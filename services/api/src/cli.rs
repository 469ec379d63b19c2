use crate::demo::{run_compare, run_demo, run_validate, CompareArgs, DemoArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use parcel_recon::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "parcel-recon",
    about = "Reconcile property-edit feeds and registry snapshots from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify every row of an edit feed and write the annotated copy
    Validate(ValidateArgs),
    /// Diff a current snapshot against a reference snapshot
    Compare(CompareArgs),
    /// Run both workflows over the bundled sample data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args).await,
        Command::Compare(args) => run_compare(args),
        Command::Demo(args) => run_demo(args),
    }
}
