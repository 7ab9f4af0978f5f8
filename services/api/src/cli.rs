use crate::render::{run_fields, run_render, FieldsArgs, RenderArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use permit_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Permit Intake",
    about = "Serve the permit application intake API or render applications from the command line",
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
    /// Render a submission JSON file to a PDF, HTML or text document
    Render(RenderArgs),
    /// Print the task name, custom fields and summary a submission maps to
    Fields(FieldsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Record tasks in memory instead of sending them to Asana
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Render(args) => run_render(args),
        Command::Fields(args) => run_fields(args),
    }
}
