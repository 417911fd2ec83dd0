use crate::demo::{
    run_demo, run_evaluate, run_templates, DemoArgs, EvaluateArgs, TemplatesCommand,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_screen::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Screen",
    about = "Score candidate questionnaires and run the screening service",
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
    /// Evaluate one answer set against a questionnaire stored as JSON
    Evaluate(EvaluateArgs),
    /// Inspect the questionnaire template library
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
    /// Clone a preset posting, screen sample candidates and print the ranking
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Templates { command } => run_templates(command),
        Command::Demo(args) => run_demo(args),
    }
}
