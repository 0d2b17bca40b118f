use crate::api::commands::{run_model_show, run_predict, PredictArgs};
use crate::api::server;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Risk Inference Service",
    about = "Serve and exercise the transaction risk classifier from the command line",
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
    /// Inspect the active model
    Model {
        #[command(subcommand)]
        command: ModelCommand,
    },
    /// Score a single request file without starting the server
    Predict(PredictArgs),
}

#[derive(Subcommand, Debug)]
enum ModelCommand {
    /// Load the active model and print its metadata
    Show(ModelStoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) store: ModelStoreArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ModelStoreArgs {
    /// Directory holding model artifacts (defaults to APP_MODELS_DIR)
    #[arg(long)]
    pub(crate) models_dir: Option<PathBuf>,
    /// Directory holding active_model.json (defaults to APP_MODEL_CONFIG_DIR)
    #[arg(long)]
    pub(crate) config_dir: Option<PathBuf>,
}

impl ModelStoreArgs {
    pub(crate) fn apply(&mut self, config: &mut crate::config::ModelStoreConfig) {
        if let Some(dir) = self.models_dir.take() {
            config.models_dir = dir;
        }
        if let Some(dir) = self.config_dir.take() {
            config.config_dir = dir;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Model {
            command: ModelCommand::Show(args),
        } => run_model_show(args),
        Command::Predict(args) => run_predict(args),
    }
}
