use crate::api::cli::ModelStoreArgs;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::inference::validation::parse_body;
use crate::inference::{validate_request, ModelManager, PredictionPipeline};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file containing one predict request body
    #[arg(long)]
    pub(crate) input: PathBuf,
    #[command(flatten)]
    pub(crate) store: ModelStoreArgs,
}

pub(crate) fn run_model_show(mut args: ModelStoreArgs) -> Result<(), AppError> {
    let models = load_models(&mut args)?;
    let metadata = models.metadata()?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs { input, mut store } = args;

    let body = std::fs::read(&input)?;
    let request = parse_body(&body).and_then(|payload| validate_request(&payload))?;

    let models = load_models(&mut store)?;
    let pipeline = PredictionPipeline::new(Arc::new(models));
    let response = pipeline.predict(&request)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn load_models(args: &mut ModelStoreArgs) -> Result<ModelManager, AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config.models);

    let models = ModelManager::from_config(&config.models);
    models.load_active()?;
    Ok(models)
}
