//! CLI handler for the `sprint` subcommands.

use super::{emit, load_json, open_service, render};
use crate::cli::SprintCommand;
use anyhow::Result;
use skillmatch_intelligence::{EngineConfig, SprintPlan};

/// Handle `sprint capacity|suggest|predict`.
pub(crate) async fn handle_sprint_command(
    config: &EngineConfig,
    command: SprintCommand,
) -> Result<String> {
    let args = match &command {
        SprintCommand::Capacity(args)
        | SprintCommand::Suggest(args)
        | SprintCommand::Predict(args) => args.clone(),
    };
    let plan: SprintPlan = load_json(&args.sprint, "sprint plan")?;
    let service = open_service(config, &args.workspace.workspace_file, None).await?;
    let format = args.workspace.format;

    match command {
        SprintCommand::Capacity(_) => {
            let capacity = service.sprint_capacity(&plan).await?;
            emit(&capacity, format, render::sprint_capacity)
        }
        SprintCommand::Suggest(_) => {
            let scenario = service.sprint_suggestions(&plan).await?;
            emit(&scenario, format, render::scenario)
        }
        SprintCommand::Predict(_) => {
            let prediction = service.sprint_prediction(&plan).await?;
            emit(&prediction, format, render::sprint_prediction)
        }
    }
}
