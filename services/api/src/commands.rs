use crate::infra::{build_engine, controls_path, read_payload};
use clap::Args;
use credit_engine::config::AppConfig;
use credit_engine::error::AppError;
use credit_engine::scoring::router::decide;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Application JSON file, or `-` to read from stdin
    #[arg(long)]
    pub(crate) payload: PathBuf,
    /// JSON document merged onto the built-in scoring controls
    #[arg(long)]
    pub(crate) controls: Option<PathBuf>,
    /// Pretty-print the decision
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ControlsArgs {
    /// JSON document merged onto the built-in scoring controls
    #[arg(long)]
    pub(crate) controls: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let controls = controls_path(args.controls, &config);
    let engine = build_engine(controls.as_deref());

    let body = read_payload(&args.payload)?;
    let response = decide(&engine, &body)?;
    println!("{}", render(&response, args.pretty)?);
    Ok(())
}

pub(crate) fn run_controls(args: ControlsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let controls = controls_path(args.controls, &config);
    let engine = build_engine(controls.as_deref());

    println!("{}", render(engine.config(), true)?);
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
