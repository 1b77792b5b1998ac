use credit_engine::config::AppConfig;
use credit_engine::error::AppError;
use credit_engine::scoring::{load_config_from_path, ScoringEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolve the controls override path: the CLI flag wins over `APP_SCORING_CONTROLS`.
pub(crate) fn controls_path(flag: Option<PathBuf>, config: &AppConfig) -> Option<PathBuf> {
    flag.or_else(|| config.controls.overrides_path.clone())
}

pub(crate) fn build_engine(controls: Option<&Path>) -> ScoringEngine {
    ScoringEngine::new(load_config_from_path(controls))
}

/// Read a request body from a file, or from stdin when the path is `-`.
pub(crate) fn read_payload(path: &Path) -> Result<Vec<u8>, AppError> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read(path)?)
    }
}
