//! Shared pipeline used by every command:
//! config file -> session -> dataset -> per-series roots.

use std::path::Path;

use tracing::info;

use crate::app::session::Session;
use crate::cli::StateArgs;
use crate::error::AppError;
use crate::io::read_config_file;
use crate::report::{RunSummary, summarize_series};

/// Build a session from defaults plus an optional config file.
pub fn load_session(args: &StateArgs) -> Result<Session, AppError> {
    let mut session = Session::new().with_grid_points(args.points)?;
    if let Some(path) = &args.config {
        import_file(&mut session, path)?;
    }
    if let Some(mode) = args.bias_mode {
        session.store_mut().set_bias_mode(mode);
    }
    Ok(session)
}

pub fn import_file(session: &mut Session, path: &Path) -> Result<(), AppError> {
    let raw = read_config_file(path)?;
    session.import(&raw)?;
    Ok(())
}

/// Generate the dataset and summarize every visible series.
pub fn run_summary(session: &mut Session) -> Result<RunSummary, AppError> {
    let dataset = session.dataset()?;
    let toggles = *session.toggles();

    let mut failure = None;
    let rows = summarize_series(&dataset, &toggles, |series| match session.roots(series) {
        Ok(roots) => roots.to_vec(),
        Err(e) => {
            if failure.is_none() {
                failure = Some(e);
            }
            Vec::new()
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    let (effective_b1, effective_b2) = session.effective_biases();
    let params = session.store().params();
    info!(series = rows.len(), points = dataset.len(), "summary computed");
    Ok(RunSummary {
        bias_mode: params.bias_mode,
        effective_b1,
        effective_b2,
        x_range: params.x_range,
        points: dataset.len(),
        rows,
    })
}
