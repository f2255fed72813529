/// Failures that abort a lint or migration run.
///
/// Everything else (classification gaps, edit anomalies, files missing
/// from a pass, a damaged fix report) is logged and the run goes on.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("compile failed: {0:#}")]
    Compile(anyhow::Error),

    #[error("write failed: {0:#}")]
    Write(anyhow::Error),

    #[error("fix report: {0:#}")]
    Report(anyhow::Error),
}
