use crate::pipeline::runner::PipelineRunReport;
use crate::shared::fs_atomic::atomic_write_file;
use crate::shared::logging::append_pipeline_log_line;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RunStoreError {
    #[error("failed to create run directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode run report for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write run report {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read run report {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid run report in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn runs_dir(state_root: &Path) -> PathBuf {
    state_root.join("runs")
}

/// Persists a finished run as one JSON file under `<state root>/runs/`,
/// named after the pipeline and its start timestamp.
pub fn persist_run_report(
    state_root: &Path,
    report: &PipelineRunReport,
) -> Result<PathBuf, RunStoreError> {
    let dir = runs_dir(state_root);
    fs::create_dir_all(&dir).map_err(|source| RunStoreError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(format!("{}-{}.json", report.pipeline, report.started_at));
    let body = serde_json::to_vec_pretty(report).map_err(|source| RunStoreError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(&path, &body).map_err(|source| RunStoreError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

pub fn load_run_report(path: &Path) -> Result<PipelineRunReport, RunStoreError> {
    let raw = fs::read_to_string(path).map_err(|source| RunStoreError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| RunStoreError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Appends one log line per step plus a closing outcome line to the pipeline
/// log under the state root.
pub fn append_run_log(state_root: &Path, report: &PipelineRunReport) -> std::io::Result<()> {
    let total = report.steps.len();
    for step in &report.steps {
        append_pipeline_log_line(
            state_root,
            &format!(
                "pipeline={} step={}/{total} template={} completed={}",
                report.pipeline, step.index, step.template, step.completed
            ),
        )?;
    }
    append_pipeline_log_line(
        state_root,
        &format!(
            "pipeline={} outcome={:?} completed_steps={}",
            report.pipeline,
            report.outcome,
            report.completed_count()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::runner::{RunOutcome, StepResult};
    use crate::shared::ids::{PipelineKey, TemplateKey};
    use crate::shared::logging::pipeline_log_path;

    fn sample_report() -> PipelineRunReport {
        PipelineRunReport {
            pipeline: PipelineKey::parse("saas_delivery").expect("valid key"),
            display_name: "SaaS Delivery".to_string(),
            started_at: 1_700_000_000,
            finished_at: 1_700_000_120,
            steps: vec![
                StepResult {
                    index: 1,
                    label: "Extract user stories from Notion".to_string(),
                    template: TemplateKey::parse("notion_user_stories").expect("valid key"),
                    completed: true,
                },
                StepResult {
                    index: 2,
                    label: "Build SaaS application".to_string(),
                    template: TemplateKey::parse("saas_application").expect("valid key"),
                    completed: false,
                },
            ],
            outcome: RunOutcome::Failed {
                step: 2,
                error: "engine unavailable".to_string(),
            },
        }
    }

    #[test]
    fn report_round_trips_through_the_run_store() {
        let temp = tempfile::tempdir().expect("tempdir");
        let report = sample_report();

        let path = persist_run_report(temp.path(), &report).expect("persist");
        assert!(path.ends_with("runs/saas_delivery-1700000000.json"));

        let loaded = load_run_report(&path).expect("load");
        assert_eq!(loaded, report);
    }

    #[test]
    fn run_log_gets_one_line_per_step_plus_outcome() {
        let temp = tempfile::tempdir().expect("tempdir");
        append_run_log(temp.path(), &sample_report()).expect("append");

        let body = fs::read_to_string(pipeline_log_path(temp.path())).expect("read log");
        assert_eq!(body.lines().count(), 3);
        assert!(body.contains("step=1/2"));
        assert!(body.contains("completed=false"));
        assert!(body.contains("completed_steps=1"));
    }
}
