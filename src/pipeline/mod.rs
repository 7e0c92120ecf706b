pub mod run_store;
pub mod runner;

pub use run_store::{append_run_log, load_run_report, persist_run_report, RunStoreError};
pub use runner::{
    run_pipeline, PipelineRunReport, RunControl, RunOutcome, StepResult, TemplateApplicator,
};
