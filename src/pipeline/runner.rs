use crate::catalog::PipelineDefinition;
use crate::shared::ids::{PipelineKey, TemplateKey};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Opaque "apply template" collaborator. The shipped implementation hands the
/// template reference to the screen-automation engine; tests substitute their
/// own.
pub trait TemplateApplicator {
    fn apply(&mut self, template: &TemplateKey) -> Result<(), String>;
}

/// Operator-facing side of a run: per-step progress reporting and the
/// confirmation gate between non-final steps. Returning `false` from the gate
/// aborts the remaining steps.
pub trait RunControl {
    fn step_started(&mut self, index: usize, total: usize, label: &str);
    fn step_finished(&mut self, index: usize, total: usize, label: &str);
    fn continue_to_next_step(&mut self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Aborted { after_step: usize },
    Failed { step: usize, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub label: String,
    pub template: TemplateKey,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRunReport {
    pub pipeline: PipelineKey,
    pub display_name: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub steps: Vec<StepResult>,
    pub outcome: RunOutcome,
}

impl PipelineRunReport {
    pub fn completed_labels(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|step| step.completed)
            .map(|step| step.label.as_str())
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|step| step.completed).count()
    }
}

fn record_remaining(
    steps: &mut Vec<StepResult>,
    pipeline: &PipelineDefinition,
    from_position: usize,
) {
    for (position, step) in pipeline.steps.iter().enumerate().skip(from_position) {
        steps.push(StepResult {
            index: position + 1,
            label: step.label.clone(),
            template: step.template.clone(),
            completed: false,
        });
    }
}

/// Runs the pipeline steps in order, one at a time. Each step applies its
/// template through the collaborator; between non-final steps the run waits
/// for the operator's confirmation. The first apply failure aborts the
/// remaining steps; side effects of completed steps stay in place.
pub fn run_pipeline(
    pipeline: &PipelineDefinition,
    applicator: &mut dyn TemplateApplicator,
    control: &mut dyn RunControl,
) -> PipelineRunReport {
    let total = pipeline.step_count();
    let started_at = Utc::now().timestamp();
    let mut steps = Vec::with_capacity(total);
    let mut outcome = RunOutcome::Completed;

    for (position, step) in pipeline.steps.iter().enumerate() {
        let index = position + 1;
        control.step_started(index, total, &step.label);

        match applicator.apply(&step.template) {
            Ok(()) => {
                steps.push(StepResult {
                    index,
                    label: step.label.clone(),
                    template: step.template.clone(),
                    completed: true,
                });
                control.step_finished(index, total, &step.label);
            }
            Err(error) => {
                steps.push(StepResult {
                    index,
                    label: step.label.clone(),
                    template: step.template.clone(),
                    completed: false,
                });
                record_remaining(&mut steps, pipeline, index);
                outcome = RunOutcome::Failed { step: index, error };
                break;
            }
        }

        if index < total && !control.continue_to_next_step() {
            record_remaining(&mut steps, pipeline, index);
            outcome = RunOutcome::Aborted { after_step: index };
            break;
        }
    }

    PipelineRunReport {
        pipeline: pipeline.key.clone(),
        display_name: pipeline.display_name.clone(),
        started_at,
        finished_at: Utc::now().timestamp(),
        steps,
        outcome,
    }
}
