pub mod pipelines;
pub mod templates;

pub use pipelines::{PipelineCatalog, PipelineDefinition, PipelineStep};
pub use templates::{SlotRequirement, TemplateCatalog, TemplateDefinition};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("pipeline `{pipeline}` has no steps")]
    EmptyPipeline { pipeline: String },
    #[error("pipeline `{pipeline}` references unknown template `{template}`")]
    UnknownStepTemplate { pipeline: String, template: String },
}
