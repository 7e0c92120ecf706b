use crate::catalog::templates::TemplateCatalog;
use crate::catalog::CatalogError;
use crate::shared::ids::{PipelineKey, TemplateKey};

/// One pipeline stage: a human-readable label paired with the template it
/// applies. Pairing label and key in one record keeps the two lists from
/// drifting apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStep {
    pub label: String,
    pub template: TemplateKey,
}

/// An ordered chain of templates executed in sequence. Builtin definitions
/// are immutable; operator-created ones live for the session only.
#[derive(Debug, Clone)]
pub struct PipelineDefinition {
    pub key: PipelineKey,
    pub display_name: String,
    pub description: String,
    pub steps: Vec<PipelineStep>,
}

impl PipelineDefinition {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Checks that the pipeline has at least one step and that every step
    /// references a template present in `templates`.
    pub fn validate_against(&self, templates: &TemplateCatalog) -> Result<(), CatalogError> {
        if self.steps.is_empty() {
            return Err(CatalogError::EmptyPipeline {
                pipeline: self.key.as_str().to_string(),
            });
        }
        for step in &self.steps {
            if templates.get(step.template.as_str()).is_none() {
                return Err(CatalogError::UnknownStepTemplate {
                    pipeline: self.key.as_str().to_string(),
                    template: step.template.as_str().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Static registry of chained pipelines, in registration order.
#[derive(Debug, Clone)]
pub struct PipelineCatalog {
    entries: Vec<PipelineDefinition>,
}

fn step(label: &str, template: &str) -> PipelineStep {
    PipelineStep {
        label: label.to_string(),
        template: TemplateKey::parse(template).expect("builtin step template key is valid"),
    }
}

fn pipeline(
    key: &str,
    display_name: &str,
    description: &str,
    steps: Vec<PipelineStep>,
) -> PipelineDefinition {
    PipelineDefinition {
        key: PipelineKey::parse(key).expect("builtin pipeline key is valid"),
        display_name: display_name.to_string(),
        description: description.to_string(),
        steps,
    }
}

impl PipelineCatalog {
    pub fn builtin() -> Self {
        let entries = vec![
            pipeline(
                "full_stack_delivery",
                "Full-Stack Delivery",
                "Complete pipeline from analysis to delivery.",
                vec![
                    step("Extract user stories from Notion", "notion_user_stories"),
                    step("Generate backend", "backend_generator"),
                    step("Generate frontend components", "frontend_components"),
                    step("Generate database schema", "database_schema"),
                    step("Generate tests", "test_generator"),
                    step("Generate API documentation", "api_documentation"),
                ],
            ),
            pipeline(
                "ecommerce_delivery",
                "E-commerce Delivery",
                "Pipeline for a complete online store.",
                vec![
                    step("Extract user stories from Notion", "notion_user_stories"),
                    step("Build e-commerce platform", "ecommerce_platform"),
                    step("Generate database schema", "database_schema"),
                    step("Generate tests", "test_generator"),
                    step("Generate API documentation", "api_documentation"),
                ],
            ),
            pipeline(
                "saas_delivery",
                "SaaS Delivery",
                "Pipeline for a complete SaaS application.",
                vec![
                    step("Extract user stories from Notion", "notion_user_stories"),
                    step("Build SaaS application", "saas_application"),
                    step("Generate database schema", "database_schema"),
                    step("Generate tests", "test_generator"),
                    step("Generate API documentation", "api_documentation"),
                ],
            ),
            pipeline(
                "mobile_delivery",
                "Mobile App Delivery",
                "Pipeline for a complete mobile application.",
                vec![
                    step("Extract user stories from Notion", "notion_user_stories"),
                    step("Build mobile app", "mobile_development"),
                    step("Generate backend", "backend_generator"),
                    step("Generate database schema", "database_schema"),
                    step("Generate tests", "test_generator"),
                ],
            ),
            pipeline(
                "ai_delivery",
                "AI Integration Delivery",
                "Pipeline for an application with integrated AI.",
                vec![
                    step("Extract user stories from Notion", "notion_user_stories"),
                    step("Integrate AI/ML", "ai_ml_integration"),
                    step("Generate backend", "backend_generator"),
                    step("Generate frontend components", "frontend_components"),
                    step("Generate tests", "test_generator"),
                ],
            ),
            pipeline(
                "microservices_delivery",
                "Microservices Delivery",
                "Pipeline for a microservices architecture.",
                vec![
                    step("Extract user stories from Notion", "notion_user_stories"),
                    step("Design microservices architecture", "microservices_architecture"),
                    step("Generate database schema", "database_schema"),
                    step("Generate tests", "test_generator"),
                    step("Generate API documentation", "api_documentation"),
                ],
            ),
        ];
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&PipelineDefinition> {
        self.entries.iter().find(|entry| entry.key.as_str() == key)
    }

    pub fn all(&self) -> &[PipelineDefinition] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
