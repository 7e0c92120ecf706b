use crate::shared::ids::TemplateKey;

/// One slot a specialized template insists on: the role label and the prompt
/// bundle applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequirement {
    pub role: String,
    pub prompt_file: String,
}

/// A named bundle of slot assignments for a specific task type. Definitions
/// are immutable and built once at process start; a template is applicable
/// only when the configured chat count covers its required slots.
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    pub key: TemplateKey,
    pub display_name: String,
    pub description: String,
    pub required_slots: Vec<SlotRequirement>,
}

impl TemplateDefinition {
    pub fn required_slot_count(&self) -> u8 {
        self.required_slots.len() as u8
    }
}

/// Static registry of specialized templates, in registration order. The order
/// is stable so menu numbering stays consistent between runs.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    entries: Vec<TemplateDefinition>,
}

fn template(
    key: &str,
    display_name: &str,
    description: &str,
    slots: &[(&str, &str)],
) -> TemplateDefinition {
    TemplateDefinition {
        key: TemplateKey::parse(key).expect("builtin template key is valid"),
        display_name: display_name.to_string(),
        description: description.to_string(),
        required_slots: slots
            .iter()
            .map(|(role, prompt_file)| SlotRequirement {
                role: (*role).to_string(),
                prompt_file: (*prompt_file).to_string(),
            })
            .collect(),
    }
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        let entries = vec![
            template(
                "notion_user_stories",
                "Notion User Story Extraction",
                "Analyzes Notion pages to extract user stories and produce structured \
                 documentation with acceptance criteria and a frontend/backend breakdown.",
                &[
                    ("Notion_Analyst", "@prompts_notion_analyst"),
                    ("Frontend_Dev", "@prompts_frontend_dev"),
                    ("Backend_Dev", "@prompts_backend_dev"),
                ],
            ),
            template(
                "full_stack_development",
                "Full-Stack Development",
                "Builds complete full-stack applications: project structure, React/TypeScript \
                 components, REST APIs, database schemas, Docker configuration and docs.",
                &[
                    ("Frontend_React", "@prompts_react_dev"),
                    ("Backend_Node", "@prompts_node_dev"),
                    ("Database_Expert", "@prompts_database"),
                    ("DevOps", "@prompts_devops"),
                ],
            ),
            template(
                "documentation_team",
                "Documentation Team",
                "Produces technical documentation, user guides, Swagger API references and \
                 installation manuals from source code and API specifications.",
                &[
                    ("Technical_Writer", "@prompts_technical_writer"),
                    ("API_Documenter", "@prompts_api_docs"),
                    ("User_Guide_Creator", "@prompts_user_guides"),
                ],
            ),
            template(
                "testing_qa",
                "Testing and QA",
                "Implements automated testing end to end: unit, integration and E2E suites, \
                 coverage reports and testing strategy.",
                &[
                    ("Test_Automation", "@prompts_test_automation"),
                    ("QA_Engineer", "@prompts_qa_engineer"),
                    ("Performance_Testing", "@prompts_performance_testing"),
                ],
            ),
            template(
                "mobile_development",
                "Mobile Development",
                "Builds cross-platform mobile apps: React Native/Flutter project structure, \
                 native components, mobile APIs and deployment configuration.",
                &[
                    ("React_Native_Dev", "@prompts_react_native"),
                    ("Flutter_Dev", "@prompts_flutter"),
                    ("Mobile_UI_UX", "@prompts_mobile_ui"),
                    ("Mobile_Backend", "@prompts_mobile_backend"),
                ],
            ),
            template(
                "ecommerce_platform",
                "E-commerce Platform",
                "Builds complete online stores: storefront, payments, inventory, order \
                 processing and an analytics dashboard.",
                &[
                    ("Ecommerce_Frontend", "@prompts_ecommerce_frontend"),
                    ("Payment_Integration", "@prompts_payment_systems"),
                    ("Inventory_Management", "@prompts_inventory"),
                    ("Order_Processing", "@prompts_order_management"),
                    ("Analytics_Dashboard", "@prompts_ecommerce_analytics"),
                ],
            ),
            template(
                "saas_application",
                "SaaS Application",
                "Builds multi-tenant SaaS products: tenancy architecture, subscriptions, \
                 automated billing, user management and business analytics.",
                &[
                    ("SaaS_Frontend", "@prompts_saas_frontend"),
                    ("Multi_Tenant_Backend", "@prompts_multi_tenant"),
                    ("Subscription_Management", "@prompts_subscriptions"),
                    ("User_Management", "@prompts_user_management"),
                    ("Billing_System", "@prompts_billing"),
                    ("Analytics_Reporting", "@prompts_saas_analytics"),
                ],
            ),
            template(
                "ai_ml_integration",
                "AI/ML Integration",
                "Integrates machine learning into existing applications: AI interfaces, ML \
                 pipelines, data processing and production model integration.",
                &[
                    ("AI_Frontend", "@prompts_ai_frontend"),
                    ("ML_Backend", "@prompts_ml_backend"),
                    ("Data_Processing", "@prompts_data_processing"),
                    ("Model_Integration", "@prompts_model_integration"),
                ],
            ),
            template(
                "real_time_app",
                "Real-Time Application",
                "Builds real-time systems: WebSocket servers, live interfaces, notification \
                 systems and event streaming.",
                &[
                    ("Real_Time_Frontend", "@prompts_realtime_frontend"),
                    ("WebSocket_Backend", "@prompts_websocket_backend"),
                    ("Event_Streaming", "@prompts_event_streaming"),
                    ("Notification_System", "@prompts_notifications"),
                ],
            ),
            template(
                "microservices_architecture",
                "Microservices Architecture",
                "Designs scalable distributed architectures: API gateway, service discovery, \
                 asynchronous events, container orchestration and distributed monitoring.",
                &[
                    ("API_Gateway", "@prompts_api_gateway"),
                    ("Service_Discovery", "@prompts_service_discovery"),
                    ("Event_Driven", "@prompts_event_driven"),
                    ("Container_Orchestration", "@prompts_container_orchestration"),
                    ("Monitoring_Logging", "@prompts_monitoring"),
                    ("Security_Compliance", "@prompts_microservices_security"),
                ],
            ),
            template(
                "fintech_application",
                "FinTech Application",
                "Builds secure, compliant financial applications: payment processing, risk \
                 assessment, compliance reporting and blockchain integration.",
                &[
                    ("FinTech_Frontend", "@prompts_fintech_frontend"),
                    ("Payment_Processing", "@prompts_payment_processing"),
                    ("Risk_Assessment", "@prompts_risk_assessment"),
                    ("Compliance_Reporting", "@prompts_compliance"),
                    ("Blockchain_Integration", "@prompts_blockchain"),
                ],
            ),
            template(
                "healthcare_app",
                "Healthcare Application",
                "Builds HIPAA-compliant health applications: patient management, secure \
                 medical records and telemedicine features.",
                &[
                    ("Healthcare_Frontend", "@prompts_healthcare_frontend"),
                    ("Patient_Management", "@prompts_patient_management"),
                    ("Medical_Records", "@prompts_medical_records"),
                    ("HIPAA_Compliance", "@prompts_hipaa_compliance"),
                    ("Telemedicine", "@prompts_telemedicine"),
                ],
            ),
            template(
                "gaming_platform",
                "Gaming Platform",
                "Builds gaming platforms and multiplayer systems: game backends, \
                 leaderboards and player analytics.",
                &[
                    ("Game_Frontend", "@prompts_game_frontend"),
                    ("Game_Backend", "@prompts_game_backend"),
                    ("Multiplayer_System", "@prompts_multiplayer"),
                    ("Leaderboards", "@prompts_leaderboards"),
                    ("Game_Analytics", "@prompts_game_analytics"),
                ],
            ),
            template(
                "iot_application",
                "IoT Application",
                "Builds device monitoring and control systems: IoT dashboards, device \
                 management, sensor data ingestion and edge processing.",
                &[
                    ("IoT_Dashboard", "@prompts_iot_dashboard"),
                    ("Device_Management", "@prompts_device_management"),
                    ("Data_Ingestion", "@prompts_data_ingestion"),
                    ("Edge_Computing", "@prompts_edge_computing"),
                ],
            ),
            template(
                "content_management",
                "CMS Platform",
                "Builds content management systems: content APIs, media management, SEO \
                 optimization and editorial workflows.",
                &[
                    ("CMS_Frontend", "@prompts_cms_frontend"),
                    ("Content_API", "@prompts_content_api"),
                    ("Media_Management", "@prompts_media_management"),
                    ("SEO_Optimization", "@prompts_seo_optimization"),
                    ("Workflow_Management", "@prompts_workflow_management"),
                ],
            ),
            template(
                "api_platform",
                "API Platform",
                "Builds enterprise API platforms: RESTful API design, gateway, rate \
                 limiting, generated documentation and a developer portal.",
                &[
                    ("API_Design", "@prompts_api_design"),
                    ("API_Gateway", "@prompts_api_gateway"),
                    ("Rate_Limiting", "@prompts_rate_limiting"),
                    ("API_Documentation", "@prompts_api_documentation"),
                    ("Developer_Portal", "@prompts_developer_portal"),
                ],
            ),
            template(
                "backend_generator",
                "Backend Generator",
                "Generates models, controllers and routes from markdown specifications: \
                 CRUD controllers, RESTful routes, validations and auth middleware.",
                &[
                    ("Model_Generator", "@prompts_model_generator"),
                    ("Controller_Generator", "@prompts_controller_generator"),
                    ("Route_Generator", "@prompts_route_generator"),
                ],
            ),
            template(
                "frontend_components",
                "Frontend Component Generator",
                "Creates React/TypeScript components from specifications: components, \
                 custom hooks, TypeScript types, styles and unit tests.",
                &[
                    ("Component_Generator", "@prompts_component_generator"),
                    ("Hook_Generator", "@prompts_hook_generator"),
                    ("Type_Generator", "@prompts_type_generator"),
                ],
            ),
            template(
                "database_schema",
                "Database Schema Generator",
                "Creates database schemas from entity documentation: migrations, models, \
                 indexes, relations and seed scripts.",
                &[
                    ("Schema_Generator", "@prompts_schema_generator"),
                    ("Migration_Generator", "@prompts_migration_generator"),
                    ("Seed_Generator", "@prompts_seed_generator"),
                ],
            ),
            template(
                "api_documentation",
                "API Documentation Generator",
                "Generates complete API documentation from code: Swagger/OpenAPI specs, \
                 usage examples, SDKs and integration guides.",
                &[
                    ("Swagger_Generator", "@prompts_swagger_generator"),
                    ("SDK_Generator", "@prompts_sdk_generator"),
                    ("Guide_Generator", "@prompts_guide_generator"),
                ],
            ),
            template(
                "test_generator",
                "Test Generator",
                "Creates automated tests from existing code: unit and integration tests, \
                 mocks, fixtures and coverage reports.",
                &[
                    ("Unit_Test_Generator", "@prompts_unit_test_generator"),
                    ("Integration_Test_Generator", "@prompts_integration_test_generator"),
                    ("Mock_Generator", "@prompts_mock_generator"),
                ],
            ),
        ];
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&TemplateDefinition> {
        self.entries.iter().find(|entry| entry.key.as_str() == key)
    }

    pub fn all(&self) -> &[TemplateDefinition] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_has_at_least_eighteen_entries_with_unique_keys() {
        let catalog = TemplateCatalog::builtin();
        assert!(catalog.len() >= 18, "catalog holds {} entries", catalog.len());

        let keys: HashSet<&str> = catalog.all().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys.len(), catalog.len());
    }

    #[test]
    fn every_entry_requires_between_two_and_six_slots() {
        for entry in TemplateCatalog::builtin().all() {
            let count = entry.required_slot_count();
            assert!(
                (2..=6).contains(&count),
                "template `{}` requires {count} slots",
                entry.key
            );
        }
    }

    #[test]
    fn registration_order_is_stable_for_display_numbering() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.all()[0].key.as_str(), "notion_user_stories");
        let again = TemplateCatalog::builtin();
        let first: Vec<&str> = catalog.all().iter().map(|t| t.key.as_str()).collect();
        let second: Vec<&str> = again.all().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn notion_user_stories_matches_its_documented_shape() {
        let catalog = TemplateCatalog::builtin();
        let entry = catalog.get("notion_user_stories").expect("builtin entry");
        assert_eq!(entry.required_slot_count(), 3);
        assert_eq!(entry.required_slots[0].role, "Notion_Analyst");
        assert_eq!(
            entry.required_slots[0].prompt_file,
            "@prompts_notion_analyst"
        );
        assert_eq!(entry.required_slots[2].role, "Backend_Dev");
    }

    #[test]
    fn unknown_keys_resolve_to_none() {
        assert!(TemplateCatalog::builtin().get("time_travel").is_none());
    }
}
