use crate::app::console::Console;
use crate::app::external::{
    run_companion_tool, EngineApplicator, CALIBRATOR_BIN, ORCHESTRATOR_BIN, TEMPLATE_GENERATOR_BIN,
};
use crate::catalog::{
    CatalogError, PipelineCatalog, PipelineDefinition, PipelineStep, TemplateCatalog,
};
use crate::config::{ConfigError, ConfigStore};
use crate::pipeline::{
    append_run_log, persist_run_report, run_pipeline, PipelineRunReport, RunControl, RunOutcome,
};
use crate::shared::ids::PipelineKey;
use crate::slots::{
    assign_default_roles, assign_from_discovered_files, assign_from_template, assign_manual,
    configured_chat_count, configured_layout, default_layout, discover_prompt_files,
    read_assignments, set_chat_count, ChatCount, ManualSlotEntry, SlotAssignment, SlotError,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("invalid selection `{raw}`")]
    InvalidSelection { raw: String },
    #[error("invalid pipeline id `{raw}`: {reason}")]
    InvalidPipelineId { raw: String, reason: String },
    #[error(transparent)]
    Slots(#[from] SlotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn parse_selection(raw: &str, max: usize) -> Result<usize, MenuError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<usize>()
        .map_err(|_| MenuError::InvalidSelection {
            raw: trimmed.to_string(),
        })?;
    if value == 0 || value > max {
        return Err(MenuError::InvalidSelection {
            raw: trimmed.to_string(),
        });
    }
    Ok(value)
}

fn is_yes(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reports progress through the console and asks for the go-ahead between
/// steps. An unreadable answer counts as a decline.
struct ConsoleRunControl<'c> {
    console: &'c mut dyn Console,
}

impl RunControl for ConsoleRunControl<'_> {
    fn step_started(&mut self, index: usize, total: usize, label: &str) {
        self.console.say(&format!("Step {index}/{total}: {label}"));
    }

    fn step_finished(&mut self, index: usize, total: usize, label: &str) {
        self.console
            .say(&format!("Step {index}/{total} done: {label}"));
    }

    fn continue_to_next_step(&mut self) -> bool {
        match self
            .console
            .prompt_line("Press Enter to continue to the next step (n aborts): ")
        {
            Ok(answer) => !answer.trim().eq_ignore_ascii_case("n"),
            Err(_) => false,
        }
    }
}

/// Interactive menu over the configuration engines. Thin dispatch: every
/// operation runs an engine call, renders the outcome, and returns to the
/// loop. No operation is fatal to the process except a closed console.
pub struct MenuSession<'a> {
    console: &'a mut dyn Console,
    store: ConfigStore,
    templates: TemplateCatalog,
    pipelines: PipelineCatalog,
    session_pipelines: Vec<PipelineDefinition>,
    state_root: PathBuf,
}

impl<'a> MenuSession<'a> {
    pub fn new(
        console: &'a mut dyn Console,
        store: ConfigStore,
        templates: TemplateCatalog,
        pipelines: PipelineCatalog,
        state_root: PathBuf,
    ) -> Self {
        Self {
            console,
            store,
            templates,
            pipelines,
            session_pipelines: Vec::new(),
            state_root,
        }
    }

    pub fn run(&mut self) -> std::io::Result<()> {
        loop {
            self.console.say(
                "\nPromptDeck\n\
                 1. Run visual calibration\n\
                 2. Generate detection templates\n\
                 3. Launch orchestrator\n\
                 4. Configure chat count\n\
                 5. Customize slot templates\n\
                 6. Show current configuration\n\
                 7. Chained pipelines\n\
                 8. Exit",
            );
            let raw = self.console.prompt_line("Select an option (1-8): ")?;
            let result = match raw.trim() {
                "1" => self.run_companion(CALIBRATOR_BIN, "visual calibration"),
                "2" => self.run_companion(TEMPLATE_GENERATOR_BIN, "template generation"),
                "3" => self.run_companion(ORCHESTRATOR_BIN, "orchestrator"),
                "4" => self.configure_chat_count(),
                "5" => self.customize_slot_templates(),
                "6" => self.show_configuration(),
                "7" => self.chained_pipelines(),
                "8" => {
                    self.console.say("Goodbye.");
                    return Ok(());
                }
                other => Err(MenuError::InvalidSelection {
                    raw: other.to_string(),
                }),
            };
            if let Err(err) = result {
                match err {
                    MenuError::Io(source) => return Err(source),
                    other => self.console.say(&format!("error: {other}")),
                }
            }
        }
    }

    fn run_companion(&mut self, binary: &str, what: &str) -> Result<(), MenuError> {
        self.console.say(&format!("Launching {what}..."));
        match run_companion_tool(binary, &[]) {
            Ok(()) => self.console.say(&format!("{what} finished.")),
            Err(err) => self.console.say(&format!("{what} failed: {err}")),
        }
        Ok(())
    }

    fn configure_chat_count(&mut self) -> Result<(), MenuError> {
        let current = configured_chat_count(&self.store);
        self.console.say(&format!(
            "Current chat count: {current}\n\
             1. 2 chats (Frontend + Backend)\n\
             2. 3 chats (adds Marketing)\n\
             3. 4 chats (adds Analytics)\n\
             4. Custom (2-6)"
        ));
        let raw = self.console.prompt_line("Select an option (1-4): ")?;
        let count = match raw.trim() {
            "1" => ChatCount::new(2)?,
            "2" => ChatCount::new(3)?,
            "3" => ChatCount::new(4)?,
            "4" => {
                let raw = self.console.prompt_line("Chat count (2-6): ")?;
                ChatCount::parse(&raw)?
            }
            other => {
                return Err(MenuError::InvalidSelection {
                    raw: other.to_string(),
                })
            }
        };
        set_chat_count(&mut self.store, count)?;
        self.console.say(&format!(
            "Configured {count} chats; saved to {}",
            self.store.path().display()
        ));
        if default_layout(count).is_empty() {
            self.console.say(
                "No default coordinates exist for this count; run the visual calibration \
                 to place the windows.",
            );
        }
        Ok(())
    }

    fn customize_slot_templates(&mut self) -> Result<(), MenuError> {
        let count = configured_chat_count(&self.store);
        self.console.say(&format!(
            "Configured chats: {count}\n\
             1. Use default templates\n\
             2. Customize manually\n\
             3. Load from existing prompt files\n\
             4. Restore previous configuration\n\
             5. Specialized task templates"
        ));
        let raw = self.console.prompt_line("Select an option (1-5): ")?;
        match raw.trim() {
            "1" => {
                let assignments = assign_default_roles(&mut self.store, count)?;
                self.report_assignments(&assignments);
            }
            "2" => self.customize_manually(count)?,
            "3" => self.load_from_prompt_files(count)?,
            "4" => {
                self.store.restore_backup()?;
                self.console.say("Previous configuration restored.");
            }
            "5" => self.apply_specialized_template(count)?,
            other => {
                return Err(MenuError::InvalidSelection {
                    raw: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn customize_manually(&mut self, count: ChatCount) -> Result<(), MenuError> {
        let mut entries = Vec::new();
        for index in count.slot_indices() {
            let role = self
                .console
                .prompt_line(&format!("Role for chat {index} (blank for Chat{index}): "))?;
            let prompt_file = self.console.prompt_line(&format!(
                "Prompt file for chat {index} (blank for @prompts_<role>): "
            ))?;
            entries.push(ManualSlotEntry { role, prompt_file });
        }
        let assignments = assign_manual(&mut self.store, count, &entries)?;
        self.report_assignments(&assignments);
        Ok(())
    }

    fn load_from_prompt_files(&mut self, count: ChatCount) -> Result<(), MenuError> {
        let cwd = std::env::current_dir()?;
        let files = discover_prompt_files(&cwd)?;
        if files.is_empty() {
            self.console.say(
                "No prompt files found. Create files like prompts_frontend.json or \
                 prompts_backend.json first.",
            );
            return Ok(());
        }
        let assignments = assign_from_discovered_files(&mut self.store, count, &files)?;
        self.report_assignments(&assignments);
        for index in count.slot_indices() {
            if !assignments.contains_key(&index) {
                self.console
                    .say(&format!("Chat {index}: no file assigned"));
            }
        }
        Ok(())
    }

    fn apply_specialized_template(&mut self, count: ChatCount) -> Result<(), MenuError> {
        let listing: Vec<String> = self
            .templates
            .all()
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                format!(
                    "{}. {} ({} chats)\n   {}",
                    position + 1,
                    entry.display_name,
                    entry.required_slot_count(),
                    entry.description
                )
            })
            .collect();
        for line in &listing {
            self.console.say(line);
        }
        let raw = self
            .console
            .prompt_line(&format!("Select a template (1-{}): ", self.templates.len()))?;
        let choice = parse_selection(&raw, self.templates.len())?;
        let key = self.templates.all()[choice - 1].key.as_str().to_string();

        let assignments = assign_from_template(&mut self.store, count, &self.templates, &key)?;
        self.report_assignments(&assignments);

        let required: Vec<String> = assignments
            .values()
            .map(|assignment| assignment.prompt_file.clone())
            .collect();
        self.console.say("Required prompt files:");
        for prompt_file in required {
            self.console.say(&format!("  - {prompt_file}"));
        }
        Ok(())
    }

    fn show_configuration(&mut self) -> Result<(), MenuError> {
        let count = configured_chat_count(&self.store);
        self.console.say(&format!("Configured chats: {count}"));

        let layout = configured_layout(&self.store, count);
        if layout.is_empty() {
            self.console
                .say("No coordinates configured; run the visual calibration.");
        } else {
            for (index, coordinate) in &layout {
                self.console.say(&format!(
                    "Chat {index}: ({}, {})",
                    coordinate.x, coordinate.y
                ));
            }
        }

        let assignments = read_assignments(&self.store, count);
        if assignments.is_empty() {
            self.console
                .say("No slot templates configured; use the customization menu.");
        } else {
            self.report_assignments(&assignments);
        }
        Ok(())
    }

    fn chained_pipelines(&mut self) -> Result<(), MenuError> {
        self.console.say(
            "1. Run a pipeline\n\
             2. Create a custom pipeline\n\
             3. List session pipelines\n\
             4. Back",
        );
        let raw = self.console.prompt_line("Select an option (1-4): ")?;
        match raw.trim() {
            "1" => self.run_pipeline_menu(),
            "2" => self.create_custom_pipeline(),
            "3" => {
                self.list_session_pipelines();
                Ok(())
            }
            "4" => Ok(()),
            other => Err(MenuError::InvalidSelection {
                raw: other.to_string(),
            }),
        }
    }

    fn run_pipeline_menu(&mut self) -> Result<(), MenuError> {
        let total = self.pipelines.len() + self.session_pipelines.len();
        let listing: Vec<String> = self
            .pipelines
            .all()
            .iter()
            .chain(self.session_pipelines.iter())
            .enumerate()
            .map(|(position, entry)| {
                format!(
                    "{}. {} ({} steps) - {}",
                    position + 1,
                    entry.display_name,
                    entry.step_count(),
                    entry.description
                )
            })
            .collect();
        for line in &listing {
            self.console.say(line);
        }
        let raw = self
            .console
            .prompt_line(&format!("Select a pipeline (1-{total}): "))?;
        let choice = parse_selection(&raw, total)?;
        let pipeline = self
            .pipelines
            .all()
            .iter()
            .chain(self.session_pipelines.iter())
            .nth(choice - 1)
            .cloned()
            .ok_or(MenuError::InvalidSelection { raw })?;

        let steps: Vec<String> = pipeline
            .steps
            .iter()
            .enumerate()
            .map(|(position, step)| format!("  {}. {}", position + 1, step.label))
            .collect();
        self.console
            .say(&format!("Pipeline: {}", pipeline.display_name));
        for line in &steps {
            self.console.say(line);
        }
        let confirm = self.console.prompt_line("Run this pipeline? (y/n): ")?;
        if !is_yes(&confirm) {
            self.console.say("Pipeline cancelled.");
            return Ok(());
        }

        let report = {
            let mut applicator = EngineApplicator;
            let mut control = ConsoleRunControl {
                console: &mut *self.console,
            };
            run_pipeline(&pipeline, &mut applicator, &mut control)
        };
        self.report_run(&report);
        if let Err(err) = persist_run_report(&self.state_root, &report) {
            self.console
                .say(&format!("could not persist run report: {err}"));
        }
        if let Err(err) = append_run_log(&self.state_root, &report) {
            self.console.say(&format!("could not append run log: {err}"));
        }
        Ok(())
    }

    fn report_run(&mut self, report: &PipelineRunReport) {
        match &report.outcome {
            RunOutcome::Completed => self
                .console
                .say(&format!("Pipeline '{}' completed.", report.display_name)),
            RunOutcome::Failed { step, error } => self.console.say(&format!(
                "Pipeline '{}' failed at step {step}: {error}\nRemaining steps were not run.",
                report.display_name
            )),
            RunOutcome::Aborted { after_step } => self.console.say(&format!(
                "Pipeline '{}' aborted after step {after_step}.",
                report.display_name
            )),
        }
        self.console.say("Completed steps:");
        let labels = report.completed_labels();
        if labels.is_empty() {
            self.console.say("  (none)");
        }
        for label in labels {
            self.console.say(&format!("  - {label}"));
        }
    }

    fn create_custom_pipeline(&mut self) -> Result<(), MenuError> {
        let raw_key = self
            .console
            .prompt_line("Pipeline id (letters, digits, '-' or '_'): ")?;
        let key =
            PipelineKey::parse(raw_key.trim()).map_err(|reason| MenuError::InvalidPipelineId {
                raw: raw_key.trim().to_string(),
                reason,
            })?;
        let display_name = self.console.prompt_line("Display name: ")?;
        if display_name.trim().is_empty() {
            self.console.say("A display name is required.");
            return Ok(());
        }
        let description = self.console.prompt_line("Description: ")?;

        let listing: Vec<String> = self
            .templates
            .all()
            .iter()
            .enumerate()
            .map(|(position, entry)| format!("{}. {}", position + 1, entry.display_name))
            .collect();
        for line in &listing {
            self.console.say(line);
        }
        let raw = self
            .console
            .prompt_line("Template numbers, comma separated (e.g. 1,3,5): ")?;
        let mut steps = Vec::new();
        for part in raw.split(',') {
            let choice = parse_selection(part, self.templates.len())?;
            let entry = &self.templates.all()[choice - 1];
            steps.push(PipelineStep {
                label: entry.display_name.clone(),
                template: entry.key.clone(),
            });
        }

        let pipeline = PipelineDefinition {
            key,
            display_name: display_name.trim().to_string(),
            description: description.trim().to_string(),
            steps,
        };
        pipeline.validate_against(&self.templates)?;
        self.console.say(&format!(
            "Custom pipeline '{}' with {} steps is available for this session. \
             It is not persisted and is gone after exit.",
            pipeline.display_name,
            pipeline.step_count()
        ));
        self.session_pipelines.push(pipeline);
        Ok(())
    }

    fn list_session_pipelines(&mut self) {
        if self.session_pipelines.is_empty() {
            self.console
                .say("No session pipelines. Create one with option 2.");
            return;
        }
        let listing: Vec<String> = self
            .session_pipelines
            .iter()
            .map(|entry| {
                format!(
                    "{} ({} steps) - {}",
                    entry.display_name,
                    entry.step_count(),
                    entry.description
                )
            })
            .collect();
        for line in listing {
            self.console.say(&line);
        }
    }

    fn report_assignments(&mut self, assignments: &BTreeMap<u8, SlotAssignment>) {
        for (index, assignment) in assignments {
            self.console.say(&format!(
                "Chat {index}: {} -> {}",
                assignment.role, assignment.prompt_file
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    struct ScriptedConsole {
        inputs: VecDeque<String>,
        output: Vec<String>,
    }

    impl ScriptedConsole {
        fn with_inputs(inputs: &[&str]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                output: Vec::new(),
            }
        }

        fn saw(&self, needle: &str) -> bool {
            self.output.iter().any(|line| line.contains(needle))
        }
    }

    impl Console for ScriptedConsole {
        fn say(&mut self, message: &str) {
            self.output.push(message.to_string());
        }

        fn prompt_line(&mut self, prompt: &str) -> io::Result<String> {
            self.output.push(prompt.to_string());
            self.inputs
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    fn session<'a>(
        console: &'a mut ScriptedConsole,
        temp: &tempfile::TempDir,
    ) -> MenuSession<'a> {
        let store = ConfigStore::open(&temp.path().join("config.yaml")).expect("open store");
        MenuSession::new(
            console,
            store,
            TemplateCatalog::builtin(),
            PipelineCatalog::builtin(),
            temp.path().to_path_buf(),
        )
    }

    #[test]
    fn invalid_selection_is_reported_and_the_loop_continues() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut console = ScriptedConsole::with_inputs(&["42", "8"]);
        session(&mut console, &temp).run().expect("run menu");

        assert!(console.saw("error: invalid selection `42`"));
        assert!(console.saw("Goodbye."));
    }

    #[test]
    fn custom_chat_count_flow_persists_count_without_coordinates_for_six() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut console = ScriptedConsole::with_inputs(&["4", "4", "6", "8"]);
        session(&mut console, &temp).run().expect("run menu");

        assert!(console.saw("Configured 6 chats"));
        assert!(console.saw("No default coordinates exist"));

        let store = ConfigStore::open(&temp.path().join("config.yaml")).expect("reopen");
        assert_eq!(store.get("GENERAL", "cantidad_chats"), Some("6"));
        assert!(!store.has_section("COORDENADAS"));
    }

    #[test]
    fn specialized_template_with_too_few_chats_reports_insufficient() {
        let temp = tempfile::tempdir().expect("tempdir");
        // Default count is 2; the first catalog entry requires 3 slots.
        let mut console = ScriptedConsole::with_inputs(&["5", "5", "1", "8"]);
        session(&mut console, &temp).run().expect("run menu");

        assert!(console.saw("needs 3 chats but only 2 are configured"));
    }

    #[test]
    fn custom_pipeline_is_created_listed_and_not_persisted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut console = ScriptedConsole::with_inputs(&[
            "7",
            "2",
            "docs_only",
            "Docs Only",
            "documentation pass",
            "3,19",
            "7",
            "3",
            "8",
        ]);
        session(&mut console, &temp).run().expect("run menu");

        assert!(console.saw("Custom pipeline 'Docs Only' with 2 steps"));
        assert!(console.saw("Docs Only (2 steps) - documentation pass"));
        // Session-only: nothing reaches the configuration file.
        assert!(!temp.path().join("config.yaml").exists());
    }
}
