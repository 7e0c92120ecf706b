use crate::pipeline::TemplateApplicator;
use crate::shared::ids::TemplateKey;
use std::process::Command;

pub const CALIBRATOR_BIN: &str = "promptdeck-calibrate";
pub const TEMPLATE_GENERATOR_BIN: &str = "promptdeck-templates";
pub const ORCHESTRATOR_BIN: &str = "promptdeck-orchestrator";

/// Launches a companion tool and waits for it. A missing binary is reported
/// as such rather than as a raw I/O error.
pub fn run_companion_tool(binary: &str, args: &[&str]) -> Result<(), String> {
    match Command::new(binary).args(args).status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("`{binary}` exited with {status}")),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("`{binary}` was not found on PATH"))
        }
        Err(source) => Err(format!("failed to launch `{binary}`: {source}")),
    }
}

/// Applies a template by handing its reference to the automation engine
/// binary. The engine moves the mouse and keyboard; this side only reports
/// success or failure.
pub struct EngineApplicator;

impl TemplateApplicator for EngineApplicator {
    fn apply(&mut self, template: &TemplateKey) -> Result<(), String> {
        run_companion_tool(ORCHESTRATOR_BIN, &["apply", template.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_reports_a_readable_error() {
        let err = run_companion_tool("promptdeck-no-such-tool", &[]).expect_err("binary absent");
        assert!(err.contains("promptdeck-no-such-tool"));
        assert!(err.contains("not found"));
    }
}
