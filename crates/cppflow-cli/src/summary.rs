use cppflow_core::{PipelineReport, StepStatus};

use crate::styles::{self as s, paint};

/// Renders one line per pipeline step, colored when `color` is set.
pub fn render(report: &PipelineReport, color: bool) -> String {
    let mut out = String::new();
    for step in report.steps() {
        let (style, label) = match &step.status {
            StepStatus::Succeeded => (s::SUCCESS, "ok".to_string()),
            StepStatus::Failed { code: Some(code) } => (s::FAILURE, format!("failed (exit {code})")),
            StepStatus::Failed { code: None } => (s::FAILURE, "failed (terminated)".to_string()),
            StepStatus::NotLaunched { reason } => (s::FAILURE, reason.clone()),
            StepStatus::Skipped => (s::MUTED, "skipped".to_string()),
        };
        let label = if color { paint(style, &label) } else { label };
        out.push_str(&format!("  {:<10} {}\n", step.step.as_str(), label));
    }
    out
}
