//! Shared helpers for command handlers.

use aci_core::ChangeReport;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Render a change report per the global output settings.
pub fn render(report: &ChangeReport, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_report(&global.output, report, color);
    output::print_output(&out, global.quiet);
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Check mode never commits, so it skips the prompt entirely.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes || global.check {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
