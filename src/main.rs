//! Strata CLI entry point.

use std::process::ExitCode;

use strata::cli::{demo_dispatcher, StrataApp};
use strata::ui::{OutputMode, TerminalUI, UserInterface};

fn main() -> ExitCode {
    let mut ui = TerminalUI::new(OutputMode::Normal);
    let mut app = StrataApp::new();

    match demo_dispatcher().run(&mut app, std::env::args().skip(1), &mut ui) {
        Ok(report) => {
            tracing::debug!(path = ?report.path, code = report.result.exit_code, "run complete");
            ExitCode::from(report.result.process_exit_code())
        }
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            if e.is_resolution_error() {
                ui.show_hint("Run 'strata help' to see available commands.");
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
