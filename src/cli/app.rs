//! The `strata` demo application.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::commands::{BundleCommand, CompileCommand};
use crate::dispatch::{
    Application, CommandDispatcher, Context, DispatcherConfig, Namespace, OptionSpecCollection,
    Subcommands,
};
use crate::error::Result;
use crate::ui::OutputMode;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("strata=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strata=info"))
    };

    // A subscriber may already be installed when embedded or under test.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Application-level settings derived from the root options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalFlags {
    pub verbose: bool,
    pub quiet: bool,
    pub debug: bool,
    pub no_color: bool,
}

impl GlobalFlags {
    /// Output mode the flags select. `--quiet` wins over `--verbose`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// The `strata` application: root options and the top-level command names.
#[derive(Debug, Default)]
pub struct StrataApp {
    flags: GlobalFlags,
}

impl StrataApp {
    /// Create the application.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags parsed during the last run.
    pub fn flags(&self) -> GlobalFlags {
        self.flags
    }
}

impl Application for StrataApp {
    fn name(&self) -> &str {
        "strata"
    }

    fn brief(&self) -> &str {
        "Build and bundle packages"
    }

    fn options(&self, spec: &mut OptionSpecCollection) -> Result<()> {
        spec.add("v|verbose", "Show detailed output")?;
        spec.add("q|quiet", "Show results only")?;
        spec.add("debug", "Enable debug logging")?;
        spec.add("no-color", "Disable colored output")?;
        Ok(())
    }

    fn init(&mut self, subcommands: &mut Subcommands) {
        subcommands.declare("bundle");
        subcommands.declare("compile");
    }

    fn prepare(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let options = ctx.app_options();
        self.flags = GlobalFlags {
            verbose: options.is_set("verbose"),
            quiet: options.is_set("quiet"),
            debug: options.is_set("debug"),
            no_color: options.is_set("no-color"),
        };

        init_tracing(self.flags.debug);
        if self.flags.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        ctx.ui().set_output_mode(self.flags.output_mode());

        tracing::debug!(flags = ?self.flags, "application prepared");
        Ok(())
    }
}

/// Dispatcher serving the demo commands plus `list` and `help`.
pub fn demo_dispatcher() -> CommandDispatcher {
    CommandDispatcher::new(
        DispatcherConfig::new().namespace(
            Namespace::new("strata")
                .register("bundle", || Box::new(BundleCommand::new()))
                .register("compile", || Box::new(CompileCommand::new())),
        ),
    )
}
