//! Compile command implementation.
//!
//! `compile` plans an archive build from source directories. It reports the
//! plan; writing archives is left to the packaging backend.

use anyhow::bail;

use crate::dispatch::{Command, CommandResult, Context, OptionSpecCollection, ParsedOptions};
use crate::error::Result;

/// Archive written when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "output.phar";

/// Source directory used when neither `--lib` nor positionals are given.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Compression applied when `--compress` is given without a value.
pub const DEFAULT_COMPRESSION: &str = "gz";

const COMPRESSIONS: &[&str] = &["gz", "bz2"];

/// Resolved build plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilePlan {
    pub output: String,
    pub sources: Vec<String>,
    pub bootstrap: Option<String>,
    pub classloader: Option<String>,
    pub executable: bool,
    pub compression: Option<String>,
}

impl CompilePlan {
    /// Build a plan from parsed options; positionals add source directories.
    pub fn from_options(options: &ParsedOptions, extra_sources: &[String]) -> anyhow::Result<Self> {
        let mut sources: Vec<String> = options.values("lib").into_iter().map(String::from).collect();
        sources.extend(extra_sources.iter().cloned());
        if sources.is_empty() {
            sources.push(DEFAULT_SOURCE_DIR.to_string());
        }

        let compression = match (options.is_set("compress"), options.is_set("no-compress")) {
            (true, true) => bail!("--compress and --no-compress cannot be combined"),
            (true, false) => {
                let kind = options.value("compress").unwrap_or(DEFAULT_COMPRESSION);
                if !COMPRESSIONS.contains(&kind) {
                    bail!("unsupported compression '{}' (expected gz or bz2)", kind);
                }
                Some(kind.to_string())
            }
            (false, _) => None,
        };

        Ok(Self {
            output: options.value("output").unwrap_or(DEFAULT_OUTPUT).to_string(),
            sources,
            bootstrap: options.value("bootstrap").map(String::from),
            classloader: options.value("classloader").map(String::from),
            executable: options.is_set("executable"),
            compression,
        })
    }
}

/// The compile command implementation.
#[derive(Debug, Default)]
pub struct CompileCommand;

impl CompileCommand {
    /// Create a new compile command.
    pub fn new() -> Self {
        Self
    }
}

impl Command for CompileCommand {
    fn name(&self) -> &str {
        "compile"
    }

    fn brief(&self) -> &str {
        "Compile the current sources into an archive"
    }

    fn options(&self, spec: &mut OptionSpecCollection) -> Result<()> {
        spec.add("classloader?", "Embed a class loader source file")?;
        spec.add("bootstrap?", "Bootstrap or executable source file")?;
        spec.add("executable", "Mark the archive as executable")?;
        spec.add("lib+", "Source directory to include (repeatable)")?;
        spec.add("output:", "Archive file to write")?;
        spec.add("c|compress?", "Compression type: gz, bz2")?;
        spec.add("no-compress", "Do not compress the archive")?;
        Ok(())
    }

    fn execute(
        &mut self,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> anyhow::Result<CommandResult> {
        let plan = CompilePlan::from_options(ctx.options(), args)?;
        tracing::debug!(?plan, "compile plan");

        let ui = ctx.ui();
        ui.message(&format!("Compiling {}", plan.output));
        ui.message(&format!("  sources: {}", plan.sources.join(", ")));
        if let Some(bootstrap) = &plan.bootstrap {
            ui.message(&format!("  bootstrap: {}", bootstrap));
        }
        if let Some(classloader) = &plan.classloader {
            ui.message(&format!("  classloader: {}", classloader));
        }
        if plan.executable {
            ui.message("  executable: yes");
        }
        ui.message(&format!(
            "  compression: {}",
            plan.compression.as_deref().unwrap_or("none")
        ));
        ui.success(&format!("Planned {}", plan.output));
        Ok(CommandResult::success())
    }
}
