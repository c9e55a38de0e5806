//! Bundle command implementation.
//!
//! `bundle [--manifest FILE] [--path DIR] <install|status>` works on the
//! dependencies a package manifest declares. `bundle` resolves its options in
//! `prepare`, before either child is resolved, and hands them to the children
//! through the settings it shares with their factories.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context as _};

use crate::dispatch::{Command, CommandResult, Context, OptionSpecCollection, Subcommands};
use crate::error::Result;

/// Manifest read when `--manifest` is not given.
pub const DEFAULT_MANIFEST: &str = "package.ini";

/// Install root used when `--path` is not given.
pub const DEFAULT_INSTALL_PATH: &str = ".local";

/// Settings `bundle` resolves for its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSettings {
    pub manifest: PathBuf,
    pub install_path: PathBuf,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            install_path: PathBuf::from(DEFAULT_INSTALL_PATH),
        }
    }
}

type SharedSettings = Rc<RefCell<BundleSettings>>;

/// The bundle command implementation.
#[derive(Debug, Default)]
pub struct BundleCommand {
    settings: SharedSettings,
}

impl BundleCommand {
    /// Create a new bundle command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings resolved by `prepare`.
    pub fn settings(&self) -> BundleSettings {
        self.settings.borrow().clone()
    }
}

impl Command for BundleCommand {
    fn name(&self) -> &str {
        "bundle"
    }

    fn brief(&self) -> &str {
        "Install package dependencies into a local path"
    }

    fn options(&self, spec: &mut OptionSpecCollection) -> Result<()> {
        spec.add("m|manifest:", "Package manifest (default: package.ini)")?;
        spec.add("p|path:", "Install root (default: .local)")?;
        Ok(())
    }

    fn init(&mut self, subcommands: &mut Subcommands) {
        let settings = Rc::clone(&self.settings);
        subcommands.register("install", move || {
            Box::new(InstallCommand::new(Rc::clone(&settings)))
        });
        let settings = Rc::clone(&self.settings);
        subcommands.register("status", move || {
            Box::new(StatusCommand::new(Rc::clone(&settings)))
        });
    }

    fn prepare(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let mut settings = self.settings.borrow_mut();
        if let Some(manifest) = ctx.options().value("manifest") {
            settings.manifest = PathBuf::from(manifest);
        }
        if let Some(path) = ctx.options().value("path") {
            settings.install_path = PathBuf::from(path);
        }
        tracing::debug!(
            manifest = %settings.manifest.display(),
            install_path = %settings.install_path.display(),
            "bundle settings resolved"
        );
        Ok(())
    }

    fn execute(
        &mut self,
        ctx: &mut Context<'_>,
        _args: &[String],
    ) -> anyhow::Result<CommandResult> {
        ctx.ui().message("bundle needs a subcommand: install, status");
        ctx.ui().show_hint("Run 'help bundle' for details.");
        Ok(CommandResult::failure(2))
    }

    fn finish(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let settings = self.settings.borrow();
        if ctx.ui().output_mode().shows_detail() {
            ctx.ui()
                .message(&format!("Done with {}", settings.manifest.display()));
        }
        Ok(())
    }
}

/// Drop a `;` or `#` comment, whole-line or trailing.
fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(index) => &line[..index],
        None => line,
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        bail!("{} not found, please define one", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    // Dependencies are the keys of the `[require]` section. A bare name
    // requires any version.
    let mut in_require = false;
    let mut deps = Vec::new();
    for raw in contents.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('[') {
            in_require = line == "[require]";
            continue;
        }
        if !in_require {
            continue;
        }
        let name = match line.split_once('=') {
            Some((name, _)) => name.trim(),
            None => line,
        };
        if name.is_empty() {
            bail!("{}: dependency without a name: '{}'", path.display(), raw.trim());
        }
        deps.push(name.to_string());
    }
    Ok(deps)
}

/// `bundle install [PACKAGE...]`.
#[derive(Debug)]
pub struct InstallCommand {
    settings: SharedSettings,
}

impl InstallCommand {
    fn new(settings: SharedSettings) -> Self {
        Self { settings }
    }
}

impl Command for InstallCommand {
    fn name(&self) -> &str {
        "install"
    }

    fn brief(&self) -> &str {
        "Install the manifest's dependencies (or only the named ones)"
    }

    fn options(&self, spec: &mut OptionSpecCollection) -> Result<()> {
        spec.add("f|force", "Reinstall packages that are already present")?;
        Ok(())
    }

    fn execute(
        &mut self,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> anyhow::Result<CommandResult> {
        let settings = self.settings.borrow().clone();
        let declared = read_manifest(&settings.manifest)?;

        let selected: Vec<&String> = if args.is_empty() {
            declared.iter().collect()
        } else {
            for name in args {
                if !declared.contains(name) {
                    bail!("{} is not declared in {}", name, settings.manifest.display());
                }
            }
            args.iter().collect()
        };

        let verb = if ctx.options().is_set("force") {
            "Reinstalling"
        } else {
            "Installing"
        };
        ctx.ui().message(&format!(
            "{} {} package(s) into {}",
            verb,
            selected.len(),
            settings.install_path.display()
        ));
        for name in &selected {
            ctx.ui().message(&format!("  - {}", name));
        }
        ctx.ui().success("Done");
        Ok(CommandResult::success())
    }
}

/// `bundle status`.
#[derive(Debug)]
pub struct StatusCommand {
    settings: SharedSettings,
}

impl StatusCommand {
    fn new(settings: SharedSettings) -> Self {
        Self { settings }
    }
}

impl Command for StatusCommand {
    fn name(&self) -> &str {
        "status"
    }

    fn brief(&self) -> &str {
        "Show the manifest and install root in use"
    }

    fn execute(
        &mut self,
        ctx: &mut Context<'_>,
        _args: &[String],
    ) -> anyhow::Result<CommandResult> {
        let settings = self.settings.borrow().clone();
        let state = if settings.manifest.exists() {
            "found"
        } else {
            "missing"
        };
        ctx.ui().message(&format!(
            "manifest: {} ({})",
            settings.manifest.display(),
            state
        ));
        ctx.ui()
            .message(&format!("install path: {}", settings.install_path.display()));
        Ok(CommandResult::success())
    }
}
