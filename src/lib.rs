//! Strata - nested subcommand dispatch for command-line programs.
//!
//! Strata resolves an argument vector like `app -v bundle -m pkg.ini install
//! --force foo` into a chain of commands. Each token that names a subcommand
//! at the current depth pushes that command and rescopes option parsing to
//! it; every other token is a positional argument for the deepest command.
//!
//! # Modules
//!
//! - [`dispatch`] - Option parsing, command resolution, the lifecycle, and
//!   the built-in `list`/`help` commands
//! - [`cli`] - The `strata` demo app
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Terminal output and the test double
//!
//! # Example
//!
//! ```
//! use strata::cli::{demo_dispatcher, StrataApp};
//! use strata::ui::MockUI;
//!
//! let mut ui = MockUI::new();
//! let report = demo_dispatcher()
//!     .run(&mut StrataApp::new(), ["help", "bundle"], &mut ui)
//!     .unwrap();
//!
//! // `bundle` after `help` is an argument, not a nested command.
//! assert_eq!(report.path, vec!["help"]);
//! assert_eq!(report.arguments, vec!["bundle"]);
//! ```

pub mod cli;
pub mod dispatch;
pub mod error;
pub mod ui;

pub use error::{Error, Result};
