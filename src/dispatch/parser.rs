//! Incremental option parsing over an argument vector.
//!
//! [`ContinuousOptionParser`] walks argv once. The dispatcher rebinds the
//! option spec each time it descends into a subcommand, so option syntax is
//! scoped to the command that owns it while the cursor keeps moving forward.
//!
//! # Example
//!
//! ```
//! use strata::dispatch::{ContinuousOptionParser, OptionSpecCollection};
//!
//! let mut app = OptionSpecCollection::new();
//! app.add("debug", "").unwrap();
//!
//! let mut parser = ContinuousOptionParser::new(["--debug", "compile", "--output", "x"]);
//! parser.set_options(app);
//! assert!(parser.continue_parse().unwrap().is_set("debug"));
//! assert_eq!(parser.advance().as_deref(), Some("compile"));
//!
//! let mut compile = OptionSpecCollection::new();
//! compile.add("output:", "").unwrap();
//! parser.set_options(compile);
//! assert_eq!(parser.continue_parse().unwrap().value("output"), Some("x"));
//! assert!(parser.is_end());
//! ```

use crate::error::{Error, Result};

use super::options::{OptionSpecCollection, ParsedOptions, ValueKind};

/// Token that ends option parsing; everything after it is positional.
pub const END_OF_OPTIONS: &str = "--";

/// Cursor-based option parser whose spec can be swapped mid-stream.
#[derive(Debug, Default)]
pub struct ContinuousOptionParser {
    args: Vec<String>,
    cursor: usize,
    spec: OptionSpecCollection,
    terminated: bool,
}

impl ContinuousOptionParser {
    /// Create a parser over `args` (program name excluded) with an empty spec.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Rebind the spec in effect. The cursor is untouched.
    pub fn set_options(&mut self, spec: OptionSpecCollection) {
        self.spec = spec;
    }

    /// The spec currently in effect.
    pub fn options(&self) -> &OptionSpecCollection {
        &self.spec
    }

    /// Peek at the token under the cursor.
    pub fn current_argument(&self) -> Option<&str> {
        self.args.get(self.cursor).map(String::as_str)
    }

    /// Consume and return the token under the cursor.
    pub fn advance(&mut self) -> Option<String> {
        let token = self.args.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    /// Whether every token has been consumed.
    pub fn is_end(&self) -> bool {
        self.cursor >= self.args.len()
    }

    /// Whether `--` has been seen.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Consume option tokens against the bound spec until a token that is
    /// not an option, and return what was parsed in this segment.
    ///
    /// The stopping token is left under the cursor. `--` is consumed and
    /// ends option parsing for the rest of the input.
    pub fn continue_parse(&mut self) -> Result<ParsedOptions> {
        let mut parsed = ParsedOptions::new();

        while !self.terminated {
            let Some(token) = self.current_argument() else {
                break;
            };

            if token == END_OF_OPTIONS {
                self.cursor += 1;
                self.terminated = true;
                break;
            }

            if let Some(body) = token.strip_prefix("--") {
                let token = token.to_string();
                let body = body.to_string();
                self.cursor += 1;
                self.parse_long(&token, &body, &mut parsed)?;
            } else if let Some(body) = token.strip_prefix('-').filter(|b| !b.is_empty()) {
                let token = token.to_string();
                let body = body.to_string();
                self.cursor += 1;
                self.parse_short(&token, &body, &mut parsed)?;
            } else {
                break;
            }
        }

        tracing::trace!(count = parsed.len(), position = self.cursor, "parsed option segment");
        Ok(parsed)
    }

    fn parse_long(&mut self, token: &str, body: &str, parsed: &mut ParsedOptions) -> Result<()> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };
        let spec = self
            .spec
            .find_long(name)
            .cloned()
            .ok_or_else(|| Error::unknown_option(token))?;

        let value = match inline {
            Some(value) => Some(value),
            None if spec.kind().needs_value() => Some(self.take_value(token)?),
            None => None,
        };
        parsed.record(&spec, value, token)
    }

    fn parse_short(&mut self, token: &str, body: &str, parsed: &mut ParsedOptions) -> Result<()> {
        let mut rest = body;
        while let Some(c) = rest.chars().next() {
            rest = &rest[c.len_utf8()..];
            let spec = self
                .spec
                .find_short(c)
                .cloned()
                .ok_or_else(|| Error::unknown_option(token))?;

            if spec.kind() == ValueKind::Flag {
                if rest.starts_with('=') {
                    return Err(Error::unexpected_value(token));
                }
                parsed.record(&spec, None, token)?;
                continue;
            }

            // A value-taking letter swallows the remainder of the token.
            let attached = rest.strip_prefix('=').unwrap_or(rest);
            let value = if !attached.is_empty() {
                Some(attached.to_string())
            } else if spec.kind().needs_value() {
                Some(self.take_value(token)?)
            } else {
                None
            };
            return parsed.record(&spec, value, token);
        }
        Ok(())
    }

    fn take_value(&mut self, token: &str) -> Result<String> {
        match self.current_argument() {
            Some(next) if !looks_like_option(next) => {
                let value = next.to_string();
                self.cursor += 1;
                Ok(value)
            }
            _ => Err(Error::missing_value(token)),
        }
    }
}

fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(entries: &[&str]) -> OptionSpecCollection {
        let mut spec = OptionSpecCollection::new();
        for entry in entries {
            spec.add(entry, "").unwrap();
        }
        spec
    }

    fn parser(args: &[&str], entries: &[&str]) -> ContinuousOptionParser {
        let mut parser = ContinuousOptionParser::new(args.iter().copied());
        parser.set_options(spec(entries));
        parser
    }

    #[test]
    fn empty_input_is_end() {
        let mut p = parser(&[], &[]);
        assert!(p.is_end());
        assert_eq!(p.current_argument(), None);
        assert_eq!(p.advance(), None);
        assert!(p.continue_parse().unwrap().is_empty());
    }

    #[test]
    fn stops_at_first_non_option_without_consuming_it() {
        let mut p = parser(&["--debug", "list", "--json"], &["debug"]);
        let parsed = p.continue_parse().unwrap();
        assert!(parsed.is_set("debug"));
        assert_eq!(p.current_argument(), Some("list"));
        assert_eq!(p.position(), 1);
    }

    #[test]
    fn advance_returns_token_verbatim() {
        let mut p = parser(&["bundle", "x"], &[]);
        assert_eq!(p.advance().as_deref(), Some("bundle"));
        assert_eq!(p.advance().as_deref(), Some("x"));
        assert!(p.is_end());
    }

    #[test]
    fn long_value_forms() {
        let mut p = parser(
            &["--output=a.phar", "--bootstrap", "boot.php"],
            &["output:", "bootstrap:"],
        );
        let parsed = p.continue_parse().unwrap();
        assert_eq!(parsed.value("output"), Some("a.phar"));
        assert_eq!(parsed.value("bootstrap"), Some("boot.php"));
        assert!(p.is_end());
    }

    #[test]
    fn short_value_forms() {
        let mut p = parser(
            &["-cgz", "-o", "out", "-l=src"],
            &["c|compress?", "o|output:", "l|lib+"],
        );
        let parsed = p.continue_parse().unwrap();
        assert_eq!(parsed.value("compress"), Some("gz"));
        assert_eq!(parsed.value("output"), Some("out"));
        assert_eq!(parsed.values("lib"), vec!["src"]);
    }

    #[test]
    fn bundled_short_flags() {
        let mut p = parser(&["-vq"], &["v|verbose", "q|quiet"]);
        let parsed = p.continue_parse().unwrap();
        assert!(parsed.is_set("verbose"));
        assert!(parsed.is_set("quiet"));
    }

    #[test]
    fn optional_value_does_not_take_next_token() {
        let mut p = parser(&["--compress", "src"], &["compress?"]);
        let parsed = p.continue_parse().unwrap();
        assert!(parsed.is_set("compress"));
        assert_eq!(parsed.value("compress"), None);
        assert_eq!(p.current_argument(), Some("src"));
    }

    #[test]
    fn multi_value_accumulates() {
        let mut p = parser(&["--lib", "src", "--lib=vendor"], &["lib+"]);
        let parsed = p.continue_parse().unwrap();
        assert_eq!(parsed.values("lib"), vec!["src", "vendor"]);
    }

    #[test]
    fn unknown_option_names_token() {
        let mut p = parser(&["--frob"], &["debug"]);
        match p.continue_parse().unwrap_err() {
            Error::Parse { token, .. } => assert_eq!(token, "--frob"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_short_names_whole_token() {
        let mut p = parser(&["-vx"], &["v|verbose"]);
        match p.continue_parse().unwrap_err() {
            Error::Parse { token, .. } => assert_eq!(token, "-vx"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_required_value_at_end() {
        let mut p = parser(&["--output"], &["output:"]);
        let err = p.continue_parse().unwrap_err();
        assert!(err.to_string().contains("--output"));
    }

    #[test]
    fn required_value_must_not_look_like_option() {
        let mut p = parser(&["--output", "--debug"], &["output:", "debug"]);
        assert!(p.continue_parse().is_err());
    }

    #[test]
    fn flag_rejects_inline_value() {
        let mut p = parser(&["--debug=1"], &["debug"]);
        assert!(p.continue_parse().is_err());
        let mut p = parser(&["-d=1"], &["d|debug"]);
        assert!(p.continue_parse().is_err());
    }

    #[test]
    fn lone_dash_is_not_an_option() {
        let mut p = parser(&["-"], &[]);
        assert!(p.continue_parse().unwrap().is_empty());
        assert_eq!(p.current_argument(), Some("-"));
    }

    #[test]
    fn double_dash_terminates() {
        let mut p = parser(&["--", "--debug"], &["debug"]);
        assert!(p.continue_parse().unwrap().is_empty());
        assert!(p.is_terminated());
        assert_eq!(p.current_argument(), Some("--debug"));
        assert!(p.continue_parse().unwrap().is_empty());
        assert_eq!(p.current_argument(), Some("--debug"));
    }

    #[test]
    fn rebinding_keeps_cursor() {
        let mut p = parser(&["--debug", "compile", "--output", "x"], &["debug"]);
        p.continue_parse().unwrap();
        p.advance();
        p.set_options(spec(&["output:"]));
        assert_eq!(p.position(), 2);
        assert_eq!(p.continue_parse().unwrap().value("output"), Some("x"));
    }

    #[test]
    fn specs_do_not_leak_after_rebinding() {
        let mut p = parser(&["list", "--debug"], &["debug"]);
        p.continue_parse().unwrap();
        p.advance();
        p.set_options(OptionSpecCollection::new());
        assert!(p.continue_parse().is_err());
    }
}
