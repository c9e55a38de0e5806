//! Option specs and parsed option values.
//!
//! A command declares the options it accepts by filling an
//! [`OptionSpecCollection`]. Specs are written in a compact string form:
//!
//! | Spec            | Meaning                                    |
//! |-----------------|--------------------------------------------|
//! | `verbose`       | `--verbose` flag                           |
//! | `v\|verbose`    | `-v` / `--verbose` flag                    |
//! | `output:`       | `--output` with a required value           |
//! | `c\|compress?`  | `-c` / `--compress` with an optional value |
//! | `lib+`          | `--lib`, repeatable, values accumulate     |
//!
//! # Example
//!
//! ```
//! use strata::dispatch::{OptionSpecCollection, ValueKind};
//!
//! let mut spec = OptionSpecCollection::new();
//! spec.add("o|output:", "write the archive here").unwrap();
//! spec.add("lib+", "extra source directory").unwrap();
//!
//! assert_eq!(spec.find_long("output").unwrap().kind(), ValueKind::Required);
//! assert_eq!(spec.find_short('o').unwrap().key(), "output");
//! ```

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// How an option consumes values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Present or absent, never takes a value.
    Flag,
    /// Must be followed by exactly one value.
    Required,
    /// May carry a value, but only when attached (`--opt=value`, `-ovalue`).
    Optional,
    /// Takes one value per occurrence; occurrences accumulate.
    Multiple,
}

impl ValueKind {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            ':' => Some(Self::Required),
            '?' => Some(Self::Optional),
            '+' => Some(Self::Multiple),
            _ => None,
        }
    }

    /// Whether a value must follow the option.
    pub fn needs_value(&self) -> bool {
        matches!(self, Self::Required | Self::Multiple)
    }
}

/// A single accepted option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    key: String,
    long: Option<String>,
    short: Option<char>,
    kind: ValueKind,
    description: String,
}

impl OptionSpec {
    /// Parse a spec string such as `c|compress?`.
    pub fn parse(spec: &str, description: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidOptionSpec {
            spec: spec.to_string(),
            message: message.to_string(),
        };

        let (names, kind) = match spec.chars().last().and_then(ValueKind::from_suffix) {
            Some(kind) => (&spec[..spec.len() - 1], kind),
            None => (spec, ValueKind::Flag),
        };

        let (short, long) = match names.split_once('|') {
            Some((short, long)) => (Some(short), Some(long)),
            None if names.chars().count() == 1 => (Some(names), None),
            None => (None, Some(names)),
        };

        let short = match short {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => Some(c),
                    _ => return Err(invalid("short name must be a single letter or digit")),
                }
            }
            None => None,
        };

        let long = match long {
            Some(l) if l.chars().count() < 2 => {
                return Err(invalid("long name must be at least two characters"))
            }
            Some(l) if l.starts_with('-') || l.contains(['=', '|', ' ']) => {
                return Err(invalid("long name contains reserved characters"))
            }
            Some(l) => Some(l.to_string()),
            None => None,
        };

        let key = match (&long, short) {
            (Some(long), _) => long.clone(),
            (None, Some(c)) => c.to_string(),
            (None, None) => return Err(invalid("option has no name")),
        };

        Ok(Self {
            key,
            long,
            short,
            kind,
            description: description.to_string(),
        })
    }

    /// The name parsed values are stored under: the long name if there is
    /// one, otherwise the short letter.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Long name without dashes.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Short letter without dash.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// How the option consumes values.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// One-line description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rendered usage, e.g. `-c, --compress[=VALUE]`.
    pub fn usage(&self) -> String {
        let mut out = String::new();
        if let Some(c) = self.short {
            out.push('-');
            out.push(c);
        }
        if let Some(long) = &self.long {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str("--");
            out.push_str(long);
        }
        match self.kind {
            ValueKind::Flag => {}
            ValueKind::Required => out.push_str(" <VALUE>"),
            ValueKind::Optional => out.push_str("[=VALUE]"),
            ValueKind::Multiple => out.push_str(" <VALUE>..."),
        }
        out
    }
}

/// The options one command (or the application) accepts.
///
/// Each command gets a fresh collection; nothing is inherited from ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpecCollection {
    specs: Vec<OptionSpec>,
}

impl OptionSpecCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register an option spec string.
    pub fn add(&mut self, spec: &str, description: &str) -> Result<&OptionSpec> {
        let parsed = OptionSpec::parse(spec, description)?;
        self.insert(parsed)
    }

    /// Register an already-built spec, rejecting name clashes.
    pub fn insert(&mut self, spec: OptionSpec) -> Result<&OptionSpec> {
        let clash = self.specs.iter().any(|existing| {
            existing.key == spec.key
                || (spec.long.is_some() && existing.long == spec.long)
                || (spec.short.is_some() && existing.short == spec.short)
        });
        if clash {
            return Err(Error::InvalidOptionSpec {
                spec: spec.usage(),
                message: "an option with this name is already registered".to_string(),
            });
        }
        self.specs.push(spec);
        Ok(&self.specs[self.specs.len() - 1])
    }

    /// Look up by long name (without dashes).
    pub fn find_long(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.long.as_deref() == Some(name))
    }

    /// Look up by short letter.
    pub fn find_short(&self, c: char) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.short == Some(c))
    }

    /// Iterate specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    /// Number of registered options.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether no options are registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// A parsed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// The option was given without a value.
    Flag,
    /// The option was given with one value.
    Single(String),
    /// Every value given to a repeatable option, in order.
    Multiple(Vec<String>),
}

/// Options parsed for one command, keyed by [`OptionSpec::key`].
///
/// Produced by one `continue_parse` segment and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ParsedOptions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        spec: &OptionSpec,
        value: Option<String>,
        token: &str,
    ) -> Result<()> {
        match (spec.kind, value) {
            (ValueKind::Flag, Some(_)) => Err(Error::unexpected_value(token)),
            (ValueKind::Flag, None) => {
                self.values.insert(spec.key.clone(), OptionValue::Flag);
                Ok(())
            }
            (ValueKind::Multiple, Some(value)) => {
                match self
                    .values
                    .entry(spec.key.clone())
                    .or_insert_with(|| OptionValue::Multiple(Vec::new()))
                {
                    OptionValue::Multiple(values) => values.push(value),
                    other => *other = OptionValue::Multiple(vec![value]),
                }
                Ok(())
            }
            (ValueKind::Required | ValueKind::Multiple, None) => Err(Error::missing_value(token)),
            (ValueKind::Required | ValueKind::Optional, value) => {
                if self.values.contains_key(&spec.key) {
                    return Err(Error::repeated_option(token));
                }
                let value = value.map(OptionValue::Single).unwrap_or(OptionValue::Flag);
                self.values.insert(spec.key.clone(), value);
                Ok(())
            }
        }
    }

    /// Whether the option appeared at all.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The single value of an option; the last value for repeatable ones.
    pub fn value(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            OptionValue::Flag => None,
            OptionValue::Single(value) => Some(value),
            OptionValue::Multiple(values) => values.last().map(String::as_str),
        }
    }

    /// Every value given to an option, in order.
    pub fn values(&self, key: &str) -> Vec<&str> {
        match self.values.get(key) {
            Some(OptionValue::Single(value)) => vec![value.as_str()],
            Some(OptionValue::Multiple(values)) => values.iter().map(String::as_str).collect(),
            Some(OptionValue::Flag) | None => Vec::new(),
        }
    }

    /// Raw access to a parsed value.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Iterate parsed options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of options that appeared.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options appeared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
