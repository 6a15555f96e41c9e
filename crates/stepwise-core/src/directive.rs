//! Operator directives
//!
//! A directive names exactly one action for an invocation. The flag form
//! (`DirectiveFlags`) is what a command line produces; converting it rejects
//! missing or combined directives instead of running several in sequence.

use crate::errors::{MigrateError, Result};

/// The operator's requested action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Apply every pending unit
    All,
    /// Apply the next `n` units
    Up(u32),
    /// Revert the last `n` applied units
    Down(u32),
    /// Move forward or backward until `v` is the current version
    To(i64),
    /// Revert every applied unit
    Reset,
}

impl Directive {
    /// Reject directives whose argument can never produce a plan
    ///
    /// # Errors
    ///
    /// `InvalidDirective` for `Up(0)`, `Down(0)` or a negative `To`
    pub fn validate(self) -> Result<Self> {
        match self {
            Directive::Up(0) | Directive::Down(0) => Err(MigrateError::InvalidDirective {
                reason: format!("{} needs a step count greater than zero", self),
            }),
            Directive::To(v) if v < 0 => Err(MigrateError::InvalidDirective {
                reason: format!("target version {} is negative", v),
            }),
            _ => Ok(self),
        }
    }

    /// Convert command-line flags into a single directive
    ///
    /// # Errors
    ///
    /// `InvalidDirective` when no flag or more than one flag is set, or when
    /// the chosen directive fails [`Directive::validate`]
    pub fn from_flags(flags: &DirectiveFlags) -> Result<Self> {
        let mut chosen = Vec::new();
        if flags.all {
            chosen.push(Directive::All);
        }
        if let Some(n) = flags.up {
            chosen.push(Directive::Up(n));
        }
        if let Some(n) = flags.down {
            chosen.push(Directive::Down(n));
        }
        if let Some(v) = flags.to {
            chosen.push(Directive::To(v));
        }
        if flags.reset {
            chosen.push(Directive::Reset);
        }

        match chosen.as_slice() {
            [] => Err(MigrateError::InvalidDirective {
                reason: "one of --all, --up, --down, --to or --reset is required".to_string(),
            }),
            [single] => single.validate(),
            many => Err(MigrateError::InvalidDirective {
                reason: format!(
                    "only one directive may be given, got {}",
                    many.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        }
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::All => write!(f, "all"),
            Directive::Up(n) => write!(f, "up {}", n),
            Directive::Down(n) => write!(f, "down {}", n),
            Directive::To(v) => write!(f, "to {}", v),
            Directive::Reset => write!(f, "reset"),
        }
    }
}

/// Raw directive flags as collected at the command-line boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveFlags {
    pub all: bool,
    pub up: Option<u32>,
    pub down: Option<u32>,
    pub to: Option<i64>,
    pub reset: bool,
}
