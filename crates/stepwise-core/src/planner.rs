//! Migration planner
//!
//! Computes the delta between the current applied version and a directive.
//! The current version is located in the catalog by value, so catalogs with
//! gaps in their numbering plan correctly. Every bound is checked here,
//! before any statement reaches the database.

use crate::catalog::Catalog;
use crate::directive::Directive;
use crate::errors::{MigrateError, Result};
use crate::model::MigrationUnit;
use stepwise_core_types::schema::{DIRECTION_BACKWARD, DIRECTION_FORWARD};

/// Which way a plan moves through the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => DIRECTION_FORWARD,
            Direction::Backward => DIRECTION_BACKWARD,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered work-list for one invocation
///
/// `units` is always an ascending slice of the catalog; a backward plan is
/// executed from its last element to its first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan<'a> {
    direction: Direction,
    units: &'a [MigrationUnit],
    from_version: i64,
    to_version: i64,
}

impl<'a> Plan<'a> {
    fn forward(units: &'a [MigrationUnit], from_version: i64) -> Self {
        Self {
            direction: Direction::Forward,
            units,
            from_version,
            to_version: units.last().map_or(from_version, MigrationUnit::version),
        }
    }

    /// `below` is the unit preceding `units` in the catalog, if any
    fn backward(
        units: &'a [MigrationUnit],
        below: Option<&MigrationUnit>,
        from_version: i64,
    ) -> Self {
        let to_version = if units.is_empty() {
            from_version
        } else {
            below.map_or(0, MigrationUnit::version)
        };
        Self {
            direction: Direction::Backward,
            units,
            from_version,
            to_version,
        }
    }

    fn noop(current: i64) -> Self {
        Self::forward(&[], current)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Planned units in ascending version order
    pub fn units(&self) -> &'a [MigrationUnit] {
        self.units
    }

    /// Planned units in the order they will run
    pub fn execution_order(&self) -> Box<dyn Iterator<Item = &'a MigrationUnit> + 'a> {
        match self.direction {
            Direction::Forward => Box::new(self.units.iter()),
            Direction::Backward => Box::new(self.units.iter().rev()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Current version the plan starts from
    pub fn from_version(&self) -> i64 {
        self.from_version
    }

    /// Version the database will report once this plan has run
    pub fn to_version(&self) -> i64 {
        self.to_version
    }
}

/// Plan the work for `directive` starting from `current`
///
/// # Errors
///
/// - `InvalidDirective` if the directive carries an unusable argument
/// - `PlanOutOfRange` if the delta falls outside the catalog, the target
///   version is not in the catalog, or `current` itself is unknown to it
pub fn plan<'a>(catalog: &'a Catalog, current: i64, directive: Directive) -> Result<Plan<'a>> {
    let directive = directive.validate()?;
    let units = catalog.units();

    let out_of_range = |reason: String| MigrateError::PlanOutOfRange {
        directive: directive.to_string(),
        current,
        reason,
    };

    if current > 0 && !catalog.contains(current) {
        return Err(out_of_range(format!(
            "applied version {} has no migration source",
            current
        )));
    }
    let applied = catalog.applied_prefix(current);

    let below = |start: usize| start.checked_sub(1).map(|idx| &units[idx]);

    let planned = match directive {
        Directive::All => Plan::forward(&units[applied..], current),
        Directive::Up(n) => {
            let end = applied + n as usize;
            if end > units.len() {
                return Err(out_of_range(format!(
                    "only {} pending migration(s)",
                    units.len() - applied
                )));
            }
            Plan::forward(&units[applied..end], current)
        }
        Directive::Down(n) => {
            let n = n as usize;
            if n > applied {
                return Err(out_of_range(format!(
                    "only {} applied migration(s)",
                    applied
                )));
            }
            let start = applied - n;
            Plan::backward(&units[start..applied], below(start), current)
        }
        Directive::To(target) => {
            if target > 0 && !catalog.contains(target) {
                return Err(out_of_range(format!(
                    "version {} is not in the catalog",
                    target
                )));
            }
            let target_idx = catalog.applied_prefix(target);
            if target > current {
                Plan::forward(&units[applied..target_idx], current)
            } else if target < current {
                Plan::backward(&units[target_idx..applied], below(target_idx), current)
            } else {
                Plan::noop(current)
            }
        }
        Directive::Reset if current > 0 => Plan::backward(&units[..applied], None, current),
        Directive::Reset => Plan::noop(current),
    };

    Ok(planned)
}
