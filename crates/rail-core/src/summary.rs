//! Outcome counts returned by the exporter and importer.

use serde::Serialize;
use std::fmt;

use crate::entity::EntityKind;

/// Which half of the migration produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Export,
    Import,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for one entity kind.
///
/// For exports a unit is a written file; for imports it is a posted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityOutcome {
    pub entity: EntityKind,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl EntityOutcome {
    #[must_use]
    pub const fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            succeeded: 0,
            skipped: 0,
            failed: 0,
        }
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Per-entity outcomes of one run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub direction: Direction,
    pub outcomes: Vec<EntityOutcome>,
}

impl MigrationSummary {
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            outcomes: Vec::new(),
        }
    }

    /// Mutable counts for `entity`, inserted on first use.
    pub fn entry(&mut self, entity: EntityKind) -> &mut EntityOutcome {
        let index = match self.outcomes.iter().position(|o| o.entity == entity) {
            Some(index) => index,
            None => {
                self.outcomes.push(EntityOutcome::new(entity));
                self.outcomes.len() - 1
            }
        };
        &mut self.outcomes[index]
    }

    pub fn succeeded(&mut self, entity: EntityKind) {
        self.entry(entity).succeeded += 1;
    }

    pub fn skipped(&mut self, entity: EntityKind) {
        self.entry(entity).skipped += 1;
    }

    pub fn failed(&mut self, entity: EntityKind) {
        self.entry(entity).failed += 1;
    }

    #[must_use]
    pub fn outcome(&self, entity: EntityKind) -> Option<&EntityOutcome> {
        self.outcomes.iter().find(|o| o.entity == entity)
    }

    #[must_use]
    pub fn total_succeeded(&self) -> usize {
        self.outcomes.iter().map(|o| o.succeeded).sum()
    }

    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped).sum()
    }

    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.outcomes.iter().map(|o| o.failed).sum()
    }

    /// True when nothing failed. Skipped records do not count as failures.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(EntityOutcome::is_clean)
    }
}
