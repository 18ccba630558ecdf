//! Entity kinds exposed by the TestRail API and the selection that gates them.
//!
//! Kinds serialize as `snake_case`, matching the keys of the `[entities]`
//! config table and the stems of the exported files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// A category of test-management data.
///
/// Variant order is the processing order of both the exporter and the
/// importer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Milestones,
    TestCases,
    TestPlans,
    TestRuns,
    TestResults,
    Reports,
    Users,
    ProjectUsers,
    Templates,
    Suites,
    CaseStatuses,
    Statuses,
    SharedSteps,
    Runs,
    Roles,
    Groups,
    Datasets,
    Configs,
    CaseTypes,
    CaseFields,
    Priorities,
    Project,
    Tests,
    AttachmentsForCase,
    AttachmentsForPlan,
    AttachmentsForRun,
    AttachmentsForTest,
}

impl EntityKind {
    /// Every kind, in processing order.
    pub const ALL: [Self; 27] = [
        Self::Milestones,
        Self::TestCases,
        Self::TestPlans,
        Self::TestRuns,
        Self::TestResults,
        Self::Reports,
        Self::Users,
        Self::ProjectUsers,
        Self::Templates,
        Self::Suites,
        Self::CaseStatuses,
        Self::Statuses,
        Self::SharedSteps,
        Self::Runs,
        Self::Roles,
        Self::Groups,
        Self::Datasets,
        Self::Configs,
        Self::CaseTypes,
        Self::CaseFields,
        Self::Priorities,
        Self::Project,
        Self::Tests,
        Self::AttachmentsForCase,
        Self::AttachmentsForPlan,
        Self::AttachmentsForRun,
        Self::AttachmentsForTest,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Milestones => "milestones",
            Self::TestCases => "test_cases",
            Self::TestPlans => "test_plans",
            Self::TestRuns => "test_runs",
            Self::TestResults => "test_results",
            Self::Reports => "reports",
            Self::Users => "users",
            Self::ProjectUsers => "project_users",
            Self::Templates => "templates",
            Self::Suites => "suites",
            Self::CaseStatuses => "case_statuses",
            Self::Statuses => "statuses",
            Self::SharedSteps => "shared_steps",
            Self::Runs => "runs",
            Self::Roles => "roles",
            Self::Groups => "groups",
            Self::Datasets => "datasets",
            Self::Configs => "configs",
            Self::CaseTypes => "case_types",
            Self::CaseFields => "case_fields",
            Self::Priorities => "priorities",
            Self::Project => "project",
            Self::Tests => "tests",
            Self::AttachmentsForCase => "attachments_for_case",
            Self::AttachmentsForPlan => "attachments_for_plan",
            Self::AttachmentsForRun => "attachments_for_run",
            Self::AttachmentsForTest => "attachments_for_test",
        }
    }

    /// Name of the single-file export for this kind (`<kind>.json`).
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    /// The attachment parent for `attachments_for_*` kinds.
    #[must_use]
    pub const fn attachment_parent(self) -> Option<AttachmentParent> {
        match self {
            Self::AttachmentsForCase => Some(AttachmentParent::Case),
            Self::AttachmentsForPlan => Some(AttachmentParent::Plan),
            Self::AttachmentsForRun => Some(AttachmentParent::Run),
            Self::AttachmentsForTest => Some(AttachmentParent::Test),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownEntity(needle.to_string()))
    }
}

// ---------------------------------------------------------------------------
// AttachmentParent
// ---------------------------------------------------------------------------

/// The entity an attachment hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentParent {
    Case,
    Plan,
    Run,
    Test,
}

impl AttachmentParent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Plan => "plan",
            Self::Run => "run",
            Self::Test => "test",
        }
    }

    /// Foreign-key field naming the parent on an attachment record.
    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Case => "case_id",
            Self::Plan => "plan_id",
            Self::Run => "run_id",
            Self::Test => "test_id",
        }
    }

    /// Per-parent export file, e.g. `attachments_case_17.json`.
    #[must_use]
    pub fn file_name(self, parent_id: &str) -> String {
        format!("attachments_{}_{parent_id}.json", self.as_str())
    }

    /// Prefix shared by every per-parent export file of this kind.
    #[must_use]
    pub fn file_prefix(self) -> String {
        format!("attachments_{}_", self.as_str())
    }
}

impl fmt::Display for AttachmentParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntitySelection
// ---------------------------------------------------------------------------

/// Which entity kinds a run should process.
///
/// Built once from configuration (or `--only`) and then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySelection {
    enabled: BTreeSet<EntityKind>,
}

impl EntitySelection {
    /// A selection with nothing enabled.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A selection with every kind enabled.
    #[must_use]
    pub fn all() -> Self {
        Self::only(EntityKind::ALL)
    }

    /// A selection enabling exactly `kinds`.
    pub fn only(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            enabled: kinds.into_iter().collect(),
        }
    }

    /// Build a selection from `name -> enabled` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownEntity`] for a name that is not a kind.
    pub fn from_flags<'a, I>(flags: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut selection = Self::none();
        for (name, enabled) in flags {
            let kind = name.parse::<EntityKind>()?;
            if enabled {
                selection.enabled.insert(kind);
            }
        }
        Ok(selection)
    }

    #[must_use]
    pub fn is_enabled(&self, kind: EntityKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// True when at least one of `kinds` is enabled.
    #[must_use]
    pub fn any(&self, kinds: &[EntityKind]) -> bool {
        kinds.iter().any(|kind| self.is_enabled(*kind))
    }

    /// Enabled kinds in processing order.
    pub fn enabled(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.enabled.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}
