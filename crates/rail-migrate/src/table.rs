//! Declarative per-entity tables driving the exporter and importer.
//!
//! Every kind maps to one export source and one import step. The pipelines
//! iterate the selection and look the kind up here; no kind has a bespoke
//! function beyond the few shapes listed in [`ExportSource`] and
//! [`ImportSource`].

use rail_core::{AttachmentParent, EntityKind, Transform};

/// An API action template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `action`
    Global(&'static str),
    /// `action/{project_id}`
    Project(&'static str),
    /// `action/{key}`, the key coming from the record (section, parent).
    Keyed(&'static str),
}

impl Endpoint {
    /// Render the action string. `Keyed` endpoints need a key.
    #[must_use]
    pub fn render(self, project_id: u64, key: Option<&str>) -> Option<String> {
        match self {
            Self::Global(action) => Some(action.to_string()),
            Self::Project(action) => Some(format!("{action}/{project_id}")),
            Self::Keyed(action) => key.map(|key| format!("{action}/{key}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Where an exported kind's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSource {
    /// One GET saved verbatim to `<kind>.json`. `filter` is appended to the
    /// action (e.g. `&is_completed=0`).
    Get {
        endpoint: Endpoint,
        filter: &'static str,
    },
    /// The `get_plans` listing, saved to `test_plans.json`.
    PlanListing,
    /// Runs flattened out of every plan, saved as `{"runs": [...]}`.
    DerivedRuns,
    /// `get_results_for_run` per derived run, saved as
    /// `[{"run_id", "results"}]`.
    RunResults,
    /// Paginated `get_tests` per derived run, one file per run.
    RunTests,
    /// `get_attachments_for_<parent>` per parent, one file per parent.
    Attachments(AttachmentParent),
}

const fn get(endpoint: Endpoint) -> ExportSource {
    ExportSource::Get {
        endpoint,
        filter: "",
    }
}

/// Export source for `kind`.
#[must_use]
pub const fn export_source(kind: EntityKind) -> ExportSource {
    use Endpoint::{Global, Project};
    match kind {
        EntityKind::Milestones => ExportSource::Get {
            endpoint: Project("get_milestones"),
            filter: "&is_completed=0",
        },
        EntityKind::TestCases => get(Project("get_cases")),
        EntityKind::TestPlans => ExportSource::PlanListing,
        EntityKind::TestRuns => ExportSource::DerivedRuns,
        EntityKind::TestResults => ExportSource::RunResults,
        EntityKind::Reports => get(Project("get_reports")),
        EntityKind::Users => get(Global("get_users")),
        EntityKind::ProjectUsers => get(Project("get_users")),
        EntityKind::Templates => get(Project("get_templates")),
        EntityKind::Suites => get(Project("get_suites")),
        EntityKind::CaseStatuses => get(Global("get_case_statuses")),
        EntityKind::Statuses => get(Global("get_statuses")),
        EntityKind::SharedSteps => get(Project("get_shared_steps")),
        EntityKind::Runs => get(Project("get_runs")),
        EntityKind::Roles => get(Global("get_roles")),
        EntityKind::Groups => get(Global("get_groups")),
        EntityKind::Datasets => get(Project("get_datasets")),
        EntityKind::Configs => get(Project("get_configs")),
        EntityKind::CaseTypes => get(Global("get_case_types")),
        EntityKind::CaseFields => get(Global("get_case_fields")),
        EntityKind::Priorities => get(Global("get_priorities")),
        EntityKind::Project => get(Project("get_project")),
        EntityKind::Tests => ExportSource::RunTests,
        EntityKind::AttachmentsForCase => ExportSource::Attachments(AttachmentParent::Case),
        EntityKind::AttachmentsForPlan => ExportSource::Attachments(AttachmentParent::Plan),
        EntityKind::AttachmentsForRun => ExportSource::Attachments(AttachmentParent::Run),
        EntityKind::AttachmentsForTest => ExportSource::Attachments(AttachmentParent::Test),
    }
}

/// Kinds that need the plan listing.
pub const PLAN_CONSUMERS: &[EntityKind] = &[
    EntityKind::TestPlans,
    EntityKind::TestRuns,
    EntityKind::TestResults,
    EntityKind::Tests,
    EntityKind::AttachmentsForPlan,
    EntityKind::AttachmentsForRun,
    EntityKind::AttachmentsForTest,
];

/// Kinds that need runs flattened out of the plans.
pub const RUN_CONSUMERS: &[EntityKind] = &[
    EntityKind::TestRuns,
    EntityKind::TestResults,
    EntityKind::Tests,
    EntityKind::AttachmentsForRun,
    EntityKind::AttachmentsForTest,
];

/// Kinds that need the paginated test listing of every run.
pub const TEST_CONSUMERS: &[EntityKind] = &[EntityKind::Tests, EntityKind::AttachmentsForTest];

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Where an imported kind's records are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    /// `<kind>.json`, a collection.
    File,
    /// `<kind>.json`, a single object.
    SingleObject,
    /// Every `<prefix><id>.json`; `id` is the fallback path key.
    PerParent(&'static str),
    /// `test_results.json`, groups of `{run_id | test_id, results}`.
    ResultGroups,
}

/// How one kind is re-created in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStep {
    pub source: ImportSource,
    /// Key wrapping the array in paginated payloads.
    pub wrapper: &'static str,
    pub endpoint: Endpoint,
    pub transform: Transform,
}

const fn step(wrapper: &'static str, endpoint: Endpoint, transform: Transform) -> ImportStep {
    ImportStep {
        source: ImportSource::File,
        wrapper,
        endpoint,
        transform,
    }
}

const fn attachments(prefix: &'static str, action: &'static str, parent: AttachmentParent) -> ImportStep {
    ImportStep {
        source: ImportSource::PerParent(prefix),
        wrapper: "attachments",
        endpoint: Endpoint::Keyed(action),
        transform: Transform::Attachment(parent),
    }
}

/// Import step for `kind`.
#[must_use]
pub const fn import_step(kind: EntityKind) -> ImportStep {
    use Endpoint::{Global, Keyed, Project};
    use Transform::{InjectProject, PassThrough};
    match kind {
        EntityKind::Milestones => step("milestones", Project("add_milestone"), Transform::Milestone),
        EntityKind::TestCases => step("cases", Keyed("add_case"), Transform::TestCase),
        EntityKind::TestPlans => step("plans", Project("add_plan"), Transform::TestPlan),
        EntityKind::TestRuns => step("runs", Project("add_run"), Transform::TestRun),
        EntityKind::TestResults => ImportStep {
            source: ImportSource::ResultGroups,
            wrapper: "results",
            endpoint: Keyed("add_result_for_case"),
            transform: PassThrough,
        },
        EntityKind::Reports => step("reports", Project("add_report"), InjectProject),
        EntityKind::Users => step("users", Global("add_user"), PassThrough),
        EntityKind::ProjectUsers => step("users", Project("add_user_to_project"), InjectProject),
        EntityKind::Templates => step("templates", Project("add_template"), PassThrough),
        EntityKind::Suites => step("suites", Project("add_suite"), InjectProject),
        EntityKind::CaseStatuses => step("case_statuses", Global("add_case_status"), PassThrough),
        EntityKind::Statuses => step("statuses", Global("add_status"), PassThrough),
        EntityKind::SharedSteps => step("shared_steps", Project("add_shared_step"), PassThrough),
        EntityKind::Runs => step("runs", Project("add_run"), InjectProject),
        EntityKind::Roles => step("roles", Global("add_role"), PassThrough),
        EntityKind::Groups => step("groups", Global("add_group"), PassThrough),
        EntityKind::Datasets => step("datasets", Project("add_dataset"), PassThrough),
        EntityKind::Configs => step("configs", Project("add_config"), PassThrough),
        EntityKind::CaseTypes => step("case_types", Global("add_case_type"), PassThrough),
        EntityKind::CaseFields => step("case_fields", Global("add_case_field"), PassThrough),
        EntityKind::Priorities => step("priorities", Global("add_priority"), PassThrough),
        EntityKind::Project => ImportStep {
            source: ImportSource::SingleObject,
            wrapper: "project",
            endpoint: Global("add_project"),
            transform: PassThrough,
        },
        EntityKind::Tests => ImportStep {
            source: ImportSource::PerParent(crate::store::TESTS_RUN_PREFIX),
            wrapper: "tests",
            endpoint: Project("add_test"),
            transform: PassThrough,
        },
        EntityKind::AttachmentsForCase => {
            attachments("attachments_case_", "add_attachment_to_case", AttachmentParent::Case)
        }
        EntityKind::AttachmentsForPlan => {
            attachments("attachments_plan_", "add_attachment_to_plan", AttachmentParent::Plan)
        }
        EntityKind::AttachmentsForRun => {
            attachments("attachments_run_", "add_attachment_to_run", AttachmentParent::Run)
        }
        EntityKind::AttachmentsForTest => {
            attachments("attachments_test_", "add_attachment_to_test", AttachmentParent::Test)
        }
    }
}
