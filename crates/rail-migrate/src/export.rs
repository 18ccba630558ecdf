//! Source-project export: GET each enabled kind and save it locally.

use rail_client::TestRailApi;
use rail_core::record::{collect_ids, into_records, is_truthy, record_id, records_in};
use rail_core::{AttachmentParent, Direction, EntityKind, EntitySelection, MigrationSummary};
use serde::Serialize;
use serde_json::{Value, json};

use crate::store::{DataDir, results_run_file, tests_run_file};
use crate::table::{
    ExportSource, PLAN_CONSUMERS, RUN_CONSUMERS, TEST_CONSUMERS, export_source,
};

/// Page size for `get_tests`. A shorter page is the last one.
pub const TESTS_PAGE_SIZE: usize = 250;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub source_project: u64,
    pub selection: EntitySelection,
}

/// Plan listing and the runs flattened out of it.
struct PlanData {
    /// `None` when `get_plans` failed.
    listing: Option<Value>,
    runs: Vec<Value>,
}

/// Paginated test listing of one run.
struct RunTests {
    run_id: String,
    tests: Vec<Value>,
}

pub struct Exporter<A> {
    api: A,
    store: DataDir,
    options: ExportOptions,
}

impl<A: TestRailApi> Exporter<A> {
    pub const fn new(api: A, store: DataDir, options: ExportOptions) -> Self {
        Self {
            api,
            store,
            options,
        }
    }

    /// Export every enabled kind, in processing order.
    ///
    /// Failures are logged and counted; they never stop the run. A failed
    /// fetch leaves any previous file for that kind in place, so check the
    /// summary before trusting the data directory.
    pub async fn run(&self) -> MigrationSummary {
        let selection = &self.options.selection;
        let mut summary = MigrationSummary::new(Direction::Export);

        // Plans feed runs, runs feed results and tests. Load each once, and
        // only when something downstream is enabled.
        let plans = if selection.any(PLAN_CONSUMERS) {
            Some(self.load_plans(selection.any(RUN_CONSUMERS)).await)
        } else {
            None
        };
        let run_tests = match &plans {
            Some(plans) if selection.any(TEST_CONSUMERS) => self.load_run_tests(&plans.runs).await,
            _ => Vec::new(),
        };

        for kind in selection.enabled() {
            tracing::info!(entity = %kind, "exporting");
            summary.entry(kind);
            match export_source(kind) {
                ExportSource::Get { endpoint, filter } => {
                    let Some(action) = endpoint.render(self.options.source_project, None) else {
                        tracing::error!(entity = %kind, "export endpoint needs a key");
                        summary.failed(kind);
                        continue;
                    };
                    let action = format!("{action}{filter}");
                    self.fetch_and_save(kind, &action, &kind.file_name(), &mut summary)
                        .await;
                }
                ExportSource::PlanListing => match plans.as_ref().and_then(|p| p.listing.as_ref()) {
                    Some(listing) => self.save(kind, &kind.file_name(), listing, &mut summary),
                    None => summary.failed(kind),
                },
                ExportSource::DerivedRuns => match &plans {
                    Some(PlanData {
                        listing: Some(_),
                        runs,
                    }) => {
                        let wrapped = json!({ "runs": runs });
                        self.save(kind, &kind.file_name(), &wrapped, &mut summary);
                    }
                    _ => summary.failed(kind),
                },
                ExportSource::RunResults => match &plans {
                    Some(plans) if plans.listing.is_some() => {
                        self.export_run_results(&plans.runs, &mut summary).await;
                    }
                    _ => summary.failed(kind),
                },
                ExportSource::RunTests => {
                    if plans.as_ref().is_some_and(|p| p.listing.is_some()) {
                        self.export_run_tests(&run_tests, &mut summary).await;
                    } else {
                        summary.failed(kind);
                    }
                }
                ExportSource::Attachments(parent) => {
                    self.export_attachments(kind, parent, plans.as_ref(), &run_tests, &mut summary)
                        .await;
                }
            }
        }

        tracing::info!(
            succeeded = summary.total_succeeded(),
            skipped = summary.total_skipped(),
            failed = summary.total_failed(),
            "export finished"
        );
        summary
    }

    /// GET `action` and save the body to `file`.
    ///
    /// On error nothing is written; a file from an earlier export survives.
    async fn fetch_and_save(
        &self,
        kind: EntityKind,
        action: &str,
        file: &str,
        summary: &mut MigrationSummary,
    ) {
        match self.api.get(action).await {
            Ok(data) => self.save(kind, file, &data, summary),
            Err(error) => {
                tracing::error!(entity = %kind, endpoint = action, file, %error, "fetch failed; file not written");
                summary.failed(kind);
            }
        }
    }

    fn save(&self, kind: EntityKind, file: &str, data: &Value, summary: &mut MigrationSummary) {
        if data.is_null() {
            tracing::warn!(entity = %kind, file, "no data; skipping save");
            summary.skipped(kind);
            return;
        }
        self.write(kind, file, data, summary);
    }

    fn write<T: Serialize + ?Sized>(
        &self,
        kind: EntityKind,
        file: &str,
        data: &T,
        summary: &mut MigrationSummary,
    ) {
        match self.store.save(file, data) {
            Ok(path) => {
                tracing::info!(entity = %kind, file = %path.display(), "saved");
                summary.succeeded(kind);
            }
            Err(error) => {
                tracing::error!(entity = %kind, file, %error, "save failed");
                summary.failed(kind);
            }
        }
    }

    async fn load_plans(&self, with_runs: bool) -> PlanData {
        let action = format!("get_plans/{}", self.options.source_project);
        let listing = match self.api.get(&action).await {
            Ok(listing) => Some(listing),
            Err(error) => {
                tracing::error!(endpoint = %action, %error, "plan listing fetch failed");
                None
            }
        };
        let runs = match &listing {
            Some(listing) if with_runs => fetch_test_runs_from_plans(&self.api, listing).await,
            _ => Vec::new(),
        };
        PlanData { listing, runs }
    }

    async fn load_run_tests(&self, runs: &[Value]) -> Vec<RunTests> {
        let mut all = Vec::new();
        for run_id in collect_ids(runs) {
            let tests = fetch_tests_with_pagination(&self.api, &run_id).await;
            all.push(RunTests { run_id, tests });
        }
        all
    }

    /// `test_results.json`: one `{run_id, results}` group per run.
    async fn export_run_results(&self, runs: &[Value], summary: &mut MigrationSummary) {
        let kind = EntityKind::TestResults;
        let mut groups = Vec::new();
        for run in runs {
            let (Some(run_id), Some(raw_id)) = (record_id(run), run.get("id")) else {
                continue;
            };
            match self.api.get(&format!("get_results_for_run/{run_id}")).await {
                Ok(Value::Null) => {}
                Ok(results) => groups.push(json!({ "run_id": raw_id, "results": results })),
                Err(error) => {
                    tracing::error!(entity = %kind, run_id, %error, "run results fetch failed");
                    summary.failed(kind);
                }
            }
        }
        self.save(kind, &kind.file_name(), &Value::Array(groups), summary);
    }

    /// `tests_run_<id>.json` per run. With results enabled, also
    /// `results_run_<id>.json` holding `{test_id, results}` per test.
    async fn export_run_tests(&self, run_tests: &[RunTests], summary: &mut MigrationSummary) {
        let with_results = self.options.selection.is_enabled(EntityKind::TestResults);
        for RunTests { run_id, tests } in run_tests {
            if tests.is_empty() {
                tracing::warn!(entity = %EntityKind::Tests, run_id, "run has no tests; skipping");
                summary.skipped(EntityKind::Tests);
                continue;
            }
            self.write(EntityKind::Tests, &tests_run_file(run_id), tests.as_slice(), summary);

            if with_results {
                let groups = self.fetch_test_results(tests, summary).await;
                self.save(
                    EntityKind::TestResults,
                    &results_run_file(run_id),
                    &Value::Array(groups),
                    summary,
                );
            }
        }
    }

    async fn fetch_test_results(
        &self,
        tests: &[Value],
        summary: &mut MigrationSummary,
    ) -> Vec<Value> {
        let mut groups = Vec::new();
        for test in tests {
            let (Some(test_id), Some(raw_id)) = (record_id(test), test.get("id")) else {
                continue;
            };
            match self.api.get(&format!("get_results/{test_id}")).await {
                Ok(results) if is_truthy(&results) => {
                    groups.push(json!({ "test_id": raw_id, "results": results }));
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::error!(entity = %EntityKind::TestResults, test_id, %error, "test results fetch failed");
                    summary.failed(EntityKind::TestResults);
                }
            }
        }
        groups
    }

    /// `attachments_<parent>_<id>.json` per parent record.
    async fn export_attachments(
        &self,
        kind: EntityKind,
        parent: AttachmentParent,
        plans: Option<&PlanData>,
        run_tests: &[RunTests],
        summary: &mut MigrationSummary,
    ) {
        let parent_ids = match parent {
            AttachmentParent::Case => {
                let action = format!("get_cases/{}", self.options.source_project);
                match self.api.get(&action).await {
                    Ok(cases) => match records_in(&cases, "cases") {
                        Some(cases) => collect_ids(cases),
                        None => {
                            tracing::error!(entity = %kind, "case listing is not in the expected format");
                            summary.failed(kind);
                            return;
                        }
                    },
                    Err(error) => {
                        tracing::error!(entity = %kind, endpoint = %action, %error, "case listing fetch failed");
                        summary.failed(kind);
                        return;
                    }
                }
            }
            AttachmentParent::Plan => {
                match plans
                    .and_then(|p| p.listing.as_ref())
                    .and_then(|listing| records_in(listing, "plans"))
                {
                    Some(plans) => collect_ids(plans),
                    None => {
                        summary.failed(kind);
                        return;
                    }
                }
            }
            AttachmentParent::Run => match plans {
                Some(plans) if plans.listing.is_some() => collect_ids(&plans.runs),
                _ => {
                    summary.failed(kind);
                    return;
                }
            },
            AttachmentParent::Test => match plans {
                Some(plans) if plans.listing.is_some() => run_tests
                    .iter()
                    .flat_map(|run| collect_ids(&run.tests))
                    .collect(),
                _ => {
                    summary.failed(kind);
                    return;
                }
            },
        };

        for id in parent_ids {
            let action = format!("get_attachments_for_{}/{id}", parent.as_str());
            self.fetch_and_save(kind, &action, &parent.file_name(&id), summary)
                .await;
        }
    }
}

/// Fetch every test of `run_id`, [`TESTS_PAGE_SIZE`] at a time.
///
/// Stops after the first page shorter than the page size. A failed request
/// or a page without a `tests` array also stops the loop; whatever was
/// gathered so far is returned.
pub async fn fetch_tests_with_pagination<A: TestRailApi>(api: &A, run_id: &str) -> Vec<Value> {
    let mut tests = Vec::new();
    let mut offset = 0;
    loop {
        let action = format!("get_tests/{run_id}&offset={offset}&limit={TESTS_PAGE_SIZE}");
        let page = match api.get(&action).await {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(run_id, offset, %error, "test page fetch failed; stopping");
                break;
            }
        };
        let Some(records) = into_records(page, "tests") else {
            tracing::warn!(run_id, offset, "malformed test page; stopping");
            break;
        };
        let count = records.len();
        tests.extend(records);
        if count < TESTS_PAGE_SIZE {
            break;
        }
        offset += TESTS_PAGE_SIZE;
    }
    tests
}

/// Runs of one plan detail, entries order then runs order.
#[must_use]
pub fn flatten_plan_runs(plan: &Value) -> Vec<Value> {
    plan.get("entries")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get("runs").and_then(Value::as_array))
        .flatten()
        .cloned()
        .collect()
}

/// Fetch `get_plan/{id}` for every plan in `listing` and flatten their runs.
///
/// A listing without a `plans` array is reported and yields no runs.
pub async fn fetch_test_runs_from_plans<A: TestRailApi>(api: &A, listing: &Value) -> Vec<Value> {
    let Some(plans) = records_in(listing, "plans") else {
        tracing::error!("test plans listing is not in the expected format");
        return Vec::new();
    };

    let mut runs = Vec::new();
    for plan_id in collect_ids(plans) {
        match api.get(&format!("get_plan/{plan_id}")).await {
            Ok(detail) => runs.extend(flatten_plan_runs(&detail)),
            Err(error) => tracing::error!(plan_id, %error, "plan detail fetch failed"),
        }
    }
    runs
}
