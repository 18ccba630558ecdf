//! Destination-project import: read each enabled kind's export and re-create
//! every record with POST.

use rail_client::{ApiError, TestRailApi};
use rail_core::record::{id_segment, into_records};
use rail_core::transform::case_result;
use rail_core::{Direction, EntityKind, EntitySelection, MigrationSummary, Record};
use serde_json::Value;

use crate::store::{DataDir, RESULTS_RUN_PREFIX};
use crate::table::{ImportSource, ImportStep, import_step};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub destination_project: u64,
    pub selection: EntitySelection,
}

pub struct Importer<A> {
    api: A,
    store: DataDir,
    options: ImportOptions,
}

impl<A: TestRailApi> Importer<A> {
    pub const fn new(api: A, store: DataDir, options: ImportOptions) -> Self {
        Self {
            api,
            store,
            options,
        }
    }

    /// Import every enabled kind, in processing order.
    ///
    /// Records are posted in file order. A record that cannot be prepared is
    /// skipped; a rejected POST is counted as failed. Neither stops the run.
    pub async fn run(&self) -> MigrationSummary {
        let mut summary = MigrationSummary::new(Direction::Import);

        for kind in self.options.selection.enabled() {
            tracing::info!(entity = %kind, "importing");
            summary.entry(kind);
            let step = import_step(kind);
            match step.source {
                ImportSource::File => {
                    if let Some(records) = self.load_records(kind, &step, &mut summary) {
                        for record in records {
                            self.post_record(kind, &step, record, None, &mut summary)
                                .await;
                        }
                    }
                }
                ImportSource::SingleObject => self.import_single(kind, &step, &mut summary).await,
                ImportSource::PerParent(prefix) => {
                    self.import_per_parent(kind, &step, prefix, &mut summary)
                        .await;
                }
                ImportSource::ResultGroups => self.import_results(kind, &step, &mut summary).await,
            }
        }

        tracing::info!(
            succeeded = summary.total_succeeded(),
            skipped = summary.total_skipped(),
            failed = summary.total_failed(),
            "import finished"
        );
        summary
    }

    /// Load `<kind>.json` and unwrap its record array.
    fn load_records(
        &self,
        kind: EntityKind,
        step: &ImportStep,
        summary: &mut MigrationSummary,
    ) -> Option<Vec<Value>> {
        let file = kind.file_name();
        let payload = match self.store.load(&file) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::error!(entity = %kind, %error, "cannot read export");
                summary.failed(kind);
                return None;
            }
        };
        let records = into_records(payload, step.wrapper);
        if records.is_none() {
            tracing::error!(entity = %kind, file, key = step.wrapper, "no record list found in export");
            summary.failed(kind);
        }
        records
    }

    /// Transform one record and POST it.
    async fn post_record(
        &self,
        kind: EntityKind,
        step: &ImportStep,
        record: Value,
        fallback_key: Option<&str>,
        summary: &mut MigrationSummary,
    ) {
        let destination = self.options.destination_project;
        let prepared = match step.transform.apply(record, destination, fallback_key) {
            Ok(prepared) => prepared,
            Err(reason) => {
                tracing::warn!(entity = %kind, %reason, "skipping record");
                summary.skipped(kind);
                return;
            }
        };
        let Some(action) = step.endpoint.render(destination, prepared.key.as_deref()) else {
            tracing::warn!(entity = %kind, "skipping record: endpoint key missing");
            summary.skipped(kind);
            return;
        };
        self.post(kind, &action, prepared.body, summary).await;
    }

    async fn post(
        &self,
        kind: EntityKind,
        action: &str,
        body: Record,
        summary: &mut MigrationSummary,
    ) {
        let label = record_label(&body);
        let body = Value::Object(body);
        match self.api.post(action, &body).await {
            Ok(created) => {
                let new_id = created.get("id").and_then(id_segment);
                tracing::info!(entity = %kind, endpoint = action, label, new_id, "created");
                summary.succeeded(kind);
            }
            Err(error) if kind == EntityKind::Users && error.is_duplicate_email() => {
                tracing::warn!(entity = %kind, label, "user already exists; skipping");
                summary.skipped(kind);
            }
            Err(error) => {
                log_post_failure(kind, action, label.as_deref(), &error);
                summary.failed(kind);
            }
        }
    }

    /// `project.json` holds one object.
    async fn import_single(&self, kind: EntityKind, step: &ImportStep, summary: &mut MigrationSummary) {
        let payload = match self.store.load(&kind.file_name()) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::error!(entity = %kind, %error, "cannot read export");
                summary.failed(kind);
                return;
            }
        };
        self.post_record(kind, step, payload, None, summary).await;
    }

    /// Every `<prefix><id>.json`, with `<id>` as the fallback path key.
    async fn import_per_parent(
        &self,
        kind: EntityKind,
        step: &ImportStep,
        prefix: &str,
        summary: &mut MigrationSummary,
    ) {
        let files = match self.store.scan(prefix) {
            Ok(files) => files,
            Err(error) => {
                tracing::error!(entity = %kind, %error, "cannot list exports");
                summary.failed(kind);
                return;
            }
        };
        if files.is_empty() {
            tracing::warn!(entity = %kind, prefix, "no exported files found");
        }

        for (parent_id, path) in files {
            let records = match DataDir::load_path(&path) {
                Ok(payload) => into_records(payload, step.wrapper),
                Err(error) => {
                    tracing::error!(entity = %kind, %error, "cannot read export");
                    summary.failed(kind);
                    continue;
                }
            };
            let Some(records) = records else {
                tracing::error!(entity = %kind, file = %path.display(), "no record list found in export");
                summary.failed(kind);
                continue;
            };
            for record in records {
                self.post_record(kind, step, record, Some(&parent_id), summary)
                    .await;
            }
        }
    }

    /// `test_results.json` plus every `results_run_<id>.json`.
    ///
    /// `{run_id, results}` groups post each result to
    /// `add_result_for_case/{run_id}/{case_id}`; `{test_id, results}` groups
    /// post to `add_result/{test_id}`.
    async fn import_results(&self, kind: EntityKind, step: &ImportStep, summary: &mut MigrationSummary) {
        if let Some(groups) = self.load_records(kind, step, summary) {
            self.post_result_groups(kind, step, groups, summary).await;
        }

        let files = match self.store.scan(RESULTS_RUN_PREFIX) {
            Ok(files) => files,
            Err(error) => {
                tracing::error!(entity = %kind, %error, "cannot list per-test result exports");
                summary.failed(kind);
                return;
            }
        };
        for (run_id, path) in files {
            match DataDir::load_path(&path).map(|payload| into_records(payload, step.wrapper)) {
                Ok(Some(groups)) => {
                    tracing::debug!(entity = %kind, run_id, groups = groups.len(), "per-test results");
                    self.post_result_groups(kind, step, groups, summary).await;
                }
                Ok(None) => {
                    tracing::error!(entity = %kind, file = %path.display(), "no result groups found in export");
                    summary.failed(kind);
                }
                Err(error) => {
                    tracing::error!(entity = %kind, %error, "cannot read export");
                    summary.failed(kind);
                }
            }
        }
    }

    async fn post_result_groups(
        &self,
        kind: EntityKind,
        step: &ImportStep,
        groups: Vec<Value>,
        summary: &mut MigrationSummary,
    ) {
        for group in groups {
            let run_id = group.get("run_id").and_then(id_segment);
            let test_id = group.get("test_id").and_then(id_segment);
            let results = group
                .get("results")
                .cloned()
                .and_then(|results| into_records(results, step.wrapper));

            let Some(results) = results else {
                tracing::warn!(entity = %kind, "skipping result group without a results list");
                summary.skipped(kind);
                continue;
            };

            match (run_id, test_id) {
                (Some(run_id), _) => {
                    for result in results {
                        match case_result(result) {
                            Ok(prepared) => {
                                let case_id = prepared.key.unwrap_or_default();
                                let action = format!("add_result_for_case/{run_id}/{case_id}");
                                self.post(kind, &action, prepared.body, summary).await;
                            }
                            Err(reason) => {
                                tracing::warn!(entity = %kind, run_id, %reason, "skipping result");
                                summary.skipped(kind);
                            }
                        }
                    }
                }
                (None, Some(test_id)) => {
                    for result in results {
                        let Value::Object(body) = result else {
                            tracing::warn!(entity = %kind, test_id, "skipping malformed result");
                            summary.skipped(kind);
                            continue;
                        };
                        self.post(kind, &format!("add_result/{test_id}"), body, summary)
                            .await;
                    }
                }
                (None, None) => {
                    tracing::warn!(entity = %kind, "skipping result group without run_id or test_id");
                    summary.skipped(kind);
                }
            }
        }
    }
}

/// Human-readable handle for log lines: name, title, or email.
fn record_label(record: &Record) -> Option<String> {
    ["name", "title", "email"]
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

fn log_post_failure(kind: EntityKind, action: &str, label: Option<&str>, error: &ApiError) {
    tracing::error!(
        entity = %kind,
        endpoint = action,
        label,
        status = error.status(),
        %error,
        "create failed"
    );
}
