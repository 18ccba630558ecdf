//! Per-entity record preparation before re-creation in the destination.
//!
//! Each [`Transform`] turns an exported record into a POST body plus the
//! path key its endpoint needs (section id for test cases, parent id for
//! attachments, case id for results). A record that cannot be prepared is
//! rejected with a [`SkipReason`]; callers log it and move on.

use serde_json::Value;
use thiserror::Error;

use crate::entity::AttachmentParent;
use crate::record::{Record, id_segment, is_truthy, retain_fields, set_project_id, strip_fields};

/// Server-assigned milestone fields dropped before `add_milestone`.
pub const MILESTONE_STRIPPED_FIELDS: &[&str] = &[
    "id",
    "started_on",
    "is_started",
    "completed_on",
    "is_completed",
    "url",
    "milestones",
];

/// Server-assigned test case fields dropped before `add_case`.
pub const TEST_CASE_STRIPPED_FIELDS: &[&str] = &[
    "id",
    "created_by",
    "created_on",
    "updated_by",
    "updated_on",
    "suite_id",
    "display_order",
    "is_deleted",
    "estimate_forecast",
    "case_assignedto_id",
    "comments",
];

/// The only plan fields `add_plan` receives.
pub const TEST_PLAN_KEPT_FIELDS: &[&str] = &["name", "description", "milestone_id"];

/// Why a record was not posted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing or empty required field '{0}'")]
    MissingField(&'static str),
}

/// A record ready to POST.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub body: Record,
    /// Path segment required by keyed endpoints (`add_case/{key}`).
    pub key: Option<String>,
}

impl Prepared {
    const fn unkeyed(body: Record) -> Self {
        Self { body, key: None }
    }
}

/// How a record of a given kind is reshaped for creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Milestone,
    TestCase,
    TestPlan,
    TestRun,
    /// Posted as exported.
    PassThrough,
    /// Posted as exported with `project_id` pointed at the destination.
    InjectProject,
    /// Keyed by the parent's id.
    Attachment(AttachmentParent),
}

impl Transform {
    /// Prepare `value` for the destination project.
    ///
    /// `fallback_key` supplies the path key when the record itself does not
    /// carry one (attachments exported per parent file).
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] when the record is not an object or lacks a
    /// field the endpoint requires.
    pub fn apply(
        self,
        value: Value,
        destination_project: u64,
        fallback_key: Option<&str>,
    ) -> Result<Prepared, SkipReason> {
        let Value::Object(mut record) = value else {
            return Err(SkipReason::NotAnObject);
        };

        match self {
            Self::Milestone => {
                set_project_id(&mut record, destination_project);
                strip_fields(&mut record, MILESTONE_STRIPPED_FIELDS);
                Ok(Prepared::unkeyed(record))
            }
            Self::TestCase => {
                let section = record
                    .shift_remove("section_id")
                    .as_ref()
                    .and_then(id_segment)
                    .ok_or(SkipReason::MissingField("section_id"))?;
                strip_fields(&mut record, TEST_CASE_STRIPPED_FIELDS);
                Ok(Prepared {
                    body: record,
                    key: Some(section),
                })
            }
            Self::TestPlan => {
                set_project_id(&mut record, destination_project);
                require_truthy(&record, "milestone_id")?;
                retain_fields(&mut record, TEST_PLAN_KEPT_FIELDS);
                Ok(Prepared::unkeyed(record))
            }
            Self::TestRun => {
                set_project_id(&mut record, destination_project);
                require_truthy(&record, "milestone_id")?;
                Ok(Prepared::unkeyed(record))
            }
            Self::PassThrough => Ok(Prepared::unkeyed(record)),
            Self::InjectProject => {
                set_project_id(&mut record, destination_project);
                Ok(Prepared::unkeyed(record))
            }
            Self::Attachment(parent) => {
                let field = parent.id_field();
                let key = record
                    .get(field)
                    .and_then(id_segment)
                    .or_else(|| fallback_key.map(str::to_string))
                    .ok_or(SkipReason::MissingField(field))?;
                Ok(Prepared {
                    body: record,
                    key: Some(key),
                })
            }
        }
    }
}

/// Prepare one result from a `{run_id, results}` group for
/// `add_result_for_case/{run_id}/{case_id}`; the key is the case id.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the result is not an object or has no
/// usable `case_id`.
pub fn case_result(value: Value) -> Result<Prepared, SkipReason> {
    let Value::Object(record) = value else {
        return Err(SkipReason::NotAnObject);
    };
    let case = record
        .get("case_id")
        .and_then(id_segment)
        .ok_or(SkipReason::MissingField("case_id"))?;
    Ok(Prepared {
        body: record,
        key: Some(case),
    })
}

fn require_truthy(record: &Record, field: &'static str) -> Result<(), SkipReason> {
    if record.get(field).is_some_and(is_truthy) {
        Ok(())
    } else {
        Err(SkipReason::MissingField(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DEST: u64 = 7;

    #[test]
    fn milestone_strips_server_fields_and_sets_project() {
        let raw = json!({
            "id": 11,
            "name": "Release 1",
            "project_id": 2,
            "is_completed": false,
            "completed_on": null,
            "is_started": true,
            "started_on": 1_700_000_000,
            "url": "https://example.testrail.io/index.php?/milestones/view/11",
            "milestones": [],
            "due_on": 1_710_000_000
        });

        let prepared = Transform::Milestone.apply(raw, DEST, None).unwrap();
        assert_eq!(
            Value::Object(prepared.body),
            json!({"name": "Release 1", "project_id": 7, "due_on": 1_710_000_000})
        );
        assert_eq!(prepared.key, None);
    }

    #[test]
    fn milestone_strip_is_idempotent() {
        let raw = json!({"id": 1, "name": "m", "url": "u"});
        let once = Transform::Milestone.apply(raw, DEST, None).unwrap();
        let twice = Transform::Milestone
            .apply(Value::Object(once.body.clone()), DEST, None)
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn non_object_records_are_skipped() {
        assert_eq!(
            Transform::Milestone.apply(json!("oops"), DEST, None),
            Err(SkipReason::NotAnObject)
        );
        assert_eq!(case_result(json!(3)), Err(SkipReason::NotAnObject));
    }

    #[test]
    fn test_case_pops_section_and_strips() {
        let raw = json!({
            "id": 100,
            "title": "Login works",
            "section_id": 55,
            "suite_id": 3,
            "created_by": 1,
            "created_on": 1,
            "updated_by": 1,
            "updated_on": 1,
            "display_order": 4,
            "is_deleted": 0,
            "estimate_forecast": null,
            "case_assignedto_id": null,
            "comments": [],
            "priority_id": 2
        });

        let prepared = Transform::TestCase.apply(raw, DEST, None).unwrap();
        assert_eq!(prepared.key.as_deref(), Some("55"));
        assert_eq!(
            Value::Object(prepared.body),
            json!({"title": "Login works", "priority_id": 2})
        );
    }

    #[test]
    fn test_case_without_section_is_skipped() {
        let raw = json!({"id": 100, "title": "orphan"});
        assert_eq!(
            Transform::TestCase.apply(raw, DEST, None),
            Err(SkipReason::MissingField("section_id"))
        );
        let null_section = json!({"title": "orphan", "section_id": null});
        assert!(Transform::TestCase.apply(null_section, DEST, None).is_err());
    }

    #[test]
    fn plan_requires_milestone_and_keeps_whitelist() {
        let raw = json!({
            "id": 9,
            "name": "Plan A",
            "description": "d",
            "milestone_id": 4,
            "entries": [{"runs": []}]
        });
        let prepared = Transform::TestPlan.apply(raw, DEST, None).unwrap();
        assert_eq!(
            Value::Object(prepared.body),
            json!({"name": "Plan A", "description": "d", "milestone_id": 4})
        );

        let missing = json!({"name": "Plan B", "milestone_id": null});
        assert_eq!(
            Transform::TestPlan.apply(missing, DEST, None),
            Err(SkipReason::MissingField("milestone_id"))
        );
    }

    #[test]
    fn run_requires_milestone_and_sets_project() {
        let raw = json!({"id": 3, "name": "Run", "milestone_id": 8, "project_id": 2});
        let prepared = Transform::TestRun.apply(raw, DEST, None).unwrap();
        assert_eq!(prepared.body.get("project_id"), Some(&json!(7)));
        assert_eq!(prepared.body.get("id"), Some(&json!(3)));

        let zero = json!({"name": "Run", "milestone_id": 0});
        assert!(Transform::TestRun.apply(zero, DEST, None).is_err());
    }

    #[test]
    fn pass_through_and_inject() {
        let raw = json!({"name": "Suite", "project_id": 2});
        let kept = Transform::PassThrough.apply(raw.clone(), DEST, None).unwrap();
        assert_eq!(Value::Object(kept.body), raw);

        let injected = Transform::InjectProject.apply(raw, DEST, None).unwrap();
        assert_eq!(injected.body.get("project_id"), Some(&json!(7)));
    }

    #[test]
    fn attachment_prefers_record_field_then_fallback() {
        let transform = Transform::Attachment(AttachmentParent::Case);

        let own = transform
            .apply(json!({"id": 1, "case_id": 12}), DEST, Some("99"))
            .unwrap();
        assert_eq!(own.key.as_deref(), Some("12"));

        let fallback = transform.apply(json!({"id": 1}), DEST, Some("99")).unwrap();
        assert_eq!(fallback.key.as_deref(), Some("99"));

        assert_eq!(
            transform.apply(json!({"id": 1}), DEST, None),
            Err(SkipReason::MissingField("case_id"))
        );
    }

    #[test]
    fn case_result_keys_by_case_id() {
        let prepared = case_result(json!({"case_id": 31, "status_id": 1})).unwrap();
        assert_eq!(prepared.key.as_deref(), Some("31"));
        assert_eq!(
            case_result(json!({"status_id": 1})),
            Err(SkipReason::MissingField("case_id"))
        );
    }
}
