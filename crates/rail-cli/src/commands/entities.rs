use rail_config::RailConfig;
use rail_core::EntityKind;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output;

#[derive(Debug, Serialize)]
struct EntityRow {
    entity: EntityKind,
    enabled: bool,
    files: String,
}

/// Handle `railshift entities`.
pub fn handle(config: &RailConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let selection = config.selection()?;
    let rows = EntityKind::ALL
        .iter()
        .map(|kind| EntityRow {
            entity: *kind,
            enabled: selection.is_enabled(*kind),
            files: file_pattern(*kind),
        })
        .collect::<Vec<_>>();
    output::output(&rows, flags.format)
}

/// File name, or name pattern for kinds written once per parent.
fn file_pattern(kind: EntityKind) -> String {
    if kind == EntityKind::Tests {
        return format!("{}<run_id>.json", rail_migrate::store::TESTS_RUN_PREFIX);
    }
    match kind.attachment_parent() {
        Some(parent) => format!("{}<{}>.json", parent.file_prefix(), parent.id_field()),
        None => kind.file_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn patterns_match_exported_files() {
        assert_eq!(file_pattern(EntityKind::Milestones), "milestones.json");
        assert_eq!(file_pattern(EntityKind::Tests), "tests_run_<run_id>.json");
        assert_eq!(
            file_pattern(EntityKind::AttachmentsForCase),
            "attachments_case_<case_id>.json"
        );
    }
}
