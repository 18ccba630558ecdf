use rail_core::MigrationSummary;
use rail_migrate::{ExportOptions, Exporter};

use crate::cli::MigrateArgs;
use crate::context::AppContext;

/// Handle `railshift export`.
pub async fn handle(args: &MigrateArgs, ctx: &AppContext) -> anyhow::Result<MigrationSummary> {
    let selection = ctx.selection(&args.only)?;
    let source_project = args.project.unwrap_or(ctx.config.project.source_id);
    if selection.is_empty() {
        tracing::warn!("no entity kinds enabled; nothing to export");
    }

    let client = ctx.client()?;
    tracing::info!(
        base_url = client.base_url(),
        project = source_project,
        data_dir = %ctx.store.root().display(),
        "starting export"
    );

    let exporter = Exporter::new(
        client,
        ctx.store.clone(),
        ExportOptions {
            source_project,
            selection,
        },
    );
    Ok(exporter.run().await)
}
