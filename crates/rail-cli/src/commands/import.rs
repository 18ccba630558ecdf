use rail_core::MigrationSummary;
use rail_migrate::{ImportOptions, Importer};

use crate::cli::MigrateArgs;
use crate::context::AppContext;

/// Handle `railshift import`.
pub async fn handle(args: &MigrateArgs, ctx: &AppContext) -> anyhow::Result<MigrationSummary> {
    let root = ctx.store.root();
    anyhow::ensure!(
        root.is_dir(),
        "data directory '{}' does not exist; run `railshift export` first",
        root.display()
    );

    let selection = ctx.selection(&args.only)?;
    let destination_project = args.project.unwrap_or(ctx.config.project.destination_id);
    if selection.is_empty() {
        tracing::warn!("no entity kinds enabled; nothing to import");
    }

    let client = ctx.client()?;
    tracing::info!(
        base_url = client.base_url(),
        project = destination_project,
        data_dir = %root.display(),
        "starting import"
    );

    let importer = Importer::new(
        client,
        ctx.store.clone(),
        ImportOptions {
            destination_project,
            selection,
        },
    );
    Ok(importer.run().await)
}
