use crate::db::migrations::{self, MigrationInfo};

use super::{run_blocking, AppState, CommandResult};

/// Applied schema migrations, oldest first.
pub async fn database_migrations(state: &AppState) -> CommandResult<Vec<MigrationInfo>> {
    let db = state.db();
    run_blocking(move || db.with_connection(migrations::get_migration_history)).await
}
