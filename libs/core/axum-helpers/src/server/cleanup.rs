//! Connection cleanup run while the server drains.

use tracing::{error, info};

pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!(connection = name, "PostgreSQL connection closed"),
        Err(e) => error!(connection = name, error = %e, "Error closing PostgreSQL connection"),
    }
}
