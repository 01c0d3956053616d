use crate::domain::a001_invoice::repository::search_key;
use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
    Value,
};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_A001_INVOICE: &str = r#"
    CREATE TABLE IF NOT EXISTS a001_invoice (
        id TEXT PRIMARY KEY NOT NULL,
        tenant_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        invoice_number TEXT NOT NULL,
        customer_name TEXT NOT NULL,
        customer_email TEXT,
        issue_date TEXT NOT NULL,
        due_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        currency TEXT NOT NULL,
        notes TEXT,
        lines_json TEXT NOT NULL DEFAULT '[]',
        search_key TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

const CREATE_A001_INVOICE_TENANT_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_a001_invoice_tenant
        ON a001_invoice (tenant_id, issue_date);
"#;

/// Opens the SQLite file (creating it if needed), bootstraps the schema and
/// stores the connection for [`get_connection`].
pub async fn initialize_database(db_file: &str) -> anyhow::Result<&'static DatabaseConnection> {
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database {}", absolute_path.display());
    let conn = connect(&db_url).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    get_connection()
}

/// Connects to `db_url` and makes sure the tables exist.
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(db_url.to_string());
    options.sqlx_logging(false);
    if db_url.contains(":memory:") {
        // every pooled connection would get its own in-memory database
        options.max_connections(1);
    }
    let conn = Database::connect(options).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Idempotent schema bootstrap.
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in [CREATE_A001_INVOICE, CREATE_A001_INVOICE_TENANT_INDEX] {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }
    ensure_search_key(conn).await
}

/// Files created before the search column get it added and filled.
async fn ensure_search_key(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let cols = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "PRAGMA table_info('a001_invoice');".to_string(),
        ))
        .await?;
    let has_search_key = cols
        .iter()
        .any(|row| row.try_get::<String>("", "name").unwrap_or_default() == "search_key");
    if !has_search_key {
        tracing::info!("Adding a001_invoice.search_key");
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "ALTER TABLE a001_invoice ADD COLUMN search_key TEXT NOT NULL DEFAULT '';".to_string(),
        ))
        .await?;
    }

    // Unicode lowercasing happens here, SQLite lower() only knows ASCII
    let stale = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT id, invoice_number, customer_name FROM a001_invoice WHERE search_key = '';"
                .to_string(),
        ))
        .await?;
    for row in stale {
        let id: String = row.try_get("", "id")?;
        let number: String = row.try_get("", "invoice_number")?;
        let customer: String = row.try_get("", "customer_name")?;
        conn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE a001_invoice SET search_key = ? WHERE id = ?;",
            [Value::from(search_key(&number, &customer)), Value::from(id)],
        ))
        .await?;
    }
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}
