use crate::db::Database;
use crate::error::Result;
use crate::models::FileRecord;

/// Persistence capability over the `files` table
#[derive(Clone)]
pub struct FileStore {
    db: Database,
}

impl FileStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new file record
    pub async fn create(&self, record: &FileRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO files (id, file_name, storage_path, password_hash, created_at, expires_at, download_count, file_size, mime_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.file_name)
        .bind(&record.storage_path)
        .bind(&record.password_hash)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.download_count)
        .bind(record.file_size)
        .bind(&record.mime_type)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Fetch a file record by id
    pub async fn get(&self, id: &str) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as("SELECT * FROM files WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(record)
    }

    /// Atomically bump the download counter by one
    pub async fn increment_download_count(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE files SET download_count = download_count + 1 WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}
