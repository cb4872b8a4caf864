//! Repository for the `templates` table.

use sqlx::PgPool;
use uuid::Uuid;
use vellum_core::types::DbId;

use crate::models::template::{CreateTemplate, CreateTemplateVersion, Template};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, template_type, version, is_active, \
    original_file_name, mime_type, file_size_bytes, file_path, created_at, updated_at";

/// Provides persistence and version-management operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    // ── Lineage writes ───────────────────────────────────────────────

    /// Insert version 1 of a new lineage. The row starts inactive;
    /// activation is a separate, explicit operation.
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates
                (id, name, description, template_type, version,
                 original_file_name, mime_type, file_size_bytes, file_path)
             VALUES ($1, $2, $3, $4, 1, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.template_type)
            .bind(&input.original_file_name)
            .bind(&input.mime_type)
            .bind(input.file_size_bytes)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Append the next version to an existing lineage. Concurrent
    /// appends to the same lineage serialize on a transaction-scoped
    /// advisory lock, so two uploads cannot observe the same current
    /// maximum; `uq_templates_lineage_version` backstops the assignment.
    ///
    /// Returns `None` if the lineage has no prior versions. The
    /// description carries over from the latest version; `is_active`
    /// flags are untouched.
    pub async fn create_next_version(
        pool: &PgPool,
        input: &CreateTemplateVersion,
    ) -> Result<Option<Template>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Held until commit/rollback; the insert below then reads the
        // lineage maximum after any competing append has committed.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1 || ':' || $2, 0))")
            .bind(&input.name)
            .bind(&input.template_type)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO templates
                (id, name, description, template_type, version,
                 original_file_name, mime_type, file_size_bytes, file_path)
             SELECT $1, $2, prev.description, $3, prev.version + 1, $4, $5, $6, $7
             FROM templates prev
             WHERE prev.name = $2 AND prev.template_type = $3
             ORDER BY prev.version DESC
             LIMIT 1
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Template>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.name)
            .bind(&input.template_type)
            .bind(&input.original_file_name)
            .bind(&input.mime_type)
            .bind(input.file_size_bytes)
            .bind(&input.file_path)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(inserted)
    }

    // ── Activation ───────────────────────────────────────────────────

    /// Activate a version, deactivating every other version of the same
    /// `template_type` in the same transaction. At most one row per type
    /// is active once the transaction commits.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn activate(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Resolve the activation scope from the target row, locking it
        // against concurrent activations.
        let scope: Option<(String,)> =
            sqlx::query_as("SELECT template_type FROM templates WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((template_type,)) = scope else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE templates SET is_active = false, updated_at = NOW() \
             WHERE template_type = $1 AND is_active = true AND id <> $2",
        )
        .bind(&template_type)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE templates SET is_active = true, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let activated = sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(activated))
    }

    /// Deactivate a version. Multiple inactive rows are legal, so this
    /// needs no transaction. Returns `None` if the row does not exist.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET is_active = false, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Find a template version by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the latest version of a lineage, if the lineage exists.
    pub async fn find_latest(
        pool: &PgPool,
        name: &str,
        template_type: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates
             WHERE name = $1 AND template_type = $2
             ORDER BY version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(name)
            .bind(template_type)
            .fetch_optional(pool)
            .await
    }

    /// List all template versions, optionally filtered by type, ordered
    /// by `template_type` ascending then `version` descending so the
    /// newest version of each type sorts first within its group.
    pub async fn list(
        pool: &PgPool,
        template_type: Option<&str>,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates
             WHERE $1::text IS NULL OR template_type = $1
             ORDER BY template_type ASC, version DESC"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(template_type)
            .fetch_all(pool)
            .await
    }
}
