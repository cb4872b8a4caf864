//! Tests for `TemplateRepo`: version numbering, activation exclusivity,
//! and list ordering. Each test runs against its own migrated database.

use sqlx::PgPool;
use vellum_db::models::template::{CreateTemplate, CreateTemplateVersion};
use vellum_db::repositories::TemplateRepo;

fn create_input(name: &str, template_type: &str) -> CreateTemplate {
    CreateTemplate {
        name: name.to_string(),
        description: Some("seed".to_string()),
        template_type: template_type.to_string(),
        original_file_name: format!("{name}.docx"),
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            .to_string(),
        file_size_bytes: 2_048,
        file_path: format!("data/templates/{name}/v1.docx"),
    }
}

fn version_input(name: &str, template_type: &str) -> CreateTemplateVersion {
    CreateTemplateVersion {
        name: name.to_string(),
        template_type: template_type.to_string(),
        original_file_name: format!("{name}.docx"),
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            .to_string(),
        file_size_bytes: 4_096,
        file_path: format!("data/templates/{name}/next.docx"),
    }
}

async fn active_count_for_type(pool: &PgPool, template_type: &str) -> i64 {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM templates WHERE template_type = $1 AND is_active")
            .bind(template_type)
            .fetch_one(pool)
            .await
            .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Version numbering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_stores_version_one_inactive(pool: PgPool) {
    let created = TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();

    assert_eq!(created.version, 1);
    assert!(!created.is_active);
    assert_eq!(created.name, "Invoice");
    assert!(created.updated_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sequential_uploads_are_gapless(pool: PgPool) {
    TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();

    for _ in 0..3 {
        TemplateRepo::create_next_version(&pool, &version_input("Invoice", "report"))
            .await
            .unwrap()
            .unwrap();
    }

    let rows = TemplateRepo::list(&pool, Some("report")).await.unwrap();
    let mut versions: Vec<i32> = rows.iter().map(|t| t.version).collect();
    versions.sort_unstable();
    assert_eq!(versions, vec![1, 2, 3, 4]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_does_not_touch_active_flags(pool: PgPool) {
    let v1 = TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    TemplateRepo::activate(&pool, v1.id).await.unwrap().unwrap();

    let v2 = TemplateRepo::create_next_version(&pool, &version_input("Invoice", "report"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(v2.version, 2);
    assert!(!v2.is_active);
    let v1_after = TemplateRepo::find_by_id(&pool, v1.id).await.unwrap().unwrap();
    assert!(v1_after.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_without_a_lineage_inserts_nothing(pool: PgPool) {
    let result = TemplateRepo::create_next_version(&pool, &version_input("Ghost", "report"))
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(TemplateRepo::list(&pool, None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_uploads_assign_distinct_versions(pool: PgPool) {
    TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();

    let input_a = version_input("Invoice", "report");
    let input_b = version_input("Invoice", "report");
    let (a, b) = tokio::join!(
        TemplateRepo::create_next_version(&pool, &input_a),
        TemplateRepo::create_next_version(&pool, &input_b),
    );

    let a = a.unwrap().unwrap();
    let b = b.unwrap().unwrap();
    let mut versions = vec![a.version, b.version];
    versions.sort_unstable();
    assert_eq!(versions, vec![2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn version_carries_over_the_lineage_description(pool: PgPool) {
    TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();

    let v2 = TemplateRepo::create_next_version(&pool, &version_input("Invoice", "report"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(v2.description.as_deref(), Some("seed"));
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn activate_deactivates_siblings_of_the_same_type(pool: PgPool) {
    let v1 = TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    let v2 = TemplateRepo::create_next_version(&pool, &version_input("Invoice", "report"))
        .await
        .unwrap()
        .unwrap();

    TemplateRepo::activate(&pool, v1.id).await.unwrap().unwrap();
    let activated = TemplateRepo::activate(&pool, v2.id).await.unwrap().unwrap();

    assert!(activated.is_active);
    let v1_after = TemplateRepo::find_by_id(&pool, v1.id).await.unwrap().unwrap();
    assert!(!v1_after.is_active);
    assert_eq!(active_count_for_type(&pool, "report").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activation_scope_spans_lineages_of_one_type(pool: PgPool) {
    // Two lineages sharing a template type: activating one deactivates
    // the other.
    let invoice = TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    let summary = TemplateRepo::create(&pool, &create_input("Summary", "report"))
        .await
        .unwrap();

    TemplateRepo::activate(&pool, invoice.id).await.unwrap().unwrap();
    TemplateRepo::activate(&pool, summary.id).await.unwrap().unwrap();

    assert_eq!(active_count_for_type(&pool, "report").await, 1);
    let invoice_after = TemplateRepo::find_by_id(&pool, invoice.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!invoice_after.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activation_does_not_cross_template_types(pool: PgPool) {
    let report = TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    let contract = TemplateRepo::create(&pool, &create_input("Msa", "contract"))
        .await
        .unwrap();

    TemplateRepo::activate(&pool, report.id).await.unwrap().unwrap();
    TemplateRepo::activate(&pool, contract.id).await.unwrap().unwrap();

    assert_eq!(active_count_for_type(&pool, "report").await, 1);
    assert_eq!(active_count_for_type(&pool, "contract").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activate_unknown_id_returns_none(pool: PgPool) {
    let result = TemplateRepo::activate(&pool, uuid::Uuid::now_v7()).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivate_is_idempotent(pool: PgPool) {
    let v1 = TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    TemplateRepo::activate(&pool, v1.id).await.unwrap().unwrap();

    let first = TemplateRepo::deactivate(&pool, v1.id).await.unwrap().unwrap();
    assert!(!first.is_active);

    // Deactivating an already-inactive row is legal.
    let second = TemplateRepo::deactivate(&pool, v1.id).await.unwrap().unwrap();
    assert!(!second.is_active);

    assert!(TemplateRepo::deactivate(&pool, uuid::Uuid::now_v7())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_orders_by_type_then_version_descending(pool: PgPool) {
    TemplateRepo::create(&pool, &create_input("Msa", "contract"))
        .await
        .unwrap();
    TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    TemplateRepo::create_next_version(&pool, &version_input("Invoice", "report"))
        .await
        .unwrap()
        .unwrap();

    let rows = TemplateRepo::list(&pool, None).await.unwrap();

    let keys: Vec<(String, i32)> = rows
        .iter()
        .map(|t| (t.template_type.clone(), t.version))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("contract".to_string(), 1),
            ("report".to_string(), 2),
            ("report".to_string(), 1),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_template_type(pool: PgPool) {
    TemplateRepo::create(&pool, &create_input("Msa", "contract"))
        .await
        .unwrap();
    TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();

    let rows = TemplateRepo::list(&pool, Some("contract")).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Msa");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_latest_returns_the_highest_version(pool: PgPool) {
    TemplateRepo::create(&pool, &create_input("Invoice", "report"))
        .await
        .unwrap();
    TemplateRepo::create_next_version(&pool, &version_input("Invoice", "report"))
        .await
        .unwrap()
        .unwrap();

    let latest = TemplateRepo::find_latest(&pool, "Invoice", "report")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version, 2);

    assert!(TemplateRepo::find_latest(&pool, "Ghost", "report")
        .await
        .unwrap()
        .is_none());
}
