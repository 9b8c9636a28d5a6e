//! Integration tests for soft-delete behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted rows are hidden from `find_by_id` and list queries
//! - Soft-delete is idempotent (second call returns `false`)
//! - Documents and incidents of a deleted client disappear with it

use careoffice_db::models::client::{ClientFilter, CreateClient};
use careoffice_db::models::client_document::{AttachFile, CreateClientDocument, DocumentFilter};
use careoffice_db::models::incident::{CreateIncident, IncidentFilter};
use careoffice_db::models::user::{CreateUser, UserFilter};
use careoffice_db::repositories::{ClientDocumentRepo, ClientRepo, IncidentRepo, UserRepo};
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_client(first: &str, last: &str) -> CreateClient {
    CreateClient {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: None,
        gender_id: None,
        email: None,
        phone_number: None,
        address: None,
        care_level_id: None,
        medical_notes: None,
        emergency_contact_name: None,
        emergency_contact_phone: None,
        assigned_staff_id: None,
    }
}

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        phone_number: None,
        role_id: 2,
    }
}

fn all_clients() -> ClientFilter {
    ClientFilter {
        limit: 100,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_client_from_find_by_id(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Hidden", "Client"))
        .await
        .unwrap();

    let deleted = ClientRepo::soft_delete(&pool, client.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let found = ClientRepo::find_by_id(&pool, client.id).await.unwrap();
    assert!(
        found.is_none(),
        "find_by_id should return None for soft-deleted client"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_client_from_list_and_count(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Listed", "ThenDeleted"))
        .await
        .unwrap();

    let before = ClientRepo::list(&pool, &all_clients()).await.unwrap();
    assert!(before.iter().any(|c| c.id == client.id));
    assert_eq!(ClientRepo::count(&pool, &all_clients()).await.unwrap(), 1);

    ClientRepo::soft_delete(&pool, client.id).await.unwrap();

    let after = ClientRepo::list(&pool, &all_clients()).await.unwrap();
    assert!(!after.iter().any(|c| c.id == client.id));
    assert_eq!(ClientRepo::count(&pool, &all_clients()).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_idempotent(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Delete", "Twice"))
        .await
        .unwrap();

    let first = ClientRepo::soft_delete(&pool, client.id).await.unwrap();
    assert!(first, "first soft_delete should return true");

    let second = ClientRepo::soft_delete(&pool, client.id).await.unwrap();
    assert!(
        !second,
        "second soft_delete should return false (already deleted)"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_documents_of_deleted_client_are_hidden(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Doc", "Owner"))
        .await
        .unwrap();
    let doc = ClientDocumentRepo::create(
        &pool,
        &CreateClientDocument {
            client_id: client.id,
            title: "Care plan".to_string(),
            document_type_id: Some(1),
            deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(doc.document_type_id, 1);

    ClientRepo::soft_delete(&pool, client.id).await.unwrap();

    assert!(ClientDocumentRepo::find_by_id(&pool, doc.id)
        .await
        .unwrap()
        .is_none());
    let listed = ClientDocumentRepo::list(&pool, &DocumentFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_file_swaps_report_previous_name_and_skip_deleted(pool: PgPool) {
    let admin = UserRepo::create(&pool, &new_user("uploader")).await.unwrap();
    let client = ClientRepo::create(&pool, &new_client("File", "Owner"))
        .await
        .unwrap();
    let doc = ClientDocumentRepo::create(
        &pool,
        &CreateClientDocument {
            client_id: client.id,
            title: "Care plan".to_string(),
            document_type_id: Some(1),
            deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            notes: None,
        },
    )
    .await
    .unwrap();
    let attach = |stored: &str| AttachFile {
        file_name: "plan.pdf".to_string(),
        stored_file_name: stored.to_string(),
        content_type: "application/pdf".to_string(),
        file_size_bytes: 4,
        uploaded_by_id: admin.id,
    };

    let first = ClientDocumentRepo::attach_file(&pool, doc.id, &attach("a.pdf"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.previous_stored_file_name, None);
    assert_eq!(first.document.stored_file_name.as_deref(), Some("a.pdf"));

    let second = ClientDocumentRepo::attach_file(&pool, doc.id, &attach("b.pdf"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.previous_stored_file_name.as_deref(), Some("a.pdf"));

    let cleared = ClientDocumentRepo::clear_file(&pool, doc.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.previous_stored_file_name.as_deref(), Some("b.pdf"));
    assert_eq!(cleared.document.file_name, None);

    ClientDocumentRepo::soft_delete(&pool, doc.id).await.unwrap();
    assert!(ClientDocumentRepo::clear_file(&pool, doc.id)
        .await
        .unwrap()
        .is_none());
    assert!(ClientDocumentRepo::attach_file(&pool, doc.id, &attach("c.pdf"))
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_incidents_of_deleted_client_are_hidden(pool: PgPool) {
    let reporter = UserRepo::create(&pool, &new_user("reporter")).await.unwrap();
    let client = ClientRepo::create(&pool, &new_client("Incident", "Subject"))
        .await
        .unwrap();
    let incident = IncidentRepo::create(
        &pool,
        &CreateIncident {
            client_id: client.id,
            reported_by_id: reporter.id,
            occurred_at: Utc::now(),
            location: None,
            incident_type_id: 1,
            severity_id: 2,
            description: "Slipped in the bathroom".to_string(),
            action_taken: None,
        },
    )
    .await
    .unwrap();

    let everything = IncidentFilter {
        limit: 100,
        ..Default::default()
    };
    let own = IncidentFilter {
        visible_to: Some(reporter.id),
        limit: 100,
        ..Default::default()
    };
    assert_eq!(IncidentRepo::count(&pool, &everything).await.unwrap(), 1);
    assert_eq!(IncidentRepo::count(&pool, &own).await.unwrap(), 1);

    ClientRepo::soft_delete(&pool, client.id).await.unwrap();

    assert!(IncidentRepo::find_by_id(&pool, incident.id)
        .await
        .unwrap()
        .is_none());
    assert!(IncidentRepo::list(&pool, &everything).await.unwrap().is_empty());
    assert_eq!(IncidentRepo::count(&pool, &everything).await.unwrap(), 0);
    assert_eq!(IncidentRepo::count(&pool, &own).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_user_is_inactive_and_hidden(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("gone")).await.unwrap();

    assert!(UserRepo::soft_delete(&pool, user.id).await.unwrap());

    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_none());

    // Login lookups still see the row so they can report the account state.
    let raw = UserRepo::find_by_username(&pool, "gone")
        .await
        .unwrap()
        .expect("row should still exist");
    assert!(raw.is_deleted);
    assert!(!raw.is_active);
    assert!(!raw.can_sign_in());

    let listed = UserRepo::list(
        &pool,
        &UserFilter {
            limit: 100,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!listed.iter().any(|u| u.id == user.id));
}
