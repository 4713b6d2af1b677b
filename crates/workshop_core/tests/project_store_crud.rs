use rusqlite::Connection;
use tempfile::TempDir;
use workshop_core::{
    ConnectionProvider, DbConfig, Decimal2, ProjectDraft, ProjectStore, SqliteProjectStore,
    StoreError,
};

fn store_in(dir: &TempDir) -> SqliteProjectStore {
    let config = DbConfig::new(dir.path().join("workshop.db"));
    SqliteProjectStore::new(ConnectionProvider::new(config))
}

fn raw_conn(dir: &TempDir) -> Connection {
    Connection::open(dir.path().join("workshop.db")).unwrap()
}

#[test]
fn insert_then_fetch_round_trips_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let mut draft = ProjectDraft::new("Build shed");
    draft.estimated_hours = Some(Decimal2::parse("12.50").unwrap());
    draft.difficulty = Some(3);

    let created = store.insert_project(&draft).unwrap();
    assert!(created.project_id >= 1);
    assert_eq!(created.project_name, "Build shed");
    assert_eq!(created.estimated_hours, draft.estimated_hours);

    let fetched = store.fetch_project(created.project_id).unwrap().unwrap();
    assert_eq!(fetched.project_name, "Build shed");
    assert_eq!(fetched.estimated_hours, Some(Decimal2::parse("12.50").unwrap()));
    assert_eq!(fetched.actual_hours, None);
    assert_eq!(fetched.difficulty, Some(3));
    assert_eq!(fetched.notes, None);
    assert!(fetched.materials.is_empty());
    assert!(fetched.steps.is_empty());
    assert!(fetched.categories.is_empty());
}

#[test]
fn generated_ids_increase_per_insert() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let first = store.insert_project(&ProjectDraft::new("Arbor")).unwrap();
    let second = store.insert_project(&ProjectDraft::new("Workbench")).unwrap();
    assert!(second.project_id > first.project_id);
}

#[test]
fn listing_orders_projects_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.insert_project(&ProjectDraft::new("Workbench")).unwrap();
    store.insert_project(&ProjectDraft::new("Arbor")).unwrap();
    store.insert_project(&ProjectDraft::new("birdhouse")).unwrap();

    let names: Vec<String> = store
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|record| record.project_name)
        .collect();
    // Binary collation puts uppercase before lowercase.
    assert_eq!(names, ["Arbor", "Workbench", "birdhouse"]);
}

#[test]
fn listing_an_empty_database_yields_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn update_overwrites_all_five_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let created = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    let mut record = created.clone();
    record.project_name = "Build bigger shed".to_string();
    record.actual_hours = Some(Decimal2::parse("20.25").unwrap());
    record.difficulty = Some(4);
    record.notes = Some("went over budget".to_string());
    assert!(store.update_project(&record).unwrap());

    let fetched = store.fetch_project(record.project_id).unwrap().unwrap();
    assert_eq!(fetched.project_name, "Build bigger shed");
    assert_eq!(fetched.actual_hours, Some(Decimal2::parse("20.25").unwrap()));
    assert_eq!(fetched.difficulty, Some(4));
    assert_eq!(fetched.notes.as_deref(), Some("went over budget"));
}

#[test]
fn updating_a_missing_project_reports_false() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    let ghost = ProjectDraft::new("Ghost").into_record(777);
    assert!(!store.update_project(&ghost).unwrap());
    assert_eq!(store.list_projects().unwrap().len(), 1);
}

#[test]
fn delete_removes_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let created = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    assert!(store.delete_project(created.project_id).unwrap());
    assert!(store.fetch_project(created.project_id).unwrap().is_none());
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn deleting_a_missing_project_reports_false() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(!store.delete_project(42).unwrap());
}

#[test]
fn delete_cascades_to_children_but_not_categories() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let created = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    {
        let conn = raw_conn(&dir);
        conn.execute(
            "INSERT INTO material (project_id, material_name, num_required, cost)
             VALUES (?1, 'birch plank', 8, 425);",
            [created.project_id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO step (project_id, step_text, step_order) VALUES (?1, 'cut boards', 1);",
            [created.project_id],
        )
        .unwrap();
        conn.execute("INSERT INTO category (category_name) VALUES ('woodworking');", [])
            .unwrap();
        conn.execute(
            "INSERT INTO project_category (project_id, category_id) VALUES (?1, 1);",
            [created.project_id],
        )
        .unwrap();
    }

    assert!(store.delete_project(created.project_id).unwrap());

    let conn = raw_conn(&dir);
    let count = |sql: &str| -> i64 { conn.query_row(sql, [], |row| row.get(0)).unwrap() };
    assert_eq!(count("SELECT COUNT(*) FROM material;"), 0);
    assert_eq!(count("SELECT COUNT(*) FROM step;"), 0);
    assert_eq!(count("SELECT COUNT(*) FROM project_category;"), 0);
    // Categories are shared between projects and survive the cascade.
    assert_eq!(count("SELECT COUNT(*) FROM category;"), 1);
}

#[test]
fn failed_insert_leaves_no_row_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    // The store does not validate; the CHECK constraint has to catch this.
    let mut draft = ProjectDraft::new("Build shed");
    draft.difficulty = Some(9);

    let err = store.insert_project(&draft).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn failed_update_leaves_the_old_row_intact() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let mut draft = ProjectDraft::new("Build shed");
    draft.difficulty = Some(2);
    let created = store.insert_project(&draft).unwrap();

    let mut record = created.clone();
    record.difficulty = Some(9);
    let err = store.update_project(&record).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));

    let fetched = store.fetch_project(created.project_id).unwrap().unwrap();
    assert_eq!(fetched.difficulty, Some(2));
}
