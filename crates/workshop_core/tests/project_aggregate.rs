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

fn seed_material(
    conn: &Connection,
    project_id: i64,
    name: &str,
    num_required: Option<i64>,
    cost_hundredths: Option<i64>,
) {
    conn.execute(
        "INSERT INTO material (project_id, material_name, num_required, cost)
         VALUES (?1, ?2, ?3, ?4);",
        rusqlite::params![project_id, name, num_required, cost_hundredths],
    )
    .unwrap();
}

fn seed_step(conn: &Connection, project_id: i64, text: &str, order: i64) {
    conn.execute(
        "INSERT INTO step (project_id, step_text, step_order) VALUES (?1, ?2, ?3);",
        rusqlite::params![project_id, text, order],
    )
    .unwrap();
}

fn seed_category(conn: &Connection, name: &str) -> i64 {
    conn.execute("INSERT INTO category (category_name) VALUES (?1);", [name])
        .unwrap();
    conn.last_insert_rowid()
}

fn link_category(conn: &Connection, project_id: i64, category_id: i64) {
    conn.execute(
        "INSERT INTO project_category (project_id, category_id) VALUES (?1, ?2);",
        rusqlite::params![project_id, category_id],
    )
    .unwrap();
}

#[test]
fn fetch_assembles_children_for_the_requested_project_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let shed = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();
    let bench = store.insert_project(&ProjectDraft::new("Workbench")).unwrap();

    {
        let conn = raw_conn(&dir);
        seed_material(&conn, shed.project_id, "birch plank", Some(8), Some(425));
        seed_material(&conn, shed.project_id, "wood screws", None, Some(999));
        seed_material(&conn, bench.project_id, "oak slab", Some(1), None);

        let woodworking = seed_category(&conn, "woodworking");
        let outdoors = seed_category(&conn, "outdoors");
        link_category(&conn, shed.project_id, woodworking);
        link_category(&conn, shed.project_id, outdoors);
        link_category(&conn, bench.project_id, woodworking);
    }

    let project = store.fetch_project(shed.project_id).unwrap().unwrap();
    assert_eq!(project.materials.len(), 2);
    assert!(project
        .materials
        .iter()
        .all(|material| material.project_id == shed.project_id));
    assert_eq!(project.materials[0].material_name, "birch plank");
    assert_eq!(
        project.materials[0].cost,
        Some(Decimal2::parse("4.25").unwrap())
    );
    assert_eq!(project.materials[1].num_required, None);

    let categories: Vec<&str> = project
        .categories
        .iter()
        .map(|category| category.category_name.as_str())
        .collect();
    assert_eq!(categories, ["woodworking", "outdoors"]);

    let bench_project = store.fetch_project(bench.project_id).unwrap().unwrap();
    assert_eq!(bench_project.materials.len(), 1);
    assert_eq!(bench_project.categories.len(), 1);
    assert_eq!(bench_project.categories[0].category_name, "woodworking");
}

#[test]
fn steps_come_back_in_step_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let created = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    {
        let conn = raw_conn(&dir);
        seed_step(&conn, created.project_id, "sand edges", 2);
        seed_step(&conn, created.project_id, "cut boards", 1);
        seed_step(&conn, created.project_id, "assemble", 3);
    }

    let project = store.fetch_project(created.project_id).unwrap().unwrap();
    let texts: Vec<&str> = project
        .steps
        .iter()
        .map(|step| step.step_text.as_str())
        .collect();
    assert_eq!(texts, ["cut boards", "sand edges", "assemble"]);
}

#[test]
fn fetching_a_missing_project_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.fetch_project(404).unwrap().is_none());
}

#[test]
fn child_query_failure_surfaces_instead_of_a_partial_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let created = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    raw_conn(&dir)
        .execute_batch("ALTER TABLE step RENAME COLUMN step_text TO step_body;")
        .unwrap();

    let err = store.fetch_project(created.project_id).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
}

#[test]
fn corrupt_stored_hours_surface_as_a_mapping_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let created = store.insert_project(&ProjectDraft::new("Build shed")).unwrap();

    raw_conn(&dir)
        .execute(
            "UPDATE project SET estimated_hours = 'plenty' WHERE project_id = ?1;",
            [created.project_id],
        )
        .unwrap();

    let err = store.fetch_project(created.project_id).unwrap_err();
    match err {
        StoreError::Mapping(mapping) => {
            assert!(mapping.to_string().contains("estimated_hours"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
