//! Schema initialization against an in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn migrations_define_all_tables() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    strongbox_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = format!("{:?}", info.expect("INFO FOR DB returns a value"));

    for table in [
        "secret",
        "certificate_authority",
        "operation_audit_record",
        "_migration",
    ] {
        assert!(info.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    strongbox_db::run_migrations(&db).await.unwrap();
    strongbox_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len() as u32, strongbox_db::latest_version());
}

#[tokio::test]
async fn secret_type_is_constrained() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    strongbox_db::run_migrations(&db).await.unwrap();

    let rejected = match db
        .query("CREATE secret SET name = 'x', secret_type = 'ssh'")
        .await
    {
        Ok(response) => response.check().is_err(),
        Err(_) => true,
    };
    assert!(rejected, "unknown secret_type accepted");
}

#[tokio::test]
async fn audit_outcome_is_constrained() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    strongbox_db::run_migrations(&db).await.unwrap();

    let rejected = match db
        .query(
            "CREATE operation_audit_record SET path = '/api/v1/data/x', \
             operation = 'credential_access', outcome = 'Maybe', \
             timestamp = time::now()",
        )
        .await
    {
        Ok(response) => response.check().is_err(),
        Err(_) => true,
    };
    assert!(rejected, "unknown outcome accepted");
}
