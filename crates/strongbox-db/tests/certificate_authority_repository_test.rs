//! Integration tests for the CA repository using in-memory SurrealDB.

use strongbox_core::models::certificate::{CaType, CreateCertificateAuthority};
use strongbox_core::repository::CertificateAuthorityRepository;
use strongbox_db::repository::SurrealCertificateAuthorityRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> SurrealCertificateAuthorityRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    strongbox_db::run_migrations(&db).await.unwrap();
    SurrealCertificateAuthorityRepository::new(db)
}

fn ca(name: &str, certificate: &str) -> CreateCertificateAuthority {
    CreateCertificateAuthority {
        name: name.into(),
        ca_type: CaType::Root,
        certificate: certificate.into(),
        private_key: format!("key-for-{certificate}"),
    }
}

#[tokio::test]
async fn create_and_resolve() {
    let repo = setup().await;

    let created = repo.create(ca("/cas/root", "cert-1")).await.unwrap();
    assert_eq!(created.ca_type, CaType::Root);

    let found = repo.find_most_recent("/cas/root").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.certificate, "cert-1");
    assert_eq!(found.private_key, "key-for-cert-1");
}

#[tokio::test]
async fn resolves_most_recent_version() {
    let repo = setup().await;

    repo.create(ca("/cas/root", "cert-1")).await.unwrap();
    let second = repo.create(ca("/cas/root", "cert-2")).await.unwrap();
    repo.create(ca("/cas/other", "cert-3")).await.unwrap();

    let found = repo.find_most_recent("/cas/root").await.unwrap().unwrap();
    assert_eq!(found.id, second.id);
    assert_eq!(found.certificate, "cert-2");
}

#[tokio::test]
async fn unknown_name_yields_none() {
    let repo = setup().await;
    assert!(repo.find_most_recent("/cas/none").await.unwrap().is_none());
}
