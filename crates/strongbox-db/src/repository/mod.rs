//! SurrealDB repository implementations.

mod audit;
mod certificate_authority;
mod secret;

pub use audit::SurrealAuditRecordRepository;
pub use certificate_authority::SurrealCertificateAuthorityRepository;
pub use secret::SurrealSecretRepository;
