//! Strongbox server: application entry point.
//!
//! Requests arrive as one JSON object per line on stdin
//! (`{"verb": "PUT", "path": "/api/v1/data/foo", "body": {…}, "actor": "…"}`)
//! and each response is written as one JSON line on stdout. Logs go to
//! stderr.

use std::env;
use std::error::Error;

use strongbox_api::{CredentialService, InboundRequest, ServiceConfig};
use strongbox_core::ErrorBody;
use strongbox_db::repository::{
    SurrealAuditRecordRepository, SurrealCertificateAuthorityRepository, SurrealSecretRepository,
};
use strongbox_db::{DbConfig, DbManager};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Service settings from `STRONGBOX_PASSWORD_LENGTH` and
/// `STRONGBOX_ANONYMOUS_ACTOR`.
fn service_config_from_env() -> ServiceConfig {
    let defaults = ServiceConfig::default();
    let default_password_length = match env::var("STRONGBOX_PASSWORD_LENGTH") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = %raw, "Ignoring unparseable STRONGBOX_PASSWORD_LENGTH");
            defaults.default_password_length
        }),
        Err(_) => defaults.default_password_length,
    };
    ServiceConfig {
        default_password_length,
        anonymous_actor: env::var("STRONGBOX_ANONYMOUS_ACTOR").ok(),
    }
}

fn render(result: Result<String, ErrorBody>) -> String {
    result.unwrap_or_else(|error| {
        serde_json::to_string(&error)
            .unwrap_or_else(|_| r#"{"error":"error.internal"}"#.to_string())
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("strongbox=info".parse()?))
        .json()
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Strongbox server");

    let db_config = DbConfig::from_env();
    let manager = DbManager::connect(&db_config).await?;
    let db = manager.client();

    let service = CredentialService::new(
        SurrealSecretRepository::new(db.clone()),
        SurrealCertificateAuthorityRepository::new(db.clone()),
        SurrealAuditRecordRepository::new(db),
        service_config_from_env(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<InboundRequest>(&line) {
            Ok(request) => match service.handle(request).await {
                Ok(body) => serde_json::to_string(&body).map_err(|e| {
                    warn!(error = %e, "Could not encode response");
                    ErrorBody {
                        error: "error.internal".into(),
                        parameter: None,
                    }
                }),
                Err(e) => Err(ErrorBody::from(&e)),
            },
            Err(e) => {
                warn!(error = %e, "Unparseable request line");
                Err(ErrorBody {
                    error: "error.bad_request".into(),
                    parameter: None,
                })
            }
        };

        stdout.write_all(render(result).as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("Strongbox server stopped");
    Ok(())
}
