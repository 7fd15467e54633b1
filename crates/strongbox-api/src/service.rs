//! Credential service: routes inbound requests through the audited
//! boundary to the secret and CA handlers.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use strongbox_core::clock::{Clock, SystemClock};
use strongbox_core::error::{StrongboxError, StrongboxResult};
use strongbox_core::models::certificate::{CaType, CreateCertificateAuthority};
use strongbox_core::models::secret::{CreateSecret, SecretValue};
use strongbox_core::repository::{
    AuditRecordRepository, CertificateAuthorityRepository, SecretRepository,
};
use strongbox_pki::CertificateGenerator;
use tracing::{debug, info};

use crate::audit::{AuditContext, AuditCorrelator};
use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::password;
use crate::route::{Action, Route, Verb};
use crate::translator::{
    CaSetTranslator, CertificateGenerateTranslator, CertificateSetTranslator, RequestTranslator,
    StringGenerateTranslator, StringSetTranslator, require_body, requested_type,
};
use crate::views::{CertificateAuthorityView, DeletedView, ResponseBody, SecretView};

/// A request as handed over by the transport.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundRequest {
    pub verb: Verb,
    pub path: String,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub actor: Option<String>,
}

impl InboundRequest {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            body: None,
            actor: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Credential service.
///
/// Generic over repository implementations so that this layer has no
/// dependency on the database crate.
pub struct CredentialService<S, C, A>
where
    S: SecretRepository,
    C: CertificateAuthorityRepository + Clone,
    A: AuditRecordRepository,
{
    secrets: S,
    authorities: C,
    generator: CertificateGenerator<C>,
    correlator: AuditCorrelator<A>,
    config: ServiceConfig,
}

impl<S, C, A> CredentialService<S, C, A>
where
    S: SecretRepository,
    C: CertificateAuthorityRepository + Clone,
    A: AuditRecordRepository,
{
    /// RSA keys, random serials and the system clock.
    pub fn new(secrets: S, authorities: C, audit: A, config: ServiceConfig) -> Self {
        let generator = CertificateGenerator::with_defaults(authorities.clone());
        Self::with_generator(
            secrets,
            authorities,
            audit,
            generator,
            Arc::new(SystemClock),
            config,
        )
    }

    /// Use a preconfigured issuance engine and audit clock.
    pub fn with_generator(
        secrets: S,
        authorities: C,
        audit: A,
        generator: CertificateGenerator<C>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            secrets,
            authorities,
            generator,
            correlator: AuditCorrelator::new(audit, clock),
            config,
        }
    }

    /// Route, handle and audit one request.
    ///
    /// Requests that cannot be routed fail before the audited boundary
    /// and leave no audit record.
    pub async fn handle(&self, request: InboundRequest) -> StrongboxResult<ResponseBody> {
        let route = Route::parse(request.verb, &request.path)?;
        debug!(
            verb = %request.verb,
            path = %request.path,
            action = ?route.action,
            "Routed request"
        );

        let context = AuditContext {
            path: request.path,
            operation: route.operation(),
            actor: request.actor.or_else(|| self.config.anonymous_actor.clone()),
        };
        let body = request.body;
        self.correlator
            .record(context, self.dispatch(&route, body.as_ref()))
            .await
    }

    async fn dispatch(
        &self,
        route: &Route,
        body: Option<&Value>,
    ) -> StrongboxResult<ResponseBody> {
        let name = route.name.as_str();
        match route.action {
            Action::StoreSecret => self
                .store_secret(name, require_body(body)?)
                .await
                .map(ResponseBody::Secret),
            Action::GenerateSecret => self
                .generate_secret(name, require_body(body)?)
                .await
                .map(ResponseBody::Secret),
            Action::GetSecret => self.get_secret(name).await.map(ResponseBody::Secret),
            Action::DeleteSecret => self.delete_secret(name).await.map(ResponseBody::Deleted),
            Action::StoreCa => self
                .store_ca(name, require_body(body)?)
                .await
                .map(ResponseBody::CertificateAuthority),
            Action::GenerateCa => self
                .generate_ca(name, require_body(body)?)
                .await
                .map(ResponseBody::CertificateAuthority),
            Action::GetCa => self.get_ca(name).await.map(ResponseBody::CertificateAuthority),
        }
    }

    // -----------------------------------------------------------------
    // Secrets
    // -----------------------------------------------------------------

    async fn store_secret(&self, name: &str, body: &Value) -> StrongboxResult<SecretView> {
        let value = match requested_type(body)? {
            "value" => SecretValue::Value(StringSetTranslator.translate(body)?),
            "password" => SecretValue::Password(StringSetTranslator.translate(body)?),
            "certificate" => CertificateSetTranslator.translate(body)?,
            other => return Err(ApiError::InvalidType(other.into()).into()),
        };
        self.put_secret(name, value).await
    }

    async fn generate_secret(&self, name: &str, body: &Value) -> StrongboxResult<SecretView> {
        let length = self.config.effective_password_length();
        let value = match requested_type(body)? {
            "value" => {
                let params = StringGenerateTranslator.translate(body)?;
                SecretValue::Value(password::generate(&params, length)?)
            }
            "password" => {
                let params = StringGenerateTranslator.translate(body)?;
                SecretValue::Password(password::generate(&params, length)?)
            }
            "certificate" => {
                let params = CertificateGenerateTranslator::for_secret().translate(body)?;
                SecretValue::from(self.generator.generate(&params).await?)
            }
            other => return Err(ApiError::InvalidType(other.into()).into()),
        };
        self.put_secret(name, value).await
    }

    async fn put_secret(&self, name: &str, value: SecretValue) -> StrongboxResult<SecretView> {
        let secret_type = value.secret_type();
        let stored = self
            .secrets
            .create(CreateSecret {
                name: name.into(),
                value,
            })
            .await?;
        info!(
            name,
            secret_type = secret_type.as_str(),
            id = %stored.id,
            "Secret version stored"
        );
        Ok(stored.into())
    }

    async fn get_secret(&self, name: &str) -> StrongboxResult<SecretView> {
        self.secrets
            .find_most_recent(name)
            .await?
            .map(SecretView::from)
            .ok_or_else(|| StrongboxError::NotFound {
                entity: "secret".into(),
                id: name.into(),
            })
    }

    async fn delete_secret(&self, name: &str) -> StrongboxResult<DeletedView> {
        let versions = self.secrets.delete_all(name).await?;
        if versions == 0 {
            return Err(StrongboxError::NotFound {
                entity: "secret".into(),
                id: name.into(),
            });
        }
        info!(name, versions, "Secret deleted");
        Ok(DeletedView {
            name: name.into(),
            versions,
        })
    }

    // -----------------------------------------------------------------
    // Certificate authorities
    // -----------------------------------------------------------------

    fn require_root(body: &Value) -> StrongboxResult<CaType> {
        let requested = requested_type(body)?;
        CaType::parse(requested).ok_or_else(|| ApiError::InvalidType(requested.into()).into())
    }

    async fn store_ca(
        &self,
        name: &str,
        body: &Value,
    ) -> StrongboxResult<CertificateAuthorityView> {
        let ca_type = Self::require_root(body)?;
        let (certificate, private_key) = CaSetTranslator.translate(body)?;
        self.put_ca(name, ca_type, certificate, private_key).await
    }

    async fn generate_ca(
        &self,
        name: &str,
        body: &Value,
    ) -> StrongboxResult<CertificateAuthorityView> {
        let ca_type = Self::require_root(body)?;
        let params = CertificateGenerateTranslator::for_root_ca().translate(body)?;
        let issued = self.generator.generate_root_ca(&params)?;
        self.put_ca(name, ca_type, issued.public_key_certificate, issued.private_key)
            .await
    }

    async fn put_ca(
        &self,
        name: &str,
        ca_type: CaType,
        certificate: String,
        private_key: String,
    ) -> StrongboxResult<CertificateAuthorityView> {
        let stored = self
            .authorities
            .create(CreateCertificateAuthority {
                name: name.into(),
                ca_type,
                certificate,
                private_key,
            })
            .await?;
        info!(name, id = %stored.id, "CA version stored");
        Ok(stored.into())
    }

    async fn get_ca(&self, name: &str) -> StrongboxResult<CertificateAuthorityView> {
        self.authorities
            .find_most_recent(name)
            .await?
            .map(CertificateAuthorityView::from)
            .ok_or_else(|| StrongboxError::NotFound {
                entity: "certificate_authority".into(),
                id: name.into(),
            })
    }
}
