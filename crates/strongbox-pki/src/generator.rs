//! Certificate issuance: validates parameters, resolves the signing CA
//! and produces PEM-encoded certificate material.

use std::sync::Arc;

use strongbox_core::clock::{Clock, SystemClock};
use strongbox_core::error::{StrongboxError, StrongboxResult};
use strongbox_core::models::certificate::{
    CertificateAuthority, CertificateParameters, IssuedCertificate,
};
use strongbox_core::repository::CertificateAuthorityRepository;
use tracing::{debug, info};

use crate::builder::{
    CertificateBuilder, certificate_to_pem, parse_certificate, parse_private_key,
    private_key_to_pem,
};
use crate::keys::{KeyPairGenerator, RsaKeyPairGenerator};
use crate::serial::{RandomSerialNumberGenerator, SerialNumberGenerator};

/// Issuance engine.
///
/// Generic over the CA repository so it has no dependency on the
/// database crate. Key material, serial numbers and time come from
/// swappable capabilities.
pub struct CertificateGenerator<R: CertificateAuthorityRepository> {
    ca_repo: R,
    key_generator: Arc<dyn KeyPairGenerator>,
    serial_generator: Arc<dyn SerialNumberGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R: CertificateAuthorityRepository> CertificateGenerator<R> {
    pub fn new(
        ca_repo: R,
        key_generator: Arc<dyn KeyPairGenerator>,
        serial_generator: Arc<dyn SerialNumberGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ca_repo,
            key_generator,
            serial_generator,
            clock,
        }
    }

    /// RSA keys, random serials and the system clock.
    pub fn with_defaults(ca_repo: R) -> Self {
        Self::new(
            ca_repo,
            Arc::new(RsaKeyPairGenerator),
            Arc::new(RandomSerialNumberGenerator),
            Arc::new(SystemClock),
        )
    }

    /// Find the current version of the named CA.
    pub async fn resolve_ca(&self, name: &str) -> StrongboxResult<CertificateAuthority> {
        self.ca_repo
            .find_most_recent(name)
            .await?
            .ok_or_else(|| StrongboxError::CaNotFound { name: name.into() })
    }

    /// Issue a certificate according to `params`.
    ///
    /// `self_sign` and `ca_name` are mutually exclusive and one of them
    /// must be set. Validation runs before either is looked at.
    pub async fn generate(
        &self,
        params: &CertificateParameters,
    ) -> StrongboxResult<IssuedCertificate> {
        params.validate()?;

        let ca_name = params.ca_name.as_deref().filter(|n| !n.is_empty());
        match (params.self_sign, ca_name) {
            (true, None) => self.self_signed(params),
            (false, Some(name)) => self.signed_by_ca(name, params).await,
            (true, Some(_)) => Err(StrongboxError::validation("ca_and_self_sign")),
            (false, None) => Err(StrongboxError::validation("missing_signing_ca")),
        }
    }

    /// Issue a self-signed root CA certificate. `ca_name` and `self_sign`
    /// are ignored.
    pub fn generate_root_ca(
        &self,
        params: &CertificateParameters,
    ) -> StrongboxResult<IssuedCertificate> {
        params.validate()?;

        let params = CertificateParameters {
            is_ca: true,
            ..params.clone()
        };
        self.self_signed(&params)
    }

    fn self_signed(&self, params: &CertificateParameters) -> StrongboxResult<IssuedCertificate> {
        info!(
            subject = %params.dn_string(),
            key_length = params.key_length,
            is_ca = params.is_ca,
            "Issuing self-signed certificate"
        );

        let key = self.key_generator.generate(params.key_length)?;
        let serial = self.serial_generator.generate()?;
        let cert = CertificateBuilder::self_signed(&key, params, self.clock.now(), &serial)?;

        Ok(IssuedCertificate {
            public_key_certificate: certificate_to_pem(&cert)?,
            private_key: private_key_to_pem(&key)?,
            ca_certificate: None,
        })
    }

    async fn signed_by_ca(
        &self,
        ca_name: &str,
        params: &CertificateParameters,
    ) -> StrongboxResult<IssuedCertificate> {
        let ca = self.resolve_ca(ca_name).await?;
        debug!(ca = %ca.name, version = %ca.id, "Resolved signing CA");

        let ca_cert = parse_certificate(&ca.certificate)?;
        let ca_key = parse_private_key(&ca.private_key)?;

        info!(
            ca = %ca_name,
            subject = %params.dn_string(),
            key_length = params.key_length,
            "Issuing CA-signed certificate"
        );

        let key = self.key_generator.generate(params.key_length)?;
        let serial = self.serial_generator.generate()?;
        let cert = CertificateBuilder::signed_by_issuer(
            ca_cert.subject_name(),
            &ca_key,
            &key,
            params,
            self.clock.now(),
            &serial,
        )?;

        Ok(IssuedCertificate {
            public_key_certificate: certificate_to_pem(&cert)?,
            private_key: private_key_to_pem(&key)?,
            ca_certificate: Some(ca.certificate),
        })
    }
}
