//! X.509v3 certificate assembly and signing.
//!
//! Certificates carry:
//! - **Subject**: `O`, `ST`, `C`, `CN`, `OU`, `L` from the parameters, in
//!   that order
//! - **Validity**: `[now, now + duration_days]`
//! - **Basic Constraints**: critical; CA=true only for CA certificates
//! - **Key Usage**: keyCertSign, cRLSign, digitalSignature on CAs
//! - **Subject Alternative Name**: the alternative names, in order
//! - **Signature**: SHA-256 with RSA

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use openssl::asn1::{Asn1Time, Asn1Type};
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, PKeyRef, Private};
use openssl::x509::extension::{BasicConstraints, KeyUsage, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509Name, X509NameRef, X509Ref};
use sha2::{Digest, Sha256};
use strongbox_core::models::certificate::CertificateParameters;

use crate::error::PkiError;

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2

fn nid_for(label: &str) -> Nid {
    match label {
        "O" => Nid::ORGANIZATIONNAME,
        "ST" => Nid::STATEORPROVINCENAME,
        "C" => Nid::COUNTRYNAME,
        "CN" => Nid::COMMONNAME,
        "OU" => Nid::ORGANIZATIONALUNITNAME,
        _ => Nid::LOCALITYNAME,
    }
}

/// Build the X.509 subject name from the parameters' DN components.
///
/// Values are stored as UTF8String, so free-form country values are
/// accepted as-is.
pub fn subject_name(params: &CertificateParameters) -> Result<X509Name, PkiError> {
    let mut name = X509Name::builder()?;
    for (label, value) in params.dn_components() {
        name.append_entry_by_nid_with_type(nid_for(label), value, Asn1Type::UTF8STRING)?;
    }
    Ok(name.build())
}

/// Render a name as `O=…,ST=…` using the short names of its entries, in
/// encoded order.
pub fn dn_string_of(name: &X509NameRef) -> Result<String, PkiError> {
    let mut parts = Vec::new();
    for entry in name.entries() {
        let label = entry.object().nid().short_name()?;
        let value = entry.data().to_string()?;
        parts.push(format!("{label}={value}"));
    }
    Ok(parts.join(","))
}

/// Builds self-signed and issuer-signed certificates.
pub struct CertificateBuilder;

impl CertificateBuilder {
    /// A certificate whose issuer and subject are both the parameters' DN,
    /// signed with its own key. `params.is_ca` selects a CA certificate
    /// over an end-entity one.
    pub fn self_signed(
        key: &PKeyRef<Private>,
        params: &CertificateParameters,
        now: DateTime<Utc>,
        serial: &BigNum,
    ) -> Result<X509, PkiError> {
        let name = subject_name(params)?;
        let mut builder = Self::base(&name, &name, key, params, now, serial, params.is_ca)?;
        builder.sign(key, MessageDigest::sha256())?;
        Ok(builder.build())
    }

    /// An end-entity certificate for `key`, issued and signed by the CA
    /// identified by `issuer_name` and `issuer_key`.
    pub fn signed_by_issuer(
        issuer_name: &X509NameRef,
        issuer_key: &PKeyRef<Private>,
        key: &PKeyRef<Private>,
        params: &CertificateParameters,
        now: DateTime<Utc>,
        serial: &BigNum,
    ) -> Result<X509, PkiError> {
        let subject = subject_name(params)?;
        let mut builder = Self::base(issuer_name, &subject, key, params, now, serial, false)?;
        builder.sign(issuer_key, MessageDigest::sha256())?;
        Ok(builder.build())
    }

    fn base(
        issuer: &X509NameRef,
        subject: &X509NameRef,
        key: &PKeyRef<Private>,
        params: &CertificateParameters,
        now: DateTime<Utc>,
        serial: &BigNum,
        is_ca: bool,
    ) -> Result<X509Builder, PkiError> {
        let mut builder = X509::builder()?;
        builder.set_version(X509_VERSION_3)?;
        let serial = serial.to_asn1_integer()?;
        builder.set_serial_number(&serial)?;
        builder.set_issuer_name(issuer)?;
        builder.set_subject_name(subject)?;

        let not_after = now
            .checked_add_signed(Duration::days(i64::from(params.duration_days)))
            .ok_or(PkiError::Validity(params.duration_days))?;
        let not_before = Asn1Time::from_unix(now.timestamp() as _)?;
        let not_after = Asn1Time::from_unix(not_after.timestamp() as _)?;
        builder.set_not_before(&not_before)?;
        builder.set_not_after(&not_after)?;

        builder.set_pubkey(key)?;

        let mut bc = BasicConstraints::new();
        bc.critical();
        if is_ca {
            bc.ca();
        }
        builder.append_extension(bc.build()?)?;

        if is_ca {
            let mut ku = KeyUsage::new();
            ku.critical();
            ku.key_cert_sign();
            ku.crl_sign();
            ku.digital_signature();
            builder.append_extension(ku.build()?)?;
        }

        if !params.alternative_names.is_empty() {
            let mut san = SubjectAlternativeName::new();
            for alt in &params.alternative_names {
                if alt.parse::<IpAddr>().is_ok() {
                    san.ip(alt);
                } else {
                    san.dns(alt);
                }
            }
            let extension = {
                let ctx = builder.x509v3_context(None, None);
                san.build(&ctx)?
            };
            builder.append_extension(extension)?;
        }

        Ok(builder)
    }
}

// ---------------------------------------------------------------------------
// PEM helpers
// ---------------------------------------------------------------------------

pub fn certificate_to_pem(cert: &X509Ref) -> Result<String, PkiError> {
    String::from_utf8(cert.to_pem()?).map_err(|e| PkiError::InvalidPem(e.to_string()))
}

/// PKCS#8 PEM of a private key.
pub fn private_key_to_pem(key: &PKeyRef<Private>) -> Result<String, PkiError> {
    String::from_utf8(key.private_key_to_pem_pkcs8()?)
        .map_err(|e| PkiError::InvalidPem(e.to_string()))
}

pub fn parse_certificate(pem: &str) -> Result<X509, PkiError> {
    X509::from_pem(pem.as_bytes()).map_err(|e| PkiError::InvalidPem(format!("certificate: {e}")))
}

pub fn parse_private_key(pem: &str) -> Result<PKey<Private>, PkiError> {
    PKey::private_key_from_pem(pem.as_bytes())
        .map_err(|e| PkiError::InvalidPem(format!("private key: {e}")))
}

/// SHA-256 fingerprint of the certificate's DER encoding, hex-encoded.
pub fn fingerprint(cert: &X509Ref) -> Result<String, PkiError> {
    let der = cert.to_der()?;
    Ok(hex::encode(Sha256::digest(&der)))
}

/// Identifying facts about a stored certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub fingerprint: String,
    /// OpenSSL's rendering of `notAfter`.
    pub not_after: String,
}

/// Parse a PEM certificate and extract its [`CertificateSummary`].
pub fn summarize(pem: &str) -> Result<CertificateSummary, PkiError> {
    let cert = parse_certificate(pem)?;
    Ok(CertificateSummary {
        subject: dn_string_of(cert.subject_name())?,
        issuer: dn_string_of(cert.issuer_name())?,
        fingerprint: fingerprint(&cert)?,
        not_after: cert.not_after().to_string(),
    })
}
