//! Request-body translators, one per secret type and verb.
//!
//! Each translator declares the key paths it accepts; [`RequestTranslator::translate`]
//! rejects anything else before the body is interpreted.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strongbox_core::error::{StrongboxError, StrongboxResult};
use strongbox_core::models::certificate::CertificateParameters;
use strongbox_core::models::secret::SecretValue;

use crate::error::ApiError;
use crate::password::PasswordParameters;
use crate::schema::{allow_set, validate_keys};

const CERTIFICATE_PARAMETER_KEYS: &[&str] = &[
    "$['parameters']",
    "$['parameters']['common_name']",
    "$['parameters']['organization']",
    "$['parameters']['organization_unit']",
    "$['parameters']['locality']",
    "$['parameters']['state']",
    "$['parameters']['country']",
    "$['parameters']['alternative_names']",
    "$['parameters']['key_length']",
    "$['parameters']['duration']",
];

pub trait RequestTranslator {
    type Output;

    /// Every key path this translator accepts.
    fn valid_keys(&self) -> BTreeSet<String>;

    /// Interpret an already-validated body.
    fn populate(&self, body: &Value) -> StrongboxResult<Self::Output>;

    fn translate(&self, body: &Value) -> StrongboxResult<Self::Output> {
        validate_keys(body, &self.valid_keys())?;
        self.populate(body)
    }
}

/// The body of a request that requires one.
pub fn require_body(body: Option<&Value>) -> StrongboxResult<&Value> {
    match body {
        Some(Value::Null) | None => Err(ApiError::MissingBody.into()),
        Some(body) => Ok(body),
    }
}

/// The `type` discriminator of a body.
pub fn requested_type(body: &Value) -> StrongboxResult<&str> {
    body.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::InvalidType(String::new()).into())
}

fn decode<T: DeserializeOwned>(value: &Value) -> StrongboxResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| ApiError::MalformedBody(e.to_string()).into())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `{"type": "value"|"password", "credential": "…"}`
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSetTranslator;

impl RequestTranslator for StringSetTranslator {
    type Output = String;

    fn valid_keys(&self) -> BTreeSet<String> {
        allow_set(&["$['type']", "$['credential']"])
    }

    fn populate(&self, body: &Value) -> StrongboxResult<String> {
        let credential: Option<String> = match body.get("credential") {
            Some(value) => decode(value)?,
            None => None,
        };
        non_empty(credential).ok_or_else(|| ApiError::MissingCredential("credential").into())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CertificateCredential {
    ca: Option<String>,
    certificate: Option<String>,
    private: Option<String>,
}

/// `{"type": "certificate", "credential": {"ca", "certificate", "private"}}`
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateSetTranslator;

impl RequestTranslator for CertificateSetTranslator {
    type Output = SecretValue;

    fn valid_keys(&self) -> BTreeSet<String> {
        allow_set(&[
            "$['type']",
            "$['credential']",
            "$['credential']['ca']",
            "$['credential']['certificate']",
            "$['credential']['private']",
        ])
    }

    fn populate(&self, body: &Value) -> StrongboxResult<SecretValue> {
        let credential: CertificateCredential = match body.get("credential") {
            Some(value) => decode(value)?,
            None => CertificateCredential::default(),
        };
        let ca = non_empty(credential.ca);
        let certificate = non_empty(credential.certificate);
        let private_key = non_empty(credential.private);
        if ca.is_none() && certificate.is_none() && private_key.is_none() {
            return Err(ApiError::MissingCredential("credential").into());
        }
        Ok(SecretValue::Certificate {
            ca,
            certificate,
            private_key,
        })
    }
}

/// `{"type": "value"|"password", "parameters": {length, exclude_*}}`
#[derive(Debug, Clone, Copy, Default)]
pub struct StringGenerateTranslator;

impl RequestTranslator for StringGenerateTranslator {
    type Output = PasswordParameters;

    fn valid_keys(&self) -> BTreeSet<String> {
        allow_set(&[
            "$['type']",
            "$['parameters']",
            "$['parameters']['length']",
            "$['parameters']['exclude_upper']",
            "$['parameters']['exclude_lower']",
            "$['parameters']['exclude_special']",
            "$['parameters']['exclude_number']",
        ])
    }

    fn populate(&self, body: &Value) -> StrongboxResult<PasswordParameters> {
        match body.get("parameters") {
            Some(parameters) => decode(parameters),
            None => Ok(PasswordParameters::default()),
        }
    }
}

/// Certificate parameters under `parameters`. Secret requests may also
/// name a signing CA or ask for self-signing; CA requests may not.
#[derive(Debug, Clone, Copy)]
pub struct CertificateGenerateTranslator {
    signing_fields: bool,
}

impl CertificateGenerateTranslator {
    /// For `POST /api/v1/data/…` with `type: certificate`.
    pub fn for_secret() -> Self {
        Self {
            signing_fields: true,
        }
    }

    /// For `POST /api/v1/ca/…` with `type: root`.
    pub fn for_root_ca() -> Self {
        Self {
            signing_fields: false,
        }
    }
}

impl RequestTranslator for CertificateGenerateTranslator {
    type Output = CertificateParameters;

    fn valid_keys(&self) -> BTreeSet<String> {
        let mut keys = allow_set(CERTIFICATE_PARAMETER_KEYS);
        keys.insert("$['type']".into());
        if self.signing_fields {
            keys.insert("$['parameters']['ca']".into());
            keys.insert("$['parameters']['self_sign']".into());
        }
        keys
    }

    fn populate(&self, body: &Value) -> StrongboxResult<CertificateParameters> {
        let parameters = body
            .get("parameters")
            .ok_or(StrongboxError::MissingCertificateParameters)?;
        decode(parameters)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaCredential {
    certificate: Option<String>,
    private: Option<String>,
}

/// `{"type": "root", "ca": {"certificate", "private"}}`; yields the
/// certificate and private key PEMs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaSetTranslator;

impl RequestTranslator for CaSetTranslator {
    type Output = (String, String);

    fn valid_keys(&self) -> BTreeSet<String> {
        allow_set(&[
            "$['type']",
            "$['ca']",
            "$['ca']['certificate']",
            "$['ca']['private']",
        ])
    }

    fn populate(&self, body: &Value) -> StrongboxResult<(String, String)> {
        let ca: CaCredential = match body.get("ca") {
            Some(value) => decode(value)?,
            None => CaCredential::default(),
        };
        let certificate =
            non_empty(ca.certificate).ok_or(ApiError::MissingCredential("ca.certificate"))?;
        let private_key = non_empty(ca.private).ok_or(ApiError::MissingCredential("ca.private"))?;
        Ok((certificate, private_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_set_reads_credential() {
        let body = json!({"type": "value", "credential": "s3cret"});
        assert_eq!(StringSetTranslator.translate(&body).unwrap(), "s3cret");
    }

    #[test]
    fn string_set_requires_credential() {
        let err = StringSetTranslator
            .translate(&json!({"type": "password"}))
            .unwrap_err();
        assert_eq!(err.code(), "error.missing_credential");

        let err = StringSetTranslator
            .translate(&json!({"type": "password", "credential": ""}))
            .unwrap_err();
        assert_eq!(err.code(), "error.missing_credential");
    }

    #[test]
    fn string_set_rejects_unknown_keys() {
        let body = json!({"type": "value", "credential": "x", "overwrite": true});
        assert!(matches!(
            StringSetTranslator.translate(&body),
            Err(StrongboxError::InvalidJsonKey { path }) if path == "$['overwrite']"
        ));
    }

    #[test]
    fn certificate_set_maps_private_to_private_key() {
        let body = json!({
            "type": "certificate",
            "credential": {"ca": "ca-pem", "certificate": "cert-pem", "private": "key-pem"}
        });
        assert_eq!(
            CertificateSetTranslator.translate(&body).unwrap(),
            SecretValue::Certificate {
                ca: Some("ca-pem".into()),
                certificate: Some("cert-pem".into()),
                private_key: Some("key-pem".into()),
            }
        );
    }

    #[test]
    fn certificate_set_rejects_unknown_nested_key() {
        let body = json!({"type": "certificate", "credential": {"public": "x"}});
        assert!(matches!(
            CertificateSetTranslator.translate(&body),
            Err(StrongboxError::InvalidJsonKey { path }) if path == "$['credential']['public']"
        ));
    }

    #[test]
    fn string_generate_defaults_without_parameters() {
        let params = StringGenerateTranslator
            .translate(&json!({"type": "value"}))
            .unwrap();
        assert_eq!(params, PasswordParameters::default());
    }

    #[test]
    fn string_generate_reads_parameters() {
        let body = json!({
            "type": "password",
            "parameters": {"length": 30, "exclude_special": true}
        });
        let params = StringGenerateTranslator.translate(&body).unwrap();
        assert_eq!(params.length, Some(30));
        assert!(params.exclude_special);
        assert!(!params.exclude_upper);
    }

    #[test]
    fn certificate_generate_reads_wire_names() {
        let body = json!({
            "type": "certificate",
            "parameters": {
                "common_name": "my.host",
                "alternative_names": ["a.my.host", "10.1.1.1"],
                "key_length": 3072,
                "duration": 30,
                "ca": "my-root"
            }
        });
        let params = CertificateGenerateTranslator::for_secret()
            .translate(&body)
            .unwrap();
        assert_eq!(params.common_name.as_deref(), Some("my.host"));
        assert_eq!(params.alternative_names, vec!["a.my.host", "10.1.1.1"]);
        assert_eq!(params.key_length, 3072);
        assert_eq!(params.duration_days, 30);
        assert_eq!(params.ca_name.as_deref(), Some("my-root"));
        assert!(!params.self_sign);
    }

    #[test]
    fn root_ca_generation_does_not_accept_signing_fields() {
        let body = json!({"type": "root", "parameters": {"common_name": "x", "self_sign": true}});
        assert!(matches!(
            CertificateGenerateTranslator::for_root_ca().translate(&body),
            Err(StrongboxError::InvalidJsonKey { path }) if path == "$['parameters']['self_sign']"
        ));
    }

    #[test]
    fn certificate_generate_requires_parameters() {
        assert!(matches!(
            CertificateGenerateTranslator::for_secret().translate(&json!({"type": "certificate"})),
            Err(StrongboxError::MissingCertificateParameters)
        ));
    }

    #[test]
    fn ca_set_requires_both_halves() {
        let body = json!({"type": "root", "ca": {"certificate": "my_cert", "private": "private_key"}});
        assert_eq!(
            CaSetTranslator.translate(&body).unwrap(),
            ("my_cert".to_string(), "private_key".to_string())
        );

        let err = CaSetTranslator
            .translate(&json!({"type": "root", "ca": {"certificate": "my_cert"}}))
            .unwrap_err();
        assert_eq!(err.code(), "error.missing_credential");
    }

    #[test]
    fn type_and_body_helpers() {
        assert!(matches!(
            require_body(None),
            Err(StrongboxError::Validation { code }) if code == "missing_body"
        ));
        assert!(require_body(Some(&Value::Null)).is_err());
        assert_eq!(requested_type(&json!({"type": "root"})).unwrap(), "root");
        assert!(matches!(
            requested_type(&json!({"credential": "x"})),
            Err(StrongboxError::Validation { code }) if code == "invalid_type"
        ));
    }
}
