//! Throwaway certificates for tests
//!
//! Generates a key pair and a certificate (self-signed, or signed by another
//! generated certificate acting as CA) and writes both as PEM to temporary
//! files that are removed when the [`TestCertificate`] is dropped.

use crate::constants::{TEST_CERT_COMMON_NAME, TEST_CERT_FILE_PREFIX};
use crate::error_ext::ErrorContext;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose,
};
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use wireup_domain::error::Result;

/// What to put in a generated certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateTemplate {
    /// Subject common name
    pub common_name: String,
    /// Subject alternative names; IP literals become IP entries
    pub subject_alt_names: Vec<String>,
    /// Subject organization
    pub organization: Option<String>,
    /// Whether the certificate may sign other certificates
    pub is_ca: bool,
}

impl Default for CertificateTemplate {
    fn default() -> Self {
        Self {
            common_name: TEST_CERT_COMMON_NAME.to_string(),
            subject_alt_names: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            organization: None,
            is_ca: false,
        }
    }
}

impl CertificateTemplate {
    /// Template for a certificate authority named `common_name`
    pub fn authority(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            subject_alt_names: Vec::new(),
            organization: None,
            is_ca: true,
        }
    }

    fn params(&self) -> Result<CertificateParams> {
        let mut params = CertificateParams::new(self.subject_alt_names.clone())
            .tls_context("Invalid subject alternative name")?;
        params
            .distinguished_name
            .push(DnType::CommonName, self.common_name.as_str());
        if let Some(organization) = &self.organization {
            params
                .distinguished_name
                .push(DnType::OrganizationName, organization.as_str());
        }
        if self.is_ca {
            params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
            params.key_usages = vec![
                KeyUsagePurpose::KeyCertSign,
                KeyUsagePurpose::CrlSign,
                KeyUsagePurpose::DigitalSignature,
            ];
        } else {
            params.key_usages = vec![
                KeyUsagePurpose::DigitalSignature,
                KeyUsagePurpose::KeyEncipherment,
            ];
            params.extended_key_usages = vec![
                ExtendedKeyUsagePurpose::ServerAuth,
                ExtendedKeyUsagePurpose::ClientAuth,
            ];
        }
        Ok(params)
    }
}

/// A generated certificate and its private key
pub struct TestCertificate {
    /// Certificate in PEM form
    pub cert_pem: String,
    /// Private key in PEM (PKCS#8) form
    pub key_pem: String,
    cert_file: NamedTempFile,
    key_file: NamedTempFile,
    certificate: Certificate,
    key_pair: KeyPair,
}

impl TestCertificate {
    /// Path of the temporary certificate file
    pub fn cert_path(&self) -> &Path {
        self.cert_file.path()
    }

    /// Path of the temporary key file
    pub fn key_path(&self) -> &Path {
        self.key_file.path()
    }

    /// DER encoding of the certificate
    pub fn cert_der(&self) -> &[u8] {
        self.certificate.der()
    }

    fn from_parts(certificate: Certificate, key_pair: KeyPair) -> Result<Self> {
        let cert_pem = certificate.pem();
        let key_pem = key_pair.serialize_pem();
        Ok(Self {
            cert_file: write_temp("cert", &cert_pem)?,
            key_file: write_temp("key", &key_pem)?,
            cert_pem,
            key_pem,
            certificate,
            key_pair,
        })
    }
}

impl fmt::Debug for TestCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCertificate")
            .field("cert_path", &self.cert_path())
            .field("key_path", &self.key_path())
            .finish_non_exhaustive()
    }
}

/// Generate a self-signed certificate
pub fn generate(template: &CertificateTemplate) -> Result<TestCertificate> {
    let key_pair = KeyPair::generate().tls_context("Failed to generate key pair")?;
    let certificate = template
        .params()?
        .self_signed(&key_pair)
        .tls_context("Failed to self-sign certificate")?;
    TestCertificate::from_parts(certificate, key_pair)
}

/// Generate a certificate signed by `issuer`
pub fn generate_signed(
    template: &CertificateTemplate,
    issuer: &TestCertificate,
) -> Result<TestCertificate> {
    let key_pair = KeyPair::generate().tls_context("Failed to generate key pair")?;
    let certificate = template
        .params()?
        .signed_by(&key_pair, &issuer.certificate, &issuer.key_pair)
        .tls_context("Failed to sign certificate")?;
    TestCertificate::from_parts(certificate, key_pair)
}

fn write_temp(kind: &str, contents: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{TEST_CERT_FILE_PREFIX}{kind}-"))
        .suffix(".pem")
        .tempfile()
        .io_context("Failed to create temporary PEM file")?;
    file.write_all(contents.as_bytes())
        .io_context("Failed to write temporary PEM file")?;
    file.flush().io_context("Failed to flush temporary PEM file")?;
    Ok(file)
}
