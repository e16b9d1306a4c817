//! TLS helpers for tests

pub mod test_certs;

pub use test_certs::{CertificateTemplate, TestCertificate, generate, generate_signed};
