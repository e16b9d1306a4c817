//! Configuration source
//!
//! [`ConfigSource`] wraps a merged [`Figment`] and exposes the two decode
//! operations the unmarshal providers rely on: decoding the whole source and
//! decoding the value stored under one key.

use super::decode::{DecodeOptions, decode_into};
use figment::Figment;
use figment::providers::{Format, Toml};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wireup_domain::error::Result;

/// A loaded, immutable configuration source
#[derive(Debug, Clone)]
pub struct ConfigSource {
    figment: Figment,
}

impl ConfigSource {
    /// Wrap an existing figment
    pub fn new(figment: Figment) -> Self {
        Self { figment }
    }

    /// Build a source from an inline TOML document
    pub fn from_toml_str(document: &str) -> Self {
        Self::new(Figment::from(Toml::string(document)))
    }

    /// Underlying figment
    pub fn figment(&self) -> &Figment {
        &self.figment
    }

    /// Whether a value exists at the dotted `key`
    pub fn contains(&self, key: &str) -> bool {
        self.figment.contains(key)
    }

    /// Decode the whole source onto `destination`
    ///
    /// Fields the source does not mention keep their current value unless
    /// the options ask for a zeroed destination.
    pub fn unmarshal<T>(&self, destination: &mut T, options: &DecodeOptions) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        decode_into(&self.figment, None, destination, &options.config())
    }

    /// Decode the value stored under the dotted `key` onto `destination`
    pub fn unmarshal_key<T>(
        &self,
        key: &str,
        destination: &mut T,
        options: &DecodeOptions,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        decode_into(&self.figment, Some(key), destination, &options.config())
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self::new(Figment::new())
    }
}

impl From<Figment> for ConfigSource {
    fn from(figment: Figment) -> Self {
        Self::new(figment)
    }
}
