//! Decode options
//!
//! A [`DecodeOption`] adjusts one decode call. Options are collected into a
//! [`DecodeOptions`] list and applied in order, so when two options touch the
//! same setting the later one wins. A container-wide list (registered as an
//! optional dependency) is applied before the list given at the call site.

use figment::providers::Serialized;
use figment::value::Value;
use figment::{Figment, Profile};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use wireup_domain::error::{Error, Result};

/// Rewrites the raw value tree before it is deserialized
pub type DecodeHook = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Effective settings for one decode call
#[derive(Clone, Default)]
pub struct DecodeConfig {
    /// Fail when the source holds keys the destination does not consume
    pub error_unused: bool,
    /// Fail when destination fields are not set by the source
    pub error_unset: bool,
    /// Decode onto an empty destination instead of onto its current values
    pub zero_fields: bool,
    /// Figment profile to select before extracting
    pub profile: Option<Profile>,
    /// Hooks run in order over the raw value tree
    pub hooks: Vec<DecodeHook>,
}

impl fmt::Debug for DecodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeConfig")
            .field("error_unused", &self.error_unused)
            .field("error_unset", &self.error_unset)
            .field("zero_fields", &self.zero_fields)
            .field("profile", &self.profile)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// A single adjustment to a [`DecodeConfig`]
#[derive(Clone)]
pub struct DecodeOption(Arc<dyn Fn(&mut DecodeConfig) + Send + Sync>);

impl DecodeOption {
    /// Build an option from an arbitrary adjustment
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(&mut DecodeConfig) + Send + Sync + 'static,
    {
        Self(Arc::new(apply))
    }

    /// Reject source keys that no destination field consumes
    pub fn error_unused() -> Self {
        Self::new(|config| config.error_unused = true)
    }

    /// Reject destination fields the source leaves unset
    pub fn error_unset() -> Self {
        Self::new(|config| config.error_unset = true)
    }

    /// Start from an empty destination instead of the prototype values
    pub fn zero_fields() -> Self {
        Self::new(|config| config.zero_fields = true)
    }

    /// Extract from the given figment profile
    pub fn profile(profile: impl Into<String>) -> Self {
        let profile = Profile::new(&profile.into());
        Self::new(move |config| config.profile = Some(profile.clone()))
    }

    /// Append a hook that rewrites the raw value tree
    pub fn hook<F>(hook: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        let hook: DecodeHook = Arc::new(hook);
        Self::new(move |config| config.hooks.push(Arc::clone(&hook)))
    }

    /// Apply this option to `config`
    pub fn apply(&self, config: &mut DecodeConfig) {
        (self.0)(config)
    }
}

impl fmt::Debug for DecodeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecodeOption(..)")
    }
}

/// Ordered list of decode options
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions(Vec<DecodeOption>);

impl DecodeOptions {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option
    pub fn with(mut self, option: DecodeOption) -> Self {
        self.0.push(option);
        self
    }

    /// Append an option in place
    pub fn push(&mut self, option: DecodeOption) {
        self.0.push(option);
    }

    /// Container-wide options first, then call-site options
    pub fn merge(global: Option<&DecodeOptions>, local: &DecodeOptions) -> DecodeOptions {
        let mut merged = global.cloned().unwrap_or_default();
        merged.0.extend(local.0.iter().cloned());
        merged
    }

    /// Fold every option, in order, into an effective configuration
    pub fn config(&self) -> DecodeConfig {
        let mut config = DecodeConfig::default();
        for option in &self.0 {
            option.apply(&mut config);
        }
        config
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DecodeOption> for DecodeOptions {
    fn from_iter<I: IntoIterator<Item = DecodeOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<DecodeOption> for DecodeOptions {
    fn from(option: DecodeOption) -> Self {
        Self(vec![option])
    }
}

/// Decode the value at `key` (or the whole source) onto `destination`
///
/// The destination's current values act as defaults unless `zero_fields` is
/// set. The destination is only replaced once decoding fully succeeds.
pub(crate) fn decode_into<T>(
    source: &Figment,
    key: Option<&str>,
    destination: &mut T,
    config: &DecodeConfig,
) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let mut figment = Figment::new();
    if !config.zero_fields {
        figment = match key {
            Some(key) => figment.merge(Serialized::default(key, &*destination)),
            None => figment.merge(Serialized::defaults(&*destination)),
        };
    }
    figment = figment.merge(source.clone());
    if let Some(profile) = &config.profile {
        figment = figment.select(profile.clone());
    }

    let mut raw = extract_value(&figment, key)?;
    for hook in &config.hooks {
        raw = hook(raw)?;
    }

    let decoded: T = raw.deserialize().map_err(|err| {
        Error::configuration_with_source(format!("Failed to decode {}: {err}", describe(key)), err)
    })?;

    if config.error_unused || config.error_unset {
        let consumed = Value::serialize(&decoded).map_err(|err| {
            Error::configuration_with_source(
                format!("Failed to inspect decoded {}: {err}", describe(key)),
                err,
            )
        })?;

        if config.error_unused {
            let mut unused = Vec::new();
            missing_paths(&raw, Some(&consumed), "", &mut unused);
            if !unused.is_empty() {
                return Err(Error::configuration(format!(
                    "Unused keys in {}: {}",
                    describe(key),
                    unused.join(", ")
                )));
            }
        }

        if config.error_unset {
            let mut selected = source.clone();
            if let Some(profile) = &config.profile {
                selected = selected.select(profile.clone());
            }
            let provided = extract_value(&selected, key).ok();
            let mut unset = Vec::new();
            missing_paths(&consumed, provided.as_ref(), "", &mut unset);
            if !unset.is_empty() {
                return Err(Error::configuration(format!(
                    "Unset fields in {}: {}",
                    describe(key),
                    unset.join(", ")
                )));
            }
        }
    }

    *destination = decoded;
    Ok(())
}

fn extract_value(figment: &Figment, key: Option<&str>) -> Result<Value> {
    let extracted = match key {
        Some(key) => figment.extract_inner::<Value>(key),
        None => figment.extract::<Value>(),
    };
    extracted.map_err(|err| {
        Error::configuration_with_source(format!("Failed to read {}: {err}", describe(key)), err)
    })
}

fn describe(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("key `{key}`"),
        None => "configuration root".to_string(),
    }
}

/// Collect dotted paths present in `expected` but absent from `actual`
///
/// Only dictionaries are descended; a missing dictionary is reported once.
fn missing_paths(expected: &Value, actual: Option<&Value>, prefix: &str, out: &mut Vec<String>) {
    let Some(expected) = expected.as_dict() else {
        return;
    };
    let actual = actual.and_then(Value::as_dict);
    for (name, child) in expected {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match actual.and_then(|dict| dict.get(name)) {
            None => out.push(path),
            Some(found) => missing_paths(child, Some(found), &path, out),
        }
    }
}
