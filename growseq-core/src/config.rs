//! Construction settings for growable sequences.

use std::env;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding the initial capacity.
pub const INITIAL_CAPACITY_ENV: &str = "GROWSEQ_INITIAL_CAPACITY";

/// Environment variable setting the storage ceiling in bytes.
pub const MAX_STORAGE_BYTES_ENV: &str = "GROWSEQ_MAX_STORAGE_BYTES";

/// Initial capacity used by [`SequenceConfig::default`].
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Settings applied when a sequence is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceConfig {
    /// Number of elements allocated up front.
    pub initial_capacity: usize,

    /// Upper bound on the size of a single backing buffer, in bytes.
    /// `None` means the allocator is the only limit.
    pub max_storage_bytes: Option<usize>,
}

impl Default for SequenceConfig {
    /// Default settings:
    /// - Initial capacity: 16
    /// - Storage ceiling: none
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_storage_bytes: None,
        }
    }
}

impl SequenceConfig {
    /// Small settings:
    /// - Initial capacity: 1
    /// - Storage ceiling: none
    pub const fn small() -> Self {
        Self {
            initial_capacity: 1,
            max_storage_bytes: None,
        }
    }

    /// Bounded settings:
    /// - Initial capacity: 16
    /// - Storage ceiling: `max_storage_bytes`
    pub const fn bounded(max_storage_bytes: usize) -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_storage_bytes: Some(max_storage_bytes),
        }
    }

    /// Replace the initial capacity.
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Replace the storage ceiling.
    pub const fn with_max_storage_bytes(mut self, max_storage_bytes: Option<usize>) -> Self {
        self.max_storage_bytes = max_storage_bytes;
        self
    }

    /// Load settings from the process environment.
    ///
    /// Unset variables keep their default value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but is not a
    /// non-negative integer.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// `lookup` is called with [`INITIAL_CAPACITY_ENV`] and
    /// [`MAX_STORAGE_BYTES_ENV`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(INITIAL_CAPACITY_ENV) {
            config.initial_capacity = parse_count(INITIAL_CAPACITY_ENV, &value)?;
        }
        if let Some(value) = lookup(MAX_STORAGE_BYTES_ENV) {
            config.max_storage_bytes = Some(parse_count(MAX_STORAGE_BYTES_ENV, &value)?);
        }

        Ok(config)
    }
}

fn parse_count(key: &str, value: &str) -> ConfigResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(feature = "yaml")]
mod yaml {
    use std::{fs, path::Path};

    use yaml_rust2::{Yaml, YamlLoader};

    use super::SequenceConfig;
    use crate::error::{ConfigError, ConfigResult};

    const SECTION: &str = "growseq";

    impl SequenceConfig {
        /// Parse settings from YAML text.
        ///
        /// The expected structure is:
        /// ```yaml
        /// growseq:
        ///   initial_capacity: 4
        ///   max_storage_bytes: 4096   # optional, `~` for no ceiling
        /// ```
        ///
        /// Missing keys keep their default value. An empty document yields the
        /// defaults.
        pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
            let docs =
                YamlLoader::load_from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;

            let Some(doc) = docs.first() else {
                return Ok(Self::default());
            };

            let section = &doc[SECTION];
            if section.is_badvalue() {
                return Err(ConfigError::InvalidStructure(format!(
                    "missing '{SECTION}' section"
                )));
            }
            if section.as_hash().is_none() {
                return Err(ConfigError::InvalidStructure(format!(
                    "'{SECTION}' must be a mapping"
                )));
            }

            let mut config = Self::default();

            match &section["initial_capacity"] {
                Yaml::BadValue => {}
                value => config.initial_capacity = yaml_count("initial_capacity", value)?,
            }
            match &section["max_storage_bytes"] {
                Yaml::BadValue => {}
                Yaml::Null => config.max_storage_bytes = None,
                value => config.max_storage_bytes = Some(yaml_count("max_storage_bytes", value)?),
            }

            Ok(config)
        }

        /// Parse settings from a YAML file.
        ///
        /// # Errors
        ///
        /// Returns [`ConfigError::FileNotFound`] if the file cannot be read,
        /// otherwise the errors of [`SequenceConfig::from_yaml_str`].
        pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
            let path_ref = path.as_ref();
            let content = fs::read_to_string(path_ref)
                .map_err(|_| ConfigError::FileNotFound(path_ref.to_path_buf()))?;
            Self::from_yaml_str(&content)
        }
    }

    fn yaml_count(key: &str, value: &Yaml) -> ConfigResult<usize> {
        value
            .as_i64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: format!("{value:?}"),
            })
    }
}
