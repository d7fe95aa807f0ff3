//! Layered configuration.
//!
//! Precedence, lowest first:
//! 1. `T::default()`
//! 2. the `<section>` key of the YAML file, if a path is given
//! 3. environment variables `DRIVEHUB__<SECTION>__<FIELD>`, nested with `__`

use std::path::Path;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DRIVEHUB__";

/// Loads one configuration section.
///
/// # Errors
/// Fails if `path` is given but is not a file, or if the merged values do not
/// deserialize into `T` (unknown keys included, for sections that deny them).
pub fn load_section<T>(path: Option<&Path>, section: &str) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut layers = Figment::new();
    if let Some(path) = path {
        if !path.is_file() {
            bail!("config file does not exist: {}", path.display());
        }
        layers = layers.merge(Yaml::file(path));
    }
    layers = layers.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let value: T = Figment::from(Serialized::defaults(T::default()))
        .merge(layers.focus(section))
        .extract()
        .with_context(|| format!("invalid `{section}` configuration"))?;

    tracing::debug!(section, "configuration section loaded");
    Ok(value)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default, deny_unknown_fields)]
    struct Sample {
        name: String,
        port: u16,
    }

    #[test]
    fn defaults_without_file_or_env() {
        temp_env::with_vars_unset(["DRIVEHUB__SAMPLE__NAME", "DRIVEHUB__SAMPLE__PORT"], || {
            let cfg: Sample = load_section(None, "sample").unwrap();
            assert_eq!(cfg, Sample::default());
        });
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_section::<Sample>(Some(Path::new("/nonexistent/drivehub.yaml")), "sample")
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample:\n  name: a\n  colour: red").unwrap();
        assert!(load_section::<Sample>(Some(file.path()), "sample").is_err());
    }
}
