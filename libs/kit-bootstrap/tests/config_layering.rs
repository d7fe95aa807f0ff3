#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::time::Duration;

use kit_bootstrap::{LogFormat, LoggingConfig, load_section};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct ResolverSection {
    base_domain: String,
    #[serde(with = "kit_bootstrap::humantime_serde")]
    cache_ttl: Duration,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            base_domain: "localhost".into(),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

fn yaml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn yaml_overrides_defaults_per_field() {
    let file = yaml("resolver:\n  base_domain: drivehub.app\n");
    temp_env::with_var_unset("DRIVEHUB__RESOLVER__CACHE_TTL", || {
        let cfg: ResolverSection = load_section(Some(file.path()), "resolver").unwrap();
        assert_eq!(cfg.base_domain, "drivehub.app");
        assert_eq!(cfg.cache_ttl, Duration::from_secs(300));
    });
}

#[test]
fn env_overrides_yaml() {
    let file = yaml("resolver:\n  base_domain: drivehub.app\n  cache_ttl: 1m\n");
    temp_env::with_vars(
        [
            ("DRIVEHUB__RESOLVER__CACHE_TTL", Some("30s")),
            ("DRIVEHUB__RESOLVER__BASE_DOMAIN", None),
        ],
        || {
            let cfg: ResolverSection = load_section(Some(file.path()), "resolver").unwrap();
            assert_eq!(cfg.base_domain, "drivehub.app");
            assert_eq!(cfg.cache_ttl, Duration::from_secs(30));
        },
    );
}

#[test]
fn sections_are_independent() {
    let file = yaml("logging:\n  level: debug\n  format: json\nresolver:\n  base_domain: x.test\n");
    temp_env::with_vars_unset(["DRIVEHUB__LOGGING__LEVEL", "DRIVEHUB__LOGGING__FORMAT"], || {
        let logging: LoggingConfig = load_section(Some(file.path()), "logging").unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
        assert!(logging.with_target);
    });
}

#[test]
fn bad_duration_reports_section() {
    let file = yaml("resolver:\n  cache_ttl: forever\n");
    temp_env::with_var_unset("DRIVEHUB__RESOLVER__CACHE_TTL", || {
        let err = load_section::<ResolverSection>(Some(file.path()), "resolver").unwrap_err();
        assert!(format!("{err:#}").contains("resolver"));
    });
}
