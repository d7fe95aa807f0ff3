//! Hostname classification.
//!
//! Pure functions over the raw `Host` / `X-Forwarded-Host` value. Nothing here
//! fails: malformed input classifies as "nothing", which resolves to no tenant.

use http::HeaderMap;
use http::header::HOST;
use tenant_resolver_sdk::HostInfo;

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const LOCALHOST: &str = "localhost";

/// Classifies hostnames against the platform base domain.
#[derive(Debug, Clone)]
pub struct HostnameResolver {
    base_domain: String,
    subdomain_suffix: String,
    main_domains: Vec<String>,
}

impl HostnameResolver {
    pub fn new<I, S>(base_domain: &str, main_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base_domain = normalize(base_domain).unwrap_or_default();
        let mut mains: Vec<String> = main_domains
            .into_iter()
            .filter_map(|d| normalize(d.as_ref()))
            .collect();
        mains.push(base_domain.clone());
        mains.push(format!("www.{base_domain}"));
        mains.sort();
        mains.dedup();

        Self {
            subdomain_suffix: format!(".{base_domain}"),
            base_domain,
            main_domains: mains,
        }
    }

    #[must_use]
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Classifies a raw host value (port allowed).
    #[must_use]
    pub fn classify(&self, raw: &str) -> HostInfo {
        let Some(clean) = normalize(raw) else {
            return HostInfo::default();
        };

        let subdomain_slug = clean
            .strip_suffix(&self.subdomain_suffix)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_owned);

        HostInfo {
            is_subdomain: subdomain_slug.is_some(),
            is_custom_domain: !clean.contains(&self.base_domain) && !clean.contains(LOCALHOST),
            is_main_domain: self.main_domains.contains(&clean),
            subdomain_slug,
            clean_hostname: clean,
        }
    }

    /// Normalized hostname, or `None` for malformed input.
    #[must_use]
    pub fn clean(&self, raw: &str) -> Option<String> {
        normalize(raw)
    }
}

/// Host value of a request: the first `X-Forwarded-Host` entry, else `Host`.
#[must_use]
pub fn host_from_headers(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get(X_FORWARDED_HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_owned)
}

/// Trim, strip port, drop one trailing dot, lowercase.
fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let host = if let Some(rest) = raw.strip_prefix('[') {
        // [v6]:port
        let (addr, tail) = rest.split_once(']')?;
        if !(tail.is_empty() || tail.strip_prefix(':').is_some_and(is_port)) {
            return None;
        }
        addr
    } else {
        match raw.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => {
                if !is_port(port) {
                    return None;
                }
                host
            }
            // no port, or bare IPv6 without brackets
            _ => raw,
        }
    };

    let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
    let well_formed = !host.is_empty()
        && !host.starts_with('.')
        && !host.contains("..")
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b':'));
    well_formed.then_some(host)
}

fn is_port(s: &str) -> bool {
    !s.is_empty() && s.len() <= 5 && s.bytes().all(|b| b.is_ascii_digit())
}
