//! `#[serde(with = "kit_bootstrap::humantime_serde")]` for [`Duration`] fields,
//! reading and writing strings such as `"5m"` or `"1h 30m"`.
//!
//! [`option`] handles `Option<Duration>`.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cfg {
//!     #[serde(with = "kit_bootstrap::humantime_serde")]
//!     ttl: Duration,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

/// Parses a humantime string into a [`Duration`].
///
/// # Errors
/// Returns a deserialization error for anything `humantime` cannot parse.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_str(DurationVisitor)
}

/// Formats a [`Duration`] as a humantime string.
///
/// # Errors
/// Propagates the serializer's error.
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"30s\" or \"5m\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        humantime::parse_duration(v).map_err(|e| E::custom(format!("invalid duration `{v}`: {e}")))
    }
}

pub mod option {
    //! `Option<Duration>` variant; `null` or a missing field is `None`.

    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    /// Returns a deserialization error for an unparsable duration.
    pub fn deserialize<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] Duration);

        Option::<Wrapped>::deserialize(d).map(|w| w.map(|Wrapped(d)| d))
    }

    /// # Errors
    /// Propagates the serializer's error.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match d {
            Some(d) => super::serialize(d, s),
            None => s.serialize_none(),
        }
    }
}
