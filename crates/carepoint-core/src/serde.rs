use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Reads an optional string and parses it with [`FromStr`], treating an empty
/// or whitespace-only value the same as an absent one.
///
/// Browser forms submit untouched inputs as `""`; this keeps those on the
/// "missing field" path instead of failing as a type error. Pair it with
/// `#[serde(default)]` so an absent key also yields `None`.
pub fn deserialize_blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Like [`deserialize_blank_as_none`] for secrets: a whitespace-only value is
/// still `None`, but any other value is kept byte for byte.
pub fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
