//! `.haul.env` secrets and `${env:VAR}` interpolation.

use std::collections::BTreeMap;
use std::path::Path;

/// Loads a `.haul.env` file (shell-style `KEY=value` format).
///
/// `.haul.env` holds credentials that should stay out of `Haul.toml`.
/// Lines may start with `export `, values may be wrapped in single or
/// double quotes, and `#` starts a comment line. A missing file yields an
/// empty map.
pub fn load_env_file(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if !path.is_file() {
        return Ok(map);
    }
    let content = std::fs::read_to_string(path).map_err(haul_util::errors::HaulError::Io)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((key, value)) = trimmed.split_once('=') {
            map.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }
    Ok(map)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Interpolate `${env:VAR}` and `${env:VAR:-fallback}` references.
///
/// Values come from `env_overrides` (the `.haul.env` entries) first, then
/// the process environment, then the fallback. Unknown variables without a
/// fallback become empty strings.
pub fn interpolate(input: &str, env_overrides: &BTreeMap<String, String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${env:") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let reference = &rest[start + 6..start + len];
        let (key, fallback) = match reference.split_once(":-") {
            Some((key, fallback)) => (key, Some(fallback)),
            None => (reference, None),
        };
        let value = env_overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_default();
        result.push_str(&value);
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}
