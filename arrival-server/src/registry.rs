//! Stop name lookup.
//!
//! Maps human stop names to stop location identifiers. The table is loaded
//! once at startup from a JSON object (`{"捷運公館站": "1234", ...}`) and
//! is read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::domain::StopId;

/// Errors that can occur when loading the stop registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry file could not be read
    #[error("failed to read stop registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The registry is not a JSON object of stop names to identifiers
    #[error("invalid stop registry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identifiers appear both as strings and as bare numbers in registry files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStopId {
    Text(String),
    Number(u64),
}

impl RawStopId {
    fn into_string(self) -> String {
        match self {
            RawStopId::Text(s) => s,
            RawStopId::Number(n) => n.to_string(),
        }
    }
}

/// Immutable stop name → stop identifier table.
#[derive(Debug, Clone, Default)]
pub struct StopRegistry {
    stops: HashMap<String, StopId>,
}

impl StopRegistry {
    /// Load the registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&contents)
    }

    /// Parse the registry from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: HashMap<String, RawStopId> = serde_json::from_str(json)?;
        Ok(raw
            .into_iter()
            .map(|(name, id)| (name, id.into_string()))
            .collect())
    }

    /// Look up a stop by its exact name.
    ///
    /// `None` means the stop is unknown; registries lag behind newly added
    /// stops, so callers treat this as "no data" rather than a failure.
    pub fn resolve(&self, name: &str) -> Option<&StopId> {
        self.stops.get(name)
    }

    /// Number of stops in the registry.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl<N, I> FromIterator<(N, I)> for StopRegistry
where
    N: Into<String>,
    I: AsRef<str>,
{
    /// Build a registry, skipping entries whose identifier is blank or malformed.
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let stops = iter
            .into_iter()
            .filter_map(|(name, id)| {
                let name = name.into();
                match StopId::parse(id.as_ref()) {
                    Ok(id) => Some((name, id)),
                    Err(e) => {
                        warn!(stop = %name, error = %e, "Skipping stop registry entry");
                        None
                    }
                }
            })
            .collect();

        Self { stops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolve_exact_name() {
        let registry: StopRegistry = [("捷運公館站", "1234"), ("臺大醫院", "58")]
            .into_iter()
            .collect();

        assert_eq!(registry.resolve("捷運公館站").unwrap().as_str(), "1234");
        assert_eq!(registry.resolve("臺大醫院").unwrap().as_str(), "58");
    }

    #[test]
    fn unknown_name_is_none() {
        let registry: StopRegistry = [("捷運公館站", "1234")].into_iter().collect();

        assert!(registry.resolve("捷運公館").is_none());
        assert!(registry.resolve(" 捷運公館站").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn blank_ids_are_skipped() {
        let registry: StopRegistry = [("A", "1"), ("B", ""), ("C", "  ")].into_iter().collect();

        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("B").is_none());
    }

    #[test]
    fn from_json_accepts_strings_and_numbers() {
        let registry = StopRegistry::from_json(r#"{"捷運公館站": "1234", "臺大醫院": 58}"#).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("臺大醫院").unwrap().as_str(), "58");
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = StopRegistry::from_json(r#"["1234"]"#).unwrap_err();
        assert!(matches!(err, RegistryError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"捷運公館站": "1234"}}"#).unwrap();

        let registry = StopRegistry::load(file.path()).unwrap();
        assert_eq!(registry.resolve("捷運公館站").unwrap().as_str(), "1234");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StopRegistry::load(dir.path().join("missing.json")).unwrap_err();

        assert!(matches!(err, RegistryError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
