use crate::domain::growth::ContributionPlan;
use crate::storage::{KeyValueStore, PREFERENCES_KEY, USER_KEY};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const EXPORT_FILE_NAME: &str = "gtb_simulation.json";

/// The persisted preference object.
///
/// Normally `{"contribution": "$500" | "$1000", "simulations": [...]}`, but an
/// import may replace it with any JSON object. Unknown keys and odd values are
/// carried through untouched; readers only interpret what they recognise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(Map<String, Value>);

impl Default for Preferences {
    fn default() -> Self {
        let mut map = Map::new();
        map.insert(
            "contribution".to_string(),
            Value::String(ContributionPlan::default().label().to_string()),
        );
        map.insert("simulations".to_string(), Value::Array(Vec::new()));
        Self(map)
    }
}

impl Preferences {
    /// Wraps an imported document. Anything other than an object becomes `{}`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                tracing::warn!(kind = json_kind(&other), "preference document is not an object; using {{}}");
                Self(Map::new())
            }
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn contribution_label(&self) -> Option<&str> {
        self.0.get("contribution").and_then(Value::as_str)
    }

    /// `None` when the stored label names no known plan.
    pub fn plan(&self) -> Option<ContributionPlan> {
        self.contribution_label().and_then(ContributionPlan::from_label)
    }

    pub fn set_plan(&mut self, plan: ContributionPlan) {
        self.0.insert(
            "contribution".to_string(),
            Value::String(plan.label().to_string()),
        );
    }

    /// The history list. Declared by the format but never appended to.
    pub fn simulations(&self) -> &[Value] {
        self.0
            .get("simulations")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.0).context("failed to encode preferences")
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load/save of the preference object over an injected key/value store.
#[derive(Debug)]
pub struct PreferenceStore<K> {
    store: K,
}

impl<K: KeyValueStore> PreferenceStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &K {
        &self.store
    }

    pub fn into_inner(self) -> K {
        self.store
    }

    /// Saved preferences, or the defaults if nothing usable is stored.
    pub fn load(&self) -> Preferences {
        let raw = match self.store.get_item(PREFERENCES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Preferences::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read preferences; using defaults");
                return Preferences::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Preferences(map),
            Ok(_) => {
                tracing::warn!("stored preferences are not an object; using defaults");
                Preferences::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored preferences are not valid JSON; using defaults");
                Preferences::default()
            }
        }
    }

    pub fn save(&mut self, prefs: &Preferences) -> Result<()> {
        let body = prefs.to_json()?;
        self.store
            .set_item(PREFERENCES_KEY, &body)
            .context("failed to persist preferences")
    }

    pub fn remember_user(&mut self, email: &str) -> Result<()> {
        self.store
            .set_item(USER_KEY, email)
            .context("failed to persist logged-in user")
    }
}

/// Serializes the preference object exactly as it is persisted.
pub fn export_json(prefs: &Preferences) -> Result<String> {
    prefs.to_json()
}

pub fn export_to_file(prefs: &Preferences, path: &Path) -> Result<()> {
    let body = export_json(prefs)?;
    std::fs::write(path, body).with_context(|| format!("failed to write export {}", path.display()))
}

/// Parses an uploaded document. No schema check beyond "is JSON".
pub fn import_json(text: &str) -> Result<Preferences> {
    let value = serde_json::from_str::<Value>(text).context("imported file is not valid JSON")?;
    Ok(Preferences::from_value(value))
}

pub fn import_from_file(path: &Path) -> Result<Preferences> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read import {}", path.display()))?;
    import_json(&text)
}
