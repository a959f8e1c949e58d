//! Broadcast options collected from the form.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown in the prefix for unset fields.
pub const UNSET: &str = "N/A";

/// Normalize a selection label into a catalog lookup key.
///
/// Trims, collapses inner whitespace and upper-cases: `" scp  breach"` → `"SCP BREACH"`.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything the generator needs for one broadcast.
///
/// Missing fields are treated as unset. Field names follow the form's JSON shape,
/// so `{"status": "SCP BREACH", "breachedSCPs": ["SCP-173"]}` deserializes directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BroadcastOptions {
    /// Site status label (e.g. `SCP BREACH`).
    pub status: Option<String>,
    /// Threat level label (e.g. `HIGH`).
    #[serde(alias = "alarmLevel")]
    pub alarm: Option<String>,
    /// Testing state label (e.g. `PROHIBITED`).
    #[serde(alias = "testingState")]
    pub testing: Option<String>,
    /// Active event keys in selection order.
    #[serde(alias = "activeEvents")]
    pub events: Vec<String>,
    /// Display labels of breached entities.
    #[serde(alias = "breachedSCPs")]
    pub breached_entities: Vec<String>,
    /// Requirement flags.
    pub requirements: Requirements,
    /// Free text appended at the end.
    pub custom_text: Option<String>,
}

impl BroadcastOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_alarm(mut self, alarm: impl Into<String>) -> Self {
        self.alarm = Some(alarm.into());
        self
    }

    pub fn with_testing(mut self, testing: impl Into<String>) -> Self {
        self.testing = Some(testing.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.events.push(event.into());
        self
    }

    pub fn with_breached(mut self, label: impl Into<String>) -> Self {
        self.breached_entities.push(label.into());
        self
    }

    pub fn with_id_check(mut self) -> Self {
        self.requirements.id_check = true;
        self
    }

    pub fn with_authorization(mut self, flag: impl Into<String>) -> Self {
        self.requirements.authorizations.insert(flag.into(), true);
        self
    }

    pub fn with_custom_text(mut self, text: impl Into<String>) -> Self {
        self.custom_text = Some(text.into());
        self
    }

    /// Status as shown in the prefix.
    pub fn status_label(&self) -> &str {
        label_or_unset(self.status.as_deref())
    }

    /// Threat level as shown in the prefix.
    pub fn alarm_label(&self) -> &str {
        label_or_unset(self.alarm.as_deref())
    }

    /// Testing state as shown in the prefix.
    pub fn testing_label(&self) -> &str {
        label_or_unset(self.testing.as_deref())
    }

    /// Trimmed custom text, if any is left after trimming.
    pub fn custom_text(&self) -> Option<&str> {
        self.custom_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

fn label_or_unset(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNSET,
    }
}

/// Requirement flags.
///
/// `idCheck` is its own part; every other boolean key is an authorization flag
/// looked up in the catalog (e.g. `conX`, `scp008`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Requirements {
    #[serde(deserialize_with = "null_as_false")]
    pub id_check: bool,
    #[serde(flatten, deserialize_with = "flags_skipping_null")]
    pub authorizations: IndexMap<String, bool>,
}

impl Requirements {
    /// Check whether a named authorization flag is set.
    pub fn is_set(&self, flag: &str) -> bool {
        self.authorizations.get(flag).copied().unwrap_or(false)
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn flags_skipping_null<'de, D>(deserializer: D) -> Result<IndexMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Option<bool>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(flag, value)| value.map(|v| (flag, v)))
        .collect())
}
