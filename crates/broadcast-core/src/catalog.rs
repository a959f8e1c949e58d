//! Canned broadcast text and the tables that drive part construction.
//!
//! Everything that site owners may want to tune lives here rather than in the
//! fitting code: per-level sentences, which events supersede which status,
//! part priorities and the authorization flags. [`MessageCatalog::default`]
//! carries the stock tables; a JSON file can override any subset of them.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::level::Level;
use crate::options::normalize_key;

/// Placeholder substituted with the joined authorization labels.
pub const ITEMS_PLACEHOLDER: &str = "{items}";

/// Text for one entry at each verbosity level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeveledText {
    pub long: String,
    pub short: String,
    pub minimal: String,
}

impl LeveledText {
    pub fn new(long: impl Into<String>, short: impl Into<String>, minimal: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: short.into(),
            minimal: minimal.into(),
        }
    }

    /// Text at `level`; [`Level::None`] is always empty.
    pub fn at(&self, level: Level) -> &str {
        match level {
            Level::Long => &self.long,
            Level::Short => &self.short,
            Level::Minimal => &self.minimal,
            Level::None => "",
        }
    }

    /// Fill the items placeholder of a template entry.
    pub fn fill(&self, level: Level, items: &str) -> String {
        self.at(level).replace(ITEMS_PLACEHOLDER, items)
    }

    fn check_monotonic(&self, table: &'static str, key: &str) -> Result<(), CatalogError> {
        let len = |s: &str| s.replace(ITEMS_PLACEHOLDER, "").chars().count();
        let steps = [(Level::Long, Level::Short), (Level::Short, Level::Minimal)];
        for (from, to) in steps {
            if len(self.at(to)) > len(self.at(from)) {
                return Err(CatalogError::NonMonotonic {
                    table,
                    key: key.to_string(),
                    from: from.as_str(),
                    to: to.as_str(),
                });
            }
        }
        Ok(())
    }
}

/// One authorization flag that feeds the combined authorization part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationItem {
    /// Flag name in [`Requirements`](crate::Requirements) (e.g. `scp008`).
    pub flag: String,
    /// Label listed in the sentence (e.g. `008`).
    pub label: String,
    /// Replacement used in number-free mode; items with a name count as numeric.
    #[serde(default)]
    pub name: Option<String>,
}

impl AuthorizationItem {
    pub fn new(flag: impl Into<String>, label: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            flag: flag.into(),
            label: label.into(),
            name: name.map(str::to_string),
        }
    }
}

/// A status whose announcement is dropped when any of `events` is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionRule {
    pub status: String,
    pub events: Vec<String>,
}

impl SuppressionRule {
    pub fn new(status: &str, events: &[&str]) -> Self {
        Self {
            status: status.to_string(),
            events: events.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Check a normalized status against normalized event keys.
    pub fn applies(&self, status_key: &str, event_keys: &[String]) -> bool {
        normalize_key(&self.status) == status_key
            && self
                .events
                .iter()
                .any(|e| event_keys.contains(&normalize_key(e)))
    }
}

/// Part priorities: higher expands first, lower shrinks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Priorities {
    pub event: i32,
    pub status: i32,
    pub requirement: i32,
    pub breached: i32,
    pub custom: i32,
}

impl Default for Priorities {
    fn default() -> Self {
        Self {
            event: 11,
            status: 10,
            requirement: 9,
            breached: 7,
            custom: 5,
        }
    }
}

/// All canned text and rule tables used by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    /// Status announcements keyed by status label.
    pub statuses: IndexMap<String, LeveledText>,
    /// Event announcements keyed by event key.
    pub events: IndexMap<String, LeveledText>,
    /// Event announcements without numeric identifiers.
    pub number_free_events: IndexMap<String, LeveledText>,
    /// Identity-check requirement.
    pub id_check: LeveledText,
    /// Authorization sentence templates containing `{items}`.
    pub authorization: LeveledText,
    /// Recognised authorization flags, in listing order.
    pub authorizations: Vec<AuthorizationItem>,
    /// Status/event combinations where the event supersedes the status.
    pub suppression: Vec<SuppressionRule>,
    pub priorities: Priorities,
    /// Noun used by the breached count rendering (`Breached: 3 SCPs`).
    pub breached_noun: String,
    /// Leading label prefix stripped by the SHORT breached rendering.
    pub breached_prefix: String,
}

impl MessageCatalog {
    /// Parse a catalog override; omitted tables keep their stock values.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog.normalized())
    }

    /// Read a catalog override from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check authoring rules the fitting algorithm relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let tables = [
            ("statuses", &self.statuses),
            ("events", &self.events),
            ("number_free_events", &self.number_free_events),
        ];
        for (table, entries) in tables {
            for (key, text) in entries {
                text.check_monotonic(table, key)?;
            }
        }
        self.id_check.check_monotonic("id_check", "ID_CHECK")?;
        self.authorization.check_monotonic("authorization", "SID_PLUS_AUTH")?;

        let mut seen = HashSet::new();
        for item in &self.authorizations {
            if !seen.insert(item.flag.as_str()) {
                return Err(CatalogError::DuplicateFlag(item.flag.clone()));
            }
        }
        Ok(())
    }

    /// Re-key the lookup tables with normalized keys.
    pub fn normalized(mut self) -> Self {
        let rekey = |table: IndexMap<String, LeveledText>| -> IndexMap<String, LeveledText> {
            table
                .into_iter()
                .map(|(key, text)| (normalize_key(&key), text))
                .collect()
        };
        self.statuses = rekey(self.statuses);
        self.events = rekey(self.events);
        self.number_free_events = rekey(self.number_free_events);
        self
    }

    pub fn status_text(&self, key: &str) -> Option<&LeveledText> {
        self.statuses.get(key)
    }

    pub fn event_text(&self, key: &str) -> Option<&LeveledText> {
        self.events.get(key)
    }

    pub fn number_free_event_text(&self, key: &str) -> Option<&LeveledText> {
        self.number_free_events.get(key)
    }

    /// Whether the status announcement should be dropped for these events.
    pub fn suppresses(&self, status_key: &str, event_keys: &[String]) -> bool {
        self.suppression
            .iter()
            .any(|rule| rule.applies(status_key, event_keys))
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let mut statuses = IndexMap::new();
        statuses.insert(
            "SCP BREACH".to_string(),
            LeveledText::new(
                "All personnel must initiate containment protocols immediately. Follow all emergency procedures",
                "Containment protocols required",
                "",
            ),
        );
        statuses.insert(
            "SITE LOCKDOWN".to_string(),
            LeveledText::new(
                "SITE LOCKDOWN! Multiple breaches detected. All armed personnel respond immediately",
                "SITE LOCKDOWN! Multiple breaches detected",
                "",
            ),
        );
        statuses.insert(
            "CLASS-D ESCAPE".to_string(),
            LeveledText::new(
                "Class-D personnel have escaped containment. All staff stay alert",
                "Class-D personnel escaped",
                "",
            ),
        );
        statuses.insert(
            "CHAOS INSURGENCY".to_string(),
            LeveledText::new(
                "Chaos Insurgency activity detected. All armed personnel proceed to intercept and contain threats",
                "Chaos Insurgency activity detected",
                "",
            ),
        );
        statuses.insert(
            "NUCLEAR PROTOCOL".to_string(),
            LeveledText::new(
                "All personnel must evacuate to shelters immediately. Failure to comply will result in fatality",
                "Evacuate to shelters immediately",
                "",
            ),
        );
        statuses.insert(
            "CLEAR".to_string(),
            LeveledText::new("All personnel resume normal duties", "Normal duties resumed", ""),
        );
        statuses.insert(
            "MAINTENANCE".to_string(),
            LeveledText::new(
                "Maintenance personnel report to generator room immediately",
                "Maintenance to generator room",
                "",
            ),
        );
        statuses.insert(
            "O5 MEETING".to_string(),
            LeveledText::new("O5 meeting scheduled", "O5 meeting scheduled", ""),
        );

        let mut events = IndexMap::new();
        events.insert(
            "610 EVENT".to_string(),
            LeveledText::new(
                "SCP-610 anomaly active. Avoid exposure. Containment and quarantine teams deploy immediately",
                "SCP-610 anomaly active. Avoid exposure.",
                "SCP-610 active.",
            ),
        );
        events.insert(
            "076 EVENT".to_string(),
            LeveledText::new(
                "SCP-076 containment breach. Armed response teams engage immediately with heavy gunfire",
                "SCP-076 containment breach. Armed response needed.",
                "SCP-076 breach.",
            ),
        );
        events.insert(
            "CLASS-D RIOT".to_string(),
            LeveledText::new(
                "Class-D personnel are rioting. Security teams must contain the situation immediately",
                "Class-D personnel rioting. Security response.",
                "Class-D riot.",
            ),
        );
        events.insert(
            "323 BREACH".to_string(),
            LeveledText::new(
                "SCP-323 containment breach. All personnel evacuate immediately. Response teams engage with full-force authorization.",
                "SCP-323 containment breach.",
                "SCP-323 breach.",
            ),
        );

        let mut number_free_events = IndexMap::new();
        number_free_events.insert(
            "610 EVENT".to_string(),
            LeveledText::new(
                "Flesh anomaly active. Avoid exposure. Containment and quarantine teams deploy immediately",
                "Flesh anomaly active. Avoid exposure.",
                "Flesh anomaly.",
            ),
        );
        number_free_events.insert(
            "076 EVENT".to_string(),
            LeveledText::new(
                "Abel breach. Armed response teams engage immediately with heavy gunfire",
                "Abel breach. Armed response needed.",
                "Abel breach.",
            ),
        );
        number_free_events.insert(
            "323 BREACH".to_string(),
            LeveledText::new(
                "Wendigo breach. All personnel evacuate immediately. Response teams engage with full-force authorization",
                "Wendigo breach.",
                "Wendigo breach.",
            ),
        );

        Self {
            statuses,
            events,
            number_free_events,
            id_check: LeveledText::new("Present ID at checkpoints", "Present ID at CP", "ID at CP"),
            authorization: LeveledText::new(
                "SID+ Auth required for {items} tests",
                "SID+ Auth req: {items}",
                "Auth req: {items}",
            ),
            authorizations: vec![
                AuthorizationItem::new("conX", "CON-X", None),
                AuthorizationItem::new("scp008", "008", Some("Zombie pathogen")),
                AuthorizationItem::new("scp409", "409", Some("Crystal virus")),
                AuthorizationItem::new("scp701", "701", Some("Hanged King")),
                AuthorizationItem::new("scp035", "035", Some("Possessive mask")),
            ],
            suppression: vec![
                SuppressionRule::new("SCP BREACH", &["076 EVENT", "610 EVENT", "323 BREACH"]),
                SuppressionRule::new("SITE LOCKDOWN", &["076 EVENT", "610 EVENT"]),
                SuppressionRule::new("CLASS-D ESCAPE", &["CLASS-D RIOT"]),
            ],
            priorities: Priorities::default(),
            breached_noun: "SCP".to_string(),
            breached_prefix: "SCP".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        MessageCatalog::default().validate().unwrap();
    }

    #[test]
    fn test_leveled_text_none_is_empty() {
        let text = LeveledText::new("a long one", "short", "min");
        assert_eq!(text.at(Level::Short), "short");
        assert_eq!(text.at(Level::None), "");
    }

    #[test]
    fn test_fill_template() {
        let catalog = MessageCatalog::default();
        assert_eq!(
            catalog.authorization.fill(Level::Long, "CON-X, 008"),
            "SID+ Auth required for CON-X, 008 tests"
        );
        assert_eq!(catalog.authorization.fill(Level::Minimal, "409"), "Auth req: 409");
    }

    #[test]
    fn test_suppression_rules() {
        let catalog = MessageCatalog::default();
        let events = vec!["076 EVENT".to_string()];
        assert!(catalog.suppresses("SCP BREACH", &events));
        assert!(catalog.suppresses("SITE LOCKDOWN", &events));
        assert!(!catalog.suppresses("CLEAR", &events));
        assert!(!catalog.suppresses("SCP BREACH", &["CLASS-D RIOT".to_string()]));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let catalog = MessageCatalog::from_json(
            r#"{
                "statuses": {"clear": {"long": "Resume duties", "short": "Resume"}},
                "priorities": {"custom": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.statuses.len(), 1);
        assert_eq!(catalog.status_text("CLEAR").unwrap().at(Level::Short), "Resume");
        assert_eq!(catalog.priorities.custom, 1);
        assert_eq!(catalog.priorities.event, 11);
        assert_eq!(catalog.events.len(), 4);
        assert_eq!(catalog.authorizations.len(), 5);
    }

    #[test]
    fn test_rejects_growing_text() {
        let err = MessageCatalog::from_json(
            r#"{"events": {"X": {"long": "x", "short": "much longer", "minimal": ""}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::NonMonotonic { table: "events", .. }));
    }

    #[test]
    fn test_rejects_duplicate_flags() {
        let err = MessageCatalog::from_json(
            r#"{"authorizations": [
                {"flag": "conX", "label": "CON-X"},
                {"flag": "conX", "label": "CON-Y"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateFlag(flag) if flag == "conX"));
    }

    #[test]
    fn test_invalid_json() {
        let err = MessageCatalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }
}
