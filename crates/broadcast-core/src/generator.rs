//! The two-phase fitting algorithm.
//!
//! Parts start at their most verbose level. The shrink phase steps the
//! least important part down one useful level at a time until the message
//! fits; the expand phase then steps the most important part back up while
//! the message still fits.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::catalog::MessageCatalog;
use crate::config::GeneratorConfig;
use crate::error::CatalogError;
use crate::numeric::NumericGuard;
use crate::options::{normalize_key, BroadcastOptions};
use crate::part::{MessagePart, RenderContext};

/// Separator between the prefix fields and between body parts.
pub const SEPARATOR: &str = " | ";

/// Outcome of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    /// The complete broadcast, prefix included.
    pub message: String,
    /// True when even the smallest composition exceeds the budget.
    pub overflow: bool,
}

/// Message generator bound to a configuration and a catalog.
///
/// Holds no per-call state, so one generator can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct BroadcastGenerator {
    config: GeneratorConfig,
    catalog: MessageCatalog,
}

impl BroadcastGenerator {
    /// Create a generator after validating the catalog.
    pub fn new(config: GeneratorConfig, catalog: MessageCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        Ok(Self {
            config,
            catalog: catalog.normalized(),
        })
    }

    /// Create a generator with the stock catalog.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            catalog: MessageCatalog::default(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Fixed prefix with unset fields shown as `N/A`.
    pub fn prefix(options: &BroadcastOptions) -> String {
        format!(
            "/broadcast Site Status: {} | Threat: {} | Testing: {} | ",
            options.status_label(),
            options.alarm_label(),
            options.testing_label(),
        )
    }

    /// Compose the broadcast for `options`.
    pub fn generate(&self, options: &BroadcastOptions) -> BroadcastResult {
        let prefix = Self::prefix(options);
        let event_keys: Vec<String> = options.events.iter().map(|e| normalize_key(e)).collect();

        let guard = NumericGuard::new(self.config.numeric_threshold);
        let number_free = guard.trips(&self.numeric_probe(&prefix, &event_keys, options));
        let ctx = RenderContext {
            catalog: &self.catalog,
            number_free,
        };

        let parts = self.build_parts(options, &event_keys);
        let mut composition = Composition { prefix, parts, ctx };

        let (message, overflow) = composition.fit(self.config.max_chars, self.config.max_iterations);

        debug!(
            length = char_len(&message),
            budget = self.config.max_chars,
            parts = composition.parts.len(),
            number_free,
            overflow,
            "Broadcast generated"
        );

        BroadcastResult { message, overflow }
    }

    /// Build the part list in broadcast order, each at its starting level.
    pub fn build_parts(&self, options: &BroadcastOptions, event_keys: &[String]) -> Vec<MessagePart> {
        let priorities = self.catalog.priorities;
        let mut parts = Vec::new();

        let status_key = options.status.as_deref().map(normalize_key).unwrap_or_default();
        let suppressed = self.catalog.suppresses(&status_key, event_keys);
        parts.push(MessagePart::status(status_key, priorities.status, suppressed));

        for (key, raw) in event_keys.iter().zip(&options.events) {
            parts.push(MessagePart::event(key.clone(), raw.clone(), priorities.event));
        }

        if !options.breached_entities.is_empty() {
            parts.push(MessagePart::breached_list(
                options.breached_entities.clone(),
                priorities.breached,
            ));
        }

        if options.requirements.id_check {
            parts.push(MessagePart::id_check(priorities.requirement));
        }

        let items: Vec<_> = self
            .catalog
            .authorizations
            .iter()
            .filter(|item| options.requirements.is_set(&item.flag))
            .cloned()
            .collect();
        if !items.is_empty() {
            parts.push(MessagePart::authorization(items, priorities.requirement));
        }

        if let Some(text) = options.custom_text() {
            parts.push(MessagePart::custom(text, priorities.custom));
        }

        parts
    }

    /// The most numeric rendering of the message, used to decide number-free mode.
    fn numeric_probe(&self, prefix: &str, event_keys: &[String], options: &BroadcastOptions) -> String {
        // Unknown events count with the raw text they would render.
        let mut sections: Vec<String> = event_keys
            .iter()
            .zip(&options.events)
            .map(|(key, raw)| match self.catalog.event_text(key) {
                Some(text) => text.long.clone(),
                None => raw.trim().to_string(),
            })
            .collect();

        if !options.breached_entities.is_empty() {
            sections.push(options.breached_entities.join(", "));
        }

        let numeric_labels: Vec<&str> = self
            .catalog
            .authorizations
            .iter()
            .filter(|item| item.name.is_some() && options.requirements.is_set(&item.flag))
            .map(|item| item.label.as_str())
            .collect();
        if !numeric_labels.is_empty() {
            sections.push(numeric_labels.join(", "));
        }

        format!("{}{}", prefix, sections.join(SEPARATOR))
    }
}

/// Working state of one generation. Built per call and never shared.
struct Composition<'a> {
    prefix: String,
    parts: Vec<MessagePart>,
    ctx: RenderContext<'a>,
}

impl Composition<'_> {
    fn fit(&mut self, budget: usize, max_iterations: usize) -> (String, bool) {
        let (message, overflow) = self.shrink(budget, max_iterations);
        if overflow {
            return (message, true);
        }
        (self.expand(message, budget, max_iterations), false)
    }

    /// Assemble the message with every part at its current level.
    fn assemble(&self) -> String {
        self.assemble_with(None)
    }

    /// Assemble with one part moved to another level index.
    fn assemble_with(&self, moved: Option<(usize, usize)>) -> String {
        let texts: Vec<String> = self
            .parts
            .iter()
            .enumerate()
            .map(|(i, part)| match moved {
                Some((index, level_index)) if index == i => {
                    part.render(part.levels()[level_index], &self.ctx)
                }
                _ => part.render_current(&self.ctx),
            })
            .filter(|text| !text.is_empty())
            .collect();

        format!("{}{}", self.prefix, texts.join(SEPARATOR))
    }

    /// Returns the shrunk message and whether it still overflows.
    fn shrink(&mut self, budget: usize, max_iterations: usize) -> (String, bool) {
        let mut message = self.assemble();
        let mut iterations = 0;

        while char_len(&message) > budget {
            if iterations >= max_iterations {
                debug!(iterations, "Shrink iteration cap reached");
                return (message, true);
            }
            iterations += 1;

            // Lowest priority shrinks first; min_by_key keeps the earliest on ties.
            let candidate = self
                .parts
                .iter()
                .enumerate()
                .filter_map(|(i, part)| part.shrink_target(&self.ctx).map(|target| (i, target)))
                .min_by_key(|&(i, _)| self.parts[i].priority);

            let Some((index, target)) = candidate else {
                return (message, true);
            };

            let part = &mut self.parts[index];
            trace!(
                part = %part.key,
                from = %part.current_level(),
                to = %part.levels()[target],
                "Shrinking part"
            );
            part.set_index(target);
            message = self.assemble();
        }

        (message, false)
    }

    /// Grow parts back while the message stays within budget.
    fn expand(&mut self, mut message: String, budget: usize, max_iterations: usize) -> String {
        for _ in 0..max_iterations {
            // Highest priority expands first; Reverse keeps the earliest on ties.
            let best = self
                .parts
                .iter()
                .enumerate()
                .filter_map(|(i, part)| {
                    let target = part.expand_target()?;
                    let candidate = self.assemble_with(Some((i, target)));
                    (char_len(&candidate) <= budget).then_some((i, target, candidate))
                })
                .min_by_key(|(i, _, _)| Reverse(self.parts[*i].priority));

            let Some((index, target, candidate)) = best else {
                break;
            };

            let part = &mut self.parts[index];
            trace!(
                part = %part.key,
                from = %part.current_level(),
                to = %part.levels()[target],
                "Expanding part"
            );
            part.set_index(target);
            message = candidate;
        }

        message
    }
}

/// Message length as counted against the budget.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn test_prefix_placeholders() {
        let options = BroadcastOptions::new().with_status("CLEAR");
        assert_eq!(
            BroadcastGenerator::prefix(&options),
            "/broadcast Site Status: CLEAR | Threat: N/A | Testing: N/A | "
        );
    }

    #[test]
    fn test_parts_in_lifecycle_order() {
        let generator = BroadcastGenerator::default();
        let options = BroadcastOptions::new()
            .with_status("clear")
            .with_custom_text("note")
            .with_authorization("scp409")
            .with_id_check()
            .with_breached("SCP-173")
            .with_event("Class-D Riot");
        let keys = vec!["CLASS-D RIOT".to_string()];

        let parts = generator.build_parts(&options, &keys);
        let order: Vec<&str> = parts.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(
            order,
            vec!["CLEAR", "CLASS-D RIOT", "BREACHED_LIST", "ID_CHECK", "SID_PLUS_AUTH", "CUSTOM_TEXT"]
        );
        assert!(parts.iter().all(|p| p.current_level() == Level::Long));
    }

    #[test]
    fn test_unrecognised_flags_ignored() {
        let generator = BroadcastGenerator::default();
        let options = BroadcastOptions::new().with_authorization("scp999");
        let parts = generator.build_parts(&options, &[]);
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_long_fits_without_change() {
        let generator = BroadcastGenerator::default();
        let options = BroadcastOptions::new()
            .with_status("CLEAR")
            .with_alarm("LOW")
            .with_testing("ALLOWED");

        let result = generator.generate(&options);
        assert!(!result.overflow);
        assert_eq!(
            result.message,
            "/broadcast Site Status: CLEAR | Threat: LOW | Testing: ALLOWED | All personnel resume normal duties"
        );
    }

    #[test]
    fn test_shrinks_lowest_priority_first() {
        let generator = BroadcastGenerator::with_config(GeneratorConfig::with_max_chars(120));
        let options = BroadcastOptions::new()
            .with_status("CLEAR")
            .with_custom_text("Cafeteria closes early today for deep cleaning of the kitchen");

        let result = generator.generate(&options);
        assert!(!result.overflow);
        assert!(result.message.contains("All personnel resume normal duties"));
        assert!(!result.message.contains("Cafeteria"));
    }

    #[test]
    fn test_breached_list_shrinks_before_status() {
        let generator = BroadcastGenerator::with_config(GeneratorConfig {
            numeric_threshold: 0,
            ..GeneratorConfig::with_max_chars(150)
        });
        let options = BroadcastOptions::new()
            .with_status("CLEAR")
            .with_breached("SCP-173")
            .with_breached("SCP-049")
            .with_breached("SCP-096")
            .with_breached("SCP-106")
            .with_breached("SCP-682");

        let result = generator.generate(&options);
        assert!(!result.overflow);
        assert!(char_len(&result.message) <= 150);
        assert!(result
            .message
            .ends_with("All personnel resume normal duties | Breached: 173, 049, 096 (+2)"));
    }

    #[test]
    fn test_expand_uses_room_freed_by_later_shrink() {
        // ID check drops to MINIMAL, then the status shrink frees enough room
        // for the ID check to grow back to SHORT.
        let generator = BroadcastGenerator::with_config(GeneratorConfig::with_max_chars(125));
        let options = BroadcastOptions::new()
            .with_status("NUCLEAR PROTOCOL")
            .with_id_check();

        let result = generator.generate(&options);
        assert!(!result.overflow);
        assert_eq!(
            result.message,
            "/broadcast Site Status: NUCLEAR PROTOCOL | Threat: N/A | Testing: N/A | \
             Evacuate to shelters immediately | Present ID at CP"
        );
        assert_eq!(char_len(&result.message), 123);
    }

    #[test]
    fn test_overflow_keeps_smallest_message() {
        let generator = BroadcastGenerator::with_config(GeneratorConfig::with_max_chars(70));
        let options = BroadcastOptions::new()
            .with_status("SCP BREACH")
            .with_event("CLASS-D RIOT");

        let result = generator.generate(&options);
        assert!(result.overflow);
        assert!(result.message.ends_with("Class-D riot."));
        assert!(!result.message.contains("containment protocols"));
    }

    #[test]
    fn test_iteration_cap_reports_overflow() {
        let generator = BroadcastGenerator::with_config(GeneratorConfig {
            max_iterations: 1,
            ..GeneratorConfig::with_max_chars(80)
        });
        let options = BroadcastOptions::new()
            .with_status("NUCLEAR PROTOCOL")
            .with_event("610 EVENT");

        let result = generator.generate(&options);
        assert!(result.overflow);
    }

    #[test]
    fn test_custom_catalog_priorities() {
        let mut catalog = MessageCatalog::default();
        catalog.priorities.custom = 20;
        let generator =
            BroadcastGenerator::new(GeneratorConfig::with_max_chars(110), catalog).unwrap();
        let options = BroadcastOptions::new()
            .with_status("CLEAR")
            .with_custom_text("Cafeteria closes early today");

        let result = generator.generate(&options);
        assert!(!result.overflow);
        assert!(result.message.contains("Cafeteria closes early today"));
        assert!(!result.message.contains("All personnel resume normal duties"));
    }
}
