//! Message parts and their per-level renderings.

use crate::catalog::{AuthorizationItem, MessageCatalog};
use crate::level::{Level, OPTIONAL_LEVELS, STANDARD_LEVELS, SUPPRESSED_LEVELS};
use crate::numeric::count_numeric_tokens;

/// Breached labels listed in full at the SHORT level.
const SHORT_LIST_LIMIT: usize = 3;

/// Shared inputs for rendering every part of one broadcast.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub catalog: &'a MessageCatalog,
    /// Render names and counts instead of numeric identifiers.
    pub number_free: bool,
}

/// Which requirement a requirement part announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    IdCheck,
    /// Combined authorization sentence over every active flag.
    Authorization { items: Vec<AuthorizationItem> },
}

/// The kinds of content a broadcast is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartKind {
    Status,
    /// `raw` is the key as selected, shown when the catalog has no text for it
    /// (unless number-free mode is on and it carries a numeric identifier).
    Event { raw: String },
    BreachedList { entities: Vec<String> },
    Requirement(Requirement),
    Custom { text: String },
}

/// One section of the broadcast body.
///
/// `current` indexes into `levels`, so the current level is always one of the
/// part's own levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePart {
    pub kind: PartKind,
    pub key: String,
    pub priority: i32,
    levels: &'static [Level],
    current: usize,
}

impl MessagePart {
    fn new(kind: PartKind, key: impl Into<String>, priority: i32, levels: &'static [Level]) -> Self {
        Self {
            kind,
            key: key.into(),
            priority,
            levels,
            current: 0,
        }
    }

    /// Status announcement; a suppressed status only has the NONE level.
    pub fn status(key: impl Into<String>, priority: i32, suppressed: bool) -> Self {
        let levels = if suppressed { SUPPRESSED_LEVELS } else { STANDARD_LEVELS };
        Self::new(PartKind::Status, key, priority, levels)
    }

    pub fn event(key: impl Into<String>, raw: impl Into<String>, priority: i32) -> Self {
        let kind = PartKind::Event { raw: raw.into() };
        Self::new(kind, key, priority, STANDARD_LEVELS)
    }

    pub fn breached_list(entities: Vec<String>, priority: i32) -> Self {
        let kind = PartKind::BreachedList { entities };
        Self::new(kind, "BREACHED_LIST", priority, STANDARD_LEVELS)
    }

    pub fn id_check(priority: i32) -> Self {
        let kind = PartKind::Requirement(Requirement::IdCheck);
        Self::new(kind, "ID_CHECK", priority, STANDARD_LEVELS)
    }

    pub fn authorization(items: Vec<AuthorizationItem>, priority: i32) -> Self {
        let kind = PartKind::Requirement(Requirement::Authorization { items });
        Self::new(kind, "SID_PLUS_AUTH", priority, STANDARD_LEVELS)
    }

    pub fn custom(text: impl Into<String>, priority: i32) -> Self {
        let kind = PartKind::Custom { text: text.into() };
        Self::new(kind, "CUSTOM_TEXT", priority, OPTIONAL_LEVELS)
    }

    /// Levels from most to least verbose.
    pub fn levels(&self) -> &[Level] {
        self.levels
    }

    pub fn current_level(&self) -> Level {
        self.levels[self.current]
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        debug_assert!(index < self.levels.len());
        self.current = index;
    }

    /// Text at the current level.
    pub fn render_current(&self, ctx: &RenderContext<'_>) -> String {
        self.render(self.current_level(), ctx)
    }

    /// Text this part shows at `level`; empty means nothing to show.
    pub fn render(&self, level: Level, ctx: &RenderContext<'_>) -> String {
        if level == Level::None {
            return String::new();
        }
        let catalog = ctx.catalog;

        match &self.kind {
            PartKind::Status => catalog
                .status_text(&self.key)
                .map(|text| text.at(level).to_string())
                .unwrap_or_default(),
            PartKind::Event { raw } => {
                let text = if ctx.number_free {
                    catalog
                        .number_free_event_text(&self.key)
                        .or_else(|| catalog.event_text(&self.key))
                } else {
                    catalog.event_text(&self.key)
                };
                match text {
                    Some(text) => text.at(level).to_string(),
                    None if ctx.number_free && count_numeric_tokens(raw) > 0 => String::new(),
                    None => raw.trim().to_string(),
                }
            }
            PartKind::BreachedList { entities } => render_breached(entities, level, ctx),
            PartKind::Requirement(Requirement::IdCheck) => catalog.id_check.at(level).to_string(),
            PartKind::Requirement(Requirement::Authorization { items }) => {
                let labels: Vec<&str> = items
                    .iter()
                    .map(|item| match (&item.name, ctx.number_free) {
                        (Some(name), true) => name.as_str(),
                        _ => item.label.as_str(),
                    })
                    .collect();
                catalog.authorization.fill(level, &labels.join(", "))
            }
            PartKind::Custom { text } => match level {
                Level::Long => text.clone(),
                _ => String::new(),
            },
        }
    }

    /// Next less verbose level worth moving to, if any.
    ///
    /// A level qualifies when its text is strictly shorter than the current
    /// text, or when it is the last level and its text differs.
    pub fn shrink_target(&self, ctx: &RenderContext<'_>) -> Option<usize> {
        let last = self.levels.len() - 1;
        if self.current >= last {
            return None;
        }

        let current_text = self.render_current(ctx);
        let current_len = current_text.chars().count();
        (self.current + 1..=last).find(|&index| {
            let text = self.render(self.levels[index], ctx);
            text.chars().count() < current_len || (index == last && text != current_text)
        })
    }

    /// One level more verbose, if the part is not already at its most verbose.
    pub fn expand_target(&self) -> Option<usize> {
        self.current.checked_sub(1)
    }
}

fn render_breached(entities: &[String], level: Level, ctx: &RenderContext<'_>) -> String {
    let count = entities.len();
    let noun = &ctx.catalog.breached_noun;

    if ctx.number_free {
        return match level {
            Level::Long => format!("Breached: {} {}{}", count, noun, if count > 1 { "s" } else { "" }),
            _ => format!("{} breaches", count),
        };
    }

    match level {
        Level::Long => format!("Breached: {}", entities.join(", ")),
        Level::Short => {
            let prefix = &ctx.catalog.breached_prefix;
            let shown: Vec<&str> = entities
                .iter()
                .take(SHORT_LIST_LIMIT)
                .map(|label| abbreviate(label, prefix))
                .collect();
            let more = if count > SHORT_LIST_LIMIT {
                format!(" (+{})", count - SHORT_LIST_LIMIT)
            } else {
                String::new()
            };
            format!("Breached: {}{}", shown.join(", "), more)
        }
        _ => format!("{} breaches", count),
    }
}

/// Strip a leading `prefix` (case-insensitive, optional `-`): `SCP-173` → `173`.
fn abbreviate<'a>(label: &'a str, prefix: &str) -> &'a str {
    let rest = match label.get(..prefix.len()) {
        Some(head) if !prefix.is_empty() && head.eq_ignore_ascii_case(prefix) => {
            let tail = &label[prefix.len()..];
            tail.strip_prefix('-').unwrap_or(tail)
        }
        _ => label,
    };
    rest.trim()
}
