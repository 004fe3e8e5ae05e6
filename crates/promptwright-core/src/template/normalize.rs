//! Template normalization: reduce any [`TemplateValue`] to one string.
//!
//! Resolution order, first match wins:
//! 1. plain text is returned unchanged;
//! 2. chat messages (top-level, or under a [`CHAT_KEYS`] key) are flattened
//!    to `[ROLE]: content` blocks;
//! 3. the first [`PRIORITY_KEYS`] entry holding a non-empty string;
//! 4. for a priority key holding a mapping, the first [`NESTED_KEYS`] entry
//!    inside it holding a non-empty string;
//! 5. the first string in the mapping longer than [`MIN_FALLBACK_CHARS`];
//! 6. a list whose every element is textual, joined by single spaces.
//!
//! Anything else is an [`UnresolvableTemplate`].

use super::{ChatMessage, NormalizedTemplate, TemplateMap, TemplateValue};
use thiserror::Error;
use tracing::{debug, warn};

/// Mapping keys that may hold a chat-style message list, in lookup order.
pub const CHAT_KEYS: &[&str] = &["messages", "chat"];

/// Mapping keys checked for a template string, in priority order.
pub const PRIORITY_KEYS: &[&str] = &[
    "text", "template", "fa", "en", "body", "content", "prompt", "system", "user",
];

/// Keys checked inside a mapping found under a priority key.
pub const NESTED_KEYS: &[&str] = &["fa", "en", "text", "content"];

/// A fallback-scan string must be longer than this many characters.
///
/// Keeps ids, flags and other short fields from being picked up as prose.
pub const MIN_FALLBACK_CHARS: usize = 10;

/// Role label used when a chat message has none.
const UNKNOWN_ROLE: &str = "unknown";

/// Longest shape preview included in the error message.
const SHAPE_PREVIEW_CHARS: usize = 200;

/// No normalization rule matched. Carries the original value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("prompt template cannot be converted to text (shape: {})", shape_preview(.shape))]
pub struct UnresolvableTemplate {
    pub shape: TemplateValue,
}

fn shape_preview(shape: &TemplateValue) -> String {
    let json = shape.to_json().to_string();
    if json.chars().count() > SHAPE_PREVIEW_CHARS {
        let truncated: String = json.chars().take(SHAPE_PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        json
    }
}

/// Normalize a template value into a single template string.
pub fn normalize(template: &TemplateValue) -> Result<NormalizedTemplate, UnresolvableTemplate> {
    debug!("normalizing {} template", template.kind());

    let resolved = match template {
        TemplateValue::Text(s) => Some(s.clone()),
        TemplateValue::ChatMessages(messages) => flatten_chat(messages),
        TemplateValue::Mapping(map) => resolve_mapping(map),
        TemplateValue::List(items) => join_list(items),
        TemplateValue::Number(_) | TemplateValue::Bool(_) | TemplateValue::Null => None,
    };

    resolved
        .map(NormalizedTemplate::new)
        .ok_or_else(|| UnresolvableTemplate {
            shape: template.clone(),
        })
}

/// Rules 2 to 5 for a mapping.
fn resolve_mapping(map: &TemplateMap) -> Option<String> {
    let from_chat = CHAT_KEYS.iter().find_map(|key| match map.get(key) {
        Some(TemplateValue::ChatMessages(messages)) => flatten_chat(messages),
        _ => None,
    });
    if from_chat.is_some() {
        return from_chat;
    }

    for key in PRIORITY_KEYS {
        match map.get(key) {
            Some(TemplateValue::Text(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(TemplateValue::Mapping(nested)) => {
                if let Some(s) = NESTED_KEYS.iter().find_map(|k| non_empty_text(nested.get(k))) {
                    return Some(s);
                }
            }
            _ => {}
        }
    }

    warn!("no standard template key found, scanning all fields");
    map.iter().find_map(|(key, value)| match value {
        TemplateValue::Text(s) if s.chars().count() > MIN_FALLBACK_CHARS => {
            debug!("using text of field '{key}' as template");
            Some(s.clone())
        }
        _ => None,
    })
}

fn non_empty_text(value: Option<&TemplateValue>) -> Option<String> {
    match value {
        Some(TemplateValue::Text(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Flatten chat messages as `[ROLE]: content` blocks separated by a blank line.
///
/// Messages without content are skipped. Returns `None` when nothing is left.
fn flatten_chat(messages: &[ChatMessage]) -> Option<String> {
    let blocks: Vec<String> = messages
        .iter()
        .filter_map(|m| {
            let content = m.content.as_deref()?;
            let role = m.role.as_deref().unwrap_or(UNKNOWN_ROLE);
            Some(format!("[{}]: {content}", role.to_uppercase()))
        })
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

/// Join textual list elements with single spaces.
///
/// Fails on an empty list or on any element without a plain text form.
fn join_list(items: &[TemplateValue]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let parts = items
        .iter()
        .map(|item| match item {
            TemplateValue::Text(s) => Some(s.clone()),
            TemplateValue::Number(n) => Some(n.to_string()),
            TemplateValue::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(" "))
}
