//! Prompt templates: the remote value model, normalization, and rendering.
//!
//! The registry's template format is not fixed, so a fetched value is
//! classified once into [`TemplateValue`] and every later decision is a
//! `match` over that union.

mod normalize;
mod render;

#[cfg(test)]
mod tests;

pub use normalize::{
    normalize, UnresolvableTemplate, CHAT_KEYS, MIN_FALLBACK_CHARS, NESTED_KEYS, PRIORITY_KEYS,
};
pub use render::{render, render_with_label, DEFAULT_INPUT_LABEL};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A template value of unknown shape, as returned by the remote registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum TemplateValue {
    Text(String),
    Mapping(TemplateMap),
    /// Chat-style template: ordered role/content messages.
    ChatMessages(Vec<ChatMessage>),
    List(Vec<TemplateValue>),
    Number(Number),
    Bool(bool),
    Null,
}

/// One message of a chat-style template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

/// String-keyed mapping that keeps the registry's key order.
///
/// Keys are unique; order only matters for the fallback scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateMap {
    entries: Vec<(String, TemplateValue)>,
}

impl TemplateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any existing entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: TemplateValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, TemplateValue)> for TemplateMap {
    fn from_iter<I: IntoIterator<Item = (K, TemplateValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl TemplateValue {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Mapping(_) => "mapping",
            Self::ChatMessages(_) => "chat",
            Self::List(_) => "list",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }

    /// Convert back to JSON, e.g. for diagnostics.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Self::ChatMessages(messages) => Value::Array(
                messages
                    .iter()
                    .map(|m| {
                        let mut obj = Map::new();
                        if let Some(role) = &m.role {
                            obj.insert("role".into(), Value::String(role.clone()));
                        }
                        if let Some(content) = &m.content {
                            obj.insert("content".into(), Value::String(content.clone()));
                        }
                        Value::Object(obj)
                    })
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null => Value::Null,
        }
    }
}

/// Try to read a JSON array element as a chat message.
///
/// Any object with a `role` or `content` key qualifies. A value that is not
/// a string (null, a parts array) reads as absent, so the message is
/// skipped or shown with an unknown role.
fn chat_message(value: &Value) -> Option<ChatMessage> {
    let obj = value.as_object()?;
    if !obj.contains_key("role") && !obj.contains_key("content") {
        return None;
    }
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
    Some(ChatMessage {
        role: text("role"),
        content: text("content"),
    })
}

impl From<Value> for TemplateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Object(obj) => {
                Self::Mapping(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            Value::Array(items) => {
                let messages: Option<Vec<ChatMessage>> = if items.is_empty() {
                    None
                } else {
                    items.iter().map(chat_message).collect()
                };
                match messages {
                    Some(messages) => Self::ChatMessages(messages),
                    None => Self::List(items.into_iter().map(Self::from).collect()),
                }
            }
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Bool(b),
            Value::Null => Self::Null,
        }
    }
}

impl From<TemplateValue> for Value {
    fn from(value: TemplateValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A template reduced to a single string, possibly holding `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTemplate(String);

impl NormalizedTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final prompt text for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
