//! Prompt rendering: substitute the user's text into a normalized template.

use super::{NormalizedTemplate, RenderedPrompt};
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

/// Label placed before the user's text when the template has no placeholder.
pub const DEFAULT_INPUT_LABEL: &str = "User Idea: ";

/// Any `{{...}}` token, shortest match.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").expect("Invalid placeholder regex"));

/// Render with the default input label.
pub fn render(template: &NormalizedTemplate, input: &str) -> RenderedPrompt {
    render_with_label(template, input, DEFAULT_INPUT_LABEL)
}

/// Replace every placeholder with `input`, whatever its name.
///
/// Only one user-supplied value exists, so all placeholders receive it.
/// Without placeholders the input is appended after a blank line and `label`.
pub fn render_with_label(template: &NormalizedTemplate, input: &str, label: &str) -> RenderedPrompt {
    let text = template.as_str();
    if PLACEHOLDER_REGEX.is_match(text) {
        RenderedPrompt(PLACEHOLDER_REGEX.replace_all(text, NoExpand(input)).into_owned())
    } else {
        RenderedPrompt(format!("{text}\n\n{label}{input}"))
    }
}
