use super::*;
use serde_json::json;

fn value(json: serde_json::Value) -> TemplateValue {
    TemplateValue::from(json)
}

fn normalized(json: serde_json::Value) -> String {
    normalize(&value(json)).unwrap().into_string()
}

// --- Classification ---

#[test]
fn test_classify_chat_list() {
    let v = value(json!([{"role": "system", "content": "hi"}, {"content": "no role"}]));
    match v {
        TemplateValue::ChatMessages(messages) => {
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].role.as_deref(), Some("system"));
            assert!(messages[1].role.is_none());
        }
        other => panic!("expected chat messages, got {other:?}"),
    }
}

#[test]
fn test_classify_generic_list() {
    assert!(matches!(value(json!(["a", 1])), TemplateValue::List(_)));
    assert!(matches!(value(json!([])), TemplateValue::List(_)));
    assert!(matches!(
        value(json!([{"role": "user", "content": "a"}, "b"])),
        TemplateValue::List(_)
    ));
}

#[test]
fn test_classify_chat_with_non_string_fields() {
    let v = value(json!([
        {"role": "user", "content": 3},
        {"role": 7, "content": "x"},
        {"role": "assistant", "content": null}
    ]));
    let TemplateValue::ChatMessages(messages) = v else {
        panic!("expected chat messages");
    };
    assert_eq!(messages[0].content, None);
    assert_eq!(messages[1].role, None);
    assert_eq!(messages[1].content.as_deref(), Some("x"));
    assert_eq!(messages[2].content, None);
}

#[test]
fn test_mapping_keeps_key_order() {
    let v = value(json!({"z": 1, "a": 2, "m": 3}));
    let TemplateValue::Mapping(map) = v else {
        panic!("expected mapping");
    };
    let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_deserialize_from_json_text() {
    let v: TemplateValue = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
    assert_eq!(v.kind(), "mapping");
    assert_eq!(serde_json::to_value(&v).unwrap(), json!({"text": "hello"}));
}

// --- Rule 1: plain text ---

#[test]
fn test_normalize_text_is_identity() {
    for s in ["", "plain", "Idea: {{user_idea}}", "  padded  ", "ایده"] {
        assert_eq!(normalize(&TemplateValue::from(s)).unwrap().as_str(), s);
    }
}

// --- Rule 2: chat format ---

#[test]
fn test_normalize_chat_messages_under_messages_key() {
    let out = normalized(json!({
        "messages": [
            {"role": "system", "content": "You are helpful"},
            {"role": "user", "content": "Idea: {{x}}"}
        ]
    }));
    assert_eq!(out, "[SYSTEM]: You are helpful\n\n[USER]: Idea: {{x}}");
}

#[test]
fn test_normalize_chat_messages_under_chat_key() {
    let out = normalized(json!({
        "chat": [
            {"role": "system", "content": "Be brief"},
            {"role": "user", "content": "{{idea}}"}
        ]
    }));
    assert_eq!(out, "[SYSTEM]: Be brief\n\n[USER]: {{idea}}");
}

#[test]
fn test_normalize_chat_skips_null_content() {
    let out = normalized(json!({
        "messages": [
            {"role": "system", "content": "You are helpful"},
            {"role": "assistant", "content": null}
        ]
    }));
    assert_eq!(out, "[SYSTEM]: You are helpful");
}

#[test]
fn test_normalize_chat_skips_parts_array_content() {
    let out = normalized(json!({
        "messages": [
            {"role": "user", "content": [{"type": "text", "text": "parts"}]},
            {"role": 1, "content": "Idea: {{x}}"}
        ]
    }));
    assert_eq!(out, "[UNKNOWN]: Idea: {{x}}");
}

#[test]
fn test_normalize_chat_skips_missing_content_and_defaults_role() {
    let out = normalized(json!({
        "messages": [
            {"role": "system"},
            {"content": "orphan"},
            {"role": "assistant", "content": "last"}
        ]
    }));
    assert_eq!(out, "[UNKNOWN]: orphan\n\n[ASSISTANT]: last");
}

#[test]
fn test_normalize_chat_beats_priority_keys() {
    let out = normalized(json!({
        "text": "ignored",
        "messages": [{"role": "user", "content": "from chat"}]
    }));
    assert_eq!(out, "[USER]: from chat");
}

#[test]
fn test_normalize_chat_without_content_falls_through() {
    let out = normalized(json!({
        "messages": [{"role": "system"}],
        "template": "fallback template"
    }));
    assert_eq!(out, "fallback template");
}

#[test]
fn test_normalize_top_level_chat_list() {
    let out = normalized(json!([
        {"role": "system", "content": "a"},
        {"role": "user", "content": "b"}
    ]));
    assert_eq!(out, "[SYSTEM]: a\n\n[USER]: b");
}

#[test]
fn test_normalize_chat_preserves_content_order() {
    let contents = ["one", "two", "three", "four"];
    let messages: Vec<_> = contents
        .iter()
        .map(|c| json!({"role": "user", "content": c}))
        .collect();
    let out = normalized(json!({ "messages": messages }));
    let mut last = 0;
    for c in contents {
        let pos = out[last..].find(&format!("[USER]: {c}")).unwrap() + last;
        assert!(pos >= last);
        last = pos;
    }
}

// --- Rules 3 and 4: priority keys ---

#[test]
fn test_normalize_text_key_wins_over_fallback() {
    let out = normalized(json!({
        "description": "a very long description that is not the template",
        "text": "hello",
        "id": "abc"
    }));
    assert_eq!(out, "hello");
}

#[test]
fn test_normalize_priority_order() {
    let out = normalized(json!({"user": "u-value", "en": "english", "body": "body"}));
    assert_eq!(out, "english");
}

#[test]
fn test_normalize_skips_empty_priority_value() {
    let out = normalized(json!({"text": "  ", "template": "real"}));
    assert_eq!(out, "real");
}

#[test]
fn test_normalize_nested_mapping() {
    let out = normalized(json!({"text": {"fa": "ایده: {{user_idea}}"}}));
    assert_eq!(out, "ایده: {{user_idea}}");
}

#[test]
fn test_normalize_nested_key_order() {
    let out = normalized(json!({"prompt": {"content": "c", "en": "e"}}));
    assert_eq!(out, "e");
}

#[test]
fn test_normalize_nested_miss_moves_to_next_priority_key() {
    let out = normalized(json!({"text": {"id": 1}, "body": "body wins"}));
    assert_eq!(out, "body wins");
}

// --- Rule 5: fallback scan ---

#[test]
fn test_normalize_fallback_long_value() {
    let out = normalized(json!({"x": "a short value exceeding ten chars"}));
    assert_eq!(out, "a short value exceeding ten chars");
}

#[test]
fn test_normalize_fallback_takes_first_long_value() {
    let out = normalized(json!({
        "id": "abc",
        "first": "first long enough value",
        "second": "second long enough value"
    }));
    assert_eq!(out, "first long enough value");
}

#[test]
fn test_normalize_fallback_threshold_is_exclusive() {
    let exact = "x".repeat(MIN_FALLBACK_CHARS);
    let err = normalize(&value(json!({ "x": exact }))).unwrap_err();
    assert!(matches!(err.shape, TemplateValue::Mapping(_)));

    let longer = "x".repeat(MIN_FALLBACK_CHARS + 1);
    assert_eq!(normalized(json!({ "x": longer.clone() })), longer);
}

#[test]
fn test_normalize_fallback_counts_characters_not_bytes() {
    // Nine Persian letters are 18 bytes but still below the threshold.
    let short = "ابپتثجچحخ";
    assert!(normalize(&value(json!({ "x": short }))).is_err());
}

#[test]
fn test_normalize_all_short_values_fails() {
    let err = normalize(&value(json!({"a": "short", "b": "tiny"}))).unwrap_err();
    assert_eq!(err.shape, value(json!({"a": "short", "b": "tiny"})));
}

// --- Rule 6: generic lists ---

#[test]
fn test_normalize_list_joins_with_space() {
    assert_eq!(normalized(json!(["Write", "about", 3, true])), "Write about 3 true");
}

#[test]
fn test_normalize_list_with_unconvertible_element_fails() {
    assert!(normalize(&value(json!(["a", {"k": "v"}]))).is_err());
    assert!(normalize(&value(json!(["a", null]))).is_err());
    assert!(normalize(&value(json!(["a", ["b"]]))).is_err());
}

#[test]
fn test_normalize_empty_list_fails() {
    assert!(normalize(&value(json!([]))).is_err());
}

// --- Rule 7: failure ---

#[test]
fn test_normalize_scalar_mapping_fails() {
    let err = normalize(&value(json!({"id": 5, "flag": true}))).unwrap_err();
    assert_eq!(err.shape, value(json!({"id": 5, "flag": true})));
    let msg = err.to_string();
    assert!(msg.contains("cannot be converted"));
    assert!(msg.contains("\"flag\":true"));
}

#[test]
fn test_normalize_scalars_fail() {
    for v in [json!(null), json!(42), json!(false)] {
        assert!(normalize(&value(v)).is_err());
    }
}

#[test]
fn test_unresolvable_message_truncates_shape() {
    let big: Vec<i64> = (0..500).collect();
    let err = normalize(&value(json!({ "numbers": big }))).unwrap_err();
    assert!(err.to_string().ends_with("...)"));
}

// --- Rendering ---

#[test]
fn test_render_replaces_every_placeholder() {
    let t = NormalizedTemplate::new("A {{a}} B {{b}} C {{}}");
    let out = render(&t, "cats");
    assert_eq!(out.as_str(), "A cats B cats C cats");
    assert!(!out.as_str().contains("{{"));
    assert_eq!(out.as_str().matches("cats").count(), 3);
}

#[test]
fn test_render_is_non_greedy() {
    let t = NormalizedTemplate::new("{{x}} and {{y}}");
    assert_eq!(render(&t, "u").as_str(), "u and u");
}

#[test]
fn test_render_input_is_literal() {
    let t = NormalizedTemplate::new("cost: {{x}}");
    assert_eq!(render(&t, "$1 and ${x}").as_str(), "cost: $1 and ${x}");
}

#[test]
fn test_render_without_placeholder_appends_input() {
    let t = NormalizedTemplate::new("Write a poem");
    let out = render(&t, "about rain");
    assert_eq!(out.as_str(), "Write a poem\n\nUser Idea: about rain");
    assert!(out.as_str().starts_with("Write a poem"));
    assert!(out.as_str().ends_with("about rain"));
}

#[test]
fn test_render_with_custom_label() {
    let t = NormalizedTemplate::new("Template");
    let out = render_with_label(&t, "x", "ایده کاربر: ");
    assert_eq!(out.as_str(), "Template\n\nایده کاربر: x");
}

#[test]
fn test_render_single_brace_is_not_placeholder() {
    let t = NormalizedTemplate::new("json {like: this}");
    assert!(render(&t, "u").as_str().ends_with("User Idea: u"));
}

// --- End to end ---

#[test]
fn test_nested_persian_template_end_to_end() {
    let t = normalize(&value(json!({"text": {"fa": "ایده: {{user_idea}}"}}))).unwrap();
    assert_eq!(t.as_str(), "ایده: {{user_idea}}");
    assert_eq!(render(&t, "گربه‌ها").as_str(), "ایده: گربه‌ها");
}

#[test]
fn test_chat_template_end_to_end() {
    let t = normalize(&value(json!({
        "messages": [
            {"role": "system", "content": "You are helpful"},
            {"role": "user", "content": "Idea: {{x}}"}
        ]
    })))
    .unwrap();
    assert_eq!(
        render(&t, "cats").as_str(),
        "[SYSTEM]: You are helpful\n\n[USER]: Idea: cats"
    );
}
