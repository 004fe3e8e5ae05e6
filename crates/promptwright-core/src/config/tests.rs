use super::*;
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.remote.app_slug, "Prompt-Writer");
    assert_eq!(cfg.remote.environment_slug, "development");
    assert_eq!(cfg.remote.prompt_key, "prompt");
    assert_eq!(cfg.remote.timeout_secs, 30);
    assert_eq!(cfg.remote.mode, RemoteMode::Render);
    assert_eq!(cfg.prompt.input_label, "User Idea: ");
    assert_eq!(cfg.prompt.min_input_chars, 0);
    assert!(cfg.health.enabled);
    assert_eq!(cfg.health.port, 10000);
    assert!(cfg.channel.telegram.is_none());
    assert!(cfg.messages.working.contains("پرامپت"));
}

#[test]
fn test_empty_toml_uses_defaults() {
    let cfg = parse("").unwrap();
    assert_eq!(cfg.bot.name, "Promptwright");
    assert_eq!(cfg.health.host, "0.0.0.0");
}

#[test]
fn test_parse_full_config() {
    let cfg = parse(
        r#"
        [bot]
        log_level = "debug"
        log_dir = "/var/log/promptwright"

        [channel.telegram]
        enabled = true
        bot_token = "123:abc"
        allowed_users = [42, 7]

        [remote]
        host = "http://localhost:3000"
        api_key = "ak-1"
        app_slug = "writer"
        environment_slug = "production"
        mode = "run"

        [remote.run_inputs]
        language = "en"

        [prompt]
        input_label = "Idea: "
        min_input_chars = 5

        [health]
        enabled = false
        port = 8080

        [messages]
        start = "hello"
    "#,
    )
    .unwrap();

    assert_eq!(cfg.bot.log_dir.as_deref(), Some("/var/log/promptwright"));
    let tg = cfg.channel.telegram.as_ref().unwrap();
    assert_eq!(tg.allowed_users, vec![42, 7]);
    assert_eq!(cfg.remote.mode, RemoteMode::Run);
    assert_eq!(cfg.remote.run_inputs.len(), 1);
    assert_eq!(cfg.remote.run_input_key, "user_request");
    assert_eq!(cfg.prompt.min_input_chars, 5);
    assert!(!cfg.health.enabled);
    assert_eq!(cfg.health.port, 8080);
    assert_eq!(cfg.messages.start, "hello");
    // Unset message keys keep their defaults.
    assert!(!cfg.messages.help.is_empty());
}

#[test]
fn test_parse_invalid_mode_fails() {
    let err = parse("[remote]\nmode = \"stream\"").unwrap_err();
    assert!(matches!(err, PromptError::Config(_)));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let (cfg, source) = load("/nonexistent/__promptwright_test__/config.toml").unwrap();
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(cfg.remote.app_slug, "Prompt-Writer");
}

#[test]
fn test_load_from_file() {
    let tmp = std::env::temp_dir().join("__promptwright_test_load__");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("config.toml");
    std::fs::write(&path, "[remote]\napp_slug = \"from-file\"\n").unwrap();

    let (cfg, source) = load(path.to_str().unwrap()).unwrap();
    assert_eq!(source, ConfigSource::File);
    assert_eq!(cfg.remote.app_slug, "from-file");

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_env_overrides() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[
        ("BOT_TOKEN", "999:xyz"),
        ("AGENTA_API_KEY", "key"),
        ("AGENTA_HOST", "http://agenta.local"),
        ("AGENTA_ENVIRONMENT", "staging"),
        ("PORT", "8081"),
    ]))
    .unwrap();

    let tg = cfg.channel.telegram.as_ref().unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "999:xyz");
    assert_eq!(cfg.remote.api_key, "key");
    assert_eq!(cfg.remote.host, "http://agenta.local");
    assert_eq!(cfg.remote.environment_slug, "staging");
    assert_eq!(cfg.remote.app_slug, "Prompt-Writer");
    assert_eq!(cfg.health.port, 8081);
}

#[test]
fn test_env_telegram_token_alias_and_disabled_channel_kept() {
    let mut cfg = Config::default();
    cfg.channel.telegram = Some(TelegramConfig {
        enabled: false,
        bot_token: String::new(),
        allowed_users: vec![1],
    });
    cfg.apply_env(env(&[("TELEGRAM_BOT_TOKEN", "t")])).unwrap();
    let tg = cfg.channel.telegram.as_ref().unwrap();
    assert_eq!(tg.bot_token, "t");
    assert!(!tg.enabled, "env token must not flip an explicit enabled = false");
    assert_eq!(tg.allowed_users, vec![1]);
}

#[test]
fn test_env_empty_values_ignored() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[("AGENTA_HOST", "  "), ("BOT_TOKEN", "")]))
        .unwrap();
    assert_eq!(cfg.remote.host, "https://cloud.agenta.ai");
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_env_invalid_port() {
    let mut cfg = Config::default();
    let err = cfg.apply_env(env(&[("PORT", "http")])).unwrap_err();
    assert!(err.to_string().contains("invalid PORT"));
}

#[test]
fn test_validate() {
    let mut cfg = Config::default();
    assert!(cfg.validate().is_err(), "missing api key");

    cfg.remote.api_key = "key".into();
    assert!(cfg.validate().is_ok());

    cfg.channel.telegram = Some(TelegramConfig {
        enabled: true,
        ..Default::default()
    });
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("bot_token"));
}
