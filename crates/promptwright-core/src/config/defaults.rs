//! Serde default functions for config fields.

use std::collections::HashMap;

pub(super) fn default_true() -> bool {
    true
}
pub(super) fn default_name() -> String {
    "Promptwright".into()
}
pub(super) fn default_log_level() -> String {
    "info".into()
}
pub(super) fn default_remote_host() -> String {
    "https://cloud.agenta.ai".into()
}
pub(super) fn default_app_slug() -> String {
    "Prompt-Writer".into()
}
pub(super) fn default_environment_slug() -> String {
    "development".into()
}
pub(super) fn default_prompt_key() -> String {
    "prompt".into()
}
pub(super) fn default_timeout_secs() -> u64 {
    30
}
pub(super) fn default_run_input_key() -> String {
    "user_request".into()
}
pub(super) fn default_run_inputs() -> HashMap<String, String> {
    HashMap::from([
        ("language".to_string(), "fa".to_string()),
        ("role".to_string(), "prompt_engineer".to_string()),
    ])
}
pub(super) fn default_input_label() -> String {
    "User Idea: ".into()
}
pub(super) fn default_health_host() -> String {
    "0.0.0.0".into()
}
pub(super) fn default_health_port() -> u16 {
    10000
}
pub(super) fn default_start_message() -> String {
    "\u{1f916} سلام!\nایده‌ات رو بفرست تا برات پرامپت حرفه‌ای بسازم.".into()
}
pub(super) fn default_help_message() -> String {
    "\u{1f9e0} راهنما:\n\n\
     - فقط کافیه توضیح بدی چی می‌خوای\n\
     - من اون رو به یک پرامپت استاندارد و بهینه تبدیل می‌کنم\n\n\
     مثال:\n\
     «یه پرامپت برای تولید پست اینستاگرام درباره هوش مصنوعی»"
        .into()
}
pub(super) fn default_working_message() -> String {
    "\u{23f3} در حال ساخت پرامپت...".into()
}
pub(super) fn default_ready_prefix() -> String {
    "\u{1f9e0} پرامپت آماده:\n\n".into()
}
pub(super) fn default_error_prefix() -> String {
    "\u{274c} خطا در ساخت پرامپت:\n".into()
}
pub(super) fn default_too_short_message() -> String {
    "\u{2757} لطفاً توضیح کامل‌تری وارد کن.".into()
}
