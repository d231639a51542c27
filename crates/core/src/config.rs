use crate::store::Screen;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

pub const DEFAULT_SPEECH_LANG: &str = "ko";
pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const ENV_API_KEY: &str = "HEARTSTAR_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "OPENAI_API_KEY";
pub const ENV_CHILD_NAME: &str = "HEARTSTAR_CHILD_NAME";
pub const ENV_SPEECH_LANG: &str = "HEARTSTAR_LANG";
pub const ENV_VOICE: &str = "HEARTSTAR_VOICE";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechLang(pub String);

impl SpeechLang {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptySpeechLang);
        }
        Ok(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SpeechLang {
    fn default() -> Self {
        Self(DEFAULT_SPEECH_LANG.to_owned())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceId(pub String);

impl VoiceId {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyVoice);
        }
        Ok(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self(DEFAULT_VOICE.to_owned())
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

/// Point awards per event. The source revisions disagree on the exact
/// amounts, so they are configuration rather than hard-coded behavior.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardConfig {
    pub correct_choice: u64,
    pub empathetic: u64,
    pub indifferent: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            correct_choice: 3,
            empathetic: 5,
            indifferent: 1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnlockTier {
    pub threshold: u64,
    pub item: String,
}

impl UnlockTier {
    fn new(threshold: u64, item: &str) -> Self {
        Self {
            threshold,
            item: item.to_owned(),
        }
    }
}

/// Cosmetic unlock thresholds per decoration screen. Purely presentational
/// gating; nothing is enforced beyond hiding the item label.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnlockConfig {
    pub sky: Vec<UnlockTier>,
    pub room: Vec<UnlockTier>,
}

impl UnlockConfig {
    pub fn tiers(&self, screen: Screen) -> &[UnlockTier] {
        match screen {
            Screen::Sky => &self.sky,
            Screen::Room => &self.room,
        }
    }
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            sky: vec![
                UnlockTier::new(10, "구름"),
                UnlockTier::new(20, "무지개"),
                UnlockTier::new(30, "별"),
                UnlockTier::new(40, "집"),
                UnlockTier::new(50, "나무"),
            ],
            room: vec![
                UnlockTier::new(5, "의자"),
                UnlockTier::new(10, "침대"),
                UnlockTier::new(15, "커튼"),
                UnlockTier::new(20, "책장"),
                UnlockTier::new(30, "케이크"),
                UnlockTier::new(40, "인형"),
            ],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub child_name: Option<String>,
    pub speech_lang: SpeechLang,
    pub voice: VoiceId,
    pub api_key: Option<ApiKey>,
    pub rewards: RewardConfig,
    pub unlocks: UnlockConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            child_name: None,
            speech_lang: SpeechLang::default(),
            voice: VoiceId::default(),
            api_key: None,
            rewards: RewardConfig::default(),
            unlocks: UnlockConfig::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("speech language must not be empty")]
    EmptySpeechLang,
    #[error("voice must not be empty")]
    EmptyVoice,
    #[error("api key must not be empty")]
    EmptyApiKey,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// CLI value wins over `HEARTSTAR_API_KEY`, which wins over the provider's
/// conventional variable name.
pub fn resolve_api_key(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(ApiKey::new(v)?)),
        None => match env.var(ENV_API_KEY).or_else(|| env.var(ENV_API_KEY_FALLBACK)) {
            Some(v) => Ok(Some(ApiKey::new(v)?)),
            None => Ok(None),
        },
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_API_KEY, "env-key");
        let key = resolve_api_key(Some("cli-key".to_owned()), &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "cli-key");
    }

    #[test]
    fn api_key_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_API_KEY, "env-key");
        let key = resolve_api_key(None, &env).expect("valid key").expect("present");
        assert_eq!(key.expose(), "env-key");
    }

    #[test]
    fn api_key_falls_back_to_provider_env_var() {
        let env = MapEnv::default().with_var(ENV_API_KEY_FALLBACK, "provider-key");
        let key = resolve_api_key(None, &env).expect("valid key").expect("present");
        assert_eq!(key.expose(), "provider-key");
    }

    #[test]
    fn api_key_absent_when_nothing_set() {
        let env = MapEnv::default();
        assert_eq!(resolve_api_key(None, &env), Ok(None));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret").expect("valid key");
        assert_eq!(format!("{key:?}"), "ApiKey(**redacted**)");
    }

    #[test]
    fn resolve_string_with_default_cli_takes_precedence() {
        let env = MapEnv::default().with_var(ENV_CHILD_NAME, "env");
        let v = resolve_string_with_default(Some("cli".to_owned()), ENV_CHILD_NAME, &env, "def");
        assert_eq!(v, "cli");
    }

    #[test]
    fn resolve_string_with_default_default_used_when_both_missing() {
        let env = MapEnv::default();
        let v = resolve_string_with_default(None, ENV_CHILD_NAME, &env, "def");
        assert_eq!(v, "def");
    }

    #[test]
    fn unlock_tiers_are_ordered_by_threshold() {
        let unlocks = UnlockConfig::default();
        for screen in [Screen::Sky, Screen::Room] {
            let tiers = unlocks.tiers(screen);
            assert!(tiers.windows(2).all(|w| w[0].threshold < w[1].threshold));
        }
    }
}
