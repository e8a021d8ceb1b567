use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::store::{LocalStore, get_json, set_json};

pub const THEME_MODE_KEY: &str = "theme-mode";
pub const THEME_VARIANT_KEY: &str = "theme-variant";
pub const PROFILE_KEY: &str = "nounsProfile";
pub const NOTIFICATIONS_KEY: &str = "nounsNotifications";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Auto,
}

impl ThemeMode {
    /// Mode actually applied; `Auto` follows the system preference.
    pub fn resolve(self, system_prefers_dark: bool) -> AppliedMode {
        match self {
            Self::Light => AppliedMode::Light,
            Self::Dark => AppliedMode::Dark,
            Self::Auto if system_prefers_dark => AppliedMode::Dark,
            Self::Auto => AppliedMode::Light,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedMode {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Default,
    Neon,
    Warm,
    Cool,
}

impl ThemeVariant {
    fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Neon => "neon",
            Self::Warm => "warm",
            Self::Cool => "cool",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown theme mode {other:?}")),
        }
    }
}

impl FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "neon" => Ok(Self::Neon),
            "warm" => Ok(Self::Warm),
            "cool" => Ok(Self::Cool),
            other => Err(format!("unknown theme variant {other:?}")),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    pub bio: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub auction_updates: bool,
    pub proposal_alerts: bool,
    pub community_news: bool,
    pub price_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            auction_updates: true,
            proposal_alerts: true,
            community_news: false,
            price_alerts: false,
        }
    }
}

/// Theme, profile and notification preferences over a [`LocalStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn LocalStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.store
            .get(THEME_MODE_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), StoreError> {
        self.store.set(THEME_MODE_KEY, mode.as_str())
    }

    pub fn theme_variant(&self) -> ThemeVariant {
        self.store
            .get(THEME_VARIANT_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme_variant(&self, variant: ThemeVariant) -> Result<(), StoreError> {
        self.store.set(THEME_VARIANT_KEY, variant.as_str())
    }

    pub fn profile(&self) -> Profile {
        get_json(self.store.as_ref(), PROFILE_KEY).unwrap_or_default()
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), PROFILE_KEY, profile)
    }

    pub fn notifications(&self) -> NotificationSettings {
        get_json(self.store.as_ref(), NOTIFICATIONS_KEY).unwrap_or_default()
    }

    pub fn save_notifications(&self, settings: &NotificationSettings) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), NOTIFICATIONS_KEY, settings)
    }
}
