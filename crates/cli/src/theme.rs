use std::env;

use nouns_core::{AppliedMode, ThemeMode, ThemeVariant};
use ratatui::style::Color;

/// Terminal stand-in for the OS dark-mode preference: `COLORFGBG` ends in the
/// background color index, where 0-6 and 8 are dark.
pub fn system_prefers_dark() -> bool {
    env::var("COLORFGBG")
        .ok()
        .as_deref()
        .is_some_and(background_is_dark)
}

fn background_is_dark(colorfgbg: &str) -> bool {
    colorfgbg
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
}

impl Palette {
    pub fn resolve(mode: ThemeMode, variant: ThemeVariant) -> Self {
        let applied = mode.resolve(system_prefers_dark());
        Self::for_applied(applied, variant)
    }

    pub fn for_applied(applied: AppliedMode, variant: ThemeVariant) -> Self {
        let (background, text, muted) = match applied {
            AppliedMode::Light => (Color::White, Color::Black, Color::DarkGray),
            AppliedMode::Dark => (Color::Black, Color::White, Color::Gray),
        };

        let accent = match variant {
            ThemeVariant::Default => Color::Red,
            ThemeVariant::Neon => Color::LightMagenta,
            ThemeVariant::Warm => Color::Yellow,
            ThemeVariant::Cool => Color::Cyan,
        };

        Self {
            background,
            text,
            muted,
            accent,
            error: Color::LightRed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_background_index() {
        assert!(background_is_dark("15;0"));
        assert!(background_is_dark("7;default;8"));
        assert!(!background_is_dark("0;15"));
        assert!(!background_is_dark("garbage"));
    }

    #[test]
    fn variants_only_change_the_accent() {
        let neon = Palette::for_applied(AppliedMode::Dark, ThemeVariant::Neon);
        let cool = Palette::for_applied(AppliedMode::Dark, ThemeVariant::Cool);
        assert_eq!(neon.background, cool.background);
        assert_ne!(neon.accent, cool.accent);
    }
}
