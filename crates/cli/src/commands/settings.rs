use std::fmt;

use nouns_core::{
    ConnectionStatus, EndpointConfig, EndpointUpdate, NotificationSettings, Profile, ThemeMode,
    ThemeVariant, probe_indexer, probe_rpc,
};

use crate::{provider::AppContext, theme::system_prefers_dark};

pub struct SettingsOutput {
    pub endpoints: EndpointConfig,
    pub overridden: (bool, bool),
    pub theme_mode: ThemeMode,
    pub theme_variant: ThemeVariant,
    pub dark: bool,
    pub profile: Profile,
    pub notifications: NotificationSettings,
    pub store: String,
}

pub fn show(ctx: &AppContext) -> SettingsOutput {
    let theme_mode = ctx.preferences.theme_mode();
    SettingsOutput {
        endpoints: ctx.endpoints.get(),
        overridden: ctx.endpoints.is_overridden(),
        theme_mode,
        theme_variant: ctx.preferences.theme_variant(),
        dark: matches!(
            theme_mode.resolve(system_prefers_dark()),
            nouns_core::AppliedMode::Dark
        ),
        profile: ctx.preferences.profile(),
        notifications: ctx.preferences.notifications(),
        store: ctx.store_path().display().to_string(),
    }
}

/// `Some("")` clears an override.
pub fn set_endpoints(
    ctx: &AppContext,
    rpc_url: Option<String>,
    graph_api: Option<String>,
) -> eyre::Result<EndpointConfig> {
    ctx.endpoints.set(EndpointUpdate {
        chain_rpc_url: rpc_url,
        indexer_url: graph_api,
    })?;
    Ok(ctx.endpoints.get())
}

pub fn reset_endpoints(ctx: &AppContext) -> eyre::Result<EndpointConfig> {
    ctx.endpoints.reset()?;
    Ok(ctx.endpoints.get())
}

pub struct ProbeOutput {
    pub rpc: ConnectionStatus,
    pub indexer: ConnectionStatus,
}

pub async fn test_connections(ctx: &AppContext) -> ProbeOutput {
    let endpoints = ctx.endpoints.get();
    let (rpc, indexer) = tokio::join!(
        probe_rpc(&endpoints.chain_rpc_url),
        probe_indexer(&endpoints.indexer_url)
    );
    ProbeOutput { rpc, indexer }
}

pub fn set_theme(
    ctx: &AppContext,
    mode: Option<ThemeMode>,
    variant: Option<ThemeVariant>,
) -> eyre::Result<()> {
    if let Some(mode) = mode {
        ctx.preferences.set_theme_mode(mode)?;
    }
    if let Some(variant) = variant {
        ctx.preferences.set_theme_variant(variant)?;
    }
    Ok(())
}

/// Fields left as `None` keep their stored value.
pub fn update_profile(
    ctx: &AppContext,
    display_name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
) -> eyre::Result<Profile> {
    let mut profile = ctx.preferences.profile();
    if let Some(display_name) = display_name {
        profile.display_name = display_name;
    }
    if let Some(email) = email {
        profile.email = email;
    }
    if let Some(bio) = bio {
        profile.bio = bio;
    }
    ctx.preferences.save_profile(&profile)?;
    Ok(profile)
}

pub fn update_notifications(
    ctx: &AppContext,
    update: impl FnOnce(&mut NotificationSettings),
) -> eyre::Result<NotificationSettings> {
    let mut settings = ctx.preferences.notifications();
    update(&mut settings);
    ctx.preferences.save_notifications(&settings)?;
    Ok(settings)
}

fn origin(overridden: bool) -> &'static str {
    if overridden { "custom" } else { "default" }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

impl fmt::Display for SettingsOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network")?;
        writeln!(
            f,
            "  ethereum rpc    {} ({})",
            self.endpoints.chain_rpc_url,
            origin(self.overridden.0)
        )?;
        writeln!(
            f,
            "  graph api       {} ({})",
            self.endpoints.indexer_url,
            origin(self.overridden.1)
        )?;

        writeln!(f, "Appearance")?;
        let applied = if self.dark { "dark" } else { "light" };
        writeln!(f, "  mode            {} ({applied})", self.theme_mode)?;
        writeln!(f, "  variant         {}", self.theme_variant)?;

        writeln!(f, "Profile")?;
        writeln!(f, "  display name    {}", self.profile.display_name)?;
        writeln!(f, "  email           {}", self.profile.email)?;
        writeln!(f, "  bio             {}", self.profile.bio)?;

        let n = &self.notifications;
        writeln!(f, "Notifications")?;
        writeln!(f, "  auction updates {}", on_off(n.auction_updates))?;
        writeln!(f, "  proposal alerts {}", on_off(n.proposal_alerts))?;
        writeln!(f, "  community news  {}", on_off(n.community_news))?;
        writeln!(f, "  price alerts    {}", on_off(n.price_alerts))?;

        write!(f, "Stored in {}", self.store)
    }
}

impl fmt::Display for ProbeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ethereum rpc    {}", self.rpc)?;
        write!(f, "graph api       {}", self.indexer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NounsConfig;

    fn context(dir: &tempfile::TempDir) -> AppContext {
        AppContext::new(
            &NounsConfig::default(),
            dir.path().join("storage.json"),
            EndpointConfig::builtin(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn endpoint_overrides_survive_a_new_context() {
        let dir = tempfile::tempdir().unwrap();
        set_endpoints(&context(&dir), Some("http://localhost:8545".into()), None).unwrap();

        let reopened = show(&context(&dir));
        assert_eq!(reopened.endpoints.chain_rpc_url, "http://localhost:8545");
        assert_eq!(reopened.overridden, (true, false));

        let reset = reset_endpoints(&context(&dir)).unwrap();
        assert_eq!(reset, EndpointConfig::builtin());
    }

    #[test]
    fn partial_profile_updates_keep_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        update_profile(&ctx, Some("noun40".into()), Some("a@b.c".into()), None).unwrap();
        let profile = update_profile(&ctx, None, None, Some("hi".into())).unwrap();

        assert_eq!(profile.display_name, "noun40");
        assert_eq!(profile.email, "a@b.c");
        assert_eq!(profile.bio, "hi");
    }
}
