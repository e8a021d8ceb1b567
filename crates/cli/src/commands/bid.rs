use nouns_core::{PlaceBidResult, validate_bid};
use tracing::info;

use crate::{
    commands::auction::{load_auction, view_of},
    provider::AppContext,
};

/// Validates `amount` (ETH) against the live auction and submits it.
pub async fn place_bid(ctx: &AppContext, amount: &str) -> eyre::Result<PlaceBidResult> {
    let signer = ctx.signer()?;
    let reader = ctx.reader()?;
    let session = ctx.wallet.active_session(&signer, &reader).await?;

    let inputs = load_auction(ctx).await;
    let view = view_of(ctx, &inputs);
    let balance = reader.balance(signer.address()).await?;

    let input = validate_bid(amount, &view, &session, balance)?;
    info!(noun_id = %input.noun_id, amount = %input.amount.display(4), "submitting bid");

    let submitter = ctx.submitter(&signer)?;
    Ok(submitter.place_bid(input).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nouns_core::{EndpointConfig, Error, ValidationError};

    use crate::{commands::wallet, config::NounsConfig};

    // anvil's first dev account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn context(dir: &tempfile::TempDir) -> AppContext {
        AppContext::new(
            &NounsConfig::default(),
            dir.path().join("storage.json"),
            EndpointConfig::with_overrides(Some("http://127.0.0.1:9".into()), None),
            Some(DEV_KEY.to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn bidding_after_disconnect_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        wallet::disconnect(&ctx).unwrap();

        let err = place_bid(&ctx, "1.5").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Validation(ValidationError::WalletNotConnected))
        ));
        assert!(!ctx.wallet.load().is_connected);
    }
}
