use std::fmt;

use nouns_core::WalletSession;

use crate::provider::AppContext;

pub struct WalletOutput(pub WalletSession);

pub async fn connect(ctx: &AppContext) -> eyre::Result<WalletOutput> {
    let signer = ctx.signer()?;
    let reader = ctx.reader()?;
    Ok(WalletOutput(ctx.wallet.connect(&signer, &reader).await?))
}

pub fn disconnect(ctx: &AppContext) -> eyre::Result<WalletOutput> {
    Ok(WalletOutput(ctx.wallet.disconnect()?))
}

/// The mirrored session, reconciled against the configured signer.
pub fn status(ctx: &AppContext) -> eyre::Result<WalletOutput> {
    let accounts = match ctx.signer() {
        Ok(signer) => signer.request_accounts()?,
        Err(_) => Vec::new(),
    };
    Ok(WalletOutput(ctx.wallet.accounts_changed(&accounts)?))
}

impl fmt::Display for WalletOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = &self.0;
        match (session.is_connected, session.address) {
            (true, Some(address)) => {
                writeln!(f, "Connected {address}")?;
                writeln!(f, "  balance  {} ETH", session.balance_display)?;
                if session.owned_token_ids.is_empty() {
                    write!(f, "  nouns    none")
                } else {
                    let ids = session
                        .owned_token_ids
                        .iter()
                        .map(|id| format!("#{id}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "  nouns    {ids}")
                }
            }
            _ => write!(f, "Not connected"),
        }
    }
}
