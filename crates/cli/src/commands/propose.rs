use std::path::Path;

use nouns_core::{CreateProposalResult, PreparedProposal, prepare_proposal};
use tracing::info;

use crate::{config::load_proposal_draft, provider::AppContext};

pub enum ProposeOutcome {
    DryRun(PreparedProposal),
    Submitted(CreateProposalResult),
}

pub async fn propose(ctx: &AppContext, draft: &Path, dry_run: bool) -> eyre::Result<ProposeOutcome> {
    let draft = load_proposal_draft(draft)?;

    let signer = ctx.signer()?;
    let reader = ctx.reader()?;
    let session = ctx.wallet.active_session(&signer, &reader).await?;
    let voting_power = reader.voting_power(signer.address(), None).await?;

    let prepared = prepare_proposal(&draft, &session, voting_power)?;
    info!(actions = prepared.targets.len(), %voting_power, "proposal prepared");

    if dry_run {
        return Ok(ProposeOutcome::DryRun(prepared));
    }

    let submitter = ctx.submitter(&signer)?;
    Ok(ProposeOutcome::Submitted(submitter.create_proposal(prepared).await?))
}
