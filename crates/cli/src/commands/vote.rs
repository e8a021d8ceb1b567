use nouns_core::{CastVoteResult, ProposalId, ValidationError, VoteSupport, validate_vote};

use crate::provider::AppContext;

pub async fn vote(
    ctx: &AppContext,
    proposal_id: ProposalId,
    support: VoteSupport,
    reason: Option<&str>,
) -> eyre::Result<CastVoteResult> {
    let signer = ctx.signer()?;
    let reader = ctx.reader()?;
    let session = ctx.wallet.active_session(&signer, &reader).await?;

    let status = reader.proposal_state(proposal_id).await?;
    let input = validate_vote(&session, proposal_id, &status, support, reason)?;

    if reader.has_voted(proposal_id, signer.address()).await? {
        return Err(ValidationError::AlreadyVoted.into());
    }

    let submitter = ctx.submitter(&signer)?;
    Ok(submitter.cast_vote(input).await?)
}
