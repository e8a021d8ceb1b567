use std::fmt;

use nouns_core::{
    BlockEstimate, ProposalView, StatusFilter, derive_proposal_views, filter_views,
};
use tracing::warn;

use crate::provider::AppContext;

pub struct ProposalsOutput {
    pub views: Vec<ProposalView>,
    pub filter: StatusFilter,
    pub current_block: u64,
}

/// Fetches proposals and one block reading, then derives the display rows.
pub async fn proposals(
    ctx: &AppContext,
    first: u32,
    filter: StatusFilter,
) -> eyre::Result<ProposalsOutput> {
    let records = ctx.indexer().proposals(first).await?;

    let mut estimate = BlockEstimate::new();
    match ctx.reader() {
        Ok(reader) => match reader.current_block().await {
            Ok(block) => estimate.poll_success(block),
            Err(err) => warn!(%err, "current block unavailable"),
        },
        Err(err) => warn!(%err, "current block unavailable"),
    }

    Ok(ProposalsOutput {
        views: derive_proposal_views(records, estimate.value()),
        filter,
        current_block: estimate.value(),
    })
}

pub fn proposal_line(view: &ProposalView) -> String {
    let record = &view.record;
    let title = if record.title.is_empty() {
        "(untitled)"
    } else {
        record.title.as_str()
    };
    format!(
        "#{:<5} {:<8} {:<40}  for {} / against {} / abstain {}  {}",
        record.id.to_string(),
        view.collapsed.to_string(),
        title,
        record.for_votes,
        record.against_votes,
        record.abstain_votes,
        view.time_remaining,
    )
}

impl fmt::Display for ProposalsOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = filter_views(&self.views, self.filter);
        if shown.is_empty() {
            return writeln!(f, "No proposals match");
        }

        for view in shown {
            writeln!(f, "{}", proposal_line(view))?;
        }

        if self.current_block == 0 {
            writeln!(f, "(block unknown, time remaining unavailable)")?;
        }
        Ok(())
    }
}
