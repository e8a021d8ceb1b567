use crate::{
    blocks::AVERAGE_BLOCK_SECONDS,
    types::{
        primitives::BlockNumber,
        proposal::{CollapsedStatus, ProposalRecord, StatusFilter},
    },
};

pub const NO_ESTIMATE_LABEL: &str = "—";
pub const ENDED_LABEL: &str = "Ended";

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalView {
    pub record: ProposalRecord,
    pub collapsed: CollapsedStatus,
    pub time_remaining: String,
}

/// Label for the time left until `end_block`, given the current block estimate.
///
/// An estimate of zero means no block has been observed yet.
pub fn time_remaining_label(estimate: u64, end_block: Option<BlockNumber>) -> String {
    let Some(end_block) = end_block else {
        return NO_ESTIMATE_LABEL.to_string();
    };
    if estimate == 0 {
        return NO_ESTIMATE_LABEL.to_string();
    }

    let blocks_left = end_block.as_u64().saturating_sub(estimate);
    if blocks_left == 0 {
        return ENDED_LABEL.to_string();
    }

    let seconds = blocks_left.saturating_mul(AVERAGE_BLOCK_SECONDS);
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn derive_proposal_view(record: ProposalRecord, estimate: u64) -> ProposalView {
    ProposalView {
        collapsed: record.status.collapse(),
        time_remaining: time_remaining_label(estimate, record.end_block),
        record,
    }
}

pub fn derive_proposal_views(
    records: impl IntoIterator<Item = ProposalRecord>,
    estimate: u64,
) -> Vec<ProposalView> {
    records
        .into_iter()
        .map(|record| derive_proposal_view(record, estimate))
        .collect()
}

/// Borrowed subset matching `filter`; the source list is left as is.
pub fn filter_views<'a>(views: &'a [ProposalView], filter: StatusFilter) -> Vec<&'a ProposalView> {
    views
        .iter()
        .filter(|view| filter.matches(&view.collapsed))
        .collect()
}
