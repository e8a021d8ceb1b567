use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};

use crate::{
    aggregate::AuctionView,
    error::ValidationError,
    types::{
        action::{CastVoteInput, PlaceBidInput, PreparedProposal, ProposalAction, ProposalDraft},
        primitives::{ProposalId, Wei},
        proposal::{ProposalStatus, VoteSupport},
        wallet::WalletSession,
    },
};

/// Checks a typed bid against the current auction view and the signer's balance.
pub fn validate_bid(
    amount: &str,
    view: &AuctionView,
    wallet: &WalletSession,
    balance: Wei,
) -> Result<PlaceBidInput, ValidationError> {
    if !wallet.is_connected {
        return Err(ValidationError::WalletNotConnected);
    }

    let noun_id = view.noun_id.ok_or(ValidationError::AuctionUnavailable)?;

    if view.is_ended || view.settled {
        return Err(ValidationError::AuctionEnded);
    }

    let amount = Wei::parse_ether(amount)
        .ok_or_else(|| ValidationError::InvalidAmount(amount.to_string()))?;

    if amount < view.minimum_next_bid {
        return Err(ValidationError::BidBelowMinimum {
            minimum: view.minimum_next_bid_display(),
        });
    }

    if amount > balance {
        return Err(ValidationError::InsufficientBalance);
    }

    Ok(PlaceBidInput { noun_id, amount })
}

pub fn validate_vote(
    wallet: &WalletSession,
    proposal_id: ProposalId,
    status: &ProposalStatus,
    support: VoteSupport,
    reason: Option<&str>,
) -> Result<CastVoteInput, ValidationError> {
    if !wallet.is_connected {
        return Err(ValidationError::WalletNotConnected);
    }

    if *status != ProposalStatus::Active {
        return Err(ValidationError::ProposalNotActive);
    }

    let reason = reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .map(str::to_string);

    Ok(CastVoteInput {
        proposal_id,
        support,
        reason,
    })
}

/// Turns a draft into `propose` arguments.
///
/// Actions missing a target or description are dropped, not rejected.
pub fn prepare_proposal(
    draft: &ProposalDraft,
    wallet: &WalletSession,
    voting_power: U256,
) -> Result<PreparedProposal, ValidationError> {
    if !wallet.is_connected {
        return Err(ValidationError::WalletNotConnected);
    }

    let title = draft.title.trim();
    let body = draft.description.trim();
    if title.is_empty() || body.is_empty() {
        return Err(ValidationError::EmptyProposalFields);
    }

    if voting_power.is_zero() {
        return Err(ValidationError::NoVotingPower);
    }

    let actions: Vec<&ProposalAction> = draft
        .actions
        .iter()
        .filter(|action| !action.target.trim().is_empty() && !action.description.trim().is_empty())
        .collect();

    if actions.is_empty() {
        return Err(ValidationError::NoValidActions);
    }

    let mut prepared = PreparedProposal {
        targets: Vec::with_capacity(actions.len()),
        values: Vec::with_capacity(actions.len()),
        signatures: Vec::with_capacity(actions.len()),
        calldatas: Vec::with_capacity(actions.len()),
        description: proposal_description(&draft.title, &draft.description, &actions),
    };

    for action in actions {
        let target = action.target.trim();
        prepared.targets.push(
            Address::from_str(target).map_err(|_| ValidationError::InvalidTarget(target.to_string()))?,
        );

        let value = match action.value.trim() {
            "" => Wei::ZERO,
            raw => Wei::parse_ether(raw).ok_or_else(|| ValidationError::InvalidAmount(raw.to_string()))?,
        };
        prepared.values.push(value.as_u256());

        prepared.signatures.push(action.signature.trim().to_string());

        let calldata = match action.calldata.trim() {
            "" => "0x",
            raw => raw,
        };
        prepared.calldatas.push(
            Bytes::from_str(calldata)
                .map_err(|_| ValidationError::InvalidCalldata(calldata.to_string()))?,
        );
    }

    Ok(prepared)
}

/// `# {title}`, the body, then a numbered list of action descriptions.
pub fn proposal_description(title: &str, description: &str, actions: &[&ProposalAction]) -> String {
    let listed = actions
        .iter()
        .enumerate()
        .map(|(index, action)| format!("{}. {}", index + 1, action.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!("# {title}\n\n{description}\n\n## Actions:\n{listed}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Countdown, MIN_BID_INCREMENT};
    use crate::types::primitives::NounId;

    fn connected() -> WalletSession {
        WalletSession {
            address: Some(Address::repeat_byte(0x11)),
            is_connected: true,
            balance_display: "10.0000".into(),
            owned_token_ids: vec![1],
        }
    }

    fn view(minimum: &str) -> AuctionView {
        AuctionView {
            noun_id: Some(NounId::new(U256::from(900))),
            current_bid: None,
            current_bid_display: String::new(),
            leading_bidder: None,
            countdown: Some(Countdown::from_seconds(600)),
            minimum_next_bid: Wei::parse_ether(minimum).unwrap(),
            is_ended: false,
            settled: false,
            chain_error: None,
            bids_error: None,
        }
    }

    fn action(target: &str, description: &str) -> ProposalAction {
        ProposalAction {
            target: target.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[test]
    fn bid_checks_run_in_order() {
        let balance = Wei::parse_ether("10").unwrap();

        assert_eq!(
            validate_bid("6", &view("5.01"), &WalletSession::disconnected(), balance).unwrap_err(),
            ValidationError::WalletNotConnected
        );
        assert_eq!(
            validate_bid("5", &view("5.01"), &connected(), balance).unwrap_err(),
            ValidationError::BidBelowMinimum {
                minimum: "5.01".into()
            }
        );
        assert_eq!(
            validate_bid("11", &view("5.01"), &connected(), balance).unwrap_err(),
            ValidationError::InsufficientBalance
        );
        assert!(matches!(
            validate_bid("lots", &view("5.01"), &connected(), balance),
            Err(ValidationError::InvalidAmount(_))
        ));

        let input = validate_bid("5.01", &view("5.01"), &connected(), balance).unwrap();
        assert_eq!(input.amount, Wei::parse_ether("5.01").unwrap());
    }

    #[test]
    fn ended_auction_blocks_bids() {
        let mut ended = view("0.01");
        ended.is_ended = true;
        assert_eq!(
            validate_bid("1", &ended, &connected(), MIN_BID_INCREMENT).unwrap_err(),
            ValidationError::AuctionEnded
        );
    }

    #[test]
    fn votes_need_an_active_proposal() {
        let id = ProposalId::new(U256::from(3));
        assert_eq!(
            validate_vote(&connected(), id, &ProposalStatus::Executed, VoteSupport::For, None).unwrap_err(),
            ValidationError::ProposalNotActive
        );

        let input = validate_vote(&connected(), id, &ProposalStatus::Active, VoteSupport::Against, Some("   ")).unwrap();
        assert_eq!(input.reason, None);
    }

    #[test]
    fn composes_the_proposal_description() {
        let draft = ProposalDraft {
            title: "Fund a thing".into(),
            description: "Body text".into(),
            actions: vec![
                action("0x0000000000000000000000000000000000000001", "Send 1 ETH"),
                action("", "Skipped, no target"),
                action("0x0000000000000000000000000000000000000002", "Call contract"),
            ],
        };

        let prepared = prepare_proposal(&draft, &connected(), U256::from(1)).unwrap();
        assert_eq!(
            prepared.description,
            "# Fund a thing\n\nBody text\n\n## Actions:\n1. Send 1 ETH\n2. Call contract"
        );
        assert_eq!(prepared.targets.len(), 2);
        assert_eq!(prepared.values, vec![U256::ZERO, U256::ZERO]);
        assert_eq!(prepared.signatures, vec![String::new(), String::new()]);
        assert!(prepared.calldatas.iter().all(|calldata| calldata.is_empty()));
    }

    #[test]
    fn proposal_guards() {
        let mut draft = ProposalDraft {
            title: "  ".into(),
            description: "Body".into(),
            actions: vec![action("0x0000000000000000000000000000000000000001", "x")],
        };
        assert_eq!(
            prepare_proposal(&draft, &connected(), U256::from(1)).unwrap_err(),
            ValidationError::EmptyProposalFields
        );

        draft.title = "Title".into();
        assert_eq!(
            prepare_proposal(&draft, &connected(), U256::ZERO).unwrap_err(),
            ValidationError::NoVotingPower
        );

        draft.actions = vec![action("0x0000000000000000000000000000000000000001", " ")];
        assert_eq!(
            prepare_proposal(&draft, &connected(), U256::from(1)).unwrap_err(),
            ValidationError::NoValidActions
        );

        draft.actions = vec![action("treasury", "Send")];
        assert_eq!(
            prepare_proposal(&draft, &connected(), U256::from(1)).unwrap_err(),
            ValidationError::InvalidTarget("treasury".into())
        );
    }
}
