// src/governor.rs
use alloy::sol;

sol! {
    /// Ballot receipt kept by the DAO for each voter.
    struct Receipt {
        bool hasVoted; // Whether or not a vote has been cast
        uint8 support; // 0 = against, 1 = for, 2 = abstain
        uint96 votes; // Votes the voter had, counted at proposal creation
    }

    /// NounsDAOLogic (governor) as exposed by the DAO proxy.
    #[sol(rpc)]
    interface INounsDAOLogic {
        event ProposalCreated(
            uint256 id,
            address proposer,
            address[] targets,
            uint256[] values,
            string[] signatures,
            bytes[] calldatas,
            uint256 startBlock,
            uint256 endBlock,
            string description
        );

        event VoteCast(
            address indexed voter,
            uint256 proposalId,
            uint8 support,
            uint256 votes,
            string reason
        );

        function propose(
            address[] memory targets,
            uint256[] memory values,
            string[] memory signatures,
            bytes[] memory calldatas,
            string memory description
        ) external returns (uint256);

        function castVote(uint256 proposalId, uint8 support) external;
        function castVoteWithReason(uint256 proposalId, uint8 support, string calldata reason) external;

        function state(uint256 proposalId) external view returns (uint8);
        function getReceipt(uint256 proposalId, address voter) external view returns (Receipt memory);

        function proposalThreshold() external view returns (uint256);
        function votingDelay() external view returns (uint256);
        function votingPeriod() external view returns (uint256);
    }
}
