// src/token.rs
use alloy::sol;

sol! {
    /// NounsToken: ERC-721 enumerable with checkpointed delegation.
    #[sol(rpc)]
    interface INounsToken {
        event DelegateVotesChanged(address indexed delegate, uint256 previousBalance, uint256 newBalance);

        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function totalSupply() external view returns (uint256);

        function getCurrentVotes(address account) external view returns (uint96);
        function getPriorVotes(address account, uint256 blockNumber) external view returns (uint96);
    }
}
