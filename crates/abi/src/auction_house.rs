// src/auction_house.rs
use alloy::sol;

sol! {
    /// NounsAuctionHouse, the daily auction for a single Noun.
    #[sol(rpc)]
    interface INounsAuctionHouse {
        event AuctionCreated(uint256 indexed nounId, uint256 startTime, uint256 endTime);
        event AuctionBid(uint256 indexed nounId, address sender, uint256 value, bool extended);
        event AuctionExtended(uint256 indexed nounId, uint256 endTime);
        event AuctionSettled(uint256 indexed nounId, address winner, uint256 amount);

        // The proxy returns the packed Auction struct; each member is ABI-encoded
        // as a full word, so widening to uint256 decodes the same bytes.
        function auction()
            external
            view
            returns (
                uint256 nounId,
                uint256 amount,
                uint256 startTime,
                uint256 endTime,
                address bidder,
                bool settled
            );

        function reservePrice() external view returns (uint256);
        function minBidIncrementPercentage() external view returns (uint8);

        function createBid(uint256 nounId) external payable;
        function settleCurrentAndCreateNewAuction() external;
    }
}
