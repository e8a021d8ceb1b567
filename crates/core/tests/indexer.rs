use alloy::primitives::U256;
use axum::{Json, Router, http::StatusCode, routing::post};
use nouns_core::{
    ConnectionStatus, IndexerClient, IndexerError, NounId, ProposalStatus, Wei, probe_indexer,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn subgraph(Json(request): Json<Value>) -> Json<Value> {
    let query = request["query"].as_str().unwrap_or_default();

    if query.contains("AuctionBids") {
        assert_eq!(request["variables"]["nounId"], "900");
        return Json(json!({
            "data": {
                "auction": {
                    "id": "900",
                    "bids": [
                        {
                            "id": "b2",
                            "bidder": { "id": "0x1111111111111111111111111111111111111111", "tokenBalance": "0" },
                            "amount": "4500000000000000000",
                            "blockTimestamp": "1700000100",
                            "blockNumber": "101",
                            "txIndex": "3"
                        },
                        {
                            "id": "b3",
                            "bidder": { "id": "0x2573c60a6d127755aa2dc85e342f7da2378a0cc5", "tokenBalance": "40" },
                            "amount": "5000000000000000000",
                            "blockTimestamp": "1700000200",
                            "blockNumber": "102",
                            "txIndex": "0"
                        }
                    ]
                }
            }
        }));
    }

    if query.contains("Proposals") {
        assert_eq!(request["variables"]["first"], 2);
        return Json(json!({
            "data": {
                "proposals": [
                    {
                        "id": "812",
                        "title": "Fund the thing",
                        "description": "…",
                        "status": "ACTIVE",
                        "forVotes": "120",
                        "againstVotes": "4",
                        "abstainVotes": "1",
                        "endBlock": "21000000",
                        "proposer": { "id": "0x1111111111111111111111111111111111111111" }
                    },
                    {
                        "id": "811",
                        "title": null,
                        "description": null,
                        "status": "VETOED",
                        "forVotes": "0",
                        "againstVotes": "0",
                        "abstainVotes": "0",
                        "endBlock": null,
                        "proposer": { "id": "0x1111111111111111111111111111111111111111" }
                    }
                ]
            }
        }));
    }

    if query.contains("__schema") {
        return Json(json!({ "data": { "__schema": { "queryType": { "name": "Query" } } } }));
    }

    Json(json!({ "errors": [{ "message": "unknown query" }] }))
}

#[tokio::test]
async fn fetches_bids_highest_first() {
    let url = serve(Router::new().route("/", post(subgraph))).await;
    let client = IndexerClient::new(url);

    let bids = client.auction_bids(NounId::new(U256::from(900))).await.unwrap();

    assert_eq!(bids.len(), 2);
    assert_eq!(bids[0].id, "b3");
    assert_eq!(bids[0].amount, Wei::parse_ether("5").unwrap());
    assert_eq!(bids[0].bidder_token_balance, Some(40));
    assert_eq!(bids[1].tx_index, 3);
}

#[tokio::test]
async fn fetches_proposals_with_optional_fields() {
    let url = serve(Router::new().route("/", post(subgraph))).await;
    let client = IndexerClient::new(url);

    let proposals = client.proposals(2).await.unwrap();

    assert_eq!(proposals.len(), 2);
    assert_eq!(proposals[0].status, ProposalStatus::Active);
    assert_eq!(proposals[0].for_votes, U256::from(120));
    assert_eq!(proposals[0].end_block.map(|block| block.as_u64()), Some(21_000_000));
    assert_eq!(proposals[1].title, "");
    assert_eq!(proposals[1].end_block, None);
}

#[tokio::test]
async fn graphql_errors_surface_their_message() {
    let url = serve(Router::new().route("/", post(subgraph))).await;
    let client = IndexerClient::new(url);

    let err = client
        .query::<Value>("query Other { other }", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, IndexerError::GraphQl(ref message) if message == "unknown query"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let app = Router::new().route("/", post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
    let url = serve(app).await;

    let err = IndexerClient::new(url.clone()).proposals(10).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 502");

    assert!(matches!(probe_indexer(&url).await, ConnectionStatus::Error(_)));
}

#[tokio::test]
async fn probe_accepts_a_live_indexer() {
    let url = serve(Router::new().route("/", post(subgraph))).await;
    assert_eq!(probe_indexer(&url).await, ConnectionStatus::Connected);
}
