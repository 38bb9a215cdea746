//! HTTP-level tests against a mock Limitless API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use limitless_client::resolve::{DetailFetcher, MarketIndex, MarketResolver, ResolverConfig};
use limitless_client::rest::{ApiClient, ClientMode, LoginRequest};
use limitless_client::ApiError;

const BIG_YES: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639936";
const BIG_NO: &str =
    "48331043336612883890938759509493159234755048973500640148014422747788308965732";

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_base_url(&server.uri()).unwrap()
}

fn market_body(slug: &str) -> serde_json::Value {
    json!({
        "slug": slug,
        "title": "Will BTC close above $65,000 in 1 hour?",
        "ticker": "BTC",
        "strikePrice": "65000",
        "deadline": "2026-08-28T13:00:00Z",
        "status": "FUNDED",
        "volume": "104233.55",
        "liquidity": "51200.10",
        "positionIds": [BIG_YES, BIG_NO]
    })
}

#[tokio::test]
async fn search_results_are_ranked_by_score() {
    let server = MockServer::start().await;

    // Deliberately unsorted to verify the resolver's defensive sort
    Mock::given(method("GET"))
        .and(path("/markets/search"))
        .and(query_param("query", "1hr BTC"))
        .and(query_param("similarityThreshold", "0.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"slug": "btc-1hr-b", "title": "B", "score": 0.62},
            {"slug": "btc-1hr-a", "title": "A", "score": 0.91},
            {"slug": "btc-1hr-c", "title": "C", "score": 0.55}
        ])))
        .mount(&server)
        .await;

    let resolver = MarketResolver::new(client_for(&server).await);
    let results = resolver.resolve("1hr BTC").await.unwrap();

    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(results[0].slug, "btc-1hr-a");
}

#[tokio::test]
async fn empty_search_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client.search_markets("no such market", 10, 0.5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn resolver_falls_back_to_bulk_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/markets/active/slugs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"slug": "btc-1hr-above-65000", "ticker": "BTC", "deadline": "2026-08-28T13:00:00Z"},
            {"slug": "will-it-rain-in-london", "ticker": ""}
        ])))
        .mount(&server)
        .await;

    let resolver = MarketResolver::new(client_for(&server).await);
    let results = resolver.resolve("1hr BTC").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].slug, "btc-1hr-above-65000");
    assert!(results[0].score >= 0.5 && results[0].score <= 1.0);
}

#[tokio::test]
async fn resolver_fallback_can_be_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = ResolverConfig {
        fallback_to_index: false,
        ..ResolverConfig::default()
    };
    let resolver = MarketResolver::with_config(client_for(&server).await, config);
    assert!(resolver.resolve("anything").await.unwrap().is_empty());
    assert!(resolver.best_match("anything").await.unwrap().is_none());
}

#[tokio::test]
async fn market_by_slug_404_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/no-such-slug"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = DetailFetcher::new(client_for(&server).await);
    assert!(fetcher.fetch("no-such-slug").await.unwrap().is_none());
    assert!(fetcher.position_ids("no-such-slug").await.unwrap().is_none());
}

#[tokio::test]
async fn position_ids_round_trip_as_strings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/btc-1hr-above-65000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(market_body("btc-1hr-above-65000")))
        .mount(&server)
        .await;

    let fetcher = DetailFetcher::new(client_for(&server).await);

    let market = fetcher.fetch("btc-1hr-above-65000").await.unwrap().unwrap();
    assert_eq!(market.yes_position_id(), Some(BIG_YES));
    assert_eq!(market.no_position_id(), Some(BIG_NO));

    let [yes, no] = fetcher.position_ids("btc-1hr-above-65000").await.unwrap().unwrap();
    assert_eq!(yes, BIG_YES);
    assert_eq!(no, BIG_NO);
}

#[tokio::test]
async fn server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/btc-1hr-above-65000"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let fetcher = DetailFetcher::new(client_for(&server).await);
    let err = fetcher.fetch("btc-1hr-above-65000").await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn index_refresh_swaps_wholesale() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let index = MarketIndex::new();

    let first = Mock::given(method("GET"))
        .and(path("/markets/active/slugs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"slug": "btc-1hr-above-65000", "ticker": "BTC"},
            {"slug": "eth-1hr-above-3000", "ticker": "ETH"}
        ])))
        .up_to_n_times(1)
        .mount_as_scoped(&server)
        .await;

    assert_eq!(index.refresh(&client).await.unwrap(), 2);
    let snapshot = index.snapshot();
    drop(first);

    Mock::given(method("GET"))
        .and(path("/markets/active/slugs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"slug": "sol-1hr-above-150", "ticker": "SOL"}
        ])))
        .mount(&server)
        .await;

    assert_eq!(index.refresh(&client).await.unwrap(), 1);

    // Old entries are gone; the pre-refresh snapshot is untouched
    assert!(index.get("btc-1hr-above-65000").is_none());
    assert!(index.get("sol-1hr-above-150").is_some());
    assert_eq!(snapshot.len(), 2);

    let btc = index.by_ticker("BTC");
    assert!(btc.iter().all(|s| s.ticker == "BTC"));
    assert!(btc.is_empty());
}

#[tokio::test]
async fn category_slugs_filtered_unranked() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/active/crypto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            market_body("btc-1hr-above-65000"),
            market_body("btc-daily-above-70000"),
            market_body("eth-1hr-above-3000")
        ])))
        .mount(&server)
        .await;

    let resolver = MarketResolver::new(client_for(&server).await);
    let slugs = resolver.category_slugs("crypto", &["btc", "1hr"]).await.unwrap();
    assert_eq!(slugs, vec!["btc-1hr-above-65000"]);
}

#[tokio::test]
async fn category_counts_decode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/categories/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "crypto", "name": "Crypto", "count": 42},
            {"id": "sports", "name": "Sports", "count": 7}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let categories = client.category_counts().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].id, "crypto");
    assert_eq!(categories[0].count, 42);
}

#[tokio::test]
async fn login_signer_mismatch_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"client": "eoa"})))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Signer does not match the provided address"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = LoginRequest {
        client: ClientMode::Eoa,
        address: "0xabc".to_string(),
        signature: "0xsig".to_string(),
        message: "login".to_string(),
    };

    let err = client.login(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::SignerMismatch));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn login_success_returns_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"client": "smart-wallet"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "session-token-value",
            "address": "0xwallet"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = LoginRequest {
        client: ClientMode::SmartWallet,
        address: "0xwallet".to_string(),
        signature: "0xownersig".to_string(),
        message: "login".to_string(),
    };

    let token = client.login(&request).await.unwrap();
    assert_eq!(token.token, "session-token-value");
    assert_eq!(token.address.as_deref(), Some("0xwallet"));
}
