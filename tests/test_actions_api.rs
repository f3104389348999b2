//! Actions endpoints end to end:
//! 1) GET resolves a stored Blink into action buttons.
//! 2) POST builds unsigned SOL / SPL transfers for the requesting wallet.
//! 3) Errors come back as 400 with a message, always with the action headers.

mod common;

use common::{decode_transaction, settings, spawn_server, MockChain, MINT_DECIMALS};
use funblink::domain::blink::{Blink, BlinkList};
use funblink::solana::blink_list_pda;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

fn sample_blink(id: &str, to: &Pubkey) -> Blink {
    Blink {
        id: id.to_string(),
        title: "Tip the builder".to_string(),
        icon: "https://cdn-icons-png.flaticon.com/512/6001/6001527.png".to_string(),
        description: "Send a few SOL".to_string(),
        label: "Transfer".to_string(),
        to_pubkey: to.to_string(),
        link: r#"{"a":[{"value":1},{"value":0.5}],"m":true}"#.to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_get_resolves_blink_into_actions() -> Result<(), Box<dyn std::error::Error>> {
    let program_id = Pubkey::new_unique();
    let owner = Pubkey::new_unique();
    let to = Pubkey::new_unique();
    let (pda, _) = blink_list_pda(&owner, &program_id);
    let list = BlinkList {
        blinks: vec![sample_blink("0", &to), sample_blink("1", &to)],
        is_initialized: true,
    };
    let server = spawn_server(program_id, MockChain::new().with_list(pda, list), settings()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/actions?pda={}&id=1", server.base_url, pda))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["x-action-version"], "2.1.3");
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await?;

    assert_eq!(body["type"], "action");
    assert_eq!(body["title"], "Tip the builder");
    assert_eq!(body["label"], "Transfer");

    let base_href = format!("{}/api/actions?to={}", server.base_url, to);
    let actions = body["links"]["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 3);
    assert_eq!(actions[0]["label"], "Send 1 SOL");
    assert_eq!(actions[0]["href"], format!("{}&amount=1", base_href));
    assert!(actions[0].get("parameters").is_none());
    assert_eq!(actions[1]["label"], "Send 0.5 SOL");
    assert_eq!(actions[2]["href"], format!("{}&amount={{amount}}", base_href));
    assert_eq!(actions[2]["parameters"][0]["name"], "amount");
    assert_eq!(actions[2]["parameters"][0]["required"], true);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_get_token_variant_points_at_token_route() -> Result<(), Box<dyn std::error::Error>> {
    let program_id = Pubkey::new_unique();
    let owner = Pubkey::new_unique();
    let to = Pubkey::new_unique();
    let (pda, _) = blink_list_pda(&owner, &program_id);
    let mut blink = sample_blink("0", &to);
    blink.title = String::new();
    blink.icon = String::new();
    let list = BlinkList {
        blinks: vec![blink],
        is_initialized: true,
    };
    let server = spawn_server(program_id, MockChain::new().with_list(pda, list), settings()).await;

    let body: Value = reqwest::get(format!("{}/api/actions/token?pda={}&id=0", server.base_url, pda))
        .await?
        .json()
        .await?;

    // Empty stored fields fall back to the defaults.
    assert_eq!(body["title"], "Actions Example - Transfer Native SOL");
    assert_eq!(body["icon"], format!("{}/solana-token.png", server.base_url));
    let actions = body["links"]["actions"].as_array().unwrap();
    assert_eq!(actions[0]["label"], "Send 1 USDC");
    assert_eq!(
        actions[0]["href"],
        format!("{}/api/actions/token?to={}&amount=1", server.base_url, to)
    );
    assert_eq!(actions[2]["parameters"][0]["label"], "Enter the amount of USDC to send");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_get_unknown_blink_is_400() -> Result<(), Box<dyn std::error::Error>> {
    let program_id = Pubkey::new_unique();
    let owner = Pubkey::new_unique();
    let (pda, _) = blink_list_pda(&owner, &program_id);
    let list = BlinkList {
        blinks: vec![sample_blink("0", &Pubkey::new_unique())],
        is_initialized: true,
    };
    let server = spawn_server(program_id, MockChain::new().with_list(pda, list), settings()).await;
    let client = reqwest::Client::new();

    for query in [
        format!("pda={}&id=9", pda),
        format!("pda={}&id=0", Pubkey::new_unique()),
        "pda=garbage&id=0".to_string(),
        String::new(),
    ] {
        let resp = client
            .get(format!("{}/api/actions?{}", server.base_url, query))
            .send()
            .await?;
        assert_eq!(resp.status(), 400, "query: {}", query);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let body: Value = resp.json().await?;
        assert_eq!(body["message"], "Failed to load blink");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_post_builds_unsigned_sol_transfer() -> Result<(), Box<dyn std::error::Error>> {
    let chain = MockChain::new();
    let blockhash = chain.blockhash;
    let server = spawn_server(Pubkey::new_unique(), chain, settings()).await;
    let client = reqwest::Client::new();

    let account = Pubkey::new_unique();
    let to = Pubkey::new_unique();
    let resp = client
        .post(format!("{}/api/actions?to={}&amount=1.5", server.base_url, to))
        .json(&json!({ "account": account.to_string() }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["type"], "transaction");
    assert_eq!(body["message"], format!("Send 1.5 SOL to {}", to));

    let tx = decode_transaction(body["transaction"].as_str().unwrap());
    assert!(!tx.is_signed());
    assert_eq!(tx.message.account_keys[0], account);
    assert!(tx.message.account_keys.contains(&to));
    assert_eq!(tx.message.recent_blockhash, blockhash);
    assert_eq!(tx.message.instructions.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_post_defaults_to_configured_recipient() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings();
    let default_to = settings.default_to;
    let server = spawn_server(Pubkey::new_unique(), MockChain::new(), settings).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/api/actions", server.base_url))
        .json(&json!({ "account": Pubkey::new_unique().to_string() }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["message"], format!("Send 0.1 SOL to {}", default_to));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_post_rejects_bad_input() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server(Pubkey::new_unique(), MockChain::new(), settings()).await;
    let client = reqwest::Client::new();
    let account = json!({ "account": Pubkey::new_unique().to_string() });
    let to = Pubkey::new_unique();

    let cases = [
        ("to=not-a-key".to_string(), account.clone(), "Invalid input query parameter: to".to_string()),
        ("amount=abc".to_string(), account.clone(), "Invalid input query parameter: amount".to_string()),
        ("amount=-1".to_string(), account.clone(), "Invalid input query parameter: amount".to_string()),
        ("amount=1".to_string(), json!({ "account": "nope" }), "Invalid \"account\" provided".to_string()),
        (
            format!("to={}&amount=0.0000001", to),
            account.clone(),
            format!("account may not be rent exempt: {}", to),
        ),
    ];
    for (query, body, message) in cases {
        let resp = client
            .post(format!("{}/api/actions?{}", server.base_url, query))
            .json(&body)
            .send()
            .await?;
        assert_eq!(resp.status(), 400, "query: {}", query);
        let reply: Value = resp.json().await?;
        assert_eq!(reply["message"], message);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_token_post_creates_missing_recipient_ata() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings();
    let mint = settings.token_mint;
    let to_without_ata = Pubkey::new_unique();
    let to_with_ata = Pubkey::new_unique();
    let chain = MockChain::new().with_account(get_associated_token_address(&to_with_ata, &mint));
    let server = spawn_server(Pubkey::new_unique(), chain, settings).await;
    let client = reqwest::Client::new();
    let account = Pubkey::new_unique();

    for (to, expected_instructions) in [(to_without_ata, 2), (to_with_ata, 1)] {
        let body: Value = client
            .post(format!("{}/api/actions/token?to={}&amount=2", server.base_url, to))
            .json(&json!({ "account": account.to_string() }))
            .send()
            .await?
            .json()
            .await?;
        assert_eq!(body["message"], format!("Send 2 USDC to {}", to));

        let tx = decode_transaction(body["transaction"].as_str().unwrap());
        assert_eq!(tx.message.instructions.len(), expected_instructions);
        let transfer = tx.message.instructions.last().unwrap();
        let program = tx.message.account_keys[transfer.program_id_index as usize];
        assert_eq!(program, spl_token::id());
        // transfer_checked: tag 12, u64 amount, u8 decimals
        assert_eq!(transfer.data[0], 12);
        assert_eq!(
            u64::from_le_bytes(transfer.data[1..9].try_into().unwrap()),
            2 * 10u64.pow(MINT_DECIMALS as u32)
        );
        assert_eq!(transfer.data[9], MINT_DECIMALS);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_options_and_actions_json() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server(Pubkey::new_unique(), MockChain::new(), settings()).await;
    let client = reqwest::Client::new();

    let resp = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/actions", server.base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-methods"], "GET,POST,PUT,OPTIONS");
    assert_eq!(
        resp.headers()["x-blockchain-ids"],
        "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1"
    );
    assert!(resp.headers().get("content-type").is_none());
    assert!(resp.bytes().await?.is_empty());

    let rules: Value = reqwest::get(format!("{}/actions.json", server.base_url))
        .await?
        .json()
        .await?;
    assert_eq!(rules["rules"][0]["pathPattern"], "/api/actions/**");
    assert_eq!(rules["rules"][0]["apiPath"], "/api/actions/**");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rpc_failure_is_reported_as_400() -> Result<(), Box<dyn std::error::Error>> {
    let chain = MockChain {
        offline: true,
        ..MockChain::new()
    };
    let server = spawn_server(Pubkey::new_unique(), chain, settings()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/actions?amount=1", server.base_url))
        .json(&json!({ "account": Pubkey::new_unique().to_string() }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "connection refused");

    let health = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(health.status(), 503);
    Ok(())
}
