use solana_sdk::native_token::lamports_to_sol;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;
use std::str::FromStr;

use funblink::infra::config;
use funblink::solana::{blink_list_pda, load_payer, RpcChain};
use funblink::BlinkChain;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--owner <PUBKEY>]\n\
         \n\
         Optional env vars:\n\
           SOLANA_RPC_URL, FUNBLINK_PROGRAM_ID, TOKEN_MINT\n\
         Without --owner, the wallet at SOLANA_KEYPAIR_PATH\n\
         (default ~/.config/solana/id.json) is checked.\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let owner_arg = match args.iter().position(|a| a == "--owner") {
        Some(i) => match args.get(i + 1) {
            Some(v) => Some(
                Pubkey::from_str(v).map_err(|e| anyhow::anyhow!("--owner is not a valid pubkey: {}", e))?,
            ),
            None => usage_and_exit(),
        },
        None => None,
    };

    let chain = RpcChain::from_env()?;
    let program_id = *chain.program_id();
    let token_mint = config::token_mint()?;

    println!("> Preflight:");
    println!("  SOLANA_RPC_URL={}", config::solana_rpc_url());
    println!("  FUNBLINK_PROGRAM_ID={}", program_id);
    println!("  TOKEN_MINT={} ({})", token_mint, config::token_symbol());

    // Basic RPC connectivity
    let version = chain.rpc().get_version().await?;
    println!("  RPC version: {}", version.solana_core);

    let owner = match owner_arg {
        Some(owner) => owner,
        None => {
            let payer = load_payer()?;
            let balance_lamports = chain.rpc().get_balance(&payer.pubkey()).await?;
            println!("  Payer: {}", payer.pubkey());
            println!(
                "  Payer balance: {} lamports (~{:.6} SOL)",
                balance_lamports,
                lamports_to_sol(balance_lamports)
            );
            if balance_lamports < 10_000_000 {
                eprintln!("  Warning: payer balance looks low; devnet transactions may fail.");
            }
            payer.pubkey()
        }
    };

    // Program account existence
    let program_acct = chain
        .rpc()
        .get_account(&program_id)
        .await
        .map_err(|e| anyhow::anyhow!("Program account not found on cluster: {} ({})", program_id, e))?;
    if !program_acct.executable {
        eprintln!("  Warning: program account exists but is not marked executable.");
    } else {
        println!("  Program account is deployed + executable.");
    }

    // Token mint used by /api/actions/token
    match chain.mint_decimals(&token_mint).await {
        Ok(decimals) => println!("  Token mint readable ({} decimals).", decimals),
        Err(e) => eprintln!("  Warning: token mint unreadable, token actions will fail: {}", e),
    }

    // Blink list PDA
    let (pda, _bump) = blink_list_pda(&owner, &program_id);
    println!("  Blink list PDA for {}: {}", owner, pda);
    match chain.fetch_blink_list(&pda).await? {
        Some(list) => println!(
            "  Blink list holds {} blink(s) (initialized={}).",
            list.blinks.len(),
            list.is_initialized
        ),
        None => println!("  Blink list does not exist yet (created by the first create_blink)."),
    }

    println!("> Preflight OK.");
    Ok(())
}
