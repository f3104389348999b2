//! Admin CLI: manage the Blinks of the local wallet.
//!
//! Signs with the keypair at `SOLANA_KEYPAIR_PATH` (default `~/.config/solana/id.json`).

use clap::{Parser, Subcommand};
use solana_sdk::signer::Signer;
use std::sync::Arc;

use funblink::infra::config;
use funblink::solana::{load_payer, send_and_confirm, RpcChain};
use funblink::transport::http::handlers::common::share_url;
use funblink::transport::http::types::BlinkView;
use funblink::{BlinkDraft, BlinkService};

#[derive(Parser, Debug)]
#[command(name = "blink", about = "Create, list and remove FunBlink Blinks")]
struct Cli {
    /// Origin used to print share URLs (defaults to PUBLIC_BASE_URL, then localhost).
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a new Blink in the wallet's list.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        icon: String,
        #[arg(long)]
        description: String,
        /// Recipient of the transfers.
        #[arg(long)]
        to: String,
        /// Preset amounts, comma separated.
        #[arg(long, value_delimiter = ',', default_value = "1,2,5")]
        amounts: Vec<f64>,
        /// Do not offer the free-form amount action.
        #[arg(long)]
        no_manual: bool,
    },
    /// Print the wallet's Blinks.
    List,
    /// Remove one Blink by id.
    Delete { id: String },
    /// Close the wallet's Blink list and reclaim its rent.
    Close,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    funblink::init_tracing();
    let cli = Cli::parse();

    let payer = load_payer()?;
    let owner = payer.pubkey();
    let chain = Arc::new(RpcChain::from_env()?);
    let program_id = *chain.program_id();
    let service = BlinkService::new(chain.clone(), program_id);
    let origin = cli
        .origin
        .or_else(config::public_base_url)
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    match cli.command {
        Command::Create {
            title,
            icon,
            description,
            to,
            amounts,
            no_manual,
        } => {
            let draft = BlinkDraft {
                title,
                icon,
                description,
                to_pubkey: to,
                amounts,
                manual_send: !no_manual,
            };
            let prepared = service.prepare_create(&owner, draft).await?;
            let signature = send_and_confirm(chain.rpc(), &payer, &[prepared.instruction]).await?;
            println!("> Blink {} created ({})", prepared.id, signature);
            println!("  {}", share_url(&origin, &prepared.pda, &prepared.id.to_string()));
        }
        Command::List => {
            let (pda, blinks) = service.list_blinks(&owner).await?;
            println!("> Blink list {} ({} blink(s))", pda, blinks.len());
            for blink in &blinks {
                let view = BlinkView::from_blink(blink, share_url(&origin, &pda, &blink.id));
                println!(
                    "  [{}] {} -> {} amounts={:?} manual={}",
                    view.id, view.title, view.to_pubkey, view.amounts, view.manual_send
                );
                println!("      {}", view.share_url);
            }
        }
        Command::Delete { id } => {
            let instruction = service.prepare_delete(&owner, &id).await?;
            let signature = send_and_confirm(chain.rpc(), &payer, &[instruction]).await?;
            println!("> Blink {} deleted ({})", id, signature);
        }
        Command::Close => {
            let instruction = service.prepare_close(&owner).await?;
            let signature = send_and_confirm(chain.rpc(), &payer, &[instruction]).await?;
            println!("> Blink list closed ({})", signature);
        }
    }
    Ok(())
}
