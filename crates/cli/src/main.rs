use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use nouns_core::{
    EndpointConfig, ProposalId, StatusFilter, ThemeMode, ThemeVariant, VoteSupport,
    indexer::DEFAULT_PROPOSAL_PAGE,
};
use tracing_subscriber::EnvFilter;

use nouns_cli::{
    AppContext,
    commands::{
        auction as auction_cmd, bid as bid_cmd, dashboard, proposals as proposals_cmd,
        propose::{self as propose_cmd, ProposeOutcome},
        settings as settings_cmd, vote as vote_cmd, wallet as wallet_cmd,
    },
    config::{default_store_path, load_config_or_default, resolve_private_key},
};

#[derive(Debug, Parser)]
#[command(name = "nouns", about = "Nouns DAO auction and governance client", version)]
struct Cli {
    /// Path to nouns.toml (contract addresses, bidder labels)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Default Ethereum RPC endpoint, used when no override is stored
    #[arg(long, global = true, env = "NOUNS_ETH_RPC", value_name = "URL")]
    rpc_url: Option<String>,

    /// Default subgraph endpoint, used when no override is stored
    #[arg(long, global = true, env = "NOUNS_GRAPH_API", value_name = "URL")]
    graph_api: Option<String>,

    /// Local state file (defaults to <config dir>/nouns/storage.json)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Signing key; falls back to PRIVATE_KEY
    #[arg(long, global = true, value_name = "KEY")]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the running auction
    Auction(AuctionArgs),

    /// List governance proposals
    Proposals(ProposalsArgs),

    /// Place a bid on the running auction
    Bid(BidArgs),

    /// Vote on an active proposal
    Vote(VoteArgs),

    /// Submit a proposal from a TOML draft
    Propose(ProposeArgs),

    /// Endpoints, theme, profile and notifications
    Settings(SettingsArgs),

    /// Connect or disconnect the signing wallet
    Wallet(WalletArgs),

    /// Live terminal dashboard
    Dashboard(DashboardArgs),
}

#[derive(Debug, Args)]
struct AuctionArgs {
    /// Number of bids to list
    #[arg(long, default_value_t = 5)]
    history: usize,
}

#[derive(Debug, Args)]
struct ProposalsArgs {
    /// all, active, passed or failed
    #[arg(long, default_value = "all")]
    filter: StatusFilter,

    /// Number of proposals to fetch
    #[arg(long, default_value_t = DEFAULT_PROPOSAL_PAGE)]
    first: u32,
}

#[derive(Debug, Args)]
struct BidArgs {
    /// Bid amount in ETH
    #[arg(value_name = "ETH")]
    amount: String,
}

#[derive(Debug, Args)]
struct VoteArgs {
    /// Proposal id (decimal or 0x-prefixed hex)
    proposal: ProposalId,

    /// for, against or abstain
    support: VoteSupport,

    /// Optional on-chain reason
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Debug, Args)]
struct ProposeArgs {
    /// Proposal draft (title, description, [[action]] tables)
    #[arg(value_name = "FILE")]
    draft: PathBuf,

    /// Validate and print the proposal without sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct SettingsArgs {
    #[command(subcommand)]
    command: Option<SettingsCommand>,
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,
    /// Override endpoints; pass an empty string to restore a default
    Set {
        #[arg(long, value_name = "URL")]
        rpc_url: Option<String>,
        #[arg(long, value_name = "URL")]
        graph_api: Option<String>,
    },
    /// Drop both endpoint overrides
    Reset,
    /// Check both endpoints
    Test,
    /// Theme mode and color variant
    Theme {
        #[arg(long)]
        mode: Option<ThemeMode>,
        #[arg(long)]
        variant: Option<ThemeVariant>,
    },
    /// Profile fields
    Profile {
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Notification toggles
    Notifications {
        #[arg(long)]
        auction_updates: Option<bool>,
        #[arg(long)]
        proposal_alerts: Option<bool>,
        #[arg(long)]
        community_news: Option<bool>,
        #[arg(long)]
        price_alerts: Option<bool>,
    },
}

#[derive(Debug, Args)]
struct WalletArgs {
    #[command(subcommand)]
    command: Option<WalletCommand>,
}

#[derive(Debug, Subcommand)]
enum WalletCommand {
    /// Show the stored session
    Status,
    /// Read address, balance and owned Nouns from the signer
    Connect,
    /// Forget the stored session
    Disconnect,
}

#[derive(Debug, Args)]
struct DashboardArgs {
    /// Seconds between auction/proposal refreshes
    #[arg(long, default_value_t = 30)]
    refresh: u64,

    /// Number of proposals to fetch
    #[arg(long, default_value_t = DEFAULT_PROPOSAL_PAGE)]
    first: u32,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref())?;
    let store = cli.store.unwrap_or_else(default_store_path);
    let defaults = EndpointConfig::with_overrides(cli.rpc_url, cli.graph_api);
    let ctx = AppContext::new(&config, store, defaults, resolve_private_key(cli.private_key))?;

    match cli.command {
        Commands::Auction(args) => println!("{}", auction_cmd::auction(&ctx, args.history).await),
        Commands::Proposals(args) => {
            println!("{}", proposals_cmd::proposals(&ctx, args.first, args.filter).await?)
        }
        Commands::Bid(args) => {
            let result = bid_cmd::place_bid(&ctx, &args.amount).await?;
            println!(
                "Bid of {} ETH on Noun {} confirmed in {}",
                result.amount.display(4),
                result.noun_id,
                result.tx_hash
            );
        }
        Commands::Vote(args) => {
            let result =
                vote_cmd::vote(&ctx, args.proposal, args.support, args.reason.as_deref()).await?;
            println!(
                "Voted {} on proposal {} in {}",
                result.support, result.proposal_id, result.tx_hash
            );
        }
        Commands::Propose(args) => match propose_cmd::propose(&ctx, &args.draft, args.dry_run).await? {
            ProposeOutcome::DryRun(prepared) => {
                println!("{}", prepared.description);
                for (index, target) in prepared.targets.iter().enumerate() {
                    println!(
                        "  {}. {target} value {} signature {:?} calldata {}",
                        index + 1,
                        prepared.values[index],
                        prepared.signatures[index],
                        prepared.calldatas[index]
                    );
                }
            }
            ProposeOutcome::Submitted(result) => match result.proposal_id {
                Some(id) => println!("Proposal {id} created in {}", result.tx_hash),
                None => println!("Proposal submitted in {}", result.tx_hash),
            },
        },
        Commands::Settings(args) => handle_settings(&ctx, args.command).await?,
        Commands::Wallet(args) => {
            let output = match args.command.unwrap_or(WalletCommand::Status) {
                WalletCommand::Status => wallet_cmd::status(&ctx)?,
                WalletCommand::Connect => wallet_cmd::connect(&ctx).await?,
                WalletCommand::Disconnect => wallet_cmd::disconnect(&ctx)?,
            };
            println!("{output}");
        }
        Commands::Dashboard(args) => {
            dashboard::run(&ctx, Duration::from_secs(args.refresh.max(1)), args.first).await?
        }
    }

    Ok(())
}

async fn handle_settings(ctx: &AppContext, command: Option<SettingsCommand>) -> eyre::Result<()> {
    match command.unwrap_or(SettingsCommand::Show) {
        SettingsCommand::Show => println!("{}", settings_cmd::show(ctx)),
        SettingsCommand::Set { rpc_url, graph_api } => {
            let endpoints = settings_cmd::set_endpoints(ctx, rpc_url, graph_api)?;
            println!("ethereum rpc    {}", endpoints.chain_rpc_url);
            println!("graph api       {}", endpoints.indexer_url);
        }
        SettingsCommand::Reset => {
            let endpoints = settings_cmd::reset_endpoints(ctx)?;
            println!("Endpoints reset to {} and {}", endpoints.chain_rpc_url, endpoints.indexer_url);
        }
        SettingsCommand::Test => println!("{}", settings_cmd::test_connections(ctx).await),
        SettingsCommand::Theme { mode, variant } => {
            settings_cmd::set_theme(ctx, mode, variant)?;
            println!("{}", settings_cmd::show(ctx));
        }
        SettingsCommand::Profile {
            display_name,
            email,
            bio,
        } => {
            settings_cmd::update_profile(ctx, display_name, email, bio)?;
            println!("{}", settings_cmd::show(ctx));
        }
        SettingsCommand::Notifications {
            auction_updates,
            proposal_alerts,
            community_news,
            price_alerts,
        } => {
            settings_cmd::update_notifications(ctx, |settings| {
                if let Some(value) = auction_updates {
                    settings.auction_updates = value;
                }
                if let Some(value) = proposal_alerts {
                    settings.proposal_alerts = value;
                }
                if let Some(value) = community_news {
                    settings.community_news = value;
                }
                if let Some(value) = price_alerts {
                    settings.price_alerts = value;
                }
            })?;
            println!("{}", settings_cmd::show(ctx));
        }
    }
    Ok(())
}
