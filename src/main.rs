#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{
    init_logging, lookup_match, run_versus_ai, serve, ui::describe_view, AutoController,
    CliController, Controller, MatchRegistry, MatchSession, NetConfig, PeerNode, TcpTransport,
};

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::{Rng, SeedableRng};
#[cfg(feature = "std")]
use std::sync::Arc;
#[cfg(feature = "std")]
use tokio::net::TcpListener;
#[cfg(feature = "std")]
use tokio::sync::Notify;
#[cfg(feature = "std")]
use tokio::time::Duration;

/// How long a Ctrl-C gets to announce the departure before the process exits.
#[cfg(feature = "std")]
const QUIT_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, global = true, default_value_t = 30, help = "Network timeout in seconds")]
    timeout_secs: u64,
    #[arg(
        long,
        global = true,
        default_value_t = 200,
        help = "Delay before retrying a send on an unready channel"
    )]
    retry_delay_ms: u64,
}

#[cfg(feature = "std")]
impl Cli {
    fn net_config(&self) -> NetConfig {
        NetConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            send_retry_delay: Duration::from_millis(self.retry_delay_ms),
            ..NetConfig::default()
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Run the relay that connects the two sides of each match.
    Relay {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
    },
    /// Ask a relay whether a match exists.
    Lookup {
        #[arg(long, default_value = "127.0.0.1:8080")]
        relay: String,
        #[arg(long)]
        game: String,
    },
    /// Play against the AI on the local machine.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Let the computer play your side too")]
        auto: bool,
    },
    /// Create a match on a relay and play it as the owner.
    Host {
        #[arg(long, default_value = "127.0.0.1:8080")]
        relay: String,
        #[arg(long, help = "Match id; generated when omitted")]
        game: Option<String>,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Join an existing match on a relay.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        relay: String,
        #[arg(long)]
        game: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    }
}

#[cfg(feature = "std")]
fn make_controller(player: PlayerType) -> Box<dyn Controller> {
    match player {
        PlayerType::Human => Box::new(CliController::new()),
        PlayerType::Ai => Box::new(AutoController::new()),
    }
}

#[cfg(feature = "std")]
async fn play_peer(
    relay: &str,
    game_id: &str,
    owner: bool,
    player: PlayerType,
    mut rng: SmallRng,
    config: NetConfig,
) -> anyhow::Result<()> {
    let transport = TcpTransport::connect(relay, game_id, config).await?;
    let session = MatchSession::new(game_id, SmallRng::from_rng(&mut rng));
    println!("Playing match {} as {}", game_id, session.identity());
    let quit = Arc::new(Notify::new());
    let watcher = tokio::spawn(quit_on_ctrl_c(quit.clone()));
    let mut node = PeerNode::new(
        session,
        Box::new(transport),
        make_controller(player),
        rng,
        config,
    )
    .with_quit_signal(quit);
    let outcome = node.run(owner).await;
    watcher.abort();
    let outcome = outcome?;
    log::info!("match {} ended: {:?}", game_id, outcome);
    println!("{}", describe_view(&node.session().view()));
    Ok(())
}

/// Ask the node to leave on Ctrl-C. A prompt blocked on stdin never sees
/// the request, so the process exits after a grace period regardless.
#[cfg(feature = "std")]
async fn quit_on_ctrl_c(quit: Arc<Notify>) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    log::info!("interrupted, leaving the match");
    quit.notify_one();
    tokio::time::sleep(QUIT_GRACE).await;
    std::process::exit(130);
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = cli.net_config();

    match cli.command {
        Commands::Relay { bind } => {
            let listener = TcpListener::bind(&bind).await?;
            println!("Relay listening on {}", bind);
            serve(listener, Arc::new(MatchRegistry::new()), config).await?;
        }
        Commands::Lookup { relay, game } => {
            if lookup_match(&relay, &game, config).await? {
                println!("Match {} is open", game);
            } else {
                println!("Match {} not found", game);
            }
        }
        Commands::Local { seed, auto } => {
            let mut rng = make_rng(seed);
            let mut session = MatchSession::new("local", SmallRng::from_rng(&mut rng));
            let kind = if auto { PlayerType::Ai } else { PlayerType::Human };
            let mut controller = make_controller(kind);
            let outcome = run_versus_ai(&mut session, controller.as_mut(), &mut rng)
                .map_err(|e| anyhow::anyhow!(e))?;
            log::info!("local match ended: {:?}", outcome);
            println!("{}", describe_view(&session.view()));
        }
        Commands::Host { relay, game, player, seed } => {
            let mut rng = make_rng(seed);
            let game_id = game.unwrap_or_else(|| format!("{:08x}", rng.random::<u32>()));
            if lookup_match(&relay, &game_id, config).await? {
                return Err(anyhow::anyhow!("Match {} already exists", game_id));
            }
            println!("Share this match id with your opponent: {}", game_id);
            play_peer(&relay, &game_id, true, player, rng, config).await?;
        }
        Commands::Join { relay, game, player, seed } => {
            if !lookup_match(&relay, &game, config).await? {
                return Err(anyhow::anyhow!("Match {} not found", game));
            }
            play_peer(&relay, &game, false, player, make_rng(seed), config).await?;
        }
    }
    Ok(())
}
