use broadside::{
    AutoController, InMemoryTransport, MatchOutcome, MatchSession, NetConfig, PeerNode, Side,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Two automatic peers play one match over an in-memory channel; the
/// summary is printed as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    broadside::init_logging();

    let (t1, t2) = InMemoryTransport::pair();
    let game_id = format!("sim-{}-{}", seed1, seed2);

    let node = |seed: u64, transport: InMemoryTransport| {
        PeerNode::new(
            MatchSession::with_seed(&game_id, seed),
            Box::new(transport),
            Box::new(AutoController::new()),
            SmallRng::seed_from_u64(seed.wrapping_add(1)),
            NetConfig::default(),
        )
    };
    let mut n1 = node(seed1, t1);
    let mut n2 = node(seed2, t2);

    let f1 = async {
        let outcome = n1.run(true).await?;
        Ok::<MatchOutcome, anyhow::Error>(outcome)
    };
    let f2 = async {
        let outcome = n2.run(false).await?;
        Ok::<MatchOutcome, anyhow::Error>(outcome)
    };
    let (o1, o2) = tokio::try_join!(f1, f2)?;

    let shots = |node: &PeerNode| {
        node.session()
            .history()
            .iter()
            .filter(|r| r.attacker == Side::Local)
            .count()
    };
    let winner = match (o1, o2) {
        (MatchOutcome::Victory, MatchOutcome::Defeat) => Some("player1"),
        (MatchOutcome::Defeat, MatchOutcome::Victory) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "gameId": game_id,
        "player1": {
            "identity": n1.session().identity(),
            "outcome": format!("{:?}", o1),
            "shots": shots(&n1),
        },
        "player2": {
            "identity": n2.session().identity(),
            "outcome": format!("{:?}", o2),
            "shots": shots(&n2),
        },
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
