mod common;

use broadside::{
    MatchOutcome, MatchSession, Message, Mode, Phase, SessionError, Status, TurnLedger,
};
use common::{place_stacked, pos, stacked_cells};
use rand::{rngs::SmallRng, SeedableRng};

fn peer(identity: &str, seed: u64) -> MatchSession {
    MatchSession::with_identity("g1", identity, SmallRng::seed_from_u64(seed))
}

/// Hand every message to the other session until both are quiet.
fn pump(a: &mut MatchSession, b: &mut MatchSession, from_a: Vec<Message>, from_b: Vec<Message>) {
    let (mut to_b, mut to_a) = (from_a, from_b);
    while !to_a.is_empty() || !to_b.is_empty() {
        let next_to_a: Vec<Message> = to_b.iter().flat_map(|m| b.on_message(m)).collect();
        let next_to_b: Vec<Message> = to_a.iter().flat_map(|m| a.on_message(m)).collect();
        to_a = next_to_a;
        to_b = next_to_b;
    }
}

/// Alice owns the match, both fleets use the stacked layout.
fn battle() -> (MatchSession, MatchSession) {
    let mut alice = peer("alice", 1);
    let mut bob = peer("bob", 2);
    let join_a = alice.choose_mode(Mode::Peer { owner: true }).unwrap();
    let join_b = bob.choose_mode(Mode::Peer { owner: false }).unwrap();
    pump(&mut alice, &mut bob, join_a, join_b);
    let ready_a = place_stacked(&mut alice);
    let ready_b = place_stacked(&mut bob);
    pump(&mut alice, &mut bob, ready_a, ready_b);
    (alice, bob)
}

#[test]
fn join_exchange_introduces_both_sides() {
    let mut alice = peer("alice", 1);
    let mut bob = peer("bob", 2);
    let join_a = alice.choose_mode(Mode::Peer { owner: true }).unwrap();
    assert_eq!(join_a, vec![Message::new(Status::Join, "alice", "g1")]);
    assert!(alice.view().waiting_for_opponent);

    let join_b = bob.choose_mode(Mode::Peer { owner: false }).unwrap();
    pump(&mut alice, &mut bob, join_a, join_b);
    assert_eq!(alice.opponent_identity(), Some("bob"));
    assert_eq!(bob.opponent_identity(), Some("alice"));
    assert!(!alice.view().waiting_for_opponent);
}

#[test]
fn owner_starts_once_the_peer_is_ready() {
    let mut alice = peer("alice", 1);
    let mut bob = peer("bob", 2);
    let join_a = alice.choose_mode(Mode::Peer { owner: true }).unwrap();
    let join_b = bob.choose_mode(Mode::Peer { owner: false }).unwrap();
    pump(&mut alice, &mut bob, join_a, join_b);

    let ready_a = place_stacked(&mut alice);
    assert_eq!(ready_a, vec![Message::new(Status::Ready, "alice", "g1")]);
    assert_eq!(alice.phase(), Phase::AwaitingPeer);
    assert!(ready_a.iter().flat_map(|m| bob.on_message(m)).next().is_none());

    let ready_b = place_stacked(&mut bob);
    let start: Vec<Message> = ready_b.iter().flat_map(|m| alice.on_message(m)).collect();
    assert_eq!(start, vec![Message::new(Status::Start, "alice", "g1")]);
    assert_eq!(alice.phase(), Phase::Battle);
    assert!(alice.local_has_turn());

    assert!(bob.on_message(&start[0]).is_empty());
    assert_eq!(bob.phase(), Phase::Battle);
    assert!(!bob.local_has_turn());
    assert_eq!(bob.ledger().holder(), Some("alice"));
}

#[test]
fn late_joiner_learns_the_owner_is_ready() {
    let mut alice = peer("alice", 1);
    let mut bob = peer("bob", 2);
    alice.choose_mode(Mode::Peer { owner: true }).unwrap();
    place_stacked(&mut alice);

    let join_b = bob.choose_mode(Mode::Peer { owner: false }).unwrap();
    let replies: Vec<Message> = join_b.iter().flat_map(|m| alice.on_message(m)).collect();
    let statuses: Vec<Status> = replies.iter().map(|m| m.status).collect();
    assert_eq!(statuses, vec![Status::Join, Status::Ready]);

    pump(&mut alice, &mut bob, replies, Vec::new());
    let ready_b = place_stacked(&mut bob);
    pump(&mut alice, &mut bob, Vec::new(), ready_b);
    assert_eq!(alice.phase(), Phase::Battle);
    assert_eq!(bob.phase(), Phase::Battle);
}

#[test]
fn miss_hands_the_turn_to_the_defender() {
    let (mut alice, mut bob) = battle();
    let attack = alice.attack(pos(7, 7)).unwrap();
    assert_eq!(attack, vec![Message::attack_start("alice", "g1", pos(7, 7))]);
    assert_eq!(alice.pending_attack(), Some(pos(7, 7)));
    assert_eq!(alice.attack(pos(6, 7)), Err(SessionError::AttackPending));

    let result = bob.on_message(&attack[0]);
    assert_eq!(
        result,
        vec![Message::attack_result("bob", "g1", pos(7, 7), false, "alice", None)]
    );
    assert!(bob.local_has_turn());

    assert!(alice.on_message(&result[0]).is_empty());
    assert!(!alice.local_has_turn());
    assert_eq!(alice.pending_attack(), None);
    assert_eq!(alice.ledger(), bob.ledger());
    assert_eq!(alice.attack(pos(6, 7)), Err(SessionError::NotYourTurn));
}

#[test]
fn hit_streak_keeps_the_turn_until_a_miss() {
    let (mut alice, mut bob) = battle();
    for (target, expect_hit) in [(pos(1, 1), true), (pos(2, 1), true), (pos(7, 7), false)] {
        assert!(alice.local_has_turn());
        let attack = alice.attack(target).unwrap();
        let result = bob.on_message(&attack[0]);
        assert_eq!(result[0].result, Some(expect_hit));
        alice.on_message(&result[0]);
    }
    assert!(!alice.local_has_turn());
    assert!(bob.local_has_turn());
    assert_eq!(alice.target_board().hits(), 2);
    assert_eq!(alice.target_board().misses(), 1);
}

#[test]
fn sinking_every_ship_ends_the_match_on_both_sides() {
    let (mut alice, mut bob) = battle();
    for target in stacked_cells() {
        let attack = alice.attack(target).unwrap();
        let result = bob.on_message(&attack[0]);
        alice.on_message(&result[0]);
    }
    assert_eq!(alice.phase(), Phase::Finished(MatchOutcome::Victory));
    assert_eq!(bob.phase(), Phase::Finished(MatchOutcome::Defeat));
    assert_eq!(
        alice.target_board().sunk(),
        &["carrier", "battleship", "cruiser", "submarine", "destroyer"]
    );
}

#[test]
fn echoes_and_foreign_matches_are_ignored() {
    let (mut alice, mut bob) = battle();
    let attack = alice.attack(pos(7, 7)).unwrap();
    assert!(alice.on_message(&attack[0]).is_empty());
    assert_eq!(alice.pending_attack(), Some(pos(7, 7)));

    let mut foreign = attack[0].clone();
    foreign.game_id = "g2".into();
    assert!(bob.on_message(&foreign).is_empty());
    let stranger = Message::attack_start("mallory", "g1", pos(1, 1));
    assert!(bob.on_message(&stranger).is_empty());
    assert!(bob.local_fleet().ships()[0].hits().is_empty());
}

#[test]
fn attack_out_of_turn_is_dropped() {
    let (mut alice, mut bob) = battle();
    let sneaky = Message::attack_start("bob", "g1", pos(1, 1));
    assert!(alice.on_message(&sneaky).is_empty());
    assert!(alice.local_fleet().ships()[0].hits().is_empty());
    assert!(alice.local_has_turn());
    assert!(!bob.local_has_turn());
}

#[test]
fn leave_ends_the_match_for_the_other_side() {
    let (mut alice, mut bob) = battle();
    let leave = bob.abandon();
    assert_eq!(leave, vec![Message::new(Status::Leave, "bob", "g1")]);
    assert_eq!(bob.phase(), Phase::Finished(MatchOutcome::Abandoned));
    alice.on_message(&leave[0]);
    assert_eq!(alice.phase(), Phase::Finished(MatchOutcome::OpponentLeft));
}

#[test]
fn lost_connection_finishes_the_match() {
    let (mut alice, _bob) = battle();
    alice.connection_lost();
    assert_eq!(alice.phase(), Phase::Finished(MatchOutcome::OpponentLeft));
    assert_eq!(alice.attack(pos(1, 1)), Err(SessionError::WrongPhase(alice.phase())));
}

#[test]
fn ledger_replay_matches_the_live_fold() {
    let history = vec![
        Message::new(Status::Join, "alice", "g1"),
        Message::new(Status::Start, "alice", "g1"),
        Message::attack_result("bob", "g1", pos(1, 1), true, "alice", None),
        Message::attack_result("bob", "g1", pos(2, 1), false, "alice", None),
        Message::attack_result("alice", "g1", pos(3, 3), false, "bob", None),
    ];
    let mut live = TurnLedger::new();
    let mut holders = Vec::new();
    for msg in &history {
        live = live.apply(msg);
        holders.push(live.holder().map(str::to_string));
    }
    assert_eq!(TurnLedger::replay(&history), live);
    assert_eq!(
        holders,
        vec![
            None,
            Some("alice".into()),
            Some("alice".into()),
            Some("bob".into()),
            Some("alice".into()),
        ]
    );
}
