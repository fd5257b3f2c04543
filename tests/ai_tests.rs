use std::collections::HashSet;

use broadside::{
    place_fleet_randomly, AiOpponent, Fleet, Opponent, Position, ShotSampler, Strike,
    INTERIOR_CELLS, TOTAL_SHIP_CELLS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_fleet_is_legal(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut fleet = Fleet::new();
        prop_assert!(place_fleet_randomly(&mut fleet, &mut rng).is_ok());
        prop_assert!(fleet.is_fully_placed());
        let cells: HashSet<Position> = fleet.occupied_positions().into_iter().collect();
        prop_assert_eq!(cells.len(), TOTAL_SHIP_CELLS);
        for ship in fleet.ships() {
            let xs: HashSet<u8> = ship.positions().iter().map(|p| p.x()).collect();
            let ys: HashSet<u8> = ship.positions().iter().map(|p| p.y()).collect();
            prop_assert!(xs.len() == 1 || ys.len() == 1);
        }
    }

    #[test]
    fn sampler_never_repeats_a_cell(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut sampler = ShotSampler::new();
        let mut seen = HashSet::new();
        while let Some(pos) = sampler.next(&mut rng) {
            prop_assert!(seen.insert(pos));
        }
        prop_assert_eq!(seen.len(), INTERIOR_CELLS);
        prop_assert_eq!(sampler.attempted(), INTERIOR_CELLS);
    }
}

#[test]
fn excluded_cells_are_never_drawn() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut sampler = ShotSampler::new();
    let skip = Position::new(4, 4).unwrap();
    sampler.exclude(skip);
    let drawn: Vec<Position> = std::iter::from_fn(|| sampler.next(&mut rng)).collect();
    assert_eq!(drawn.len(), 48);
    assert!(!drawn.contains(&skip));
}

#[test]
fn ai_keeps_firing_while_it_hits() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut ai = AiOpponent::new("ai".to_string());
    ai.prepare(&mut rng).unwrap();
    assert!(ai.is_ready());

    let mut defender = Fleet::new();
    place_fleet_randomly(&mut defender, &mut rng).unwrap();
    ai.set_turn(true);
    let shots = ai.take_turn(&mut rng, &mut defender);

    assert!(!shots.is_empty());
    let (last, streak) = shots.split_last().unwrap();
    assert!(streak.iter().all(|s| s.hit));
    assert!(!last.hit || last.fleet_defeated);
    assert_eq!(ai.has_turn(), last.hit && !last.fleet_defeated);
    assert_eq!(ai.shots_fired(), shots.len());
}

#[test]
fn ai_resolves_incoming_shots_on_its_own_fleet() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut ai = AiOpponent::new("ai".to_string());
    ai.prepare(&mut rng).unwrap();
    let target = ai.fleet().occupied_positions()[0];
    match ai.receive_attack(target) {
        Strike::Resolved(outcome) => assert!(outcome.hit),
        Strike::Dispatched => panic!("AI shots resolve locally"),
    }
}
