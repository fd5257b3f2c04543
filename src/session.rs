#![cfg(feature = "std")]

//! Match session state machine.
//!
//! A [`MatchSession`] owns the local player and the opponent and walks
//! `AwaitingMode → Placement → (peer) AwaitingPeer → Battle → Finished`.
//! Every operation that changes state returns the protocol messages it
//! produced; the caller is responsible for sending them. Against the AI the
//! list is always empty.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::core::{
    place_next, resolve_attack, ship_name_static, turn_after, AttackOutcome, AttackReport,
    BoardError, Direction, Fleet, Position, ShipDef, Side, TargetBoard,
};
use crate::player::{generate_identity, AiOpponent, Opponent, Player, RemotePeer, Strike};
use crate::protocol::{Message, Status};
use crate::sync::{screen, Screen, TurnLedger};

/// How the opponent is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Single player against the local AI.
    VersusAi,
    /// Two clients through the relay. The owner authorizes the battle start
    /// and fires first.
    Peer { owner: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The opponent's fleet was sunk.
    Victory,
    /// The local fleet was sunk.
    Defeat,
    /// The opponent left or the connection dropped.
    OpponentLeft,
    /// The local side left.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingMode,
    Placement,
    AwaitingPeer,
    Battle,
    Finished(MatchOutcome),
}

/// Rejected local action. The session is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The action is not allowed in the current phase.
    WrongPhase(Phase),
    /// The mode has already been chosen.
    ModeAlreadyChosen,
    /// The opponent holds the turn.
    NotYourTurn,
    /// An earlier attack is still waiting for its result.
    AttackPending,
    /// The target cell was already resolved.
    AlreadyAttacked(Position),
    /// The placement was illegal.
    Placement(BoardError),
    /// The opponent could not prepare its fleet.
    Opponent(BoardError),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::WrongPhase(phase) => write!(f, "Not allowed during {:?}", phase),
            SessionError::ModeAlreadyChosen => write!(f, "Mode already chosen"),
            SessionError::NotYourTurn => write!(f, "It is not your turn"),
            SessionError::AttackPending => write!(f, "Waiting for the previous attack result"),
            SessionError::AlreadyAttacked(p) => write!(f, "Cell {} was already attacked", p),
            SessionError::Placement(e) => write!(f, "Cannot place ship: {}", e),
            SessionError::Opponent(e) => write!(f, "Opponent setup failed: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

/// Snapshot handed to the presentation layer after each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub game_id: String,
    pub phase: Phase,
    pub local_turn: bool,
    pub last_attack: Option<AttackReport>,
    pub next_ship: Option<ShipDef>,
    pub direction: Direction,
    pub waiting_for_opponent: bool,
}

pub struct MatchSession {
    game_id: String,
    local: Player,
    opponent: Option<Box<dyn Opponent>>,
    owner: bool,
    phase: Phase,
    direction: Direction,
    target: TargetBoard,
    ledger: TurnLedger,
    pending_attack: Option<Position>,
    history: Vec<AttackReport>,
    rng: SmallRng,
}

impl MatchSession {
    /// New session for `game_id` with a generated identity.
    pub fn new(game_id: &str, mut rng: SmallRng) -> Self {
        let identity = generate_identity(&mut rng);
        Self::with_identity(game_id, &identity, rng)
    }

    /// Reproducible session.
    pub fn with_seed(game_id: &str, seed: u64) -> Self {
        Self::new(game_id, SmallRng::seed_from_u64(seed))
    }

    pub fn with_identity(game_id: &str, identity: &str, rng: SmallRng) -> Self {
        Self {
            game_id: game_id.to_string(),
            local: Player::new(identity.to_string()),
            opponent: None,
            owner: false,
            phase: Phase::AwaitingMode,
            direction: Direction::default(),
            target: TargetBoard::new(),
            ledger: TurnLedger::new(),
            pending_attack: None,
            history: Vec::new(),
            rng,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn identity(&self) -> &str {
        self.local.identity()
    }

    pub fn opponent_identity(&self) -> Option<&str> {
        self.opponent.as_ref().and_then(|o| o.identity())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_owner(&self) -> bool {
        self.owner
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn local_fleet(&self) -> &Fleet {
        self.local.fleet()
    }

    pub fn target_board(&self) -> &TargetBoard {
        &self.target
    }

    /// Every resolved attack, oldest first.
    pub fn history(&self) -> &[AttackReport] {
        &self.history
    }

    pub fn local_has_turn(&self) -> bool {
        self.local.has_turn()
    }

    pub fn pending_attack(&self) -> Option<Position> {
        self.pending_attack
    }

    /// Turn ledger folded from the peer messages seen so far.
    pub fn ledger(&self) -> &TurnLedger {
        &self.ledger
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            game_id: self.game_id.clone(),
            phase: self.phase,
            local_turn: self.local.has_turn(),
            last_attack: self.history.last().copied(),
            next_ship: self.local.fleet().next_to_place().map(|s| s.def()),
            direction: self.direction,
            waiting_for_opponent: self.opponent.is_some() && self.opponent_identity().is_none(),
        }
    }

    /// Pick the opponent. Against the AI its fleet is placed right away; for a
    /// peer match a JOIN is emitted.
    pub fn choose_mode(&mut self, mode: Mode) -> Result<Vec<Message>, SessionError> {
        if self.phase != Phase::AwaitingMode {
            return Err(SessionError::ModeAlreadyChosen);
        }
        let outbound = match mode {
            Mode::VersusAi => {
                let mut ai = AiOpponent::new(generate_identity(&mut self.rng));
                ai.prepare(&mut self.rng).map_err(SessionError::Opponent)?;
                self.opponent = Some(Box::new(ai));
                Vec::new()
            }
            Mode::Peer { owner } => {
                self.owner = owner;
                self.opponent = Some(Box::new(RemotePeer::new()));
                vec![self.message(Status::Join)]
            }
        };
        log::info!("[{}] mode {:?} chosen by {}", self.game_id, mode, self.identity());
        self.phase = Phase::Placement;
        Ok(outbound)
    }

    /// Direction used by the next placement only.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    /// Place the next ship of the local fleet at `start` in the current
    /// direction.
    pub fn place_ship(&mut self, start: Position) -> Result<Vec<Message>, SessionError> {
        if self.phase != Phase::Placement {
            return Err(SessionError::WrongPhase(self.phase));
        }
        let def = place_next(self.local.fleet_mut(), start, self.direction)
            .map_err(SessionError::Placement)?;
        log::debug!(
            "[{}] placed {} at {} {:?}",
            self.game_id,
            def.name(),
            start,
            self.direction
        );
        if self.local.fleet().is_fully_placed() {
            Ok(self.finish_placement())
        } else {
            Ok(Vec::new())
        }
    }

    fn finish_placement(&mut self) -> Vec<Message> {
        let remote = self.opponent.as_ref().is_some_and(|o| o.awaits_start_signal());
        if !remote {
            self.phase = Phase::Battle;
            self.local.set_turn(true);
            if let Some(opp) = self.opponent.as_mut() {
                opp.set_turn(false);
            }
            log::info!("[{}] battle begins", self.game_id);
            return Vec::new();
        }
        self.phase = Phase::AwaitingPeer;
        let mut outbound = vec![self.message(Status::Ready)];
        outbound.extend(self.try_start());
        outbound
    }

    /// The owner opens the battle once both fleets are placed.
    fn try_start(&mut self) -> Option<Message> {
        let peer_ready = self.opponent.as_ref().is_some_and(|o| o.is_ready());
        if !(self.owner && self.phase == Phase::AwaitingPeer && peer_ready) {
            return None;
        }
        let start = self.message(Status::Start);
        self.enter_battle(&start);
        Some(start)
    }

    fn enter_battle(&mut self, start: &Message) {
        self.ledger = self.ledger.apply(start);
        self.phase = Phase::Battle;
        self.sync_turn();
        log::info!(
            "[{}] battle begins, {} fires first",
            self.game_id,
            self.ledger.holder().unwrap_or("nobody")
        );
    }

    fn sync_turn(&mut self) {
        let mine = self.ledger.holds(self.local.identity());
        let theirs = match self.opponent_identity() {
            Some(peer) => self.ledger.holds(peer),
            None => false,
        };
        self.local.set_turn(mine);
        if let Some(opp) = self.opponent.as_mut() {
            opp.set_turn(theirs);
        }
    }

    /// Fire at `target`. Against the AI the whole exchange, including the
    /// AI's streak after a miss, completes inside this call.
    pub fn attack(&mut self, target: Position) -> Result<Vec<Message>, SessionError> {
        if self.phase != Phase::Battle {
            return Err(SessionError::WrongPhase(self.phase));
        }
        if self.pending_attack.is_some() {
            return Err(SessionError::AttackPending);
        }
        if !self.local.has_turn() {
            return Err(SessionError::NotYourTurn);
        }
        if self.target.is_resolved(target) {
            return Err(SessionError::AlreadyAttacked(target));
        }
        let Some(opponent) = self.opponent.as_mut() else {
            return Err(SessionError::WrongPhase(self.phase));
        };
        match opponent.receive_attack(target) {
            Strike::Resolved(outcome) => {
                self.apply_local_shot(outcome);
                Ok(Vec::new())
            }
            Strike::Dispatched => {
                self.pending_attack = Some(target);
                log::debug!("[{}] attack on {} dispatched", self.game_id, target);
                Ok(vec![Message::attack_start(
                    self.local.identity(),
                    &self.game_id,
                    target,
                )])
            }
        }
    }

    fn apply_local_shot(&mut self, outcome: AttackOutcome) {
        self.target
            .record(outcome.position, outcome.hit, outcome.sunk);
        self.history.push(AttackReport {
            attacker: Side::Local,
            outcome,
        });
        if outcome.fleet_defeated {
            self.finish(MatchOutcome::Victory);
            return;
        }
        if turn_after(Side::Local, outcome.hit) == Side::Local {
            return;
        }
        self.local.set_turn(false);
        let Some(opponent) = self.opponent.as_mut() else {
            return;
        };
        opponent.set_turn(true);
        let shots = opponent.take_turn(&mut self.rng, self.local.fleet_mut());
        let handed_back = !opponent.has_turn();
        for outcome in shots {
            self.history.push(AttackReport {
                attacker: Side::Opponent,
                outcome,
            });
            if outcome.fleet_defeated {
                self.finish(MatchOutcome::Defeat);
                return;
            }
        }
        if handed_back {
            self.local.set_turn(true);
        }
    }

    /// React to one inbound message, returning the replies to send.
    /// Messages that do not fit the current state are dropped.
    pub fn on_message(&mut self, msg: &Message) -> Vec<Message> {
        let verdict = screen(msg, &self.game_id, self.local.identity(), self.opponent_identity());
        if verdict != Screen::Accept {
            log::debug!(
                "[{}] dropping {:?} from {}: {:?}",
                self.game_id,
                msg.status,
                msg.from,
                verdict
            );
            return Vec::new();
        }
        let remote = self.opponent.as_ref().is_some_and(|o| o.awaits_start_signal());
        if !remote || self.is_finished() {
            log::debug!("[{}] dropping {:?} in {:?}", self.game_id, msg.status, self.phase);
            return Vec::new();
        }
        let known = self.opponent_identity().is_some();
        if let Some(opp) = self.opponent.as_mut() {
            opp.peer_joined(&msg.from);
        }
        match msg.status {
            Status::Join => self.on_join(known),
            Status::Ready => {
                if let Some(opp) = self.opponent.as_mut() {
                    opp.peer_ready();
                }
                self.try_start().into_iter().collect()
            }
            Status::Start => {
                if !self.owner && self.phase == Phase::AwaitingPeer {
                    self.enter_battle(msg);
                } else {
                    log::warn!("[{}] unexpected START in {:?}", self.game_id, self.phase);
                }
                Vec::new()
            }
            Status::AttackStart => self.on_attack_start(msg),
            Status::AttackResult => {
                self.on_attack_result(msg);
                Vec::new()
            }
            Status::Leave => {
                log::info!("[{}] {} left the match", self.game_id, msg.from);
                self.finish(MatchOutcome::OpponentLeft);
                Vec::new()
            }
        }
    }

    fn on_join(&mut self, known_before: bool) -> Vec<Message> {
        if known_before {
            return Vec::new();
        }
        log::info!(
            "[{}] opponent {} joined",
            self.game_id,
            self.opponent_identity().unwrap_or_default()
        );
        let mut replies = vec![self.message(Status::Join)];
        if self.local.fleet().is_fully_placed() {
            replies.push(self.message(Status::Ready));
        }
        replies
    }

    fn on_attack_start(&mut self, msg: &Message) -> Vec<Message> {
        let peer_turn = self.ledger.holds(&msg.from);
        let (Phase::Battle, true, Some(position)) = (self.phase, peer_turn, msg.position) else {
            log::warn!(
                "[{}] ignoring ATTACK_START from {} in {:?}",
                self.game_id,
                msg.from,
                self.phase
            );
            return Vec::new();
        };
        let outcome = resolve_attack(self.local.fleet_mut(), position);
        self.history.push(AttackReport {
            attacker: Side::Opponent,
            outcome,
        });
        let reply = Message::attack_result(
            self.local.identity(),
            &self.game_id,
            position,
            outcome.hit,
            &msg.from,
            outcome.sunk,
        );
        self.ledger = self.ledger.apply(&reply);
        self.sync_turn();
        if outcome.fleet_defeated {
            self.finish(MatchOutcome::Defeat);
        }
        vec![reply]
    }

    fn on_attack_result(&mut self, msg: &Message) {
        let mine = msg.attacker.as_deref() == Some(self.local.identity());
        let (true, Some(position), Some(hit)) = (mine, msg.position, msg.result) else {
            log::warn!("[{}] ignoring malformed ATTACK_RESULT from {}", self.game_id, msg.from);
            return;
        };
        if self.pending_attack != Some(position) {
            log::warn!(
                "[{}] ATTACK_RESULT for {} does not match pending {:?}",
                self.game_id,
                position,
                self.pending_attack
            );
            return;
        }
        self.pending_attack = None;
        let sunk = msg.sunk.as_deref().and_then(ship_name_static);
        self.target.record(position, hit, sunk);
        let outcome = AttackOutcome {
            position,
            hit,
            sunk,
            fleet_defeated: self.target.all_ship_cells_hit(),
        };
        self.history.push(AttackReport {
            attacker: Side::Local,
            outcome,
        });
        self.ledger = self.ledger.apply(msg);
        self.sync_turn();
        if outcome.fleet_defeated {
            self.finish(MatchOutcome::Victory);
        }
    }

    /// Leave the match. A peer match announces it with LEAVE.
    pub fn abandon(&mut self) -> Vec<Message> {
        if self.is_finished() {
            return Vec::new();
        }
        let remote = self.opponent.as_ref().is_some_and(|o| o.awaits_start_signal());
        self.finish(MatchOutcome::Abandoned);
        if remote {
            vec![self.message(Status::Leave)]
        } else {
            Vec::new()
        }
    }

    /// The transport to the opponent is gone.
    pub fn connection_lost(&mut self) {
        if !self.is_finished() {
            log::warn!("[{}] connection lost", self.game_id);
            self.finish(MatchOutcome::OpponentLeft);
        }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        self.phase = Phase::Finished(outcome);
        self.pending_attack = None;
        self.local.set_turn(false);
        if let Some(opp) = self.opponent.as_mut() {
            opp.set_turn(false);
        }
        log::info!("[{}] match finished: {:?}", self.game_id, outcome);
    }

    fn message(&self, status: Status) -> Message {
        Message::new(status, self.local.identity(), &self.game_id)
    }
}
