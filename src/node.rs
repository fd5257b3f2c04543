#![cfg(feature = "std")]

//! Drives a [`MatchSession`] with a [`Controller`] for the local intents.
//!
//! [`PeerNode`] runs one side of a relay match: it sends what the session
//! emits and feeds it whatever the transport delivers. [`run_versus_ai`] is
//! the synchronous equivalent against the local AI.

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;
use std::sync::Arc;

use rand::rngs::SmallRng;
use tokio::sync::Notify;

use crate::config::NetConfig;
use crate::core::AttackReport;
use crate::player::Controller;
use crate::protocol::Message;
use crate::session::{MatchOutcome, MatchSession, Mode, Phase, SessionError};
use crate::transport::{send_deferred, PeerGone, Transport};

pub struct PeerNode {
    session: MatchSession,
    transport: Box<dyn Transport>,
    controller: Box<dyn Controller>,
    rng: SmallRng,
    config: NetConfig,
    reported: usize,
    quit: Option<Arc<Notify>>,
}

impl PeerNode {
    pub fn new(
        session: MatchSession,
        transport: Box<dyn Transport>,
        controller: Box<dyn Controller>,
        rng: SmallRng,
        config: NetConfig,
    ) -> Self {
        Self {
            session,
            transport,
            controller,
            rng,
            config,
            reported: 0,
            quit: None,
        }
    }

    /// A notification on `quit` abandons the match and tells the opponent.
    /// It takes effect while the node waits for the opponent.
    pub fn with_quit_signal(mut self, quit: Arc<Notify>) -> Self {
        self.quit = Some(quit);
        self
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    /// Play the match to its end. `owner` marks the side that created the
    /// match; it starts the battle and fires first. The transport is shut
    /// down once the match is over.
    pub async fn run(&mut self, owner: bool) -> anyhow::Result<MatchOutcome> {
        let outcome = self.play(owner).await;
        self.transport.shutdown();
        outcome
    }

    async fn play(&mut self, owner: bool) -> anyhow::Result<MatchOutcome> {
        let join = self
            .session
            .choose_mode(Mode::Peer { owner })
            .map_err(|e| anyhow::anyhow!(e))?;
        self.dispatch(join).await?;

        if !self.place_fleet().await {
            let leave = self.session.abandon();
            let _ = self.dispatch(leave).await;
        }

        loop {
            self.flush_reports();
            if let Phase::Finished(outcome) = self.session.phase() {
                return Ok(outcome);
            }
            if self.can_fire() {
                self.fire().await;
                continue;
            }
            let Some(received) = self.next_message().await else {
                log::info!("[{}] quitting", self.session.game_id());
                let leave = self.session.abandon();
                let _ = self.dispatch(leave).await;
                continue;
            };
            match received {
                Ok(msg) => {
                    let replies = self.session.on_message(&msg);
                    if let Err(e) = self.dispatch(replies).await {
                        log::warn!("[{}] reply failed: {}", self.session.game_id(), e);
                        self.session.connection_lost();
                    }
                }
                // Someone left before an opponent showed up.
                Err(e) if e.is::<PeerGone>() && self.session.opponent_identity().is_none() => {
                    log::debug!("[{}] {} while waiting", self.session.game_id(), e);
                }
                Err(e) => {
                    log::warn!("[{}] receive failed: {}", self.session.game_id(), e);
                    self.session.connection_lost();
                }
            }
        }
    }

    /// Next inbound message, or `None` if the quit signal fired first.
    async fn next_message(&mut self) -> Option<anyhow::Result<Message>> {
        let Some(quit) = self.quit.clone() else {
            return Some(self.transport.recv().await);
        };
        tokio::select! {
            received = self.transport.recv() => Some(received),
            _ = quit.notified() => None,
        }
    }

    /// Returns false if the controller gave up.
    async fn place_fleet(&mut self) -> bool {
        while self.session.phase() == Phase::Placement {
            let Some((start, direction)) = self.controller.choose_placement(
                &mut self.rng,
                self.session.local_fleet(),
                self.session.direction(),
            ) else {
                return false;
            };
            self.session.set_direction(direction);
            match self.session.place_ship(start) {
                Ok(outbound) => {
                    if let Err(e) = self.dispatch(outbound).await {
                        log::warn!("[{}] send failed: {}", self.session.game_id(), e);
                        self.session.connection_lost();
                    }
                }
                Err(e) => self.controller.handle_rejection(&e.to_string()),
            }
        }
        true
    }

    fn can_fire(&self) -> bool {
        self.session.phase() == Phase::Battle
            && self.session.local_has_turn()
            && self.session.pending_attack().is_none()
    }

    async fn fire(&mut self) {
        let Some(target) = self
            .controller
            .select_target(&mut self.rng, self.session.target_board())
        else {
            let leave = self.session.abandon();
            let _ = self.dispatch(leave).await;
            return;
        };
        match self.session.attack(target) {
            Ok(outbound) => {
                if let Err(e) = self.dispatch(outbound).await {
                    log::warn!("[{}] attack not sent: {}", self.session.game_id(), e);
                    self.session.connection_lost();
                }
            }
            Err(e) => self.controller.handle_rejection(&e.to_string()),
        }
    }

    async fn dispatch(&mut self, outbound: Vec<Message>) -> anyhow::Result<()> {
        for msg in outbound {
            send_deferred(self.transport.as_mut(), msg, self.config.send_retry_delay).await?;
        }
        Ok(())
    }

    fn flush_reports(&mut self) {
        let fresh: Vec<AttackReport> = self.session.history()[self.reported..].to_vec();
        self.reported += fresh.len();
        for report in &fresh {
            self.controller.handle_report(report);
        }
    }
}

/// Play a whole match against the local AI. Rejected intents are passed
/// back to the controller, which is asked again.
pub fn run_versus_ai(
    session: &mut MatchSession,
    controller: &mut dyn Controller,
    rng: &mut SmallRng,
) -> Result<MatchOutcome, SessionError> {
    session.choose_mode(Mode::VersusAi)?;
    let mut reported = 0;
    loop {
        for report in &session.history()[reported..] {
            controller.handle_report(report);
        }
        reported = session.history().len();
        match session.phase() {
            Phase::Finished(outcome) => return Ok(outcome),
            Phase::Placement => {
                match controller.choose_placement(rng, session.local_fleet(), session.direction()) {
                    Some((start, direction)) => {
                        session.set_direction(direction);
                        if let Err(e) = session.place_ship(start) {
                            controller.handle_rejection(&e.to_string());
                        }
                    }
                    None => {
                        session.abandon();
                    }
                }
            }
            Phase::Battle => match controller.select_target(rng, session.target_board()) {
                Some(target) => {
                    if let Err(e) = session.attack(target) {
                        controller.handle_rejection(&e.to_string());
                    }
                }
                None => {
                    session.abandon();
                }
            },
            phase => return Err(SessionError::WrongPhase(phase)),
        }
    }
}
