use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{Game, TurnState};
use crate::error::GameError;
use crate::models::{ClientAction, ServerReply};

/// Everything a connection can tell the match.
#[derive(Debug)]
pub enum MatchCommand {
    Action { seat: usize, action: ClientAction },
    Malformed { seat: usize, reason: String },
    Disconnect { seat: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Finished { winner: usize },
    Abandoned { seat: usize },
    /// Every connection went away without reporting.
    Closed,
}

/// A reply addressed to one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub seat: usize,
    pub reply: ServerReply,
}

#[derive(Debug, Default)]
pub struct Dispatch {
    pub deliveries: Vec<Delivery>,
    pub outcome: Option<MatchOutcome>,
}

impl Dispatch {
    fn to(seat: usize, reply: ServerReply) -> Self {
        Self {
            deliveries: vec![Delivery { seat, reply }],
            outcome: None,
        }
    }
}

/// Owns the game and applies commands one at a time.
///
/// Connection tasks only ever talk to the manager through the command
/// channel, so exactly one mutation is in flight at any moment.
pub struct MatchManager {
    game: Game,
    seats: Vec<mpsc::Sender<String>>,
    /// Set once the current player has made their primary action.
    blocked: bool,
}

impl MatchManager {
    pub fn new(game: Game, seats: Vec<mpsc::Sender<String>>) -> Self {
        Self {
            game,
            seats,
            blocked: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Seat index plus the initial state, for every seat.
    pub fn opening(&self) -> serde_json::Result<Vec<Delivery>> {
        let state = self.game.encode_state()?;
        Ok((0..self.seats.len())
            .map(|seat| Delivery {
                seat,
                reply: ServerReply::Start {
                    seat,
                    state: state.clone(),
                },
            })
            .collect())
    }

    pub async fn run(mut self, mut rx: mpsc::Receiver<MatchCommand>) -> anyhow::Result<MatchOutcome> {
        let opening = self.opening()?;
        if let Some(outcome) = self.deliver(opening) {
            return Ok(outcome);
        }

        while let Some(cmd) = rx.recv().await {
            let dispatch = self.handle_command(cmd)?;
            let stalled = self.deliver(dispatch.deliveries);
            if let Some(outcome) = dispatch.outcome.or(stalled) {
                tracing::info!(?outcome, "match over");
                return Ok(outcome);
            }
        }
        tracing::info!("match command channel closed");
        Ok(MatchOutcome::Closed)
    }

    /// Queue replies without waiting. A seat whose queue is full has stopped
    /// reading and abandons the match.
    fn deliver(&self, deliveries: Vec<Delivery>) -> Option<MatchOutcome> {
        let mut stalled = None;
        for Delivery { seat, reply } in deliveries {
            let Some(tx) = self.seats.get(seat) else {
                continue;
            };
            match tx.try_send(reply.into_payload()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(seat, "reply queue full, dropping seat");
                    stalled.get_or_insert(MatchOutcome::Abandoned { seat });
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!(seat, "connection gone before reply was sent");
                }
            }
        }
        stalled
    }

    pub fn handle_command(&mut self, cmd: MatchCommand) -> serde_json::Result<Dispatch> {
        match cmd {
            MatchCommand::Action { seat, action } => self.handle_action(seat, action),
            MatchCommand::Malformed { seat, reason } => {
                tracing::warn!(seat, %reason, "malformed action");
                Ok(Dispatch::to(seat, ServerReply::Rejected))
            }
            MatchCommand::Disconnect { seat } => {
                tracing::info!(seat, "player disconnected");
                Ok(Dispatch {
                    deliveries: vec![],
                    outcome: Some(MatchOutcome::Abandoned { seat }),
                })
            }
        }
    }

    fn handle_action(&mut self, seat: usize, action: ClientAction) -> serde_json::Result<Dispatch> {
        let current = self.game.current_player_index();
        if seat != current {
            tracing::warn!(seat, current, %action, "action out of turn");
            return Ok(Dispatch::to(seat, ServerReply::Rejected));
        }

        if action.is_finish_turn() {
            return self.finish_turn();
        }

        if self.blocked {
            tracing::debug!(seat, %action, "turn already used");
            return Ok(Dispatch::to(seat, ServerReply::Rejected));
        }

        match self.apply(action) {
            Ok(()) => {
                tracing::debug!(seat, %action, "action accepted");
                self.blocked = true;
                Ok(Dispatch::to(seat, ServerReply::State(self.game.encode_state()?)))
            }
            Err(err) => {
                tracing::debug!(seat, %action, %err, "action rejected");
                Ok(Dispatch::to(seat, ServerReply::Rejected))
            }
        }
    }

    fn apply(&mut self, action: ClientAction) -> Result<(), GameError> {
        match action {
            ClientAction::BuyCard { row, col } => self.game.buy_board_card(row, col).map(|_| ()),
            ClientAction::TakeTwo(color) => self.game.take_two_gems(color),
            ClientAction::TakeThree(colors) => self.game.take_three_gems(&colors),
            ClientAction::FinishTurn => Ok(()),
        }
    }

    fn finish_turn(&mut self) -> serde_json::Result<Dispatch> {
        self.blocked = false;
        let state = match self.game.end_turn_checks() {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(%err, "finish turn refused");
                return Ok(Dispatch::to(self.game.current_player_index(), ServerReply::Rejected));
            }
        };

        let snapshot = self.game.encode_state()?;
        let deliveries = (0..self.seats.len())
            .map(|seat| Delivery {
                seat,
                reply: ServerReply::State(snapshot.clone()),
            })
            .collect();
        let outcome = match state {
            TurnState::Over { winner } => Some(MatchOutcome::Finished { winner }),
            TurnState::AwaitingAction(_) => None,
        };
        Ok(Dispatch { deliveries, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_game::{CardField, Deck};
    use crate::domain::{Card, Color, GemSet};
    use crate::models::GameSnapshot;

    fn manager() -> (MatchManager, Vec<mpsc::Receiver<String>>) {
        let cheap = (0..6)
            .map(|i| Card::new(format!("c{i}"), Color::Red, 0, GemSet::new([1, 0, 0, 0, 0])))
            .collect();
        let crown = vec![Card::new("crown", Color::Blue, 15, GemSet::EMPTY)];
        let field = CardField::new(vec![Deck::stacked(cheap), Deck::stacked(crown)]);
        let mut game = Game::with_card_field(vec!["ada".into(), "bob".into()], field).unwrap();
        game.lay_out_all();

        let (txs, rxs): (Vec<_>, Vec<_>) = (0..2).map(|_| mpsc::channel(8)).unzip();
        (MatchManager::new(game, txs), rxs)
    }

    fn act(m: &mut MatchManager, seat: usize, payload: &str) -> Dispatch {
        let action = ClientAction::parse(payload).unwrap();
        m.handle_command(MatchCommand::Action { seat, action }).unwrap()
    }

    fn only_reply(d: &Dispatch, seat: usize) -> &ServerReply {
        assert_eq!(d.deliveries.len(), 1);
        assert_eq!(d.deliveries[0].seat, seat);
        &d.deliveries[0].reply
    }

    fn snapshot(reply: &ServerReply) -> GameSnapshot {
        match reply {
            ServerReply::State(json) => serde_json::from_str(json).unwrap(),
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn test_opening_tells_each_seat_its_index() {
        let (m, _rx) = manager();
        let opening = m.opening().unwrap();
        assert_eq!(opening.len(), 2);
        for (seat, d) in opening.iter().enumerate() {
            assert_eq!(d.seat, seat);
            let payload = d.reply.clone().into_payload();
            assert!(payload.starts_with(&format!("{seat}{{\"winner\":\"\"")));
        }
    }

    #[test]
    fn test_accepted_action_blocks_turn() {
        let (mut m, _rx) = manager();
        let d = act(&mut m, 0, "2123");
        let s = snapshot(only_reply(&d, 0));
        assert_eq!(s.bank.gems.as_array(), [4, 3, 3, 3, 4]);
        assert!(m.is_blocked());

        let d = act(&mut m, 0, "10");
        assert_eq!(only_reply(&d, 0), &ServerReply::Rejected);
        assert_eq!(m.game().bank().gems().get(Color::Brown), 4);
    }

    #[test]
    fn test_rejection_does_not_block() {
        let (mut m, _rx) = manager();
        let d = act(&mut m, 0, "2001");
        assert_eq!(only_reply(&d, 0), &ServerReply::Rejected);
        assert!(!m.is_blocked());

        let d = act(&mut m, 0, "099");
        assert_eq!(only_reply(&d, 0), &ServerReply::Rejected);

        let d = act(&mut m, 0, "14");
        assert!(matches!(only_reply(&d, 0), ServerReply::State(_)));
    }

    #[test]
    fn test_out_of_turn_is_rejected() {
        let (mut m, _rx) = manager();
        for payload in ["10", "3"] {
            let d = act(&mut m, 1, payload);
            assert_eq!(only_reply(&d, 1), &ServerReply::Rejected);
        }
        assert_eq!(m.game().current_player_index(), 0);
        assert_eq!(m.game().bank().gems().get(Color::Brown), 4);
    }

    #[test]
    fn test_finish_turn_broadcasts_and_unblocks() {
        let (mut m, _rx) = manager();
        act(&mut m, 0, "10");
        let d = act(&mut m, 0, "3");
        assert!(!m.is_blocked());
        assert!(d.outcome.is_none());
        assert_eq!(d.deliveries.len(), 2);
        for (seat, delivery) in d.deliveries.iter().enumerate() {
            assert_eq!(delivery.seat, seat);
            assert_eq!(snapshot(&delivery.reply).current_player, "1");
        }

        // seat 1 may act now
        let d = act(&mut m, 1, "11");
        assert!(matches!(only_reply(&d, 1), ServerReply::State(_)));
    }

    #[test]
    fn test_finish_turn_without_action() {
        let (mut m, _rx) = manager();
        let d = act(&mut m, 0, "3");
        assert_eq!(d.deliveries.len(), 2);
        assert_eq!(m.game().current_player_index(), 1);
    }

    #[test]
    fn test_malformed_is_rejected_for_any_seat() {
        let (mut m, _rx) = manager();
        let d = m
            .handle_command(MatchCommand::Malformed { seat: 1, reason: "9".into() })
            .unwrap();
        assert_eq!(only_reply(&d, 1), &ServerReply::Rejected);
        assert!(d.outcome.is_none());
    }

    #[test]
    fn test_win_ends_match() {
        let (mut m, _rx) = manager();
        act(&mut m, 0, "010");
        assert_eq!(m.game().players()[0].points, 15);

        let d = act(&mut m, 0, "3");
        assert_eq!(d.outcome, Some(MatchOutcome::Finished { winner: 0 }));
        assert_eq!(d.deliveries.len(), 2);
        for delivery in &d.deliveries {
            assert_eq!(snapshot(&delivery.reply).winner, "0");
        }
    }

    #[test]
    fn test_disconnect_abandons() {
        let (mut m, _rx) = manager();
        let d = m.handle_command(MatchCommand::Disconnect { seat: 1 }).unwrap();
        assert!(d.deliveries.is_empty());
        assert_eq!(d.outcome, Some(MatchOutcome::Abandoned { seat: 1 }));
    }

    #[tokio::test]
    async fn test_run_delivers_in_order() {
        let (m, mut rxs) = manager();
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(m.run(rx));

        let start0 = rxs[0].recv().await.unwrap();
        let start1 = rxs[1].recv().await.unwrap();
        assert!(start0.starts_with('0'));
        assert!(start1.starts_with('1'));

        let action = ClientAction::parse("2012").unwrap();
        tx.send(MatchCommand::Action { seat: 0, action }).await.unwrap();
        let reply: GameSnapshot = serde_json::from_str(&rxs[0].recv().await.unwrap()).unwrap();
        assert_eq!(reply.player(0).unwrap().assets, GemSet::new([1, 1, 1, 0, 0]));

        tx.send(MatchCommand::Disconnect { seat: 0 }).await.unwrap();
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, MatchOutcome::Abandoned { seat: 0 });
    }

    #[tokio::test]
    async fn test_run_drops_seat_that_stops_reading() {
        let (m, _) = manager();
        let game = m.game;
        let (tx0, _rx0) = mpsc::channel(1);
        let (tx1, _rx1) = mpsc::channel(8);
        let m = MatchManager::new(game, vec![tx0, tx1]);

        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(m.run(rx));
        // seat 0's queue already holds the start message
        tx.send(MatchCommand::Malformed { seat: 0, reason: "9".into() }).await.unwrap();

        let outcome = tokio::time::timeout(std::time::Duration::from_secs(2), task)
            .await
            .expect("manager blocked on a full queue")
            .unwrap()
            .unwrap();
        assert_eq!(outcome, MatchOutcome::Abandoned { seat: 0 });
    }

    #[tokio::test]
    async fn test_run_ends_when_channel_closes() {
        let (m, _rxs) = manager();
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        assert_eq!(m.run(rx).await.unwrap(), MatchOutcome::Closed);
    }
}
