use super::{agent::Agent, error::GameError, position::Position};
use crate::games::chess::ChessBoard;
use rand::Rng;
use shakmaty::{san::SanPlus, Color, Outcome, Position as _};

/// The outcome of a game between two agents
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum MatchOutcome {
    WinFirst,
    WinSecond,
    Draw,
    /// The ply limit was reached
    Unfinished,
}

/// Two agents playing on one board.
///
/// The first agent plays the side to move at the start; turns then alternate
/// by move parity. Played moves are kept, so the game can be walked back and
/// forward.
pub struct Game<'a, P>
where
    P: Position,
{
    position: P,
    first: Box<dyn Agent<P> + 'a>,
    second: Box<dyn Agent<P> + 'a>,
    /// Every move played, including the ones undone with `back`
    history: Vec<P::Action>,
    /// How many moves of `history` are applied to the position
    cursor: usize,
    /// Side played by the first agent
    first_turn: Color,
}

impl<'a, P> Game<'a, P>
where
    P: Position,
{
    pub fn new(
        position: P,
        first: Box<dyn Agent<P> + 'a>,
        second: Box<dyn Agent<P> + 'a>,
    ) -> Self {
        Game {
            first_turn: position.turn(),
            position,
            first,
            second,
            history: vec![],
            cursor: 0,
        }
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    /// Moves applied to the position, in order
    pub fn moves(&self) -> &[P::Action] {
        &self.history[..self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Names of the first and second agent
    pub fn player_names(&self) -> (&str, &str) {
        (self.first.name(), self.second.name())
    }

    /// Side played by the first agent
    pub fn first_turn(&self) -> Color {
        self.first_turn
    }

    /// Asks the agent whose turn it is for a move and plays it.
    ///
    /// If the game was walked back, the recorded moves are replayed first.
    pub fn play_turn(&mut self) -> Result<P::Action, GameError> {
        self.to_end();

        if let Some(outcome) = self.position.outcome() {
            return Err(GameError::GameOver(outcome));
        }

        let first_to_move = self.cursor % 2 == 0;
        debug_assert_eq!(
            self.position.turn() == self.first_turn,
            first_to_move,
            "move parity and side to move disagree"
        );

        let agent = if first_to_move {
            &mut self.first
        } else {
            &mut self.second
        };

        let action = agent.next_action(&mut self.position)?;

        if !self.position.is_legal(&action) {
            return Err(GameError::IllegalMove {
                player: agent.name().to_string(),
                action: format!("{:?}", action),
            });
        }

        self.position.push(&action);
        self.history.push(action.clone());
        self.cursor += 1;

        Ok(action)
    }

    /// Undoes one move. Returns false at the start of the game.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        self.position.pop();
        self.cursor -= 1;
        true
    }

    /// Replays one undone move. Returns false at the end of the recorded line.
    pub fn forward(&mut self) -> bool {
        let Some(action) = self.history.get(self.cursor) else {
            return false;
        };

        self.position.push(action);
        self.cursor += 1;
        true
    }

    pub fn to_end(&mut self) {
        while self.forward() {}
    }

    /// Plays until the game is over or `max_plies` more moves were played
    pub fn play_to_end(&mut self, max_plies: usize) -> Result<MatchOutcome, GameError> {
        for _ in 0..max_plies {
            match self.play_turn() {
                Ok(_) => {}
                Err(GameError::GameOver(_)) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(self.outcome())
    }

    /// The result of the game so far, from the agents' point of view
    pub fn outcome(&self) -> MatchOutcome {
        match self.position.outcome() {
            Some(Outcome::Decisive { winner }) if winner == self.first_turn => {
                MatchOutcome::WinFirst
            }
            Some(Outcome::Decisive { .. }) => MatchOutcome::WinSecond,
            Some(Outcome::Draw) => MatchOutcome::Draw,
            None => MatchOutcome::Unfinished,
        }
    }

    /// Goes back to the starting position, forgets the moves and randomly
    /// decides which agent moves first
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.back() {}
        self.history.clear();

        if rng.gen_bool(0.5) {
            std::mem::swap(&mut self.first, &mut self.second);
        }
    }
}

impl<'a> Game<'a, ChessBoard> {
    /// Moves played since the root of the board in SAN, numbered:
    /// `1. e4 e5 2. Nf3`
    pub fn san_moves(&self) -> String {
        let mut position = self.position.root().clone();
        let mut tokens = Vec::new();

        for mov in self.position.moves() {
            if position.turn() == Color::White {
                tokens.push(format!("{}.", position.fullmoves()));
            } else if tokens.is_empty() {
                tokens.push(format!("{}...", position.fullmoves()));
            }

            let san = SanPlus::from_move_and_play_unchecked(&mut position, mov);
            tokens.push(san.to_string());
        }

        tokens.join(" ")
    }
}
