use shakmaty::{Color, Outcome};
use std::fmt::Debug;

/// A game position that is mutated in place.
///
/// Actions are applied with `push` and undone with `pop`, so a search walks the
/// whole tree on a single board. Every `push` must be paired with a `pop`
/// before control returns to the caller, otherwise sibling branches are
/// evaluated on the wrong position.
pub trait Position {
    type Action: Clone + Debug + PartialEq;

    /// Lists all legal actions from the current position.
    /// The order is defined by the rules implementation and is stable.
    fn valid_actions(&self) -> Vec<Self::Action>;

    /// Whether the action can be played in the current position
    fn is_legal(&self, action: &Self::Action) -> bool;

    /// Applies the action. It is assumed to be legal.
    fn push(&mut self, action: &Self::Action);

    /// Undoes the last action, if any
    fn pop(&mut self) -> Option<Self::Action>;

    /// The side to move
    fn turn(&self) -> Color;

    /// The outcome of the game, if it is over
    fn outcome(&self) -> Option<Outcome>;

    /// Whether the game is over (checkmate, stalemate or a forced draw)
    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}
