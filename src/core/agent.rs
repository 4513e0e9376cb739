use super::{error::SearchError, position::Position};

/// A move selection strategy
pub trait Agent<P>
where
    P: Position,
{
    /// Display name of the strategy
    fn name(&self) -> &str;

    /// Returns the next action to take given the current position.
    /// The position must be left as it was found.
    fn next_action(&mut self, position: &mut P) -> Result<P::Action, SearchError>;
}
