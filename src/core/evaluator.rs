use super::{error::EvaluationError, position::Position};

/// Scores positions.
///
/// Scores are always from White's point of view, never relative to the side
/// to move. The position may be touched while scoring but must be observably
/// unchanged afterwards.
pub trait Evaluator<P>
where
    P: Position,
{
    fn evaluate(&mut self, position: &mut P) -> Result<f32, EvaluationError>;
}

impl<P, E> Evaluator<P> for Box<E>
where
    P: Position,
    E: Evaluator<P> + ?Sized,
{
    fn evaluate(&mut self, position: &mut P) -> Result<f32, EvaluationError> {
        (**self).evaluate(position)
    }
}
