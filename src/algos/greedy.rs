use super::orient;
use crate::core::{error::SearchError, evaluator::Evaluator, position::Position};

/// One-ply search: plays every legal move, scores the resulting position and
/// keeps the best one for the side to move.
///
/// Ties keep the first move found. The returned score is oriented to the side
/// to move (see `orient`).
pub fn greedy<P, E>(position: &mut P, evaluator: &mut E) -> Result<(P::Action, f32), SearchError>
where
    P: Position,
    E: Evaluator<P> + ?Sized,
{
    let perspective = position.turn();
    let mut best: Option<(P::Action, f32)> = None;

    for action in position.valid_actions() {
        position.push(&action);
        let score = evaluator.evaluate(position);
        position.pop();

        let score = orient(score?, perspective);

        if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
            best = Some((action, score));
        }
    }

    best.ok_or(SearchError::NoLegalMove)
}
