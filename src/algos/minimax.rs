//! Exhaustive minimax without pruning.
//!
//! Far too slow to play with, it is the reference the alpha-beta search is
//! checked against.

use super::orient;
use crate::core::{
    error::{EvaluationError, SearchError},
    evaluator::Evaluator,
    position::Position,
};
use shakmaty::Color;

/// Value of the position for `perspective`, searching every line `depth`
/// plies deep
pub fn minimax<P, E>(
    position: &mut P,
    depth: usize,
    evaluator: &mut E,
    perspective: Color,
) -> Result<f32, EvaluationError>
where
    P: Position,
    E: Evaluator<P> + ?Sized,
{
    let actions = if depth == 0 || position.is_terminal() {
        vec![]
    } else {
        position.valid_actions()
    };

    if actions.is_empty() {
        return Ok(orient(evaluator.evaluate(position)?, perspective));
    }

    let maximizing = position.turn() == perspective;
    let mut best = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };

    for action in actions {
        position.push(&action);
        let value = minimax(position, depth - 1, evaluator, perspective);
        position.pop();
        let value = value?;

        best = if maximizing {
            best.max(value)
        } else {
            best.min(value)
        };
    }

    Ok(best)
}

/// Best move for the side to move, `depth` plies deep (at least 1).
/// The first move with the best score wins.
pub fn select_move<P, E>(
    position: &mut P,
    depth: usize,
    evaluator: &mut E,
) -> Result<(P::Action, f32), SearchError>
where
    P: Position,
    E: Evaluator<P> + ?Sized,
{
    let perspective = position.turn();
    let mut best: Option<(P::Action, f32)> = None;

    for action in position.valid_actions() {
        position.push(&action);
        let score = minimax(position, depth.max(1) - 1, evaluator, perspective);
        position.pop();
        let score = score?;

        if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
            best = Some((action, score));
        }
    }

    best.ok_or(SearchError::NoLegalMove)
}
