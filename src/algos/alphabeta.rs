use super::orient;
use crate::core::{
    error::{EvaluationError, SearchError},
    evaluator::Evaluator,
    position::Position,
};
use shakmaty::Color;
use tracing::debug;

/// Depth-limited minimax with alpha-beta pruning over a single mutable board.
///
/// Scores are oriented to `perspective`: maximizing nodes are the ones where
/// `perspective` picks the move.
pub struct AlphaBeta<'a, E: ?Sized> {
    evaluator: &'a mut E,
    perspective: Color,
    /// Nodes visited by the last search
    nodes: usize,
    /// Static evaluations done by the last search
    evaluations: usize,
}

impl<'a, E: ?Sized> AlphaBeta<'a, E> {
    pub fn new(evaluator: &'a mut E, perspective: Color) -> Self {
        AlphaBeta {
            evaluator,
            perspective,
            nodes: 0,
            evaluations: 0,
        }
    }

    pub fn perspective(&self) -> Color {
        self.perspective
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn static_eval<P>(&mut self, position: &mut P) -> Result<f32, EvaluationError>
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.evaluations += 1;
        let score = self.evaluator.evaluate(position)?;
        Ok(orient(score, self.perspective))
    }

    /// Value of the position searched `depth` plies deep inside the
    /// (alpha, beta) window.
    ///
    /// Leaves (depth 0, finished games, no legal moves) are scored statically.
    /// Values outside the window are bounds, not exact values.
    pub fn minimax<P>(
        &mut self,
        position: &mut P,
        depth: usize,
        mut alpha: f32,
        mut beta: f32,
        maximizing: bool,
    ) -> Result<f32, EvaluationError>
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.nodes += 1;

        if depth == 0 || position.is_terminal() {
            return self.static_eval(position);
        }

        let actions = position.valid_actions();
        if actions.is_empty() {
            return self.static_eval(position);
        }

        if maximizing {
            let mut value = f32::NEG_INFINITY;

            for action in actions {
                position.push(&action);
                let child = self.minimax(position, depth - 1, alpha, beta, false);
                position.pop();

                value = value.max(child?);
                alpha = alpha.max(value);

                // cutoff
                if beta <= alpha {
                    break;
                }
            }

            Ok(value)
        } else {
            let mut value = f32::INFINITY;

            for action in actions {
                position.push(&action);
                let child = self.minimax(position, depth - 1, alpha, beta, true);
                position.pop();

                value = value.min(child?);
                beta = beta.min(value);

                // cutoff
                if beta <= alpha {
                    break;
                }
            }

            Ok(value)
        }
    }

    /// Best move for the side to move, searching `depth` plies (the root move
    /// included, so depth 1 is a greedy search). A depth of 0 is treated as 1.
    ///
    /// The side to move becomes the perspective of the search. The first move
    /// with the best score wins.
    pub fn select_move<P>(
        &mut self,
        position: &mut P,
        depth: usize,
    ) -> Result<(P::Action, f32), SearchError>
    where
        P: Position,
        E: Evaluator<P>,
    {
        let depth = depth.max(1);
        let actions = position.valid_actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalMove);
        }

        self.perspective = position.turn();
        self.nodes = 0;
        self.evaluations = 0;

        let mut best: Option<(P::Action, f32)> = None;
        // siblings only need to beat the best score so far
        let mut alpha = f32::NEG_INFINITY;

        for action in actions {
            position.push(&action);
            let score = self.minimax(position, depth - 1, alpha, f32::INFINITY, false);
            position.pop();
            let score = score?;

            if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
                best = Some((action, score));
            }
            alpha = alpha.max(score);
        }

        debug!(
            depth,
            nodes = self.nodes,
            evaluations = self.evaluations,
            "alpha-beta search done"
        );

        best.ok_or(SearchError::NoLegalMove)
    }
}
