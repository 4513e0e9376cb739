use shakmaty::Color;

pub mod alphabeta;
pub mod greedy;
pub mod minimax;

/// Turns a White-relative score into a score for `perspective`:
/// higher is always better for the side that asked.
#[inline]
pub fn orient(score: f32, perspective: Color) -> f32 {
    perspective.fold_wb(score, -score)
}
