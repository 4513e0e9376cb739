//! Scoring networks.
//!
//! A network maps an encoded position to a single score in [0, 1] (sigmoid
//! output), from White's point of view. The search never sees the network
//! directly, it goes through `evaluators::network::NetworkEvaluator`.

use super::encoding::PositionTensor;
use crate::core::error::EvaluationError;

/// Something that scores an encoded position
pub trait ScoreFunction {
    fn score(&mut self, tensor: &PositionTensor) -> Result<f32, EvaluationError>;
}

/// Any closure over a tensor is a (infallible) score function
impl<F> ScoreFunction for F
where
    F: FnMut(&PositionTensor) -> f32,
{
    fn score(&mut self, tensor: &PositionTensor) -> Result<f32, EvaluationError> {
        Ok(self(tensor))
    }
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

#[cfg(feature = "onnx")]
mod onnx {
    use super::ScoreFunction;
    use crate::core::error::EvaluationError;
    use crate::nn::encoding::{PositionTensor, CHANNELS};
    use ort::session::{builder::GraphOptimizationLevel, Session};
    use ort::value::Value;
    use std::path::Path;
    use tracing::info;

    /// A scoring network exported to ONNX.
    ///
    /// Input: one f32 tensor of shape (1, 14, 8, 8).
    /// Output: the first element of the first output is the score.
    pub struct OnnxModel {
        session: Session,
        /// Number of inferences run
        inferences: usize,
    }

    impl OnnxModel {
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EvaluationError> {
            let session = Session::builder()
                .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
                .and_then(|b| b.with_intra_threads(1))
                .and_then(|b| b.commit_from_file(path.as_ref()))
                .map_err(|e| {
                    EvaluationError::Model(format!(
                        "failed to load {}: {}",
                        path.as_ref().display(),
                        e
                    ))
                })?;

            info!(path = %path.as_ref().display(), "loaded scoring network");

            Ok(OnnxModel {
                session,
                inferences: 0,
            })
        }

        pub fn inferences(&self) -> usize {
            self.inferences
        }
    }

    impl ScoreFunction for OnnxModel {
        fn score(&mut self, tensor: &PositionTensor) -> Result<f32, EvaluationError> {
            let input = Value::from_array((
                [1_usize, CHANNELS, 8, 8],
                tensor.iter().copied().collect::<Vec<f32>>(),
            ))
            .map_err(|e| EvaluationError::Model(format!("bad input tensor: {}", e)))?;

            let outputs = self
                .session
                .run(ort::inputs![input])
                .map_err(|e| EvaluationError::Model(format!("inference failed: {}", e)))?;

            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| EvaluationError::Model(format!("bad output tensor: {}", e)))?;

            self.inferences += 1;

            data.first()
                .copied()
                .ok_or_else(|| EvaluationError::Model("empty output tensor".to_string()))
        }
    }
}
