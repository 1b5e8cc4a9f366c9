/// Errors reported by the transformation engine and projection math
use crate::Float;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unsupported projection plane {0:?} (expected \"xy\", \"xz\" or \"yz\")")]
    UnsupportedPlane(String),
    #[error("vertex {index} sits on the perspective singularity (depth {depth})")]
    DegenerateProjection { index: usize, depth: Float },
}

pub type Result<T> = std::result::Result<T, Error>;
