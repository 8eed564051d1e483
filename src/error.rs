use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Vincenty iteration did not converge within the iteration cap.
    /// Happens for (near) antipodal points: distance and course
    /// should then be treated as unknown.
    #[error("geodesic iteration limit exceeded")]
    IterationLimitExceeded,

    /// Reading an input source or writing a track failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
