use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// A quad referenced a term of unsupported kind, or the N-Quads parser
    /// could not make sense of its input. Raised at the boundary, before the
    /// canonicalization core runs.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The iterative hasher exceeded its iteration bound without reaching a
    /// fixed point. Diagnostic only: this indicates a `hashBag` collision,
    /// not a bug in the caller's dataset.
    #[error("hash collision: fixed point not reached after {0} iterations")]
    HashCollision(usize),

    /// `distinguish` was cut off by its recursion budget before a minimum
    /// could be certified. The partial minimum is discarded, not returned.
    #[error("computation budget of {0} distinguish calls exceeded")]
    ComputationBudgetExceeded(usize),

    /// An assertion failure: e.g. `distinguish` invoked on a trivial hash
    /// table, or a blank node missing from the table. Indicates a bug in
    /// this crate, not in the caller's input.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}
