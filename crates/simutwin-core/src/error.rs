/// Errors raised while building a simulation from a client layout.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The layout contained no machine entries, so there is no line to run.
    #[error("layout contains no machines")]
    EmptyLayout,

    /// The layout payload was not a list of objects.
    #[error("invalid layout: {detail}")]
    InvalidLayout { detail: String },
}
