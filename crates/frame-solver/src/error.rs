use member_gen::GenerateError;
use modeling_ops::OpError;

/// Errors that stop a solve before any result is produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SolveError {
    #[error("missing {role} profile")]
    MissingProfile { role: &'static str },

    #[error("frame width {width} is too narrow for columns with half-width {col_half_width}")]
    WidthTooNarrow { width: f64, col_half_width: f64 },

    #[error("frame height {height} leaves no column above a {bp_thickness} base plate")]
    HeightTooLow { height: f64, bp_thickness: f64 },

    #[error("num_frames must be at least 1")]
    NoFrames,

    #[error("failed to generate {part}: {source}")]
    Generate {
        part: &'static str,
        #[source]
        source: GenerateError,
    },

    #[error("operation error: {0}")]
    Op(#[from] OpError),
}

impl SolveError {
    pub(crate) fn generate(part: &'static str) -> impl FnOnce(GenerateError) -> SolveError {
        move |source| SolveError::Generate { part, source }
    }
}
