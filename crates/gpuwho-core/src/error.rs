use thiserror::Error;

/// All errors produced by gpuwho.
#[derive(Error, Debug)]
pub enum GpuWhoError {
    /// The nvidia-smi executable could not be started at all.
    #[error("failed to launch nvidia-smi: {source}")]
    SmiLaunch {
        #[source]
        source: std::io::Error,
    },

    /// nvidia-smi started but exited with a non-zero status.
    #[error("nvidia-smi failed ({status}): {stderr}")]
    SmiExit { status: String, stderr: String },

    /// The nvidia-smi report was empty or not well-formed XML.
    #[error("failed to parse nvidia-smi output: {0}")]
    XmlParse(String),

    /// A device or process record is missing a required field, or its
    /// process id is not a positive integer.
    #[error("malformed telemetry: {0}")]
    MalformedTelemetry(String),

    /// Aggregation was asked to summarize an empty record set.
    ///
    /// Callers should treat this as "no GPU activity" and render an empty
    /// table rather than failing.
    #[error("no GPU process records to aggregate")]
    EmptyInput,

    /// Pass-through for any raw I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the gpuwho crates.
pub type Result<T> = std::result::Result<T, GpuWhoError>;
