//! # Error Types

/// Errors from pcrelite operations.
///
/// "No match" is never an error; matching entry points report it as
/// `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum PcreliteError {
    /// Pattern text the engine could not compile.
    #[error("pattern compilation error at offset {offset}: {message}")]
    PatternCompile {
        /// Byte offset into the pattern text where compilation failed.
        offset: usize,
        /// Engine-reported message.
        message: String,
    },

    /// Caller requested an invalid option combination.
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),

    /// The engine installation has no JIT support.
    #[error("the pattern engine is built without JIT support")]
    JitUnsupported,

    /// The study pass reported an error.
    #[error("pattern study error: {message}")]
    Study {
        /// Engine-reported message.
        message: String,
    },

    /// A scratch resource could not be allocated.
    #[error("allocation of {0} failed")]
    ResourceAllocation(&'static str),

    /// A metadata query failed after successful compilation.
    #[error("pattern introspection error: {detail}")]
    Introspection {
        /// What was queried and what came back.
        detail: String,
    },

    /// The engine reported a runtime failure distinct from "no match".
    #[error("match execution exited with error code {code}")]
    MatchExecution {
        /// The engine's raw error code, preserved for diagnostics.
        code: i32,
    },

    /// A group index or name outside the pattern's capture set.
    #[error("no such group: {group}")]
    InvalidGroup {
        /// The index or name as requested.
        group: String,
    },
}

/// Result type for pcrelite operations.
pub type PLResult<T> = core::result::Result<T, PcreliteError>;
