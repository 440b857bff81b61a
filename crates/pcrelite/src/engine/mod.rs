//! # Pattern Engine Boundary
//!
//! The matching algorithm itself is an external collaborator behind
//! the [`PatternEngine`] trait: something that can compile a pattern,
//! optionally pre-analyze ("study") it, and run it over a subject
//! while filling a flat capture-offset vector. [`crate::pattern::Regex`]
//! owns whatever artifacts the engine hands back and
//! [`crate::matching`] decodes the offset vector it fills.
//!
//! The production engine is [`FancyEngine`]; everything above this
//! module is engine-agnostic.

pub mod fancy_engine;

#[cfg(test)]
pub(crate) mod stub;

pub use fancy_engine::FancyEngine;

use crate::flags::Flags;

/// Exec sentinel: the engine found no match. Not an error.
pub const NO_MATCH: i32 = -1;
/// Exec error code: an option bit the engine cannot honor at run time.
pub const ERROR_BADOPTION: i32 = -3;
/// Exec error code: the engine ran out of memory.
pub const ERROR_NOMEMORY: i32 = -6;
/// Exec error code: the backtracking limit was exceeded.
pub const ERROR_MATCHLIMIT: i32 = -8;
/// Exec error code: internal engine failure.
pub const ERROR_INTERNAL: i32 = -14;
/// Exec error code: a window edge fell inside a multi-byte character.
pub const ERROR_BADUTF8_OFFSET: i32 = -25;

/// Static capabilities of a pattern engine installation.
///
/// Queried once per [`crate::pattern::Regex`] construction and carried
/// as a plain value, so nothing ever reads engine-wide mutable state.
#[derive(Clone, Debug)]
pub struct EngineInfo {
    /// Human-readable engine name and version.
    pub version: String,
    /// Whether patterns and subjects are treated as UTF-8.
    pub utf8: bool,
    /// JIT target description, when JIT compilation is available.
    pub jit_target: Option<String>,
}

impl EngineInfo {
    /// Whether this installation supports JIT compilation.
    pub fn jit_available(&self) -> bool {
        self.jit_target.is_some()
    }
}

/// A compile failure reported by the engine.
#[derive(Clone, Debug)]
pub struct CompileFailure {
    /// Byte offset into the pattern text where compilation failed.
    pub offset: usize,
    /// Engine-reported message.
    pub message: String,
}

/// Metadata queries answered by [`PatternEngine::fullinfo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoQuery {
    /// Number of capturing subpatterns.
    CaptureCount,
    /// Number of named subpatterns.
    NameCount,
    /// Byte width of one name-table entry.
    NameEntrySize,
    /// The raw name-table bytes; see [`crate::nametable`].
    NameTable,
}

/// Values returned by [`PatternEngine::fullinfo`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InfoValue {
    /// A count or byte size.
    Size(usize),
    /// An owned copy of a binary table.
    Bytes(Vec<u8>),
}

impl InfoValue {
    /// The value as a count, if it is one.
    pub fn as_size(&self) -> Option<usize> {
        match self {
            Self::Size(n) => Some(*n),
            Self::Bytes(_) => None,
        }
    }

    /// The value as owned table bytes, if it is one.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Size(_) => None,
            Self::Bytes(bytes) => Some(bytes),
        }
    }
}

/// A black-box pattern matching engine.
///
/// Implementations must be cheap to clone; a [`crate::pattern::Regex`]
/// keeps its own copy so matches never depend on engine state held by
/// the caller.
pub trait PatternEngine: Clone + Send + Sync + 'static {
    /// Opaque compiled form of a pattern.
    type Compiled: Send + Sync;
    /// Optimization data produced by [`PatternEngine::study`].
    type Study: Send + Sync;
    /// Scratch stack used by JIT-compiled match code.
    type JitStack: Send;

    /// Query the installation's static capabilities.
    fn info(&self) -> EngineInfo;

    /// Compile `pattern` under `flags`.
    ///
    /// Engines reject flag bits they cannot honor with a
    /// [`CompileFailure`] rather than silently dropping them.
    fn compile(&self, pattern: &str, flags: Flags) -> Result<Self::Compiled, CompileFailure>;

    /// Pre-analyze a compiled pattern; `jit` requests JIT compilation
    /// during the pass.
    ///
    /// `Ok(None)` means the pass found nothing to optimize, which is
    /// success, not failure.
    fn study(&self, compiled: &Self::Compiled, jit: bool) -> Result<Option<Self::Study>, String>;

    /// Allocate a JIT execution stack sized within
    /// `[init_size, max_size]` bytes, or `None` if allocation failed.
    fn jit_stack_alloc(&self, init_size: usize, max_size: usize) -> Option<Self::JitStack>;

    /// Run a single match over `subject` starting at byte `start`,
    /// writing capture pairs into `ovector`.
    ///
    /// `ovector` holds `3 * n` integers for a capacity of `n` pairs;
    /// pair `i` lands at positions `2 * i` and `2 * i + 1`, and the
    /// top third is engine workspace. A non-participating group is
    /// written as `(-1, -1)`.
    ///
    /// Returns the number of populated pairs, `0` when the vector was
    /// too small to hold every capture (the pairs that fit are still
    /// written), [`NO_MATCH`], or a negative error code below it.
    fn exec(
        &self,
        compiled: &Self::Compiled,
        study: Option<&Self::Study>,
        jit_stack: Option<&mut Self::JitStack>,
        subject: &str,
        start: usize,
        options: Flags,
        ovector: &mut [i32],
    ) -> i32;

    /// Query metadata about a compiled pattern.
    ///
    /// Failures carry the engine's raw error code.
    fn fullinfo(
        &self,
        compiled: &Self::Compiled,
        study: Option<&Self::Study>,
        query: InfoQuery,
    ) -> Result<InfoValue, i32>;
}
