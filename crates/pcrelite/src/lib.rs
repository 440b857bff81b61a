//! # `pcrelite` PCRE-Style Matching Layer
//!
//! Compile a pattern once, run it many times, and decode capture
//! groups from the engine's flat offset vector.
//!
//! The matching algorithm is a pluggable collaborator behind
//! [`engine::PatternEngine`]; the default engine is backed by the
//! [`fancy_regex`] backtracking crate. The layer itself owns the hard
//! parts: the position/bounds contract on execution, the lifetimes of
//! compile-time artifacts (study data, JIT stack), and turning the
//! offset vector into named and numbered groups.
//!
//! See:
//! * [`pattern`] to compile patterns and hold their artifacts.
//! * [`matching`] to execute matches and query groups.
//! * [`cache`] for a bounded compile cache.
//! * [`flags`] for the PCRE-compatible option bits.
//!
//! ```rust
//! use pcrelite::{Flags, Matcher};
//!
//! let re = pcrelite::compile(r"(?P<a>\d+)-(\d+)", Flags::empty())?;
//! let m = re.find("12-34")?.expect("match");
//!
//! assert_eq!(m.group(0)?, Some("12-34"));
//! assert_eq!(m.group("a")?, Some("12"));
//! assert_eq!(m.span(2)?, (3, 5));
//! # Ok::<(), pcrelite::PcreliteError>(())
//! ```
#![warn(missing_docs, unused)]

pub mod cache;
pub mod engine;
pub mod errors;
pub mod flags;
pub mod matching;
pub mod nametable;
pub mod pattern;
pub mod pattern_tools;

pub use cache::PatternCache;
pub use engine::{EngineInfo, FancyEngine, PatternEngine};
pub use errors::{PLResult, PcreliteError};
pub use flags::Flags;
pub use matching::{GroupRef, Match, Matcher};
pub use pattern::{PatternOptions, Regex, RegexHandle};
pub use pattern_tools::escape;

/// Compile `pattern` with the default engine and default options.
pub fn compile(pattern: &str, flags: Flags) -> PLResult<RegexHandle> {
    Ok(Regex::new(pattern, flags)?.shared())
}

/// Compile-and-match convenience over the full subject.
pub fn match_str(pattern: &str, subject: &str, flags: Flags) -> PLResult<Option<Match<FancyEngine>>> {
    compile(pattern, flags)?.find(subject)
}
