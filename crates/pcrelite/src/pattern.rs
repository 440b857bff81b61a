//! # Compiled Patterns
//!
//! A [`Regex`] compiles once and is reused across many matches. It
//! owns everything the engine produced for the pattern: the compiled
//! form, optional study data, an optional JIT execution stack, and the
//! capture metadata (group count plus the decoded name table).
//!
//! Patterns are shared through [`RegexHandle`] so a
//! [`crate::matching::Match`] and its originating pattern can outlive
//! each other independently.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::engine::{EngineInfo, FancyEngine, InfoQuery, InfoValue, PatternEngine};
use crate::errors::{PLResult, PcreliteError};
use crate::flags::Flags;
use crate::nametable::decode_name_table;

/// Default initial JIT stack size: 32 KiB.
pub const JIT_STACK_INIT_SIZE: usize = 32 * 1024;
/// Default maximum JIT stack size: 512 KiB.
pub const JIT_STACK_MAX_SIZE: usize = 512 * 1024;

/// Construction options for [`Regex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternOptions {
    /// Run the engine's study pass over the compiled pattern.
    pub optimize: bool,
    /// JIT-compile during study. Requires `optimize`.
    pub use_jit: bool,
    /// Initial JIT stack size in bytes.
    pub jit_stack_init: usize,
    /// Maximum JIT stack size in bytes.
    pub jit_stack_max: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            optimize: false,
            use_jit: false,
            jit_stack_init: JIT_STACK_INIT_SIZE,
            jit_stack_max: JIT_STACK_MAX_SIZE,
        }
    }
}

impl PatternOptions {
    /// Options with the study pass enabled.
    pub fn optimized() -> Self {
        Self {
            optimize: true,
            ..Self::default()
        }
    }

    /// Options with study plus JIT compilation enabled.
    pub fn jit() -> Self {
        Self {
            optimize: true,
            use_jit: true,
            ..Self::default()
        }
    }

    /// Override the JIT stack size bounds.
    pub fn with_jit_stack(mut self, init: usize, max: usize) -> Self {
        self.jit_stack_init = init;
        self.jit_stack_max = max;
        self
    }
}

/// Shared handle to a compiled pattern.
pub type RegexHandle<E = FancyEngine> = Arc<Regex<E>>;

/// A compiled pattern plus its optimization artifacts and capture
/// metadata.
///
/// Safe to share across threads: the compiled and studied forms are
/// only ever read after construction, and the JIT stack (the one
/// mutable engine resource) is serialized behind a mutex.
pub struct Regex<E: PatternEngine = FancyEngine> {
    pub(crate) engine: E,
    pub(crate) pattern: String,
    pub(crate) flags: Flags,
    pub(crate) options: PatternOptions,
    pub(crate) info: EngineInfo,
    pub(crate) compiled: E::Compiled,
    pub(crate) study: Option<E::Study>,
    pub(crate) jit_stack: Option<Mutex<E::JitStack>>,
    pub(crate) group_count: usize,
    pub(crate) name_to_index: AHashMap<String, usize>,
}

fn query_size<E: PatternEngine>(
    engine: &E,
    compiled: &E::Compiled,
    study: Option<&E::Study>,
    query: InfoQuery,
) -> PLResult<usize> {
    match engine.fullinfo(compiled, study, query) {
        Ok(value) => value.as_size().ok_or_else(|| PcreliteError::Introspection {
            detail: format!("{query:?} query returned a non-size value"),
        }),
        Err(code) => Err(PcreliteError::Introspection {
            detail: format!("{query:?} query exited with code {code}"),
        }),
    }
}

impl Regex<FancyEngine> {
    /// Compile with the default engine and default options.
    pub fn new(pattern: &str, flags: Flags) -> PLResult<Self> {
        Self::compile(FancyEngine, pattern, flags, PatternOptions::default())
    }
}

impl<E: PatternEngine> Regex<E> {
    /// Compile `pattern` under `flags` with `options` on `engine`.
    ///
    /// Construction is the only point where engine failures surface as
    /// distinct error kinds; see [`PcreliteError`]. Any partially
    /// acquired study data or JIT stack is released on failure.
    pub fn compile(
        engine: E,
        pattern: &str,
        flags: Flags,
        options: PatternOptions,
    ) -> PLResult<Self> {
        let info = engine.info();

        let compiled =
            engine
                .compile(pattern, flags)
                .map_err(|failure| PcreliteError::PatternCompile {
                    offset: failure.offset,
                    message: failure.message,
                })?;

        if options.use_jit && !options.optimize {
            return Err(PcreliteError::Configuration(
                "to enable JIT you must enable pattern optimization",
            ));
        }

        let mut study = None;
        let mut jit_stack = None;
        if options.optimize {
            if options.use_jit && !info.jit_available() {
                return Err(PcreliteError::JitUnsupported);
            }

            study = engine
                .study(&compiled, options.use_jit)
                .map_err(|message| PcreliteError::Study { message })?;
            log::debug!(
                "studied pattern {pattern:?}: optimization data = {}",
                study.is_some()
            );

            if options.use_jit {
                let stack = engine
                    .jit_stack_alloc(options.jit_stack_init, options.jit_stack_max)
                    .ok_or(PcreliteError::ResourceAllocation("JIT stack"))?;
                jit_stack = Some(Mutex::new(stack));
            }
        }

        let group_count = query_size(&engine, &compiled, study.as_ref(), InfoQuery::CaptureCount)?;

        let name_count = query_size(&engine, &compiled, study.as_ref(), InfoQuery::NameCount)?;
        let name_to_index = if name_count == 0 {
            AHashMap::new()
        } else {
            let entry_size =
                query_size(&engine, &compiled, study.as_ref(), InfoQuery::NameEntrySize)?;
            let table = match engine.fullinfo(&compiled, study.as_ref(), InfoQuery::NameTable) {
                Ok(InfoValue::Bytes(bytes)) => bytes,
                Ok(InfoValue::Size(_)) => {
                    return Err(PcreliteError::Introspection {
                        detail: String::from("NameTable query returned a non-table value"),
                    });
                }
                Err(code) => {
                    return Err(PcreliteError::Introspection {
                        detail: format!("NameTable query exited with code {code}"),
                    });
                }
            };
            decode_name_table(&table, name_count, entry_size)?
        };

        log::debug!(
            "compiled pattern {pattern:?}: {group_count} capture groups, {name_count} named"
        );

        Ok(Self {
            engine,
            pattern: pattern.to_string(),
            flags,
            options,
            info,
            compiled,
            study,
            jit_stack,
            group_count,
            name_to_index,
        })
    }

    /// Wrap this pattern in a [`RegexHandle`] for matching.
    pub fn shared(self) -> RegexHandle<E> {
        Arc::new(self)
    }

    /// The pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The flags the pattern was compiled under.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Number of capturing subpatterns (0 = none).
    pub fn groups(&self) -> usize {
        self.group_count
    }

    /// Name → 1-based group index for every named subpattern.
    pub fn group_index(&self) -> &AHashMap<String, usize> {
        &self.name_to_index
    }

    /// Whether the study pass ran.
    pub fn optimized(&self) -> bool {
        self.options.optimize
    }

    /// Whether JIT compilation was requested.
    pub fn use_jit(&self) -> bool {
        self.options.use_jit
    }

    /// The construction options.
    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// Capabilities of the engine installation this was compiled on.
    pub fn engine_info(&self) -> &EngineInfo {
        &self.info
    }
}

impl<E: PatternEngine> core::fmt::Debug for Regex<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.pattern)
            .field("flags", &self.flags)
            .field("groups", &self.group_count)
            .field("names", &self.name_to_index.len())
            .field("optimized", &self.options.optimize)
            .field("use_jit", &self.options.use_jit)
            .finish()
    }
}
