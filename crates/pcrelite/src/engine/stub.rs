//! Scripted engine for exercising construction and execution error
//! paths that the production backend cannot produce on demand.

use crate::engine::{CompileFailure, EngineInfo, InfoQuery, InfoValue, NO_MATCH, PatternEngine};
use crate::flags::Flags;

/// What a scripted [`StubEngine::exec`] call should do.
#[derive(Clone, Debug, Default)]
pub(crate) enum StubExec {
    /// Report no match.
    #[default]
    NoMatch,
    /// Report the given engine error code.
    Error(i32),
    /// Write these pairs (as many as fit) and report the count, or the
    /// overflow signal when they do not all fit.
    Pairs(Vec<(i32, i32)>),
}

/// A [`PatternEngine`] whose every answer is configured up front.
#[derive(Clone, Debug, Default)]
pub(crate) struct StubEngine {
    pub jit_target: Option<&'static str>,
    pub fail_compile: Option<(usize, &'static str)>,
    pub fail_study: Option<&'static str>,
    pub study_data: bool,
    pub fail_jit_alloc: bool,
    pub fail_info: bool,
    pub capture_count: usize,
    /// `(table bytes, name_count, entry_size)`.
    pub name_table: Option<(Vec<u8>, usize, usize)>,
    pub exec_result: StubExec,
}

impl PatternEngine for StubEngine {
    type Compiled = ();
    type Study = ();
    type JitStack = ();

    fn info(&self) -> EngineInfo {
        EngineInfo {
            version: String::from("stub"),
            utf8: true,
            jit_target: self.jit_target.map(String::from),
        }
    }

    fn compile(&self, _pattern: &str, _flags: Flags) -> Result<Self::Compiled, CompileFailure> {
        match self.fail_compile {
            Some((offset, message)) => Err(CompileFailure {
                offset,
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn study(&self, _compiled: &Self::Compiled, _jit: bool) -> Result<Option<Self::Study>, String> {
        match self.fail_study {
            Some(message) => Err(message.to_string()),
            None if self.study_data => Ok(Some(())),
            None => Ok(None),
        }
    }

    fn jit_stack_alloc(&self, _init_size: usize, _max_size: usize) -> Option<Self::JitStack> {
        if self.fail_jit_alloc { None } else { Some(()) }
    }

    fn exec(
        &self,
        _compiled: &Self::Compiled,
        _study: Option<&Self::Study>,
        _jit_stack: Option<&mut Self::JitStack>,
        _subject: &str,
        _start: usize,
        _options: Flags,
        ovector: &mut [i32],
    ) -> i32 {
        match &self.exec_result {
            StubExec::NoMatch => NO_MATCH,
            StubExec::Error(code) => *code,
            StubExec::Pairs(pairs) => {
                let capacity = ovector.len() / 3;
                let stored = pairs.len().min(capacity);
                for (index, (start, end)) in pairs.iter().take(stored).enumerate() {
                    ovector[2 * index] = *start;
                    ovector[2 * index + 1] = *end;
                }
                if pairs.len() > capacity {
                    0
                } else {
                    stored as i32
                }
            }
        }
    }

    fn fullinfo(
        &self,
        _compiled: &Self::Compiled,
        _study: Option<&Self::Study>,
        query: InfoQuery,
    ) -> Result<InfoValue, i32> {
        if self.fail_info {
            return Err(-5);
        }
        Ok(match query {
            InfoQuery::CaptureCount => InfoValue::Size(self.capture_count),
            InfoQuery::NameCount => {
                InfoValue::Size(self.name_table.as_ref().map_or(0, |(_, count, _)| *count))
            }
            InfoQuery::NameEntrySize => {
                InfoValue::Size(self.name_table.as_ref().map_or(0, |(_, _, size)| *size))
            }
            InfoQuery::NameTable => InfoValue::Bytes(
                self.name_table
                    .as_ref()
                    .map_or_else(Vec::new, |(table, _, _)| table.clone()),
            ),
        })
    }
}
