//! # Fancy-Regex Engine
//!
//! The production [`PatternEngine`], backed by the [`fancy_regex`]
//! backtracking engine.
//!
//! The backend takes flags as inline pattern syntax rather than as an
//! option word, so [`FancyEngine::compile`] rewrites the pattern: the
//! caseless/multiline/dotall/extended bits become a `(?imsx)` prefix,
//! while [`Flags::ANCHORED`] is enforced at exec time by requiring the
//! match to begin at the start offset (the backend has no inline
//! equivalent that anchors to an arbitrary offset). The
//! backend is always Unicode, has no study pass, and no JIT; study
//! reports "no optimization data" and [`EngineInfo`] advertises JIT as
//! unavailable.
//!
//! Named groups are re-encoded into the classic packed binary name
//! table at compile time, so [`PatternEngine::fullinfo`] hands callers
//! the same wire format a native engine would.

use crate::engine::{
    CompileFailure, EngineInfo, ERROR_BADOPTION, ERROR_INTERNAL, ERROR_MATCHLIMIT, InfoQuery,
    InfoValue, NO_MATCH, PatternEngine,
};
use crate::flags::Flags;

/// Flag bits the backend can honor at compile time.
///
/// UTF8/UCP/NO_UTF8_CHECK are accepted no-ops: the backend is always
/// Unicode-aware. Everything else is rejected.
const SUPPORTED: Flags = Flags::CASELESS
    .union(Flags::MULTILINE)
    .union(Flags::DOTALL)
    .union(Flags::EXTENDED)
    .union(Flags::ANCHORED)
    .union(Flags::UTF8)
    .union(Flags::NO_UTF8_CHECK)
    .union(Flags::UCP);

/// The default pattern engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct FancyEngine;

/// Compiled form produced by [`FancyEngine`].
///
/// Capture metadata is derived eagerly so `fullinfo` queries cannot
/// fail later.
#[derive(Debug)]
pub struct FancyCompiled {
    regex: fancy_regex::Regex,
    anchored: bool,
    capture_count: usize,
    name_table: Vec<u8>,
    name_count: usize,
    name_entry_size: usize,
}

/// Rewrite `pattern` so the requested flag bits are carried inline.
///
/// Returns the rewritten source and the prefix length, which is needed
/// to map parse-error offsets back into the caller's pattern text.
fn rewrite_pattern(pattern: &str, flags: Flags) -> (String, usize) {
    let mut inline = String::new();
    if flags.contains(Flags::CASELESS) {
        inline.push('i');
    }
    if flags.contains(Flags::MULTILINE) {
        inline.push('m');
    }
    if flags.contains(Flags::DOTALL) {
        inline.push('s');
    }
    if flags.contains(Flags::EXTENDED) {
        inline.push('x');
    }

    let mut source = String::with_capacity(pattern.len() + 8);
    if !inline.is_empty() {
        source.push_str("(?");
        source.push_str(&inline);
        source.push(')');
    }
    let prefix_len = source.len();
    source.push_str(pattern);
    (source, prefix_len)
}

fn compile_failure(err: fancy_regex::Error, prefix_len: usize) -> CompileFailure {
    match err {
        fancy_regex::Error::ParseError(position, kind) => CompileFailure {
            offset: position.saturating_sub(prefix_len),
            message: kind.to_string(),
        },
        other => CompileFailure {
            offset: 0,
            message: other.to_string(),
        },
    }
}

/// Pack the pattern's named groups into the classic binary name table:
/// `name_count` entries of `entry_size` bytes, each a 2-byte
/// big-endian group index followed by the NUL-terminated name, zero
/// padded. Entries are kept sorted by name, as native engines do.
fn encode_name_table(regex: &fancy_regex::Regex) -> (Vec<u8>, usize, usize) {
    let mut names: Vec<(String, u16)> = regex
        .capture_names()
        .enumerate()
        .filter_map(|(index, name)| name.map(|n| (n.to_string(), index as u16)))
        .collect();
    if names.is_empty() {
        return (Vec::new(), 0, 0);
    }
    names.sort();

    let longest = names.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let entry_size = 2 + longest + 1;

    let mut table = vec![0u8; names.len() * entry_size];
    for (slot, (name, index)) in names.iter().enumerate() {
        let entry = &mut table[slot * entry_size..(slot + 1) * entry_size];
        entry[0..2].copy_from_slice(&index.to_be_bytes());
        entry[2..2 + name.len()].copy_from_slice(name.as_bytes());
        // the rest stays zero: terminator plus padding
    }
    (table, names.len(), entry_size)
}

impl PatternEngine for FancyEngine {
    type Compiled = FancyCompiled;
    type Study = ();
    type JitStack = core::convert::Infallible;

    fn info(&self) -> EngineInfo {
        EngineInfo {
            version: String::from("fancy-regex"),
            utf8: true,
            jit_target: None,
        }
    }

    fn compile(&self, pattern: &str, flags: Flags) -> Result<Self::Compiled, CompileFailure> {
        if !SUPPORTED.contains(flags) {
            return Err(CompileFailure {
                offset: 0,
                message: format!(
                    "unsupported option bits: {:#x}",
                    flags.difference(SUPPORTED).bits()
                ),
            });
        }

        let (source, prefix_len) = rewrite_pattern(pattern, flags);
        let regex =
            fancy_regex::Regex::new(&source).map_err(|err| compile_failure(err, prefix_len))?;

        let capture_count = regex.captures_len() - 1;
        let (name_table, name_count, name_entry_size) = encode_name_table(&regex);

        Ok(FancyCompiled {
            regex,
            anchored: flags.contains(Flags::ANCHORED),
            capture_count,
            name_table,
            name_count,
            name_entry_size,
        })
    }

    fn study(&self, _compiled: &Self::Compiled, _jit: bool) -> Result<Option<Self::Study>, String> {
        // No pre-analysis pass; "no optimization data" is success.
        Ok(None)
    }

    fn jit_stack_alloc(&self, _init_size: usize, _max_size: usize) -> Option<Self::JitStack> {
        None
    }

    fn exec(
        &self,
        compiled: &Self::Compiled,
        _study: Option<&Self::Study>,
        _jit_stack: Option<&mut Self::JitStack>,
        subject: &str,
        start: usize,
        options: Flags,
        ovector: &mut [i32],
    ) -> i32 {
        if !options.is_empty() {
            return ERROR_BADOPTION;
        }

        let captures = match compiled.regex.captures_from_pos(subject, start) {
            Ok(Some(captures)) => captures,
            Ok(None) => return NO_MATCH,
            Err(fancy_regex::Error::RuntimeError(_)) => return ERROR_MATCHLIMIT,
            Err(_) => return ERROR_INTERNAL,
        };

        if compiled.anchored {
            // The leftmost match is the earliest one; if it starts past
            // `start`, no match begins exactly at `start`.
            let anchored_ok = captures.get(0).is_some_and(|whole| whole.start() == start);
            if !anchored_ok {
                return NO_MATCH;
            }
        }

        let capacity = ovector.len() / 3;
        let pairs = captures.len();
        let stored = pairs.min(capacity);
        for index in 0..stored {
            let (start, end) = match captures.get(index) {
                Some(group) => (group.start() as i32, group.end() as i32),
                None => (-1, -1),
            };
            ovector[2 * index] = start;
            ovector[2 * index + 1] = end;
        }

        if pairs > capacity { 0 } else { stored as i32 }
    }

    fn fullinfo(
        &self,
        compiled: &Self::Compiled,
        _study: Option<&Self::Study>,
        query: InfoQuery,
    ) -> Result<InfoValue, i32> {
        Ok(match query {
            InfoQuery::CaptureCount => InfoValue::Size(compiled.capture_count),
            InfoQuery::NameCount => InfoValue::Size(compiled.name_count),
            InfoQuery::NameEntrySize => InfoValue::Size(compiled.name_entry_size),
            InfoQuery::NameTable => InfoValue::Bytes(compiled.name_table.clone()),
        })
    }
}
