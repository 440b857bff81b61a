//! # Match Execution and Results
//!
//! [`Matcher::find_at`] validates the position window, allocates the
//! offset vector, invokes the engine, and classifies the outcome. A
//! successful execution yields a [`Match`]: a self-contained snapshot
//! (owned subject copy plus filled offset vector) that decodes group
//! spans and substrings on demand. Nothing in a [`Match`] points into
//! engine-internal memory.
//!
//! Matching lives on [`RegexHandle`] rather than on
//! [`crate::pattern::Regex`] itself because every [`Match`] keeps its
//! originating pattern alive through a shared handle.

use std::sync::Arc;

use ahash::AHashMap;

use crate::engine::{ERROR_BADUTF8_OFFSET, NO_MATCH, PatternEngine};
use crate::errors::{PLResult, PcreliteError};
use crate::flags::Flags;
use crate::pattern::RegexHandle;

/// A numbered or named capture-group reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupRef<'a> {
    /// Group by number; 0 is the whole match.
    Index(usize),
    /// Group by name.
    Name(&'a str),
}

impl From<usize> for GroupRef<'static> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for GroupRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// Single-shot match execution over a shared [`RegexHandle`].
pub trait Matcher<E: PatternEngine> {
    /// Try to match against `subject` over an optional position
    /// window.
    ///
    /// The window is inclusive-exclusive over byte offsets: `pos`
    /// defaults to `0`, `endpos` to `subject.len()`, and
    /// `pos == subject.len()` is a valid start for a zero-width match
    /// at end of string. Out-of-range and negative positions yield
    /// `Ok(None)` without invoking the engine; they are not errors.
    /// The region before `pos` stays visible to lookbehind assertions;
    /// the region at and after `endpos` is never searched.
    fn find_at(
        &self,
        subject: &str,
        pos: Option<isize>,
        endpos: Option<isize>,
    ) -> PLResult<Option<Match<E>>>;

    /// [`Matcher::find_at`] over the full subject.
    fn find(&self, subject: &str) -> PLResult<Option<Match<E>>> {
        self.find_at(subject, None, None)
    }
}

impl<E: PatternEngine> Matcher<E> for RegexHandle<E> {
    fn find_at(
        &self,
        subject: &str,
        pos: Option<isize>,
        endpos: Option<isize>,
    ) -> PLResult<Option<Match<E>>> {
        // Negative positions yield "no match" rather than an error.
        if pos.is_some_and(|p| p < 0) || endpos.is_some_and(|p| p < 0) {
            return Ok(None);
        }
        let len = subject.len();
        let pos = pos.map_or(0, |p| p as usize);
        let endpos = endpos.map_or(len, |p| p as usize);
        if pos > len || endpos > len || pos > endpos {
            return Ok(None);
        }
        if !subject.is_char_boundary(pos) || !subject.is_char_boundary(endpos) {
            return Err(PcreliteError::MatchExecution {
                code: ERROR_BADUTF8_OFFSET,
            });
        }

        // Each call owns its vector; the engine writes into it.
        let mut ovector = vec![-1i32; 3 * (self.group_count + 1)];

        let rc = {
            // The JIT stack is the one mutable engine resource bound to
            // this pattern; serialize concurrent matches over it.
            let mut stack = self.jit_stack.as_ref().map(|mutex| mutex.lock());
            self.engine.exec(
                &self.compiled,
                self.study.as_ref(),
                stack.as_deref_mut(),
                &subject[..endpos],
                pos,
                Flags::empty(),
                &mut ovector,
            )
        };

        if rc == NO_MATCH {
            return Ok(None);
        }
        if rc < 0 {
            return Err(PcreliteError::MatchExecution { code: rc });
        }

        let capacity = ovector.len() / 3;
        // rc == 0 is the truncation signal: every pair slot is in use
        // and some capture spans were dropped. Those stay (-1, -1).
        let match_count = if rc == 0 { capacity } else { rc as usize };

        log::trace!(
            "pattern {:?} matched at {}..{}",
            self.pattern,
            ovector[0],
            ovector[1]
        );

        Ok(Some(Match {
            re: Arc::clone(self),
            subject: subject.to_string(),
            ovector,
            match_count,
            pos,
            endpos,
        }))
    }
}

/// A successful match: an owned subject snapshot plus the filled
/// offset vector, decoded on demand.
///
/// Independent of the caller's subject buffer and of any engine
/// memory; it can outlive both, and it shares ownership of its
/// originating [`crate::pattern::Regex`].
pub struct Match<E: PatternEngine> {
    re: RegexHandle<E>,
    subject: String,
    ovector: Vec<i32>,
    match_count: usize,
    pos: usize,
    endpos: usize,
}

impl<E: PatternEngine> Match<E> {
    fn resolve(&self, group: GroupRef<'_>) -> PLResult<usize> {
        let index = match group {
            GroupRef::Index(index) => index,
            GroupRef::Name(name) => match self.re.name_to_index.get(name) {
                Some(&index) => index,
                None => {
                    return Err(PcreliteError::InvalidGroup {
                        group: name.to_string(),
                    });
                }
            },
        };
        if index > self.re.group_count {
            return Err(PcreliteError::InvalidGroup {
                group: index.to_string(),
            });
        }
        Ok(index)
    }

    fn pair(&self, index: usize) -> (i32, i32) {
        (self.ovector[2 * index], self.ovector[2 * index + 1])
    }

    fn decoded(&self, index: usize) -> Option<&str> {
        let (start, end) = self.pair(index);
        if start < 0 || end < 0 {
            return None;
        }
        Some(&self.subject[start as usize..end as usize])
    }

    /// The decoded text of a group, by number or name.
    ///
    /// `Ok(None)` means the group did not participate in the match
    /// (for example an untaken alternation branch), which is distinct
    /// from an empty match. Group `0` is the whole match and always
    /// participates.
    pub fn group<'a, G>(&self, group: G) -> PLResult<Option<&str>>
    where
        G: Into<GroupRef<'a>>,
    {
        let index = self.resolve(group.into())?;
        Ok(self.decoded(index))
    }

    /// Decode several groups at once, preserving input order.
    ///
    /// All-or-nothing: any unresolved reference fails the whole call
    /// and no partial result escapes.
    pub fn groups_of<'a, G>(&self, groups: impl IntoIterator<Item = G>) -> PLResult<Vec<Option<&str>>>
    where
        G: Into<GroupRef<'a>>,
    {
        groups.into_iter().map(|group| self.group(group)).collect()
    }

    /// All numbered groups `1..=group_count`, in order.
    pub fn groups(&self) -> Vec<Option<&str>> {
        (1..=self.re.group_count)
            .map(|index| self.decoded(index))
            .collect()
    }

    /// Every named group and its decoded value.
    pub fn group_dict(&self) -> AHashMap<&str, Option<&str>> {
        self.re
            .name_to_index
            .iter()
            .map(|(name, &index)| (name.as_str(), self.decoded(index)))
            .collect()
    }

    /// Start offset of a group, absolute to the subject; `-1` when the
    /// group did not participate.
    pub fn start<'a, G>(&self, group: G) -> PLResult<isize>
    where
        G: Into<GroupRef<'a>>,
    {
        let index = self.resolve(group.into())?;
        Ok(self.pair(index).0 as isize)
    }

    /// End offset of a group, absolute to the subject; `-1` when the
    /// group did not participate.
    pub fn end<'a, G>(&self, group: G) -> PLResult<isize>
    where
        G: Into<GroupRef<'a>>,
    {
        let index = self.resolve(group.into())?;
        Ok(self.pair(index).1 as isize)
    }

    /// `(start, end)` of a group; `(-1, -1)` when it did not
    /// participate.
    pub fn span<'a, G>(&self, group: G) -> PLResult<(isize, isize)>
    where
        G: Into<GroupRef<'a>>,
    {
        let index = self.resolve(group.into())?;
        let (start, end) = self.pair(index);
        Ok((start as isize, end as isize))
    }

    /// Number of capture pairs the engine populated.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// The resolved window start used at execution time.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The resolved window end used at execution time.
    pub fn endpos(&self) -> usize {
        self.endpos
    }

    /// The owned copy of the subject.
    pub fn string(&self) -> &str {
        &self.subject
    }

    /// The pattern that produced this match.
    pub fn re(&self) -> &RegexHandle<E> {
        &self.re
    }
}

impl<E: PatternEngine> core::fmt::Debug for Match<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Match")
            .field("pattern", &self.re.pattern)
            .field("span", &(self.ovector[0], self.ovector[1]))
            .field("pos", &self.pos)
            .field("endpos", &self.endpos)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FancyEngine;
    use crate::engine::stub::{StubEngine, StubExec};
    use crate::pattern::{PatternOptions, Regex};

    fn compiled(pattern: &str) -> RegexHandle {
        Regex::new(pattern, Flags::empty()).unwrap().shared()
    }

    #[test]
    fn test_numbered_groups() {
        let re = compiled(r"(\d+)-(\d+)");
        let m = re.find("12-34").unwrap().unwrap();

        assert_eq!(m.group(0).unwrap(), Some("12-34"));
        assert_eq!(m.group(1).unwrap(), Some("12"));
        assert_eq!(m.group(2).unwrap(), Some("34"));
        assert_eq!(m.span(1).unwrap(), (0, 2));
        assert_eq!(m.span(2).unwrap(), (3, 5));
        assert_eq!(m.match_count(), 3);
        assert_eq!(m.groups(), vec![Some("12"), Some("34")]);
    }

    #[test]
    fn test_named_groups() {
        let re = compiled(r"(?P<year>\d{4})-(?P<month>\d{2})");
        let m = re.find("on 2012-06 it rained").unwrap().unwrap();

        assert_eq!(m.group("year").unwrap(), Some("2012"));
        assert_eq!(m.group("month").unwrap(), Some("06"));
        assert_eq!(m.group(1).unwrap(), Some("2012"));
        assert_eq!(m.start("year").unwrap(), 3);

        let dict = m.group_dict();
        assert_eq!(dict["year"], Some("2012"));
        assert_eq!(dict["month"], Some("06"));
    }

    #[test]
    fn test_nonparticipating_group_is_distinct_from_empty() {
        let re = compiled("a(b)?c");
        let m = re.find("ac").unwrap().unwrap();

        assert_eq!(m.group(0).unwrap(), Some("ac"));
        assert_eq!(m.group(1).unwrap(), None);
        assert_eq!(m.start(1).unwrap(), -1);
        assert_eq!(m.end(1).unwrap(), -1);
        assert_eq!(m.span(1).unwrap(), (-1, -1));

        // An empty match, by contrast, decodes to "".
        let re = compiled("a(b*)c");
        let m = re.find("ac").unwrap().unwrap();
        assert_eq!(m.group(1).unwrap(), Some(""));
        assert_eq!(m.span(1).unwrap(), (1, 1));
    }

    #[test]
    fn test_invalid_group_is_local_and_repeatable() {
        let re = compiled(r"(\d+)-(\d+)");
        let m = re.find("12-34").unwrap().unwrap();

        for _ in 0..2 {
            let err = m.group(99).unwrap_err();
            assert!(matches!(err, PcreliteError::InvalidGroup { .. }));
            let err = m.group("nope").unwrap_err();
            assert!(matches!(err, PcreliteError::InvalidGroup { .. }));
        }
        // Still queryable for valid indices.
        assert_eq!(m.group(1).unwrap(), Some("12"));
    }

    #[test]
    fn test_groups_of_is_all_or_nothing() {
        let re = compiled(r"(\d+)-(\d+)");
        let m = re.find("12-34").unwrap().unwrap();

        let values = m.groups_of([2usize, 0, 1]).unwrap();
        assert_eq!(values, vec![Some("34"), Some("12-34"), Some("12")]);

        assert!(m.groups_of([1usize, 99]).is_err());
    }

    #[test]
    fn test_window_defaults_and_bounds() {
        let re = compiled("b");
        let subject = "abc";

        assert!(re.find_at(subject, Some(-1), None).unwrap().is_none());
        assert!(re.find_at(subject, None, Some(-1)).unwrap().is_none());
        assert!(re.find_at(subject, Some(4), None).unwrap().is_none());
        assert!(re.find_at(subject, None, Some(4)).unwrap().is_none());
        assert!(re.find_at(subject, Some(2), Some(1)).unwrap().is_none());

        let m = re.find_at(subject, Some(1), Some(2)).unwrap().unwrap();
        assert_eq!(m.pos(), 1);
        assert_eq!(m.endpos(), 2);
        assert_eq!(m.span(0).unwrap(), (1, 2));

        // The region after endpos is not searched.
        assert!(re.find_at(subject, None, Some(1)).unwrap().is_none());
    }

    #[test]
    fn test_zero_width_match_at_end_of_string() {
        let re = compiled("x*");
        let subject = "abc";
        let m = re
            .find_at(subject, Some(subject.len() as isize), None)
            .unwrap()
            .unwrap();
        assert_eq!(m.span(0).unwrap(), (3, 3));
        assert_eq!(m.group(0).unwrap(), Some(""));
    }

    #[test]
    fn test_out_of_range_pos_skips_the_engine() {
        // The stub would report an error if exec ran at all.
        let engine = StubEngine {
            exec_result: StubExec::Error(-99),
            ..StubEngine::default()
        };
        let re = Regex::compile(engine, "a", Flags::empty(), PatternOptions::default())
            .unwrap()
            .shared();
        assert!(re.find_at("abc", Some(4), None).unwrap().is_none());
        assert!(re.find_at("abc", Some(-1), None).unwrap().is_none());
    }

    #[test]
    fn test_execution_error_preserves_code() {
        let engine = StubEngine {
            exec_result: StubExec::Error(-8),
            ..StubEngine::default()
        };
        let re = Regex::compile(engine, "a", Flags::empty(), PatternOptions::default())
            .unwrap()
            .shared();
        let err = re.find("abc").unwrap_err();
        match err {
            PcreliteError::MatchExecution { code } => assert_eq!(code, -8),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unpopulated_pairs_read_as_nonparticipating() {
        // The engine populated fewer pairs than the pattern has
        // groups; the unset spans must decode as non-participating,
        // never as garbage.
        let engine = StubEngine {
            capture_count: 3,
            exec_result: StubExec::Pairs(vec![(0, 3), (0, 1)]),
            ..StubEngine::default()
        };
        let re = Regex::compile(engine, "a", Flags::empty(), PatternOptions::default())
            .unwrap()
            .shared();
        let m = re.find("abc").unwrap().unwrap();
        assert_eq!(m.match_count(), 2);
        assert_eq!(m.group(0).unwrap(), Some("abc"));
        assert_eq!(m.group(1).unwrap(), Some("a"));
        assert_eq!(m.group(2).unwrap(), None);
        assert_eq!(m.span(3).unwrap(), (-1, -1));
    }

    #[test]
    fn test_overflow_signal_fills_every_slot() {
        // rc == 0 from the engine means the vector was too small;
        // every slot that fit is populated.
        let engine = StubEngine {
            capture_count: 1,
            exec_result: StubExec::Pairs(vec![(0, 3), (0, 1), (1, 2)]),
            ..StubEngine::default()
        };
        let re = Regex::compile(engine, "a", Flags::empty(), PatternOptions::default())
            .unwrap()
            .shared();
        let m = re.find("abc").unwrap().unwrap();
        assert_eq!(m.match_count(), 2);
        assert_eq!(m.group(0).unwrap(), Some("abc"));
        assert_eq!(m.group(1).unwrap(), Some("a"));
        assert!(m.group(2).is_err());
    }

    #[test]
    fn test_match_is_self_contained() {
        let m = {
            let subject = String::from("12-34");
            let re = compiled(r"(\d+)-(\d+)");
            re.find(&subject).unwrap().unwrap()
            // subject and the original handle drop here
        };
        assert_eq!(m.string(), "12-34");
        assert_eq!(m.group(2).unwrap(), Some("34"));
        assert_eq!(m.re().pattern(), r"(\d+)-(\d+)");
    }

    #[test]
    fn test_mid_character_window_is_an_execution_error() {
        let re = compiled("é");
        let err = re.find_at("é", Some(1), None).unwrap_err();
        assert!(matches!(err, PcreliteError::MatchExecution { code } if code == ERROR_BADUTF8_OFFSET));
    }

    #[test]
    fn test_concurrent_matches_use_private_vectors() {
        let re = compiled(r"(\w+)-(\w+)");
        std::thread::scope(|scope| {
            let re_a = Arc::clone(&re);
            let re_b = Arc::clone(&re);
            let a = scope.spawn(move || re_a.find("aa-bb").unwrap().unwrap());
            let b = scope.spawn(move || re_b.find("xx-yyyy").unwrap().unwrap());
            let a = a.join().unwrap();
            let b = b.join().unwrap();

            assert_eq!(a.group(1).unwrap(), Some("aa"));
            assert_eq!(a.group(2).unwrap(), Some("bb"));
            assert_eq!(b.group(1).unwrap(), Some("xx"));
            assert_eq!(b.group(2).unwrap(), Some("yyyy"));
        });
    }

    #[test]
    fn test_find_with_default_engine_type() {
        let re: RegexHandle<FancyEngine> = compiled("abc");
        assert!(re.find("xx").unwrap().is_none());
        assert!(re.find("xabcx").unwrap().is_some());
    }
}
