//! # Pattern Cache
//!
//! A bounded compile cache keyed by `(pattern, flags)`. The cache is
//! an explicit value the caller owns and threads where needed; there
//! is no process-global cache, so independent components never share
//! compiled patterns by accident.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::engine::{FancyEngine, PatternEngine};
use crate::errors::PLResult;
use crate::flags::Flags;
use crate::pattern::{PatternOptions, Regex, RegexHandle};

/// Default capacity bound.
pub const DEFAULT_CAPACITY: usize = 100;

/// A bounded compile cache handing out [`RegexHandle`]s.
///
/// When the cache is full it is cleared wholesale before the next
/// insert; the handles themselves stay valid for as long as callers
/// hold them.
pub struct PatternCache<E: PatternEngine = FancyEngine> {
    engine: E,
    options: PatternOptions,
    capacity: usize,
    map: Mutex<AHashMap<(String, u32), RegexHandle<E>>>,
}

impl Default for PatternCache<FancyEngine> {
    fn default() -> Self {
        Self::new(FancyEngine, PatternOptions::default(), DEFAULT_CAPACITY)
    }
}

impl<E: PatternEngine> PatternCache<E> {
    /// Create a cache that compiles on `engine` with `options`, bounded
    /// to `capacity` entries.
    pub fn new(engine: E, options: PatternOptions, capacity: usize) -> Self {
        Self {
            engine,
            options,
            capacity: capacity.max(1),
            map: Mutex::new(AHashMap::new()),
        }
    }

    /// Fetch the compiled pattern for `(pattern, flags)`, compiling on
    /// a miss.
    pub fn get_or_compile(&self, pattern: &str, flags: Flags) -> PLResult<RegexHandle<E>> {
        let key = (pattern.to_string(), flags.bits());
        if let Some(hit) = self.map.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }

        // Compile outside the lock; racing callers may compile the
        // same pattern twice, and the last insert wins.
        let re = Regex::compile(self.engine.clone(), pattern, flags, self.options)?.shared();

        let mut map = self.map.lock();
        if map.len() >= self.capacity {
            log::debug!("pattern cache full ({} entries), clearing", map.len());
            map.clear();
        }
        map.insert(key, Arc::clone(&re));
        Ok(re)
    }

    /// Drop every cached pattern.
    pub fn purge(&self) {
        self.map.lock().clear();
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }
}
