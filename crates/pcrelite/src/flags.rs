//! # Pattern Flags

use bitflags::bitflags;

bitflags! {
    /// Option bits passed through to the pattern engine.
    ///
    /// The bit values match libpcre's published constants bit-for-bit,
    /// so a flag word taken from existing PCRE callers means the same
    /// thing here. Engines are free to reject bits they cannot honor;
    /// see [`crate::engine::PatternEngine::compile`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// Case-insensitive matching.
        const CASELESS = 0x0000_0001;
        /// `^` and `$` match at newlines.
        const MULTILINE = 0x0000_0002;
        /// `.` also matches newline.
        const DOTALL = 0x0000_0004;
        /// Ignore whitespace and `#` comments in the pattern.
        const EXTENDED = 0x0000_0008;
        /// Anchor the match at the start of the window.
        const ANCHORED = 0x0000_0010;
        /// `$` matches only at the very end of the subject.
        const DOLLAR_ENDONLY = 0x0000_0020;
        /// Reserved engine-extra behavior.
        const EXTRA = 0x0000_0040;
        /// The start of the window is not the beginning of a line.
        const NOTBOL = 0x0000_0080;
        /// The end of the window is not the end of a line.
        const NOTEOL = 0x0000_0100;
        /// Invert quantifier greediness.
        const UNGREEDY = 0x0000_0200;
        /// Reject the empty string as a match.
        const NOTEMPTY = 0x0000_0400;
        /// Treat pattern and subject as UTF-8.
        const UTF8 = 0x0000_0800;
        /// Plain parentheses do not capture.
        const NO_AUTO_CAPTURE = 0x0000_1000;
        /// Skip the engine's UTF-8 validity check.
        const NO_UTF8_CHECK = 0x0000_2000;
        /// An unanchored match must start in the first line.
        const FIRSTLINE = 0x0004_0000;
        /// Allow duplicate group names (last entry wins).
        const DUPNAMES = 0x0008_0000;
        /// Reject the empty string only at the start position.
        const NOTEMPTY_ATSTART = 0x1000_0000;
        /// Unicode character properties for `\w`, `\d`, `\s`.
        const UCP = 0x2000_0000;

        /// Alias for [`Flags::CASELESS`].
        const IGNORECASE = Self::CASELESS.bits();
        /// Short alias for [`Flags::CASELESS`].
        const I = Self::CASELESS.bits();
        /// Short alias for [`Flags::MULTILINE`].
        const M = Self::MULTILINE.bits();
        /// Short alias for [`Flags::DOTALL`].
        const S = Self::DOTALL.bits();
        /// Short alias for [`Flags::EXTENDED`].
        const X = Self::EXTENDED.bits();
    }
}
