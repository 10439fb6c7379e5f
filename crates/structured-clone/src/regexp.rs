//! RegExp objects
//!
//! Patterns are compiled with `regress`, which implements ECMAScript regex
//! syntax. Flags are validated up front so that every `JsRegExp` carries a
//! well-formed flag set.

use regress::{Flags, Regex};
use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

/// Validated RegExp flag set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegExpFlags {
    /// `d`
    pub has_indices: bool,
    /// `g`
    pub global: bool,
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multiline: bool,
    /// `s`
    pub dot_all: bool,
    /// `u`
    pub unicode: bool,
    /// `v`
    pub unicode_sets: bool,
    /// `y`
    pub sticky: bool,
}

impl RegExpFlags {
    /// Parse a flag string. Rejects unknown and repeated flags, and `u` with `v`.
    pub fn parse(flags: &str) -> Result<Self, String> {
        let mut out = Self::default();
        for ch in flags.chars() {
            let slot = match ch {
                'd' => &mut out.has_indices,
                'g' => &mut out.global,
                'i' => &mut out.ignore_case,
                'm' => &mut out.multiline,
                's' => &mut out.dot_all,
                'u' => &mut out.unicode,
                'v' => &mut out.unicode_sets,
                'y' => &mut out.sticky,
                _ => return Err(format!("Invalid regular expression flags '{}'", flags)),
            };
            if *slot {
                return Err(format!("Invalid regular expression flags '{}'", flags));
            }
            *slot = true;
        }
        if out.unicode && out.unicode_sets {
            return Err(format!("Invalid regular expression flags '{}'", flags));
        }
        Ok(out)
    }

    /// Whether the pattern matches in Unicode mode (`u` or `v`)
    pub fn is_unicode_mode(&self) -> bool {
        self.unicode || self.unicode_sets
    }

    fn engine_flags(&self) -> Flags {
        let mut letters = String::with_capacity(5);
        for (on, ch) in [
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
        ] {
            if on {
                letters.push(ch);
            }
        }
        Flags::from(letters.as_str())
    }
}

impl std::fmt::Display for RegExpFlags {
    /// Canonical flag order, as returned by `RegExp.prototype.flags`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (on, ch) in [
            (self.has_indices, 'd'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
            (self.sticky, 'y'),
        ] {
            if on {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

/// A JavaScript RegExp
#[derive(Debug)]
pub struct JsRegExp {
    pattern: String,
    flags: RegExpFlags,
    /// Byte offset where the next global/sticky search starts
    last_index: Cell<usize>,
    native_regex: Rc<Regex>,
}

impl JsRegExp {
    /// Compile a new RegExp
    pub fn new(pattern: &str, flags: &str) -> Result<Self, String> {
        let flags = RegExpFlags::parse(flags)?;
        let native_regex = Regex::with_flags(pattern, flags.engine_flags())
            .map_err(|e| format!("Invalid regular expression: /{}/: {}", pattern, e))?;
        Ok(Self {
            pattern: pattern.to_string(),
            flags,
            last_index: Cell::new(0),
            native_regex: Rc::new(native_regex),
        })
    }

    /// A fresh RegExp with the same source and flags and `lastIndex` reset to 0
    pub fn duplicate(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            flags: self.flags,
            last_index: Cell::new(0),
            native_regex: Rc::clone(&self.native_regex),
        }
    }

    /// Pattern source text
    pub fn source(&self) -> &str {
        &self.pattern
    }

    /// Flag string in canonical order
    pub fn flags(&self) -> String {
        self.flags.to_string()
    }

    /// Parsed flag set
    pub fn flag_set(&self) -> RegExpFlags {
        self.flags
    }

    /// `g` flag
    pub fn global(&self) -> bool {
        self.flags.global
    }

    /// `i` flag
    pub fn ignore_case(&self) -> bool {
        self.flags.ignore_case
    }

    /// `m` flag
    pub fn multiline(&self) -> bool {
        self.flags.multiline
    }

    /// `u` flag
    pub fn unicode(&self) -> bool {
        self.flags.unicode
    }

    /// `y` flag
    pub fn sticky(&self) -> bool {
        self.flags.sticky
    }

    /// Current `lastIndex`
    pub fn last_index(&self) -> usize {
        self.last_index.get()
    }

    /// Set `lastIndex`
    pub fn set_last_index(&self, index: usize) {
        self.last_index.set(index);
    }

    /// Whether the pattern matches anywhere in `text` (ignores `lastIndex`)
    pub fn is_match(&self, text: &str) -> bool {
        self.native_regex.find(text).is_some()
    }

    /// `exec`-style search returning the byte range of the match.
    ///
    /// Global and sticky regexes start at `lastIndex` and advance it; sticky
    /// ones only match exactly at `lastIndex`.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        let stateful = self.flags.global || self.flags.sticky;
        let start = if stateful { self.last_index.get() } else { 0 };
        if start > text.len() || !text.is_char_boundary(start) {
            self.last_index.set(0);
            return None;
        }

        let found = self
            .native_regex
            .find_from(text, start)
            .next()
            .filter(|m| !self.flags.sticky || m.start() == start);

        match found {
            Some(m) => {
                if stateful {
                    self.last_index.set(m.end());
                }
                Some(m.start()..m.end())
            }
            None => {
                if stateful {
                    self.last_index.set(0);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_canonical_order() {
        let re = JsRegExp::new("gh.*i", "yu").unwrap();
        assert_eq!(re.flags(), "uy");
        assert!(re.sticky());
        assert!(re.unicode());
        assert!(!re.global());
    }

    #[test]
    fn test_unicode_mode() {
        assert!(RegExpFlags::parse("u").unwrap().is_unicode_mode());
        assert!(RegExpFlags::parse("gv").unwrap().is_unicode_mode());
        assert!(!RegExpFlags::parse("gimsy").unwrap().is_unicode_mode());
    }

    #[test]
    fn test_invalid_flags_rejected() {
        assert!(JsRegExp::new("a", "gg").is_err());
        assert!(JsRegExp::new("a", "x").is_err());
        assert!(JsRegExp::new("a", "uv").is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(JsRegExp::new("(unclosed", "").is_err());
    }

    #[test]
    fn test_ignore_case_match() {
        let re = JsRegExp::new("ab+c", "i").unwrap();
        assert!(re.is_match("xxABBC"));
        assert!(!re.is_match("ac"));
    }

    #[test]
    fn test_global_find_advances_last_index() {
        let re = JsRegExp::new("a", "g").unwrap();
        assert_eq!(re.find("banana"), Some(1..2));
        assert_eq!(re.last_index(), 2);
        assert_eq!(re.find("banana"), Some(3..4));
        assert_eq!(re.find("banana"), Some(5..6));
        assert_eq!(re.find("banana"), None);
        assert_eq!(re.last_index(), 0);
    }

    #[test]
    fn test_sticky_requires_match_at_last_index() {
        let re = JsRegExp::new("a", "y").unwrap();
        assert_eq!(re.find("ba"), None);
        re.set_last_index(1);
        assert_eq!(re.find("ba"), Some(1..2));
    }

    #[test]
    fn test_duplicate_resets_last_index() {
        let re = JsRegExp::new("de+f", "gm").unwrap();
        re.set_last_index(4);
        let copy = re.duplicate();
        assert_eq!(copy.source(), "de+f");
        assert_eq!(copy.flags(), "gm");
        assert_eq!(copy.last_index(), 0);
        assert_eq!(re.last_index(), 4);
    }
}
