//! Direction Resolver
//!
//! Picks the translation direction from the script of the captured text.
//! This is a heuristic: target-language text that contains no characteristic
//! code point of either script (digits, punctuation) is treated as target
//! text when the source has a registered script.

use crate::language;
use std::ops::RangeInclusive;
use tracing::debug;

/// Translation direction for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Text is in the source language: translate source → target
    ForwardSourceToTarget,
    /// Text is already in the target language: translate target → source
    ReverseTargetToSource,
    /// Scripts are indistinguishable: let the provider detect the language
    AutoDetect,
}

/// Resolves [`Direction`] for captured text against the configured source
#[derive(Debug, Clone)]
pub struct DirectionResolver {
    source: String,
    ranges: Option<&'static [RangeInclusive<char>]>,
}

impl DirectionResolver {
    pub fn new(source_language: &str) -> Self {
        Self {
            source: language::canonical_name(source_language),
            ranges: language::script_ranges(source_language),
        }
    }

    /// Whether the source language has a registered script
    pub fn has_script(&self) -> bool {
        self.ranges.is_some()
    }

    pub fn resolve(&self, text: &str) -> Direction {
        let direction = match self.ranges {
            None => Direction::AutoDetect,
            Some(ranges) if language::contains_script(text, ranges) => {
                Direction::ForwardSourceToTarget
            }
            Some(_) => Direction::ReverseTargetToSource,
        };
        debug!("Direction for {} source: {:?}", self.source, direction);
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_script_is_forward() {
        let resolver = DirectionResolver::new("hebrew");
        assert_eq!(resolver.resolve("שלום"), Direction::ForwardSourceToTarget);
        assert_eq!(
            resolver.resolve("meeting at 5 בערב"),
            Direction::ForwardSourceToTarget
        );
    }

    #[test]
    fn test_other_script_is_reverse() {
        let resolver = DirectionResolver::new("iw");
        assert_eq!(resolver.resolve("hello"), Direction::ReverseTargetToSource);
        // Known limitation: no characteristic code point at all
        assert_eq!(resolver.resolve("12:30"), Direction::ReverseTargetToSource);
    }

    #[test]
    fn test_latin_source_is_auto_detect() {
        let resolver = DirectionResolver::new("spanish");
        assert!(!resolver.has_script());
        assert_eq!(resolver.resolve("hola"), Direction::AutoDetect);
        assert_eq!(resolver.resolve("שלום"), Direction::AutoDetect);
    }

    #[test]
    fn test_cjk_source() {
        let resolver = DirectionResolver::new("ja");
        assert_eq!(resolver.resolve("こんにちは"), Direction::ForwardSourceToTarget);
        assert_eq!(resolver.resolve("good morning"), Direction::ReverseTargetToSource);
    }

    #[test]
    fn test_mongolian_cyrillic_is_forward() {
        let resolver = DirectionResolver::new("mn");
        assert_eq!(resolver.resolve("Сайн байна уу"), Direction::ForwardSourceToTarget);
        assert_eq!(resolver.resolve("ᠮᠣᠩᠭᠣᠯ"), Direction::ForwardSourceToTarget);
        assert_eq!(resolver.resolve("hello"), Direction::ReverseTargetToSource);
    }
}
