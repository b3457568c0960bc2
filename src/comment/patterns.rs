//! Regular expressions recognising comment delimiters in token text
//!
//! A line prefix that is itself the start of a block delimiter (`#` against
//! `###`, or `/` against `/*`) gets a stricter pattern: after the line prefix
//! the text must end or break away from the block delimiter before it is
//! complete.

use crate::comment::CommentSyntax;
use crate::model::document::TextDocument;
use regex::Regex;

/// The patterns recognising one line comment prefix
#[derive(Debug, Clone)]
pub struct LinePattern {
    prefix: String,
    regexes: Vec<Regex>,
}

impl LinePattern {
    fn new(
        prefix: &str,
        block_prefix: Option<&str>,
        block_suffix: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let mut regexes = Vec::new();

        if let Some(block_prefix) = block_prefix.filter(|b| b.starts_with(prefix)) {
            regexes.push(special_line_regex(prefix, block_prefix)?);
        }
        if let Some(block_suffix) = block_suffix
            .filter(|s| Some(*s) != block_prefix)
            .filter(|s| s.starts_with(prefix))
        {
            regexes.push(special_line_regex(prefix, block_suffix)?);
        }
        if regexes.is_empty() {
            regexes.push(Regex::new(&format!(r"^\s*{}", regex::escape(prefix)))?);
        }

        Ok(Self {
            prefix: prefix.to_string(),
            regexes,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The text starts with this prefix and is not a block delimiter
    pub fn is_match(&self, text: &str) -> bool {
        self.regexes.iter().all(|re| re.is_match(text))
    }
}

/// Pattern matching `line_syntax` only where it does not continue into
/// `block_syntax`.
///
/// For `#` against `###` this yields `^\s*#($|[^#]|#[^#]|#$)`.
fn special_line_regex(line_syntax: &str, block_syntax: &str) -> Result<Regex, regex::Error> {
    let mut alternatives = Vec::new();
    let mut previous = String::new();

    for c in block_syntax[line_syntax.len()..].chars() {
        let escaped = regex::escape(c.encode_utf8(&mut [0; 4]));
        alternatives.push(format!("{previous}[^{escaped}]"));
        if !previous.is_empty() {
            alternatives.push(format!("{previous}$"));
        }
        previous.push_str(&escaped);
    }

    Regex::new(&format!(
        r"^\s*{}($|{})",
        regex::escape(line_syntax),
        alternatives.join("|")
    ))
}

/// Patterns for every configured line comment prefix, in configured order
#[derive(Debug, Clone, Default)]
pub struct LinePatterns {
    patterns: Vec<LinePattern>,
}

impl LinePatterns {
    pub fn new(
        prefixes: &[String],
        block_prefix: Option<&str>,
        block_suffix: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let patterns = prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| LinePattern::new(prefix, block_prefix, block_suffix))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The prefix inserted when commenting
    pub fn first_prefix(&self) -> Option<&str> {
        self.patterns.first().map(LinePattern::prefix)
    }

    /// Whether any line comment pattern matches `text`
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// The longest configured prefix matching `text`.
    ///
    /// Prefixes may be prefixes of one another (`#` and `##`), so the longest
    /// match wins.
    pub fn longest_prefix(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .filter(|p| p.is_match(text))
            .map(LinePattern::prefix)
            .max_by_key(|prefix| prefix.len())
    }

    /// Whether any non-blank line in `start_line..=end_line` lacks a line
    /// comment
    pub fn contains_uncommented_line(
        &self,
        doc: &TextDocument,
        start_line: usize,
        end_line: usize,
    ) -> bool {
        (start_line..=end_line)
            .filter_map(|n| doc.get_line(n))
            .any(|line| !line.trim().is_empty() && !self.matches(line))
    }
}

/// Patterns for the block comment delimiters
#[derive(Debug, Clone)]
pub struct BlockPatterns {
    prefix: String,
    suffix: String,
    prefix_regex: Regex,
    suffix_regex: Regex,
}

impl BlockPatterns {
    pub fn new(prefix: &str, suffix: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            prefix_regex: Regex::new(&format!("^{}", regex::escape(prefix)))?,
            suffix_regex: Regex::new(&format!("{}$", regex::escape(suffix)))?,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Token text starts with the block prefix
    pub fn is_prefix(&self, text: &str) -> bool {
        self.prefix_regex.is_match(text)
    }

    /// Token text ends with the block suffix
    pub fn is_suffix(&self, text: &str) -> bool {
        self.suffix_regex.is_match(text)
    }

    /// Opening and closing delimiters are the same string
    pub fn is_ambiguous(&self) -> bool {
        self.prefix == self.suffix
    }

    /// Token text is exactly one delimiter of an ambiguous pair
    pub fn is_bare_ambiguous_delimiter(&self, text: &str) -> bool {
        self.is_ambiguous() && text == self.prefix
    }
}

/// All comment patterns of one language mode
#[derive(Debug, Clone, Default)]
pub struct CommentPatterns {
    pub line: LinePatterns,
    pub block: Option<BlockPatterns>,
}

impl CommentPatterns {
    pub fn new(syntax: &CommentSyntax) -> Result<Self, regex::Error> {
        let delimiters = syntax.block_delimiters();
        let line = LinePatterns::new(
            &syntax.line_prefixes,
            delimiters.map(|(prefix, _)| prefix),
            delimiters.map(|(_, suffix)| suffix),
        )?;
        let block = delimiters
            .map(|(prefix, suffix)| BlockPatterns::new(prefix, suffix))
            .transpose()?;
        Ok(Self { line, block })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_line_prefix_excludes_block_delimiter() {
        let patterns = LinePatterns::new(&prefixes(&["#"]), Some("###"), Some("###")).unwrap();
        assert!(patterns.matches("# x"));
        assert!(patterns.matches("  ## x"));
        assert!(patterns.matches("#"));
        assert!(patterns.matches("##"));
        assert!(!patterns.matches("###"));
        assert!(!patterns.matches("### x"));
        assert!(!patterns.matches("x # y"));
    }

    #[test]
    fn test_slash_prefix_excludes_c_block() {
        let patterns = LinePatterns::new(&prefixes(&["/"]), Some("/*"), Some("*/")).unwrap();
        assert!(patterns.matches("/ x"));
        assert!(patterns.matches("//"));
        assert!(!patterns.matches("/* x */"));
    }

    #[test]
    fn test_plain_prefix_when_block_does_not_share_it() {
        let patterns = LinePatterns::new(&prefixes(&["//"]), Some("/*"), Some("*/")).unwrap();
        assert!(patterns.matches("   // x"));
        assert!(!patterns.matches("/* x */"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let patterns = LinePatterns::new(&prefixes(&["#", "##"]), None, None).unwrap();
        assert_eq!(patterns.longest_prefix("## x"), Some("##"));
        assert_eq!(patterns.longest_prefix("# x"), Some("#"));
        assert_eq!(patterns.longest_prefix("x"), None);
        assert_eq!(patterns.first_prefix(), Some("#"));
    }

    #[test]
    fn test_contains_uncommented_line_ignores_blank_lines() {
        let doc = TextDocument::from_str("// a\n\n   \n// b\nc");
        let patterns = LinePatterns::new(&prefixes(&["//"]), None, None).unwrap();
        assert!(!patterns.contains_uncommented_line(&doc, 0, 3));
        assert!(patterns.contains_uncommented_line(&doc, 0, 4));
    }

    #[test]
    fn test_block_patterns() {
        let block = BlockPatterns::new("<!--", "-->").unwrap();
        assert!(block.is_prefix("<!-- a -->"));
        assert!(block.is_suffix("<!-- a -->"));
        assert!(!block.is_prefix(" <!--"));
        assert!(!block.is_suffix("--> "));
        assert!(!block.is_ambiguous());

        let quotes = BlockPatterns::new("\"\"\"", "\"\"\"").unwrap();
        assert!(quotes.is_bare_ambiguous_delimiter("\"\"\""));
        assert!(!quotes.is_bare_ambiguous_delimiter("\"\"\" a"));
    }

    #[test]
    fn test_empty_prefixes_are_ignored() {
        let syntax = CommentSyntax::line(&["", "--"]);
        let patterns = CommentPatterns::new(&syntax).unwrap();
        assert_eq!(patterns.line.first_prefix(), Some("--"));
        assert!(patterns.block.is_none());
    }
}
