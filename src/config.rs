use crate::comment::{CommentOptions, CommentSyntax};
use crate::error::ConfigError;
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Editor behavior settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Per-language comment syntax, keyed by language name
    #[serde(default = "Config::default_languages")]
    pub languages: HashMap<String, LanguageConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            languages: Self::default_languages(),
        }
    }
}

/// Editor behavior configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EditorConfig {
    /// Align inserted comment delimiters with the shallowest indentation of
    /// the commented lines instead of column 0
    #[serde(default)]
    pub indent_line_comment: bool,
}

impl EditorConfig {
    pub fn comment_options(&self) -> CommentOptions {
        CommentOptions {
            indent_line_comment: self.indent_line_comment,
        }
    }
}

/// Block comment delimiters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlockCommentConfig {
    pub prefix: String,
    pub suffix: String,
}

/// Language-specific configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LanguageConfig {
    /// File extensions for this language
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Line comment prefixes; the first one is inserted when commenting
    #[serde(default)]
    pub line_comment: Vec<String>,

    /// Block comment delimiters
    #[serde(default)]
    pub block_comment: Option<BlockCommentConfig>,
}

impl LanguageConfig {
    fn new(extensions: &[&str], line_comment: &[&str], block: Option<(&str, &str)>) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            line_comment: line_comment.iter().map(|p| p.to_string()).collect(),
            block_comment: block.map(|(prefix, suffix)| BlockCommentConfig {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
        }
    }

    pub fn has_line_comment_syntax(&self) -> bool {
        !self.line_comment.is_empty()
    }

    pub fn has_block_comment_syntax(&self) -> bool {
        self.block_comment.is_some()
    }

    /// Line comment prefixes; empty when the language has none
    pub fn line_comment_prefixes(&self) -> &[String] {
        &self.line_comment
    }

    pub fn block_comment_prefix(&self) -> Option<&str> {
        self.block_comment.as_ref().map(|b| b.prefix.as_str())
    }

    pub fn block_comment_suffix(&self) -> Option<&str> {
        self.block_comment.as_ref().map(|b| b.suffix.as_str())
    }

    pub fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax {
            line_prefixes: self.line_comment.clone(),
            block_prefix: self.block_comment_prefix().map(str::to_string),
            block_suffix: self.block_comment_suffix().map(str::to_string),
        }
    }

    fn validate(&self, language: &str) -> Result<(), ConfigError> {
        if self.line_comment.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyLineCommentPrefix {
                language: language.to_string(),
            });
        }
        if let Some(block) = &self.block_comment {
            if block.prefix.is_empty() || block.suffix.is_empty() {
                return Err(ConfigError::EmptyBlockCommentDelimiter {
                    language: language.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Config {
    /// Parse a configuration from JSON, merging user languages over the
    /// built-in ones
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let mut config: Config =
            serde_json::from_str(json).context("Failed to parse configuration")?;
        config.merge_default_languages();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    ///
    /// Language entries from the file override the built-in entry of the
    /// same name; the other built-in languages stay available.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(
            "Loaded config from {} ({} languages)",
            path.display(),
            config.languages.len()
        );
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// JSON schema describing the configuration file
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, language) in &self.languages {
            language.validate(name)?;
        }
        Ok(())
    }

    /// The language whose extensions include `extension` (without the dot)
    pub fn language_for_extension(&self, extension: &str) -> Option<(&str, &LanguageConfig)> {
        let extension = extension.trim_start_matches('.');
        self.languages
            .iter()
            .find(|(_, language)| language.extensions.iter().any(|e| e == extension))
            .map(|(name, language)| (name.as_str(), language))
    }

    fn merge_default_languages(&mut self) {
        let user_languages = std::mem::take(&mut self.languages);
        self.languages = Self::default_languages();
        for (key, value) in user_languages {
            self.languages.insert(key, value);
        }
    }

    /// Create default language configurations
    fn default_languages() -> HashMap<String, LanguageConfig> {
        let c_block = Some(("/*", "*/"));
        [
            ("rust", LanguageConfig::new(&["rs"], &["//"], c_block)),
            (
                "javascript",
                LanguageConfig::new(&["js", "mjs", "cjs", "jsx"], &["//"], c_block),
            ),
            (
                "typescript",
                LanguageConfig::new(&["ts", "tsx", "mts", "cts"], &["//"], c_block),
            ),
            (
                "c",
                LanguageConfig::new(&["c", "h", "cpp", "hpp", "cc"], &["//"], c_block),
            ),
            ("css", LanguageConfig::new(&["css"], &[], c_block)),
            (
                "html",
                LanguageConfig::new(&["html", "htm", "xml", "svg"], &[], Some(("<!--", "-->"))),
            ),
            (
                "python",
                LanguageConfig::new(&["py", "pyw"], &["#"], Some(("\"\"\"", "\"\"\""))),
            ),
            (
                "shell",
                LanguageConfig::new(&["sh", "bash", "zsh"], &["#"], None),
            ),
            ("sql", LanguageConfig::new(&["sql"], &["--"], c_block)),
            ("lua", LanguageConfig::new(&["lua"], &["--"], Some(("--[[", "]]")))),
            (
                "coffeescript",
                LanguageConfig::new(&["coffee"], &["#"], Some(("###", "###"))),
            ),
        ]
        .into_iter()
        .map(|(name, language)| (name.to_string(), language))
        .collect()
    }
}
