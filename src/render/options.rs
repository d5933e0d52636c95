//! Rendering options and configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment flag for interline formula rendering.
pub const FORMULA_ENABLE_ENV: &str = "MINERU_FORMULA_ENABLE";

/// Environment flag for table HTML rendering.
pub const TABLE_ENABLE_ENV: &str = "MINERU_TABLE_ENABLE";

/// Environment flag for cross-page table merging.
pub const TABLE_MERGE_ENABLE_ENV: &str = "MINERU_TABLE_MERGE_ENABLE";

/// A left/right delimiter pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair {
    /// Opening delimiter
    pub left: String,
    /// Closing delimiter
    pub right: String,
}

impl DelimiterPair {
    /// Create a pair.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// LaTeX delimiters used when emitting equations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatexDelimiters {
    /// Interline (display) equations
    pub display: DelimiterPair,
    /// Inline equations
    pub inline: DelimiterPair,
}

impl LatexDelimiters {
    /// Read delimiters from a JSON document of the form
    /// `{"display": {"left", "right"}, "inline": {"left", "right"}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let delimiters: Self = serde_json::from_str(json)?;
        delimiters.validate()?;
        Ok(delimiters)
    }

    fn validate(&self) -> Result<()> {
        let all = [
            ("display.left", &self.display.left),
            ("display.right", &self.display.right),
            ("inline.left", &self.inline.left),
            ("inline.right", &self.inline.right),
        ];
        for (name, value) in all {
            if value.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "empty LaTeX delimiter: {}",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for LatexDelimiters {
    fn default() -> Self {
        Self {
            display: DelimiterPair::new("$$", "$$"),
            inline: DelimiterPair::new("$", "$"),
        }
    }
}

/// Output flavor of [`union_make`](super::union_make).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeMode {
    /// Markdown with images and tables
    #[default]
    #[serde(rename = "mm_markdown")]
    MmMarkdown,
    /// Text-only Markdown; images and tables are skipped
    #[serde(rename = "nlp_markdown")]
    NlpMarkdown,
    /// Flat content list
    ContentList,
    /// Per-page content list with typed inline spans
    ContentListV2,
}

impl MakeMode {
    /// The mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MmMarkdown => "mm_markdown",
            Self::NlpMarkdown => "nlp_markdown",
            Self::ContentList => "content_list",
            Self::ContentListV2 => "content_list_v2",
        }
    }

    /// True for the two Markdown modes.
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::MmMarkdown | Self::NlpMarkdown)
    }
}

impl fmt::Display for MakeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MakeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm_markdown" | "mm_md" => Ok(Self::MmMarkdown),
            "nlp_markdown" | "nlp_md" => Ok(Self::NlpMarkdown),
            "content_list" => Ok(Self::ContentList),
            "content_list_v2" => Ok(Self::ContentListV2),
            other => Err(Error::InvalidConfig(format!("unknown make mode: {}", other))),
        }
    }
}

/// Options for rendering a middle document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Render interline equations as LaTeX (otherwise as their crop)
    pub formula_enable: bool,

    /// Render tables as HTML (otherwise as their crop)
    pub table_enable: bool,

    /// Merge tables split across pages
    pub table_merge_enable: bool,

    /// Equation delimiters
    pub delimiters: LatexDelimiters,

    /// Prefix joined to crop paths (e.g. "images")
    pub image_bucket: String,

    /// Output flavor
    pub make_mode: MakeMode,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable LaTeX formula rendering.
    pub fn with_formula(mut self, enable: bool) -> Self {
        self.formula_enable = enable;
        self
    }

    /// Enable or disable HTML table rendering.
    pub fn with_tables(mut self, enable: bool) -> Self {
        self.table_enable = enable;
        self
    }

    /// Enable or disable cross-page table merging.
    pub fn with_table_merge(mut self, enable: bool) -> Self {
        self.table_merge_enable = enable;
        self
    }

    /// Set the equation delimiters.
    pub fn with_delimiters(mut self, delimiters: LatexDelimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Set the image bucket prefix.
    pub fn with_image_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.image_bucket = bucket.into();
        self
    }

    /// Set the output flavor.
    pub fn with_make_mode(mut self, mode: MakeMode) -> Self {
        self.make_mode = mode;
        self
    }

    /// Defaults overridden by the `MINERU_*` environment flags.
    ///
    /// Accepted values are `true/false/1/0/yes/no` in any case. Unset flags
    /// keep their default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(value) = lookup(FORMULA_ENABLE_ENV) {
            options.formula_enable = parse_flag(FORMULA_ENABLE_ENV, &value)?;
        }
        if let Some(value) = lookup(TABLE_ENABLE_ENV) {
            options.table_enable = parse_flag(TABLE_ENABLE_ENV, &value)?;
        }
        if let Some(value) = lookup(TABLE_MERGE_ENABLE_ENV) {
            options.table_merge_enable = parse_flag(TABLE_MERGE_ENABLE_ENV, &value)?;
        }
        Ok(options)
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> Result<()> {
        self.delimiters.validate()
    }

    /// Settings for captions, footnotes and titles: formulas always on and
    /// no image bucket.
    pub(crate) fn text_defaults(&self) -> Self {
        Self {
            formula_enable: true,
            image_bucket: String::new(),
            ..self.clone()
        }
    }

    /// `{bucket}/{path}`.
    pub(crate) fn image_link(&self, path: &str) -> String {
        format!("{}/{}", self.image_bucket, path)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            formula_enable: true,
            table_enable: true,
            table_merge_enable: true,
            delimiters: LatexDelimiters::default(),
            image_bucket: String::new(),
            make_mode: MakeMode::MmMarkdown,
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::InvalidConfig(format!("{}={}", name, value))),
    }
}
