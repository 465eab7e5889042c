//! Input texts and their cache identity.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Stable identity of a text's content, used as the per-text cache key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextKey([u8; 32]);

impl TextKey {
    /// Hash of everything per-text resources are derived from.
    fn of(raw_content: &str, paragraphs: &[String], subtitles: Option<usize>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(raw_content.len() as u64).to_le_bytes());
        hasher.update(raw_content.as_bytes());
        hasher.update(&(paragraphs.len() as u64).to_le_bytes());
        for p in paragraphs {
            hasher.update(&(p.len() as u64).to_le_bytes());
            hasher.update(p.as_bytes());
        }
        match subtitles {
            Some(n) => {
                hasher.update(&[1]);
                hasher.update(&(n as u64).to_le_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
        TextKey(*hasher.finalize().as_bytes())
    }
}

impl fmt::Debug for TextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight bytes are plenty to tell texts apart in logs.
        write!(f, "TextKey(")?;
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// A text to be measured. Immutable once built: the builder methods
/// consume the text and refresh its key.
#[derive(Debug, Clone)]
pub struct Text {
    raw_content: String,
    paragraphs: Vec<String>,
    filepath: Option<PathBuf>,
    subtitles: Option<usize>,
    key: TextKey,
}

impl Text {
    /// Build a text from raw content. Every non-blank line is a paragraph.
    pub fn new(raw_content: impl Into<String>) -> Self {
        let raw_content = raw_content.into();
        let paragraphs: Vec<String> = raw_content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let key = TextKey::of(&raw_content, &paragraphs, None);
        Text {
            raw_content,
            paragraphs,
            filepath: None,
            subtitles: None,
            key,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut f = File::open(path)
            .with_context(|| format!("could not open input text: {}", path.display()))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)
            .with_context(|| format!("input text is not valid UTF-8: {}", path.display()))?;
        Ok(Text::new(buf).with_filepath(path))
    }

    pub fn from_stdin() -> Result<Self> {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("could not read text from STDIN")?;
        Ok(Text::new(buf))
    }

    pub fn with_filepath(mut self, path: impl Into<PathBuf>) -> Self {
        self.filepath = Some(path.into());
        self
    }

    pub fn with_subtitles(mut self, subtitles: usize) -> Self {
        self.subtitles = Some(subtitles);
        self.key = TextKey::of(&self.raw_content, &self.paragraphs, self.subtitles);
        self
    }

    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// Every non-blank line, titles included.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    /// Number of leading paragraphs that are titles or subtitles.
    pub fn subtitles(&self) -> Option<usize> {
        self.subtitles
    }

    pub fn key(&self) -> TextKey {
        self.key
    }

    /// Label used in reports: the file path when known, `-` otherwise.
    pub fn label(&self) -> String {
        match &self.filepath {
            Some(p) => p.display().to_string(),
            None => "-".to_string(),
        }
    }
}
