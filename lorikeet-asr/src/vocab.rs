//! SentencePiece vocabulary loaded from `vocab.txt`.

use crate::error::{ArtifactError, Result};
use std::path::Path;

/// Marker SentencePiece uses for a word-initial piece.
const WORD_BOUNDARY: char = '\u{2581}';

/// Token-id to text-piece mapping, one piece per line of `vocab.txt`.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    pieces: Vec<String>,
}

impl Vocabulary {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ArtifactError::Io)?;
        let pieces: Vec<String> = content.lines().map(String::from).collect();

        if pieces.is_empty() {
            return Err(ArtifactError::EmptyVocabulary(path.display().to_string()).into());
        }

        Ok(Self { pieces })
    }

    /// Vocabulary size; the blank token sits at this index.
    pub fn size(&self) -> usize {
        self.pieces.len()
    }

    /// Render a single piece, mapping the word-boundary marker to a space.
    ///
    /// Unknown ids render as empty text.
    pub fn piece_text(&self, id: usize) -> String {
        match self.pieces.get(id) {
            Some(piece) => piece.replace(WORD_BOUNDARY, " "),
            None => String::new(),
        }
    }

    /// Decode a token-id sequence into text.
    pub fn decode(&self, ids: &[usize]) -> String {
        let text: String = ids.iter().map(|&id| self.piece_text(id)).collect();
        text.trim_start().to_string()
    }
}
