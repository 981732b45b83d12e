use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from the core pipeline.
///
/// Every variant is terminal for the operation that raised it; nothing is
/// retried.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad or missing argument / configuration value.
    #[error("Argument invalide : {0}")]
    Argument(String),

    /// The image could not be opened or decoded.
    #[error("Impossible de charger l'image {}: {reason}", path.display())]
    ImageLoad {
        /// Path of the image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A pixel buffer could not be allocated.
    #[error("Allocation impossible pour un buffer de {bytes} octets")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
    },

    /// Channel count outside 1..=4, or 2 channels for the colored renderer.
    #[error("Nombre de canaux non supporté : {channels}")]
    UnsupportedChannels {
        /// The offending channel count.
        channels: u8,
    },

    /// The coverage table could not be opened or read.
    #[error("Table de couverture illisible {}: {source}", path.display())]
    CoverageTableIo {
        /// Path of the table.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading table lines from a stream failed.
    #[error("Lecture de la table de couverture impossible : {0}")]
    CoverageTableRead(#[source] std::io::Error),

    /// A coverage table line is malformed.
    #[error("Ligne {line} invalide dans la table de couverture : {content:?}")]
    CoverageTableParse {
        /// 1-based line number.
        line: usize,
        /// Raw line content.
        content: String,
    },

    /// The coverage table holds no entry.
    #[error("Table de couverture vide")]
    EmptyCoverageTable,

    /// The font file could not be opened or parsed (coverage builder only).
    #[error("Impossible de charger la police {}: {reason}", path.display())]
    FontLoad {
        /// Path of the font.
        path: PathBuf,
        /// Reason reported by the loader.
        reason: String,
    },

    /// The output file or terminal could not be written.
    #[error("Écriture impossible vers {target}: {source}")]
    OutputWrite {
        /// Human-readable sink name (file path or "terminal").
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Wrap an I/O error raised while writing to `target`.
    pub fn output(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            target: target.into(),
            source,
        }
    }
}
