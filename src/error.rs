use std::io;
use std::path::{Path, PathBuf};

//===========================================================================//

/// Coarse classification of an [`AssembleError`], for callers that only care
/// about which stage failed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// An input raster could not be opened, read, or decoded.
    InputRead,
    /// The destination file could not be written.
    OutputWrite,
    /// An input had dimensions or sizes that can't be encoded in an ICO.
    MalformedInput,
    /// The external rasterizer failed to produce an image.
    Rasterize,
}

/// The error type for assembling an ICO file.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// A candidate's file is missing, unreadable, or not a decodable raster.
    #[error("failed to read raster {path:?}: {source}")]
    InputRead {
        /// The offending candidate file.
        path: PathBuf,
        /// The underlying I/O or decoding error.
        #[source]
        source: io::Error,
    },

    /// The destination could not be written.  No partial file is left
    /// behind.
    #[error("failed to write ICO file {path:?}: {source}")]
    OutputWrite {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A raster reported dimensions that are zero or unreasonably large.
    #[error("malformed raster {path:?}: {reason}")]
    MalformedInput {
        /// The offending candidate file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// More images were included than the 16-bit count field can hold.
    #[error("too many images in ICO (was {count}, but max is {max})")]
    TooManyEntries {
        /// The number of included candidates.
        count: usize,
        /// The largest count the directory header can express.
        max: usize,
    },

    /// A payload size or offset doesn't fit in a 32-bit directory field.
    #[error("raster {path:?} doesn't fit in an ICO ({size} bytes at offset \
             {offset})")]
    PayloadTooLarge {
        /// The offending candidate file.
        path: PathBuf,
        /// The encoded size of the file, in bytes.
        size: u64,
        /// The offset at which its payload would have started.
        offset: u64,
    },

    /// The rasterizer failed to render one of the export targets.
    #[error("failed to render {path:?}: {source}")]
    Rasterize {
        /// The raster file that should have been produced.
        path: PathBuf,
        /// The underlying error reported by the rasterizer.
        #[source]
        source: io::Error,
    },
}

impl AssembleError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            AssembleError::InputRead { .. } => ErrorKind::InputRead,
            AssembleError::OutputWrite { .. } => ErrorKind::OutputWrite,
            AssembleError::MalformedInput { .. }
            | AssembleError::TooManyEntries { .. }
            | AssembleError::PayloadTooLarge { .. } => {
                ErrorKind::MalformedInput
            }
            AssembleError::Rasterize { .. } => ErrorKind::Rasterize,
        }
    }

    /// Returns the file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match *self {
            AssembleError::InputRead { ref path, .. }
            | AssembleError::OutputWrite { ref path, .. }
            | AssembleError::MalformedInput { ref path, .. }
            | AssembleError::PayloadTooLarge { ref path, .. }
            | AssembleError::Rasterize { ref path, .. } => Some(path),
            AssembleError::TooManyEntries { .. } => None,
        }
    }
}

//===========================================================================//


//===========================================================================//
