//! Two-dimensional erasure-coded data squares.
//!
//! An [`ExtendedDataSquare`] is a `(2k)x(2k)` grid of fixed-size byte
//! shares where every row and every column is independently an erasure
//! codeword, and every row and column commits to a digest (a "root")
//! through a pluggable commitment tree. Holders of a share subset plus
//! the trusted roots can reconstruct the full square with
//! [`ExtendedDataSquare::repair`], or obtain fraud evidence localizing
//! the row or column that contradicts its committed root.
//!
//! Erasure coding is supplied by the [`eds-codec`](eds_codec) strategies;
//! commitments default to a SHA-256 binary tree ([`tree::DefaultTree`])
//! and can be swapped for a namespace-aware scheme via
//! [`tree::TreeConstructorFn`].

use std::fmt;

mod extended;
mod repair;
mod square;
pub mod tree;

pub use eds_codec::{Codec, CodecError, LeoRsCodec, RsGf8Codec};
pub use extended::{ExtendedDataSquare, Quadrant};
pub use square::DataSquare;
pub use tree::{new_default_tree, DefaultTree, Tree, TreeConstructorFn};

/// One fixed-length byte buffer occupying one cell of the square.
pub type Share = Vec<u8>;

/// A row or column commitment digest.
pub type Root = Vec<u8>;

pub type Result<T> = std::result::Result<T, Error>;

/// The two axes of a data square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "column"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Present shares are not all of one size.
    #[error("uneven chunks: present shares are not all of equal size")]
    UnevenChunks,

    /// The share count does not form a square with an even side.
    #[error("invalid dimensions: {0} shares do not form a square with an even side")]
    InvalidDimensions(usize),

    /// The original side length is outside the supported domain.
    #[error("unsupported original width {0}: must be a non-zero power of two")]
    InvalidChunkCount(usize),

    /// The original side length is above the configured codec's limit.
    #[error("original width {width} exceeds the limit of codec {codec} ({max})")]
    ExceedsCodecLimit {
        width: usize,
        codec: &'static str,
        max: usize,
    },

    /// The two derivations of the parity-of-parity quadrant disagree.
    #[error("inconsistent parity: {axis} {index} disagrees between its two derivations")]
    InconsistentParity { axis: Axis, index: u32 },

    /// A root was requested over a row or column with absent cells.
    #[error("cannot compute root of incomplete {axis} {index}")]
    IncompleteAxis { axis: Axis, index: u32 },

    /// A quadrant was requested while some of its cells are absent.
    #[error("incomplete quadrant {0:?}")]
    IncompleteQuadrant(Quadrant),

    /// Trusted root slices of the wrong length were passed to repair.
    #[error("expected {expected} trusted roots per axis, got {rows} row and {cols} column roots")]
    InvalidRootCount {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// A row or column index past the square's width.
    #[error("index {index} out of bounds for width {width}")]
    IndexOutOfBounds { index: u32, width: usize },

    /// Repair reached a fixed point with the square still incomplete.
    #[error("unrepairable data square")]
    Unrepairable,

    /// A decoded row or column contradicts its trusted root. Carries the
    /// evidence needed for an external fraud proof: the failing index and
    /// the committed shares that fed the decode (absent cells as `None`).
    #[error("corrupted {axis} {index}: recomputed root does not match the trusted root")]
    Corrupted {
        axis: Axis,
        index: u32,
        shares: Vec<Option<Share>>,
    },

    /// A codec failure, tagged with the row or column it occurred on.
    #[error("codec failure on {axis} {index}: {source}")]
    Codec {
        axis: Axis,
        index: u32,
        #[source]
        source: CodecError,
    },

    /// A commitment-tree failure.
    #[error("tree failure: {0}")]
    Tree(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_display() {
        assert_eq!(Axis::Row.to_string(), "row");
        assert_eq!(Axis::Col.to_string(), "column");
    }

    #[test]
    fn test_corrupted_error_keeps_evidence() {
        let err = Error::Corrupted {
            axis: Axis::Col,
            index: 3,
            shares: vec![Some(vec![1, 2]), None],
        };
        match err {
            Error::Corrupted { axis, index, shares } => {
                assert_eq!(axis, Axis::Col);
                assert_eq!(index, 3);
                assert_eq!(shares.len(), 2);
                assert!(shares[1].is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
