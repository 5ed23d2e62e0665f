//! Extended data squares: erasure-coded extension of an original square.

use crate::square::{square_width, DataSquare};
use crate::{Axis, Codec, Error, Result, Root, Share, TreeConstructorFn};

/// One of the four `k`x`k` sub-blocks of an extended square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// The original data.
    Q0,
    /// Row parity of Q0.
    Q1,
    /// Column parity of Q0.
    Q2,
    /// Parity of parity.
    Q3,
}

/// A `(2k)x(2k)` square of shares where every row and column is an
/// erasure codeword committing to a digest.
///
/// Created either fully populated via [`compute`](Self::compute) or
/// partially populated via [`import`](Self::import), and mutated only by
/// [`repair`](Self::repair).
pub struct ExtendedDataSquare {
    pub(crate) square: DataSquare,
    pub(crate) codec: Box<dyn Codec>,
    pub(crate) original_width: usize,
}

impl ExtendedDataSquare {
    /// Extend a flattened `k`x`k` original square: derive the three parity
    /// quadrants, verify the parity-of-parity cross-consistency, and
    /// compute and cache every row and column root.
    pub fn compute(
        original: Vec<Share>,
        codec: Box<dyn Codec>,
        tree_fn: TreeConstructorFn,
    ) -> Result<Self> {
        let k = square_width(original.len()).ok_or(Error::InvalidDimensions(original.len()))?;
        validate_original_width(k, codec.as_ref())?;

        let mut share_size = 0;
        for share in &original {
            if share_size == 0 {
                share_size = share.len();
            } else if share.len() != share_size {
                return Err(Error::UnevenChunks);
            }
        }

        let width = 2 * k;
        let mut grid: Vec<Share> = vec![Vec::new(); width * width];
        for (idx, share) in original.into_iter().enumerate() {
            grid[(idx / k) * width + (idx % k)] = share;
        }

        // Q1: encode each original row.
        for i in 0..k {
            let chunks = grid[i * width..i * width + k].to_vec();
            let parity = encode_axis(codec.as_ref(), &chunks, Axis::Row, i)?;
            for (j, share) in parity.into_iter().enumerate() {
                grid[i * width + k + j] = share;
            }
        }

        // Q2: encode each original column.
        for j in 0..k {
            let chunks: Vec<Share> = (0..k).map(|i| grid[i * width + j].clone()).collect();
            let parity = encode_axis(codec.as_ref(), &chunks, Axis::Col, j)?;
            for (i, share) in parity.into_iter().enumerate() {
                grid[(k + i) * width + j] = share;
            }
        }

        // Q3: encode each Q2 row.
        for i in k..width {
            let chunks = grid[i * width..i * width + k].to_vec();
            let parity = encode_axis(codec.as_ref(), &chunks, Axis::Row, i)?;
            for (j, share) in parity.into_iter().enumerate() {
                grid[i * width + k + j] = share;
            }
        }

        // Q3 must also be derivable by encoding each Q1 column; a square
        // where the two derivations disagree is rejected outright.
        for j in k..width {
            let chunks: Vec<Share> = (0..k).map(|i| grid[i * width + j].clone()).collect();
            let parity = encode_axis(codec.as_ref(), &chunks, Axis::Col, j)?;
            for (i, share) in parity.iter().enumerate() {
                if *share != grid[(k + i) * width + j] {
                    return Err(Error::InconsistentParity {
                        axis: Axis::Col,
                        index: j as u32,
                    });
                }
            }
        }

        let cells = grid.into_iter().map(Some).collect();
        let mut square = DataSquare::new(cells, tree_fn)?;
        square.row_roots()?;
        square.col_roots()?;

        Ok(Self {
            square,
            codec,
            original_width: k,
        })
    }

    /// Wrap a flattened, possibly-partial `(2k)x(2k)` grid without
    /// deriving parity or roots. Absent cells are `None`.
    pub fn import(
        cells: Vec<Option<Share>>,
        codec: Box<dyn Codec>,
        tree_fn: TreeConstructorFn,
    ) -> Result<Self> {
        let width = square_width(cells.len()).ok_or(Error::InvalidDimensions(cells.len()))?;
        if width % 2 != 0 {
            return Err(Error::InvalidDimensions(cells.len()));
        }
        let k = width / 2;
        validate_original_width(k, codec.as_ref())?;

        let square = DataSquare::new(cells, tree_fn)?;
        Ok(Self {
            square,
            codec,
            original_width: k,
        })
    }

    /// The extended side length, `2k`.
    pub fn width(&self) -> usize {
        self.square.width()
    }

    /// The original side length, `k`.
    pub fn original_width(&self) -> usize {
        self.original_width
    }

    pub fn share_size(&self) -> usize {
        self.square.share_size()
    }

    /// The `2k` cells of row `i` (possibly absent before repair).
    pub fn row(&self, i: usize) -> Result<&[Option<Share>]> {
        self.square.row(i)
    }

    /// The `2k` cells of column `j` (possibly absent before repair).
    pub fn col(&self, j: usize) -> Result<Vec<Option<Share>>> {
        self.square.col(j)
    }

    pub fn get_cell(&self, i: usize, j: usize) -> Result<Option<&Share>> {
        self.square.get_cell(i, j)
    }

    pub fn set_cell(&mut self, i: usize, j: usize, share: Share) -> Result<()> {
        self.square.set_cell(i, j, share)
    }

    /// All `2k` row roots, in row order. Requires a fully populated
    /// square; cached after the first computation.
    pub fn row_roots(&mut self) -> Result<Vec<Root>> {
        self.square.row_roots()
    }

    /// All `2k` column roots, in column order.
    pub fn col_roots(&mut self) -> Result<Vec<Root>> {
        self.square.col_roots()
    }

    /// Row-major copy of the whole grid.
    pub fn flattened(&self) -> Vec<Option<Share>> {
        self.square.flattened()
    }

    /// Row-major copy of the original data, erroring while any of it is
    /// still absent.
    pub fn flattened_ods(&self) -> Result<Vec<Share>> {
        self.quadrant(Quadrant::Q0)
    }

    /// Row-major copy of one quadrant, erroring if any of its cells is
    /// absent.
    pub fn quadrant(&self, quadrant: Quadrant) -> Result<Vec<Share>> {
        let k = self.original_width;
        let (row0, col0) = match quadrant {
            Quadrant::Q0 => (0, 0),
            Quadrant::Q1 => (0, k),
            Quadrant::Q2 => (k, 0),
            Quadrant::Q3 => (k, k),
        };
        let mut shares = Vec::with_capacity(k * k);
        for i in 0..k {
            for j in 0..k {
                match self.square.get_cell(row0 + i, col0 + j)? {
                    Some(share) => shares.push(share.clone()),
                    None => return Err(Error::IncompleteQuadrant(quadrant)),
                }
            }
        }
        Ok(shares)
    }

    /// Whether every cell is present.
    pub fn is_complete(&self) -> bool {
        self.square.is_complete()
    }
}

impl std::fmt::Debug for ExtendedDataSquare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedDataSquare")
            .field("codec", &self.codec.name())
            .field("original_width", &self.original_width)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ExtendedDataSquare {
    fn eq(&self, other: &Self) -> bool {
        self.original_width == other.original_width && self.square == other.square
    }
}

fn validate_original_width(k: usize, codec: &dyn Codec) -> Result<()> {
    if k == 0 || !k.is_power_of_two() {
        return Err(Error::InvalidChunkCount(k));
    }
    let max = codec.max_chunks();
    if k > max {
        return Err(Error::ExceedsCodecLimit {
            width: k,
            codec: codec.name(),
            max,
        });
    }
    Ok(())
}

fn encode_axis(
    codec: &dyn Codec,
    chunks: &[Share],
    axis: Axis,
    index: usize,
) -> Result<Vec<Share>> {
    codec.encode(chunks).map_err(|source| Error::Codec {
        axis,
        index: index as u32,
        source,
    })
}
