//! The backing grid shared by original and extended data squares.

use crate::{Axis, Error, Result, Root, Share, Tree, TreeConstructorFn};

/// A square grid of possibly-absent shares with cached row/column roots.
///
/// Cells live in one owned row-major buffer; row and column views are
/// index ranges over that buffer, never aliased copies. Absence is an
/// explicit `None` per cell, so a legitimate zero-length share is never
/// confused with a missing one.
pub struct DataSquare {
    cells: Vec<Option<Share>>,
    width: usize,
    share_size: Option<usize>,
    row_roots: Option<Vec<Root>>,
    col_roots: Option<Vec<Root>>,
    tree_fn: TreeConstructorFn,
}

impl DataSquare {
    /// Wrap a flattened row-major grid. The share count must be a perfect
    /// square and all present shares must have one size.
    pub fn new(cells: Vec<Option<Share>>, tree_fn: TreeConstructorFn) -> Result<Self> {
        let width = square_width(cells.len()).ok_or(Error::InvalidDimensions(cells.len()))?;

        // A zero-length share is present and establishes the size like
        // any other; only `None` cells carry no size information.
        let mut share_size = None;
        for share in cells.iter().flatten() {
            match share_size {
                None => share_size = Some(share.len()),
                Some(size) if share.len() != size => return Err(Error::UnevenChunks),
                Some(_) => {}
            }
        }

        Ok(Self {
            cells,
            width,
            share_size,
            row_roots: None,
            col_roots: None,
            tree_fn,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The fixed share length, or zero while no present share has
    /// established one.
    pub fn share_size(&self) -> usize {
        self.share_size.unwrap_or(0)
    }

    /// The cells of row `i`, in column order.
    pub fn row(&self, i: usize) -> Result<&[Option<Share>]> {
        self.check_index(i)?;
        Ok(&self.cells[i * self.width..(i + 1) * self.width])
    }

    /// The cells of column `j`, in row order.
    pub fn col(&self, j: usize) -> Result<Vec<Option<Share>>> {
        self.check_index(j)?;
        Ok((0..self.width)
            .map(|i| self.cells[i * self.width + j].clone())
            .collect())
    }

    pub fn get_cell(&self, i: usize, j: usize) -> Result<Option<&Share>> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.cells[i * self.width + j].as_ref())
    }

    /// Fill or replace one cell, invalidating any cached roots.
    pub fn set_cell(&mut self, i: usize, j: usize, share: Share) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        match self.share_size {
            None => self.share_size = Some(share.len()),
            Some(size) if share.len() != size => return Err(Error::UnevenChunks),
            Some(_) => {}
        }
        self.cells[i * self.width + j] = Some(share);
        self.row_roots = None;
        self.col_roots = None;
        Ok(())
    }

    /// All row roots, in row order. Computed on first use over a fully
    /// populated grid and cached until a cell changes.
    pub fn row_roots(&mut self) -> Result<Vec<Root>> {
        if self.row_roots.is_none() {
            let roots = (0..self.width)
                .map(|i| self.axis_root(Axis::Row, i))
                .collect::<Result<Vec<_>>>()?;
            self.row_roots = Some(roots);
        }
        // Populated just above.
        Ok(self.row_roots.clone().unwrap_or_default())
    }

    /// All column roots, in column order.
    pub fn col_roots(&mut self) -> Result<Vec<Root>> {
        if self.col_roots.is_none() {
            let roots = (0..self.width)
                .map(|j| self.axis_root(Axis::Col, j))
                .collect::<Result<Vec<_>>>()?;
            self.col_roots = Some(roots);
        }
        Ok(self.col_roots.clone().unwrap_or_default())
    }

    /// Row-major copy of the whole grid.
    pub fn flattened(&self) -> Vec<Option<Share>> {
        self.cells.clone()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Commit to one fully populated row or column.
    pub(crate) fn axis_root(&self, axis: Axis, index: usize) -> Result<Root> {
        let mut tree = self.new_tree(axis, index);
        let cells: Vec<Option<Share>> = match axis {
            Axis::Row => self.row(index)?.to_vec(),
            Axis::Col => self.col(index)?,
        };
        for cell in &cells {
            match cell {
                Some(share) => tree.push(share)?,
                None => {
                    return Err(Error::IncompleteAxis {
                        axis,
                        index: index as u32,
                    })
                }
            }
        }
        tree.root()
    }

    pub(crate) fn new_tree(&self, axis: Axis, index: usize) -> Box<dyn Tree> {
        (self.tree_fn)(axis, index as u32)
    }

    pub(crate) fn cached_row_roots(&self) -> Option<&[Root]> {
        self.row_roots.as_deref()
    }

    pub(crate) fn cached_col_roots(&self) -> Option<&[Root]> {
        self.col_roots.as_deref()
    }

    /// Install verified roots directly, bypassing recomputation.
    pub(crate) fn set_cached_roots(&mut self, rows: Vec<Root>, cols: Vec<Root>) {
        self.row_roots = Some(rows);
        self.col_roots = Some(cols);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: index as u32,
                width: self.width,
            });
        }
        Ok(())
    }
}

impl PartialEq for DataSquare {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.cells == other.cells
    }
}

pub(crate) fn square_width(len: usize) -> Option<usize> {
    let mut width = (len as f64).sqrt() as usize;
    while width * width < len {
        width += 1;
    }
    (len > 0 && width * width == len).then_some(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::new_default_tree;

    fn present(cells: &[&[u8]]) -> Vec<Option<Share>> {
        cells.iter().map(|c| Some(c.to_vec())).collect()
    }

    #[test]
    fn test_square_width() {
        assert_eq!(square_width(1), Some(1));
        assert_eq!(square_width(4), Some(2));
        assert_eq!(square_width(16), Some(4));
        assert_eq!(square_width(0), None);
        assert_eq!(square_width(5), None);
        assert_eq!(square_width(15), None);
    }

    #[test]
    fn test_new_rejects_non_square_and_uneven() {
        assert!(matches!(
            DataSquare::new(vec![None; 5], new_default_tree),
            Err(Error::InvalidDimensions(5))
        ));
        let uneven = vec![Some(vec![1, 2]), Some(vec![3]), None, None];
        assert!(matches!(
            DataSquare::new(uneven, new_default_tree),
            Err(Error::UnevenChunks)
        ));
    }

    #[test]
    fn test_row_and_col_views() {
        let ds = DataSquare::new(
            present(&[&[1, 2], &[3, 4], &[5, 6], &[7, 8]]),
            new_default_tree,
        )
        .unwrap();
        assert_eq!(ds.width(), 2);
        assert_eq!(ds.share_size(), 2);
        assert_eq!(ds.row(0).unwrap()[1], Some(vec![3, 4]));
        assert_eq!(ds.col(0).unwrap()[1], Some(vec![5, 6]));
        assert!(ds.row(2).is_err());
    }

    #[test]
    fn test_set_cell_invalidates_roots() {
        let mut ds = DataSquare::new(
            present(&[&[1, 2], &[3, 4], &[5, 6], &[7, 8]]),
            new_default_tree,
        )
        .unwrap();
        let before = ds.row_roots().unwrap();
        ds.set_cell(0, 0, vec![9, 9]).unwrap();
        let after = ds.row_roots().unwrap();
        assert_ne!(before[0], after[0]);
        assert_eq!(before[1], after[1]);
    }

    #[test]
    fn test_set_cell_share_size_enforced() {
        let mut ds = DataSquare::new(vec![None; 4], new_default_tree).unwrap();
        assert_eq!(ds.share_size(), 0);
        ds.set_cell(0, 0, vec![1, 2, 3]).unwrap();
        assert_eq!(ds.share_size(), 3);
        assert!(matches!(
            ds.set_cell(0, 1, vec![1]),
            Err(Error::UnevenChunks)
        ));
    }

    #[test]
    fn test_roots_require_complete_axis() {
        let mut cells = present(&[&[1, 2], &[3, 4], &[5, 6], &[7, 8]]);
        cells[3] = None;
        let mut ds = DataSquare::new(cells, new_default_tree).unwrap();
        assert!(matches!(
            ds.row_roots(),
            Err(Error::IncompleteAxis { axis: Axis::Row, index: 1 })
        ));
    }

    #[test]
    fn test_zero_length_share_establishes_size() {
        // A present empty share fixes the size at zero; a longer share
        // alongside it is uneven, not "first of its kind".
        let mixed = vec![Some(vec![]), Some(vec![1]), None, None];
        assert!(matches!(
            DataSquare::new(mixed, new_default_tree),
            Err(Error::UnevenChunks)
        ));

        let mut ds = DataSquare::new(vec![None; 4], new_default_tree).unwrap();
        ds.set_cell(0, 0, vec![]).unwrap();
        assert!(matches!(
            ds.set_cell(0, 1, vec![1]),
            Err(Error::UnevenChunks)
        ));
    }

    #[test]
    fn test_zero_length_share_is_not_absent() {
        let cells = vec![Some(vec![]), Some(vec![]), Some(vec![]), Some(vec![])];
        let ds = DataSquare::new(cells, new_default_tree).unwrap();
        assert!(ds.is_complete());
        assert_eq!(ds.share_size(), 0);
    }
}
