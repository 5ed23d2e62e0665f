//! Crossword repair of a partially populated extended data square.
//!
//! Rows and columns are decoded alternately until a fixed point: a row
//! that is undecodable in isolation may become decodable once a column
//! decode elsewhere supplies one of its missing cells. Every decoded row
//! or column is verified against its trusted root before its recovered
//! cells are committed to the square.

use eds_codec::CodecError;

use crate::{Axis, Error, ExtendedDataSquare, Result, Root, Share};

/// Outcome of one attempt at a single row or column.
enum AxisOutcome {
    /// Verified against its root; this many cells were newly filled.
    Solved(usize),
    /// Too few present cells this pass; retry after more progress.
    Deferred,
}

impl ExtendedDataSquare {
    /// Reconstruct every absent cell from the present ones, verifying
    /// each completed row and column against the trusted roots.
    ///
    /// Terminal outcomes:
    /// - `Ok(())` — the square is fully populated and every row and
    ///   column matches its trusted root.
    /// - [`Error::Unrepairable`] — a full pass made no progress with the
    ///   square still incomplete; more shares are needed.
    /// - [`Error::Corrupted`] — a completed row or column contradicts its
    ///   trusted root; the error carries the fraud evidence. This always
    ///   wins over `Unrepairable`.
    pub fn repair(&mut self, row_roots: &[Root], col_roots: &[Root]) -> Result<()> {
        let width = self.width();
        if row_roots.len() != width || col_roots.len() != width {
            return Err(Error::InvalidRootCount {
                expected: width,
                rows: row_roots.len(),
                cols: col_roots.len(),
            });
        }

        // An already-repaired (or freshly computed) square carries cached
        // verified roots; if they match the trusted ones there is nothing
        // to re-derive.
        if let (Some(rows), Some(cols)) =
            (self.square.cached_row_roots(), self.square.cached_col_roots())
        {
            if rows == row_roots && cols == col_roots {
                return Ok(());
            }
        }

        self.solve(row_roots, col_roots)
    }

    fn solve(&mut self, row_roots: &[Root], col_roots: &[Root]) -> Result<()> {
        let width = self.width();
        let mut solved_rows = vec![false; width];
        let mut solved_cols = vec![false; width];
        let mut passes = 0usize;

        loop {
            passes += 1;
            let mut filled = 0usize;

            for i in 0..width {
                if solved_rows[i] {
                    continue;
                }
                match self.solve_axis(Axis::Row, i, &row_roots[i])? {
                    AxisOutcome::Solved(cells) => {
                        solved_rows[i] = true;
                        filled += cells;
                    }
                    AxisOutcome::Deferred => {}
                }
            }

            for j in 0..width {
                if solved_cols[j] {
                    continue;
                }
                match self.solve_axis(Axis::Col, j, &col_roots[j])? {
                    AxisOutcome::Solved(cells) => {
                        solved_cols[j] = true;
                        filled += cells;
                    }
                    AxisOutcome::Deferred => {}
                }
            }

            log::debug!("repair pass {}: filled {} cells", passes, filled);

            if solved_rows.iter().all(|&s| s) && solved_cols.iter().all(|&s| s) {
                break;
            }
            if filled == 0 {
                return Err(Error::Unrepairable);
            }
        }

        // Every axis verified equal to its trusted root above.
        self.square
            .set_cached_roots(row_roots.to_vec(), col_roots.to_vec());
        log::debug!("repaired in {} passes", passes);
        Ok(())
    }

    /// Attempt one row or column: decode if below full, verify against
    /// the trusted root, then commit the recovered cells.
    fn solve_axis(&mut self, axis: Axis, index: usize, trusted: &[u8]) -> Result<AxisOutcome> {
        let mut cells: Vec<Option<Share>> = match axis {
            Axis::Row => self.square.row(index)?.to_vec(),
            Axis::Col => self.square.col(index)?,
        };
        let present = cells.iter().flatten().count();
        if present < self.original_width {
            return Ok(AxisOutcome::Deferred);
        }

        // Snapshot before decoding: fraud evidence may only contain the
        // shares the decode was fed, with absent cells explicit.
        let snapshot = cells.clone();
        let missing = cells.len() - present;

        if missing > 0 {
            match self.codec.decode(&mut cells) {
                Ok(()) => {}
                Err(CodecError::InsufficientShares { .. }) => return Ok(AxisOutcome::Deferred),
                Err(source) => {
                    return Err(Error::Codec {
                        axis,
                        index: index as u32,
                        source,
                    })
                }
            }
        }

        let mut tree = self.square.new_tree(axis, index);
        for cell in &cells {
            match cell {
                Some(share) => tree.push(share)?,
                // Decode contract: every cell is present on success.
                None => {
                    return Err(Error::IncompleteAxis {
                        axis,
                        index: index as u32,
                    })
                }
            }
        }
        if tree.root()? != trusted {
            return Err(Error::Corrupted {
                axis,
                index: index as u32,
                shares: snapshot,
            });
        }

        if missing > 0 {
            for (pos, cell) in cells.into_iter().enumerate() {
                let (i, j) = match axis {
                    Axis::Row => (index, pos),
                    Axis::Col => (pos, index),
                };
                if self.square.get_cell(i, j)?.is_none() {
                    if let Some(share) = cell {
                        self.square.set_cell(i, j, share)?;
                    }
                }
            }
        }

        Ok(AxisOutcome::Solved(missing))
    }
}
