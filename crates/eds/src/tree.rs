//! Commitment trees over the shares of one row or column.
//!
//! A fresh [`Tree`] is built per row/column through a
//! [`TreeConstructorFn`], so callers can substitute a namespace-aware or
//! otherwise specialized commitment for the SHA-256 [`DefaultTree`].

use sha2::{Digest, Sha256};

use crate::{Axis, Error, Result, Root};

/// Constructs a fresh tree for the given axis and index. The axis and
/// index are available so specialized commitments can bind leaves to
/// their position; [`DefaultTree`] ignores them.
pub type TreeConstructorFn = fn(Axis, u32) -> Box<dyn Tree>;

/// An accumulating commitment over ordered shares.
///
/// Leaf order is semantically significant: it encodes each share's
/// position within its row or column.
pub trait Tree {
    /// Append the next leaf.
    fn push(&mut self, share: &[u8]) -> Result<()>;

    /// Finalize over all pushed leaves. Implementations reject pushes
    /// after finalization.
    fn root(&mut self) -> Result<Root>;
}

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Balanced binary SHA-256 tree with RFC 6962-style domain separation.
/// An odd node at any level is promoted unchanged.
pub struct DefaultTree {
    leaves: Vec<[u8; 32]>,
    finalized: bool,
}

impl DefaultTree {
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            finalized: false,
        }
    }
}

impl Default for DefaultTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for DefaultTree {
    fn push(&mut self, share: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(Error::Tree("push after root".to_string()));
        }
        self.leaves.push(leaf_digest(share));
        Ok(())
    }

    fn root(&mut self) -> Result<Root> {
        if self.leaves.is_empty() {
            return Err(Error::Tree("no leaves pushed".to_string()));
        }
        self.finalized = true;

        let mut level = self.leaves.clone();
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| {
                    if pair.len() == 2 {
                        node_digest(&pair[0], &pair[1])
                    } else {
                        pair[0]
                    }
                })
                .collect();
        }
        Ok(level[0].to_vec())
    }
}

/// Constructor for [`DefaultTree`], usable as a [`TreeConstructorFn`].
pub fn new_default_tree(_axis: Axis, _index: u32) -> Box<dyn Tree> {
    Box::new(DefaultTree::new())
}

fn leaf_digest(share: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(share);
    hasher.finalize().into()
}

fn node_digest(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
