//! Erasure codec strategies for two-dimensional data squares.
//!
//! A [`Codec`] turns `k` original chunks into `k` parity chunks, and can
//! reconstruct a full `2k`-wide codeword from any `k` present positions.
//! Two backends are provided:
//!
//! - [`LeoRsCodec`]: Leopard-style systematic Reed-Solomon over GF(2^16)
//! - [`RsGf8Codec`]: classic Reed-Solomon over GF(2^8)
//!
//! The variants differ in their maximum supported chunk count, so the
//! caller picks one based on the square sizes it needs to handle.

mod gf8;
mod leopard;

pub use gf8::RsGf8Codec;
pub use leopard::LeoRsCodec;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors surfaced by [`Codec`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Chunks of inconsistent, zero, or backend-unsupported length.
    #[error("invalid chunk size: chunks must share one non-zero supported length")]
    InvalidChunkSize,

    /// The chunk count is outside the supported domain.
    #[error("unsupported chunk count {0}: must be a non-zero power of two")]
    InvalidChunkCount(usize),

    /// The chunk count is valid in shape but above the variant's limit.
    #[error("chunk count {chunks} exceeds codec limit {max}")]
    ExceedsCodecLimit { chunks: usize, max: usize },

    /// Fewer than `k` present positions in a `2k`-wide codeword.
    #[error("insufficient shares: {have} present, {need} required")]
    InsufficientShares { have: usize, need: usize },

    #[error("leopard backend: {0}")]
    Leopard(#[from] reed_solomon_simd::Error),

    #[error("gf8 backend: {0}")]
    Gf8(#[from] reed_solomon_erasure::Error),
}

/// An erasure code applied independently to every row and column of a
/// data square.
///
/// Implementations are pure and stateless: encoding the same chunks, or
/// decoding the same erasure pattern, always produces identical bytes.
/// Decoding proves nothing about external commitments; root verification
/// is the repair engine's job.
pub trait Codec {
    /// Encode `k` same-length chunks into `k` parity chunks.
    fn encode(&self, chunks: &[Vec<u8>]) -> Result<Vec<Vec<u8>>>;

    /// Fill every absent position of a `2k`-wide codeword in place,
    /// data half and parity half both. Requires at least `k` present
    /// positions.
    fn decode(&self, codeword: &mut [Option<Vec<u8>>]) -> Result<()>;

    /// The maximum number of original chunks this variant supports.
    fn max_chunks(&self) -> usize;

    /// Human-readable variant name.
    fn name(&self) -> &'static str;
}

/// Validate an original chunk count `k` against a variant limit.
pub(crate) fn validate_chunk_count(k: usize, max: usize) -> Result<usize> {
    if k == 0 || !k.is_power_of_two() {
        return Err(CodecError::InvalidChunkCount(k));
    }
    if k > max {
        return Err(CodecError::ExceedsCodecLimit { chunks: k, max });
    }
    Ok(k)
}

/// Derive `k` from a `2k`-wide codeword length.
pub(crate) fn codeword_chunk_count(len: usize, max: usize) -> Result<usize> {
    if len == 0 || len % 2 != 0 {
        return Err(CodecError::InvalidChunkCount(len));
    }
    validate_chunk_count(len / 2, max)
}

/// Require one shared non-zero length across all chunks.
pub(crate) fn uniform_chunk_size<'a, I>(chunks: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut size = None;
    for chunk in chunks {
        match size {
            None if chunk.is_empty() => return Err(CodecError::InvalidChunkSize),
            None => size = Some(chunk.len()),
            Some(s) if s != chunk.len() => return Err(CodecError::InvalidChunkSize),
            Some(_) => {}
        }
    }
    size.ok_or(CodecError::InvalidChunkSize)
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::RngCore;

    /// Random chunks of one size, for exercising a codec.
    pub fn random_chunks(count: usize, size: usize) -> Vec<Vec<u8>> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let mut chunk = vec![0u8; size];
                rng.fill_bytes(&mut chunk);
                chunk
            })
            .collect()
    }

    /// Assemble a full codeword (data then parity) as present cells.
    pub fn full_codeword(data: &[Vec<u8>], parity: &[Vec<u8>]) -> Vec<Option<Vec<u8>>> {
        data.iter()
            .chain(parity.iter())
            .cloned()
            .map(Some)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_chunk_count() {
        assert!(validate_chunk_count(1, 128).is_ok());
        assert!(validate_chunk_count(64, 128).is_ok());
        assert!(matches!(
            validate_chunk_count(0, 128),
            Err(CodecError::InvalidChunkCount(0))
        ));
        assert!(matches!(
            validate_chunk_count(3, 128),
            Err(CodecError::InvalidChunkCount(3))
        ));
        assert!(matches!(
            validate_chunk_count(256, 128),
            Err(CodecError::ExceedsCodecLimit { chunks: 256, max: 128 })
        ));
    }

    #[test]
    fn test_codeword_chunk_count_rejects_odd_width() {
        assert!(matches!(
            codeword_chunk_count(6, 128),
            Err(CodecError::InvalidChunkCount(3))
        ));
        assert!(matches!(
            codeword_chunk_count(5, 128),
            Err(CodecError::InvalidChunkCount(5))
        ));
        assert_eq!(codeword_chunk_count(8, 128).unwrap(), 4);
    }

    #[test]
    fn test_uniform_chunk_size() {
        let chunks = [vec![1u8, 2], vec![3, 4]];
        let size = uniform_chunk_size(chunks.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(size, 2);

        let uneven = [vec![1u8, 2], vec![3]];
        assert!(uniform_chunk_size(uneven.iter().map(Vec::as_slice)).is_err());

        let empty = [vec![], vec![1u8, 2]];
        assert!(uniform_chunk_size(empty.iter().map(Vec::as_slice)).is_err());
    }
}
