//! Leopard-style Reed-Solomon codec over GF(2^16).

use crate::{
    codeword_chunk_count, uniform_chunk_size, validate_chunk_count, Codec, CodecError, Result,
};

/// Total shard count is bounded by the GF(2^16) field order, split evenly
/// between data and parity.
const MAX_CHUNKS: usize = 32768;

/// Systematic Reed-Solomon over GF(2^16), backed by `reed-solomon-simd`.
///
/// Supports much larger squares than [`RsGf8Codec`](crate::RsGf8Codec)
/// but requires even chunk lengths (a backend constraint).
#[derive(Debug, Clone, Copy, Default)]
pub struct LeoRsCodec;

impl LeoRsCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for LeoRsCodec {
    fn encode(&self, chunks: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
        let k = validate_chunk_count(chunks.len(), self.max_chunks())?;
        let size = uniform_chunk_size(chunks.iter().map(Vec::as_slice))?;
        if size % 2 != 0 {
            return Err(CodecError::InvalidChunkSize);
        }
        log::debug!("leopard encode: chunks({}), chunk_bytes({})", k, size);
        Ok(reed_solomon_simd::encode(k, k, chunks)?)
    }

    fn decode(&self, codeword: &mut [Option<Vec<u8>>]) -> Result<()> {
        let k = codeword_chunk_count(codeword.len(), self.max_chunks())?;
        let present = codeword.iter().flatten().count();
        if present < k {
            return Err(CodecError::InsufficientShares { have: present, need: k });
        }
        let size = uniform_chunk_size(codeword.iter().flatten().map(Vec::as_slice))?;
        if size % 2 != 0 {
            return Err(CodecError::InvalidChunkSize);
        }

        // The backend restores missing data chunks only.
        if codeword[..k].iter().any(Option::is_none) {
            let originals: Vec<(usize, &[u8])> = codeword[..k]
                .iter()
                .enumerate()
                .filter_map(|(i, cell)| cell.as_deref().map(|chunk| (i, chunk)))
                .collect();
            let recovery: Vec<(usize, &[u8])> = codeword[k..]
                .iter()
                .enumerate()
                .filter_map(|(i, cell)| cell.as_deref().map(|chunk| (i, chunk)))
                .collect();
            let restored = reed_solomon_simd::decode(k, k, originals, recovery)?;
            for (index, chunk) in restored {
                codeword[index] = Some(chunk);
            }
        }

        // Refill missing parity by re-encoding the now-complete data half.
        if codeword[k..].iter().any(Option::is_none) {
            let (data, parity) = codeword.split_at_mut(k);
            let chunks: Vec<&[u8]> = data.iter().filter_map(|cell| cell.as_deref()).collect();
            let recovered = reed_solomon_simd::encode(k, k, &chunks)?;
            for (cell, chunk) in parity.iter_mut().zip(recovered) {
                if cell.is_none() {
                    *cell = Some(chunk);
                }
            }
        }

        Ok(())
    }

    fn max_chunks(&self) -> usize {
        MAX_CHUNKS
    }

    fn name(&self) -> &'static str {
        "leopard-ff16"
    }
}
