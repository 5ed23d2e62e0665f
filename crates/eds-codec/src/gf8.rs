//! Classic Reed-Solomon codec over GF(2^8).

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::{
    codeword_chunk_count, uniform_chunk_size, validate_chunk_count, Codec, CodecError, Result,
};

/// Data plus parity must fit in the GF(2^8) field order of 256.
const MAX_CHUNKS: usize = 128;

/// Reed-Solomon over GF(2^8), backed by `reed-solomon-erasure`.
///
/// A smaller chunk-count ceiling than [`LeoRsCodec`](crate::LeoRsCodec),
/// but no constraint on chunk length and a decoder that refills both
/// codeword halves in one reconstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsGf8Codec;

impl RsGf8Codec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for RsGf8Codec {
    fn encode(&self, chunks: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
        let k = validate_chunk_count(chunks.len(), self.max_chunks())?;
        let size = uniform_chunk_size(chunks.iter().map(Vec::as_slice))?;
        log::debug!("gf8 encode: chunks({}), chunk_bytes({})", k, size);

        let rs = ReedSolomon::new(k, k)?;
        let mut shards: Vec<Vec<u8>> = chunks.to_vec();
        shards.resize(2 * k, vec![0u8; size]);
        rs.encode(&mut shards)?;
        Ok(shards.split_off(k))
    }

    fn decode(&self, codeword: &mut [Option<Vec<u8>>]) -> Result<()> {
        let k = codeword_chunk_count(codeword.len(), self.max_chunks())?;
        let present = codeword.iter().flatten().count();
        if present < k {
            return Err(CodecError::InsufficientShares { have: present, need: k });
        }
        uniform_chunk_size(codeword.iter().flatten().map(Vec::as_slice))?;

        let rs = ReedSolomon::new(k, k)?;
        rs.reconstruct(codeword)?;
        Ok(())
    }

    fn max_chunks(&self) -> usize {
        MAX_CHUNKS
    }

    fn name(&self) -> &'static str {
        "rs-gf8"
    }
}
