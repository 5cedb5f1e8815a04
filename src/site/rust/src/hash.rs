/* src/site/rust/src/hash.rs */

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// FNV-1a 32-bit.
pub(crate) fn fnv1a_32(input: &str) -> u32 {
  input.bytes().fold(FNV_OFFSET, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Page id -> 8 hex chars, used to name prefetched data files.
pub fn page_hash(page_id: &str) -> String {
  format!("{:08x}", fnv1a_32(page_id))
}
