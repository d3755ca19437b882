#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::engine::{engine_nosimd, Engine, Generator, Register, REGISTER_WORDS};

// ======================================================================
// Avx2 - PUBLIC

/// Optimized [`Engine`] using AVX2 instructions.
///
/// [`Avx2`] follows the same algorithm as [`NoSimd`] but keeps the whole
/// 192-bit shift register in one 256-bit vector, so the shift and the
/// conditional generator XOR happen without per-word carry chains. The
/// narrower register codes fall back to the scalar pass; outputs are
/// bit-identical either way.
///
/// Constructing [`Avx2`] on a CPU without AVX2 support and calling
/// [`Engine::remainder`] is undefined behavior; use
/// [`DefaultEngine`](crate::engine::DefaultEngine) for runtime detection.
///
/// [`NoSimd`]: crate::engine::NoSimd
#[derive(Clone, Copy, Debug, Default)]
pub struct Avx2;

impl Avx2 {
    /// Creates new [`Avx2`].
    pub fn new() -> Self {
        Self
    }
}

impl Engine for Avx2 {
    fn remainder(&self, generator: &Generator, payload: &[u8]) -> Register {
        if generator.parity_bits() == 192 {
            unsafe { self.remainder_avx2(generator, payload) }
        } else {
            engine_nosimd::remainder_scalar(generator, payload)
        }
    }
}

// ======================================================================
// Avx2 - PRIVATE

impl Avx2 {
    #[target_feature(enable = "avx2")]
    unsafe fn remainder_avx2(&self, generator: &Generator, payload: &[u8]) -> Register {
        let mut poly_lanes = [0u32; 8];
        poly_lanes[..REGISTER_WORDS].copy_from_slice(generator.poly_words());

        unsafe {
            let poly = _mm256_loadu_si256(poly_lanes.as_ptr() as *const __m256i);
            // Lane j-1 carries into lane j; lane 0 takes no carry.
            let carry_select = _mm256_setr_epi32(0, 0, 1, 2, 3, 4, 5, 6);
            let carry_mask = _mm256_setr_epi32(0, -1, -1, -1, -1, -1, -1, -1);

            let mut register = _mm256_setzero_si256();

            for &bit in payload {
                let top = (_mm256_extract_epi32::<5>(register) as u32) >> 31;
                let feedback = (bit as u32 ^ top) & 1;

                let prev = _mm256_and_si256(
                    _mm256_permutevar8x32_epi32(register, carry_select),
                    carry_mask,
                );
                register = _mm256_or_si256(
                    _mm256_slli_epi32::<1>(register),
                    _mm256_srli_epi32::<31>(prev),
                );

                let apply = _mm256_set1_epi32(-(feedback as i32));
                register = _mm256_xor_si256(register, _mm256_and_si256(poly, apply));
            }

            let mut lanes = [0u32; 8];
            _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, register);
            Register::from_words(lanes[..REGISTER_WORDS].try_into().unwrap())
        }
    }
}

// ======================================================================
// TESTS

// Engines are tested for conformance against each other in `bch` and via
// the frame-level property tests.
