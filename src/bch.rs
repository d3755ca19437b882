//! Systematic BCH outer encoder.
//!
//! Each `kbch`-bit payload block is copied through unchanged and the
//! generator-polynomial remainder is appended as parity, producing an
//! `nbch`-bit codeword. The remainder pass itself runs on an
//! [`Engine`](crate::engine::Engine) backend.

use crate::engine::{get_generators, BchCode, Engine, Generator};

// ======================================================================
// BchEncoder - PUBLIC

/// BCH block encoder for one fixed code variant.
pub struct BchEncoder {
    kbch: usize,
    generator: &'static Generator,
    engine: Box<dyn Engine>,
}

impl BchEncoder {
    pub(crate) fn new(code: BchCode, kbch: usize, engine: Box<dyn Engine>) -> Self {
        Self {
            kbch,
            generator: get_generators().get(code),
            engine,
        }
    }

    /// Payload bits consumed per block.
    pub fn payload_bits(&self) -> usize {
        self.kbch
    }

    /// Codeword bits produced per block (`kbch` + parity).
    pub fn codeword_bits(&self) -> usize {
        self.kbch + self.generator.parity_bits()
    }

    /// Encodes one block, one bit value per byte on both sides.
    ///
    /// `payload` must hold exactly `kbch` bytes and `out` exactly `nbch`
    /// bytes; the first `kbch` output bytes equal the payload.
    pub(crate) fn encode_into(&self, payload: &[u8], out: &mut [u8]) {
        debug_assert_eq!(payload.len(), self.kbch);
        debug_assert_eq!(out.len(), self.codeword_bits());

        let (data, parity) = out.split_at_mut(self.kbch);
        data.copy_from_slice(payload);

        let register = self.engine.remainder(self.generator, payload);
        register.drain_into(self.generator, parity);
    }
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NoSimd;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_bits(count: usize, seed: u8) -> Vec<u8> {
        let mut rng = ChaCha8Rng::from_seed([seed; 32]);
        (0..count).map(|_| rng.gen_range(0..2u8)).collect()
    }

    fn encoder(code: BchCode, kbch: usize) -> BchEncoder {
        BchEncoder::new(code, kbch, Box::new(NoSimd::new()))
    }

    #[test]
    fn zero_payload_encodes_to_zero_codeword() {
        let enc = encoder(BchCode::N12, 32208);
        let payload = vec![0u8; 32208];
        let mut out = vec![1u8; 32400];
        enc.encode_into(&payload, &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn codeword_is_systematic_with_fixed_parity_length() {
        for (code, kbch) in [
            (BchCode::N8, 58192),
            (BchCode::N10, 43040),
            (BchCode::N12, 32208),
            (BchCode::S12, 7032),
            (BchCode::M12, 5660),
        ] {
            let enc = encoder(code, kbch);
            let payload = random_bits(kbch, 7);
            let mut out = vec![0u8; enc.codeword_bits()];
            enc.encode_into(&payload, &mut out);

            assert_eq!(&out[..kbch], payload.as_slice());
            assert_eq!(out.len() - kbch, code.parity_bits());
            assert!(out[kbch..].iter().all(|&b| b <= 1));
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = encoder(BchCode::S12, 3072);
        let payload = random_bits(3072, 21);
        let mut first = vec![0u8; enc.codeword_bits()];
        let mut second = vec![0u8; enc.codeword_bits()];
        enc.encode_into(&payload, &mut first);
        enc.encode_into(&payload, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn codeword_revalidates_against_generator() {
        // Feeding the full codeword (payload then parity) through the
        // LFSR must leave a zero register: the codeword is divisible by
        // the generator polynomial.
        let enc = encoder(BchCode::N12, 16008);
        let payload = random_bits(16008, 3);
        let mut out = vec![0u8; enc.codeword_bits()];
        enc.encode_into(&payload, &mut out);

        let generator = get_generators().get(BchCode::N12);
        let mut register = crate::engine::Register::zero();
        for &bit in &out {
            register.feed(generator, bit);
        }
        assert_eq!(register, crate::engine::Register::zero());
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn avx2_and_scalar_registers_agree() {
        use crate::engine::Avx2;

        cpufeatures::new!(has_avx2, "avx2");
        if !has_avx2::get() {
            return;
        }

        let generators = get_generators();
        for (code, len, seed) in [
            (BchCode::N12, 16008, 11),
            (BchCode::N12, 32208, 12),
            (BchCode::S12, 3072, 13),
            (BchCode::M12, 5660, 14),
        ] {
            let generator = generators.get(code);
            let payload = random_bits(len, seed);
            let scalar = NoSimd::new().remainder(generator, &payload);
            let vector = Avx2::new().remainder(generator, &payload);
            assert_eq!(scalar, vector);
        }
    }
}
