//! FEC frame configuration: standards, frame sizes, code rates, and the
//! derived per-configuration parameters.
//!
//! The configuration is fixed at encoder construction. Unsupported
//! (standard, framesize, rate) combinations are rejected there; an
//! invalid selection never produces a zero-length or corrupted code.

use crate::engine::BchCode;
use crate::Error;

// ======================================================================
// CONST - PUBLIC

/// Nominal LDPC frame length of normal FECFRAMEs.
pub const FRAME_SIZE_NORMAL: usize = 64800;
/// Nominal LDPC frame length of short FECFRAMEs.
pub const FRAME_SIZE_SHORT: usize = 16200;
/// Nominal LDPC frame length of medium (VL-SNR) FECFRAMEs.
pub const FRAME_SIZE_MEDIUM: usize = 32400;

/// Column-group width of the LDPC base tables.
pub const GROUP_SIZE: usize = 360;

// ======================================================================
// ENUMS - PUBLIC

/// Broadcast standard the encoder follows.
///
/// DVB-T2 shares most codes with DVB-S2 but mandates its own base table
/// for a few shared rate labels; DVB-S2X extends DVB-S2 with additional
/// rates and the VL-SNR operating points.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Standard {
    DvbS2,
    DvbS2x,
    DvbT2,
}

/// FECFRAME length class.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FrameSize {
    /// 64800-bit frames.
    Normal,
    /// 16200-bit frames.
    Short,
    /// 32400-bit frames (DVB-S2X VL-SNR only).
    Medium,
}

/// Constellation the frame is destined for.
///
/// Only 128-APSK affects encoding: those frames carry 6 zero pad bits so
/// the frame length divides into 7-bit symbols.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Constellation {
    Qpsk,
    Psk8,
    Apsk16,
    Apsk32,
    Apsk64,
    Apsk128,
    Apsk256,
}

/// Named code rates across DVB-S2, DVB-S2X and DVB-T2.
///
/// Which rates are valid depends on the frame size and standard; see
/// [`FecParams::lookup`].
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CodeRate {
    C1_4,
    C1_3,
    C2_5,
    C1_2,
    C3_5,
    C2_3,
    C3_4,
    C4_5,
    C5_6,
    C8_9,
    C9_10,
    // DVB-S2X normal-frame additions.
    C2_9,
    C13_45,
    C9_20,
    C26_45,
    C13_18,
    C135_180,
    C140_180,
    C154_180,
    // DVB-S2X short-frame additions.
    C11_45,
    C4_15,
    C14_45,
    C32_45,
    // VL-SNR operating points (shortened and/or punctured).
    C1_5_VLSNR_SF2,
    C11_45_VLSNR_SF2,
    C1_5_MEDIUM,
    C11_45_MEDIUM,
    C1_3_MEDIUM,
}

// ======================================================================
// FecParams - PUBLIC

/// Derived encoding parameters of one configuration.
#[derive(Clone, Debug)]
pub struct FecParams {
    pub standard: Standard,
    pub framesize: FrameSize,
    pub rate: CodeRate,
    pub constellation: Constellation,
    /// Payload bits per BCH block.
    pub kbch: usize,
    /// BCH codeword bits (`kbch` + BCH parity).
    pub nbch: usize,
    /// BCH code variant.
    pub bch_code: BchCode,
    /// Base-table row-to-parity-offset multiplier.
    pub q_val: usize,
    /// Shortening pad length (VL-SNR).
    pub xs: usize,
    /// Puncturing period (VL-SNR).
    pub p: usize,
    /// Punctured parity bit count (VL-SNR).
    pub xp: usize,
    /// Emitted frame length before the 128-APSK pad.
    pub frame_size_real: usize,
    /// Emitted frame length including the 128-APSK pad.
    pub frame_size: usize,
}

impl FecParams {
    /// Resolves a configuration to its encoding parameters.
    ///
    /// Returns [`Error::UnsupportedCodeRate`] for any (standard,
    /// framesize, rate) combination outside the standards.
    pub fn lookup(
        standard: Standard,
        framesize: FrameSize,
        rate: CodeRate,
        constellation: Constellation,
    ) -> Result<Self, Error> {
        let unsupported = || Error::UnsupportedCodeRate {
            standard,
            framesize,
            rate,
        };

        if !rate_is_valid(standard, framesize, rate) {
            return Err(unsupported());
        }

        let (kbch, nbch, bch_code, q_val, xs, p, xp) =
            rate_entry(framesize, rate).ok_or_else(unsupported)?;

        let nominal = match framesize {
            FrameSize::Normal => FRAME_SIZE_NORMAL,
            FrameSize::Short => FRAME_SIZE_SHORT,
            FrameSize::Medium => FRAME_SIZE_MEDIUM,
        };
        let frame_size_real = nominal - xs - xp;
        let frame_size = if constellation == Constellation::Apsk128 {
            frame_size_real + 6
        } else {
            frame_size_real
        };

        Ok(Self {
            standard,
            framesize,
            rate,
            constellation,
            kbch,
            nbch,
            bch_code,
            q_val,
            xs,
            p,
            xp,
            frame_size_real,
            frame_size,
        })
    }

    /// Nominal LDPC frame length of the frame class.
    pub fn nominal_frame_bits(&self) -> usize {
        match self.framesize {
            FrameSize::Normal => FRAME_SIZE_NORMAL,
            FrameSize::Short => FRAME_SIZE_SHORT,
            FrameSize::Medium => FRAME_SIZE_MEDIUM,
        }
    }

    /// LDPC systematic length: the BCH codeword plus the shortening pad.
    pub fn kldpc(&self) -> usize {
        self.nbch + self.xs
    }

    /// Parity bits computed per frame, before puncturing removal.
    pub fn parity_bits(&self) -> usize {
        (self.frame_size_real + self.xp) - self.nbch
    }
}

// ======================================================================
// FUNCTIONS - PRIVATE - rate tables

/// Rates each standard admits per frame class.
fn rate_is_valid(standard: Standard, framesize: FrameSize, rate: CodeRate) -> bool {
    use CodeRate::*;

    match (standard, framesize) {
        (Standard::DvbS2, FrameSize::Normal) => matches!(
            rate,
            C1_4 | C1_3 | C2_5 | C1_2 | C3_5 | C2_3 | C3_4 | C4_5 | C5_6 | C8_9 | C9_10
        ),
        (Standard::DvbS2, FrameSize::Short) => matches!(
            rate,
            C1_4 | C1_3 | C2_5 | C1_2 | C3_5 | C2_3 | C3_4 | C4_5 | C5_6 | C8_9
        ),
        (Standard::DvbS2, FrameSize::Medium) => false,
        (Standard::DvbT2, FrameSize::Normal) => {
            matches!(rate, C1_2 | C3_5 | C2_3 | C3_4 | C4_5 | C5_6)
        }
        (Standard::DvbT2, FrameSize::Short) => matches!(
            rate,
            C1_4 | C1_3 | C2_5 | C1_2 | C3_5 | C2_3 | C3_4 | C4_5 | C5_6
        ),
        (Standard::DvbT2, FrameSize::Medium) => false,
        (Standard::DvbS2x, FrameSize::Normal) => matches!(
            rate,
            C1_4 | C1_3
                | C2_5
                | C1_2
                | C3_5
                | C2_3
                | C3_4
                | C4_5
                | C5_6
                | C8_9
                | C9_10
                | C2_9
                | C13_45
                | C9_20
                | C26_45
                | C13_18
                | C135_180
                | C140_180
                | C154_180
        ),
        (Standard::DvbS2x, FrameSize::Short) => matches!(
            rate,
            C1_4 | C1_3
                | C2_5
                | C1_2
                | C3_5
                | C2_3
                | C3_4
                | C4_5
                | C5_6
                | C8_9
                | C11_45
                | C4_15
                | C14_45
                | C26_45
                | C32_45
                | C1_5_VLSNR_SF2
                | C11_45_VLSNR_SF2
        ),
        (Standard::DvbS2x, FrameSize::Medium) => {
            matches!(rate, C1_5_MEDIUM | C11_45_MEDIUM | C1_3_MEDIUM)
        }
    }
}

type RateEntry = (usize, usize, BchCode, usize, usize, usize, usize);

/// `(kbch, nbch, bch_code, q_val, Xs, P, Xp)` per frame class and rate.
fn rate_entry(framesize: FrameSize, rate: CodeRate) -> Option<RateEntry> {
    use BchCode::*;
    use CodeRate::*;

    let entry = match framesize {
        FrameSize::Normal => match rate {
            C1_4 => (16008, 16200, N12, 135, 0, 0, 0),
            C1_3 => (21408, 21600, N12, 120, 0, 0, 0),
            C2_5 => (25728, 25920, N12, 108, 0, 0, 0),
            C1_2 => (32208, 32400, N12, 90, 0, 0, 0),
            C3_5 => (38688, 38880, N12, 72, 0, 0, 0),
            C2_3 => (43040, 43200, N10, 60, 0, 0, 0),
            C3_4 => (48408, 48600, N12, 45, 0, 0, 0),
            C4_5 => (51648, 51840, N12, 36, 0, 0, 0),
            C5_6 => (53840, 54000, N10, 30, 0, 0, 0),
            C8_9 => (57472, 57600, N8, 20, 0, 0, 0),
            C9_10 => (58192, 58320, N8, 18, 0, 0, 0),
            C2_9 => (14208, 14400, N12, 140, 0, 0, 0),
            C13_45 => (18528, 18720, N12, 128, 0, 0, 0),
            C9_20 => (28968, 29160, N12, 99, 0, 0, 0),
            C26_45 => (37248, 37440, N12, 76, 0, 0, 0),
            C13_18 => (46608, 46800, N12, 50, 0, 0, 0),
            C135_180 => (48408, 48600, N12, 45, 0, 0, 0),
            C140_180 => (50208, 50400, N12, 40, 0, 0, 0),
            C154_180 => (55248, 55440, N12, 26, 0, 0, 0),
            _ => return None,
        },
        FrameSize::Short => match rate {
            C1_4 => (3072, 3240, S12, 36, 0, 0, 0),
            C1_3 => (5232, 5400, S12, 30, 0, 0, 0),
            C2_5 => (6312, 6480, S12, 27, 0, 0, 0),
            C1_2 => (7032, 7200, S12, 25, 0, 0, 0),
            C3_5 => (9552, 9720, S12, 18, 0, 0, 0),
            C2_3 => (10632, 10800, S12, 15, 0, 0, 0),
            C3_4 => (11712, 11880, S12, 12, 0, 0, 0),
            C4_5 => (12432, 12600, S12, 10, 0, 0, 0),
            C5_6 => (13152, 13320, S12, 8, 0, 0, 0),
            C8_9 => (14232, 14400, S12, 5, 0, 0, 0),
            C11_45 => (3792, 3960, S12, 34, 0, 0, 0),
            C4_15 => (4152, 4320, S12, 33, 0, 0, 0),
            C14_45 => (4872, 5040, S12, 31, 0, 0, 0),
            C26_45 => (9192, 9360, S12, 19, 0, 0, 0),
            C32_45 => (11352, 11520, S12, 13, 0, 0, 0),
            C1_5_VLSNR_SF2 => (2512, 2680, S12, 36, 560, 30, 250),
            C11_45_VLSNR_SF2 => (3792, 3960, S12, 34, 0, 15, 810),
            _ => return None,
        },
        FrameSize::Medium => match rate {
            C1_5_MEDIUM => (5660, 5840, M12, 72, 640, 25, 980),
            C11_45_MEDIUM => (7740, 7920, M12, 68, 0, 15, 1620),
            C1_3_MEDIUM => (10620, 10800, M12, 60, 0, 13, 1620),
            _ => return None,
        },
    };
    Some(entry)
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;

    fn all_rates() -> Vec<CodeRate> {
        use CodeRate::*;
        vec![
            C1_4,
            C1_3,
            C2_5,
            C1_2,
            C3_5,
            C2_3,
            C3_4,
            C4_5,
            C5_6,
            C8_9,
            C9_10,
            C2_9,
            C13_45,
            C9_20,
            C26_45,
            C13_18,
            C135_180,
            C140_180,
            C154_180,
            C11_45,
            C4_15,
            C14_45,
            C32_45,
            C1_5_VLSNR_SF2,
            C11_45_VLSNR_SF2,
            C1_5_MEDIUM,
            C11_45_MEDIUM,
            C1_3_MEDIUM,
        ]
    }

    #[test]
    fn supported_configurations_satisfy_length_invariants() {
        for standard in [Standard::DvbS2, Standard::DvbS2x, Standard::DvbT2] {
            for framesize in [FrameSize::Normal, FrameSize::Short, FrameSize::Medium] {
                for rate in all_rates() {
                    let Ok(params) =
                        FecParams::lookup(standard, framesize, rate, Constellation::Qpsk)
                    else {
                        continue;
                    };
                    assert!(params.kbch < params.nbch);
                    assert!(params.nbch <= params.frame_size_real);
                    assert!(params.frame_size_real <= params.frame_size);
                    assert_eq!(params.nbch - params.kbch, params.bch_code.parity_bits());
                    assert_eq!(params.kldpc() % GROUP_SIZE, 0);
                    assert_eq!(
                        params.q_val,
                        (params.nominal_frame_bits() - params.kldpc()) / GROUP_SIZE
                    );
                    assert_eq!(
                        params.parity_bits(),
                        params.nominal_frame_bits() - params.kldpc()
                    );
                }
            }
        }
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        for (standard, framesize, rate) in [
            (Standard::DvbS2, FrameSize::Short, CodeRate::C9_10),
            (Standard::DvbS2, FrameSize::Medium, CodeRate::C1_5_MEDIUM),
            (Standard::DvbT2, FrameSize::Normal, CodeRate::C1_4),
            (Standard::DvbT2, FrameSize::Normal, CodeRate::C9_10),
            (Standard::DvbS2, FrameSize::Normal, CodeRate::C13_45),
            (Standard::DvbS2x, FrameSize::Normal, CodeRate::C1_5_MEDIUM),
        ] {
            assert!(matches!(
                FecParams::lookup(standard, framesize, rate, Constellation::Qpsk),
                Err(Error::UnsupportedCodeRate { .. })
            ));
        }
    }

    #[test]
    fn vlsnr_frame_lengths_account_for_shortening_and_puncturing() {
        let params = FecParams::lookup(
            Standard::DvbS2x,
            FrameSize::Short,
            CodeRate::C1_5_VLSNR_SF2,
            Constellation::Qpsk,
        )
        .unwrap();
        assert_eq!(params.xs, 560);
        assert_eq!(params.xp, 250);
        assert_eq!(params.frame_size, 16200 - 560 - 250);

        let medium = FecParams::lookup(
            Standard::DvbS2x,
            FrameSize::Medium,
            CodeRate::C1_3_MEDIUM,
            Constellation::Qpsk,
        )
        .unwrap();
        assert_eq!(medium.frame_size, 32400 - 1620);
    }

    #[test]
    fn apsk128_frames_carry_the_symbol_pad() {
        let params = FecParams::lookup(
            Standard::DvbS2x,
            FrameSize::Normal,
            CodeRate::C135_180,
            Constellation::Apsk128,
        )
        .unwrap();
        assert_eq!(params.frame_size, FRAME_SIZE_NORMAL + 6);
        assert_eq!(params.frame_size % 7, 0);
    }
}
