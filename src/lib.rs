//! BCH + LDPC forward-error-correction encoding for the DVB-S2, DVB-S2X
//! and DVB-T2 transmitter chain.
//!
//! Payload bits ("BBFRAME" bits) get BCH parity appended to form a BCH
//! codeword; LDPC parity is then computed over that codeword to form a
//! complete FECFRAME ready for bit interleaving and constellation
//! mapping. Shortening, puncturing and the 128-APSK pad of the VL-SNR
//! and S2X operating points are handled transparently.
//!
//! Bits are carried one per byte (values 0/1), earliest bit first, on
//! both sides of the API.
//!
//! # Simple usage
//!
//! ```rust
//! use dvb_fec_simd::{encode, CodeRate, Constellation, FrameSize, Standard};
//!
//! # fn main() -> Result<(), dvb_fec_simd::Error> {
//! let payload = vec![0u8; 32208]; // kbch bits for rate 1/2 normal frames
//! let frame = encode(
//!     Standard::DvbS2,
//!     FrameSize::Normal,
//!     CodeRate::C1_2,
//!     Constellation::Qpsk,
//!     &payload,
//! )?;
//! assert_eq!(frame.len(), 64800);
//! # Ok(())
//! # }
//! ```
//!
//! # Basic usage
//!
//! Reuse one [`FecFrameEncoder`] per stream; its lookup tables and
//! scratch buffers are built once at construction:
//!
//! ```rust
//! use dvb_fec_simd::{CodeRate, Constellation, FecFrameEncoder, FrameSize, Standard};
//!
//! # fn main() -> Result<(), dvb_fec_simd::Error> {
//! let mut encoder = FecFrameEncoder::new(
//!     Standard::DvbS2,
//!     FrameSize::Short,
//!     CodeRate::C3_5,
//!     Constellation::Psk8,
//! )?;
//!
//! let payload = vec![1u8; encoder.payload_bits()];
//! let mut frame = vec![0u8; encoder.frame_bits()];
//! encoder.encode_frame(&payload, &mut frame)?;
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::bch::BchEncoder;
use crate::engine::{DefaultEngine, Engine};
use crate::ldpc::LdpcEncoder;

mod bch;
mod ldpc;
mod params;
mod stream;

pub mod engine;

pub use params::{
    CodeRate, Constellation, FecParams, FrameSize, Standard, FRAME_SIZE_MEDIUM, FRAME_SIZE_NORMAL,
    FRAME_SIZE_SHORT, GROUP_SIZE,
};
pub use stream::{BitStreamEncoder, WorkStatus};

// ======================================================================
// Error - PUBLIC

/// Errors of this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The (standard, framesize, rate) combination names no code.
    #[error("unsupported code rate {rate:?} for {framesize:?} frames in {standard:?}")]
    UnsupportedCodeRate {
        standard: Standard,
        framesize: FrameSize,
        rate: CodeRate,
    },

    /// The payload block does not hold exactly `kbch` bits.
    #[error("payload must hold exactly {expected} bits, got {got}")]
    InvalidPayloadLength { expected: usize, got: usize },

    /// The frame buffer does not hold exactly `frame_size` bits.
    #[error("frame buffer must hold exactly {expected} bits, got {got}")]
    InvalidFrameLength { expected: usize, got: usize },

    /// A streaming output span is not a whole number of frames.
    #[error("{got} output items is not a multiple of the {frame_size}-bit frame")]
    NotFrameAligned { frame_size: usize, got: usize },

    /// A streaming input span is shorter than the forecast requirement.
    #[error("need {required} input bits, only {available} available")]
    InsufficientInput { required: usize, available: usize },

    /// Construction-time scratch allocation failed.
    #[error("scratch buffer allocation failed")]
    Allocation(#[from] std::collections::TryReserveError),
}

// ======================================================================
// FecFrameEncoder - PUBLIC

/// Concatenated BCH + LDPC encoder for one fixed configuration.
///
/// The generator polynomial, the expanded parity-check table and the
/// scratch buffers are built once in [`FecFrameEncoder::new`] and reused
/// for every frame. Encoding takes `&mut self` (the scratch is shared
/// across calls); use one encoder per stream and encode frames in stream
/// order. Independent encoders are freely usable from different threads.
pub struct FecFrameEncoder {
    params: FecParams,
    bch: BchEncoder,
    ldpc: LdpcEncoder,
}

impl FecFrameEncoder {
    /// Creates an encoder with the runtime-selected default engine.
    pub fn new(
        standard: Standard,
        framesize: FrameSize,
        rate: CodeRate,
        constellation: Constellation,
    ) -> Result<Self, Error> {
        Self::with_engine(
            standard,
            framesize,
            rate,
            constellation,
            Box::new(DefaultEngine::new()),
        )
    }

    /// Creates an encoder running the BCH pass on a specific [`Engine`].
    pub fn with_engine(
        standard: Standard,
        framesize: FrameSize,
        rate: CodeRate,
        constellation: Constellation,
        engine: Box<dyn Engine>,
    ) -> Result<Self, Error> {
        let params = FecParams::lookup(standard, framesize, rate, constellation)?;
        let bch = BchEncoder::new(params.bch_code, params.kbch, engine);
        let ldpc = LdpcEncoder::new(&params)?;

        debug!(
            kbch = params.kbch,
            nbch = params.nbch,
            frame_size = params.frame_size,
            q_val = params.q_val,
            "built FEC frame encoder"
        );

        Ok(Self { params, bch, ldpc })
    }

    /// Resolved configuration parameters.
    pub fn params(&self) -> &FecParams {
        &self.params
    }

    /// Payload bits consumed per frame (`kbch`).
    pub fn payload_bits(&self) -> usize {
        self.params.kbch
    }

    /// BCH codeword bits per frame (`nbch`).
    pub fn codeword_bits(&self) -> usize {
        self.params.nbch
    }

    /// Emitted bits per frame, including any 128-APSK pad.
    pub fn frame_bits(&self) -> usize {
        self.params.frame_size
    }

    /// Encodes one payload block into one FECFRAME.
    ///
    /// `payload` must hold exactly [`payload_bits`](Self::payload_bits)
    /// bytes and `frame` exactly [`frame_bits`](Self::frame_bits) bytes,
    /// one bit value (0/1) per byte. The first `kbch` frame bytes equal
    /// the payload; the remainder is BCH parity, LDPC parity and pad.
    pub fn encode_frame(&mut self, payload: &[u8], frame: &mut [u8]) -> Result<(), Error> {
        if payload.len() != self.params.kbch {
            return Err(Error::InvalidPayloadLength {
                expected: self.params.kbch,
                got: payload.len(),
            });
        }
        if frame.len() != self.params.frame_size {
            return Err(Error::InvalidFrameLength {
                expected: self.params.frame_size,
                got: frame.len(),
            });
        }

        self.ldpc.encode_frame(&self.bch, payload, frame);
        Ok(())
    }
}

// ======================================================================
// FUNCTIONS - PUBLIC

/// Encodes one payload block, allocating the frame.
///
/// Builds a throwaway [`FecFrameEncoder`]; when encoding more than one
/// frame, construct the encoder once instead.
pub fn encode(
    standard: Standard,
    framesize: FrameSize,
    rate: CodeRate,
    constellation: Constellation,
    payload: &[u8],
) -> Result<Vec<u8>, Error> {
    let mut encoder = FecFrameEncoder::new(standard, framesize, rate, constellation)?;
    let mut frame = Vec::new();
    frame.try_reserve_exact(encoder.frame_bits())?;
    frame.resize(encoder.frame_bits(), 0);
    encoder.encode_frame(payload, &mut frame)?;
    Ok(frame)
}
