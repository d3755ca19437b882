//! Block-oriented streaming adapter.
//!
//! Bridges the frame encoder to a pull-scheduled streaming host: the
//! host asks via [`BitStreamEncoder::forecast`] how many input items a
//! desired output span requires, then hands matching spans to
//! [`BitStreamEncoder::general_work`]. Output spans are always whole
//! frames; violations of the contract fail fast instead of reading or
//! writing out of bounds.

use crate::{Error, FecFrameEncoder};

// ======================================================================
// WorkStatus - PUBLIC

/// Items moved by one [`BitStreamEncoder::general_work`] call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WorkStatus {
    /// Input items consumed.
    pub consumed: usize,
    /// Output items produced.
    pub produced: usize,
}

// ======================================================================
// BitStreamEncoder - PUBLIC

/// Streaming wrapper around [`FecFrameEncoder`].
///
/// Items are bytes carrying one bit each, the same convention as the
/// frame encoder. Calls must arrive in stream order; the adapter holds
/// no inter-call state beyond the encoder's scratch buffers.
pub struct BitStreamEncoder {
    inner: FecFrameEncoder,
}

impl BitStreamEncoder {
    /// Wraps a frame encoder.
    pub fn new(inner: FecFrameEncoder) -> Self {
        Self { inner }
    }

    /// The wrapped frame encoder.
    pub fn encoder(&self) -> &FecFrameEncoder {
        &self.inner
    }

    /// Input items required to produce `noutput_items` output items.
    ///
    /// `noutput_items` must be a whole number of frames.
    pub fn forecast(&self, noutput_items: usize) -> Result<usize, Error> {
        let frame_size = self.inner.frame_bits();
        if noutput_items % frame_size != 0 {
            return Err(Error::NotFrameAligned {
                frame_size,
                got: noutput_items,
            });
        }
        Ok(noutput_items / frame_size * self.inner.payload_bits())
    }

    /// Encodes as many frames as `output` holds.
    ///
    /// Consumes exactly `forecast(output.len())` input items and fills
    /// all of `output`; the returned [`WorkStatus`] reports both counts.
    pub fn general_work(&mut self, input: &[u8], output: &mut [u8]) -> Result<WorkStatus, Error> {
        let required = self.forecast(output.len())?;
        if input.len() < required {
            return Err(Error::InsufficientInput {
                required,
                available: input.len(),
            });
        }

        let kbch = self.inner.payload_bits();
        let frame_size = self.inner.frame_bits();
        for (payload, frame) in input[..required]
            .chunks_exact(kbch)
            .zip(output.chunks_exact_mut(frame_size))
        {
            self.inner.encode_frame(payload, frame)?;
        }

        Ok(WorkStatus {
            consumed: required,
            produced: output.len(),
        })
    }
}

// ======================================================================
// TESTS
