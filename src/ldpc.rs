//! LDPC inner encoder and frame assembly.
//!
//! At construction the compact base table of the selected code is
//! expanded into an explicit list of (parity, data) connections; per
//! frame those connections are XOR-accumulated over the BCH codeword,
//! the parity is punctured and accumulated into its transmitted form,
//! and the finished FECFRAME is written out.

use fixedbitset::FixedBitSet;

use crate::bch::BchEncoder;
use crate::params::{FecParams, GROUP_SIZE};
use crate::Error;

mod tables;

// ======================================================================
// CheckEntry / CheckTable - CRATE

/// One parity-check connection: `parity[parity] ^= data[data]`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CheckEntry {
    parity: u32,
    data: u32,
}

/// Expanded parity-check connections of one code.
///
/// The `early` list holds at most one connection per column group whose
/// parity and data index both fall inside the systematic region; a
/// streaming encoder may fold those in while the payload bits are still
/// arriving. The split never changes the result (XOR accumulation is
/// order-independent): the combined lists are the correctness contract.
pub(crate) struct CheckTable {
    early: Vec<CheckEntry>,
    late: Vec<CheckEntry>,
}

impl CheckTable {
    /// Expands the base table of `params` into connection lists.
    ///
    /// The base table is walked row-major once per column-group index
    /// `n`, the data counter advancing after each row; parity addresses
    /// are `(offset + n * q) mod pbits`. The traversal order fixes which
    /// data bit feeds which parity equation and must not change.
    fn expand(params: &FecParams) -> Result<Self, Error> {
        let rows = tables::select(params.standard, params.framesize, params.rate).ok_or(
            Error::UnsupportedCodeRate {
                standard: params.standard,
                framesize: params.framesize,
                rate: params.rate,
            },
        )?;
        debug_assert_eq!(rows.len() * GROUP_SIZE, params.kldpc());

        let pbits = params.parity_bits();
        let q = params.q_val;
        let kbch = params.kbch;

        let connections: usize = rows.iter().map(|row| row.len()).sum::<usize>() * GROUP_SIZE;
        let mut early = Vec::new();
        let mut late = Vec::new();
        early.try_reserve(GROUP_SIZE)?;
        late.try_reserve(connections)?;

        let mut data: u32 = 0;
        for n in 0..GROUP_SIZE {
            let mut group_open = true;
            for row in rows {
                for &offset in *row {
                    let parity = (offset as usize + n * q) % pbits;
                    if group_open && parity < kbch && (data as usize) < kbch {
                        early.push(CheckEntry {
                            parity: parity as u32,
                            data,
                        });
                        group_open = false;
                    } else {
                        late.push(CheckEntry {
                            parity: parity as u32,
                            data,
                        });
                    }
                }
                data += 1;
            }
        }

        debug_assert_eq!(early.len() + late.len(), connections);
        Ok(Self { early, late })
    }
}

// ======================================================================
// LdpcEncoder - CRATE

/// Per-instance LDPC encoder with reused scratch buffers.
///
/// Not reentrant: `encode_frame` takes `&mut self` because the
/// shortening and puncturing scratch is shared across calls. Separate
/// instances are independent.
pub(crate) struct LdpcEncoder {
    nbch: usize,
    xs: usize,
    p: usize,
    frame_size_real: usize,
    table: CheckTable,
    /// `kldpc` bytes: `xs` zeros then the BCH codeword. Empty when the
    /// code is not shortened.
    shorten: Vec<u8>,
    /// `pbits` bytes of raw parity. Empty when the code is not punctured.
    puncture: Vec<u8>,
    /// Parity positions removed by puncturing.
    punctured: FixedBitSet,
}

impl LdpcEncoder {
    pub(crate) fn new(params: &FecParams) -> Result<Self, Error> {
        let table = CheckTable::expand(params)?;

        let mut shorten = Vec::new();
        if params.xs > 0 {
            shorten.try_reserve_exact(params.kldpc())?;
            shorten.resize(params.kldpc(), 0);
        }

        let mut puncture = Vec::new();
        let mut punctured = FixedBitSet::new();
        if params.p > 0 {
            let pbits = params.parity_bits();
            puncture.try_reserve_exact(pbits)?;
            puncture.resize(pbits, 0);

            punctured.grow(pbits);
            for removed in 0..params.xp {
                punctured.insert(removed * params.p);
            }
        }

        Ok(Self {
            nbch: params.nbch,
            xs: params.xs,
            p: params.p,
            frame_size_real: params.frame_size_real,
            table,
            shorten,
            puncture,
            punctured,
        })
    }

    /// Assembles one FECFRAME: BCH codeword, LDPC parity, pad.
    ///
    /// `payload` holds `kbch` bits, `frame` holds `frame_size` bytes;
    /// one bit value per byte throughout.
    pub(crate) fn encode_frame(&mut self, bch: &BchEncoder, payload: &[u8], frame: &mut [u8]) {
        debug_assert_eq!(payload.len(), bch.payload_bits());
        debug_assert!(frame.len() >= self.frame_size_real);

        // 128-APSK frames end in 6 zero pad bits.
        let (body, pad) = frame.split_at_mut(self.frame_size_real);
        pad.fill(0);

        let (data, out_parity) = body.split_at_mut(self.nbch);

        if self.xs > 0 {
            // Shortened code: the check table indexes the zero-padded
            // view, the frame carries only the real codeword bits.
            bch.encode_into(payload, &mut self.shorten[self.xs..]);
            data.copy_from_slice(&self.shorten[self.xs..]);
        } else {
            bch.encode_into(payload, data);
        }

        let view: &[u8] = if self.xs > 0 { &self.shorten } else { data };

        if self.p > 0 {
            self.puncture.fill(0);
            accumulate(&self.table, view, &mut self.puncture);

            let mut kept = 0;
            for (position, &bit) in self.puncture.iter().enumerate() {
                if !self.punctured.contains(position) {
                    out_parity[kept] = bit;
                    kept += 1;
                }
            }
            debug_assert_eq!(kept, out_parity.len());
        } else {
            out_parity.fill(0);
            accumulate(&self.table, view, out_parity);
        }

        // Staircase accumulation: each transmitted parity bit is the
        // running XOR of the raw parity sequence.
        for j in 1..out_parity.len() {
            out_parity[j] ^= out_parity[j - 1];
        }
    }
}

// ======================================================================
// FUNCTIONS - PRIVATE

/// XOR-accumulates every connection, early entries first, in the order
/// a pipelined encoder would produce. The result does not depend on it.
fn accumulate(table: &CheckTable, data: &[u8], parity: &mut [u8]) {
    for entry in table.early.iter().chain(table.late.iter()) {
        parity[entry.parity as usize] ^= data[entry.data as usize];
    }
}

// ======================================================================
// TESTS
