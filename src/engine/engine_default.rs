use crate::engine::{Engine, Generator, NoSimd, Register};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::engine::Avx2;

// ======================================================================
// DefaultEngine - PUBLIC

/// [`Engine`] that at runtime selects the best engine.
pub struct DefaultEngine(Box<dyn Engine>);

impl DefaultEngine {
    /// Creates new [`DefaultEngine`] by choosing and initializing the
    /// underlying engine.
    ///
    /// On x86(-64) the engine is chosen in the following order of
    /// preference:
    /// 1. [`Avx2`]
    /// 2. [`NoSimd`]
    ///
    /// On all other architectures [`NoSimd`] is used.
    pub fn new() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            cpufeatures::new!(has_avx2, "avx2");
            if has_avx2::get() {
                return Self(Box::new(Avx2::new()));
            }
        }

        Self(Box::new(NoSimd::new()))
    }
}

// ======================================================================
// DefaultEngine - IMPL Default

impl Default for DefaultEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ======================================================================
// DefaultEngine - IMPL Engine

impl Engine for DefaultEngine {
    fn remainder(&self, generator: &Generator, payload: &[u8]) -> Register {
        self.0.remainder(generator, payload)
    }
}
