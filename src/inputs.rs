//! Input arrays uploaded to the two read-only storage buffers.

use crate::error::{Error, Result};

/// Number of elements in every buffer of the pipeline.
pub const TOTAL_ELEMENTS: usize = 3;

/// Value cycle for input `a`.
pub const VALUES_A: [f32; 3] = [1.0, 2.0, 3.0];
/// Value cycle for input `b`.
pub const VALUES_B: [f32; 3] = [2.0, 3.0, 4.0];

/// Fill a fixed-size array by repeating `cycle` until it is full.
///
/// Element `i` is `cycle[i % cycle.len()]`.
pub fn fill_cycled(cycle: &[f32]) -> Result<[f32; TOTAL_ELEMENTS]> {
    if cycle.is_empty() {
        return Err(Error::EmptyCycle);
    }
    Ok(std::array::from_fn(|i| cycle[i % cycle.len()]))
}

/// The pair of arrays added by the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inputs {
    pub a: [f32; TOTAL_ELEMENTS],
    pub b: [f32; TOTAL_ELEMENTS],
}

impl Inputs {
    pub fn from_cycles(cycle_a: &[f32], cycle_b: &[f32]) -> Result<Self> {
        Ok(Self {
            a: fill_cycled(cycle_a)?,
            b: fill_cycled(cycle_b)?,
        })
    }

    /// Host-side sum, the value the GPU is expected to produce.
    pub fn expected_sum(&self) -> [f32; TOTAL_ELEMENTS] {
        std::array::from_fn(|i| self.a[i] + self.b[i])
    }
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            a: VALUES_A,
            b: VALUES_B,
        }
    }
}
