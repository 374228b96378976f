//! Time savings estimate for removing wasted bytes.
//!
//! The transfer-time model is supplied by the caller; this module only
//! totals the waste and asks the model what it would cost.

use super::duplication::UrlWaste;
use crate::utils::config::NetworkSettings;
use log::debug;

/// Converts a byte count into transfer time
pub trait TransferTimeModel {
    fn transfer_time_ms(&self, bytes: u64) -> f64;
}

impl<F> TransferTimeModel for F
where
    F: Fn(u64) -> f64,
{
    fn transfer_time_ms(&self, bytes: u64) -> f64 {
        self(bytes)
    }
}

/// Fixed-throughput model: bytes take `bits / throughput` to arrive
///
/// Wasted bytes ride on connections that are already open, so no
/// round trips are charged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputModel {
    pub throughput_kbps: f64,
}

impl ThroughputModel {
    pub fn new(throughput_kbps: f64) -> Self {
        Self { throughput_kbps }
    }
}

impl From<&NetworkSettings> for ThroughputModel {
    fn from(settings: &NetworkSettings) -> Self {
        Self::new(settings.throughput_kbps)
    }
}

impl TransferTimeModel for ThroughputModel {
    fn transfer_time_ms(&self, bytes: u64) -> f64 {
        if self.throughput_kbps <= 0.0 {
            return 0.0;
        }
        let kilobits = bytes as f64 * 8.0 / 1024.0;
        kilobits / self.throughput_kbps * 1000.0
    }
}

/// Estimated milliseconds saved by dropping all wasted bytes
///
/// **Public** - main entry point for savings estimation
///
/// Returns 0 without consulting the model when there is no waste.
pub fn estimate_savings_ms(wasted_bytes_by_url: &[UrlWaste], model: &dyn TransferTimeModel) -> f64 {
    let total: u64 = wasted_bytes_by_url.iter().map(|entry| entry.wasted_bytes).sum();
    if total == 0 {
        return 0.0;
    }

    let savings = model.transfer_time_ms(total);
    debug!("{} wasted bytes cost an estimated {:.1} ms", total, savings);
    savings
}
