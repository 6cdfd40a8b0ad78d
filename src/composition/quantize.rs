// Copyright (c) 2024 Mike Tsao

use crate::error::{ImprovError, Result};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Snaps raw durations to a small set of canonical buckets.
///
/// Anything at or below `minimum_ms` becomes `minimum_ms`, anything at or
/// above `maximum_ms` becomes `maximum_ms`, and everything in between rounds
/// to the nearest multiple of `bucket_ms`, with exact halves rounding up.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct Quantizer {
    #[allow(missing_docs)]
    #[derivative(Default(value = "500"))]
    pub bucket_ms: u32,
    #[allow(missing_docs)]
    #[derivative(Default(value = "500"))]
    pub minimum_ms: u32,
    #[allow(missing_docs)]
    #[derivative(Default(value = "2000"))]
    pub maximum_ms: u32,
}
impl Quantizer {
    /// Returns the bucket that `duration_ms` belongs in.
    pub fn quantize(&self, duration_ms: u32) -> u32 {
        if duration_ms <= self.minimum_ms {
            self.minimum_ms
        } else if duration_ms >= self.maximum_ms {
            self.maximum_ms
        } else {
            // floor(x / bucket + 0.5) * bucket, in integers.
            let bucket = self.bucket_ms.max(1) as u64;
            let snapped = ((duration_ms as u64 + bucket / 2) / bucket) * bucket;
            snapped.clamp(self.minimum_ms as u64, self.maximum_ms as u64) as u32
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.bucket_ms == 0 || self.minimum_ms == 0 || self.minimum_ms > self.maximum_ms {
            Err(ImprovError::InvalidSettings(format!(
                "quantizer needs a positive bucket and 0 < minimum <= maximum, got {self:?}"
            )))
        } else {
            Ok(())
        }
    }
}
