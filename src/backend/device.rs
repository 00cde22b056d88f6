//! Device selection (CPU / Metal / CUDA).

use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

use super::ScoreDevice;

/// Selects the compute device based on enabled features (falls back to CPU).
pub fn select_device() -> ScoreDevice {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    let failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match candle_core::Device::new_metal(0) {
            Ok(_) => {
                info!("Using Metal GPU acceleration");
                return ScoreDevice::Metal(0);
            }
            Err(e) => {
                let msg = e.to_string();
                if cfg!(feature = "cuda") {
                    warn!(error = %msg, "Metal device unavailable, trying CUDA");
                } else {
                    warn!(error = %msg, "Metal device unavailable");
                }
                failures.push(format!("metal failed: {msg}"));
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match candle_core::Device::new_cuda(0) {
            Ok(_) => {
                info!("Using CUDA GPU acceleration");
                return ScoreDevice::Cuda(0);
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(error = %msg, "CUDA device unavailable");
                failures.push(format!("cuda failed: {msg}"));
            }
        }
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    {
        debug!("No GPU features enabled");
    }

    let reason = if !cfg!(any(feature = "metal", feature = "cuda")) {
        "no GPU backend compiled".to_string()
    } else if failures.is_empty() {
        "no GPU device available".to_string()
    } else {
        failures.join("; ")
    };

    warn!(reason = %reason, "Falling back to CPU device");
    ScoreDevice::Cpu
}

/// Materializes a [`ScoreDevice`] as a candle device handle.
pub(crate) fn to_candle(device: ScoreDevice) -> Result<candle_core::Device, candle_core::Error> {
    match device {
        ScoreDevice::Cpu => Ok(candle_core::Device::Cpu),
        ScoreDevice::Cuda(ordinal) => candle_core::Device::new_cuda(ordinal),
        ScoreDevice::Metal(ordinal) => candle_core::Device::new_metal(ordinal),
    }
}
