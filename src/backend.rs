//! The backend used for serving. Neither option wraps `Autodiff`, so no gradients are tracked and
//! dropout layers pass their input through unchanged.

#[cfg(not(feature = "tch"))]
use burn::backend::{ndarray::NdArrayDevice, NdArray};

#[cfg(feature = "tch")]
use burn::backend::{libtorch::LibTorchDevice, LibTorch};

/// The inference backend
#[cfg(not(feature = "tch"))]
pub type Inference = NdArray;

/// The inference backend
#[cfg(feature = "tch")]
pub type Inference = LibTorch;

/// The device that inference runs on
#[cfg(not(feature = "tch"))]
pub fn device() -> NdArrayDevice {
    NdArrayDevice::Cpu
}

/// The device that inference runs on
#[cfg(feature = "tch")]
pub fn device() -> LibTorchDevice {
    LibTorchDevice::Cuda(0)
}
