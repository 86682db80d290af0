// Concrete backends the application dispatches to.
//
// Training runs on the Autodiff wrapper; `model.valid()` and
// the evaluation loaders use the matching inner backend.

use burn::backend::{
    ndarray::NdArrayDevice,
    wgpu::WgpuDevice,
    Autodiff, NdArray, Wgpu,
};

pub type CpuBackend      = Autodiff<NdArray>;
pub type CpuInnerBackend = NdArray;

pub type GpuBackend      = Autodiff<Wgpu>;
pub type GpuInnerBackend = Wgpu;

pub fn cpu_device() -> NdArrayDevice {
    NdArrayDevice::Cpu
}

pub fn gpu_device() -> WgpuDevice {
    WgpuDevice::default()
}
