//! Error types for the monogram.
//!
//! Most of the core never fails for a valid configuration. Errors come from
//! the edges: reading config files, bringing up the GPU, and presenting frames.

use std::io;

use thiserror::Error;

/// Errors that can occur while loading or saving a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("Failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid configuration JSON.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A color string that is not `#rrggbb`.
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
}

/// Errors registering a font file. Never reach the caller of
/// [`FontLoader::resolve`](crate::font::FontLoader::resolve), which falls
/// back to the configured family instead.
#[derive(Error, Debug)]
pub enum FontError {
    /// The font file could not be read.
    #[error("Failed to read font file: {0}")]
    Io(#[from] io::Error),
    /// The data holds no face the font database could parse.
    #[error("No usable font face in file")]
    NoFace,
}

/// Errors that can occur during GPU initialization.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The adapter reports no usable format for the surface.
    #[error("Surface is not supported by the GPU adapter")]
    UnsupportedSurface,
}

/// Errors returned when a frame cannot be presented.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The surface was lost or is out of date and must be reconfigured.
    #[error("Render surface lost")]
    SurfaceLost,
    /// The GPU ran out of memory. Rendering cannot continue.
    #[error("GPU out of memory")]
    OutOfMemory,
    /// Acquiring the next frame timed out.
    #[error("Timed out acquiring the next frame")]
    Timeout,
    /// Any other presentation failure.
    #[error("Render error")]
    Other,
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            wgpu::SurfaceError::Timeout => RenderError::Timeout,
            _ => RenderError::Other,
        }
    }
}

/// Errors that can occur when running the windowed application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Failed to create the window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
