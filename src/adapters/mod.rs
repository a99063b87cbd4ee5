pub mod annotate;
pub mod fs;
pub mod http;
pub mod onnx;
#[cfg(feature = "livecam")]
pub mod v4l2;
