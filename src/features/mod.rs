// Feature building: converts a question pair into classifier input.

pub mod onnx;
pub mod traits;
