// Duplicate classifier: trait-based abstraction over the pretrained model.
//
// The Classifier trait is what the checker calls. OnnxClassifier implements
// it by running the exported model locally; download fetches the artifact
// when it isn't on disk yet.

pub mod download;
pub mod onnx;
pub mod traits;
