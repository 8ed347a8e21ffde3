/// Hugging Face utilities
pub mod hugging_face;

/// Utilities for classification tasks
pub mod classes;

/// Logger setup for the binaries
pub mod logging;
