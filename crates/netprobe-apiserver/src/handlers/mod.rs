pub mod environment;
pub mod probes;

// Re-export handler functions
pub use environment::*;
pub use probes::*;
