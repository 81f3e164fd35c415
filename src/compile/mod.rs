/// Move lists and channel rows into compiled descriptors.
pub mod compiler;
/// The compiled descriptor model.
pub mod descriptor;
/// Stable fingerprints over compiled output.
pub mod fingerprint;
