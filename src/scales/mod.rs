/// Scale specs, construction, and the per-payload scale bundle.
pub mod build;
/// Raw channel values and visual outputs.
pub mod value;
