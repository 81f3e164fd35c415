/// Host-supplied graph geometry.
pub mod graph;
/// The JSON boundary payload.
pub mod payload;
