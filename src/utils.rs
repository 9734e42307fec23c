//! Small numeric helpers shared across the engine.

pub mod safe_cast;
