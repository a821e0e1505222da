//! Initial vehicle layouts for the catalog scenes.

pub mod spawn;
