pub mod attribution;
pub mod narrator;
pub mod tables;

pub use attribution::FeatureAttributions;
pub use narrator::{narrate, Factor, FactorLists};
pub use tables::NarrationTables;
