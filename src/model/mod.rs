pub mod data_core;
pub mod json_array;
pub mod json_object;
pub mod performance;
pub mod searchable;
pub mod tree;
