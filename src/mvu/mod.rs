pub mod runtime;
pub mod segments;
