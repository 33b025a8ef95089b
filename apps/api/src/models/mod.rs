pub mod blocks;
pub mod lenient;
pub mod plan;
