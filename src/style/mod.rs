pub mod color;
pub mod tokens;
pub mod units;
