pub mod adjust;
pub mod rules;
