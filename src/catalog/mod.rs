pub mod pose;
pub mod store;
