pub mod durations;
pub mod overrides;
pub mod session;
