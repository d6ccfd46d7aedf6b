pub mod calls;
pub mod config;
pub mod measurement;
pub mod ordinal;
