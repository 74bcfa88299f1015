pub mod mood;
pub mod weather;
