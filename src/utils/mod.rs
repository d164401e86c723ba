pub mod busy;
pub mod recency;
pub mod validation;
