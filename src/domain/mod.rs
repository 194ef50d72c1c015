pub mod errors;
pub mod order;
