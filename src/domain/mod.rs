pub mod errors;
pub mod fees;
pub mod order;
pub mod product;
pub mod transitions;
pub mod user;
