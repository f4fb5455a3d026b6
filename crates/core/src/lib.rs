pub mod money;
pub mod name;

pub use money::{parse_amount, AmountParse, Money};
