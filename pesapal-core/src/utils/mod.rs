pub mod amount;
pub mod reference;
