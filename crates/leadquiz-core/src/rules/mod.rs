pub mod phone;

pub use phone::{validate_phone, PhoneRules, SequenceWindow};
