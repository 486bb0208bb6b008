pub mod health;
pub mod push;
