pub mod check;
pub mod fill;
pub mod providers;
