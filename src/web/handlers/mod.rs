pub mod check;
pub mod diagnostics;
pub mod health;
pub mod home;
