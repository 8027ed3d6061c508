// Command modules for the lendflow CLI

pub mod borrow;
pub mod swap;
pub mod utils;
