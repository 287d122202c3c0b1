mod cell_errors;

pub use cell_errors::*;
