pub mod scanner_viewmodel;

pub use scanner_viewmodel::*;
