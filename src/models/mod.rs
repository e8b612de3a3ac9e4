// Modelos del scanner

pub mod capture;
pub mod qr_code;

pub use capture::*;
pub use qr_code::*;
