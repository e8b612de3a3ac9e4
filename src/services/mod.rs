pub mod camera_service;
pub mod decoder_service;

pub use camera_service::*;
pub use decoder_service::*;
