pub mod manifest;
pub mod source;
