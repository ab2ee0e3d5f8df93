pub mod blob;
pub mod download;
pub mod file;
pub mod upload;
