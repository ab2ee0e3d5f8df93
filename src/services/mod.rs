pub mod access;
pub mod expiry;
pub mod filetype;
pub mod ident;
pub mod password;
pub mod upload;

pub use access::AccessService;
pub use upload::UploadService;
