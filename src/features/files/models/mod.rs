mod file;

pub use file::{NewUploadedFile, UploadedFileRecord};
