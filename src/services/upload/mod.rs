pub mod policy;
pub mod reader;

pub use policy::{UploadOutcome, UploadPolicy};
pub use reader::read_upload;
