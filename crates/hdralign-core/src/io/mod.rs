pub mod image_io;
pub mod source;

pub use source::{load_proxies, FileImageSource, ImageSource};
