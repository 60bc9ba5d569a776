mod filters;
mod load;
mod meta;

pub use filters::{FilterChain, FilterParseError};
pub use load::{decode_image_from_bytes, decode_image_from_path};
pub use meta::{ImageMeta, human_readable_bytes};
