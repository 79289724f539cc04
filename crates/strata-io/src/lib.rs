//! Run-length chunk persistence and the per-seed save folder.
#![forbid(unsafe_code)]

mod codec;
mod store;

pub use codec::{CHUNK_FILE_VERSION, CHUNK_MAGIC, CodecError, HEADER_LEN, decode_chunk, encode_chunk};
pub use store::{SaveError, SaveStore};
