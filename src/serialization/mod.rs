pub mod serializable_store;
pub mod deserializable_store;
pub mod compression;
pub mod constants;
pub mod cookie;

pub use self::compression::{Compressor, Decompressor, ZlibCompressor, ZlibDecompressor};
pub use self::deserializable_store::DeserializableStore;
pub use self::serializable_store::SerializableStore;
