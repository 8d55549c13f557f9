use crate::core::SerializationError;
use crate::serialization::compression::ZlibCompressor;
use crate::serialization::constants::*;
use crate::serialization::{cookie, Compressor};
use crate::st::Store;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{BufMut, BytesMut};

/// Encoding of a store as a header followed by its raw buffer.
///
/// The header is big-endian: cookie (`u32`), element size (`u8`, which also
/// tells integer from weighted elements) and element count (`u64`). The
/// payload is `raw_buffer()` as is.
pub trait SerializableStore {
    fn serialize_into<T: BufMut>(&self, buf: &mut T) -> Result<usize, SerializationError>;

    fn serialize_into_custom_compressed<T: BufMut, S: Compressor>(
        &self,
        buf: &mut T,
        compressor: &mut S,
    ) -> Result<usize, SerializationError>;

    fn required_buffer_capacity(&self) -> usize;

    fn allocate_serialization_buffer(&self) -> BytesMut {
        BytesMut::with_capacity(self.required_buffer_capacity())
    }

    fn serialize(&self) -> Result<BytesMut, SerializationError> {
        let mut buffer = self.allocate_serialization_buffer();
        self.serialize_into(&mut buffer)?;
        Ok(buffer)
    }

    fn serialize_compressed(&self) -> Result<BytesMut, SerializationError> {
        let mut buffer = self.allocate_serialization_buffer();
        self.serialize_into_compressed(&mut buffer)?;
        Ok(buffer)
    }

    fn serialize_into_compressed<T: BufMut>(&self, buf: &mut T) -> Result<usize, SerializationError> {
        let mut compressor = ZlibCompressor::default();
        self.serialize_into_custom_compressed(buf, &mut compressor)
    }

    /// Compressed encoding as a base64 string, the form histogram logs carry.
    fn serialize_base64(&self) -> Result<String, SerializationError> {
        let compressed = self.serialize_compressed()?;
        Ok(STANDARD.encode(&compressed))
    }
}

impl SerializableStore for Store {
    fn required_buffer_capacity(&self) -> usize {
        ENCODING_HEADER_SIZE + self.raw_buffer().len()
    }

    fn serialize_into<T: BufMut>(&self, buf: &mut T) -> Result<usize, SerializationError> {
        let required = self.required_buffer_capacity();
        if buf.remaining_mut() < required {
            return Err(SerializationError::BufferCapacityInsufficient);
        }
        buf.put_u32(cookie::get_encoding_cookie());
        buf.put_u8(self.element_size() as u8);
        buf.put_u64(self.len() as u64);
        buf.put_slice(self.raw_buffer());
        Ok(required)
    }

    fn serialize_into_custom_compressed<T: BufMut, S: Compressor>(
        &self,
        buf: &mut T,
        compressor: &mut S,
    ) -> Result<usize, SerializationError> {
        let mut intermediate_uncompressed = self.allocate_serialization_buffer();
        self.serialize_into(&mut intermediate_uncompressed)?;

        let compressed = compressor.compress(&intermediate_uncompressed);
        if compressed.len() > u32::MAX as usize {
            return Err(SerializationError::PayloadTooLarge(compressed.len()));
        }
        let required = COMPRESSED_HEADER_SIZE + compressed.len();
        if buf.remaining_mut() < required {
            return Err(SerializationError::BufferCapacityInsufficient);
        }

        buf.put_u32(compressor.modify_cookie(cookie::get_compressed_encoding_cookie()));
        buf.put_u32(compressed.len() as u32);
        buf.put_slice(&compressed);
        Ok(required)
    }
}
