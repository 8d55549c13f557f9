use crate::core::{DeserializationError, Width};
use crate::serialization::compression::{Decompressor, ZlibDecompressor};
use crate::serialization::constants::*;
use crate::serialization::cookie;
use crate::st::Store;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use byteorder::{BigEndian, ReadBytesExt};
use std::convert::TryFrom;
use std::io::{self, Read};

pub trait DeserializableStore: Sized {
    fn deserialize_from<R: Read>(reader: &mut R) -> Result<Self, DeserializationError>;

    /// Accepts both the compressed and the plain encoding.
    fn deserialize_from_compressed<R: Read>(reader: &mut R) -> Result<Self, DeserializationError> {
        Self::deserialize_from_custom_compressed(reader, ZlibDecompressor)
    }

    fn deserialize_from_custom_compressed<R: Read, S: Decompressor>(
        reader: &mut R,
        decompressor: S,
    ) -> Result<Self, DeserializationError>;

    fn deserialize_from_base64(encoded: &str) -> Result<Self, DeserializationError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| DeserializationError::InvalidBase64)?;
        let mut input = &bytes[..];
        let store = Self::deserialize_from_compressed(&mut input)?;
        expect_consumed(input)?;
        Ok(store)
    }
}

// reading from a slice only ever fails at the end of it
fn truncated(_: io::Error) -> DeserializationError {
    DeserializationError::Truncated
}

fn expect_consumed(rest: &[u8]) -> Result<(), DeserializationError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(DeserializationError::TrailingBytes(rest.len()))
    }
}

// everything after the cookie
fn read_store<R: Read>(reader: &mut R) -> Result<Store, DeserializationError> {
    let tag = reader.read_u8().map_err(truncated)?;
    let width = Width::from_element_size(tag).ok_or(DeserializationError::InvalidElementSize(tag))?;
    let len = reader.read_u64::<BigEndian>().map_err(truncated)?;
    let expected = usize::try_from(len)
        .ok()
        .and_then(|len| width.byte_len(len).map(|bytes| (len, bytes)));
    let (len, expected) = expected.ok_or(DeserializationError::LengthNotAddressable(len))?;

    // grows with the input, never ahead of it
    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut payload)
        .map_err(truncated)?;
    if payload.len() != expected {
        return Err(DeserializationError::Truncated);
    }
    Ok(Store::from_raw_parts(len, width, &payload)?)
}

impl DeserializableStore for Store {
    fn deserialize_from<R: Read>(reader: &mut R) -> Result<Store, DeserializationError> {
        let cookie = reader.read_u32::<BigEndian>().map_err(truncated)?;
        if cookie::get_cookie_base(cookie) != ENCODING_COOKIE_BASE {
            return Err(DeserializationError::CookieNotRecognized(cookie));
        }
        read_store(reader)
    }

    fn deserialize_from_custom_compressed<R: Read, S: Decompressor>(
        reader: &mut R,
        mut decompressor: S,
    ) -> Result<Store, DeserializationError> {
        let cookie = reader.read_u32::<BigEndian>().map_err(truncated)?;
        if !decompressor.check_cookie(cookie)? {
            return read_store(reader);
        }

        let length_of_compressed = reader.read_u32::<BigEndian>().map_err(truncated)? as usize;
        let mut compressed = Vec::new();
        reader
            .by_ref()
            .take(length_of_compressed as u64)
            .read_to_end(&mut compressed)
            .map_err(truncated)?;
        if compressed.len() != length_of_compressed {
            return Err(DeserializationError::Truncated);
        }

        let inflated = decompressor.decompress(&compressed)?;
        let mut input = &inflated[..];
        let store = Store::deserialize_from(&mut input)?;
        expect_consumed(input)?;
        Ok(store)
    }
}
