use crate::core::DeserializationError;
use crate::serialization::constants::*;
use crate::serialization::cookie;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use miniz_oxide::inflate::decompress_to_vec_zlib;

pub trait Compressor {
    fn compress(&mut self, src: &[u8]) -> Vec<u8>;
    fn modify_cookie(&self, cookie: u32) -> u32;
}

pub trait Decompressor {
    fn decompress(&mut self, src: &[u8]) -> Result<Vec<u8>, DeserializationError>;
    fn check_cookie(&self, cookie: u32) -> Result<bool, DeserializationError>;
}

pub struct ZlibCompressor {
    level: u8,
}

impl ZlibCompressor {
    pub fn new(level: CompressionLevel) -> ZlibCompressor {
        // DefaultCompression is -1
        let level = match level as i32 {
            l if l < 0 => CompressionLevel::DefaultLevel as u8,
            l => l.min(CompressionLevel::UberCompression as i32) as u8,
        };
        ZlibCompressor { level }
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Default for ZlibCompressor {
    fn default() -> ZlibCompressor {
        ZlibCompressor::new(CompressionLevel::DefaultLevel)
    }
}

impl Compressor for ZlibCompressor {
    fn compress(&mut self, src: &[u8]) -> Vec<u8> {
        compress_to_vec_zlib(src, self.level)
    }

    fn modify_cookie(&self, cookie: u32) -> u32 {
        cookie
    }
}

#[derive(Default)]
pub struct ZlibDecompressor;

impl Decompressor for ZlibDecompressor {
    fn decompress(&mut self, src: &[u8]) -> Result<Vec<u8>, DeserializationError> {
        decompress_to_vec_zlib(src).map_err(|_| DeserializationError::DecompressionFailed)
    }

    fn check_cookie(&self, cookie: u32) -> Result<bool, DeserializationError> {
        match cookie::get_cookie_base(cookie) {
            ENCODING_COOKIE_BASE => Ok(false),
            COMPRESSED_ENCODING_COOKIE_BASE => Ok(true),
            _ => Err(DeserializationError::CookieNotRecognized(cookie)),
        }
    }
}
