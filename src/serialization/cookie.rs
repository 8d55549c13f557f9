use crate::serialization::constants::*;

// the second nibble carries the format revision
const FORMAT_REVISION: u32 = 0x10;

pub fn get_encoding_cookie() -> u32 {
    ENCODING_COOKIE_BASE | FORMAT_REVISION
}

pub fn get_compressed_encoding_cookie() -> u32 {
    COMPRESSED_ENCODING_COOKIE_BASE | FORMAT_REVISION
}

pub fn get_cookie_base(cookie: u32) -> u32 {
    cookie & !0xf0
}
