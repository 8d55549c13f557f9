pub const ENCODING_COOKIE_BASE: u32 = 0x5a5e_0300;
pub const COMPRESSED_ENCODING_COOKIE_BASE: u32 = 0x5a5e_0400;

// cookie, element size tag, element count
pub const ENCODING_HEADER_SIZE: usize = 4 + 1 + 8;
// cookie, compressed length
pub const COMPRESSED_HEADER_SIZE: usize = 4 + 4;
