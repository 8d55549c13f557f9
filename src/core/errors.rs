use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    AllocationFailure { requested_bytes: Option<usize> },
    SizeMismatch { expected: usize, actual: usize },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SerializationError {
    BufferCapacityInsufficient,
    PayloadTooLarge(usize),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeserializationError {
    Truncated,
    CookieNotRecognized(u32),
    InvalidElementSize(u8),
    LengthNotAddressable(u64),
    TrailingBytes(usize),
    DecompressionFailed,
    InvalidBase64,
    StoreCreationFailed(StoreError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StoreError::AllocationFailure { requested_bytes: Some(bytes) } => {
                write!(f, "failed to allocate {} bytes of counter storage", bytes)
            }
            StoreError::AllocationFailure { requested_bytes: None } => {
                write!(f, "counter storage size overflows the address space")
            }
            StoreError::SizeMismatch { expected, actual } => {
                write!(f, "store sizes differ: expected {} elements, got {}", expected, actual)
            }
        }
    }
}

impl Error for StoreError {}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SerializationError::BufferCapacityInsufficient => write!(f, "target buffer capacity insufficient"),
            SerializationError::PayloadTooLarge(n) => write!(f, "compressed payload of {} bytes exceeds the length field", n),
        }
    }
}

impl Error for SerializationError {}

impl fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DeserializationError::Truncated => write!(f, "input ended before the encoded store did"),
            DeserializationError::CookieNotRecognized(cookie) => write!(f, "unrecognized encoding cookie {:#010x}", cookie),
            DeserializationError::InvalidElementSize(tag) => write!(f, "invalid element size tag {}", tag),
            DeserializationError::LengthNotAddressable(len) => write!(f, "element count {} not addressable", len),
            DeserializationError::TrailingBytes(n) => write!(f, "{} bytes left after the encoded store", n),
            DeserializationError::DecompressionFailed => write!(f, "failed to inflate compressed payload"),
            DeserializationError::InvalidBase64 => write!(f, "input is not valid base64"),
            DeserializationError::StoreCreationFailed(ref e) => write!(f, "failed to create store: {}", e),
        }
    }
}

impl Error for DeserializationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            DeserializationError::StoreCreationFailed(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for DeserializationError {
    fn from(e: StoreError) -> Self {
        DeserializationError::StoreCreationFailed(e)
    }
}
