//! Error types and helpers.
use {crate::type_safe::TypeTag, core::str::Utf8Error, thiserror::Error};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Errors raised while encoding a value.
///
/// The codecs themselves are infallible; everything here originates in the
/// byte sink.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while decoding a value.
///
/// The stream position after any of these is undefined; callers that want to
/// retry must re-seek the underlying source.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Unexpected end of stream")]
    UnexpectedEndOfStream,
    #[error("Invalid type in stream, expected '{expected}', got '{found}'")]
    TypeMismatch { expected: TypeTag, found: TypeTag },
    #[error("Invalid type tag byte: {0:#04x}")]
    InvalidTypeTag(u8),
    #[error("Invalid union arm index: {0}")]
    InvalidUnionIndex(u64),
    #[error("Decoded value does not fit into {0}")]
    ValueOverflow(&'static str),
    #[error("Invalid bool encoding: {0}")]
    InvalidBool(u64),
    #[error("Invalid char value: {0:#x}")]
    InvalidChar(u32),
    #[error(transparent)]
    InvalidUtf8(#[from] Utf8Error),
    #[error("Sequence length mismatch: expected {expected}, got {found}")]
    LengthMismatch { expected: u64, found: u64 },
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("Could not cast decoded length to pointer sized type")]
    PointerSized,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
pub type WriteResult<T> = core::result::Result<T, WriteError>;
pub type ReadResult<T> = core::result::Result<T, ReadError>;

#[cold]
pub const fn unexpected_end_of_stream() -> ReadError {
    ReadError::UnexpectedEndOfStream
}

#[cold]
pub const fn type_mismatch(expected: TypeTag, found: TypeTag) -> ReadError {
    ReadError::TypeMismatch { expected, found }
}

#[cold]
pub const fn invalid_type_tag(byte: u8) -> ReadError {
    ReadError::InvalidTypeTag(byte)
}

#[cold]
pub const fn invalid_union_index(index: u64) -> ReadError {
    ReadError::InvalidUnionIndex(index)
}

#[cold]
pub const fn value_overflow(target: &'static str) -> ReadError {
    ReadError::ValueOverflow(target)
}

#[cold]
pub const fn invalid_bool(val: u64) -> ReadError {
    ReadError::InvalidBool(val)
}

#[cold]
pub const fn invalid_char(val: u32) -> ReadError {
    ReadError::InvalidChar(val)
}

#[cold]
pub const fn length_mismatch(expected: u64, found: u64) -> ReadError {
    ReadError::LengthMismatch { expected, found }
}

#[cold]
pub const fn invalid_value(msg: &'static str) -> ReadError {
    ReadError::InvalidValue(msg)
}

#[cold]
pub const fn pointer_sized_decode_error() -> ReadError {
    ReadError::PointerSized
}
