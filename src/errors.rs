use std::fmt;
use protobuf::ProtobufError;

#[derive(Clone, Debug, PartialEq)]
pub enum StateError {
    /// Underlying database failed to read or write
    IOError,
    InvalidId,
    InvalidValue(InvalidValueError),
    /// Stored bytes cannot be decoded into a record
    CorruptedValue,
    /// The store cannot serve queries at the moment. Not produced by the sled storage, it's for
    /// remote `TourQueries` implementations (network failure, closed connection, etc)
    Unavailable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum InvalidValueError {
    /// Field is required but empty
    Required(String),
    /// Field name and the reason it's rejected
    NameMessage(String, String),
}

impl fmt::Display for InvalidValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidValueError::Required(field) => write!(f, "{} is required", field),
            InvalidValueError::NameMessage(field, msg) => write!(f, "{} is {}", field, msg),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::IOError => write!(f, "storage IO error"),
            StateError::InvalidId => write!(f, "invalid id"),
            StateError::InvalidValue(e) => write!(f, "invalid value: {}", e),
            StateError::CorruptedValue => write!(f, "corrupted value"),
            StateError::Unavailable(reason) => write!(f, "store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StateError {}

impl From<sled::Error> for StateError {
    fn from(_: sled::Error) -> Self {
        StateError::IOError
    }
}

impl From<uuid::Error> for StateError {
    fn from(_: uuid::Error) -> Self {
        StateError::InvalidId
    }
}

impl From<InvalidValueError> for StateError {
    fn from(e: InvalidValueError) -> Self {
        StateError::InvalidValue(e)
    }
}

impl From<ProtobufError> for StateError {
    fn from(_: ProtobufError) -> Self {
        StateError::CorruptedValue
    }
}
