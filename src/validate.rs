use crate::errors::{InvalidValueError, StateError};
use regex::Regex;
use lazy_static::lazy_static;

const MAX_NAME_LENGTH: usize = 200;

lazy_static! {
    static ref IMAGE_URL_REGEX: Regex = Regex::new(r"^(https?|gs)://[^\s]+$").unwrap();
}

pub(crate) fn check_tour_name(name: &str) -> Result<(), StateError> {
    if name.trim().is_empty() {
        return Err(StateError::InvalidValue(
            InvalidValueError::Required("name".to_string())))
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(StateError::InvalidValue(
            InvalidValueError::NameMessage("name".to_string(), "too long".to_string())))
    }
    // NUL separates the name from the id in the index key
    if name.chars().any(|c| c.is_control()) {
        return Err(StateError::InvalidValue(
            InvalidValueError::NameMessage("name".to_string(), "has control characters".to_string())))
    }
    Ok(())
}

pub(crate) fn check_image(image: &str) -> Result<(), StateError> {
    if image.is_empty() {
        return Ok(())
    }
    if !IMAGE_URL_REGEX.is_match(image) {
        return Err(StateError::InvalidValue(
            InvalidValueError::NameMessage("image".to_string(), "not a url".to_string())))
    }
    Ok(())
}
