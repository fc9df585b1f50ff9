//! Customer contact types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than digits and separators.
    #[error("phone number may only contain digits, spaces, dashes and a leading +")]
    InvalidCharacter,
    /// Too few or too many digits.
    #[error("phone number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A customer phone number.
///
/// Stored as entered (trimmed) so the shop can call back exactly what the
/// customer typed.
///
/// ## Constraints
///
/// - Digits, spaces and dashes, with an optional leading `+`
/// - 10-13 digits (a local mobile number up to one with a country code)
///
/// ## Examples
///
/// ```
/// use sia_core::Phone;
///
/// assert!(Phone::parse("98765 43210").is_ok());
/// assert!(Phone::parse("+91-98765-43210").is_ok());
///
/// assert!(Phone::parse("").is_err());
/// assert!(Phone::parse("call me").is_err());
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub const MIN_DIGITS: usize = 10;
    pub const MAX_DIGITS: usize = 13;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits/spaces/dashes (and one leading `+`), or has a digit count
    /// outside 10-13.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ContactError::Empty);
        }

        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
        {
            return Err(ContactError::InvalidCharacter);
        }

        let digits = body.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(ContactError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let phone = Phone::parse("  9876543210 ");
        assert_eq!(phone.map(|p| p.as_str().to_owned()), Ok("9876543210".to_owned()));
    }

    #[test]
    fn test_plus_only_allowed_in_front() {
        assert_eq!(
            Phone::parse("98765+43210"),
            Err(ContactError::InvalidCharacter)
        );
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            Phone::parse("987654321"),
            Err(ContactError::InvalidLength { .. })
        ));
        assert!(Phone::parse("+91 98765 43210").is_ok());
        assert!(matches!(
            Phone::parse("91987654321012"),
            Err(ContactError::InvalidLength { .. })
        ));
    }
}
