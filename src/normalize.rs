//! Canonical forms for Aadhaar and phone identifiers.
//!
//! Signup validation and login/search lookups go through the same functions,
//! so stored values and query values always compare equal.

use crate::error::AppError;

/// Strips non-digits and formats a 12-digit Aadhaar as `"DDDD DDDD DDDD"`.
/// Aadhaar numbers never start with 0 or 1.
pub fn normalize_aadhaar(input: &str) -> Result<String, AppError> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 12 {
        return Err(AppError::Validation(
            "Aadhaar must have 12 digits".to_string(),
        ));
    }
    if digits.starts_with('0') || digits.starts_with('1') {
        return Err(AppError::Validation(
            "Aadhaar must start with 2-9".to_string(),
        ));
    }
    Ok(format!("{} {} {}", &digits[0..4], &digits[4..8], &digits[8..12]))
}

/// Strips non-digits and reduces to the trailing 10 digits, which absorbs a
/// leading "91"/"+91" country code or a "0" trunk prefix. Valid Indian mobile
/// numbers start with 6-9.
pub fn normalize_phone(input: &str) -> Result<String, AppError> {
    let mut digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 10 {
        digits = digits[digits.len() - 10..].to_string();
    }
    if digits.len() != 10 {
        return Err(AppError::Validation("Phone must be 10 digits".to_string()));
    }
    if !matches!(digits.as_bytes()[0], b'6'..=b'9') {
        return Err(AppError::Validation(
            "Phone must start with 6, 7, 8, or 9".to_string(),
        ));
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_grouped_into_threes() {
        assert_eq!(
            normalize_aadhaar("234512345678").unwrap(),
            "2345 1234 5678"
        );
    }

    #[test]
    fn aadhaar_ignores_separator_noise() {
        assert_eq!(
            normalize_aadhaar("2345-1234-5678").unwrap(),
            "2345 1234 5678"
        );
        assert_eq!(
            normalize_aadhaar(" 2345 1234 5678 ").unwrap(),
            "2345 1234 5678"
        );
    }

    #[test]
    fn aadhaar_normalization_is_idempotent() {
        let once = normalize_aadhaar("9876 5432 1098").unwrap();
        assert_eq!(normalize_aadhaar(&once).unwrap(), once);
    }

    #[test]
    fn aadhaar_rejects_wrong_length() {
        assert!(normalize_aadhaar("12345").is_err());
        assert!(normalize_aadhaar("2345123456789").is_err());
        assert!(normalize_aadhaar("").is_err());
    }

    #[test]
    fn aadhaar_rejects_leading_zero_or_one() {
        assert!(normalize_aadhaar("034512345678").is_err());
        assert!(normalize_aadhaar("134512345678").is_err());
    }

    #[test]
    fn phone_strips_country_code_variants() {
        for input in ["9876543210", "+919876543210", "919876543210", "09876543210", "98765 43210"] {
            assert_eq!(normalize_phone(input).unwrap(), "9876543210", "input: {input}");
        }
    }

    #[test]
    fn phone_normalization_is_idempotent() {
        let once = normalize_phone("+91 76543 21098").unwrap();
        assert_eq!(normalize_phone(&once).unwrap(), once);
    }

    #[test]
    fn phone_rejects_invalid_prefix() {
        assert!(normalize_phone("5876543210").is_err());
        assert!(normalize_phone("1234567890").is_err());
    }

    #[test]
    fn phone_rejects_short_numbers() {
        assert!(normalize_phone("98765").is_err());
        assert!(normalize_phone("").is_err());
    }
}
