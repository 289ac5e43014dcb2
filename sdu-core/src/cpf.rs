//! CPF (taxpayer identifier) masking helpers.

/// Number of digits in a complete CPF.
pub const CPF_DIGITS: usize = 11;

/// Strip everything that is not an ASCII digit.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True when the value carries exactly eleven digits, punctuation ignored.
pub fn is_complete(value: &str) -> bool {
    digits_only(value).len() == CPF_DIGITS
}

/// Format a CPF as the user types it.
///
/// - more than 11 digits: the input is returned unmodified
/// - exactly 11 digits: `###.###.###-##`
/// - fewer: the bare digits, no mask
pub fn format_cpf(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() > CPF_DIGITS {
        return value.to_string();
    }
    if digits.len() < CPF_DIGITS {
        return digits;
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
