use std::sync::OnceLock;

use regex::Regex;

/// Shortest run of digits accepted as a one-time password.
pub const MIN_OTP_DIGITS: usize = 5;

fn otp_regex() -> &'static Regex {
    static OTP_REGEX: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only; `\d` would also accept other scripts' digits
    OTP_REGEX.get_or_init(|| Regex::new(r"[0-9]{5,}").expect("Invalid OTP regex"))
}

/// Extracts the one-time password from a received SMS body.
///
/// Returns the first run of at least [`MIN_OTP_DIGITS`] ASCII digits.
pub fn extract_otp(message: &str) -> Option<&str> {
    otp_regex().find(message).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Your code is 123456", Some("123456"))]
    #[case("12345 is your verification code", Some("12345"))]
    #[case("<#> Code: 98765432\nFA+9qCX9VSu", Some("98765432"))]
    #[case("first 11111 then 22222", Some("11111"))]
    #[case("code 1234", None)]
    #[case("12-34-56", None)]
    #[case("", None)]
    #[case("٠١٢٣٤٥", None)]
    fn extracts_first_long_digit_run(#[case] message: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_otp(message), expected);
    }
}
