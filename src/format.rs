//! Locale-fixed display and validation helpers (es-CO money, es-ES dates).

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;

const NBSP: char = '\u{a0}';

const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// `1000` in COP renders as `$ 1.000,00` (NBSP after the symbol).
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let symbol = match currency.to_ascii_uppercase().as_str() {
        "COP" => "$".to_string(),
        "USD" => "US$".to_string(),
        "EUR" => "€".to_string(),
        other => other.to_string(),
    };

    let rounded = amount.abs().round_dp(2);
    let fixed = format!("{:.2}", rounded);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if amount.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}{}{},{}", sign, symbol, NBSP, group_thousands(whole, '.'), cents)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Long Spanish date: `15 de junio de 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), MONTHS_LONG[date.month0() as usize], date.year())
}

/// Short Spanish date with time: `15 jun 2024, 14:05`.
pub fn format_date_time(at: NaiveDateTime) -> String {
    format!(
        "{} {} {}, {:02}:{:02}",
        at.day(),
        MONTHS_SHORT[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Parse the date prefix of an API timestamp (`YYYY-MM-DD...`).
pub fn parse_api_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok()
}

/// Ten-digit Colombian numbers become `+57 300 123 4567`; anything else is returned as given.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        format!("+57 {} {} {}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .take(2)
        .collect()
}

/// Whole years between `birth` and `today`, minus one before the birthday.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

pub fn age_group(age: i32) -> &'static str {
    if age < 18 {
        "Menor de edad"
    } else if age < 65 {
        "Adulto"
    } else {
        "Adulto mayor"
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Colombian mobile or landline, optionally prefixed with `+57` and one space.
pub fn validate_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if is_local_number(rest) {
        return true;
    }
    let Some(rest) = rest.strip_prefix("57") else {
        return false;
    };
    is_local_number(rest.strip_prefix(char::is_whitespace).unwrap_or(rest))
}

fn is_local_number(digits: &str) -> bool {
    digits.len() == 10
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(digits.as_bytes()[0], b'3'..=b'8')
}

/// National id (cédula): one to ten digits.
pub fn validate_identification(id: &str) -> bool {
    (1..=10).contains(&id.len()) && id.chars().all(|c| c.is_ascii_digit())
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn currency_uses_colombian_grouping() {
        assert_eq!(format_currency(Decimal::from(1000), "COP"), "$\u{a0}1.000,00");
        assert_eq!(
            format_currency(Decimal::from_str("1234567.891").unwrap(), "COP"),
            "$\u{a0}1.234.567,89"
        );
        assert_eq!(format_currency(Decimal::from_str("-150000").unwrap(), "USD"), "-US$\u{a0}150.000,00");
        assert_eq!(format_currency(Decimal::ZERO, "GBP"), "GBP\u{a0}0,00");
    }

    #[test]
    fn dates_in_spanish() {
        assert_eq!(format_date(ymd(2024, 6, 15)), "15 de junio de 2024");
        let at = ymd(2024, 9, 3).and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(format_date_time(at), "3 sept 2024, 08:05");
    }

    #[test]
    fn api_date_prefix() {
        assert_eq!(parse_api_date("2000-06-15T00:00:00.000Z"), Some(ymd(2000, 6, 15)));
        assert_eq!(parse_api_date("15/06/2000"), None);
        assert_eq!(parse_api_date(""), None);
    }

    #[test]
    fn phone_formatting() {
        assert_eq!(format_phone("300-123-4567"), "+57 300 123 4567");
        assert_eq!(format_phone("12345"), "12345");
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("ana maría gómez"), "AM");
        assert_eq!(initials("Dr"), "D");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn age_turns_on_birthday() {
        let birth = ymd(2000, 6, 15);
        assert_eq!(calculate_age(birth, ymd(2024, 6, 14)), 23);
        assert_eq!(calculate_age(birth, ymd(2024, 6, 15)), 24);
        assert_eq!(calculate_age(birth, ymd(2024, 5, 30)), 23);
    }

    #[test]
    fn age_groups() {
        assert_eq!(age_group(17), "Menor de edad");
        assert_eq!(age_group(18), "Adulto");
        assert_eq!(age_group(65), "Adulto mayor");
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("doctor@test.com"));
        assert!(!validate_email("doctor@test"));
        assert!(!validate_email("doctor @test.com"));
        assert!(!validate_email("a@b@c.com"));
        assert!(!validate_email("@test.com"));
        assert!(!validate_email("doctor@.com"));
    }

    #[test]
    fn phone_shapes() {
        assert!(validate_phone("3001234567"));
        assert!(validate_phone("+57 3001234567"));
        assert!(validate_phone("573001234567"));
        assert!(!validate_phone("2001234567"));
        assert!(!validate_phone("300123456"));
    }

    #[test]
    fn identification_is_one_to_ten_digits() {
        assert!(validate_identification("1"));
        assert!(validate_identification("1234567890"));
        assert!(!validate_identification(""));
        assert!(!validate_identification("12345678901"));
        assert!(!validate_identification("12a"));
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
    }
}
