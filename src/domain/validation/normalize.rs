//! Value normalizers for spoken or typed answers.
//!
//! Transcribed speech arrives in many shapes ("April 29th 2006",
//! "04/29/2006", "two thousand"); these helpers reduce each shape to one
//! canonical form per field type. Dates normalize to ISO `YYYY-MM-DD`,
//! phone numbers to `(XXX) XXX-XXXX`, numbers to bare digits.

use chrono::NaiveDate;

/// Numeric date layouts accepted before falling back to spoken forms.
const DATE_LAYOUTS: [&str; 3] = ["%m/%d/%Y", "%m-%d-%Y", "%Y-%m-%d"];

/// Normalizes a date utterance to ISO `YYYY-MM-DD`.
///
/// Accepts `MM/DD/YYYY`, `MM-DD-YYYY`, ISO, and spoken month-name forms
/// such as "April 29 2006" or "29th of April, 2006". Returns `None` when
/// no calendar date can be read out of the text.
pub fn normalize_date(raw: &str) -> Option<String> {
    let text = raw.trim();
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    parse_spoken_date(&words_to_digits(text))
}

fn parse_spoken_date(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;
    let mut year: Option<i32> = None;

    for token in lower.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        if let Some(m) = month_number(token) {
            month.get_or_insert(m);
            continue;
        }
        // "29th" -> 29
        let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(n) = digits.parse::<u32>() {
            if (1000..=9999).contains(&n) {
                year.get_or_insert(n as i32);
            } else if (1..=31).contains(&n) {
                day.get_or_insert(n);
            }
        }
    }

    let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn month_number(token: &str) -> Option<u32> {
    let month = match token {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Rewrites spoken number words as digits ("two thousand" -> "2000",
/// "twenty five" -> "25"). Non-number tokens pass through untouched.
///
/// Text whose number words accumulate past `i64` (a run of "thousand"
/// tokens, say) is returned unchanged; the downstream parsers then
/// reject it like any other unreadable value.
pub fn words_to_digits(text: &str) -> String {
    match try_words_to_digits(text) {
        Some(rewritten) => rewritten,
        None => text.to_string(),
    }
}

fn try_words_to_digits(text: &str) -> Option<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current: Option<i64> = None;

    for token in text.split_whitespace() {
        let word = token
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();
        if let Some(value) = small_number(&word) {
            current = Some(current.unwrap_or(0).checked_add(value)?);
        } else if word == "hundred" {
            current = Some(current.unwrap_or(1).checked_mul(100)?);
        } else if word == "thousand" {
            current = Some(current.unwrap_or(1).checked_mul(1000)?);
        } else {
            if let Some(n) = current.take() {
                out.push(n.to_string());
            }
            out.push(token.to_string());
        }
    }
    if let Some(n) = current {
        out.push(n.to_string());
    }
    Some(out.join(" "))
}

fn small_number(word: &str) -> Option<i64> {
    let n = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(n)
}

/// Normalizes a numeric utterance to bare digits.
pub fn normalize_number(raw: &str) -> Option<String> {
    let digits: String = words_to_digits(raw)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Normalizes a US phone number to `(XXX) XXX-XXXX`.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = words_to_digits(raw)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return None,
    };
    Some(format!(
        "({}) {}-{}",
        &local[..3],
        &local[3..6],
        &local[6..]
    ))
}

/// Normalizes a US zip code: bare digits for the five-digit form,
/// `XXXXX-XXXX` for the nine-digit form. Anything else is returned
/// trimmed and untouched.
pub fn normalize_zip(raw: &str) -> String {
    let digits: String = words_to_digits(raw)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    match digits.len() {
        5 => digits,
        9 => format!("{}-{}", &digits[..5], &digits[5..]),
        _ => raw.trim().to_string(),
    }
}

/// Normalizes an email utterance: lowercased and trimmed, with the spoken
/// forms "at" and "dot" rewritten. Returns `None` when the result does not
/// look like an address.
pub fn normalize_email(raw: &str) -> Option<String> {
    let text = raw
        .trim()
        .to_ascii_lowercase()
        .replace(" at ", "@")
        .replace(" dot ", ".")
        .replace(' ', "");
    if text.contains('@') && text.contains('.') {
        Some(text)
    } else {
        None
    }
}

/// Capitalizes each word ("youdahe asfaw" -> "Youdahe Asfaw").
pub fn capitalize_words(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
