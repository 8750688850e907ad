//! Form body decoding module
//!
//! Decodes `application/x-www-form-urlencoded` bodies into a [`Record`].

use thiserror::Error;

use crate::store::Record;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("form field {0:?} has no '='")]
    MissingSeparator(String),
    #[error("form data is not valid UTF-8")]
    InvalidUtf8,
}

/// Decode a form body into a record
///
/// Pairs are split on `&` and then once on the first `=`; key and value are
/// percent-decoded separately with `+` meaning space. Empty pairs are
/// skipped, a repeated field keeps its last value.
pub fn parse_form(body: &[u8]) -> Result<Record, FormError> {
    let text = std::str::from_utf8(body).map_err(|_| FormError::InvalidUtf8)?;

    let mut record = Record::new();
    for pair in text.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| FormError::MissingSeparator(pair.to_string()))?;
        record.insert(percent_decode(key, true)?, percent_decode(value, true)?);
    }
    Ok(record)
}

/// Percent-decode a URI path segment (`+` stays literal)
pub fn decode_path(path: &str) -> Result<String, FormError> {
    percent_decode(path, false)
}

/// Malformed escapes such as `%zz` or a trailing `%4` are kept verbatim.
fn percent_decode(input: &str, plus_as_space: bool) -> Result<String, FormError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (hex_at(bytes, i + 1), hex_at(bytes, i + 2)) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| FormError::InvalidUtf8)
}

fn hex_at(bytes: &[u8], index: usize) -> Option<u8> {
    match *bytes.get(index)? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(record: &Record) -> Vec<(&str, &str)> {
        record
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_plus_is_space() {
        let record = parse_form(b"username=alice&msg=hi+there").unwrap();
        assert_eq!(fields(&record), vec![("msg", "hi there"), ("username", "alice")]);
    }

    #[test]
    fn test_percent_escapes() {
        let record = parse_form(b"msg=50%25+off%21&name=%D0%9E%D0%BB%D1%8F").unwrap();
        assert_eq!(record["msg"], "50% off!");
        assert_eq!(record["name"], "Оля");
    }

    #[test]
    fn test_encoded_separators_stay_in_value() {
        let record = parse_form(b"msg=a%26b%3Dc").unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["msg"], "a&b=c");
    }

    #[test]
    fn test_split_on_first_equals() {
        let record = parse_form(b"expr=1+1=2").unwrap();
        assert_eq!(record["expr"], "1 1=2");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let record = parse_form(b"name=a&name=b").unwrap();
        assert_eq!(fields(&record), vec![("name", "b")]);
    }

    #[test]
    fn test_empty_values_and_pairs() {
        assert!(parse_form(b"").unwrap().is_empty());
        let record = parse_form(b"a=&&b=2&").unwrap();
        assert_eq!(fields(&record), vec![("a", ""), ("b", "2")]);
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            parse_form(b"username=alice&oops"),
            Err(FormError::MissingSeparator("oops".to_string()))
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(parse_form(&[b'a', b'=', 0xff]), Err(FormError::InvalidUtf8));
        assert_eq!(parse_form(b"a=%ff"), Err(FormError::InvalidUtf8));
    }

    #[test]
    fn test_malformed_escape_kept() {
        let record = parse_form(b"a=%zz&b=100%").unwrap();
        assert_eq!(record["a"], "%zz");
        assert_eq!(record["b"], "100%");
    }

    #[test]
    fn test_decode_path_keeps_plus() {
        assert_eq!(decode_path("/my%20file+v2.txt").unwrap(), "/my file+v2.txt");
    }
}
