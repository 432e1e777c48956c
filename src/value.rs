use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;

/// A decoded CMISQL literal value.
///
/// Produced fresh by the literal decoder on every walk; there is no caching
/// and no identity beyond structural equality. The same type doubles as the
/// property-value representation of the in-memory matcher, which is why it
/// carries `Null` (an unset property, and the result of the base column
/// hook) even though no literal ever decodes to it.
///
/// # Numeric literals
///
/// CMISQL numbers are exact for integers and decimal for everything with a
/// fraction or an exponent:
///
/// ```
/// use cmisql::value::Value;
///
/// assert_eq!(Value::decode_number("42").unwrap(), Value::Integer(42));
/// assert_eq!(Value::decode_number("4.2").unwrap(), Value::Decimal("4.2".parse().unwrap()));
/// assert_eq!(Value::decode_number("4e2").unwrap(), Value::Decimal(400.into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value: an unset property, or an unresolved column reference
    Null,

    /// Boolean (`TRUE`/`FALSE` literal)
    Boolean(bool),

    /// Exact integer
    Integer(i64),

    /// Decimal number (fraction or exponent in the literal)
    Decimal(Decimal),

    /// String, unquoted and unescaped
    String(String),

    /// Calendar timestamp; offset-less payloads are read as UTC
    Timestamp(DateTime<FixedOffset>),

    /// Ordered list of values; order is semantically significant
    List(Vec<Value>),
}

/// Errors from decoding a literal's lexical payload.
///
/// Decode failures are fatal to the walk that triggered them; malformed
/// text is never coerced to a default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Text is neither TRUE nor FALSE (case-insensitive)
    InvalidBoolean(String),
    /// Text is not a well-formed integer or decimal
    InvalidNumber(String),
    /// Payload is not wrapped in single quotes
    InvalidString(String),
    /// Inner date-time text is missing or unparseable
    InvalidTimestamp(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidBoolean(s) => write!(f, "Invalid boolean literal: {}", s),
            DecodeError::InvalidNumber(s) => write!(f, "Invalid numeric literal: {}", s),
            DecodeError::InvalidString(s) => write!(f, "Invalid string literal: {}", s),
            DecodeError::InvalidTimestamp(s) => write!(f, "Invalid timestamp literal: {}", s),
        }
    }
}

impl std::error::Error for DecodeError {}

impl Value {
    /// Decodes a boolean lexical form.
    ///
    /// Only case-insensitive `TRUE`/`FALSE` are accepted; anything else is
    /// a decode failure rather than a silent `false`.
    pub fn decode_boolean(text: &str) -> Result<Value, DecodeError> {
        if text.eq_ignore_ascii_case("true") {
            Ok(Value::Boolean(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Value::Boolean(false))
        } else {
            Err(DecodeError::InvalidBoolean(text.to_string()))
        }
    }

    /// Decodes a numeric lexical form.
    ///
    /// A decimal point or exponent marker routes to decimal decoding,
    /// anything else to signed-integer decoding. The decimal point is
    /// always `.`; there is no locale-sensitive parsing.
    pub fn decode_number(text: &str) -> Result<Value, DecodeError> {
        let digits = text.strip_prefix('+').unwrap_or(text);
        if digits.contains(['e', 'E']) {
            Decimal::from_scientific(digits)
                .map(Value::Decimal)
                .map_err(|_| DecodeError::InvalidNumber(text.to_string()))
        } else if digits.contains('.') {
            digits
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| DecodeError::InvalidNumber(text.to_string()))
        } else {
            digits
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| DecodeError::InvalidNumber(text.to_string()))
        }
    }

    /// Decodes a string lexical form.
    ///
    /// The payload includes its surrounding single quotes. Exactly one
    /// leading and one trailing quote are stripped, then every doubled
    /// quote (`''`) becomes one quote, the only escape mechanism.
    pub fn decode_string(text: &str) -> Result<Value, DecodeError> {
        let inner = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .ok_or_else(|| DecodeError::InvalidString(text.to_string()))?;
        Ok(Value::String(inner.replace("''", "'")))
    }

    /// Decodes a `TIMESTAMP '...'` lexical form.
    ///
    /// The inner payload sits between the first and the last quote and is
    /// parsed as an ISO-8601 date-time. A payload without an offset is
    /// interpreted as UTC.
    pub fn decode_timestamp(text: &str) -> Result<Value, DecodeError> {
        let inner = match (text.find('\''), text.rfind('\'')) {
            (Some(start), Some(end)) if end > start => &text[start + 1..end],
            _ => return Err(DecodeError::InvalidTimestamp(text.to_string())),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(inner) {
            return Ok(Value::Timestamp(dt));
        }
        NaiveDateTime::parse_from_str(inner, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Value::Timestamp(naive.and_utc().fixed_offset()))
            .map_err(|_| DecodeError::InvalidTimestamp(inner.to_string()))
    }

    /// Human-readable type name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow as a string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a list, if this is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

#[test]
fn test_decode_boolean() {
    assert_eq!(Value::decode_boolean("TRUE").unwrap(), Value::Boolean(true));
    assert_eq!(Value::decode_boolean("false").unwrap(), Value::Boolean(false));
    assert!(Value::decode_boolean("yes").is_err());
    assert!(Value::decode_boolean("").is_err());
}

#[test]
fn test_decode_number_routing() {
    assert_eq!(Value::decode_number("42").unwrap(), Value::Integer(42));
    assert_eq!(Value::decode_number("-7").unwrap(), Value::Integer(-7));
    assert_eq!(Value::decode_number("+7").unwrap(), Value::Integer(7));
    assert_eq!(
        Value::decode_number("4.2").unwrap(),
        Value::Decimal("4.2".parse().unwrap())
    );
    assert_eq!(Value::decode_number("4e2").unwrap(), Value::Decimal(400.into()));
    assert_eq!(
        Value::decode_number("1.5E2").unwrap(),
        Value::Decimal(150.into())
    );
    assert!(Value::decode_number("4.2.3").is_err());
    assert!(Value::decode_number("fourty").is_err());
}

#[test]
fn test_decode_string_unescaping() {
    assert_eq!(
        Value::decode_string("'it''s'").unwrap(),
        Value::String("it's".to_string())
    );
    assert_eq!(Value::decode_string("''").unwrap(), Value::String(String::new()));
    assert!(Value::decode_string("unquoted").is_err());
    assert!(Value::decode_string("'").is_err());
}

#[test]
fn test_decode_timestamp_forms() {
    let with_offset = Value::decode_timestamp("TIMESTAMP '2010-04-23T10:25:00-05:00'").unwrap();
    let zulu = Value::decode_timestamp("TIMESTAMP '2010-04-23T15:25:00Z'").unwrap();
    assert_eq!(with_offset, zulu);

    let bare = Value::decode_timestamp("TIMESTAMP '2010-04-23T15:25:00'").unwrap();
    assert_eq!(bare, zulu);

    assert!(Value::decode_timestamp("TIMESTAMP '2010-99-99T00:00:00'").is_err());
    assert!(Value::decode_timestamp("TIMESTAMP 2010-04-23").is_err());
}
