use adguard_exporter_domain::AnswerRecord;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

const HEADER_FIELD: &str = "hdr";
const RRTYPE_FIELD: &str = "rrtype";

/// Why a structured answer could not be mapped to a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    NotAMap,
    MissingHeader,
    HeaderNotAMap,
    MissingTypeCode,
    NonNumericTypeCode,
    TypeCodeOutOfRange,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            UnresolvedReason::NotAMap => "record is not a map",
            UnresolvedReason::MissingHeader => "missing header",
            UnresolvedReason::HeaderNotAMap => "header is not a map",
            UnresolvedReason::MissingTypeCode => "missing record type code",
            UnresolvedReason::NonNumericTypeCode => "record type code is not an integer",
            UnresolvedReason::TypeCodeOutOfRange => "record type code out of range",
        };
        f.write_str(reason)
    }
}

/// Maps one answer record to its canonical type tag.
///
/// Plain tags pass through untouched. Structured records are read along the
/// fixed path `Hdr.Rrtype` (keys matched case-insensitively) and yield
/// `TYPE<code>`; any other shape is rejected with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordTypeResolver;

impl RecordTypeResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve<'a>(&self, answer: &'a AnswerRecord) -> Option<Cow<'a, str>> {
        match answer {
            AnswerRecord::PlainType(tag) => Some(Cow::Borrowed(tag.as_str())),
            AnswerRecord::StructuredRecord(value) => match structured_type_code(value) {
                Ok(code) => Some(Cow::Owned(format!("TYPE{}", code))),
                Err(reason) => {
                    warn!(%reason, value = %value, "Could not resolve answer record type");
                    None
                }
            },
        }
    }
}

fn structured_type_code(value: &Value) -> Result<u16, UnresolvedReason> {
    let record = value.as_object().ok_or(UnresolvedReason::NotAMap)?;
    let header = field(record, HEADER_FIELD).ok_or(UnresolvedReason::MissingHeader)?;
    let header = header.as_object().ok_or(UnresolvedReason::HeaderNotAMap)?;
    let code = field(header, RRTYPE_FIELD).ok_or(UnresolvedReason::MissingTypeCode)?;
    type_code(code)
}

fn field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn type_code(value: &Value) -> Result<u16, UnresolvedReason> {
    let Value::Number(number) = value else {
        return Err(UnresolvedReason::NonNumericTypeCode);
    };

    let code = if let Some(code) = number.as_u64() {
        code
    } else if number.is_i64() {
        return Err(UnresolvedReason::TypeCodeOutOfRange);
    } else {
        // Go's encoder may render integral codes as floats.
        let float = number.as_f64().ok_or(UnresolvedReason::NonNumericTypeCode)?;
        if float.fract() != 0.0 {
            return Err(UnresolvedReason::NonNumericTypeCode);
        }
        if float < 0.0 || float > f64::from(u16::MAX) {
            return Err(UnresolvedReason::TypeCodeOutOfRange);
        }
        float as u64
    };

    u16::try_from(code).map_err(|_| UnresolvedReason::TypeCodeOutOfRange)
}
