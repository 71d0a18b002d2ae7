//! Numeric literal inference (spec §4.1).
//!
//! Given a maximal alphanumeric run that is not a keyword, decide whether
//! it is a number and, if so, which `NodeType`/`Value` it lexes to.

use crate::error::LexError;
use nvylang_util::{NodeType, Value};

const NUMERIC_CHARSET: &str = "0123456789.eE+_FDL";

/// `Some(Err(..))` means the run looked numeric but failed to decode;
/// `None` means it is not a numeric literal at all (caller should fall
/// back to `VARIABLE`).
pub fn infer_numeric(word: &str, line: u32) -> Option<Result<(NodeType, Value), LexError>> {
    let has_digit = word.chars().any(|c| c.is_ascii_digit());
    let all_valid = word.chars().all(|c| NUMERIC_CHARSET.contains(c));
    if !has_digit || !all_valid {
        return None;
    }
    Some(decode(word, line))
}

fn decode(word: &str, line: u32) -> Result<(NodeType, Value), LexError> {
    let invalid = || LexError::InvalidNumber {
        text: word.to_string(),
        line,
    };

    let (body, forced_suffix) = match word.chars().last() {
        Some('F') => (&word[..word.len() - 1], Some(NodeType::Fp32)),
        Some('D') => (&word[..word.len() - 1], Some(NodeType::Fp64)),
        Some('L') => (&word[..word.len() - 1], Some(NodeType::Int64)),
        _ => (word, None),
    };
    let cleaned: String = body.chars().filter(|&c| c != '_').collect();
    let is_floating = cleaned.contains('.') || cleaned.contains('e') || cleaned.contains('E');

    match forced_suffix {
        Some(NodeType::Fp32) => {
            let v: f32 = cleaned.parse().map_err(|_| invalid())?;
            Ok((NodeType::Fp32, Value::F32(v)))
        }
        Some(NodeType::Fp64) => {
            let v: f64 = cleaned.parse().map_err(|_| invalid())?;
            Ok((NodeType::Fp64, Value::F64(v)))
        }
        Some(NodeType::Int64) => {
            let v: i64 = cleaned.parse().map_err(|_| invalid())?;
            Ok((NodeType::Int64, Value::Int64(v)))
        }
        _ if is_floating => {
            let v: f64 = cleaned.parse().map_err(|_| invalid())?;
            Ok((NodeType::Fp64, Value::F64(v)))
        }
        _ => {
            let v: i64 = cleaned.parse().map_err(|_| invalid())?;
            match i32::try_from(v) {
                Ok(narrow) => Ok((NodeType::Int32, Value::Int32(narrow))),
                Err(_) => Ok((NodeType::Int64, Value::Int64(v))),
            }
        }
    }
}
