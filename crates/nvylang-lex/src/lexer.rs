//! Scans an ordered sequence of source lines into a [`TokenGraph`]
//! (spec §4.1). Pure function of its input: no shared state, no I/O.

use nvylang_util::{NodeType, Value};

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::keyword::{lookup_keyword, lookup_symbol};
use crate::number::infer_numeric;
use crate::token::TokenGraph;

/// Multi-character operators that a lone [`lookup_symbol`] hit must be
/// widened into by peeking one character ahead.
fn widen_operator(ch: char, next: char) -> Option<(NodeType, usize)> {
    use NodeType::*;
    Some(match (ch, next) {
        ('<', '=') => (Lte, 2),
        ('>', '=') => (Gte, 2),
        ('=', '=') => (Eq, 2),
        ('!', '=') => (Neq, 2),
        ('&', '&') => (LogicAnd, 2),
        ('|', '|') => (LogicOr, 2),
        ('^', '^') => (LogicXor, 2),
        ('<', '<') => (ArithLeftShift, 2),
        _ => return None,
    })
}

/// `>>` is ambiguous with `>>>` (arithmetic vs logical right shift); check
/// three characters before falling back to two.
fn widen_right_shift(cursor: &Cursor) -> Option<(NodeType, usize)> {
    if cursor.current_char() == '>' && cursor.peek_char(1) == '>' {
        if cursor.peek_char(2) == '>' {
            Some((NodeType::LogicRightShift, 3))
        } else {
            Some((NodeType::ArithRightShift, 2))
        }
    } else {
        None
    }
}

/// Scan one line into `graph`, appending tokens before its tail.
pub fn lex_line(graph: &mut TokenGraph, line_text: &str, line: u32) -> Result<(), LexError> {
    let mut cursor = Cursor::new(line_text);

    loop {
        cursor.skip_whitespace();
        if cursor.is_at_end() {
            break;
        }
        let ch = cursor.current_char();

        if ch == '"' {
            let start = cursor.position();
            cursor.advance();
            while !cursor.is_at_end() {
                let c = cursor.current_char();
                if c == '\\' {
                    cursor.advance();
                    if !cursor.is_at_end() {
                        cursor.advance();
                    }
                    continue;
                }
                if c == '"' {
                    cursor.advance();
                    let text = cursor.slice_from(start);
                    graph.push_before_tail(NodeType::Str, Value::Str(text.to_string()));
                    break;
                }
                cursor.advance();
            }
            if cursor.is_at_end() && cursor.slice_from(start).chars().last() != Some('"') {
                return Err(LexError::UnterminatedString { line });
            }
            continue;
        }

        if ch == '\'' {
            let start = cursor.position();
            cursor.advance();
            while !cursor.is_at_end() && cursor.current_char() != '\'' {
                cursor.advance();
            }
            if cursor.is_at_end() {
                return Err(LexError::UnterminatedString { line });
            }
            cursor.advance();
            let text = cursor.slice_from(start);
            graph.push_before_tail(NodeType::Char, Value::Str(text.to_string()));
            continue;
        }

        if let Some((ty, width)) = widen_right_shift(&cursor) {
            cursor.advance_n(width);
            graph.push_before_tail(ty, Value::Null);
            continue;
        }
        if let Some((ty, width)) = widen_operator(ch, cursor.peek_char(1)) {
            cursor.advance_n(width);
            graph.push_before_tail(ty, Value::Null);
            continue;
        }
        if let Some(ty) = lookup_symbol(ch) {
            cursor.advance();
            graph.push_before_tail(ty, Value::Null);
            continue;
        }

        if ch.is_alphanumeric() || ch == '_' {
            let start = cursor.position();
            while !cursor.is_at_end() {
                let c = cursor.current_char();
                if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                    cursor.advance();
                } else {
                    break;
                }
            }
            let word = cursor.slice_from(start);
            if let Some(ty) = lookup_keyword(word) {
                graph.push_before_tail(ty, Value::Null);
            } else if let Some(numeric) = infer_numeric(word, line) {
                let (ty, value) = numeric?;
                graph.push_before_tail(ty, value);
            } else {
                graph.push_before_tail(NodeType::Variable, Value::Str(word.to_string()));
            }
            continue;
        }

        // Unknown-symbol fallback: emit the single character as a VARIABLE.
        let start = cursor.position();
        cursor.advance();
        let text = cursor.slice_from(start);
        graph.push_before_tail(NodeType::Variable, Value::Str(text.to_string()));
    }

    Ok(())
}

/// Lex an entire ordered sequence of source lines into one graph.
pub fn lex(lines: &[String]) -> Result<TokenGraph, LexError> {
    let mut graph = TokenGraph::new();
    for (idx, line_text) in lines.iter().enumerate() {
        lex_line(&mut graph, line_text, (idx + 1) as u32)?;
    }
    graph.check_invariants();
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(graph: &TokenGraph) -> Vec<NodeType> {
        let mut out = Vec::new();
        let mut cur = Some(graph.head());
        while let Some(id) = cur {
            out.push(graph.ty(id));
            cur = graph.next(id);
        }
        out
    }

    #[test]
    fn lexes_a_return_statement() {
        let graph = lex(&["return 12;".to_string()]).unwrap();
        assert_eq!(
            types(&graph),
            vec![
                NodeType::Program,
                NodeType::Return,
                NodeType::Int32,
                NodeType::EndOfLine,
                NodeType::EndOfStream,
            ]
        );
    }

    #[test]
    fn lexes_string_literal_with_delimiters() {
        let graph = lex(&["let s = \"hi\";".to_string()]).unwrap();
        let cur = graph.forward_type(graph.head(), NodeType::Str).unwrap();
        assert_eq!(*graph.value(cur), Value::Str("\"hi\"".to_string()));
    }

    #[test]
    fn lexes_compound_comparison_operators() {
        let graph = lex(&["a <= b".to_string()]).unwrap();
        assert!(types(&graph).contains(&NodeType::Lte));
    }

    #[test]
    fn distinguishes_arith_and_logic_right_shift() {
        let a = lex(&["a >> b".to_string()]).unwrap();
        assert!(types(&a).contains(&NodeType::ArithRightShift));
        let b = lex(&["a >>> b".to_string()]).unwrap();
        assert!(types(&b).contains(&NodeType::LogicRightShift));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = lex(&["let s = \"oops".to_string()]).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { line: 1 }));
    }

    #[test]
    fn invalid_number_is_an_error() {
        let err = lex(&["let x = 1.2.3;".to_string()]).unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { .. }));
    }

    #[test]
    fn multi_line_program_keeps_one_program_head_and_endofstream_tail() {
        let graph = lex(&[
            "func main() -> int32 {".to_string(),
            "return 12;".to_string(),
            "}".to_string(),
        ])
        .unwrap();
        assert_eq!(graph.ty(graph.head()), NodeType::Program);
        assert_eq!(graph.ty(graph.tail()), NodeType::EndOfStream);
    }
}
