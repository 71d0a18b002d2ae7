//! The fixed, case-sensitive keyword and single-character symbol tables
//! (spec §4.1).

use nvylang_util::NodeType;

/// Look up a maximal-run word against the keyword table. Returns `None`
/// for anything that is not a reserved word, leaving the caller to try
/// numeric-literal inference and finally fall back to `VARIABLE`.
pub fn lookup_keyword(word: &str) -> Option<NodeType> {
    use NodeType::*;
    Some(match word {
        "let" => Vardef,
        "true" => BoolT,
        "false" => BoolFa,
        "func" => Function,
        "if" => If,
        "else" => Else,
        "return" => Return,
        "for" => ForLoop,
        "while" => WhileLoop,
        "struct" => Struct,
        "int32" => Int32T,
        "int64" => Int64T,
        "unsigned" => Unsigned,
        "fp32" => Fp32T,
        "fp64" => Fp64T,
        "str" => StrT,
        "char" => CharT,
        "bool" => BoolT,
        "void" => VoidT,
        "type" => TypeT,
        "short" => Short,
        "numeric32" => Num32,
        "numeric64" => Num64,
        "unified" => Unified,
        "final" => Final,
        "static" => Static,
        "public" => Public,
        "private" => Private,
        "impl" => Impl,
        "constant" => Constant,
        "native" => Native,
        "ref" => Ref,
        _ => return None,
    })
}

/// Single-character symbols recognised without needing a maximal-run scan.
/// `"` and `'` are handled specially by the scanner (they open a
/// delimited literal) rather than mapped here.
pub fn lookup_symbol(ch: char) -> Option<NodeType> {
    use NodeType::*;
    Some(match ch {
        '(' => OpenParens,
        ')' => CloseParens,
        '[' => OpenBrkt,
        ']' => CloseBrkt,
        '{' => OpenBrace,
        '}' => CloseBrace,
        ';' => EndOfLine,
        ',' => CommaDelimit,
        '=' => Assign,
        '+' => Add,
        '-' => Sub,
        '*' => Mul,
        '/' => Div,
        '%' => Modulo,
        '&' => BitAnd,
        '|' => BitOr,
        '^' => BitXor,
        '~' => BitNegate,
        '!' => Not,
        '<' => Lt,
        '>' => Gt,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vardef_keyword_resolves() {
        assert_eq!(lookup_keyword("let"), Some(NodeType::Vardef));
    }

    #[test]
    fn unknown_word_is_not_a_keyword() {
        assert_eq!(lookup_keyword("counter"), None);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(lookup_keyword("Let"), None);
        assert_eq!(lookup_keyword("IF"), None);
    }

    #[test]
    fn reserved_numeric_type_keywords_resolve() {
        assert_eq!(lookup_keyword("unsigned"), Some(NodeType::Unsigned));
        assert_eq!(lookup_keyword("numeric32"), Some(NodeType::Num32));
        assert_eq!(lookup_keyword("numeric64"), Some(NodeType::Num64));
        assert_eq!(lookup_keyword("unified"), Some(NodeType::Unified));
        assert_eq!(lookup_keyword("short"), Some(NodeType::Short));
    }

    #[test]
    fn symbol_table_covers_arithmetic_and_delimiters() {
        assert_eq!(lookup_symbol('+'), Some(NodeType::Add));
        assert_eq!(lookup_symbol('{'), Some(NodeType::OpenBrace));
        assert_eq!(lookup_symbol('"'), None);
    }
}
