//! Turns a lexed token graph into an AST: statement/declaration dispatch
//! (this module and [`parser`]), expression parsing ([`expr`]), and the
//! tree shape itself ([`ast`]).

pub mod ast;
pub mod error;
pub mod expr;
pub mod parser;

pub use ast::AstNode;
pub use error::{ParseError, ParseResult};
pub use parser::Parser;

/// Parse an already-lexed token graph into its ordered top-level items.
pub fn parse(graph: &nvylang_lex::TokenGraph) -> ParseResult<Vec<AstNode>> {
    Parser::new(graph).parse_program()
}
