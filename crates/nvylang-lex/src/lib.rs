//! Turns source text into a ready-to-parse token graph: scanning (spec
//! §4.1) followed by the pre-parse rewriter's three passes (spec §4.2).

pub mod cursor;
pub mod error;
pub mod keyword;
pub mod lexer;
pub mod number;
pub mod rewrite;
pub mod token;

pub use error::{LexError, LexResult};
pub use rewrite::MangleTable;
pub use token::{TokenGraph, TokenId};

/// Run the whole front door of the pipeline: comment stripping, function
/// mangling, scanning, then token-graph rewriting. `module` names the
/// compilation unit for mangling purposes.
pub fn lex_module(lines: &[String], module: &str, mangle_table: &mut MangleTable) -> LexResult<TokenGraph> {
    let uncommented: Vec<String> = lines
        .iter()
        .map(|l| rewrite::strip_inline_comments(l).to_string())
        .collect();
    let mangled_lines = rewrite::mangle_functions(&uncommented, module, mangle_table);
    let mut graph = lexer::lex(&mangled_lines)?;
    rewrite::resolve_special_symbols(&mut graph);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pipeline_mangles_rewrites_and_lexes() {
        let mut table = MangleTable::new();
        let lines = vec![
            "func add(int32 a, int32 b) -> int32 { // sums".to_string(),
            "return a + b;".to_string(),
            "}".to_string(),
        ];
        let graph = lex_module(&lines, "nvio", &mut table).unwrap();
        graph.check_invariants();
        assert_eq!(table.mangled_for("add"), Some("_nvylang_nvio_3add_4"));
    }
}
