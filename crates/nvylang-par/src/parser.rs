//! Recursive-descent statement/declaration parsing over a token graph,
//! calling into [`crate::expr`] for expressions (spec §4.4).

use nvylang_lex::{TokenGraph, TokenId};
use nvylang_util::{NodeType, Value};

use crate::ast::{self, AstNode};
use crate::error::{ParseError, ParseResult};
use crate::expr::{parse_expression_slice, ExprToken};

/// Copy tokens from `start` (inclusive) up to a terminator, without
/// consuming the terminator. If `enclosed`, the terminator is the
/// matching `CLOSEPARENS` (tracking nested parens) and it *is* consumed;
/// otherwise the terminator is `ENDOFLINE`, `CLOSEBRACE`, a start symbol,
/// or end of stream (spec §4.4 "Expression slicing").
fn get_expression(graph: &TokenGraph, start: TokenId, enclosed: bool) -> (Vec<ExprToken>, TokenId) {
    let mut tokens = Vec::new();
    let mut cur = start;
    let mut depth = 0i32;
    loop {
        let ty = graph.ty(cur);
        if enclosed {
            if ty == NodeType::CloseParens && depth == 0 {
                let after = graph.next(cur).unwrap_or(cur);
                return (tokens, after);
            }
            if ty == NodeType::OpenParens {
                depth += 1;
            } else if ty == NodeType::CloseParens {
                depth -= 1;
            }
        } else if ty == NodeType::EndOfLine
            || ty == NodeType::CloseBrace
            || ty == NodeType::EndOfStream
            || ty.is_start_symbol()
        {
            return (tokens, cur);
        }
        tokens.push(ExprToken {
            ty,
            value: graph.value(cur).clone(),
        });
        match graph.next(cur) {
            Some(n) => cur = n,
            None => return (tokens, cur),
        }
    }
}

fn build_member_chain(dotted: &str) -> AstNode {
    let mut parts = dotted.split('.');
    let head = parts.next().unwrap_or(dotted);
    let mut node = AstNode::leaf(NodeType::Variable, Value::Str(head.to_string()));
    let mut cursor = &mut node;
    for part in parts {
        cursor.push_child(AstNode::leaf(NodeType::Member, Value::Str(part.to_string())));
        cursor = cursor.children.last_mut().unwrap();
    }
    node
}

pub struct Parser<'a> {
    graph: &'a TokenGraph,
    cursor: TokenId,
}

impl<'a> Parser<'a> {
    pub fn new(graph: &'a TokenGraph) -> Self {
        let cursor = graph.next(graph.head()).unwrap_or(graph.head());
        Self { graph, cursor }
    }

    fn current_ty(&self) -> NodeType {
        self.graph.ty(self.cursor)
    }

    fn advance(&mut self) {
        if let Some(n) = self.graph.next(self.cursor) {
            self.cursor = n;
        }
    }

    fn slice_expression(&mut self, enclosed: bool) -> ParseResult<AstNode> {
        let (tokens, after) = get_expression(self.graph, self.cursor, enclosed);
        self.cursor = after;
        parse_expression_slice(&tokens)
    }

    /// Parse the whole token graph into the ordered sequence of top-level
    /// AST nodes (spec §4.4 contract).
    pub fn parse_program(&mut self) -> ParseResult<Vec<AstNode>> {
        let mut items = Vec::new();
        while self.current_ty() != NodeType::EndOfStream {
            let node = self.parse_top_level()?;
            if self.current_ty() == NodeType::EndOfLine {
                self.advance();
            }
            items.push(node);
        }
        Ok(items)
    }

    fn peek_is_assign(&self) -> bool {
        self.graph
            .next(self.cursor)
            .map(|n| self.graph.ty(n) == NodeType::Assign)
            .unwrap_or(false)
    }

    fn looks_like_deref_assign(&self) -> bool {
        if self.current_ty() != NodeType::Mul {
            return false;
        }
        let Some(var) = self.graph.next(self.cursor) else { return false };
        if self.graph.ty(var) != NodeType::Variable {
            return false;
        }
        self.graph
            .next(var)
            .map(|eq| self.graph.ty(eq) == NodeType::Assign)
            .unwrap_or(false)
    }

    /// `ARRAY_ACCESS name ARRAY_INDEX =` — the rewriter always collapses
    /// `NAME[INDEX]` to this three-token run, so `ArrayAccess` at statement
    /// start is only ever followed by `=` when it's an assignment target.
    fn looks_like_array_assign(&self) -> bool {
        if self.current_ty() != NodeType::ArrayAccess {
            return false;
        }
        let Some(name) = self.graph.next(self.cursor) else { return false };
        let Some(index) = self.graph.next(name) else { return false };
        self.graph
            .next(index)
            .map(|eq| self.graph.ty(eq) == NodeType::Assign)
            .unwrap_or(false)
    }

    fn parse_top_level(&mut self) -> ParseResult<AstNode> {
        let mut modifiers = Vec::new();
        while matches!(
            self.current_ty(),
            NodeType::Native | NodeType::Public | NodeType::Private | NodeType::Final | NodeType::Constant
        ) {
            modifiers.push(self.current_ty());
            self.advance();
        }
        let is_native = modifiers.contains(&NodeType::Native);

        let mut node = match self.current_ty() {
            NodeType::Function => self.parse_function(is_native)?,
            NodeType::Vardef => self.parse_vardef()?,
            NodeType::If => self.parse_if()?,
            NodeType::ForLoop => self.parse_for_loop()?,
            NodeType::WhileLoop => self.parse_while_loop()?,
            NodeType::Return => self.parse_return()?,
            NodeType::Struct => self.parse_struct()?,
            NodeType::Variable if self.peek_is_assign() => self.parse_assign()?,
            _ if self.looks_like_deref_assign() => self.parse_assign()?,
            _ if self.looks_like_array_assign() => self.parse_assign()?,
            other => {
                return Err(ParseError::UnknownStatement {
                    token: format!("{other}"),
                })
            }
        };

        for m in modifiers.into_iter().rev() {
            node = AstNode::with_children(m, Value::Null, vec![node]);
        }
        Ok(node)
    }

    /// `func NAME ( [TYPE NAME, …] ) -> TYPE { body }`.
    fn parse_function(&mut self, is_native: bool) -> ParseResult<AstNode> {
        self.advance(); // past FUNCTION
        let name = self.graph.value(self.cursor).clone();
        self.advance(); // past NAME
        self.advance(); // past OPENPARENS

        let mut params = ast::make_function_params();
        while self.current_ty() != NodeType::CloseParens {
            let param_ty = self.current_ty();
            self.advance();
            let param_name = self.graph.value(self.cursor).clone();
            self.advance();
            params.push_child(AstNode::leaf(param_ty, param_name));
            if self.current_ty() == NodeType::CommaDelimit {
                self.advance();
            }
        }

        // "->" lexes as SUB then GT (no dedicated arrow token); three
        // advances land on the return type past CLOSEPARENS.
        self.advance();
        self.advance();
        self.advance();
        let ret_ty = self.current_ty();
        self.advance();
        let ret = AstNode::with_children(NodeType::FunctionReturn, Value::Null, vec![AstNode::leaf(ret_ty, Value::Null)]);

        let body = if is_native {
            ast::make_function_body()
        } else {
            self.advance(); // past OPENBRACE
            self.parse_body_nodes()?
        };

        Ok(ast::make_function(name, params, ret, body))
    }

    /// Consumes statements until (and including) the matching
    /// `CLOSEBRACE`. Each statement that is itself brace-delimited
    /// (`IF`/`FORLOOP`/`WHILELOOP`) recurses into its own call of this
    /// function, so by the time control returns here the cursor already
    /// sits past that nested close brace.
    fn parse_body_nodes(&mut self) -> ParseResult<AstNode> {
        let mut body = ast::make_function_body();
        loop {
            match self.current_ty() {
                NodeType::CloseBrace => {
                    self.advance();
                    break;
                }
                NodeType::EndOfLine => self.advance(),
                NodeType::EndOfStream => return Err(ParseError::UnbalancedDelimiter { kind: "{" }),
                _ => {
                    let stmt = self.parse_top_level()?;
                    if self.current_ty() == NodeType::EndOfLine {
                        self.advance();
                    }
                    ast::add_body_node(&mut body, stmt);
                }
            }
        }
        Ok(body)
    }

    /// `if ( <expr> ) { body } [else (if ... | { body })]`.
    fn parse_if(&mut self) -> ParseResult<AstNode> {
        self.advance(); // past IF
        self.advance(); // past OPENPARENS
        let condition_expr = self.slice_expression(true)?;
        let condition = AstNode::with_children(NodeType::Condition, Value::Null, vec![condition_expr]);

        self.advance(); // past OPENBRACE
        let body = self.parse_body_nodes()?;

        let else_branch = if self.current_ty() == NodeType::Else {
            self.advance();
            if self.current_ty() == NodeType::If {
                let nested = self.parse_if()?;
                AstNode::with_children(NodeType::Else, Value::Null, vec![nested])
            } else {
                self.advance(); // past OPENBRACE
                let else_body = self.parse_body_nodes()?;
                AstNode::with_children(NodeType::Else, Value::Null, vec![else_body])
            }
        } else {
            AstNode::new(NodeType::Else, Value::Null)
        };

        Ok(ast::make_if(condition, body, else_branch))
    }

    /// `for ( let NAME = <expr> ; <cond> ; <iter> ) { body }`.
    fn parse_for_loop(&mut self) -> ParseResult<AstNode> {
        self.advance(); // past FORLOOP
        self.advance(); // past OPENPARENS

        let def_inner = self.parse_vardef_inner()?;
        self.advance(); // past the first ENDOFLINE
        let def = AstNode::with_children(NodeType::LoopDef, Value::Null, vec![def_inner]);

        let cond_expr = self.slice_expression(false)?;
        self.advance(); // past the second ENDOFLINE
        let cond = AstNode::with_children(NodeType::LoopCond, Value::Null, vec![cond_expr]);

        let iter_expr = self.slice_expression(true)?; // consumes the matching CLOSEPARENS
        let iteration = AstNode::with_children(NodeType::LoopIteration, Value::Null, vec![iter_expr]);

        self.advance(); // past OPENBRACE
        let body = self.parse_body_nodes()?;

        Ok(ast::make_for_loop(def, cond, iteration, body))
    }

    /// `while ( <expr> ) { body }`.
    fn parse_while_loop(&mut self) -> ParseResult<AstNode> {
        self.advance(); // past WHILELOOP
        self.advance(); // past OPENPARENS
        let cond_expr = self.slice_expression(true)?;
        let cond = AstNode::with_children(NodeType::LoopCond, Value::Null, vec![cond_expr]);
        self.advance(); // past OPENBRACE
        let body = self.parse_body_nodes()?;
        Ok(AstNode::with_children(NodeType::WhileLoop, Value::Null, vec![cond, body]))
    }

    fn parse_vardef_inner(&mut self) -> ParseResult<AstNode> {
        self.advance(); // past VARDEF (let)
        let name = self.graph.value(self.cursor).clone();
        self.advance(); // past NAME
        self.advance(); // past ASSIGN
        let init = self.slice_expression(false)?;
        Ok(ast::make_vardef(name, init))
    }

    /// `let NAME = <expr> ;`.
    fn parse_vardef(&mut self) -> ParseResult<AstNode> {
        self.parse_vardef_inner()
    }

    /// `RETURN <expr> ;`.
    fn parse_return(&mut self) -> ParseResult<AstNode> {
        self.advance(); // past RETURN
        let expr = self.slice_expression(false)?;
        Ok(ast::make_return(expr))
    }

    fn parse_assign_lhs(&mut self) -> ParseResult<AstNode> {
        if self.current_ty() == NodeType::Mul {
            self.advance();
            let inner = self.parse_assign_lhs()?;
            return Ok(AstNode::with_children(NodeType::PtrDeref, Value::Null, vec![inner]));
        }
        if self.current_ty() == NodeType::ArrayAccess {
            self.advance(); // past ARRAY_ACCESS
            let name_ty = self.current_ty();
            let name_value = self.graph.value(self.cursor).clone();
            self.advance(); // past the name token
            let index_value = self.graph.value(self.cursor).clone();
            self.advance(); // past ARRAY_INDEX
            let name_node = AstNode::leaf(name_ty, name_value);
            let index_node = AstNode::leaf(NodeType::ArrayIndex, index_value);
            return Ok(ast::make_array_access(name_node, index_node));
        }
        let ty = self.current_ty();
        let value = self.graph.value(self.cursor).clone();
        self.advance();
        if ty == NodeType::Variable {
            if let Some(text) = value.as_str() {
                if text.contains('.') {
                    return Ok(build_member_chain(text));
                }
            }
        }
        Ok(AstNode::leaf(ty, value))
    }

    /// `NAME = <expr> ;` or `*NAME = <expr> ;`.
    fn parse_assign(&mut self) -> ParseResult<AstNode> {
        let lhs = self.parse_assign_lhs()?;
        self.advance(); // past ASSIGN
        let rhs = self.slice_expression(false)?;
        Ok(AstNode::with_children(NodeType::Assign, Value::Null, vec![lhs, rhs]))
    }

    fn parse_struct(&mut self) -> ParseResult<AstNode> {
        self.advance(); // past STRUCT
        let name = self.graph.value(self.cursor).clone();
        self.advance(); // past NAME
        self.advance(); // past OPENBRACE
        let mut node = AstNode::new(NodeType::Struct, name);
        loop {
            match self.current_ty() {
                NodeType::CloseBrace => {
                    self.advance();
                    break;
                }
                NodeType::EndOfLine => self.advance(),
                NodeType::EndOfStream => return Err(ParseError::UnbalancedDelimiter { kind: "{" }),
                _ => {
                    let field_ty = self.current_ty();
                    let field_name = self.graph.value(self.cursor).clone();
                    self.advance();
                    ast::add_body_node(&mut node, AstNode::leaf(field_ty, field_name));
                }
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvylang_lex::lex_module;
    use nvylang_lex::MangleTable;

    fn parse(lines: &[&str]) -> Vec<AstNode> {
        let lines: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        let mut table = MangleTable::new();
        let graph = lex_module(&lines, "m", &mut table).unwrap();
        Parser::new(&graph).parse_program().unwrap()
    }

    #[test]
    fn scenario_one_main_returns_a_constant() {
        let items = parse(&["func main() -> int32 { return 12; }"]);
        assert_eq!(items.len(), 1);
        let func = &items[0];
        assert_eq!(func.ty, NodeType::Function);
        assert_eq!(func.children.len(), 3);
        assert_eq!(func.children[1].children[0].ty, NodeType::Int32T);
        let body = &func.children[2];
        assert_eq!(body.children[0].ty, NodeType::Return);
        assert_eq!(body.children[0].children[0].data, Value::Int32(12));
    }

    #[test]
    fn scenario_two_vardef_rhs_is_add_of_mul() {
        let items = parse(&["let x = 1 + 2 * 3;"]);
        let vardef = &items[0];
        assert_eq!(vardef.ty, NodeType::Vardef);
        let rhs = &vardef.children[0];
        assert_eq!(rhs.ty, NodeType::Add);
        assert_eq!(rhs.children[1].ty, NodeType::Mul);
    }

    #[test]
    fn scenario_four_address_of_and_deref() {
        let items = parse(&["let p = &x;", "let v = *p;"]);
        assert_eq!(items[0].children[0].ty, NodeType::FindAddress);
        assert_eq!(items[1].children[0].ty, NodeType::PtrDeref);
    }

    #[test]
    fn scenario_five_for_loop_layout() {
        let items = parse(&["for (let i = 0; i < 10; i + 1) { }"]);
        let for_loop = &items[0];
        assert_eq!(for_loop.ty, NodeType::ForLoop);
        assert_eq!(for_loop.children.len(), 4);
        assert_eq!(for_loop.children[0].ty, NodeType::LoopDef);
        assert_eq!(for_loop.children[1].children[0].ty, NodeType::Lt);
        assert_eq!(for_loop.children[2].children[0].ty, NodeType::Add);
    }

    #[test]
    fn if_else_chains_into_nested_if() {
        let items = parse(&["if (x < 1) { return 1; } else if (x < 2) { return 2; }"]);
        let if_node = &items[0];
        assert_eq!(if_node.ty, NodeType::If);
        let else_branch = &if_node.children[2];
        assert_eq!(else_branch.children[0].ty, NodeType::If);
    }

    #[test]
    fn function_with_params_records_name_and_type_per_param() {
        let items = parse(&["func add(int32 a, int32 b) -> int32 { return a + b; }"]);
        let params = &items[0].children[0];
        assert_eq!(params.children.len(), 2);
        assert_eq!(params.children[0].ty, NodeType::Int32T);
        assert_eq!(params.children[0].data, Value::Str("a".to_string()));
    }

    #[test]
    fn native_function_has_no_body_statements() {
        let items = parse(&["native func puts(str s) -> int32;"]);
        let func = &items[0].children[0];
        assert_eq!(func.ty, NodeType::Function);
        assert!(func.children[2].children.is_empty());
    }

    #[test]
    fn array_vardef_builds_array_node_with_element_type_and_size() {
        let items = parse(&["let arr = int32[5];"]);
        let vardef = &items[0];
        assert_eq!(vardef.ty, NodeType::Vardef);
        let init = &vardef.children[0];
        assert_eq!(init.ty, NodeType::Array);
        assert_eq!(init.data, Value::TypeRef(NodeType::Int32T));
        assert_eq!(init.children[0].ty, NodeType::ArraySize);
        assert_eq!(init.children[0].data, Value::Int32(5));
    }

    #[test]
    fn array_index_read_builds_array_access_node() {
        let items = parse(&["let x = arr[0];"]);
        let init = &items[0].children[0];
        assert_eq!(init.ty, NodeType::ArrayAccess);
        assert_eq!(init.children[0].data, Value::Str("arr".to_string()));
        assert_eq!(init.children[1].ty, NodeType::ArrayIndex);
        assert_eq!(init.children[1].data, Value::Int32(0));
    }

    #[test]
    fn array_index_assignment_builds_array_access_lhs() {
        let items = parse(&["arr[0] = 5;"]);
        let assign = &items[0];
        assert_eq!(assign.ty, NodeType::Assign);
        assert_eq!(assign.children[0].ty, NodeType::ArrayAccess);
        assert_eq!(assign.children[1].data, Value::Int32(5));
    }

    #[test]
    fn deref_assignment_builds_ptrderef_lhs() {
        let items = parse(&["*p = 5;"]);
        let assign = &items[0];
        assert_eq!(assign.ty, NodeType::Assign);
        assert_eq!(assign.children[0].ty, NodeType::PtrDeref);
    }
}
