//! Expression parsing: two explicit stacks (`values`, `ops`) over a
//! pre-copied slice of tokens, per spec §4.4's shunting-yard algorithm.

use nvylang_util::{NodeType, Value};

use crate::ast::AstNode;
use crate::error::{ParseError, ParseResult};

/// A copied token: the parser never holds onto the token graph's own
/// handles while building an expression (spec §5: "the parser... copies
/// any Value it needs").
#[derive(Debug, Clone)]
pub struct ExprToken {
    pub ty: NodeType,
    pub value: Value,
}

/// Build the `VARIABLE/MEMBER/MEMBER/…` chain for a dotted name like
/// `a.b.c`.
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

struct ShuntingYard<'t> {
    tokens: &'t [ExprToken],
    i: usize,
    values: Vec<AstNode>,
    ops: Vec<NodeType>,
    expect_unary: bool,
}

impl<'t> ShuntingYard<'t> {
    fn new(tokens: &'t [ExprToken]) -> Self {
        Self {
            tokens,
            i: 0,
            values: Vec::new(),
            ops: Vec::new(),
            expect_unary: true,
        }
    }

    fn peek_ty(&self) -> Option<NodeType> {
        self.tokens.get(self.i).map(|t| t.ty)
    }

    /// Unary ops consume one value; binary ops pop the RHS first, then
    /// the LHS (spec §4.4 "Fold rule").
    fn fold(&mut self, op: NodeType) -> ParseResult<()> {
        if op.is_unary_op() {
            let operand = self.values.pop().ok_or_else(|| ParseError::InsufficientOperands {
                op: format!("{op}"),
            })?;
            self.values.push(AstNode::with_children(op, Value::Null, vec![operand]));
        } else {
            let rhs = self.values.pop().ok_or_else(|| ParseError::InsufficientOperands {
                op: format!("{op}"),
            })?;
            let lhs = self.values.pop().ok_or_else(|| ParseError::InsufficientOperands {
                op: format!("{op}"),
            })?;
            self.values.push(AstNode::with_children(op, Value::Null, vec![lhs, rhs]));
        }
        Ok(())
    }

    fn fold_until_open_paren(&mut self) -> ParseResult<()> {
        while let Some(&top) = self.ops.last() {
            if top == NodeType::OpenParens {
                self.ops.pop();
                return Ok(());
            }
            let op = self.ops.pop().unwrap();
            self.fold(op)?;
        }
        Err(ParseError::UnbalancedDelimiter { kind: ")" })
    }

    fn push_function_call(&mut self) -> ParseResult<()> {
        let name = self.tokens[self.i].value.clone();
        self.i += 1;
        if self.peek_ty() != Some(NodeType::OpenParens) {
            return Err(ParseError::UnbalancedDelimiter { kind: "(" });
        }
        self.i += 1;

        let mut depth = 0i32;
        let mut arg_start = self.i;
        let mut args = Vec::new();
        loop {
            match self.peek_ty() {
                Some(NodeType::OpenParens) => {
                    depth += 1;
                    self.i += 1;
                }
                Some(NodeType::CloseParens) if depth == 0 => {
                    if self.i > arg_start {
                        args.push(parse_expression_slice(&self.tokens[arg_start..self.i])?);
                    }
                    self.i += 1;
                    break;
                }
                Some(NodeType::CloseParens) => {
                    depth -= 1;
                    self.i += 1;
                }
                Some(NodeType::CommaDelimit) if depth == 0 => {
                    args.push(parse_expression_slice(&self.tokens[arg_start..self.i])?);
                    self.i += 1;
                    arg_start = self.i;
                }
                Some(_) => self.i += 1,
                None => return Err(ParseError::UnbalancedDelimiter { kind: "(" }),
            }
        }
        self.values.push(AstNode::with_children(NodeType::FunctionCall, name, args));
        self.expect_unary = false;
        Ok(())
    }

    /// `ARRAY TYPE_SYMBOL ARRAY_SIZE` — the rewriter's collapsed form of
    /// `TYPE[SIZE]` (spec §4.2(c)); built via [`crate::ast::make_array`].
    fn push_array_literal(&mut self) -> ParseResult<()> {
        self.i += 1; // past ARRAY
        let elem_ty = self.tokens.get(self.i).map(|t| t.ty).ok_or_else(|| ParseError::InsufficientOperands {
            op: "array".to_string(),
        })?;
        self.i += 1; // past the element type token
        let size_tok = self.tokens.get(self.i).cloned().ok_or_else(|| ParseError::InsufficientOperands {
            op: "array".to_string(),
        })?;
        self.i += 1; // past ARRAY_SIZE
        let size_node = AstNode::leaf(NodeType::ArraySize, size_tok.value);
        self.values.push(crate::ast::make_array(elem_ty, size_node));
        self.expect_unary = false;
        Ok(())
    }

    /// `ARRAY_ACCESS name ARRAY_INDEX` — the rewriter's collapsed form of
    /// `NAME[INDEX]`; built via [`crate::ast::make_array_access`].
    fn push_array_access(&mut self) -> ParseResult<()> {
        self.i += 1; // past ARRAY_ACCESS
        let name_tok = self.tokens.get(self.i).cloned().ok_or_else(|| ParseError::InsufficientOperands {
            op: "array".to_string(),
        })?;
        self.i += 1; // past the name token
        let index_tok = self.tokens.get(self.i).cloned().ok_or_else(|| ParseError::InsufficientOperands {
            op: "array".to_string(),
        })?;
        self.i += 1; // past ARRAY_INDEX
        let name_node = AstNode::leaf(name_tok.ty, name_tok.value);
        let index_node = AstNode::leaf(NodeType::ArrayIndex, index_tok.value);
        self.values.push(crate::ast::make_array_access(name_node, index_node));
        self.expect_unary = false;
        Ok(())
    }

    fn run(mut self) -> ParseResult<AstNode> {
        while let Some(tok) = self.tokens.get(self.i) {
            let ty = tok.ty;

            if ty == NodeType::Variable {
                if let Some(text) = tok.value.as_str() {
                    if text.contains('.') {
                        self.values.push(build_member_chain(text));
                        self.i += 1;
                        self.expect_unary = false;
                        continue;
                    }
                }
                self.values.push(AstNode::leaf(ty, tok.value.clone()));
                self.i += 1;
                self.expect_unary = false;
                continue;
            }

            if ty.is_literal() || matches!(ty, NodeType::PtrDeref | NodeType::FindAddress) {
                self.values.push(AstNode::leaf(ty, tok.value.clone()));
                self.i += 1;
                self.expect_unary = false;
                continue;
            }

            if ty == NodeType::FunctionCall {
                self.push_function_call()?;
                continue;
            }

            if ty == NodeType::Array {
                self.push_array_literal()?;
                continue;
            }

            if ty == NodeType::ArrayAccess {
                self.push_array_access()?;
                continue;
            }

            if ty == NodeType::OpenParens {
                self.ops.push(NodeType::OpenParens);
                self.i += 1;
                self.expect_unary = true;
                continue;
            }

            if ty == NodeType::CloseParens {
                self.fold_until_open_paren()?;
                self.i += 1;
                self.expect_unary = false;
                continue;
            }

            if let Some(prec) = ty.precedence() {
                let op = if self.expect_unary {
                    ty.unary_remap().unwrap_or(ty)
                } else {
                    ty
                };
                let op_prec = op.precedence().unwrap_or(prec);
                while let Some(&top) = self.ops.last() {
                    if top == NodeType::OpenParens {
                        break;
                    }
                    if top.precedence().unwrap_or(0) >= op_prec {
                        let popped = self.ops.pop().unwrap();
                        self.fold(popped)?;
                    } else {
                        break;
                    }
                }
                self.ops.push(op);
                self.i += 1;
                self.expect_unary = true;
                continue;
            }

            break;
        }

        while let Some(op) = self.ops.pop() {
            if op == NodeType::OpenParens {
                return Err(ParseError::UnbalancedDelimiter { kind: "(" });
            }
            self.fold(op)?;
        }

        self.values.pop().ok_or_else(|| ParseError::InsufficientOperands {
            op: "expression".to_string(),
        })
    }
}

pub fn parse_expression_slice(tokens: &[ExprToken]) -> ParseResult<AstNode> {
    ShuntingYard::new(tokens).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(ty: NodeType, value: Value) -> ExprToken {
        ExprToken { ty, value }
    }

    #[test]
    fn precedence_groups_mul_before_add() {
        // 1 + 2 * 3
        let tokens = vec![
            tok(NodeType::Int32, Value::Int32(1)),
            tok(NodeType::Add, Value::Null),
            tok(NodeType::Int32, Value::Int32(2)),
            tok(NodeType::Mul, Value::Null),
            tok(NodeType::Int32, Value::Int32(3)),
        ];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::Add);
        assert_eq!(ast.children[0].data, Value::Int32(1));
        assert_eq!(ast.children[1].ty, NodeType::Mul);
    }

    #[test]
    fn unary_minus_remaps_to_switch_sign() {
        let tokens = vec![tok(NodeType::Sub, Value::Null), tok(NodeType::Int32, Value::Int32(5))];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::SwitchSign);
        assert_eq!(ast.children.len(), 1);
    }

    #[test]
    fn address_of_and_deref_remap() {
        // &x then *p
        let addr = parse_expression_slice(&[
            tok(NodeType::BitAnd, Value::Null),
            tok(NodeType::Variable, Value::Str("x".into())),
        ])
        .unwrap();
        assert_eq!(addr.ty, NodeType::FindAddress);

        let deref = parse_expression_slice(&[
            tok(NodeType::Mul, Value::Null),
            tok(NodeType::Variable, Value::Str("p".into())),
        ])
        .unwrap();
        assert_eq!(deref.ty, NodeType::PtrDeref);
    }

    #[test]
    fn parentheses_override_precedence() {
        // (1 + 2) * 3
        let tokens = vec![
            tok(NodeType::OpenParens, Value::Null),
            tok(NodeType::Int32, Value::Int32(1)),
            tok(NodeType::Add, Value::Null),
            tok(NodeType::Int32, Value::Int32(2)),
            tok(NodeType::CloseParens, Value::Null),
            tok(NodeType::Mul, Value::Null),
            tok(NodeType::Int32, Value::Int32(3)),
        ];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::Mul);
        assert_eq!(ast.children[0].ty, NodeType::Add);
    }

    #[test]
    fn function_call_parses_comma_separated_arguments() {
        let tokens = vec![
            tok(NodeType::FunctionCall, Value::Str("add".into())),
            tok(NodeType::OpenParens, Value::Null),
            tok(NodeType::Int32, Value::Int32(1)),
            tok(NodeType::CommaDelimit, Value::Null),
            tok(NodeType::Int32, Value::Int32(2)),
            tok(NodeType::CloseParens, Value::Null),
        ];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::FunctionCall);
        assert_eq!(ast.children.len(), 2);
    }

    #[test]
    fn member_chain_builds_nested_member_nodes() {
        let tokens = vec![tok(NodeType::Variable, Value::Str("a.b.c".into()))];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::Variable);
        assert_eq!(ast.children[0].ty, NodeType::Member);
        assert_eq!(ast.children[0].children[0].ty, NodeType::Member);
    }

    #[test]
    fn array_literal_carries_element_type_and_size() {
        let tokens = vec![
            tok(NodeType::Array, Value::Null),
            tok(NodeType::Int32T, Value::Null),
            tok(NodeType::ArraySize, Value::Int32(5)),
        ];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::Array);
        assert_eq!(ast.data, Value::TypeRef(NodeType::Int32T));
        assert_eq!(ast.children[0].ty, NodeType::ArraySize);
        assert_eq!(ast.children[0].data, Value::Int32(5));
    }

    #[test]
    fn array_access_builds_name_and_index_children() {
        let tokens = vec![
            tok(NodeType::ArrayAccess, Value::Null),
            tok(NodeType::Variable, Value::Str("arr".into())),
            tok(NodeType::ArrayIndex, Value::Int32(0)),
        ];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::ArrayAccess);
        assert_eq!(ast.children[0].data, Value::Str("arr".to_string()));
        assert_eq!(ast.children[1].ty, NodeType::ArrayIndex);
        assert_eq!(ast.children[1].data, Value::Int32(0));
    }

    #[test]
    fn array_access_participates_in_a_surrounding_expression() {
        // arr[0] + 1
        let tokens = vec![
            tok(NodeType::ArrayAccess, Value::Null),
            tok(NodeType::Variable, Value::Str("arr".into())),
            tok(NodeType::ArrayIndex, Value::Int32(0)),
            tok(NodeType::Add, Value::Null),
            tok(NodeType::Int32, Value::Int32(1)),
        ];
        let ast = parse_expression_slice(&tokens).unwrap();
        assert_eq!(ast.ty, NodeType::Add);
        assert_eq!(ast.children[0].ty, NodeType::ArrayAccess);
    }

    #[test]
    fn missing_rhs_operand_is_an_error() {
        let tokens = vec![tok(NodeType::Int32, Value::Int32(1)), tok(NodeType::Add, Value::Null)];
        let err = parse_expression_slice(&tokens).unwrap_err();
        assert!(matches!(err, ParseError::InsufficientOperands { .. }));
    }
}
