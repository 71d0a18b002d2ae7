//! The parsed tree (spec §3 "AST node") and the factory layer the parser
//! uses to build well-shaped subtrees with fixed child indices (spec §4.3).

use nvylang_util::{NodeType, Value};

/// One node of the parsed tree. Every stage after the parser routes on
/// `ty` with a single `match` rather than on a per-kind Rust type, so the
/// emitter's dispatch table (spec §4.5) and the parser's construction
/// helpers share one shape.
#[derive(Debug, Clone)]
pub struct AstNode {
    pub ty: NodeType,
    pub data: Value,
    pub children: Vec<AstNode>,
    /// Reserved for future interned sharing (spec §3); always `true` today
    /// since nothing shares subtrees yet.
    pub owned: bool,
}

impl AstNode {
    pub fn new(ty: NodeType, data: Value) -> Self {
        Self {
            ty,
            data,
            children: Vec::new(),
            owned: true,
        }
    }

    pub fn leaf(ty: NodeType, data: Value) -> Self {
        Self::new(ty, data)
    }

    pub fn with_children(ty: NodeType, data: Value, children: Vec<AstNode>) -> Self {
        Self {
            ty,
            data,
            children,
            owned: true,
        }
    }

    pub fn push_child(&mut self, child: AstNode) {
        self.children.push(child);
    }

    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.children.get(index)
    }
}

/// `FUNCTION[0: FUNCTIONPARAM, 1: FUNCTIONRETURN, 2: FUNCTIONBODY]`.
pub fn make_function(name: Value, params: AstNode, ret: AstNode, body: AstNode) -> AstNode {
    AstNode::with_children(NodeType::Function, name, vec![params, ret, body])
}

/// `IF[0: CONDITION, 1: FUNCTIONBODY, 2: ELSE]`.
pub fn make_if(condition: AstNode, body: AstNode, else_branch: AstNode) -> AstNode {
    AstNode::with_children(NodeType::If, Value::Null, vec![condition, body, else_branch])
}

/// `FORLOOP[0: LOOPDEF, 1: LOOPCOND, 2: LOOPITERATION, 3: FUNCTIONBODY]`.
pub fn make_for_loop(def: AstNode, cond: AstNode, iter: AstNode, body: AstNode) -> AstNode {
    AstNode::with_children(NodeType::ForLoop, Value::Null, vec![def, cond, iter, body])
}

/// `VARDEF[0: initialiser expression]`.
pub fn make_vardef(name: Value, initializer: AstNode) -> AstNode {
    AstNode::with_children(NodeType::Vardef, name, vec![initializer])
}

/// `RETURN[0: returned expression]`.
pub fn make_return(value: AstNode) -> AstNode {
    AstNode::with_children(NodeType::Return, Value::Null, vec![value])
}

/// `CAST[0: target type or struct name]`.
pub fn make_cast(target: AstNode) -> AstNode {
    AstNode::with_children(NodeType::Cast, Value::Null, vec![target])
}

/// `ARRAY[0: ARRAY_SIZE]`, with the element type carried on the node's own
/// `data` (spec §3: `Value` holds a `NodeType` "used to store... array
/// element type" since there is no dedicated child slot for it).
pub fn make_array(elem_ty: NodeType, size: AstNode) -> AstNode {
    AstNode::with_children(NodeType::Array, Value::TypeRef(elem_ty), vec![size])
}

/// `ARRAY_ACCESS[0: ARRAY name, 1: ARRAY_INDEX]`.
pub fn make_array_access(name: AstNode, index: AstNode) -> AstNode {
    AstNode::with_children(NodeType::ArrayAccess, Value::Null, vec![name, index])
}

pub fn make_function_body() -> AstNode {
    AstNode::new(NodeType::FunctionBody, Value::Null)
}

pub fn make_function_params() -> AstNode {
    AstNode::new(NodeType::FunctionParam, Value::Null)
}

/// Routes a freshly parsed statement into the body slot of its parent.
///
/// The parser only ever calls this with a `FunctionBody` parent (function
/// and block bodies, built up statement by statement) or a `Struct`/
/// `Vardef` parent (field and initializer lists, which have no body
/// wrapper to route through). Those parents all just append; there is no
/// per-kind routing to do once the unreachable `Function`/`If`/`ForLoop`/
/// `WhileLoop` cases — which named their *container* nodes rather than the
/// body nodes the parser actually builds and hands in here — are removed.
pub fn add_body_node(parent: &mut AstNode, statement: AstNode) {
    parent.push_child(statement);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_has_fixed_three_child_layout() {
        let f = make_function(
            Value::Str("main".into()),
            make_function_params(),
            AstNode::new(NodeType::FunctionReturn, Value::TypeRef(NodeType::Int32T)),
            make_function_body(),
        );
        assert_eq!(f.children.len(), 3);
        assert_eq!(f.child(1).unwrap().ty, NodeType::FunctionReturn);
    }

    #[test]
    fn add_body_node_appends_into_a_function_body_node() {
        let mut body = make_function_body();
        add_body_node(&mut body, AstNode::new(NodeType::Return, Value::Null));
        assert_eq!(body.children.len(), 1);
    }

    #[test]
    fn add_body_node_appends_into_an_if_body_node_not_the_else_branch() {
        let mut node = make_if(
            AstNode::new(NodeType::Condition, Value::Null),
            AstNode::new(NodeType::FunctionBody, Value::Null),
            AstNode::new(NodeType::Else, Value::Null),
        );
        add_body_node(&mut node.children[1], AstNode::new(NodeType::Vardef, Value::Str("x".into())));
        assert_eq!(node.children[1].children.len(), 1);
        assert_eq!(node.children[2].children.len(), 0);
    }

    #[test]
    fn vardef_parent_appends_directly_without_body_wrapper() {
        let mut node = make_vardef(Value::Str("x".into()), AstNode::leaf(NodeType::Int32, Value::Int32(1)));
        add_body_node(&mut node, AstNode::new(NodeType::Member, Value::Str("y".into())));
        assert_eq!(node.children.len(), 2);
    }
}
