//! The IR emitter (spec §4.5): walks the AST in source order, driving a
//! [`ModuleBuilder`] through [`SymbolStorage`] and the numeric promotion
//! lattice.

use nvylang_par::AstNode;
use nvylang_util::{NodeType, Value};

use crate::builder::ModuleBuilder;
use crate::error::{EmitResult, ResolveError, TypeError};
use crate::lattice::{cast_for, mode_for};
use crate::symbols::SymbolStorage;

fn literal_to_type(ty: NodeType) -> NodeType {
    match ty {
        NodeType::Int32 => NodeType::Int32T,
        NodeType::Int64 => NodeType::Int64T,
        NodeType::Fp32 => NodeType::Fp32T,
        NodeType::Fp64 => NodeType::Fp64T,
        NodeType::Short => NodeType::Short,
        NodeType::Str => NodeType::StrT,
        NodeType::Char => NodeType::CharT,
        NodeType::BoolFa => NodeType::BoolT,
        other => other,
    }
}

fn wider(candidate: NodeType, current: NodeType) -> bool {
    match (candidate.numeric_rank(), current.numeric_rank()) {
        (Some(c), Some(b)) => c > b,
        _ => false,
    }
}

/// The name at the head of a `VARIABLE`/`MEMBER…` chain or a plain
/// `VARIABLE` leaf. Struct field layout is not tracked by this emitter
/// (spec's struct support is declaration only — see `compile_struct`), so
/// a dotted name with `Member` children is rejected here rather than
/// silently resolving to the head binding.
fn variable_head_name(node: &AstNode) -> EmitResult<String> {
    let name = node
        .data
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ResolveError::UndefinedVariable { name: "<anonymous>".to_string() })?;
    if node.children.iter().any(|c| c.ty == NodeType::Member) {
        return Err(TypeError::UnsupportedMemberAccess { name }.into());
    }
    Ok(name)
}

/// `arithmeticPrecedence(node)` (spec §4.5): the result type a binary
/// arithmetic/comparison node promotes its operands to.
pub fn arithmetic_precedence<V: Clone, F: Clone>(
    node: &AstNode,
    symbols: &SymbolStorage<V, F>,
) -> EmitResult<NodeType> {
    if node.ty.is_numeric_literal() {
        return Ok(literal_to_type(node.ty));
    }
    match node.ty {
        NodeType::Str => Ok(NodeType::StrT),
        NodeType::Char => Ok(NodeType::CharT),
        NodeType::BoolFa => Ok(NodeType::BoolT),
        NodeType::FunctionCall => {
            let name = variable_head_name(node)?;
            Ok(symbols.get_fun_type(&name)?)
        }
        NodeType::Variable => {
            let name = variable_head_name(node)?;
            Ok(symbols.get_var_type(&name)?)
        }
        _ => {
            let mut best = NodeType::Int32T;
            for child in &node.children {
                let candidate = arithmetic_precedence(child, symbols)?;
                if wider(candidate, best) {
                    best = candidate;
                }
            }
            Ok(best)
        }
    }
}

pub struct Emitter<'b, B: ModuleBuilder> {
    builder: &'b mut B,
    symbols: SymbolStorage<B::Value, B::Function>,
    current_function: Option<B::Function>,
}

impl<'b, B: ModuleBuilder> Emitter<'b, B> {
    pub fn new(builder: &'b mut B) -> Self {
        Self {
            builder,
            symbols: SymbolStorage::new(),
            current_function: None,
        }
    }

    fn active_function(&self) -> EmitResult<B::Function> {
        self.current_function
            .ok_or_else(|| ResolveError::UndefinedFunction { name: "<top level>".to_string() }.into())
    }

    pub fn compile_program(&mut self, items: &[AstNode]) -> EmitResult<()> {
        for item in items {
            self.compile_top_level(item)?;
        }
        Ok(())
    }

    fn compile_top_level(&mut self, node: &AstNode) -> EmitResult<()> {
        match node.ty {
            NodeType::Native => match node.children.first() {
                Some(inner) if inner.ty == NodeType::Function => self.declare_function(inner).map(|_| ()),
                Some(inner) => self.compile_top_level(inner),
                None => Ok(()),
            },
            NodeType::Public | NodeType::Private | NodeType::Final | NodeType::Constant => {
                self.compile_top_level(&node.children[0])
            }
            NodeType::Function => self.compile_function(node),
            NodeType::Struct => self.compile_struct(node),
            _ => self.compile_statement(node),
        }
    }

    fn declare_function(&mut self, node: &AstNode) -> EmitResult<B::Function> {
        let name = variable_head_name(node)?;
        let params = &node.children[0];
        let ret_node = &node.children[1];
        let arg_names: Vec<String> = params
            .children
            .iter()
            .map(|p| p.data.as_str().unwrap_or_default().to_string())
            .collect();
        let arg_types: Vec<NodeType> = params.children.iter().map(|p| p.ty).collect();
        let return_type = ret_node.children.first().map(|t| t.ty).unwrap_or(NodeType::VoidT);

        let function = self.builder.make_function(&name, &arg_names, &arg_types, return_type, false);
        self.symbols.store_fun_type(&name, return_type);
        self.symbols.store_fun_handle(&name, function);
        Ok(function)
    }

    fn compile_function(&mut self, node: &AstNode) -> EmitResult<()> {
        let function = self.declare_function(node)?;
        let params = &node.children[0];
        let body = &node.children[2];

        let entry = self.builder.create_block(function, "entry");
        self.builder.set_insertion_point(entry);
        self.current_function = Some(function);

        for (index, param) in params.children.iter().enumerate() {
            let pname = param.data.as_str().unwrap_or_default();
            let slot = self.builder.create_variable(pname, param.ty);
            let incoming = self.builder.function_param(function, index);
            self.builder.store_to_variable(slot, incoming);
            self.symbols.store_alloca(pname, slot);
            self.symbols.store_var_type(pname, param.ty);
        }

        for stmt in &body.children {
            self.compile_statement(stmt)?;
        }
        self.current_function = None;
        Ok(())
    }

    /// Struct declarations register their field layout; this emitter
    /// targets a backend without aggregate-type support beyond the scalar
    /// fields spec §1 scopes in, so only the field→type mapping a later
    /// `MEMBER` lookup would need is recorded here.
    fn compile_struct(&mut self, node: &AstNode) -> EmitResult<()> {
        let name = variable_head_name(node)?;
        self.symbols.store_var_type(&name, NodeType::UsertypeT);
        Ok(())
    }

    fn compile_statement(&mut self, node: &AstNode) -> EmitResult<()> {
        match node.ty {
            NodeType::Vardef => self.compile_vardef(node).map(|_| ()),
            NodeType::Return => self.compile_return(node),
            NodeType::If => self.compile_conditional(node),
            NodeType::ForLoop => self.compile_for_loop(node),
            NodeType::WhileLoop => self.compile_while_loop(node),
            NodeType::Assign => self.compile_assign(node).map(|_| ()),
            NodeType::FunctionCall => self.compile_expression(node).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn compile_vardef(&mut self, node: &AstNode) -> EmitResult<B::Value> {
        let name = variable_head_name(node)?;
        if self.symbols.is_declared(&name) {
            return Err(ResolveError::Redeclaration { name }.into());
        }
        let init = &node.children[0];
        if init.ty == NodeType::Array {
            return self.compile_array_vardef(&name, init);
        }
        let declared_type = arithmetic_precedence(init, &self.symbols)?;
        let value = self.compile_expression_as(init, declared_type)?;

        let slot = self.builder.create_variable(&name, declared_type);
        self.builder.store_to_variable(slot, value);
        self.symbols.store_alloca(&name, slot);
        self.symbols.store_var_type(&name, declared_type);
        Ok(value)
    }

    /// `let NAME = TYPE[SIZE];` — `init` is an `ARRAY[0: ARRAY_SIZE]` node
    /// whose `data` carries the element type (spec §4.3's table has no
    /// dedicated child slot for it; `Value::TypeRef` is documented for
    /// exactly this purpose).
    fn compile_array_vardef(&mut self, name: &str, init: &AstNode) -> EmitResult<B::Value> {
        let elem_ty = init.data.as_type_ref().unwrap_or(NodeType::Int32T);
        let size = self.compile_index_value(&init.children[0].data)?;
        let slot = self.builder.create_array_variable(name, elem_ty, size);
        self.symbols.store_alloca(name, slot);
        self.symbols.store_var_type(name, NodeType::ArrayType);
        self.symbols.store_array_elem_type(name, elem_ty);
        Ok(slot)
    }

    /// Resolves an `ARRAY_SIZE`/`ARRAY_INDEX` leaf's payload: either a
    /// literal `Int32` or the name of an in-scope `Int32`-typed variable.
    fn compile_index_value(&mut self, value: &Value) -> EmitResult<B::Value> {
        match value {
            Value::Int32(n) => Ok(self.builder.const_value(NodeType::Int32T, &Value::Int32(*n))),
            Value::Str(name) => {
                let ty = self.symbols.get_var_type(name)?;
                let slot = self.symbols.get_alloca(name)?;
                Ok(self.builder.create_load(slot, ty))
            }
            other => Err(TypeError::NonNumericOperand {
                found: format!("{other:?}"),
            }
            .into()),
        }
    }

    fn compile_assign(&mut self, node: &AstNode) -> EmitResult<B::Value> {
        let lhs = &node.children[0];
        let rhs = &node.children[1];
        if lhs.ty == NodeType::PtrDeref {
            let (pointer_value, ty) = self.compile_expression(&lhs.children[0])?;
            let value = self.compile_expression_as(rhs, ty)?;
            self.builder.store_to_variable(pointer_value, value);
            return Ok(value);
        }
        if lhs.ty == NodeType::ArrayAccess {
            let (elem_ptr, elem_ty) = self.compile_array_element_ptr(lhs)?;
            let value = self.compile_expression_as(rhs, elem_ty)?;
            self.builder.store_to_variable(elem_ptr, value);
            return Ok(value);
        }
        let name = variable_head_name(lhs)?;
        let declared_type = self.symbols.get_var_type(&name)?;
        let value = self.compile_expression_as(rhs, declared_type)?;
        let slot = self.symbols.get_alloca(&name)?;
        self.builder.store_to_variable(slot, value);
        Ok(value)
    }

    /// Resolves an `ARRAY_ACCESS[0: name, 1: ARRAY_INDEX]` node to the
    /// address of its indexed element, alongside that element's type.
    fn compile_array_element_ptr(&mut self, node: &AstNode) -> EmitResult<(B::Value, NodeType)> {
        let name = variable_head_name(&node.children[0])?;
        let elem_ty = self.symbols.get_array_elem_type(&name)?;
        let array_slot = self.symbols.get_alloca(&name)?;
        let index = self.compile_index_value(&node.children[1].data)?;
        let ptr = self.builder.array_element_ptr(array_slot, elem_ty, index);
        Ok((ptr, elem_ty))
    }

    fn compile_return(&mut self, node: &AstNode) -> EmitResult<()> {
        match node.children.first() {
            Some(expr) => {
                let (value, _) = self.compile_expression(expr)?;
                self.builder.create_ret(Some(value));
            }
            None => self.builder.create_ret(None),
        }
        Ok(())
    }

    fn compile_conditional(&mut self, node: &AstNode) -> EmitResult<()> {
        let function = self.active_function()?;
        let condition_expr = &node.children[0].children[0];
        let (cond_value, _) = self.compile_expression(condition_expr)?;

        let then_block = self.builder.create_block(function, "if.then");
        let else_block = self.builder.create_block(function, "if.else");
        let merge_block = self.builder.create_block(function, "if.end");
        self.builder.create_cond_branch(cond_value, then_block, else_block);

        self.builder.set_insertion_point(then_block);
        for stmt in &node.children[1].children {
            self.compile_statement(stmt)?;
        }
        self.builder.create_branch(merge_block);

        self.builder.set_insertion_point(else_block);
        let else_branch = &node.children[2];
        if let Some(inner) = else_branch.children.first() {
            if inner.ty == NodeType::If {
                self.compile_conditional(inner)?;
            } else {
                for stmt in &inner.children {
                    self.compile_statement(stmt)?;
                }
            }
        }
        self.builder.create_branch(merge_block);

        self.builder.set_insertion_point(merge_block);
        Ok(())
    }

    fn compile_for_loop(&mut self, node: &AstNode) -> EmitResult<()> {
        let function = self.active_function()?;
        let def = &node.children[0].children[0];
        self.compile_vardef(def)?;

        let cond_block = self.builder.create_block(function, "for.cond");
        let body_block = self.builder.create_block(function, "for.body");
        let after_block = self.builder.create_block(function, "for.end");

        self.builder.create_branch(cond_block);
        self.builder.set_insertion_point(cond_block);
        let cond_expr = &node.children[1].children[0];
        let (cond_value, _) = self.compile_expression(cond_expr)?;
        self.builder.create_cond_branch(cond_value, body_block, after_block);

        self.builder.set_insertion_point(body_block);
        for stmt in &node.children[3].children {
            self.compile_statement(stmt)?;
        }
        let iter_expr = &node.children[2].children[0];
        self.compile_expression(iter_expr)?;
        self.builder.create_branch(cond_block);

        self.builder.set_insertion_point(after_block);
        Ok(())
    }

    fn compile_while_loop(&mut self, node: &AstNode) -> EmitResult<()> {
        let function = self.active_function()?;
        let cond_block = self.builder.create_block(function, "while.cond");
        let body_block = self.builder.create_block(function, "while.body");
        let after_block = self.builder.create_block(function, "while.end");

        self.builder.create_branch(cond_block);
        self.builder.set_insertion_point(cond_block);
        let cond_expr = &node.children[0].children[0];
        let (cond_value, _) = self.compile_expression(cond_expr)?;
        self.builder.create_cond_branch(cond_value, body_block, after_block);

        self.builder.set_insertion_point(body_block);
        for stmt in &node.children[1].children {
            self.compile_statement(stmt)?;
        }
        self.builder.create_branch(cond_block);

        self.builder.set_insertion_point(after_block);
        Ok(())
    }

    /// Compiles `node`, inserting a cast if its natural type differs from
    /// `target`.
    fn compile_expression_as(&mut self, node: &AstNode, target: NodeType) -> EmitResult<B::Value> {
        let (value, ty) = self.compile_expression(node)?;
        match cast_for(ty, target) {
            Some(cast) => Ok(self.builder.create_cast(cast, value)),
            None => Ok(value),
        }
    }

    fn compile_expression(&mut self, node: &AstNode) -> EmitResult<(B::Value, NodeType)> {
        if node.ty.is_numeric_literal() {
            let ty = literal_to_type(node.ty);
            return Ok((self.builder.const_value(ty, &node.data), ty));
        }

        match node.ty {
            NodeType::Str => Ok((self.builder.const_value(NodeType::StrT, &node.data), NodeType::StrT)),
            NodeType::Char => Ok((self.builder.const_value(NodeType::CharT, &node.data), NodeType::CharT)),
            NodeType::BoolFa => Ok((self.builder.const_value(NodeType::BoolT, &node.data), NodeType::BoolT)),

            NodeType::Variable => {
                let name = variable_head_name(node)?;
                let ty = self.symbols.get_var_type(&name)?;
                let slot = self.symbols.get_alloca(&name)?;
                Ok((self.builder.create_load(slot, ty), ty))
            }

            NodeType::FindAddress => {
                let target = &node.children[0];
                let name = variable_head_name(target)?;
                let ty = self.symbols.get_var_type(&name)?;
                let slot = self.symbols.get_alloca(&name)?;
                Ok((slot, ty))
            }

            NodeType::PtrDeref => {
                let (pointer_value, ty) = self.compile_expression(&node.children[0])?;
                Ok((self.builder.create_load(pointer_value, ty), ty))
            }

            NodeType::ArrayAccess => {
                let (ptr, elem_ty) = self.compile_array_element_ptr(node)?;
                Ok((self.builder.create_load(ptr, elem_ty), elem_ty))
            }

            NodeType::SwitchSign | NodeType::Not | NodeType::BitNegate => {
                let (value, ty) = self.compile_expression(&node.children[0])?;
                Ok((self.builder.create_unary_op(node.ty, mode_for(ty), value), ty))
            }

            NodeType::FunctionCall => {
                let name = variable_head_name(node)?;
                let function = self.symbols.get_fun_handle(&name)?;
                let return_type = self.symbols.get_fun_type(&name)?;
                let mut args = Vec::with_capacity(node.children.len());
                for arg in &node.children {
                    let (value, _) = self.compile_expression(arg)?;
                    args.push(value);
                }
                Ok((self.builder.create_call(function, &args), return_type))
            }

            _ if node.ty.is_binary_op() => {
                let result_type = arithmetic_precedence(node, &self.symbols)?;
                let mode = mode_for(result_type);
                let lhs = self.compile_expression_as(&node.children[0], result_type)?;
                let rhs = self.compile_expression_as(&node.children[1], result_type)?;
                if node.ty.is_comparison() {
                    Ok((self.builder.create_compare(node.ty, mode, lhs, rhs), NodeType::BoolT))
                } else {
                    Ok((self.builder.create_binop(node.ty, mode, lhs, rhs), result_type))
                }
            }

            other => Err(TypeError::NonNumericOperand {
                found: format!("{other}"),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvylang_par::ast::{make_function, make_function_body, make_function_params, make_return, make_vardef};
    use nvylang_util::Value;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct FakeValue(u32);

    #[derive(Default)]
    struct RecordingBuilder {
        next_id: u32,
        binops: Vec<NodeType>,
        casts: Vec<crate::lattice::CastKind>,
        rets: Vec<Option<FakeValue>>,
        blocks_created: u32,
        cond_branches: u32,
        branches: u32,
    }

    impl RecordingBuilder {
        fn fresh(&mut self) -> FakeValue {
            self.next_id += 1;
            FakeValue(self.next_id)
        }
    }

    impl ModuleBuilder for RecordingBuilder {
        type Function = u32;
        type Block = u32;
        type Value = FakeValue;

        fn make_function(&mut self, _: &str, _: &[String], _: &[NodeType], _: NodeType, _: bool) -> u32 {
            self.next_id += 1;
            self.next_id
        }
        fn create_block(&mut self, _: u32, _: &str) -> u32 {
            self.next_id += 1;
            self.blocks_created += 1;
            self.next_id
        }
        fn set_insertion_point(&mut self, _: u32) {}
        fn create_variable(&mut self, _: &str, _: NodeType) -> FakeValue {
            self.fresh()
        }
        fn store_to_variable(&mut self, _: FakeValue, _: FakeValue) {}
        fn create_load(&mut self, _: FakeValue, _: NodeType) -> FakeValue {
            self.fresh()
        }
        fn function_param(&self, _: u32, _: usize) -> FakeValue {
            FakeValue(0)
        }
        fn const_value(&mut self, _: NodeType, _: &Value) -> FakeValue {
            self.fresh()
        }
        fn create_binop(&mut self, op: NodeType, _: crate::lattice::NumericMode, _: FakeValue, _: FakeValue) -> FakeValue {
            self.binops.push(op);
            self.fresh()
        }
        fn create_compare(&mut self, op: NodeType, _: crate::lattice::NumericMode, _: FakeValue, _: FakeValue) -> FakeValue {
            self.binops.push(op);
            self.fresh()
        }
        fn create_cast(&mut self, cast: crate::lattice::CastKind, _: FakeValue) -> FakeValue {
            self.casts.push(cast);
            self.fresh()
        }
        fn create_unary_op(&mut self, op: NodeType, _: crate::lattice::NumericMode, _: FakeValue) -> FakeValue {
            self.binops.push(op);
            self.fresh()
        }
        fn create_call(&mut self, _: u32, _: &[FakeValue]) -> FakeValue {
            self.fresh()
        }
        fn create_ret(&mut self, value: Option<FakeValue>) {
            self.rets.push(value);
        }
        fn create_cond_branch(&mut self, _: FakeValue, _: u32, _: u32) {
            self.cond_branches += 1;
        }
        fn create_branch(&mut self, _: u32) {
            self.branches += 1;
        }
        fn create_array_variable(&mut self, _: &str, _: NodeType, _: FakeValue) -> FakeValue {
            self.fresh()
        }
        fn array_element_ptr(&mut self, _: FakeValue, _: NodeType, _: FakeValue) -> FakeValue {
            self.fresh()
        }
        fn get_native_type(&self, ty: NodeType) -> String {
            format!("{ty}")
        }
    }

    fn leaf(ty: NodeType, data: Value) -> AstNode {
        AstNode::leaf(ty, data)
    }

    #[test]
    fn scenario_one_main_returns_constant() {
        let func = make_function(
            Value::Str("main".to_string()),
            make_function_params(),
            AstNode::with_children(NodeType::FunctionReturn, Value::Null, vec![leaf(NodeType::Int32T, Value::Null)]),
            {
                let mut body = make_function_body();
                body.push_child(make_return(leaf(NodeType::Int32, Value::Int32(12))));
                body
            },
        );
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_program(&[func]).unwrap();
        assert_eq!(builder.rets.len(), 1);
        assert!(builder.rets[0].is_some());
    }

    #[test]
    fn scenario_two_vardef_add_of_mul_declares_int32() {
        let rhs = AstNode::with_children(
            NodeType::Add,
            Value::Null,
            vec![
                leaf(NodeType::Int32, Value::Int32(1)),
                AstNode::with_children(
                    NodeType::Mul,
                    Value::Null,
                    vec![leaf(NodeType::Int32, Value::Int32(2)), leaf(NodeType::Int32, Value::Int32(3))],
                ),
            ],
        );
        let vardef = make_vardef(Value::Str("x".to_string()), rhs);
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_vardef(&vardef).unwrap();
        assert_eq!(emitter.symbols.get_var_type("x"), Ok(NodeType::Int32T));
        assert!(builder.binops.contains(&NodeType::Add));
        assert!(builder.binops.contains(&NodeType::Mul));
    }

    #[test]
    fn scenario_three_mixed_int_float_promotes_and_casts() {
        let rhs = AstNode::with_children(
            NodeType::Add,
            Value::Null,
            vec![leaf(NodeType::Int32, Value::Int32(1)), leaf(NodeType::Fp64, Value::F64(2.0))],
        );
        let vardef = make_vardef(Value::Str("y".to_string()), rhs);
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_vardef(&vardef).unwrap();
        assert_eq!(emitter.symbols.get_var_type("y"), Ok(NodeType::Fp64T));
        assert_eq!(builder.casts, vec![crate::lattice::CastKind::IntToF64]);
    }

    #[test]
    fn redeclaring_a_name_in_the_same_scope_is_an_error() {
        let vardef = make_vardef(Value::Str("x".to_string()), leaf(NodeType::Int32, Value::Int32(1)));
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_vardef(&vardef).unwrap();
        let err = emitter.compile_vardef(&vardef).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EmitError::Resolve(ResolveError::Redeclaration { .. })
        ));
    }

    #[test]
    fn undefined_variable_reports_resolve_error_not_a_panic() {
        let node = leaf(NodeType::Variable, Value::Str("missing".to_string()));
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        let err = emitter.compile_expression(&node).unwrap_err();
        assert!(matches!(err, crate::error::EmitError::Resolve(ResolveError::UndefinedVariable { .. })));
    }

    #[test]
    fn dotted_member_access_is_a_type_error_not_a_silent_whole_variable_read() {
        let mut head = AstNode::leaf(NodeType::Variable, Value::Str("a".to_string()));
        head.push_child(AstNode::leaf(NodeType::Member, Value::Str("b".to_string())));
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.symbols.store_var_type("a", NodeType::UsertypeT);
        emitter.symbols.store_alloca("a", FakeValue(1));
        let err = emitter.compile_expression(&head).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EmitError::Type(TypeError::UnsupportedMemberAccess { .. })
        ));
    }

    #[test]
    fn array_vardef_records_element_type_and_allocates_via_the_builder() {
        let init = AstNode::with_children(
            NodeType::Array,
            Value::TypeRef(NodeType::Int32T),
            vec![leaf(NodeType::ArraySize, Value::Int32(5))],
        );
        let vardef = make_vardef(Value::Str("arr".to_string()), init);
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_vardef(&vardef).unwrap();
        assert_eq!(emitter.symbols.get_var_type("arr"), Ok(NodeType::ArrayType));
        assert_eq!(emitter.symbols.get_array_elem_type("arr"), Ok(NodeType::Int32T));
    }

    #[test]
    fn array_index_read_loads_through_the_builder() {
        let access = AstNode::with_children(
            NodeType::ArrayAccess,
            Value::Null,
            vec![
                leaf(NodeType::Variable, Value::Str("arr".to_string())),
                leaf(NodeType::ArrayIndex, Value::Int32(2)),
            ],
        );
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.symbols.store_alloca("arr", FakeValue(1));
        emitter.symbols.store_var_type("arr", NodeType::ArrayType);
        emitter.symbols.store_array_elem_type("arr", NodeType::Int32T);
        let (_, ty) = emitter.compile_expression(&access).unwrap();
        assert_eq!(ty, NodeType::Int32T);
    }

    #[test]
    fn array_index_assignment_stores_through_the_builder() {
        let lhs = AstNode::with_children(
            NodeType::ArrayAccess,
            Value::Null,
            vec![
                leaf(NodeType::Variable, Value::Str("arr".to_string())),
                leaf(NodeType::ArrayIndex, Value::Int32(0)),
            ],
        );
        let assign = AstNode::with_children(NodeType::Assign, Value::Null, vec![lhs, leaf(NodeType::Int32, Value::Int32(9))]);
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.symbols.store_alloca("arr", FakeValue(1));
        emitter.symbols.store_var_type("arr", NodeType::ArrayType);
        emitter.symbols.store_array_elem_type("arr", NodeType::Int32T);
        emitter.compile_assign(&assign).unwrap();
    }

    #[test]
    fn array_index_on_an_undeclared_array_is_a_resolve_error() {
        let access = AstNode::with_children(
            NodeType::ArrayAccess,
            Value::Null,
            vec![
                leaf(NodeType::Variable, Value::Str("missing".to_string())),
                leaf(NodeType::ArrayIndex, Value::Int32(0)),
            ],
        );
        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        let err = emitter.compile_expression(&access).unwrap_err();
        assert!(matches!(err, crate::error::EmitError::Resolve(ResolveError::UndefinedVariable { .. })));
    }

    #[test]
    fn for_loop_and_conditional_emit_branching_blocks() {
        let lines: Vec<String> = vec![
            "func main() -> int32 {".to_string(),
            "for (let i = 0; i < 10; i + 1) {".to_string(),
            "if (i < 5) {".to_string(),
            "return i;".to_string(),
            "}".to_string(),
            "}".to_string(),
            "return 0;".to_string(),
            "}".to_string(),
        ];
        let mut table = nvylang_lex::MangleTable::new();
        let graph = nvylang_lex::lex_module(&lines, "m", &mut table).unwrap();
        let items = nvylang_par::parse(&graph).unwrap();

        let mut builder = RecordingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_program(&items).unwrap();

        // entry + for{cond,body,end} + if{then,else,end} = 7 blocks.
        assert_eq!(builder.blocks_created, 7);
        assert_eq!(builder.cond_branches, 2);
        assert_eq!(builder.branches, 4);
        assert_eq!(builder.rets.len(), 2);
    }
}
