//! The one concrete [`nvylang_ir::ModuleBuilder`] in this workspace: an
//! `inkwell`/LLVM backend standing in for the "external collaborator"
//! backend module builder named in spec §1.

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{BasicMetadataValueEnum, BasicValue, BasicValueEnum, FunctionValue};
use inkwell::{FloatPredicate, IntPredicate, OptimizationLevel};
use std::path::Path;

use nvylang_ir::{CastKind, ModuleBuilder, NumericMode};
use nvylang_util::{NodeType, Value};

use crate::error::{CodeGenError, Result};
use crate::types::TypeMapper;

pub struct LlvmModuleBuilder<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,
    pub target_triple: String,
    pub opt_level: OptimizationLevel,
    type_mapper: TypeMapper<'ctx>,
}

impl<'ctx> LlvmModuleBuilder<'ctx> {
    pub fn new(
        context: &'ctx Context,
        module_name: &str,
        target_triple: String,
        opt_level: OptimizationLevel,
    ) -> Self {
        let module = context.create_module(module_name);

        let triple = inkwell::targets::TargetTriple::create(&target_triple);
        module.set_triple(&triple);
        if let Ok(target) = inkwell::targets::Target::from_triple(&triple) {
            if let Some(machine) = target.create_target_machine(
                &triple,
                "generic",
                "",
                opt_level,
                inkwell::targets::RelocMode::Default,
                inkwell::targets::CodeModel::Default,
            ) {
                module.set_data_layout(&machine.get_target_data().get_data_layout());
            }
        }

        Self {
            context,
            module,
            builder: context.create_builder(),
            target_triple,
            opt_level,
            type_mapper: TypeMapper::new(context),
        }
    }

    pub fn emit_llvm_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    pub fn write_ir_to_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.emit_llvm_ir())
    }

    pub fn get_module(&self) -> &Module<'ctx> {
        &self.module
    }

    fn target_machine(&self) -> Result<inkwell::targets::TargetMachine> {
        let triple = inkwell::targets::TargetTriple::create(&self.target_triple);
        let target = inkwell::targets::Target::from_triple(&triple)
            .map_err(|e| CodeGenError::CompilationError(format!("unknown target: {e}")))?;
        target
            .create_target_machine(
                &triple,
                "generic",
                "",
                self.opt_level,
                inkwell::targets::RelocMode::Default,
                inkwell::targets::CodeModel::Default,
            )
            .ok_or_else(|| CodeGenError::CompilationError("failed to create target machine".to_string()))
    }

    pub fn write_object_file(&self, path: &Path) -> Result<()> {
        use inkwell::targets::FileType;
        self.target_machine()?
            .write_to_file(&self.module, FileType::Object, path)
            .map_err(|e| CodeGenError::LlvmOperationFailed(format!("object emission failed: {e}")))
    }

    fn int_value(v: BasicValueEnum<'ctx>) -> inkwell::values::IntValue<'ctx> {
        v.into_int_value()
    }

    fn float_value(v: BasicValueEnum<'ctx>) -> inkwell::values::FloatValue<'ctx> {
        v.into_float_value()
    }
}

impl<'ctx> ModuleBuilder for LlvmModuleBuilder<'ctx> {
    type Function = FunctionValue<'ctx>;
    type Block = BasicBlock<'ctx>;
    type Value = BasicValueEnum<'ctx>;

    fn make_function(
        &mut self,
        name: &str,
        _arg_names: &[String],
        arg_types: &[NodeType],
        return_type: NodeType,
        variadic: bool,
    ) -> Self::Function {
        let params: Vec<_> = arg_types
            .iter()
            .map(|t| self.type_mapper.basic_type(*t).into())
            .collect();
        let fn_type = self.type_mapper.function_type(return_type, &params, variadic);
        self.module.add_function(name, fn_type, None)
    }

    fn create_block(&mut self, function: Self::Function, label: &str) -> Self::Block {
        self.context.append_basic_block(function, label)
    }

    fn set_insertion_point(&mut self, block: Self::Block) {
        self.builder.position_at_end(block);
    }

    fn create_variable(&mut self, name: &str, ty: NodeType) -> Self::Value {
        let llvm_ty = self.type_mapper.basic_type(ty);
        let alloca = self
            .builder
            .build_alloca(llvm_ty, name)
            .expect("build_alloca failed");
        alloca.as_basic_value_enum()
    }

    fn store_to_variable(&mut self, slot: Self::Value, value: Self::Value) {
        self.builder
            .build_store(slot.into_pointer_value(), value)
            .expect("build_store failed");
    }

    fn create_load(&mut self, slot: Self::Value, ty: NodeType) -> Self::Value {
        let llvm_ty = self.type_mapper.basic_type(ty);
        self.builder
            .build_load(llvm_ty, slot.into_pointer_value(), "load")
            .expect("build_load failed")
    }

    fn function_param(&self, function: Self::Function, index: usize) -> Self::Value {
        function
            .get_nth_param(index as u32)
            .expect("parameter index out of range")
    }

    fn const_value(&mut self, ty: NodeType, value: &Value) -> Self::Value {
        match ty {
            NodeType::Int32T | NodeType::Int64T | NodeType::CharT | NodeType::BoolT => {
                let int_ty = self.type_mapper.basic_type(ty).into_int_type();
                let n = value.as_i64().unwrap_or(0);
                int_ty.const_int(n as u64, true).as_basic_value_enum()
            }
            NodeType::Fp32T | NodeType::Fp64T => {
                let float_ty = self.type_mapper.basic_type(ty).into_float_type();
                float_ty.const_float(value.as_f64().unwrap_or(0.0)).as_basic_value_enum()
            }
            NodeType::StrT => {
                let text = value.as_str().unwrap_or_default();
                self.builder
                    .build_global_string_ptr(text, "str_lit")
                    .expect("build_global_string_ptr failed")
                    .as_pointer_value()
                    .as_basic_value_enum()
            }
            _ => self.type_mapper.basic_type(ty).const_zero(),
        }
    }

    fn create_binop(&mut self, op: NodeType, mode: NumericMode, lhs: Self::Value, rhs: Self::Value) -> Self::Value {
        use NodeType::*;
        if mode == NumericMode::Float {
            let (l, r) = (Self::float_value(lhs), Self::float_value(rhs));
            let v = match op {
                Add => self.builder.build_float_add(l, r, "fadd"),
                Sub => self.builder.build_float_sub(l, r, "fsub"),
                Mul => self.builder.build_float_mul(l, r, "fmul"),
                Div => self.builder.build_float_div(l, r, "fdiv"),
                Modulo => self.builder.build_float_rem(l, r, "frem"),
                other => panic!("{other} has no float instruction"),
            };
            v.expect("float binop failed").as_basic_value_enum()
        } else {
            let (l, r) = (Self::int_value(lhs), Self::int_value(rhs));
            let v = match op {
                Add => self.builder.build_int_add(l, r, "add"),
                Sub => self.builder.build_int_sub(l, r, "sub"),
                Mul => self.builder.build_int_mul(l, r, "mul"),
                Div => self.builder.build_int_signed_div(l, r, "sdiv"),
                Modulo => self.builder.build_int_signed_rem(l, r, "srem"),
                BitAnd => self.builder.build_and(l, r, "and"),
                BitOr => self.builder.build_or(l, r, "or"),
                BitXor => self.builder.build_xor(l, r, "xor"),
                ArithLeftShift => self.builder.build_left_shift(l, r, "shl"),
                ArithRightShift => self.builder.build_right_shift(l, r, true, "ashr"),
                LogicRightShift => self.builder.build_right_shift(l, r, false, "lshr"),
                LogicAnd => self.builder.build_and(l, r, "land"),
                LogicOr => self.builder.build_or(l, r, "lor"),
                LogicXor => self.builder.build_xor(l, r, "lxor"),
                other => panic!("{other} has no integer instruction"),
            };
            v.expect("int binop failed").as_basic_value_enum()
        }
    }

    fn create_compare(&mut self, op: NodeType, mode: NumericMode, lhs: Self::Value, rhs: Self::Value) -> Self::Value {
        use NodeType::*;
        if mode == NumericMode::Float {
            let (l, r) = (Self::float_value(lhs), Self::float_value(rhs));
            let pred = match op {
                Lt => FloatPredicate::OLT,
                Lte => FloatPredicate::OLE,
                Gt => FloatPredicate::OGT,
                Gte => FloatPredicate::OGE,
                Eq => FloatPredicate::OEQ,
                Neq => FloatPredicate::ONE,
                other => panic!("{other} is not a comparison"),
            };
            self.builder
                .build_float_compare(pred, l, r, "fcmp")
                .expect("float compare failed")
                .as_basic_value_enum()
        } else {
            let (l, r) = (Self::int_value(lhs), Self::int_value(rhs));
            let pred = match op {
                Lt => IntPredicate::SLT,
                Lte => IntPredicate::SLE,
                Gt => IntPredicate::SGT,
                Gte => IntPredicate::SGE,
                Eq => IntPredicate::EQ,
                Neq => IntPredicate::NE,
                other => panic!("{other} is not a comparison"),
            };
            self.builder
                .build_int_compare(pred, l, r, "icmp")
                .expect("int compare failed")
                .as_basic_value_enum()
        }
    }

    fn create_cast(&mut self, cast: CastKind, value: Self::Value) -> Self::Value {
        match cast {
            CastKind::I32ToI64 => self
                .builder
                .build_int_s_extend(Self::int_value(value), self.context.i64_type(), "sext")
                .expect("sext failed")
                .as_basic_value_enum(),
            CastKind::IntToF32 => self
                .builder
                .build_signed_int_to_float(Self::int_value(value), self.context.f32_type(), "sitofp")
                .expect("sitofp failed")
                .as_basic_value_enum(),
            CastKind::IntToF64 => self
                .builder
                .build_signed_int_to_float(Self::int_value(value), self.context.f64_type(), "sitofp")
                .expect("sitofp failed")
                .as_basic_value_enum(),
            CastKind::FloatToI32 => self
                .builder
                .build_float_to_signed_int(Self::float_value(value), self.context.i32_type(), "fptosi")
                .expect("fptosi failed")
                .as_basic_value_enum(),
            CastKind::FloatToI64 => self
                .builder
                .build_float_to_signed_int(Self::float_value(value), self.context.i64_type(), "fptosi")
                .expect("fptosi failed")
                .as_basic_value_enum(),
        }
    }

    fn create_unary_op(&mut self, op: NodeType, mode: NumericMode, operand: Self::Value) -> Self::Value {
        match op {
            NodeType::SwitchSign if mode == NumericMode::Float => self
                .builder
                .build_float_neg(Self::float_value(operand), "fneg")
                .expect("fneg failed")
                .as_basic_value_enum(),
            NodeType::SwitchSign => self
                .builder
                .build_int_neg(Self::int_value(operand), "neg")
                .expect("neg failed")
                .as_basic_value_enum(),
            NodeType::Not | NodeType::BitNegate => self
                .builder
                .build_not(Self::int_value(operand), "not")
                .expect("not failed")
                .as_basic_value_enum(),
            other => panic!("{other} is not a unary operator"),
        }
    }

    fn create_call(&mut self, function: Self::Function, args: &[Self::Value]) -> Self::Value {
        let args: Vec<BasicMetadataValueEnum> = args.iter().map(|v| (*v).into()).collect();
        let call = self
            .builder
            .build_call(function, &args, "call")
            .expect("build_call failed");
        call.try_as_basic_value()
            .left()
            .unwrap_or_else(|| self.context.i32_type().const_zero().as_basic_value_enum())
    }

    fn create_ret(&mut self, value: Option<Self::Value>) {
        match value {
            Some(v) => self.builder.build_return(Some(&v as &dyn BasicValue)),
            None => self.builder.build_return(None),
        }
        .expect("build_return failed");
    }

    fn create_cond_branch(&mut self, condition: Self::Value, then_block: Self::Block, else_block: Self::Block) {
        self.builder
            .build_conditional_branch(condition.into_int_value(), then_block, else_block)
            .expect("build_conditional_branch failed");
    }

    fn create_branch(&mut self, target: Self::Block) {
        self.builder
            .build_unconditional_branch(target)
            .expect("build_unconditional_branch failed");
    }

    /// `build_array_alloca` takes the element type directly; the resulting
    /// pointer already addresses the first element, so no further
    /// unwrapping of an aggregate array type is needed at load/store time.
    fn create_array_variable(&mut self, name: &str, elem_ty: NodeType, size: Self::Value) -> Self::Value {
        let llvm_elem_ty = self.type_mapper.basic_type(elem_ty);
        let count = Self::int_value(size);
        self.builder
            .build_array_alloca(llvm_elem_ty, count, name)
            .expect("build_array_alloca failed")
            .as_basic_value_enum()
    }

    fn array_element_ptr(&mut self, array: Self::Value, elem_ty: NodeType, index: Self::Value) -> Self::Value {
        let llvm_elem_ty = self.type_mapper.basic_type(elem_ty);
        let ptr = array.into_pointer_value();
        let idx = Self::int_value(index);
        unsafe {
            self.builder
                .build_gep(llvm_elem_ty, ptr, &[idx], "array_elem")
                .expect("build_gep failed")
                .as_basic_value_enum()
        }
    }

    fn get_native_type(&self, ty: NodeType) -> String {
        self.type_mapper.native_name(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_a_backend_sets_the_target_triple() {
        let context = Context::create();
        let backend = LlvmModuleBuilder::new(&context, "m", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
        assert_eq!(backend.target_triple, "x86_64-unknown-linux-gnu");
    }

    #[test]
    fn emitting_an_empty_module_does_not_panic() {
        let context = Context::create();
        let backend = LlvmModuleBuilder::new(&context, "m", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
        assert!(backend.emit_llvm_ir().contains("m"));
    }

    #[test]
    fn make_function_accepts_a_pointer_typed_parameter() {
        let context = Context::create();
        let mut backend = LlvmModuleBuilder::new(&context, "m", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
        let function = backend.make_function(
            "takes_ptr",
            &["p".to_string()],
            &[NodeType::Star],
            NodeType::Int32T,
            false,
        );
        assert_eq!(function.count_params(), 1);
    }

    #[test]
    fn array_declaration_and_indexed_assignment_emit_alloca_and_gep() {
        let lines = vec![
            "func main() -> int32 {".to_string(),
            "let arr = int32[5];".to_string(),
            "arr[0] = 9;".to_string(),
            "return arr[0];".to_string(),
            "}".to_string(),
        ];
        let mut table = nvylang_lex::MangleTable::new();
        let graph = nvylang_lex::lex_module(&lines, "m", &mut table).unwrap();
        let items = nvylang_par::parse(&graph).unwrap();

        let context = Context::create();
        let mut backend = LlvmModuleBuilder::new(&context, "m", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
        let mut emitter = nvylang_ir::Emitter::new(&mut backend);
        emitter.compile_program(&items).unwrap();

        let ir = backend.emit_llvm_ir();
        assert!(ir.contains("alloca i32"));
        assert!(ir.contains("getelementptr"));
    }

    #[test]
    fn full_pipeline_through_emitter_produces_a_define() {
        let lines = vec![
            "func main() -> int32 {".to_string(),
            "return 12;".to_string(),
            "}".to_string(),
        ];
        let mut table = nvylang_lex::MangleTable::new();
        let graph = nvylang_lex::lex_module(&lines, "m", &mut table).unwrap();
        let items = nvylang_par::parse(&graph).unwrap();

        let context = Context::create();
        let mut backend = LlvmModuleBuilder::new(&context, "m", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None);
        let mut emitter = nvylang_ir::Emitter::new(&mut backend);
        emitter.compile_program(&items).unwrap();

        let ir = backend.emit_llvm_ir();
        assert!(ir.contains("define"));
        assert!(ir.contains("ret i32 12"));
    }
}
