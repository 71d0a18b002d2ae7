//! Maps source-level type tags onto LLVM's own type system (spec §6:
//! `INT32→i32`, `STR→opaque pointer`, …).

use inkwell::context::Context;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType};
use inkwell::AddressSpace;

use nvylang_util::NodeType;

pub struct TypeMapper<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> TypeMapper<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// Maps a scalar source type to its LLVM representation. `VoidT` has
    /// no `BasicTypeEnum` counterpart; callers needing a function's return
    /// type go through [`TypeMapper::function_type`] instead.
    pub fn basic_type(&self, ty: NodeType) -> BasicTypeEnum<'ctx> {
        use NodeType::*;
        match ty {
            Int32T | Int32 => self.context.i32_type().into(),
            Int64T | Int64 => self.context.i64_type().into(),
            Fp32T | Fp32 => self.context.f32_type().into(),
            Fp64T | Fp64 => self.context.f64_type().into(),
            CharT | Char | Short => self.context.i8_type().into(),
            BoolT | BoolFa => self.context.bool_type().into(),
            StrT | Str => self.context.ptr_type(AddressSpace::default()).into(),
            UsertypeT => self.context.ptr_type(AddressSpace::default()).into(),
            // Pointer-typed values and array variables are both addresses
            // under LLVM's opaque-pointer model; the pointee/element type
            // lives on the source-level `Value`, not here.
            Star | ArrayType => self.context.ptr_type(AddressSpace::default()).into(),
            other => panic!("no scalar LLVM representation for {other}"),
        }
    }

    pub fn function_type(
        &self,
        return_type: NodeType,
        params: &[BasicMetadataTypeEnum<'ctx>],
        variadic: bool,
    ) -> FunctionType<'ctx> {
        if return_type == NodeType::VoidT {
            self.context.void_type().fn_type(params, variadic)
        } else {
            self.basic_type(return_type).fn_type(params, variadic)
        }
    }

    /// The textual description a backend owes `ModuleBuilder::get_native_type`.
    pub fn native_name(&self, ty: NodeType) -> String {
        use NodeType::*;
        match ty {
            Int32T | Int32 => "i32".to_string(),
            Int64T | Int64 => "i64".to_string(),
            Fp32T | Fp32 => "f32".to_string(),
            Fp64T | Fp64 => "f64".to_string(),
            CharT | Char | Short => "i8".to_string(),
            BoolT | BoolFa => "i1".to_string(),
            StrT | Str | UsertypeT => "ptr".to_string(),
            Star | ArrayType => "ptr".to_string(),
            VoidT => "void".to_string(),
            other => format!("{other}"),
        }
    }
}
