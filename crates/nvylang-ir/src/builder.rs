//! The backend interface the emitter drives (spec §4.5 "Contract", §1
//! "Backend module builder" external collaborator).
//!
//! `nvylang-ir` never names a concrete IR; `nvylang-codegen` is the one
//! crate in this workspace that implements this trait, on top of
//! `inkwell`. Any other backend only has to implement this trait to reuse
//! the whole front end unchanged.

use nvylang_util::{NodeType, Value};

use crate::lattice::{CastKind, NumericMode};

/// Operations the emitter needs from a concrete backend. Associated types
/// keep this trait backend-agnostic: a function, a basic block, and a
/// value are all opaque handles as far as `nvylang-ir` is concerned.
pub trait ModuleBuilder {
    type Function: Copy;
    type Block: Copy;
    type Value: Copy;

    fn make_function(
        &mut self,
        name: &str,
        arg_names: &[String],
        arg_types: &[NodeType],
        return_type: NodeType,
        variadic: bool,
    ) -> Self::Function;

    fn create_block(&mut self, function: Self::Function, label: &str) -> Self::Block;

    fn set_insertion_point(&mut self, block: Self::Block);

    /// Emits an alloca for `name` of type `ty`; the emitter records the
    /// returned handle in `SymbolStorage` itself.
    fn create_variable(&mut self, name: &str, ty: NodeType) -> Self::Value;

    fn store_to_variable(&mut self, slot: Self::Value, value: Self::Value);

    fn create_load(&mut self, slot: Self::Value, ty: NodeType) -> Self::Value;

    fn function_param(&self, function: Self::Function, index: usize) -> Self::Value;

    fn const_value(&mut self, ty: NodeType, value: &Value) -> Self::Value;

    /// `op` is one of the arithmetic/bitwise `NodeType`s; `mode` picks the
    /// instruction family per spec §4.5's operation-selection table.
    fn create_binop(&mut self, op: NodeType, mode: NumericMode, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    /// `op` is one of the comparison `NodeType`s (`LT`, `LTE`, `GT`, `GTE`,
    /// `EQ`, `NEQ`).
    fn create_compare(&mut self, op: NodeType, mode: NumericMode, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    fn create_cast(&mut self, cast: CastKind, value: Self::Value) -> Self::Value;

    /// `op` is one of `SWITCHSIGN`, `NOT`, `BITNEGATE`.
    fn create_unary_op(&mut self, op: NodeType, mode: NumericMode, operand: Self::Value) -> Self::Value;

    fn create_call(&mut self, function: Self::Function, args: &[Self::Value]) -> Self::Value;

    fn create_ret(&mut self, value: Option<Self::Value>);

    fn create_cond_branch(&mut self, condition: Self::Value, then_block: Self::Block, else_block: Self::Block);

    fn create_branch(&mut self, target: Self::Block);

    /// Emits a stack allocation for `size` elements of `elem_ty`; `size` is
    /// itself a compiled value, so the count may be a runtime quantity
    /// rather than a literal.
    fn create_array_variable(&mut self, name: &str, elem_ty: NodeType, size: Self::Value) -> Self::Value;

    /// Address of the `index`-th `elem_ty` element of an array produced by
    /// [`ModuleBuilder::create_array_variable`].
    fn array_element_ptr(&mut self, array: Self::Value, elem_ty: NodeType, index: Self::Value) -> Self::Value;

    /// Maps a source `NodeType` to the backend's own primitive
    /// representation (spec §6: `INT32→i32`, `STR→opaque pointer`, …).
    /// Opaque to `nvylang-ir`; exposed so `--emit ir` tooling can ask a
    /// backend to describe a type without recompiling.
    fn get_native_type(&self, ty: NodeType) -> String;
}
