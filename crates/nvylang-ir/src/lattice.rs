//! The numeric promotion lattice: which mode a result type emits in, and
//! which cast bridges two types (spec §4.5 "Cast selection").

use nvylang_util::NodeType;

/// The three instruction families `compileExpression` picks between once
/// `arithmeticPrecedence` has settled on a result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericMode {
    Float,
    SignedInt,
    UnsignedInt,
}

/// `resultType` only ever drives signed-int or float selection in this
/// language — there is no unsigned source-level type, so `UnsignedInt` is
/// reachable only through an explicit backend request, never through
/// `mode_for`.
pub fn mode_for(result_type: NodeType) -> NumericMode {
    if result_type.is_float() {
        NumericMode::Float
    } else {
        NumericMode::SignedInt
    }
}

/// One entry of spec §4.5's cast table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    I32ToI64,
    IntToF32,
    IntToF64,
    FloatToI32,
    FloatToI64,
}

/// Picks the cast that bridges `from` into `to`, or `None` when they
/// already match (spec: "Identity when types match" — the emitter simply
/// skips casting rather than inserting a no-op instruction).
pub fn cast_for(from: NodeType, to: NodeType) -> Option<CastKind> {
    use NodeType::*;
    if from == to {
        return None;
    }
    match (from, to) {
        (Int32T | Int32, Int64T | Int64) => Some(CastKind::I32ToI64),
        (Int32T | Int32 | Int64T | Int64, Fp32T | Fp32) => Some(CastKind::IntToF32),
        (Int32T | Int32 | Int64T | Int64, Fp64T | Fp64) => Some(CastKind::IntToF64),
        (Fp32T | Fp32 | Fp64T | Fp64, Int32T | Int32) => Some(CastKind::FloatToI32),
        (Fp32T | Fp32 | Fp64T | Fp64, Int64T | Int64) => Some(CastKind::FloatToI64),
        _ => None,
    }
}
