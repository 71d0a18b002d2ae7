//! Shared node-kind metadata: [`NodeType`], [`Value`], and the immutable
//! operator tables that every later stage (lexer, parser, IR emitter)
//! consults instead of re-deriving precedence or rank locally.

use std::fmt;

/// The closed tag set shared by every token and every AST node.
///
/// Grouped into disjoint kinds exposed as membership predicates below
/// rather than as separate enums, so a single `match` arm can route on
/// `NodeType` without juggling several parallel tag types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum NodeType {
    // Literal kinds
    Int32,
    Int64,
    Fp32,
    Fp64,
    Str,
    Char,
    Short,
    BoolFa,

    // Type kinds
    Int32T,
    Int64T,
    Fp32T,
    Fp64T,
    StrT,
    CharT,
    BoolT,
    VoidT,
    TypeT,
    FunctionT,
    UsertypeT,
    /// `unsigned` — reserved type keyword; parsed and tagged like any other
    /// type keyword but no unsigned-arithmetic mode exists downstream yet
    /// (the original source carries the same keyword with no consumer
    /// beyond its own lexer and `toString`).
    Unsigned,
    /// `numeric32` — reserved type keyword, same status as `Unsigned`.
    Num32,
    /// `numeric64` — reserved type keyword, same status as `Unsigned`.
    Num64,
    /// `unified` — reserved type keyword, same status as `Unsigned`.
    Unified,

    // Arithmetic ops
    Add,
    Sub,
    Mul,
    Div,
    Modulo,

    // Bitwise ops
    BitAnd,
    BitOr,
    BitXor,
    ArithLeftShift,
    ArithRightShift,
    LogicRightShift,
    BitNegate,

    // Logical ops
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    LogicAnd,
    LogicOr,
    LogicXor,
    Not,

    // Memory ops
    PtrDeref,
    FindAddress,
    Variable,
    /// Unary negation, the remap target of prefix `SUB` (spec §3's
    /// prefix-operator set names `SWITCHSIGN` without listing it among
    /// the enumerated groups; it only ever exists post-remap).
    SwitchSign,

    // Structural
    Program,
    Function,
    FunctionParam,
    FunctionReturn,
    FunctionBody,
    FunctionCall,
    Vardef,
    Assign,
    Return,
    If,
    Else,
    Condition,
    ForLoop,
    WhileLoop,
    LoopDef,
    LoopCond,
    LoopIteration,
    Struct,
    Member,
    Array,
    ArrayType,
    ArrayAccess,
    ArrayIndex,
    ArraySize,
    Cast,
    Star,
    Final,
    Static,
    Public,
    Private,
    Constant,
    Native,
    Impl,
    Ref,

    // Delimiters
    OpenParens,
    CloseParens,
    OpenBrkt,
    CloseBrkt,
    OpenBrace,
    CloseBrace,
    EndOfLine,
    CommaDelimit,
    DQuote,
    SQuote,

    // Other
    Invalid,
    EndOfStream,
}

impl NodeType {
    pub fn is_literal(self) -> bool {
        use NodeType::*;
        matches!(self, Int32 | Int64 | Fp32 | Fp64 | Str | Char | Short | BoolFa)
    }

    pub fn is_numeric_literal(self) -> bool {
        use NodeType::*;
        matches!(self, Int32 | Int64 | Fp32 | Fp64 | Short)
    }

    pub fn is_type(self) -> bool {
        use NodeType::*;
        matches!(
            self,
            Int32T
                | Int64T
                | Fp32T
                | Fp64T
                | StrT
                | CharT
                | BoolT
                | VoidT
                | TypeT
                | FunctionT
                | UsertypeT
                | Unsigned
                | Num32
                | Num64
                | Unified
        )
    }

    pub fn is_arithmetic(self) -> bool {
        use NodeType::*;
        matches!(self, Add | Sub | Mul | Div | Modulo)
    }

    pub fn is_bitwise(self) -> bool {
        use NodeType::*;
        matches!(
            self,
            BitAnd | BitOr | BitXor | ArithLeftShift | ArithRightShift | LogicRightShift | BitNegate
        )
    }

    pub fn is_logical(self) -> bool {
        use NodeType::*;
        matches!(
            self,
            Lt | Lte | Gt | Gte | Eq | Neq | LogicAnd | LogicOr | LogicXor | Not
        )
    }

    pub fn is_comparison(self) -> bool {
        use NodeType::*;
        matches!(self, Lt | Lte | Gt | Gte | Eq | Neq)
    }

    pub fn is_memory(self) -> bool {
        matches!(
            self,
            NodeType::PtrDeref | NodeType::FindAddress | NodeType::Variable | NodeType::SwitchSign
        )
    }

    /// `BITNEGATE` shares precedence 13 with `NOT` because both are
    /// unary-only in this language (spec §3's precedence table groups
    /// them together for that reason, even though `BITNEGATE` is not a
    /// member of the prefix-remap set).
    pub fn is_unary_op(self) -> bool {
        matches!(
            self,
            NodeType::PtrDeref
                | NodeType::FindAddress
                | NodeType::SwitchSign
                | NodeType::Not
                | NodeType::BitNegate
        )
    }

    /// Arithmetic or logical — the two classes `compileExpression` recurses
    /// into for any non-leaf expression node.
    pub fn is_expression_op(self) -> bool {
        self.is_arithmetic() || self.is_bitwise() || self.is_logical()
    }

    /// True for the binary operators of [`NodeType::is_expression_op`];
    /// false for `NOT`/`BITNEGATE`, which are unary-only in this language.
    pub fn is_binary_op(self) -> bool {
        use NodeType::*;
        self.is_expression_op() && !matches!(self, Not | BitNegate)
    }

    pub fn is_start_symbol(self) -> bool {
        use NodeType::*;
        matches!(
            self,
            Vardef | Function | If | Else | ForLoop | WhileLoop | Native | Public | Private
                | Final | Constant | Struct
        )
    }

    /// Operators eligible for unary remapping in prefix position, and
    /// their remapped target — spec §3 "prefix-operator set".
    pub fn unary_remap(self) -> Option<NodeType> {
        use NodeType::*;
        match self {
            Mul => Some(PtrDeref),
            BitAnd => Some(FindAddress),
            Sub => Some(SwitchSign),
            Not => Some(Not),
            _ => None,
        }
    }

    /// Operator precedence table, spec §3. Higher binds tighter.
    /// Returns `None` for non-operator node types.
    pub fn precedence(self) -> Option<u8> {
        use NodeType::*;
        Some(match self {
            LogicOr => 3,
            LogicAnd => 4,
            BitOr => 5,
            BitXor => 6,
            BitAnd => 7,
            Eq | Neq => 8,
            Lt | Lte | Gt | Gte => 9,
            ArithLeftShift | ArithRightShift | LogicRightShift => 10,
            Add | Sub => 11,
            Mul | Div | Modulo => 12,
            BitNegate | Not => 13,
            Member => 14,
            PtrDeref | FindAddress | SwitchSign => 13,
            _ => return None,
        })
    }

    /// Numeric rank table, spec §3. Used by `arithmeticPrecedence` to pick
    /// the wider of two operand types.
    pub fn numeric_rank(self) -> Option<i8> {
        use NodeType::*;
        Some(match self {
            Char | CharT => -1,
            Short => 0,
            Int32 | Int32T => 1,
            Int64 | Int64T => 2,
            Fp32 | Fp32T => 3,
            Fp64 | Fp64T => 4,
            _ => return None,
        })
    }

    pub fn is_float(self) -> bool {
        matches!(self, NodeType::Fp32 | NodeType::Fp64 | NodeType::Fp32T | NodeType::Fp64T)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Tagged union carried by every token and AST node, spec §3.
///
/// Replaces the original's C-style union-plus-string-sidecar with a real
/// sum type; `Display` is the total string-rendering function the
/// original split across several ad-hoc `toString` branches.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int32(i32),
    Int64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    TypeRef(NodeType),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v as f64),
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_type_ref(&self) -> Option<NodeType> {
        match self {
            Value::TypeRef(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::TypeRef(t) => write!(f, "{t}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}
