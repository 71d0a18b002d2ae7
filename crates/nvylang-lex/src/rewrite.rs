//! Pre-parse rewriter: three independent passes over source lines / the
//! token graph (spec §4.2), run in order before parsing.

use nvylang_util::{NodeType, Value};
use rustc_hash::FxHashMap;

use crate::token::TokenGraph;

/// (a) Inline-comment stripping, run over raw lines before lexing.
///
/// Tracks `"`/`'` string state per line so a `//` inside a string literal
/// is left alone; an unescaped `//` outside of one truncates the rest of
/// the line.
pub fn strip_inline_comments(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_dquote = false;
    let mut in_squote = false;
    let mut i = 0;
    while i + 1 <= bytes.len() {
        let c = bytes[i];
        if c == b'"' && !in_squote && (i == 0 || bytes[i - 1] != b'\\') {
            in_dquote = !in_dquote;
        } else if c == b'\'' && !in_dquote && (i == 0 || bytes[i - 1] != b'\\') {
            in_squote = !in_squote;
        } else if !in_dquote && !in_squote && c == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            return &line[..i];
        }
        i += 1;
    }
    line
}

/// Collision-tracked record of every mangled function name produced for
/// one compilation context (spec §9: confined per-context, not global).
#[derive(Default)]
pub struct MangleTable {
    original_to_mangled: FxHashMap<String, String>,
    qualified_to_mangled: FxHashMap<String, String>,
    collisions: Vec<String>,
}

impl MangleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mangled_for(&self, original_name: &str) -> Option<&str> {
        self.original_to_mangled.get(original_name).map(String::as_str)
    }

    /// Look up by `module + "_" + originalName`, disambiguating two
    /// modules that both declared the same function name.
    pub fn mangled_for_qualified(&self, module: &str, original_name: &str) -> Option<&str> {
        self.qualified_to_mangled
            .get(&format!("{}_{}", module, original_name))
            .map(String::as_str)
    }

    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    fn sanitize_module(module: &str) -> String {
        module.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
    }

    /// Mangle one declared function name, recording it under both its bare
    /// and module-qualified keys. `main` passes through unchanged.
    pub fn mangle(&mut self, module: &str, name: &str) -> String {
        if name == "main" {
            return name.to_string();
        }
        let sanitized = Self::sanitize_module(module);
        let mangled = format!("_nvylang_{}_{}{}_{}", sanitized, name.len(), name, module.len());

        if self.original_to_mangled.contains_key(name) {
            self.collisions.push(name.to_string());
        }
        self.original_to_mangled.insert(name.to_string(), mangled.clone());
        self.qualified_to_mangled
            .insert(format!("{}_{}", module, name), mangled.clone());
        mangled
    }
}

/// (b) Function-name mangling, run as a line pass before lexing.
///
/// For every line starting with `func `, extract the function name and
/// substitute its mangled form in place, recording the mapping in `table`.
pub fn mangle_functions(lines: &[String], module: &str, table: &mut MangleTable) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            let Some(rest) = line.strip_prefix("func ") else {
                return line.clone();
            };
            let trimmed = rest.trim_start();
            let name_len = trimmed
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(trimmed.len());
            if name_len == 0 {
                return line.clone();
            }
            let name = &trimmed[..name_len];
            let mangled = table.mangle(module, name);
            format!("func {}{}", mangled, &trimmed[name_len..])
        })
        .collect()
}

/// (c) Special-symbol resolution over the token graph: pointer types,
/// array types/access, and function-call recognition.
pub fn resolve_special_symbols(graph: &mut TokenGraph) {
    collapse_pointer_types(graph);
    collapse_array_types(graph);
    collapse_array_access(graph);
    recognize_function_calls(graph);
}

fn is_type_symbol(ty: NodeType) -> bool {
    ty.is_type()
}

fn collapse_pointer_types(graph: &mut TokenGraph) {
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        let next_id = graph.next(id);
        if is_type_symbol(graph.ty(id)) {
            let base_ty = graph.ty(id);
            let mut stars = 0usize;
            let mut scan = next_id;
            while let Some(s) = scan {
                if graph.ty(s) == NodeType::Mul {
                    stars += 1;
                    scan = graph.next(s);
                } else {
                    break;
                }
            }
            if stars > 0 {
                let rendered = format!("{}{}", type_name(base_ty), "*".repeat(stars));
                graph.set_ty(id, NodeType::Star);
                graph.set_value(id, Value::Str(rendered));
                let mut drop_id = next_id;
                for _ in 0..stars {
                    let d = drop_id.unwrap();
                    drop_id = graph.next(d);
                    graph.remove(d);
                }
                cur = Some(id);
                continue;
            }
        }
        cur = next_id;
    }
}

fn collapse_array_types(graph: &mut TokenGraph) {
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        let next_id = graph.next(id);
        if is_type_symbol(graph.ty(id)) {
            if let Some(open) = next_id {
                if graph.ty(open) == NodeType::OpenBrkt {
                    if let Some(close) = graph.next(open) {
                        if graph.ty(close) == NodeType::CloseBrkt {
                            let elem_ty = graph.ty(id);
                            graph.set_ty(id, NodeType::ArrayType);
                            graph.set_value(id, Value::TypeRef(elem_ty));
                            graph.remove(open);
                            graph.remove(close);
                            cur = Some(id);
                            continue;
                        }
                    }
                }
            }
        }
        cur = next_id;
    }
}

/// `VARIABLE|TYPE_SYMBOL [INT32|VARIABLE]` → `ARRAY_ACCESS`/`ARRAY` name +
/// index/size.
fn collapse_array_access(graph: &mut TokenGraph) {
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        let ty = graph.ty(id);
        let next_id = graph.next(id);
        let is_name = ty == NodeType::Variable || is_type_symbol(ty);
        if is_name {
            if let Some(open) = next_id {
                if graph.ty(open) == NodeType::OpenBrkt {
                    if let Some(idx_tok) = graph.next(open) {
                        let idx_ty = graph.ty(idx_tok);
                        if idx_ty == NodeType::Int32 || idx_ty == NodeType::Variable {
                            if let Some(close) = graph.next(idx_tok) {
                                if graph.ty(close) == NodeType::CloseBrkt {
                                    let after = graph.next(close);
                                    let head_ty = if ty == NodeType::Variable {
                                        NodeType::ArrayAccess
                                    } else {
                                        NodeType::Array
                                    };
                                    let size_ty = if head_ty == NodeType::Array {
                                        NodeType::ArraySize
                                    } else {
                                        NodeType::ArrayIndex
                                    };
                                    let name_value = graph.value(id).clone();
                                    let idx_value = graph.value(idx_tok).clone();
                                    let head = graph.insert_after(id, head_ty, Value::Null);
                                    let name_node = graph.insert_after(head, ty, name_value);
                                    graph.insert_after(name_node, size_ty, idx_value);
                                    graph.remove(id);
                                    graph.remove(open);
                                    graph.remove(idx_tok);
                                    graph.remove(close);
                                    cur = after.or(Some(head));
                                    continue;
                                }
                            }
                        }
                    }
                }
            }
        }
        cur = next_id;
    }
}

fn recognize_function_calls(graph: &mut TokenGraph) {
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        let next_id = graph.next(id);
        if graph.ty(id) == NodeType::Variable {
            if let Some(open) = next_id {
                if graph.ty(open) == NodeType::OpenParens {
                    graph.set_ty(id, NodeType::FunctionCall);
                    cur = Some(id);
                    continue;
                }
            }
        }
        cur = next_id;
    }
}

fn type_name(ty: NodeType) -> &'static str {
    match ty {
        NodeType::Int32T => "int32",
        NodeType::Int64T => "int64",
        NodeType::Fp32T => "fp32",
        NodeType::Fp64T => "fp64",
        NodeType::StrT => "str",
        NodeType::CharT => "char",
        NodeType::BoolT => "bool",
        NodeType::VoidT => "void",
        _ => "type",
    }
}
