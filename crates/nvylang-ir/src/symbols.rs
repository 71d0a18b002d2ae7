//! Per-module symbol storage (spec §4.6): name-keyed maps from variables
//! and functions to the backend handles and types the emitter needs.
//!
//! A missing key is never fatal here — lookups return a sentinel and the
//! caller decides whether that is a hard `ResolveError` (spec §7 policy),
//! matching the original's "lookup of a missing key returns a sentinel and
//! emits a diagnostic" rather than panicking mid-emission.

use rustc_hash::FxHashMap;

use nvylang_util::NodeType;

use crate::error::ResolveError;

/// `V` is the backend's alloca/value handle type (e.g. an LLVM
/// `PointerValue`); `F` is its function handle type.
pub struct SymbolStorage<V, F> {
    allocas: FxHashMap<String, V>,
    var_types: FxHashMap<String, NodeType>,
    array_elem_types: FxHashMap<String, NodeType>,
    fun_types: FxHashMap<String, NodeType>,
    fun_handles: FxHashMap<String, F>,
}

impl<V: Clone, F: Clone> SymbolStorage<V, F> {
    pub fn new() -> Self {
        Self {
            allocas: FxHashMap::default(),
            var_types: FxHashMap::default(),
            array_elem_types: FxHashMap::default(),
            fun_types: FxHashMap::default(),
            fun_handles: FxHashMap::default(),
        }
    }

    pub fn store_alloca(&mut self, name: &str, slot: V) {
        self.allocas.insert(name.to_string(), slot);
    }

    pub fn get_alloca(&self, name: &str) -> Result<V, ResolveError> {
        self.allocas
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::UndefinedVariable { name: name.to_string() })
    }

    pub fn store_var_type(&mut self, name: &str, ty: NodeType) {
        self.var_types.insert(name.to_string(), ty);
    }

    pub fn get_var_type(&self, name: &str) -> Result<NodeType, ResolveError> {
        self.var_types
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UndefinedVariable { name: name.to_string() })
    }

    pub fn store_array_elem_type(&mut self, name: &str, elem_ty: NodeType) {
        self.array_elem_types.insert(name.to_string(), elem_ty);
    }

    pub fn get_array_elem_type(&self, name: &str) -> Result<NodeType, ResolveError> {
        self.array_elem_types
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UndefinedVariable { name: name.to_string() })
    }

    pub fn store_fun_type(&mut self, name: &str, return_type: NodeType) {
        self.fun_types.insert(name.to_string(), return_type);
    }

    pub fn get_fun_type(&self, name: &str) -> Result<NodeType, ResolveError> {
        self.fun_types
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UndefinedFunction { name: name.to_string() })
    }

    pub fn store_fun_handle(&mut self, name: &str, handle: F) {
        self.fun_handles.insert(name.to_string(), handle);
    }

    pub fn get_fun_handle(&self, name: &str) -> Result<F, ResolveError> {
        self.fun_handles
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::UndefinedFunction { name: name.to_string() })
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.var_types.contains_key(name) || self.fun_types.contains_key(name)
    }
}

impl<V: Clone, F: Clone> Default for SymbolStorage<V, F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_reports_undefined_instead_of_panicking() {
        let storage: SymbolStorage<u32, u32> = SymbolStorage::new();
        assert_eq!(
            storage.get_var_type("x"),
            Err(ResolveError::UndefinedVariable { name: "x".to_string() })
        );
    }

    #[test]
    fn stored_alloca_round_trips() {
        let mut storage: SymbolStorage<u32, u32> = SymbolStorage::new();
        storage.store_alloca("x", 42);
        assert_eq!(storage.get_alloca("x"), Ok(42));
    }

    #[test]
    fn redeclaration_is_detectable_via_is_declared() {
        let mut storage: SymbolStorage<u32, u32> = SymbolStorage::new();
        storage.store_var_type("x", NodeType::Int32T);
        assert!(storage.is_declared("x"));
        assert!(!storage.is_declared("y"));
    }

    #[test]
    fn array_element_type_round_trips() {
        let mut storage: SymbolStorage<u32, u32> = SymbolStorage::new();
        storage.store_array_elem_type("arr", NodeType::Int32T);
        assert_eq!(storage.get_array_elem_type("arr"), Ok(NodeType::Int32T));
        assert_eq!(
            storage.get_array_elem_type("missing"),
            Err(ResolveError::UndefinedVariable { name: "missing".to_string() })
        );
    }

    #[test]
    fn function_return_type_and_handle_round_trip() {
        let mut storage: SymbolStorage<u32, u32> = SymbolStorage::new();
        storage.store_fun_type("add", NodeType::Int32T);
        storage.store_fun_handle("add", 7);
        assert_eq!(storage.get_fun_type("add"), Ok(NodeType::Int32T));
        assert_eq!(storage.get_fun_handle("add"), Ok(7));
    }
}
