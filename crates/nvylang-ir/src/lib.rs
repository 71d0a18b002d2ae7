//! Drives an external [`ModuleBuilder`] backend from a parsed AST: name
//! resolution and numeric promotion live here, never in the backend.

pub mod builder;
pub mod emit;
pub mod error;
pub mod lattice;
pub mod symbols;

pub use builder::ModuleBuilder;
pub use emit::{arithmetic_precedence, Emitter};
pub use error::{EmitError, EmitResult, ResolveError, TypeError};
pub use lattice::{cast_for, mode_for, CastKind, NumericMode};
pub use symbols::SymbolStorage;

#[cfg(test)]
mod tests {
    use super::*;
    use nvylang_lex::{lex_module, MangleTable};
    use nvylang_util::{NodeType, Value};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Handle(u32);

    #[derive(Default)]
    struct CountingBuilder {
        next_id: u32,
        function_count: u32,
        ret_count: u32,
    }

    impl CountingBuilder {
        fn fresh(&mut self) -> Handle {
            self.next_id += 1;
            Handle(self.next_id)
        }
    }

    impl ModuleBuilder for CountingBuilder {
        type Function = u32;
        type Block = u32;
        type Value = Handle;

        fn make_function(&mut self, _: &str, _: &[String], _: &[NodeType], _: NodeType, _: bool) -> u32 {
            self.function_count += 1;
            self.next_id += 1;
            self.next_id
        }
        fn create_block(&mut self, _: u32, _: &str) -> u32 {
            self.next_id += 1;
            self.next_id
        }
        fn set_insertion_point(&mut self, _: u32) {}
        fn create_variable(&mut self, _: &str, _: NodeType) -> Handle {
            self.fresh()
        }
        fn store_to_variable(&mut self, _: Handle, _: Handle) {}
        fn create_load(&mut self, _: Handle, _: NodeType) -> Handle {
            self.fresh()
        }
        fn function_param(&self, _: u32, _: usize) -> Handle {
            Handle(0)
        }
        fn const_value(&mut self, _: NodeType, _: &Value) -> Handle {
            self.fresh()
        }
        fn create_binop(&mut self, _: NodeType, _: NumericMode, _: Handle, _: Handle) -> Handle {
            self.fresh()
        }
        fn create_compare(&mut self, _: NodeType, _: NumericMode, _: Handle, _: Handle) -> Handle {
            self.fresh()
        }
        fn create_cast(&mut self, _: CastKind, _: Handle) -> Handle {
            self.fresh()
        }
        fn create_unary_op(&mut self, _: NodeType, _: NumericMode, _: Handle) -> Handle {
            self.fresh()
        }
        fn create_call(&mut self, _: u32, _: &[Handle]) -> Handle {
            self.fresh()
        }
        fn create_ret(&mut self, _: Option<Handle>) {
            self.ret_count += 1;
        }
        fn create_cond_branch(&mut self, _: Handle, _: u32, _: u32) {}
        fn create_branch(&mut self, _: u32) {}
        fn create_array_variable(&mut self, _: &str, _: NodeType, _: Handle) -> Handle {
            self.fresh()
        }
        fn array_element_ptr(&mut self, _: Handle, _: NodeType, _: Handle) -> Handle {
            self.fresh()
        }
        fn get_native_type(&self, ty: NodeType) -> String {
            format!("{ty}")
        }
    }

    #[test]
    fn lexer_through_emitter_pipeline_compiles_two_functions() {
        let lines = vec![
            "func add(int32 a, int32 b) -> int32 {".to_string(),
            "return a + b;".to_string(),
            "}".to_string(),
            "func main() -> int32 {".to_string(),
            "let sum = add(1, 2);".to_string(),
            "return sum;".to_string(),
            "}".to_string(),
        ];
        let mut table = MangleTable::new();
        let graph = lex_module(&lines, "m", &mut table).unwrap();
        let items = nvylang_par::parse(&graph).unwrap();

        let mut builder = CountingBuilder::default();
        let mut emitter = Emitter::new(&mut builder);
        emitter.compile_program(&items).unwrap();

        assert_eq!(builder.function_count, 2);
        assert_eq!(builder.ret_count, 2);
    }
}
