//! Orchestrates lex → rewrite → parse → emit for each input file and
//! reports diagnostics the way spec §7 requires: no partial IR on
//! failure, no recovery within a unit.

use std::io::Write;
use std::path::Path;

use inkwell::context::Context;
use inkwell::OptimizationLevel;
use tracing::{debug, info};

use nvylang_ir::Emitter;
use nvylang_lex::{lex_module, MangleTable};
use nvylang_par::parse;
use nvylang_util::diagnostic::{DiagnosticBuilder, Handler};
use nvylang_util::span::SourceMap;
use nvylang_util::Span;

use crate::cli::{Cli, EmitKind};
use crate::error::{DriverError, DriverResult};

/// Runs the whole CLI: one compilation unit per input file, diagnostics
/// written to stderr, result written to `--output` or stdout.
pub fn run(cli: &Cli) -> DriverResult<()> {
    let mut mangle_table = MangleTable::new();
    let mut last_output = String::new();

    for input in &cli.inputs {
        let module_name = cli
            .module
            .clone()
            .unwrap_or_else(|| module_name_from_path(input));
        last_output = compile_unit(input, &module_name, cli.emit, &mut mangle_table)?;
    }

    match &cli.output {
        Some(path) => {
            std::fs::write(path, last_output).map_err(|source| DriverError::Io {
                path: path.clone(),
                source,
            })?;
        }
        None => {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(last_output.as_bytes());
            let _ = stdout.write_all(b"\n");
        }
    }

    Ok(())
}

fn module_name_from_path(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("module").to_string()
}

fn compile_unit(
    input: &Path,
    module_name: &str,
    emit: EmitKind,
    mangle_table: &mut MangleTable,
) -> DriverResult<String> {
    let handler = Handler::new();
    let text = std::fs::read_to_string(input).map_err(|source| DriverError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let mut source_map = SourceMap::new();
    let file_id = source_map.add_file(input.display().to_string(), text);
    let file = source_map.get(file_id).expect("file was just added");
    let lines: Vec<String> = file.lines().iter().map(|l| l.to_string()).collect();

    let unit = input.display().to_string();

    let graph = {
        let _span = tracing::debug_span!("lexing", unit = %unit).entered();
        debug!(lines = lines.len(), "lexing source");
        match lex_module(&lines, module_name, mangle_table) {
            Ok(graph) => graph,
            Err(err) => {
                let span = Span::point(err.line(), 1).with_file_id(file_id);
                DiagnosticBuilder::error(err.to_string()).code(err.code()).span(span).emit(&handler);
                return abort(&handler, &unit, &source_map);
            }
        }
    };
    info!(unit = %unit, "rewriting complete");

    if emit == EmitKind::Tokens {
        return Ok(render_tokens(&graph));
    }

    let ast = {
        let _span = tracing::debug_span!("parsing", unit = %unit).entered();
        match parse(&graph) {
            Ok(ast) => ast,
            Err(err) => {
                DiagnosticBuilder::error(err.to_string())
                    .code(err.code())
                    .span(Span::DUMMY.with_file_id(file_id))
                    .emit(&handler);
                return abort(&handler, &unit, &source_map);
            }
        }
    };
    info!(unit = %unit, items = ast.len(), "parsing complete");

    if emit == EmitKind::Ast {
        return Ok(format!("{ast:#?}"));
    }

    let _span = tracing::debug_span!("emitting", unit = %unit).entered();
    let context = Context::create();
    let mut builder = nvylang_codegen::LlvmModuleBuilder::new(
        &context,
        module_name,
        default_target(),
        OptimizationLevel::None,
    );
    let mut emitter = Emitter::new(&mut builder);
    if let Err(err) = emitter.compile_program(&ast) {
        let code = match &err {
            nvylang_ir::EmitError::Resolve(e) => e.code(),
            nvylang_ir::EmitError::Type(e) => e.code(),
        };
        DiagnosticBuilder::error(err.to_string())
            .code(code)
            .span(Span::DUMMY.with_file_id(file_id))
            .emit(&handler);
        return abort(&handler, &unit, &source_map);
    }
    info!(unit = %unit, "emission complete");

    Ok(builder.emit_llvm_ir())
}

fn abort<T>(handler: &Handler, unit: &str, source_map: &SourceMap) -> DriverResult<T> {
    for diag in handler.diagnostics() {
        match source_map.format_span(diag.span) {
            Some(located) => eprintln!("{}: {}\n{located}", diag.level.name(), diag.message),
            None => eprintln!("{}: {}", diag.level.name(), diag.message),
        }
    }
    Err(DriverError::Diagnostics {
        count: handler.error_count(),
        unit: unit.to_string(),
    })
}

fn render_tokens(graph: &nvylang_lex::TokenGraph) -> String {
    let mut out = String::new();
    let mut current = Some(graph.head());
    while let Some(id) = current {
        out.push_str(&format!("{} {}\n", graph.ty(id), graph.value(id)));
        current = graph.next(id);
    }
    out
}

fn default_target() -> String {
    std::env::var("TARGET").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "x86_64-apple-darwin".to_string()
        } else if cfg!(target_os = "windows") {
            "x86_64-pc-windows-msvc".to_string()
        } else {
            "x86_64-unknown-linux-gnu".to_string()
        }
    })
}
