//! `vcg` tokenizes and compiles the VCG grammar language into a
//! hierarchical node tree suitable for handing to a downstream
//! speech-recognition grammar builder.
//!
//! # Overview
//!
//! A VCG source file declares package imports and named rules; each rule
//! is a regular-expression-like composition of literal words, quoted
//! phrases, variable references, grouped alternations, optional blocks,
//! and repetition quantifiers. This crate covers the front end only:
//!
//! - [tokenizer] scans source text into a stream of [token::Token]s.
//! - [parser] is a two-pass backtracking recursive-descent compiler: an
//!   import pass collects `import` statements, and a rule pass drives
//!   [builder::RuleBuilder] through [combinators] to assemble each rule's
//!   [node::HierarchicalNode] tree.
//! - [module::Module] is the parse-result container handed to external
//!   collaborators: a directory walker, a speech-recognition grammar
//!   bridge, a scripting host, and a GUI shell all sit outside this
//!   crate and consume only a `Module`'s imports/rules maps.
//!
//! # Example
//!
//! ```
//! use vcg::compile;
//!
//! let module = compile(
//!     "import my.package.here;\n$test = hello [my friendly] computer 12;",
//! )
//! .unwrap();
//!
//! assert_eq!(module.imports.len(), 1);
//! let rule = module.rules.get("test").unwrap();
//! assert_eq!(rule.root.render(), "hello [my friendly] computer 12");
//! ```
//!
//! # Non-goals
//!
//! No evaluation/matching of the grammar against utterances, no code
//! generation, no incremental reparse, no concurrency within a single
//! compilation, no Unicode-class handling beyond ASCII letters/digits, no
//! floating-point numbers.
//!
//! # License
//! [vcg](crate) is provided under the MIT license.

pub mod builder;
pub mod combinators;
pub mod cursor;
pub mod error;
pub mod log;
pub mod module;
pub mod node;
pub mod parser;
pub mod token;
pub mod tokenizer;

#[cfg(test)]
mod __tests__;

use error::CompileOrLexError;
use module::Module;

/// Tokenizes and compiles a VCG source string, returning a [Module] with
/// no associated file-path metadata (`package_path`/`file_name` both
/// empty, `companion_file` absent).
///
/// Collaborators that know the originating path should prefer
/// [compile_module], which lets them supply that metadata directly
/// rather than have this crate derive it (deriving paths from the
/// filesystem is the directory walker's job, out of scope here — §1).
pub fn compile(source: &str) -> Result<Module, CompileOrLexError> {
    compile_module(source, "", "")
}

/// Tokenizes and compiles a VCG source string into a [Module] carrying
/// the given `package_path`/`file_name`, matching the data flow of §2:
/// source text → [tokenizer::Tokenizer] → token vector →
/// [cursor::TokenCursor] → [parser::Parser] (import pass, then rule pass).
pub fn compile_module(
    source: &str,
    package_path: impl Into<String>,
    file_name: impl Into<String>,
) -> Result<Module, CompileOrLexError> {
    let tokens = tokenizer::Tokenizer::new().tokenize(source)?;
    let (imports, rules) = parser::Parser::new(tokens).parse()?;
    let mut module = Module::new(package_path, file_name);
    module.imports = imports;
    module.rules = rules;
    Ok(module)
}
