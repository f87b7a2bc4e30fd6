//! Literal-input scenarios S1-S7.
use crate::error::CompileOrLexError;
use crate::tokenizer::Tokenizer;
use crate::{compile, compile_module};
use serde_json::json;

/// S1: whitespace/tab handling and column bookkeeping, checked via a
/// `serde_json` structural comparison of the tokenized shape (mirroring
/// the teacher's `examples/__tests__/benchmark` use of `serde_json` for
/// fixture-style expectations, here against a literal value rather than
/// a file on disk).
#[test]
fn s1_lexing() {
    let tokens = Tokenizer::new()
        .tokenize("   this is\t\ta  Test")
        .expect("lexes cleanly");
    let actual = json!(tokens
        .iter()
        .map(|t| json!({ "text": t.text, "line": t.line, "column": t.column }))
        .collect::<Vec<_>>());
    let expected = json!([
        { "text": "this", "line": 1, "column": 3 },
        { "text": "is", "line": 1, "column": 8 },
        { "text": "a", "line": 1, "column": 12 },
        { "text": "Test", "line": 1, "column": 15 },
    ]);
    assert_eq!(actual, expected);
}

/// S2: `#`-to-EOL comments are insignificant between tokens.
#[test]
fn s2_comments() {
    let tokens = Tokenizer::new()
        .tokenize("#####\n# comment\nhi#\n\n#Test")
        .expect("lexes cleanly");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, "hi");
    assert_eq!(tokens[0].line, 3);
    assert_eq!(tokens[0].column, 0);
}

/// S3: `$`/`@` identifiers keep their dotted body and strip the prefix.
#[test]
fn s3_identifiers() {
    let tokens = Tokenizer::new()
        .tokenize("$hello\n@func\n$yes.no.maybe")
        .expect("lexes cleanly");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["hello", "func", "yes.no.maybe"]);
    let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
    assert!(tokens.iter().all(|t| t.column == 0));
}

/// S4: `static` and aliased imports are recorded distinctly.
#[test]
fn s4_imports() {
    let module = compile(
        "import package;\nimport package.inner as yes;\n$r = hello;",
    )
    .expect("compiles cleanly");
    assert_eq!(module.imports.len(), 2);
    let base = module.imports.get("package").unwrap();
    assert_eq!(base.alias, "");
    assert!(!base.is_static);
    let inner = module.imports.get("package.inner").unwrap();
    assert_eq!(inner.alias, "yes");
    assert!(!inner.is_static);
}

/// S4 variant from §6's worked example: `import static the.import;` sets
/// `is_static` with no alias.
#[test]
fn s4_static_import_without_alias() {
    let module = compile("import static the.import;\n$r = hello;").unwrap();
    let pkg = module.imports.get("the.import").unwrap();
    assert!(pkg.is_static);
    assert_eq!(pkg.alias, "");
}

/// S5: a rule combining every grouping/quantifier construct renders via
/// §4.7 exactly as specified.
#[test]
fn s5_rule_round_trip() {
    let module = compile("$r = a* (b{3} c+ | (d | e{2,9}) [f]) ((g)) h{3,};").unwrap();
    let rule = module.rules.get("r").unwrap();
    assert_eq!(
        rule.root.render(),
        "a* (b{3} c+ | (d | e{2,9}) [f]) ((g)) h{3,}"
    );
}

/// S6: each of these inputs must raise a lex error, not panic or succeed.
#[test]
fn s6_lex_errors() {
    let bad_inputs = [
        "_", "4a5", "4.5", "1_", "\"hi", "hel$lo", "hel1", "TE&ST", "1234a", "12$3",
    ];
    for input in bad_inputs {
        match compile(input) {
            Err(CompileOrLexError::Lex(_)) => {}
            other => panic!("expected a lex error for {:?}, got {:?}", input, other),
        }
    }
}

/// S7: semantic violations raise compile errors, not lex errors, and the
/// whole module fails rather than silently dropping the bad rule/import.
#[test]
fn s7_compile_errors() {
    assert!(matches!(
        compile("$r = a{3,1};"),
        Err(CompileOrLexError::Compile(_))
    ));
    assert!(matches!(
        compile("import a; import a;"),
        Err(CompileOrLexError::Compile(_))
    ));
    assert!(matches!(
        compile("import static a as x;"),
        Err(CompileOrLexError::Compile(_))
    ));
}

/// The VCG example straight from §6, combining imports and two rules with
/// grouping, quoting, and a numeric literal.
#[test]
fn section_6_worked_example_compiles() {
    let module = compile_module(
        "import my.package.here;\n\n$test = hello [my friendly] computer 12;\n$some_thing @func = yes [(and | or) \"no\"];",
        "pkg.path",
        "grammar.vcg",
    )
    .unwrap();
    assert_eq!(module.package_path, "pkg.path");
    assert_eq!(module.file_name, "grammar.vcg");
    assert_eq!(module.imports.len(), 1);
    assert_eq!(module.rules.len(), 2);
    assert_eq!(
        module.rules.get("test").unwrap().root.render(),
        "hello [my friendly] computer 12"
    );
    let rule = module.rules.get("some_thing").unwrap();
    assert_eq!(rule.callback.as_deref(), Some("func"));
    assert_eq!(rule.root.render(), "yes [(and | or) no]");
}

/// §6's in-line example comment flags `import static the.import.*;` as
/// illegal (`*` is not part of a package name) — the dangling `*` after
/// the dotted path must not silently parse as part of the package.
#[test]
fn star_is_not_part_of_a_package_name() {
    assert!(compile("import static the.import.*;").is_err());
}

/// §5 ("Ordering guarantees"): "rule map insertion order follows source
/// order of rule headers," and the same holds for imports. A `HashMap`
/// cannot honor this; the `IndexMap`-backed maps on [crate::module::Module]
/// must iterate in exactly the order the headers appeared in source.
#[test]
fn rule_and_import_order_matches_source_order() {
    let module = compile(
        "import third.package;\nimport first.package;\nimport second.package;\n\n\
         $zeta = a;\n$alpha = b;\n$mu = c;",
    )
    .unwrap();

    let import_order: Vec<&str> = module.imports.keys().map(String::as_str).collect();
    assert_eq!(
        import_order,
        vec!["third.package", "first.package", "second.package"]
    );

    let rule_order: Vec<&str> = module.rules.keys().map(String::as_str).collect();
    assert_eq!(rule_order, vec!["zeta", "alpha", "mu"]);
}
