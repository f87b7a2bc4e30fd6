//! The two-pass recursive-descent compiler (C6): an import pass over
//! top-level tokens followed by a rule pass that drives [RuleBuilder]
//! through [combinators] (§4.4, §4.5).
use crate::builder::{BuilderEvent, RuleBuilder};
use crate::combinators::{self, CursorHost, StepResult};
use crate::cursor::TokenCursor;
use crate::error::CompileError;
use crate::log::Log;
use crate::module::{Import, RuleDefinition};
use crate::token::{Token, TokenKind};
use indexmap::IndexMap;

/// Owns the token cursor and the growing import/rule maps for one source
/// file. Scratch fields (`import_pkg`, `import_alias`, `import_is_static`,
/// `builder`) hold state that free-standing step functions need to share,
/// since plain `fn` items cannot close over locals (§9: "model
/// combinators as ordinary functions... not as a class hierarchy").
pub struct Parser {
    cursor: TokenCursor,
    imports: IndexMap<String, Import>,
    rules: IndexMap<String, RuleDefinition>,
    builder: Option<RuleBuilder>,
    import_pkg: String,
    import_alias: String,
    import_is_static: bool,
    log: Log<&'static str>,
}

impl CursorHost for Parser {
    fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            imports: IndexMap::new(),
            rules: IndexMap::new(),
            builder: None,
            import_pkg: String::new(),
            import_alias: String::new(),
            import_is_static: false,
            log: Log::None,
        }
    }

    pub fn with_log(tokens: Vec<Token>, log: Log<&'static str>) -> Self {
        Self {
            log,
            ..Self::new(tokens)
        }
    }

    /// Runs both passes and returns the collected imports and rules, each
    /// in source order (§5: "rule map insertion order follows source
    /// order of rule headers") — both maps are [IndexMap]s populated by
    /// a single in-order pass over the token stream, so insertion order
    /// and iteration order are one and the same.
    pub fn parse(mut self) -> Result<(IndexMap<String, Import>, IndexMap<String, RuleDefinition>), CompileError> {
        self.run_import_pass()?;
        self.run_rule_pass()?;
        Ok((self.imports, self.rules))
    }

    /// "Begin pass" trace, mirroring [Tokenizer](crate::tokenizer::Tokenizer)'s
    /// `trace_entry` and the teacher's `Log::Verbose`-gated entry line.
    fn trace_entry(&self, phase: &str) {
        #[cfg(debug_assertions)]
        if self.log.order() >= Log::Verbose(()).order() {
            eprintln!("[{}; ParseBegin]: {}", self.log, phase);
        }
        #[cfg(not(debug_assertions))]
        let _ = phase;
    }

    /// Per-item success trace (one import loaded, one rule compiled).
    fn trace_success(&self, phase: &str, name: &str) {
        #[cfg(debug_assertions)]
        if self.log.order() >= Log::Success(()).order() {
            eprintln!("[{}; ParseSuccess]: {} {:?}", self.log, phase, name);
        }
        #[cfg(not(debug_assertions))]
        let _ = (phase, name);
    }

    /// Failure trace, mirroring [Tokenizer::tokenize](crate::tokenizer::Tokenizer::tokenize)'s
    /// `trace_failure`: logs and returns the error unchanged so call sites
    /// can trace-and-return in one expression.
    fn trace_failure(&self, err: CompileError) -> CompileError {
        #[cfg(debug_assertions)]
        if self.log.order() >= Log::Default(()).order() {
            eprintln!("[{}; ParseFailure]: {}", self.log, err);
        }
        err
    }

    /// Consumes tokens up to and including the next [TokenKind::Semicolon],
    /// or through EOF if none remains. A plain literal translation of the
    /// source's `AdvancePastNextSemicolonIfAny` has an inverted loop
    /// condition that can make it a no-op (§9); this always advances.
    fn advance_past_next_semicolon(&mut self) {
        while self.cursor.has_next() {
            let is_semicolon = self.cursor.peek_kind_any(&[TokenKind::Semicolon]);
            self.cursor.advance().expect("has_next just checked");
            if is_semicolon {
                break;
            }
        }
    }

    fn reset_import_scratch(&mut self) {
        self.import_pkg.clear();
        self.import_alias.clear();
        self.import_is_static = false;
    }

    /// §4.4: one pass over top-level tokens collecting `import` statements.
    /// Rule headers and unrecognized top-level tokens are skipped to their
    /// terminating semicolon; their validity is confirmed by the rule pass.
    fn run_import_pass(&mut self) -> Result<(), CompileError> {
        self.trace_entry("import pass");
        self.cursor.reset();
        while self.cursor.has_next() {
            let token = self.cursor.peek().expect("has_next just checked").clone();
            match token.kind {
                TokenKind::DollarIdentifier => self.advance_past_next_semicolon(),
                TokenKind::Word if token.text.eq_ignore_ascii_case("import") => {
                    self.reset_import_scratch();
                    let steps: [fn(&mut Parser) -> StepResult; 4] = [
                        step_optional_static,
                        step_package_name,
                        step_optional_alias,
                        step_semicolon,
                    ];
                    if !combinators::seq(self, &steps)? {
                        return Err(self.trace_failure(CompileError::new(format!(
                            "Malformed input statement on line {}",
                            token.line
                        ))));
                    }
                    if self.imports.contains_key(&self.import_pkg) {
                        return Err(self.trace_failure(CompileError::new(format!(
                            "Package {} already loaded",
                            self.import_pkg
                        ))));
                    }
                    if !self.import_alias.is_empty() && self.import_is_static {
                        return Err(self.trace_failure(CompileError::new(format!(
                            "Package {} cannot be both static and renamed",
                            self.import_pkg
                        ))));
                    }
                    self.trace_success("import", &self.import_pkg);
                    self.imports.insert(
                        self.import_pkg.clone(),
                        Import {
                            alias: self.import_alias.clone(),
                            is_static: self.import_is_static,
                        },
                    );
                }
                _ => self.advance_past_next_semicolon(),
            }
        }
        Ok(())
    }

    /// §4.5: one pass over top-level tokens compiling rule bodies.
    fn run_rule_pass(&mut self) -> Result<(), CompileError> {
        self.trace_entry("rule pass");
        self.cursor.reset();
        while self.cursor.has_next() {
            let token = self.cursor.peek().expect("has_next just checked").clone();
            if token.kind != TokenKind::DollarIdentifier {
                self.advance_past_next_semicolon();
                continue;
            }
            let rule_name = token.text.clone();
            self.cursor.advance().expect("has_next just checked");
            self.builder = Some(RuleBuilder::new(rule_name.clone()));
            let steps: [fn(&mut Parser) -> StepResult; 4] = [
                step_optional_rule_function,
                step_equals,
                step_expression,
                step_semicolon,
            ];
            match combinators::seq(self, &steps) {
                Ok(true) => {
                    let builder = self.builder.take().expect("just assigned above");
                    let (root, callback) = builder.finish();
                    self.trace_success("rule", &rule_name);
                    self.rules.insert(rule_name, RuleDefinition { root, callback });
                }
                Ok(false) => {
                    self.builder = None;
                    return Err(self.trace_failure(CompileError::new(format!(
                        "Bad definition on line {}",
                        token.line
                    ))));
                }
                Err(err) => {
                    self.builder = None;
                    return Err(self.trace_failure(err));
                }
            }
        }
        Ok(())
    }

    fn active_builder(&mut self) -> &mut RuleBuilder {
        self.builder
            .as_mut()
            .expect("a builder is always active while rule-body steps run")
    }
}

// ---- import pass steps (§4.4) ----

fn step_optional_static(state: &mut Parser) -> StepResult {
    if let Some(token) = state.cursor.peek() {
        if token.kind == TokenKind::Word && token.text.eq_ignore_ascii_case("static") {
            state.cursor.advance().expect("peek just matched");
            state.import_is_static = true;
        }
    }
    Ok(true)
}

fn step_package_name(state: &mut Parser) -> StepResult {
    let first = match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::Word => token.text.clone(),
        _ => return Ok(false),
    };
    state.cursor.advance().expect("peek just matched");
    state.import_pkg = first;
    combinators::star(state, step_dotted_segment)
}

/// `. Word`, appended to the package path under construction. A dangling
/// period (not followed by a Word) simply fails this single iteration;
/// [combinators::star] restores the period, so `package_name` still ends
/// exactly where the dangling period begins — the subsequent
/// `optional_alias`/semicolon steps then fail there too, and `seq` raises
/// the malformed-import error (§9: the source's literal "cursor left
/// after the period" wording is not load-bearing).
fn step_dotted_segment(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::Period]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::Word => {
            let word = token.text.clone();
            state.cursor.advance().expect("peek just matched");
            state.import_pkg.push('.');
            state.import_pkg.push_str(&word);
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn step_optional_alias(state: &mut Parser) -> StepResult {
    let mark = state.cursor.mark();
    match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::Word && token.text.eq_ignore_ascii_case("as") => {
            state.cursor.advance().expect("peek just matched");
            match state.cursor.peek() {
                Some(alias_token) if alias_token.kind == TokenKind::Word => {
                    state.import_alias = alias_token.text.clone();
                    state.cursor.advance().expect("peek just matched");
                    Ok(true)
                }
                _ => {
                    state.cursor.restore(mark).expect("mark just taken");
                    Ok(true)
                }
            }
        }
        _ => Ok(true),
    }
}

fn step_semicolon(state: &mut Parser) -> StepResult {
    if state.cursor.peek_kind_any(&[TokenKind::Semicolon]) {
        state.cursor.advance().expect("peek just matched");
        Ok(true)
    } else {
        Ok(false)
    }
}

// ---- rule pass steps (§4.5) ----

fn step_optional_rule_function(state: &mut Parser) -> StepResult {
    if let Some(token) = state.cursor.peek() {
        if token.kind == TokenKind::AtIdentifier {
            let name = token.text.clone();
            state.cursor.advance().expect("peek just matched");
            state.active_builder().set_callback(name);
        }
    }
    Ok(true)
}

fn step_equals(state: &mut Parser) -> StepResult {
    if state.cursor.peek_kind_any(&[TokenKind::Equals]) {
        state.cursor.advance().expect("peek just matched");
        Ok(true)
    } else {
        Ok(false)
    }
}

/// `expression := plus_any(repeatable_expr, optional_expr)` (§4.5). The
/// `optional_expr` alternative is never actually reached: `any()` tries
/// `repeatable_expr` first, and `repeatable_expr`'s own primary list
/// already includes `optional_expr`. Kept for a literal match with the
/// informal grammar rather than collapsed away.
fn step_expression(state: &mut Parser) -> StepResult {
    let steps: [fn(&mut Parser) -> StepResult; 2] = [step_repeatable_expr, step_optional_expr];
    combinators::plus_any(state, &steps)
}

fn step_repeatable_expr(state: &mut Parser) -> StepResult {
    let primaries: [fn(&mut Parser) -> StepResult; 5] = [
        step_word,
        step_quoted,
        step_variable,
        step_choices,
        step_optional_expr,
    ];
    if !combinators::any(state, &primaries)? {
        return Ok(false);
    }
    let quantifiers: [fn(&mut Parser) -> StepResult; 3] =
        [step_repeat_range, step_kleene_star, step_kleene_plus];
    combinators::any(state, &quantifiers)?;
    Ok(true)
}

fn step_word(state: &mut Parser) -> StepResult {
    match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::Word => {
            let text = token.text.clone();
            state.cursor.advance().expect("peek just matched");
            state.active_builder().apply(BuilderEvent::AddWord(text))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn step_quoted(state: &mut Parser) -> StepResult {
    match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::QuotedString => {
            let text = token.text.clone();
            state.cursor.advance().expect("peek just matched");
            state.active_builder().apply(BuilderEvent::AddWord(text))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn step_variable(state: &mut Parser) -> StepResult {
    match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::DollarIdentifier => {
            let text = token.text.clone();
            state.cursor.advance().expect("peek just matched");
            state
                .active_builder()
                .apply(BuilderEvent::AddVariable(text))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// `choices := "(" pipe_expression ")"`. A partial match here (an open
/// paren followed by a malformed body) leaves the builder holding an
/// unclosed group with no matching `end_group`. That never surfaces as a
/// usable result: the disjoint leading tokens of `word`/`quoted`/
/// `variable`/`optional_expr` mean no other alternative can match the
/// same position, so this failure is guaranteed to propagate all the way
/// out to a "Bad definition" error and the whole builder is discarded
/// without ever being finished.
fn step_choices(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::ParenStart]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::StartGroup)?;
    if !step_pipe_expression(state)? {
        return Ok(false);
    }
    if !state.cursor.peek_kind_any(&[TokenKind::ParenEnd]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::EndGroup)?;
    Ok(true)
}

/// `optional_expr := "[" pipe_expression "]"`. See [step_choices] for why
/// a partial match's builder corruption is harmless.
fn step_optional_expr(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::BracketStart]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::StartOptional)?;
    if !step_pipe_expression(state)? {
        return Ok(false);
    }
    if !state.cursor.peek_kind_any(&[TokenKind::BracketEnd]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::EndOptional)?;
    Ok(true)
}

/// `pipe_expression := expression ("|" expression)*`.
fn step_pipe_expression(state: &mut Parser) -> StepResult {
    if !step_expression(state)? {
        return Ok(false);
    }
    combinators::star(state, step_pipe_continuation)
}

fn step_pipe_continuation(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::Pipe]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::OnPipe)?;
    step_expression(state)
}

/// `repeat_range := "{" number ("," number?)? "}"`.
fn step_repeat_range(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::CurlyStart]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    let min = match state.cursor.peek() {
        Some(token) if token.kind == TokenKind::Number => {
            let text = token.text.clone();
            state.cursor.advance().expect("peek just matched");
            text.parse::<i64>().expect("tokenizer guarantees digits")
        }
        _ => return Ok(false),
    };
    let mut max = Some(min);
    if state.cursor.peek_kind_any(&[TokenKind::Comma]) {
        state.cursor.advance().expect("peek just matched");
        max = match state.cursor.peek() {
            Some(token) if token.kind == TokenKind::Number => {
                let text = token.text.clone();
                state.cursor.advance().expect("peek just matched");
                Some(text.parse::<i64>().expect("tokenizer guarantees digits"))
            }
            _ => None,
        };
    }
    if !state.cursor.peek_kind_any(&[TokenKind::CurlyEnd]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state
        .active_builder()
        .apply(BuilderEvent::SetRange { min, max })?;
    Ok(true)
}

fn step_kleene_star(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::Star]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::SetStar)?;
    Ok(true)
}

fn step_kleene_plus(state: &mut Parser) -> StepResult {
    if !state.cursor.peek_kind_any(&[TokenKind::Plus]) {
        return Ok(false);
    }
    state.cursor.advance().expect("peek just matched");
    state.active_builder().apply(BuilderEvent::SetPlus)?;
    Ok(true)
}
