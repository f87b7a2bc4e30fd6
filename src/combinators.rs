//! Backtracking parsing combinators driving [TokenCursor] (§4.3).
//!
//! Modeled as ordinary functions over a cursor-owning state, not a class
//! hierarchy (§9: "model combinators as ordinary functions... not as a
//! class hierarchy" — echoing the teacher's own `production::builder`
//! note that production utilities should be composed, not subclassed).
//! Each step is a plain `fn(&mut S) -> StepResult`, so composing a
//! sequence or choice of rule-grammar steps is just building an array of
//! function items — no captured state, no boxing.
use crate::cursor::TokenCursor;
use crate::error::CompileError;

/// `Ok(true)` — matched, cursor advanced.
/// `Ok(false)` — no match, cursor must be left exactly where the step
/// started (recoverable; combinators restore around this case).
/// `Err(_)` — a semantic violation (not a non-match); fatal to the whole
/// compile, so it short-circuits without restoring.
pub type StepResult = Result<bool, CompileError>;

/// Anything combinators can mark/restore a [TokenCursor] through.
pub trait CursorHost {
    fn cursor_mut(&mut self) -> &mut TokenCursor;
}

fn restore<S: CursorHost>(state: &mut S, marker: crate::cursor::Marker) {
    state
        .cursor_mut()
        .restore(marker)
        .expect("combinator markers are always taken from this cursor");
}

/// Try each step in order; return on the first success. Each failed
/// attempt restores the cursor to the point before that attempt. If all
/// fail, the cursor ends exactly where it started.
pub fn any<S: CursorHost>(state: &mut S, steps: &[fn(&mut S) -> StepResult]) -> StepResult {
    for &step in steps {
        let mark = state.cursor_mut().mark();
        match step(state) {
            Ok(true) => return Ok(true),
            Ok(false) => restore(state, mark),
            Err(err) => return Err(err),
        }
    }
    Ok(false)
}

/// Run every step in order; if any fails, restore to the position before
/// the whole sequence and fail. On success the cursor sits at the end of
/// the last step.
pub fn seq<S: CursorHost>(state: &mut S, steps: &[fn(&mut S) -> StepResult]) -> StepResult {
    let mark = state.cursor_mut().mark();
    for &step in steps {
        match step(state) {
            Ok(true) => continue,
            Ok(false) => {
                restore(state, mark);
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

/// Repeat `step` greedily; restore to the start of each failed iteration.
/// Always succeeds (zero iterations is fine).
pub fn star<S: CursorHost>(state: &mut S, step: fn(&mut S) -> StepResult) -> StepResult {
    loop {
        let mark = state.cursor_mut().mark();
        match step(state) {
            Ok(true) => continue,
            Ok(false) => {
                restore(state, mark);
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

/// Require one success, then behave as [star].
pub fn plus<S: CursorHost>(state: &mut S, step: fn(&mut S) -> StepResult) -> StepResult {
    let mark = state.cursor_mut().mark();
    match step(state) {
        Ok(true) => {}
        Ok(false) => {
            restore(state, mark);
            return Ok(false);
        }
        Err(err) => return Err(err),
    }
    star(state, step)
}

/// Require at least one [any] success among `steps`, then greedily repeat
/// [any] over them.
pub fn plus_any<S: CursorHost>(state: &mut S, steps: &[fn(&mut S) -> StepResult]) -> StepResult {
    if !any(state, steps)? {
        return Ok(false);
    }
    loop {
        if !any(state, steps)? {
            break;
        }
    }
    Ok(true)
}
