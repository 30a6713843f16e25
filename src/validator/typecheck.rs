/* Copyright 2020 Mozilla Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

// The validation algorithm here follows the "Validation Algorithm" section of
// the WebAssembly specification -
// https://webassembly.github.io/spec/core/appendix/algorithm.html.
//
// `push_operand`, `pop_operand`, `push_ctrl`, and `pop_ctrl` map directly to
// the functions of the same names in that appendix; everything else is built
// on top of them. Unlike the appendix, a failed check does not abort: it
// records a diagnostic and the transition continues on a best-effort basis so
// the rest of the function body can still be validated.

use crate::{CheckResult, Errors, Location, MaybeType, Opcode, ValType};
use std::ops::{Deref, DerefMut};

/// Indicator for what kind of instruction pushed a control frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A `block` construct, or the implicit function body frame.
    Block,
    /// A `loop` construct; branches to it take its params.
    Loop,
    /// The true branch of an `if`.
    If,
    /// The false branch of an `if`, entered by `else`.
    Else,
    /// The protected body of a `try`.
    Try,
    /// The handler of a `try`, entered by `catch`.
    Catch,
}

/// A control-flow frame on the control stack during validation.
#[derive(Debug, Clone)]
pub struct Frame {
    /// What kind of instruction pushed this frame.
    pub kind: FrameKind,
    /// The frame's parameter types; branches to a `Loop` frame target these.
    pub params: Vec<ValType>,
    /// The frame's result types; branches to any other frame target these.
    pub results: Vec<ValType>,
    /// The operand-stack height at entry; the frame cannot consume operands
    /// below this index.
    pub height: usize,
    /// Whether the rest of this frame is unreachable.
    pub unreachable: bool,
}

/// The abstract-stack interpreter for function bodies and the instruction
/// half of every instruction-level event.
///
/// The module-level [`Validator`](crate::Validator) resolves indices, limits,
/// alignments and feature gates, then drives one of the transition methods
/// here. State persists across events; error reporting goes through a
/// [`TypeCheckerTemp`] so each transition carries the location of the event
/// that triggered it.
#[derive(Default)]
pub(crate) struct TypeChecker {
    /// The current operand type stack.
    operands: Vec<MaybeType>,
    /// The stack of control frames currently open.
    control: Vec<Frame>,
    /// The label types of the first `br_table` target seen, used to check the
    /// remaining targets for consistency.
    br_table_sig: Option<Vec<ValType>>,
}

impl TypeChecker {
    pub(crate) fn new() -> TypeChecker {
        TypeChecker::default()
    }

    /// Bundles the checker with the error sink and the location of the event
    /// being processed. All transitions happen on the returned temporary.
    pub(crate) fn with_errors<'a>(
        &'a mut self,
        errors: &'a mut Errors,
        loc: Location,
    ) -> TypeCheckerTemp<'a> {
        TypeCheckerTemp {
            loc,
            inner: self,
            errors,
        }
    }

    /// The current operand-stack height.
    #[cfg(test)]
    pub(crate) fn operand_stack_height(&self) -> usize {
        self.operands.len()
    }
}

pub(crate) struct TypeCheckerTemp<'a> {
    loc: Location,
    inner: &'a mut TypeChecker,
    errors: &'a mut Errors,
}

impl Deref for TypeCheckerTemp<'_> {
    type Target = TypeChecker;
    fn deref(&self) -> &TypeChecker {
        self.inner
    }
}

impl DerefMut for TypeCheckerTemp<'_> {
    fn deref_mut(&mut self) -> &mut TypeChecker {
        self.inner
    }
}

fn types_to_string(types: &[ValType]) -> String {
    types
        .iter()
        .map(|ty| ty.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl TypeCheckerTemp<'_> {
    fn error(&mut self, message: impl Into<String>) -> CheckResult {
        self.errors.error(self.loc, message)
    }

    fn err_beyond_end(&mut self) -> CheckResult {
        self.error("operators remaining after end of function")
    }

    /// Pushes a type onto the operand stack. Always succeeds.
    fn push_operand(&mut self, ty: impl Into<MaybeType>) {
        let ty = ty.into();
        self.operands.push(ty);
    }

    /// Attempts to pop a type from the operand stack.
    ///
    /// With `expected: Some(ty)` the popped operand must be compatible with
    /// `ty`; with `None` anything on the stack will do (used by polymorphic
    /// instructions like `drop`). Popping in an unreachable frame whose
    /// operands are exhausted synthesizes a fresh bottom type, which matches
    /// any expectation.
    fn pop_operand(&mut self, expected: Option<ValType>) -> (MaybeType, CheckResult) {
        let (height, unreachable) = match self.control.last() {
            Some(frame) => (frame.height, frame.unreachable),
            None => return (MaybeType::Bottom, self.err_beyond_end()),
        };
        let actual = if self.operands.len() <= height {
            if unreachable {
                MaybeType::Bottom
            } else {
                let desc = match expected {
                    Some(ty) => ty.to_string(),
                    None => "a type".to_string(),
                };
                let result =
                    self.error(format!("type mismatch: expected {desc} but nothing on stack"));
                return (MaybeType::Bottom, result);
            }
        } else {
            self.operands.pop().unwrap()
        };
        if let Some(expected) = expected {
            if !actual.matches(expected) {
                let result =
                    self.error(format!("type mismatch: expected {expected}, found {actual}"));
                return (actual, result);
            }
        }
        (actual, CheckResult::Ok)
    }

    fn pop_expect(&mut self, expected: ValType) -> CheckResult {
        self.pop_operand(Some(expected)).1
    }

    /// Pops the given types off the stack, rightmost (top of stack) first.
    fn pop_and_check_signature(&mut self, types: &[ValType]) -> CheckResult {
        let mut result = CheckResult::Ok;
        for &ty in types.iter().rev() {
            result |= self.pop_expect(ty);
        }
        result
    }

    /// Checks that the given types are present on top of the stack without
    /// consuming them: pops them for checking, then pushes back whatever was
    /// actually found.
    fn match_stack_operands(&mut self, types: &[ValType]) -> CheckResult {
        let mut result = CheckResult::Ok;
        let mut popped = Vec::with_capacity(types.len());
        for &ty in types.iter().rev() {
            let (actual, r) = self.pop_operand(Some(ty));
            result |= r;
            popped.push(actual);
        }
        for actual in popped.into_iter().rev() {
            self.operands.push(actual);
        }
        result
    }

    /// Pops the given label types and pushes them back as declared, leaving
    /// the stack holding exactly the label types (used by `br_if`).
    fn pop_push_label_types(&mut self, types: &[ValType]) -> CheckResult {
        let result = self.pop_and_check_signature(types);
        for &ty in types {
            self.push_operand(ty);
        }
        result
    }

    /// Flags the current frame as unreachable and clears its operands.
    fn set_unreachable(&mut self) -> CheckResult {
        match self.inner.control.last_mut() {
            Some(frame) => {
                frame.unreachable = true;
                let height = frame.height;
                self.operands.truncate(height);
                CheckResult::Ok
            }
            None => self.err_beyond_end(),
        }
    }

    /// Pushes a new control frame and preloads its parameters onto the
    /// operand stack.
    fn push_ctrl(&mut self, kind: FrameKind, params: Vec<ValType>, results: Vec<ValType>) {
        let height = self.operands.len();
        for &ty in &params {
            self.inner.operands.push(ty.into());
        }
        self.inner.control.push(Frame {
            kind,
            params,
            results,
            height,
            unreachable: false,
        });
    }

    /// Pops the current control frame, checking that the stack holds exactly
    /// the frame's results. The stack is reset to the frame's entry height so
    /// a mismatch does not cascade into the enclosing frame.
    fn pop_ctrl(&mut self) -> (Option<Frame>, CheckResult) {
        let (results, height) = match self.control.last() {
            Some(frame) => (frame.results.clone(), frame.height),
            None => {
                let result = self.err_beyond_end();
                return (None, result);
            }
        };
        let mut result = self.pop_and_check_signature(&results);
        if self.operands.len() != height {
            result |= self.error("type mismatch: values remaining on stack at end of block");
        }
        self.operands.truncate(height);
        (self.inner.control.pop(), result)
    }

    /// Resolves a relative branch depth to a control-stack index, counting
    /// from the innermost frame.
    fn jump(&mut self, depth: u32) -> Option<usize> {
        let index = self
            .control
            .len()
            .checked_sub(1)
            .and_then(|top| top.checked_sub(depth as usize));
        if index.is_none() {
            let _ = self.error("unknown label: branch depth too large");
        }
        index
    }

    /// The types a branch to the given frame must provide: the params of a
    /// loop (its target is its entry), the results of anything else.
    fn label_types(&self, frame: usize) -> Vec<ValType> {
        let frame = &self.control[frame];
        match frame.kind {
            FrameKind::Loop => frame.params.clone(),
            _ => frame.results.clone(),
        }
    }

    /// Checks that the given callee result types agree with the enclosing
    /// function's declared results (used by the `return_call` family).
    fn check_return_signature(&mut self, callee: &[ValType]) -> CheckResult {
        let func_results = match self.control.first() {
            Some(frame) => frame.results.clone(),
            None => return self.err_beyond_end(),
        };
        if callee.len() != func_results.len()
            || !callee
                .iter()
                .zip(&func_results)
                .all(|(actual, expected)| actual.matches(*expected))
        {
            return self.error(format!(
                "type mismatch: current function requires result type [{}] but callee returns [{}]",
                types_to_string(&func_results),
                types_to_string(callee),
            ));
        }
        CheckResult::Ok
    }

    // ------------------------------------------------------------------
    // Function lifecycle

    /// Resets all state and opens the implicit function frame.
    pub(crate) fn begin_function(&mut self, results: &[ValType]) {
        self.inner.operands.clear();
        self.inner.control.clear();
        self.inner.br_table_sig = None;
        self.inner.control.push(Frame {
            kind: FrameKind::Block,
            params: Vec::new(),
            results: results.to_vec(),
            height: 0,
            unreachable: false,
        });
    }

    /// Performs the implicit final `end` of the function body: exactly the
    /// function frame must remain, and the stack must hold its results.
    pub(crate) fn end_function(&mut self) -> CheckResult {
        if self.control.len() != 1 {
            return self.error("control frames remain at end of function: END opcode expected");
        }
        self.on_end()
    }

    // ------------------------------------------------------------------
    // Control instructions

    pub(crate) fn on_block(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> CheckResult {
        let result = self.pop_and_check_signature(&params);
        self.push_ctrl(FrameKind::Block, params, results);
        result
    }

    pub(crate) fn on_loop(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> CheckResult {
        let result = self.pop_and_check_signature(&params);
        self.push_ctrl(FrameKind::Loop, params, results);
        result
    }

    pub(crate) fn on_if(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> CheckResult {
        let mut result = self.pop_expect(ValType::I32);
        result |= self.pop_and_check_signature(&params);
        self.push_ctrl(FrameKind::If, params, results);
        result
    }

    pub(crate) fn on_else(&mut self) -> CheckResult {
        match self.control.last().map(|frame| frame.kind) {
            Some(FrameKind::If) => {}
            _ => return self.error("else found outside of an `if` block"),
        }
        let (frame, result) = self.pop_ctrl();
        if let Some(frame) = frame {
            self.push_ctrl(FrameKind::Else, frame.params, frame.results);
        }
        result
    }

    pub(crate) fn on_try(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> CheckResult {
        let result = self.pop_and_check_signature(&params);
        self.push_ctrl(FrameKind::Try, params, results);
        result
    }

    pub(crate) fn on_catch(&mut self) -> CheckResult {
        match self.control.last().map(|frame| frame.kind) {
            Some(FrameKind::Try) => {}
            _ => return self.error("catch found outside of a `try` block"),
        }
        let (frame, result) = self.pop_ctrl();
        if let Some(frame) = frame {
            self.inner.control.push(Frame {
                kind: FrameKind::Catch,
                params: frame.params,
                results: frame.results,
                height: frame.height,
                unreachable: false,
            });
            self.push_operand(ValType::Exnref);
        }
        result
    }

    pub(crate) fn on_rethrow(&mut self) -> CheckResult {
        let mut result = CheckResult::Ok;
        let in_catch = self
            .control
            .iter()
            .any(|frame| frame.kind == FrameKind::Catch);
        if !in_catch {
            result |= self.error("rethrow not in catch block");
        }
        result |= self.set_unreachable();
        result
    }

    pub(crate) fn on_throw(&mut self, params: &[ValType]) -> CheckResult {
        let mut result = self.pop_and_check_signature(params);
        result |= self.set_unreachable();
        result
    }

    pub(crate) fn on_br_on_exn(&mut self, depth: u32, tag_params: &[ValType]) -> CheckResult {
        let mut result = self.pop_expect(ValType::Exnref);
        let Some(frame) = self.jump(depth) else {
            return CheckResult::Error;
        };
        let label_types = self.label_types(frame);
        if label_types.len() != tag_params.len()
            || !tag_params
                .iter()
                .zip(&label_types)
                .all(|(actual, expected)| actual.matches(*expected))
        {
            result |= self.error(format!(
                "type mismatch: br_on_exn target requires [{}] but tag has [{}]",
                types_to_string(&label_types),
                types_to_string(tag_params),
            ));
        }
        self.push_operand(ValType::Exnref);
        result
    }

    pub(crate) fn on_end(&mut self) -> CheckResult {
        let (frame, mut result) = self.pop_ctrl();
        let Some(mut frame) = frame else {
            return result;
        };
        // An `if` without an `else` has an implicit empty false branch, which
        // must satisfy the same signature.
        if frame.kind == FrameKind::If {
            self.push_ctrl(FrameKind::Else, frame.params.clone(), frame.results.clone());
            let (implicit, r) = self.pop_ctrl();
            result |= r;
            if let Some(implicit) = implicit {
                frame = implicit;
            }
        }
        for &ty in &frame.results {
            self.inner.operands.push(ty.into());
        }
        result
    }

    pub(crate) fn on_br(&mut self, depth: u32) -> CheckResult {
        let Some(frame) = self.jump(depth) else {
            return CheckResult::Error;
        };
        let label_types = self.label_types(frame);
        let mut result = self.match_stack_operands(&label_types);
        result |= self.set_unreachable();
        result
    }

    pub(crate) fn on_br_if(&mut self, depth: u32) -> CheckResult {
        let mut result = self.pop_expect(ValType::I32);
        let Some(frame) = self.jump(depth) else {
            return CheckResult::Error;
        };
        let label_types = self.label_types(frame);
        result |= self.pop_push_label_types(&label_types);
        result
    }

    pub(crate) fn begin_br_table(&mut self) -> CheckResult {
        self.inner.br_table_sig = None;
        self.pop_expect(ValType::I32)
    }

    pub(crate) fn on_br_table_target(&mut self, depth: u32) -> CheckResult {
        let Some(frame) = self.jump(depth) else {
            return CheckResult::Error;
        };
        let label_types = self.label_types(frame);
        let mut result = self.match_stack_operands(&label_types);
        match self.inner.br_table_sig.take() {
            None => self.inner.br_table_sig = Some(label_types),
            Some(sig) => {
                if sig.len() != label_types.len() {
                    result |= self.error(
                        "type mismatch: br_table target labels have different number of types",
                    );
                } else if !sig
                    .iter()
                    .zip(&label_types)
                    .all(|(a, b)| a.matches(*b) && b.matches(*a))
                {
                    result |= self.error("type mismatch: br_table target labels have different types");
                }
                self.inner.br_table_sig = Some(sig);
            }
        }
        result
    }

    pub(crate) fn end_br_table(&mut self) -> CheckResult {
        self.inner.br_table_sig = None;
        self.set_unreachable()
    }

    pub(crate) fn on_return(&mut self) -> CheckResult {
        let func_results = match self.control.first() {
            Some(frame) => frame.results.clone(),
            None => return self.err_beyond_end(),
        };
        let mut result = self.pop_and_check_signature(&func_results);
        result |= self.set_unreachable();
        result
    }

    pub(crate) fn on_unreachable(&mut self) -> CheckResult {
        self.set_unreachable()
    }

    // ------------------------------------------------------------------
    // Calls

    pub(crate) fn on_call(&mut self, params: &[ValType], results: &[ValType]) -> CheckResult {
        let result = self.pop_and_check_signature(params);
        for &ty in results {
            self.push_operand(ty);
        }
        result
    }

    pub(crate) fn on_call_indirect(
        &mut self,
        params: &[ValType],
        results: &[ValType],
    ) -> CheckResult {
        let mut result = self.pop_expect(ValType::I32);
        result |= self.on_call(params, results);
        result
    }

    pub(crate) fn on_return_call(&mut self, params: &[ValType], results: &[ValType]) -> CheckResult {
        let mut result = self.check_return_signature(results);
        result |= self.pop_and_check_signature(params);
        result |= self.set_unreachable();
        result
    }

    pub(crate) fn on_return_call_indirect(
        &mut self,
        params: &[ValType],
        results: &[ValType],
    ) -> CheckResult {
        let mut result = self.check_return_signature(results);
        result |= self.pop_expect(ValType::I32);
        result |= self.pop_and_check_signature(params);
        result |= self.set_unreachable();
        result
    }

    // ------------------------------------------------------------------
    // Parametric and variable instructions

    pub(crate) fn on_drop(&mut self) -> CheckResult {
        self.pop_operand(None).1
    }

    pub(crate) fn on_select(&mut self, expected: Option<ValType>) -> CheckResult {
        if let Some(ty) = expected {
            let mut result = self.pop_expect(ValType::I32);
            result |= self.pop_expect(ty);
            result |= self.pop_expect(ty);
            self.push_operand(ty);
            return result;
        }
        let mut result = self.pop_expect(ValType::I32);
        let (ty1, r1) = self.pop_operand(None);
        result |= r1;
        let (ty2, r2) = self.pop_operand(None);
        result |= r2;
        let ty = match (ty1, ty2) {
            // The untyped form predates reference types and is restricted to
            // numeric operands.
            (MaybeType::Known(t), _) | (_, MaybeType::Known(t)) if t.is_ref() => {
                result |= self.error("type mismatch: select only takes integral types");
                MaybeType::Bottom
            }
            (MaybeType::Bottom, ty) | (ty, MaybeType::Bottom) => ty,
            (MaybeType::Known(t1), MaybeType::Known(t2)) => {
                if t1 != t2 {
                    result |= self.error("type mismatch: select operands have different types");
                }
                MaybeType::Known(t1)
            }
        };
        self.push_operand(ty);
        result
    }

    pub(crate) fn on_const(&mut self, ty: ValType) -> CheckResult {
        self.push_operand(ty);
        CheckResult::Ok
    }

    pub(crate) fn on_local_get(&mut self, ty: MaybeType) -> CheckResult {
        self.push_operand(ty);
        CheckResult::Ok
    }

    pub(crate) fn on_local_set(&mut self, ty: MaybeType) -> CheckResult {
        self.pop_operand(ty.into_expected()).1
    }

    pub(crate) fn on_local_tee(&mut self, ty: MaybeType) -> CheckResult {
        let result = self.pop_operand(ty.into_expected()).1;
        self.push_operand(ty);
        result
    }

    pub(crate) fn on_global_get(&mut self, ty: MaybeType) -> CheckResult {
        self.push_operand(ty);
        CheckResult::Ok
    }

    pub(crate) fn on_global_set(&mut self, ty: MaybeType) -> CheckResult {
        self.pop_operand(ty.into_expected()).1
    }

    // ------------------------------------------------------------------
    // Table-driven instructions

    /// Applies the static signature of an opcode: pops its operand types,
    /// rightmost on top, and pushes its results. Covers every instruction
    /// whose stack effect is not parameterized by module state, including
    /// loads, stores and atomics.
    pub(crate) fn check_opcode_signature(&mut self, opcode: Opcode) -> CheckResult {
        let result = self.pop_and_check_signature(opcode.params());
        for &ty in opcode.results() {
            self.push_operand(ty);
        }
        result
    }

    pub(crate) fn on_simd_lane_op(&mut self, opcode: Opcode, lane: u64) -> CheckResult {
        let mut result = CheckResult::Ok;
        if lane >= u64::from(opcode.lane_count()) {
            result |= self.error("SIMD index out of bounds");
        }
        result |= self.check_opcode_signature(opcode);
        result
    }

    pub(crate) fn on_simd_shuffle_op(&mut self, opcode: Opcode, lanes: [u8; 16]) -> CheckResult {
        let mut result = CheckResult::Ok;
        if lanes.iter().any(|&lane| lane >= opcode.lane_count()) {
            result |= self.error("SIMD index out of bounds");
        }
        result |= self.check_opcode_signature(opcode);
        result
    }

    // ------------------------------------------------------------------
    // Memory and table instructions parameterized by module state

    pub(crate) fn on_memory_size(&mut self) -> CheckResult {
        self.push_operand(ValType::I32);
        CheckResult::Ok
    }

    pub(crate) fn on_memory_grow(&mut self) -> CheckResult {
        let result = self.pop_expect(ValType::I32);
        self.push_operand(ValType::I32);
        result
    }

    /// `memory.copy`, `memory.fill`, `memory.init`, `table.copy` and
    /// `table.init` all consume three `i32` operands.
    pub(crate) fn on_bulk_op(&mut self) -> CheckResult {
        let mut result = self.pop_expect(ValType::I32);
        result |= self.pop_expect(ValType::I32);
        result |= self.pop_expect(ValType::I32);
        result
    }

    pub(crate) fn on_table_get(&mut self, element: MaybeType) -> CheckResult {
        let result = self.pop_expect(ValType::I32);
        self.push_operand(element);
        result
    }

    pub(crate) fn on_table_set(&mut self, element: MaybeType) -> CheckResult {
        let mut result = self.pop_operand(element.into_expected()).1;
        result |= self.pop_expect(ValType::I32);
        result
    }

    pub(crate) fn on_table_grow(&mut self, element: MaybeType) -> CheckResult {
        let mut result = self.pop_expect(ValType::I32);
        result |= self.pop_operand(element.into_expected()).1;
        self.push_operand(ValType::I32);
        result
    }

    pub(crate) fn on_table_size(&mut self) -> CheckResult {
        self.push_operand(ValType::I32);
        CheckResult::Ok
    }

    pub(crate) fn on_table_fill(&mut self, element: MaybeType) -> CheckResult {
        let mut result = self.pop_expect(ValType::I32);
        result |= self.pop_operand(element.into_expected()).1;
        result |= self.pop_expect(ValType::I32);
        result
    }

    // ------------------------------------------------------------------
    // Reference instructions

    pub(crate) fn on_ref_null(&mut self) -> CheckResult {
        self.push_operand(ValType::Nullref);
        CheckResult::Ok
    }

    pub(crate) fn on_ref_func(&mut self) -> CheckResult {
        self.push_operand(ValType::Funcref);
        CheckResult::Ok
    }

    pub(crate) fn on_ref_is_null(&mut self) -> CheckResult {
        let result = self.pop_expect(ValType::Anyref);
        self.push_operand(ValType::I32);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Errors, Location, ValType::*};

    fn loc() -> Location {
        Location::new(0)
    }

    #[test]
    fn unreachable_pops_synthesize_bottom() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[I32]);
        let r = tc.on_unreachable();
        assert!(r.is_ok());
        // i32.add in unreachable code: both pops synthesize bottom.
        let r = tc.check_opcode_signature(crate::Opcode::I32Add);
        assert!(r.is_ok());
        let r = tc.end_function();
        assert!(r.is_ok());
        assert!(errors.is_empty());
    }

    #[test]
    fn stack_underflow_is_reported_once_per_missing_operand() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[]);
        let r = tc.check_opcode_signature(crate::Opcode::I32Add);
        assert!(r.is_err());
        // Two pops, both underflow; the pushed i32 result is then left over
        // and reported by end_function.
        assert_eq!(errors.len(), 2);
        let mut tc = checker.with_errors(&mut errors, loc());
        let r = tc.end_function();
        assert!(r.is_err());
    }

    #[test]
    fn loop_labels_target_params() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[]);
        let r = tc.on_const(I32);
        assert!(r.is_ok());
        let r = tc.on_loop(vec![I32], vec![I32]);
        assert!(r.is_ok());
        // Branching to the loop requires its params (i32), which the loop
        // preloaded on the stack.
        let r = tc.on_br(0);
        assert!(r.is_ok());
        let r = tc.on_end();
        assert!(r.is_ok());
        let r = tc.on_drop();
        assert!(r.is_ok());
        let r = tc.end_function();
        assert!(r.is_ok());
        assert!(errors.is_empty());
    }

    #[test]
    fn else_resets_to_params() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[]);
        let _ = tc.on_const(I32);
        let r = tc.on_if(vec![], vec![F32]);
        assert!(r.is_ok());
        let _ = tc.on_const(F32);
        let r = tc.on_else();
        assert!(r.is_ok());
        assert_eq!(tc.operand_stack_height(), 0);
        let _ = tc.on_const(F32);
        let r = tc.on_end();
        assert!(r.is_ok());
        let r = tc.on_drop();
        assert!(r.is_ok());
        let r = tc.end_function();
        assert!(r.is_ok());
        assert!(errors.is_empty());
    }

    #[test]
    fn if_without_else_requires_balanced_signature() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[]);
        let _ = tc.on_const(I32);
        let r = tc.on_if(vec![], vec![I32]);
        assert!(r.is_ok());
        let _ = tc.on_const(I32);
        // The implicit false branch produces nothing, so `end` must complain.
        let r = tc.on_end();
        assert!(r.is_err());
    }

    #[test]
    fn select_rejects_reference_operands() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[]);
        let _ = tc.on_ref_null();
        let _ = tc.on_ref_null();
        let _ = tc.on_const(I32);
        let r = tc.on_select(None);
        assert!(r.is_err());
        assert_eq!(errors.len(), 1);
        assert!(errors
            .iter()
            .any(|e| e.message.contains("select only takes integral types")));
    }

    #[test]
    fn shuffle_lane_bounds() {
        let mut errors = Errors::new();
        let mut checker = TypeChecker::new();
        let mut tc = checker.with_errors(&mut errors, loc());
        tc.begin_function(&[]);
        let _ = tc.on_const(V128);
        let _ = tc.on_const(V128);
        let mut lanes = [0u8; 16];
        lanes[7] = 32;
        let r = tc.on_simd_shuffle_op(crate::Opcode::I8x16Shuffle, lanes);
        assert!(r.is_err());
        assert!(errors.iter().any(|e| e.message == "SIMD index out of bounds"));
    }
}
