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

mod typecheck;

use crate::limits::{MAX_FUNCTION_LOCALS, MAX_MEMORY_PAGES, MAX_TABLE_ELEMS};
use crate::{
    BlockType, CheckResult, Errors, ExternalKind, FuncType, GlobalType, Limits, Location,
    MaybeType, MemoryType, Opcode, SegmentKind, TableType, TagType, ValType, Var, WasmFeatures,
};
use indexmap::IndexSet;
use typecheck::{TypeChecker, TypeCheckerTemp};

impl WasmFeatures {
    /// Checks that the feature set permits a value type to appear in a
    /// declaration, returning the gating feature's description otherwise.
    pub(crate) fn check_value_type(&self, ty: ValType) -> Result<(), &'static str> {
        match ty {
            ValType::I32 | ValType::I64 | ValType::F32 | ValType::F64 => Ok(()),
            ValType::V128 => {
                if self.simd() {
                    Ok(())
                } else {
                    Err("SIMD")
                }
            }
            ValType::Exnref => {
                if !self.reference_types() {
                    Err("reference types")
                } else if self.exceptions() {
                    Ok(())
                } else {
                    Err("exceptions")
                }
            }
            ValType::Funcref | ValType::Externref | ValType::Nullref | ValType::Anyref => {
                if self.reference_types() {
                    Ok(())
                } else {
                    Err("reference types")
                }
            }
        }
    }
}

/// A run-length entry in the compressed list of a function's locals.
///
/// `end` is the exclusive upper bound of the local indices covered by this
/// entry, so ordered entries partition `[0, local_count)` and a binary search
/// on `end` maps an index to its type without materializing one slot per
/// local.
#[derive(Debug, Clone, Copy)]
struct LocalDecl {
    ty: ValType,
    end: u32,
}

/// The module validator: a sink of module-structural and instruction-level
/// events issued by a parser.
///
/// Each entry point performs every check that applies to its event, records
/// diagnostics in the borrowed [`Errors`] sink, and returns a single
/// [`CheckResult`]. A failing event never aborts validation; the validator
/// keeps enough state consistent to keep checking the rest of the module, and
/// the module is valid if and only if the sink is still empty once
/// [`end_module`](Validator::end_module) has run.
///
/// Events must arrive in the order the parser discovered them; index
/// references resolve against the tables as they stand at the moment the
/// event is issued.
pub struct Validator<'a> {
    features: WasmFeatures,
    errors: &'a mut Errors,
    typecheck: TypeChecker,

    types: Vec<FuncType>,
    funcs: Vec<FuncType>,
    tables: Vec<TableType>,
    memories: Vec<MemoryType>,
    globals: Vec<GlobalType>,
    num_imported_globals: u32,
    tags: Vec<TagType>,
    elem_segments: u32,
    data_segments: u32,
    export_names: IndexSet<String>,
    /// Functions made referenceable by an element-segment `ref.func` entry.
    declared_funcs: IndexSet<u32>,
    /// Functions named by `ref.func` inside global initializers; checked
    /// against `declared_funcs` at `end_module` because the element section
    /// comes after the global section.
    init_expr_funcs: Vec<Var>,
    locals: Vec<LocalDecl>,
    starts: u32,

    /// The location of the instruction currently being validated.
    expr_loc: Location,
}

impl<'a> Validator<'a> {
    /// Creates a validator that records diagnostics in `errors` and accepts
    /// the default feature set.
    pub fn new(errors: &'a mut Errors) -> Validator<'a> {
        Validator::new_with_features(errors, WasmFeatures::default())
    }

    /// Creates a validator with a custom feature set.
    pub fn new_with_features(errors: &'a mut Errors, features: WasmFeatures) -> Validator<'a> {
        Validator {
            features,
            errors,
            typecheck: TypeChecker::new(),
            types: Vec::new(),
            funcs: Vec::new(),
            tables: Vec::new(),
            memories: Vec::new(),
            globals: Vec::new(),
            num_imported_globals: 0,
            tags: Vec::new(),
            elem_segments: 0,
            data_segments: 0,
            export_names: IndexSet::new(),
            declared_funcs: IndexSet::new(),
            init_expr_funcs: Vec::new(),
            locals: Vec::new(),
            starts: 0,
            expr_loc: Location::default(),
        }
    }

    /// The feature set this validator accepts.
    pub fn features(&self) -> &WasmFeatures {
        &self.features
    }

    // ------------------------------------------------------------------
    // Shared helpers

    fn check(&mut self) -> TypeCheckerTemp<'_> {
        self.typecheck.with_errors(&mut *self.errors, self.expr_loc)
    }

    fn error(&mut self, loc: Location, message: impl Into<String>) -> CheckResult {
        self.errors.error(loc, message)
    }

    fn check_enabled(&mut self, loc: Location, enabled: bool, desc: &str) -> CheckResult {
        if enabled {
            CheckResult::Ok
        } else {
            self.error(loc, format!("{desc} support is not enabled"))
        }
    }

    fn check_opcode_enabled(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        match opcode.check_enabled(&self.features) {
            Ok(()) => CheckResult::Ok,
            Err(desc) => self.error(loc, format!("{desc} support is not enabled")),
        }
    }

    fn check_value_type(&mut self, loc: Location, ty: ValType) -> CheckResult {
        match self.features.check_value_type(ty) {
            Ok(()) => CheckResult::Ok,
            Err(desc) => self.error(loc, format!("{desc} support is not enabled")),
        }
    }

    fn check_index(&mut self, var: &Var, max: usize, desc: &str) -> CheckResult {
        if (var.index as usize) < max {
            CheckResult::Ok
        } else {
            self.error(
                var.loc,
                format!("unknown {desc} {}: {desc} index out of bounds", var.index),
            )
        }
    }

    fn check_type_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.types.len(), "type")
    }

    fn check_func_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.funcs.len(), "function")
    }

    fn check_table_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.tables.len(), "table")
    }

    fn check_memory_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.memories.len(), "memory")
    }

    fn check_tag_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.tags.len(), "tag")
    }

    fn check_elem_segment_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.elem_segments as usize, "elem segment")
    }

    fn check_data_segment_index(&mut self, var: &Var) -> CheckResult {
        self.check_index(var, self.data_segments as usize, "data segment")
    }

    /// Memory-touching instructions implicitly address memory 0.
    fn check_memory_exists(&mut self, loc: Location) -> CheckResult {
        self.check_memory_index(&Var::new(0, loc))
    }

    /// Looks up a global, yielding the `{ bottom, mutable }` placeholder on a
    /// bad index so the type checker can proceed without cascading.
    fn check_global_index(&mut self, var: &Var) -> (GlobalType, CheckResult) {
        match self.globals.get(var.index as usize) {
            Some(global) => (*global, CheckResult::Ok),
            None => {
                let result = self.check_index(var, self.globals.len(), "global");
                (GlobalType::unknown(), result)
            }
        }
    }

    /// Looks up a table's element type, yielding the bottom placeholder on a
    /// bad index.
    fn check_table_index_elem(&mut self, var: &Var) -> (MaybeType, CheckResult) {
        match self.tables.get(var.index as usize) {
            Some(table) => (MaybeType::Known(table.element), CheckResult::Ok),
            None => {
                let result = self.check_index(var, self.tables.len(), "table");
                (MaybeType::Bottom, result)
            }
        }
    }

    fn local_count(&self) -> u32 {
        self.locals.last().map_or(0, |decl| decl.end)
    }

    /// Maps a local index to its type through the run-length local list.
    fn check_local_index(&mut self, var: &Var) -> (MaybeType, CheckResult) {
        let slot = self.locals.partition_point(|decl| decl.end <= var.index);
        match self.locals.get(slot) {
            Some(decl) => (MaybeType::Known(decl.ty), CheckResult::Ok),
            None => {
                let max = self.local_count();
                let result = self.error(
                    var.loc,
                    format!("unknown local {}: local index out of bounds (max {max})", var.index),
                );
                (MaybeType::Bottom, result)
            }
        }
    }

    fn check_limits(
        &mut self,
        loc: Location,
        limits: &Limits,
        absolute_max: u64,
        desc: &str,
    ) -> CheckResult {
        let mut result = CheckResult::Ok;
        if limits.initial > absolute_max {
            result |= self.error(
                loc,
                format!("initial {desc} ({}) must be <= ({absolute_max})", limits.initial),
            );
        }
        if let Some(max) = limits.max {
            if max > absolute_max {
                result |= self.error(loc, format!("max {desc} ({max}) must be <= ({absolute_max})"));
            }
            if max < limits.initial {
                result |= self.error(
                    loc,
                    format!("max {desc} ({max}) must be >= initial {desc} ({})", limits.initial),
                );
            }
        }
        result
    }

    fn check_align(&mut self, loc: Location, alignment: u32, natural: u32) -> CheckResult {
        if !alignment.is_power_of_two() {
            return self.error(loc, format!("alignment ({alignment}) must be a power of 2"));
        }
        if alignment > natural {
            return self.error(
                loc,
                format!("alignment must not be larger than natural alignment ({natural})"),
            );
        }
        CheckResult::Ok
    }

    fn check_atomic_align(&mut self, loc: Location, alignment: u32, natural: u32) -> CheckResult {
        if !alignment.is_power_of_two() {
            return self.error(loc, format!("alignment ({alignment}) must be a power of 2"));
        }
        if alignment != natural {
            return self.error(
                loc,
                format!("alignment must be equal to natural alignment ({natural})"),
            );
        }
        CheckResult::Ok
    }

    fn check_type(
        &mut self,
        loc: Location,
        actual: ValType,
        expected: MaybeType,
        desc: &str,
    ) -> CheckResult {
        if expected.into_expected().is_some_and(|e| !actual.matches(e)) {
            self.error(
                loc,
                format!("type mismatch at {desc}: expected {expected}, found {actual}"),
            )
        } else {
            CheckResult::Ok
        }
    }

    /// Expands a block signature into its parameter and result lists,
    /// applying multi-value gating for signatures taken from the type space.
    fn check_block_signature(
        &mut self,
        loc: Location,
        ty: BlockType,
    ) -> (Vec<ValType>, Vec<ValType>, CheckResult) {
        match ty {
            BlockType::Empty => (Vec::new(), Vec::new(), CheckResult::Ok),
            BlockType::Type(ty) => {
                let result = self.check_value_type(loc, ty);
                (Vec::new(), vec![ty], result)
            }
            BlockType::FuncType(index) => {
                let var = Var::new(index, loc);
                if self.check_type_index(&var).is_err() {
                    return (Vec::new(), Vec::new(), CheckResult::Error);
                }
                let ty = self.types[index as usize].clone();
                let mut result = CheckResult::Ok;
                if !self.features.multi_value() && !ty.params.is_empty() {
                    result |= self.error(loc, "multi-value support is not enabled");
                }
                if !self.features.multi_value() && ty.results.len() > 1 {
                    result |= self.error(loc, "multi-value support is not enabled");
                }
                (ty.params, ty.results, result)
            }
        }
    }

    fn current_global_type(&self) -> MaybeType {
        self.globals
            .last()
            .map_or(MaybeType::Bottom, |global| global.content_type)
    }

    // ------------------------------------------------------------------
    // Declarations

    /// Declares a function type in the type index space.
    pub fn on_type(&mut self, loc: Location, params: &[ValType], results: &[ValType]) -> CheckResult {
        let mut result = CheckResult::Ok;
        for &ty in params.iter().chain(results) {
            result |= self.check_value_type(loc, ty);
        }
        self.types.push(FuncType {
            params: params.to_vec(),
            results: results.to_vec(),
        });
        result
    }

    /// Declares a function (imported or defined) with the given type index.
    pub fn on_function(&mut self, loc: Location, sig_var: Var) -> CheckResult {
        if self.check_type_index(&sig_var).is_err() {
            return CheckResult::Error;
        }
        let ty = self.types[sig_var.index as usize].clone();
        let mut result = CheckResult::Ok;
        if ty.results.len() > 1 && !self.features.multi_value() {
            result |= self.error(loc, "multi-value support is not enabled");
        }
        self.funcs.push(ty);
        result
    }

    /// Declares a table (imported or defined).
    pub fn on_table(&mut self, loc: Location, element: ValType, limits: Limits) -> CheckResult {
        let mut result = CheckResult::Ok;
        if !self.tables.is_empty() && !self.features.reference_types() {
            result |= self.error(loc, "only one table allowed");
        }
        result |= self.check_limits(loc, &limits, MAX_TABLE_ELEMS, "elems");
        if limits.shared {
            result |= self.error(loc, "tables may not be shared");
        }
        if element != ValType::Funcref && !self.features.reference_types() {
            result |= self.error(loc, "tables must have funcref type");
        }
        if !element.is_ref() {
            result |= self.error(loc, "tables must have reference types");
        }
        self.tables.push(TableType { element, limits });
        result
    }

    /// Declares a memory (imported or defined).
    pub fn on_memory(&mut self, loc: Location, limits: Limits) -> CheckResult {
        let mut result = CheckResult::Ok;
        if !self.memories.is_empty() {
            result |= self.error(loc, "only one memory block allowed");
        }
        result |= self.check_limits(loc, &limits, MAX_MEMORY_PAGES, "pages");
        if limits.shared {
            if !self.features.threads() {
                result |= self.error(loc, "memories may not be shared");
            } else if limits.max.is_none() {
                result |= self.error(loc, "shared memories must have max sizes");
            }
        }
        self.memories.push(MemoryType { limits });
        result
    }

    /// Declares an imported global.
    pub fn on_global_import(&mut self, loc: Location, ty: ValType, mutable: bool) -> CheckResult {
        let mut result = self.check_value_type(loc, ty);
        if mutable && !self.features.mutable_globals() {
            result |= self.error(loc, "mutable globals cannot be imported");
        }
        self.globals.push(GlobalType::new(ty, mutable));
        self.num_imported_globals += 1;
        result
    }

    /// Declares a defined global; its initializer events follow.
    pub fn on_global(&mut self, loc: Location, ty: ValType, mutable: bool) -> CheckResult {
        let result = self.check_value_type(loc, ty);
        self.globals.push(GlobalType::new(ty, mutable));
        result
    }

    /// A `t.const` initializer for the global declared last.
    pub fn on_global_init_expr_const(&mut self, loc: Location, ty: ValType) -> CheckResult {
        let expected = self.current_global_type();
        self.check_type(loc, ty, expected, "global initializer expression")
    }

    /// A `global.get` initializer; the referenced global must be imported
    /// and immutable, and its type must match the declared type.
    pub fn on_global_init_expr_global_get(&mut self, loc: Location, global_var: Var) -> CheckResult {
        let (referenced, result) = self.check_global_index(&global_var);
        if result.is_err() {
            return result;
        }
        let mut result = CheckResult::Ok;
        if global_var.index >= self.num_imported_globals {
            result |= self.error(
                global_var.loc,
                "initializer expression can only reference an imported global",
            );
        }
        if referenced.mutable {
            result |= self.error(loc, "initializer expression cannot reference a mutable global");
        }
        if let MaybeType::Known(actual) = referenced.content_type {
            let expected = self.current_global_type();
            result |= self.check_type(loc, actual, expected, "global initializer expression");
        }
        result
    }

    /// A `ref.null` initializer.
    pub fn on_global_init_expr_ref_null(&mut self, loc: Location) -> CheckResult {
        let expected = self.current_global_type();
        self.check_type(loc, ValType::Nullref, expected, "global initializer expression")
    }

    /// A `ref.func` initializer. The function must eventually be declared in
    /// an element segment; that is settled at `end_module` because the
    /// element section comes later.
    pub fn on_global_init_expr_ref_func(&mut self, loc: Location, func_var: Var) -> CheckResult {
        if self.check_func_index(&func_var).is_err() {
            return CheckResult::Error;
        }
        self.init_expr_funcs.push(func_var);
        let expected = self.current_global_type();
        self.check_type(loc, ValType::Funcref, expected, "global initializer expression")
    }

    /// Any other instruction in a global initializer.
    pub fn on_global_init_expr_other(&mut self, loc: Location) -> CheckResult {
        self.error(
            loc,
            "invalid global initializer expression, must be a constant expression; \
             either *.const or global.get",
        )
    }

    /// An empty global initializer.
    pub fn on_global_init_expr_none(&mut self, loc: Location) -> CheckResult {
        self.error(loc, "global initializer expression must not be empty")
    }

    /// Declares an exception tag with the given type index; the referenced
    /// signature must have no results.
    pub fn on_tag(&mut self, loc: Location, sig_var: Var) -> CheckResult {
        let mut result = self.check_enabled(loc, self.features.exceptions(), "exceptions");
        if self.check_type_index(&sig_var).is_err() {
            return CheckResult::Error;
        }
        let ty = self.types[sig_var.index as usize].clone();
        if !ty.results.is_empty() {
            result |= self.error(loc, "tag signature must have 0 results");
        }
        self.tags.push(TagType { params: ty.params });
        result
    }

    /// Declares an export; names must be unique across the module.
    pub fn on_export(
        &mut self,
        loc: Location,
        kind: ExternalKind,
        item_var: Var,
        name: &str,
    ) -> CheckResult {
        let mut result = CheckResult::Ok;
        if !self.export_names.insert(name.to_string()) {
            result |= self.error(loc, format!("duplicate export \"{name}\""));
        }
        result |= match kind {
            ExternalKind::Func => self.check_func_index(&item_var),
            ExternalKind::Table => self.check_table_index(&item_var),
            ExternalKind::Memory => self.check_memory_index(&item_var),
            ExternalKind::Global => self.check_global_index(&item_var).1,
            ExternalKind::Tag => self.check_tag_index(&item_var),
        };
        result
    }

    /// Declares the start function, which must take and return nothing.
    pub fn on_start(&mut self, loc: Location, func_var: Var) -> CheckResult {
        let mut result = CheckResult::Ok;
        if self.starts > 0 {
            result |= self.error(loc, "only one start function allowed");
        }
        self.starts += 1;
        if self.check_func_index(&func_var).is_err() {
            return CheckResult::Error;
        }
        let ty = &self.funcs[func_var.index as usize];
        let (has_params, has_results) = (!ty.params.is_empty(), !ty.results.is_empty());
        if has_params {
            result |= self.error(loc, "start function must be nullary");
        }
        if has_results {
            result |= self.error(loc, "start function must not return anything");
        }
        result
    }

    /// Declares an element segment; active segments name the table they
    /// initialize.
    pub fn on_elem_segment(
        &mut self,
        _loc: Location,
        table_var: Var,
        kind: SegmentKind,
        _elem_type: ValType,
    ) -> CheckResult {
        let mut result = CheckResult::Ok;
        if kind == SegmentKind::Active {
            result |= self.check_table_index(&table_var);
        }
        self.elem_segments += 1;
        result
    }

    /// An `i32.const` offset for the element segment declared last.
    pub fn on_elem_segment_init_expr_const(&mut self, loc: Location, ty: ValType) -> CheckResult {
        self.check_type(loc, ty, MaybeType::Known(ValType::I32), "elem segment offset")
    }

    /// A `global.get` offset; the global must be immutable and `i32`.
    pub fn on_elem_segment_init_expr_global_get(
        &mut self,
        loc: Location,
        global_var: Var,
    ) -> CheckResult {
        self.check_segment_offset_global(loc, global_var, "elem segment offset")
    }

    /// Any other instruction in an element segment offset.
    pub fn on_elem_segment_init_expr_other(&mut self, loc: Location) -> CheckResult {
        self.error(
            loc,
            "invalid elem segment offset, must be a constant expression; \
             either i32.const or global.get",
        )
    }

    /// A `ref.null` entry in an element segment.
    pub fn on_elem_segment_elem_expr_ref_null(&mut self, _loc: Location) -> CheckResult {
        CheckResult::Ok
    }

    /// A `ref.func` entry in an element segment; this is what makes the
    /// function referenceable from `ref.func` instructions and global
    /// initializers.
    pub fn on_elem_segment_elem_expr_ref_func(
        &mut self,
        _loc: Location,
        func_var: Var,
    ) -> CheckResult {
        if self.check_func_index(&func_var).is_err() {
            return CheckResult::Error;
        }
        self.declared_funcs.insert(func_var.index);
        CheckResult::Ok
    }

    /// Any other instruction in an element-segment entry.
    pub fn on_elem_segment_elem_expr_other(&mut self, loc: Location) -> CheckResult {
        self.error(loc, "invalid elem expression, must be either ref.null or ref.func")
    }

    fn check_segment_offset_global(
        &mut self,
        loc: Location,
        global_var: Var,
        desc: &str,
    ) -> CheckResult {
        let (referenced, result) = self.check_global_index(&global_var);
        if result.is_err() {
            return result;
        }
        let mut result = CheckResult::Ok;
        if referenced.mutable {
            result |= self.error(loc, "initializer expression cannot reference a mutable global");
        }
        if let MaybeType::Known(actual) = referenced.content_type {
            result |= self.check_type(loc, actual, MaybeType::Known(ValType::I32), desc);
        }
        result
    }

    /// Records the declared number of data segments, allowing
    /// `memory.init` / `data.drop` to be validated before the data section
    /// arrives.
    pub fn on_data_count(&mut self, count: u32) -> CheckResult {
        self.data_segments = count;
        CheckResult::Ok
    }

    /// Declares a data segment; active segments name the memory they
    /// initialize.
    pub fn on_data_segment(
        &mut self,
        _loc: Location,
        memory_var: Var,
        kind: SegmentKind,
    ) -> CheckResult {
        let mut result = CheckResult::Ok;
        if kind == SegmentKind::Active {
            result |= self.check_memory_index(&memory_var);
        }
        result
    }

    /// An `i32.const` offset for the data segment declared last.
    pub fn on_data_segment_init_expr_const(&mut self, loc: Location, ty: ValType) -> CheckResult {
        self.check_type(loc, ty, MaybeType::Known(ValType::I32), "data segment offset")
    }

    /// A `global.get` offset; the global must be immutable and `i32`.
    pub fn on_data_segment_init_expr_global_get(
        &mut self,
        loc: Location,
        global_var: Var,
    ) -> CheckResult {
        self.check_segment_offset_global(loc, global_var, "data segment offset")
    }

    /// Any other instruction in a data segment offset.
    pub fn on_data_segment_init_expr_other(&mut self, loc: Location) -> CheckResult {
        self.error(
            loc,
            "invalid data segment offset, must be a constant expression; \
             either i32.const or global.get",
        )
    }

    /// Settles the deferred checks that needed the whole module: every
    /// `ref.func` seen in a global initializer must name a declared function.
    pub fn end_module(&mut self) -> CheckResult {
        let mut result = CheckResult::Ok;
        let pending = std::mem::take(&mut self.init_expr_funcs);
        for var in &pending {
            if !self.declared_funcs.contains(&var.index) {
                result |= self.error(var.loc, "function is not declared in any elem sections");
            }
        }
        result
    }

    // ------------------------------------------------------------------
    // Function bodies

    /// Begins validating the body of the function at `func_index`,
    /// reinitializing the locals to the function's parameters.
    pub fn begin_function_body(&mut self, loc: Location, func_index: u32) -> CheckResult {
        self.expr_loc = loc;
        self.locals.clear();
        if let Some(ty) = self.funcs.get(func_index as usize).cloned() {
            for (slot, &param) in ty.params.iter().enumerate() {
                self.locals.push(LocalDecl {
                    ty: param,
                    end: slot as u32 + 1,
                });
            }
            self.check().begin_function(&ty.results);
            CheckResult::Ok
        } else {
            // The signature isn't available; validate against an empty one.
            let result = self.error(
                loc,
                format!("unknown function {func_index}: function index out of bounds"),
            );
            self.check().begin_function(&[]);
            result
        }
    }

    /// Declares `count` locals of the given type in the current body.
    pub fn on_local_decl(&mut self, loc: Location, count: u32, ty: ValType) -> CheckResult {
        let mut result = self.check_value_type(loc, ty);
        let local_count = self.local_count();
        if count > MAX_FUNCTION_LOCALS.saturating_sub(local_count) {
            result |= self.error(loc, "local count must be < 0x10000000");
            return result;
        }
        if count > 0 {
            self.locals.push(LocalDecl {
                ty,
                end: local_count + count,
            });
        }
        result
    }

    /// Finishes the current body: the implicit final `end` of the function
    /// frame. Diagnostics from it carry this event's location.
    pub fn end_function_body(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().end_function()
    }

    // ------------------------------------------------------------------
    // Instructions

    /// Validates a `nop`.
    pub fn on_nop(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        CheckResult::Ok
    }

    /// Validates an `unreachable`, making the rest of the frame polymorphic.
    pub fn on_unreachable(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_unreachable()
    }

    /// Validates a `drop`.
    pub fn on_drop(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_drop()
    }

    /// Validates a `t.const`, pushing `ty`.
    pub fn on_const(&mut self, loc: Location, ty: ValType) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_value_type(loc, ty);
        result |= self.check().on_const(ty);
        result
    }

    /// Validates a `block` with the given signature.
    pub fn on_block(&mut self, loc: Location, ty: BlockType) -> CheckResult {
        self.expr_loc = loc;
        let (params, results, mut result) = self.check_block_signature(loc, ty);
        result |= self.check().on_block(params, results);
        result
    }

    /// Validates a `loop` with the given signature.
    pub fn on_loop(&mut self, loc: Location, ty: BlockType) -> CheckResult {
        self.expr_loc = loc;
        let (params, results, mut result) = self.check_block_signature(loc, ty);
        result |= self.check().on_loop(params, results);
        result
    }

    /// Validates an `if` with the given signature, consuming the condition.
    pub fn on_if(&mut self, loc: Location, ty: BlockType) -> CheckResult {
        self.expr_loc = loc;
        let (params, results, mut result) = self.check_block_signature(loc, ty);
        result |= self.check().on_if(params, results);
        result
    }

    /// Validates an `else`, switching to the false branch of the current
    /// `if`.
    pub fn on_else(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_else()
    }

    /// Validates an `end`, closing the current construct.
    pub fn on_end(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_end()
    }

    /// Validates a `try` with the given signature.
    pub fn on_try(&mut self, loc: Location, ty: BlockType) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.exceptions(), "exceptions");
        let (params, results, r) = self.check_block_signature(loc, ty);
        result |= r;
        result |= self.check().on_try(params, results);
        result
    }

    /// Validates a `catch`, switching the current `try` to its handler.
    pub fn on_catch(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.exceptions(), "exceptions");
        result |= self.check().on_catch();
        result
    }

    /// Validates a `rethrow`, which requires an enclosing `catch`.
    pub fn on_rethrow(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.exceptions(), "exceptions");
        result |= self.check().on_rethrow();
        result
    }

    /// Validates a `throw` of the given tag.
    pub fn on_throw(&mut self, loc: Location, tag_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.exceptions(), "exceptions");
        if self.check_tag_index(&tag_var).is_err() {
            return CheckResult::Error;
        }
        let params = self.tags[tag_var.index as usize].params.clone();
        result |= self.check().on_throw(&params);
        result
    }

    /// Validates a `br_on_exn`, branching with the tag's payload.
    pub fn on_br_on_exn(&mut self, loc: Location, depth: Var, tag_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.exceptions(), "exceptions");
        if self.check_tag_index(&tag_var).is_err() {
            return CheckResult::Error;
        }
        let params = self.tags[tag_var.index as usize].params.clone();
        result |= self.check().on_br_on_exn(depth.index, &params);
        result
    }

    /// Validates a `br` to the given label depth.
    pub fn on_br(&mut self, loc: Location, depth: Var) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_br(depth.index)
    }

    /// Validates a `br_if` to the given label depth.
    pub fn on_br_if(&mut self, loc: Location, depth: Var) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_br_if(depth.index)
    }

    /// Begins a `br_table`, consuming the selector.
    pub fn begin_br_table(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().begin_br_table()
    }

    /// Validates one `br_table` target (including the default target); all
    /// targets must have consistent label types.
    pub fn on_br_table_target(&mut self, loc: Location, depth: Var) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_br_table_target(depth.index)
    }

    /// Finishes a `br_table`, making the rest of the frame unreachable.
    pub fn end_br_table(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().end_br_table()
    }

    /// Validates a `return`.
    pub fn on_return(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check().on_return()
    }

    /// Validates a `call` of the given function.
    pub fn on_call(&mut self, loc: Location, func_var: Var) -> CheckResult {
        self.expr_loc = loc;
        if self.check_func_index(&func_var).is_err() {
            return CheckResult::Error;
        }
        let ty = self.funcs[func_var.index as usize].clone();
        self.check().on_call(&ty.params, &ty.results)
    }

    /// Validates a `call_indirect` through the given table with the given
    /// type signature.
    pub fn on_call_indirect(&mut self, loc: Location, sig_var: Var, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_table_index(&table_var);
        let sig = self.check_type_index(&sig_var);
        result |= sig;
        if sig.is_err() {
            // Signature unavailable; still consume the table index operand.
            result |= self.check().on_call_indirect(&[], &[]);
            return result;
        }
        let ty = self.types[sig_var.index as usize].clone();
        result |= self.check().on_call_indirect(&ty.params, &ty.results);
        result
    }

    /// Validates a `return_call` of the given function.
    pub fn on_return_call(&mut self, loc: Location, func_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.tail_call(), "tail calls");
        if self.check_func_index(&func_var).is_err() {
            return CheckResult::Error;
        }
        let ty = self.funcs[func_var.index as usize].clone();
        result |= self.check().on_return_call(&ty.params, &ty.results);
        result
    }

    /// Validates a `return_call_indirect` through the given table.
    pub fn on_return_call_indirect(
        &mut self,
        loc: Location,
        sig_var: Var,
        table_var: Var,
    ) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.tail_call(), "tail calls");
        result |= self.check_table_index(&table_var);
        if self.check_type_index(&sig_var).is_err() {
            return CheckResult::Error;
        }
        let ty = self.types[sig_var.index as usize].clone();
        result |= self.check().on_return_call_indirect(&ty.params, &ty.results);
        result
    }

    /// Validates a `select`; `ty` carries the typed form's annotation.
    pub fn on_select(&mut self, loc: Location, ty: Option<ValType>) -> CheckResult {
        self.expr_loc = loc;
        let mut result = CheckResult::Ok;
        if let Some(ty) = ty {
            result |= self.check_value_type(loc, ty);
        }
        result |= self.check().on_select(ty);
        result
    }

    /// Validates a `local.get`.
    pub fn on_local_get(&mut self, loc: Location, local_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let (ty, mut result) = self.check_local_index(&local_var);
        result |= self.check().on_local_get(ty);
        result
    }

    /// Validates a `local.set`.
    pub fn on_local_set(&mut self, loc: Location, local_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let (ty, mut result) = self.check_local_index(&local_var);
        result |= self.check().on_local_set(ty);
        result
    }

    /// Validates a `local.tee`.
    pub fn on_local_tee(&mut self, loc: Location, local_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let (ty, mut result) = self.check_local_index(&local_var);
        result |= self.check().on_local_tee(ty);
        result
    }

    /// Validates a `global.get`.
    pub fn on_global_get(&mut self, loc: Location, global_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let (global, mut result) = self.check_global_index(&global_var);
        result |= self.check().on_global_get(global.content_type);
        result
    }

    /// Validates a `global.set`, which additionally requires mutability.
    pub fn on_global_set(&mut self, loc: Location, global_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let (global, mut result) = self.check_global_index(&global_var);
        if !global.mutable {
            result |= self.error(loc, "global is immutable: cannot modify it with `global.set`");
        }
        result |= self.check().on_global_set(global.content_type);
        result
    }

    /// Validates a plain load; alignment may not exceed the access width.
    pub fn on_load(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_opcode_enabled(loc, opcode);
        result |= self.check_memory_exists(loc);
        result |= self.check_align(loc, alignment, opcode.memory_size());
        result |= self.check().check_opcode_signature(opcode);
        result
    }

    /// Validates a plain store; alignment may not exceed the access width.
    pub fn on_store(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_opcode_enabled(loc, opcode);
        result |= self.check_memory_exists(loc);
        result |= self.check_align(loc, alignment, opcode.memory_size());
        result |= self.check().check_opcode_signature(opcode);
        result
    }

    fn atomic_op(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_opcode_enabled(loc, opcode);
        result |= self.check_memory_exists(loc);
        result |= self.check_atomic_align(loc, alignment, opcode.memory_size());
        result |= self.check().check_opcode_signature(opcode);
        result
    }

    /// Validates an atomic load; alignment must equal the access width.
    pub fn on_atomic_load(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.atomic_op(loc, opcode, alignment)
    }

    /// Validates an atomic store; alignment must equal the access width.
    pub fn on_atomic_store(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.atomic_op(loc, opcode, alignment)
    }

    /// Validates an atomic read-modify-write.
    pub fn on_atomic_rmw(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.atomic_op(loc, opcode, alignment)
    }

    /// Validates an atomic compare-exchange.
    pub fn on_atomic_rmw_cmpxchg(
        &mut self,
        loc: Location,
        opcode: Opcode,
        alignment: u32,
    ) -> CheckResult {
        self.atomic_op(loc, opcode, alignment)
    }

    /// Validates a `memory.atomic.notify`.
    pub fn on_atomic_notify(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.atomic_op(loc, opcode, alignment)
    }

    /// Validates a `memory.atomic.wait32` / `memory.atomic.wait64`.
    pub fn on_atomic_wait(&mut self, loc: Location, opcode: Opcode, alignment: u32) -> CheckResult {
        self.atomic_op(loc, opcode, alignment)
    }

    /// Validates an `atomic.fence`.
    pub fn on_atomic_fence(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        self.check_enabled(loc, self.features.threads(), "threads")
    }

    /// Validates a `memory.size`.
    pub fn on_memory_size(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_memory_exists(loc);
        result |= self.check().on_memory_size();
        result
    }

    /// Validates a `memory.grow`.
    pub fn on_memory_grow(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_memory_exists(loc);
        result |= self.check().on_memory_grow();
        result
    }

    /// Validates a `memory.copy`.
    pub fn on_memory_copy(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_memory_exists(loc);
        result |= self.check().on_bulk_op();
        result
    }

    /// Validates a `memory.fill`.
    pub fn on_memory_fill(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_memory_exists(loc);
        result |= self.check().on_bulk_op();
        result
    }

    /// Validates a `memory.init` from the given data segment.
    pub fn on_memory_init(&mut self, loc: Location, segment_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_memory_exists(loc);
        result |= self.check_data_segment_index(&segment_var);
        result |= self.check().on_bulk_op();
        result
    }

    /// Validates a `data.drop` of the given data segment.
    pub fn on_data_drop(&mut self, loc: Location, segment_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_data_segment_index(&segment_var);
        result
    }

    /// Validates an `elem.drop` of the given element segment.
    pub fn on_elem_drop(&mut self, loc: Location, segment_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_elem_segment_index(&segment_var);
        result
    }

    /// Validates a `table.init` from the given element segment.
    pub fn on_table_init(&mut self, loc: Location, segment_var: Var, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_table_index(&table_var);
        result |= self.check_elem_segment_index(&segment_var);
        result |= self.check().on_bulk_op();
        result
    }

    /// Validates a `table.copy` between the given tables.
    pub fn on_table_copy(&mut self, loc: Location, dst_var: Var, src_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.bulk_memory(), "bulk memory");
        result |= self.check_table_index(&dst_var);
        result |= self.check_table_index(&src_var);
        result |= self.check().on_bulk_op();
        result
    }

    /// Validates a `table.get`.
    pub fn on_table_get(&mut self, loc: Location, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        let (element, r) = self.check_table_index_elem(&table_var);
        result |= r;
        result |= self.check().on_table_get(element);
        result
    }

    /// Validates a `table.set`.
    pub fn on_table_set(&mut self, loc: Location, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        let (element, r) = self.check_table_index_elem(&table_var);
        result |= r;
        result |= self.check().on_table_set(element);
        result
    }

    /// Validates a `table.grow`.
    pub fn on_table_grow(&mut self, loc: Location, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        let (element, r) = self.check_table_index_elem(&table_var);
        result |= r;
        result |= self.check().on_table_grow(element);
        result
    }

    /// Validates a `table.size`.
    pub fn on_table_size(&mut self, loc: Location, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        result |= self.check_table_index(&table_var);
        result |= self.check().on_table_size();
        result
    }

    /// Validates a `table.fill`.
    pub fn on_table_fill(&mut self, loc: Location, table_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        let (element, r) = self.check_table_index_elem(&table_var);
        result |= r;
        result |= self.check().on_table_fill(element);
        result
    }

    /// Validates a `ref.null`.
    pub fn on_ref_null(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        result |= self.check().on_ref_null();
        result
    }

    /// Validates a `ref.func`; the function must be declared in an element
    /// segment.
    pub fn on_ref_func(&mut self, loc: Location, func_var: Var) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        if !self.declared_funcs.contains(&func_var.index) {
            result |= self.error(func_var.loc, "function is not declared in any elem sections");
        }
        result |= self.check().on_ref_func();
        result
    }

    /// Validates a `ref.is_null`.
    pub fn on_ref_is_null(&mut self, loc: Location) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_enabled(loc, self.features.reference_types(), "reference types");
        result |= self.check().on_ref_is_null();
        result
    }

    fn opcode_op(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_opcode_enabled(loc, opcode);
        result |= self.check().check_opcode_signature(opcode);
        result
    }

    /// Validates a unary operator.
    pub fn on_unary(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        self.opcode_op(loc, opcode)
    }

    /// Validates a binary operator.
    pub fn on_binary(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        self.opcode_op(loc, opcode)
    }

    /// Validates a comparison operator.
    pub fn on_compare(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        self.opcode_op(loc, opcode)
    }

    /// Validates a conversion operator.
    pub fn on_convert(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        self.opcode_op(loc, opcode)
    }

    /// Validates a ternary operator.
    pub fn on_ternary(&mut self, loc: Location, opcode: Opcode) -> CheckResult {
        self.opcode_op(loc, opcode)
    }

    /// Validates a SIMD operator with a lane immediate, which must be below
    /// the opcode's lane count.
    pub fn on_simd_lane_op(&mut self, loc: Location, opcode: Opcode, lane: u64) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_opcode_enabled(loc, opcode);
        result |= self.check().on_simd_lane_op(opcode, lane);
        result
    }

    /// Validates an `i8x16.shuffle`; every lane immediate must be below 32.
    pub fn on_simd_shuffle_op(
        &mut self,
        loc: Location,
        opcode: Opcode,
        lanes: [u8; 16],
    ) -> CheckResult {
        self.expr_loc = loc;
        let mut result = self.check_opcode_enabled(loc, opcode);
        result |= self.check().on_simd_shuffle_op(opcode, lanes);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValType::*;

    fn loc(offset: usize) -> Location {
        Location::new(offset)
    }

    fn var(index: u32, offset: usize) -> Var {
        Var::new(index, loc(offset))
    }

    fn messages(errors: &Errors) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn valid_add() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[I32, I32], &[I32]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_local_get(loc(3), var(0, 3)).is_ok());
        assert!(v.on_local_get(loc(4), var(1, 4)).is_ok());
        assert!(v.on_binary(loc(5), Opcode::I32Add).is_ok());
        assert!(v.end_function_body(loc(6)).is_ok());
        assert!(v.end_module().is_ok());
        assert!(errors.is_empty(), "unexpected errors: {:?}", messages(&errors));
    }

    #[test]
    fn add_operand_type_mismatch() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[I32, I32], &[I32]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_local_get(loc(3), var(0, 3)).is_ok());
        assert!(v.on_const(loc(4), F32).is_ok());
        assert!(v.on_binary(loc(5), Opcode::I32Add).is_err());
        assert!(v.end_function_body(loc(6)).is_ok());
        assert!(v.end_module().is_ok());
        assert_eq!(errors.len(), 1, "errors: {:?}", messages(&errors));
        let error = &errors.as_slice()[0];
        assert_eq!(error.loc, loc(5));
        assert!(error.message.contains("i32"), "{}", error.message);
        assert!(error.message.contains("f32"), "{}", error.message);
    }

    #[test]
    fn unreachable_code_is_polymorphic() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[I32]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_unreachable(loc(3)).is_ok());
        assert!(v.on_binary(loc(4), Opcode::I32Add).is_ok());
        assert!(v.end_function_body(loc(5)).is_ok());
        assert!(v.end_module().is_ok());
        assert!(errors.is_empty(), "unexpected errors: {:?}", messages(&errors));
    }

    #[test]
    fn duplicate_export_name() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_export(loc(2), ExternalKind::Func, var(0, 2), "f").is_ok());
        assert!(v.on_export(loc(3), ExternalKind::Func, var(0, 3), "f").is_err());
        assert_eq!(messages(&errors), ["duplicate export \"f\""]);
        assert_eq!(errors.as_slice()[0].loc, loc(3));
    }

    #[test]
    fn shared_memory_requires_max() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default() | WasmFeatures::THREADS;
        let mut v = Validator::new_with_features(&mut errors, features);
        let limits = Limits {
            initial: 1,
            max: None,
            shared: true,
        };
        assert!(v.on_memory(loc(0), limits).is_err());
        assert_eq!(messages(&errors), ["shared memories must have max sizes"]);
    }

    #[test]
    fn shared_memory_requires_threads() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        let limits = Limits {
            initial: 1,
            max: Some(1),
            shared: true,
        };
        assert!(v.on_memory(loc(0), limits).is_err());
        assert_eq!(messages(&errors), ["memories may not be shared"]);
    }

    #[test]
    fn global_init_cannot_reference_mutable_global() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_global_import(loc(0), I32, true).is_ok());
        assert!(v.on_global(loc(1), I32, false).is_ok());
        assert!(v.on_global_init_expr_global_get(loc(2), var(0, 2)).is_err());
        assert_eq!(
            messages(&errors),
            ["initializer expression cannot reference a mutable global"]
        );
    }

    #[test]
    fn global_init_must_reference_imported_global() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_global(loc(0), I32, false).is_ok());
        assert!(v.on_global_init_expr_const(loc(1), I32).is_ok());
        assert!(v.on_global(loc(2), I32, false).is_ok());
        assert!(v.on_global_init_expr_global_get(loc(3), var(0, 3)).is_err());
        assert_eq!(
            messages(&errors),
            ["initializer expression can only reference an imported global"]
        );
    }

    #[test]
    fn br_table_targets_must_agree_on_arity() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_type(loc(0), &[], &[I32]).is_ok());
        assert!(v.on_type(loc(0), &[], &[I32, I32]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_block(loc(3), BlockType::FuncType(2)).is_ok());
        assert!(v.on_block(loc(4), BlockType::FuncType(1)).is_ok());
        assert!(v.on_const(loc(5), I32).is_ok());
        assert!(v.on_const(loc(6), I32).is_ok());
        assert!(v.on_const(loc(7), I32).is_ok());
        assert!(v.begin_br_table(loc(8)).is_ok());
        assert!(v.on_br_table_target(loc(8), var(0, 8)).is_ok());
        assert!(v.on_br_table_target(loc(8), var(1, 8)).is_err());
        assert!(v.end_br_table(loc(8)).is_ok());
        assert!(v.on_end(loc(9)).is_ok());
        assert!(v.on_const(loc(10), I32).is_ok());
        assert!(v.on_end(loc(11)).is_ok());
        assert!(v.on_drop(loc(12)).is_ok());
        assert!(v.on_drop(loc(13)).is_ok());
        assert!(v.end_function_body(loc(14)).is_ok());
        assert_eq!(
            messages(&errors),
            ["type mismatch: br_table target labels have different number of types"]
        );
        assert_eq!(errors.as_slice()[0].loc, loc(8));
    }

    #[test]
    fn init_expr_ref_func_must_be_declared() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_global(loc(2), Funcref, false).is_ok());
        assert!(v.on_global_init_expr_ref_func(loc(3), var(0, 3)).is_ok());
        assert!(v.end_module().is_err());
        assert_eq!(
            messages(&errors),
            ["function is not declared in any elem sections"]
        );
        assert_eq!(errors.as_slice()[0].loc, loc(3));
    }

    #[test]
    fn init_expr_ref_func_declared_in_elem_segment() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_global(loc(2), Funcref, false).is_ok());
        assert!(v.on_global_init_expr_ref_func(loc(3), var(0, 3)).is_ok());
        let kind = SegmentKind::Declared;
        assert!(v.on_elem_segment(loc(4), var(0, 4), kind, Funcref).is_ok());
        assert!(v.on_elem_segment_elem_expr_ref_func(loc(5), var(0, 5)).is_ok());
        assert!(v.end_module().is_ok());
        assert!(errors.is_empty(), "unexpected errors: {:?}", messages(&errors));
    }

    #[test]
    fn memory_limit_violations_accumulate() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        let limits = Limits {
            initial: 70000,
            max: Some(70001),
            shared: false,
        };
        assert!(v.on_memory(loc(0), limits).is_err());
        assert_eq!(
            messages(&errors),
            [
                "initial pages (70000) must be <= (65536)",
                "max pages (70001) must be <= (65536)",
            ]
        );
    }

    #[test]
    fn memory_max_below_initial() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        let limits = Limits {
            initial: 2,
            max: Some(1),
            shared: false,
        };
        assert!(v.on_memory(loc(0), limits).is_err());
        assert_eq!(messages(&errors), ["max pages (1) must be >= initial pages (2)"]);
    }

    #[test]
    fn only_one_memory() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        let limits = Limits::default();
        assert!(v.on_memory(loc(0), limits).is_ok());
        assert!(v.on_memory(loc(1), limits).is_err());
        assert_eq!(messages(&errors), ["only one memory block allowed"]);
    }

    #[test]
    fn second_table_requires_reference_types() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default().difference(WasmFeatures::REFERENCE_TYPES);
        let mut v = Validator::new_with_features(&mut errors, features);
        let limits = Limits::default();
        assert!(v.on_table(loc(0), Funcref, limits).is_ok());
        assert!(v.on_table(loc(1), Funcref, limits).is_err());
        assert_eq!(messages(&errors), ["only one table allowed"]);

        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_table(loc(0), Funcref, limits).is_ok());
        assert!(v.on_table(loc(1), Externref, limits).is_ok());
        assert!(errors.is_empty());
    }

    #[test]
    fn tables_may_not_be_shared() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        let limits = Limits {
            initial: 0,
            max: None,
            shared: true,
        };
        assert!(v.on_table(loc(0), Funcref, limits).is_err());
        assert_eq!(messages(&errors), ["tables may not be shared"]);
    }

    #[test]
    fn start_function_must_be_nullary() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[I32], &[I32]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_start(loc(2), var(0, 2)).is_err());
        // A second start declaration is itself an error.
        assert!(v.on_start(loc(3), var(0, 3)).is_err());
        assert_eq!(
            messages(&errors)[..2],
            [
                "start function must be nullary",
                "start function must not return anything",
            ]
        );
        assert!(errors
            .iter()
            .any(|e| e.message == "only one start function allowed"));
    }

    #[test]
    fn load_alignment_rules() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_memory(loc(2), Limits::default()).is_ok());
        assert!(v.begin_function_body(loc(3), 0).is_ok());
        assert!(v.on_const(loc(4), I32).is_ok());
        assert!(v.on_load(loc(5), Opcode::I32Load, 3).is_err());
        assert!(v.on_drop(loc(6)).is_ok());
        assert!(v.on_const(loc(7), I32).is_ok());
        assert!(v.on_load(loc(8), Opcode::I32Load, 8).is_err());
        assert!(v.on_drop(loc(9)).is_ok());
        assert!(v.on_const(loc(10), I32).is_ok());
        assert!(v.on_load(loc(11), Opcode::I32Load, 4).is_ok());
        assert!(v.on_drop(loc(12)).is_ok());
        assert!(v.end_function_body(loc(13)).is_ok());
        assert_eq!(
            messages(&errors),
            [
                "alignment (3) must be a power of 2",
                "alignment must not be larger than natural alignment (4)",
            ]
        );
    }

    #[test]
    fn atomic_alignment_must_be_natural() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default() | WasmFeatures::THREADS;
        let mut v = Validator::new_with_features(&mut errors, features);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        let limits = Limits {
            initial: 1,
            max: Some(1),
            shared: true,
        };
        assert!(v.on_memory(loc(2), limits).is_ok());
        assert!(v.begin_function_body(loc(3), 0).is_ok());
        assert!(v.on_const(loc(4), I32).is_ok());
        assert!(v.on_atomic_load(loc(5), Opcode::I32AtomicLoad, 2).is_err());
        assert_eq!(
            messages(&errors),
            ["alignment must be equal to natural alignment (4)"]
        );
    }

    #[test]
    fn feature_gating_messages() {
        let mut errors = Errors::new();
        let mut v = Validator::new_with_features(&mut errors, WasmFeatures::WASM1);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        let _ = v.on_unary(loc(3), Opcode::I32Extend8S);
        let _ = v.on_convert(loc(4), Opcode::I32TruncSatF32S);
        let _ = v.on_binary(loc(5), Opcode::I8x16Add);
        let _ = v.on_ref_null(loc(6));
        let messages = messages(&errors);
        assert!(messages.contains(&"sign extension operations support is not enabled"));
        assert!(messages.contains(&"saturating float to int conversions support is not enabled"));
        assert!(messages.contains(&"SIMD support is not enabled"));
        assert!(messages.contains(&"reference types support is not enabled"));
    }

    #[test]
    fn multi_value_gating() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default().difference(WasmFeatures::MULTI_VALUE);
        let mut v = Validator::new_with_features(&mut errors, features);
        assert!(v.on_type(loc(0), &[], &[I32, I32]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_err());
        assert_eq!(messages(&errors), ["multi-value support is not enabled"]);
    }

    #[test]
    fn locals_are_run_length_encoded() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[I32], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_local_decl(loc(3), 3, I64).is_ok());
        assert!(v.on_local_decl(loc(4), 2, F32).is_ok());
        // Index 0 is the param, 1..=3 are i64, 4..=5 are f32.
        assert!(v.on_local_get(loc(5), var(3, 5)).is_ok());
        assert!(v.on_local_set(loc(6), var(2, 6)).is_ok());
        assert!(v.on_local_get(loc(7), var(4, 7)).is_ok());
        assert!(v.on_local_set(loc(8), var(5, 8)).is_ok());
        assert!(v.on_local_get(loc(9), var(6, 9)).is_err());
        assert!(v.on_drop(loc(10)).is_ok());
        assert!(v.end_function_body(loc(11)).is_ok());
        assert_eq!(
            messages(&errors),
            ["unknown local 6: local index out of bounds (max 6)"]
        );
    }

    #[test]
    fn local_count_ceiling() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_local_decl(loc(3), MAX_FUNCTION_LOCALS, I32).is_ok());
        assert!(v.on_local_decl(loc(4), 1, I32).is_err());
        assert_eq!(messages(&errors), ["local count must be < 0x10000000"]);
    }

    #[test]
    fn global_set_requires_mutability() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_global_import(loc(2), I32, false).is_ok());
        assert!(v.begin_function_body(loc(3), 0).is_ok());
        assert!(v.on_const(loc(4), I32).is_ok());
        assert!(v.on_global_set(loc(5), var(0, 5)).is_err());
        assert_eq!(
            messages(&errors),
            ["global is immutable: cannot modify it with `global.set`"]
        );
    }

    #[test]
    fn bad_global_index_reports_once() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_const(loc(3), I32).is_ok());
        // The bad index yields the placeholder global, so the set itself
        // proceeds without a cascading type error.
        assert!(v.on_global_set(loc(4), var(7, 4)).is_err());
        assert!(v.end_function_body(loc(5)).is_ok());
        assert_eq!(
            messages(&errors),
            ["unknown global 7: global index out of bounds"]
        );
    }

    #[test]
    fn call_signatures_flow_through_the_stack() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[I32, F32], &[F64]).is_ok());
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_function(loc(2), var(1, 2)).is_ok());
        assert!(v.begin_function_body(loc(3), 1).is_ok());
        assert!(v.on_const(loc(4), I32).is_ok());
        assert!(v.on_const(loc(5), F32).is_ok());
        assert!(v.on_call(loc(6), var(0, 6)).is_ok());
        assert!(v.on_drop(loc(7)).is_ok());
        assert!(v.end_function_body(loc(8)).is_ok());
        assert!(errors.is_empty(), "unexpected errors: {:?}", messages(&errors));
    }

    #[test]
    fn call_indirect_requires_a_table() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_const(loc(3), I32).is_ok());
        assert!(v.on_call_indirect(loc(4), var(0, 4), var(0, 4)).is_err());
        assert!(v.end_function_body(loc(5)).is_ok());
        assert_eq!(messages(&errors), ["unknown table 0: table index out of bounds"]);
    }

    #[test]
    fn tag_signature_must_have_no_results() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default() | WasmFeatures::EXCEPTIONS;
        let mut v = Validator::new_with_features(&mut errors, features);
        assert!(v.on_type(loc(0), &[I32], &[I32]).is_ok());
        assert!(v.on_tag(loc(1), var(0, 1)).is_err());
        assert_eq!(messages(&errors), ["tag signature must have 0 results"]);
    }

    #[test]
    fn throw_and_catch_check_tag_params() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default() | WasmFeatures::EXCEPTIONS;
        let mut v = Validator::new_with_features(&mut errors, features);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_type(loc(0), &[I32], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.on_tag(loc(2), var(1, 2)).is_ok());
        assert!(v.begin_function_body(loc(3), 0).is_ok());
        assert!(v.on_try(loc(4), BlockType::Empty).is_ok());
        assert!(v.on_const(loc(5), I32).is_ok());
        assert!(v.on_throw(loc(6), var(0, 6)).is_ok());
        assert!(v.on_catch(loc(7)).is_ok());
        // The catch handler receives an exnref.
        assert!(v.on_drop(loc(8)).is_ok());
        assert!(v.on_end(loc(9)).is_ok());
        assert!(v.end_function_body(loc(10)).is_ok());
        assert!(errors.is_empty(), "unexpected errors: {:?}", messages(&errors));
    }

    #[test]
    fn rethrow_requires_enclosing_catch() {
        let mut errors = Errors::new();
        let features = WasmFeatures::default() | WasmFeatures::EXCEPTIONS;
        let mut v = Validator::new_with_features(&mut errors, features);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_rethrow(loc(3)).is_err());
        assert_eq!(messages(&errors), ["rethrow not in catch block"]);
    }

    #[test]
    fn select_operand_type_agreement() {
        let mut errors = Errors::new();
        let mut v = Validator::new(&mut errors);
        assert!(v.on_type(loc(0), &[], &[]).is_ok());
        assert!(v.on_function(loc(1), var(0, 1)).is_ok());
        assert!(v.begin_function_body(loc(2), 0).is_ok());
        assert!(v.on_const(loc(3), I32).is_ok());
        assert!(v.on_const(loc(4), F32).is_ok());
        assert!(v.on_const(loc(5), I32).is_ok());
        assert!(v.on_select(loc(6), None).is_err());
        assert_eq!(
            messages(&errors),
            ["type mismatch: select operands have different types"]
        );
    }

    #[test]
    fn determinism() {
        let run = || {
            let mut errors = Errors::new();
            let mut v = Validator::new(&mut errors);
            let _ = v.on_type(loc(0), &[I32], &[]);
            let _ = v.on_function(loc(1), var(0, 1));
            let _ = v.on_export(loc(2), ExternalKind::Func, var(0, 2), "f");
            let _ = v.on_export(loc(3), ExternalKind::Func, var(3, 3), "f");
            let _ = v.on_start(loc(4), var(0, 4));
            let _ = v.begin_function_body(loc(5), 0);
            let _ = v.on_const(loc(6), F64);
            let _ = v.on_binary(loc(7), Opcode::I32Add);
            let _ = v.end_function_body(loc(8));
            let _ = v.end_module();
            errors
                .iter()
                .map(|e| (e.loc, e.message.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
        assert!(!run().is_empty());
    }
}
