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

//! The opcode catalog: one static table describing every instruction the
//! event API can carry.
//!
//! Each entry records the proposal gating the instruction, its text-format
//! name, the natural width of its memory access in bytes (0 when it does not
//! touch memory), the number of lanes addressed by its lane immediate (0 when
//! it has none), and its static operand/result signature. The type checker
//! consumes the table through [`Opcode`]'s accessors, so instructions whose
//! stack effect is not parameterized by module state need no dedicated code.

use crate::{ValType, WasmFeatures};

/// A helper macro to iterate over the opcode table.
///
/// This is an "iterator macro": invoke it with the name of another macro and
/// that macro receives every table entry, enabling table-driven consumers and
/// tests. Each entry has the form
///
/// ```text
/// @proposal Variant = "text.name" (memory_size, lane_count) [params] -> [results]
/// ```
#[macro_export]
macro_rules! for_each_opcode {
    ($mac:ident) => {
        $mac! {
            @mvp I32Eqz = "i32.eqz" (0, 0) [I32] -> [I32]
            @mvp I32Eq = "i32.eq" (0, 0) [I32, I32] -> [I32]
            @mvp I32Ne = "i32.ne" (0, 0) [I32, I32] -> [I32]
            @mvp I32LtS = "i32.lt_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32LtU = "i32.lt_u" (0, 0) [I32, I32] -> [I32]
            @mvp I32GtS = "i32.gt_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32GtU = "i32.gt_u" (0, 0) [I32, I32] -> [I32]
            @mvp I32LeS = "i32.le_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32LeU = "i32.le_u" (0, 0) [I32, I32] -> [I32]
            @mvp I32GeS = "i32.ge_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32GeU = "i32.ge_u" (0, 0) [I32, I32] -> [I32]
            @mvp I64Eqz = "i64.eqz" (0, 0) [I64] -> [I32]
            @mvp I64Eq = "i64.eq" (0, 0) [I64, I64] -> [I32]
            @mvp I64Ne = "i64.ne" (0, 0) [I64, I64] -> [I32]
            @mvp I64LtS = "i64.lt_s" (0, 0) [I64, I64] -> [I32]
            @mvp I64LtU = "i64.lt_u" (0, 0) [I64, I64] -> [I32]
            @mvp I64GtS = "i64.gt_s" (0, 0) [I64, I64] -> [I32]
            @mvp I64GtU = "i64.gt_u" (0, 0) [I64, I64] -> [I32]
            @mvp I64LeS = "i64.le_s" (0, 0) [I64, I64] -> [I32]
            @mvp I64LeU = "i64.le_u" (0, 0) [I64, I64] -> [I32]
            @mvp I64GeS = "i64.ge_s" (0, 0) [I64, I64] -> [I32]
            @mvp I64GeU = "i64.ge_u" (0, 0) [I64, I64] -> [I32]
            @mvp F32Eq = "f32.eq" (0, 0) [F32, F32] -> [I32]
            @mvp F32Ne = "f32.ne" (0, 0) [F32, F32] -> [I32]
            @mvp F32Lt = "f32.lt" (0, 0) [F32, F32] -> [I32]
            @mvp F32Gt = "f32.gt" (0, 0) [F32, F32] -> [I32]
            @mvp F32Le = "f32.le" (0, 0) [F32, F32] -> [I32]
            @mvp F32Ge = "f32.ge" (0, 0) [F32, F32] -> [I32]
            @mvp F64Eq = "f64.eq" (0, 0) [F64, F64] -> [I32]
            @mvp F64Ne = "f64.ne" (0, 0) [F64, F64] -> [I32]
            @mvp F64Lt = "f64.lt" (0, 0) [F64, F64] -> [I32]
            @mvp F64Gt = "f64.gt" (0, 0) [F64, F64] -> [I32]
            @mvp F64Le = "f64.le" (0, 0) [F64, F64] -> [I32]
            @mvp F64Ge = "f64.ge" (0, 0) [F64, F64] -> [I32]
            @mvp I32Clz = "i32.clz" (0, 0) [I32] -> [I32]
            @mvp I32Ctz = "i32.ctz" (0, 0) [I32] -> [I32]
            @mvp I32Popcnt = "i32.popcnt" (0, 0) [I32] -> [I32]
            @mvp I32Add = "i32.add" (0, 0) [I32, I32] -> [I32]
            @mvp I32Sub = "i32.sub" (0, 0) [I32, I32] -> [I32]
            @mvp I32Mul = "i32.mul" (0, 0) [I32, I32] -> [I32]
            @mvp I32DivS = "i32.div_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32DivU = "i32.div_u" (0, 0) [I32, I32] -> [I32]
            @mvp I32RemS = "i32.rem_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32RemU = "i32.rem_u" (0, 0) [I32, I32] -> [I32]
            @mvp I32And = "i32.and" (0, 0) [I32, I32] -> [I32]
            @mvp I32Or = "i32.or" (0, 0) [I32, I32] -> [I32]
            @mvp I32Xor = "i32.xor" (0, 0) [I32, I32] -> [I32]
            @mvp I32Shl = "i32.shl" (0, 0) [I32, I32] -> [I32]
            @mvp I32ShrS = "i32.shr_s" (0, 0) [I32, I32] -> [I32]
            @mvp I32ShrU = "i32.shr_u" (0, 0) [I32, I32] -> [I32]
            @mvp I32Rotl = "i32.rotl" (0, 0) [I32, I32] -> [I32]
            @mvp I32Rotr = "i32.rotr" (0, 0) [I32, I32] -> [I32]
            @mvp I64Clz = "i64.clz" (0, 0) [I64] -> [I64]
            @mvp I64Ctz = "i64.ctz" (0, 0) [I64] -> [I64]
            @mvp I64Popcnt = "i64.popcnt" (0, 0) [I64] -> [I64]
            @mvp I64Add = "i64.add" (0, 0) [I64, I64] -> [I64]
            @mvp I64Sub = "i64.sub" (0, 0) [I64, I64] -> [I64]
            @mvp I64Mul = "i64.mul" (0, 0) [I64, I64] -> [I64]
            @mvp I64DivS = "i64.div_s" (0, 0) [I64, I64] -> [I64]
            @mvp I64DivU = "i64.div_u" (0, 0) [I64, I64] -> [I64]
            @mvp I64RemS = "i64.rem_s" (0, 0) [I64, I64] -> [I64]
            @mvp I64RemU = "i64.rem_u" (0, 0) [I64, I64] -> [I64]
            @mvp I64And = "i64.and" (0, 0) [I64, I64] -> [I64]
            @mvp I64Or = "i64.or" (0, 0) [I64, I64] -> [I64]
            @mvp I64Xor = "i64.xor" (0, 0) [I64, I64] -> [I64]
            @mvp I64Shl = "i64.shl" (0, 0) [I64, I64] -> [I64]
            @mvp I64ShrS = "i64.shr_s" (0, 0) [I64, I64] -> [I64]
            @mvp I64ShrU = "i64.shr_u" (0, 0) [I64, I64] -> [I64]
            @mvp I64Rotl = "i64.rotl" (0, 0) [I64, I64] -> [I64]
            @mvp I64Rotr = "i64.rotr" (0, 0) [I64, I64] -> [I64]
            @mvp F32Abs = "f32.abs" (0, 0) [F32] -> [F32]
            @mvp F32Neg = "f32.neg" (0, 0) [F32] -> [F32]
            @mvp F32Ceil = "f32.ceil" (0, 0) [F32] -> [F32]
            @mvp F32Floor = "f32.floor" (0, 0) [F32] -> [F32]
            @mvp F32Trunc = "f32.trunc" (0, 0) [F32] -> [F32]
            @mvp F32Nearest = "f32.nearest" (0, 0) [F32] -> [F32]
            @mvp F32Sqrt = "f32.sqrt" (0, 0) [F32] -> [F32]
            @mvp F32Add = "f32.add" (0, 0) [F32, F32] -> [F32]
            @mvp F32Sub = "f32.sub" (0, 0) [F32, F32] -> [F32]
            @mvp F32Mul = "f32.mul" (0, 0) [F32, F32] -> [F32]
            @mvp F32Div = "f32.div" (0, 0) [F32, F32] -> [F32]
            @mvp F32Min = "f32.min" (0, 0) [F32, F32] -> [F32]
            @mvp F32Max = "f32.max" (0, 0) [F32, F32] -> [F32]
            @mvp F32Copysign = "f32.copysign" (0, 0) [F32, F32] -> [F32]
            @mvp F64Abs = "f64.abs" (0, 0) [F64] -> [F64]
            @mvp F64Neg = "f64.neg" (0, 0) [F64] -> [F64]
            @mvp F64Ceil = "f64.ceil" (0, 0) [F64] -> [F64]
            @mvp F64Floor = "f64.floor" (0, 0) [F64] -> [F64]
            @mvp F64Trunc = "f64.trunc" (0, 0) [F64] -> [F64]
            @mvp F64Nearest = "f64.nearest" (0, 0) [F64] -> [F64]
            @mvp F64Sqrt = "f64.sqrt" (0, 0) [F64] -> [F64]
            @mvp F64Add = "f64.add" (0, 0) [F64, F64] -> [F64]
            @mvp F64Sub = "f64.sub" (0, 0) [F64, F64] -> [F64]
            @mvp F64Mul = "f64.mul" (0, 0) [F64, F64] -> [F64]
            @mvp F64Div = "f64.div" (0, 0) [F64, F64] -> [F64]
            @mvp F64Min = "f64.min" (0, 0) [F64, F64] -> [F64]
            @mvp F64Max = "f64.max" (0, 0) [F64, F64] -> [F64]
            @mvp F64Copysign = "f64.copysign" (0, 0) [F64, F64] -> [F64]
            @mvp I32WrapI64 = "i32.wrap_i64" (0, 0) [I64] -> [I32]
            @mvp I32TruncF32S = "i32.trunc_f32_s" (0, 0) [F32] -> [I32]
            @mvp I32TruncF32U = "i32.trunc_f32_u" (0, 0) [F32] -> [I32]
            @mvp I32TruncF64S = "i32.trunc_f64_s" (0, 0) [F64] -> [I32]
            @mvp I32TruncF64U = "i32.trunc_f64_u" (0, 0) [F64] -> [I32]
            @mvp I64ExtendI32S = "i64.extend_i32_s" (0, 0) [I32] -> [I64]
            @mvp I64ExtendI32U = "i64.extend_i32_u" (0, 0) [I32] -> [I64]
            @mvp I64TruncF32S = "i64.trunc_f32_s" (0, 0) [F32] -> [I64]
            @mvp I64TruncF32U = "i64.trunc_f32_u" (0, 0) [F32] -> [I64]
            @mvp I64TruncF64S = "i64.trunc_f64_s" (0, 0) [F64] -> [I64]
            @mvp I64TruncF64U = "i64.trunc_f64_u" (0, 0) [F64] -> [I64]
            @mvp F32ConvertI32S = "f32.convert_i32_s" (0, 0) [I32] -> [F32]
            @mvp F32ConvertI32U = "f32.convert_i32_u" (0, 0) [I32] -> [F32]
            @mvp F32ConvertI64S = "f32.convert_i64_s" (0, 0) [I64] -> [F32]
            @mvp F32ConvertI64U = "f32.convert_i64_u" (0, 0) [I64] -> [F32]
            @mvp F32DemoteF64 = "f32.demote_f64" (0, 0) [F64] -> [F32]
            @mvp F64ConvertI32S = "f64.convert_i32_s" (0, 0) [I32] -> [F64]
            @mvp F64ConvertI32U = "f64.convert_i32_u" (0, 0) [I32] -> [F64]
            @mvp F64ConvertI64S = "f64.convert_i64_s" (0, 0) [I64] -> [F64]
            @mvp F64ConvertI64U = "f64.convert_i64_u" (0, 0) [I64] -> [F64]
            @mvp F64PromoteF32 = "f64.promote_f32" (0, 0) [F32] -> [F64]
            @mvp I32ReinterpretF32 = "i32.reinterpret_f32" (0, 0) [F32] -> [I32]
            @mvp I64ReinterpretF64 = "i64.reinterpret_f64" (0, 0) [F64] -> [I64]
            @mvp F32ReinterpretI32 = "f32.reinterpret_i32" (0, 0) [I32] -> [F32]
            @mvp F64ReinterpretI64 = "f64.reinterpret_i64" (0, 0) [I64] -> [F64]
            @sign_extension I32Extend8S = "i32.extend8_s" (0, 0) [I32] -> [I32]
            @sign_extension I32Extend16S = "i32.extend16_s" (0, 0) [I32] -> [I32]
            @sign_extension I64Extend8S = "i64.extend8_s" (0, 0) [I64] -> [I64]
            @sign_extension I64Extend16S = "i64.extend16_s" (0, 0) [I64] -> [I64]
            @sign_extension I64Extend32S = "i64.extend32_s" (0, 0) [I64] -> [I64]
            @saturating_float_to_int I32TruncSatF32S = "i32.trunc_sat_f32_s" (0, 0) [F32] -> [I32]
            @saturating_float_to_int I32TruncSatF32U = "i32.trunc_sat_f32_u" (0, 0) [F32] -> [I32]
            @saturating_float_to_int I32TruncSatF64S = "i32.trunc_sat_f64_s" (0, 0) [F64] -> [I32]
            @saturating_float_to_int I32TruncSatF64U = "i32.trunc_sat_f64_u" (0, 0) [F64] -> [I32]
            @saturating_float_to_int I64TruncSatF32S = "i64.trunc_sat_f32_s" (0, 0) [F32] -> [I64]
            @saturating_float_to_int I64TruncSatF32U = "i64.trunc_sat_f32_u" (0, 0) [F32] -> [I64]
            @saturating_float_to_int I64TruncSatF64S = "i64.trunc_sat_f64_s" (0, 0) [F64] -> [I64]
            @saturating_float_to_int I64TruncSatF64U = "i64.trunc_sat_f64_u" (0, 0) [F64] -> [I64]

            // Memory instructions; the first tuple element is the natural
            // width of the access in bytes.
            @mvp I32Load = "i32.load" (4, 0) [I32] -> [I32]
            @mvp I64Load = "i64.load" (8, 0) [I32] -> [I64]
            @mvp F32Load = "f32.load" (4, 0) [I32] -> [F32]
            @mvp F64Load = "f64.load" (8, 0) [I32] -> [F64]
            @mvp I32Load8S = "i32.load8_s" (1, 0) [I32] -> [I32]
            @mvp I32Load8U = "i32.load8_u" (1, 0) [I32] -> [I32]
            @mvp I32Load16S = "i32.load16_s" (2, 0) [I32] -> [I32]
            @mvp I32Load16U = "i32.load16_u" (2, 0) [I32] -> [I32]
            @mvp I64Load8S = "i64.load8_s" (1, 0) [I32] -> [I64]
            @mvp I64Load8U = "i64.load8_u" (1, 0) [I32] -> [I64]
            @mvp I64Load16S = "i64.load16_s" (2, 0) [I32] -> [I64]
            @mvp I64Load16U = "i64.load16_u" (2, 0) [I32] -> [I64]
            @mvp I64Load32S = "i64.load32_s" (4, 0) [I32] -> [I64]
            @mvp I64Load32U = "i64.load32_u" (4, 0) [I32] -> [I64]
            @mvp I32Store = "i32.store" (4, 0) [I32, I32] -> []
            @mvp I64Store = "i64.store" (8, 0) [I32, I64] -> []
            @mvp F32Store = "f32.store" (4, 0) [I32, F32] -> []
            @mvp F64Store = "f64.store" (8, 0) [I32, F64] -> []
            @mvp I32Store8 = "i32.store8" (1, 0) [I32, I32] -> []
            @mvp I32Store16 = "i32.store16" (2, 0) [I32, I32] -> []
            @mvp I64Store8 = "i64.store8" (1, 0) [I32, I64] -> []
            @mvp I64Store16 = "i64.store16" (2, 0) [I32, I64] -> []
            @mvp I64Store32 = "i64.store32" (4, 0) [I32, I64] -> []
            @simd V128Load = "v128.load" (16, 0) [I32] -> [V128]
            @simd V128Load8x8S = "v128.load8x8_s" (8, 0) [I32] -> [V128]
            @simd V128Load8x8U = "v128.load8x8_u" (8, 0) [I32] -> [V128]
            @simd V128Load16x4S = "v128.load16x4_s" (8, 0) [I32] -> [V128]
            @simd V128Load16x4U = "v128.load16x4_u" (8, 0) [I32] -> [V128]
            @simd V128Load32x2S = "v128.load32x2_s" (8, 0) [I32] -> [V128]
            @simd V128Load32x2U = "v128.load32x2_u" (8, 0) [I32] -> [V128]
            @simd V128Load8Splat = "v128.load8_splat" (1, 0) [I32] -> [V128]
            @simd V128Load16Splat = "v128.load16_splat" (2, 0) [I32] -> [V128]
            @simd V128Load32Splat = "v128.load32_splat" (4, 0) [I32] -> [V128]
            @simd V128Load64Splat = "v128.load64_splat" (8, 0) [I32] -> [V128]
            @simd V128Load32Zero = "v128.load32_zero" (4, 0) [I32] -> [V128]
            @simd V128Load64Zero = "v128.load64_zero" (8, 0) [I32] -> [V128]
            @simd V128Store = "v128.store" (16, 0) [I32, V128] -> []

            // Atomic instructions; alignment must equal the natural width.
            @threads MemoryAtomicNotify = "memory.atomic.notify" (4, 0) [I32, I32] -> [I32]
            @threads MemoryAtomicWait32 = "memory.atomic.wait32" (4, 0) [I32, I32, I64] -> [I32]
            @threads MemoryAtomicWait64 = "memory.atomic.wait64" (8, 0) [I32, I64, I64] -> [I32]
            @threads AtomicFence = "atomic.fence" (0, 0) [] -> []
            @threads I32AtomicLoad = "i32.atomic.load" (4, 0) [I32] -> [I32]
            @threads I32AtomicLoad8U = "i32.atomic.load8_u" (1, 0) [I32] -> [I32]
            @threads I32AtomicLoad16U = "i32.atomic.load16_u" (2, 0) [I32] -> [I32]
            @threads I64AtomicLoad = "i64.atomic.load" (8, 0) [I32] -> [I64]
            @threads I64AtomicLoad8U = "i64.atomic.load8_u" (1, 0) [I32] -> [I64]
            @threads I64AtomicLoad16U = "i64.atomic.load16_u" (2, 0) [I32] -> [I64]
            @threads I64AtomicLoad32U = "i64.atomic.load32_u" (4, 0) [I32] -> [I64]
            @threads I32AtomicStore = "i32.atomic.store" (4, 0) [I32, I32] -> []
            @threads I32AtomicStore8 = "i32.atomic.store8" (1, 0) [I32, I32] -> []
            @threads I32AtomicStore16 = "i32.atomic.store16" (2, 0) [I32, I32] -> []
            @threads I64AtomicStore = "i64.atomic.store" (8, 0) [I32, I64] -> []
            @threads I64AtomicStore8 = "i64.atomic.store8" (1, 0) [I32, I64] -> []
            @threads I64AtomicStore16 = "i64.atomic.store16" (2, 0) [I32, I64] -> []
            @threads I64AtomicStore32 = "i64.atomic.store32" (4, 0) [I32, I64] -> []
            @threads I32AtomicRmwAdd = "i32.atomic.rmw.add" (4, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw8AddU = "i32.atomic.rmw8.add_u" (1, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw16AddU = "i32.atomic.rmw16.add_u" (2, 0) [I32, I32] -> [I32]
            @threads I64AtomicRmwAdd = "i64.atomic.rmw.add" (8, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw8AddU = "i64.atomic.rmw8.add_u" (1, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw16AddU = "i64.atomic.rmw16.add_u" (2, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw32AddU = "i64.atomic.rmw32.add_u" (4, 0) [I32, I64] -> [I64]
            @threads I32AtomicRmwSub = "i32.atomic.rmw.sub" (4, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw8SubU = "i32.atomic.rmw8.sub_u" (1, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw16SubU = "i32.atomic.rmw16.sub_u" (2, 0) [I32, I32] -> [I32]
            @threads I64AtomicRmwSub = "i64.atomic.rmw.sub" (8, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw8SubU = "i64.atomic.rmw8.sub_u" (1, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw16SubU = "i64.atomic.rmw16.sub_u" (2, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw32SubU = "i64.atomic.rmw32.sub_u" (4, 0) [I32, I64] -> [I64]
            @threads I32AtomicRmwAnd = "i32.atomic.rmw.and" (4, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw8AndU = "i32.atomic.rmw8.and_u" (1, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw16AndU = "i32.atomic.rmw16.and_u" (2, 0) [I32, I32] -> [I32]
            @threads I64AtomicRmwAnd = "i64.atomic.rmw.and" (8, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw8AndU = "i64.atomic.rmw8.and_u" (1, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw16AndU = "i64.atomic.rmw16.and_u" (2, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw32AndU = "i64.atomic.rmw32.and_u" (4, 0) [I32, I64] -> [I64]
            @threads I32AtomicRmwOr = "i32.atomic.rmw.or" (4, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw8OrU = "i32.atomic.rmw8.or_u" (1, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw16OrU = "i32.atomic.rmw16.or_u" (2, 0) [I32, I32] -> [I32]
            @threads I64AtomicRmwOr = "i64.atomic.rmw.or" (8, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw8OrU = "i64.atomic.rmw8.or_u" (1, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw16OrU = "i64.atomic.rmw16.or_u" (2, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw32OrU = "i64.atomic.rmw32.or_u" (4, 0) [I32, I64] -> [I64]
            @threads I32AtomicRmwXor = "i32.atomic.rmw.xor" (4, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw8XorU = "i32.atomic.rmw8.xor_u" (1, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw16XorU = "i32.atomic.rmw16.xor_u" (2, 0) [I32, I32] -> [I32]
            @threads I64AtomicRmwXor = "i64.atomic.rmw.xor" (8, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw8XorU = "i64.atomic.rmw8.xor_u" (1, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw16XorU = "i64.atomic.rmw16.xor_u" (2, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw32XorU = "i64.atomic.rmw32.xor_u" (4, 0) [I32, I64] -> [I64]
            @threads I32AtomicRmwXchg = "i32.atomic.rmw.xchg" (4, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw8XchgU = "i32.atomic.rmw8.xchg_u" (1, 0) [I32, I32] -> [I32]
            @threads I32AtomicRmw16XchgU = "i32.atomic.rmw16.xchg_u" (2, 0) [I32, I32] -> [I32]
            @threads I64AtomicRmwXchg = "i64.atomic.rmw.xchg" (8, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw8XchgU = "i64.atomic.rmw8.xchg_u" (1, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw16XchgU = "i64.atomic.rmw16.xchg_u" (2, 0) [I32, I64] -> [I64]
            @threads I64AtomicRmw32XchgU = "i64.atomic.rmw32.xchg_u" (4, 0) [I32, I64] -> [I64]
            @threads I32AtomicRmwCmpxchg = "i32.atomic.rmw.cmpxchg" (4, 0) [I32, I32, I32] -> [I32]
            @threads I32AtomicRmw8CmpxchgU = "i32.atomic.rmw8.cmpxchg_u" (1, 0) [I32, I32, I32] -> [I32]
            @threads I32AtomicRmw16CmpxchgU = "i32.atomic.rmw16.cmpxchg_u" (2, 0) [I32, I32, I32] -> [I32]
            @threads I64AtomicRmwCmpxchg = "i64.atomic.rmw.cmpxchg" (8, 0) [I32, I64, I64] -> [I64]
            @threads I64AtomicRmw8CmpxchgU = "i64.atomic.rmw8.cmpxchg_u" (1, 0) [I32, I64, I64] -> [I64]
            @threads I64AtomicRmw16CmpxchgU = "i64.atomic.rmw16.cmpxchg_u" (2, 0) [I32, I64, I64] -> [I64]
            @threads I64AtomicRmw32CmpxchgU = "i64.atomic.rmw32.cmpxchg_u" (4, 0) [I32, I64, I64] -> [I64]

            // SIMD instructions; the second tuple element is the lane count
            // bounding the lane immediate.
            @simd I8x16Shuffle = "i8x16.shuffle" (0, 32) [V128, V128] -> [V128]
            @simd I8x16Swizzle = "i8x16.swizzle" (0, 0) [V128, V128] -> [V128]
            @simd I8x16Splat = "i8x16.splat" (0, 0) [I32] -> [V128]
            @simd I16x8Splat = "i16x8.splat" (0, 0) [I32] -> [V128]
            @simd I32x4Splat = "i32x4.splat" (0, 0) [I32] -> [V128]
            @simd I64x2Splat = "i64x2.splat" (0, 0) [I64] -> [V128]
            @simd F32x4Splat = "f32x4.splat" (0, 0) [F32] -> [V128]
            @simd F64x2Splat = "f64x2.splat" (0, 0) [F64] -> [V128]
            @simd I8x16ExtractLaneS = "i8x16.extract_lane_s" (0, 16) [V128] -> [I32]
            @simd I8x16ExtractLaneU = "i8x16.extract_lane_u" (0, 16) [V128] -> [I32]
            @simd I8x16ReplaceLane = "i8x16.replace_lane" (0, 16) [V128, I32] -> [V128]
            @simd I16x8ExtractLaneS = "i16x8.extract_lane_s" (0, 8) [V128] -> [I32]
            @simd I16x8ExtractLaneU = "i16x8.extract_lane_u" (0, 8) [V128] -> [I32]
            @simd I16x8ReplaceLane = "i16x8.replace_lane" (0, 8) [V128, I32] -> [V128]
            @simd I32x4ExtractLane = "i32x4.extract_lane" (0, 4) [V128] -> [I32]
            @simd I32x4ReplaceLane = "i32x4.replace_lane" (0, 4) [V128, I32] -> [V128]
            @simd I64x2ExtractLane = "i64x2.extract_lane" (0, 2) [V128] -> [I64]
            @simd I64x2ReplaceLane = "i64x2.replace_lane" (0, 2) [V128, I64] -> [V128]
            @simd F32x4ExtractLane = "f32x4.extract_lane" (0, 4) [V128] -> [F32]
            @simd F32x4ReplaceLane = "f32x4.replace_lane" (0, 4) [V128, F32] -> [V128]
            @simd F64x2ExtractLane = "f64x2.extract_lane" (0, 2) [V128] -> [F64]
            @simd F64x2ReplaceLane = "f64x2.replace_lane" (0, 2) [V128, F64] -> [V128]
            @simd I8x16Eq = "i8x16.eq" (0, 0) [V128, V128] -> [V128]
            @simd I8x16Ne = "i8x16.ne" (0, 0) [V128, V128] -> [V128]
            @simd I8x16LtS = "i8x16.lt_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16LtU = "i8x16.lt_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16GtS = "i8x16.gt_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16GtU = "i8x16.gt_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16LeS = "i8x16.le_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16LeU = "i8x16.le_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16GeS = "i8x16.ge_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16GeU = "i8x16.ge_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8Eq = "i16x8.eq" (0, 0) [V128, V128] -> [V128]
            @simd I16x8Ne = "i16x8.ne" (0, 0) [V128, V128] -> [V128]
            @simd I16x8LtS = "i16x8.lt_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8LtU = "i16x8.lt_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8GtS = "i16x8.gt_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8GtU = "i16x8.gt_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8LeS = "i16x8.le_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8LeU = "i16x8.le_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8GeS = "i16x8.ge_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8GeU = "i16x8.ge_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4Eq = "i32x4.eq" (0, 0) [V128, V128] -> [V128]
            @simd I32x4Ne = "i32x4.ne" (0, 0) [V128, V128] -> [V128]
            @simd I32x4LtS = "i32x4.lt_s" (0, 0) [V128, V128] -> [V128]
            @simd I32x4LtU = "i32x4.lt_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4GtS = "i32x4.gt_s" (0, 0) [V128, V128] -> [V128]
            @simd I32x4GtU = "i32x4.gt_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4LeS = "i32x4.le_s" (0, 0) [V128, V128] -> [V128]
            @simd I32x4LeU = "i32x4.le_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4GeS = "i32x4.ge_s" (0, 0) [V128, V128] -> [V128]
            @simd I32x4GeU = "i32x4.ge_u" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Eq = "f32x4.eq" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Ne = "f32x4.ne" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Lt = "f32x4.lt" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Gt = "f32x4.gt" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Le = "f32x4.le" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Ge = "f32x4.ge" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Eq = "f64x2.eq" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Ne = "f64x2.ne" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Lt = "f64x2.lt" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Gt = "f64x2.gt" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Le = "f64x2.le" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Ge = "f64x2.ge" (0, 0) [V128, V128] -> [V128]
            @simd V128Not = "v128.not" (0, 0) [V128] -> [V128]
            @simd V128And = "v128.and" (0, 0) [V128, V128] -> [V128]
            @simd V128AndNot = "v128.andnot" (0, 0) [V128, V128] -> [V128]
            @simd V128Or = "v128.or" (0, 0) [V128, V128] -> [V128]
            @simd V128Xor = "v128.xor" (0, 0) [V128, V128] -> [V128]
            @simd V128Bitselect = "v128.bitselect" (0, 0) [V128, V128, V128] -> [V128]
            @simd V128AnyTrue = "v128.any_true" (0, 0) [V128] -> [I32]
            @simd I8x16Abs = "i8x16.abs" (0, 0) [V128] -> [V128]
            @simd I8x16Neg = "i8x16.neg" (0, 0) [V128] -> [V128]
            @simd I8x16AllTrue = "i8x16.all_true" (0, 0) [V128] -> [I32]
            @simd I8x16Bitmask = "i8x16.bitmask" (0, 0) [V128] -> [I32]
            @simd I8x16NarrowI16x8S = "i8x16.narrow_i16x8_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16NarrowI16x8U = "i8x16.narrow_i16x8_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16Shl = "i8x16.shl" (0, 0) [V128, I32] -> [V128]
            @simd I8x16ShrS = "i8x16.shr_s" (0, 0) [V128, I32] -> [V128]
            @simd I8x16ShrU = "i8x16.shr_u" (0, 0) [V128, I32] -> [V128]
            @simd I8x16Add = "i8x16.add" (0, 0) [V128, V128] -> [V128]
            @simd I8x16AddSatS = "i8x16.add_sat_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16AddSatU = "i8x16.add_sat_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16Sub = "i8x16.sub" (0, 0) [V128, V128] -> [V128]
            @simd I8x16SubSatS = "i8x16.sub_sat_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16SubSatU = "i8x16.sub_sat_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16MinS = "i8x16.min_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16MinU = "i8x16.min_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16MaxS = "i8x16.max_s" (0, 0) [V128, V128] -> [V128]
            @simd I8x16MaxU = "i8x16.max_u" (0, 0) [V128, V128] -> [V128]
            @simd I8x16AvgrU = "i8x16.avgr_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8Abs = "i16x8.abs" (0, 0) [V128] -> [V128]
            @simd I16x8Neg = "i16x8.neg" (0, 0) [V128] -> [V128]
            @simd I16x8AllTrue = "i16x8.all_true" (0, 0) [V128] -> [I32]
            @simd I16x8Bitmask = "i16x8.bitmask" (0, 0) [V128] -> [I32]
            @simd I16x8NarrowI32x4S = "i16x8.narrow_i32x4_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8NarrowI32x4U = "i16x8.narrow_i32x4_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8ExtendLowI8x16S = "i16x8.extend_low_i8x16_s" (0, 0) [V128] -> [V128]
            @simd I16x8ExtendHighI8x16S = "i16x8.extend_high_i8x16_s" (0, 0) [V128] -> [V128]
            @simd I16x8ExtendLowI8x16U = "i16x8.extend_low_i8x16_u" (0, 0) [V128] -> [V128]
            @simd I16x8ExtendHighI8x16U = "i16x8.extend_high_i8x16_u" (0, 0) [V128] -> [V128]
            @simd I16x8Shl = "i16x8.shl" (0, 0) [V128, I32] -> [V128]
            @simd I16x8ShrS = "i16x8.shr_s" (0, 0) [V128, I32] -> [V128]
            @simd I16x8ShrU = "i16x8.shr_u" (0, 0) [V128, I32] -> [V128]
            @simd I16x8Add = "i16x8.add" (0, 0) [V128, V128] -> [V128]
            @simd I16x8AddSatS = "i16x8.add_sat_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8AddSatU = "i16x8.add_sat_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8Sub = "i16x8.sub" (0, 0) [V128, V128] -> [V128]
            @simd I16x8SubSatS = "i16x8.sub_sat_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8SubSatU = "i16x8.sub_sat_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8Mul = "i16x8.mul" (0, 0) [V128, V128] -> [V128]
            @simd I16x8MinS = "i16x8.min_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8MinU = "i16x8.min_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8MaxS = "i16x8.max_s" (0, 0) [V128, V128] -> [V128]
            @simd I16x8MaxU = "i16x8.max_u" (0, 0) [V128, V128] -> [V128]
            @simd I16x8AvgrU = "i16x8.avgr_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4Abs = "i32x4.abs" (0, 0) [V128] -> [V128]
            @simd I32x4Neg = "i32x4.neg" (0, 0) [V128] -> [V128]
            @simd I32x4AllTrue = "i32x4.all_true" (0, 0) [V128] -> [I32]
            @simd I32x4Bitmask = "i32x4.bitmask" (0, 0) [V128] -> [I32]
            @simd I32x4ExtendLowI16x8S = "i32x4.extend_low_i16x8_s" (0, 0) [V128] -> [V128]
            @simd I32x4ExtendHighI16x8S = "i32x4.extend_high_i16x8_s" (0, 0) [V128] -> [V128]
            @simd I32x4ExtendLowI16x8U = "i32x4.extend_low_i16x8_u" (0, 0) [V128] -> [V128]
            @simd I32x4ExtendHighI16x8U = "i32x4.extend_high_i16x8_u" (0, 0) [V128] -> [V128]
            @simd I32x4Shl = "i32x4.shl" (0, 0) [V128, I32] -> [V128]
            @simd I32x4ShrS = "i32x4.shr_s" (0, 0) [V128, I32] -> [V128]
            @simd I32x4ShrU = "i32x4.shr_u" (0, 0) [V128, I32] -> [V128]
            @simd I32x4Add = "i32x4.add" (0, 0) [V128, V128] -> [V128]
            @simd I32x4Sub = "i32x4.sub" (0, 0) [V128, V128] -> [V128]
            @simd I32x4Mul = "i32x4.mul" (0, 0) [V128, V128] -> [V128]
            @simd I32x4MinS = "i32x4.min_s" (0, 0) [V128, V128] -> [V128]
            @simd I32x4MinU = "i32x4.min_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4MaxS = "i32x4.max_s" (0, 0) [V128, V128] -> [V128]
            @simd I32x4MaxU = "i32x4.max_u" (0, 0) [V128, V128] -> [V128]
            @simd I32x4DotI16x8S = "i32x4.dot_i16x8_s" (0, 0) [V128, V128] -> [V128]
            @simd I64x2Neg = "i64x2.neg" (0, 0) [V128] -> [V128]
            @simd I64x2Shl = "i64x2.shl" (0, 0) [V128, I32] -> [V128]
            @simd I64x2ShrS = "i64x2.shr_s" (0, 0) [V128, I32] -> [V128]
            @simd I64x2ShrU = "i64x2.shr_u" (0, 0) [V128, I32] -> [V128]
            @simd I64x2Add = "i64x2.add" (0, 0) [V128, V128] -> [V128]
            @simd I64x2Sub = "i64x2.sub" (0, 0) [V128, V128] -> [V128]
            @simd I64x2Mul = "i64x2.mul" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Abs = "f32x4.abs" (0, 0) [V128] -> [V128]
            @simd F32x4Neg = "f32x4.neg" (0, 0) [V128] -> [V128]
            @simd F32x4Sqrt = "f32x4.sqrt" (0, 0) [V128] -> [V128]
            @simd F32x4Ceil = "f32x4.ceil" (0, 0) [V128] -> [V128]
            @simd F32x4Floor = "f32x4.floor" (0, 0) [V128] -> [V128]
            @simd F32x4Trunc = "f32x4.trunc" (0, 0) [V128] -> [V128]
            @simd F32x4Nearest = "f32x4.nearest" (0, 0) [V128] -> [V128]
            @simd F32x4Add = "f32x4.add" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Sub = "f32x4.sub" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Mul = "f32x4.mul" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Div = "f32x4.div" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Min = "f32x4.min" (0, 0) [V128, V128] -> [V128]
            @simd F32x4Max = "f32x4.max" (0, 0) [V128, V128] -> [V128]
            @simd F32x4PMin = "f32x4.pmin" (0, 0) [V128, V128] -> [V128]
            @simd F32x4PMax = "f32x4.pmax" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Abs = "f64x2.abs" (0, 0) [V128] -> [V128]
            @simd F64x2Neg = "f64x2.neg" (0, 0) [V128] -> [V128]
            @simd F64x2Sqrt = "f64x2.sqrt" (0, 0) [V128] -> [V128]
            @simd F64x2Ceil = "f64x2.ceil" (0, 0) [V128] -> [V128]
            @simd F64x2Floor = "f64x2.floor" (0, 0) [V128] -> [V128]
            @simd F64x2Trunc = "f64x2.trunc" (0, 0) [V128] -> [V128]
            @simd F64x2Nearest = "f64x2.nearest" (0, 0) [V128] -> [V128]
            @simd F64x2Add = "f64x2.add" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Sub = "f64x2.sub" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Mul = "f64x2.mul" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Div = "f64x2.div" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Min = "f64x2.min" (0, 0) [V128, V128] -> [V128]
            @simd F64x2Max = "f64x2.max" (0, 0) [V128, V128] -> [V128]
            @simd F64x2PMin = "f64x2.pmin" (0, 0) [V128, V128] -> [V128]
            @simd F64x2PMax = "f64x2.pmax" (0, 0) [V128, V128] -> [V128]
            @simd I32x4TruncSatF32x4S = "i32x4.trunc_sat_f32x4_s" (0, 0) [V128] -> [V128]
            @simd I32x4TruncSatF32x4U = "i32x4.trunc_sat_f32x4_u" (0, 0) [V128] -> [V128]
            @simd F32x4ConvertI32x4S = "f32x4.convert_i32x4_s" (0, 0) [V128] -> [V128]
            @simd F32x4ConvertI32x4U = "f32x4.convert_i32x4_u" (0, 0) [V128] -> [V128]
            @simd I32x4TruncSatF64x2SZero = "i32x4.trunc_sat_f64x2_s_zero" (0, 0) [V128] -> [V128]
            @simd I32x4TruncSatF64x2UZero = "i32x4.trunc_sat_f64x2_u_zero" (0, 0) [V128] -> [V128]
            @simd F64x2ConvertLowI32x4S = "f64x2.convert_low_i32x4_s" (0, 0) [V128] -> [V128]
            @simd F64x2ConvertLowI32x4U = "f64x2.convert_low_i32x4_u" (0, 0) [V128] -> [V128]
            @simd F32x4DemoteF64x2Zero = "f32x4.demote_f64x2_zero" (0, 0) [V128] -> [V128]
            @simd F64x2PromoteLowF32x4 = "f64x2.promote_low_f32x4" (0, 0) [V128] -> [V128]
        }
    };
}

macro_rules! gate {
    ($features:ident mvp) => {
        Ok(())
    };
    ($features:ident sign_extension) => {
        if $features.sign_extension() {
            Ok(())
        } else {
            Err("sign extension operations")
        }
    };
    ($features:ident saturating_float_to_int) => {
        if $features.saturating_float_to_int() {
            Ok(())
        } else {
            Err("saturating float to int conversions")
        }
    };
    ($features:ident simd) => {
        if $features.simd() {
            Ok(())
        } else {
            Err("SIMD")
        }
    };
    ($features:ident threads) => {
        if $features.threads() {
            Ok(())
        } else {
            Err("threads")
        }
    };
}

macro_rules! define_opcodes {
    ($( @$proposal:ident $op:ident = $name:literal ($size:expr, $lanes:expr) [$($param:ident),*] -> [$($result:ident),*] )*) => {
        /// An instruction code carried by the instruction-level events.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum Opcode {
            $($op,)*
        }

        impl Opcode {
            /// The instruction's name as spelled in the text format; used in
            /// diagnostics.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Opcode::$op => $name,)*
                }
            }

            /// The natural width of the instruction's memory access in
            /// bytes, or 0 for instructions that do not access memory. The
            /// natural alignment of the access is the same value.
            pub fn memory_size(&self) -> u32 {
                match self {
                    $(Opcode::$op => $size,)*
                }
            }

            /// The number of lanes addressed by the instruction's lane
            /// immediate(s), or 0 when it has none.
            pub fn lane_count(&self) -> u8 {
                match self {
                    $(Opcode::$op => $lanes,)*
                }
            }

            /// The operand types the instruction consumes, leftmost deepest
            /// on the stack.
            pub fn params(&self) -> &'static [ValType] {
                match self {
                    $(Opcode::$op => &[$(ValType::$param),*],)*
                }
            }

            /// The result types the instruction pushes.
            pub fn results(&self) -> &'static [ValType] {
                match self {
                    $(Opcode::$op => &[$(ValType::$result),*],)*
                }
            }

            /// Checks that the proposal this instruction belongs to is
            /// enabled, returning the feature description for the
            /// "support is not enabled" diagnostic otherwise.
            pub fn check_enabled(&self, features: &WasmFeatures) -> Result<(), &'static str> {
                match self {
                    $(Opcode::$op => gate!(features $proposal),)*
                }
            }
        }
    };
}

for_each_opcode!(define_opcodes);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! collect_opcodes {
        ($( @$proposal:ident $op:ident = $name:literal ($size:expr, $lanes:expr) [$($param:ident),*] -> [$($result:ident),*] )*) => {
            &[$(Opcode::$op,)*]
        };
    }

    const ALL: &[Opcode] = for_each_opcode!(collect_opcodes);

    #[test]
    fn memory_sizes_are_powers_of_two() {
        for op in ALL {
            let size = op.memory_size();
            if size != 0 {
                assert!(size.is_power_of_two(), "{}: size {size}", op.name());
                assert!(size <= 16, "{}: size {size}", op.name());
            }
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for op in ALL {
            assert!(seen.insert(op.name()), "duplicate name {}", op.name());
        }
    }

    #[test]
    fn lane_ops_take_a_vector() {
        for op in ALL {
            if op.lane_count() != 0 {
                assert!(
                    op.params().contains(&ValType::V128),
                    "{} has a lane immediate but no v128 operand",
                    op.name()
                );
            }
        }
    }

    #[test]
    fn memory_ops_are_indexed_by_i32() {
        for op in ALL {
            if op.memory_size() != 0 {
                assert_eq!(
                    op.params().first(),
                    Some(&ValType::I32),
                    "{} must take an i32 address as its first operand",
                    op.name()
                );
            }
        }
    }

    #[test]
    fn gating_follows_the_proposal() {
        let none = WasmFeatures::WASM1;
        let all = WasmFeatures::all();
        assert!(Opcode::I32Add.check_enabled(&none).is_ok());
        assert_eq!(
            Opcode::I32Extend8S.check_enabled(&none),
            Err("sign extension operations")
        );
        assert_eq!(
            Opcode::I32TruncSatF32S.check_enabled(&none),
            Err("saturating float to int conversions")
        );
        assert_eq!(Opcode::V128Load.check_enabled(&none), Err("SIMD"));
        assert_eq!(Opcode::I32AtomicLoad.check_enabled(&none), Err("threads"));
        for op in ALL {
            assert!(op.check_enabled(&all).is_ok(), "{}", op.name());
        }
    }

    #[test]
    fn atomic_signatures_address_then_value() {
        // Every atomic rmw consumes an address and a same-typed value and
        // produces that value's type.
        assert_eq!(
            Opcode::I64AtomicRmw16AddU.params(),
            &[ValType::I32, ValType::I64]
        );
        assert_eq!(Opcode::I64AtomicRmw16AddU.results(), &[ValType::I64]);
        assert_eq!(Opcode::I64AtomicRmw16AddU.memory_size(), 2);
        assert_eq!(
            Opcode::I32AtomicRmwCmpxchg.params(),
            &[ValType::I32, ValType::I32, ValType::I32]
        );
    }
}
