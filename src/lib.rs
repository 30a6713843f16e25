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

//! An event-driven validator for WebAssembly modules.
//!
//! This library decides whether a module is well-formed without doing any
//! parsing of its own: a binary or text parser drives a [`Validator`] by
//! calling one entry point per declaration and per instruction, in the order
//! it discovers them. Each entry point performs every check that applies to
//! its event, appends diagnostics to a caller-owned [`Errors`] sink, and
//! returns a single [`CheckResult`]. Validation never stops at the first
//! problem; a module is valid if and only if the sink is still empty after
//! [`Validator::end_module`].
//!
//! The accepted dialect of WebAssembly is controlled by [`WasmFeatures`],
//! covering the multi-value, reference-types, bulk-memory, threads, SIMD,
//! exception-handling, tail-call, sign-extension and
//! saturating-float-to-int proposals.
//!
//! ```
//! use wasmcheck::{Errors, Location, Opcode, ValType, Validator, Var};
//!
//! // (module
//! //   (func (param i32 i32) (result i32)
//! //     local.get 0
//! //     local.get 1
//! //     i32.add))
//! let loc = Location::new(0);
//! let mut errors = Errors::new();
//! let mut validator = Validator::new(&mut errors);
//! let _ = validator.on_type(loc, &[ValType::I32, ValType::I32], &[ValType::I32]);
//! let _ = validator.on_function(loc, Var::new(0, loc));
//! let _ = validator.begin_function_body(loc, 0);
//! let _ = validator.on_local_get(loc, Var::new(0, loc));
//! let _ = validator.on_local_get(loc, Var::new(1, loc));
//! let _ = validator.on_binary(loc, Opcode::I32Add);
//! let _ = validator.end_function_body(loc);
//! let _ = validator.end_module();
//! assert!(errors.is_empty());
//! ```

#![deny(missing_docs)]

pub use crate::errors::*;
pub use crate::features::*;
pub use crate::opcodes::*;
pub use crate::types::*;
pub use crate::validator::*;

mod errors;
mod features;
mod limits;
mod opcodes;
mod types;
mod validator;
