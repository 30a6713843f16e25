/* Copyright 2019 Mozilla Foundation
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

// The following limits are imposed on WebAssembly modules during validation.

/// Maximum number of 64 KiB pages a linear memory may declare.
pub const MAX_MEMORY_PAGES: u64 = 65536;

/// Maximum number of elements a table may declare.
pub const MAX_TABLE_ELEMS: u64 = u32::MAX as u64;

/// Maximum number of locals a single function may declare.
pub const MAX_FUNCTION_LOCALS: u32 = 1 << 28;
