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

macro_rules! define_wasm_features {
    (
        $(#[$outer:meta])*
        pub struct WasmFeatures: $repr:ty {
            $(
                $(#[$inner:ident $($args:tt)*])*
                pub $field:ident: $const:ident($flag:expr) = $default:expr;
            )*
        }
    ) => {
        bitflags::bitflags! {
            $(#[$outer])*
            pub struct WasmFeatures: $repr {
                $(
                    $(#[$inner $($args)*])*
                    #[doc = "\nDefaults to `"]
                    #[doc = stringify!($default)]
                    #[doc = "`.\n"]
                    const $const = $flag;
                )*
            }
        }

        impl Default for WasmFeatures {
            #[inline]
            fn default() -> Self {
                let mut features = WasmFeatures::empty();
                $(
                    features.set(WasmFeatures::$const, $default);
                )*
                features
            }
        }

        impl WasmFeatures {
            $(
                /// Returns whether this feature is enabled in this feature set.
                #[inline]
                pub fn $field(&self) -> bool {
                    self.contains(WasmFeatures::$const)
                }
            )*
        }
    };
}

define_wasm_features! {
    /// Flags for the WebAssembly proposals accepted during validation.
    ///
    /// The [`Default`] implementation enables the standardized proposals and
    /// leaves the in-progress ones disabled; pass a customized set to
    /// [`Validator::new_with_features`](crate::Validator::new_with_features)
    /// to change what is accepted. A disabled feature causes the constructs
    /// it gates to be rejected with a specific diagnostic.
    #[derive(Hash, Debug, Copy, Clone, Eq, PartialEq)]
    pub struct WasmFeatures: u32 {
        /// The WebAssembly `mutable-global` proposal.
        pub mutable_globals: MUTABLE_GLOBALS(1) = true;
        /// The WebAssembly `saturating-float-to-int` proposal.
        pub saturating_float_to_int: SATURATING_FLOAT_TO_INT(1 << 1) = true;
        /// The WebAssembly `sign-extension-ops` proposal.
        pub sign_extension: SIGN_EXTENSION(1 << 2) = true;
        /// The WebAssembly reference types proposal.
        pub reference_types: REFERENCE_TYPES(1 << 3) = true;
        /// The WebAssembly multi-value proposal.
        pub multi_value: MULTI_VALUE(1 << 4) = true;
        /// The WebAssembly bulk memory operations proposal.
        pub bulk_memory: BULK_MEMORY(1 << 5) = true;
        /// The WebAssembly SIMD proposal.
        pub simd: SIMD(1 << 6) = true;
        /// The WebAssembly threads proposal.
        pub threads: THREADS(1 << 7) = false;
        /// The WebAssembly tail-call proposal.
        pub tail_call: TAIL_CALL(1 << 8) = false;
        /// The WebAssembly exception handling proposal.
        pub exceptions: EXCEPTIONS(1 << 9) = false;
    }
}

impl WasmFeatures {
    /// The feature set of the 1.0 version of the WebAssembly specification,
    /// with every later proposal turned off.
    pub const WASM1: WasmFeatures = WasmFeatures::empty();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let features = WasmFeatures::default();
        assert!(features.mutable_globals());
        assert!(features.reference_types());
        assert!(features.multi_value());
        assert!(features.simd());
        assert!(!features.threads());
        assert!(!features.tail_call());
        assert!(!features.exceptions());
    }

    #[test]
    fn wasm1_enables_nothing() {
        let features = WasmFeatures::WASM1;
        assert!(!features.mutable_globals());
        assert!(!features.sign_extension());
        assert!(!features.simd());
    }
}
