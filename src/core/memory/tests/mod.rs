// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 n64rx contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Memory bus test modules
//!
//! - `basic`: read/write round-trips, endianness, open-bus behavior
//! - `regions`: address translation and region identification
//! - `boot_stub`: boot-stub placement and failure modes

#[cfg(test)]
mod basic;
