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

//! CPU test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: CPU initialization, reset, register access, run flag
//! - `decode`: instruction field decoding
//! - `alu`: arithmetic, logic, shift, and set-on-less-than instructions
//! - `branch`: branches, jumps, links, and delay-slot sequencing
//! - `loadstore`: the load/store family and effective addressing
//! - `muldiv`: HI/LO transfers, multiply, divide
//! - `cop0`: the MFC0/MTC0 stub interface and fail-open decoding

mod helpers;



#[cfg(test)]
mod alu;


#[cfg(test)]
mod loadstore;
