// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use uuid::Uuid;

pub(crate) struct RandomGenerator;

impl RandomGenerator {
    /// Generate a non-zero 128-bit trace id.
    pub(crate) fn trace_id() -> u128 {
        loop {
            let id = Uuid::new_v4().as_u128();
            if id != 0 {
                return id;
            }
        }
    }

    /// Generate a non-zero 64-bit span id.
    pub(crate) fn span_id() -> u64 {
        loop {
            let (id, _) = Uuid::new_v4().as_u64_pair();
            if id != 0 {
                return id;
            }
        }
    }
}
