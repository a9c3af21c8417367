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

//! Crate errors.

/// Crate result, defaulting the error to [Error].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while reading propagated trace data.
///
/// Writing propagation headers never fails; only decoding does.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A segment of the secondary sampling header has no sampling key.
    #[error("secondary sampling entry `{entry}` has an empty sampling key")]
    EmptySamplingKey {
        /// The raw segment.
        entry: String,
    },

    /// A parameter is not of the form `key=value`.
    #[error("malformed parameter `{parameter}` for sampling key `{sampling_key}`")]
    MalformedParameter {
        /// Key of the state the parameter belongs to.
        sampling_key: String,
        /// The raw parameter.
        parameter: String,
    },

    /// The same sampling key appears twice in one header.
    #[error("duplicate sampling key `{0}`")]
    DuplicateSamplingKey(String),

    /// Trace id isn't a non-zero hex number of at most 32 digits.
    #[error("invalid trace id `{0}`")]
    InvalidTraceId(String),

    /// Span id isn't a non-zero hex number of at most 16 digits.
    #[error("invalid span id `{0}`")]
    InvalidSpanId(String),
}
