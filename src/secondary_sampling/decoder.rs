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

//! Secondary sampling decoder.

use crate::{
    error::{Error, Result},
    secondary_sampling::state::{Extra, SecondarySamplingState},
    trace::propagation::carrier::Getter,
};

/// Decode the value of a secondary sampling header.
///
/// Whitespace around segments, parameters, and parameter names and values is
/// ignored.
///
/// Every decoded state is unsampled: whether this hop samples a key is up to
/// the caller. Re-encoding an unchanged result passes upstream span ids
/// through.
pub fn decode_secondary_sampling(header_value: &str) -> Result<Extra> {
    let mut extra = Extra::new();

    for entry in header_value.split(',').map(str::trim) {
        if entry.is_empty() {
            continue;
        }

        let state = decode_state(entry)?;
        if extra.get(state.sampling_key()).is_some() {
            return Err(Error::DuplicateSamplingKey(state.sampling_key().to_owned()));
        }
        extra.insert(state);
    }

    Ok(extra)
}

fn decode_state(entry: &str) -> Result<SecondarySamplingState> {
    let mut pieces = entry.split(';').map(str::trim);

    let sampling_key = pieces.next().unwrap_or_default();
    let mut state =
        SecondarySamplingState::try_new(sampling_key).map_err(|_| Error::EmptySamplingKey {
            entry: entry.to_owned(),
        })?;

    for parameter in pieces {
        match parameter
            .split_once('=')
            .map(|(key, value)| (key.trim(), value.trim()))
        {
            Some((key, value)) if !key.is_empty() => state.put_parameter(key, value),
            _ => {
                return Err(Error::MalformedParameter {
                    sampling_key: sampling_key.to_owned(),
                    parameter: parameter.to_owned(),
                });
            }
        }
    }

    Ok(state)
}

/// Reads the secondary sampling header of an inbound carrier.
#[derive(Debug, Clone)]
pub struct SecondarySamplingExtractor<G> {
    getter: G,
    field_name: String,
}

impl<G> SecondarySamplingExtractor<G> {
    /// New with the getter reading header `field_name`.
    pub fn new(getter: G, field_name: impl Into<String>) -> Self {
        Self {
            getter,
            field_name: field_name.into(),
        }
    }

    /// Name of the read header.
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Extract the states carried by `carrier`, `None` if it has no secondary
    /// sampling header.
    pub fn extract<C: ?Sized>(&self, carrier: &C) -> Result<Option<Extra>>
    where
        G: Getter<C>,
    {
        let Some(value) = self
            .getter
            .get(carrier, &self.field_name)
            .filter(|value| !value.trim().is_empty())
        else {
            return Ok(None);
        };

        decode_secondary_sampling(value)
            .inspect_err(|err| {
                tracing::debug!(field = %self.field_name, value, ?err, "reject secondary sampling")
            })
            .map(Some)
    }
}
