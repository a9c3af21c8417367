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

use secondary_sampling::{
    Error,
    secondary_sampling::{decode_secondary_sampling, serialize_with_span_id},
    trace::{propagation::injector::encode_b3_single, trace_context::TraceContext},
};

#[test]
fn basic() {
    let data = "gatewayplay;ttl=1;spanId=a2fb4a1d1a96d312,authcache;sampled=0";
    let res = decode_secondary_sampling(data).unwrap();

    assert_eq!(res.len(), 2);
    let gatewayplay = res.get("gatewayplay").unwrap();
    assert_eq!(gatewayplay.parameter("ttl"), Some("1"));
    assert_eq!(gatewayplay.upstream_span_id(), Some("a2fb4a1d1a96d312"));
    let authcache = res.get("authcache").unwrap();
    assert_eq!(authcache.parameter("sampled"), Some("0"));
    assert_eq!(authcache.upstream_span_id(), None);
}

#[test]
fn missing_sampling_key() {
    let data = "gatewayplay,;ttl=1";
    let res = decode_secondary_sampling(data);

    assert!(matches!(res, Err(Error::EmptySamplingKey { .. })));
}

#[test]
fn invalid_parameter() {
    let data = "gatewayplay;ttl:1";
    let res = decode_secondary_sampling(data);

    assert!(matches!(res, Err(Error::MalformedParameter { .. })));
}

#[test]
fn unchanged_decisions_encode_back() {
    let data = "gatewayplay;ttl=1;spanId=a2fb4a1d1a96d312,authcache;sampled=0";
    let res = decode_secondary_sampling(data).unwrap();

    assert_eq!(serialize_with_span_id(&res, "0000000000000001"), data);
}

#[test]
fn b3_single_of_child() {
    let parent = TraceContext::from_hex("463ac35c9f6413ad48485a3953bb6124", "a2fb4a1d1a96d312")
        .unwrap()
        .with_sampled(true);
    let child = parent.child();

    let res = encode_b3_single(&child);
    let pieces: Vec<&str> = res.split('-').collect();
    assert_eq!(pieces.len(), 4);
    assert_eq!(pieces[0], "463ac35c9f6413ad48485a3953bb6124");
    assert_eq!(pieces[1], child.span_id_string());
    assert_eq!(pieces[2], "1");
    assert_eq!(pieces[3], "a2fb4a1d1a96d312");
}
