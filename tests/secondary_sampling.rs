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
    secondary_sampling::{Extra, SecondarySampling, SecondarySamplingState},
    trace::{
        propagation::{
            carrier::{MapGetter, MapSetter},
            injector::{B3_SINGLE_HEADER_KEY, B3SingleInjector, Injector},
        },
        trace_context::TraceContext,
    },
};
use std::{cell::RefCell, collections::HashMap, sync::Arc};

type Headers = HashMap<String, String>;

fn injector() -> impl Injector<Headers> {
    SecondarySampling::default().injector(B3SingleInjector::new(MapSetter), MapSetter)
}

fn inject(context: &TraceContext) -> Headers {
    let mut headers = Headers::new();
    injector().inject(context, &mut headers);
    headers
}

#[test]
fn no_extra() {
    let context = TraceContext::new(1, 0xbbbb).with_sampled(true);
    let headers = inject(&context);

    assert_eq!(headers.len(), 1);
    assert_eq!(
        headers[B3_SINGLE_HEADER_KEY],
        "00000000000000000000000000000001-000000000000bbbb-1"
    );
}

#[test]
fn empty_extra() {
    let context = TraceContext::new(1, 0xbbbb).with_extra(Extra::new());
    let headers = inject(&context);

    assert_eq!(headers.len(), 1);
    assert!(headers.contains_key(B3_SINGLE_HEADER_KEY));
    assert!(!headers.contains_key("sampling"));
}

#[test]
fn sampled_rewrites_span_id() {
    let extra: Extra = vec![
        SecondarySamplingState::new("b3")
            .with_sampled(true)
            .with_parameter("spanId", "aaaa"),
    ]
    .into();
    let context = TraceContext::new(1, 0xbbbb).with_extra(extra);

    assert_eq!(inject(&context)["sampling"], "b3;spanId=000000000000bbbb");
}

#[test]
fn unsampled_passes_through() {
    let extra: Extra = vec![
        SecondarySamplingState::new("b3").with_parameter("spanId", "aaaa"),
        SecondarySamplingState::new("lb"),
    ]
    .into();
    let context = TraceContext::new(1, 0xbbbb).with_extra(extra);

    assert_eq!(inject(&context)["sampling"], "b3;spanId=aaaa,lb");
}

#[test]
fn multiple_states() {
    let extra: Extra = vec![
        SecondarySamplingState::new("b3")
            .with_sampled(true)
            .with_parameter("ttl", "3"),
        SecondarySamplingState::new("lb")
            .with_parameter("spanId", "cccc")
            .with_parameter("region", "us"),
    ]
    .into();
    let context = TraceContext::new(1, 0xdddd).with_extra(extra);

    assert_eq!(
        inject(&context)["sampling"],
        "b3;ttl=3;spanId=000000000000dddd,lb;region=us;spanId=cccc"
    );
}

#[test]
fn deterministic() {
    let extra: Extra = vec![
        SecondarySamplingState::new("edge")
            .with_parameter("ttl", "1")
            .with_parameter("tier", "gold"),
        SecondarySamplingState::new("db").with_sampled(true),
    ]
    .into();
    let context = TraceContext::new_root().with_extra(extra);

    let first = inject(&context);
    for _ in 0..16 {
        assert_eq!(inject(&context), first);
    }
}

#[test]
fn extra_is_not_mutated() {
    let extra: Extra = vec![
        SecondarySamplingState::new("b3")
            .with_sampled(true)
            .with_parameter("spanId", "aaaa"),
    ]
    .into();
    let context = TraceContext::new(1, 0xbbbb).with_extra(extra.clone());

    inject(&context);
    assert_eq!(context.find_extra::<Extra>(), Some(&extra));
}

#[test]
fn delegate_runs_first() {
    let calls = RefCell::new(Vec::new());
    let setter = |_: &mut Headers, key: &str, _: String| calls.borrow_mut().push(key.to_owned());
    let injector = SecondarySampling::builder()
        .field_name("x-sampling")
        .build()
        .injector(B3SingleInjector::new(&setter), &setter);

    let extra: Extra = vec![SecondarySamplingState::new("b3")].into();
    injector.inject(
        &TraceContext::new(1, 2).with_extra(extra),
        &mut Headers::new(),
    );

    assert_eq!(*calls.borrow(), vec!["b3", "x-sampling"]);
}

#[test]
fn propagate_across_hops() {
    let sampling = SecondarySampling::default();
    let injector = sampling.injector(B3SingleInjector::new(MapSetter), MapSetter);
    let extractor = sampling.extractor(MapGetter);

    // First hop samples `b3` only.
    let extra: Extra = vec![
        SecondarySamplingState::new("b3").with_sampled(true),
        SecondarySamplingState::new("lb").with_parameter("region", "us"),
    ]
    .into();
    let first = TraceContext::new(7, 0xaaaa).with_extra(extra);
    let mut headers = Headers::new();
    injector.inject(&first, &mut headers);
    assert_eq!(headers["sampling"], "b3;spanId=000000000000aaaa,lb;region=us");

    // Second hop samples `lb`, and passes the `b3` span id through.
    let mut extra = extractor.extract(&headers).unwrap().unwrap();
    assert!(extra.set_sampled("lb", true));
    let second = TraceContext::new(7, 0xbbbb).with_extra(extra);
    let mut headers = Headers::new();
    injector.inject(&second, &mut headers);
    assert_eq!(
        headers["sampling"],
        "b3;spanId=000000000000aaaa,lb;region=us;spanId=000000000000bbbb"
    );

    // Third hop makes no decision.
    let extra = extractor.extract(&headers).unwrap().unwrap();
    let third = TraceContext::new(7, 0xcccc).with_extra(extra);
    let mut next = Headers::new();
    injector.inject(&third, &mut next);
    assert_eq!(next["sampling"], headers["sampling"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inject() {
    let injector = Arc::new(injector());

    let handles = (1..=32u64)
        .map(|span_id| {
            let injector = injector.clone();
            tokio::spawn(async move {
                let extra: Extra =
                    vec![SecondarySamplingState::new("b3").with_sampled(true)].into();
                let context = TraceContext::new(1, span_id).with_extra(extra);
                let mut headers = Headers::new();
                injector.inject(&context, &mut headers);
                (span_id, headers)
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let (span_id, headers) = handle.await.unwrap();
        assert_eq!(headers["sampling"], format!("b3;spanId={:016x}", span_id));
    }
}
