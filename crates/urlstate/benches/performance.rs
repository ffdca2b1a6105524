//! Performance benchmarks for urlstate codecs.
//!
//! Run with: cargo bench --package urlstate

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use urlstate::codec::{
    array_of, tuple_of, with_deflate_raw, with_json_patch, Base64JsonCodec, NumberCodec,
    Separator, StringCodec, ValueCodec,
};
use urlstate::{ParamsObject, StateCodec, StateDefinition};

// ============================================================================
// Helper functions to generate test data
// ============================================================================

/// Generate a layer collection with N entries
fn generate_layers(num_layers: usize) -> Value {
    let mut layers = serde_json::Map::new();
    for i in 0..num_layers {
        layers.insert(
            format!("EO:TEST-{i:04}"),
            json!({"id": format!("EO:TEST-{i:04}"), "zIndex": i, "visible": true, "valueMin": 0, "valueMax": 1}),
        );
    }
    Value::Object(layers)
}

/// Generate a nested map state with N layers
fn generate_state(num_layers: usize) -> Value {
    json!({
        "mapControls": {"center": [0.0, 0.0], "zoom": 5.0, "projection": "EPSG:3857"},
        "mapLayers": generate_layers(num_layers),
    })
}

/// Hide every other layer and move the map
fn tweak_state(state: &Value) -> Value {
    let mut tweaked = state.clone();
    tweaked["mapControls"]["center"] = json!([42.413010041680124, 2.1616753549186805]);
    tweaked["mapControls"]["projection"] = json!("EPSG:32661");
    if let Some(layers) = tweaked["mapLayers"].as_object_mut() {
        for (i, layer) in layers.values_mut().enumerate() {
            if i % 2 == 0 {
                layer["visible"] = json!(false);
            }
        }
    }
    tweaked
}

fn build_codec(default_state: &Value) -> StateCodec<Value> {
    let definition = StateDefinition::new(default_state).unwrap();
    let root = definition.root();
    let controls = root.nested("mapControls");
    definition
        .create_state_codec([
            controls
                .connect("center", "mc", tuple_of(NumberCodec, Separator::LowerX, 2))
                .unwrap(),
            controls.connect("zoom", "mz", NumberCodec).unwrap(),
            controls.connect("projection", "mp", StringCodec).unwrap(),
            root.connect::<Value, _>(
                "mapLayers",
                "mls",
                with_deflate_raw(with_json_patch(Base64JsonCodec::<Value>::new())),
            )
            .unwrap(),
        ])
        .unwrap()
}

// ============================================================================
// Benchmark: primitive codecs
// ============================================================================

fn bench_primitive_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_codecs");

    let text = "Calçotada 2024 · Γνῶθι σαυτόν".to_string();
    let encoded_text = StringCodec.encode(&text, None).unwrap().unwrap();
    group.bench_function("string_encode", |b| {
        b.iter(|| StringCodec.encode(black_box(&text), None))
    });
    group.bench_function("string_decode", |b| {
        b.iter(|| StringCodec.decode(black_box(Some(encoded_text.as_str())), None))
    });

    group.bench_function("number_encode", |b| {
        b.iter(|| NumberCodec.encode(black_box(&41.238648049825535), None))
    });
    group.bench_function("number_decode", |b| {
        b.iter(|| NumberCodec.decode(black_box(Some("41.238648049825535")), None))
    });

    group.finish();
}

// ============================================================================
// Benchmark: arrays with varying lengths
// ============================================================================

fn bench_array_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_of_numbers");
    let codec = array_of(NumberCodec, Separator::Tilde);

    for size in [2, 16, 128].iter() {
        let value: Vec<f64> = (0..*size).map(|i| i as f64 * 1.5).collect();
        let encoded = codec.encode(&value, None).unwrap().unwrap();
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &value, |b, value| {
            b.iter(|| codec.encode(black_box(value), None))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| codec.decode(black_box(Some(encoded.as_str())), None))
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: compressed JSON patch of a growing layer collection
// ============================================================================

fn bench_compressed_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("deflate_json_patch");
    let codec = with_deflate_raw(with_json_patch(Base64JsonCodec::<Value>::new()));

    for size in [10, 100, 500].iter() {
        let default = generate_layers(*size);
        let value = tweak_state(&json!({"mapControls": {}, "mapLayers": default.clone()}))
            ["mapLayers"]
            .clone();
        let encoded = codec.encode(&value, Some(&default)).unwrap().unwrap();

        group.bench_with_input(BenchmarkId::new("encode", size), &value, |b, value| {
            b.iter(|| codec.encode(black_box(value), Some(&default)))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| codec.decode(black_box(Some(encoded.as_str())), Some(&default)))
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: whole-state encode and decode
// ============================================================================

fn bench_state_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_codec");

    for size in [10, 100].iter() {
        let default_state = generate_state(*size);
        let state = tweak_state(&default_state);
        let codec = build_codec(&default_state);
        let params: ParamsObject = codec.encode_value(&state).unwrap();
        let query = codec.encode_to_query_string(&state).unwrap();

        group.bench_with_input(BenchmarkId::new("encode_value", size), &state, |b, state| {
            b.iter(|| codec.encode_value(black_box(state)))
        });
        group.bench_with_input(BenchmarkId::new("decode_value", size), &params, |b, params| {
            b.iter(|| codec.decode_value(black_box(params)))
        });
        group.bench_with_input(
            BenchmarkId::new("decode_from_query_string", size),
            &query,
            |b, query| b.iter(|| codec.decode_from_query_string(black_box(query))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_primitive_codecs,
    bench_array_codec,
    bench_compressed_patch,
    bench_state_codec,
);
criterion_main!(benches);
