//! A flat map state bound to four URL parameters.

use serde::{Deserialize, Serialize};
use urlstate::codec::{nullable, NumberCodec, StringCodec};
use urlstate::{ParamsObject, StateCodec, StateDefinition};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SimpleMapState {
    latitude: f64,
    longitude: f64,
    zoom: f64,
    name: Option<String>,
}

fn default_state() -> SimpleMapState {
    SimpleMapState {
        latitude: 0.0,
        longitude: 0.0,
        zoom: 3.0,
        name: None,
    }
}

fn state_codec() -> StateCodec<SimpleMapState> {
    let definition = StateDefinition::new(&default_state()).unwrap();
    let root = definition.root();

    let x = root.connect("longitude", "x", NumberCodec).unwrap();
    let y = root.connect("latitude", "y", NumberCodec).unwrap();
    let z = root.connect("zoom", "z", NumberCodec).unwrap();
    let n = root.connect("name", "n", nullable(StringCodec)).unwrap();

    definition.create_state_codec([x, y, z, n]).unwrap()
}

fn params(pairs: &[(&str, &str)]) -> ParamsObject {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_all_new_values_to_params_and_back() {
    let calcotada_map = SimpleMapState {
        latitude: 41.238648049825535,
        longitude: 1.8537583693256325,
        zoom: 15.0,
        name: Some("Calçotada 2024".to_string()),
    };
    let codec = state_codec();

    let encoded = codec.encode_to_params(&calcotada_map).unwrap();
    assert_eq!(
        encoded,
        params(&[
            ("x", "1.8537583693256325"),
            ("y", "41.238648049825535"),
            ("z", "15"),
            ("n", "Cal%C3%A7otada%202024"),
        ])
    );

    let decoded = codec.decode_from_params(&encoded).unwrap();
    assert_eq!(decoded, calcotada_map);
}

#[test]
fn test_minor_change_to_query_string_and_back() {
    let tweaked_state = SimpleMapState {
        zoom: 4.0,
        ..default_state()
    };
    let codec = state_codec();

    let query = codec.encode_to_query_string(&tweaked_state).unwrap();
    // Only the field that differs from the default is encoded.
    assert_eq!(query, "z=4");

    // Everything else is rehydrated from the defaults.
    let decoded = codec.decode_from_query_string(&query).unwrap();
    assert_eq!(decoded, tweaked_state);
}

#[test]
fn test_default_state_encodes_to_nothing() {
    let codec = state_codec();
    assert_eq!(codec.encode_to_query_string(&default_state()).unwrap(), "");
    assert_eq!(codec.decode_from_query_string("").unwrap(), default_state());
}

#[test]
fn test_search_params_view() {
    let codec = state_codec();
    let state = SimpleMapState {
        latitude: -12.5,
        name: Some("null island".to_string()),
        ..default_state()
    };

    let search_params = codec.encode_to_search_params(&state).unwrap();
    assert_eq!(search_params.get("y"), Some("-12.5"));
    assert_eq!(search_params.get("n"), Some("null%20island"));
    assert_eq!(search_params.len(), 2);
    assert_eq!(codec.decode_from_search_params(&search_params).unwrap(), state);
}

#[test]
fn test_explicit_null_parameter_overrides_a_name_default() {
    let definition = StateDefinition::new(&SimpleMapState {
        name: Some("home".to_string()),
        ..default_state()
    })
    .unwrap();
    let codec = definition
        .create_state_codec([definition
            .root()
            .connect("name", "n", nullable(StringCodec))
            .unwrap()])
        .unwrap();

    let mut params = codec.encode_value(&serde_json::json!({"name": null})).unwrap();
    assert_eq!(params.remove("n").as_deref(), Some("null"));
}

#[test]
fn test_invalid_number_is_reported_with_its_parameter() {
    let codec = state_codec();
    let err = codec.decode_from_query_string("z=zoomed&x=1").unwrap_err();
    assert_eq!(err.causes().len(), 1);
    let message = err.causes()[0].to_string();
    assert!(message.starts_with("URL parameter \"z\" ($.zoom)"), "{message}");
}
