//! End-to-end behaviour of the public API: round trips, tamper detection,
//! rejection of unserializable values and concurrent use of one client.

use std::collections::HashMap;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use shroud::{generate_key, Client, ShroudError};

fn random_client() -> Client {
    Client::new(&generate_key().unwrap()).unwrap()
}

fn round_trip<T>(client: &Client, value: &T) -> T
where
    T: Serialize + serde::de::DeserializeOwned,
{
    client.shroud(value).unwrap().expose().unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ComplexUser {
    id: i64,
    username: String,
    email: String,
    settings: HashMap<String, Value>,
    metadata: Value,
    admin: bool,
    score: f64,
    tags: Vec<String>,
    counts: HashMap<String, i32>,
    null_field: Option<String>,
    missing: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Empty {}

/// Stands in for a handle with no data representation (a channel, a
/// callback): it exists in memory but refuses to serialize.
struct Handle;

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("handles have no serialized form"))
    }
}

/// Complex numbers have no JSON counterpart; this one says so.
struct Complex {
    _re: f64,
    _im: f64,
}

impl Serialize for Complex {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("complex numbers are not supported"))
    }
}

fn nested(depth: usize) -> Value {
    (0..depth).fold(json!("value"), |inner, _| json!({ "nested": inner }))
}

/// Finite floats drawn from a fixed xorshift64 stream of bit patterns.
fn finite_floats(count: usize) -> Vec<f64> {
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    std::iter::repeat_with(move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        f64::from_bits(state)
    })
    .filter(|f| f.is_finite())
    .take(count)
    .collect()
}

#[test]
fn primitives_round_trip_typed() {
    let client = random_client();
    assert_eq!(round_trip(&client, &"hello world".to_string()), "hello world");
    assert_eq!(round_trip(&client, &String::new()), "");
    assert_eq!(round_trip(&client, &42i64), 42);
    assert_eq!(round_trip(&client, &-42i64), -42);
    assert_eq!(round_trip(&client, &0u8), 0);
    assert_eq!(round_trip(&client, &12.375f64), 12.375);
    assert_eq!(round_trip(&client, &-12.375f64), -12.375);
    assert!(round_trip(&client, &true));
    assert!(!round_trip(&client, &false));
    assert_eq!(round_trip(&client, &Option::<String>::None), None);
    round_trip(&client, &());
}

#[test]
fn primitives_round_trip_untyped() {
    let client = random_client();
    for v in [
        json!("hello world"),
        json!(""),
        json!(42),
        json!(-42),
        json!(0),
        json!(12.375),
        json!(true),
        json!(false),
        Value::Null,
    ] {
        assert_eq!(round_trip(&client, &v), v);
    }
}

#[test]
fn complex_struct_round_trip() {
    let client = random_client();
    let user = ComplexUser {
        id: 12345,
        username: "test_user".into(),
        email: "test@example.com".into(),
        settings: HashMap::from([
            ("theme".to_string(), json!("dark")),
            ("timezone".to_string(), json!("UTC")),
            ("nested".to_string(), json!({"key": "value"})),
        ]),
        metadata: json!({"custom": "data"}),
        admin: true,
        score: 99.99,
        tags: vec!["tag1".into(), "tag2".into(), "tag3".into()],
        counts: HashMap::from([("visits".to_string(), 100), ("posts".to_string(), 50)]),
        null_field: Some("null-value".into()),
        missing: None,
    };
    assert_eq!(round_trip(&client, &user), user);
}

#[test]
fn collections_round_trip() {
    let client = random_client();
    let strings: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    assert_eq!(round_trip(&client, &strings), strings);
    assert_eq!(round_trip(&client, &vec![1, 2, 3]), vec![1, 2, 3]);
    assert_eq!(round_trip(&client, &Vec::<String>::new()), Vec::<String>::new());

    let string_map = HashMap::from([
        ("a".to_string(), "1".to_string()),
        ("b".to_string(), "2".to_string()),
    ]);
    assert_eq!(round_trip(&client, &string_map), string_map);
    let empty_map: HashMap<String, String> = HashMap::new();
    assert_eq!(round_trip(&client, &empty_map), empty_map);

    for v in [
        json!([1, "two", true, 4.0]),
        json!({"a": 1, "b": "two", "c": [1, 2, 3], "d": {"x": "y"}}),
        json!([]),
        json!({}),
    ] {
        assert_eq!(round_trip(&client, &v), v);
    }
}

#[test]
fn edge_values_round_trip() {
    let client = random_client();

    let large = vec![0u8; 1 << 20];
    assert_eq!(round_trip(&client, &large), large);

    let unicode = "Hello, 世界! 👋 🌍".to_string();
    assert_eq!(round_trip(&client, &unicode), unicode);

    assert_eq!(round_trip(&client, &Empty {}), Empty {});
}

#[test]
fn deep_nesting_round_trips() {
    let client = random_client();
    for depth in [100, 120] {
        let v = nested(depth);
        assert_eq!(round_trip(&client, &v), v);
    }
}

#[test]
fn nesting_limit_is_the_same_both_ways() {
    let client = random_client();
    let arrays = |levels: usize| (0..levels).fold(json!("x"), |inner, _| json!([inner]));

    let deepest = arrays(127);
    assert_eq!(round_trip(&client, &deepest), deepest);

    for levels in [128, 200] {
        assert!(matches!(
            client.shroud(&arrays(levels)),
            Err(ShroudError::Serialization(_))
        ));
    }
}

#[test]
fn random_floats_round_trip_bit_exact() {
    let client = random_client();
    for f in finite_floats(4_000) {
        let secret = client.shroud(&f).unwrap();

        let typed: f64 = secret.expose().unwrap();
        assert_eq!(typed.to_bits(), f.to_bits(), "{f:e} came back as {typed:e}");

        let untyped = secret.expose::<Value>().unwrap().as_f64().unwrap();
        assert_eq!(untyped.to_bits(), f.to_bits(), "{f:e} came back as {untyped:e}");
    }
}

#[test]
fn floats_inside_structures_round_trip_bit_exact() {
    let client = random_client();
    let floats = finite_floats(500);
    let back: Vec<f64> = round_trip(&client, &floats);
    assert!(floats
        .iter()
        .zip(&back)
        .all(|(a, b)| a.to_bits() == b.to_bits()));
}

#[test]
fn non_finite_floats_produce_no_secret() {
    let client = random_client();
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(client.shroud(&f), Err(ShroudError::Serialization(_))));
        assert!(matches!(
            client.shroud(&HashMap::from([("readings", vec![1.5, f])])),
            Err(ShroudError::Serialization(_))
        ));
    }
    assert!(matches!(
        client.shroud(&f32::INFINITY),
        Err(ShroudError::Serialization(_))
    ));
}

#[test]
fn integer_boundaries_round_trip() {
    let client = random_client();

    assert_eq!(round_trip(&client, &u64::MAX), u64::MAX);
    assert_eq!(round_trip(&client, &i64::MIN), i64::MIN);
    assert_eq!(round_trip(&client, &i64::MAX), i64::MAX);
    assert_eq!(round_trip(&client, &u64::MIN), u64::MIN);

    for v in [json!(u64::MAX), json!(i64::MIN), json!(i64::MAX)] {
        assert_eq!(round_trip(&client, &v), v);
    }
    assert_eq!(
        client.shroud(&u64::MAX).unwrap().expose::<Value>().unwrap().as_u64(),
        Some(u64::MAX)
    );
    assert_eq!(
        client.shroud(&i64::MIN).unwrap().expose::<Value>().unwrap().as_i64(),
        Some(i64::MIN)
    );
}

#[test]
fn unserializable_values_rejected() {
    let client = random_client();
    assert!(matches!(client.shroud(&Handle), Err(ShroudError::Serialization(_))));
    assert!(matches!(
        client.shroud(&Complex { _re: 1.0, _im: 2.0 }),
        Err(ShroudError::Serialization(_))
    ));

    let tuple_keys = HashMap::from([((1u8, 2u8), "pair")]);
    assert!(matches!(client.shroud(&tuple_keys), Err(ShroudError::Serialization(_))));
}

#[test]
fn numeric_shape_is_decided_by_destination() {
    let client = random_client();

    let int_secret = client.shroud(&42u64).unwrap();
    assert_eq!(int_secret.expose::<f64>().unwrap(), 42.0);
    assert_eq!(int_secret.expose::<Value>().unwrap(), json!(42));

    let float_secret = client.shroud(&3.0f64).unwrap();
    assert!(matches!(
        float_secret.expose::<u64>(),
        Err(ShroudError::Deserialization { .. })
    ));
}

#[test]
fn zero_key_deterministic_example() {
    let client = Client::new(&[0u8; 32]).unwrap();
    let hello = client.shroud("hello").unwrap();
    assert_eq!(hello.expose::<String>().unwrap(), "hello");

    let answer = client.shroud(&42).unwrap();
    assert!(matches!(
        answer.expose::<String>(),
        Err(ShroudError::Deserialization { .. })
    ));
}

#[test]
fn same_value_gives_distinct_tokens() {
    let client = random_client();
    let a = client.shroud("repeat").unwrap();
    let b = client.shroud("repeat").unwrap();
    assert_ne!(a.encrypted_value(), b.encrypted_value());
    assert_eq!(a.expose::<String>().unwrap(), "repeat");
    assert_eq!(b.expose::<String>().unwrap(), "repeat");
}

#[test]
fn every_single_bit_flip_is_detected() {
    let client = random_client();
    let token = client.shroud(&json!({"card": "4111"})).unwrap().into_encrypted_value();
    let raw = STANDARD.decode(&token).unwrap();

    for byte in 0..raw.len() {
        for bit in 0..8 {
            let mut tampered = raw.clone();
            tampered[byte] ^= 1 << bit;
            let secret = client.create_from_encrypted(&STANDARD.encode(&tampered)).unwrap();
            assert!(
                matches!(secret.expose::<Value>(), Err(ShroudError::InvalidSecret)),
                "flip of byte {byte} bit {bit} was not detected"
            );
        }
    }
}

#[test]
fn truncated_tokens_are_invalid() {
    let client = random_client();
    let raw = STANDARD
        .decode(client.shroud("short").unwrap().encrypted_value())
        .unwrap();
    for len in [0, 1, 11, 12, 27, raw.len() - 1] {
        let token = STANDARD.encode(&raw[..len]);
        let result = if token.is_empty() {
            client.create_from_encrypted(&token).map(|_| ())
        } else {
            client.open_token::<Value>(&token).map(|_| ())
        };
        assert!(result.is_err(), "truncation to {len} bytes was accepted");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_cycles_keep_their_own_values() {
    let client = Arc::new(random_client());
    let mut tasks = tokio::task::JoinSet::new();

    for i in 0..64u64 {
        let client = Arc::clone(&client);
        tasks.spawn_blocking(move || {
            let value = json!({ "id": i, "label": format!("value-{i}") });
            let back: Value = client.shroud(&value)?.expose()?;
            Ok::<_, ShroudError>((value, back))
        });
    }

    let mut completed = 0;
    while let Some(joined) = tasks.join_next().await {
        let (sent, received) = joined.unwrap().unwrap();
        assert_eq!(sent, received);
        completed += 1;
    }
    assert_eq!(completed, 64);
}
