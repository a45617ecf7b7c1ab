use qs_nested::{encode, to_string, to_value, Config, Value};
use serde::Serialize;
use serde_json::json;

use pretty_assertions::assert_eq;

fn value(json: serde_json::Value) -> Value {
    to_value(&json).expect("to_value")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Address {
    city: String,
    postcode: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct QueryParams {
    id: u8,
    name: String,
    phone: u32,
    address: Address,
    user_ids: Vec<u8>,
}

#[test]
fn encode_nested_array() {
    assert_eq!(
        encode(&value(json!({ "a": [10, 20] })), ""),
        "a%5B0%5D=10&a%5B1%5D=20"
    );
}

#[test]
fn encode_with_prefix() {
    assert_eq!(encode(&value(json!({ "a": 1 })), "p"), "p%5Ba%5D=1");
}

#[test]
fn encode_drops_empty_containers() {
    assert_eq!(encode(&value(json!({ "a": { "b": [] } })), ""), "");
    assert_eq!(
        encode(&value(json!({ "a": {}, "b": [], "c": 1 })), ""),
        "c=1"
    );
}

#[test]
fn encode_is_deterministic() {
    let v = value(json!({
        "z": 1,
        "a": { "y": [1, 2, { "k": "v" }], "b": "x" },
        "m": "text",
    }));
    let first = encode(&v, "");
    assert_eq!(first, encode(&v, ""));
    insta::assert_snapshot!(
        Config::new().use_form_encoding(false).encode(&v, ""),
        @"z=1&a[y][0]=1&a[y][1]=2&a[y][2][k]=v&a[b]=x&m=text"
    );
}

#[test]
fn encode_scalars() {
    // `to_value` leaves out null fields, so build this one by hand
    let v: Value = [
        ("n", Value::Null),
        ("t", true.into()),
        ("f", false.into()),
        ("x", 1.5.into()),
        ("neg", (-3).into()),
        ("s", "a b&c=d".into()),
    ]
    .into_iter()
    .collect();
    insta::assert_snapshot!(
        encode(&v, ""),
        @"n=null&t=true&f=false&x=1.5&neg=-3&s=a+b%26c%3Dd"
    );
}

#[test]
fn encode_unicode() {
    let v = value(json!({ "clé": "été" }));
    assert_eq!(encode(&v, ""), "cl%C3%A9=%C3%A9t%C3%A9");
}

#[test]
fn encode_top_level_scalar_is_empty() {
    assert_eq!(encode(&Value::from("abc"), ""), "");
    assert_eq!(encode(&Value::Null, ""), "");
}

#[test]
fn serialize_struct() {
    let params = QueryParams {
        id: 42,
        name: "Acme".to_string(),
        phone: 12345,
        address: Address {
            city: "Carrot City".to_string(),
            postcode: "12345".to_string(),
        },
        user_ids: vec![1, 2, 3, 4],
    };

    let config = Config::new().use_form_encoding(false);
    assert_eq!(
        config.serialize_string(&params).unwrap(),
        "\
        id=42&name=Acme&phone=12345&address[city]=Carrot+City&\
        address[postcode]=12345&user_ids[0]=1&user_ids[1]=2&\
        user_ids[2]=3&user_ids[3]=4"
    );
}

#[test]
fn serialize_option() {
    #[derive(Debug, Serialize, PartialEq)]
    struct Query {
        vec: Option<Vec<u8>>,
    }

    let query = Query { vec: None };
    assert_eq!(to_string(&query).unwrap(), "");

    let query = Query {
        vec: Some(vec![1, 2]),
    };
    assert_eq!(to_string(&query).unwrap(), "vec%5B0%5D=1&vec%5B1%5D=2");
}

#[test]
fn serialize_enum() {
    #[derive(Debug, Serialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum TestEnum {
        A,
        B(bool),
        C { x: u8, y: u8 },
        D(u8, u8),
    }

    #[derive(Debug, Serialize, PartialEq)]
    struct Query {
        e: TestEnum,
    }

    let config = Config::new().use_form_encoding(false);
    let cases = [
        (TestEnum::A, "e=a"),
        (TestEnum::B(true), "e[b]=true"),
        (TestEnum::C { x: 2, y: 3 }, "e[c][x]=2&e[c][y]=3"),
        (TestEnum::D(128, 1), "e[d][0]=128&e[d][1]=1"),
    ];
    for (e, expected) in cases {
        assert_eq!(config.serialize_string(&Query { e }).unwrap(), expected);
    }
}

#[test]
fn serialize_flatten() {
    #[derive(Serialize, Debug, PartialEq)]
    struct Query {
        a: u8,
        #[serde(flatten)]
        common: CommonParams,
    }

    #[derive(Serialize, Debug, PartialEq)]
    struct CommonParams {
        limit: u64,
        offset: u64,
    }

    let query = Query {
        a: 1,
        common: CommonParams {
            limit: 100,
            offset: 50,
        },
    };
    assert_eq!(to_string(&query).unwrap(), "a=1&limit=100&offset=50");
}

#[test]
fn serialize_top_level_sequence() {
    assert_eq!(to_string(&["x", "y"]).unwrap(), "0=x&1=y");
}

#[test]
fn serialize_integers_beyond_f64_precision() {
    #[derive(Serialize)]
    struct Query {
        n: u64,
        m: u64,
        i: i64,
    }

    let query = Query {
        n: 9007199254740993,
        m: u64::MAX,
        i: i64::MIN,
    };
    assert_eq!(
        to_string(&query).unwrap(),
        "n=9007199254740993&m=18446744073709551615&i=-9223372036854775808"
    );
}
