use std::collections::HashMap;

use qs_nested::{decode, from_str, Config, Map, Value};
use serde::Deserialize;
use serde_json::json;

use pretty_assertions::assert_eq;

fn value(json: serde_json::Value) -> Value {
    qs_nested::to_value(&json).expect("to_value")
}

fn decoded(input: &str) -> Value {
    Value::Mapping(decode(input))
}

#[test]
fn decode_flat() {
    assert_eq!(decoded("x=5&y=hello"), value(json!({ "x": 5, "y": "hello" })));
}

#[test]
fn decode_nested_sequence() {
    assert_eq!(
        decoded("a[b][0]=1&a[b][1]=2"),
        value(json!({ "a": { "b": [1, 2] } }))
    );
}

#[test]
fn decode_percent_encoded_brackets() {
    assert_eq!(
        decoded("a%5B0%5D=10&a%5B1%5D=20"),
        value(json!({ "a": [10, 20] }))
    );
}

#[test]
fn decode_empty_input() {
    assert_eq!(decode(""), Map::new());
    assert_eq!(decode("?"), Map::new());
    assert_eq!(decode("&&"), Map::new());
}

#[test]
fn decode_leading_question_mark() {
    assert_eq!(decoded("?a=x"), value(json!({ "a": "x" })));
}

#[test]
fn decode_plus_and_escapes() {
    assert_eq!(
        decoded("q=hello+world&e=%C3%A9t%C3%A9&bad=%zz"),
        value(json!({ "q": "hello world", "e": "été", "bad": "%zz" }))
    );
}

#[test]
fn decode_numeric_leaves() {
    assert_eq!(
        decoded("a=1.5&b=-2&c=1e3&d=0x10&e=%201%20&f=&g=007&h=1_000"),
        value(json!({
            "a": 1.5,
            "b": -2,
            "c": 1000,
            "d": 16,
            "e": 1,
            "f": 0,
            "g": 7,
            "h": "1_000",
        }))
    );
}

#[test]
fn decode_conflicts_last_writer_wins() {
    assert_eq!(decoded("a=1&a=2"), value(json!({ "a": 2 })));
    assert_eq!(decoded("a=1&a[b]=2"), value(json!({ "a": { "b": 2 } })));
    assert_eq!(decoded("a[b]=2&a=1"), value(json!({ "a": 1 })));
    assert_eq!(
        decoded("a[0]=x&a[k]=y"),
        value(json!({ "a": { "0": "x", "k": "y" } }))
    );
}

#[test]
fn decode_out_of_order_indices() {
    assert_eq!(decoded("a[1]=y&a[0]=x"), value(json!({ "a": ["x", "y"] })));
    assert_eq!(
        decoded("a[2]=z"),
        value(json!({ "a": [null, null, "z"] }))
    );
}

#[test]
fn decode_huge_index_is_a_mapping() {
    assert_eq!(
        decoded("a[4294967294]=x"),
        value(json!({ "a": { "4294967294": "x" } }))
    );
}

#[test]
fn decode_depth_limit() {
    let map = Config::new().max_depth(1).decode("a[b][c][d]=1");
    assert_eq!(
        Value::Mapping(map),
        value(json!({ "a": { "b": { "[c][d]": 1 } } }))
    );
}

#[test]
fn decode_minimal_and_form_agree() {
    let input = value(json!({
        "user": { "name": "A b", "tags": ["x&y", "z=1"] },
        "page": 2,
    }));
    let form = qs_nested::encode(&input, "");
    let minimal = Config::new().use_form_encoding(false).encode(&input, "");
    assert_eq!(decode(&form), decode(&minimal));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Address {
    city: String,
    postcode: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct QueryParams {
    id: u8,
    name: String,
    address: Address,
    phone: u32,
    user_ids: Vec<u8>,
}

#[test]
fn deserialize_struct() {
    let params = QueryParams {
        id: 42,
        name: "Acme".to_string(),
        phone: 12345,
        address: Address {
            city: "Carrot City".to_string(),
            postcode: "01234".to_string(),
        },
        user_ids: vec![1, 2, 3, 4],
    };

    let input = "\
        id=42&name=Acme&phone=12345&address[city]=Carrot+City&\
        address[postcode]=01234&user_ids[0]=1&user_ids[1]=2&\
        user_ids[2]=3&user_ids[3]=4";
    assert_eq!(from_str::<QueryParams>(input).unwrap(), params);

    let encoded = input.replace('[', "%5B").replace(']', "%5D");
    assert_eq!(from_str::<QueryParams>(&encoded).unwrap(), params);
}

#[test]
fn deserialize_option() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Query {
        vec: Option<Vec<u8>>,
        name: Option<String>,
    }

    assert_eq!(
        from_str::<Query>("").unwrap(),
        Query {
            vec: None,
            name: None
        }
    );
    assert_eq!(
        from_str::<Query>("vec[0]=1&vec[1]=2&name=x").unwrap(),
        Query {
            vec: Some(vec![1, 2]),
            name: Some("x".to_owned())
        }
    );
}

#[test]
fn deserialize_enum() {
    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum TestEnum {
        A,
        B(bool),
        C { x: u8, y: u8 },
        D(u8, u8),
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Query {
        e: TestEnum,
    }

    let cases = [
        ("e=a", TestEnum::A),
        ("e[b]=true", TestEnum::B(true)),
        ("e[c][x]=2&e[c][y]=3", TestEnum::C { x: 2, y: 3 }),
        ("e[d][0]=128&e[d][1]=1", TestEnum::D(128, 1)),
    ];
    for (input, e) in cases {
        assert_eq!(from_str::<Query>(input).unwrap(), Query { e });
    }
}

#[test]
fn deserialize_integer_keyed_map() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Query {
        m: HashMap<u32, String>,
    }

    let q: Query = from_str("m[3]=c&m[1]=a").unwrap();
    assert_eq!(
        q.m,
        HashMap::from([(1, "a".to_owned()), (3, "c".to_owned())])
    );
}

#[test]
fn deserialize_errors() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Query {
        n: u8,
    }

    assert!(from_str::<Query>("n=300").is_err());
    assert!(from_str::<Query>("n=abc").is_err());
    assert!(from_str::<Query>("m=1").is_err());
    assert!(from_str::<Query>("n[x]=1").is_err());
}

#[test]
fn deserialize_into_value() {
    let map: Map = from_str("a[0]=01&b=x").unwrap();
    assert_eq!(
        Value::Mapping(map),
        value(json!({ "a": ["01"], "b": "x" }))
    );
}

#[test]
fn deserialize_index_at_usize_limit() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Query {
        a: Vec<String>,
    }

    assert!(from_str::<Query>("a[18446744073709551615]=x").is_err());
    assert!(from_str::<Query>("a[0]=y&a[18446744073709551615]=x").is_err());
}
