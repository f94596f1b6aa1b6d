//! Shared helpers for the integration tests: a materialized `Value` tree,
//! a quickcheck generator for it, and a reconstructor that rebuilds the
//! tree from a walked event stream.
#![allow(dead_code)]

use std::collections::BTreeMap;

use jsonwalk::{walk, JsonError, JsonOut, TokenKind};
use quickcheck::{Arbitrary, Gen};

pub type Map = BTreeMap<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub fn render(&self) -> String {
        let mut out = Vec::new();
        self.write(&mut out);
        String::from_utf8(out).unwrap()
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Value::Null => {
                out.put(b"null");
            }
            Value::Boolean(b) => {
                out.put(if *b { &b"true"[..] } else { &b"false"[..] });
            }
            Value::Number(n) => {
                out.put(n.to_string().as_bytes());
            }
            Value::String(s) => {
                out.put(b"\"");
                jsonwalk::escape(out, s);
                out.put(b"\"");
            }
            Value::Array(items) => {
                out.put(b"[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.put(b",");
                    }
                    item.write(out);
                }
                out.put(b"]");
            }
            Value::Object(map) => {
                out.put(b"{");
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        out.put(b",");
                    }
                    out.put(b"\"");
                    jsonwalk::escape(out, key);
                    out.put(b"\"");
                    out.put(b":");
                    val.write(out);
                }
                out.put(b"}");
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Comp {
    Key(String),
    Idx(usize),
}

/// Splits a walker path (`.a[0].b`) into components. Test keys never
/// contain `.` or `[`, so the split is unambiguous.
pub fn parse_path(path: &str) -> Vec<Comp> {
    let b = path.as_bytes();
    let mut comps = Vec::new();
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'.' => {
                let start = i + 1;
                let mut end = start;
                while end < b.len() && !matches!(b[end], b'.' | b'[') {
                    end += 1;
                }
                comps.push(Comp::Key(path[start..end].to_string()));
                i = end;
            }
            b'[' => {
                let start = i + 1;
                let mut end = start;
                while end < b.len() && b[end] != b']' {
                    end += 1;
                }
                comps.push(Comp::Idx(path[start..end].parse().unwrap()));
                i = end + 1;
            }
            _ => panic!("malformed path {path:?}"),
        }
    }
    comps
}

fn insert_at_path(target: &mut Value, path: &[Comp], val: Value) {
    if path.is_empty() {
        *target = val;
        return;
    }
    let mut cur = target;
    for comp in &path[..path.len() - 1] {
        match comp {
            Comp::Key(k) => {
                if !matches!(cur, Value::Object(_)) {
                    *cur = Value::Object(Map::new());
                }
                let Value::Object(map) = cur else { unreachable!() };
                cur = map.entry(k.clone()).or_insert(Value::Null);
            }
            Comp::Idx(i) => {
                if !matches!(cur, Value::Array(_)) {
                    *cur = Value::Array(Vec::new());
                }
                let Value::Array(vec) = cur else { unreachable!() };
                if *i >= vec.len() {
                    vec.resize(*i + 1, Value::Null);
                }
                cur = &mut vec[*i];
            }
        }
    }
    match path.last().unwrap() {
        Comp::Key(k) => {
            if !matches!(cur, Value::Object(_)) {
                *cur = Value::Object(Map::new());
            }
            let Value::Object(map) = cur else { unreachable!() };
            map.insert(k.clone(), val);
        }
        Comp::Idx(i) => {
            if !matches!(cur, Value::Array(_)) {
                *cur = Value::Array(Vec::new());
            }
            let Value::Array(vec) = cur else { unreachable!() };
            if *i >= vec.len() {
                vec.resize(*i + 1, Value::Null);
            }
            vec[*i] = val;
        }
    }
}

/// Rebuilds the materialized tree from the event stream of one walk.
pub fn reconstruct(doc: &str) -> Result<Value, JsonError> {
    let mut root = Value::Null;
    walk(doc, |ev| {
        let val = match ev.token.kind {
            TokenKind::ObjectStart => Some(Value::Object(Map::new())),
            TokenKind::ArrayStart => Some(Value::Array(Vec::new())),
            TokenKind::Str => Some(Value::String(
                jsonwalk::unescape(ev.token.text.unwrap()).unwrap(),
            )),
            TokenKind::Num => Some(Value::Number(ev.token.text.unwrap().parse().unwrap())),
            TokenKind::True => Some(Value::Boolean(true)),
            TokenKind::False => Some(Value::Boolean(false)),
            TokenKind::Null => Some(Value::Null),
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => None,
        };
        if let Some(v) = val {
            insert_at_path(&mut root, &parse_path(ev.path), v);
        }
    })?;
    Ok(root)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JsonNumber(pub f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

/// Object keys stay inside a path-safe alphabet: keys containing `.` or
/// `[` are a documented limitation of the path vocabulary.
pub fn arbitrary_key(g: &mut Gen) -> String {
    const FIRST: &[u8] = b"abcdefgh";
    const REST: &[u8] = b"abcdefgh_0123";
    let len = 1 + usize::arbitrary(g) % 5;
    let mut key = String::new();
    key.push(*g.choose(FIRST).unwrap() as char);
    for _ in 1..len {
        key.push(*g.choose(REST).unwrap() as char);
    }
    key
}

fn arbitrary_string(g: &mut Gen) -> String {
    const CHARS: &[char] = &[
        'a', 'b', 'z', '7', ' ', '_', '"', '\\', '/', '\n', '\t', '\u{8}', '\u{1}', 'é', '≈',
        '😀',
    ];
    let len = usize::arbitrary(g) % 8;
    (0..len).map(|_| *g.choose(CHARS).unwrap()).collect()
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                match usize::arbitrary(g) % 4 {
                    0 => Value::Null,
                    1 => Value::Boolean(bool::arbitrary(g)),
                    2 => Value::Number(JsonNumber::arbitrary(g).0),
                    _ => Value::String(arbitrary_string(g)),
                }
            } else {
                match usize::arbitrary(g) % 6 {
                    0 => Value::Null,
                    1 => Value::Boolean(bool::arbitrary(g)),
                    2 => Value::Number(JsonNumber::arbitrary(g).0),
                    3 => Value::String(arbitrary_string(g)),
                    4 => {
                        let len = usize::arbitrary(g) % 3;
                        Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
                    }
                    _ => {
                        let len = usize::arbitrary(g) % 3;
                        let mut map = Map::new();
                        for _ in 0..len {
                            map.insert(arbitrary_key(g), gen_val(g, depth - 1));
                        }
                        Value::Object(map)
                    }
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        gen_val(g, depth)
    }
}
