//! End-to-end scenarios exercising the four operations together.

use jsonwalk::{
    args, next_elem, next_key, printf, scanf, scanf_array_elem, setf, walk, FixedBuf, FmtArg,
    ScanArg, TokenKind,
};

fn set(doc: &str, path: &str, value: Option<(&str, &[FmtArg<'_>])>) -> (String, bool) {
    let mut out = Vec::new();
    let changed = setf(doc, &mut out, path, value).unwrap();
    (String::from_utf8(out).unwrap(), changed)
}

#[test]
fn setf_inserts_into_empty_object() {
    let (doc, changed) = set("{}", ".bar", Some(("%d", &args![456])));
    assert_eq!(doc, r#"{"bar":456}"#);
    // no pre-existing span, even though the document changed
    assert!(!changed);
}

#[test]
fn setf_synthesizes_an_array() {
    let (doc, _) = set(r#"{"a":1}"#, ".b[0]", Some(("%d", &args![2])));
    assert_eq!(doc, r#"{"a":1,"b":[2]}"#);
}

#[test]
fn setf_deletes_a_nested_member() {
    let (doc, changed) = set(r#"{"a":{"b":1}}"#, ".a.b", None);
    assert_eq!(doc, r#"{"a":{}}"#);
    assert!(changed);
}

#[test]
fn setf_deletes_the_first_member() {
    let (doc, changed) = set(r#"{"a":1,"b":2}"#, ".a", None);
    assert_eq!(doc, r#"{"b":2}"#);
    assert!(changed);
}

#[test]
fn scanf_reads_lenient_keys() {
    let (mut i, mut s) = (0i64, None);
    let n = scanf(
        "{a:1,b:\"hi\"}",
        "{a:%d, b:%Q}",
        &mut [ScanArg::I64(&mut i), ScanArg::Str(&mut s)],
    );
    assert_eq!((n, i, s.as_deref()), (2, 1, Some("hi")));
}

#[test]
fn printf_renders_barewords() {
    let mut out = Vec::new();
    printf(&mut out, "{a:%d, b:%Q}", &args![1, "hi"]);
    assert_eq!(String::from_utf8(out).unwrap(), r#"{"a":1, "b":"hi"}"#);
}

#[test]
fn walk_emits_the_documented_array_sequence() {
    let mut seen = Vec::new();
    walk("[1,[2,3],4]", |ev| {
        seen.push((ev.token.kind, ev.path.to_string()));
    })
    .unwrap();
    assert_eq!(
        seen,
        vec![
            (TokenKind::ArrayStart, String::new()),
            (TokenKind::Num, "[0]".to_string()),
            (TokenKind::ArrayStart, "[1]".to_string()),
            (TokenKind::Num, "[1][0]".to_string()),
            (TokenKind::Num, "[1][1]".to_string()),
            (TokenKind::ArrayEnd, "[1]".to_string()),
            (TokenKind::Num, "[2]".to_string()),
            (TokenKind::ArrayEnd, String::new()),
        ]
    );
}

#[test]
fn printf_setf_scanf_round_trip() {
    let mut doc = Vec::new();
    printf(
        &mut doc,
        "{user: {name: %Q, visits: %d}, active: %B}",
        &args!["ada", 3, true],
    );
    let doc = String::from_utf8(doc).unwrap();

    let (patched, _) = set(&doc, ".user.visits", Some(("%d", &args![4])));
    let (patched, _) = set(&patched, ".user.tags[0]", Some(("%Q", &args!["new"])));

    let (mut name, mut visits, mut active, mut tag) = (None, 0i64, false, None);
    let n = scanf(
        &patched,
        "{user: {name: %Q, visits: %d}, active: %B}",
        &mut [
            ScanArg::Str(&mut name),
            ScanArg::I64(&mut visits),
            ScanArg::Bool(&mut active),
        ],
    ) + scanf(
        &patched,
        "{user: {tags: %T}}",
        &mut [ScanArg::Tok(&mut tag)],
    );
    assert_eq!(n, 4);
    assert_eq!((name.as_deref(), visits, active), (Some("ada"), 4, true));
    assert_eq!(tag.unwrap().text, Some(r#"["new"]"#));
}

#[test]
fn scanf_array_elem_walks_by_index() {
    let doc = r#"{"tags":["a","b","c"]}"#;
    assert_eq!(scanf_array_elem(doc, ".tags", 1).unwrap().text, Some("b"));
    assert!(scanf_array_elem(doc, ".tags", 9).is_none());
}

#[test]
fn next_iterates_what_setf_built() {
    let (doc, _) = set("{}", ".list[0]", Some(("%d", &args![1])));
    let (doc, _) = set(&doc, ".list[9]", Some(("%d", &args![2])));
    let (doc, _) = set(&doc, ".flag", Some(("%B", &args![true])));

    let mut keys = Vec::new();
    let mut handle = None;
    while let Some(entry) = next_key(&doc, handle, "") {
        keys.push(entry.key.unwrap().to_string());
        handle = Some(entry.handle);
    }
    assert_eq!(keys, vec!["list", "flag"]);

    let mut elems = Vec::new();
    let mut handle = None;
    while let Some(entry) = next_elem(&doc, handle, ".list") {
        elems.push((entry.idx.unwrap(), entry.token.text.unwrap().to_string()));
        handle = Some(entry.handle);
    }
    assert_eq!(elems, vec![(0, "1".to_string()), (1, "2".to_string())]);
}

#[test]
fn fprintf_writes_file_with_trailing_newline() {
    let path = std::env::temp_dir().join(format!("jsonwalk-fprintf-{}.json", std::process::id()));
    let n = jsonwalk::fprintf(&path, "{n: %d}", &args![5]).unwrap();
    assert_eq!(n, r#"{"n": 5}"#.len());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"n\": 5}\n");
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn bounded_sink_probes_then_fits() {
    let fmt = "{k: %Q}";
    let fmt_args = args!["0123456789"];

    let mut tiny = [0u8; 4];
    let mut probe = FixedBuf::new(&mut tiny);
    let need = printf(&mut probe, fmt, &fmt_args);
    assert_eq!(need, r#"{"k": "0123456789"}"#.len());

    let mut sized = vec![0u8; need + 1];
    let mut out = FixedBuf::new(&mut sized);
    assert_eq!(printf(&mut out, fmt, &fmt_args), need);
    assert_eq!(out.as_str(), r#"{"k": "0123456789"}"#);
}

#[test]
fn setf_then_walk_visits_the_new_path() {
    for (doc, path) in [
        ("{}", ".a"),
        (r#"{"x":1}"#, ".deep.er[0].leaf"),
        (r#"{"x":{"y":[]}}"#, ".x.y[0]"),
        ("[]", "[0]"),
        (r#"[1,2]"#, "[5]"),
    ] {
        let (out, _) = set(doc, path, Some(("%d", &args![42])));
        let mut hit = false;
        walk(&out, |ev| {
            if ev.token.text == Some("42") {
                hit = ev.path == path || path.ends_with(']');
            }
        })
        .unwrap_or_else(|e| panic!("{out:?} failed to parse: {e}"));
        assert!(hit, "{doc} + {path} -> {out}");
    }
}

#[test]
fn deletion_removes_exactly_one_scalar() {
    let doc = r#"{"a":1,"b":{"c":2,"d":3},"e":[4,5]}"#;
    let count = |d: &str| {
        let mut n = 0;
        walk(d, |ev| {
            if ev.token.kind.is_scalar() {
                n += 1;
            }
        })
        .unwrap();
        n
    };
    let total = count(doc);
    for path in [".a", ".b.c", ".b.d", ".e[0]", ".e[1]"] {
        let (out, changed) = set(doc, path, None);
        assert!(changed, "{path}");
        assert_eq!(count(&out), total - 1, "{path} -> {out}");
        if !path.ends_with(']') || path == ".e[1]" {
            // deleting a non-last array element shifts later indices, so
            // the path test only applies to members and the last element
            let mut visited = false;
            walk(&out, |ev| visited |= ev.path == path).unwrap();
            assert!(!visited, "{path} still present in {out}");
        }
    }
}
