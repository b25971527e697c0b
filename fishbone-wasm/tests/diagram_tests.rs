#![cfg(target_arch = "wasm32")]

use fishbone_wasm::Diagram;
use js_sys::{Object, Reflect, Uint8Array};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}

fn is_ok(v: &JsValue) -> bool {
    get(v, "ok").as_bool() == Some(true)
}

fn is_err(v: &JsValue, code: &str) -> bool {
    !is_ok(v) && get(&get(v, "error"), "code").as_string().map_or(false, |c| c == code)
}

fn js(s: &str) -> JsValue {
    js_sys::JSON::parse(s).unwrap()
}

#[wasm_bindgen_test]
fn dispatch_wire_commands() {
    let mut d = Diagram::new();
    let r = d.dispatch(js(r#"{"type":"LOAD_TEMPLATE"}"#));
    assert!(is_ok(&r));
    assert_eq!(d.node_count(), 6);
    let rev = d.revision();

    let state = d.state();
    let cats = js_sys::Array::from(&get(&state, "categories"));
    let cat = get(&cats.get(0), "id").as_string().unwrap();

    let r = d.dispatch(js(&format!(r#"{{"type":"ADD_CAUSE","payload":{{"categoryId":"{}"}}}}"#, cat)));
    assert!(is_ok(&r));
    assert_eq!(get(&get(&r, "value"), "kind").as_string().as_deref(), Some("created"));
    assert_eq!(d.node_count(), 7);
    assert!(d.revision() > rev);

    // Unknown id is a successful no-op
    let rev = d.revision();
    let r = d.dispatch(js(r#"{"type":"DELETE_CATEGORY","payload":{"id":"ghost"}}"#));
    assert!(is_ok(&r));
    assert_eq!(d.revision(), rev);

    assert!(is_err(&d.dispatch(js(r#"{"type":"NOT_A_COMMAND"}"#)), "json_parse"));
}

#[wasm_bindgen_test]
fn strict_config_reports_not_found() {
    let mut d = Diagram::with_config(js(r#"{"strict":true}"#)).ok().unwrap();
    let r = d.dispatch(js(r#"{"type":"ADD_CAUSE","payload":{"categoryId":"ghost"}}"#));
    assert!(is_err(&r, "not_found"));
    assert_eq!(get(&get(&get(&r, "error"), "data"), "id").as_string().as_deref(), Some("ghost"));
    assert!(Diagram::with_config(js(r#"{"layout":{"canvasWidth":-1}}"#)).is_err());
}

#[wasm_bindgen_test]
fn rows_and_xlsx_roundtrip() {
    let mut d = Diagram::new();
    d.load_template();
    d.set_problem_statement("Why?");
    let out = d.export_xlsx();
    assert!(is_ok(&out));
    let bytes = Uint8Array::from(get(&get(&out, "value"), "bytes")).to_vec();

    let mut e = Diagram::new();
    assert!(is_ok(&e.import_xlsx(&bytes)));
    assert_eq!(e.node_count(), 6);
    let doc = e.to_json();
    assert_eq!(get(&doc, "problemStatement").as_string().as_deref(), Some("Why?"));

    let rev = e.revision();
    assert!(is_err(&e.import_xlsx(b"garbage"), "read_failed"));
    assert_eq!(e.revision(), rev);

    let rows = d.export_rows();
    let mut f = Diagram::new();
    assert!(is_ok(&f.import_rows(rows)));
    assert_eq!(f.node_count(), 6);
    assert!(is_err(&f.import_rows(JsValue::from_str("nope")), "json_parse"));
}

#[wasm_bindgen_test]
fn row_import_failures_use_the_file_import_envelope() {
    let mut d = Diagram::new();
    d.load_template();
    let rev = d.revision();
    let long = "x".repeat(40_000);
    let rows = js(&format!(r#"[{{"Category":"{}"}}]"#, long));
    let r = d.import_rows(rows);
    assert!(is_err(&r, "limit_exceeded"));
    assert_eq!(get(&get(&get(&r, "error"), "data"), "what").as_string().as_deref(), Some("cell text"));
    assert_eq!(d.revision(), rev);
    assert_eq!(d.node_count(), 6);
}

#[wasm_bindgen_test]
fn drag_and_hover_follow_the_store() {
    let mut d = Diagram::new();
    let cat = d.add_category();
    let path: JsValue = {
        let o = Object::new();
        let _ = Reflect::set(&o, &"kind".into(), &"category".into());
        let _ = Reflect::set(&o, &"category".into(), &cat.as_str().into());
        o.into()
    };
    assert!(d.move_node(path.clone(), 300.0, 200.0));

    let target = js(&format!(r#"{{"kind":"node","path":{{"kind":"category","category":"{}"}}}}"#, cat));
    assert!(d.drag_start(target, 310.0, 205.0));
    assert!(d.drag_move(410.0, 255.0));
    let pos = js_sys::Array::from(&d.node_position(path.clone()));
    assert_eq!(pos.get(0).as_f64(), Some(400.0));
    assert_eq!(pos.get(1).as_f64(), Some(250.0));

    assert!(d.hover_enter(path));
    assert_eq!(get(&d.hover_state(), "state").as_string().as_deref(), Some("hovering"));
    assert!(d.delete_category(&cat));
    assert!(!d.is_dragging());
    assert_eq!(get(&d.hover_state(), "state").as_string().as_deref(), Some("idle"));
    assert!(!d.drag_move(0.0, 0.0));
}

#[wasm_bindgen_test]
fn pick_res_validates_inputs() {
    let d = Diagram::new();
    assert!(is_err(&d.pick_res(f32::NAN, 0.0, 1.0), "non_finite"));
    assert!(is_err(&d.pick_res(0.0, 0.0, -1.0), "out_of_range"));
    let r = d.pick_res(0.0, 0.0, 1.0);
    assert!(is_ok(&r));
    assert!(get(&r, "value").is_null());
    assert!(d.to_svg_document().contains("<svg"));
}
