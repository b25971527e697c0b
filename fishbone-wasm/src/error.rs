use crate::interop::{new_obj, set_kv};
use fishbone::{DiagramError, ImportError};
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// Envelope for an engine error, with structured data where the variant has it.
pub fn from_diagram(e: &DiagramError) -> JsValue {
    let data = match e {
        DiagramError::NotFound { kind, id } => {
            let d = new_obj();
            set_kv(&d, "kind", &JsValue::from_str(&kind.to_string()));
            set_kv(&d, "id", &JsValue::from_str(id.as_str()));
            Some(d.into())
        }
        DiagramError::Import(ImportError::LimitExceeded { what, got, max }) => {
            let d = new_obj();
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "got", &JsValue::from_f64(*got as f64));
            set_kv(&d, "max", &JsValue::from_f64(*max as f64));
            Some(d.into())
        }
        DiagramError::Import(ImportError::MissingColumn(col)) => {
            let d = new_obj();
            set_kv(&d, "column", &JsValue::from_str(col));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

/// Envelope for a rejected import, also reported on the browser console.
pub fn import_failed(e: &DiagramError) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&format!("fishbone import failed: {}", e)));
    from_diagram(e)
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min as f64));
    set_kv(&d, "max", &JsValue::from_f64(max as f64));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn bad_input(what: &str, e: impl std::fmt::Display) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(what));
    err("json_parse", format!("{}: {}", what, e), Some(d.into()))
}
