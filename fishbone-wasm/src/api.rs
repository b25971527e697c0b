use crate::interop::{arr_u8, new_obj, set_kv, to_js};
use crate::{error, Diagram};
use fishbone::interaction::{DragSession, DragTarget};
use fishbone::{CategoryUpdate, Command, DiagramConfig, NodeId, NodePath, NodeUpdate, Row};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn from_js<T: DeserializeOwned>(v: JsValue) -> Result<T, serde_wasm_bindgen::Error> {
    serde_wasm_bindgen::from_value(v)
}

fn id(s: &str) -> NodeId { NodeId::from(s) }

#[wasm_bindgen]
impl Diagram {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Diagram {
        crate::Diagram::rs_new(DiagramConfig::default())
    }
    /// Build from a partial config object; missing fields take defaults.
    pub fn with_config(config: JsValue) -> Result<Diagram, JsValue> {
        let v: serde_json::Value = from_js(config).map_err(|e| error::bad_input("config", e))?;
        let cfg = DiagramConfig::from_json_value(v).map_err(|e| error::from_diagram(&e))?;
        Ok(crate::Diagram::rs_new(cfg))
    }
    pub fn revision(&self) -> u64 {
        self.rs_revision()
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn state(&self) -> JsValue {
        to_js(self.inner.state())
    }
    pub fn layout(&self) -> JsValue {
        to_js(self.inner.layout())
    }

    // Commands
    /// Apply a `{ type, payload }` command; resolves to the outcome.
    pub fn dispatch(&mut self, cmd: JsValue) -> JsValue {
        let cmd: Command = match from_js(cmd) {
            Ok(c) => c,
            Err(e) => return error::bad_input("command", e),
        };
        let res = self.inner.apply(cmd);
        self.sync_interaction();
        match res {
            Ok(outcome) => error::ok(to_js(&outcome)),
            Err(e) => error::from_diagram(&e),
        }
    }
    pub fn set_problem_statement(&mut self, text: &str) -> bool {
        self.inner.set_problem_statement(text)
    }
    pub fn clear(&mut self) {
        self.inner.clear();
        self.sync_interaction();
    }
    pub fn load_template(&mut self) {
        self.inner.load_template();
        self.sync_interaction();
    }
    pub fn add_category(&mut self) -> String {
        self.inner.add_category().to_string()
    }
    pub fn add_cause(&mut self, category: &str) -> Option<String> {
        self.inner.add_cause(&id(category)).map(|c| c.to_string())
    }
    pub fn add_subcause(&mut self, category: &str, cause: &str) -> Option<String> {
        self.inner.add_subcause(&id(category), &id(cause)).map(|s| s.to_string())
    }
    /// `updates` is a partial `{ name, x, y, spineX, comment }` object.
    pub fn update_category(&mut self, category: &str, updates: JsValue) -> bool {
        match from_js::<CategoryUpdate>(updates) {
            Ok(u) => self.inner.update_category(&id(category), u),
            Err(_) => false,
        }
    }
    pub fn update_cause(&mut self, category: &str, cause: &str, updates: JsValue) -> bool {
        match from_js::<NodeUpdate>(updates) {
            Ok(u) => self.inner.update_cause(&id(category), &id(cause), u),
            Err(_) => false,
        }
    }
    pub fn update_subcause(&mut self, category: &str, cause: &str, subcause: &str, updates: JsValue) -> bool {
        match from_js::<NodeUpdate>(updates) {
            Ok(u) => self.inner.update_subcause(&id(category), &id(cause), &id(subcause), u),
            Err(_) => false,
        }
    }
    pub fn delete_category(&mut self, category: &str) -> bool {
        let ok = self.inner.delete_category(&id(category));
        self.sync_interaction();
        ok
    }
    pub fn delete_cause(&mut self, category: &str, cause: &str) -> bool {
        let ok = self.inner.delete_cause(&id(category), &id(cause));
        self.sync_interaction();
        ok
    }
    pub fn delete_subcause(&mut self, category: &str, cause: &str, subcause: &str) -> bool {
        let ok = self.inner.delete_subcause(&id(category), &id(cause), &id(subcause));
        self.sync_interaction();
        ok
    }

    // Spatial
    /// `[x, y]` for a `{ kind, category, cause?, subcause? }` path, or null.
    pub fn node_position(&self, path: JsValue) -> JsValue {
        let Ok(path) = from_js::<NodePath>(path) else { return JsValue::NULL };
        match self.inner.node_position(&path) {
            Some((x, y)) => to_js(&[x, y]),
            None => JsValue::NULL,
        }
    }
    pub fn move_node(&mut self, path: JsValue, x: f32, y: f32) -> bool {
        match from_js::<NodePath>(path) {
            Ok(p) => self.inner.move_node(&p, x, y),
            Err(_) => false,
        }
    }
    pub fn spine_x(&self, category: &str) -> Option<f32> {
        self.inner.resolved_spine_x(&id(category))
    }
    pub fn set_spine_x(&mut self, category: &str, x: f32) -> bool {
        self.inner.set_spine_x(&id(category), x)
    }

    // Drag
    /// Start a drag on `{ kind: 'node', path }` or `{ kind: 'spine', category }`.
    pub fn drag_start(&mut self, target: JsValue, px: f32, py: f32) -> bool {
        let Ok(target) = from_js::<DragTarget>(target) else { return false };
        self.drag = DragSession::start(&self.inner, target, px, py);
        self.drag.is_some()
    }
    pub fn drag_move(&mut self, px: f32, py: f32) -> bool {
        match &self.drag {
            Some(session) => session.update(&mut self.inner, px, py),
            None => false,
        }
    }
    pub fn drag_end(&mut self) -> bool {
        self.drag.take().is_some()
    }
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // Hover toolbar
    pub fn hover_enter(&mut self, path: JsValue) -> bool {
        match from_js::<NodePath>(path) {
            Ok(p) if self.inner.state().contains_path(&p) => {
                self.hover.enter_node(p);
                true
            }
            _ => false,
        }
    }
    pub fn hover_leave(&mut self, now_ms: f64) {
        self.hover.leave_node(now_ms);
    }
    pub fn toolbar_enter(&mut self) {
        self.hover.enter_toolbar();
    }
    pub fn toolbar_leave(&mut self, now_ms: f64) {
        self.hover.leave_toolbar(now_ms);
    }
    pub fn hover_tick(&mut self, now_ms: f64) -> JsValue {
        to_js(self.hover.tick(now_ms))
    }
    pub fn hover_state(&self) -> JsValue {
        to_js(self.hover.state())
    }

    // Picking + JSON + SVG
    pub fn pick(&self, x: f32, y: f32, tol: f32) -> JsValue {
        match self.inner.pick(x, y, tol) {
            Some(p) => to_js(&p),
            None => JsValue::NULL,
        }
    }
    pub fn pick_res(&self, x: f32, y: f32, tol: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if !tol.is_finite() {
            return error::non_finite("tol");
        }
        if tol < 0.0 {
            return error::out_of_range("tol", 0.0, f32::INFINITY, tol);
        }
        error::ok(self.pick(x, y, tol))
    }
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        let ok = match from_js::<serde_json::Value>(v) {
            Ok(val) => self.inner.from_json_value(val).is_ok(),
            Err(_) => false,
        };
        self.sync_interaction();
        ok
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        let res = match from_js::<serde_json::Value>(v) {
            Ok(val) => self.inner.from_json_value(val),
            Err(e) => return error::bad_input("document", e),
        };
        self.sync_interaction();
        match res {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_diagram(&e),
        }
    }
    pub fn to_svg_paths(&self) -> JsValue {
        to_js(&self.inner.to_svg_paths())
    }
    pub fn to_svg_document(&self) -> String {
        self.inner.to_svg_document()
    }

    // Rows + workbook files
    pub fn export_rows(&self) -> JsValue {
        to_js(&self.inner.export_rows())
    }
    pub fn import_rows(&mut self, rows: JsValue) -> JsValue {
        let rows: Vec<Row> = match from_js(rows) {
            Ok(r) => r,
            Err(e) => return error::bad_input("rows", e),
        };
        let res = self.inner.import_rows(&rows);
        self.sync_interaction();
        match res {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.node_count() as f64)),
            Err(e) => error::import_failed(&e),
        }
    }
    /// `{ ok, value: { bytes, fileName } }` ready for a download link.
    pub fn export_xlsx(&self) -> JsValue {
        match self.inner.export_xlsx() {
            Ok(bytes) => {
                let o = new_obj();
                set_kv(&o, "bytes", &arr_u8(&bytes).into());
                set_kv(&o, "fileName", &JsValue::from_str("fishbone-diagram.xlsx"));
                error::ok(o.into())
            }
            Err(e) => error::from_diagram(&e),
        }
    }
    pub fn import_xlsx(&mut self, bytes: &[u8]) -> JsValue {
        let res = self.inner.import_xlsx_bytes(bytes.to_vec());
        self.sync_interaction();
        match res {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.node_count() as f64)),
            Err(e) => error::import_failed(&e),
        }
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}
