//! Browser bindings for the datagrid core.
//!
//! [`GridWidget`] wraps a [`GridSession`] for JavaScript. The host renders
//! from `snapshot()`, forwards DOM events, and performs the async pieces
//! (clipboard access, file reads, downloads) itself.

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod session;

pub use session::{
    ChangeNotice, EventResult, ExportedFile, GridSession, HostClipboard, Snapshot, SessionOptions,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log!("datagrid WASM initialized");
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// An encoded file ready for download
#[wasm_bindgen]
pub struct ExportedBlob {
    file: ExportedFile,
}

#[wasm_bindgen]
impl ExportedBlob {
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file.file_name.clone()
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.file.mime_type.clone()
    }

    /// Copied out as a `Uint8Array`
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.file.bytes.clone()
    }
}

#[wasm_bindgen]
pub struct GridWidget {
    session: GridSession,
}

#[wasm_bindgen]
impl GridWidget {
    /// `data` is a JSON array of rows; `options` an optional
    /// `{rows, columns, pageSize, historyLimit, darkMode}` object.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &str, options: JsValue) -> Result<GridWidget, JsValue> {
        let options: SessionOptions = if options.is_undefined() || options.is_null() {
            SessionOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let session = GridSession::from_json(data, &options).map_err(js_err)?;
        #[cfg(debug_assertions)]
        console_log!(
            "Created grid {}x{}",
            session.grid().store().row_count(),
            session.grid().store().column_count()
        );
        Ok(Self { session })
    }

    // ===== Events =====

    /// Dispatch a serialized `InputEvent` (`{type: "keyDown", ...}`)
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event: &str) -> Result<JsValue, JsValue> {
        let result = self.session.handle_event_json(event).map_err(js_err)?;
        to_js(&result)
    }

    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool) -> Result<JsValue, JsValue> {
        to_js(&self.session.handle_key(key, ctrl, shift, alt))
    }

    #[wasm_bindgen(js_name = mouseDown)]
    pub fn mouse_down(&mut self, row: usize, col: usize, shift: bool) {
        self.session.mouse_down(row, col, shift);
    }

    #[wasm_bindgen(js_name = mouseEnter)]
    pub fn mouse_enter(&mut self, row: usize, col: usize) {
        self.session.mouse_enter(row, col);
    }

    /// Call from a document-level listener
    #[wasm_bindgen(js_name = mouseUp)]
    pub fn mouse_up(&mut self) {
        self.session.mouse_up();
    }

    pub fn click(&mut self, row: usize, col: usize, shift: bool) {
        self.session.click(row, col, shift);
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, row: usize, col: usize) -> bool {
        self.session.double_click(row, col)
    }

    #[wasm_bindgen(js_name = editInput)]
    pub fn edit_input(&mut self, text: &str) -> bool {
        self.session.edit_input(text)
    }

    #[wasm_bindgen(js_name = setOverlayOpen)]
    pub fn set_overlay_open(&mut self, open: bool) {
        self.session.set_overlay_open(open);
    }

    // ===== Clipboard =====

    pub fn copy(&mut self) -> String {
        self.session.copy()
    }

    pub fn cut(&mut self) -> String {
        self.session.cut()
    }

    /// `text` is what `navigator.clipboard.readText()` returned, or
    /// `undefined` when the read was denied.
    pub fn paste(&mut self, text: Option<String>) -> bool {
        self.session.paste(text)
    }

    // ===== Edits =====

    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action: &str) -> Result<bool, JsValue> {
        self.session.apply_action(action).map_err(js_err)
    }

    #[wasm_bindgen(js_name = updateCell)]
    pub fn update_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        self.session.update_cell(row, col, value)
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> bool {
        self.session.clear_all()
    }

    pub fn refresh(&mut self) -> bool {
        self.session.refresh()
    }

    // ===== View configuration =====

    #[wasm_bindgen(js_name = toggleSort)]
    pub fn toggle_sort(&mut self, col: usize) {
        self.session.toggle_sort(col);
    }

    #[wasm_bindgen(js_name = setSortType)]
    pub fn set_sort_type(&mut self, sort_type: &str) -> Result<(), JsValue> {
        self.session.set_sort_type(sort_type).map_err(js_err)
    }

    #[wasm_bindgen(js_name = clearSort)]
    pub fn clear_sort(&mut self) {
        self.session.clear_sort();
    }

    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&mut self, col: usize, match_type: &str, value: &str) -> Result<(), JsValue> {
        self.session.set_filter(col, match_type, value).map_err(js_err)
    }

    #[wasm_bindgen(js_name = removeFilter)]
    pub fn remove_filter(&mut self, col: usize) {
        self.session.remove_filter(col);
    }

    #[wasm_bindgen(js_name = clearFilters)]
    pub fn clear_filters(&mut self) {
        self.session.clear_filters();
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&mut self, page: usize) {
        self.session.set_page(page);
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) {
        self.session.next_page();
    }

    #[wasm_bindgen(js_name = previousPage)]
    pub fn previous_page(&mut self) {
        self.session.previous_page();
    }

    #[wasm_bindgen(js_name = uniqueValues)]
    pub fn unique_values(&self, col: usize) -> Vec<String> {
        self.session.unique_values(col)
    }

    // ===== Import / export =====

    #[wasm_bindgen(js_name = beginImport)]
    pub fn begin_import(&mut self) -> u32 {
        self.session.begin_import()
    }

    #[wasm_bindgen(js_name = finishImport)]
    pub fn finish_import(&mut self, id: u32, content: &str) -> Result<bool, JsValue> {
        self.session.finish_import(id, content).map_err(js_err)
    }

    #[wasm_bindgen(js_name = cancelImport)]
    pub fn cancel_import(&mut self, id: u32) {
        self.session.cancel_import(id);
    }

    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, content: &str) -> Result<bool, JsValue> {
        self.session.import_json(content).map_err(js_err)
    }

    /// `format` is json, csv or xls
    pub fn export(&self, format: &str, file_name: &str) -> Result<ExportedBlob, JsValue> {
        let file = self.session.export(format, file_name).map_err(js_err)?;
        Ok(ExportedBlob { file })
    }

    // ===== Theme =====

    #[wasm_bindgen(js_name = darkMode)]
    pub fn dark_mode(&self) -> bool {
        self.session.dark_mode()
    }

    /// Not persisted; store the returned value (e.g. in `localStorage`) and
    /// pass it back as `darkMode` on the next construction.
    #[wasm_bindgen(js_name = toggleDarkMode)]
    pub fn toggle_dark_mode(&mut self) -> Result<bool, JsValue> {
        self.session.toggle_dark_mode().map_err(js_err)
    }

    // ===== Rendering =====

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    /// Next pending change notification, or `null`
    #[wasm_bindgen(js_name = takeChange)]
    pub fn take_change(&mut self) -> Result<JsValue, JsValue> {
        match self.session.take_change() {
            Some(change) => to_js(&change),
            None => Ok(JsValue::NULL),
        }
    }
}
