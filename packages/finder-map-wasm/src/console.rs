#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// This allows us to access console.log from JS
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    // Use `js_namespace` to bind `console.log(..)` instead of just `log(..)`
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

// Native builds (tests, tooling) have no JS console to talk to
#[cfg(not(target_arch = "wasm32"))]
pub fn log(s: &str) {
    eprintln!("{}", s);
}

// Note: The console_log macro is defined in lib.rs to avoid duplication
