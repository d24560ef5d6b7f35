use wasm_bindgen::prelude::*;

// Create a console module for logging
pub mod console;
pub mod error;
pub mod projection;
pub mod feature;
pub mod wkt_format;
pub mod map_information;
mod models;
mod bindings;

pub use bindings::JsMapInformation;
pub use error::{MapError, Result};
pub use feature::{Feature, FeatureCollection};
pub use map_information::MapInformation;
pub use models::TransformedCoordinate;
pub use projection::Projection;
pub use wkt_format::{read_geometry, ReadOptions, WktFormat};

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("Finder map module initialized");
    });
}

/// Reproject a single coordinate between two EPSG codes, returning `{x, y}`.
#[wasm_bindgen(js_name = transformCoordinate)]
pub fn transform_coordinate(x: f64, y: f64, from_epsg: u32, to_epsg: u32) -> std::result::Result<JsValue, JsValue> {
    let from = Projection::from_epsg(from_epsg).map_err(bindings::to_js_error)?;
    let to = Projection::from_epsg(to_epsg).map_err(bindings::to_js_error)?;
    let out = projection::transform_coordinate(geo_types::Coord { x, y }, from, to);
    bindings::to_js(&TransformedCoordinate::from(out))
}
