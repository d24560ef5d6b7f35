use js_sys::Array;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::console_log;
use crate::error::MapError;
use crate::feature::{Feature, FeatureCollection};
use crate::map_information::MapInformation;
use crate::wkt_format::ReadOptions;

pub(crate) fn to_js_error(err: MapError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

pub(crate) fn to_js(value: &impl Serialize) -> Result<JsValue, JsValue> {
    // Plain objects instead of ES Maps so the renderer can read them as GeoJSON
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| to_js_error(MapError::Serialize(e.to_string())))
}

/// Options object as written by the page; identifiers are checked afterwards.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct JsReadOptions {
    data_projection: Option<String>,
    feature_projection: Option<String>,
}

fn read_options(options: JsValue) -> Result<ReadOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ReadOptions::default());
    }
    let raw: JsReadOptions = serde_wasm_bindgen::from_value(options)
        .map_err(|e| to_js_error(MapError::InvalidInput(format!("read options: {}", e))))?;
    ReadOptions::from_codes(raw.data_projection.as_deref(), raw.feature_projection.as_deref())
        .map_err(to_js_error)
}

/// Map center and WKT geometries as handed over by the page.
#[wasm_bindgen(js_name = FinderMapInformation)]
pub struct JsMapInformation {
    inner: MapInformation<JsValue>,
}

#[wasm_bindgen(js_class = FinderMapInformation)]
impl JsMapInformation {
    #[wasm_bindgen(constructor)]
    pub fn new(center: JsValue, geometries: &Array) -> Result<JsMapInformation, JsValue> {
        let mut wkts = Vec::with_capacity(geometries.length() as usize);
        for (i, item) in geometries.iter().enumerate() {
            let wkt = item.as_string().ok_or_else(|| {
                to_js_error(MapError::InvalidInput(format!(
                    "geometry at index {} is not a string",
                    i
                )))
            })?;
            wkts.push(wkt);
        }
        Ok(JsMapInformation {
            inner: MapInformation::new(center, wkts),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn center(&self) -> JsValue {
        self.inner.center().clone()
    }

    #[wasm_bindgen(getter)]
    pub fn geometries(&self) -> Array {
        self.inner
            .geometries()
            .iter()
            .map(|wkt| JsValue::from_str(wkt))
            .collect()
    }

    /// Returns an array of GeoJSON features in the feature projection.
    #[wasm_bindgen(js_name = transformGeometriesToFeatures)]
    pub fn transform_geometries_to_features(&self, options: JsValue) -> Result<JsValue, JsValue> {
        let features = self.read(options)?;
        let encoded = features
            .iter()
            .map(Feature::to_geojson)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(to_js_error)?;
        to_js(&encoded)
    }

    #[wasm_bindgen(js_name = transformGeometriesToFeatureCollection)]
    pub fn transform_geometries_to_feature_collection(&self, options: JsValue) -> Result<JsValue, JsValue> {
        let collection = FeatureCollection::new(self.read(options)?);
        let encoded = collection.to_geojson().map_err(to_js_error)?;
        to_js(&encoded)
    }
}

impl JsMapInformation {
    fn read(&self, options: JsValue) -> Result<Vec<Feature>, JsValue> {
        let options = read_options(options)?;
        console_log!(
            "Transforming {} geometries from {} to {}",
            self.inner.geometries().len(),
            options.data_projection,
            options.feature_projection
        );
        self.inner
            .transform_geometries_to_features_with(&options)
            .map_err(|e| {
                console_log!("Geometry transformation failed: {}", e);
                to_js_error(e)
            })
    }
}
