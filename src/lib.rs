#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;

use std::fmt;

use geom::{MobiusStrip, ShapeParameters};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A second `initialize` call finds the logger already installed.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

/// Publiek toegangspunt voor JavaScript: één Möbiusband met zijn metingen.
#[wasm_bindgen]
#[derive(Default)]
pub struct MobiusEngine {
    strip: MobiusStrip,
}

#[wasm_bindgen]
impl MobiusEngine {
    /// Maak een band met straal `center_radius`, breedte `width` en
    /// `resolution` punten per rasteras. Overige instellingen krijgen hun
    /// standaardwaarde.
    #[wasm_bindgen(constructor)]
    pub fn new(center_radius: f64, width: f64, resolution: usize) -> Result<MobiusEngine, JsValue> {
        let params = ShapeParameters::default()
            .with_center_radius(center_radius)
            .with_width(width)
            .with_resolution(resolution);
        Self::from_params(params).map_err(to_js_error)
    }

    /// Maak een band vanuit een JS-object met (een deel van) de
    /// `ShapeParameters`-velden.
    #[wasm_bindgen]
    pub fn from_config(config: JsValue) -> Result<MobiusEngine, JsValue> {
        let params: ShapeParameters = serde_wasm_bindgen::from_value(config)
            .map_err(|err| js_error(&format!("ongeldige configuratie: {err}")))?;
        Self::from_params(params).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn center_radius(&self) -> f64 {
        self.strip.params().center_radius
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.strip.params().width
    }

    #[wasm_bindgen(getter)]
    pub fn resolution(&self) -> usize {
        self.strip.params().resolution
    }

    /// Wijzig de rasterresolutie; de band wordt opnieuw gevalideerd.
    #[wasm_bindgen]
    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), JsValue> {
        let params = self.strip.params().with_resolution(resolution);
        self.strip = MobiusStrip::new(params).map_err(to_js_error)?;
        Ok(())
    }

    /// Oppervlakte via adaptieve integratie van het oppervlakte-element.
    #[wasm_bindgen]
    pub fn surface_area(&self) -> Result<f64, JsValue> {
        self.strip.surface_area().map_err(to_js_error)
    }

    /// Lengte van de rand, benaderd met een polylijn.
    #[wasm_bindgen]
    pub fn edge_length(&self) -> f64 {
        self.strip.edge_length()
    }

    /// Haal het puntenraster op als `{ rows, cols, x, y, z }`.
    #[wasm_bindgen]
    pub fn get_point_grid(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.strip.point_grid())
    }

    /// Haal de getrianguleerde mesh op met posities, indices en uv's.
    #[wasm_bindgen]
    pub fn get_mesh(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.strip.mesh())
    }

    /// Haal beide randbogen op als puntenlijsten.
    #[wasm_bindgen]
    pub fn get_edge_curves(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.strip.edge_curves())
    }

    /// Haal parameters, oppervlakte en randlengte in één rapport op.
    #[wasm_bindgen]
    pub fn get_report(&self) -> Result<JsValue, JsValue> {
        let report = self.strip.measure().map_err(to_js_error)?;
        to_js_value(&report)
    }
}

impl MobiusEngine {
    /// Native constructor for callers that already hold validated parameters.
    pub fn from_params(params: ShapeParameters) -> geom::GeomResult<Self> {
        Ok(Self {
            strip: MobiusStrip::new(params)?,
        })
    }

    #[must_use]
    pub fn strip(&self) -> &MobiusStrip {
        &self.strip
    }
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()).into())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
