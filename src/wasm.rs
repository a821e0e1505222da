#![cfg(target_arch = "wasm32")]

use crate::algorithms::{
    AlignSeparateParams, CrowdParams, FlockMode, SeekParams, SeparationSeekParams, WallsParams,
};
use crate::config::SceneConfig;
use crate::engine::{scene_catalog, Engine, SceneInfo, SCENE_SEEK};
use crate::error::EngineError;
use nalgebra::Vector3;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn available_scenes() -> js_sys::Array {
    let out = js_sys::Array::new();
    for info in scene_catalog() {
        out.push(&scene_info_to_js(info));
    }
    out
}

/// Default [`SceneConfig`] of a scene as a plain object, for UI forms.
#[wasm_bindgen]
pub fn scene_defaults(scene_id: &str) -> Result<JsValue, JsValue> {
    let cfg = SceneConfig::for_scene(scene_id).map_err(to_js)?;
    serde_wasm_bindgen::to_value(&cfg).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn seek_defaults() -> JsValue {
    serde_wasm_bindgen::to_value(&SeekParams::default()).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn crowd_defaults() -> JsValue {
    serde_wasm_bindgen::to_value(&CrowdParams::default()).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn separation_seek_defaults() -> JsValue {
    serde_wasm_bindgen::to_value(&SeparationSeekParams::default()).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn align_separate_defaults() -> JsValue {
    serde_wasm_bindgen::to_value(&AlignSeparateParams::default()).unwrap_or(JsValue::NULL)
}

fn scene_info_to_js(info: &SceneInfo) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(info.id));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(info.name));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("description"),
        &JsValue::from_str(info.description),
    );
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("usesTarget"),
        &JsValue::from_bool(info.uses_target),
    );
    JsValue::from(obj)
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid {}: {}", what, e)))
}

fn mode_from(separate: bool) -> FlockMode {
    if separate {
        FlockMode::Separate
    } else {
        FlockMode::Align
    }
}

#[wasm_bindgen]
pub struct WasmSteer {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmSteer {
    #[wasm_bindgen(constructor)]
    pub fn new(scene_id: &str, seed: Option<u32>) -> Result<WasmSteer, JsValue> {
        let engine = Engine::new_builtin(scene_id, seed.map(u64::from)).map_err(to_js)?;
        Ok(WasmSteer { engine })
    }

    pub fn new_demo() -> Result<WasmSteer, JsValue> {
        Self::new(SCENE_SEEK, None)
    }

    /// Build from a (partial) scene config object, see `scene_defaults`.
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmSteer, JsValue> {
        let cfg: SceneConfig = parse(config, "scene config")?;
        let engine = Engine::from_config(cfg).map_err(to_js)?;
        Ok(WasmSteer { engine })
    }

    pub fn scene(&self) -> String { self.engine.scene_id().to_string() }

    pub fn len(&self) -> usize { self.engine.len() }

    pub fn steps(&self) -> f64 { self.engine.steps() as f64 }

    pub fn tick(&mut self) { self.engine.tick(); }

    /// Per animation frame: `delta` in seconds, `separate` picks the
    /// behaviour of the align/separate scene.
    pub fn frame(&mut self, delta: f64, separate: bool) -> f64 {
        self.engine.frame(delta, mode_from(separate))
    }

    pub fn set_target(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.engine
            .set_target(Some(Vector3::new(x, y, z)))
            .map_err(to_js)
    }

    pub fn clear_target(&mut self) -> Result<(), JsValue> {
        self.engine.set_target(None).map_err(to_js)
    }

    pub fn regenerate_path(&mut self) -> Result<(), JsValue> {
        self.engine.regenerate_path().map_err(to_js)
    }

    pub fn rebuild_field(&mut self, seed: Option<u32>) -> Result<f64, JsValue> {
        self.engine
            .rebuild_field(seed.map(u64::from))
            .map(|s| s as f64)
            .map_err(to_js)
    }

    pub fn reset(&mut self) { self.engine.reset(); }

    pub fn set_trails(&mut self, len: usize) { self.engine.set_trails(len); }

    pub fn set_seek_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: SeekParams = parse(params, "seek params")?;
        self.engine.set_seek_params(params).map_err(to_js)
    }

    pub fn set_walls_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: WallsParams = parse(params, "walls params")?;
        self.engine.set_walls_params(params).map_err(to_js)
    }

    pub fn set_crowd_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: CrowdParams = parse(params, "crowd params")?;
        self.engine.set_crowd_params(params).map_err(to_js)
    }

    pub fn set_separation_seek_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: SeparationSeekParams = parse(params, "separation-and-seek params")?;
        self.engine.set_separation_seek_params(params).map_err(to_js)
    }

    pub fn set_align_separate_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: AlignSeparateParams = parse(params, "align-separate params")?;
        self.engine.set_align_separate_params(params).map_err(to_js)
    }

    pub fn positions(&self) -> Vec<f32> { self.engine.positions_flat() }

    pub fn states(&self) -> Vec<f32> { self.engine.states_flat() }

    pub fn trails(&self) -> Vec<f32> { self.engine.trails_flat() }

    pub fn path_points(&self) -> Vec<f32> { self.engine.path_points_flat() }

    pub fn flow_vectors(&self) -> Vec<f32> { self.engine.flow_vectors_flat() }

    /// Per vehicle: predicted xyz, normal xyz, target xyz, distance, correcting.
    /// Missing normal/target points are written as NaN.
    pub fn path_probes(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for probe in self.engine.path_probes() {
            let nan = Vector3::repeat(f64::NAN);
            for p in [probe.predicted, probe.normal.unwrap_or(nan), probe.target.unwrap_or(nan)] {
                out.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
            }
            out.push(probe.distance as f32);
            out.push(if probe.correcting { 1.0 } else { 0.0 });
        }
        out
    }

    pub fn snapshots(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.engine.snapshots()).unwrap_or(JsValue::NULL)
    }
}
