use hovermark_core::{Color, FontHandle, ParseCache, StyleConfig};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Style overrides accepted from JavaScript. Missing fields keep the
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RenderOptions {
    bold_color: Option<Color>,
    inline_code_color: Option<Color>,
    block_code_color: Option<Color>,
    link_color: Option<Color>,
    plain_links: bool,
    monospace: Option<String>,
    heading_scale: Option<Vec<f32>>,
}

impl RenderOptions {
    fn into_style(self) -> StyleConfig {
        let mut style = StyleConfig::default();
        if let Some(color) = self.bold_color {
            style.bold_color = color;
        }
        if let Some(color) = self.inline_code_color {
            style.inline_code_color = color;
        }
        if let Some(color) = self.block_code_color {
            style.block_code_color = color;
        }
        if self.plain_links {
            style.link_color = None;
        } else if let Some(color) = self.link_color {
            style.link_color = Some(color);
        }
        if let Some(family) = self.monospace {
            style.monospace = FontHandle::new(family);
        }
        if let Some(scale) = self.heading_scale {
            style.heading_scale = scale;
        }
        style
    }
}

/// Renders markdown to `{ text, annotations: [{ start, end, attribute }] }`.
#[wasm_bindgen]
pub fn render(source: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let style = style_from_js(options)?;
    let styled = hovermark_core::render(source, &style);
    serde_wasm_bindgen::to_value(&styled).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Renderer that keeps parsed documents between calls, for hosts that
/// re-render the same hover text on theme changes.
#[wasm_bindgen]
pub struct HoverRenderer {
    cache: ParseCache,
    style: StyleConfig,
}

#[wasm_bindgen]
impl HoverRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<HoverRenderer, JsValue> {
        Ok(Self {
            cache: ParseCache::default(),
            style: style_from_js(options)?,
        })
    }

    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        self.style = style_from_js(options)?;
        Ok(())
    }

    pub fn render(&self, source: &str) -> Result<JsValue, JsValue> {
        let styled = self.cache.render(source, &self.style);
        serde_wasm_bindgen::to_value(&styled).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

fn style_from_js(value: JsValue) -> Result<StyleConfig, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(StyleConfig::default());
    }
    let parsed: RenderOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(parsed.into_style())
}
