use std::collections::HashMap;

use dioxus::prelude::*;
use thiserror::Error;

use super::geometry::{CropState, Point, Rect, MAX_ZOOM};
use crate::components::{Button, ButtonVariant};

/// Zoom factor per wheel notch (100 px of delta).
const WHEEL_STEP: f64 = 1.1;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    #[error("o recorte de imagens só funciona no navegador")]
    Unsupported,
    #[error("a imagem ainda não carregou")]
    NotLoaded,
    #[error("falha ao gerar a imagem: {0}")]
    Canvas(String),
}

/// Pan and zoom `src` under a circular mask, then export the circle as a
/// square PNG of `output_size` pixels.
#[component]
pub fn ImageCropper(
    src: String,
    #[props(default = 280.0)] viewport: f64,
    #[props(default = 512)] output_size: u32,
    on_confirm: EventHandler<Vec<u8>>,
    on_cancel: EventHandler<()>,
) -> Element {
    let img_id = use_hook(|| format!("cropper-{}", uuid::Uuid::new_v4().simple()));
    let mut crop = use_signal(|| None::<CropState>);
    let mut pointers = use_signal(HashMap::<i32, Point>::new);
    let mut error = use_signal(|| None::<String>);

    let onload = {
        let img_id = img_id.clone();
        move |_: Event<ImageData>| match natural_size(&img_id) {
            Some((w, h)) => crop.set(Some(CropState::new(w, h, viewport))),
            None => error.set(Some(CropError::NotLoaded.to_string())),
        }
    };

    let onpointerdown = move |evt: PointerEvent| {
        let p = evt.element_coordinates();
        pointers.write().insert(evt.pointer_id(), Point::new(p.x, p.y));
    };

    let onpointermove = move |evt: PointerEvent| {
        let id = evt.pointer_id();
        let p = evt.element_coordinates();
        let current = Point::new(p.x, p.y);
        let Some(previous) = pointers.peek().get(&id).copied() else {
            return;
        };
        let others: Vec<Point> = pointers
            .peek()
            .iter()
            .filter(|(k, _)| **k != id)
            .map(|(_, v)| *v)
            .collect();
        if let Some(state) = crop.write().as_mut() {
            match others.first() {
                // Two fingers: zoom around their midpoint
                Some(&other) => state.pinch(
                    previous.distance(other),
                    current.distance(other),
                    current.midpoint(other),
                ),
                None => state.drag(current.x - previous.x, current.y - previous.y),
            }
        }
        pointers.write().insert(id, current);
    };

    let onpointerup = move |evt: PointerEvent| {
        pointers.write().remove(&evt.pointer_id());
    };

    let onwheel = move |evt: WheelEvent| {
        evt.prevent_default();
        let delta = evt.delta().strip_units();
        let p = evt.element_coordinates();
        if let Some(state) = crop.write().as_mut() {
            state.zoom_at(WHEEL_STEP.powf(-delta.y / 100.0), Point::new(p.x, p.y));
        }
    };

    let onzoom = move |evt: FormEvent| {
        if let Ok(zoom) = evt.value().parse::<f64>() {
            if let Some(state) = crop.write().as_mut() {
                state.set_zoom(zoom);
            }
        }
    };

    let confirm = {
        let img_id = img_id.clone();
        move |_: MouseEvent| {
            let Some(state) = *crop.peek() else {
                error.set(Some(CropError::NotLoaded.to_string()));
                return;
            };
            match export_circle(&img_id, state.source_rect(), output_size) {
                Ok(png) => {
                    tracing::debug!(bytes = png.len(), "cropped image exported");
                    on_confirm.call(png);
                }
                Err(e) => {
                    tracing::error!("crop export failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        }
    };

    let state = crop();
    let image_style = match state {
        Some(s) => format!(
            "left: {}px; top: {}px; width: {}px; height: {}px;",
            s.offset().x,
            s.offset().y,
            s.displayed_width(),
            s.displayed_height()
        ),
        None => "visibility: hidden;".to_string(),
    };
    let zoom = state.map(|s| s.zoom()).unwrap_or(1.0);

    rsx! {
        div { class: "cropper",
            div {
                class: "cropper-viewport",
                style: "width: {viewport}px; height: {viewport}px; touch-action: none;",
                onpointerdown,
                onpointermove,
                onpointerup,
                onpointercancel: onpointerup,
                onpointerleave: onpointerup,
                onwheel,
                img {
                    id: "{img_id}",
                    class: "cropper-image",
                    src: "{src}",
                    alt: "Imagem para recortar",
                    draggable: "false",
                    style: "{image_style}",
                    onload,
                }
                div { class: "cropper-mask" }
            }
            input {
                class: "cropper-zoom",
                r#type: "range",
                min: "1",
                max: "{MAX_ZOOM}",
                step: "0.01",
                value: "{zoom}",
                aria_label: "Zoom",
                disabled: state.is_none(),
                oninput: onzoom,
            }
            if let Some(message) = error() {
                p { class: "field-error", "{message}" }
            }
            div { class: "cropper-actions",
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| on_cancel.call(()),
                    "Cancelar"
                }
                Button { disabled: state.is_none(), onclick: confirm, "Usar foto" }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn image_element(id: &str) -> Option<web_sys::HtmlImageElement> {
    use wasm_bindgen::JsCast;
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<web_sys::HtmlImageElement>()
        .ok()
}

fn natural_size(img_id: &str) -> Option<(f64, f64)> {
    #[cfg(target_arch = "wasm32")]
    {
        let img = image_element(img_id)?;
        Some((img.natural_width() as f64, img.natural_height() as f64))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = img_id;
        None
    }
}

#[cfg(target_arch = "wasm32")]
fn export_circle(img_id: &str, source: Rect, output_size: u32) -> Result<Vec<u8>, CropError> {
    use wasm_bindgen::JsCast;

    let js = |e: wasm_bindgen::JsValue| CropError::Canvas(format!("{e:?}"));
    let img = image_element(img_id).ok_or(CropError::NotLoaded)?;
    let window = web_sys::window().ok_or(CropError::Unsupported)?;
    let document = window.document().ok_or(CropError::Unsupported)?;

    let canvas = document
        .create_element("canvas")
        .map_err(js)?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| CropError::Canvas("canvas element".to_string()))?;
    canvas.set_width(output_size);
    canvas.set_height(output_size);
    let ctx = canvas
        .get_context("2d")
        .map_err(js)?
        .ok_or_else(|| CropError::Canvas("2d context".to_string()))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| CropError::Canvas("2d context".to_string()))?;

    let size = output_size as f64;
    let radius = size / 2.0;
    ctx.begin_path();
    ctx.arc(radius, radius, radius, 0.0, std::f64::consts::TAU).map_err(js)?;
    ctx.close_path();
    ctx.clip();
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        &img,
        source.x,
        source.y,
        source.width,
        source.height,
        0.0,
        0.0,
        size,
        size,
    )
    .map_err(js)?;

    let data_url = canvas.to_data_url().map_err(js)?;
    let (_, encoded) = data_url
        .split_once(',')
        .ok_or_else(|| CropError::Canvas("data URL".to_string()))?;
    // atob yields one char per byte
    let binary = window.atob(encoded).map_err(js)?;
    Ok(binary.chars().map(|c| c as u8).collect())
}

#[cfg(not(target_arch = "wasm32"))]
fn export_circle(_img_id: &str, _source: Rect, _output_size: u32) -> Result<Vec<u8>, CropError> {
    Err(CropError::Unsupported)
}
