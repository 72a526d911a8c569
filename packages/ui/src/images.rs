//! Picking image files and previewing them before upload.

use dioxus::prelude::*;
use thiserror::Error;

use crate::components::{use_toast, ToastOptions};

/// Uploads above this size are refused before they reach the backend.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("Formato não suportado: {0}. Use JPG, PNG, WEBP ou GIF.")]
    Unsupported(String),
    #[error("A imagem deve ter no máximo {} MB", MAX_IMAGE_BYTES / (1024 * 1024))]
    TooLarge(usize),
    #[error("Não foi possível ler o arquivo: {0}")]
    Read(String),
}

/// An image file read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedImage {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// MIME type for the image extensions the storage buckets accept.
pub fn content_type_for(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn check(name: String, bytes: Vec<u8>) -> Result<PickedImage, ImageError> {
    let content_type = content_type_for(&name).ok_or_else(|| ImageError::Unsupported(name.clone()))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge(bytes.len()));
    }
    Ok(PickedImage {
        name,
        content_type: content_type.to_string(),
        bytes,
    })
}

/// Read the first file of a file-input change event.
pub async fn read_first_image(evt: FormEvent) -> Result<Option<PickedImage>, ImageError> {
    let Some(file) = evt.files().into_iter().next() else {
        return Ok(None);
    };
    let name = file.name();
    content_type_for(&name).ok_or_else(|| ImageError::Unsupported(name.clone()))?;
    let bytes = file
        .read_bytes()
        .await
        .map_err(|e| ImageError::Read(e.to_string()))?;
    check(name, bytes.to_vec()).map(Some)
}

/// A `blob:` URL showing `bytes` in an `img`; `None` outside the browser.
pub fn object_url(bytes: &[u8], content_type: &str) -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(content_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).ok()?;
        web_sys::Url::create_object_url_with_blob(&blob).ok()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (bytes, content_type);
        None
    }
}

pub fn revoke_object_url(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = web_sys::Url::revoke_object_url(url);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = url;
    }
}

/// File input restricted to images. Invalid picks are reported with a toast.
#[component]
pub fn ImagePicker(
    id: String,
    #[props(default = "Escolher imagem".to_string())] label: String,
    #[props(default)] disabled: bool,
    onpick: EventHandler<PickedImage>,
) -> Element {
    let toast = use_toast();

    let onchange = move |evt: FormEvent| {
        spawn(async move {
            match read_first_image(evt).await {
                Ok(Some(image)) => {
                    tracing::debug!(name = %image.name, size = image.bytes.len(), "image picked");
                    onpick.call(image);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("rejected image: {e}");
                    toast.error(e.to_string(), ToastOptions::new());
                }
            }
        });
    };

    rsx! {
        label { class: "image-picker", r#for: "{id}",
            span { class: "btn btn-outline", "{label}" }
            input {
                id: "{id}",
                class: "sr-only",
                r#type: "file",
                accept: "image/jpeg,image/png,image/webp,image/gif",
                disabled,
                onchange,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("foto.JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for("a.b.png"), Some("image/png"));
        assert_eq!(content_type_for("doc.pdf"), None);
        assert_eq!(content_type_for("semextensao"), None);
    }

    #[test]
    fn test_check_limits() {
        assert!(matches!(check("a.txt".into(), vec![]), Err(ImageError::Unsupported(_))));
        assert!(matches!(
            check("a.png".into(), vec![0; MAX_IMAGE_BYTES + 1]),
            Err(ImageError::TooLarge(_))
        ));
        let ok = check("a.webp".into(), vec![1, 2, 3]).unwrap();
        assert_eq!(ok.content_type, "image/webp");
    }
}
