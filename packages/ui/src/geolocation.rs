//! The browser's position, when the user allows it.

use api::geo::Coordinates;

/// Ask the browser for the current position. Resolves to `None` when the user
/// refuses, the lookup fails, or there is no browser.
pub async fn current_position() -> Option<Coordinates> {
    #[cfg(target_arch = "wasm32")]
    {
        browser::current_position().await
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use api::geo::Coordinates;
    use futures::channel::oneshot;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    type Sender = Rc<RefCell<Option<oneshot::Sender<Option<Coordinates>>>>>;

    fn reply(tx: &Sender, value: Option<Coordinates>) {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(value);
        }
    }

    pub async fn current_position() -> Option<Coordinates> {
        let geolocation = web_sys::window()?.navigator().geolocation().ok()?;
        let (tx, rx) = oneshot::channel();
        let tx: Sender = Rc::new(RefCell::new(Some(tx)));

        let ok_tx = tx.clone();
        let on_success = Closure::once(move |position: web_sys::GeolocationPosition| {
            let coords = position.coords();
            reply(&ok_tx, Some(Coordinates::new(coords.latitude(), coords.longitude())));
        });
        let err_tx = tx.clone();
        let on_error = Closure::once(move |_err: wasm_bindgen::JsValue| {
            tracing::info!("geolocation unavailable or denied");
            reply(&err_tx, None);
        });

        let options = web_sys::PositionOptions::new();
        options.set_maximum_age(60_000);
        options.set_timeout(10_000);
        if geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &options,
            )
            .is_err()
        {
            return None;
        }
        // Closures must outlive the request
        let position = rx.await.ok().flatten();
        drop((on_success, on_error));
        position
    }
}
