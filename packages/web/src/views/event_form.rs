//! Creating and editing events.

use api::models::{Event, NewEvent, CATEGORIES};
use api::services::events;
use api::{validate, ValidationError};
use dioxus::prelude::*;
use ui::components::{use_toast, Button, ButtonVariant, ErrorBanner, Input, Label, Spinner, Textarea, ToastOptions};
use ui::images::{object_url, revoke_object_url, PickedImage};
use ui::{format, use_auth, use_backend, ImagePicker};
use uuid::Uuid;

use super::message_for;
use crate::Route;

/// Raw form values, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EventForm {
    pub title: String,
    pub description: String,
    /// `datetime-local` value in Brasília time.
    pub date: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub price: String,
    pub category: String,
    pub capacity: String,
    pub image_url: Option<String>,
}

fn optional_number<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    message: &str,
) -> Result<Option<T>, ValidationError> {
    let value = value.trim().replace(',', ".");
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::new(field, message))
}

impl EventForm {
    pub fn from_event(event: &Event) -> Self {
        let number = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        Self {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            date: format::datetime_input(event.date),
            location: event.location.clone(),
            latitude: number(event.latitude),
            longitude: number(event.longitude),
            price: if event.price == 0.0 { String::new() } else { format!("{:.2}", event.price) },
            category: event.category.clone(),
            capacity: event.capacity.map(|c| c.to_string()).unwrap_or_default(),
            image_url: event.image_url.clone(),
        }
    }

    /// Parse and validate into the row to save.
    pub fn to_new(&self, organizer_id: Uuid) -> Result<NewEvent, ValidationError> {
        validate::required("title", "Título", &self.title)?;
        validate::required("date", "Data", &self.date)?;
        let date = format::parse_datetime_input(&self.date)
            .ok_or_else(|| ValidationError::new("date", "Data inválida"))?;
        let price = optional_number::<f64>(&self.price, "price", "Preço inválido")?.unwrap_or(0.0);
        let description = self.description.trim();
        let event = NewEvent {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            date,
            location: self.location.trim().to_string(),
            latitude: optional_number(&self.latitude, "latitude", "Latitude inválida")?,
            longitude: optional_number(&self.longitude, "latitude", "Longitude inválida")?,
            price: (price * 100.0).round() / 100.0,
            category: self.category.clone(),
            organizer_id,
            image_url: self.image_url.clone(),
            capacity: optional_number(&self.capacity, "capacity", "Capacidade inválida")?,
        };
        validate::new_event(&event)?;
        Ok(event)
    }
}

#[component]
pub fn EventCreate() -> Element {
    rsx! {
        h1 { "Criar evento" }
        EventEditor { existing: None }
    }
}

#[component]
pub fn EventEdit(id: Uuid) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let event = use_resource(use_reactive!(|id| {
        let backend = backend.clone();
        async move { events::get(&backend, id).await }
    }));

    let event = match &*event.read() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => return rsx! { ErrorBanner { message: Some(format::backend_error(e)) } },
        Some(Ok(event)) => event.clone(),
    };
    if auth.read().user_id() != Some(event.organizer_id) {
        return rsx! {
            ErrorBanner { message: Some("Só quem organiza o evento pode editá-lo.".to_string()) }
            Link { to: Route::EventDetail { id }, "Voltar ao evento" }
        };
    }

    rsx! {
        h1 { "Editar evento" }
        EventEditor { key: "{id}", existing: Some(event) }
    }
}

#[component]
fn EventEditor(#[props(!optional)] existing: Option<Event>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let nav = use_navigator();
    let mut form = use_signal(|| existing.as_ref().map(EventForm::from_event).unwrap_or_default());
    let mut cover = use_signal(|| Option::<PickedImage>::None);
    let mut preview = use_signal(|| Option::<String>::None);
    let mut invalid = use_signal(|| None::<ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);

    use_drop(move || {
        if let Ok(current) = preview.try_peek() {
            if let Some(url) = current.as_deref() {
                revoke_object_url(url);
            }
        }
    });

    let on_cover = move |image: PickedImage| {
        if let Some(old) = preview.take() {
            revoke_object_url(&old);
        }
        preview.set(object_url(&image.bytes, &image.content_type));
        cover.set(Some(image));
    };

    let existing_id = existing.as_ref().map(|e| e.id);
    let handle_submit = {
        let backend = backend.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if loading() {
                return;
            }
            let Some(me) = auth.peek().user_id() else {
                return;
            };
            let backend = backend.clone();
            spawn(async move {
                error.set(None);
                let mut row = match form.peek().to_new(me) {
                    Ok(row) => row,
                    Err(v) => {
                        invalid.set(Some(v));
                        return;
                    }
                };
                invalid.set(None);
                loading.set(true);

                if let Some(image) = cover.peek().clone() {
                    match events::upload_cover(&backend, me, image.bytes, &image.content_type).await {
                        Ok(url) => row.image_url = Some(url),
                        Err(e) => {
                            tracing::error!("cover upload failed: {e}");
                            error.set(Some(format::backend_error(&e)));
                            loading.set(false);
                            return;
                        }
                    }
                }

                let saved = match existing_id {
                    Some(id) => events::update(&backend, id, &row).await,
                    None => events::create(&backend, &row).await,
                };
                loading.set(false);
                match saved {
                    Ok(event) => {
                        toast.success("Evento salvo".to_string(), ToastOptions::new());
                        nav.replace(Route::EventDetail { id: event.id });
                    }
                    Err(e) => {
                        tracing::error!("failed to save event: {e}");
                        error.set(Some(format::backend_error(&e)));
                    }
                }
            });
        }
    };

    let delete_event = {
        let existing = existing.clone();
        move |_| {
            let Some(event) = existing.clone() else {
                return;
            };
            if !confirm_delete() {
                confirm_delete.set(true);
                return;
            }
            let backend = backend.clone();
            loading.set(true);
            spawn(async move {
                match events::delete(&backend, &event).await {
                    Ok(()) => {
                        toast.info("Evento excluído".to_string(), ToastOptions::new());
                        nav.replace(Route::EventList {});
                    }
                    Err(e) => {
                        tracing::error!(event = %event.id, "failed to delete event: {e}");
                        toast.error(format::backend_error(&e), ToastOptions::new());
                        loading.set(false);
                        confirm_delete.set(false);
                    }
                }
            });
        }
    };

    let values = form();
    let err = invalid();
    let cover_src = preview().or(values.image_url.clone());

    rsx! {
        form { class: "form-card", onsubmit: handle_submit,
            ErrorBanner { message: error() }

            div { class: "field",
                Label { html_for: "cover", "Capa" }
                if let Some(src) = cover_src {
                    img { class: "cover-preview", src: "{src}", alt: "Capa do evento" }
                }
                ImagePicker { id: "cover", label: "Escolher capa", disabled: loading(), onpick: on_cover }
            }

            div { class: "field",
                Label { html_for: "title", "Título" }
                Input {
                    id: "title",
                    value: values.title.clone(),
                    maxlength: 120,
                    invalid: message_for(&err, "title").is_some(),
                    oninput: move |evt: FormEvent| form.write().title = evt.value(),
                }
                if let Some(msg) = message_for(&err, "title") {
                    p { class: "field-error", "{msg}" }
                }
            }

            div { class: "field",
                Label { html_for: "description", "Descrição" }
                Textarea {
                    id: "description",
                    rows: 6,
                    placeholder: "Markdown é suportado",
                    value: values.description.clone(),
                    oninput: move |evt: FormEvent| form.write().description = evt.value(),
                }
            }

            div { class: "field-row",
                div { class: "field",
                    Label { html_for: "date", "Data e hora" }
                    Input {
                        id: "date",
                        r#type: "datetime-local",
                        value: values.date.clone(),
                        invalid: message_for(&err, "date").is_some(),
                        oninput: move |evt: FormEvent| form.write().date = evt.value(),
                    }
                    if let Some(msg) = message_for(&err, "date") {
                        p { class: "field-error", "{msg}" }
                    }
                }
                div { class: "field",
                    Label { html_for: "category", "Categoria" }
                    select {
                        id: "category",
                        class: "input",
                        value: "{values.category}",
                        onchange: move |evt: FormEvent| form.write().category = evt.value(),
                        option { value: "", disabled: true, "Escolha" }
                        for name in CATEGORIES.iter().copied() {
                            option { key: "{name}", value: "{name}", selected: values.category == name, "{name}" }
                        }
                    }
                    if let Some(msg) = message_for(&err, "category") {
                        p { class: "field-error", "{msg}" }
                    }
                }
            }

            div { class: "field",
                Label { html_for: "location", "Local" }
                Input {
                    id: "location",
                    value: values.location.clone(),
                    invalid: message_for(&err, "location").is_some(),
                    oninput: move |evt: FormEvent| form.write().location = evt.value(),
                }
                if let Some(msg) = message_for(&err, "location") {
                    p { class: "field-error", "{msg}" }
                }
            }

            div { class: "field-row",
                div { class: "field",
                    Label { html_for: "latitude", "Latitude" }
                    Input {
                        id: "latitude",
                        inputmode: "decimal",
                        placeholder: "-23.5505",
                        value: values.latitude.clone(),
                        invalid: message_for(&err, "latitude").is_some(),
                        oninput: move |evt: FormEvent| form.write().latitude = evt.value(),
                    }
                }
                div { class: "field",
                    Label { html_for: "longitude", "Longitude" }
                    Input {
                        id: "longitude",
                        inputmode: "decimal",
                        placeholder: "-46.6333",
                        value: values.longitude.clone(),
                        invalid: message_for(&err, "latitude").is_some(),
                        oninput: move |evt: FormEvent| form.write().longitude = evt.value(),
                    }
                }
            }
            if let Some(msg) = message_for(&err, "latitude") {
                p { class: "field-error", "{msg}" }
            }

            div { class: "field-row",
                div { class: "field",
                    Label { html_for: "price", "Preço (R$)" }
                    Input {
                        id: "price",
                        inputmode: "decimal",
                        placeholder: "Vazio para gratuito",
                        value: values.price.clone(),
                        invalid: message_for(&err, "price").is_some(),
                        oninput: move |evt: FormEvent| form.write().price = evt.value(),
                    }
                    if let Some(msg) = message_for(&err, "price") {
                        p { class: "field-error", "{msg}" }
                    }
                }
                div { class: "field",
                    Label { html_for: "capacity", "Capacidade" }
                    Input {
                        id: "capacity",
                        inputmode: "numeric",
                        placeholder: "Sem limite",
                        value: values.capacity.clone(),
                        invalid: message_for(&err, "capacity").is_some(),
                        oninput: move |evt: FormEvent| form.write().capacity = evt.value(),
                    }
                    if let Some(msg) = message_for(&err, "capacity") {
                        p { class: "field-error", "{msg}" }
                    }
                }
            }

            div { class: "form-actions",
                if existing_id.is_some() {
                    Button {
                        variant: ButtonVariant::Destructive,
                        disabled: loading(),
                        onclick: delete_event,
                        if confirm_delete() { "Confirmar exclusão" } else { "Excluir evento" }
                    }
                }
                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Salvando..." } else { "Salvar" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> EventForm {
        EventForm {
            title: " Show de rock ".to_string(),
            description: String::new(),
            date: "2030-05-10T21:00".to_string(),
            location: "Arena".to_string(),
            latitude: "-23,55".to_string(),
            longitude: "-46.63".to_string(),
            price: "49,90".to_string(),
            category: "Música".to_string(),
            capacity: "300".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_form_parses_brazilian_decimals() {
        let row = filled().to_new(Uuid::nil()).unwrap();
        assert_eq!(row.title, "Show de rock");
        assert_eq!(row.latitude, Some(-23.55));
        assert_eq!(row.price, 49.9);
        assert_eq!(row.capacity, Some(300));
        assert_eq!(row.description, None);
        assert_eq!(row.date.to_rfc3339(), "2030-05-11T00:00:00+00:00");
    }

    #[test]
    fn test_form_reports_the_failing_field() {
        let mut form = filled();
        form.title = "  ".to_string();
        assert_eq!(form.to_new(Uuid::nil()).unwrap_err().field, "title");

        let mut form = filled();
        form.capacity = "muitos".to_string();
        assert_eq!(form.to_new(Uuid::nil()).unwrap_err().field, "capacity");

        let mut form = filled();
        form.longitude.clear();
        assert_eq!(form.to_new(Uuid::nil()).unwrap_err().field, "latitude");

        let mut form = filled();
        form.price.clear();
        assert_eq!(form.to_new(Uuid::nil()).unwrap().price, 0.0);
    }

    #[test]
    fn test_from_event_round_trips() {
        let row = filled().to_new(Uuid::nil()).unwrap();
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": Uuid::from_u128(3),
            "title": row.title,
            "description": null,
            "date": row.date,
            "location": row.location,
            "latitude": row.latitude,
            "longitude": row.longitude,
            "price": row.price,
            "category": row.category,
            "organizer_id": Uuid::nil(),
            "image_url": null,
            "capacity": row.capacity,
            "created_at": null
        }))
        .unwrap();
        let form = EventForm::from_event(&event);
        assert_eq!(form.date, "2030-05-10T21:00");
        assert_eq!(form.price, "49.90");
        assert_eq!(form.to_new(Uuid::nil()).unwrap(), row);
    }
}
