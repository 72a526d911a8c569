//! Dates and counts as shown to Brazilian users.

use api::BackendError;
use chrono::{DateTime, Duration, Locale, NaiveDate, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use chrono_tz::Tz;

fn brasilia(at: DateTime<Utc>) -> DateTime<Tz> {
    at.with_timezone(&Sao_Paulo)
}

/// `sáb, 14 mar 2026 · 20:00`
pub fn event_date(at: DateTime<Utc>) -> String {
    brasilia(at)
        .format_localized("%a, %-d %b %Y · %H:%M", Locale::pt_BR)
        .to_string()
}

/// Today's date in Brasília.
pub fn today() -> NaiveDate {
    brasilia(Utc::now()).date_naive()
}

/// `14/03/2026`
pub fn short_date(at: DateTime<Utc>) -> String {
    brasilia(at).format("%d/%m/%Y").to_string()
}

/// `agora`, `há 5 min`, `há 3 h`, `há 2 d`, then the short date.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - at;
    if elapsed < Duration::minutes(1) {
        "agora".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("há {} min", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("há {} h", elapsed.num_hours())
    } else if elapsed < Duration::days(7) {
        format!("há {} d", elapsed.num_days())
    } else {
        short_date(at)
    }
}

/// Value for an `<input type="datetime-local">`, in Brasília time.
pub fn datetime_input(at: DateTime<Utc>) -> String {
    brasilia(at).format("%Y-%m-%dT%H:%M").to_string()
}

/// Parse an `<input type="datetime-local">` value entered in Brasília time.
pub fn parse_datetime_input(value: &str) -> Option<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").ok()?;
    Sao_Paulo
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `1 seguidor`, `2 seguidores`.
pub fn plural(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Message for a failed backend call, fit for a toast or banner.
pub fn backend_error(error: &BackendError) -> String {
    let known = |message: &str| {
        let lower = message.to_lowercase();
        if lower.contains("invalid login credentials") {
            Some("E-mail ou senha incorretos")
        } else if lower.contains("already registered") {
            Some("Este e-mail já está cadastrado")
        } else if lower.contains("email not confirmed") {
            Some("Confirme seu e-mail antes de entrar")
        } else if lower.contains("duplicate key") {
            Some("Esse registro já existe")
        } else {
            None
        }
    };
    match error {
        BackendError::Http(_) => "Sem conexão com o servidor. Verifique sua internet.".to_string(),
        BackendError::Api { message, .. } => known(message).map(str::to_string).unwrap_or_else(|| message.clone()),
        BackendError::Unauthorized(message) => known(message)
            .unwrap_or("Sua sessão expirou. Entre novamente.")
            .to_string(),
        BackendError::NotFound => "Não encontrado".to_string(),
        _ => "Algo deu errado. Tente novamente.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_event_date_in_brasilia() {
        assert_eq!(event_date(at("2026-03-14T23:00:00Z")), "sáb, 14 mar 2026 · 20:00");
        assert_eq!(event_date(at("2026-03-15T01:30:00Z")), "sáb, 14 mar 2026 · 22:30");
        assert_eq!(short_date(at("2026-01-01T02:00:00Z")), "31/12/2025");
    }

    #[test]
    fn test_brasilia_follows_historical_daylight_saving() {
        // Summer time (UTC-2) was still observed in late 2018
        assert_eq!(event_date(at("2018-12-01T12:00:00Z")), "sáb, 1 dez 2018 · 10:00");
        assert_eq!(
            parse_datetime_input("2018-12-01T10:00"),
            Some(at("2018-12-01T12:00:00Z"))
        );
        assert_eq!(datetime_input(at("2026-07-01T15:30:00Z")), "2026-07-01T12:30");
    }

    #[test]
    fn test_relative_time() {
        let now = at("2026-03-14T12:00:00Z");
        assert_eq!(relative_time(at("2026-03-14T11:59:30Z"), now), "agora");
        assert_eq!(relative_time(at("2026-03-14T11:55:00Z"), now), "há 5 min");
        assert_eq!(relative_time(at("2026-03-14T09:00:00Z"), now), "há 3 h");
        assert_eq!(relative_time(at("2026-03-12T12:00:00Z"), now), "há 2 d");
        assert_eq!(relative_time(at("2026-02-01T12:00:00Z"), now), "01/02/2026");
    }

    #[test]
    fn test_datetime_input_round_trip() {
        let value = datetime_input(at("2026-03-14T23:00:00Z"));
        assert_eq!(value, "2026-03-14T20:00");
        assert_eq!(parse_datetime_input(&value), Some(at("2026-03-14T23:00:00Z")));
        assert_eq!(parse_datetime_input("amanhã"), None);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "seguidor", "seguidores"), "1 seguidor");
        assert_eq!(plural(0, "seguidor", "seguidores"), "0 seguidores");
    }

    #[test]
    fn test_backend_error_messages() {
        let creds = BackendError::Api {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(backend_error(&creds), "E-mail ou senha incorretos");
        let other = BackendError::Api {
            status: 400,
            message: "Evento lotado".to_string(),
        };
        assert_eq!(backend_error(&other), "Evento lotado");
        assert_eq!(
            backend_error(&BackendError::Unauthorized("JWT expired".to_string())),
            "Sua sessão expirou. Entre novamente."
        );
        assert_eq!(backend_error(&BackendError::NotFound), "Não encontrado");
    }
}
