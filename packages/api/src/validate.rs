//! # Form validation
//!
//! Every validator returns `Result<(), ValidationError>`; the error names the
//! offending field and carries a message ready to show next to it. Composite
//! validators ([`sign_up`], [`sign_in`], [`new_event`]) stop at the first failure,
//! in the order the fields appear on screen.
//!
//! | Validator | Accepts |
//! |-----------|---------|
//! | [`email`] | `local@domain.tld`, no spaces |
//! | [`password`] | at least [`MIN_PASSWORD_LEN`] characters |
//! | [`cpf`] | 11 digits with valid check digits, punctuation ignored |
//! | [`card_number`] | 13-19 digits passing the Luhn check, spaces ignored |
//! | [`card_expiry`] | `MM/AA` not before the current month |
//! | [`cvv`] | 3 or 4 digits |
//! | [`username`] | 3-30 lowercase letters, digits, `.` or `_` |

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::models::NewEvent;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type Validation = Result<(), ValidationError>;

pub fn required(field: &'static str, label: &str, value: &str) -> Validation {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{label} é obrigatório")));
    }
    Ok(())
}

pub fn email(value: &str) -> Validation {
    let value = value.trim();
    required("email", "E-mail", value)?;
    let invalid = || ValidationError::new("email", "E-mail inválido");
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn password(value: &str) -> Validation {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("A senha deve ter pelo menos {MIN_PASSWORD_LEN} caracteres"),
        ));
    }
    Ok(())
}

pub fn password_confirmation(password: &str, confirmation: &str) -> Validation {
    if password != confirmation {
        return Err(ValidationError::new(
            "password_confirmation",
            "As senhas não coincidem",
        ));
    }
    Ok(())
}

fn digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Brazilian taxpayer id.
pub fn cpf(value: &str) -> Validation {
    let invalid = || ValidationError::new("document", "CPF inválido");
    if value
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | ' ')))
    {
        return Err(invalid());
    }
    let d = digits(value);
    if d.len() != 11 || d.iter().all(|&x| x == d[0]) {
        return Err(invalid());
    }
    let check = |len: usize| {
        let sum: u32 = d[..len]
            .iter()
            .enumerate()
            .map(|(i, &x)| x * (len as u32 + 1 - i as u32))
            .sum();
        match sum % 11 {
            0 | 1 => 0,
            r => 11 - r,
        }
    };
    if check(9) != d[9] || check(10) != d[10] {
        return Err(invalid());
    }
    Ok(())
}

/// Formats 11 digits as `000.000.000-00`; anything else is returned as typed.
pub fn format_cpf(value: &str) -> String {
    let d: String = value.chars().filter(char::is_ascii_digit).collect();
    if d.len() != 11 {
        return value.to_string();
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

pub fn card_number(value: &str) -> Validation {
    let invalid = || ValidationError::new("card_number", "Número do cartão inválido");
    if value.chars().any(|c| !(c.is_ascii_digit() || c == ' ')) {
        return Err(invalid());
    }
    let d = digits(value);
    if !(13..=19).contains(&d.len()) {
        return Err(invalid());
    }
    let sum: u32 = d
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &x)| {
            if i % 2 == 1 {
                let doubled = x * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                x
            }
        })
        .sum();
    if sum % 10 != 0 {
        return Err(invalid());
    }
    Ok(())
}

/// `MM/AA`, accepted through the last day of that month.
pub fn card_expiry(value: &str, today: NaiveDate) -> Validation {
    let invalid = || ValidationError::new("card_expiry", "Validade inválida (MM/AA)");
    let (month, year) = value.trim().split_once('/').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 2 {
        return Err(invalid());
    }
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    let year = 2000 + year;
    if (year, month) < (today.year(), today.month()) {
        return Err(ValidationError::new("card_expiry", "Cartão vencido"));
    }
    Ok(())
}

pub fn cvv(value: &str) -> Validation {
    let value = value.trim();
    if !(3..=4).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("cvv", "CVV inválido"));
    }
    Ok(())
}

pub fn username(value: &str) -> Validation {
    let len = value.chars().count();
    if !(3..=30).contains(&len) {
        return Err(ValidationError::new(
            "username",
            "O nome de usuário deve ter entre 3 e 30 caracteres",
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_'))
    {
        return Err(ValidationError::new(
            "username",
            "Use apenas letras minúsculas, números, ponto e sublinhado",
        ));
    }
    Ok(())
}

pub fn sign_in(email_value: &str, password_value: &str) -> Validation {
    email(email_value)?;
    required("password", "Senha", password_value)
}

pub fn sign_up(name: &str, email_value: &str, password_value: &str, confirmation: &str) -> Validation {
    required("name", "Nome", name)?;
    email(email_value)?;
    password(password_value)?;
    password_confirmation(password_value, confirmation)
}

pub fn new_event(event: &NewEvent) -> Validation {
    required("title", "Título", &event.title)?;
    required("location", "Local", &event.location)?;
    required("category", "Categoria", &event.category)?;
    if !event.price.is_finite() || event.price < 0.0 {
        return Err(ValidationError::new("price", "Preço inválido"));
    }
    if event.capacity == Some(0) {
        return Err(ValidationError::new("capacity", "A capacidade deve ser maior que zero"));
    }
    match (event.latitude, event.longitude) {
        (Some(lat), Some(lon)) if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) => {
            Err(ValidationError::new("latitude", "Coordenadas inválidas"))
        }
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::new(
            "latitude",
            "Informe latitude e longitude",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 15).unwrap()
    }

    #[test]
    fn test_email() {
        assert!(email("ana@example.com").is_ok());
        assert!(email(" ana.souza@mail.com.br ").is_ok());
        assert_eq!(email("").unwrap_err().message, "E-mail é obrigatório");
        for bad in ["ana", "ana@", "@x.com", "ana@x", "a b@x.com", "a@b@c.com", "ana@.com"] {
            assert!(email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_password_rules() {
        assert!(password("123456").is_ok());
        assert_eq!(password("12345").unwrap_err().field, "password");
        assert!(password_confirmation("abcdef", "abcdef").is_ok());
        assert!(password_confirmation("abcdef", "abcdeg").is_err());
    }

    #[test]
    fn test_cpf() {
        assert!(cpf("529.982.247-25").is_ok());
        assert!(cpf("52998224725").is_ok());
        assert!(cpf("529.982.247-24").is_err());
        assert!(cpf("111.111.111-11").is_err());
        assert!(cpf("5299822472").is_err());
        assert!(cpf("529.982.247-2a").is_err());
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("5299"), "5299");
    }

    #[test]
    fn test_card_number_luhn() {
        assert!(card_number("4111 1111 1111 1111").is_ok());
        assert!(card_number("5555555555554444").is_ok());
        assert!(card_number("4111 1111 1111 1112").is_err());
        assert!(card_number("4111").is_err());
        assert!(card_number("4111-1111-1111-1111").is_err());
    }

    #[test]
    fn test_card_expiry() {
        assert!(card_expiry("05/26", today()).is_ok());
        assert!(card_expiry("12/30", today()).is_ok());
        assert_eq!(card_expiry("04/26", today()).unwrap_err().message, "Cartão vencido");
        assert!(card_expiry("13/27", today()).is_err());
        assert!(card_expiry("5/27", today()).is_err());
        assert!(card_expiry("0527", today()).is_err());
    }

    #[test]
    fn test_cvv() {
        assert!(cvv("123").is_ok());
        assert!(cvv("1234").is_ok());
        assert!(cvv("12").is_err());
        assert!(cvv("12a").is_err());
    }

    #[test]
    fn test_username() {
        assert!(username("ana.souza_90").is_ok());
        assert!(username("an").is_err());
        assert!(username("Ana").is_err());
        assert!(username("ana souza").is_err());
        assert!(username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_sign_up_reports_first_failure() {
        assert_eq!(sign_up("", "x", "1", "2").unwrap_err().field, "name");
        assert_eq!(sign_up("Ana", "ana@x.com", "123", "123").unwrap_err().field, "password");
        assert_eq!(
            sign_up("Ana", "ana@x.com", "123456", "654321").unwrap_err().field,
            "password_confirmation"
        );
        assert!(sign_up("Ana", "ana@x.com", "123456", "123456").is_ok());
        assert!(sign_in("ana@x.com", "").is_err());
    }

    #[test]
    fn test_new_event() {
        let mut event = NewEvent {
            title: "Show".to_string(),
            description: None,
            date: "2030-01-01T20:00:00Z".parse().unwrap(),
            location: "Arena".to_string(),
            latitude: None,
            longitude: None,
            price: 0.0,
            category: "Música".to_string(),
            organizer_id: Uuid::nil(),
            image_url: None,
            capacity: None,
        };
        assert!(new_event(&event).is_ok());

        event.latitude = Some(-23.5);
        assert_eq!(new_event(&event).unwrap_err().message, "Informe latitude e longitude");
        event.longitude = Some(-46.6);
        assert!(new_event(&event).is_ok());

        event.price = -1.0;
        assert_eq!(new_event(&event).unwrap_err().field, "price");
        event.price = 10.0;
        event.capacity = Some(0);
        assert_eq!(new_event(&event).unwrap_err().field, "capacity");
    }
}
