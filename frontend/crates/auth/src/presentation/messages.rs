//! User-Facing Messages
//!
//! One localized message per [`ErrorKind`]. Translation happens here and
//! nowhere else.

use std::str::FromStr;

use kernel::error::kind::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "es-co" | "es_co" => Ok(Locale::Es),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

pub fn message_for(kind: ErrorKind, locale: Locale) -> &'static str {
    use ErrorKind::*;
    match (locale, kind) {
        (Locale::Es, InvalidCredentials) => "Correo o contraseña incorrectos.",
        (Locale::Es, UserNotConfirmed) => {
            "Tu cuenta aún no está confirmada. Revisa tu correo e ingresa el código."
        }
        (Locale::Es, InvalidCode) => "El código de confirmación no es válido.",
        (Locale::Es, CodeExpired) => "El código de confirmación expiró. Solicita uno nuevo.",
        (Locale::Es, NoSession) => "Tu sesión expiró. Inicia sesión nuevamente.",
        (Locale::Es, NetworkUnavailable) => "No hay conexión. Intenta de nuevo en un momento.",
        (Locale::Es, InvalidInput) => "Revisa los datos ingresados.",
        (Locale::Es, Unknown) => "Ocurrió un error inesperado. Intenta de nuevo.",

        (Locale::En, InvalidCredentials) => "Incorrect email or password.",
        (Locale::En, UserNotConfirmed) => {
            "Your account is not confirmed yet. Check your email for the code."
        }
        (Locale::En, InvalidCode) => "The confirmation code is not valid.",
        (Locale::En, CodeExpired) => "The confirmation code has expired. Request a new one.",
        (Locale::En, NoSession) => "Your session has expired. Please sign in again.",
        (Locale::En, NetworkUnavailable) => "No connection. Please try again shortly.",
        (Locale::En, InvalidInput) => "Please check the information you entered.",
        (Locale::En, Unknown) => "Something went wrong. Please try again.",
    }
}

/// Extra line for failures worth retrying as-is
pub fn retry_hint(kind: ErrorKind, locale: Locale) -> Option<&'static str> {
    if !kind.is_transient() {
        return None;
    }
    Some(match locale {
        Locale::Es => "Puedes repetir el mismo comando.",
        Locale::En => "You can repeat the same command.",
    })
}
