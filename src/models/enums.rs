//! Shared domain enums, stored as their Spanish display text

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements the sqlx TEXT codec for an enum with `as_str`/`FromStr`.
macro_rules! impl_text_codec {
    ($name:ident) => {
        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                let s: String = self.as_str().to_string();
                <String as Encode<Postgres>>::encode(s, buf)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// AccountStatus
// ---------------------------------------------------------------------------

/// Account status (usuarios.estado). Informational only; login is gated
/// by `is_active`, not by this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AccountStatus {
    Activo,
    Suspendido,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Activo => "Activo",
            AccountStatus::Suspendido => "Suspendido",
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Activo" => Ok(AccountStatus::Activo),
            "Suspendido" => Ok(AccountStatus::Suspendido),
            _ => Err(format!("Invalid account status: {}", s)),
        }
    }
}

impl_text_codec!(AccountStatus);

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan status (prestamos.estado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    Activo,
    Devuelto,
    Vencido,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Activo => "Activo",
            LoanStatus::Devuelto => "Devuelto",
            LoanStatus::Vencido => "Vencido",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Activo" => Ok(LoanStatus::Activo),
            "Devuelto" => Ok(LoanStatus::Devuelto),
            "Vencido" => Ok(LoanStatus::Vencido),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

impl_text_codec!(LoanStatus);

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Reservation status (reservas.estado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReservationStatus {
    Pendiente,
    Disponible,
    Cancelada,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pendiente => "Pendiente",
            ReservationStatus::Disponible => "Disponible",
            ReservationStatus::Cancelada => "Cancelada",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(ReservationStatus::Pendiente),
            "Disponible" => Ok(ReservationStatus::Disponible),
            "Cancelada" => Ok(ReservationStatus::Cancelada),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

impl_text_codec!(ReservationStatus);

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Book availability. Never stored: derived per request from the loans
/// referencing the book (`Prestado` iff any loan is Activo or Vencido).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Availability {
    Prestado,
    Disponible,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Prestado => "Prestado",
            Availability::Disponible => "Disponible",
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prestado" => Ok(Availability::Prestado),
            "Disponible" => Ok(Availability::Disponible),
            _ => Err(format!("Invalid availability: {}", s)),
        }
    }
}

impl_text_codec!(Availability);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_round_trip_through_their_text() {
        assert_eq!("Activo".parse::<LoanStatus>().unwrap(), LoanStatus::Activo);
        assert_eq!(LoanStatus::Devuelto.as_str(), "Devuelto");
        assert_eq!(
            "Vencido".parse::<LoanStatus>().unwrap().as_str(),
            "Vencido"
        );
        assert_eq!(
            "Pendiente".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Pendiente
        );
        assert_eq!(
            "Suspendido".parse::<AccountStatus>().unwrap(),
            AccountStatus::Suspendido
        );
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert!("activo".parse::<LoanStatus>().is_err());
        assert!("Retrasado".parse::<LoanStatus>().is_err());
        assert!("".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn statuses_serialize_as_bare_text() {
        assert_eq!(
            serde_json::to_value(Availability::Prestado).unwrap(),
            serde_json::json!("Prestado")
        );
        assert_eq!(
            serde_json::from_value::<LoanStatus>(serde_json::json!("Devuelto")).unwrap(),
            LoanStatus::Devuelto
        );
    }
}
