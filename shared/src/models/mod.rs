//! Data models
//!
//! Shared between aby-server and any Rust client of the REST API.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps are UTC milliseconds.

/// A string did not name any variant of a status enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a snake_case wire enum that maps onto a Postgres ENUM type.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $pg:tt {
            $( $(#[$vmeta:meta])* $variant:ident => $s:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        #[cfg_attr(feature = "db", derive(sqlx::Type))]
        #[cfg_attr(feature = "db", sqlx(type_name = $pg, rename_all = "snake_case"))]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)+
                    _ => Err($crate::models::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

pub mod activity;
pub mod admin;
pub mod applicant;
pub mod client;
pub mod dashboard;
pub mod department;
pub mod job;
pub mod national_figure;

pub use activity::*;
pub use admin::*;
pub use applicant::*;
pub use client::*;
pub use dashboard::*;
pub use department::*;
pub use job::*;
pub use national_figure::*;
