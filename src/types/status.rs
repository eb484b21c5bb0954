use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Declares a closed set of values that travel as fixed strings, both in JSON
/// bodies and in TEXT columns.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| format!("invalid {}: '{s}'", stringify!($name)))
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                Self::parse(text).ok_or_else(|| {
                    FromSqlError::Other(format!("invalid {}: '{text}'", stringify!($name)).into())
                })
            }
        }
    };
}

text_enum! {
    /// Whether a device or ROM is listed on the public site.
    Availability {
        Active => "Active",
        Inactive => "Inactive",
    }
}

text_enum! {
    /// The flavour of a ROM build.
    RomType {
        SleepOs => "SleepOS",
        Aosp => "AOSP",
        Port => "Port",
    }
}

text_enum! {
    /// Review state of a team application. Any state may move to any other.
    ApplicationStatus {
        Pending => "Pending",
        Reviewed => "Reviewed",
        Accepted => "Accepted",
        Rejected => "Rejected",
    }
}

text_enum! {
    ChangelogStatus {
        Draft => "Draft",
        Published => "Published",
    }
}

text_enum! {
    /// Back-office role of a user account.
    Role {
        Admin => "admin",
        Moderator => "moderator",
        User => "user",
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::Active
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for ChangelogStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl Role {
    /// Only admins may use the back-office write routes.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}
