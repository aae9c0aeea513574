//! Macros to reduce boilerplate in the codebase

/// Generate Display and FromStr implementations for a unit-only enum.
///
/// Parsing is case-insensitive; unknown input maps to `$error_variant`.
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     ProjectStatus,
///     SafwaError::InvalidStatus,
///     {
///         Upcoming => "upcoming",
///         Ongoing => "ongoing",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::SafwaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}

#[cfg(test)]
mod test {
    use crate::error::SafwaError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Shade {
        Light,
        Dark,
    }

    enum_display_fromstr!(Shade, SafwaError::Other, { Light => "light", Dark => "dark" });

    #[test]
    fn test_display() {
        assert_eq!(Shade::Light.to_string(), "light");
        assert_eq!(Shade::Dark.to_string(), "dark");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(" DARK ".parse::<Shade>().unwrap(), Shade::Dark);
        assert!("dim".parse::<Shade>().is_err());
    }
}
