//! Typed coercion of raw configuration strings.

/// A type a configuration string can be coerced into.
pub trait ConfigValue: Sized {
    /// `None` when `raw` is not a valid value of this type.
    fn parse_config(raw: &str) -> Option<Self>;
}

macro_rules! from_str_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                fn parse_config(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

from_str_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl ConfigValue for bool {
    fn parse_config(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl ConfigValue for String {
    fn parse_config(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

/// Implement [`ConfigValue`] for a fieldless enum, matching variant names
/// case-insensitively.
///
/// ```
/// use pipeline_router::config::ConfigValue;
///
/// #[derive(Debug, PartialEq)]
/// enum Mode { Fast, Safe }
///
/// pipeline_router::config_enum!(Mode { Fast, Safe });
///
/// assert_eq!(Mode::parse_config("safe"), Some(Mode::Safe));
/// assert_eq!(Mode::parse_config("unknown"), None);
/// ```
#[macro_export]
macro_rules! config_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::config::ConfigValue for $ty {
            fn parse_config(raw: &str) -> ::std::option::Option<Self> {
                let raw = raw.trim();
                $(
                    if raw.eq_ignore_ascii_case(stringify!($variant)) {
                        return ::std::option::Option::Some($ty::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(i32::parse_config("42"), Some(42));
        assert_eq!(i32::parse_config(" -7 "), Some(-7));
        assert_eq!(u16::parse_config("70000"), None);
        assert_eq!(f64::parse_config("2.5"), Some(2.5));
        assert_eq!(i64::parse_config("abc"), None);
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        assert_eq!(bool::parse_config("true"), Some(true));
        assert_eq!(bool::parse_config("False"), Some(false));
        assert_eq!(bool::parse_config("TRUE"), Some(true));
        assert_eq!(bool::parse_config("yes"), None);
    }
}
