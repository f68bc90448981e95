//! Rust-side typing of projected enums.
//!
//! On the host side an enum argument is checked at runtime (see
//! [`ParamType::Enum`](crate::ParamType::Enum)); on the Rust side the same rule
//! is enforced by the type system. A native function written against
//! `InValue` simply cannot be handed an `i64`, and the only way from an integer
//! to a variant is the explicit, fallible [`NativeEnum::from_raw`].

/// A Rust enum that can be projected into the host.
///
/// Usually implemented with [`native_enum!`](crate::native_enum) rather than by hand.
pub trait NativeEnum: Copy + Send + Sync + 'static {
    /// Host-visible type name (without the enclosing scope).
    const NAME: &'static str;
    /// `(name, value)` pairs in declaration order.
    const MEMBERS: &'static [(&'static str, i64)];

    fn to_raw(self) -> i64;

    /// Returns the first variant declared with `raw`, or `None` if no variant matches.
    fn from_raw(raw: i64) -> Option<Self>;
}

/// Declares a Rust enum together with its [`NativeEnum`] implementation.
///
/// ```
/// enumbridge::native_enum! {
///     #[derive(Debug, PartialEq, Eq)]
///     pub enum InValue {
///         ZeroIn = 0,
///         OneIn = 1,
///         TwoIn = 2,
///     }
/// }
///
/// use enumbridge::NativeEnum;
/// assert_eq!(InValue::from_raw(2), Some(InValue::TwoIn));
/// assert_eq!(InValue::OneIn.to_raw(), 1);
/// assert_eq!(InValue::NAME, "InValue");
/// ```
#[macro_export]
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(::core::clone::Clone, ::core::marker::Copy)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::NativeEnum for $name {
            const NAME: &'static str = stringify!($name);
            const MEMBERS: &'static [(&'static str, i64)] = &[$((stringify!($variant), $value)),+];

            fn to_raw(self) -> i64 {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            fn from_raw(raw: i64) -> ::core::option::Option<Self> {
                $(
                    if raw == $value {
                        return ::core::option::Option::Some(Self::$variant);
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::NativeEnum;

    crate::native_enum! {
        #[derive(Debug, PartialEq, Eq)]
        enum Option {
            None = 0,
            RandomNumber = 1,
            UnixTime = 2,
        }
    }

    crate::native_enum! {
        #[derive(Debug, PartialEq, Eq)]
        enum Aliased {
            First = 5,
            Second = 5,
            Sparse = -100,
        }
    }

    #[test]
    fn members_keep_declaration_order() {
        assert_eq!(
            Option::MEMBERS,
            &[("None", 0), ("RandomNumber", 1), ("UnixTime", 2)]
        );
        assert_eq!(Option::NAME, "Option");
    }

    #[test]
    fn from_raw_is_explicit_and_fallible() {
        assert_eq!(Option::from_raw(0), Some(Option::None));
        assert_eq!(Option::from_raw(3), None);
        assert_eq!(Option::UnixTime.to_raw(), 2);
    }

    #[test]
    fn aliases_resolve_to_first_variant() {
        assert_eq!(Aliased::from_raw(5), Some(Aliased::First));
        assert_eq!(Aliased::Second.to_raw(), 5);
        assert_eq!(Aliased::from_raw(-100), Some(Aliased::Sparse));
    }
}
