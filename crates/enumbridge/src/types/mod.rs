pub mod enum_type;
pub mod function;
pub mod scope;

pub use enum_type::{ConstructorKind, EnumDef, EnumOptions, EnumType};
pub use function::{NativeArgs, NativeFunction, NativeValue, ParamType, Signature};
pub use scope::Scope;

/// Writes a single-quoted host string literal, escaping quotes, backslashes and control characters.
pub(crate) fn str_repr_fmt(s: &str, f: &mut impl std::fmt::Write) -> std::fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}
