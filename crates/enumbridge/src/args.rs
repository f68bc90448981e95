use crate::{
    exception::{ExcType, RunResult},
    value::Value,
};

/// Positional arguments for a host-level call.
///
/// Uses specific variants for the common cases (0-2 arguments): enum
/// constructors take at most one argument and most native functions take one
/// or two, so the `Many` vector is only allocated for wider calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ArgValues {
    #[default]
    Empty,
    One(Value),
    Two(Value, Value),
    Many(Vec<Value>),
}

impl ArgValues {
    /// Number of positional arguments.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Two(..) => 2,
            Self::Many(args) => args.len(),
        }
    }

    /// Checks that zero arguments were passed.
    pub fn check_zero_args(self, name: &str) -> RunResult<()> {
        match self {
            Self::Empty => Ok(()),
            other => Err(ExcType::type_error_no_args(name, other.count())),
        }
    }

    /// Checks that exactly one positional argument was passed, returning it.
    pub fn get_one_arg(self, name: &str) -> RunResult<Value> {
        match self {
            Self::One(a) => Ok(a),
            other => Err(ExcType::type_error_arg_count(name, 1, other.count())),
        }
    }

    /// Checks that zero or one argument was passed, returning the optional value.
    pub fn get_zero_one_arg(self, name: &str) -> RunResult<Option<Value>> {
        match self {
            Self::Empty => Ok(None),
            Self::One(a) => Ok(Some(a)),
            other => Err(ExcType::type_error_at_most(name, 1, other.count())),
        }
    }

    /// Borrows the arguments as a slice-like iterator, in call order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        let (head, tail): (&[Value], &[Value]) = match self {
            Self::Empty => (&[], &[]),
            Self::One(a) => (std::slice::from_ref(a), &[]),
            Self::Two(a, b) => (std::slice::from_ref(a), std::slice::from_ref(b)),
            Self::Many(args) => (args.as_slice(), &[]),
        };
        head.iter().chain(tail)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(a) => vec![a],
            Self::Two(a, b) => vec![a, b],
            Self::Many(args) => args,
        }
    }
}

impl From<Vec<Value>> for ArgValues {
    fn from(mut args: Vec<Value>) -> Self {
        match args.len() {
            0 => Self::Empty,
            1 => Self::One(args.remove(0)),
            2 => {
                let b = args.remove(1);
                let a = args.remove(0);
                Self::Two(a, b)
            }
            _ => Self::Many(args),
        }
    }
}

impl From<Value> for ArgValues {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<()> for ArgValues {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl FromIterator<Value> for ArgValues {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}
