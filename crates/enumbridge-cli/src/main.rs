use std::{
    env,
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use enumbridge::{
    BindingTracer, EnumProjection, ExcType, Exception, Registry, RunResult, ScopeId, StderrTracer, Value, load_file,
};

const USAGE: &str = "usage: enumbridge [--trace] <bindings.json> [expression]";

fn main() -> ExitCode {
    let mut trace = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--trace" => trace = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ => positional.push(arg),
        }
    }
    let (file_path, expression) = match positional.as_slice() {
        [file_path] => (file_path, None),
        [file_path, expression] => (file_path, Some(expression.as_str())),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let registry = match load_file(file_path) {
        Ok(builder) => builder.finish(),
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let Some(expression) = expression else {
        return match print_bindings(&registry, &mut io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        };
    };

    let registry = Arc::new(registry);
    if trace {
        evaluate(EnumProjection::with_tracer(registry, StderrTracer::new()), expression)
    } else {
        evaluate(EnumProjection::new(registry), expression)
    }
}

fn evaluate<Tr: BindingTracer>(mut projection: EnumProjection<Tr>, expression: &str) -> ExitCode {
    let call = match parse_expression(expression) {
        Ok(call) => call,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match run(&mut projection, &call) {
        Ok(value) => {
            println!("{}", projection.repr(&value));
            ExitCode::SUCCESS
        }
        Err(exc) => {
            eprintln!("{exc}");
            ExitCode::FAILURE
        }
    }
}

fn run<Tr: BindingTracer>(projection: &mut EnumProjection<Tr>, call: &Call) -> RunResult<Value> {
    let mut args = Vec::new();
    for arg in call.args.as_deref().unwrap_or_default() {
        args.push(match arg {
            Arg::Int(i) => Value::Int(*i),
            Arg::Str(s) => Value::from(s.as_str()),
            Arg::Path(path) => projection.resolve(path)?,
        });
    }
    if call.target == "int" && call.args.is_some() {
        let [arg] = args.as_slice() else {
            return Err(Exception::new(
                ExcType::TypeError,
                format!("int() takes exactly one argument ({} given)", args.len()),
            ));
        };
        return projection.int(arg).map(Value::Int);
    }
    let target = projection.resolve(&call.target)?;
    match call.args {
        Some(_) => projection.call(&target, args),
        None => Ok(target),
    }
}

/// Writes every scope, enum and member, indented by nesting depth.
fn print_bindings(registry: &Registry, out: &mut impl Write) -> io::Result<()> {
    for scope_id in registry.root_scopes() {
        print_scope(registry, scope_id, 0, out)?;
    }
    Ok(())
}

fn print_scope(registry: &Registry, scope_id: ScopeId, depth: usize, out: &mut impl Write) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let scope = registry.scope(scope_id);
    writeln!(out, "{indent}{}", scope.qualname())?;
    for type_id in scope.enum_types() {
        let enum_type = registry.enum_type(type_id);
        let mut flags = Vec::new();
        if enum_type.is_scoped() {
            flags.push("scoped");
        }
        if enum_type.is_extensible() {
            flags.push("extensible");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        writeln!(out, "{indent}  enum {}{flags}", registry.enum_name(type_id))?;
        let default = registry.default_member_name(type_id);
        for (name, value) in registry.members(type_id) {
            let marker = if name == default { " (default)" } else { "" };
            writeln!(out, "{indent}    {name} = {value}{marker}")?;
        }
    }
    for child in scope.child_scopes() {
        print_scope(registry, child, depth + 1, out)?;
    }
    Ok(())
}

/// `target` or `target(arg, ...)`; `args` is `None` when there are no parentheses.
#[derive(Debug, PartialEq)]
struct Call {
    target: String,
    args: Option<Vec<Arg>>,
}

#[derive(Debug, PartialEq)]
enum Arg {
    Int(i64),
    Str(String),
    Path(String),
}

fn parse_expression(expression: &str) -> Result<Call, String> {
    let expression = expression.trim();
    let Some((target, rest)) = expression.split_once('(') else {
        return Ok(Call {
            target: expression.to_owned(),
            args: None,
        });
    };
    let inner = rest
        .strip_suffix(')')
        .ok_or_else(|| format!("expected ')' at the end of {expression:?}"))?;
    let args = split_args(inner)?
        .into_iter()
        .map(|token| parse_arg(&token))
        .collect::<Result<_, _>>()?;
    Ok(Call {
        target: target.trim().to_owned(),
        args: Some(args),
    })
}

/// Splits on commas outside quotes.
fn split_args(inner: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    for c in inner.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => tokens.push(std::mem::take(&mut current)),
            (None, c) => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(format!("unterminated string in {inner:?}"));
    }
    if !current.trim().is_empty() || !tokens.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_arg(token: &str) -> Result<Arg, String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("empty argument".to_owned());
    }
    for q in ['\'', '"'] {
        if let Some(s) = token.strip_prefix(q).and_then(|t| t.strip_suffix(q)) {
            return Ok(Arg::Str(s.to_owned()));
        }
    }
    if let Ok(i) = token.parse::<i64>() {
        return Ok(Arg::Int(i));
    }
    if token.split('.').all(is_identifier) {
        return Ok(Arg::Path(token.to_owned()));
    }
    Err(format!("cannot parse argument {token:?}"))
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}
