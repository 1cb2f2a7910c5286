//! Function table.
//!
//! Templates call functions by name. Each function declares an [`Arity`] and
//! is invoked with an explicit host context `C` plus its evaluated
//! arguments, so the host decides what state functions may touch.
//!
//! ```rust
//! use tinted_template::{from_fn, Arity, FuncMap, Value};
//!
//! let mut funcs: FuncMap<u32> = FuncMap::with_builtins();
//! funcs.insert(
//!     "tick",
//!     from_fn(Arity::Exact(0), |count: &mut u32, _args: &[Value]| {
//!         *count += 1;
//!         Ok(Value::from(*count))
//!     }),
//! );
//! assert!(funcs.contains("tick"));
//! assert!(funcs.contains("eq"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FuncError;
use crate::value::{is_truthy, kind_of, values_equal, write_value};

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// This many arguments or more.
    AtLeast(usize),
}

impl Arity {
    /// Whether a call with `count` arguments is allowed.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Where a short-circuiting function stops evaluating its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCircuit {
    /// Stop at the first falsy argument (`and`).
    OnFalsy,
    /// Stop at the first truthy argument (`or`).
    OnTruthy,
}

impl ShortCircuit {
    /// Whether evaluation stops at `value`.
    pub fn stops_at(self, value: &Value) -> bool {
        match self {
            ShortCircuit::OnFalsy => !is_truthy(value),
            ShortCircuit::OnTruthy => is_truthy(value),
        }
    }

    /// The argument a fully evaluated call picks: the first one evaluation
    /// stops at, or the last.
    pub fn pick(self, args: &[Value]) -> Value {
        args.iter()
            .find(|v| self.stops_at(v))
            .or_else(|| args.last())
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// A callable registered in a [`FuncMap`].
///
/// `C` is the host context. It is passed by mutable reference on every call
/// so functions never need to capture shared state.
pub trait Function<C>: Send + Sync {
    /// Arguments this function accepts. Checked before every call.
    fn arity(&self) -> Arity;

    /// Invokes the function.
    fn call(&self, ctx: &mut C, args: &[Value]) -> Result<Value, FuncError>;

    /// When set, templates evaluate the arguments one at a time and stop
    /// at the first one that decides the result. [`call`](Self::call) is
    /// not used in that case; later arguments are never evaluated.
    fn short_circuit(&self) -> Option<ShortCircuit> {
        None
    }
}

/// `and` / `or`.
#[derive(Debug, Clone, Copy)]
struct Logic(ShortCircuit);

impl<C> Function<C> for Logic {
    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn call(&self, _ctx: &mut C, args: &[Value]) -> Result<Value, FuncError> {
        Ok(self.0.pick(args))
    }

    fn short_circuit(&self) -> Option<ShortCircuit> {
        Some(self.0)
    }
}

/// A [`Function`] backed by a closure. Built with [`from_fn`].
pub struct FnFunction<F> {
    arity: Arity,
    f: F,
}

impl<F> fmt::Debug for FnFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFunction")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl<C, F> Function<C> for FnFunction<F>
where
    F: Fn(&mut C, &[Value]) -> Result<Value, FuncError> + Send + Sync,
{
    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(&self, ctx: &mut C, args: &[Value]) -> Result<Value, FuncError> {
        (self.f)(ctx, args)
    }
}

/// Wraps a closure as a [`Function`] with the given arity.
pub fn from_fn<C, F>(arity: Arity, f: F) -> FnFunction<F>
where
    F: Fn(&mut C, &[Value]) -> Result<Value, FuncError> + Send + Sync,
{
    FnFunction { arity, f }
}

/// Named functions available to a template.
///
/// Registering a name that already exists replaces the earlier entry.
pub struct FuncMap<C> {
    entries: BTreeMap<String, Arc<dyn Function<C>>>,
}

impl<C> FuncMap<C> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Creates a table holding the engine builtins
    /// (`and`, `eq`, `len`, `ne`, `not`, `or`, `print`).
    pub fn with_builtins() -> Self
    where
        C: 'static,
    {
        let mut map = Self::new();
        register_builtins(&mut map);
        map
    }

    /// Registers `function` under `name`, replacing any earlier entry.
    pub fn insert<N, F>(&mut self, name: N, function: F) -> &mut Self
    where
        N: Into<String>,
        F: Function<C> + 'static,
    {
        self.entries.insert(name.into(), Arc::new(function));
        self
    }

    /// Registers an already shared function under `name`.
    pub fn insert_shared<N: Into<String>>(
        &mut self,
        name: N,
        function: Arc<dyn Function<C>>,
    ) -> &mut Self {
        self.entries.insert(name.into(), function);
        self
    }

    /// Builder-style registration of a closure.
    pub fn add<N, F>(mut self, name: N, arity: Arity, f: F) -> Self
    where
        N: Into<String>,
        F: Fn(&mut C, &[Value]) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        self.insert(name, from_fn(arity, f));
        self
    }

    /// Copies every entry of `other` into this table. Entries from `other` win.
    pub fn extend(&mut self, other: &FuncMap<C>) {
        for (name, function) in &other.entries {
            self.entries.insert(name.clone(), Arc::clone(function));
        }
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Function<C>>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for FuncMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for FuncMap<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> fmt::Debug for FuncMap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Returns the integer argument at `index`.
pub fn int_arg(args: &[Value], index: usize) -> Result<i64, FuncError> {
    let value = arg(args, index)?;
    value.as_i64().ok_or(FuncError::ArgType {
        index,
        expected: "integer",
        found: kind_of(value),
    })
}

/// Returns the string argument at `index`.
pub fn str_arg(args: &[Value], index: usize) -> Result<&str, FuncError> {
    let value = arg(args, index)?;
    value.as_str().ok_or(FuncError::ArgType {
        index,
        expected: "string",
        found: kind_of(value),
    })
}

fn arg(args: &[Value], index: usize) -> Result<&Value, FuncError> {
    args.get(index).ok_or_else(|| FuncError::ArgValue {
        index,
        message: "missing".to_string(),
    })
}

fn register_builtins<C: 'static>(map: &mut FuncMap<C>) {
    map.insert(
        "not",
        from_fn(Arity::Exact(1), |_: &mut C, args: &[Value]| {
            Ok(Value::Bool(!is_truthy(arg(args, 0)?)))
        }),
    );

    map.insert("and", Logic(ShortCircuit::OnFalsy));
    map.insert("or", Logic(ShortCircuit::OnTruthy));

    map.insert(
        "eq",
        from_fn(Arity::AtLeast(2), |_: &mut C, args: &[Value]| {
            let first = arg(args, 0)?;
            arg(args, 1)?;
            Ok(Value::Bool(args[1..].iter().any(|v| values_equal(first, v))))
        }),
    );

    map.insert(
        "ne",
        from_fn(Arity::Exact(2), |_: &mut C, args: &[Value]| {
            Ok(Value::Bool(!values_equal(arg(args, 0)?, arg(args, 1)?)))
        }),
    );

    map.insert(
        "len",
        from_fn(Arity::Exact(1), |_: &mut C, args: &[Value]| {
            let len = match arg(args, 0)? {
                Value::String(s) => s.len(),
                Value::Array(a) => a.len(),
                Value::Object(o) => o.len(),
                other => {
                    return Err(FuncError::ArgType {
                        index: 0,
                        expected: "string, array or map",
                        found: kind_of(other),
                    })
                }
            };
            Ok(Value::from(len))
        }),
    );

    map.insert(
        "print",
        from_fn(Arity::AtLeast(0), |_: &mut C, args: &[Value]| {
            let mut out = String::new();
            let mut prev_string = true;
            for (i, value) in args.iter().enumerate() {
                let is_string = value.is_string();
                if i > 0 && !is_string && !prev_string {
                    out.push(' ');
                }
                write_value(&mut out, value);
                prev_string = is_string;
            }
            Ok(Value::String(out))
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(map: &FuncMap<()>, name: &str, args: &[Value]) -> Result<Value, FuncError> {
        let function = map.get(name).expect("function registered");
        assert!(function.arity().accepts(args.len()), "arity for {}", name);
        function.call(&mut (), args)
    }

    #[test]
    fn arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(1));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2");
    }

    #[test]
    fn later_insert_replaces_earlier() {
        let mut map: FuncMap<()> = FuncMap::new();
        map.insert("x", from_fn(Arity::Exact(0), |_: &mut (), _: &[Value]| Ok(json!(1))));
        map.insert("x", from_fn(Arity::Exact(0), |_: &mut (), _: &[Value]| Ok(json!(2))));
        assert_eq!(map.len(), 1);
        assert_eq!(call(&map, "x", &[]).unwrap(), json!(2));
    }

    #[test]
    fn extend_prefers_other() {
        let base: FuncMap<()> = FuncMap::with_builtins();
        let overrides = FuncMap::new().add("not", Arity::Exact(1), |_: &mut (), _: &[Value]| {
            Ok(json!("shadowed"))
        });

        let mut merged = base.clone();
        merged.extend(&overrides);
        assert_eq!(call(&merged, "not", &[json!(true)]).unwrap(), json!("shadowed"));
        assert_eq!(call(&base, "not", &[json!(true)]).unwrap(), json!(false));
    }

    #[test]
    fn context_is_passed_explicitly() {
        let counter = from_fn(Arity::Exact(0), |n: &mut u32, _: &[Value]| {
            *n += 1;
            Ok(Value::Null)
        });
        let mut n = 0;
        counter.call(&mut n, &[]).unwrap();
        counter.call(&mut n, &[]).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn and_or_pick_operands() {
        let map = FuncMap::with_builtins();
        assert_eq!(call(&map, "and", &[json!(1), json!(0), json!(2)]).unwrap(), json!(0));
        assert_eq!(call(&map, "and", &[json!(1), json!(2)]).unwrap(), json!(2));
        assert_eq!(call(&map, "or", &[json!(""), json!("x")]).unwrap(), json!("x"));
        assert_eq!(call(&map, "or", &[json!(""), json!(0)]).unwrap(), json!(0));
    }

    #[test]
    fn and_or_declare_short_circuit() {
        let map: FuncMap<()> = FuncMap::with_builtins();
        assert_eq!(map.get("and").unwrap().short_circuit(), Some(ShortCircuit::OnFalsy));
        assert_eq!(map.get("or").unwrap().short_circuit(), Some(ShortCircuit::OnTruthy));
        assert_eq!(map.get("not").unwrap().short_circuit(), None);
    }

    #[test]
    fn builtins_reject_missing_arguments() {
        let map: FuncMap<()> = FuncMap::with_builtins();
        for (name, args) in [
            ("not", vec![]),
            ("len", vec![]),
            ("ne", vec![json!(1)]),
            ("eq", vec![json!(1)]),
            ("eq", vec![]),
        ] {
            let err = map.get(name).unwrap().call(&mut (), &args).unwrap_err();
            assert!(matches!(err, FuncError::ArgValue { .. }), "{} {:?}", name, args);
        }
        assert_eq!(map.get("and").unwrap().call(&mut (), &[]).unwrap(), Value::Null);
    }

    #[test]
    fn eq_matches_any_later_operand() {
        let map = FuncMap::with_builtins();
        assert_eq!(call(&map, "eq", &[json!(2), json!(1), json!(2)]).unwrap(), json!(true));
        assert_eq!(call(&map, "eq", &[json!("a"), json!("b")]).unwrap(), json!(false));
        assert_eq!(call(&map, "ne", &[json!("a"), json!("b")]).unwrap(), json!(true));
    }

    #[test]
    fn len_rejects_numbers() {
        let map = FuncMap::with_builtins();
        assert_eq!(call(&map, "len", &[json!("abc")]).unwrap(), json!(3));
        assert_eq!(call(&map, "len", &[json!([1, 2])]).unwrap(), json!(2));
        assert!(matches!(
            call(&map, "len", &[json!(3)]),
            Err(FuncError::ArgType { found: "integer", .. })
        ));
    }

    #[test]
    fn print_spaces_non_string_operands() {
        let map = FuncMap::with_builtins();
        assert_eq!(
            call(&map, "print", &[json!(1), json!(2), json!("a"), json!(3)]).unwrap(),
            json!("1 2a3")
        );
        assert_eq!(call(&map, "print", &[]).unwrap(), json!(""));
    }

    #[test]
    fn argument_helpers() {
        let args = [json!(7), json!("x")];
        assert_eq!(int_arg(&args, 0).unwrap(), 7);
        assert_eq!(str_arg(&args, 1).unwrap(), "x");
        assert!(matches!(
            int_arg(&args, 1),
            Err(FuncError::ArgType { expected: "integer", found: "string", .. })
        ));
        assert!(matches!(str_arg(&args, 2), Err(FuncError::ArgValue { index: 2, .. })));
    }
}
