//! Callable values: closures built from function literals, and native
//! library functions.

use core::fmt;
use std::rc::Rc;

use crate::evaluator::{CallContext, EvalError};
use crate::parser::Expr;
use crate::scope::Scope;

use super::Value;

/// Signature expected for Rust functions exposed through the library root.
///
/// The context lets a function invoke closure arguments through the
/// evaluator that called it.
///
/// # Example
///
/// ```ignore
/// fn double(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
///     let n = args::number(args, 0, "std.double")?;
///     Ok(Value::Number(n * 2.0))
/// }
/// ```
pub type NativeFn = fn(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError>;

struct NativeInner {
    name: String,
    func: NativeFn,
}

/// A native function with a stable identity.
///
/// Clones share the same allocation, and identity is what the call
/// whitelist checks: a function counts as a library function only if it is
/// the very allocation reachable from the frozen root.
#[derive(Clone)]
pub struct NativeFunction(Rc<NativeInner>);

impl NativeFunction {
    pub fn new(name: impl Into<String>, func: NativeFn) -> Self {
        Self(Rc::new(NativeInner {
            name: name.into(),
            func,
        }))
    }

    /// Dotted name used in messages, e.g. `std.math.abs`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn call(
        &self,
        ctx: &mut CallContext<'_, '_>,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        (self.0.func)(ctx, args)
    }

    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.0.name)
    }
}

/// A function literal paired with the scope it was defined in.
pub struct Closure {
    pub params: Vec<String>,
    pub body: Rc<Expr>,
    pub scope: Rc<Scope>,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure(({}) => {})", self.params.join(", "), self.body)
    }
}
