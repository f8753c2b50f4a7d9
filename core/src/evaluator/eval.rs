//! Core evaluation logic.

use std::rc::Rc;

use crate::api::EngineOptions;
use crate::evaluator::{EvalError, Library, ResourceExceeded, member, operators};
use crate::parser::{BinaryOp, Expr, UnaryOp};
use crate::scope::Scope;
use crate::values::{Closure, Record, Value};
use crate::{STDLIB_ROOT, is_banned_name};

/// Tree-walking evaluator.
///
/// One evaluator lives for a whole run. Depth is tracked per nested
/// expression or call; the step counter is never reset, so the budget in
/// [`EngineOptions::max_steps`] covers every node of the run.
pub struct Evaluator<'a> {
    library: &'a Library,
    options: EngineOptions,
    depth: usize,
    steps: u64,
}

impl<'a> Evaluator<'a> {
    pub fn new(library: &'a Library, options: EngineOptions) -> Self {
        Self {
            library,
            options,
            depth: 0,
            steps: 0,
        }
    }

    pub fn library(&self) -> &'a Library {
        self.library
    }

    /// Steps consumed so far in this run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Account for `n` units of work.
    pub(crate) fn charge(&mut self, n: usize) -> Result<(), EvalError> {
        self.steps = self.steps.saturating_add(n as u64);
        if self.steps > self.options.max_steps {
            return Err(ResourceExceeded::StepLimit {
                max_steps: self.options.max_steps,
            }
            .into());
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        if self.depth >= self.options.max_depth {
            return Err(ResourceExceeded::StackOverflow {
                depth: self.depth,
                max_depth: self.options.max_depth,
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    /// Evaluate an expression in `scope`.
    pub fn eval(&mut self, expr: &Expr, scope: &Rc<Scope>) -> Result<Value, EvalError> {
        self.enter()?;
        let result = self.charge(1).and_then(|()| self.eval_inner(expr, scope));
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expr, scope: &Rc<Scope>) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),

            Expr::Ident(name) => match scope.lookup(name) {
                Some(Value::Error(sentinel)) => Err(EvalError::Upstream {
                    node: sentinel.failed_node.clone(),
                    via: name.clone(),
                }),
                Some(value) => Ok(value.clone()),
                None => Err(EvalError::UnknownIdentifier { name: name.clone() }),
            },

            Expr::Unary { op, operand } => {
                let value = self.eval(operand, scope)?;
                match op {
                    UnaryOp::Neg => operators::negate(self, &value),
                    UnaryOp::Not => Ok(Value::Boolean(!expect_bool("!", &value)?)),
                }
            }

            Expr::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => {
                // Short-circuit, but both sides must still be booleans when read.
                let left = expect_bool(op.symbol(), &self.eval(left, scope)?)?;
                match (op, left) {
                    (BinaryOp::And, false) => Ok(Value::Boolean(false)),
                    (BinaryOp::Or, true) => Ok(Value::Boolean(true)),
                    _ => {
                        let right = self.eval(right, scope)?;
                        Ok(Value::Boolean(expect_bool(op.symbol(), &right)?))
                    }
                }
            }

            Expr::Binary { op, left, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                operators::binary(self, *op, &left, &right)
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if expect_bool("?:", &self.eval(test, scope)?)? {
                    self.eval(consequent, scope)
                } else {
                    self.eval(alternate, scope)
                }
            }

            Expr::Member { object, property } => {
                let object = self.eval(object, scope)?;
                member::access(self, &object, property)
            }

            Expr::Call { callee, args } => self.eval_call(callee, args, scope),

            Expr::Function { params, body } => Ok(Value::Closure(Rc::new(Closure {
                params: params.clone(),
                body: body.clone(),
                scope: scope.clone(),
            }))),

            Expr::Object(fields) => {
                let mut record = Record::new();
                for (key, value) in fields {
                    if is_banned_name(key) {
                        return Err(EvalError::DisallowedKey { key: key.clone() });
                    }
                    let value = self.eval(value, scope)?;
                    record.insert(key.as_str(), value)?;
                }
                Ok(Value::Record(Rc::new(record)))
            }
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        scope: &Rc<Scope>,
    ) -> Result<Value, EvalError> {
        let rooted = matches!(callee.as_path(), Some(path) if path.len() > 1 && path[0] == STDLIB_ROOT);
        if !rooted {
            return Err(EvalError::UnsafeCall {
                reason: format!("`{callee}` is not a standard library path"),
            });
        }

        let function = match self.eval(callee, scope) {
            Ok(Value::Native(native)) if self.library.allows(&native) => native,
            Ok(other) => {
                return Err(EvalError::UnsafeCall {
                    reason: format!("`{callee}` is a {}, not a library function", other.kind()),
                });
            }
            Err(err @ EvalError::ResourceExceeded(_)) => return Err(err),
            Err(err) => {
                return Err(EvalError::UnsafeCall {
                    reason: format!("`{callee}` is not a library function: {err}"),
                });
            }
        };

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, scope)?);
        }

        tracing::trace!(function = function.name(), args = values.len(), "native call");
        self.enter()?;
        let result = function.call(&mut CallContext { evaluator: self }, &values);
        self.depth -= 1;
        result
    }

    /// Apply a function value to already evaluated arguments.
    ///
    /// Closures bind parameters positionally in a child frame over their
    /// captured scope; missing arguments become [`Value::Absent`] and extra
    /// ones are ignored. Native functions must be on the whitelist.
    pub fn apply(&mut self, function: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match function {
            Value::Closure(closure) => {
                if closure.params.iter().any(|p| p == STDLIB_ROOT) {
                    return Err(EvalError::UnsafeCall {
                        reason: format!("parameter `{STDLIB_ROOT}` would shadow the library"),
                    });
                }
                let mut frame = Scope::child(closure.scope.clone());
                for (i, param) in closure.params.iter().enumerate() {
                    frame.define(param.as_str(), args.get(i).cloned().unwrap_or(Value::Absent));
                }
                self.enter()?;
                let result = self.eval(&closure.body, &Rc::new(frame));
                self.depth -= 1;
                result
            }
            Value::Native(native) => {
                if !self.library.allows(native) {
                    return Err(EvalError::UnsafeCall {
                        reason: format!("`{}` is not a library function", native.name()),
                    });
                }
                self.enter()?;
                let result = native.call(&mut CallContext { evaluator: self }, args);
                self.depth -= 1;
                result
            }
            other => Err(EvalError::type_mismatch("call", "function", other.kind())),
        }
    }
}

fn expect_bool(context: &str, value: &Value) -> Result<bool, EvalError> {
    value
        .as_bool()
        .ok_or_else(|| EvalError::type_mismatch(context, "boolean", value.kind()))
}

/// Handle given to native functions.
///
/// It lets a library function call back into the evaluator, e.g. to apply
/// a closure argument, while sharing the evaluator's depth and step limits.
pub struct CallContext<'e, 'a> {
    evaluator: &'e mut Evaluator<'a>,
}

impl CallContext<'_, '_> {
    /// Call a function value with the given arguments.
    pub fn invoke(&mut self, function: &Value, args: &[Value]) -> Result<Value, EvalError> {
        self.evaluator.apply(function, args)
    }

    /// Account for `n` units of work done by the native function itself.
    pub fn charge(&mut self, n: usize) -> Result<(), EvalError> {
        self.evaluator.charge(n)
    }
}
