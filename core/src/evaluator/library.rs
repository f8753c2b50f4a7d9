//! The frozen standard-library root and its call whitelist.

use std::rc::Rc;

use hashbrown::HashSet;

use crate::api::Error;
use crate::values::{NativeFn, NativeFunction, Record, Value};
use crate::{STDLIB_ROOT, is_banned_name};

/// The value bound to `std`, together with the set of native functions
/// reachable from it.
///
/// The set is computed once, when the library is created, by walking every
/// record and array under the root. A call is only ever allowed to land on
/// a function in that set.
#[derive(Debug, Clone)]
pub struct Library {
    root: Value,
    whitelist: HashSet<usize>,
}

impl Library {
    pub fn new(root: Value) -> Self {
        let mut whitelist = HashSet::new();
        collect_natives(&root, &mut whitelist);
        tracing::debug!(functions = whitelist.len(), "library frozen");
        Self { root, whitelist }
    }

    /// A library with an empty root record.
    pub fn empty() -> Self {
        Self::new(Value::Record(Rc::new(Record::new())))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn allows(&self, function: &NativeFunction) -> bool {
        self.whitelist.contains(&function.id())
    }

    /// Number of whitelisted functions.
    pub fn len(&self) -> usize {
        self.whitelist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.whitelist.is_empty()
    }
}

fn collect_natives(value: &Value, out: &mut HashSet<usize>) {
    match value {
        Value::Native(native) => {
            out.insert(native.id());
        }
        Value::Record(record) => record.iter().for_each(|(_, v)| collect_natives(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_natives(v, out)),
        _ => {}
    }
}

enum Entry {
    Leaf(Value),
    Namespace(Vec<(String, Entry)>),
}

/// Builds a library root from dotted paths.
///
/// # Example
///
/// ```
/// use calcscript_core::evaluator::{CallContext, EvalError, LibraryBuilder};
/// use calcscript_core::values::Value;
///
/// fn twice(_ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, EvalError> {
///     let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
///     Ok(Value::Number(n * 2.0))
/// }
///
/// let library = LibraryBuilder::new()
///     .function("math.twice", twice)?
///     .constant("math.answer", Value::Number(42.0))?
///     .build();
/// assert_eq!(library.len(), 1);
/// # Ok::<(), calcscript_core::api::Error>(())
/// ```
pub struct LibraryBuilder {
    entries: Vec<(String, Entry)>,
}

impl LibraryBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a native function at `path`, relative to `std`.
    pub fn function(self, path: &str, func: NativeFn) -> Result<Self, Error> {
        let native = NativeFunction::new(format!("{STDLIB_ROOT}.{path}"), func);
        self.constant(path, Value::Native(native))
    }

    /// Register an arbitrary value at `path`, relative to `std`.
    pub fn constant(mut self, path: &str, value: Value) -> Result<Self, Error> {
        let segments: Vec<&str> = path.split('.').collect();
        for segment in &segments {
            if !is_identifier(segment) || is_banned_name(segment) {
                return Err(Error::InvalidName(path.to_string()));
            }
        }
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::InvalidName(path.to_string()));
        };

        let mut level = &mut self.entries;
        for segment in parents {
            let index = match level.iter().position(|(name, _)| name == segment) {
                Some(index) => index,
                None => {
                    level.push((segment.to_string(), Entry::Namespace(Vec::new())));
                    level.len() - 1
                }
            };
            level = match &mut level[index].1 {
                Entry::Namespace(children) => children,
                Entry::Leaf(_) => return Err(Error::LibraryPathConflict(path.to_string())),
            };
        }
        if level.iter().any(|(name, _)| name == last) {
            return Err(Error::LibraryPathConflict(path.to_string()));
        }
        level.push((last.to_string(), Entry::Leaf(value)));
        Ok(self)
    }

    pub fn build(self) -> Library {
        Library::new(namespace_value(self.entries))
    }
}

impl Default for LibraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn namespace_value(entries: Vec<(String, Entry)>) -> Value {
    let mut record = Record::new();
    for (name, entry) in entries {
        let value = match entry {
            Entry::Leaf(value) => value,
            Entry::Namespace(children) => namespace_value(children),
        };
        // Segments were checked against the banned list when registered.
        let _ = record.insert(name, value);
    }
    Value::Record(Rc::new(record))
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
