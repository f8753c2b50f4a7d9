mod function;
mod record;
mod value;

pub use function::{Closure, NativeFn, NativeFunction};
pub use record::Record;
pub use value::{ErrorSentinel, Value, format_number};
