mod args;
pub use args::{coerce_args, ArgContext, ArgError, ScriptArg};

mod format;
pub use format::{format_value, format_values};

mod method;
pub use method::{find_function, FindFunctionError};
