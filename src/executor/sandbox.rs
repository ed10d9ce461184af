// Restricted Python evaluation on an embedded RustPython VM
//
// Every run gets its own interpreter. Submitted code executes through
// `exec(code, {"__builtins__": allowed}, {})`, so module-level names live in
// a throwaway locals mapping that function bodies cannot see. `print` writes
// into a sink owned by that interpreter, never the process stdout.

use rustpython_vm::builtins::PyBaseExceptionRef;
use rustpython_vm::function::FuncArgs;
use rustpython_vm::{AsObject, Interpreter, PyObjectRef, PyResult, VirtualMachine};
use thiserror::Error;
use tracing::{debug, trace};

/// Built-in names visible to submitted code
pub const ALLOWED_NAMES: [&str; 41] = [
    "abs", "all", "any", "bin", "bool", "chr", "dict", "divmod", "enumerate", "filter", "float",
    "format", "frozenset", "hash", "hex", "int", "isinstance", "issubclass", "iter", "len", "list",
    "map", "max", "min", "next", "oct", "ord", "pow", "print", "range", "repr", "reversed",
    "round", "set", "slice", "sorted", "str", "sum", "tuple", "type", "zip",
];

// Runs with the full builtins, then strips the builtins module down to the
// allow-list. `_exec` keeps a handle on `exec` past the strip.
const PRELUDE: &str = r#"
class _Sink:
    def __init__(self):
        self.parts = []

    def write(self, text):
        self.parts.append(text)
        return len(text)

    def flush(self):
        pass

    def getvalue(self):
        return ''.join(self.parts)

_sink = _Sink()
_exec = exec
_namespace = getattr(__builtins__, '__dict__', __builtins__)
for _name in list(_namespace):
    if _name not in _allowed:
        del _namespace[_name]
"#;

/// Why a run produced no output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Uncaught exception raised by the submitted code, as `str(exc)`
    #[error("{0}")]
    Raised(String),

    #[error("sandbox setup failed: {0}")]
    Setup(String),
}

fn prelude_source() -> String {
    let allowed = ALLOWED_NAMES
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("_allowed = {{{}}}\n{}", allowed, PRELUDE)
}

/// `str(exc)`, or CPython's placeholder when that raises too
fn describe(vm: &VirtualMachine, exc: &PyBaseExceptionRef) -> String {
    match exc.as_object().str(vm) {
        Ok(text) => text.as_str().to_owned(),
        Err(_) => "<exception str() failed>".to_owned(),
    }
}

/// Handles into one prepared interpreter
struct Sandbox {
    exec: PyObjectRef,
    namespace: PyObjectRef,
    sink: PyObjectRef,
}

impl Sandbox {
    fn prepare(vm: &VirtualMachine, recursion_limit: usize) -> PyResult<Self> {
        let scope = vm.new_scope_with_builtins();
        vm.run_code_string(scope.clone(), &prelude_source(), "<prelude>".to_owned())?;

        let sink = scope.globals.get_item("_sink", vm)?;
        let exec = scope.globals.get_item("_exec", vm)?;
        let namespace = scope.globals.get_item("_namespace", vm)?;

        let sys = vm.sys_module.as_object();
        sys.get_attr("setrecursionlimit", vm)?
            .call((recursion_limit,), vm)?;
        sys.set_attr("stdout", sink.clone(), vm)?;
        // an empty module cache sends every import through the missing `__import__`
        sys.set_attr("modules", vm.ctx.new_dict(), vm)?;

        trace!(recursion_limit, "sandbox prepared");
        Ok(Self {
            exec,
            namespace,
            sink,
        })
    }

    fn execute(&self, vm: &VirtualMachine, code: &str) -> PyResult<String> {
        let globals = vm.ctx.new_dict();
        globals.set_item("__builtins__", self.namespace.clone(), vm)?;
        let locals = vm.ctx.new_dict();

        let args = FuncArgs::from(vec![
            vm.ctx.new_str(code).into(),
            globals.into(),
            locals.into(),
        ]);
        self.exec.call(args, vm)?;

        let captured = vm.call_method(&self.sink, "getvalue", ())?;
        Ok(captured.str(vm)?.as_str().to_owned())
    }
}

/// Run a whole program and return what it printed.
///
/// Output printed before an uncaught exception is discarded with it.
pub fn run(code: &str, recursion_limit: usize) -> Result<String, RunError> {
    let interpreter = Interpreter::without_stdlib(Default::default());
    interpreter.enter(|vm| {
        let sandbox = Sandbox::prepare(vm, recursion_limit)
            .map_err(|exc| RunError::Setup(describe(vm, &exc)))?;
        let result = sandbox
            .execute(vm, code)
            .map_err(|exc| RunError::Raised(describe(vm, &exc)));
        debug!(code_bytes = code.len(), ok = result.is_ok(), "sandbox run finished");
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn run_big(code: &str) -> Result<String, RunError> {
        let code = code.to_string();
        std::thread::Builder::new()
            .stack_size(256 << 20)
            .spawn(move || run(&code, 1000))
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn test_allow_list_has_no_duplicates() {
        let names: HashSet<&str> = ALLOWED_NAMES.iter().copied().collect();
        assert_eq!(names.len(), 41);
        assert!(!names.contains("__import__"));
        assert!(!names.contains("open"));
        assert!(!names.contains("exec"));
    }

    #[test]
    fn test_prelude_lists_every_name() {
        let source = prelude_source();
        assert!(source.starts_with("_allowed = {'abs', 'all'"));
        assert!(source.contains("'zip'}\n"));
    }

    #[test]
    fn test_print_is_captured() {
        assert_eq!(run_big("print(1 + 1)").unwrap(), "2\n");
    }

    #[test]
    fn test_namespace_is_exactly_the_allow_list() {
        let out = run_big("print(len(__builtins__))\nprint(sorted(__builtins__)[0])").unwrap();
        assert_eq!(out, "41\nabs\n");
    }

    #[test]
    fn test_raised_message() {
        assert_eq!(
            run_big("1/0"),
            Err(RunError::Raised("division by zero".to_string()))
        );
    }
}
