//! Tree-walking evaluator
//!
//! Every node evaluates to a [`Value`]. Failures travel as [`RuntimeError`]
//! and are either reported and replaced by `0` (best effort) or propagated
//! (fail fast) at the node that raised them. `return` unwinds as
//! [`ErrorKind::Return`] until the enclosing call catches it.

use super::env::{Binding, Environment, Function, FunctionTable, Tracked};
use super::error::{ErrorKind, InterpResult, RuntimeError};
use super::output::{self, Output};
use super::value::Value;
use crate::ast::{BinOp, Block, Expr, Program, Selector, Spanned, Target};
use crate::config::{Config, DEFAULT_MAX_CALL_DEPTH, ErrorPolicy};
use crate::util::{find_similar_name, format_suggestion_hint};
use std::cmp::Ordering;
use tracing::{debug, trace, warn};

/// Stack growth for deeply nested evaluation
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Assignment target with its index already evaluated
enum Place<'a> {
    Name(&'a str),
    Element(&'a str, i64),
}

impl Place<'_> {
    fn name(&self) -> &str {
        match self {
            Place::Name(name) | Place::Element(name, _) => name,
        }
    }
}

/// Tree-walking interpreter
pub struct Interpreter {
    /// Global environment; moved out while a program runs
    env: Environment,
    /// Declared functions, shared by every call depth
    functions: FunctionTable,
    output: Output,
    policy: ErrorPolicy,
    max_call_depth: usize,
    call_depth: usize,
    /// Errors reported and recovered under the best-effort policy
    diagnostics: Vec<RuntimeError>,
}

impl Interpreter {
    /// Create an interpreter printing to stdout with the default policy
    pub fn new() -> Self {
        Interpreter {
            env: Environment::new(),
            functions: FunctionTable::new(),
            output: Output::stdout(),
            policy: ErrorPolicy::default(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            call_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Create an interpreter with the policy and depth limit from a config
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_policy(config.error_policy)
            .with_max_call_depth(config.max_call_depth)
    }

    /// Set the sink for `print` lines and diagnostics
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Set the runtime error policy
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the maximum nesting of function calls
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Current error policy
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Current call depth limit
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Global variables left by previous runs
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Functions declared so far
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Output sink
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Output sink, for draining a capture buffer
    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.output
    }

    /// Errors recovered under the best-effort policy
    pub fn diagnostics(&self) -> &[RuntimeError] {
        &self.diagnostics
    }

    /// Drain recovered errors
    pub fn take_diagnostics(&mut self) -> Vec<RuntimeError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Forget every variable, function and diagnostic
    pub fn reset(&mut self) {
        self.env.clear();
        self.functions.clear();
        self.diagnostics.clear();
        self.call_depth = 0;
    }

    /// Run a program against the interpreter's global environment.
    /// State persists across calls, so a REPL can feed one line at a time.
    pub fn run(&mut self, program: &Program) -> InterpResult<Value> {
        let mut env = std::mem::take(&mut self.env);
        let result = self.eval_with(&program.stmts, &mut env);
        self.env = env;
        result
    }

    /// Evaluate statements against an explicit environment. A top-level
    /// `return` ends the sequence with its value.
    pub fn eval_with(&mut self, stmts: &[Spanned<Expr>], env: &mut Environment) -> InterpResult<Value> {
        match self.eval_block(stmts, env) {
            Err(RuntimeError {
                kind: ErrorKind::Return(value),
                ..
            }) => Ok(*value),
            other => other,
        }
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval(&mut self, expr: &Spanned<Expr>, env: &mut Environment) -> InterpResult<Value> {
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_inner(expr, env)
        });
        match result {
            Ok(value) => Ok(value),
            Err(err) => self.recover(err.with_span(expr.span)),
        }
    }

    /// Apply the error policy to a failed node
    fn recover(&mut self, err: RuntimeError) -> InterpResult<Value> {
        if self.policy == ErrorPolicy::FailFast || !err.kind.is_recoverable() {
            return Err(err);
        }
        warn!(kind = ?err.kind, span = ?err.span, "{}", err.message);
        self.output.diagnostic(&format!("error: {}", err.message));
        self.diagnostics.push(err);
        Ok(Value::Int(0))
    }

    fn eval_block(&mut self, stmts: &[Spanned<Expr>], env: &mut Environment) -> InterpResult<Value> {
        let mut last = Value::Undefined;
        for stmt in stmts {
            last = self.eval(stmt, env)?;
        }
        Ok(last)
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>, env: &mut Environment) -> InterpResult<Value> {
        trace!(kind = expr.node.kind(), span = %expr.span, "eval");
        match &expr.node {
            Expr::Integer(n) => Ok(Value::Int(*n)),
            Expr::Text(s) => Ok(Value::Text(s.clone())),
            Expr::Character(c) => Ok(Value::Char(*c)),

            Expr::Var(name) => match env.get_mut(name) {
                Some(Binding::Scalar(t)) => {
                    t.reads += 1;
                    Ok(t.value.clone())
                }
                Some(binding) => Ok(binding.value()),
                None => Err(undefined_variable(name, env)),
            },

            Expr::VarAssign { ty, target, value } => {
                let place = self.resolve_place(target, env)?;
                if let Place::Element(name, index) = &place {
                    check_element(env, name, *index)?;
                }
                let value = self.eval(value, env)?;
                if let Some(tag) = ty {
                    if !value.matches_tag(*tag) {
                        return Err(RuntimeError::declared_type(place.name(), *tag, value.type_name()));
                    }
                }
                match place {
                    Place::Name(name) => assign(env, name, value),
                    Place::Element(name, index) => assign_element(env, name, index, value)?,
                }
                Ok(Value::Text(target.name().to_string()))
            }

            Expr::VarFunc { target, selector } => self.counter(target, *selector, env),

            Expr::VarIndex { array, index } => self.eval_index(array, index, env),

            Expr::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval(element, env)?);
                }
                Ok(Value::Array(items))
            }

            Expr::Binary { left, op, right } => self.eval_binary(*op, left, right, env),

            Expr::Neg(inner) => match self.eval(inner, env)? {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::overflow("-")),
                other => Err(RuntimeError::non_numeric_operand("-", other.type_name())),
            },

            Expr::CompoundAssign { target, op, value } => {
                let place = self.resolve_place(target, env)?;
                current_int(env, &place, &op.to_string())?;
                let rhs = self.eval(value, env)?;
                let arith_op = op.binop();
                update_int(env, &place, &op.to_string(), |current| match rhs {
                    Value::Int(n) => arith(arith_op, current, n),
                    other => Err(RuntimeError::non_numeric(
                        &arith_op.to_string(),
                        "num",
                        other.type_name(),
                    )),
                })?;
                Ok(Value::Text(target.name().to_string()))
            }

            Expr::Increment(target) => {
                let place = self.resolve_place(target, env)?;
                update_int(env, &place, "++", |current| arith(BinOp::Add, current, 1))?;
                Ok(Value::Text(target.name().to_string()))
            }

            Expr::Decrement(target) => {
                let place = self.resolve_place(target, env)?;
                update_int(env, &place, "--", |current| arith(BinOp::Sub, current, 1))?;
                Ok(Value::Text(target.name().to_string()))
            }

            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond, env)?.is_truthy() {
                    self.eval_block(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.eval_block(else_branch, env)
                } else {
                    Ok(Value::Undefined)
                }
            }

            Expr::For {
                init,
                cond,
                step,
                body,
            } => {
                let scope = env.names();
                let result = self.eval_for(init, cond, step, body, env);
                env.retain_names(&scope);
                debug!(ok = result.is_ok(), "for loop exit");
                result
            }

            Expr::While { cond, body } => {
                let scope = env.names();
                let result = self.eval_while(cond, body, env);
                env.retain_names(&scope);
                debug!(ok = result.is_ok(), "while loop exit");
                result
            }

            Expr::FuncDeclare {
                name,
                ret,
                params,
                body,
            } => {
                debug!(function = %name, arity = params.len(), "declare");
                self.functions.define(Function {
                    name: name.clone(),
                    ret: *ret,
                    params: params.clone(),
                    body: body.clone(),
                });
                Ok(Value::Undefined)
            }

            Expr::FuncCall { name, args } => self.call_function(name, args, env),

            Expr::Return(value) => {
                let value = self.eval(value, env)?;
                Err(RuntimeError::return_value(value))
            }

            Expr::Print(value) => {
                let value = self.eval(value, env)?;
                self.output.println(&value.to_string());
                Ok(Value::Undefined)
            }

            Expr::PrintCounter { target, selector } => {
                let value = self.counter(target, *selector, env)?;
                self.output.println(&value.to_string());
                Ok(Value::Undefined)
            }

            Expr::FilePrint { file, payload } => {
                let path = self.eval_file_name(file, env)?;
                let value = self.eval(payload, env)?;
                write_file(&path, &value)?;
                Ok(Value::Undefined)
            }

            Expr::FilePrintCounter {
                file,
                target,
                selector,
            } => {
                let path = self.eval_file_name(file, env)?;
                let value = self.counter(target, *selector, env)?;
                write_file(&path, &value)?;
                Ok(Value::Undefined)
            }
        }
    }

    fn eval_for(
        &mut self,
        init: &Spanned<Expr>,
        cond: &Spanned<Expr>,
        step: &Spanned<Expr>,
        body: &Block,
        env: &mut Environment,
    ) -> InterpResult<Value> {
        self.eval(init, env)?;
        while self.eval(cond, env)?.is_truthy() {
            self.eval_block(body, env)?;
            self.eval(step, env)?;
        }
        Ok(Value::Undefined)
    }

    fn eval_while(&mut self, cond: &Spanned<Expr>, body: &Block, env: &mut Environment) -> InterpResult<Value> {
        while self.eval(cond, env)?.is_truthy() {
            self.eval_block(body, env)?;
        }
        Ok(Value::Undefined)
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Spanned<Expr>,
        right: &Spanned<Expr>,
        env: &mut Environment,
    ) -> InterpResult<Value> {
        match op {
            BinOp::And => {
                if !self.eval(left, env)?.is_truthy() {
                    return Ok(Value::from_bool(false));
                }
                Ok(Value::from_bool(self.eval(right, env)?.is_truthy()))
            }
            BinOp::Or => {
                if self.eval(left, env)?.is_truthy() {
                    return Ok(Value::from_bool(true));
                }
                Ok(Value::from_bool(self.eval(right, env)?.is_truthy()))
            }
            _ => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                binary_op(op, &left, &right)
            }
        }
    }

    /// Index read; a named array bumps the element's read counter
    fn eval_index(
        &mut self,
        array: &Spanned<Expr>,
        index: &Spanned<Expr>,
        env: &mut Environment,
    ) -> InterpResult<Value> {
        if let Expr::Var(name) = &array.node {
            if matches!(env.get(name), Some(Binding::Array(_))) {
                let index = self.eval_int(index, env)?;
                return match env.get_mut(name) {
                    Some(Binding::Array(items)) => {
                        let element = element_mut(items, index)?;
                        element.reads += 1;
                        Ok(element.value.clone())
                    }
                    Some(Binding::Scalar(t)) => Err(RuntimeError::type_mismatch("array", t.value.type_name())),
                    None => Err(RuntimeError::undefined_variable(name, "")),
                };
            }
        }

        let target = self.eval(array, env)?;
        let index = self.eval_int(index, env)?;
        match target {
            Value::Array(mut items) => {
                let slot = slot(index, items.len())?;
                Ok(items.swap_remove(slot))
            }
            other => Err(RuntimeError::type_mismatch("array", other.type_name())),
        }
    }

    /// Counter of a variable or array element; never bumps counters
    fn counter(&mut self, target: &Spanned<Expr>, selector: Selector, env: &mut Environment) -> InterpResult<Value> {
        match &target.node {
            Expr::Var(name) => match env.get(name) {
                Some(Binding::Scalar(t)) => Ok(count(t, selector)),
                Some(Binding::Array(items)) => {
                    Ok(Value::Array(items.iter().map(|t| count(t, selector)).collect()))
                }
                None => Err(undefined_variable(name, env)),
            },
            Expr::VarIndex { array, index } => {
                let Expr::Var(name) = &array.node else {
                    return Err(RuntimeError::counter_not_supported(array.node.kind()));
                };
                let index = self.eval_int(index, env)?;
                match env.get(name) {
                    Some(Binding::Array(items)) => {
                        let slot = slot(index, items.len())?;
                        Ok(count(&items[slot], selector))
                    }
                    Some(Binding::Scalar(t)) => Err(RuntimeError::type_mismatch("array", t.value.type_name())),
                    None => Err(undefined_variable(name, env)),
                }
            }
            other => Err(RuntimeError::counter_not_supported(other.kind())),
        }
    }

    fn call_function(&mut self, name: &str, args: &[Spanned<Expr>], env: &mut Environment) -> InterpResult<Value> {
        let Some(function) = self.functions.get(name) else {
            let suggestion = find_similar_name(name, self.functions.names(), 2);
            return Err(RuntimeError::undefined_function(
                name,
                &format_suggestion_hint(suggestion),
            ));
        };

        // Checked before any argument runs, so a bad call has no side effects
        if function.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(name, function.params.len(), args.len()));
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, env)?);
        }

        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::stack_overflow(self.max_call_depth));
        }

        debug!(function = name, depth = self.call_depth + 1, "call");
        let frame = env.enter_call(&function.params, values);
        self.call_depth += 1;
        let result = self.eval_block(&function.body, env);
        self.call_depth -= 1;
        env.leave_call(frame);

        match result {
            Err(RuntimeError {
                kind: ErrorKind::Return(value),
                ..
            }) => Ok(*value),
            other => other,
        }
    }

    fn resolve_place<'a>(&mut self, target: &'a Target, env: &mut Environment) -> InterpResult<Place<'a>> {
        match target {
            Target::Name(name) => Ok(Place::Name(name)),
            Target::Index { name, index } => Ok(Place::Element(name, self.eval_int(index, env)?)),
        }
    }

    fn eval_int(&mut self, index: &Spanned<Expr>, env: &mut Environment) -> InterpResult<i64> {
        let value = self.eval(index, env)?;
        value
            .as_int()
            .ok_or_else(|| RuntimeError::type_mismatch("num index", value.type_name()))
    }

    fn eval_file_name(&mut self, file: &Spanned<Expr>, env: &mut Environment) -> InterpResult<String> {
        match self.eval(file, env)? {
            Value::Text(path) => Ok(path),
            other => Err(RuntimeError::type_mismatch("str file name", other.type_name())),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn undefined_variable(name: &str, env: &Environment) -> RuntimeError {
    let bindings = env.bindings();
    let suggestion = find_similar_name(name, bindings.iter().map(|(n, _)| *n), 2);
    RuntimeError::undefined_variable(name, &format_suggestion_hint(suggestion))
}

/// Plain assignment to a name. A scalar updated with a scalar keeps its
/// counters; any other rebinding starts fresh counters.
fn assign(env: &mut Environment, name: &str, value: Value) {
    if !matches!(value, Value::Array(_)) {
        if let Some(Binding::Scalar(t)) = env.get_mut(name) {
            t.value = value;
            t.writes += 1;
            return;
        }
    }
    let rebinding = env.contains(name);
    let mut binding = Binding::fresh(value);
    if let (true, Binding::Scalar(t)) = (rebinding, &mut binding) {
        t.writes = 1;
    }
    env.define(name, binding);
}

fn assign_element(env: &mut Environment, name: &str, index: i64, value: Value) -> InterpResult<()> {
    match env.get_mut(name) {
        Some(Binding::Array(items)) => {
            let element = element_mut(items, index)?;
            if !element.value.same_kind(&value) {
                return Err(RuntimeError::type_mismatch(element.value.type_name(), value.type_name()));
            }
            element.value = value;
            element.writes += 1;
            Ok(())
        }
        Some(Binding::Scalar(t)) => Err(RuntimeError::type_mismatch("array", t.value.type_name())),
        None => Err(undefined_variable(name, env)),
    }
}

/// Element write target must exist before its value is evaluated
fn check_element(env: &Environment, name: &str, index: i64) -> InterpResult<()> {
    match env.get(name) {
        Some(Binding::Array(items)) => slot(index, items.len()).map(|_| ()),
        Some(Binding::Scalar(t)) => Err(RuntimeError::type_mismatch("array", t.value.type_name())),
        None => Err(undefined_variable(name, env)),
    }
}

/// Current integer at an update target, without counting a read. Run before
/// the operand so a bad target fails with no side effects.
fn current_int(env: &mut Environment, place: &Place<'_>, op: &str) -> InterpResult<i64> {
    let slot = int_slot(env, place, op)?;
    match slot.value {
        Value::Int(n) => Ok(n),
        ref other => Err(RuntimeError::non_numeric_operand(op, other.type_name())),
    }
}

/// Read-modify-write of an integer target. The re-read does not count as a
/// read, and nothing changes when `f` fails.
fn update_int(
    env: &mut Environment,
    place: &Place<'_>,
    op: &str,
    f: impl FnOnce(i64) -> InterpResult<i64>,
) -> InterpResult<()> {
    let slot = int_slot(env, place, op)?;
    let Value::Int(current) = slot.value else {
        return Err(RuntimeError::non_numeric_operand(op, slot.value.type_name()));
    };
    slot.value = Value::Int(f(current)?);
    slot.writes += 1;
    Ok(())
}

fn int_slot<'e>(env: &'e mut Environment, place: &Place<'_>, op: &str) -> InterpResult<&'e mut Tracked> {
    if !env.contains(place.name()) {
        return Err(undefined_variable(place.name(), env));
    }
    let slot = match *place {
        Place::Name(name) => match env.get_mut(name) {
            Some(Binding::Scalar(t)) => t,
            Some(Binding::Array(_)) => return Err(RuntimeError::non_numeric_operand(op, "array")),
            None => return Err(RuntimeError::undefined_variable(name, "")),
        },
        Place::Element(name, index) => match env.get_mut(name) {
            Some(Binding::Array(items)) => element_mut(items, index)?,
            Some(Binding::Scalar(t)) => {
                return Err(RuntimeError::type_mismatch("array", t.value.type_name()));
            }
            None => return Err(RuntimeError::undefined_variable(name, "")),
        },
    };
    Ok(slot)
}

fn slot(index: i64, len: usize) -> InterpResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| RuntimeError::index_out_of_bounds(index, len))
}

fn element_mut(items: &mut [Tracked], index: i64) -> InterpResult<&mut Tracked> {
    let slot = slot(index, items.len())?;
    Ok(&mut items[slot])
}

fn count(tracked: &Tracked, selector: Selector) -> Value {
    let n = match selector {
        Selector::Reads => tracked.reads,
        Selector::Writes => tracked.writes,
    };
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn arith(op: BinOp, a: i64, b: i64) -> InterpResult<i64> {
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            a.checked_div(b)
        }
        _ => unreachable!("`{op}` is not an arithmetic operator"),
    };
    result.ok_or_else(|| RuntimeError::overflow(&op.to_string()))
}

fn binary_op(op: BinOp, left: &Value, right: &Value) -> InterpResult<Value> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => match (left, right) {
            (Value::Int(a), Value::Int(b)) => arith(op, *a, *b).map(Value::Int),
            _ => Err(RuntimeError::non_numeric(
                &op.to_string(),
                left.type_name(),
                right.type_name(),
            )),
        },
        BinOp::Eq => Ok(Value::from_bool(left == right)),
        BinOp::Ne => Ok(Value::from_bool(left != right)),
        BinOp::Lt => Ok(Value::from_bool(compare(left, right)?.is_lt())),
        BinOp::Le => Ok(Value::from_bool(compare(left, right)?.is_le())),
        BinOp::Gt => Ok(Value::from_bool(compare(left, right)?.is_gt())),
        BinOp::Ge => Ok(Value::from_bool(compare(left, right)?.is_ge())),
        BinOp::And => Ok(Value::from_bool(left.is_truthy() && right.is_truthy())),
        BinOp::Or => Ok(Value::from_bool(left.is_truthy() || right.is_truthy())),
    }
}

fn compare(left: &Value, right: &Value) -> InterpResult<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Ok(a.cmp(b)),
        _ => Err(RuntimeError::type_mismatch(left.type_name(), right.type_name())),
    }
}

fn write_file(path: &str, value: &Value) -> InterpResult<()> {
    debug!(path, "fileprint");
    output::write_file(path, &value.to_string())
        .map_err(|e| RuntimeError::file_open_failure(path, &e.to_string()))
}
