//! Parsed templates and their execution.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ExecError, ParseError};
use crate::func::{Arity, FuncMap, Function, ShortCircuit};
use crate::lex::{Delimiters, Lexer};
use crate::parse::{Branch, Command, Node, Operand, Parser, Pipeline, MAX_DEPTH};
use crate::value::{is_truthy, kind_of, write_value};

/// A parsed template bound to a function table.
///
/// `C` is the context type handed to every function call. Executing a
/// template needs `&mut C`, so whatever state the functions share lives in
/// the caller's hands rather than inside the template.
///
/// ```rust
/// use serde_json::json;
/// use tinted_template::{Delimiters, FuncMap, Template};
///
/// let template: Template<()> = Template::parse(
///     "greeting",
///     "{{if .loud}}HELLO{{else}}hello{{end}}, {{.name}}",
///     FuncMap::with_builtins(),
///     &Delimiters::default(),
/// )
/// .unwrap();
///
/// let out = template.render(&mut (), &json!({"loud": false, "name": "finn"})).unwrap();
/// assert_eq!(out, "hello, finn");
/// ```
pub struct Template<C> {
    name: String,
    root: Vec<Node>,
    funcs: FuncMap<C>,
}

impl<C> Template<C> {
    /// Parses `text` under `name`.
    ///
    /// Every function the text calls must already be present in `funcs`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed actions, unbalanced control
    /// blocks and calls to unknown functions.
    pub fn parse(
        name: &str,
        text: &str,
        funcs: FuncMap<C>,
        delims: &Delimiters,
    ) -> Result<Self, ParseError> {
        let tokens = Lexer::new(name, text, delims).tokenize()?;
        let root = Parser::new(name, tokens, &funcs, delims).parse()?;
        Ok(Self {
            name: name.to_string(),
            root,
            funcs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The function table the template was parsed against.
    pub fn funcs(&self) -> &FuncMap<C> {
        &self.funcs
    }

    /// Runs the template against `data` and returns the output.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] when a function is called with the wrong
    /// number of arguments, a function fails, or data is accessed in a way
    /// its type does not allow.
    pub fn render(&self, ctx: &mut C, data: &Value) -> Result<String, ExecError> {
        let mut out = String::new();
        self.execute(ctx, data, &mut out)?;
        Ok(out)
    }

    /// Runs the template, appending output to `out`.
    ///
    /// On error `out` holds whatever was produced before the failure.
    pub fn execute(&self, ctx: &mut C, data: &Value, out: &mut String) -> Result<(), ExecError> {
        let mut state = State {
            template: self,
            ctx,
            root: data,
            out,
            depth: 0,
        };
        state.walk(&self.root, data)
    }
}

impl<C> Clone for Template<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            root: self.root.clone(),
            funcs: self.funcs.clone(),
        }
    }
}

impl<C> fmt::Debug for Template<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("funcs", &self.funcs)
            .finish_non_exhaustive()
    }
}

struct State<'a, C> {
    template: &'a Template<C>,
    ctx: &'a mut C,
    root: &'a Value,
    out: &'a mut String,
    depth: usize,
}

impl<'a, C> State<'a, C> {
    fn walk(&mut self, nodes: &[Node], dot: &Value) -> Result<(), ExecError> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Action(pipeline) => {
                    let value = self.eval_pipeline(pipeline, dot)?;
                    write_value(self.out, &value);
                }
                Node::If(branch) => {
                    let value = self.eval_pipeline(&branch.pipeline, dot)?;
                    let nodes = if is_truthy(&value) {
                        &branch.body
                    } else {
                        &branch.otherwise
                    };
                    self.walk_nested(nodes, dot, branch.pipeline.line)?;
                }
                Node::With(branch) => {
                    let value = self.eval_pipeline(&branch.pipeline, dot)?;
                    if is_truthy(&value) {
                        self.walk_nested(&branch.body, &value, branch.pipeline.line)?;
                    } else {
                        self.walk_nested(&branch.otherwise, dot, branch.pipeline.line)?;
                    }
                }
                Node::Range(branch) => self.walk_range(branch, dot)?,
            }
        }
        Ok(())
    }

    fn walk_nested(&mut self, nodes: &[Node], dot: &Value, line: usize) -> Result<(), ExecError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExecError::TooDeep {
                name: self.template.name.clone(),
                line,
                limit: MAX_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.walk(nodes, dot);
        self.depth -= 1;
        result
    }

    fn walk_range(&mut self, branch: &Branch, dot: &Value) -> Result<(), ExecError> {
        let value = self.eval_pipeline(&branch.pipeline, dot)?;
        let mut iterated = false;

        match &value {
            Value::Array(items) => {
                for item in items {
                    iterated = true;
                    self.walk_nested(&branch.body, item, branch.pipeline.line)?;
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    iterated = true;
                    self.walk_nested(&branch.body, item, branch.pipeline.line)?;
                }
            }
            Value::Null => {}
            other => {
                return Err(ExecError::Range {
                    name: self.template.name.clone(),
                    line: branch.pipeline.line,
                    kind: kind_of(other),
                })
            }
        }

        if !iterated {
            self.walk_nested(&branch.otherwise, dot, branch.pipeline.line)?;
        }
        Ok(())
    }

    fn eval_pipeline(&mut self, pipeline: &Pipeline, dot: &Value) -> Result<Value, ExecError> {
        let mut piped = None;
        for command in &pipeline.commands {
            piped = Some(self.eval_command(command, dot, piped.take(), pipeline.line)?);
        }
        Ok(piped.unwrap_or(Value::Null))
    }

    fn eval_command(
        &mut self,
        command: &Command,
        dot: &Value,
        piped: Option<Value>,
        line: usize,
    ) -> Result<Value, ExecError> {
        let Some((first, rest)) = command.operands.split_first() else {
            return Ok(Value::Null);
        };

        match first {
            Operand::Function(name) => {
                let function = self.function(name, line)?;
                let count = rest.len() + usize::from(piped.is_some());
                self.check_arity(name, function.arity(), count, line)?;

                if let Some(stop) = function.short_circuit() {
                    return self.eval_short_circuit(stop, rest, dot, piped, line);
                }

                let mut args = Vec::with_capacity(count);
                for operand in rest {
                    args.push(self.eval_operand(operand, dot, line)?);
                }
                // The previous command's value is the last argument.
                args.extend(piped);
                self.invoke(name, function, &args, line)
            }
            _ if !rest.is_empty() || piped.is_some() => Err(ExecError::NotAFunction {
                name: self.template.name.clone(),
                line,
            }),
            operand => self.eval_operand(operand, dot, line),
        }
    }

    fn eval_operand(&mut self, operand: &Operand, dot: &Value, line: usize) -> Result<Value, ExecError> {
        match operand {
            Operand::Function(name) => self.call(name, line),
            Operand::Field(path) => self.lookup(dot, path, line),
            Operand::Dot => Ok(dot.clone()),
            Operand::Root(path) => self.lookup(self.root, path, line),
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Sub(pipeline) => self.eval_pipeline(pipeline, dot),
        }
    }

    /// Missing keys and fields of `nil` evaluate to `nil`; fields of any
    /// other non-map value are an error.
    fn lookup(&self, base: &Value, path: &[String], line: usize) -> Result<Value, ExecError> {
        let mut current = base;
        for field in path {
            current = match current {
                Value::Object(map) => match map.get(field) {
                    Some(value) => value,
                    None => return Ok(Value::Null),
                },
                Value::Null => return Ok(Value::Null),
                other => {
                    return Err(ExecError::Field {
                        name: self.template.name.clone(),
                        line,
                        field: field.clone(),
                        kind: kind_of(other),
                    })
                }
            };
        }
        Ok(current.clone())
    }

    /// Evaluates operands left to right until one decides the result. The
    /// piped value, if any, is the final operand.
    fn eval_short_circuit(
        &mut self,
        stop: ShortCircuit,
        operands: &[Operand],
        dot: &Value,
        piped: Option<Value>,
        line: usize,
    ) -> Result<Value, ExecError> {
        let mut last = Value::Null;
        for operand in operands {
            last = self.eval_operand(operand, dot, line)?;
            if stop.stops_at(&last) {
                return Ok(last);
            }
        }
        Ok(piped.unwrap_or(last))
    }

    /// Niladic call of a function named in argument position.
    fn call(&mut self, name: &str, line: usize) -> Result<Value, ExecError> {
        let function = self.function(name, line)?;
        self.check_arity(name, function.arity(), 0, line)?;
        self.invoke(name, function, &[], line)
    }

    fn function(&self, name: &str, line: usize) -> Result<&'a Arc<dyn Function<C>>, ExecError> {
        let template = self.template;
        template.funcs.get(name).ok_or_else(|| ExecError::UndefinedFunction {
            name: template.name.clone(),
            line,
            function: name.to_string(),
        })
    }

    fn check_arity(&self, name: &str, arity: Arity, got: usize, line: usize) -> Result<(), ExecError> {
        if arity.accepts(got) {
            return Ok(());
        }
        Err(ExecError::Arity {
            name: self.template.name.clone(),
            line,
            function: name.to_string(),
            expected: arity,
            got,
        })
    }

    fn invoke(
        &mut self,
        name: &str,
        function: &Arc<dyn Function<C>>,
        args: &[Value],
        line: usize,
    ) -> Result<Value, ExecError> {
        function.call(self.ctx, args).map_err(|source| ExecError::Call {
            name: self.template.name.clone(),
            line,
            function: name.to_string(),
            source,
        })
    }
}
