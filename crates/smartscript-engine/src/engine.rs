//! The tree-walking execution engine.

use crate::error::{EvalError, EvalResult};
use crate::functions;
use crate::multistack::MultiStack;
use crate::sink::Sink;
use crate::value::{self, Value};
use smartscript_types::ast::{DocumentNode, EchoNode, Element, ForLoopNode, Node};

/// Executes a parsed document against a sink.
///
/// The engine never mutates the tree; all run state lives in one named
/// multi-stack scoping the loop variables. A run is fully synchronous
/// and returns only after the whole tree has been visited.
///
/// There is no guard against a FOR step of zero (or a step whose sign
/// never drives the variable past the end bound): such a loop does not
/// terminate, matching the reference semantics. Callers needing bounded
/// execution must impose an external limit.
pub struct Engine<'a> {
    stacks: MultiStack,
    sink: &'a mut dyn Sink,
}

impl<'a> Engine<'a> {
    /// Create an engine writing to the given sink.
    pub fn new(sink: &'a mut dyn Sink) -> Self {
        Self {
            stacks: MultiStack::new(),
            sink,
        }
    }

    /// Execute the whole document.
    pub fn execute(&mut self, document: &DocumentNode) -> EvalResult<()> {
        for child in document.children() {
            self.execute_node(child)?;
        }
        Ok(())
    }

    fn execute_node(&mut self, node: &Node) -> EvalResult<()> {
        match node {
            Node::Document(document) => self.execute(document),
            Node::Text(text) => {
                self.sink.write(text.text());
                Ok(())
            }
            Node::ForLoop(for_loop) => self.execute_for_loop(for_loop),
            Node::Echo(echo) => self.execute_echo(echo),
        }
    }

    // ── FOR loops ─────────────────────────────────────────────────────────────

    fn execute_for_loop(&mut self, node: &ForLoopNode) -> EvalResult<()> {
        let start = self.bound_value(node.start())?;
        let end = self.bound_value(node.end())?;
        let step = match node.step() {
            Some(element) => self.bound_value(element)?,
            None => Value::Int(1),
        };

        self.stacks.push(node.variable(), start);
        let result = self.run_iterations(node, &end, &step);
        // The binding is removed on loop exit, normal or aborting.
        self.stacks.pop(node.variable());
        result
    }

    fn run_iterations(&mut self, node: &ForLoopNode, end: &Value, step: &Value) -> EvalResult<()> {
        loop {
            let current = self
                .stacks
                .peek(node.variable())
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(node.variable().to_string()))?;
            if !value::less_or_equal(&current, end)? {
                return Ok(());
            }
            for child in node.children() {
                self.execute_node(child)?;
            }
            let next = value::apply_operator('+', &current, step)?;
            self.stacks.set_top(node.variable(), next);
        }
    }

    /// Resolve a FOR bound or step: constants pass through, a variable
    /// resolves via the multi-stack, nothing else is legal here.
    fn bound_value(&self, element: &Element) -> EvalResult<Value> {
        match element {
            Element::ConstantInteger(v) => Ok(Value::Int(*v)),
            Element::ConstantDouble(v) => Ok(Value::Double(*v)),
            Element::String(s) => Ok(Value::Str(s.clone())),
            Element::Variable(name) => self
                .stacks
                .peek(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            other => Err(EvalError::InvalidLoopArgument(other.to_source())),
        }
    }

    // ── Echo tags ─────────────────────────────────────────────────────────────

    /// Evaluate the element list left-to-right against one operand
    /// stack, then write every leftover value bottom-to-top.
    fn execute_echo(&mut self, node: &EchoNode) -> EvalResult<()> {
        let mut stack: Vec<Value> = Vec::new();
        for element in node.elements() {
            match element {
                Element::ConstantInteger(v) => stack.push(Value::Int(*v)),
                Element::ConstantDouble(v) => stack.push(Value::Double(*v)),
                Element::String(s) => stack.push(Value::Str(s.clone())),
                Element::Variable(name) => {
                    let bound = self
                        .stacks
                        .peek(name)
                        .cloned()
                        .ok_or_else(|| EvalError::UnboundVariable(name.clone()))?;
                    stack.push(bound);
                }
                Element::Operator(symbol) => {
                    // First pop is the right-hand operand.
                    let right = stack
                        .pop()
                        .ok_or_else(|| EvalError::StackUnderflow(symbol.to_string()))?;
                    let left = stack
                        .pop()
                        .ok_or_else(|| EvalError::StackUnderflow(symbol.to_string()))?;
                    stack.push(value::apply_operator(*symbol, &left, &right)?);
                }
                Element::Function(name) => functions::call(name, &mut stack, self.sink)?,
            }
        }
        for leftover in &stack {
            self.sink.write(&leftover.as_text());
        }
        Ok(())
    }
}
