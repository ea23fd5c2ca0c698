//! Task and function port binding
//!
//! A function scope gets a return-value signal named after the function and
//! a [`FunctionDef`] listing its arguments in declaration order; a task scope
//! gets a [`TaskDef`]. Functions can be reached along more than one path, so
//! both are guarded by the scope's elaboration stage.

use crate::context::Outcome;
use crate::error::ElabError;
use crate::walker::Elaborator;
use tracing::debug;
use vl_intern::Symbol;
use vl_netlist::{
    DataType, Definition, ElabStage, FunctionDef, NetRange, PortDirection, ScopeId, Signal,
    SignalId, SignalKind, TaskDef,
};
use vl_pform::{DeclRange, ExprId, Function, FxIndexMap, ReturnKind, Task, Wire};
use vl_span::FileSpan;

/// The kind of subroutine whose ports are being bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Callable {
    Function,
    Task,
}

impl Callable {
    fn describe(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Task => "task",
        }
    }

    /// Functions only take input arguments
    fn requires_inputs(self) -> bool {
        self == Self::Function
    }
}

/// What the return type of a function produced
enum FunctionReturn {
    Signal(SignalId),
    /// Void function, valid only without ports
    Void,
    /// Nothing to attach; already reported
    Missing,
}

impl<'ctx> Elaborator<'ctx> {
    /// Marks a task or function scope as elaborated
    ///
    /// Returns false if it already was.
    fn enter_callable(&mut self, scope: ScopeId) -> bool {
        if self.design.scope(scope).stage() >= ElabStage::Signals {
            debug!(scope = %self.scope_path(scope), "already elaborated");
            return false;
        }
        self.design.set_stage(scope, ElabStage::Signals);
        true
    }

    pub(crate) fn elaborate_function(&mut self, scope: ScopeId, function: &'ctx Function) -> Outcome {
        if !self.enter_callable(scope) {
            return Outcome::Clean;
        }
        let before = self.ctx.error_count();

        let mut outcome = self.elaborate_wires(scope, &function.wires);

        if function.ports.is_empty() && !self.ctx.config().system_verilog {
            self.ctx.report(ElabError::FunctionWithoutPorts {
                function: self.name(function.name),
                span: function.span,
            });
        }

        let returned = self.function_return(scope, function);
        let args = self.bind_ports(scope, Callable::Function, &function.ports, &function.wires, function.span);

        let return_signal = match returned {
            FunctionReturn::Signal(signal) => Some(Some(signal)),
            FunctionReturn::Void => Some(None),
            FunctionReturn::Missing => None,
        };
        if let Some(return_signal) = return_signal {
            debug!(scope = %self.scope_path(scope), "attaching function definition");
            self.design.set_definition(
                scope,
                Definition::Function(FunctionDef {
                    return_signal,
                    args,
                }),
            );
        }

        outcome = outcome.and(self.ctx.outcome_since(before));
        match &function.body {
            Some(body) => outcome.and(self.elaborate_stmt(scope, body)),
            None => outcome,
        }
    }

    pub(crate) fn elaborate_task(&mut self, scope: ScopeId, task: &'ctx Task) -> Outcome {
        if !self.enter_callable(scope) {
            return Outcome::Clean;
        }
        let before = self.ctx.error_count();

        let mut outcome = self.elaborate_wires(scope, &task.wires);
        let args = self.bind_ports(scope, Callable::Task, &task.ports, &task.wires, task.span);
        debug!(scope = %self.scope_path(scope), "attaching task definition");
        self.design
            .set_definition(scope, Definition::Task(TaskDef { args }));

        outcome = outcome.and(self.ctx.outcome_since(before));
        match &task.body {
            Some(body) => outcome.and(self.elaborate_stmt(scope, body)),
            None => outcome,
        }
    }

    /// Synthesizes the return-value signal from the declared return type
    fn function_return(&mut self, scope: ScopeId, function: &Function) -> FunctionReturn {
        let return_type = &function.return_type;
        let mut signal = Signal::new(function.name, scope, SignalKind::Register, function.span);
        signal.port = PortDirection::Output;

        match return_type.kind {
            ReturnKind::Reg | ReturnKind::RegSigned => {
                if return_type.ranges.is_empty() {
                    signal.scalar = true;
                } else {
                    let Some(range) = self.single_return_range(function) else {
                        return FunctionReturn::Missing;
                    };
                    let (msb, lsb) = self.return_bounds(scope, function, range);
                    signal.packed = vec![NetRange::new(msb, lsb)];
                }
                signal.signed = return_type.kind == ReturnKind::RegSigned;
            }
            ReturnKind::Integer => {
                signal.packed = vec![NetRange::with_width(u64::from(self.ctx.config().integer_width))];
                signal.signed = true;
                signal.is_int = true;
            }
            ReturnKind::Time => {
                signal.packed = vec![NetRange::with_width(64)];
            }
            ReturnKind::Real | ReturnKind::RealTime => {
                signal.scalar = true;
                signal.signed = true;
                signal.data_type = DataType::Real;
            }
            ReturnKind::Atom2 | ReturnKind::Atom2Signed => {
                let Some(range) = self.single_return_range(function) else {
                    return FunctionReturn::Missing;
                };
                let (msb, lsb) = self.return_bounds(scope, function, range);
                let declared = NetRange::new(msb, lsb);
                let Some(width) = declared.width() else {
                    self.ctx.report(ElabError::PackedWidthOverflow {
                        name: self.name(function.name),
                        range: declared.to_string(),
                        span: function.span,
                    });
                    return FunctionReturn::Missing;
                };
                signal.packed = vec![NetRange::with_width(width)];
                signal.signed = return_type.kind == ReturnKind::Atom2Signed;
                signal.is_int = true;
                signal.data_type = DataType::Bool;
            }
            ReturnKind::String => {
                self.ctx.report(ElabError::StringFunction {
                    function: self.name(function.name),
                    span: function.span,
                });
                return FunctionReturn::Missing;
            }
            ReturnKind::Void => {
                if function.ports.is_empty() {
                    return FunctionReturn::Void;
                }
                self.ctx.report(ElabError::VoidFunctionWithPorts {
                    function: self.name(function.name),
                    span: function.span,
                });
                return FunctionReturn::Missing;
            }
        }

        debug!(
            function = %self.name(function.name),
            width = ?signal.packed_width(),
            "created return signal"
        );
        FunctionReturn::Signal(self.design.add_signal(signal))
    }

    fn single_return_range<'fun>(&mut self, function: &'fun Function) -> Option<&'fun DeclRange> {
        match function.return_type.ranges.as_slice() {
            [range] => Some(range),
            ranges => {
                self.ctx.report(ElabError::ReturnRangeCount {
                    function: self.name(function.name),
                    count: ranges.len(),
                    span: function.span,
                });
                None
            }
        }
    }

    /// Bounds of a return range; a bound that is not constant counts as 0
    fn return_bounds(&mut self, scope: ScopeId, function: &Function, range: &DeclRange) -> (i64, i64) {
        let msb = self.return_bound(scope, function, range.msb, "MSB");
        let lsb = self.return_bound(scope, function, range.lsb, "LSB");
        (msb, lsb)
    }

    fn return_bound(
        &mut self,
        scope: ScopeId,
        function: &Function,
        expr: Option<ExprId>,
        bound: &'static str,
    ) -> i64 {
        if let Some(value) = expr.and_then(|expr| self.eval.eval_long(self.design, scope, expr).ok()) {
            return value;
        }
        self.ctx.report(ElabError::NonConstantReturnRange {
            function: self.name(function.name),
            bound,
            span: expr.map_or(function.span, |expr| self.pform.expr_span(expr)),
        });
        0
    }

    /// Looks up each declared port as a signal of the callable's own scope
    ///
    /// A port whose declaration was dropped keeps an empty slot; that problem
    /// has already been reported.
    fn bind_ports(
        &mut self,
        scope: ScopeId,
        callable: Callable,
        ports: &[Symbol],
        wires: &FxIndexMap<Symbol, Wire>,
        span: FileSpan,
    ) -> Vec<Option<SignalId>> {
        let mut args = Vec::with_capacity(ports.len());
        for &port in ports {
            args.push(self.bind_port(scope, callable, port, wires, span));
        }
        args
    }

    fn bind_port(
        &mut self,
        scope: ScopeId,
        callable: Callable,
        port: Symbol,
        wires: &FxIndexMap<Symbol, Wire>,
        span: FileSpan,
    ) -> Option<SignalId> {
        let Some(id) = self.design.find_signal(scope, port) else {
            if !wires.contains_key(&port) {
                self.ctx.report(ElabError::MissingArgument {
                    callable: callable.describe(),
                    scope: self.scope_path(scope),
                    port: self.name(port),
                    span,
                });
            }
            return None;
        };

        let direction = self.design.signal(id).port;
        if direction == PortDirection::NotAPort {
            self.ctx.report(ElabError::ArgumentNotAPort {
                callable: callable.describe(),
                scope: self.scope_path(scope),
                port: self.name(port),
                span,
            });
            return None;
        }
        if callable.requires_inputs() && direction != PortDirection::Input {
            self.ctx.report(ElabError::NonInputArgument {
                scope: self.scope_path(scope),
                port: self.name(port),
                span: self.design.signal(id).span,
            });
        }
        Some(id)
    }
}
