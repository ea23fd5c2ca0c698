//! Elaboration diagnostics
//!
//! Every problem the pass finds becomes an [`ElabError`]. None of them abort
//! the walk: the diagnostic is recorded in the context and elaboration moves
//! on to the next declaration or scope.

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use miette::Diagnostic;
use thiserror::Error;
use vl_span::FileSpan;

// Re-export codespan types for front ends rendering these diagnostics
pub use codespan_reporting;

/// How bad a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    /// Valid input the compiler does not support yet
    Sorry,
    /// A prior pass left the design inconsistent
    Internal,
}

impl Severity {
    /// Whether the diagnostic counts against the error total
    #[must_use]
    pub fn is_error(self) -> bool {
        self != Self::Warning
    }
}

/// What kind of rule a diagnostic enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// One identifier used in two declaration namespaces
    NameCollision,
    /// Non-constant or mismatched ranges
    Range,
    /// Unsupported or ill-formed types
    Type,
    /// Malformed ports and misused declarations
    Structural,
    /// Missing scopes, signals or types that an earlier pass should have created
    InternalConsistency,
}

/// A diagnostic raised while elaborating signals
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum ElabError {
    #[error("signal and {other} in '{scope}' have the same name '{name}'")]
    #[diagnostic(code(elab::name_collision))]
    NameCollision {
        name: String,
        /// Kind of the other declaration, e.g. `parameter`
        other: &'static str,
        scope: String,
        span: FileSpan,
    },

    #[error("range expressions must be constant: {bound} of '{name}'")]
    #[diagnostic(code(elab::non_constant_range))]
    NonConstantRange {
        name: String,
        /// `MSB` or `LSB`
        bound: &'static str,
        span: FileSpan,
    },

    #[error("scalar port '{name}' has a vectored net declaration {net_range}")]
    #[diagnostic(code(elab::scalar_port_vector_net), severity(Warning))]
    ScalarPortVectorNet {
        name: String,
        net_range: String,
        span: FileSpan,
    },

    #[error("scalar port '{name}' has a vectored net declaration {net_range}")]
    #[diagnostic(
        code(elab::scalar_port_vector_net),
        help("strict port ranges are enabled; declare the port with the same range")
    )]
    StrictScalarPortVectorNet {
        name: String,
        net_range: String,
        span: FileSpan,
    },

    #[error("vectored port '{name}' {port_range} has a scalar net declaration")]
    #[diagnostic(code(elab::vector_port_scalar_net))]
    VectorPortScalarNet {
        name: String,
        port_range: String,
        span: FileSpan,
    },

    #[error("vectored port '{name}' {port_range} has a net declaration {net_range} that does not match")]
    #[diagnostic(code(elab::port_range_mismatch))]
    PortRangeMismatch {
        name: String,
        port_range: String,
        net_range: String,
        span: FileSpan,
    },

    #[error("packed width of '{name}' {range} does not fit in 64 bits")]
    #[diagnostic(code(elab::packed_width_overflow))]
    PackedWidthOverflow {
        name: String,
        /// The offending dimensions, or the type they belong to
        range: String,
        span: FileSpan,
    },

    #[error("the indices are not constant for array '{name}'")]
    #[diagnostic(code(elab::non_constant_array_bound))]
    NonConstantArrayBound { name: String, span: FileSpan },

    #[error("sorry: dynamic arrays of arrays are not supported ('{name}')")]
    #[diagnostic(code(elab::dynamic_array_of_arrays))]
    DynamicArrayOfArrays { name: String, span: FileSpan },

    #[error("internal error: dimension of '{name}' has only one bound")]
    #[diagnostic(code(elab::half_open_range))]
    HalfOpenRange { name: String, span: FileSpan },

    #[error("internal error: no enumeration declares '{member}' for signal '{name}'")]
    #[diagnostic(code(elab::missing_enum))]
    MissingEnum {
        name: String,
        member: String,
        span: FileSpan,
    },

    #[error("internal error: {message} for '{name}'")]
    #[diagnostic(code(elab::malformed_type))]
    MalformedType {
        name: String,
        message: &'static str,
        span: FileSpan,
    },

    #[error("sorry: packed arrays of {base} are not supported ('{name}')")]
    #[diagnostic(code(elab::packed_array_base))]
    UnsupportedPackedArrayBase {
        name: String,
        base: &'static str,
        span: FileSpan,
    },

    #[error("real {what} '{name}' cannot be declared as a vector, found a range {range}")]
    #[diagnostic(code(elab::real_vector))]
    RealVector {
        name: String,
        /// `variable` or `net`
        what: &'static str,
        range: String,
        span: FileSpan,
    },

    #[error("attribute '{key}' of '{name}' must have a constant value")]
    #[diagnostic(code(elab::non_constant_attribute))]
    NonConstantAttribute {
        key: String,
        name: String,
        span: FileSpan,
    },

    #[error("sorry: reference ports not supported yet ('{name}')")]
    #[diagnostic(code(elab::ref_port))]
    RefPort { name: String, span: FileSpan },

    #[error("port '{name}' of module '{module}' is declared as {direction} and as a reg type")]
    #[diagnostic(code(elab::reg_port))]
    RegPort {
        name: String,
        module: String,
        /// `input` or `inout`
        direction: &'static str,
        span: FileSpan,
    },

    #[error("port '{name}' of module '{module}' is declared as a real inout port")]
    #[diagnostic(code(elab::real_inout))]
    RealInout {
        name: String,
        module: String,
        span: FileSpan,
    },

    #[error("function '{function}' has no ports")]
    #[diagnostic(
        code(elab::function_without_ports),
        help("functions must have at least one input port")
    )]
    FunctionWithoutPorts { function: String, span: FileSpan },

    #[error("sorry: string functions are not supported yet ('{function}')")]
    #[diagnostic(code(elab::string_function))]
    StringFunction { function: String, span: FileSpan },

    #[error("sorry: void function '{function}' with ports is not supported")]
    #[diagnostic(code(elab::void_function_ports))]
    VoidFunctionWithPorts { function: String, span: FileSpan },

    #[error("internal error: return type of function '{function}' has {count} ranges")]
    #[diagnostic(code(elab::return_range_count))]
    ReturnRangeCount {
        function: String,
        count: usize,
        span: FileSpan,
    },

    #[error("unable to evaluate constant {bound} of the return range of '{function}'")]
    #[diagnostic(code(elab::non_constant_return_range))]
    NonConstantReturnRange {
        function: String,
        bound: &'static str,
        span: FileSpan,
    },

    #[error("internal error: {callable} '{scope}' is missing port '{port}'")]
    #[diagnostic(code(elab::missing_argument))]
    MissingArgument {
        /// `function` or `task`
        callable: &'static str,
        scope: String,
        port: String,
        span: FileSpan,
    },

    #[error("internal error: {callable} '{scope}' argument '{port}' has no port direction")]
    #[diagnostic(code(elab::argument_not_a_port))]
    ArgumentNotAPort {
        callable: &'static str,
        scope: String,
        port: String,
        span: FileSpan,
    },

    #[error("function '{scope}' port '{port}' is not an input port")]
    #[diagnostic(
        code(elab::non_input_argument),
        help("function arguments must be input ports")
    )]
    NonInputArgument {
        scope: String,
        port: String,
        span: FileSpan,
    },

    #[error("internal error: port '{path}' of module '{module}' has a hierarchical name")]
    #[diagnostic(code(elab::hierarchical_port))]
    HierarchicalPort {
        path: String,
        module: String,
        span: FileSpan,
    },

    #[error("port '{name}' ({position}) of module '{module}' is not declared within module")]
    #[diagnostic(code(elab::undeclared_port))]
    UndeclaredPort {
        name: String,
        /// 1-based position in the port header
        position: usize,
        module: String,
        span: FileSpan,
    },

    #[error("port '{name}' ({position}) of module '{module}' has no direction declaration")]
    #[diagnostic(code(elab::missing_port_direction))]
    MissingPortDirection {
        name: String,
        position: usize,
        module: String,
        span: FileSpan,
    },

    #[error("internal error: child scope for {kind} '{name}' missing in '{parent}'")]
    #[diagnostic(code(elab::missing_scope))]
    MissingScope {
        /// `function`, `task` or `named block`
        kind: &'static str,
        name: String,
        parent: String,
        span: FileSpan,
    },

    #[error("internal error: instance '{instance}' is in parent '{actual}' instead of '{expected}'")]
    #[diagnostic(code(elab::misparented_instance))]
    MisparentedInstance {
        instance: String,
        actual: String,
        expected: String,
        span: FileSpan,
    },

    #[error("internal error: no definition of module '{module}' for scope '{scope}'")]
    #[diagnostic(code(elab::missing_module))]
    MissingModule {
        module: String,
        scope: String,
        span: FileSpan,
    },
}

impl ElabError {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::ScalarPortVectorNet { .. } => Severity::Warning,

            Self::DynamicArrayOfArrays { .. }
            | Self::UnsupportedPackedArrayBase { .. }
            | Self::RefPort { .. }
            | Self::StringFunction { .. }
            | Self::VoidFunctionWithPorts { .. } => Severity::Sorry,

            Self::HalfOpenRange { .. }
            | Self::MissingEnum { .. }
            | Self::MalformedType { .. }
            | Self::ReturnRangeCount { .. }
            | Self::MissingArgument { .. }
            | Self::ArgumentNotAPort { .. }
            | Self::HierarchicalPort { .. }
            | Self::MissingScope { .. }
            | Self::MisparentedInstance { .. }
            | Self::MissingModule { .. } => Severity::Internal,

            Self::NameCollision { .. }
            | Self::NonConstantRange { .. }
            | Self::StrictScalarPortVectorNet { .. }
            | Self::VectorPortScalarNet { .. }
            | Self::PortRangeMismatch { .. }
            | Self::PackedWidthOverflow { .. }
            | Self::NonConstantArrayBound { .. }
            | Self::RealVector { .. }
            | Self::NonConstantAttribute { .. }
            | Self::RegPort { .. }
            | Self::RealInout { .. }
            | Self::FunctionWithoutPorts { .. }
            | Self::NonConstantReturnRange { .. }
            | Self::NonInputArgument { .. }
            | Self::UndeclaredPort { .. }
            | Self::MissingPortDirection { .. } => Severity::Error,
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NameCollision { .. } => ErrorCategory::NameCollision,

            Self::NonConstantRange { .. }
            | Self::ScalarPortVectorNet { .. }
            | Self::StrictScalarPortVectorNet { .. }
            | Self::VectorPortScalarNet { .. }
            | Self::PortRangeMismatch { .. }
            | Self::PackedWidthOverflow { .. }
            | Self::NonConstantArrayBound { .. }
            | Self::NonConstantAttribute { .. }
            | Self::NonConstantReturnRange { .. } => ErrorCategory::Range,

            Self::DynamicArrayOfArrays { .. }
            | Self::UnsupportedPackedArrayBase { .. }
            | Self::RealVector { .. }
            | Self::StringFunction { .. }
            | Self::VoidFunctionWithPorts { .. } => ErrorCategory::Type,

            Self::RefPort { .. }
            | Self::RegPort { .. }
            | Self::RealInout { .. }
            | Self::FunctionWithoutPorts { .. }
            | Self::NonInputArgument { .. }
            | Self::UndeclaredPort { .. }
            | Self::MissingPortDirection { .. } => ErrorCategory::Structural,

            Self::HalfOpenRange { .. }
            | Self::MissingEnum { .. }
            | Self::MalformedType { .. }
            | Self::ReturnRangeCount { .. }
            | Self::MissingArgument { .. }
            | Self::ArgumentNotAPort { .. }
            | Self::HierarchicalPort { .. }
            | Self::MissingScope { .. }
            | Self::MisparentedInstance { .. }
            | Self::MissingModule { .. } => ErrorCategory::InternalConsistency,
        }
    }

    /// Returns the span the diagnostic points at
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::NameCollision { span, .. }
            | Self::NonConstantRange { span, .. }
            | Self::ScalarPortVectorNet { span, .. }
            | Self::StrictScalarPortVectorNet { span, .. }
            | Self::VectorPortScalarNet { span, .. }
            | Self::PortRangeMismatch { span, .. }
            | Self::PackedWidthOverflow { span, .. }
            | Self::NonConstantArrayBound { span, .. }
            | Self::DynamicArrayOfArrays { span, .. }
            | Self::HalfOpenRange { span, .. }
            | Self::MissingEnum { span, .. }
            | Self::MalformedType { span, .. }
            | Self::UnsupportedPackedArrayBase { span, .. }
            | Self::RealVector { span, .. }
            | Self::NonConstantAttribute { span, .. }
            | Self::RefPort { span, .. }
            | Self::RegPort { span, .. }
            | Self::RealInout { span, .. }
            | Self::FunctionWithoutPorts { span, .. }
            | Self::StringFunction { span, .. }
            | Self::VoidFunctionWithPorts { span, .. }
            | Self::ReturnRangeCount { span, .. }
            | Self::NonConstantReturnRange { span, .. }
            | Self::MissingArgument { span, .. }
            | Self::ArgumentNotAPort { span, .. }
            | Self::NonInputArgument { span, .. }
            | Self::HierarchicalPort { span, .. }
            | Self::UndeclaredPort { span, .. }
            | Self::MissingPortDirection { span, .. }
            | Self::MissingScope { span, .. }
            | Self::MisparentedInstance { span, .. }
            | Self::MissingModule { span, .. } => *span,
        }
    }

    /// Convert to codespan diagnostic for rustc-style output
    ///
    /// The file id of the label is the raw [`vl_span::FileId`] of the span.
    #[must_use]
    pub fn to_codespan_diagnostic(&self) -> CodespanDiagnostic<u32> {
        let diagnostic = match self.severity() {
            Severity::Warning => CodespanDiagnostic::warning(),
            Severity::Error => CodespanDiagnostic::error(),
            Severity::Sorry => CodespanDiagnostic::error().with_notes(vec![
                "this construct is valid but not supported yet".to_string(),
            ]),
            Severity::Internal => CodespanDiagnostic::bug(),
        };
        let span = self.span();
        let diagnostic = diagnostic
            .with_message(self.to_string())
            .with_labels(vec![Label::primary(span.file.0, span.range())]);

        match Diagnostic::code(self) {
            Some(code) => diagnostic.with_code(code.to_string()),
            None => diagnostic,
        }
    }
}
