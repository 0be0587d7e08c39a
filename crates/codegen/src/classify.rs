//! Call-shape classification of procedures.

use std::fmt;

use crate::schema::{Procedure, ProcedureKind};

/// Which sides of a call carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoShape {
    InputOutput,
    InputOnly,
    OutputOnly,
    Neither,
}

impl IoShape {
    pub fn new(has_input: bool, has_output: bool) -> Self {
        match (has_input, has_output) {
            (true, true) => IoShape::InputOutput,
            (true, false) => IoShape::InputOnly,
            (false, true) => IoShape::OutputOnly,
            (false, false) => IoShape::Neither,
        }
    }
}

/// How a procedure is called from the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallShape {
    pub kind: ProcedureKind,
    pub io: IoShape,
}

impl CallShape {
    /// Whether the client accessor takes an argument.
    pub fn takes_input(&self) -> bool {
        matches!(self.io, IoShape::InputOutput | IoShape::InputOnly)
    }

    /// Whether the client accessor resolves to a value rather than `void`.
    pub fn returns_value(&self) -> bool {
        matches!(self.io, IoShape::InputOutput | IoShape::OutputOnly)
    }

    /// Name of the tRPC builder method that terminates the procedure chain.
    pub fn resolver(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn describe(&self) -> &'static str {
        match (self.kind, self.io) {
            (ProcedureKind::Query, IoShape::InputOutput) => "parameterized read",
            (ProcedureKind::Query, IoShape::OutputOnly) => "parameterless read",
            (ProcedureKind::Query, IoShape::InputOnly) => "parameterized void query",
            (ProcedureKind::Query, IoShape::Neither) => "void query",
            (ProcedureKind::Mutation, IoShape::InputOutput) => "write with result",
            (ProcedureKind::Mutation, IoShape::OutputOnly) => "parameterless write with result",
            (ProcedureKind::Mutation, IoShape::InputOnly) => "write",
            (ProcedureKind::Mutation, IoShape::Neither) => "parameterless write",
        }
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

pub fn classify(procedure: &Procedure) -> CallShape {
    CallShape {
        kind: procedure.kind,
        io: IoShape::new(procedure.input.is_some(), procedure.output.is_some()),
    }
}
