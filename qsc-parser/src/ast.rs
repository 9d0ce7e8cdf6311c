//! Abstract syntax tree for OpenQASM 2.0

use serde::{Deserialize, Serialize};

/// A complete parsed program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Declared version, e.g. "2.0"
    pub version: String,
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
}

/// A statement with its source position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// 1-based line of the statement's first token
    pub line: usize,
    /// 1-based column of the statement's first token
    pub column: usize,
}

/// Statement payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `include "file";`
    Include { path: String },

    /// `qreg name[n];`
    QregDecl { name: String, size: u32 },

    /// `creg name[n];`
    CregDecl { name: String, size: u32 },

    /// `gate name(params) qubits { body }`
    GateDef(GateDef),

    /// `name(exprs) qubits;`
    GateCall(GateCall),

    /// `measure q -> c;`
    Measure { qubit: RegRef, cbit: RegRef },

    /// `reset q;`
    Reset { qubit: RegRef },

    /// `barrier q, r;`
    Barrier { qubits: Vec<RegRef> },

    /// `if (creg == value) gatecall;`
    If {
        creg: String,
        value: u64,
        call: GateCall,
    },
}

/// A user gate definition
///
/// The body is lexically scoped to `params` and `qubits`; bodies may only
/// contain gate calls and barriers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDef {
    pub name: String,
    pub params: Vec<String>,
    pub qubits: Vec<String>,
    pub body: Vec<Statement>,
}

/// A gate invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub qubits: Vec<RegRef>,
}

/// Reference to a register or one of its elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegRef {
    pub register: String,
    /// `None` refers to the whole register
    pub index: Option<u32>,
}

impl RegRef {
    /// Reference one element of a register
    pub fn indexed(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Reference a whole register
    pub fn whole(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

/// Real-valued parameter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Int(i64),
    Float(f64),
    Pi,
    /// A gate-definition parameter name
    Ident(String),
    Neg(Box<Expression>),
    BinOp {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `sin`, `cos`, `tan`, `exp`, `ln`, `sqrt`, `pow`
    Call {
        name: String,
        args: Vec<Expression>,
    },
}

/// Binary operators over real expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Expression {
    /// Evaluate with parameter bindings
    ///
    /// Returns `None` for an unbound identifier, an unknown function, or a
    /// wrong argument count; the caller turns that into a diagnostic.
    pub fn eval(&self, bindings: &ahash::AHashMap<String, f64>) -> Option<f64> {
        match self {
            Expression::Int(v) => Some(*v as f64),
            Expression::Float(v) => Some(*v),
            Expression::Pi => Some(std::f64::consts::PI),
            Expression::Ident(name) => bindings.get(name).copied(),
            Expression::Neg(e) => e.eval(bindings).map(|v| -v),
            Expression::BinOp { op, left, right } => {
                let l = left.eval(bindings)?;
                let r = right.eval(bindings)?;
                Some(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                })
            }
            Expression::Call { name, args } => {
                let values: Vec<f64> = args
                    .iter()
                    .map(|a| a.eval(bindings))
                    .collect::<Option<_>>()?;
                match (name.as_str(), values.as_slice()) {
                    ("sin", [x]) => Some(x.sin()),
                    ("cos", [x]) => Some(x.cos()),
                    ("tan", [x]) => Some(x.tan()),
                    ("exp", [x]) => Some(x.exp()),
                    ("ln", [x]) => Some(x.ln()),
                    ("sqrt", [x]) => Some(x.sqrt()),
                    ("pow", [base, exp]) => Some(base.powf(*exp)),
                    _ => None,
                }
            }
        }
    }
}
