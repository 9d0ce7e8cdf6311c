//! AST → Circuit lowering
//!
//! Walks a validated program in source order and produces a flat
//! [`Circuit`]. Registers are concatenated in declaration order; the
//! `(register, index) → flat index` mapping lives in the lowerer and the
//! circuit itself only sees flat indices. User-defined gates are inlined
//! at call sites up to a configurable depth.

use ahash::AHashMap;
use qsc_core::{Circuit, ClbitId, Gate, GateKind, QubitId};

use crate::ast::{GateCall, GateDef, Program, RegRef, Statement, StatementKind};
use crate::error::{Diagnostic, ParseError, ParseResult};
use crate::parser::parse_ast;

/// Default maximum gate-inlining depth
pub const DEFAULT_INLINE_DEPTH: usize = 16;

/// Maximum include nesting
const INCLUDE_DEPTH_LIMIT: usize = 8;

/// Resolver callback mapping an include path to source text
pub type IncludeResolver<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Lower a program to a circuit with the default inlining depth
pub fn lower(program: &Program) -> ParseResult<Circuit> {
    Lowerer::new(DEFAULT_INLINE_DEPTH).lower(program)
}

/// Lower with a custom gate-inlining depth bound
pub fn lower_with_inline_depth(program: &Program, max_depth: usize) -> ParseResult<Circuit> {
    Lowerer::new(max_depth).lower(program)
}

/// Splice resolved includes into the statement stream
///
/// `"qelib1.inc"` resolves to the builtin gate set and vanishes. Other
/// paths go through `resolver`; without one they are diagnostics, since
/// the caller owns file I/O.
pub fn expand_includes(
    program: Program,
    resolver: Option<&IncludeResolver<'_>>,
) -> ParseResult<Program> {
    let mut diagnostics = Vec::new();
    let statements = expand_statements(program.statements, resolver, 0, &mut diagnostics);
    if diagnostics.is_empty() {
        Ok(Program {
            version: program.version,
            statements,
        })
    } else {
        Err(ParseError::new(diagnostics))
    }
}

fn expand_statements(
    statements: Vec<Statement>,
    resolver: Option<&IncludeResolver<'_>>,
    depth: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Statement> {
    let mut out = Vec::with_capacity(statements.len());
    for statement in statements {
        let StatementKind::Include { ref path } = statement.kind else {
            out.push(statement);
            continue;
        };

        if path == "qelib1.inc" {
            continue; // builtin gate set
        }
        if depth >= INCLUDE_DEPTH_LIMIT {
            diagnostics.push(Diagnostic::new(
                statement.line,
                statement.column,
                format!("include nesting exceeds {INCLUDE_DEPTH_LIMIT} levels"),
            ));
            continue;
        }

        let Some(resolver) = resolver else {
            diagnostics.push(Diagnostic::new(
                statement.line,
                statement.column,
                format!("cannot resolve include \"{path}\": no resolver supplied"),
            ));
            continue;
        };
        let Some(source) = resolver(path) else {
            diagnostics.push(Diagnostic::new(
                statement.line,
                statement.column,
                format!("cannot resolve include \"{path}\""),
            ));
            continue;
        };

        match parse_ast(&source) {
            Ok(included) => {
                let mut inner =
                    expand_statements(included.statements, Some(resolver), depth + 1, diagnostics);
                out.append(&mut inner);
            }
            Err(err) => {
                for diag in err.diagnostics {
                    diagnostics.push(Diagnostic::new(
                        diag.line,
                        diag.column,
                        format!("in \"{path}\": {}", diag.message),
                    ));
                }
            }
        }
    }
    out
}

struct Lowerer {
    /// Register name → (flat start, width); qregs and cregs share this
    /// namespace per the language rules
    qregs: AHashMap<String, (u32, u32)>,
    cregs: AHashMap<String, (u32, u32)>,
    gate_defs: AHashMap<String, GateDef>,
    diagnostics: Vec<Diagnostic>,
    max_inline_depth: usize,
}

/// Classical condition threaded through lowering
#[derive(Clone, Copy)]
struct LoweredCondition {
    mask: u64,
    value: u64,
}

impl Lowerer {
    fn new(max_inline_depth: usize) -> Self {
        Self {
            qregs: AHashMap::new(),
            cregs: AHashMap::new(),
            gate_defs: AHashMap::new(),
            diagnostics: Vec::new(),
            max_inline_depth,
        }
    }

    fn lower(mut self, program: &Program) -> ParseResult<Circuit> {
        // First pass: declarations
        let mut next_qubit = 0u32;
        let mut next_cbit = 0u32;
        for statement in &program.statements {
            match &statement.kind {
                StatementKind::QregDecl { name, size } => {
                    if self.register_exists(name) {
                        self.error(statement, format!("duplicate register '{name}'"));
                        continue;
                    }
                    self.qregs.insert(name.clone(), (next_qubit, *size));
                    next_qubit += size;
                }
                StatementKind::CregDecl { name, size } => {
                    if self.register_exists(name) {
                        self.error(statement, format!("duplicate register '{name}'"));
                        continue;
                    }
                    self.cregs.insert(name.clone(), (next_cbit, *size));
                    next_cbit += size;
                }
                StatementKind::GateDef(def) => {
                    if self.gate_defs.contains_key(&def.name) {
                        self.error(statement, format!("duplicate gate definition '{}'", def.name));
                        continue;
                    }
                    self.gate_defs.insert(def.name.clone(), def.clone());
                }
                _ => {}
            }
        }

        if next_qubit == 0 {
            self.diagnostics
                .push(Diagnostic::new(1, 1, "program declares no qubit registers"));
            return Err(ParseError::new(self.diagnostics));
        }
        if next_cbit > 64 {
            self.diagnostics.push(Diagnostic::new(
                1,
                1,
                "classical registers wider than 64 bits are not supported",
            ));
            return Err(ParseError::new(self.diagnostics));
        }

        let mut circuit = match Circuit::new(next_qubit as usize, next_cbit as usize) {
            Ok(circuit) => circuit,
            Err(err) => {
                self.diagnostics.push(Diagnostic::new(1, 1, err.to_string()));
                return Err(ParseError::new(self.diagnostics));
            }
        };

        // Second pass: operations in source order
        for statement in &program.statements {
            self.lower_statement(&mut circuit, statement);
        }

        if self.diagnostics.is_empty() {
            Ok(circuit)
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }

    fn register_exists(&self, name: &str) -> bool {
        self.qregs.contains_key(name) || self.cregs.contains_key(name)
    }

    fn error(&mut self, statement: &Statement, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(statement.line, statement.column, message));
    }

    fn lower_statement(&mut self, circuit: &mut Circuit, statement: &Statement) {
        match &statement.kind {
            StatementKind::Include { .. }
            | StatementKind::QregDecl { .. }
            | StatementKind::CregDecl { .. }
            | StatementKind::GateDef(_) => {}

            StatementKind::GateCall(call) => {
                self.lower_call(circuit, call, statement, None, 0, &AHashMap::new(), None);
            }

            StatementKind::Measure { qubit, cbit } => {
                let Some(qubits) = self.resolve_qubits(qubit, statement) else {
                    return;
                };
                let Some(cbits) = self.resolve_cbits(cbit, statement) else {
                    return;
                };
                if qubits.len() != cbits.len() {
                    self.error(
                        statement,
                        format!(
                            "measurement width mismatch: {} qubits into {} classical bits",
                            qubits.len(),
                            cbits.len()
                        ),
                    );
                    return;
                }
                for (q, c) in qubits.into_iter().zip(cbits) {
                    self.push(circuit, Gate::measure(q, c), statement);
                }
            }

            StatementKind::Reset { qubit } => {
                let Some(qubits) = self.resolve_qubits(qubit, statement) else {
                    return;
                };
                for q in qubits {
                    match Gate::new(GateKind::Reset, &[q]) {
                        Ok(gate) => self.push(circuit, gate, statement),
                        Err(err) => self.error(statement, err.to_string()),
                    }
                }
            }

            StatementKind::Barrier { qubits } => {
                let mut flat = Vec::new();
                for r in qubits {
                    let Some(mut resolved) = self.resolve_qubits(r, statement) else {
                        return;
                    };
                    flat.append(&mut resolved);
                }
                match Gate::barrier(&flat) {
                    Ok(gate) => self.push(circuit, gate, statement),
                    Err(err) => self.error(statement, err.to_string()),
                }
            }

            StatementKind::If { creg, value, call } => {
                let Some(&(start, size)) = self.cregs.get(creg) else {
                    self.error(statement, format!("undefined classical register '{creg}'"));
                    return;
                };
                if size < 64 && *value >= (1u64 << size) {
                    self.error(
                        statement,
                        format!("condition value {value} does not fit register '{creg}[{size}]'"),
                    );
                    return;
                }
                let condition = LoweredCondition {
                    mask: (((1u128 << size) - 1) as u64) << start,
                    value: value << start,
                };
                self.lower_call(
                    circuit,
                    call,
                    statement,
                    Some(condition),
                    0,
                    &AHashMap::new(),
                    None,
                );
            }
        }
    }

    /// Lower one gate call, broadcasting whole-register operands
    ///
    /// `bindings` maps gate-definition parameters to values and
    /// `qubit_env` maps formal qubit names to flat ids when lowering
    /// inside an inlined body.
    #[allow(clippy::too_many_arguments)]
    fn lower_call(
        &mut self,
        circuit: &mut Circuit,
        call: &GateCall,
        statement: &Statement,
        condition: Option<LoweredCondition>,
        depth: usize,
        bindings: &AHashMap<String, f64>,
        qubit_env: Option<&AHashMap<String, QubitId>>,
    ) {
        // Evaluate parameters in the current scope
        let mut params = Vec::with_capacity(call.params.len());
        for expr in &call.params {
            match expr.eval(bindings) {
                Some(value) => params.push(value),
                None => {
                    self.error(
                        statement,
                        format!("cannot evaluate parameter expression for '{}'", call.name),
                    );
                    return;
                }
            }
        }

        // Resolve operands, each to one or more flat qubits
        let mut operands: Vec<Vec<QubitId>> = Vec::with_capacity(call.qubits.len());
        for r in &call.qubits {
            let resolved = if let Some(env) = qubit_env {
                if r.index.is_some() {
                    self.error(
                        statement,
                        "register indexing is not allowed inside gate bodies",
                    );
                    return;
                }
                match env.get(&r.register) {
                    Some(&q) => vec![q],
                    None => {
                        self.error(
                            statement,
                            format!("unknown qubit name '{}' in gate body", r.register),
                        );
                        return;
                    }
                }
            } else {
                match self.resolve_qubits(r, statement) {
                    Some(list) => list,
                    None => return,
                }
            };
            operands.push(resolved);
        }

        // Broadcast: whole registers must agree on width; single qubits repeat
        let width = operands.iter().map(Vec::len).max().unwrap_or(1);
        if operands
            .iter()
            .any(|list| list.len() != width && list.len() != 1)
        {
            self.error(
                statement,
                format!("mismatched register widths in call to '{}'", call.name),
            );
            return;
        }

        for i in 0..width {
            let qubits: Vec<QubitId> = operands
                .iter()
                .map(|list| if list.len() == 1 { list[0] } else { list[i] })
                .collect();
            self.lower_single_call(circuit, call, statement, condition, depth, &params, &qubits);
        }
    }

    /// Lower one already-broadcast application
    #[allow(clippy::too_many_arguments)]
    fn lower_single_call(
        &mut self,
        circuit: &mut Circuit,
        call: &GateCall,
        statement: &Statement,
        condition: Option<LoweredCondition>,
        depth: usize,
        params: &[f64],
        qubits: &[QubitId],
    ) {
        if let Some(kind) = builtin_kind(&call.name) {
            let gate = match Gate::with_params(kind, qubits, params) {
                Ok(gate) => gate,
                Err(err) => {
                    self.error(statement, err.to_string());
                    return;
                }
            };
            let gate = match condition {
                Some(cond) => gate.with_condition(cond.mask, cond.value),
                None => gate,
            };
            self.push(circuit, gate, statement);
            return;
        }

        if call.name == "id" || call.name == "i" {
            return; // identity lowers to nothing
        }

        let Some(def) = self.gate_defs.get(&call.name).cloned() else {
            self.error(statement, format!("unknown gate '{}'", call.name));
            return;
        };

        if depth >= self.max_inline_depth {
            self.error(
                statement,
                format!(
                    "gate inlining exceeded depth {}; is '{}' recursive?",
                    self.max_inline_depth, call.name
                ),
            );
            return;
        }
        if def.params.len() != params.len() {
            self.error(
                statement,
                format!(
                    "gate '{}' takes {} parameters, {} given",
                    call.name,
                    def.params.len(),
                    params.len()
                ),
            );
            return;
        }
        if def.qubits.len() != qubits.len() {
            self.error(
                statement,
                format!(
                    "gate '{}' takes {} qubits, {} given",
                    call.name,
                    def.qubits.len(),
                    qubits.len()
                ),
            );
            return;
        }

        let mut bindings = AHashMap::new();
        for (name, &value) in def.params.iter().zip(params) {
            bindings.insert(name.clone(), value);
        }
        let mut env = AHashMap::new();
        for (name, &q) in def.qubits.iter().zip(qubits) {
            env.insert(name.clone(), q);
        }

        for body_statement in &def.body {
            match &body_statement.kind {
                StatementKind::GateCall(inner) => {
                    self.lower_call(
                        circuit,
                        inner,
                        body_statement,
                        condition,
                        depth + 1,
                        &bindings,
                        Some(&env),
                    );
                }
                StatementKind::Barrier { qubits: refs } => {
                    let mut flat = Vec::new();
                    for r in refs {
                        match env.get(&r.register) {
                            Some(&q) => flat.push(q),
                            None => {
                                self.error(
                                    body_statement,
                                    format!("unknown qubit name '{}' in gate body", r.register),
                                );
                                return;
                            }
                        }
                    }
                    match Gate::barrier(&flat) {
                        Ok(gate) => self.push(circuit, gate, body_statement),
                        Err(err) => self.error(body_statement, err.to_string()),
                    }
                }
                _ => {
                    self.error(
                        body_statement,
                        "gate bodies may only contain gate calls and barriers",
                    );
                }
            }
        }
    }

    fn push(&mut self, circuit: &mut Circuit, gate: Gate, statement: &Statement) {
        if let Err(err) = circuit.push(gate) {
            self.error(statement, err.to_string());
        }
    }

    fn resolve_qubits(&mut self, r: &RegRef, statement: &Statement) -> Option<Vec<QubitId>> {
        let Some(&(start, size)) = self.qregs.get(&r.register) else {
            let message = format!("undefined quantum register '{}'", r.register);
            self.error(statement, message);
            return None;
        };
        match r.index {
            Some(index) => {
                if index >= size {
                    self.error(
                        statement,
                        format!(
                            "index {} out of bounds for register '{}[{}]'",
                            index, r.register, size
                        ),
                    );
                    return None;
                }
                Some(vec![QubitId::new(start + index)])
            }
            None => Some((0..size).map(|i| QubitId::new(start + i)).collect()),
        }
    }

    fn resolve_cbits(&mut self, r: &RegRef, statement: &Statement) -> Option<Vec<ClbitId>> {
        let Some(&(start, size)) = self.cregs.get(&r.register) else {
            let message = format!("undefined classical register '{}'", r.register);
            self.error(statement, message);
            return None;
        };
        match r.index {
            Some(index) => {
                if index >= size {
                    self.error(
                        statement,
                        format!(
                            "index {} out of bounds for register '{}[{}]'",
                            index, r.register, size
                        ),
                    );
                    return None;
                }
                Some(vec![ClbitId::new(start + index)])
            }
            None => Some((0..size).map(|i| ClbitId::new(start + i)).collect()),
        }
    }
}

/// Resolve a gate name against the builtin set
///
/// Covers the qelib1 names plus the OpenQASM primitives `U` and `CX` and
/// a few common aliases.
fn builtin_kind(name: &str) -> Option<GateKind> {
    let kind = match name {
        "x" => GateKind::X,
        "y" => GateKind::Y,
        "z" => GateKind::Z,
        "h" => GateKind::H,
        "s" => GateKind::S,
        "sdg" => GateKind::Sdg,
        "t" => GateKind::T,
        "tdg" => GateKind::Tdg,
        "rx" => GateKind::Rx,
        "ry" => GateKind::Ry,
        "rz" => GateKind::Rz,
        "p" | "phase" => GateKind::Phase,
        "u1" => GateKind::U1,
        "u2" => GateKind::U2,
        "u3" | "u" | "U" => GateKind::U3,
        "cx" | "cnot" | "CX" => GateKind::Cnot,
        "cz" => GateKind::Cz,
        "swap" => GateKind::Swap,
        "iswap" => GateKind::ISwap,
        "siswap" => GateKind::SqrtISwap,
        "cp" | "cphase" => GateKind::CPhase,
        "crx" => GateKind::Crx,
        "cry" => GateKind::Cry,
        "crz" => GateKind::Crz,
        "cu1" => GateKind::Cu1,
        "cu2" => GateKind::Cu2,
        "cu3" => GateKind::Cu3,
        "ccx" | "toffoli" => GateKind::Ccx,
        "ccz" => GateKind::Ccz,
        "cswap" | "fredkin" => GateKind::Cswap,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_lower_bell() {
        let circuit = parse(
            r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0], q[1];
            measure q[0] -> c[0];
            measure q[1] -> c[1];
            "#,
        )
        .unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.get(0).unwrap().kind(), &GateKind::H);
        assert_eq!(circuit.get(1).unwrap().kind(), &GateKind::Cnot);
    }

    #[test]
    fn test_registers_concatenate() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg a[2];
            qreg b[3];
            x b[0];
            ",
        )
        .unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        // b starts at flat index 2
        assert_eq!(circuit.get(0).unwrap().qubits()[0], QubitId::new(2));
    }

    #[test]
    fn test_register_broadcast() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg q[3];
            h q;
            ",
        )
        .unwrap();
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_measure_register_broadcast() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg q[2];
            creg c[2];
            measure q -> c;
            ",
        )
        .unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.get(1).unwrap().cbit(), Some(ClbitId::new(1)));
    }

    #[test]
    fn test_gate_definition_inlined() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg q[2];
            gate entangle a, b { h a; cx a, b; }
            entangle q[0], q[1];
            ",
        )
        .unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.get(0).unwrap().kind(), &GateKind::H);
        assert_eq!(circuit.get(1).unwrap().kind(), &GateKind::Cnot);
    }

    #[test]
    fn test_gate_parameters_substituted() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg q[1];
            gate double(theta) a { rx(theta*2) a; }
            double(pi/4) q[0];
            ",
        )
        .unwrap();
        let gate = circuit.get(0).unwrap();
        assert_eq!(gate.kind(), &GateKind::Rx);
        assert!((gate.params()[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_recursive_gate_fails() {
        let err = parse(
            r"
            OPENQASM 2.0;
            qreg q[1];
            gate loop a { loop a; }
            loop q[0];
            ",
        )
        .unwrap_err();
        assert!(err.first().message.contains("depth"));
    }

    #[test]
    fn test_if_condition() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg q[1];
            creg c[2];
            measure q[0] -> c[0];
            if (c == 2) x q[0];
            ",
        )
        .unwrap();
        let cond = circuit.get(1).unwrap().condition().unwrap();
        assert_eq!(cond.mask, 0b11);
        assert_eq!(cond.value, 2);
    }

    #[test]
    fn test_if_value_range_checked() {
        let err = parse(
            r"
            OPENQASM 2.0;
            qreg q[1];
            creg c[1];
            if (c == 2) x q[0];
            ",
        )
        .unwrap_err();
        assert!(err.first().message.contains("does not fit"));
    }

    #[test]
    fn test_undefined_register() {
        let err = parse("OPENQASM 2.0;\nqreg q[1];\nh r[0];\n").unwrap_err();
        assert!(err.first().message.contains("undefined"));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = parse("OPENQASM 2.0;\nqreg q[2];\nh q[2];\n").unwrap_err();
        assert!(err.first().message.contains("out of bounds"));
    }

    #[test]
    fn test_duplicate_register_shared_namespace() {
        let err = parse("OPENQASM 2.0;\nqreg q[1];\ncreg q[1];\n").unwrap_err();
        assert!(err.first().message.contains("duplicate"));
    }

    #[test]
    fn test_unknown_gate() {
        let err = parse("OPENQASM 2.0;\nqreg q[1];\nfrobnicate q[0];\n").unwrap_err();
        assert!(err.first().message.contains("unknown gate"));
    }

    #[test]
    fn test_primitive_u_and_cx() {
        let circuit = parse(
            r"
            OPENQASM 2.0;
            qreg q[2];
            U(pi/2, 0, pi) q[0];
            CX q[0], q[1];
            ",
        )
        .unwrap();
        assert_eq!(circuit.get(0).unwrap().kind(), &GateKind::U3);
        assert_eq!(circuit.get(1).unwrap().kind(), &GateKind::Cnot);
    }

    #[test]
    fn test_include_without_resolver_fails() {
        let err = parse("OPENQASM 2.0;\ninclude \"mylib.inc\";\nqreg q[1];\n").unwrap_err();
        assert!(err.first().message.contains("resolver"));
    }

    #[test]
    fn test_include_with_resolver() {
        let resolver = |path: &str| {
            (path == "mylib.inc").then(|| {
                "OPENQASM 2.0;\ngate plus a { h a; }\n".to_string()
            })
        };
        let circuit = crate::parse_with_includes(
            "OPENQASM 2.0;\ninclude \"mylib.inc\";\nqreg q[1];\nplus q[0];\n",
            &resolver,
        )
        .unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.get(0).unwrap().kind(), &GateKind::H);
    }
}
