//! JSON circuit serialization
//!
//! The interchange shape is `{version, qubits, cbits, gates: [...]}` with
//! lowercase gate-kind names. Measurement targets and classical conditions
//! are included only when present.

use crate::{Circuit, Gate};
use serde::Serialize;

/// Serialization format version
pub const JSON_FORMAT_VERSION: u32 = 1;

/// Serializable view of a circuit
#[derive(Debug, Serialize)]
pub struct JsonCircuit {
    pub version: u32,
    pub qubits: usize,
    pub cbits: usize,
    pub gates: Vec<JsonGate>,
}

/// Serializable view of one gate
#[derive(Debug, Serialize)]
pub struct JsonGate {
    pub kind: String,
    pub qubits: Vec<u32>,
    pub params: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cbit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<JsonCondition>,
}

/// Serializable classical condition
#[derive(Debug, Serialize)]
pub struct JsonCondition {
    pub mask: u64,
    pub value: u64,
}

impl From<&Gate> for JsonGate {
    fn from(gate: &Gate) -> Self {
        Self {
            kind: gate.kind().name().to_string(),
            qubits: gate.qubits().iter().map(|q| q.0).collect(),
            params: gate.params().to_vec(),
            cbit: gate.cbit().map(|c| c.0),
            condition: gate.condition().map(|c| JsonCondition {
                mask: c.mask,
                value: c.value,
            }),
        }
    }
}

impl From<&Circuit> for JsonCircuit {
    fn from(circuit: &Circuit) -> Self {
        Self {
            version: JSON_FORMAT_VERSION,
            qubits: circuit.num_qubits(),
            cbits: circuit.num_clbits(),
            gates: circuit.gates().map(JsonGate::from).collect(),
        }
    }
}

/// Serialize a circuit to a JSON string
pub fn to_json(circuit: &Circuit) -> String {
    // JsonCircuit contains no map keys or non-string keys, so this cannot fail.
    serde_json::to_string_pretty(&JsonCircuit::from(circuit))
        .unwrap_or_else(|_| String::from("{}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circuit, Gate, GateKind, QubitId};

    #[test]
    fn test_json_shape() {
        let mut circuit = Circuit::new(2, 2).unwrap();
        circuit.h(0).unwrap();
        circuit.cx(0, 1).unwrap();
        circuit.measure(0, 0).unwrap();

        let json = to_json(&circuit);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["qubits"], 2);
        assert_eq!(value["cbits"], 2);
        assert_eq!(value["gates"][0]["kind"], "h");
        assert_eq!(value["gates"][1]["kind"], "cx");
        assert_eq!(value["gates"][1]["qubits"][1], 1);
        assert_eq!(value["gates"][2]["kind"], "measure");
        assert_eq!(value["gates"][2]["cbit"], 0);
    }

    #[test]
    fn test_json_params_and_condition() {
        let mut circuit = Circuit::new(1, 1).unwrap();
        circuit.rx(1.25, 0).unwrap();
        circuit
            .push(
                Gate::new(GateKind::X, &[QubitId::new(0)])
                    .unwrap()
                    .with_condition(0b1, 1),
            )
            .unwrap();

        let json = to_json(&circuit);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["gates"][0]["params"][0], 1.25);
        assert_eq!(value["gates"][1]["condition"]["mask"], 1);
        assert!(value["gates"][0].get("cbit").is_none());
    }
}
