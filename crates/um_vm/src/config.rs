use serde::{Deserialize, Serialize};

/// What the Output operator does with a register value above 255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Emit the low 8 bits.
    #[default]
    Truncate,
    /// Stop with `Fault::OutputOutOfRange`.
    Fault,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Stop cleanly after this many instructions. Checked between instructions.
    pub step_limit: Option<u64>,
    pub output_policy: OutputPolicy,
}

impl MachineConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
