//! Snapshot cache for quantum states
//!
//! Labeled copies of the amplitude vector. The cache is bounded: saving
//! past `max_entries` evicts the oldest label. Snapshots never alias the
//! live state.
//!
//! The cache can be persisted to a binary file: magic `QSSC`, version
//! `u32`, then per entry `(label_len u32, label bytes, num_qubits u32,
//! 2^n × (f64 re, f64 im))`, all little-endian.

use crate::dense_state::QuantumState;
use crate::error::{Result, StateError};
use num_complex::Complex64;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// File magic for persisted caches
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"QSSC";

/// Snapshot file format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default cache bound
pub const DEFAULT_MAX_ENTRIES: usize = 16;

/// A saved amplitude vector
#[derive(Clone, Debug)]
pub struct Snapshot {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Snapshot {
    /// Number of qubits in the saved state
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The saved amplitudes
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }
}

/// Bounded label → snapshot cache
///
/// # Example
/// ```
/// use qsc_state::{QuantumState, SnapshotCache};
///
/// let mut cache = SnapshotCache::new(8);
/// let mut state = QuantumState::new(2).unwrap();
///
/// cache.save("start", &state);
/// state.apply_h(0).unwrap();
/// cache.restore("start", &mut state).unwrap();
/// assert!((state.amplitudes()[0].re - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct SnapshotCache {
    entries: Vec<(String, Snapshot)>,
    max_entries: usize,
}

impl SnapshotCache {
    /// Create a cache bounded to `max_entries` snapshots
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in insertion order, oldest first
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Whether a label is present
    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    /// Save a copy of the current amplitudes under `label`
    ///
    /// Re-saving an existing label replaces its snapshot and refreshes its
    /// eviction position. When the bound is exceeded the oldest entry is
    /// dropped.
    pub fn save(&mut self, label: impl Into<String>, state: &QuantumState) {
        let label = label.into();
        let snapshot = Snapshot {
            num_qubits: state.num_qubits(),
            amplitudes: state.amplitudes().to_vec(),
        };

        if let Some(pos) = self.entries.iter().position(|(l, _)| *l == label) {
            self.entries.remove(pos);
        }
        self.entries.push((label, snapshot));

        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    /// Look up a snapshot without touching the live state
    pub fn get(&self, label: &str) -> Option<&Snapshot> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, snapshot)| snapshot)
    }

    /// Replace the live amplitudes from a snapshot
    ///
    /// # Errors
    /// Returns `CacheMiss` for an unknown label and `DimensionMismatch`
    /// when the snapshot width differs from the state width.
    pub fn restore(&self, label: &str, state: &mut QuantumState) -> Result<()> {
        let snapshot = self.get(label).ok_or_else(|| StateError::CacheMiss {
            label: label.to_string(),
        })?;
        if snapshot.num_qubits != state.num_qubits() {
            return Err(StateError::DimensionMismatch {
                expected: state.dimension(),
                actual: snapshot.amplitudes.len(),
            });
        }
        state
            .amplitudes_mut()
            .copy_from_slice(&snapshot.amplitudes);
        Ok(())
    }

    /// Remove every snapshot
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Persist the cache to `path`
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Load a cache from `path`, respecting `max_entries`
    pub fn load_from(path: impl AsRef<Path>, max_entries: usize) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_from(BufReader::new(file), max_entries)
    }

    /// Serialize the cache into a writer
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;

        for (label, snapshot) in &self.entries {
            writer.write_all(&(label.len() as u32).to_le_bytes())?;
            writer.write_all(label.as_bytes())?;
            writer.write_all(&(snapshot.num_qubits as u32).to_le_bytes())?;
            for amp in &snapshot.amplitudes {
                writer.write_all(&amp.re.to_le_bytes())?;
                writer.write_all(&amp.im.to_le_bytes())?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Deserialize a cache from a reader
    pub fn read_from(mut reader: impl Read, max_entries: usize) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(StateError::BadSnapshotFile {
                reason: "bad magic".to_string(),
            });
        }

        let version = read_u32(&mut reader)?;
        if version != SNAPSHOT_VERSION {
            return Err(StateError::BadSnapshotFile {
                reason: format!("unsupported version {}", version),
            });
        }

        let mut cache = Self::new(max_entries);
        loop {
            let label_len = match read_u32_opt(&mut reader)? {
                Some(len) => len as usize,
                None => break,
            };
            let mut label_bytes = vec![0u8; label_len];
            reader.read_exact(&mut label_bytes)?;
            let label = String::from_utf8(label_bytes).map_err(|_| StateError::BadSnapshotFile {
                reason: "label is not UTF-8".to_string(),
            })?;

            let num_qubits = read_u32(&mut reader)? as usize;
            if num_qubits > crate::state_vector::MAX_QUBITS {
                return Err(StateError::BadSnapshotFile {
                    reason: format!("snapshot width {} too large", num_qubits),
                });
            }
            let dimension = 1usize << num_qubits;
            let mut amplitudes = Vec::with_capacity(dimension);
            let mut buf = [0u8; 16];
            for _ in 0..dimension {
                reader.read_exact(&mut buf)?;
                let re = f64::from_le_bytes(buf[0..8].try_into().expect("8-byte slice"));
                let im = f64::from_le_bytes(buf[8..16].try_into().expect("8-byte slice"));
                amplitudes.push(Complex64::new(re, im));
            }

            cache.entries.push((
                label,
                Snapshot {
                    num_qubits,
                    amplitudes,
                },
            ));
            while cache.entries.len() > cache.max_entries {
                cache.entries.remove(0);
            }
        }
        Ok(cache)
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a u32 or detect a clean end of file
fn read_u32_opt(reader: &mut impl Read) -> Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < 4 {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(StateError::BadSnapshotFile {
                reason: "truncated entry header".to_string(),
            });
        }
        filled += n;
    }
    Ok(Some(u32::from_le_bytes(buf)))
}
