//! CSI parameter parsing
//!
//! Parameters are `;`-separated decimal numbers. A parameter may carry
//! `:`-separated subparameters (`38:2:255:0:0`).

/// Maximum number of parameters we'll track. Extra parameters are dropped.
pub const MAX_PARAMS: usize = 32;

/// CSI parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    /// Parameter values (0 means default/unspecified)
    values: Vec<u16>,
    /// Subparameters following each value, same length as `values`
    subparams: Vec<Vec<u16>>,
}

impl Params {
    /// Create empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Create params from a slice
    pub fn from_slice(values: &[u16]) -> Self {
        let values: Vec<u16> = values.iter().copied().take(MAX_PARAMS).collect();
        let subparams = vec![Vec::new(); values.len()];
        Self { values, subparams }
    }

    /// Parse parameters from the raw bytes collected between `CSI` and the
    /// final byte. Values saturate at `u16::MAX`.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut params = Self::new();
        if bytes.is_empty() {
            return params;
        }

        let mut group: Vec<u16> = Vec::new();
        let mut current: u16 = 0;

        for &byte in bytes {
            match byte {
                b'0'..=b'9' => {
                    current = current
                        .saturating_mul(10)
                        .saturating_add(u16::from(byte - b'0'));
                }
                b':' => {
                    group.push(current);
                    current = 0;
                }
                b';' => {
                    group.push(current);
                    params.push_group(&mut group);
                    current = 0;
                }
                _ => {}
            }
        }

        group.push(current);
        params.push_group(&mut group);
        params
    }

    fn push_group(&mut self, group: &mut Vec<u16>) {
        if self.values.len() < MAX_PARAMS {
            if let Some((&value, rest)) = group.split_first() {
                self.values.push(value);
                self.subparams.push(rest.to_vec());
            }
        }
        group.clear();
    }

    /// Get parameter at index, returning None if not present or zero
    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied().filter(|&v| v != 0)
    }

    /// Get parameter at index with default value
    pub fn get_or(&self, index: usize, default: u16) -> u16 {
        self.get(index).unwrap_or(default)
    }

    /// Get raw value at index (0 if not present)
    pub fn raw(&self, index: usize) -> u16 {
        self.values.get(index).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Subparameters attached to the parameter at `index`
    pub fn subparams(&self, index: usize) -> &[u16] {
        self.subparams.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over parameter values
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }
}
