use crate::error::SetupError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_KALLSYMS: &str = "/proc/kallsyms";

/// Kernel symbol table in `/proc/kallsyms` format.
#[derive(Debug, Default, Clone)]
pub struct KernelSymbols {
    symbols: HashMap<String, u64>,
}

impl KernelSymbols {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SetupError::load_kallsyms(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Lines are `address type name [module]`. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut symbols = HashMap::new();

        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let (Some(addr), Some(_kind), Some(name)) = (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            let Ok(addr) = u64::from_str_radix(addr, 16) else {
                continue;
            };
            symbols.entry(name.to_string()).or_insert(addr);
        }

        Self { symbols }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
