use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declarative multi-level pointer
///
/// - empty: no address
/// - one element: a fixed absolute address
/// - otherwise: element 0 is the base; every following offset is added to the
///   8-byte pointer read at the address computed so far
///
/// In offsets files each element is either an integer or a hex string such as
/// `"0x4024f40"` or `"-0x10"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerChain(Vec<i64>);

impl PointerChain {
    pub fn new(offsets: Vec<i64>) -> Self {
        Self(offsets)
    }

    pub const fn null() -> Self {
        Self(Vec::new())
    }

    pub fn fixed(address: i64) -> Self {
        Self(vec![address])
    }

    pub fn offsets(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<i64>> for PointerChain {
    fn from(offsets: Vec<i64>) -> Self {
        Self(offsets)
    }
}

impl<const N: usize> From<[i64; N]> for PointerChain {
    fn from(offsets: [i64; N]) -> Self {
        Self(offsets.to_vec())
    }
}

impl fmt::Display for PointerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|&o| format_offset(o)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

fn format_offset(offset: i64) -> String {
    if offset < 0 {
        format!("-0x{:x}", offset.unsigned_abs())
    } else {
        format!("0x{:x}", offset)
    }
}

/// Parse `0x1c`, `-0x10`, or a plain decimal
pub fn parse_offset(s: &str) -> Result<i64, String> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|e| format!("invalid offset '{}': {}", s, e))?;

    Ok(if negative { -value } else { value })
}

impl Serialize for PointerChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let parts: Vec<String> = self.0.iter().map(|&o| format_offset(o)).collect();
        parts.serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for PointerChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<RawOffset>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|item| match item {
                RawOffset::Int(v) => Ok(v),
                RawOffset::Text(s) => parse_offset(&s),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PointerChain)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("0x1c").unwrap(), 0x1c);
        assert_eq!(parse_offset("0X4024F40").unwrap(), 0x4024f40);
        assert_eq!(parse_offset("-0x10").unwrap(), -0x10);
        assert_eq!(parse_offset("224").unwrap(), 224);
        assert!(parse_offset("0xzz").is_err());
        assert!(parse_offset("").is_err());
    }

    #[test]
    fn test_display() {
        let chain = PointerChain::from([0x4024f60, 0x90, -0x8]);
        assert_eq!(chain.to_string(), "[0x4024f60, 0x90, -0x8]");
        assert_eq!(PointerChain::null().to_string(), "[]");
    }

    #[test]
    fn test_serde_accepts_ints_and_hex() {
        let chain: PointerChain = serde_json::from_str(r#"["0x47899a0", 1376, "0xe0"]"#).unwrap();
        assert_eq!(chain.offsets(), &[0x47899a0, 0x560, 0xe0]);

        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(json, r#"["0x47899a0","0x560","0xe0"]"#);
    }

    #[test]
    fn test_serde_rejects_garbage() {
        assert!(serde_json::from_str::<PointerChain>(r#"["nope"]"#).is_err());
    }
}
