//! Minimal BIP-173 bech32 codec (original checksum constant, not bech32m).

use crate::error::DecodeError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(*v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let m = polymod(&values) ^ 1;
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((m >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

/// Regroup a bit stream from `from`-bit words into `to`-bit words.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, DecodeError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_v: u32 = (1 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for value in data {
        let v = u32::from(*value);
        if v >> from != 0 {
            return Err(DecodeError::new("bech32", "value out of range"));
        }
        acc = (acc << from) | v;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_v) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_v) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_v) != 0 {
        return Err(DecodeError::new("bech32", "invalid padding"));
    }
    Ok(out)
}

/// Encode `payload` bytes under the given human-readable part.
pub fn encode(hrp: &str, payload: &[u8]) -> Result<String, DecodeError> {
    let data = convert_bits(payload, 8, 5, true)?;
    let checksum = create_checksum(hrp, &data);
    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for d in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[*d as usize] as char);
    }
    Ok(out)
}

/// Decode a bech32 string into `(hrp, payload bytes)`, verifying the checksum.
pub fn decode(s: &str) -> Result<(String, Vec<u8>), DecodeError> {
    if s.len() > MAX_LEN {
        return Err(DecodeError::new("bech32", "string too long"));
    }
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(DecodeError::new("bech32", "mixed case"));
    }
    let s = s.to_ascii_lowercase();
    let sep = s
        .rfind('1')
        .ok_or_else(|| DecodeError::new("bech32", "missing separator"))?;
    if sep == 0 || sep + 1 + CHECKSUM_LEN > s.len() {
        return Err(DecodeError::new("bech32", "invalid separator position"));
    }
    let hrp = &s[..sep];
    let mut data = Vec::with_capacity(s.len() - sep - 1);
    for c in s[sep + 1..].bytes() {
        let idx = CHARSET
            .iter()
            .position(|x| *x == c)
            .ok_or_else(|| DecodeError::new("bech32", format!("invalid character '{}'", c as char)))?;
        data.push(idx as u8);
    }
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    if polymod(&values) != 1 {
        return Err(DecodeError::new("bech32", "checksum mismatch"));
    }
    data.truncate(data.len() - CHECKSUM_LEN);
    let payload = convert_bits(&data, 5, 8, false)?;
    Ok((hrp.to_string(), payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bip173_valid_vector() {
        let (hrp, data) = decode("A12UEL5L").unwrap();
        assert_eq!(hrp, "a");
        assert!(data.is_empty());
    }

    #[test]
    fn test_encode_decode_zero_key() {
        let encoded = encode("erd", &[0u8; 32]).unwrap();
        assert_eq!(
            encoded,
            "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu"
        );
        let (hrp, data) = decode(&encoded).unwrap();
        assert_eq!(hrp, "erd");
        assert_eq!(data, vec![0u8; 32]);
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let mut s = encode("erd", &[7u8; 32]).unwrap();
        let last = s.pop().unwrap();
        s.push(if last == 'q' { 'p' } else { 'q' });
        assert!(decode(&s).is_err());
    }

    #[test]
    fn test_rejects_mixed_case() {
        assert!(decode("A12uEL5L").is_err());
    }
}
