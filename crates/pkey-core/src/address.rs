//! Chain address formatting.
//!
//! An address is a chain alias, a `-` separator and a Bech32 string
//! ([BIP-173]) over a 20-byte [`ShortId`]:
//! - Mainnet: `P-avax1...`
//! - Fuji: `P-fuji1...`
//! - Local: `P-local1...`
//!
//! Unlike Bech32m, the checksum constant is 1. The checksum guarantees
//! detection of up to 4 character errors.
//!
//! [BIP-173]: https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki

use crate::constants::{P_CHAIN_ALIAS, hrp_for_network};
use crate::error::AddressError;
use crate::ids::ShortId;

/// Bech32 checksum constant (BIP-173).
const BECH32_CONST: u32 = 1;

/// Bech32 character set for encoding 5-bit values.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Maximum length of a Bech32 string.
const MAX_BECH32_LEN: usize = 90;

/// Separator between the chain alias and the Bech32 part.
pub const CHAIN_SEPARATOR: char = '-';

/// The components of a parsed chain address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Chain alias, e.g. `P`.
    pub chain: String,
    /// Human-readable prefix, e.g. `avax`.
    pub hrp: String,
    /// Decoded address bytes.
    pub bytes: Vec<u8>,
}

/// Format `bytes` as `<chain>-<bech32(hrp, bytes)>`.
pub fn format_address(chain: &str, hrp: &str, bytes: &[u8]) -> Result<String, AddressError> {
    let bech = format_bech32(hrp, bytes)?;
    Ok(format!("{chain}{CHAIN_SEPARATOR}{bech}"))
}

/// Derive the platform-chain address for a short ID on the given network.
///
/// # Examples
///
/// ```
/// use pkey_core::address::derive_p_address;
/// use pkey_core::ids::ShortId;
/// let addr = derive_p_address(1, &ShortId([0u8; 20])).unwrap();
/// assert!(addr.starts_with("P-avax1"));
/// ```
pub fn derive_p_address(network_id: u32, short_id: &ShortId) -> Result<String, AddressError> {
    format_address(P_CHAIN_ALIAS, hrp_for_network(network_id), short_id.as_bytes())
}

/// Split a chain address into its chain alias, HRP and bytes.
pub fn parse_address(addr: &str) -> Result<ParsedAddress, AddressError> {
    let (chain, bech) = addr
        .split_once(CHAIN_SEPARATOR)
        .ok_or(AddressError::MissingChainSeparator)?;
    let (hrp, bytes) = parse_bech32(bech)?;
    Ok(ParsedAddress {
        chain: chain.to_string(),
        hrp,
        bytes,
    })
}

/// Parse an address and return its 20-byte short ID.
pub fn parse_short_id(addr: &str) -> Result<ShortId, AddressError> {
    let parsed = parse_address(addr)?;
    let bytes: [u8; 20] = parsed
        .bytes
        .try_into()
        .map_err(|_| AddressError::InvalidLength)?;
    Ok(ShortId(bytes))
}

/// Encode bytes as a lowercase Bech32 string with the given HRP.
pub fn format_bech32(hrp: &str, bytes: &[u8]) -> Result<String, AddressError> {
    if hrp.is_empty() || !hrp.bytes().all(|c| (33..=126).contains(&c)) {
        return Err(AddressError::InvalidHrp);
    }
    let hrp = hrp.to_ascii_lowercase();
    let data = convert_bits(bytes, 8, 5, true).ok_or(AddressError::InvalidPadding)?;
    if hrp.len() + 1 + data.len() + 6 > MAX_BECH32_LEN {
        return Err(AddressError::InvalidLength);
    }

    let checksum = bech32_create_checksum(&hrp, &data);

    let mut result = String::with_capacity(hrp.len() + 1 + data.len() + 6);
    result.push_str(&hrp);
    result.push('1');
    for &d in data.iter().chain(checksum.iter()) {
        result.push(CHARSET[d as usize] as char);
    }
    Ok(result)
}

/// Decode a Bech32 string into its HRP and 8-bit payload.
pub fn parse_bech32(s: &str) -> Result<(String, Vec<u8>), AddressError> {
    // Reject mixed case (all alpha chars must be same case)
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }
    if s.len() > MAX_BECH32_LEN {
        return Err(AddressError::InvalidLength);
    }

    let s_lower = s.to_ascii_lowercase();

    // The HRP may itself contain '1', so split on the last one
    let sep_pos = s_lower.rfind('1').ok_or(AddressError::MissingSeparator)?;
    if sep_pos == 0 {
        return Err(AddressError::InvalidHrp);
    }
    if sep_pos + 7 > s_lower.len() {
        return Err(AddressError::InvalidLength);
    }

    let hrp = &s_lower[..sep_pos];
    let data_part = &s_lower[sep_pos + 1..];

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let pos = CHARSET
            .iter()
            .position(|&ch| ch as char == c)
            .ok_or(AddressError::InvalidCharacter(c))?;
        data.push(pos as u8);
    }

    if !bech32_verify_checksum(hrp, &data) {
        return Err(AddressError::InvalidChecksum);
    }

    let payload = &data[..data.len() - 6];
    let bytes = convert_bits(payload, 5, 8, false).ok_or(AddressError::InvalidPadding)?;
    Ok((hrp.to_string(), bytes))
}

// --- Bech32 internals ---

/// Compute the Bech32 polymod over a sequence of 5-bit values.
fn bech32_polymod(values: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
    let mut chk: u32 = 1;
    for &v in values {
        let b = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (v as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (b >> i) & 1 != 0 {
                chk ^= g;
            }
        }
    }
    chk
}

/// Expand the HRP for checksum computation.
fn bech32_hrp_expand(hrp: &str) -> Vec<u8> {
    let mut ret = Vec::with_capacity(hrp.len() * 2 + 1);
    for c in hrp.bytes() {
        ret.push(c >> 5);
    }
    ret.push(0);
    for c in hrp.bytes() {
        ret.push(c & 31);
    }
    ret
}

fn bech32_create_checksum(hrp: &str, data: &[u8]) -> Vec<u8> {
    let mut values = bech32_hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let polymod = bech32_polymod(&values) ^ BECH32_CONST;
    (0..6)
        .map(|i| ((polymod >> (5 * (5 - i))) & 31) as u8)
        .collect()
}

fn bech32_verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = bech32_hrp_expand(hrp);
    values.extend_from_slice(data);
    bech32_polymod(&values) == BECH32_CONST
}

/// Convert between bit widths (e.g. 8-bit bytes to 5-bit Bech32 groups).
fn convert_bits(data: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::new();
    let maxv = (1u32 << to_bits) - 1;
    for &value in data {
        let v = value as u32;
        if v >> from_bits != 0 {
            return None;
        }
        acc = (acc << from_bits) | v;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            ret.push(((acc << (to_bits - bits)) & maxv) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & maxv) != 0 {
        return None;
    }
    Some(ret)
}
