//! ScVal conversions
//!
//! Encoders for the argument types the poll contract accepts and loose
//! readers for the values it returns.

use stellar_xdr::curr::{
    AccountId, Limits, PublicKey, ReadXdr, ScAddress, ScMap, ScString, ScVal, ScVec, StringM,
    Uint256, VecM, WriteXdr,
};

use super::{XdrError, XdrResult};

/// Encode a `G...` account address as an `ScVal::Address`
pub fn address_to_scval(address: &str) -> XdrResult<ScVal> {
    let key = stellar_strkey::ed25519::PublicKey::from_string(address).map_err(|e| {
        XdrError::InvalidKey {
            key: address.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(ScVal::Address(ScAddress::Account(AccountId(
        PublicKey::PublicKeyTypeEd25519(Uint256(key.0)),
    ))))
}

/// Decode a base64 `ScVal`, as returned in simulation results
pub fn decode_scval(encoded: &str) -> XdrResult<ScVal> {
    Ok(ScVal::from_xdr_base64(encoded, Limits::none())?)
}

pub fn encode_scval(value: &ScVal) -> XdrResult<String> {
    Ok(value.to_xdr_base64(Limits::none())?)
}

pub fn u32_to_scval(value: u32) -> ScVal {
    ScVal::U32(value)
}

/// Encode a UTF-8 string as an `ScVal::String`
pub fn string_to_scval(value: &str) -> XdrResult<ScVal> {
    let inner: StringM = value
        .try_into()
        .map_err(|_| XdrError::Bounds(format!("string of {} bytes", value.len())))?;
    Ok(ScVal::String(ScString(inner)))
}

/// Encode a list of strings as an `ScVal::Vec` of `ScVal::String`
pub fn string_vec_to_scval(values: &[String]) -> XdrResult<ScVal> {
    let items = values
        .iter()
        .map(|v| string_to_scval(v))
        .collect::<XdrResult<Vec<_>>>()?;
    let vec: VecM<ScVal> = items
        .try_into()
        .map_err(|_| XdrError::Bounds(format!("vector of {} items", values.len())))?;
    Ok(ScVal::Vec(Some(ScVec(vec))))
}

/// Read any non-negative integer-like `ScVal` as `u32`
///
/// Soroban may widen integers depending on the contract type, so every
/// integer variant that fits is accepted. Strings holding digits are
/// accepted too, for keys that were stringified.
pub fn scval_to_u32(value: &ScVal) -> Option<u32> {
    match value {
        ScVal::U32(v) => Some(*v),
        ScVal::I32(v) => u32::try_from(*v).ok(),
        ScVal::U64(v) => u32::try_from(*v).ok(),
        ScVal::I64(v) => u32::try_from(*v).ok(),
        ScVal::U128(parts) if parts.hi == 0 => u32::try_from(parts.lo).ok(),
        ScVal::I128(parts) if parts.hi == 0 => u32::try_from(parts.lo).ok(),
        ScVal::String(_) | ScVal::Symbol(_) => scval_to_string(value)?.trim().parse().ok(),
        _ => None,
    }
}

/// Read a string or symbol `ScVal` as an owned `String`
pub fn scval_to_string(value: &ScVal) -> Option<String> {
    match value {
        ScVal::String(ScString(s)) => Some(String::from_utf8_lossy(s.as_slice()).into_owned()),
        ScVal::Symbol(sym) => Some(String::from_utf8_lossy(sym.0.as_slice()).into_owned()),
        _ => None,
    }
}

/// Look up a symbol/string key in an `ScMap`
pub fn map_get<'a>(map: &'a ScMap, key: &str) -> Option<&'a ScVal> {
    map.0
        .iter()
        .find(|entry| scval_to_string(&entry.key).as_deref() == Some(key))
        .map(|entry| &entry.val)
}
