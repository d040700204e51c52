//! Payment gateway callback authentication.
//!
//! A pure gate over the notification's parameter mapping: no database
//! access. The gateway signs the canonicalized query parameters with
//! HMAC-SHA512 over a pre-shared secret; this module recomputes the
//! signature and compares it in constant time.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

pub const PARAM_SECURE_HASH: &str = "vnp_SecureHash";
pub const PARAM_MERCHANT_CODE: &str = "vnp_TmnCode";
pub const PARAM_RESPONSE_CODE: &str = "vnp_ResponseCode";
pub const PARAM_TXN_REF: &str = "vnp_TxnRef";

/// Terminal outcome of verifying one notification.
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Signature and merchant code check out; proceed to settlement.
    Verified(VerifiedNotification),
    /// A required field (signature, merchant code, response code or
    /// transaction reference) is absent.
    MissingFields,
    /// Signature or merchant code mismatch.
    InvalidSignature,
}

/// The fields settlement needs from an authenticated notification.
#[derive(Debug, PartialEq, Eq)]
pub struct VerifiedNotification {
    pub response_code: String,
    pub txn_ref: String,
}

/// Verifier configured with the pre-shared secret and the expected
/// merchant code.
#[derive(Clone)]
pub struct CallbackVerifier {
    secret: Vec<u8>,
    merchant_code: String,
}

impl CallbackVerifier {
    pub fn new(secret: impl Into<String>, merchant_code: impl Into<String>) -> Self {
        Self {
            secret: secret.into().into_bytes(),
            merchant_code: merchant_code.into(),
        }
    }

    /// Authenticate one notification.
    ///
    /// The signature and merchant-code fields are excluded from the
    /// canonical string; every other parameter is signed, so mutating any
    /// of them (including case or encoding) invalidates the signature.
    pub fn verify(&self, params: &BTreeMap<String, String>) -> VerifyOutcome {
        let (Some(signature), Some(merchant_code), Some(response_code), Some(txn_ref)) = (
            params.get(PARAM_SECURE_HASH),
            params.get(PARAM_MERCHANT_CODE),
            params.get(PARAM_RESPONSE_CODE),
            params.get(PARAM_TXN_REF),
        ) else {
            return VerifyOutcome::MissingFields;
        };

        let canonical = canonicalize(params);
        let mut mac = HmacSha512::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(canonical.as_bytes());
        let expected = mac.finalize().into_bytes();

        let Ok(provided) = hex::decode(signature) else {
            return VerifyOutcome::InvalidSignature;
        };
        if provided.len() != expected.len() {
            return VerifyOutcome::InvalidSignature;
        }
        let signature_ok: bool = provided.ct_eq(expected.as_slice()).into();

        if !signature_ok || merchant_code != &self.merchant_code {
            return VerifyOutcome::InvalidSignature;
        }

        VerifyOutcome::Verified(VerifiedNotification {
            response_code: response_code.clone(),
            txn_ref: txn_ref.clone(),
        })
    }
}

/// Join the signed parameters as `key=value` pairs with `&`, keys in byte
/// order, values URL-encoded. The gateway encodes spaces as `+`.
fn canonicalize(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != PARAM_SECURE_HASH && key.as_str() != PARAM_MERCHANT_CODE)
        .map(|(key, value)| format!("{key}={}", encode_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_value(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";
    const MERCHANT: &str = "MERCHANT01";

    /// Sign a parameter set the way the gateway does.
    fn sign(params: &BTreeMap<String, String>) -> String {
        let mut mac = HmacSha512::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(canonicalize(params).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn notification() -> BTreeMap<String, String> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert(PARAM_MERCHANT_CODE.into(), MERCHANT.into());
        params.insert(PARAM_RESPONSE_CODE.into(), "00".into());
        params.insert(PARAM_TXN_REF.into(), "12-3-500000-1".into());
        params.insert("vnp_Amount".into(), "50000000".into());
        params.insert("vnp_OrderInfo".into(), "Fee payment room 12".into());
        let signature = sign(&params);
        params.insert(PARAM_SECURE_HASH.into(), signature);
        params
    }

    fn verifier() -> CallbackVerifier {
        CallbackVerifier::new(SECRET, MERCHANT)
    }

    #[test]
    fn test_valid_notification() {
        let outcome = verifier().verify(&notification());
        assert_eq!(
            outcome,
            VerifyOutcome::Verified(VerifiedNotification {
                response_code: "00".to_string(),
                txn_ref: "12-3-500000-1".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_required_fields() {
        for field in [
            PARAM_SECURE_HASH,
            PARAM_MERCHANT_CODE,
            PARAM_RESPONSE_CODE,
            PARAM_TXN_REF,
        ] {
            let mut params = notification();
            params.remove(field);
            assert_eq!(
                verifier().verify(&params),
                VerifyOutcome::MissingFields,
                "missing {field}"
            );
        }
    }

    #[test]
    fn test_any_mutation_flips_outcome() {
        // Value change
        let mut params = notification();
        params.insert("vnp_Amount".into(), "50000001".into());
        assert_eq!(verifier().verify(&params), VerifyOutcome::InvalidSignature);

        // Case change only
        let mut params = notification();
        params.insert("vnp_OrderInfo".into(), "fee payment room 12".into());
        assert_eq!(verifier().verify(&params), VerifyOutcome::InvalidSignature);

        // Added parameter
        let mut params = notification();
        params.insert("vnp_Extra".into(), "1".into());
        assert_eq!(verifier().verify(&params), VerifyOutcome::InvalidSignature);
    }

    #[test]
    fn test_wrong_merchant_code() {
        let mut params = notification();
        params.insert(PARAM_MERCHANT_CODE.into(), "MERCHANT02".into());
        // Merchant code is outside the canonical string; signature still
        // matches but the equality check rejects it.
        assert_eq!(verifier().verify(&params), VerifyOutcome::InvalidSignature);
    }

    #[test]
    fn test_garbage_signature() {
        let mut params = notification();
        params.insert(PARAM_SECURE_HASH.into(), "zz-not-hex".into());
        assert_eq!(verifier().verify(&params), VerifyOutcome::InvalidSignature);

        params.insert(PARAM_SECURE_HASH.into(), "deadbeef".into());
        assert_eq!(verifier().verify(&params), VerifyOutcome::InvalidSignature);
    }

    #[test]
    fn test_canonicalization_shape() {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        params.insert("b".into(), "two words".into());
        params.insert("a".into(), "1".into());
        params.insert(PARAM_SECURE_HASH.into(), "ignored".into());
        params.insert(PARAM_MERCHANT_CODE.into(), "ignored".into());
        assert_eq!(canonicalize(&params), "a=1&b=two+words");
    }
}
