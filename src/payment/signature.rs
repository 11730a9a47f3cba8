use chrono::NaiveDate;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(mac)
}

/// Hex HMAC-SHA256 of `order_id|payment_id`, as the gateway signs checkout results.
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    mac_for(secret, order_id, payment_id).map(|mac| hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison against the provided hex signature.
pub fn signature_matches(secret: &str, order_id: &str, payment_id: &str, provided: &str) -> bool {
    let Ok(provided) = hex::decode(provided.trim()) else {
        return false;
    };
    mac_for(secret, order_id, payment_id).is_some_and(|mac| mac.verify_slice(&provided).is_ok())
}

/// `INV-YYYYMMDD-XXXXXX`, the suffix being the last six characters of the payment id.
pub fn invoice_number(date: NaiveDate, payment_id: &str) -> String {
    let cleaned: Vec<char> = payment_id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let suffix: String = cleaned[cleaned.len().saturating_sub(6)..].iter().collect();
    let suffix = if suffix.is_empty() { "000000".to_string() } else { suffix.to_ascii_uppercase() };
    format!("INV-{}-{}", date.format("%Y%m%d"), suffix)
}
