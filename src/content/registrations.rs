use super::fetch_one;
use crate::cms::{ContentSource, Mutation, MutationOutcome, Patch, Query};
use crate::constants::{SPECIAL_REGISTRATION_TYPE, SPONSOR_REGISTRATION_TYPE};
use crate::domain::{SpecialRegistration, SponsorRegistration};
use crate::error::{Result, SiteError};
use serde_json::Value;
use tracing::info;

/// Read without CDN or cache; payment state changes underneath us.
pub async fn special_registration(source: &dyn ContentSource, id: &str) -> Result<Option<SpecialRegistration>> {
    let query = Query::new(SPECIAL_REGISTRATION_TYPE).eq("_id", id).first().fresh();
    fetch_one(source, &query).await
}

pub async fn mark_paid(
    source: &dyn ContentSource,
    id: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<MutationOutcome> {
    let patch = Patch::new(id)
        .set("paymentStatus", "paid")
        .set("razorpayOrderId", order_id)
        .set("razorpayPaymentId", payment_id);
    let outcome = source.mutate(vec![Mutation::Patch(patch)]).await?;
    info!(registration = %id, order = %order_id, "registration marked paid");
    Ok(outcome)
}

pub async fn mark_email_sent(source: &dyn ContentSource, id: &str) -> Result<MutationOutcome> {
    source
        .mutate(vec![Mutation::Patch(Patch::new(id).set("emailSent", true))])
        .await
}

/// Document id for the registration created from an order; stable so a
/// repeated verification does not create duplicates.
pub fn sponsor_registration_id(order_id: &str) -> String {
    let safe: String = order_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("sponsor-registration-{safe}")
}

pub async fn record_sponsorship(source: &dyn ContentSource, record: &SponsorRegistration) -> Result<String> {
    let id = sponsor_registration_id(&record.razorpay_order_id);
    let mut doc = serde_json::to_value(record)?;
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| SiteError::Validation("sponsor registration must serialize to an object".to_string()))?;
    obj.insert("_id".to_string(), Value::String(id.clone()));
    obj.insert("_type".to_string(), Value::String(SPONSOR_REGISTRATION_TYPE.to_string()));

    source.mutate(vec![Mutation::CreateIfNotExists(doc)]).await?;
    info!(id = %id, invoice = %record.invoice_number, "sponsorship registration recorded");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::InMemorySource;
    use crate::domain::PaymentStatus;
    use serde_json::json;

    fn source() -> InMemorySource {
        InMemorySource::with_documents(vec![json!({
            "_id": "vip-1",
            "_type": "specialRegistration",
            "fullName": "Dr. Rao",
            "email": "rao@example.org",
            "paymentStatus": "pending"
        })])
    }

    #[tokio::test]
    async fn mark_paid_patches_payment_fields() {
        let src = source();
        mark_paid(&src, "vip-1", "order_A1", "pay_B2").await.unwrap();
        let reg = special_registration(&src, "vip-1").await.unwrap().unwrap();
        assert_eq!(reg.payment_status, PaymentStatus::Paid);
        assert_eq!(reg.razorpay_payment_id.as_deref(), Some("pay_B2"));
        assert!(!reg.email_sent);

        mark_email_sent(&src, "vip-1").await.unwrap();
        let reg = special_registration(&src, "vip-1").await.unwrap().unwrap();
        assert!(reg.email_sent);
    }

    #[tokio::test]
    async fn unknown_registration_cannot_be_patched() {
        assert!(mark_paid(&source(), "vip-404", "o", "p").await.is_err());
    }

    #[tokio::test]
    async fn sponsorship_record_is_idempotent_per_order() {
        let src = InMemorySource::new();
        let record = SponsorRegistration {
            tier: Some("gold".into()),
            company_name: Some("Acme Labs".into()),
            contact_name: None,
            email: Some("events@acme.example".into()),
            phone: None,
            amount: Some(1500.0),
            currency: Some("USD".into()),
            razorpay_order_id: "order_XYZ".into(),
            razorpay_payment_id: "pay_123".into(),
            invoice_number: "INV-20251019-AY_123".into(),
            payment_status: PaymentStatus::Paid,
        };
        let id = record_sponsorship(&src, &record).await.unwrap();
        record_sponsorship(&src, &record).await.unwrap();
        assert_eq!(id, "sponsor-registration-order_XYZ");
        let docs = src.documents().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["_type"], "sponsorRegistration");
        assert_eq!(docs[0]["companyName"], "Acme Labs");
    }

    #[test]
    fn registration_ids_are_sanitized() {
        assert_eq!(sponsor_registration_id("order/1 2"), "sponsor-registration-order-1-2");
    }
}
