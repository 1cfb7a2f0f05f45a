//! Checkout flow state machine.

use serde::{Deserialize, Serialize};

use crate::cart::{current_timestamp, Cart};
use crate::checkout::format::{format_name, format_phone};
use crate::checkout::validate::{
    validate_card_number, validate_cvv, validate_email, validate_expiry, validate_name, validate_phone,
    FieldError, YearMonth,
};
use crate::checkout::{Address, Customer, PaymentIntentRequest, PaymentReference, CHECKOUT_METADATA_KEY};
use crate::config::PricingConfig;
use crate::ids::{CartId, CheckoutId, IdempotencyKey};
use crate::CommerceError;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Cart review.
    Cart,
    /// Name, email, phone.
    Contact,
    /// Shipping address.
    Shipping,
    /// Card entry.
    Payment,
    /// Order review before submission.
    Review,
    /// Payment confirmed.
    Complete,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 6] = [
        CheckoutStep::Cart,
        CheckoutStep::Contact,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Review,
        CheckoutStep::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Contact => "contact",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Complete => "complete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Contact => "Contact",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Complete => "Complete",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Cart => 1,
            CheckoutStep::Contact => 2,
            CheckoutStep::Shipping => 3,
            CheckoutStep::Payment => 4,
            CheckoutStep::Review => 5,
            CheckoutStep::Complete => 6,
        }
    }

    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => Some(CheckoutStep::Contact),
            CheckoutStep::Contact => Some(CheckoutStep::Shipping),
            CheckoutStep::Shipping => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => Some(CheckoutStep::Complete),
            CheckoutStep::Complete => None,
        }
    }

    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => None,
            CheckoutStep::Contact => Some(CheckoutStep::Cart),
            CheckoutStep::Shipping => Some(CheckoutStep::Contact),
            CheckoutStep::Payment => Some(CheckoutStep::Shipping),
            CheckoutStep::Review => Some(CheckoutStep::Payment),
            CheckoutStep::Complete => Some(CheckoutStep::Review),
        }
    }
}

/// What is kept of the entered card: never the number or the CVV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub last4: String,
    pub expiry: YearMonth,
}

impl CardSummary {
    /// `•••• 4242, exp 12/30`.
    pub fn display(&self) -> String {
        format!(
            "•••• {}, exp {:02}/{:02}",
            self.last4,
            self.expiry.month,
            self.expiry.year % 100
        )
    }
}

/// Checkout flow state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    /// Unique checkout identifier.
    pub id: CheckoutId,
    /// Associated cart ID.
    pub cart_id: CartId,
    /// Current step.
    pub step: CheckoutStep,
    /// Completed steps.
    pub completed_steps: Vec<CheckoutStep>,
    pub customer: Customer,
    pub shipping_address: Option<Address>,
    pub card: Option<CardSummary>,
    /// Purchase-order number, for accounts paying on invoice.
    #[serde(default)]
    pub purchase_order: Option<String>,
    /// Sent with every payment-intent request of this attempt.
    pub idempotency_key: IdempotencyKey,
    /// Set once payment is confirmed.
    pub payment_reference: Option<PaymentReference>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl CheckoutFlow {
    /// Start checking out `cart`.
    pub fn start(cart: &Cart) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let now = current_timestamp();
        let flow = Self {
            id: CheckoutId::generate(),
            cart_id: cart.id.clone(),
            step: CheckoutStep::Cart,
            completed_steps: Vec::new(),
            customer: Customer::default(),
            shipping_address: None,
            card: None,
            purchase_order: None,
            idempotency_key: IdempotencyKey::generate(),
            payment_reference: None,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(checkout_id = %flow.id, cart_id = %flow.cart_id, "checkout started");
        Ok(flow)
    }

    /// Check if checkout can advance to a step.
    pub fn can_advance_to(&self, step: CheckoutStep) -> bool {
        self.missing_for_step(step).is_empty()
    }

    /// Advance to the next step.
    ///
    /// Review only advances through [`CheckoutFlow::complete`].
    pub fn advance(&mut self) -> Result<CheckoutStep, CommerceError> {
        let next = self.step.next().ok_or_else(|| CommerceError::InvalidCheckoutTransition {
            from: self.step.as_str().to_string(),
            to: "none".to_string(),
        })?;

        let missing = self.missing_for_step(next);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }

        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
        tracing::debug!(checkout_id = %self.id, from = self.step.as_str(), to = next.as_str(), "checkout advanced");
        self.step = next;
        self.touch();

        Ok(next)
    }

    /// Go back to a previous step.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = match (self.step, self.step.previous()) {
            (CheckoutStep::Complete, _) | (_, None) => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: self.step.as_str().to_string(),
                    to: "previous".to_string(),
                })
            }
            (_, Some(prev)) => prev,
        };

        self.step = prev;
        self.touch();

        Ok(prev)
    }

    /// Go to a specific step (if allowed).
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        if self.step == CheckoutStep::Complete && step != CheckoutStep::Complete {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            });
        }
        // Can go back to any completed step or the current step
        if step == self.step || self.completed_steps.contains(&step) {
            self.step = step;
            self.touch();
            Ok(())
        } else if self.step.next() == Some(step) {
            self.advance().map(|_| ())
        } else {
            Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            })
        }
    }

    /// What keeps the flow from advancing past the current step.
    pub fn missing(&self) -> Vec<String> {
        self.step
            .next()
            .map(|next| self.missing_for_step(next))
            .unwrap_or_default()
    }

    /// Everything that must be fixed before `step` can be entered.
    pub fn missing_for_step(&self, step: CheckoutStep) -> Vec<String> {
        let mut missing = Vec::new();
        let mut check = |result: Result<(), FieldError>| {
            if let Err(e) = result {
                missing.push(e.to_string());
            }
        };

        if step.number() > CheckoutStep::Contact.number() {
            check(validate_name(&self.customer.name));
            check(validate_email(&self.customer.email));
            if let Some(phone) = &self.customer.phone {
                check(validate_phone(phone));
            }
        }
        if step.number() > CheckoutStep::Shipping.number() {
            match &self.shipping_address {
                Some(address) => missing.extend(address.problems()),
                None => missing.push("shipping address is required".to_string()),
            }
        }
        if step.number() > CheckoutStep::Payment.number() && self.card.is_none() && self.purchase_order.is_none() {
            missing.push("payment card or purchase order is required".to_string());
        }
        if step == CheckoutStep::Complete && self.payment_reference.is_none() {
            missing.push("payment has not been confirmed".to_string());
        }
        missing
    }

    /// Set contact details. Name and phone go through their formatters.
    pub fn set_contact(&mut self, name: &str, email: &str, phone: Option<&str>) {
        let phone = phone.map(format_phone).filter(|p| !p.is_empty());
        self.customer = Customer {
            name: format_name(name).trim().to_string(),
            email: email.trim().to_string(),
            phone,
        };
        self.touch();
    }

    /// Set the shipping address.
    pub fn set_shipping_address(&mut self, address: Address) {
        self.shipping_address = Some(address);
        self.touch();
    }

    /// Validate card details and keep only their summary.
    ///
    /// `today` is the month expiry is checked against.
    pub fn set_card(&mut self, number: &str, expiry: &str, cvv: &str, today: YearMonth) -> Result<(), FieldError> {
        validate_card_number(number)?;
        let expiry = validate_expiry(expiry, today)?;
        validate_cvv(cvv)?;

        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        let last4 = digits[digits.len().saturating_sub(4)..].to_string();
        self.card = Some(CardSummary { last4, expiry });
        self.purchase_order = None;
        self.touch();
        Ok(())
    }

    /// Pay by purchase order instead of card. Blank numbers are ignored.
    pub fn set_purchase_order(&mut self, number: &str) -> bool {
        let number = number.trim();
        if number.is_empty() {
            return false;
        }
        self.purchase_order = Some(number.to_string());
        self.card = None;
        self.touch();
        true
    }

    /// Build the payment-intent request for `cart`, tagged with this
    /// attempt's idempotency key.
    pub fn payment_request(&self, cart: &Cart, config: &PricingConfig) -> Result<PaymentIntentRequest, CommerceError> {
        let totals = cart.totals(config);
        Ok(PaymentIntentRequest::new(cart, &totals, &self.idempotency_key)?
            .with_metadata(CHECKOUT_METADATA_KEY, self.id.as_str()))
    }

    /// Record the confirmed payment and finish the flow.
    pub fn complete(&mut self, reference: PaymentReference) -> Result<(), CommerceError> {
        if self.step != CheckoutStep::Review {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: CheckoutStep::Complete.as_str().to_string(),
            });
        }
        self.payment_reference = Some(reference);
        if let Err(e) = self.advance() {
            self.payment_reference = None;
            return Err(e);
        }
        Ok(())
    }

    /// Check if checkout is complete.
    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Complete
    }

    /// Get progress percentage.
    pub fn progress_percent(&self) -> u8 {
        let percent = u16::from(self.step.number()) * 100 / 6;
        u8::try_from(percent).unwrap_or(100)
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::money::{Currency, Money};

    const TODAY: YearMonth = YearMonth { year: 2026, month: 10 };

    fn cart() -> Cart {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&CatalogItem::new(7, "Brake pads", "BP-7", Money::new(3200, Currency::USD)), 1);
        cart
    }

    fn address() -> Address {
        Address::new("Ada", "Rider", "1 Pit Ln", "Austin", Some("TX"), "78701")
    }

    #[test]
    fn test_checkout_creation() {
        let flow = CheckoutFlow::start(&cart()).unwrap();
        assert_eq!(flow.step, CheckoutStep::Cart);
        assert!(flow.completed_steps.is_empty());
        assert!(flow.idempotency_key.as_str().starts_with("idem_"));
    }

    #[test]
    fn test_empty_cart_cannot_start() {
        let err = CheckoutFlow::start(&Cart::new(Currency::USD)).unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[test]
    fn test_checkout_requires_contact() {
        let mut flow = CheckoutFlow::start(&cart()).unwrap();
        flow.advance().unwrap();
        assert_eq!(flow.step, CheckoutStep::Contact);

        let err = flow.advance().unwrap_err();
        assert!(matches!(err, CommerceError::CheckoutIncomplete(_)));
        assert_eq!(flow.missing(), vec!["Name is required", "email address is not valid"]);

        flow.set_contact("Ada Rider", "ada@example.com", Some("5125550100"));
        assert_eq!(flow.customer.phone.as_deref(), Some("(512) 555-0100"));
        assert_eq!(flow.advance().unwrap(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_bad_phone_blocks_contact() {
        let mut flow = CheckoutFlow::start(&cart()).unwrap();
        flow.advance().unwrap();
        flow.set_contact("Ada", "ada@example.com", Some("555"));
        assert_eq!(flow.missing(), vec!["phone number must be 10 digits"]);
    }

    #[test]
    fn test_full_flow() {
        let cart = cart();
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        flow.advance().unwrap();
        flow.set_contact("Ada Rider", "ada@example.com", None);
        flow.advance().unwrap();
        flow.set_shipping_address(address());
        flow.advance().unwrap();
        assert_eq!(flow.missing(), vec!["payment card or purchase order is required"]);

        assert_eq!(
            flow.set_card("4242 4242 4242 4241", "12/30", "123", TODAY),
            Err(FieldError::CardChecksum)
        );
        flow.set_card("4242 4242 4242 4242", "12/30", "123", TODAY).unwrap();
        assert_eq!(flow.card.as_ref().unwrap().display(), "•••• 4242, exp 12/30");
        assert_eq!(flow.advance().unwrap(), CheckoutStep::Review);

        // Review waits for payment confirmation.
        assert!(flow.advance().is_err());
        flow.complete(PaymentReference::Intent { id: "pi_1".into() }).unwrap();
        assert!(flow.is_complete());
        assert_eq!(flow.progress_percent(), 100);
        assert!(flow.go_back().is_err());
    }

    #[test]
    fn test_idempotency_key_stable_across_requests() {
        let cart = cart();
        let flow = CheckoutFlow::start(&cart).unwrap();
        let config = PricingConfig::default();
        let first = flow.payment_request(&cart, &config).unwrap();
        let second = flow.payment_request(&cart, &config).unwrap();
        assert_eq!(first.idempotency_key(), second.idempotency_key());
        assert_eq!(first.metadata[CHECKOUT_METADATA_KEY], flow.id.as_str());
    }

    #[test]
    fn test_checkout_go_back_and_go_to() {
        let mut flow = CheckoutFlow::start(&cart()).unwrap();
        flow.advance().unwrap();
        flow.set_contact("Ada", "ada@example.com", None);
        flow.advance().unwrap();

        assert_eq!(flow.go_back().unwrap(), CheckoutStep::Contact);
        flow.go_to(CheckoutStep::Cart).unwrap();
        assert_eq!(flow.step, CheckoutStep::Cart);
        assert!(flow.go_to(CheckoutStep::Review).is_err());
        flow.go_to(CheckoutStep::Contact).unwrap();
        assert!(flow.go_back().is_ok());
        assert!(flow.go_back().is_err());
    }

    #[test]
    fn test_purchase_order_replaces_card() {
        let mut flow = CheckoutFlow::start(&cart()).unwrap();
        flow.advance().unwrap();
        flow.set_contact("Ada Rider", "ada@example.com", None);
        flow.advance().unwrap();
        flow.set_shipping_address(address());
        flow.advance().unwrap();

        assert!(!flow.set_purchase_order("  "));
        flow.set_card("4242 4242 4242 4242", "12/30", "123", TODAY).unwrap();
        assert!(flow.set_purchase_order("PO-88"));
        assert!(flow.card.is_none());
        assert_eq!(flow.advance().unwrap(), CheckoutStep::Review);
        flow.complete(PaymentReference::PurchaseOrder { number: "PO-88".into() }).unwrap();
        assert!(flow.is_complete());
    }

    #[test]
    fn test_complete_only_from_review() {
        let mut flow = CheckoutFlow::start(&cart()).unwrap();
        let err = flow
            .complete(PaymentReference::PurchaseOrder { number: "PO-1".into() })
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidCheckoutTransition { .. }));
        assert!(flow.payment_reference.is_none());
    }
}
