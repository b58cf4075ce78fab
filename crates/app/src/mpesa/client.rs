//! Daraja HTTP client.

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::mpesa::{
    config::MpesaConfig,
    credentials::{password, timestamp},
    errors::MpesaError,
    gateway::{PaymentGateway, StkPush, StkPushAcknowledgement},
};

const OAUTH_PATH: &str = "/oauth/v1/generate?grant_type=client_credentials";
const STK_PUSH_PATH: &str = "/mpesa/stkpush/v1/processrequest";
const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";
const ACCEPTED_RESPONSE_CODE: &str = "0";

/// HTTP client for the Daraja OAuth and STK push endpoints.
#[derive(Debug, Clone)]
pub struct MpesaClient {
    config: MpesaConfig,
    http: Client,
}

impl MpesaClient {
    #[must_use]
    pub fn new(config: MpesaConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Fetch a short-lived OAuth access token.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn access_token(&self) -> Result<String, MpesaError> {
        let response = self
            .http
            .get(self.config.url(OAUTH_PATH))
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MpesaError::UnexpectedResponse(format!(
                "access token request failed with status {status}: {text}"
            )));
        }

        let parsed: AccessTokenResponse = response.json().await?;

        Ok(parsed.access_token)
    }

    fn stk_push_body<'a>(&'a self, push: &'a StkPush, now: Timestamp) -> StkPushBody<'a> {
        let timestamp = timestamp(now);

        StkPushBody {
            business_short_code: &self.config.business_shortcode,
            password: password(
                &self.config.business_shortcode,
                &self.config.passkey,
                &timestamp,
            ),
            timestamp,
            transaction_type: TRANSACTION_TYPE,
            amount: push.amount,
            party_a: &push.phone,
            party_b: &self.config.business_shortcode,
            phone_number: &push.phone,
            call_back_url: &self.config.callback_url,
            account_reference: self.config.account_reference(&push.order_reference),
            transaction_desc: &self.config.transaction_desc,
        }
    }
}

#[async_trait]
impl PaymentGateway for MpesaClient {
    async fn request_stk_push(&self, push: &StkPush) -> Result<StkPushAcknowledgement, MpesaError> {
        let access_token = self.access_token().await?;
        let body = self.stk_push_body(push, Timestamp::now());

        debug!(
            account_reference = %body.account_reference,
            amount = push.amount,
            "submitting STK push"
        );

        let response = self
            .http
            .post(self.config.url(STK_PUSH_PATH))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MpesaError::UnexpectedResponse(format!(
                "STK push failed with status {status}: {text}"
            )));
        }

        let parsed: StkPushResponse = response.json().await?;

        parsed.into_acknowledgement()
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushBody<'a> {
    business_short_code: &'a str,
    password: String,
    timestamp: String,
    transaction_type: &'a str,
    amount: u64,
    party_a: &'a str,
    party_b: &'a str,
    phone_number: &'a str,
    #[serde(rename = "CallBackURL")]
    call_back_url: &'a str,
    account_reference: String,
    transaction_desc: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushResponse {
    #[serde(rename = "MerchantRequestID")]
    merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID")]
    checkout_request_id: String,
    response_code: String,
    response_description: String,
    #[serde(default)]
    customer_message: String,
}

impl StkPushResponse {
    fn into_acknowledgement(self) -> Result<StkPushAcknowledgement, MpesaError> {
        if self.response_code != ACCEPTED_RESPONSE_CODE {
            warn!(
                response_code = %self.response_code,
                response_description = %self.response_description,
                "STK push not accepted"
            );

            return Err(MpesaError::Rejected {
                code: self.response_code,
                description: self.response_description,
            });
        }

        Ok(StkPushAcknowledgement {
            merchant_request_id: self.merchant_request_id,
            checkout_request_id: self.checkout_request_id,
            response_code: self.response_code,
            response_description: self.response_description,
            customer_message: self.customer_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::mpesa::config::tests::config;

    use super::*;

    fn push() -> StkPush {
        StkPush {
            amount: 1,
            phone: "254712345678".to_string(),
            order_reference: "X".to_string(),
        }
    }

    #[test]
    fn stk_push_body_uses_gateway_field_names() -> TestResult {
        let client = MpesaClient::new(config());
        let push = push();
        let now: Timestamp = "2024-01-01T09:00:00Z".parse()?;

        let body = serde_json::to_value(client.stk_push_body(&push, now))?;

        assert_eq!(
            body,
            json!({
                "BusinessShortCode": "174379",
                "Password": password("174379", "passkey", "20240101120000"),
                "Timestamp": "20240101120000",
                "TransactionType": "CustomerPayBillOnline",
                "Amount": 1,
                "PartyA": "254712345678",
                "PartyB": "174379",
                "PhoneNumber": "254712345678",
                "CallBackURL": "https://shop.example/payments/callback",
                "AccountReference": "DukaOrder-X",
                "TransactionDesc": "Duka Online Payment",
            })
        );

        Ok(())
    }

    #[test]
    fn accepted_response_becomes_acknowledgement() -> TestResult {
        let response: StkPushResponse = serde_json::from_value(json!({
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": "ws_CO_191220191020363925",
            "ResponseCode": "0",
            "ResponseDescription": "Success. Request accepted for processing",
            "CustomerMessage": "Success. Request accepted for processing",
        }))?;

        let acknowledgement = response.into_acknowledgement()?;

        assert_eq!(acknowledgement.checkout_request_id, "ws_CO_191220191020363925");
        assert_eq!(acknowledgement.merchant_request_id, "29115-34620561-1");

        Ok(())
    }

    #[test]
    fn non_zero_response_code_is_rejected() -> TestResult {
        let response: StkPushResponse = serde_json::from_value(json!({
            "MerchantRequestID": "1",
            "CheckoutRequestID": "2",
            "ResponseCode": "1",
            "ResponseDescription": "Rejected",
        }))?;

        let result = response.into_acknowledgement();

        assert!(
            matches!(result, Err(MpesaError::Rejected { ref code, .. }) if code == "1"),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn body_amount_is_numeric() -> TestResult {
        let client = MpesaClient::new(config());
        let push = push();

        let body = serde_json::to_value(client.stk_push_body(&push, Timestamp::now()))?;

        assert_eq!(body.get("Amount"), Some(&Value::from(1_u64)));

        Ok(())
    }
}
