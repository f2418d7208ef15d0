//! Read-only gateway calls.

#[cfg(test)]
mod tests {
    use paygate_auth::{ParameterSet, RequestKind};

    use crate::{endpoint, gateway_client, unique_trade_no};

    #[tokio::test]
    #[ignore = "requires sandbox gateway"]
    async fn test_should_fetch_issuer_public_key() {
        let client = gateway_client();
        let url = std::env::var("PAYGATE_PUBLIC_KEY_URL")
            .unwrap_or_else(|_| "https://fraud.mch.weixin.qq.com/risk/getpublickey".to_owned());

        let response = client
            .execute(RequestKind::GetPublicKey, &url, ParameterSet::new())
            .await
            .unwrap();

        assert!(!response.is_error(), "{}", response.body());
        let pub_key = response.get("pub_key").unwrap_or_default();
        assert!(pub_key.contains("BEGIN RSA PUBLIC KEY"), "{pub_key}");
    }

    #[tokio::test]
    #[ignore = "requires sandbox gateway"]
    async fn test_should_report_unknown_transfer_as_business_error() {
        let client = gateway_client();
        let params: ParameterSet = [("partner_trade_no", unique_trade_no("it"))]
            .into_iter()
            .collect();

        let response = client
            .execute(
                RequestKind::GetTransferInfo,
                &endpoint("/mmpaymkttransfers/gettransferinfo"),
                params,
            )
            .await
            .unwrap();

        assert!(response.is_error(), "{}", response.body());
        assert!(response.request_body().contains("nonce_str="));
    }

    #[tokio::test]
    #[ignore = "requires sandbox gateway"]
    async fn test_should_report_unknown_bank_transfer_as_business_error() {
        let client = gateway_client();
        let params: ParameterSet = [("partner_trade_no", unique_trade_no("it"))]
            .into_iter()
            .collect();

        let response = client
            .execute(
                RequestKind::QueryBank,
                &endpoint("/mmpaysptrans/query_bank"),
                params,
            )
            .await
            .unwrap();

        assert!(response.is_error(), "{}", response.body());
    }
}
