//! Failure paths against a live gateway.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use paygate_auth::{ParameterSet, RequestKind};
    use paygate_client::{GatewayClient, HttpTransport};
    use paygate_core::{Credentials, ErrorKind};

    use crate::{config, endpoint, unique_trade_no};

    #[tokio::test]
    #[ignore = "requires sandbox gateway"]
    async fn test_should_surface_wrong_key_as_unsigned_error() {
        let config = config();
        let credentials = Credentials::from_config(&config).unwrap();
        let transport = HttpTransport::new(&credentials, config.timeout()).unwrap();
        let wrong = Credentials::new(
            credentials.app_id(),
            credentials.mch_id(),
            "00000000000000000000000000000000",
            credentials.certificate().to_vec(),
        )
        .unwrap();
        let client = GatewayClient::new(wrong, Arc::new(transport)).unwrap();

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
    }

    #[tokio::test]
    #[ignore = "requires sandbox gateway"]
    async fn test_should_refuse_bank_transfer_without_issuer_key() {
        let config = config();
        let credentials = Credentials::from_config(&config).unwrap();
        let transport = HttpTransport::new(&credentials, config.timeout()).unwrap();
        let plain = Credentials::new(
            credentials.app_id(),
            credentials.mch_id(),
            credentials.key(),
            credentials.certificate().to_vec(),
        )
        .unwrap();
        let client = GatewayClient::new(plain, Arc::new(transport)).unwrap();

        let params: ParameterSet = [("enc_bank_no", "6225760008219524"), ("enc_true_name", "Alice")]
            .into_iter()
            .collect();
        let err = client
            .execute(RequestKind::PayBank, &endpoint("/mmpaysptrans/pay_bank"), params)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingEncryptionKey);
    }

    #[tokio::test]
    #[ignore = "requires sandbox gateway"]
    async fn test_should_time_out_on_unroutable_host() {
        let config = config();
        let credentials = Credentials::from_config(&config).unwrap();
        let transport = HttpTransport::new(&credentials, Duration::from_millis(500)).unwrap();
        let client = GatewayClient::new(credentials, Arc::new(transport)).unwrap();

        let err = client
            .execute(
                RequestKind::Generic,
                "https://10.255.255.1/pay/orderquery",
                ParameterSet::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }
}
