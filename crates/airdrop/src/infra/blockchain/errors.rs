use {
    crate::domain::chain,
    alloy::{
        contract::Error as ContractError,
        providers::PendingTransactionError,
        transports::RpcError,
    },
};

/// EIP-1193 error code of a request the user declined.
const USER_REJECTED: i64 = 4001;

/// Sorts a failed contract interaction into what went wrong from the user's
/// point of view.
///
/// Node errors that carry revert data are contract errors in disguise, so only
/// transport errors without revert data count as network errors.
pub fn classify(err: ContractError) -> chain::Error {
    let message = err.to_string();
    match &err {
        ContractError::TransportError(RpcError::ErrorResp(payload))
            if payload.code == USER_REJECTED =>
        {
            chain::Error::Rejected(payload.message.to_string())
        }
        ContractError::TransportError(RpcError::ErrorResp(payload)) => {
            let no_revert_data = payload.as_revert_data().is_none();
            tracing::debug!(?payload, %no_revert_data, "transport rpc error");
            if no_revert_data {
                chain::Error::Network(message)
            } else {
                chain::Error::Reverted(message)
            }
        }
        // The local signer refused to sign.
        ContractError::TransportError(RpcError::LocalUsageError(_)) => {
            chain::Error::Rejected(message)
        }
        ContractError::TransportError(_) => chain::Error::Network(message),
        _ => chain::Error::Reverted(message),
    }
}

/// Waiting for a submitted transaction only talks to the node, so every
/// failure is a network error.
pub fn pending_transaction(err: PendingTransactionError) -> chain::Error {
    tracing::debug!(?err, "failed to wait for transaction");
    chain::Error::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{rpc::json_rpc::ErrorPayload, transports::TransportErrorKind},
    };

    fn error_response(code: i64, message: &'static str, data: Option<&str>) -> ContractError {
        ContractError::TransportError(RpcError::ErrorResp(ErrorPayload {
            code,
            message: message.into(),
            data: data.map(|data| serde_json::value::to_raw_value(data).unwrap()),
        }))
    }

    #[test]
    fn user_rejection() {
        assert_eq!(
            classify(error_response(4001, "User rejected the request.", None)),
            chain::Error::Rejected("User rejected the request.".to_string())
        );
    }

    #[test]
    fn revert_data_means_contract_error() {
        assert!(matches!(
            classify(error_response(
                3,
                "execution reverted",
                Some("0x08c379a0")
            )),
            chain::Error::Reverted(_)
        ));
        assert!(matches!(
            classify(ContractError::NotADeploymentTransaction),
            chain::Error::Reverted(_)
        ));
    }

    #[test]
    fn node_errors() {
        assert!(matches!(
            classify(error_response(-32603, "internal error", None)),
            chain::Error::Network(_)
        ));
        assert!(matches!(
            classify(ContractError::TransportError(TransportErrorKind::custom_str(
                "connection refused"
            ))),
            chain::Error::Network(_)
        ));
    }

    #[test]
    fn receipt_wait_errors_are_network_errors() {
        let err = PendingTransactionError::TransportError(RpcError::ErrorResp(ErrorPayload {
            code: -32603,
            message: "node down".into(),
            data: None,
        }));
        assert!(matches!(
            pending_transaction(err),
            chain::Error::Network(message) if message.contains("node down")
        ));
    }
}
