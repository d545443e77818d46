//! Request/response exchange over a [`StdioTransport`].

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ClientError;
use super::jsonrpc::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND,
    ServerRequest,
};
use super::lifecycle::ADAPTER_TARGET;
use super::transport::StdioTransport;

/// Maximum number of messages read while waiting for a matching response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// Server requests acknowledged with a `null` result.
const ACKNOWLEDGED_REQUESTS: [&str; 3] = [
    "client/registerCapability",
    "client/unregisterCapability",
    "window/workDoneProgress/create",
];

/// Sends a request and returns its result, mapping `null` or absent to
/// [`Value::Null`].
pub(super) fn send_request<R, W, P>(
    transport: &mut StdioTransport<R, W>,
    method: &str,
    params: P,
) -> Result<Value, ClientError>
where
    R: Read,
    W: Write,
    P: Serialize,
{
    let params = serde_json::to_value(params)?;
    exchange(transport, &JsonRpcRequest::new(method, Some(params)))
}

/// Sends a request whose result must decode as `T`.
pub(super) fn send_typed_request<R, W, P, T>(
    transport: &mut StdioTransport<R, W>,
    method: &str,
    params: P,
) -> Result<T, ClientError>
where
    R: Read,
    W: Write,
    P: Serialize,
    T: DeserializeOwned,
{
    let result = send_request(transport, method, params)?;
    decode_result(method, result)
}

/// Writes `request` and waits for its response.
fn exchange<R, W>(
    transport: &mut StdioTransport<R, W>,
    request: &JsonRpcRequest,
) -> Result<Value, ClientError>
where
    R: Read,
    W: Write,
{
    debug!(
        target: ADAPTER_TARGET,
        method = %request.method,
        id = request.id,
        "sending request"
    );

    transport.send(&serde_json::to_vec(request)?)?;
    let response = receive_response_for_request(transport, request.id)?;
    if let Some(error) = response.error {
        return Err(ClientError::from_jsonrpc(error));
    }
    Ok(response.result.unwrap_or(Value::Null))
}

fn decode_result<T: DeserializeOwned>(method: &str, result: Value) -> Result<T, ClientError> {
    if result.is_null() {
        return Err(ClientError::InitializationFailed {
            message: format!("empty result in response to {method}"),
        });
    }
    serde_json::from_value(result).map_err(ClientError::from)
}

/// Sends a notification (no response expected).
pub(super) fn send_notification<R, W, P>(
    transport: &mut StdioTransport<R, W>,
    method: &str,
    params: P,
) -> Result<(), ClientError>
where
    R: Read,
    W: Write,
    P: Serialize,
{
    let params = serde_json::to_value(params)?;
    let notification = JsonRpcNotification::new(method, Some(params));
    let payload = serde_json::to_vec(&notification)?;

    debug!(target: ADAPTER_TARGET, method, "sending notification");

    transport.send(&payload)?;
    Ok(())
}

/// Reads messages until the response for `request_id` arrives.
///
/// Server requests met on the way are answered so the server never stalls
/// waiting on the client; notifications and stale responses are skipped.
/// The loop is bounded by [`MAX_RESPONSE_ITERATIONS`].
fn receive_response_for_request<R, W>(
    transport: &mut StdioTransport<R, W>,
    request_id: i64,
) -> Result<JsonRpcResponse, ClientError>
where
    R: Read,
    W: Write,
{
    for _ in 0..MAX_RESPONSE_ITERATIONS {
        let bytes = transport.receive()?;
        match JsonRpcMessage::from_bytes(&bytes)? {
            JsonRpcMessage::Response(response) if response.answers(request_id) => {
                return Ok(response);
            }
            JsonRpcMessage::Response(response) => {
                warn!(
                    target: ADAPTER_TARGET,
                    expected = request_id,
                    received = ?response.id,
                    "skipping response with non-matching ID"
                );
            }
            JsonRpcMessage::ServerRequest(request) => {
                let reply = reply_to_server_request(&request);
                transport.send(&serde_json::to_vec(&reply)?)?;
            }
            JsonRpcMessage::Notification(notification) => {
                debug!(
                    target: ADAPTER_TARGET,
                    method = %notification.method,
                    "skipping server notification"
                );
            }
        }
    }

    warn!(
        target: ADAPTER_TARGET,
        request_id,
        max_iterations = MAX_RESPONSE_ITERATIONS,
        "giving up on response after reaching maximum iterations"
    );
    Err(ClientError::MaxResponseIterations { request_id })
}

/// Builds the client's answer to a server-initiated request.
pub(super) fn reply_to_server_request(request: &ServerRequest) -> JsonRpcResponse {
    let id = request.id.clone();
    if ACKNOWLEDGED_REQUESTS.contains(&request.method.as_str()) {
        debug!(target: ADAPTER_TARGET, method = %request.method, "acknowledging server request");
        return JsonRpcResponse::success(id, Value::Null);
    }
    if request.method == "workspace/configuration" {
        // One entry per requested item; the client holds no server settings.
        let items = request
            .params
            .as_ref()
            .and_then(|params| params.get("items"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        return JsonRpcResponse::success(id, Value::Array(vec![Value::Null; items]));
    }

    warn!(
        target: ADAPTER_TARGET,
        method = %request.method,
        "rejecting unsupported server request"
    );
    JsonRpcResponse::failure(
        id,
        METHOD_NOT_FOUND,
        format!("unsupported method: {}", request.method),
    )
}
