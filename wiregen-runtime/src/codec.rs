//! Payload encoding for generated clients and dispatch functions.

use crate::channel::Channel;
use crate::descriptor::{Message, MethodDescriptor};
use crate::error::ServiceError;

/// Encode a message for transport.
pub fn encode<M: Message>(message: &M) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(message).map_err(|source| ServiceError::Encode {
        type_name: M::NAME,
        source,
    })
}

/// Decode a message received from transport.
pub fn decode<M: Message>(bytes: &[u8]) -> Result<M, ServiceError> {
    serde_json::from_slice(bytes).map_err(|source| ServiceError::Decode {
        type_name: M::NAME,
        source,
    })
}

/// Run one unary call through a channel: encode, carry, decode.
///
/// Generated client methods delegate here with their method descriptor.
pub fn unary<C, Req, Res>(
    channel: &mut C,
    method: &MethodDescriptor,
    request: &Req,
) -> Result<Res, ServiceError>
where
    C: Channel,
    Req: Message,
    Res: Message,
{
    let payload = encode(request)?;
    let response = channel.call(method, payload)?;
    decode(&response)
}
