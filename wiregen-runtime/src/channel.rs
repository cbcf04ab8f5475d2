use crate::descriptor::MethodDescriptor;
use crate::error::ServiceError;

/// Client-side transport for unary calls.
///
/// Generated clients are generic over a `Channel`; the implementation
/// decides how encoded payloads reach the server (in-process queue, HTTP,
/// a test loopback). The transport deals only in bytes.
pub trait Channel {
    /// Carry one encoded request to the named method and return the
    /// encoded response.
    fn call(&mut self, method: &MethodDescriptor, request: Vec<u8>) -> Result<Vec<u8>, ServiceError>;
}
