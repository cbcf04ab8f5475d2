//! Runtime support for code generated by wiregen.
//!
//! Generated message types implement [`Message`], which ties a serde-backed
//! struct to its schema name and field layout. Generated service clients
//! route unary calls through a user-supplied [`Channel`] transport, and
//! generated dispatch functions decode requests for a handler trait on the
//! server side. Payloads are encoded as JSON via [`encode`] and [`decode`].

mod channel;
mod codec;
mod descriptor;
mod error;

pub use channel::Channel;
pub use codec::{decode, encode, unary};
pub use descriptor::{
    Cardinality, FieldDescriptor, FieldKind, Message, MethodDescriptor, ScalarKind,
};
pub use error::ServiceError;
