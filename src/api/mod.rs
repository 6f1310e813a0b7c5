//! Query and mutation surface wrapping the lifecycle services.
//!
//! Mutations never return `Err`; failures are folded into a
//! [`BooleanResponse`] carrying a stable error code.

mod response;
mod system;

pub use response::{BooleanResponse, ErrorResponse};
pub use system::{INVALID_INPUT_CODE, SCOPE_UNRESOLVED_CODE, SystemApi, SystemView};
