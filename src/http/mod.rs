//! HTTP/1.1 protocol core.
//!
//! Requests are parsed straight off the socket through a bounded buffer; no
//! HTTP library is involved.
//!
//! # Architecture
//!
//! - **`stream`**: bounded read buffer, refilled only when empty
//! - **`scanner`**: reads delimiter-terminated tokens across refills
//! - **`parser`**: request line and header state machine
//! - **`headers`**: `Connection` / `Content-Length` policy
//! - **`request`** / **`response`**: the values passed between stages
//! - **`dispatch`**: picks the response for a request
//! - **`writer`**: serializes and writes responses
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse the next request
//!        └──────┬──────┘
//!               │ Request parsed (or 400/500 ready)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Method, path guard, resolve
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod scanner;
pub mod stream;
pub mod writer;
