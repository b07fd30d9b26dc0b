pub mod fault;
pub mod request_id;

pub use fault::{FaultPolicy, fault_envelope_middleware, panic_to_fault};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware, request_id_of};
