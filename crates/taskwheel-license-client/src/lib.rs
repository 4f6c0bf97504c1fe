pub mod device;
pub mod session;
pub mod transport;

pub use session::{ActivationOutcome, LicenseSession, SessionStatus};
pub use transport::HttpTransport;
