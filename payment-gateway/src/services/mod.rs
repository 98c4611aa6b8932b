pub mod capture;
pub mod razorpay;
pub mod signature;

pub use capture::{capture_payment, CaptureOutcome};
pub use razorpay::RazorpayClient;
