// Client side of the contact form: the page's form controller and its HTTP transport.

pub mod controller;
pub mod form;
pub mod transport;

pub use controller::{precheck, FormController, SubmitOutcome};
pub use form::{Banner, BannerClass, BannerState, ContactForm};
pub use transport::{HttpSubmitter, SubmitTransport};
